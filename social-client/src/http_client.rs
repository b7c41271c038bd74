use hyper::ext::ReasonPhrase;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::{Serialize, de::DeserializeOwned};

use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError, ClientResult};
use crate::models::{GenerateRequest, GenerateResponse};

const GENERATE_PATH: &str = "/generate";

#[derive(Debug, Clone)]
/// Параметры одного запроса: метод, тело и дополнительные заголовки.
///
/// По умолчанию `GET` без тела.
pub struct RequestOptions {
    method: Method,
    body: Option<String>,
    headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    /// Параметры с указанным HTTP-методом.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Параметры `POST`-запроса.
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    /// Тело запроса, передаваемое без изменений.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Сериализует `payload` в JSON и использует его как тело запроса.
    pub fn json<T: Serialize + ?Sized>(self, payload: &T) -> ClientResult<Self> {
        let body = serde_json::to_string(payload).map_err(ClientError::Encode)?;
        Ok(self.body(body))
    }

    /// Добавляет заголовок; одноимённый заголовок по умолчанию будет заменён.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// HTTP-метод запроса.
    pub fn method(&self) -> &Method {
        &self.method
    }
}

#[derive(Debug, Clone)]
/// HTTP-клиент backend генерации контента.
pub struct ApiClient {
    config: ClientConfig,
    client: Client,
}

impl ApiClient {
    /// Создаёт клиент по явно переданной конфигурации.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// Конфигурация, с которой создан клиент.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> ClientResult<String> {
        if !path.starts_with('/') {
            return Err(ClientError::InvalidEndpoint(path.to_string()));
        }
        Ok(format!("{}{}", self.config.base_url(), path))
    }

    /// Выполняет один запрос к backend и декодирует JSON-ответ в `T`.
    ///
    /// - всегда выставляет `Content-Type: application/json`, заголовки из
    ///   `options` имеют приоритет;
    /// - статус вне 2xx превращается в [`ClientError::Api`], тело ответа не читается;
    /// - повторов и backoff нет: ровно одна попытка.
    pub async fn request<T>(&self, endpoint: &str, options: RequestOptions) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(endpoint)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // значения из переданной карты замещают одноимённые значения по умолчанию
        headers.extend(options.headers);

        let mut request = self.client.request(options.method, url).headers(headers);
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            // hyper кладёт ReasonPhrase в extensions только для нестандартного текста
            let reason = response
                .extensions()
                .get::<ReasonPhrase>()
                .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok());
            return Err(ApiError::from_status_text(status, reason).into());
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice::<T>(&bytes).map_err(ClientError::Decode)
    }

    /// Генерирует текст по промпту для указанной платформы.
    ///
    /// `social_target = None` означает `linkedin`. Пустой промпт здесь не
    /// отклоняется: проверка выполняется на стороне UI.
    pub async fn generate_content(
        &self,
        prompt: &str,
        social_target: Option<&str>,
    ) -> ClientResult<GenerateResponse> {
        let payload = GenerateRequest::new(prompt, social_target);
        self.post_generate(&payload).await
    }

    pub(crate) async fn post_generate(
        &self,
        payload: &GenerateRequest,
    ) -> ClientResult<GenerateResponse> {
        let options = RequestOptions::post().json(payload)?;
        self.request(GENERATE_PATH, options).await
    }
}
