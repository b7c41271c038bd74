use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
/// Ответ backend со статусом вне диапазона 2xx.
///
/// Тело ответа не читается: сохраняются только код и текст статуса.
pub struct ApiError {
    status: u16,
    message: String,
}

impl ApiError {
    /// `reason` - текст статуса из ответа сервера; без него берётся стандартный.
    pub(crate) fn from_status_text(status: reqwest::StatusCode, reason: Option<&str>) -> Self {
        let status_text = reason
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .or_else(|| status.canonical_reason())
            .unwrap_or("");
        Self {
            status: status.as_u16(),
            message: format!("API error: {} {}", status.as_u16(), status_text)
                .trim_end()
                .to_string(),
        }
    }

    /// Числовой HTTP-статус ответа.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Сообщение вида `API error: 503 Service Unavailable`.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `social-client`.
pub enum ClientError {
    /// Некорректная конфигурация клиента (URL backend, таймаут).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Путь запроса не начинается с `/`.
    #[error("invalid endpoint: {0:?} must start with '/'")]
    InvalidEndpoint(String),

    /// Ошибка транспорта (`reqwest`): сеть, DNS, соединение.
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend ответил статусом вне 2xx.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Тело успешного ответа не является ожидаемым JSON.
    #[error("decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// Тело запроса не удалось сериализовать в JSON.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Неизвестный идентификатор социальной платформы.
    #[error("unknown social platform: {0}")]
    UnknownPlatform(String),
}

/// Результат операций `social-client`.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Возвращает HTTP-статус, если ошибка пришла от backend.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.status()),
            _ => None,
        }
    }
}
