use std::time::Duration;

use reqwest::Url;

use crate::error::{ClientError, ClientResult};

/// Адрес backend по умолчанию, если `API_BASE_URL` не задан.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

const API_BASE_URL_ENV: &str = "API_BASE_URL";
const API_REQUEST_TIMEOUT_SECS_ENV: &str = "API_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Конфигурация `ApiClient`.
///
/// Читается один раз при старте и передаётся клиенту явно.
pub struct ClientConfig {
    base_url: String,
    request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Создаёт конфигурацию с указанным origin backend, без таймаута.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url = normalize_base_url(&base_url.into())?;
        Ok(Self {
            base_url,
            request_timeout: None,
        })
    }

    /// Читает конфигурацию из переменных окружения процесса.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Читает конфигурацию через произвольный источник значений.
    ///
    /// - `API_BASE_URL`: origin backend, по умолчанию [`DEFAULT_API_BASE_URL`];
    /// - `API_REQUEST_TIMEOUT_SECS`: таймаут запроса в секундах, по умолчанию отсутствует.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(API_BASE_URL_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let request_timeout = match lookup(API_REQUEST_TIMEOUT_SECS_ENV) {
            Some(raw) if !raw.trim().is_empty() => Some(parse_timeout_secs(raw.trim())?),
            _ => None,
        };

        Ok(Self::new(base_url)?.with_request_timeout(request_timeout))
    }

    /// Устанавливает (или снимает) таймаут на весь запрос.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Origin backend без завершающего `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Таймаут запроса, если задан.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

fn normalize_base_url(raw: &str) -> ClientResult<String> {
    let url = Url::parse(raw)
        .map_err(|err| ClientError::Config(format!("{API_BASE_URL_ENV}={raw:?}: {err}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!(
            "{API_BASE_URL_ENV}={raw:?}: expected http or https scheme"
        )));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_timeout_secs(raw: &str) -> ClientResult<Duration> {
    let secs = raw.parse::<u64>().map_err(|_| {
        ClientError::Config(format!(
            "failed to parse {API_REQUEST_TIMEOUT_SECS_ENV}, expecting positive integer"
        ))
    })?;

    if secs == 0 {
        return Err(ClientError::Config(format!(
            "{API_REQUEST_TIMEOUT_SECS_ENV} must be > 0"
        )));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::{ClientConfig, DEFAULT_API_BASE_URL};
    use crate::error::ClientError;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_local_loopback_without_timeout() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).expect("must build");
        assert_eq!(config.base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn reads_base_url_and_strips_trailing_slash() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[("API_BASE_URL", "https://api.example.com/")]))
                .expect("must build");
        assert_eq!(config.base_url(), "https://api.example.com");
    }

    #[test]
    fn blank_base_url_falls_back_to_default() {
        let config = ClientConfig::from_lookup(lookup_from(&[("API_BASE_URL", "   ")]))
            .expect("must build");
        assert_eq!(config.base_url(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = ClientConfig::new("ftp://example.com").expect_err("ftp must be rejected");
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn rejects_relative_url() {
        let err = ClientConfig::new("localhost-without-scheme").expect_err("must be rejected");
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn parses_request_timeout() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[("API_REQUEST_TIMEOUT_SECS", "30")]))
                .expect("must build");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_zero_or_garbage_timeout() {
        for raw in ["0", "abc", "-5"] {
            let err = ClientConfig::from_lookup(lookup_from(&[("API_REQUEST_TIMEOUT_SECS", raw)]))
                .expect_err("timeout must be rejected");
            assert!(matches!(err, ClientError::Config(_)), "raw={raw}");
        }
    }
}
