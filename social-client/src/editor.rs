//! Состояние редактора промпта: ввод, отправка, отображение результата.
//!
//! Редактор не зависит от способа отрисовки: CLI или любой другой UI читает
//! `trigger_enabled()`/`generated_text()` и вызывает `submit()`.

use async_trait::async_trait;
use tracing::{debug, error};

use crate::error::ClientResult;
use crate::http_client::ApiClient;
use crate::models::{DEFAULT_SOCIAL_TARGET, GenerateRequest, GenerateResponse};

/// Сообщение, которое показывается пользователю при любой ошибке генерации.
pub const GENERATION_FAILED_ALERT: &str =
    "Ошибка во время генерации. Проверьте, что backend запущен.";

/// Источник сгенерированного контента.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Выполняет один запрос генерации.
    async fn generate(&self, request: &GenerateRequest) -> ClientResult<GenerateResponse>;
}

#[async_trait]
impl ContentGenerator for ApiClient {
    async fn generate(&self, request: &GenerateRequest) -> ClientResult<GenerateResponse> {
        self.post_generate(request).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Состояние кнопки отправки.
pub enum SubmitState {
    /// Запроса нет, отправка возможна.
    #[default]
    Idle,
    /// Запрос выполняется, повторная отправка игнорируется.
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Итог одной попытки отправки.
pub enum SubmitOutcome {
    /// Отправка не выполнялась: пустой промпт или запрос уже в полёте.
    Ignored,
    /// Backend вернул текст.
    Generated(GenerateResponse),
    /// Любая ошибка; `alert` нужно показать пользователю.
    Failed {
        /// Текст уведомления.
        alert: String,
    },
}

#[derive(Debug, Clone)]
/// Редактор промпта с защитой от двойной отправки.
pub struct PromptEditor {
    prompt: String,
    social_target: String,
    generated_text: Option<String>,
    state: SubmitState,
}

impl Default for PromptEditor {
    fn default() -> Self {
        Self::new(DEFAULT_SOCIAL_TARGET)
    }
}

impl PromptEditor {
    /// Создаёт пустой редактор для указанной платформы.
    pub fn new(social_target: impl Into<String>) -> Self {
        Self {
            prompt: String::new(),
            social_target: social_target.into(),
            generated_text: None,
            state: SubmitState::Idle,
        }
    }

    /// Заменяет текст промпта.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Текущий текст промпта.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Целевая платформа.
    pub fn social_target(&self) -> &str {
        &self.social_target
    }

    /// Текущее состояние отправки.
    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Последний успешно сгенерированный текст.
    pub fn generated_text(&self) -> Option<&str> {
        self.generated_text.as_deref()
    }

    /// Кнопка активна только в `Idle` и при непустом (после trim) промпте.
    pub fn trigger_enabled(&self) -> bool {
        self.state == SubmitState::Idle && !self.prompt.trim().is_empty()
    }

    /// Переводит редактор в `Submitting` и возвращает запрос для отправки.
    ///
    /// Возвращает `None`, если кнопка неактивна.
    pub fn begin_submit(&mut self) -> Option<GenerateRequest> {
        if !self.trigger_enabled() {
            debug!(state = ?self.state, "submit ignored");
            return None;
        }

        self.state = SubmitState::Submitting;
        Some(GenerateRequest::new(
            self.prompt.clone(),
            Some(&self.social_target),
        ))
    }

    /// Завершает отправку и возвращает редактор в `Idle`.
    pub fn finish(&mut self, result: ClientResult<GenerateResponse>) -> SubmitOutcome {
        self.state = SubmitState::Idle;

        match result {
            Ok(response) => {
                self.generated_text = Some(response.generated_text.clone());
                SubmitOutcome::Generated(response)
            }
            Err(err) => {
                error!(error = %err, "content generation failed");
                self.generated_text = None;
                SubmitOutcome::Failed {
                    alert: GENERATION_FAILED_ALERT.to_string(),
                }
            }
        }
    }

    /// Отправляет текущий промпт через `generator`.
    pub async fn submit<G>(&mut self, generator: &G) -> SubmitOutcome
    where
        G: ContentGenerator + ?Sized,
    {
        let Some(request) = self.begin_submit() else {
            return SubmitOutcome::Ignored;
        };

        let result = generator.generate(&request).await;
        self.finish(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{ApiError, ClientError};

    struct FakeGenerator {
        calls: Mutex<Vec<GenerateRequest>>,
        fail_with_status: Option<u16>,
    }

    impl FakeGenerator {
        fn ok() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with_status: None,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_with_status: Some(status),
            }
        }

        fn calls(&self) -> Vec<GenerateRequest> {
            self.calls.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl ContentGenerator for FakeGenerator {
        async fn generate(&self, request: &GenerateRequest) -> ClientResult<GenerateResponse> {
            self.calls.lock().expect("lock").push(request.clone());
            if let Some(status) = self.fail_with_status {
                let status = reqwest::StatusCode::from_u16(status).expect("valid status");
                return Err(ClientError::Api(ApiError::from_status_text(status, None)));
            }
            Ok(GenerateResponse {
                generated_text: format!("echo: {}", request.prompt),
                timestamp: "2024-01-01T00:00:00Z".to_string(),
            })
        }
    }

    #[test]
    fn trigger_disabled_for_blank_prompt() {
        let mut editor = PromptEditor::default();
        assert!(!editor.trigger_enabled());

        editor.set_prompt("   \n\t");
        assert!(!editor.trigger_enabled());
        assert!(editor.begin_submit().is_none());
        assert_eq!(editor.state(), SubmitState::Idle);
    }

    #[tokio::test]
    async fn blank_prompt_never_reaches_generator() {
        let generator = FakeGenerator::ok();
        let mut editor = PromptEditor::default();
        editor.set_prompt("   ");

        let outcome = editor.submit(&generator).await;

        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(generator.calls().is_empty());
    }

    #[test]
    fn second_trigger_while_submitting_is_noop() {
        let mut editor = PromptEditor::new("twitter");
        editor.set_prompt("hello");

        let request = editor.begin_submit().expect("first submit starts");
        assert_eq!(request.prompt, "hello");
        assert_eq!(request.social_target, "twitter");
        assert_eq!(editor.state(), SubmitState::Submitting);
        assert!(!editor.trigger_enabled());

        assert!(editor.begin_submit().is_none());
        assert_eq!(editor.state(), SubmitState::Submitting);
    }

    #[tokio::test]
    async fn success_displays_text_and_reenables_trigger() {
        let generator = FakeGenerator::ok();
        let mut editor = PromptEditor::default();
        editor.set_prompt("launch");

        let outcome = editor.submit(&generator).await;

        match outcome {
            SubmitOutcome::Generated(response) => assert_eq!(response.generated_text, "echo: launch"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(editor.generated_text(), Some("echo: launch"));
        assert_eq!(editor.state(), SubmitState::Idle);
        assert!(editor.trigger_enabled());

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].social_target, DEFAULT_SOCIAL_TARGET);
    }

    #[tokio::test]
    async fn failure_shows_alert_and_clears_stale_text() {
        let mut editor = PromptEditor::default();
        editor.set_prompt("first");
        editor.submit(&FakeGenerator::ok()).await;
        assert!(editor.generated_text().is_some());

        let outcome = editor.submit(&FakeGenerator::failing(503)).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                alert: GENERATION_FAILED_ALERT.to_string()
            }
        );
        assert_eq!(editor.generated_text(), None);
        assert_eq!(editor.state(), SubmitState::Idle);
        assert!(editor.trigger_enabled());
    }

    #[test]
    fn prompt_is_sent_untrimmed() {
        let mut editor = PromptEditor::default();
        editor.set_prompt("  spaced  ");
        let request = editor.begin_submit().expect("must start");
        assert_eq!(request.prompt, "  spaced  ");
    }
}
