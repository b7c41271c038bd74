//! Клиентская библиотека для backend генерации контента социальных сетей.
//!
//! Состоит из:
//! - `ApiClient`: один HTTP-запрос к backend с нормализацией ошибок;
//! - `ApiClient::generate_content`: вызов `POST /generate`;
//! - `PromptEditor`: состояние UI-редактора промпта с защитой от двойной отправки.
//!
//! Конфигурация (`ClientConfig`) читается один раз при старте и передаётся
//! клиенту явно.
#![warn(missing_docs)]

mod config;
mod editor;
mod error;
mod http_client;
mod models;

pub use config::{ClientConfig, DEFAULT_API_BASE_URL};
pub use editor::{
    ContentGenerator, GENERATION_FAILED_ALERT, PromptEditor, SubmitOutcome, SubmitState,
};
pub use error::{ApiError, ClientError, ClientResult};
pub use http_client::{ApiClient, RequestOptions};
pub use models::{
    DEFAULT_SOCIAL_TARGET, GenerateRequest, GenerateResponse, Post, PostAnalytics, PostCreate,
    PostStatus, SocialPlatform,
};

pub use reqwest::Method;
pub use reqwest::header;
