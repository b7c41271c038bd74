use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ClientError;

/// Платформа, для которой генерируется контент, если вызывающий её не указал.
pub const DEFAULT_SOCIAL_TARGET: &str = "linkedin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Тело запроса `POST /generate`.
pub struct GenerateRequest {
    /// Инструкция пользователя для генерации.
    pub prompt: String,
    /// Идентификатор целевой платформы, например `linkedin`.
    pub social_target: String,
}

impl GenerateRequest {
    /// Создаёт запрос; `None` в `social_target` означает [`DEFAULT_SOCIAL_TARGET`].
    pub fn new(prompt: impl Into<String>, social_target: Option<&str>) -> Self {
        Self {
            prompt: prompt.into(),
            social_target: social_target.unwrap_or(DEFAULT_SOCIAL_TARGET).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Ответ `POST /generate`.
pub struct GenerateResponse {
    /// Сгенерированный backend текст.
    pub generated_text: String,
    /// Отметка времени от backend; передаётся как есть, без разбора.
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Платформы, которые поддерживает backend генерации.
pub enum SocialPlatform {
    /// LinkedIn.
    #[default]
    Linkedin,
    /// Twitter / X.
    Twitter,
    /// Instagram.
    Instagram,
    /// Facebook.
    Facebook,
}

impl SocialPlatform {
    /// Все поддерживаемые платформы.
    pub const ALL: [SocialPlatform; 4] = [
        SocialPlatform::Linkedin,
        SocialPlatform::Twitter,
        SocialPlatform::Instagram,
        SocialPlatform::Facebook,
    ];

    /// Идентификатор платформы в wire-формате.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SocialPlatform {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|platform| platform.as_str() == normalized)
            .ok_or_else(|| ClientError::UnknownPlatform(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Статус публикации поста.
pub enum PostStatus {
    /// Черновик.
    #[default]
    Draft,
    /// Запланирован к публикации.
    Scheduled,
    /// Опубликован.
    Published,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Пост социальной сети в формате backend.
pub struct Post {
    /// Идентификатор поста.
    pub id: String,
    /// Текст поста.
    pub testo: String,
    /// Целевая платформа.
    pub social_target: String,
    /// Запланированное время публикации (UTC).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "backend_datetime::deserialize_option"
    )]
    pub data_programmazione: Option<DateTime<Utc>>,
    /// Дата и время создания (UTC).
    #[serde(deserialize_with = "backend_datetime::deserialize")]
    pub created_at: DateTime<Utc>,
    /// Статус поста.
    #[serde(default)]
    pub status: PostStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
/// Данные для создания поста.
pub struct PostCreate {
    /// Текст поста, 1..=3000 символов.
    #[validate(length(min = 1, max = 3000))]
    pub testo: String,
    /// Целевая платформа.
    #[validate(length(min = 1))]
    pub social_target: String,
    /// Запланированное время публикации (UTC).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "backend_datetime::deserialize_option"
    )]
    pub data_programmazione: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Метрики опубликованного поста.
pub struct PostAnalytics {
    /// Идентификатор поста.
    pub post_id: String,
    /// Просмотры.
    #[serde(default)]
    pub views: u64,
    /// Лайки.
    #[serde(default)]
    pub likes: u64,
    /// Комментарии.
    #[serde(default)]
    pub comments: u64,
    /// Репосты.
    #[serde(default)]
    pub shares: u64,
}

/// Backend отдаёт даты без смещения (`2024-01-01T10:00:00.123456`), считаем их UTC.
/// RFC 3339 со смещением тоже принимается.
mod backend_datetime {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
            return Some(value.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid datetime: {raw:?}")))
    }

    pub(super) fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid datetime: {raw:?}"))),
            None => Ok(None),
        }
    }
}
