use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::content::{Content, LocalizedText};
use crate::utils::datetime::to_chrono;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub id: String,
    pub key: String,
    pub page: String,
    pub section: String,
    pub title: LocalizedText,
    pub body: LocalizedText,
    pub is_published: bool,
    pub version: i64,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Content> for ContentResponse {
    fn from(content: Content) -> Self {
        Self {
            id: content.id.map(|id| id.to_hex()).unwrap_or_default(),
            key: content.key,
            page: content.page,
            section: content.section,
            title: content.title,
            body: content.body,
            is_published: content.is_published,
            version: content.version,
            updated_by: content.updated_by.map(|id| id.to_hex()),
            updated_at: to_chrono(content.updated_at),
        }
    }
}
