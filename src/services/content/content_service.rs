//! Bilingual CMS blocks. Public reads see published blocks only; the admin
//! endpoints manage everything.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, to_bson, DateTime, Document};
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::dto::common::{Page, PageQuery};
use crate::domain::dto::content::{ContentFilter, ContentResponse, CreateContentRequest, UpdateContentRequest};
use crate::domain::entities::content::Content;
use crate::repositories::content::content_repo::ContentRepository;

#[service(name = "content")]
pub struct ContentService {
    content_repo: Arc<ContentRepository>,
}

impl ContentService {
    pub async fn get_by_key(&self, key: &str) -> Result<ContentResponse, AppError> {
        self.content_repo
            .find_published_by_key(key)
            .await?
            .map(ContentResponse::from)
            .ok_or_else(|| AppError::NotFound("المحتوى غير موجود".to_string()))
    }

    pub async fn get_page(&self, page: &str) -> Result<Vec<ContentResponse>, AppError> {
        let blocks = self.content_repo.find_published_by_page(page).await?;
        Ok(blocks.into_iter().map(ContentResponse::from).collect())
    }

    pub async fn list(&self, filter: ContentFilter, query: &PageQuery) -> Result<Page<ContentResponse>, AppError> {
        let mut mongo_filter = Document::new();
        if let Some(page) = filter.page.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            mongo_filter.insert("page", page);
        }
        if let Some(section) = filter.section.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            mongo_filter.insert("section", section);
        }

        let page = self.content_repo.find_page(mongo_filter, query).await?;
        Ok(page.map(ContentResponse::from))
    }

    pub async fn create(&self, editor: ObjectId, request: CreateContentRequest) -> Result<ContentResponse, AppError> {
        let now = DateTime::now();
        let content = Content {
            id: None,
            key: request.key.trim().to_string(),
            page: request.page.trim().to_string(),
            section: request.section.map(|s| s.trim().to_string()).unwrap_or_default(),
            title: request.title.unwrap_or_default(),
            body: request.body.unwrap_or_default(),
            is_published: request.is_published.unwrap_or(true),
            version: 1,
            updated_by: Some(editor),
            created_at: now,
            updated_at: now,
        };

        let created = self.content_repo.create(content).await.map_err(|e| match e {
            AppError::DuplicateError(_) => AppError::DuplicateError("مفتاح المحتوى مستخدم بالفعل".to_string()),
            other => other,
        })?;

        log::info!("content block '{}' created", created.key);
        Ok(ContentResponse::from(created))
    }

    /// Every update bumps `version`
    pub async fn update(&self, editor: ObjectId, id: ObjectId, request: UpdateContentRequest) -> Result<ContentResponse, AppError> {
        let mut fields = Document::new();
        if let Some(page) = request.page {
            fields.insert("page", page.trim());
        }
        if let Some(section) = request.section {
            fields.insert("section", section.trim());
        }
        if let Some(title) = request.title {
            fields.insert("title", to_bson(&title)?);
        }
        if let Some(body) = request.body {
            fields.insert("body", to_bson(&body)?);
        }
        if let Some(is_published) = request.is_published {
            fields.insert("is_published", is_published);
        }
        fields.insert("updated_by", editor);

        self.content_repo
            .update_fields(id, fields)
            .await?
            .map(ContentResponse::from)
            .ok_or_else(|| AppError::NotFound("المحتوى غير موجود".to_string()))
    }

    pub async fn delete(&self, id: ObjectId) -> Result<(), AppError> {
        if !self.content_repo.delete(id).await? {
            return Err(AppError::NotFound("المحتوى غير موجود".to_string()));
        }
        Ok(())
    }
}
