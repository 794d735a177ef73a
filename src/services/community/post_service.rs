//! # Post service
//!
//! Blog/community posts. Anonymous readers and regular users only see
//! published posts; authors see their own drafts, admins see everything.
//! Deletion is soft.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::dto::common::{Page, PageQuery};
use crate::domain::dto::posts::{CreatePostRequest, PostFilter, PostResponse, ReactionSummary, UpdatePostRequest};
use crate::domain::entities::post::{excerpt_from, Post, PostStatus};
use crate::domain::entities::reactions::{ReactionKind, Reactions};
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::community::post_repo::PostRepository;
use crate::repositories::users::user_repo::UserRepository;
use crate::utils::string_utils::{clean_optional_string, normalize_tags, parse_object_id, unique_slug, validate_required_string};

const EXCERPT_LENGTH: usize = 200;

#[service(name = "post")]
pub struct PostService {
    post_repo: Arc<PostRepository>,
    user_repo: Arc<UserRepository>,
}

impl PostService {
    pub async fn find_post(&self, key: &str) -> Result<Post, AppError> {
        self.post_repo
            .find_by_id_or_slug(key)
            .await?
            .ok_or_else(|| AppError::NotFound("المنشور غير موجود".to_string()))
    }

    async fn respond(&self, post: Post, viewer: Option<&ObjectId>) -> Result<PostResponse, AppError> {
        let users = self.user_repo.summaries(&[post.author]).await?;
        Ok(PostResponse::new(post, &users, viewer))
    }

    pub async fn list(
        &self,
        viewer: Option<&AuthenticatedUser>,
        filter: PostFilter,
        query: &PageQuery,
    ) -> Result<Page<PostResponse>, AppError> {
        let mongo_filter = post_filter_document(&filter, viewer)?;
        let page = self.post_repo.find_page(mongo_filter, query).await?;

        let authors: Vec<ObjectId> = page.items.iter().map(|p| p.author).collect();
        let users = self.user_repo.summaries(&authors).await?;
        let viewer_id = viewer.map(|v| v.user_id);

        Ok(page.map(|post| PostResponse::new(post, &users, viewer_id.as_ref())))
    }

    /// Reading a published post counts a view
    pub async fn get(&self, viewer: Option<&AuthenticatedUser>, key: &str) -> Result<PostResponse, AppError> {
        let post = self.find_post(key).await?;
        let viewer_id = viewer.map(|v| v.user_id);

        if !post.is_published() {
            if !viewer.is_some_and(|v| v.can_manage(&post.author)) {
                return Err(AppError::NotFound("المنشور غير موجود".to_string()));
            }
            return self.respond(post, viewer_id.as_ref()).await;
        }

        let id = post
            .id
            .ok_or_else(|| AppError::InternalError("post has no id".to_string()))?;
        let post = self.post_repo.increment_views(id).await?.unwrap_or(post);
        self.respond(post, viewer_id.as_ref()).await
    }

    pub async fn create(&self, actor: &AuthenticatedUser, request: CreatePostRequest) -> Result<PostResponse, AppError> {
        let title = validate_required_string(&request.title, "العنوان")?;
        let content = request.content.trim().to_string();
        let id = ObjectId::new();
        let now = DateTime::now();

        let status = request.status.unwrap_or(PostStatus::Draft);
        if status == PostStatus::Archived {
            return Err(AppError::ValidationError("لا يمكن إنشاء منشور مؤرشف".to_string()));
        }

        let mut post = Post {
            id: Some(id),
            slug: unique_slug(&title, &id.to_hex()),
            title,
            excerpt: clean_optional_string(request.excerpt).unwrap_or_else(|| excerpt_from(&content, EXCERPT_LENGTH)),
            content,
            author: actor.user_id,
            category: request.category.trim().to_string(),
            tags: normalize_tags(request.tags.unwrap_or_default()),
            status: PostStatus::Draft,
            published_at: None,
            reactions: Reactions::default(),
            views: 0,
            comments_count: 0,
            is_featured: request.is_featured.unwrap_or(false) && actor.is_admin(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        };
        post.set_status(status, now);

        let created = self.post_repo.create(post).await?;
        log::info!("post '{}' created by {}", created.slug, actor.user_id.to_hex());
        self.respond(created, Some(&actor.user_id)).await
    }

    pub async fn update(&self, actor: &AuthenticatedUser, key: &str, request: UpdatePostRequest) -> Result<PostResponse, AppError> {
        let mut post = self.find_post(key).await?;
        actor.ensure_can_manage(&post.author)?;

        let id = post
            .id
            .ok_or_else(|| AppError::InternalError("post has no id".to_string()))?;

        let mut fields = post_update_document(id, &request, actor.is_admin())?;
        if let Some(status) = request.status {
            post.set_status(status, DateTime::now());
            fields.insert("status", status.as_str());
            fields.insert("published_at", post.published_at.map(Bson::DateTime).unwrap_or(Bson::Null));
        }

        if fields.is_empty() {
            return self.respond(post, Some(&actor.user_id)).await;
        }

        let updated = self
            .post_repo
            .update_fields(id, fields)
            .await?
            .ok_or_else(|| AppError::NotFound("المنشور غير موجود".to_string()))?;
        self.respond(updated, Some(&actor.user_id)).await
    }

    pub async fn publish(&self, actor: &AuthenticatedUser, key: &str) -> Result<PostResponse, AppError> {
        let request = UpdatePostRequest { status: Some(PostStatus::Published), ..Default::default() };
        self.update(actor, key, request).await
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, key: &str) -> Result<(), AppError> {
        let post = self.find_post(key).await?;
        actor.ensure_can_manage(&post.author)?;

        if let Some(id) = post.id {
            self.post_repo.soft_delete(id).await?;
            log::info!("post {} deleted by {}", id.to_hex(), actor.user_id.to_hex());
        }
        Ok(())
    }

    pub async fn react(&self, user: ObjectId, key: &str, kind: ReactionKind) -> Result<ReactionSummary, AppError> {
        let mut post = self.find_post(key).await?;
        if !post.is_published() {
            return Err(AppError::NotFound("المنشور غير موجود".to_string()));
        }

        self.post_repo.toggle_reaction(&post, user, kind).await?;
        post.reactions.toggle(user, kind);
        Ok(ReactionSummary::new(&post.reactions, Some(&user)))
    }
}

/// Non-admins see published posts, plus their own when filtering by
/// themselves as author
fn post_filter_document(filter: &PostFilter, viewer: Option<&AuthenticatedUser>) -> Result<Document, AppError> {
    let mut mongo_filter = doc! { "is_deleted": false };

    let author = filter.author.as_deref().map(parse_object_id).transpose()?;
    if let Some(author) = author {
        mongo_filter.insert("author", author);
    }

    let sees_all = viewer.is_some_and(|v| v.is_admin() || author.is_some_and(|a| a == v.user_id));
    match (sees_all, filter.status) {
        (true, Some(status)) => {
            mongo_filter.insert("status", status.as_str());
        }
        (true, None) => {}
        (false, _) => {
            mongo_filter.insert("status", PostStatus::Published.as_str());
        }
    }

    if let Some(category) = filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        mongo_filter.insert("category", category);
    }
    if let Some(tag) = filter.tag.as_deref().map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty()) {
        mongo_filter.insert("tags", tag);
    }
    if let Some(featured) = filter.featured {
        mongo_filter.insert("is_featured", featured);
    }

    Ok(mongo_filter)
}

fn post_update_document(id: ObjectId, request: &UpdatePostRequest, is_admin: bool) -> Result<Document, AppError> {
    let mut fields = Document::new();

    if let Some(title) = request.title.as_deref() {
        let title = validate_required_string(title, "العنوان")?;
        fields.insert("slug", unique_slug(&title, &id.to_hex()));
        fields.insert("title", title);
    }
    if let Some(content) = request.content.as_deref() {
        fields.insert("content", content.trim());
        if request.excerpt.is_none() {
            fields.insert("excerpt", excerpt_from(content, EXCERPT_LENGTH));
        }
    }
    if let Some(excerpt) = request.excerpt.as_deref() {
        fields.insert("excerpt", excerpt.trim());
    }
    if let Some(category) = request.category.as_deref() {
        fields.insert("category", category.trim());
    }
    if let Some(tags) = request.tags.clone() {
        fields.insert("tags", normalize_tags(tags));
    }
    if let (Some(featured), true) = (request.is_featured, is_admin) {
        fields.insert("is_featured", featured);
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::UserRole;

    fn viewer(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser { user_id: ObjectId::new(), role }
    }

    #[test]
    fn test_public_listing_forces_published() {
        let filter = PostFilter { status: Some(PostStatus::Draft), ..Default::default() };
        let doc = post_filter_document(&filter, None).unwrap();
        assert_eq!(doc.get_str("status").unwrap(), "published");

        let user = viewer(UserRole::User);
        let doc = post_filter_document(&filter, Some(&user)).unwrap();
        assert_eq!(doc.get_str("status").unwrap(), "published");
    }

    #[test]
    fn test_admin_and_author_see_drafts() {
        let filter = PostFilter { status: Some(PostStatus::Draft), ..Default::default() };
        let admin = viewer(UserRole::Admin);
        assert_eq!(post_filter_document(&filter, Some(&admin)).unwrap().get_str("status").unwrap(), "draft");

        let author = viewer(UserRole::User);
        let own = PostFilter { author: Some(author.user_id.to_hex()), ..Default::default() };
        assert!(!post_filter_document(&own, Some(&author)).unwrap().contains_key("status"));
    }

    #[test]
    fn test_featured_flag_admin_only() {
        let request = UpdatePostRequest { is_featured: Some(true), ..Default::default() };
        let id = ObjectId::new();
        assert!(!post_update_document(id, &request, false).unwrap().contains_key("is_featured"));
        assert!(post_update_document(id, &request, true).unwrap().contains_key("is_featured"));
    }
}
