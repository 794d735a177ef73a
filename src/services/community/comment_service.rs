//! Comments on published posts. The post's `comments_count` follows every
//! create and soft delete.

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::dto::common::{Page, PageQuery};
use crate::domain::dto::posts::{CommentResponse, CreateCommentRequest, ReactionSummary, UpdateCommentRequest};
use crate::domain::entities::comment::Comment;
use crate::domain::entities::post::Post;
use crate::domain::entities::reactions::ReactionKind;
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::community::comment_repo::CommentRepository;
use crate::repositories::community::post_repo::PostRepository;
use crate::repositories::users::user_repo::UserRepository;
use crate::utils::string_utils::{parse_object_id, validate_required_string};

#[service(name = "comment")]
pub struct CommentService {
    comment_repo: Arc<CommentRepository>,
    post_repo: Arc<PostRepository>,
    user_repo: Arc<UserRepository>,
}

impl CommentService {
    async fn find_published_post(&self, post: ObjectId) -> Result<Post, AppError> {
        self.post_repo
            .find_by_id(post)
            .await?
            .filter(Post::is_published)
            .ok_or_else(|| AppError::NotFound("المنشور غير موجود".to_string()))
    }

    /// The comment must belong to `post`
    async fn find_comment(&self, post: ObjectId, id: ObjectId) -> Result<Comment, AppError> {
        self.comment_repo
            .find_by_id(id)
            .await?
            .filter(|c| c.post == post)
            .ok_or_else(|| AppError::NotFound("التعليق غير موجود".to_string()))
    }

    async fn respond(&self, comment: Comment, viewer: &ObjectId) -> Result<CommentResponse, AppError> {
        let users = self.user_repo.summaries(&[comment.author]).await?;
        Ok(CommentResponse::new(comment, &users, Some(viewer)))
    }

    pub async fn list(&self, post: ObjectId, query: &PageQuery, viewer: Option<&ObjectId>) -> Result<Page<CommentResponse>, AppError> {
        self.find_published_post(post).await?;
        let page = self.comment_repo.find_page_for_post(post, query).await?;

        let authors: Vec<ObjectId> = page.items.iter().map(|c| c.author).collect();
        let users = self.user_repo.summaries(&authors).await?;

        Ok(page.map(|comment| CommentResponse::new(comment, &users, viewer)))
    }

    pub async fn create(&self, author: ObjectId, post: ObjectId, request: CreateCommentRequest) -> Result<CommentResponse, AppError> {
        self.find_published_post(post).await?;

        let parent = match request.parent.as_deref() {
            Some(raw) => {
                let parent_id = parse_object_id(raw)?;
                self.find_comment(post, parent_id).await?;
                Some(parent_id)
            }
            None => None,
        };

        let content = validate_required_string(&request.content, "التعليق")?;
        let created = self
            .comment_repo
            .create(Comment::new(post, author, content, parent))
            .await?;
        self.post_repo.adjust_comments_count(post, 1).await?;

        self.respond(created, &author).await
    }

    pub async fn update(&self, actor: &AuthenticatedUser, post: ObjectId, id: ObjectId, request: UpdateCommentRequest) -> Result<CommentResponse, AppError> {
        let comment = self.find_comment(post, id).await?;
        if !comment.is_owned_by(&actor.user_id) {
            return Err(AppError::forbidden());
        }

        let content = validate_required_string(&request.content, "التعليق")?;
        let updated = self
            .comment_repo
            .update_content(id, &content)
            .await?
            .ok_or_else(|| AppError::NotFound("التعليق غير موجود".to_string()))?;
        self.respond(updated, &actor.user_id).await
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, post: ObjectId, id: ObjectId) -> Result<(), AppError> {
        let comment = self.find_comment(post, id).await?;
        actor.ensure_can_manage(&comment.author)?;

        if self.comment_repo.soft_delete(id).await? {
            self.post_repo.adjust_comments_count(post, -1).await?;
        }
        Ok(())
    }

    pub async fn react(&self, user: ObjectId, post: ObjectId, id: ObjectId, kind: ReactionKind) -> Result<ReactionSummary, AppError> {
        let mut comment = self.find_comment(post, id).await?;
        self.comment_repo.toggle_reaction(&comment, user, kind).await?;

        comment.reactions.toggle(user, kind);
        Ok(ReactionSummary::new(&comment.reactions, Some(&user)))
    }
}
