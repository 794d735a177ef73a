//! `/api/posts` and the nested `/api/posts/{post_id}/comments`.

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::common::{ApiResponse, PageQuery};
use crate::domain::dto::posts::request::{
    CreateCommentRequest, CreatePostRequest, PostFilter, UpdateCommentRequest, UpdatePostRequest,
};
use crate::domain::entities::reactions::ReactionKind;
use crate::domain::models::auth::{AuthenticatedUser, OptionalUser};
use crate::handlers::STAFF_ROLES;
use crate::middlewares::AuthMiddleware;
use crate::services::community::comment_service::CommentService;
use crate::services::community::post_service::PostService;
use crate::utils::string_utils::parse_object_id;

/// Drafts are only listed for their author and for admins
#[get("", wrap = "AuthMiddleware::optional()")]
pub async fn list_posts(
    viewer: OptionalUser,
    filter: web::Query<PostFilter>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = PostService::instance()
        .list(viewer.0.as_ref(), filter.into_inner(), &query)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(page)))
}

#[get("/{key}", wrap = "AuthMiddleware::optional()")]
pub async fn get_post(viewer: OptionalUser, key: web::Path<String>) -> Result<HttpResponse, AppError> {
    let post = PostService::instance().get(viewer.0.as_ref(), &key).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

#[post("", wrap = "AuthMiddleware::required_with_roles(STAFF_ROLES.to_vec())")]
pub async fn create_post(
    user: AuthenticatedUser,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let post = PostService::instance().create(&user, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(post, "تم إنشاء المقال بنجاح")))
}

#[put("/{key}", wrap = "AuthMiddleware::required()")]
pub async fn update_post(
    user: AuthenticatedUser,
    key: web::Path<String>,
    payload: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let post = PostService::instance().update(&user, &key, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(post, "تم تحديث المقال بنجاح")))
}

#[put("/{key}/publish", wrap = "AuthMiddleware::required()")]
pub async fn publish_post(user: AuthenticatedUser, key: web::Path<String>) -> Result<HttpResponse, AppError> {
    let post = PostService::instance().publish(&user, &key).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(post, "تم نشر المقال")))
}

#[delete("/{key}", wrap = "AuthMiddleware::required()")]
pub async fn delete_post(user: AuthenticatedUser, key: web::Path<String>) -> Result<HttpResponse, AppError> {
    PostService::instance().delete(&user, &key).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("تم حذف المقال بنجاح")))
}

#[post("/{key}/like", wrap = "AuthMiddleware::required()")]
pub async fn like_post(user: AuthenticatedUser, key: web::Path<String>) -> Result<HttpResponse, AppError> {
    let summary = PostService::instance().react(user.user_id, &key, ReactionKind::Like).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(summary)))
}

#[post("/{key}/dislike", wrap = "AuthMiddleware::required()")]
pub async fn dislike_post(user: AuthenticatedUser, key: web::Path<String>) -> Result<HttpResponse, AppError> {
    let summary = PostService::instance().react(user.user_id, &key, ReactionKind::Dislike).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(summary)))
}

#[get("/{post_id}/comments", wrap = "AuthMiddleware::optional()")]
pub async fn list_comments(
    viewer: OptionalUser,
    post_id: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let post_id = parse_object_id(&post_id)?;
    let viewer_id = viewer.0.map(|u| u.user_id);

    let page = CommentService::instance()
        .list(post_id, &query, viewer_id.as_ref())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::paginated(page)))
}

#[post("/{post_id}/comments", wrap = "AuthMiddleware::required()")]
pub async fn create_comment(
    user: AuthenticatedUser,
    post_id: web::Path<String>,
    payload: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let post_id = parse_object_id(&post_id)?;

    let comment = CommentService::instance()
        .create(user.user_id, post_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(comment, "تم إضافة التعليق")))
}

#[put("/{post_id}/comments/{id}", wrap = "AuthMiddleware::required()")]
pub async fn update_comment(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    payload: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let (post_id, id) = path.into_inner();
    let (post_id, id) = (parse_object_id(&post_id)?, parse_object_id(&id)?);

    let comment = CommentService::instance()
        .update(&user, post_id, id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(comment, "تم تعديل التعليق")))
}

#[delete("/{post_id}/comments/{id}", wrap = "AuthMiddleware::required()")]
pub async fn delete_comment(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (post_id, id) = path.into_inner();
    let (post_id, id) = (parse_object_id(&post_id)?, parse_object_id(&id)?);

    CommentService::instance().delete(&user, post_id, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("تم حذف التعليق")))
}

#[post("/{post_id}/comments/{id}/like", wrap = "AuthMiddleware::required()")]
pub async fn like_comment(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    react_to_comment(user, path.into_inner(), ReactionKind::Like).await
}

#[post("/{post_id}/comments/{id}/dislike", wrap = "AuthMiddleware::required()")]
pub async fn dislike_comment(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    react_to_comment(user, path.into_inner(), ReactionKind::Dislike).await
}

async fn react_to_comment(
    user: AuthenticatedUser,
    (post_id, id): (String, String),
    kind: ReactionKind,
) -> Result<HttpResponse, AppError> {
    let (post_id, id) = (parse_object_id(&post_id)?, parse_object_id(&id)?);

    let summary = CommentService::instance()
        .react(user.user_id, post_id, id, kind)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(summary)))
}
