use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::post::PostStatus;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(min = 3, max = 200, message = "العنوان يجب أن يكون بين 3 و 200 حرف"))]
    pub title: String,

    #[validate(length(min = 10, message = "المحتوى يجب أن يكون 10 أحرف على الأقل"))]
    pub content: String,

    #[validate(length(max = 500, message = "المقتطف يجب ألا يتجاوز 500 حرف"))]
    pub excerpt: Option<String>,

    #[validate(length(min = 2, max = 50, message = "الفئة مطلوبة"))]
    pub category: String,

    pub tags: Option<Vec<String>>,

    /// `draft` (default) or `published`
    pub status: Option<PostStatus>,

    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[validate(length(min = 3, max = 200, message = "العنوان يجب أن يكون بين 3 و 200 حرف"))]
    pub title: Option<String>,

    #[validate(length(min = 10, message = "المحتوى يجب أن يكون 10 أحرف على الأقل"))]
    pub content: Option<String>,

    #[validate(length(max = 500, message = "المقتطف يجب ألا يتجاوز 500 حرف"))]
    pub excerpt: Option<String>,

    #[validate(length(min = 2, max = 50, message = "الفئة مطلوبة"))]
    pub category: Option<String>,

    pub tags: Option<Vec<String>>,
    pub status: Option<PostStatus>,
    pub is_featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub author: Option<String>,
    pub featured: Option<bool>,
    /// Honoured for admins only; everyone else sees published posts
    pub status: Option<PostStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "التعليق يجب أن يكون بين 1 و 2000 حرف"))]
    pub content: String,

    /// Parent comment id for replies
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "التعليق يجب أن يكون بين 1 و 2000 حرف"))]
    pub content: String,
}
