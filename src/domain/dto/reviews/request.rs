use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub program_id: String,

    #[validate(range(min = 1, max = 5, message = "التقييم يجب أن يكون بين 1 و 5"))]
    pub rating: i32,

    #[validate(length(max = 100, message = "العنوان يجب ألا يتجاوز 100 حرف"))]
    pub title: Option<String>,

    #[validate(length(min = 10, max = 1000, message = "التعليق يجب أن يكون بين 10 و 1000 حرف"))]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "التقييم يجب أن يكون بين 1 و 5"))]
    pub rating: Option<i32>,

    #[validate(length(max = 100, message = "العنوان يجب ألا يتجاوز 100 حرف"))]
    pub title: Option<String>,

    #[validate(length(min = 10, max = 1000, message = "التعليق يجب أن يكون بين 10 و 1000 حرف"))]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let mut req = CreateReviewRequest {
            program_id: "507f1f77bcf86cd799439011".into(),
            rating: 5,
            title: None,
            comment: "برنامج رائع ومفيد جداً".into(),
        };
        assert!(req.validate().is_ok());

        req.rating = 6;
        assert!(req.validate().is_err());
        req.rating = 0;
        assert!(req.validate().is_err());
    }
}
