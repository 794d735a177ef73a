use serde::{Deserialize, Serialize};

use crate::domain::entities::user::UserRole;

/// JWT payload. `userId` is the key the middleware resolves the user by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}
