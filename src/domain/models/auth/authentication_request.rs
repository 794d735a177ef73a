//! Middleware configuration: whether a token is mandatory and which roles
//! may pass.

use crate::domain::entities::user::UserRole;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthMode {
    /// Reject the request without a valid token
    Required,
    /// Attach the user when a valid token is present, continue otherwise
    Optional,
}

#[derive(Debug, Clone)]
pub enum RequiredRole {
    Single(UserRole),
    Any(Vec<UserRole>),
}

impl RequiredRole {
    pub fn is_satisfied(&self, role: UserRole) -> bool {
        match self {
            RequiredRole::Single(required) => *required == role,
            RequiredRole::Any(required) => required.contains(&role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_role_single() {
        let required = RequiredRole::Single(UserRole::Admin);
        assert!(required.is_satisfied(UserRole::Admin));
        assert!(!required.is_satisfied(UserRole::User));
    }

    #[test]
    fn test_required_role_any() {
        let required = RequiredRole::Any(vec![UserRole::Instructor, UserRole::Admin]);
        assert!(required.is_satisfied(UserRole::Instructor));
        assert!(required.is_satisfied(UserRole::Admin));
        assert!(!required.is_satisfied(UserRole::Organization));
    }
}
