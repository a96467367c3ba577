use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::Role;

/// JWT claims. `sub` is the numeric user id, the canonical identity
/// subject across token issue and verify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequestDto {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    /// Requested role flags. All false defaults to student.
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_instructor: bool,
    #[serde(default)]
    pub is_student: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// Compact user presentation returned with a token.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthUserInfo {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthUserInfo,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Result of a signup: an immediately-usable session, or an instructor
/// request parked until an admin approves it.
#[derive(Debug)]
pub enum SignupOutcome {
    Active(LoginResponse),
    PendingInstructor,
}
