//! User entities, role model, and DTOs.
//!
//! The `users` row is the identity of record: three mutually-constrained
//! role flags describe what the account is. [`Role`] is always computed on
//! read from those flags; the `instructors` and `students` tables are
//! projections rebuilt from user state transitions, never independently
//! authored. An instructor projection row only exists once an admin has
//! approved the request, and its `verified` flag gates every course and
//! grade privilege.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::errors::AppError;

/// The effective role of an account, computed from its flags.
///
/// Precedence is admin > instructor > student, matching how the account is
/// presented at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Instructor,
    Student,
}

/// The three role flags carried by a user row.
///
/// `validate` enforces the role-consistency invariant; `role` derives the
/// effective [`Role`]. Flags with nothing set normalize to student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleFlags {
    pub is_admin: bool,
    pub is_instructor: bool,
    pub is_student: bool,
}

impl RoleFlags {
    /// Default unset flags to student, the role every self-registration
    /// falls back to.
    pub fn normalized(self) -> Self {
        if !self.is_admin && !self.is_instructor && !self.is_student {
            Self {
                is_student: true,
                ..self
            }
        } else {
            self
        }
    }

    /// Fails when the flags are in a contradictory state. Instructor and
    /// student are mutually exclusive.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_instructor && self.is_student {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "A user cannot be both an instructor and a student"
            )));
        }
        Ok(())
    }

    pub fn role(&self) -> Role {
        if self.is_admin {
            Role::Admin
        } else if self.is_instructor {
            Role::Instructor
        } else {
            Role::Student
        }
    }
}

/// A user in the identity directory.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password: String,
    pub is_admin: bool,
    pub is_instructor: bool,
    pub is_student: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn flags(&self) -> RoleFlags {
        RoleFlags {
            is_admin: self.is_admin,
            is_instructor: self.is_instructor,
            is_student: self.is_student,
        }
    }

    pub fn role(&self) -> Role {
        self.flags().role()
    }
}

/// Instructor projection row. Exists only after admin approval.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Instructor {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub verified: bool,
}

/// Student projection row, created when a signup resolves to student.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Student {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Admin-facing view of a user, including instructor verification status.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_instructor_verified: bool,
}

/// DTO for admin user creation.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_instructor: bool,
    #[serde(default)]
    pub is_student: bool,
}

/// DTO for admin user updates. Role flag changes are normalized for mutual
/// exclusion (setting instructor clears student and vice versa) and the
/// role projections are rebuilt to match.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    pub is_admin: Option<bool>,
    pub is_instructor: Option<bool>,
    pub is_student: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_normalize_to_student() {
        let flags = RoleFlags::default().normalized();
        assert!(flags.is_student);
        assert_eq!(flags.role(), Role::Student);
    }

    #[test]
    fn test_explicit_flags_survive_normalization() {
        let flags = RoleFlags {
            is_instructor: true,
            ..Default::default()
        }
        .normalized();
        assert!(flags.is_instructor);
        assert!(!flags.is_student);
    }

    #[test]
    fn test_instructor_and_student_conflict() {
        let flags = RoleFlags {
            is_instructor: true,
            is_student: true,
            ..Default::default()
        };
        assert!(flags.validate().is_err());
    }

    #[test]
    fn test_role_precedence() {
        let admin = RoleFlags {
            is_admin: true,
            is_instructor: true,
            ..Default::default()
        };
        assert_eq!(admin.role(), Role::Admin);

        let instructor = RoleFlags {
            is_instructor: true,
            ..Default::default()
        };
        assert_eq!(instructor.role(), Role::Instructor);
    }

    #[test]
    fn test_user_serialization_skips_password() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "hashed-secret".to_string(),
            is_admin: false,
            is_instructor: false,
            is_student: true,
            created_at: Utc::now(),
        };

        let serialized = serde_json::to_string(&user).unwrap();
        assert!(serialized.contains("alice"));
        assert!(!serialized.contains("hashed-secret"));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&Role::Instructor).unwrap(),
            "\"instructor\""
        );
    }
}
