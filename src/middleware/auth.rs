//! Authentication extractors.
//!
//! [`AuthUser`] validates the bearer token and exposes the raw claims.
//! [`Caller`] is the authorization guard proper: it re-loads the user row
//! on every request (a token outliving its account, or a role change since
//! issuance, must not grant stale access), derives the effective [`Role`],
//! and exposes capability checks that handlers call before touching a
//! resource. Guard decisions are never cached across requests.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::modules::auth::model::Claims;
use crate::modules::users::model::{Instructor, Role, User};
use crate::modules::users::service::UserService;
use crate::modules::courses::model::Course;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that validates the JWT and provides the authenticated user's
/// claims. No database access; use [`Caller`] when the current account
/// state matters.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The token subject parsed as the numeric user id.
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user id in token".to_string()))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format".to_string())
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// The resolved caller: current user row, effective role, and (for
/// instructors) the approval projection.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user: User,
    pub role: Role,
    pub instructor: Option<Instructor>,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if !self.is_admin() {
            return Err(AppError::forbidden(
                "Unauthorized: Admin access required".to_string(),
            ));
        }
        Ok(())
    }

    /// Student-only operations; returns the student id for ledger lookups.
    pub fn require_student(&self) -> Result<i64, AppError> {
        if self.role != Role::Student {
            return Err(AppError::forbidden(
                "Unauthorized: Student access required".to_string(),
            ));
        }
        Ok(self.user.id)
    }

    /// Instructor operations require both the role flag and an
    /// admin-approved, verified projection row.
    pub fn require_verified_instructor(&self) -> Result<&Instructor, AppError> {
        if self.role != Role::Instructor {
            return Err(AppError::forbidden("Not an instructor".to_string()));
        }
        match &self.instructor {
            Some(instructor) if instructor.verified => Ok(instructor),
            _ => Err(AppError::forbidden(
                "Instructor not verified by admin".to_string(),
            )),
        }
    }

    /// Course mutations are allowed for the admin or the verified
    /// instructor who owns the course.
    pub fn require_course_access(&self, course: &Course) -> Result<(), AppError> {
        if self.is_admin() {
            return Ok(());
        }
        let instructor = self.require_verified_instructor()?;
        if course.instructor_id != Some(instructor.id) {
            return Err(AppError::forbidden(
                "You are not the instructor for this course".to_string(),
            ));
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        let user_id = auth_user.user_id()?;

        // Token validity does not imply account validity; re-check the row.
        let user = UserService::find_user(&state.db, user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Account no longer exists".to_string()))?;

        let role = user.role();
        let instructor = if role == Role::Instructor {
            UserService::find_instructor(&state.db, user.id).await?
        } else {
            None
        };

        Ok(Caller {
            user,
            role,
            instructor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with_flags(is_admin: bool, is_instructor: bool, is_student: bool) -> User {
        User {
            id: 7,
            username: "caller".to_string(),
            email: "caller@example.com".to_string(),
            password: "hash".to_string(),
            is_admin,
            is_instructor,
            is_student,
            created_at: Utc::now(),
        }
    }

    fn caller(user: User, instructor: Option<Instructor>) -> Caller {
        let role = user.role();
        Caller {
            user,
            role,
            instructor,
        }
    }

    fn course_owned_by(instructor_id: Option<i64>) -> Course {
        Course {
            id: 1,
            name: "Algorithms".to_string(),
            duration: 10,
            image: None,
            modules: None,
            instructor_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_passes_all_course_checks() {
        let admin = caller(user_with_flags(true, false, false), None);
        assert!(admin.require_admin().is_ok());
        assert!(admin.require_course_access(&course_owned_by(None)).is_ok());
        assert!(admin.require_student().is_err());
    }

    #[test]
    fn test_student_fails_admin_check() {
        let student = caller(user_with_flags(false, false, true), None);
        assert!(student.require_admin().is_err());
        assert_eq!(student.require_student().unwrap(), 7);
    }

    #[test]
    fn test_unverified_instructor_has_no_course_access() {
        // Requested state: flag set, no projection row.
        let requested = caller(user_with_flags(false, true, false), None);
        assert!(requested.require_verified_instructor().is_err());
        assert!(
            requested
                .require_course_access(&course_owned_by(Some(7)))
                .is_err()
        );

        // Projection exists but verification was never granted.
        let unverified = caller(
            user_with_flags(false, true, false),
            Some(Instructor {
                id: 7,
                username: "caller".to_string(),
                email: "caller@example.com".to_string(),
                verified: false,
            }),
        );
        assert!(
            unverified
                .require_course_access(&course_owned_by(Some(7)))
                .is_err()
        );
    }

    #[test]
    fn test_verified_instructor_limited_to_own_courses() {
        let verified = caller(
            user_with_flags(false, true, false),
            Some(Instructor {
                id: 7,
                username: "caller".to_string(),
                email: "caller@example.com".to_string(),
                verified: true,
            }),
        );
        assert!(
            verified
                .require_course_access(&course_owned_by(Some(7)))
                .is_ok()
        );
        assert!(
            verified
                .require_course_access(&course_owned_by(Some(8)))
                .is_err()
        );
        assert!(
            verified
                .require_course_access(&course_owned_by(None))
                .is_err()
        );
    }
}
