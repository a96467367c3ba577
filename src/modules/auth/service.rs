use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{RoleFlags, User};
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::{hash_password, verify_password};

use super::model::{AuthUserInfo, LoginRequest, LoginResponse, SignupOutcome, SignupRequestDto};

pub struct AuthService;

impl AuthService {
    /// Self-registration.
    ///
    /// The very first account in the directory is forced to admin; every
    /// later self-registration defaults to student unless it explicitly
    /// requests the instructor role, which creates a pending state (no
    /// projection row, no token) until an admin approves it. Requesting
    /// admin on a non-first account is rejected outright.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn signup(
        db: &PgPool,
        dto: SignupRequestDto,
        jwt_config: &JwtConfig,
    ) -> Result<SignupOutcome, AppError> {
        let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await
            .context("Failed to count users")
            .map_err(AppError::database)?;
        let first_user = user_count == 0;

        let flags = if first_user {
            RoleFlags {
                is_admin: true,
                is_instructor: false,
                is_student: false,
            }
        } else {
            if dto.is_admin {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Only an existing admin can create admin accounts"
                )));
            }
            RoleFlags {
                is_admin: false,
                is_instructor: dto.is_instructor,
                is_student: dto.is_student,
            }
            .normalized()
        };
        flags.validate()?;

        let hashed_password = hash_password(&dto.password)?;

        let mut tx = db.begin().await.map_err(AppError::database)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password, is_admin, is_instructor, is_student)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, username, email, password, is_admin, is_instructor, is_student, created_at",
        )
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(flags.is_admin)
        .bind(flags.is_instructor)
        .bind(flags.is_student)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    let message = match db_err.constraint() {
                        Some(c) if c.contains("email") => "Email already exists",
                        _ => "Username already exists",
                    };
                    return AppError::bad_request(anyhow::anyhow!(message));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        UserService::rebuild_projections(&mut tx, &user).await?;

        tx.commit().await.map_err(AppError::database)?;

        if user.is_instructor {
            return Ok(SignupOutcome::PendingInstructor);
        }

        let token = create_access_token(user.id, &user.username, jwt_config)?;
        Ok(SignupOutcome::Active(LoginResponse {
            token,
            user: AuthUserInfo {
                id: user.id,
                role: user.role(),
                username: user.username,
            },
        }))
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let user = UserService::find_user_by_username(db, &dto.username)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(&dto.password, &user.password)? {
            return Err(AppError::unauthorized("Invalid credentials".to_string()));
        }

        let token = create_access_token(user.id, &user.username, jwt_config)?;
        Ok(LoginResponse {
            token,
            user: AuthUserInfo {
                id: user.id,
                role: user.role(),
                username: user.username,
            },
        })
    }
}
