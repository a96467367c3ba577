use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use crate::modules::users::model::{
    CreateUserDto, Instructor, RoleFlags, User, UserView, UpdateUserDto,
};
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

const USER_COLUMNS: &str =
    "id, username, email, password, is_admin, is_instructor, is_student, created_at";

pub struct UserService;

impl UserService {
    /// Load a user by id. Used by the authorization guard on every request,
    /// so a deleted account invalidates an otherwise-valid token.
    pub async fn find_user(db: &PgPool, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by id")
        .map_err(AppError::database)?;

        Ok(user)
    }

    pub async fn get_user(db: &PgPool, id: i64) -> Result<User, AppError> {
        Self::find_user(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User with id {} not found", id)))
    }

    pub async fn find_user_by_username(
        db: &PgPool,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by username")
        .map_err(AppError::database)?;

        Ok(user)
    }

    pub async fn find_instructor(db: &PgPool, id: i64) -> Result<Option<Instructor>, AppError> {
        let instructor = sqlx::query_as::<_, Instructor>(
            "SELECT id, username, email, verified FROM instructors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch instructor projection")
        .map_err(AppError::database)?;

        Ok(instructor)
    }

    /// List all users with their effective role and instructor verification
    /// status.
    #[instrument(skip(db))]
    pub async fn get_users(db: &PgPool) -> Result<Vec<UserView>, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithVerification {
            id: i64,
            username: String,
            email: String,
            is_admin: bool,
            is_instructor: bool,
            is_student: bool,
            verified: Option<bool>,
        }

        let rows = sqlx::query_as::<_, UserWithVerification>(
            "SELECT u.id, u.username, u.email, u.is_admin, u.is_instructor, u.is_student,
                    i.verified
             FROM users u
             LEFT JOIN instructors i ON i.id = u.id
             ORDER BY u.id",
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch users")
        .map_err(AppError::database)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let flags = RoleFlags {
                    is_admin: row.is_admin,
                    is_instructor: row.is_instructor,
                    is_student: row.is_student,
                };
                UserView {
                    id: row.id,
                    username: row.username,
                    email: row.email,
                    role: flags.role(),
                    is_instructor_verified: row.verified.unwrap_or(false),
                }
            })
            .collect())
    }

    #[instrument(skip(db, dto))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let flags = RoleFlags {
            is_admin: dto.is_admin,
            is_instructor: dto.is_instructor,
            is_student: dto.is_student,
        }
        .normalized();
        flags.validate()?;

        let hashed_password = hash_password(&dto.password)?;

        let mut tx = db.begin().await.map_err(AppError::database)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password, is_admin, is_instructor, is_student)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(flags.is_admin)
        .bind(flags.is_instructor)
        .bind(flags.is_student)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_user_unique_violation)?;

        Self::rebuild_projections(&mut tx, &user).await?;

        tx.commit().await.map_err(AppError::database)?;

        Ok(user)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_user(db: &PgPool, id: i64, dto: UpdateUserDto) -> Result<User, AppError> {
        let existing = Self::get_user(db, id).await?;

        // Role flag updates normalize mutual exclusion: setting one side of
        // the instructor/student pair clears the other.
        let mut flags = existing.flags();
        if let Some(is_instructor) = dto.is_instructor {
            flags.is_instructor = is_instructor;
            if is_instructor {
                flags.is_student = false;
            }
        }
        if let Some(is_student) = dto.is_student {
            flags.is_student = is_student;
            if is_student {
                flags.is_instructor = false;
            }
        }
        if let Some(is_admin) = dto.is_admin {
            flags.is_admin = is_admin;
        }
        flags.validate()?;

        let username = dto.username.unwrap_or(existing.username);
        let email = dto.email.unwrap_or(existing.email);
        let password = match dto.password {
            Some(password) => hash_password(&password)?,
            None => existing.password,
        };

        let mut tx = db.begin().await.map_err(AppError::database)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET username = $1, email = $2, password = $3,
                 is_admin = $4, is_instructor = $5, is_student = $6
             WHERE id = $7
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&username)
        .bind(&email)
        .bind(&password)
        .bind(flags.is_admin)
        .bind(flags.is_instructor)
        .bind(flags.is_student)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_user_unique_violation)?;

        Self::rebuild_projections(&mut tx, &user).await?;

        tx.commit().await.map_err(AppError::database)?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete user")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "User with id {} not found",
                id
            )));
        }

        Ok(())
    }

    /// Approve a pending instructor: create-or-update the projection with
    /// `verified = true`. Re-approving an already-verified instructor is a
    /// no-op success.
    #[instrument(skip(db))]
    pub async fn approve_instructor(db: &PgPool, user_id: i64) -> Result<Instructor, AppError> {
        let target = Self::get_user(db, user_id).await?;

        if !target.is_instructor {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "User is not requested as an instructor"
            )));
        }

        let instructor = sqlx::query_as::<_, Instructor>(
            "INSERT INTO instructors (id, username, email, verified)
             VALUES ($1, $2, $3, TRUE)
             ON CONFLICT (id) DO UPDATE
             SET username = EXCLUDED.username, email = EXCLUDED.email, verified = TRUE
             RETURNING id, username, email, verified",
        )
        .bind(target.id)
        .bind(&target.username)
        .bind(&target.email)
        .fetch_one(db)
        .await
        .context("Failed to approve instructor")
        .map_err(AppError::database)?;

        Ok(instructor)
    }

    /// Rebuild the student/instructor projection rows to match the user's
    /// current flags. A student gets an upserted projection; an instructor
    /// keeps any approved projection in sync but never gains one here --
    /// only admin approval creates it. Flags cleared on either side drop
    /// the corresponding row.
    pub(crate) async fn rebuild_projections(
        tx: &mut Transaction<'_, Postgres>,
        user: &User,
    ) -> Result<(), AppError> {
        if user.is_student {
            sqlx::query(
                "INSERT INTO students (id, username, email)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (id) DO UPDATE
                 SET username = EXCLUDED.username, email = EXCLUDED.email",
            )
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .execute(&mut **tx)
            .await
            .context("Failed to upsert student projection")
            .map_err(AppError::database)?;
        } else {
            sqlx::query("DELETE FROM students WHERE id = $1")
                .bind(user.id)
                .execute(&mut **tx)
                .await
                .context("Failed to drop student projection")
                .map_err(AppError::database)?;
        }

        if user.is_instructor {
            sqlx::query("UPDATE instructors SET username = $1, email = $2 WHERE id = $3")
                .bind(&user.username)
                .bind(&user.email)
                .bind(user.id)
                .execute(&mut **tx)
                .await
                .context("Failed to sync instructor projection")
                .map_err(AppError::database)?;
        } else {
            sqlx::query("DELETE FROM instructors WHERE id = $1")
                .bind(user.id)
                .execute(&mut **tx)
                .await
                .context("Failed to drop instructor projection")
                .map_err(AppError::database)?;
        }

        Ok(())
    }
}

fn map_user_unique_violation(e: sqlx::Error) -> AppError {
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
}
