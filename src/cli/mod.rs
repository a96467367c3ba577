//! CLI bootstrap command.
//!
//! `create-admin` seeds an administrator account directly in the database,
//! useful when the directory already has accounts and the first-user-is-admin
//! signup rule no longer applies.

use sqlx::PgPool;

use crate::utils::password::hash_password;

pub async fn create_admin(
    db: &PgPool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let result = sqlx::query(
        "INSERT INTO users (username, email, password, is_admin, is_instructor, is_student)
         VALUES ($1, $2, $3, TRUE, FALSE, FALSE)
         ON CONFLICT (username) DO NOTHING",
    )
    .bind(username)
    .bind(email)
    .bind(hashed_password)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this username already exists".into());
    }

    Ok(())
}
