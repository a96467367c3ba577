use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;

use crate::utils::errors::AppError;

use super::model::{CreateGradeDto, Grade, UpdateGradeDto};

const GRADE_COLUMNS: &str = "id, student_id, course_id, grade, comments, created_at";

pub struct GradeService;

impl GradeService {
    #[instrument(skip(db))]
    pub async fn get_grades(db: &PgPool) -> Result<Vec<Grade>, AppError> {
        let grades = sqlx::query_as::<_, Grade>(&format!(
            "SELECT {GRADE_COLUMNS} FROM grades ORDER BY id"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch grades")
        .map_err(AppError::database)?;

        Ok(grades)
    }

    pub async fn get_grade(db: &PgPool, id: i64) -> Result<Grade, AppError> {
        let grade = sqlx::query_as::<_, Grade>(&format!(
            "SELECT {GRADE_COLUMNS} FROM grades WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch grade by id")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Grade with id {} not found", id)))?;

        Ok(grade)
    }

    /// Append a grade entry. The referenced student and course must exist;
    /// an existing entry for the same pair is not an error (append model).
    #[instrument(skip(db, dto))]
    pub async fn create_grade(db: &PgPool, dto: CreateGradeDto) -> Result<Grade, AppError> {
        let student_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM students WHERE id = $1)")
                .bind(dto.student_id)
                .fetch_one(db)
                .await
                .context("Failed to check student existence")
                .map_err(AppError::database)?;
        if !student_exists {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Student with id {} not found",
                dto.student_id
            )));
        }

        let grade = sqlx::query_as::<_, Grade>(&format!(
            "INSERT INTO grades (student_id, course_id, grade, comments)
             VALUES ($1, $2, $3, $4)
             RETURNING {GRADE_COLUMNS}"
        ))
        .bind(dto.student_id)
        .bind(dto.course_id)
        .bind(&dto.grade)
        .bind(&dto.comments)
        .fetch_one(db)
        .await
        .context("Failed to create grade")
        .map_err(AppError::database)?;

        Ok(grade)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_grade(
        db: &PgPool,
        existing: Grade,
        dto: UpdateGradeDto,
    ) -> Result<Grade, AppError> {
        let value = dto.grade.unwrap_or(existing.grade);
        let comments = dto.comments.or(existing.comments);

        let grade = sqlx::query_as::<_, Grade>(&format!(
            "UPDATE grades SET grade = $1, comments = $2 WHERE id = $3 RETURNING {GRADE_COLUMNS}"
        ))
        .bind(&value)
        .bind(&comments)
        .bind(existing.id)
        .fetch_one(db)
        .await
        .context("Failed to update grade")
        .map_err(AppError::database)?;

        Ok(grade)
    }

    #[instrument(skip(db))]
    pub async fn delete_grade(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM grades WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete grade")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Grade with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
