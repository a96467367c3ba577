use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::grades::model::Grade;
use crate::modules::users::model::Student;
use crate::utils::errors::AppError;

use super::model::{Course, CreateCourseDto, UpdateCourseDto};

const COURSE_COLUMNS: &str = "id, name, duration, image, modules, instructor_id, created_at";

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn get_courses(db: &PgPool) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY id"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch courses")
        .map_err(AppError::database)?;

        Ok(courses)
    }

    pub async fn get_course(db: &PgPool, id: i64) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch course by id")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course with id {} not found", id)))?;

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn get_courses_by_instructor(
        db: &PgPool,
        instructor_id: i64,
    ) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE instructor_id = $1 ORDER BY id"
        ))
        .bind(instructor_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch instructor courses")
        .map_err(AppError::database)?;

        Ok(courses)
    }

    /// Only a verified instructor may be assigned to a course.
    async fn ensure_assignable_instructor(db: &PgPool, instructor_id: i64) -> Result<(), AppError> {
        let verified: Option<bool> =
            sqlx::query_scalar("SELECT verified FROM instructors WHERE id = $1")
                .bind(instructor_id)
                .fetch_optional(db)
                .await
                .context("Failed to check instructor verification")
                .map_err(AppError::database)?;

        match verified {
            Some(true) => Ok(()),
            Some(false) => Err(AppError::bad_request(anyhow::anyhow!(
                "Instructor {} is not verified by an admin",
                instructor_id
            ))),
            None => Err(AppError::bad_request(anyhow::anyhow!(
                "Instructor {} does not exist",
                instructor_id
            ))),
        }
    }

    #[instrument(skip(db, dto))]
    pub async fn create_course(
        db: &PgPool,
        dto: CreateCourseDto,
        instructor_id: Option<i64>,
    ) -> Result<Course, AppError> {
        if let Some(instructor_id) = instructor_id {
            Self::ensure_assignable_instructor(db, instructor_id).await?;
        }

        let course = sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses (name, duration, image, modules, instructor_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(dto.duration)
        .bind(&dto.image)
        .bind(&dto.modules)
        .bind(instructor_id)
        .fetch_one(db)
        .await
        .context("Failed to create course")
        .map_err(AppError::database)?;

        Ok(course)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &PgPool,
        existing: Course,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        if let Some(instructor_id) = dto.instructor_id {
            Self::ensure_assignable_instructor(db, instructor_id).await?;
        }

        let name = dto.name.unwrap_or(existing.name);
        let duration = dto.duration.unwrap_or(existing.duration);
        let image = dto.image.or(existing.image);
        let modules = dto.modules.or(existing.modules);
        let instructor_id = dto.instructor_id.or(existing.instructor_id);

        let course = sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses
             SET name = $1, duration = $2, image = $3, modules = $4, instructor_id = $5
             WHERE id = $6
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(&name)
        .bind(duration)
        .bind(&image)
        .bind(&modules)
        .bind(instructor_id)
        .bind(existing.id)
        .fetch_one(db)
        .await
        .context("Failed to update course")
        .map_err(AppError::database)?;

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete course")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Course with id {} not found",
                id
            )));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn set_course_image(db: &PgPool, id: i64, url: &str) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses SET image = $1 WHERE id = $2 RETURNING {COURSE_COLUMNS}"
        ))
        .bind(url)
        .bind(id)
        .fetch_one(db)
        .await
        .context("Failed to store course image reference")
        .map_err(AppError::database)?;

        Ok(course)
    }

    /// Students enrolled in a course, via the enrollment ledger.
    #[instrument(skip(db))]
    pub async fn get_students_in_course(
        db: &PgPool,
        course_id: i64,
    ) -> Result<Vec<Student>, AppError> {
        let students = sqlx::query_as::<_, Student>(
            "SELECT s.id, s.username, s.email
             FROM students s
             JOIN enrollments e ON e.student_id = s.id
             WHERE e.course_id = $1
             ORDER BY s.username",
        )
        .bind(course_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch students in course")
        .map_err(AppError::database)?;

        Ok(students)
    }

    #[instrument(skip(db))]
    pub async fn get_grades_in_course(db: &PgPool, course_id: i64) -> Result<Vec<Grade>, AppError> {
        let grades = sqlx::query_as::<_, Grade>(
            "SELECT id, student_id, course_id, grade, comments, created_at
             FROM grades
             WHERE course_id = $1
             ORDER BY id",
        )
        .bind(course_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch grades in course")
        .map_err(AppError::database)?;

        Ok(grades)
    }
}
