use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::courses::model::Course;
use crate::modules::courses::service::CourseService;
use crate::modules::grades::model::GradeWithCourse;
use crate::utils::errors::AppError;

pub struct StudentService;

impl StudentService {
    /// Enroll a student in a course. The insert relies on the composite
    /// primary key, so a concurrent duplicate attempt cannot slip past:
    /// zero rows affected means the pair already existed.
    #[instrument(skip(db))]
    pub async fn enroll(db: &PgPool, student_id: i64, course_id: i64) -> Result<Course, AppError> {
        let course = CourseService::get_course(db, course_id).await?;

        let result = sqlx::query(
            "INSERT INTO enrollments (student_id, course_id)
             VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(student_id)
        .bind(course_id)
        .execute(db)
        .await
        .context("Failed to enroll student")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(
                "Already enrolled in this course".to_string(),
            ));
        }

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn get_enrolled_courses(
        db: &PgPool,
        student_id: i64,
    ) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT c.id, c.name, c.duration, c.image, c.modules, c.instructor_id, c.created_at
             FROM courses c
             JOIN enrollments e ON e.course_id = c.id
             WHERE e.student_id = $1
             ORDER BY c.id",
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch enrolled courses")
        .map_err(AppError::database)?;

        Ok(courses)
    }

    #[instrument(skip(db))]
    pub async fn get_own_grades(
        db: &PgPool,
        student_id: i64,
    ) -> Result<Vec<GradeWithCourse>, AppError> {
        let grades = sqlx::query_as::<_, GradeWithCourse>(
            "SELECT g.id, g.course_id, g.grade, g.comments, c.name AS course_name
             FROM grades g
             JOIN courses c ON c.id = g.course_id
             WHERE g.student_id = $1
             ORDER BY g.id",
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch student grades")
        .map_err(AppError::database)?;

        Ok(grades)
    }
}
