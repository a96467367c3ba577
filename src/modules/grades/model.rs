use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A grade entry. The ledger is append-only: several entries may exist for
/// the same (student, course) pair, each a distinct grading event.
/// `created_at` is set once and never updated.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub grade: String,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateGradeDto {
    pub student_id: i64,
    pub course_id: i64,
    #[validate(length(min = 1, message = "grade must not be empty"))]
    pub grade: String,
    pub comments: Option<String>,
}

/// Only the grade value and comments are mutable; the (student, course)
/// pair and timestamp are fixed at creation.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateGradeDto {
    #[validate(length(min = 1, message = "grade must not be empty"))]
    pub grade: Option<String>,
    pub comments: Option<String>,
}

/// A grade joined with its course name, for student-facing views.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct GradeWithCourse {
    pub id: i64,
    pub course_id: i64,
    pub grade: String,
    pub comments: Option<String>,
    pub course_name: String,
}
