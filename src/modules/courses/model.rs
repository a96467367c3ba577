use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A course. `instructor_id` is nullable: a course may be unassigned, and
/// only a verified instructor may ever be assigned.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub duration: i32,
    pub image: Option<String>,
    /// Structured list of content descriptors, stored as JSON.
    #[schema(value_type = Option<Object>)]
    pub modules: Option<serde_json::Value>,
    pub instructor_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(range(min = 1, message = "duration must be a positive number of weeks"))]
    pub duration: i32,
    pub image: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub modules: Option<serde_json::Value>,
    /// Only honored for admin callers; instructors always own the courses
    /// they create.
    pub instructor_id: Option<i64>,
}

/// Partial course update. Fields left out are unchanged; `instructor_id`
/// may only be reassigned by an admin, and only to a verified instructor.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "duration must be a positive number of weeks"))]
    pub duration: Option<i32>,
    pub image: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub modules: Option<serde_json::Value>,
    pub instructor_id: Option<i64>,
}
