use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::middleware::auth::Caller;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::courses::model::Course;
use crate::modules::grades::model::GradeWithCourse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::EnrollRequestDto;
use super::service::StudentService;

/// Enroll the calling student in a course
#[utoipa::path(
    post,
    path = "/api/students/enroll",
    request_body = EnrollRequestDto,
    responses(
        (status = 200, description = "Enrolled successfully", body = MessageResponse),
        (status = 403, description = "Student access required", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Already enrolled", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, caller, dto))]
pub async fn enroll(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(dto): ValidatedJson<EnrollRequestDto>,
) -> Result<Json<MessageResponse>, AppError> {
    let student_id = caller.require_student()?;
    let course = StudentService::enroll(&state.db, student_id, dto.course_id).await?;
    Ok(Json(MessageResponse {
        message: format!("Enrolled in {} successfully", course.name),
    }))
}

/// Courses the calling student is enrolled in
#[utoipa::path(
    get,
    path = "/api/students/my-courses",
    responses(
        (status = 200, description = "Enrolled courses", body = Vec<Course>),
        (status = 403, description = "Student access required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, caller))]
pub async fn get_my_courses(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<Course>>, AppError> {
    let student_id = caller.require_student()?;
    let courses = StudentService::get_enrolled_courses(&state.db, student_id).await?;
    Ok(Json(courses))
}

/// The calling student's own grades
#[utoipa::path(
    get,
    path = "/api/students/my-grades",
    responses(
        (status = 200, description = "Own grades with course names", body = Vec<GradeWithCourse>),
        (status = 403, description = "Student access required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, caller))]
pub async fn get_my_grades(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<GradeWithCourse>>, AppError> {
    let student_id = caller.require_student()?;
    let grades = StudentService::get_own_grades(&state.db, student_id).await?;
    Ok(Json(grades))
}
