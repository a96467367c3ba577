use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::middleware::auth::Caller;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{CreateGradeDto, Grade, UpdateGradeDto};
use super::service::GradeService;

/// List all grades (admin only)
#[utoipa::path(
    get,
    path = "/api/grades",
    responses(
        (status = 200, description = "All grade entries", body = Vec<Grade>),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state, caller))]
pub async fn get_grades(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<Grade>>, AppError> {
    caller.require_admin()?;
    let grades = GradeService::get_grades(&state.db).await?;
    Ok(Json(grades))
}

/// Get a grade entry by id (admin or verified instructor owning the course)
#[utoipa::path(
    get,
    path = "/api/grades/{id}",
    params(("id" = i64, Path, description = "Grade id")),
    responses(
        (status = 200, description = "Grade entry", body = Grade),
        (status = 403, description = "Not the course owner", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state, caller))]
pub async fn get_grade(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<Grade>, AppError> {
    let grade = GradeService::get_grade(&state.db, id).await?;
    let course = CourseService::get_course(&state.db, grade.course_id).await?;
    caller.require_course_access(&course)?;

    Ok(Json(grade))
}

/// Record a grade (admin or verified instructor owning the course)
#[utoipa::path(
    post,
    path = "/api/grades",
    request_body = CreateGradeDto,
    responses(
        (status = 201, description = "Grade recorded", body = Grade),
        (status = 403, description = "Not the course owner", body = ErrorResponse),
        (status = 404, description = "Student or course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state, caller, dto))]
pub async fn create_grade(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(dto): ValidatedJson<CreateGradeDto>,
) -> Result<(StatusCode, Json<Grade>), AppError> {
    let course = CourseService::get_course(&state.db, dto.course_id).await?;
    caller.require_course_access(&course)?;

    let grade = GradeService::create_grade(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(grade)))
}

/// Update a grade entry (admin or verified instructor owning the course)
#[utoipa::path(
    put,
    path = "/api/grades/{id}",
    params(("id" = i64, Path, description = "Grade id")),
    request_body = UpdateGradeDto,
    responses(
        (status = 200, description = "Updated grade", body = Grade),
        (status = 403, description = "Not the course owner", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state, caller, dto))]
pub async fn update_grade(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateGradeDto>,
) -> Result<Json<Grade>, AppError> {
    let existing = GradeService::get_grade(&state.db, id).await?;
    let course = CourseService::get_course(&state.db, existing.course_id).await?;
    caller.require_course_access(&course)?;

    let grade = GradeService::update_grade(&state.db, existing, dto).await?;
    Ok(Json(grade))
}

/// Delete a grade entry (admin or verified instructor owning the course)
#[utoipa::path(
    delete,
    path = "/api/grades/{id}",
    params(("id" = i64, Path, description = "Grade id")),
    responses(
        (status = 200, description = "Grade deleted", body = MessageResponse),
        (status = 403, description = "Not the course owner", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state, caller))]
pub async fn delete_grade(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let existing = GradeService::get_grade(&state.db, id).await?;
    let course = CourseService::get_course(&state.db, existing.course_id).await?;
    caller.require_course_access(&course)?;

    GradeService::delete_grade(&state.db, id).await?;
    Ok(Json(MessageResponse {
        message: "Grade deleted successfully".to_string(),
    }))
}
