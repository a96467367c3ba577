use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::middleware::auth::Caller;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::grades::model::Grade;
use crate::modules::users::model::Student;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::storage::FileStore;
use crate::validator::ValidatedJson;

use super::model::{Course, CreateCourseDto, UpdateCourseDto};
use super::service::CourseService;

/// List all courses (any authenticated caller)
#[utoipa::path(
    get,
    path = "/api/courses",
    responses(
        (status = 200, description = "List of courses", body = Vec<Course>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, _caller))]
pub async fn get_courses(
    State(state): State<AppState>,
    _caller: Caller,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = CourseService::get_courses(&state.db).await?;
    Ok(Json(courses))
}

/// Get a course by id (any authenticated caller)
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course", body = Course),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, _caller))]
pub async fn get_course(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    Ok(Json(course))
}

/// Courses taught by the calling instructor (verified instructors only)
#[utoipa::path(
    get,
    path = "/api/courses/mine",
    responses(
        (status = 200, description = "Courses owned by the caller", body = Vec<Course>),
        (status = 403, description = "Not a verified instructor", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, caller))]
pub async fn get_my_courses(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<Course>>, AppError> {
    let instructor = caller.require_verified_instructor()?;
    let courses = CourseService::get_courses_by_instructor(&state.db, instructor.id).await?;
    Ok(Json(courses))
}

/// Create a course (admin, or verified instructor who then owns it)
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Validation error or unverified instructor assignment", body = ErrorResponse),
        (status = 403, description = "Admin or verified instructor access required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, caller, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    // Admins may create unassigned courses or assign a verified instructor;
    // instructors always own what they create.
    let instructor_id = if caller.is_admin() {
        dto.instructor_id
    } else {
        Some(caller.require_verified_instructor()?.id)
    };

    let course = CourseService::create_course(&state.db, dto, instructor_id).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// Update a course (admin or owning verified instructor)
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = i64, Path, description = "Course id")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Updated course", body = Course),
        (status = 400, description = "Validation error or unverified instructor assignment", body = ErrorResponse),
        (status = 403, description = "Not the course owner", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, caller, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let existing = CourseService::get_course(&state.db, id).await?;
    caller.require_course_access(&existing)?;

    // Reassignment is an admin action; owners manage content, not ownership.
    if dto.instructor_id.is_some() && !caller.is_admin() {
        return Err(AppError::forbidden(
            "Unauthorized: Admin access required".to_string(),
        ));
    }

    let course = CourseService::update_course(&state.db, existing, dto).await?;
    Ok(Json(course))
}

/// Delete a course (admin or owning verified instructor)
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 403, description = "Not the course owner", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, caller))]
pub async fn delete_course(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    caller.require_course_access(&course)?;

    CourseService::delete_course(&state.db, id).await?;
    Ok(Json(MessageResponse {
        message: "Course deleted successfully".to_string(),
    }))
}

/// Upload a course image (admin or owning verified instructor)
#[utoipa::path(
    post,
    path = "/api/courses/{id}/image",
    params(("id" = i64, Path, description = "Course id")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Course with stored image URL", body = Course),
        (status = 400, description = "Missing file field", body = ErrorResponse),
        (status = 403, description = "Not the course owner", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, caller, multipart))]
pub async fn upload_course_image(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    caller.require_course_access(&course)?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid multipart body: {}", e)))?
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Missing image file field")))?;

    let extension = field
        .file_name()
        .and_then(|name| name.rsplit('.').next())
        .unwrap_or("png")
        .to_ascii_lowercase();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Failed to read upload: {}", e)))?;

    let key = format!("courses/{}-{}.{}", id, uuid::Uuid::new_v4(), extension);
    let url = state
        .file_store
        .save(&key, &bytes)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to store image: {}", e)))?;

    let course = CourseService::set_course_image(&state.db, id, &url).await?;
    Ok(Json(course))
}

/// Students enrolled in a course (admin or owning verified instructor)
#[utoipa::path(
    get,
    path = "/api/courses/{id}/students",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Enrolled students", body = Vec<Student>),
        (status = 403, description = "Not the course owner", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, caller))]
pub async fn get_students_in_course(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Student>>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    caller.require_course_access(&course)?;

    let students = CourseService::get_students_in_course(&state.db, id).await?;
    Ok(Json(students))
}

/// Grades recorded in a course (admin or owning verified instructor)
#[utoipa::path(
    get,
    path = "/api/courses/{id}/grades",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Grades in the course", body = Vec<Grade>),
        (status = 403, description = "Not the course owner", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, caller))]
pub async fn get_grades_in_course(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Grade>>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    caller.require_course_access(&course)?;

    let grades = CourseService::get_grades_in_course(&state.db, id).await?;
    Ok(Json(grades))
}
