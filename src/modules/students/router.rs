use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{enroll, get_my_courses, get_my_grades};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/enroll", post(enroll))
        .route("/my-courses", get(get_my_courses))
        .route("/my-grades", get(get_my_grades))
}
