use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_course, delete_course, get_course, get_courses, get_grades_in_course, get_my_courses,
    get_students_in_course, update_course, upload_course_image,
};

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_courses).post(create_course))
        .route("/mine", get(get_my_courses))
        .route(
            "/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/{id}/image", post(upload_course_image))
        .route("/{id}/students", get(get_students_in_course))
        .route("/{id}/grades", get(get_grades_in_course))
}
