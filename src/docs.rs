use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    AuthUserInfo, LoginRequest, LoginResponse, MessageResponse, SignupRequestDto,
};
use crate::modules::courses::model::{Course, CreateCourseDto, UpdateCourseDto};
use crate::modules::grades::model::{CreateGradeDto, Grade, GradeWithCourse, UpdateGradeDto};
use crate::modules::students::model::EnrollRequestDto;
use crate::modules::users::model::{
    CreateUserDto, Instructor, Role, Student, UpdateUserDto, User, UserView,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::signup,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::logout,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::approve_instructor,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::get_my_courses,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::courses::controller::upload_course_image,
        crate::modules::courses::controller::get_students_in_course,
        crate::modules::courses::controller::get_grades_in_course,
        crate::modules::grades::controller::get_grades,
        crate::modules::grades::controller::get_grade,
        crate::modules::grades::controller::create_grade,
        crate::modules::grades::controller::update_grade,
        crate::modules::grades::controller::delete_grade,
        crate::modules::students::controller::enroll,
        crate::modules::students::controller::get_my_courses,
        crate::modules::students::controller::get_my_grades,
    ),
    components(
        schemas(
            User,
            UserView,
            Role,
            Instructor,
            Student,
            CreateUserDto,
            UpdateUserDto,
            SignupRequestDto,
            LoginRequest,
            LoginResponse,
            AuthUserInfo,
            MessageResponse,
            ErrorResponse,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            Grade,
            GradeWithCourse,
            CreateGradeDto,
            UpdateGradeDto,
            EnrollRequestDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup, login, and logout"),
        (name = "Users", description = "Admin user management and instructor approval"),
        (name = "Courses", description = "Course catalog and instructor course management"),
        (name = "Grades", description = "Grade ledger management"),
        (name = "Students", description = "Student self-service: enrollment, courses, grades")
    ),
    info(
        title = "Rollbook API",
        version = "0.1.0",
        description = "Role-based academic records API built with Rust, Axum, and PostgreSQL.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
