pub mod auth;
pub mod courses;
pub mod grades;
pub mod students;
pub mod users;
