use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct EnrollRequestDto {
    pub course_id: i64,
}
