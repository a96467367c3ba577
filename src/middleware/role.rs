//! Role middleware for router-level gating.
//!
//! Whole route trees with a uniform role requirement (the admin user
//! management nest, the student self-service nest) are gated here with
//! `axum::middleware::from_fn_with_state`. Mixed-role routes do their own
//! checks through [`Caller`] capabilities inside the handler.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::Caller;
use crate::modules::users::model::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;

async fn require_roles(
    state: AppState,
    req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let caller = Caller::from_request_parts(&mut parts, &state).await?;

    if !allowed_roles.contains(&caller.role) {
        return Err(AppError::forbidden(match allowed_roles {
            [Role::Admin] => "Unauthorized: Admin access required".to_string(),
            [Role::Student] => "Unauthorized: Student access required".to_string(),
            _ => "Access denied".to_string(),
        }));
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(state, req, next, &[Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub async fn require_student(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(state, req, next, &[Role::Student]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
