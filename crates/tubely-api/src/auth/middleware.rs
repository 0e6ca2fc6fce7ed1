use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tubely_core::AppError;

use super::jwt::JwtAuthenticator;
use super::models::AuthUser;
use crate::error::HttpAppError;

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the token out of an `Authorization: Bearer <token>` header value.
fn bearer_token(header: Option<&str>) -> Result<&str, AppError> {
    let header = header
        .ok_or_else(|| AppError::Unauthenticated("Missing authorization header".to_string()))?;
    header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::Unauthenticated("Invalid authorization header format".to_string())
        })
}

pub async fn auth_middleware(
    State(authenticator): State<Arc<JwtAuthenticator>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let user_id = match bearer_token(header).and_then(|token| authenticator.validate(token)) {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::debug!(error = %e, "Authentication failed");
            return HttpAppError(e).into_response();
        }
    };

    request.extensions_mut().insert(AuthUser { user_id });
    next.run(request).await
}
