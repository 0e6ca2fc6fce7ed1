use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tubely_core::models::VideoResponse;
use tubely_core::{AppError, Video};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// `POST /api/v0/videos`: create an empty record owned by the caller.
#[tracing::instrument(skip(state, body), fields(user_id = %user.user_id, operation = "create_video"))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(body): Json<CreateVideoRequest>,
) -> Result<(StatusCode, Json<VideoResponse>), HttpAppError> {
    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title must not be empty".to_string()).into());
    }

    let mut video = Video::new(user.user_id, title);
    video.description = body.description;
    let video = state.repository.create_video(video).await?;

    Ok((StatusCode::CREATED, Json(video.into())))
}

/// `GET /api/v0/videos/{video_id}`: only the owner may read the record.
#[tracing::instrument(
    skip(state, path),
    fields(user_id = %user.user_id, video_id = tracing::field::Empty, operation = "get_video")
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let Path(id) = path?;
    tracing::Span::current().record("video_id", tracing::field::display(id));

    let video = state
        .repository
        .get_video(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

    if !video.is_owned_by(user.user_id) {
        return Err(AppError::Unauthorized("You are not the owner of this video".to_string()).into());
    }

    Ok(Json(video.into()))
}
