use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, rejection::PathRejection, Multipart, Path, State},
    Json,
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use tubely_core::models::VideoResponse;
use tubely_core::AppError;
use tubely_processing::IncomingUpload;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::constants::THUMBNAIL_FIELD;
use crate::error::{multipart_error, HttpAppError};
use crate::state::AppState;

/// `POST /api/v0/videos/{video_id}/thumbnail`
#[tracing::instrument(
    skip(state, path, multipart),
    fields(user_id = %user.user_id, video_id = tracing::field::Empty, operation = "upload_thumbnail")
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let Path(video_id) = path?;
    tracing::Span::current().record("video_id", tracing::field::display(video_id));
    let mut multipart = multipart?;
    let limit = state.config.max_thumbnail_size_bytes();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let reader = StreamReader::new(Box::pin(field.map_err(std::io::Error::other)));
        let upload = IncomingUpload::new(content_type, None, reader);

        let video = state
            .thumbnails
            .publish(video_id, user.user_id, upload)
            .await?;
        return Ok(Json(video.into()));
    }

    Err(AppError::BadRequest(format!("Missing multipart field '{}'", THUMBNAIL_FIELD)).into())
}
