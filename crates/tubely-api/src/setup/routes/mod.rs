//! Route configuration and setup

mod health;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tubely_core::Config;

use crate::auth::middleware::auth_middleware;
use crate::constants::{API_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::handlers::{thumbnail_upload, video_get, video_upload};
use crate::state::AppState;

/// Transport-level body bound: the largest accepted upload plus multipart framing.
pub fn body_limit(config: &Config) -> usize {
    let limit = config
        .max_video_size_bytes()
        .max(config.max_thumbnail_size_bytes())
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    usize::try_from(limit).unwrap_or(usize::MAX)
}

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .route(
            &format!("{}/videos", API_PREFIX),
            post(video_get::create_video),
        )
        .route(
            &format!("{}/videos/{{video_id}}", API_PREFIX),
            get(video_get::get_video),
        )
        .route(
            &format!("{}/videos/{{video_id}}/video", API_PREFIX),
            post(video_upload::upload_video),
        )
        .route(
            &format!("{}/videos/{{video_id}}/thumbnail", API_PREFIX),
            post(thumbnail_upload::upload_thumbnail),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.authenticator.clone(),
            auth_middleware,
        ));

    let public_routes = Router::new().route("/health", get(health::health_check));

    public_routes
        .merge(protected_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(body_limit(config))),
        )
}
