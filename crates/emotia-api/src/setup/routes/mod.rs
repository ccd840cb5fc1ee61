//! Route configuration and setup.
//!
//! Health checks live in [health](health).

mod health;

use crate::handlers::{channels, emotes};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Room for the non-file parts and multipart framing on top of the file cap.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the application router over `state`.
pub fn setup_routes(state: Arc<AppState>) -> Router<()> {
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);

    let body_limit = state.upload.validator.max_file_size() + MULTIPART_OVERHEAD_BYTES;

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check));

    let protected_routes = Router::new()
        .route("/v2/emotes", post(emotes::create_emote))
        .route("/v2/emotes/{id}", delete(emotes::delete_emote))
        .route(
            "/v2/channels/{channel_id}/emotes/{emote_id}",
            put(channels::add_channel_emote).delete(channels::remove_channel_emote),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.auth.clone(),
            crate::auth::auth_middleware,
        ));

    public_routes
        .merge(protected_routes)
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
