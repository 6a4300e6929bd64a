//! Axum router: maps all URL paths to handlers.

use std::any::Any;

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use medassist_common::ApiError;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    chat::chat_submit,
    index::index_page,
    tips::health_tips_list,
};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/",            get(index_page))
        .route("/chat",        post(chat_submit))
        .route("/health-tips", get(health_tips_list))

        // Middleware
        .layer(CatchPanicLayer::custom(internal_error_response))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

/// A panicking handler becomes a 500 `{error, status:"error"}` reply.
fn internal_error_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic payload".to_string());
    ApiError::Internal(detail).into_response()
}
