//! Conversation API router.

use axum::routing::{any, get};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the conversation router.
///
/// `/conversation` accepts any method: GET and POST are meaningful, the rest
/// answer an empty history. Every response carries a permissive
/// `Access-Control-Allow-Origin: *` header for browser clients.
pub fn conversation_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/conversation", any(endpoints::conversation::dispatch))
        .route("/health", get(endpoints::health::check))
        .with_state(ctx)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
