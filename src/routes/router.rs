/**
 * Router Configuration
 *
 * Combines the API route table with request tracing and the fallback
 * handler into the final Axum router.
 */

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::Value;
use tower_http::trace::TraceLayer;

use crate::envelope::Envelope;
use crate::routes::api_routes::configure_api_routes;
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_api_routes(Router::new());

    // Unknown routes still answer in the envelope shape
    let router = router.fallback(|| async {
        (
            StatusCode::NOT_FOUND,
            Json(Envelope::<Value>::error("ROUTE_NOT_FOUND", None)),
        )
            .into_response()
    });

    router.layer(TraceLayer::new_for_http()).with_state(app_state)
}
