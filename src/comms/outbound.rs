/**
 * Removed Meta/Outbound Endpoint
 *
 * The legacy outbound-send endpoint has been decommissioned. Callers get a
 * fixed 410 with a reason pointing at the replacement API.
 */

use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Fixed 410 for the decommissioned endpoint
pub async fn outbound_removed() -> Response {
    ApiError::Gone {
        reason: "The meta/outbound endpoint was removed; send messages via POST /api/messages"
            .to_string(),
    }
    .into_response()
}
