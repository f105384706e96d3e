/**
 * Conversation Routes
 *
 * The communications service calls conversations "sessions"; the BFF exposes
 * them as `/api/conversations` and normalizes the upstream list shape.
 */

use axum::extract::{Query, State};
use axum::response::Response;
use reqwest::Method;

use crate::auth::{resolve_company_scope, AuthUser};
use crate::envelope::normalize_list;
use crate::error::ApiError;
use crate::proxy::{build_url, page_response, proxy_request};
use crate::server::state::AppState;

/// List conversations for the caller's company
///
/// Pagination counts from the upstream (`total`, `limit`, `offset`) surface
/// in the envelope `meta`; a bare-array upstream response has no meta.
pub async fn list_conversations(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.comms()?;
    let url = build_url(base, "/sessions", &params, &[("company_id", &company)])?;
    let (status, body) = proxy_request(
        &state.http,
        Method::GET,
        url,
        None,
        "CONVERSATIONS_FETCH_FAILED",
    )
    .await?;
    let page = normalize_list(body)?;
    Ok(page_response(status, page))
}
