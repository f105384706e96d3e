/**
 * Edge Routes
 *
 * Proxies for the flow manager's `/edges` resource.
 */

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::Method;
use serde_json::Value;

use crate::auth::{resolve_company_scope, AuthUser};
use crate::envelope::{normalize_list, Envelope};
use crate::error::ApiError;
use crate::proxy::{build_url, page_response, proxy_request};
use crate::server::state::AppState;

/// List edges for the caller's company
pub async fn list_edges(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(base, "/edges", &params, &[("company_id", &company)])?;
    let (status, body) =
        proxy_request(&state.http, Method::GET, url, None, "EDGES_FETCH_FAILED").await?;
    let page = normalize_list(body)?;
    Ok(page_response(status, page))
}

/// Create an edge
pub async fn create_edge(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(base, "/edges", &[], &[("company_id", &company)])?;
    let (status, data) =
        proxy_request(&state.http, Method::POST, url, Some(&body), "EDGE_CREATE_FAILED").await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}

/// Delete an edge
pub async fn delete_edge(
    State(state): State<AppState>,
    user: AuthUser,
    Path(edge_id): Path<String>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(
        base,
        &format!("/edges/{}", edge_id),
        &[],
        &[("company_id", &company)],
    )?;
    let (status, data) =
        proxy_request(&state.http, Method::DELETE, url, None, "EDGE_DELETE_FAILED").await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}
