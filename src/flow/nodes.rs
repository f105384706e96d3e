/**
 * Node Routes
 *
 * Proxies for the flow manager's `/nodes` and `/properties` resources.
 *
 * Deleting a node property runs the ownership-check sub-protocol: the node
 * list is re-fetched scoped to the caller's company and scanned for the
 * target node before the delete is forwarded. The flow manager does not
 * enforce tenant scoping on nested resources, so a miss answers 404 without
 * the delete ever reaching the upstream.
 */

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::Method;
use serde_json::Value;

use crate::auth::{resolve_company_scope, AuthUser};
use crate::envelope::{normalize_list, Envelope};
use crate::error::ApiError;
use crate::flow::matches_id;
use crate::proxy::{build_url, page_response, proxy_request};
use crate::server::state::AppState;

/// List nodes for the caller's company
pub async fn list_nodes(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(base, "/nodes", &params, &[("company_id", &company)])?;
    let (status, body) =
        proxy_request(&state.http, Method::GET, url, None, "NODES_FETCH_FAILED").await?;
    let page = normalize_list(body)?;
    Ok(page_response(status, page))
}

/// Create a node
pub async fn create_node(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(base, "/nodes", &[], &[("company_id", &company)])?;
    let (status, data) =
        proxy_request(&state.http, Method::POST, url, Some(&body), "NODE_CREATE_FAILED").await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}

/// Update a node
pub async fn update_node(
    State(state): State<AppState>,
    user: AuthUser,
    Path(node_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(
        base,
        &format!("/nodes/{}", node_id),
        &[],
        &[("company_id", &company)],
    )?;
    let (status, data) =
        proxy_request(&state.http, Method::PATCH, url, Some(&body), "NODE_UPDATE_FAILED").await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}

/// Delete a node
pub async fn delete_node(
    State(state): State<AppState>,
    user: AuthUser,
    Path(node_id): Path<String>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(
        base,
        &format!("/nodes/{}", node_id),
        &[],
        &[("company_id", &company)],
    )?;
    let (status, data) =
        proxy_request(&state.http, Method::DELETE, url, None, "NODE_DELETE_FAILED").await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}

/// List a node's properties
pub async fn list_node_properties(
    State(state): State<AppState>,
    user: AuthUser,
    Path(node_id): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(
        base,
        "/properties",
        &params,
        &[("node_id", &node_id), ("company_id", &company)],
    )?;
    let (status, body) = proxy_request(
        &state.http,
        Method::GET,
        url,
        None,
        "NODE_PROPERTIES_FETCH_FAILED",
    )
    .await?;
    let page = normalize_list(body)?;
    Ok(page_response(status, page))
}

/// Create a property on a node
pub async fn create_node_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path(node_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(
        base,
        "/properties",
        &[],
        &[("node_id", &node_id), ("company_id", &company)],
    )?;
    let (status, data) = proxy_request(
        &state.http,
        Method::POST,
        url,
        Some(&body),
        "NODE_PROPERTY_CREATE_FAILED",
    )
    .await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}

/// Delete a node property, with the ownership check
///
/// # Errors
///
/// * 404 `NODE_NOT_FOUND` - the node is not in the caller's company; the
///   delete is never forwarded
pub async fn delete_node_property(
    State(state): State<AppState>,
    user: AuthUser,
    Path((node_id, property_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;

    if !node_belongs_to_company(&state, base, &company, &node_id).await? {
        tracing::warn!(
            "Refusing cross-tenant property delete: node {} not in company {}",
            node_id,
            company
        );
        return Err(ApiError::not_found("NODE_NOT_FOUND"));
    }

    let url = build_url(
        base,
        &format!("/properties/{}", property_id),
        &[],
        &[("node_id", &node_id), ("company_id", &company)],
    )?;
    let (status, data) = proxy_request(
        &state.http,
        Method::DELETE,
        url,
        None,
        "NODE_PROPERTY_DELETE_FAILED",
    )
    .await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}

/// Re-fetch the company's node list and scan it for the target node
async fn node_belongs_to_company(
    state: &AppState,
    base: &str,
    company: &str,
    node_id: &str,
) -> Result<bool, ApiError> {
    let url = build_url(base, "/nodes", &[], &[("company_id", company)])?;
    let (_, body) =
        proxy_request(&state.http, Method::GET, url, None, "NODES_FETCH_FAILED").await?;
    let page = normalize_list(body)?;
    Ok(page.items.iter().any(|item| matches_id(item, node_id)))
}
