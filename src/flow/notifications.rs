/**
 * Notification Routes
 *
 * Proxies for the flow manager's `/notifications` and
 * `/notification-recipients` resources.
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

/// List notifications for the caller's company
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(base, "/notifications", &params, &[("company_id", &company)])?;
    let (status, body) = proxy_request(
        &state.http,
        Method::GET,
        url,
        None,
        "NOTIFICATIONS_FETCH_FAILED",
    )
    .await?;
    let page = normalize_list(body)?;
    Ok(page_response(status, page))
}

/// Create a notification
pub async fn create_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(base, "/notifications", &[], &[("company_id", &company)])?;
    let (status, data) = proxy_request(
        &state.http,
        Method::POST,
        url,
        Some(&body),
        "NOTIFICATION_CREATE_FAILED",
    )
    .await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}

/// Update a notification
pub async fn update_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(notification_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(
        base,
        &format!("/notifications/{}", notification_id),
        &[],
        &[("company_id", &company)],
    )?;
    let (status, data) = proxy_request(
        &state.http,
        Method::PATCH,
        url,
        Some(&body),
        "NOTIFICATION_UPDATE_FAILED",
    )
    .await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}

/// Delete a notification
pub async fn delete_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(
        base,
        &format!("/notifications/{}", notification_id),
        &[],
        &[("company_id", &company)],
    )?;
    let (status, data) = proxy_request(
        &state.http,
        Method::DELETE,
        url,
        None,
        "NOTIFICATION_DELETE_FAILED",
    )
    .await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}

/// List recipients of a notification
pub async fn list_recipients(
    State(state): State<AppState>,
    user: AuthUser,
    Path(notification_id): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(
        base,
        "/notification-recipients",
        &params,
        &[
            ("notification_id", &notification_id),
            ("company_id", &company),
        ],
    )?;
    let (status, body) = proxy_request(
        &state.http,
        Method::GET,
        url,
        None,
        "NOTIFICATION_RECIPIENTS_FETCH_FAILED",
    )
    .await?;
    let page = normalize_list(body)?;
    Ok(page_response(status, page))
}

/// Add a recipient to a notification
pub async fn create_recipient(
    State(state): State<AppState>,
    user: AuthUser,
    Path(notification_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(
        base,
        "/notification-recipients",
        &[],
        &[
            ("notification_id", &notification_id),
            ("company_id", &company),
        ],
    )?;
    let (status, data) = proxy_request(
        &state.http,
        Method::POST,
        url,
        Some(&body),
        "NOTIFICATION_RECIPIENT_CREATE_FAILED",
    )
    .await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}

/// Remove a recipient from a notification
pub async fn delete_recipient(
    State(state): State<AppState>,
    user: AuthUser,
    Path((notification_id, recipient_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(
        base,
        &format!("/notification-recipients/{}", recipient_id),
        &[],
        &[
            ("notification_id", &notification_id),
            ("company_id", &company),
        ],
    )?;
    let (status, data) = proxy_request(
        &state.http,
        Method::DELETE,
        url,
        None,
        "NOTIFICATION_RECIPIENT_DELETE_FAILED",
    )
    .await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}
