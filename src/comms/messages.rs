/**
 * Message Routes
 *
 * Message listing reshapes each upstream message: the raw `statuses` array is
 * reconciled into a single `delivery_status` label via
 * [`crate::status::pick_latest_status`]. Sending passes the upstream's
 * creation status (200/201/202) through unchanged.
 */

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::Method;
use serde_json::Value;

use crate::auth::{resolve_company_scope, AuthUser};
use crate::envelope::{normalize_list, Envelope};
use crate::error::ApiError;
use crate::proxy::{build_url, proxy_request};
use crate::server::state::AppState;
use crate::status::{pick_latest_status, StatusEvent};

/// List messages in a conversation, with reconciled delivery status
pub async fn list_messages(
    State(state): State<AppState>,
    user: AuthUser,
    Path(conversation_id): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.comms()?;
    let url = build_url(
        base,
        &format!("/sessions/{}/messages", conversation_id),
        &params,
        &[("company_id", &company)],
    )?;
    let (status, body) =
        proxy_request(&state.http, Method::GET, url, None, "MESSAGES_FETCH_FAILED").await?;
    let page = normalize_list(body)?;
    let meta = page.meta();

    let messages: Vec<Value> = page.items.into_iter().map(attach_delivery_status).collect();

    let mut envelope = Envelope::data(Value::Array(messages));
    if let Some(meta) = meta {
        envelope = envelope.with_meta(meta);
    }
    Ok((status, Json(envelope)).into_response())
}

/// Send a message
///
/// # Errors
///
/// * 400 `MISSING_CONVERSATION_ID` - the body has no conversation reference
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    if body.get("conversation_id").and_then(Value::as_str).is_none() {
        return Err(ApiError::bad_request("MISSING_CONVERSATION_ID"));
    }

    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.comms()?;
    let url = build_url(base, "/messages", &[], &[("company_id", &company)])?;
    let (status, data) = proxy_request(
        &state.http,
        Method::POST,
        url,
        Some(&body),
        "MESSAGE_SEND_FAILED",
    )
    .await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}

/// Reconcile a message's raw `statuses` array into a `delivery_status` field
///
/// Messages without a usable status list (inbound messages, unrecognized
/// events) are passed through untouched.
fn attach_delivery_status(mut message: Value) -> Value {
    let Some(object) = message.as_object_mut() else {
        return message;
    };
    let Some(raw_statuses) = object.get("statuses").cloned() else {
        return message;
    };
    let Ok(events) = serde_json::from_value::<Vec<StatusEvent>>(raw_statuses) else {
        tracing::warn!("Message statuses field is not a status-event list");
        return message;
    };
    if let Some(status) = pick_latest_status(&events) {
        object.insert(
            "delivery_status".to_string(),
            Value::String(status.as_str().to_string()),
        );
    }
    message
}
