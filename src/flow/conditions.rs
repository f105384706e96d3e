/**
 * Condition Routes
 *
 * Proxies for the flow manager's `/conditions` and `/condition-properties`
 * resources. The batch property fetch is the one place the BFF fans out:
 * one upstream request per condition id, issued concurrently and awaited
 * jointly.
 */

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::future::try_join_all;
use reqwest::Method;
use serde_json::{Map, Value};

use crate::auth::{resolve_company_scope, AuthUser};
use crate::envelope::{normalize_list, Envelope};
use crate::error::ApiError;
use crate::proxy::{build_url, page_response, proxy_request};
use crate::server::state::AppState;

/// List conditions for the caller's company
pub async fn list_conditions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(base, "/conditions", &params, &[("company_id", &company)])?;
    let (status, body) =
        proxy_request(&state.http, Method::GET, url, None, "CONDITIONS_FETCH_FAILED").await?;
    let page = normalize_list(body)?;
    Ok(page_response(status, page))
}

/// Create a condition
pub async fn create_condition(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(base, "/conditions", &[], &[("company_id", &company)])?;
    let (status, data) = proxy_request(
        &state.http,
        Method::POST,
        url,
        Some(&body),
        "CONDITION_CREATE_FAILED",
    )
    .await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}

/// Update a condition
pub async fn update_condition(
    State(state): State<AppState>,
    user: AuthUser,
    Path(condition_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(
        base,
        &format!("/conditions/{}", condition_id),
        &[],
        &[("company_id", &company)],
    )?;
    let (status, data) = proxy_request(
        &state.http,
        Method::PATCH,
        url,
        Some(&body),
        "CONDITION_UPDATE_FAILED",
    )
    .await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}

/// Delete a condition
pub async fn delete_condition(
    State(state): State<AppState>,
    user: AuthUser,
    Path(condition_id): Path<String>,
) -> Result<Response, ApiError> {
    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;
    let url = build_url(
        base,
        &format!("/conditions/{}", condition_id),
        &[],
        &[("company_id", &company)],
    )?;
    let (status, data) = proxy_request(
        &state.http,
        Method::DELETE,
        url,
        None,
        "CONDITION_DELETE_FAILED",
    )
    .await?;
    Ok((status, Json(Envelope::data(data))).into_response())
}

/// Batch-fetch properties for a set of conditions
///
/// `GET /api/flow/conditions/properties?condition_ids=a,b,c` issues one
/// upstream `/condition-properties` request per id, all concurrently, and
/// returns an object keyed by condition id.
///
/// # Errors
///
/// * 400 `MISSING_CONDITION_IDS` - the parameter is absent or empty
pub async fn list_condition_properties(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let raw_ids = params
        .iter()
        .find(|(key, _)| key == "condition_ids")
        .map(|(_, value)| value.clone())
        .ok_or_else(|| ApiError::bad_request("MISSING_CONDITION_IDS"))?;

    let ids: Vec<String> = raw_ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    if ids.is_empty() {
        return Err(ApiError::bad_request("MISSING_CONDITION_IDS"));
    }

    let company = resolve_company_scope(&state, &user).await?;
    let base = state.upstreams.flow()?;

    let mut fetches = Vec::with_capacity(ids.len());
    for id in ids {
        let url = build_url(
            base,
            "/condition-properties",
            &[],
            &[("condition_id", &id), ("company_id", &company)],
        )?;
        let http = state.http.clone();
        fetches.push(async move {
            let (_, body) = proxy_request(
                &http,
                Method::GET,
                url,
                None,
                "CONDITION_PROPERTIES_FETCH_FAILED",
            )
            .await?;
            let page = normalize_list(body)?;
            Ok::<(String, Vec<Value>), ApiError>((id, page.items))
        });
    }

    let results = try_join_all(fetches).await?;
    let mut by_condition = Map::new();
    for (id, items) in results {
        by_condition.insert(id, Value::Array(items));
    }

    Ok((
        StatusCode::OK,
        Json(Envelope::data(Value::Object(by_condition))),
    )
        .into_response())
}
