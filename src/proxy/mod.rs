/**
 * Upstream Request Forwarding
 *
 * Shared plumbing for every proxy route: build the upstream URL from the
 * incoming query string plus server-forced parameters, forward the request,
 * read the body permissively, and translate failure into the envelope error
 * taxonomy.
 *
 * There are deliberately no retries, timeouts, or caching here; each route
 * performs a straight-line sequential chain of calls.
 */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, Method, Url};
use serde_json::Value;

use crate::envelope::{Envelope, Page, UpstreamBody};
use crate::error::ApiError;

/// Status and decoded body of an upstream response
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: UpstreamBody,
}

/// Build an upstream URL from client query parameters and forced overrides
///
/// Client parameters are copied verbatim, except that any parameter whose name
/// collides with a forced one is dropped: server-derived values always win,
/// which is what prevents scope escalation via query tampering.
pub fn build_url(
    base: &str,
    path: &str,
    client_query: &[(String, String)],
    forced: &[(&str, &str)],
) -> Result<Url, ApiError> {
    let mut url = Url::parse(&format!("{}{}", base.trim_end_matches('/'), path)).map_err(|e| {
        tracing::error!("invalid upstream URL for {}: {}", path, e);
        ApiError::NotConfigured {
            code: "UPSTREAM_URL_INVALID",
        }
    })?;
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in client_query {
            if forced.iter().any(|(name, _)| *name == key.as_str()) {
                continue;
            }
            pairs.append_pair(key, value);
        }
        for (key, value) in forced {
            pairs.append_pair(key, value);
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }
    Ok(url)
}

/// Read an upstream body permissively
///
/// A JSON content type is parsed as JSON; anything else (HTML error pages,
/// plain text) is captured as raw text without failing the request. A body
/// that claims JSON but does not parse is kept as text. A read that fails
/// mid-stream is a transport failure, not an empty body, and maps to 502.
pub async fn read_body(
    response: reqwest::Response,
    error_code: &str,
) -> Result<UpstreamBody, ApiError> {
    let is_json = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json") || v.contains("+json"))
        .unwrap_or(false);
    let text = response.text().await.map_err(|e| {
        tracing::error!("upstream body read failed ({}): {}", error_code, e);
        ApiError::UpstreamUnreachable {
            code: error_code.to_string(),
            message: e.to_string(),
        }
    })?;
    if is_json {
        match serde_json::from_str(&text) {
            Ok(value) => Ok(UpstreamBody::Json(value)),
            Err(_) => Ok(UpstreamBody::Text(text)),
        }
    } else {
        Ok(UpstreamBody::Text(text))
    }
}

/// Forward a request to an upstream service
///
/// Network-level failure maps to 502 with the route's error code; any HTTP
/// response, success or not, is returned to the caller for mapping.
pub async fn forward(
    client: &Client,
    method: Method,
    url: Url,
    body: Option<&Value>,
    error_code: &str,
) -> Result<UpstreamResponse, ApiError> {
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(body);
    }
    let response = request.send().await.map_err(|e| {
        tracing::error!("upstream request failed ({}): {}", error_code, e);
        ApiError::UpstreamUnreachable {
            code: error_code.to_string(),
            message: e.to_string(),
        }
    })?;
    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let body = read_body(response, error_code).await?;
    Ok(UpstreamResponse { status, body })
}

/// Forward a request and map the result into the envelope contract
///
/// 2xx yields the upstream status (passed through, so creation routes keep
/// 201/202) and the decoded body. Non-2xx becomes an [`ApiError::Upstream`]
/// carrying the raw upstream body as `details`.
pub async fn proxy_request(
    client: &Client,
    method: Method,
    url: Url,
    body: Option<&Value>,
    error_code: &str,
) -> Result<(StatusCode, Value), ApiError> {
    let response = forward(client, method, url, body, error_code).await?;
    if response.status.is_success() {
        Ok((response.status, response.body.into_value()))
    } else {
        tracing::warn!(
            "upstream answered {} for {}",
            response.status,
            error_code
        );
        Err(ApiError::upstream(
            error_code,
            response.status,
            response.body.into_value(),
        ))
    }
}

/// Render a normalized page as a success envelope, attaching pagination meta
/// when the upstream provided counts
pub fn page_response(status: StatusCode, page: Page) -> Response {
    let meta = page.meta();
    let mut envelope = Envelope::data(Value::Array(page.items));
    if let Some(meta) = meta {
        envelope = envelope.with_meta(meta);
    }
    (status, Json(envelope)).into_response()
}
