/**
 * Response Envelope and Upstream Body Decoding
 *
 * Every route answers with the same envelope shape:
 *
 * ```json
 * { "data": ..., "error": { "code": "...", "details": ... }, "meta": ... }
 * ```
 *
 * Exactly one of `data`/`error` is populated in a well-formed response.
 * Envelopes are constructed fresh per request and never persisted.
 *
 * This module also owns the two boundary decoders for upstream responses:
 *
 * - [`UpstreamBody`] - JSON-or-text body selected by content-type sniffing
 * - [`ListPayload`] - bare-array vs `{items: [...]}` wrapper, normalized into
 *   a single [`Page`] shape; anything else is rejected, never defaulted to
 *   empty
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Uniform response wrapper used by all BFF routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Payload on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error description on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<EnvelopeError>,
    /// Out-of-band metadata, e.g. pagination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// Error half of the envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeError {
    /// Short uppercase machine-readable identifier
    pub code: String,
    /// Raw diagnostic payload, usually the upstream body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl<T> Envelope<T> {
    /// Build a success envelope
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    /// Build an error envelope
    pub fn error(code: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            data: None,
            error: Some(EnvelopeError {
                code: code.into(),
                details,
            }),
            meta: None,
        }
    }

    /// Attach metadata to the envelope
    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Upstream response body, read permissively
///
/// Upstream failures are not guaranteed to be JSON (HTML error pages, plain
/// text from proxies), so the body is decoded by content-type sniffing and
/// carried as text when it is not JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    Json(Value),
    Text(String),
}

impl UpstreamBody {
    /// Convert into a `serde_json::Value`, wrapping text as a JSON string
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }
}

/// The two list shapes upstream services are known to emit
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListPayload {
    /// `{ "items": [...], "total": ..., "limit": ..., "offset": ... }`
    Wrapped {
        items: Vec<Value>,
        #[serde(default)]
        total: Option<u64>,
        #[serde(default)]
        limit: Option<u64>,
        #[serde(default)]
        offset: Option<u64>,
    },
    /// Bare `[...]`
    Bare(Vec<Value>),
}

/// Canonical internal shape for upstream lists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    pub total: Option<u64>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Page {
    /// Pagination metadata for the envelope, or `None` when the upstream
    /// sent a bare array with no counts
    pub fn meta(&self) -> Option<Value> {
        let mut meta = Map::new();
        if let Some(total) = self.total {
            meta.insert("total".to_string(), total.into());
        }
        if let Some(limit) = self.limit {
            meta.insert("limit".to_string(), limit.into());
        }
        if let Some(offset) = self.offset {
            meta.insert("offset".to_string(), offset.into());
        }
        if meta.is_empty() {
            None
        } else {
            Some(Value::Object(meta))
        }
    }
}

/// Normalize an upstream list response into a [`Page`]
///
/// Accepts a bare array or an `{items: [...]}` wrapper. A shape matching
/// neither variant is logged and rejected rather than silently treated as an
/// empty list.
pub fn normalize_list(value: Value) -> Result<Page, ApiError> {
    match serde_json::from_value::<ListPayload>(value) {
        Ok(ListPayload::Wrapped {
            items,
            total,
            limit,
            offset,
        }) => Ok(Page {
            items,
            total,
            limit,
            offset,
        }),
        Ok(ListPayload::Bare(items)) => Ok(Page {
            items,
            ..Page::default()
        }),
        Err(e) => {
            tracing::warn!("upstream list response matched no known shape: {}", e);
            Err(ApiError::UnexpectedUpstreamShape)
        }
    }
}
