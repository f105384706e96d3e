//! Flow-Manager Proxy Handlers
//!
//! BFF routes for the workflow editor: nodes, edges, conditions, and
//! notifications. Every handler follows the same chain: authenticate, resolve
//! the company scope, build the upstream URL with the scope forced onto the
//! query string, forward, and map the result into the envelope.

/// Node CRUD and node-property routes (incl. the ownership check)
pub mod nodes;

/// Edge routes
pub mod edges;

/// Condition routes and the batch condition-property fetch
pub mod conditions;

/// Notification and recipient routes
pub mod notifications;

use serde_json::Value;

/// Match an upstream item's `id` field against a path identifier.
/// Upstreams emit both string and numeric ids.
pub(crate) fn matches_id(item: &Value, id: &str) -> bool {
    match item.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}
