/**
 * Application State Management
 *
 * `AppState` is the central state container handed to every handler. All
 * resources in it are constructed once at startup and injected explicitly;
 * request handling itself is stateless and shares no mutable state between
 * requests.
 *
 * The `FromRef` implementations let handlers extract just the part of the
 * state they need, following Axum's recommended pattern.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::company::CompanyDirectory;
use crate::server::config::Upstreams;

/// Application state shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Shared HTTP client for all upstream calls
    pub http: reqwest::Client,

    /// Upstream base URLs resolved from the environment
    pub upstreams: Arc<Upstreams>,

    /// Database connection pool
    ///
    /// `None` when `DATABASE_URL` is not set. Handlers that need the user
    /// store answer 503 in that case.
    pub db_pool: Option<PgPool>,

    /// Company scope oracle
    ///
    /// Backed by the users table in production; tests substitute an
    /// in-memory directory.
    pub directory: Arc<dyn CompanyDirectory>,
}

/// Allow handlers to extract the optional database pool directly
impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}
