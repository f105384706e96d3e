/**
 * Server Initialization
 *
 * Builds the application state and the router. All shared resources are
 * constructed here, once, and injected through `AppState`.
 */

use std::sync::Arc;

use axum::Router;

use crate::auth::company::PgCompanyDirectory;
use crate::routes::router::create_router;
use crate::server::config::{load_database, Upstreams};
use crate::server::state::AppState;

/// Create and configure the Axum application
///
/// # Initialization Steps
///
/// 1. Resolve upstream base URLs from the environment
/// 2. Connect to the database if `DATABASE_URL` is set
/// 3. Build the shared HTTP client and company directory
/// 4. Assemble the router
pub async fn create_app() -> Router<()> {
    tracing::info!("Initializing Deskflow BFF server");

    let upstreams = Arc::new(Upstreams::from_env());
    let db_pool = load_database().await;
    let directory = Arc::new(PgCompanyDirectory::new(db_pool.clone()));

    let app_state = AppState {
        http: reqwest::Client::new(),
        upstreams,
        db_pool,
        directory,
    };

    tracing::info!("Router configured");
    create_router(app_state)
}

/// Create the application from a prebuilt state (used by tests)
pub fn create_app_with_state(app_state: AppState) -> Router<()> {
    create_router(app_state)
}
