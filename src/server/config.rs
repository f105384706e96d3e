/**
 * Server Configuration
 *
 * Loads upstream base URLs and the optional Postgres connection from the
 * environment.
 *
 * Upstream URL resolution fails closed: a missing variable is kept as absent
 * and every route needing it answers 500 with a `*_NOT_CONFIGURED` code
 * instead of proceeding with a guessed URL. The database is optional at
 * startup so the proxy plumbing stays testable without Postgres; routes that
 * need it answer 503.
 */

use sqlx::PgPool;

use crate::error::ApiError;

/// Upstream base URLs resolved from the environment
#[derive(Debug, Clone, Default)]
pub struct Upstreams {
    flow: Option<String>,
    comms: Option<String>,
}

impl Upstreams {
    /// Read `FLOW_SERVICE_URL` and `COMMS_SERVICE_URL`
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("FLOW_SERVICE_URL").ok(),
            std::env::var("COMMS_SERVICE_URL").ok(),
        )
    }

    /// Build from explicit values (used by tests)
    pub fn new(flow: Option<String>, comms: Option<String>) -> Self {
        Self {
            flow: flow.map(|u| u.trim_end_matches('/').to_string()),
            comms: comms.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    /// Flow-manager base URL, or 500 `FLOW_SERVICE_URL_NOT_CONFIGURED`
    pub fn flow(&self) -> Result<&str, ApiError> {
        self.flow.as_deref().ok_or(ApiError::NotConfigured {
            code: "FLOW_SERVICE_URL_NOT_CONFIGURED",
        })
    }

    /// Communications base URL, or 500 `COMMS_SERVICE_URL_NOT_CONFIGURED`
    pub fn comms(&self) -> Result<&str, ApiError> {
        self.comms.as_deref().ok_or(ApiError::NotConfigured {
            code: "COMMS_SERVICE_URL_NOT_CONFIGURED",
        })
    }
}

/// Load and initialize the database connection pool
///
/// Returns `None` if `DATABASE_URL` is not set or the connection fails;
/// errors are logged but do not prevent server startup.
pub async fn load_database() -> Option<PgPool> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!("DATABASE_URL not set. Auth routes will be disabled.");
            return None;
        }
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Auth routes will be disabled.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed"),
        Err(e) => {
            // Migrations may already have been applied out of band
            tracing::error!("Failed to run database migrations: {:?}", e);
            tracing::warn!("Continuing without migrations");
        }
    }

    Some(pool)
}
