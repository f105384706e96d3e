//! Shared helpers for integration tests
//!
//! Builds the real router around an in-memory company directory so no live
//! Postgres is needed; upstream services are mocked with wiremock.

use std::collections::HashMap;
use std::sync::Arc;

use axum_test::TestServer;
use futures_util::future::BoxFuture;

use deskflow::auth::company::CompanyDirectory;
use deskflow::auth::sessions::create_token;
use deskflow::error::ApiError;
use deskflow::server::{create_app_with_state, AppState, Upstreams};

/// Fixed company number used across the suite
pub const COMPANY: &str = "+15550001111";

/// Email of the test agent
pub const AGENT: &str = "agent@example.com";

/// In-memory company directory
pub struct StaticDirectory {
    companies: HashMap<String, String>,
}

impl StaticDirectory {
    /// Directory mapping the test agent to the fixed company
    pub fn with_agent() -> Self {
        let mut companies = HashMap::new();
        companies.insert(AGENT.to_string(), COMPANY.to_string());
        Self { companies }
    }

    /// Directory with no entries; every scope resolution fails closed
    pub fn empty() -> Self {
        Self {
            companies: HashMap::new(),
        }
    }
}

impl CompanyDirectory for StaticDirectory {
    fn company_for_email<'a>(
        &'a self,
        email: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, ApiError>> {
        Box::pin(async move { Ok(self.companies.get(email).cloned()) })
    }
}

/// Build an application state around mocked upstreams
pub fn test_state(
    flow_url: Option<String>,
    comms_url: Option<String>,
    directory: StaticDirectory,
) -> AppState {
    AppState {
        http: reqwest::Client::new(),
        upstreams: Arc::new(Upstreams::new(flow_url, comms_url)),
        db_pool: None,
        directory: Arc::new(directory),
    }
}

/// Spin up a test server around the real router
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(create_app_with_state(state)).unwrap()
}

/// Bearer header value for the test agent
pub fn agent_bearer() -> String {
    let token = create_token(uuid::Uuid::new_v4(), AGENT.to_string()).unwrap();
    format!("Bearer {}", token)
}
