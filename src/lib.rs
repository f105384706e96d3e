//! Deskflow Backend
//!
//! Backend-for-frontend server for the Deskflow customer-support application.
//! It authenticates sessions, resolves a per-user company scope, and proxies
//! requests to two upstream REST services:
//!
//! - the **flow manager** service (workflow nodes, edges, conditions,
//!   notifications)
//! - the **communications** service (conversations, messages)
//!
//! Every proxy route speaks the same envelope contract: a `{data | error, meta?}`
//! JSON body with the upstream HTTP status passed through. The only in-process
//! domain logic is the delivery-status reconciliation in [`status`].
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── server/    - Server initialization, application state, configuration
//! ├── routes/    - HTTP route configuration and router assembly
//! ├── auth/      - Sessions, user store, company scope resolution
//! ├── envelope/  - Response envelope and upstream body decoding
//! ├── proxy/     - Upstream request forwarding
//! ├── status/    - Delivery-status reconciliation
//! ├── flow/      - Flow-manager proxy handlers
//! ├── comms/     - Communications proxy handlers
//! └── error/     - API error taxonomy
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication, user store, and company scoping
pub mod auth;

/// Response envelope and upstream body decoding
pub mod envelope;

/// Upstream request forwarding
pub mod proxy;

/// Delivery-status reconciliation
pub mod status;

/// Flow-manager proxy handlers
pub mod flow;

/// Communications proxy handlers
pub mod comms;

/// API error types
pub mod error;

// Re-export commonly used types
pub use error::ApiError;
pub use envelope::Envelope;
pub use server::{create_app, AppState};
pub use status::{pick_latest_status, NormalizedStatus, StatusEvent};
