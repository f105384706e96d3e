//! Server Module
//!
//! Initialization and configuration for the Axum HTTP server.
//!
//! ```text
//! server/
//! ├── mod.rs     - Module exports
//! ├── state.rs   - AppState and FromRef implementations
//! ├── config.rs  - Upstream URLs and database configuration
//! └── init.rs    - App creation
//! ```
//!
//! All shared resources (HTTP client, upstream configuration, database pool,
//! company directory) are constructed explicitly at startup in
//! [`init::create_app`] and handed to handlers through [`state::AppState`];
//! there are no lazily initialized globals.

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::Upstreams;
pub use init::{create_app, create_app_with_state};
pub use state::AppState;
