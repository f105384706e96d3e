//! Route Configuration
//!
//! Router assembly for all API routes.

/// Router creation
pub mod router;

/// API route table
pub mod api_routes;

pub use router::create_router;
