//! Communications Proxy Handlers
//!
//! BFF routes for the conversation inbox: conversation listing, message
//! listing (with delivery-status reconciliation), sending messages, and the
//! decommissioned meta/outbound endpoint.

/// Conversation listing
pub mod conversations;

/// Message listing and sending
pub mod messages;

/// Removed meta/outbound endpoint
pub mod outbound;
