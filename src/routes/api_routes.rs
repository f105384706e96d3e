/**
 * API Route Table
 *
 * This module defines the route table for all API endpoints:
 *
 * ## Authentication
 * - `POST /api/auth/signup` - User registration
 * - `POST /api/auth/login` - User login
 * - `GET  /api/auth/me` - Get current user info
 *
 * ## Flow manager (all company-scoped)
 * - `GET|POST /api/flow/nodes`, `PATCH|DELETE /api/flow/nodes/{node_id}`
 * - `GET|POST /api/flow/nodes/{node_id}/properties`,
 *   `DELETE /api/flow/nodes/{node_id}/properties/{property_id}`
 * - `GET|POST /api/flow/edges`, `DELETE /api/flow/edges/{edge_id}`
 * - `GET|POST /api/flow/conditions`,
 *   `PATCH|DELETE /api/flow/conditions/{condition_id}`
 * - `GET /api/flow/conditions/properties`
 * - `GET|POST /api/flow/notifications`,
 *   `PATCH|DELETE /api/flow/notifications/{notification_id}`
 * - `GET|POST /api/flow/notifications/{notification_id}/recipients`,
 *   `DELETE .../recipients/{recipient_id}`
 *
 * ## Communications
 * - `GET /api/conversations`
 * - `GET /api/conversations/{conversation_id}/messages`
 * - `POST /api/messages`
 * - `GET|POST /api/meta/outbound` - removed, answers 410
 */

use axum::Router;

use crate::auth::handlers::{get_me, login, signup};
use crate::comms::conversations::list_conversations;
use crate::comms::messages::{list_messages, send_message};
use crate::comms::outbound::outbound_removed;
use crate::flow::conditions::{
    create_condition, delete_condition, list_condition_properties, list_conditions,
    update_condition,
};
use crate::flow::edges::{create_edge, delete_edge, list_edges};
use crate::flow::nodes::{
    create_node, create_node_property, delete_node, delete_node_property, list_node_properties,
    list_nodes, update_node,
};
use crate::flow::notifications::{
    create_notification, create_recipient, delete_notification, delete_recipient,
    list_notifications, list_recipients, update_notification,
};
use crate::server::state::AppState;

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication endpoints
        .route("/api/auth/signup", axum::routing::post(signup))
        .route("/api/auth/login", axum::routing::post(login))
        .route("/api/auth/me", axum::routing::get(get_me))
        // Flow manager: nodes
        .route(
            "/api/flow/nodes",
            axum::routing::get(list_nodes).post(create_node),
        )
        .route(
            "/api/flow/nodes/{node_id}",
            axum::routing::patch(update_node).delete(delete_node),
        )
        .route(
            "/api/flow/nodes/{node_id}/properties",
            axum::routing::get(list_node_properties).post(create_node_property),
        )
        .route(
            "/api/flow/nodes/{node_id}/properties/{property_id}",
            axum::routing::delete(delete_node_property),
        )
        // Flow manager: edges
        .route(
            "/api/flow/edges",
            axum::routing::get(list_edges).post(create_edge),
        )
        .route("/api/flow/edges/{edge_id}", axum::routing::delete(delete_edge))
        // Flow manager: conditions
        // The static segment must be registered before the parameterized one
        .route(
            "/api/flow/conditions/properties",
            axum::routing::get(list_condition_properties),
        )
        .route(
            "/api/flow/conditions",
            axum::routing::get(list_conditions).post(create_condition),
        )
        .route(
            "/api/flow/conditions/{condition_id}",
            axum::routing::patch(update_condition).delete(delete_condition),
        )
        // Flow manager: notifications
        .route(
            "/api/flow/notifications",
            axum::routing::get(list_notifications).post(create_notification),
        )
        .route(
            "/api/flow/notifications/{notification_id}",
            axum::routing::patch(update_notification).delete(delete_notification),
        )
        .route(
            "/api/flow/notifications/{notification_id}/recipients",
            axum::routing::get(list_recipients).post(create_recipient),
        )
        .route(
            "/api/flow/notifications/{notification_id}/recipients/{recipient_id}",
            axum::routing::delete(delete_recipient),
        )
        // Communications
        .route("/api/conversations", axum::routing::get(list_conversations))
        .route(
            "/api/conversations/{conversation_id}/messages",
            axum::routing::get(list_messages),
        )
        .route("/api/messages", axum::routing::post(send_message))
        // Decommissioned endpoint kept registered so callers get 410, not 404
        .route(
            "/api/meta/outbound",
            axum::routing::get(outbound_removed).post(outbound_removed),
        )
}
