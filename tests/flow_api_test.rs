//! Flow-manager proxy integration tests
//!
//! Covers the envelope contract, company-scope enforcement, the
//! ownership-check sub-protocol, and configuration fail-closed behavior.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{agent_bearer, test_server, test_state, StaticDirectory, COMPANY};

#[tokio::test]
async fn client_supplied_company_id_is_overridden() {
    let upstream = MockServer::start().await;
    // Only matches when the forwarded request carries the server-resolved
    // company, so a leaked client value would fail the expectation.
    Mock::given(method("GET"))
        .and(path("/nodes"))
        .and(query_param("company_id", COMPANY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "n1"}])))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = test_server(test_state(
        Some(upstream.uri()),
        None,
        StaticDirectory::with_agent(),
    ));

    let response = server
        .get("/api/flow/nodes")
        .add_query_param("company_id", "someone-else")
        .add_header("authorization", agent_bearer())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"], json!([{"id": "n1"}]));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn upstream_404_propagates_through_the_envelope() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nodes"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "nope"})))
        .mount(&upstream)
        .await;

    let server = test_server(test_state(
        Some(upstream.uri()),
        None,
        StaticDirectory::with_agent(),
    ));

    let response = server
        .get("/api/flow/nodes")
        .add_header("authorization", agent_bearer())
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body.get("data").is_none());
    assert_eq!(body["error"]["code"], json!("NODES_FETCH_FAILED"));
    assert_eq!(body["error"]["details"], json!({"message": "nope"}));
}

#[tokio::test]
async fn ownership_check_blocks_cross_tenant_property_delete() {
    let upstream = MockServer::start().await;
    // The caller's company owns a different node
    Mock::given(method("GET"))
        .and(path("/nodes"))
        .and(query_param("company_id", COMPANY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "other-node"}])))
        .expect(1)
        .mount(&upstream)
        .await;
    // The delete must never reach the upstream
    Mock::given(method("DELETE"))
        .and(path("/properties/p1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let server = test_server(test_state(
        Some(upstream.uri()),
        None,
        StaticDirectory::with_agent(),
    ));

    let response = server
        .delete("/api/flow/nodes/n1/properties/p1")
        .add_header("authorization", agent_bearer())
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], json!("NODE_NOT_FOUND"));
}

#[tokio::test]
async fn owned_node_property_delete_is_forwarded() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "n1"}])))
        .mount(&upstream)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/properties/p1"))
        .and(query_param("company_id", COMPANY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = test_server(test_state(
        Some(upstream.uri()),
        None,
        StaticDirectory::with_agent(),
    ));

    let response = server
        .delete("/api/flow/nodes/n1/properties/p1")
        .add_header("authorization", agent_bearer())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"], json!({"deleted": true}));
}

#[tokio::test]
async fn creation_status_codes_pass_through() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/nodes"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "n9"})))
        .mount(&upstream)
        .await;

    let server = test_server(test_state(
        Some(upstream.uri()),
        None,
        StaticDirectory::with_agent(),
    ));

    let response = server
        .post("/api/flow/nodes")
        .add_header("authorization", agent_bearer())
        .json(&json!({"kind": "trigger"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"], json!({"id": "n9"}));
}

#[tokio::test]
async fn batch_condition_properties_fans_out_per_id() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/condition-properties"))
        .and(query_param("condition_id", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "cp1"}])))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/condition-properties"))
        .and(query_param("condition_id", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = test_server(test_state(
        Some(upstream.uri()),
        None,
        StaticDirectory::with_agent(),
    ));

    let response = server
        .get("/api/flow/conditions/properties")
        .add_query_param("condition_ids", "c1,c2")
        .add_header("authorization", agent_bearer())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["data"]["c1"], json!([{"id": "cp1"}]));
    assert_eq!(body["data"]["c2"], json!([]));
}

#[tokio::test]
async fn batch_condition_properties_requires_ids() {
    let server = test_server(test_state(
        Some("http://unused".to_string()),
        None,
        StaticDirectory::with_agent(),
    ));

    let response = server
        .get("/api/flow/conditions/properties")
        .add_header("authorization", agent_bearer())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], json!("MISSING_CONDITION_IDS"));
}

#[tokio::test]
async fn missing_flow_url_fails_closed() {
    let server = test_server(test_state(None, None, StaticDirectory::with_agent()));

    let response = server
        .get("/api/flow/nodes")
        .add_header("authorization", agent_bearer())
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(
        body["error"]["code"],
        json!("FLOW_SERVICE_URL_NOT_CONFIGURED")
    );
}

#[tokio::test]
async fn unreachable_upstream_answers_502_not_an_empty_success() {
    // Start a mock server only to claim a free port, then drop it so the
    // forwarded request fails at the transport level. A non-pooled server is
    // required: pooled servers keep listening after drop.
    let upstream = MockServer::builder().start().await;
    let uri = upstream.uri();
    drop(upstream);

    let server = test_server(test_state(Some(uri), None, StaticDirectory::with_agent()));

    let response = server
        .get("/api/flow/nodes")
        .add_header("authorization", agent_bearer())
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert!(body.get("data").is_none());
    assert_eq!(body["error"]["code"], json!("NODES_FETCH_FAILED"));
    assert!(body["error"]["details"]["message"].is_string());
}

#[tokio::test]
async fn missing_session_is_rejected_before_any_upstream_call() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&upstream)
        .await;

    let server = test_server(test_state(
        Some(upstream.uri()),
        None,
        StaticDirectory::with_agent(),
    ));

    let response = server.get("/api/flow/nodes").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));
}

#[tokio::test]
async fn user_without_company_scope_is_forbidden() {
    let server = test_server(test_state(
        Some("http://unused".to_string()),
        None,
        StaticDirectory::empty(),
    ));

    let response = server
        .get("/api/flow/nodes")
        .add_header("authorization", agent_bearer())
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], json!("FORBIDDEN_COMPANY_NUMBER"));
}
