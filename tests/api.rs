//! End-to-end API tests against a real server on an ephemeral port,
//! backed by the in-memory document store.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

use estate_gateway::api;
use estate_gateway::app_state::AppState;
use estate_gateway::domain::EventBus;
use estate_gateway::persistence::{DocumentStore, MemoryStore};
use estate_gateway::service::{AnnouncementService, FeedbackService, VisitorService};
use estate_gateway::ws::handler::ws_handler;

/// Spawns the gateway on an ephemeral port and returns its address.
async fn spawn_server() -> SocketAddr {
    let store = Arc::new(DocumentStore::Memory(MemoryStore::new()));
    let event_bus = EventBus::new(100);
    let app_state = AppState {
        visitor_service: Arc::new(VisitorService::new(Arc::clone(&store), event_bus.clone())),
        announcement_service: Arc::new(AnnouncementService::new(
            Arc::clone(&store),
            event_bus.clone(),
        )),
        feedback_service: Arc::new(FeedbackService::new(Arc::clone(&store), event_bus.clone())),
        event_bus,
    };

    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|e| panic!("bind failed: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("no local addr: {e}"));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn post_json(client: &reqwest::Client, url: &str, body: Value) -> (u16, Value) {
    let resp = client
        .post(url)
        .json(&body)
        .send()
        .await
        .unwrap_or_else(|e| panic!("POST {url} failed: {e}"));
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn get_json(client: &reqwest::Client, url: &str) -> (u16, Value) {
    let resp = client
        .get(url)
        .send()
        .await
        .unwrap_or_else(|e| panic!("GET {url} failed: {e}"));
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_reports_healthy() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let (status, body) = get_json(&client, &format!("http://{addr}/health")).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn visitor_lifecycle_register_list_scan() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let base = format!("http://{addr}/api/v1");

    // Register with a day-month-year visit date far in the future.
    let (status, created) = post_json(
        &client,
        &format!("{base}/visitors"),
        json!({
            "first_name": "Ada",
            "last_name": "Okafor",
            "contact": "+2348011111111",
            "purpose": "family visit",
            "visit_date": "31/12/2099",
            "created_by": "resident-1",
        }),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(created["status"], "upcoming");
    let id = created["id"].as_str().unwrap_or_default().to_string();
    assert!(!id.is_empty());

    // The listing reconciles the new issuance with (no) scan logs.
    let (status, listing) = get_json(&client, &format!("{base}/visitors")).await;
    assert_eq!(status, 200);
    assert_eq!(listing["data"].as_array().map_or(0, Vec::len), 1);
    assert!(listing["epoch"].as_u64().unwrap_or(0) >= 1);

    // Scan flips the record to scanned.
    let (status, scanned) = post_json(
        &client,
        &format!("{base}/visitors/{id}/scan"),
        json!({ "guard_id": "guard-1" }),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(scanned["status"], "scanned");

    // A second scan of the same QR code is rejected.
    let (status, err) = post_json(
        &client,
        &format!("{base}/visitors/{id}/scan"),
        json!({ "guard_id": "guard-2" }),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(err["error"]["code"], 2101);
}

#[tokio::test]
async fn scan_of_unknown_qr_code_is_not_found() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let (status, err) = post_json(
        &client,
        &format!("http://{addr}/api/v1/visitors/no-such-code/scan"),
        json!({ "guard_id": "guard-1" }),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(err["error"]["code"], 2001);
}

#[tokio::test]
async fn malformed_visit_date_is_rejected_at_registration() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let (status, err) = post_json(
        &client,
        &format!("http://{addr}/api/v1/visitors"),
        json!({
            "first_name": "Ben",
            "last_name": "Eze",
            "visit_date": "not-a-date",
            "created_by": "resident-1",
        }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(err["error"]["code"], 1001);
}

#[tokio::test]
async fn status_filter_narrows_the_listing() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let base = format!("http://{addr}/api/v1");

    for (name, date) in [("Future", "31/12/2099"), ("Past", "1/1/2001")] {
        let (status, _) = post_json(
            &client,
            &format!("{base}/visitors"),
            json!({
                "first_name": name,
                "last_name": "Visitor",
                "visit_date": date,
                "created_by": "resident-1",
            }),
        )
        .await;
        assert_eq!(status, 201);
    }

    let (status, upcoming) = get_json(&client, &format!("{base}/visitors?status=upcoming")).await;
    assert_eq!(status, 200);
    assert_eq!(upcoming["data"].as_array().map_or(0, Vec::len), 1);
    assert_eq!(upcoming["data"][0]["first_name"], "Future");

    let (status, pending) = get_json(&client, &format!("{base}/visitors?status=pending")).await;
    assert_eq!(status, 200);
    assert_eq!(pending["data"][0]["first_name"], "Past");
}

#[tokio::test]
async fn stats_count_registered_visits() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let base = format!("http://{addr}/api/v1");

    let (status, _) = post_json(
        &client,
        &format!("{base}/visitors"),
        json!({
            "first_name": "Carol",
            "last_name": "Ume",
            "visit_date": "15/6/2099",
            "created_by": "resident-1",
        }),
    )
    .await;
    assert_eq!(status, 201);

    let (status, stats) = get_json(&client, &format!("{base}/visitors/stats?year=2099")).await;
    assert_eq!(status, 200);
    assert_eq!(stats["selected_year"], 2099);
    assert_eq!(stats["monthly"][5], 1); // June
    assert_eq!(stats["total_for_year"], 1);
}

#[tokio::test]
async fn announcement_crud_roundtrip() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let base = format!("http://{addr}/api/v1");

    let (status, created) = post_json(
        &client,
        &format!("{base}/announcements"),
        json!({
            "title": "Water outage",
            "body": "Maintenance on Saturday morning.",
            "posted_by": "admin-1",
        }),
    )
    .await;
    assert_eq!(status, 201);
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let (status, updated) = {
        let resp = client
            .put(format!("{base}/announcements/{id}"))
            .json(&json!({
                "title": "Water outage (rescheduled)",
                "body": "Maintenance moved to Sunday.",
                "posted_by": "admin-1",
            }))
            .send()
            .await
            .unwrap_or_else(|e| panic!("PUT failed: {e}"));
        let status = resp.status().as_u16();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        (status, body)
    };
    assert_eq!(status, 200);
    assert_eq!(updated["title"], "Water outage (rescheduled)");

    let del = client
        .delete(format!("{base}/announcements/{id}"))
        .send()
        .await
        .unwrap_or_else(|e| panic!("DELETE failed: {e}"));
    assert_eq!(del.status().as_u16(), 204);

    let (status, _) = get_json(&client, &format!("{base}/announcements/{id}")).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn feedback_listing_includes_summary() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let base = format!("http://{addr}/api/v1");

    for rating in [5, 3] {
        let (status, _) = post_json(
            &client,
            &format!("{base}/feedback"),
            json!({ "rating": rating, "submitted_by": "resident-1" }),
        )
        .await;
        assert_eq!(status, 201);
    }

    let (status, listing) = get_json(&client, &format!("{base}/feedback")).await;
    assert_eq!(status, 200);
    assert_eq!(listing["summary"]["count"], 2);
    let avg = listing["summary"]["average_rating"].as_f64().unwrap_or(0.0);
    assert!((avg - 4.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn ws_subscriber_receives_visitor_events() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .unwrap_or_else(|e| panic!("ws connect failed: {e}"));

    // Subscribe to the visitors topic and wait for the ack.
    let subscribe = json!({
        "id": "sub-1",
        "type": "command",
        "timestamp": chrono::Utc::now(),
        "payload": { "command": "subscribe", "topics": ["visitors"] },
    });
    ws.send(Message::text(subscribe.to_string()))
        .await
        .unwrap_or_else(|e| panic!("ws send failed: {e}"));
    let Some(Ok(Message::Text(ack))) = ws.next().await else {
        panic!("expected subscribe ack");
    };
    let ack: Value = serde_json::from_str(&ack).unwrap_or(Value::Null);
    assert_eq!(ack["type"], "response");

    // A REST registration should arrive as a visitors event.
    let (status, _) = post_json(
        &client,
        &format!("http://{addr}/api/v1/visitors"),
        json!({
            "first_name": "Dana",
            "last_name": "Obi",
            "visit_date": "31/12/2099",
            "created_by": "resident-1",
        }),
    )
    .await;
    assert_eq!(status, 201);

    let event = tokio::time::timeout(std::time::Duration::from_secs(5), ws.next())
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for ws event"));
    let Some(Ok(Message::Text(text))) = event else {
        panic!("expected a text event");
    };
    let msg: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
    assert_eq!(msg["type"], "event");
    assert_eq!(msg["payload"]["event_type"], "visitor_registered");
}
