use std::sync::Arc;

use aroundu_server::routes::create_routes;
use aroundu_server::state::AppState;
use aroundu_server::store::MemoryEventStore;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    create_routes(AppState::new(Arc::new(MemoryEventStore::new())))
}

fn request(method: Method, uri: &str, user_email: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(email) = user_email {
        builder = builder
            .header("x-user-name", "Test User")
            .header("x-user-email", email);
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn sample_event_body() -> Value {
    json!({
        "title": "Friday badminton",
        "description": "Doubles, bring your own racket",
        "location": "Berlin",
        "postal_code": "10115",
        "category": "sports"
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app()
        .oneshot(request(Method::GET, "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["service"], json!("aroundu-api"));
}

#[tokio::test]
async fn mutations_require_identity() {
    let response = app()
        .oneshot(request(
            Method::POST,
            "/api/events",
            None,
            Some(sample_event_body()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("AUTH_ERROR"));
}

#[tokio::test]
async fn unknown_event_is_404() {
    let response = app()
        .oneshot(request(
            Method::GET,
            "/api/events/7b0cadbd-4bb2-4ba0-b9a9-55f25d20e55b",
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn unknown_category_filter_is_rejected() {
    let response = app()
        .oneshot(request(
            Method::GET,
            "/api/events?category=chess",
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn board_flow_over_http() {
    let app = app();

    // Alice posts an event.
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/events",
            Some("alice@x.com"),
            Some(sample_event_body()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let event_id = body["data"]["id"].as_str().unwrap().to_string();

    // Bob registers interest, then fat-fingers the button again.
    let interest_uri = format!("/api/events/{event_id}/interest");
    let response = app
        .clone()
        .oneshot(request(Method::POST, &interest_uri, Some("bob@x.com"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request(Method::POST, &interest_uri, Some("bob@x.com"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!("ALREADY_REGISTERED"));

    // Carol cannot edit or delete what she does not own.
    let event_uri = format!("/api/events/{event_id}");
    let response = app
        .clone()
        .oneshot(request(
            Method::PATCH,
            &event_uri,
            Some("carol@x.com"),
            Some(json!({"title": "Mine now"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Alice edits her own event; the participant list survives the edit.
    let response = app
        .clone()
        .oneshot(request(
            Method::PATCH,
            &event_uri,
            Some("alice@x.com"),
            Some(json!({"title": "Friday badminton (hall 2)"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], json!("Friday badminton (hall 2)"));
    assert_eq!(body["data"]["interested"].as_array().unwrap().len(), 1);

    // Alice deletes it; it is gone for everyone.
    let response = app
        .clone()
        .oneshot(request(
            Method::DELETE,
            &event_uri,
            Some("alice@x.com"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(request(Method::GET, &event_uri, None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
