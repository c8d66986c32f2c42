mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use calendar_cell::models::status;
use calendar_cell::router::calendar_routes;
use calendar_cell::state::CalendarState;
use calendar_cell::store::InMemoryAppointmentStore;

use common::{dt, seed};

fn test_app() -> (Router, Arc<InMemoryAppointmentStore>) {
    let store = Arc::new(InMemoryAppointmentStore::new());
    let state = Arc::new(CalendarState::new(store.clone()));
    (calendar_routes(state), store)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body is not JSON")
}

#[tokio::test]
async fn create_appointment_returns_the_stored_entity() {
    let (app, _store) = test_app();
    let provider_id = Uuid::new_v4();

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({
                "provider_id": provider_id,
                "user_id": Uuid::new_v4(),
                "start_date_time": "2024-10-15T10:00:00",
                "end_date_time": "2024-10-15T11:00:00",
                "service_type": "consultation"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["appointment"]["status"], json!("scheduled"));
    assert!(body["appointment"]["id"].is_string());
}

#[tokio::test]
async fn conflicting_create_returns_409() {
    let (app, store) = test_app();
    let provider_id = Uuid::new_v4();

    seed(
        &store,
        provider_id,
        Some(Uuid::new_v4()),
        dt(2024, 10, 15, 10, 0),
        dt(2024, 10, 15, 11, 0),
        status::SCHEDULED,
    )
    .await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({
                "provider_id": provider_id,
                "start_date_time": "2024-10-15T10:30:00",
                "end_date_time": "2024-10-15T11:30:00"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = response_json(response).await;
    assert_eq!(
        body["error"],
        json!("The selected time slot is not available or conflicts with an existing appointment.")
    );
}

#[tokio::test]
async fn block_without_provider_is_a_bad_request() {
    let (app, _store) = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/blocks",
            json!({
                "start_date_time": "2024-10-15T12:00:00",
                "end_date_time": "2024-10-15T13:00:00"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recurring_block_reports_its_range() {
    let (app, store) = test_app();
    let provider_id = Uuid::new_v4();

    let response = app
        .oneshot(json_request(
            "POST",
            "/blocks/recurring",
            json!({
                "provider_id": provider_id,
                "start_time": "08:00:00",
                "end_time": "19:00:00",
                "start_date": "2024-12-24",
                "end_date": "2024-12-25"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(
        body["message"],
        json!("Recurring block created successfully from 2024-12-24 to 2024-12-25")
    );

    let rows = {
        use calendar_cell::store::AppointmentStore;
        store.list_by_provider(provider_id).await.unwrap()
    };
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn get_unknown_appointment_is_404() {
    let (app, _store) = test_app();

    let response = app
        .oneshot(empty_request("GET", &format!("/{}", Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancel_unknown_appointment_is_a_bad_request() {
    let (app, _store) = test_app();

    let response = app
        .oneshot(empty_request("PUT", &format!("/{}/cancel", Uuid::new_v4())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], json!("Appointment not found or already cancelled."));
}

#[tokio::test]
async fn comment_only_update_succeeds_over_http() {
    let (app, store) = test_app();
    let provider_id = Uuid::new_v4();

    let appointment = seed(
        &store,
        provider_id,
        Some(Uuid::new_v4()),
        dt(2024, 10, 15, 10, 0),
        dt(2024, 10, 15, 11, 0),
        status::SCHEDULED,
    )
    .await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/{}", appointment.id),
            json!({ "comments": "bring paperwork" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["appointment"]["comments"], json!("bring paperwork"));
    assert_eq!(
        body["appointment"]["start_date_time"],
        json!("2024-10-15T10:00:00")
    );
}

#[tokio::test]
async fn availability_for_an_empty_day_spans_the_whole_day() {
    let (app, _store) = test_app();
    let provider_id = Uuid::new_v4();

    let response = app
        .oneshot(empty_request(
            "GET",
            &format!("/providers/{}/available/date/2024-10-15", provider_id),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let intervals = body["available_intervals"].as_array().unwrap();
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0]["start"], json!("2024-10-15T00:00:00"));
    assert_eq!(intervals[0]["end"], json!("2024-10-15T23:59:59.999999999"));
}

#[tokio::test]
async fn empty_history_returns_a_message_row() {
    let (app, _store) = test_app();

    let response = app
        .oneshot(empty_request(
            "GET",
            &format!("/history?provider_id={}&user_id={}", Uuid::new_v4(), Uuid::new_v4()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(
        body["message"],
        json!("No appointment history found for the given provider and user.")
    );
}

#[tokio::test]
async fn delete_block_round_trip() {
    let (app, store) = test_app();
    let provider_id = Uuid::new_v4();

    let block = seed(
        &store,
        provider_id,
        None,
        dt(2024, 10, 15, 12, 0),
        dt(2024, 10, 15, 13, 0),
        status::BLOCKED,
    )
    .await;

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/blocks/{}", block.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let second = app
        .oneshot(empty_request("DELETE", &format!("/blocks/{}", block.id)))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
}
