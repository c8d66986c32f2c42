use chrono::NaiveDate;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use calendar_cell::store::{AppointmentStore, NewAppointment, SupabaseAppointmentStore};
use shared_config::AppConfig;

fn test_config(mock_server: &MockServer) -> AppConfig {
    AppConfig {
        supabase_url: mock_server.uri(),
        supabase_service_key: "test-service-key".to_string(),
    }
}

fn appointment_row(id: Uuid, provider_id: Uuid, user_id: Option<Uuid>) -> Value {
    json!({
        "id": id,
        "provider_id": provider_id,
        "user_id": user_id,
        "start_date_time": "2024-10-15T10:00:00",
        "end_date_time": "2024-10-15T11:00:00",
        "status": "scheduled",
        "service_type": "consultation",
        "comments": null,
        "created_at": "2024-10-01T09:00:00Z",
        "updated_at": "2024-10-01T09:00:00Z"
    })
}

#[tokio::test]
async fn insert_posts_the_row_and_returns_the_representation() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();
    let provider_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(header("Prefer", "return=representation"))
        .and(header("apikey", "test-service-key"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([appointment_row(id, provider_id, Some(user_id))])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = SupabaseAppointmentStore::new(&test_config(&mock_server));

    let created = store
        .insert(NewAppointment {
            provider_id,
            user_id: Some(user_id),
            start_date_time: NaiveDate::from_ymd_opt(2024, 10, 15)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            end_date_time: NaiveDate::from_ymd_opt(2024, 10, 15)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap(),
            status: "scheduled".to_string(),
            service_type: Some("consultation".to_string()),
            comments: None,
        })
        .await
        .unwrap();

    assert_eq!(created.id, id);
    assert_eq!(created.provider_id, provider_id);
    assert_eq!(created.status, "scheduled");
}

#[tokio::test]
async fn list_by_provider_filters_and_orders_by_start_time() {
    let mock_server = MockServer::start().await;
    let provider_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("provider_id", format!("eq.{}", provider_id)))
        .and(query_param("order", "start_date_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(Uuid::new_v4(), provider_id, Some(Uuid::new_v4())),
            appointment_row(Uuid::new_v4(), provider_id, None),
        ])))
        .mount(&mock_server)
        .await;

    let store = SupabaseAppointmentStore::new(&test_config(&mock_server));

    let rows = store.list_by_provider(provider_id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows[1].is_block());
}

#[tokio::test]
async fn day_query_uses_a_half_open_start_time_window() {
    let mock_server = MockServer::start().await;
    let provider_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("provider_id", format!("eq.{}", provider_id)))
        .and(query_param("start_date_time", "gte.2024-10-15T00:00:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = SupabaseAppointmentStore::new(&test_config(&mock_server));

    let rows = store
        .list_by_provider_and_date(provider_id, NaiveDate::from_ymd_opt(2024, 10, 15).unwrap())
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn get_of_unknown_id_is_none() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let store = SupabaseAppointmentStore::new(&test_config(&mock_server));

    assert!(store.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn cancel_counts_the_returned_rows() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", id)))
        .and(query_param("status", "neq.cancelled"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([appointment_row(id, Uuid::new_v4(), None)])),
        )
        .mount(&mock_server)
        .await;

    let store = SupabaseAppointmentStore::new(&test_config(&mock_server));

    assert_eq!(store.cancel(id).await.unwrap(), 1);
}

#[tokio::test]
async fn cancel_of_an_already_cancelled_row_affects_nothing() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    // The status filter matches no rows, so PostgREST returns an empty
    // representation.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let store = SupabaseAppointmentStore::new(&test_config(&mock_server));

    assert_eq!(store.cancel(id).await.unwrap(), 0);
}

#[tokio::test]
async fn delete_counts_the_returned_rows() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([appointment_row(id, Uuid::new_v4(), None)])),
        )
        .mount(&mock_server)
        .await;

    let store = SupabaseAppointmentStore::new(&test_config(&mock_server));

    assert_eq!(store.delete(id).await.unwrap(), 1);
}

#[tokio::test]
async fn store_errors_surface_as_database_failures() {
    let mock_server = MockServer::start().await;
    let provider_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let store = SupabaseAppointmentStore::new(&test_config(&mock_server));

    let result = store.list_by_provider(provider_id).await;
    assert_matches::assert_matches!(
        result.unwrap_err(),
        calendar_cell::models::AppointmentError::Database(_)
    );
}
