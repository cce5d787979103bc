use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use appointment_cell::router::appointment_routes;
use shared_database::Collection;
use shared_utils::test_utils::{at, MockRecords, TestContext};

fn create_test_app(ctx: &TestContext) -> Router {
    appointment_routes(ctx.state.clone())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_schedule_returns_created_with_location() {
    let ctx = TestContext::new();
    let doctor_id = Uuid::new_v4();

    let response = create_test_app(&ctx)
        .oneshot(post_json("/", json!({
            "patientId": Uuid::new_v4(),
            "doctorId": doctor_id,
            "startTime": "2024-03-02T10:00:00Z",
            "note": "Suivi annuel"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers().get(header::LOCATION).unwrap().to_str().unwrap().to_string();

    let body = body_json(response).await;
    let id = body["appointment"]["id"].as_str().unwrap();
    assert_eq!(location, format!("/appointments/{}", id));
    assert_eq!(body["appointment"]["end_time"], "2024-03-02T10:30:00Z");
}

#[tokio::test]
async fn test_schedule_accepts_practitioner_alias() {
    let ctx = TestContext::new();

    let response = create_test_app(&ctx)
        .oneshot(post_json("/", json!({
            "patientId": Uuid::new_v4(),
            "practitionerId": Uuid::new_v4(),
            "start": "2024-03-02T10:00:00Z",
            "note": "Varicelle"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_schedule_missing_fields_is_bad_request() {
    let ctx = TestContext::new();

    let response = create_test_app(&ctx)
        .oneshot(post_json("/", json!({ "patientId": Uuid::new_v4() })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("doctorId"));
    assert!(message.contains("startTime"));
    assert!(message.contains("note"));
    assert_eq!(ctx.store.count(Collection::Appointments).await, 0);
}

#[tokio::test]
async fn test_schedule_malformed_json_is_bad_request() {
    let ctx = TestContext::new();

    let response = create_test_app(&ctx)
        .oneshot(post_json("/", json!({ "patientId": "not-a-uuid" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_schedule_far_future_start_is_bad_request() {
    let ctx = TestContext::new();

    let response = create_test_app(&ctx)
        .oneshot(post_json("/", json!({
            "patientId": Uuid::new_v4(),
            "doctorId": Uuid::new_v4(),
            "startTime": "+262142-12-31T23:59:00Z",
            "note": "Suivi annuel"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].as_str().unwrap().contains("startTime"));
    assert_eq!(ctx.store.count(Collection::Appointments).await, 0);
}

#[tokio::test]
async fn test_schedule_conflict_is_409_without_details() {
    let ctx = TestContext::new();
    let doctor_id = Uuid::new_v4();
    let existing = ctx
        .seed(Collection::Appointments, MockRecords::appointment(Uuid::new_v4(), doctor_id, at(10, 0)))
        .await;

    let response = create_test_app(&ctx)
        .oneshot(post_json("/", json!({
            "patientId": Uuid::new_v4(),
            "doctorId": doctor_id,
            "startTime": "2024-03-02T10:15:00Z",
            "note": "Consultation"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    let existing_id = existing["id"].as_str().unwrap();
    assert!(!body.to_string().contains(existing_id));
}

#[tokio::test]
async fn test_get_and_delete_appointment() {
    let ctx = TestContext::new();
    let record = ctx
        .seed(Collection::Appointments, MockRecords::appointment(Uuid::new_v4(), Uuid::new_v4(), at(9, 0)))
        .await;
    let id = record["id"].as_str().unwrap().to_string();
    let app = create_test_app(&ctx);

    let response = app.clone().oneshot(get(&format!("/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["appointment"]["id"], id.as_str());

    let delete = Request::builder().method("DELETE").uri(format!("/{}", id)).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(get(&format!("/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let delete = Request::builder().method("DELETE").uri(format!("/{}", id)).body(Body::empty()).unwrap();
    let response = app.oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_doctor_listing_filters_by_date() {
    let ctx = TestContext::new();
    let doctor_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();

    ctx.seed(Collection::Appointments, MockRecords::appointment(patient_id, doctor_id, at(11, 0))).await;
    ctx.seed(Collection::Appointments, MockRecords::appointment(patient_id, doctor_id, at(9, 0))).await;
    let mut next_day = MockRecords::appointment(patient_id, doctor_id, at(9, 0));
    next_day["start_time"] = json!("2024-03-03T09:00:00Z");
    next_day["end_time"] = json!("2024-03-03T09:30:00Z");
    ctx.seed(Collection::Appointments, next_day).await;

    let app = create_test_app(&ctx);

    let response = app.clone().oneshot(get(&format!("/doctors/{}", doctor_id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["total"], 3);

    let response = app
        .clone()
        .oneshot(get(&format!("/doctors/{}?date=2024-03-02", doctor_id)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["appointments"][0]["start_time"], "2024-03-02T09:00:00Z");

    let response = app
        .clone()
        .oneshot(get(&format!("/patients/{}?date=2024-03-03", patient_id)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["total"], 1);

    let response = app.oneshot(get(&format!("/doctors/{}", Uuid::new_v4()))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patient_listing_filters_by_date() {
    let ctx = TestContext::new();
    let patient_id = Uuid::new_v4();

    ctx.seed(Collection::Appointments, MockRecords::appointment(patient_id, Uuid::new_v4(), at(14, 0))).await;
    ctx.seed(Collection::Appointments, MockRecords::appointment(patient_id, Uuid::new_v4(), at(8, 30))).await;
    ctx.seed(Collection::Appointments, MockRecords::appointment(Uuid::new_v4(), Uuid::new_v4(), at(9, 0))).await;
    let mut previous_day = MockRecords::appointment(patient_id, Uuid::new_v4(), at(9, 0));
    previous_day["start_time"] = json!("2024-03-01T23:45:00Z");
    previous_day["end_time"] = json!("2024-03-02T00:15:00Z");
    ctx.seed(Collection::Appointments, previous_day).await;

    let app = create_test_app(&ctx);

    let response = app
        .clone()
        .oneshot(get(&format!("/patients/{}?date=2024-03-02", patient_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["appointments"][0]["start_time"], "2024-03-02T08:30:00Z");
    assert_eq!(body["appointments"][1]["start_time"], "2024-03-02T14:00:00Z");

    let response = app
        .clone()
        .oneshot(get(&format!("/patients/{}?date=2024-03-01", patient_id)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["total"], 1);

    let response = app
        .oneshot(get(&format!("/patients/{}?date=2024-03-05", patient_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
