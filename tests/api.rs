use axum::{body::Body, Router};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use skillbridge::{
    build_router,
    config::{Config, StoreBackend},
    state::AppState,
    store::memory::MemDirectory,
};

struct Api {
    router: Router,
    teacher: Uuid,
    learner: Uuid,
    skill: Uuid,
}

async fn api() -> Api {
    let directory = MemDirectory::new();
    let teacher = directory.add_teacher("Ada").await;
    let learner = directory.add_learner("Linus").await;
    let skill = directory.add_skill("Rust").await;
    directory.add_offering(teacher, skill).await;

    let config = Config {
        store_backend: StoreBackend::Memory,
        database_url: None,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
    };
    let state = AppState::with_memory(config, directory);

    Api { router: build_router(state), teacher, learner, skill }
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    principal: Option<(Uuid, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((user_id, role)) = principal {
        builder = builder
            .header("x-user-id", user_id.to_string())
            .header("x-user-role", role);
    }

    let request = match body {
        Some(value) => builder
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn booking_body(api: &Api) -> Value {
    json!({
        "teacherId": api.teacher,
        "learnerId": api.learner,
        "skillId": api.skill,
        "startTime": "2026-03-10T10:00:00Z",
        "endTime": "2026-03-10T11:00:00Z",
        "notes": "first lesson"
    })
}

#[tokio::test]
async fn requests_without_identity_headers_are_unauthorized() {
    let api = api().await;
    let (status, body) = send(
        &api.router,
        Method::POST,
        "/api/sessions",
        None,
        Some(booking_body(&api)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn booking_is_denied_for_teacher_originated_requests() {
    let api = api().await;
    let (status, _) = send(
        &api.router,
        Method::POST,
        "/api/sessions",
        Some((api.teacher, "TEACHER")),
        Some(booking_body(&api)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn learner_can_book_and_receives_the_created_session() {
    let api = api().await;
    let (status, body) = send(
        &api.router,
        Method::POST,
        "/api/sessions",
        Some((api.learner, "LEARNER")),
        Some(booking_body(&api)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Session created successfully"));
    assert_eq!(body["data"]["status"], json!("PENDING"));
    assert_eq!(body["data"]["teacherId"], json!(api.teacher));
    assert_eq!(body["data"]["teacher"]["name"], json!("Ada"));
    assert_eq!(body["data"]["learner"]["name"], json!("Linus"));
    assert_eq!(body["data"]["skill"]["name"], json!("Rust"));
    assert_eq!(body["data"]["notes"], json!("first lesson"));
}

#[tokio::test]
async fn admin_originated_booking_is_accepted() {
    let api = api().await;
    let (status, _) = send(
        &api.router,
        Method::POST,
        "/api/sessions",
        Some((Uuid::new_v4(), "ADMIN")),
        Some(booking_body(&api)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn conflicting_booking_maps_to_bad_request() {
    let api = api().await;
    let principal = Some((api.learner, "LEARNER"));

    let (status, _) = send(&api.router, Method::POST, "/api/sessions", principal, Some(booking_body(&api))).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut overlapping = booking_body(&api);
    overlapping["startTime"] = json!("2026-03-10T10:30:00Z");
    overlapping["endTime"] = json!("2026-03-10T11:30:00Z");
    let (status, body) = send(&api.router, Method::POST, "/api/sessions", principal, Some(overlapping)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Time slot conflicts with existing session"));
}

#[tokio::test]
async fn degenerate_interval_maps_to_bad_request() {
    let api = api().await;
    let mut body = booking_body(&api);
    body["endTime"] = json!("2026-03-10T10:00:00Z");
    let (status, _) = send(
        &api.router,
        Method::POST,
        "/api/sessions",
        Some((api.learner, "LEARNER")),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_session_update_maps_to_not_found() {
    let api = api().await;
    let (status, _) = send(
        &api.router,
        Method::PATCH,
        &format!("/api/sessions/{}", Uuid::new_v4()),
        Some((api.teacher, "TEACHER")),
        Some(json!({ "status": "CONFIRMED" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn session_flows_from_booking_to_teacher_calendar() {
    let api = api().await;

    let (_, created) = send(
        &api.router,
        Method::POST,
        "/api/sessions",
        Some((api.learner, "LEARNER")),
        Some(booking_body(&api)),
    )
    .await;
    let session_id = created["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/sessions/{}", session_id);

    // Only the teacher may update, and only along legal edges.
    let (status, _) = send(
        &api.router,
        Method::PATCH,
        &uri,
        Some((api.learner, "LEARNER")),
        Some(json!({ "status": "CONFIRMED" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &api.router,
        Method::PATCH,
        &uri,
        Some((api.teacher, "TEACHER")),
        Some(json!({ "status": "COMPLETED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Cannot transition from PENDING to COMPLETED"));

    let (status, body) = send(
        &api.router,
        Method::PATCH,
        &uri,
        Some((api.teacher, "TEACHER")),
        Some(json!({ "status": "CONFIRMED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("CONFIRMED"));

    // The confirmed session shows up on the right calendars.
    let (status, body) = send(
        &api.router,
        Method::GET,
        "/api/sessions/teacher/calendar",
        Some((api.teacher, "TEACHER")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], json!("Rust with Linus"));
    assert_eq!(body["data"][0]["allDay"], json!(false));
    assert_eq!(body["data"][0]["extendedProps"]["learnerName"], json!("Linus"));

    let (status, body) = send(
        &api.router,
        Method::GET,
        "/api/sessions/learner/calendar",
        Some((api.learner, "LEARNER")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["title"], json!("Rust with Ada"));

    let (status, body) = send(
        &api.router,
        Method::GET,
        "/api/sessions/calendar",
        Some((Uuid::new_v4(), "ADMIN")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["title"], json!("Rust: Ada - Linus"));
}

#[tokio::test]
async fn admin_calendar_is_not_visible_to_participants() {
    let api = api().await;
    let (status, _) = send(
        &api.router,
        Method::GET,
        "/api/sessions/calendar",
        Some((api.learner, "LEARNER")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
