//! HTTP surface tests: the full router driven with in-process requests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use enroll_server::core::{build_router, Config, ServerState};
use enroll_server::db::repository::profile;
use enroll_server::db::DbService;
use shared::models::{ProfileCreate, Role};

struct TestApp {
    _dir: tempfile::TempDir,
    app: Router,
    pool: sqlx::SqlitePool,
}

async fn setup() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("test.db");
    let db = DbService::new(db_path.to_str().expect("utf-8 path"))
        .await
        .expect("open database");

    let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    let state = ServerState::with_pool(config, db.pool.clone());
    TestApp {
        _dir: dir,
        app: build_router(state),
        pool: db.pool,
    }
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn seed_profiles(pool: &sqlx::SqlitePool) {
    for (id, name, email, role) in [
        ("i1", "Dr. Khalid", "khalid@example.com", Role::Instructor),
        ("M1", "Mona", "mona@example.com", Role::Marketer),
    ] {
        profile::create(
            pool,
            ProfileCreate {
                id: id.into(),
                name: name.into(),
                email: email.into(),
                role,
            },
        )
        .await
        .expect("seed profile");
    }
}

async fn create_course(app: &Router, price: f64) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/api/courses",
        Some(json!({
            "instructor_id": "i1",
            "title": "Intro to Data Science",
            "price": price,
            "mode": "online",
            "enrollment_fields": [
                {"field_id": "full_name", "required": true},
                {"field_id": "phone", "required": true},
                {"field_id": "email", "required": false},
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "course create failed: {body}");
    body["id"].as_i64().expect("course id")
}

#[tokio::test]
async fn health_reports_database_status() {
    let env = setup().await;
    let (status, body) = request(&env.app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn unknown_field_ids_are_skipped_in_render_list() {
    let env = setup().await;
    seed_profiles(&env.pool).await;

    let (status, body) = request(
        &env.app,
        "POST",
        "/api/courses",
        Some(json!({
            "instructor_id": "i1",
            "title": "Rust for Engineers",
            "price": 120.0,
            "enrollment_fields": [
                {"field_id": "full_name", "required": true},
                {"field_id": "phone", "required": true},
                {"field_id": "shoe_size", "required": true},
                {"field_id": "city", "required": false},
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let course_id = body["id"].as_i64().unwrap();

    let (status, fields) = request(
        &env.app,
        "GET",
        &format!("/api/courses/{course_id}/fields"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = fields
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["full_name", "phone", "city"]);
}

#[tokio::test]
async fn invalid_course_payloads_rejected() {
    let env = setup().await;
    seed_profiles(&env.pool).await;

    let (status, body) = request(
        &env.app,
        "POST",
        "/api/courses",
        Some(json!({"instructor_id": "i1", "title": "Freebie", "price": 0.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6002);

    let (status, _) = request(
        &env.app,
        "POST",
        "/api/courses",
        Some(json!({"instructor_id": "i1", "title": "  ", "price": 10.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn enrollment_status_lifecycle_is_append_only() {
    let env = setup().await;
    seed_profiles(&env.pool).await;
    let course_id = create_course(&env.app, 300.0).await;

    let (status, record) = request(
        &env.app,
        "POST",
        "/api/enrollments",
        Some(json!({
            "course_id": course_id,
            "instructor_id": "i1",
            "name": "Amna Hassan",
            "phone": "0998765432",
            "payment": "bank",
            "amount": 300.0,
            "status": "pending",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{record}");
    let id = record["id"].as_i64().unwrap();
    assert!(record["reference"].as_str().unwrap().starts_with("MSR-"));

    // pending → accepted
    let (status, updated) = request(
        &env.app,
        "PUT",
        &format!("/api/enrollments/{id}/status"),
        Some(json!({"status": "accepted"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "accepted");

    // No resurrection of a decided record
    let (status, body) = request(
        &env.app,
        "PUT",
        &format!("/api/enrollments/{id}/status"),
        Some(json!({"status": "rejected"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4002);
}

#[tokio::test]
async fn reserved_record_cannot_skip_to_accepted() {
    let env = setup().await;
    seed_profiles(&env.pool).await;
    let course_id = create_course(&env.app, 300.0).await;

    let (_, record) = request(
        &env.app,
        "POST",
        "/api/enrollments",
        Some(json!({
            "course_id": course_id,
            "instructor_id": "i1",
            "name": "Amna",
            "phone": "0912345678",
            "payment": "none-yet",
            "amount": 300.0,
            "status": "reserved",
        })),
    )
    .await;
    let id = record["id"].as_i64().unwrap();

    let (status, body) = request(
        &env.app,
        "PUT",
        &format!("/api/enrollments/{id}/status"),
        Some(json!({"status": "accepted"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4003);
}

#[tokio::test]
async fn assignment_creation_validates_marketer_rate_and_uniqueness() {
    let env = setup().await;
    seed_profiles(&env.pool).await;
    let course_id = create_course(&env.app, 150.0).await;

    // Unknown marketer: rejected, no optimistic write
    let (status, body) = request(
        &env.app,
        "POST",
        "/api/assignments",
        Some(json!({
            "course_id": course_id,
            "instructor_id": "i1",
            "marketer_id": "ghost",
            "commission_rate": 10,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 7101);

    // Instructors cannot be assigned as marketers
    let (status, _) = request(
        &env.app,
        "POST",
        "/api/assignments",
        Some(json!({
            "course_id": course_id,
            "instructor_id": "i1",
            "marketer_id": "i1",
            "commission_rate": 10,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Rate outside 1-50
    let (status, body) = request(
        &env.app,
        "POST",
        "/api/assignments",
        Some(json!({
            "course_id": course_id,
            "instructor_id": "i1",
            "marketer_id": "M1",
            "commission_rate": 70,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7003);

    // Valid create resolves denormalized columns server-side
    let (status, created) = request(
        &env.app,
        "POST",
        "/api/assignments",
        Some(json!({
            "course_id": course_id,
            "instructor_id": "i1",
            "marketer_id": "M1",
            "commission_rate": 10,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["marketer_name"], "Mona");
    assert_eq!(created["course_title"], "Intro to Data Science");

    // Duplicate pair: rejected, not upserted
    let (status, body) = request(
        &env.app,
        "POST",
        "/api/assignments",
        Some(json!({
            "course_id": course_id,
            "instructor_id": "i1",
            "marketer_id": "M1",
            "commission_rate": 25,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 7002);
}

#[tokio::test]
async fn session_flow_and_commission_over_http() {
    let env = setup().await;
    seed_profiles(&env.pool).await;
    let course_id = create_course(&env.app, 150.0).await;

    let (status, _) = request(
        &env.app,
        "POST",
        "/api/assignments",
        Some(json!({
            "course_id": course_id,
            "instructor_id": "i1",
            "marketer_id": "M1",
            "commission_rate": 10,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Start a session through M1's tracking link
    let (status, session) = request(
        &env.app,
        "POST",
        "/api/sessions",
        Some(json!({
            "course_id": course_id,
            "referral_query": format!("ref=M1&course={course_id}&enroll=1"),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{session}");
    let sid = session["id"].as_str().unwrap().to_string();
    assert_eq!(session["state"], "collecting-details");
    assert_eq!(session["local_amount"], 52_500); // 150 × 350

    // Walk the machine to done
    let (status, session) = request(
        &env.app,
        "POST",
        &format!("/api/sessions/{sid}/details"),
        Some(json!({
            "form": {"full_name": "Omar", "phone": "0911222333"},
            "pay_later": false,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{session}");
    assert_eq!(session["state"], "choosing-payment-method");

    let (_, session) = request(
        &env.app,
        "POST",
        &format!("/api/sessions/{sid}/method"),
        Some(json!({"method": "bank"})),
    )
    .await;
    assert_eq!(session["state"], "bank-instructions");
    assert_eq!(session["bank"]["bank"], "Bank of Khartoum");

    request(&env.app, "POST", &format!("/api/sessions/{sid}/transferred"), None).await;
    request(
        &env.app,
        "POST",
        &format!("/api/sessions/{sid}/proof"),
        Some(json!({"file_name": "receipt.png"})),
    )
    .await;
    let (status, session) = request(
        &env.app,
        "POST",
        &format!("/api/sessions/{sid}/submit"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["state"], "done");
    assert_eq!(session["last_write"]["result"], "persisted");
    let record_id = session["record_id"].as_i64().unwrap();

    // Accept and read the settled commission
    let (status, _) = request(
        &env.app,
        "PUT",
        &format!("/api/enrollments/{record_id}/status"),
        Some(json!({"status": "accepted"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, summary) = request(
        &env.app,
        "GET",
        "/api/marketers/M1/commissions",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{summary}");
    assert_eq!(summary["settled"], 5250);
    assert_eq!(summary["estimated"], 0);

    // Tracking links round out the marketer dashboard read path
    let (status, links) = request(
        &env.app,
        "GET",
        "/api/marketers/M1/links?origin=https://masar.example",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        links[0]["enrollment_form_link"],
        format!("https://masar.example/?ref=M1&course={course_id}&enroll=1")
    );
}

#[tokio::test]
async fn invalid_session_operations_map_to_unprocessable() {
    let env = setup().await;
    seed_profiles(&env.pool).await;
    let course_id = create_course(&env.app, 150.0).await;

    let (_, session) = request(
        &env.app,
        "POST",
        "/api/sessions",
        Some(json!({"course_id": course_id})),
    )
    .await;
    let sid = session["id"].as_str().unwrap().to_string();

    // Choosing a method before details is out of order
    let (status, body) = request(
        &env.app,
        "POST",
        &format!("/api/sessions/{sid}/method"),
        Some(json!({"method": "bank"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 4102);

    // Unknown session id
    let (status, body) = request(
        &env.app,
        "GET",
        "/api/sessions/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4101);

    // Unknown course at session start
    let (status, body) = request(
        &env.app,
        "POST",
        "/api/sessions",
        Some(json!({"course_id": 999_999})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}
