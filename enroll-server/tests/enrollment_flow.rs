//! End-to-end enrollment flow tests against a real SQLite database:
//! session state machine → repositories → commission aggregation.

use std::collections::HashMap;

use enroll_server::db::repository::{assignment, course, enrollment, profile};
use enroll_server::db::DbService;
use enroll_server::enrollment::{SessionManager, SessionState};
use enroll_server::referral::{summarize, ReferralToken};
use shared::models::{
    CourseCreate, CourseFieldConfig, EnrollmentStatus, PaymentMethod, ProfileCreate, Role,
};

const CURRENCY_FACTOR: i64 = 350;

struct TestEnv {
    _dir: tempfile::TempDir,
    pool: sqlx::SqlitePool,
    sessions: SessionManager,
}

async fn setup() -> TestEnv {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("test.db");
    let db = DbService::new(db_path.to_str().expect("utf-8 path"))
        .await
        .expect("open database");
    let sessions = SessionManager::new(db.pool.clone(), CURRENCY_FACTOR);
    TestEnv {
        _dir: dir,
        pool: db.pool,
        sessions,
    }
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

async fn seed_course(pool: &sqlx::SqlitePool, price: f64) -> i64 {
    let created = course::create(
        pool,
        CourseCreate {
            instructor_id: "i1".into(),
            title: "Intro to Data Science".into(),
            price,
            mode: Default::default(),
            enrollment_fields: vec![
                CourseFieldConfig::new("full_name", true),
                CourseFieldConfig::new("phone", true),
                CourseFieldConfig::new("email", false),
            ],
        },
    )
    .await
    .expect("seed course");
    created.id
}

fn form(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn pay_now_flow_creates_pending_record() {
    let env = setup().await;
    seed_profiles(&env.pool).await;
    let course_id = seed_course(&env.pool, 300.0).await;

    let view = env.sessions.start(course_id, None).await.unwrap();
    let session_id = view.id.clone();

    // Empty required phone blocks the transition — and writes nothing
    let err = env
        .sessions
        .submit_details(
            &session_id,
            form(&[("full_name", "Amna Hassan"), ("phone", "")]),
            false,
        )
        .await
        .unwrap_err();
    assert!(err.details.unwrap().contains_key("phone"));
    assert!(enrollment::find_by_instructor(&env.pool, "i1")
        .await
        .unwrap()
        .is_empty());

    // Valid phone, pay now → bank → proof → pending record
    let view = env
        .sessions
        .submit_details(
            &session_id,
            form(&[("full_name", "Amna Hassan"), ("phone", "0998765432")]),
            false,
        )
        .await
        .unwrap();
    assert_eq!(view.state, SessionState::ChoosingPaymentMethod);
    assert!(view.record_id.is_none(), "pay-now writes nothing until proof");

    env.sessions
        .choose_method(&session_id, PaymentMethod::Bank)
        .await
        .unwrap();
    env.sessions.confirm_transferred(&session_id).await.unwrap();
    env.sessions
        .attach_proof(&session_id, "receipt.png".into(), None)
        .await
        .unwrap();
    let view = env.sessions.submit_proof(&session_id).await.unwrap();

    assert_eq!(view.state, SessionState::Done);
    let record_id = view.record_id.expect("record persisted");

    let record = enrollment::find_by_id(&env.pool, record_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, EnrollmentStatus::Pending);
    assert_eq!(record.amount, 300.0);
    assert_eq!(record.payment, PaymentMethod::Bank);
    assert_eq!(record.phone, "0998765432");
    assert!(record.marketer_id.is_none());
}

#[tokio::test]
async fn pay_later_creates_one_reserved_record_then_updates_it() {
    let env = setup().await;
    seed_profiles(&env.pool).await;
    let course_id = seed_course(&env.pool, 300.0).await;

    let view = env.sessions.start(course_id, None).await.unwrap();
    let session_id = view.id.clone();

    let view = env
        .sessions
        .submit_details(
            &session_id,
            form(&[("full_name", "Amna Hassan"), ("phone", "0912345678")]),
            true,
        )
        .await
        .unwrap();
    assert_eq!(view.state, SessionState::Done);
    assert!(view.pay_later);
    let record_id = view.record_id.expect("reserved record persisted");

    let records = enrollment::find_by_instructor(&env.pool, "i1").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, EnrollmentStatus::Reserved);
    assert_eq!(records[0].payment, PaymentMethod::NoneYet);

    // Complete payment later: same record moves to pending, no duplicate
    env.sessions.restart_payment(&session_id).await.unwrap();
    env.sessions
        .choose_method(&session_id, PaymentMethod::Momo)
        .await
        .unwrap();
    env.sessions.confirm_transferred(&session_id).await.unwrap();
    env.sessions
        .attach_proof(&session_id, "receipt.pdf".into(), Some("paid via MTN".into()))
        .await
        .unwrap();
    let view = env.sessions.submit_proof(&session_id).await.unwrap();
    assert_eq!(view.record_id, Some(record_id));

    let records = enrollment::find_by_instructor(&env.pool, "i1").await.unwrap();
    assert_eq!(records.len(), 1, "restart must not create a second record");
    assert_eq!(records[0].id, record_id);
    assert_eq!(records[0].status, EnrollmentStatus::Pending);
    assert_eq!(records[0].payment, PaymentMethod::Momo);
    assert_eq!(records[0].note.as_deref(), Some("paid via MTN"));
    // Amount untouched by the update
    assert_eq!(records[0].amount, 300.0);
}

#[tokio::test]
async fn referral_attribution_and_settled_commission() {
    let env = setup().await;
    seed_profiles(&env.pool).await;
    let course_id = seed_course(&env.pool, 150.0).await;

    assignment::create(
        &env.pool,
        course_id,
        "i1",
        "M1",
        "Mona",
        "mona@example.com",
        "Intro to Data Science",
        10,
    )
    .await
    .unwrap();

    // Session arrives through M1's tracking link
    let token = ReferralToken::from_query(&format!("ref=M1&course={course_id}&enroll=1")).unwrap();
    let view = env.sessions.start(course_id, Some(token)).await.unwrap();
    let session_id = view.id.clone();

    env.sessions
        .submit_details(
            &session_id,
            form(&[("full_name", "Omar"), ("phone", "0911222333")]),
            false,
        )
        .await
        .unwrap();
    env.sessions
        .choose_method(&session_id, PaymentMethod::Bank)
        .await
        .unwrap();
    env.sessions.confirm_transferred(&session_id).await.unwrap();
    env.sessions
        .attach_proof(&session_id, "receipt.png".into(), None)
        .await
        .unwrap();
    let view = env.sessions.submit_proof(&session_id).await.unwrap();
    let record_id = view.record_id.unwrap();

    let record = enrollment::find_by_id(&env.pool, record_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.marketer_id.as_deref(), Some("M1"));
    assert_eq!(record.course_id, course_id);

    // Pending → only estimated commission
    let assignments = assignment::find_by_marketer(&env.pool, "M1").await.unwrap();
    let records = enrollment::find_by_marketer(&env.pool, "M1").await.unwrap();
    let summary = summarize("M1", &assignments, &records, CURRENCY_FACTOR);
    assert_eq!(summary.settled, 0);
    assert_eq!(summary.estimated, 5250); // 150 × 350 × 10 / 100

    // Accept → settled
    enrollment::set_status(&env.pool, record_id, EnrollmentStatus::Accepted)
        .await
        .unwrap();
    let records = enrollment::find_by_marketer(&env.pool, "M1").await.unwrap();
    let summary = summarize("M1", &assignments, &records, CURRENCY_FACTOR);
    assert_eq!(summary.settled, 5250);
    assert_eq!(summary.estimated, 0);
    assert_eq!(summary.breakdown.len(), 1);
    assert_eq!(summary.breakdown[0].accepted_count, 1);
}

#[tokio::test]
async fn session_without_referral_produces_unattributed_record() {
    let env = setup().await;
    seed_profiles(&env.pool).await;
    let course_id = seed_course(&env.pool, 150.0).await;

    let view = env.sessions.start(course_id, None).await.unwrap();
    let session_id = view.id.clone();
    env.sessions
        .submit_details(
            &session_id,
            form(&[("full_name", "Omar"), ("phone", "0911222333")]),
            true,
        )
        .await
        .unwrap();

    let records = enrollment::find_by_instructor(&env.pool, "i1").await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].marketer_id.is_none());
    assert!(enrollment::find_by_marketer(&env.pool, "M1")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn duplicate_assignment_rejected_by_unique_constraint() {
    let env = setup().await;
    seed_profiles(&env.pool).await;
    let course_id = seed_course(&env.pool, 150.0).await;

    assignment::create(
        &env.pool,
        course_id,
        "i1",
        "M1",
        "Mona",
        "mona@example.com",
        "Intro to Data Science",
        10,
    )
    .await
    .unwrap();

    let err = assignment::create(
        &env.pool,
        course_id,
        "i1",
        "M1",
        "Mona",
        "mona@example.com",
        "Intro to Data Science",
        25,
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        enroll_server::db::repository::RepoError::Duplicate(_)
    ));

    // Revoke-then-recreate is the supported path for changing the rate
    let existing = assignment::find_by_course_and_marketer(&env.pool, course_id, "M1")
        .await
        .unwrap()
        .unwrap();
    assert!(assignment::delete(&env.pool, existing.id).await.unwrap());
    let recreated = assignment::create(
        &env.pool,
        course_id,
        "i1",
        "M1",
        "Mona",
        "mona@example.com",
        "Intro to Data Science",
        25,
    )
    .await
    .unwrap();
    assert_eq!(recreated.commission_rate, 25);
}

#[tokio::test]
async fn complete_payment_guards_against_non_reserved_records() {
    let env = setup().await;
    seed_profiles(&env.pool).await;
    let course_id = seed_course(&env.pool, 300.0).await;

    let view = env.sessions.start(course_id, None).await.unwrap();
    let session_id = view.id.clone();
    let view = env
        .sessions
        .submit_details(
            &session_id,
            form(&[("full_name", "Amna"), ("phone", "0912345678")]),
            true,
        )
        .await
        .unwrap();
    let record_id = view.record_id.unwrap();

    enrollment::complete_payment(&env.pool, record_id, PaymentMethod::Bank, None)
        .await
        .unwrap();

    // A second completion attempt finds the record no longer reserved
    let err = enrollment::complete_payment(&env.pool, record_id, PaymentMethod::Momo, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        enroll_server::db::repository::RepoError::Validation(_)
    ));

    let record = enrollment::find_by_id(&env.pool, record_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.payment, PaymentMethod::Bank);
}
