//! In-process tests of the HTTP surface against in-memory SurrealDB.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, NaiveDate, Utc};
use facultrack_auth::AuthConfig;
use facultrack_auth::token::{issue_credential, issue_credential_at};
use facultrack_core::models::identity::{Owner, ReviewerRole};
use facultrack_core::models::inspection::Inspection;
use facultrack_db::repository::SurrealInspectionRepository;
use facultrack_review::{InspectionDraft, InspectionService};
use facultrack_server::{AppState, router};
use serde_json::{Value, json};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use tower::ServiceExt;
use uuid::Uuid;

type State = Arc<AppState<SurrealInspectionRepository<Db>>>;

fn test_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "api-test-secret".into(),
        credential_lifetime_secs: 3600,
        jwt_issuer: "facultrack-test".into(),
    }
}

async fn setup() -> (State, Router) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    facultrack_db::run_migrations(&db).await.unwrap();

    let state = Arc::new(AppState {
        service: InspectionService::new(SurrealInspectionRepository::new(db)),
        auth: test_config(),
    });
    let app = router(state.clone());
    (state, app)
}

/// Create a submitted inspection owned by a CSE staff member.
async fn submitted_inspection(state: &State) -> Inspection {
    let owner = Owner {
        staff_id: Uuid::new_v4(),
        department: "CSE".into(),
    };
    let created = state
        .service
        .create(
            &owner,
            InspectionDraft {
                date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
                findings: "Lab logbook incomplete".into(),
                corrective_action: "Logbook completed".into(),
                remarks: String::new(),
                hod_signature_url: None,
                dean_signature_url: None,
            },
        )
        .await
        .unwrap();
    state
        .service
        .submit(&owner, created.id, created.version)
        .await
        .unwrap()
}

fn bearer(role: ReviewerRole, department: Option<&str>) -> String {
    let token = issue_credential("reviewer", role, department, &test_config()).unwrap();
    format!("Bearer {token}")
}

async fn post_update(app: Router, auth: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri("/api/admin/update-inspection")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        request = request.header(header::AUTHORIZATION, auth);
    }
    let response = app
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_healthy() {
    let (_state, app) = setup().await;
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn hod_approval_through_endpoint() {
    let (state, app) = setup().await;
    let record = submitted_inspection(&state).await;
    let auth = bearer(ReviewerRole::Supervisor, Some("CSE"));

    let (status, body) = post_update(
        app,
        Some(&auth),
        json!({ "id": record.id, "status": "HOD Approved", "version": record.version }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Inspection updated successfully");
    assert_eq!(body["inspection"]["status"], "HOD Approved");
}

#[tokio::test]
async fn return_with_comment_through_endpoint() {
    let (state, app) = setup().await;
    let record = submitted_inspection(&state).await;
    let auth = bearer(ReviewerRole::Officer, None);

    let (status, body) = post_update(
        app,
        Some(&auth),
        json!({
            "id": record.id,
            "status": "Returned",
            "version": record.version,
            "admin_comments": "fix dates",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["inspection"]["status"], "Returned");
    assert_eq!(body["inspection"]["reviewer_note"], "fix dates");
}

#[tokio::test]
async fn missing_credential_is_unauthorized() {
    let (state, app) = setup().await;
    let record = submitted_inspection(&state).await;

    let (status, body) = post_update(
        app,
        None,
        json!({ "id": record.id, "status": "HOD Approved", "version": record.version }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn expired_credential_is_unauthorized() {
    let (state, app) = setup().await;
    let record = submitted_inspection(&state).await;
    let token = issue_credential_at(
        "reviewer",
        ReviewerRole::Officer,
        None,
        &test_config(),
        Utc::now() - Duration::hours(2),
    )
    .unwrap();
    let auth = format!("Bearer {token}");

    let (status, _) = post_update(
        app,
        Some(&auth),
        json!({ "id": record.id, "status": "HOD Approved", "version": record.version }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn error_statuses_are_distinguishable() {
    let (state, app) = setup().await;
    let record = submitted_inspection(&state).await;
    let officer = bearer(ReviewerRole::Officer, None);
    let ece_hod = bearer(ReviewerRole::Supervisor, Some("ECE"));

    let cases = [
        (
            officer.as_str(),
            json!({ "id": record.id, "status": "Returned", "version": record.version }),
            StatusCode::BAD_REQUEST,
        ),
        (
            officer.as_str(),
            json!({ "status": "HOD Approved", "version": 1 }),
            StatusCode::BAD_REQUEST,
        ),
        (
            officer.as_str(),
            json!({ "id": record.id, "status": "Approved", "version": record.version }),
            StatusCode::BAD_REQUEST,
        ),
        (
            officer.as_str(),
            json!({ "id": Uuid::new_v4(), "status": "HOD Approved", "version": 1 }),
            StatusCode::NOT_FOUND,
        ),
        (
            officer.as_str(),
            json!({ "id": record.id, "status": "Dean Approved", "version": record.version }),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            officer.as_str(),
            json!({ "id": record.id, "status": "HOD Approved", "version": record.version + 5 }),
            StatusCode::CONFLICT,
        ),
        (
            ece_hod.as_str(),
            json!({ "id": record.id, "status": "HOD Approved", "version": record.version }),
            StatusCode::FORBIDDEN,
        ),
    ];

    for (auth, body, expected) in cases {
        let (status, response) = post_update(app.clone(), Some(auth), body.clone()).await;
        assert_eq!(status, expected, "{body} -> {response}");
        assert!(response["error"]["message"].is_string());
    }
}

#[tokio::test]
async fn listing_requires_credential_and_respects_scope() {
    let (state, app) = setup().await;
    submitted_inspection(&state).await;

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/admin/inspections")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::get("/api/admin/inspections?status=Submitted")
                .header(header::AUTHORIZATION, bearer(ReviewerRole::Supervisor, Some("CSE")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["department"], "CSE");
}
