//! HTTP routes.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, Request, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use facultrack_auth::{ValidatedClaims, authorize};
use facultrack_core::error::FacultrackError;
use facultrack_core::models::inspection::InspectionStatus;
use facultrack_core::repository::{InspectionRepository, Pagination};
use facultrack_review::ReviewListing;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

const MAX_PAGE_SIZE: u64 = 200;

pub fn router<R: InspectionRepository + 'static>(state: Arc<AppState<R>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/admin/update-inspection", post(update_inspection::<R>))
        .route("/api/admin/inspections", get(list_inspections::<R>))
        .layer(middleware::from_fn(request_tracing))
        .with_state(state)
}

async fn request_tracing(request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!(
        "http.request",
        request_id = %request_id,
        method = %request.method(),
        route = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "app": "facultrack" }))
}

fn gate<R: InspectionRepository>(
    state: &AppState<R>,
    headers: &HeaderMap,
) -> Result<ValidatedClaims, ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    Ok(authorize(header, &state.auth)?)
}

#[derive(Debug, Deserialize)]
pub struct UpdateInspectionRequest {
    pub id: Option<Uuid>,
    pub status: Option<String>,
    /// Version of the record the reviewer acted on.
    pub version: Option<u64>,
    pub admin_comments: Option<String>,
}

async fn update_inspection<R: InspectionRepository>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
    payload: Result<Json<UpdateInspectionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let reviewer = gate(&state, &headers)?;

    let Json(request) =
        payload.map_err(|e| FacultrackError::validation(format!("invalid request body: {e}")))?;
    let (Some(id), Some(status)) = (request.id, request.status) else {
        return Err(FacultrackError::validation("missing inspection id or status").into());
    };
    let version = request
        .version
        .ok_or_else(|| FacultrackError::validation("missing inspection version"))?;
    let target: InspectionStatus = status.parse()?;

    let inspection = state
        .service
        .apply_review(&reviewer, id, version, target, request.admin_comments)
        .await?;

    Ok(Json(json!({
        "message": "Inspection updated successfully",
        "inspection": inspection,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ListInspectionsParams {
    pub staff_id: Option<Uuid>,
    pub department: Option<String>,
    pub status: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

async fn list_inspections<R: InspectionRepository>(
    State(state): State<Arc<AppState<R>>>,
    headers: HeaderMap,
    params: Result<Query<ListInspectionsParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let reviewer = gate(&state, &headers)?;

    let Query(params) =
        params.map_err(|e| FacultrackError::validation(format!("invalid query: {e}")))?;
    let status = params
        .status
        .as_deref()
        .map(str::parse::<InspectionStatus>)
        .transpose()?;
    let defaults = Pagination::default();
    let pagination = Pagination {
        offset: params.offset.unwrap_or(defaults.offset),
        limit: params.limit.unwrap_or(defaults.limit).clamp(1, MAX_PAGE_SIZE),
    };

    let page = state
        .service
        .list_for_review(
            &reviewer,
            ReviewListing {
                owner_id: params.staff_id,
                department: params.department,
                status,
            },
            pagination,
        )
        .await?;

    Ok(Json(json!({
        "items": page.items,
        "total": page.total,
        "offset": page.offset,
        "limit": page.limit,
    })))
}
