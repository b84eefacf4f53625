//! Document approval routes.
//!
//! Each handler decodes the request into a typed workflow call, runs it under
//! the per-request deadline, and encodes the result or [`ApiError`].

use std::future::Future;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::common::{ApprovalError, DocumentId};
use crate::domains::documents::models::Document;
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateDocumentInput {
    #[serde(default)]
    pub document_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    #[serde(default)]
    pub document_ids: Vec<i64>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: String,
}

/// Routes relative to the `/doc_v1` prefix
pub fn document_routes() -> Router {
    Router::new()
        .route("/doc/create", post(create_document))
        .route("/doc", get(list_documents))
        .route("/doc/:id", get(get_document))
        .route("/doc/update-status", put(update_status))
}

/// Abort the in-flight store call once the deadline passes
async fn with_deadline<T, F>(limit: Duration, operation: F) -> Result<T, ApprovalError>
where
    F: Future<Output = Result<T, ApprovalError>>,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| ApprovalError::Timeout)?
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

pub async fn create_document(
    Extension(state): Extension<AppState>,
    payload: Result<Json<CreateDocumentInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let input = parse_body(payload)?;

    let document = with_deadline(
        state.request_timeout,
        state.workflow.submit(&input.document_name),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn list_documents(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let documents = with_deadline(state.request_timeout, state.workflow.list()).await?;
    Ok(Json(documents))
}

pub async fn get_document(
    Extension(state): Extension<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let id: DocumentId = raw_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid document ID"))?;

    let document = with_deadline(state.request_timeout, state.workflow.get(id)).await?;
    Ok(Json(document))
}

pub async fn update_status(
    Extension(state): Extension<AppState>,
    payload: Result<Json<UpdateStatusInput>, JsonRejection>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let input = parse_body(payload)?;
    let ids: Vec<DocumentId> = input.document_ids.into_iter().map(DocumentId::new).collect();

    let documents = with_deadline(
        state.request_timeout,
        state.workflow.decide(&ids, &input.status, &input.reason),
    )
    .await
    .map_err(ApiError::from_decision)?;

    Ok(Json(documents))
}
