//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::documents::{ApprovalWorkflow, DocumentWorkflow};
use crate::kernel::BaseDocumentStore;
use crate::server::routes::{document_routes, health_handler};

/// Request bodies larger than this are rejected before reaching a handler
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<dyn ApprovalWorkflow>,
    pub store: Arc<dyn BaseDocumentStore>,
    /// Deadline applied to every workflow call
    pub request_timeout: Duration,
}

impl AppState {
    /// Wire the approval workflow on top of `store`
    pub fn new(store: Arc<dyn BaseDocumentStore>, request_timeout: Duration) -> Self {
        Self {
            workflow: Arc::new(DocumentWorkflow::new(store.clone())),
            store,
            request_timeout,
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    // CORS configuration - allow any origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .nest("/doc_v1", document_routes())
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
