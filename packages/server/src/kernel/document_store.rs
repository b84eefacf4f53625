//! PostgreSQL-backed document store.
//!
//! Thin adapter from [`BaseDocumentStore`] onto the SQL in
//! `domains/documents/models`.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use crate::common::{ApprovalError, DocumentId, Result};
use crate::domains::documents::models::{Document, DocumentStatus};
use crate::kernel::BaseDocumentStore;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Document store over a shared connection pool.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseDocumentStore for PostgresDocumentStore {
    async fn create(&self, document_name: &str) -> Result<Document> {
        Document::create(document_name, &self.pool).await
    }

    async fn list_all(&self) -> Result<Vec<Document>> {
        Document::find_all(&self.pool).await
    }

    async fn find_by_id(&self, id: DocumentId) -> Result<Document> {
        Document::find_by_id(id, &self.pool).await
    }

    async fn bulk_transition(
        &self,
        ids: &BTreeSet<DocumentId>,
        status: DocumentStatus,
        reason: &str,
    ) -> Result<Vec<Document>> {
        Document::transition_pending(ids, status, reason, &self.pool).await
    }

    async fn health_check(&self) -> Result<()> {
        match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, Document::ping(&self.pool)).await {
            Ok(result) => result,
            Err(_) => {
                error!("Database health check timed out");
                Err(ApprovalError::Timeout)
            }
        }
    }
}
