// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Which target statuses are legal is decided by the approval workflow, never here.
//
// Naming convention: Base* for trait names (e.g., BaseDocumentStore)

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::common::{DocumentId, Result};
use crate::domains::documents::models::{Document, DocumentStatus};

// =============================================================================
// Document Store Trait (Infrastructure - persistence boundary)
// =============================================================================

#[async_trait]
pub trait BaseDocumentStore: Send + Sync {
    /// Persist a new document. The store assigns id and timestamps and forces
    /// status to Pending.
    async fn create(&self, document_name: &str) -> Result<Document>;

    /// Snapshot of every document, newest first, ties broken by id descending.
    async fn list_all(&self) -> Result<Vec<Document>>;

    /// Point lookup. Fails with `ApprovalError::NotFound` for unknown ids.
    async fn find_by_id(&self, id: DocumentId) -> Result<Document>;

    /// All-or-nothing move of `ids` from Pending to `status`.
    ///
    /// Fails with NotFound (naming every missing id) or Conflict (naming the
    /// lowest id that is no longer Pending) without mutating anything.
    /// On success returns the updated documents ordered by id.
    async fn bulk_transition(
        &self,
        ids: &BTreeSet<DocumentId>,
        status: DocumentStatus,
        reason: &str,
    ) -> Result<Vec<Document>>;

    /// Liveness probe for the health route
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
