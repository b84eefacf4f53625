//! Approval workflow - business rules over the document store
//!
//! Validation happens here, before the store is ever called. The store only
//! guarantees atomicity; which transitions are legal is decided here.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::common::{ApprovalError, DocumentId, Result};
use crate::domains::documents::models::{Decision, Document, DocumentStatus};
use crate::kernel::BaseDocumentStore;

#[async_trait]
pub trait ApprovalWorkflow: Send + Sync {
    /// Submit a new document for approval (always starts Pending)
    async fn submit(&self, document_name: &str) -> Result<Document>;

    /// All documents, newest first
    async fn list(&self) -> Result<Vec<Document>>;

    /// Single document; unknown ids fail with NotFound "document not found"
    async fn get(&self, id: DocumentId) -> Result<Document>;

    /// Approve or reject every listed document, or none of them
    async fn decide(
        &self,
        ids: &[DocumentId],
        status: &str,
        reason: &str,
    ) -> Result<Vec<Document>>;
}

/// The approval workflow over any [`BaseDocumentStore`]
#[derive(Clone)]
pub struct DocumentWorkflow {
    store: Arc<dyn BaseDocumentStore>,
}

impl DocumentWorkflow {
    pub fn new(store: Arc<dyn BaseDocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ApprovalWorkflow for DocumentWorkflow {
    async fn submit(&self, document_name: &str) -> Result<Document> {
        let document_name = document_name.trim();
        if document_name.is_empty() {
            return Err(ApprovalError::validation("document_name is required"));
        }

        info!(document_name = %document_name, "Submitting document");

        self.store.create(document_name).await
    }

    async fn list(&self) -> Result<Vec<Document>> {
        self.store.list_all().await
    }

    async fn get(&self, id: DocumentId) -> Result<Document> {
        match self.store.find_by_id(id).await {
            Err(ApprovalError::NotFound(_)) => {
                Err(ApprovalError::NotFound("document not found".to_string()))
            }
            other => other,
        }
    }

    async fn decide(
        &self,
        ids: &[DocumentId],
        status: &str,
        reason: &str,
    ) -> Result<Vec<Document>> {
        let decision: Decision = status.parse()?;

        if ids.is_empty() {
            return Err(ApprovalError::validation("document_ids must not be empty"));
        }

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ApprovalError::validation("reason is required"));
        }

        let ids: BTreeSet<DocumentId> = ids.iter().copied().collect();
        let target = DocumentStatus::from(decision);

        info!(count = ids.len(), status = %target, reason = %reason, "Deciding documents");

        let result = self.store.bulk_transition(&ids, target, reason).await;
        if let Err(ApprovalError::Conflict { id, status }) = &result {
            warn!(document_id = %id, current_status = %status, "Decision rejected, document already processed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::InMemoryDocumentStore;

    fn setup_workflow() -> DocumentWorkflow {
        DocumentWorkflow::new(Arc::new(InMemoryDocumentStore::new()))
    }

    fn ids(raw: &[i64]) -> Vec<DocumentId> {
        raw.iter().copied().map(DocumentId::new).collect()
    }

    #[tokio::test]
    async fn submit_creates_pending_document() {
        let workflow = setup_workflow();

        let document = workflow.submit("Contract A").await.unwrap();

        assert_eq!(document.id, DocumentId::new(1));
        assert_eq!(document.document_name, "Contract A");
        assert_eq!(document.status, DocumentStatus::Pending);
        assert_eq!(document.reason, None);
    }

    #[tokio::test]
    async fn submit_assigns_distinct_ids() {
        let workflow = setup_workflow();

        let mut seen = BTreeSet::new();
        for i in 0..20 {
            let document = workflow.submit(&format!("Doc {i}")).await.unwrap();
            assert!(seen.insert(document.id), "id {} issued twice", document.id);
        }
    }

    #[tokio::test]
    async fn submit_rejects_blank_names() {
        let workflow = setup_workflow();

        for name in ["", "   ", "\t\n"] {
            let err = workflow.submit(name).await.unwrap_err();
            assert!(matches!(err, ApprovalError::Validation(_)));
        }
        assert!(workflow.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let workflow = setup_workflow();
        workflow.submit("Contract A").await.unwrap();
        workflow.submit("Contract B").await.unwrap();

        let names: Vec<String> = workflow
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.document_name)
            .collect();

        assert_eq!(names, vec!["Contract B", "Contract A"]);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found_with_stable_message() {
        let workflow = setup_workflow();
        workflow.submit("Contract A").await.unwrap();

        let err = workflow.get(DocumentId::new(999)).await.unwrap_err();

        assert!(matches!(err, ApprovalError::NotFound(_)));
        assert_eq!(err.to_string(), "document not found");
    }

    #[tokio::test]
    async fn approve_pending_document() {
        let workflow = setup_workflow();
        workflow.submit("Contract A").await.unwrap();

        let decided = workflow.decide(&ids(&[1]), "APPROVED", "ok").await.unwrap();

        assert_eq!(decided.len(), 1);
        assert_eq!(decided[0].id, DocumentId::new(1));
        assert_eq!(decided[0].status, DocumentStatus::Approved);
        assert_eq!(decided[0].reason.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn deciding_twice_conflicts_and_keeps_first_decision() {
        let workflow = setup_workflow();
        workflow.submit("Contract A").await.unwrap();
        workflow.decide(&ids(&[1]), "APPROVED", "ok").await.unwrap();

        let err = workflow
            .decide(&ids(&[1]), "REJECTED", "x")
            .await
            .unwrap_err();

        match err {
            ApprovalError::Conflict { id, status } => {
                assert_eq!(id, DocumentId::new(1));
                assert_eq!(status, DocumentStatus::Approved);
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        let document = workflow.get(DocumentId::new(1)).await.unwrap();
        assert_eq!(document.status, DocumentStatus::Approved);
        assert_eq!(document.reason.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn pending_is_not_a_valid_decision() {
        let workflow = setup_workflow();
        workflow.submit("Contract A").await.unwrap();

        for status in ["PENDING", "INVALID", "approved", ""] {
            let err = workflow
                .decide(&ids(&[1]), status, "x")
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "invalid status");
        }

        let document = workflow.get(DocumentId::new(1)).await.unwrap();
        assert_eq!(document.status, DocumentStatus::Pending);
    }

    #[tokio::test]
    async fn invalid_status_wins_over_unknown_ids() {
        let workflow = setup_workflow();

        let err = workflow
            .decide(&ids(&[42]), "PENDING", "x")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "invalid status");
    }

    #[tokio::test]
    async fn decide_requires_ids_and_reason() {
        let workflow = setup_workflow();
        workflow.submit("Contract A").await.unwrap();

        let err = workflow.decide(&[], "APPROVED", "ok").await.unwrap_err();
        assert!(matches!(err, ApprovalError::Validation(_)));

        let err = workflow
            .decide(&ids(&[1]), "APPROVED", "  ")
            .await
            .unwrap_err();
        assert!(matches!(err, ApprovalError::Validation(_)));

        let document = workflow.get(DocumentId::new(1)).await.unwrap();
        assert_eq!(document.status, DocumentStatus::Pending);
    }

    #[tokio::test]
    async fn conflict_in_batch_leaves_every_document_unchanged() {
        let workflow = setup_workflow();
        for name in ["a", "b", "c"] {
            workflow.submit(name).await.unwrap();
        }
        workflow.decide(&ids(&[3]), "REJECTED", "no").await.unwrap();

        let err = workflow
            .decide(&ids(&[1, 2, 3]), "APPROVED", "ok")
            .await
            .unwrap_err();
        assert!(matches!(err, ApprovalError::Conflict { .. }));

        for id in [1, 2] {
            let document = workflow.get(DocumentId::new(id)).await.unwrap();
            assert_eq!(document.status, DocumentStatus::Pending);
            assert_eq!(document.reason, None);
        }
    }

    #[tokio::test]
    async fn unknown_id_in_batch_is_not_found_and_mutates_nothing() {
        let workflow = setup_workflow();
        workflow.submit("a").await.unwrap();

        let err = workflow
            .decide(&ids(&[1, 77]), "APPROVED", "ok")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "document not found: 77");

        let document = workflow.get(DocumentId::new(1)).await.unwrap();
        assert_eq!(document.status, DocumentStatus::Pending);
    }

    #[tokio::test]
    async fn duplicate_ids_are_collapsed() {
        let workflow = setup_workflow();
        workflow.submit("a").await.unwrap();
        workflow.submit("b").await.unwrap();

        let decided = workflow
            .decide(&ids(&[2, 1, 2]), "REJECTED", "dup")
            .await
            .unwrap();

        let decided_ids: Vec<i64> = decided.iter().map(|d| d.id.into_inner()).collect();
        assert_eq!(decided_ids, vec![1, 2]);
        assert!(decided.iter().all(|d| d.status == DocumentStatus::Rejected));
    }
}
