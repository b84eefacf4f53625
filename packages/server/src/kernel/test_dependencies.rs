// TestDependencies - in-memory implementations for testing
//
// Provides a document store that can be injected in place of Postgres.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::BaseDocumentStore;
use crate::common::{ApprovalError, DocumentId, Result};
use crate::domains::documents::models::{Document, DocumentStatus};

// =============================================================================
// In-memory Document Store
// =============================================================================

#[derive(Default)]
struct StoreState {
    next_id: i64,
    last_timestamp: Option<DateTime<Utc>>,
    documents: BTreeMap<DocumentId, Document>,
}

impl StoreState {
    /// Wall clock, clamped so timestamps never go backwards.
    fn now(&mut self) -> DateTime<Utc> {
        let wall = Utc::now();
        let now = self.last_timestamp.map_or(wall, |last| last.max(wall));
        self.last_timestamp = Some(now);
        now
    }
}

/// Document store backed by a map behind one async mutex.
///
/// Every operation holds the lock for its whole duration, which makes each
/// bulk transition a single atomic step with respect to every other call.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    state: Mutex<StoreState>,
    delay: Option<Duration>,
    unhealthy: bool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep before every operation (simulates a slow database).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every health check as if the connection pool were closed.
    pub fn with_unhealthy(mut self) -> Self {
        self.unhealthy = true;
        self
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl BaseDocumentStore for InMemoryDocumentStore {
    async fn create(&self, document_name: &str) -> Result<Document> {
        self.pause().await;
        let mut state = self.state.lock().await;

        state.next_id += 1;
        let id = DocumentId::new(state.next_id);
        let now = state.now();
        let document = Document {
            id,
            document_name: document_name.to_string(),
            status: DocumentStatus::Pending,
            reason: None,
            created_at: now,
            updated_at: now,
        };
        state.documents.insert(id, document.clone());
        Ok(document)
    }

    async fn list_all(&self) -> Result<Vec<Document>> {
        self.pause().await;
        let state = self.state.lock().await;

        let mut documents: Vec<Document> = state.documents.values().cloned().collect();
        documents.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(documents)
    }

    async fn find_by_id(&self, id: DocumentId) -> Result<Document> {
        self.pause().await;
        let state = self.state.lock().await;

        state
            .documents
            .get(&id)
            .cloned()
            .ok_or_else(|| ApprovalError::missing(&[id]))
    }

    async fn bulk_transition(
        &self,
        ids: &BTreeSet<DocumentId>,
        status: DocumentStatus,
        reason: &str,
    ) -> Result<Vec<Document>> {
        self.pause().await;
        let mut state = self.state.lock().await;

        let missing: Vec<DocumentId> = ids
            .iter()
            .filter(|id| !state.documents.contains_key(*id))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(ApprovalError::missing(&missing));
        }

        if let Some(blocked) = ids
            .iter()
            .filter_map(|id| state.documents.get(id))
            .find(|d| !d.status.is_pending())
        {
            return Err(ApprovalError::Conflict {
                id: blocked.id,
                status: blocked.status,
            });
        }

        let now = state.now();
        let mut updated = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(document) = state.documents.get_mut(id) {
                document.status = status;
                document.reason = Some(reason.to_string());
                document.updated_at = now;
                updated.push(document.clone());
            }
        }
        Ok(updated)
    }

    async fn health_check(&self) -> Result<()> {
        if self.unhealthy {
            return Err(ApprovalError::Store(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}
