use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{ApprovalError, DocumentId, Result};

/// Document - the unit of approval (starts Pending, decided exactly once)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    pub id: DocumentId,
    pub document_name: String,
    pub status: DocumentStatus,
    /// Set if and only if status is not Pending
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Document status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "document_status", rename_all = "UPPERCASE")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub fn is_pending(self) -> bool {
        self == DocumentStatus::Pending
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Pending => write!(f, "PENDING"),
            DocumentStatus::Approved => write!(f, "APPROVED"),
            DocumentStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = ApprovalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PENDING" => Ok(DocumentStatus::Pending),
            "APPROVED" => Ok(DocumentStatus::Approved),
            "REJECTED" => Ok(DocumentStatus::Rejected),
            _ => Err(ApprovalError::validation("invalid status")),
        }
    }
}

/// Target of a decision. Only the terminal statuses are representable, so a
/// Pending→Pending transition cannot be requested at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl TryFrom<DocumentStatus> for Decision {
    type Error = ApprovalError;

    fn try_from(status: DocumentStatus) -> Result<Self> {
        match status {
            DocumentStatus::Approved => Ok(Decision::Approve),
            DocumentStatus::Rejected => Ok(Decision::Reject),
            DocumentStatus::Pending => Err(ApprovalError::validation("invalid status")),
        }
    }
}

impl From<Decision> for DocumentStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approve => DocumentStatus::Approved,
            Decision::Reject => DocumentStatus::Rejected,
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = ApprovalError;

    fn from_str(s: &str) -> Result<Self> {
        s.parse::<DocumentStatus>()?.try_into()
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Document {
    /// Insert a new document. Status is always PENDING, whatever the caller had in mind.
    pub async fn create(document_name: &str, pool: &PgPool) -> Result<Self> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (document_name, status)
            VALUES ($1, 'PENDING')
            RETURNING *
            "#,
        )
        .bind(document_name)
        .fetch_one(pool)
        .await?;
        Ok(document)
    }

    /// Find all documents, newest first (id breaks timestamp ties)
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(documents)
    }

    /// Find document by ID
    pub async fn find_by_id(id: DocumentId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApprovalError::missing(&[id]))
    }

    /// Move every listed document from PENDING to `status`, or none of them.
    ///
    /// Runs [`Document::transition_pending_in`] in its own transaction and
    /// commits only if every row moved.
    pub async fn transition_pending(
        ids: &BTreeSet<DocumentId>,
        status: DocumentStatus,
        reason: &str,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let mut tx = pool.begin().await?;

        match Self::transition_pending_in(ids, status, reason, &mut *tx).await {
            Ok(updated) => {
                tx.commit().await?;
                Ok(updated)
            }
            Err(err) => {
                tx.rollback().await?;
                Err(err)
            }
        }
    }

    /// Transition steps, run on a connection that is already inside a
    /// transaction:
    /// 1. lock the target rows (`FOR UPDATE`, id order so overlapping
    ///    requests queue on the same first row instead of deadlocking)
    /// 2. fail with NotFound if any id is missing, Conflict if any row has
    ///    already left PENDING
    /// 3. conditional UPDATE guarded by `status = 'PENDING'`; the affected
    ///    row count must match the number of ids
    ///
    /// `updated_at` takes `clock_timestamp()`, not `NOW()`. `NOW()` is frozen
    /// at transaction start and can predate rows the lock step sees.
    pub async fn transition_pending_in(
        ids: &BTreeSet<DocumentId>,
        status: DocumentStatus,
        reason: &str,
        conn: &mut PgConnection,
    ) -> Result<Vec<Self>> {
        let raw_ids: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let locked = sqlx::query_as::<_, (DocumentId, DocumentStatus)>(
            "SELECT id, status FROM documents WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(raw_ids.as_slice())
        .fetch_all(&mut *conn)
        .await?;

        let missing: Vec<DocumentId> = ids
            .iter()
            .filter(|id| !locked.iter().any(|(found, _)| found == *id))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(ApprovalError::missing(&missing));
        }

        if let Some((id, current)) = locked.iter().find(|(_, s)| !s.is_pending()) {
            return Err(ApprovalError::Conflict {
                id: *id,
                status: *current,
            });
        }

        let mut updated = sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents
            SET
                status = $2,
                reason = $3,
                updated_at = clock_timestamp()
            WHERE id = ANY($1) AND status = 'PENDING'
            RETURNING *
            "#,
        )
        .bind(raw_ids.as_slice())
        .bind(status)
        .bind(reason)
        .fetch_all(&mut *conn)
        .await?;

        // Unreachable while the row locks are held; guards the UPDATE predicate.
        if updated.len() != ids.len() {
            if let Some((id, current)) = locked
                .iter()
                .find(|(id, _)| !updated.iter().any(|d| d.id == *id))
            {
                return Err(ApprovalError::Conflict {
                    id: *id,
                    status: *current,
                });
            }
        }

        updated.sort_by_key(|d| d.id);
        Ok(updated)
    }

    /// Cheap round-trip used by the health check
    pub async fn ping(pool: &PgPool) -> Result<()> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
