//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use approval_core::common::DocumentId;
use approval_core::domains::documents::models::Document;
use sqlx::PgPool;

/// Create `count` pending documents named `{prefix} {n}`, returning their ids in creation order
pub async fn create_pending_documents(
    pool: &PgPool,
    prefix: &str,
    count: usize,
) -> Result<Vec<DocumentId>> {
    let mut ids = Vec::with_capacity(count);
    for n in 0..count {
        let document = Document::create(&format!("{} {}", prefix, n), pool).await?;
        ids.push(document.id);
    }
    Ok(ids)
}

/// Read the current row straight from the table
pub async fn reload(pool: &PgPool, id: DocumentId) -> Result<Document> {
    Ok(Document::find_by_id(id, pool).await?)
}
