//! Kernel module - server infrastructure and dependencies.

pub mod document_store;
pub mod test_dependencies;
pub mod traits;

pub use document_store::PostgresDocumentStore;
pub use test_dependencies::InMemoryDocumentStore;
pub use traits::*;
