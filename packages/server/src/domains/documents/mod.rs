//! Documents domain - submission and the Pending → Approved/Rejected lifecycle

pub mod models;
pub mod workflow;

pub use models::{Decision, Document, DocumentStatus};
pub use workflow::{ApprovalWorkflow, DocumentWorkflow};
