pub mod document;

pub use document::{Decision, Document, DocumentStatus};
