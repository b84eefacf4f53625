// Document Approval Service - API Core
//
// Documents are submitted as Pending and later approved or rejected in
// all-or-nothing batches. Layout follows the domain-driven split used across
// the server: common types, domain models and rules, infrastructure kernel,
// and the HTTP adapter.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
