//! Typed integer IDs.
//!
//! Documents are keyed by a store-assigned `BIGSERIAL`. Wrapping the raw
//! `i64` keeps document ids from being mixed up with counts, limits or any
//! other integer flowing through the handlers.
//!
//! ```rust
//! use approval_core::common::DocumentId;
//!
//! let id: DocumentId = "42".parse().unwrap();
//! assert_eq!(id.into_inner(), 42);
//! assert_eq!(id.to_string(), "42");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

/// Store-assigned identity of a document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct DocumentId(i64);

impl DocumentId {
    /// Wraps a raw database id.
    #[inline]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw `i64` for binding into queries.
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for DocumentId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}
