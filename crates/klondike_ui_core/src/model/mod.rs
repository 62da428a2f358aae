//! Domain data shared by dashboard views.
//!
//! # Responsibility
//! - Define persisted records (saved queries) and the board filter vocabulary.
//!
//! # Invariants
//! - Persisted records are identified by a stable string id.

pub mod feature;
pub mod saved_query;
