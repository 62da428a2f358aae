//! Saved search query model.
//!
//! # Invariants
//! - `id` is generated once at creation and never reused.
//! - A saved query is immutable; the only mutation is deletion by id.

use crate::model::feature::FeatureFilter;
use crate::store::Identified;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const SAVED_QUERY_ID_PREFIX: &str = "sq-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub id: String,
    pub name: String,
    pub filters: FeatureFilter,
    /// Unix epoch milliseconds.
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

impl SavedQuery {
    /// Creates a query with a fresh id stamped with the current time.
    pub fn new(name: impl Into<String>, filters: FeatureFilter) -> Self {
        Self::with_id(
            format!("{SAVED_QUERY_ID_PREFIX}{}", Uuid::new_v4().simple()),
            name,
            filters,
            now_epoch_ms(),
        )
    }

    /// Creates a query with caller-provided identity, used by imports and
    /// fixtures.
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        filters: FeatureFilter,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            filters,
            created_at,
        }
    }
}

impl Identified for SavedQuery {
    fn id(&self) -> &str {
        &self.id
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
