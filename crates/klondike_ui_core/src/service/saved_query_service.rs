//! Saved search query use-cases.
//!
//! # Responsibility
//! - Create, list and delete saved queries for the search bar.
//! - Keep callers decoupled from blob encoding and storage keys.
//!
//! # Invariants
//! - Names are trimmed; blank names are rejected before anything is stored.
//! - Deleting an unknown id is a no-op, not an error.

use crate::model::feature::{FeatureCard, FeatureFilter};
use crate::model::saved_query::SavedQuery;
use crate::storage::{BlobStore, StorageError, StorageResult};
use crate::store::{PersistedList, Subscription};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Blob key under which saved queries are stored by default.
pub const SAVED_QUERIES_STORAGE_KEY: &str = "klondike.saved_queries";

#[derive(Debug)]
pub enum SavedQueryError {
    EmptyName,
    Storage(StorageError),
}

impl Display for SavedQueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "saved query name must not be empty"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SavedQueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyName => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for SavedQueryError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

pub struct SavedQueryService {
    queries: PersistedList<SavedQuery>,
}

impl SavedQueryService {
    pub fn new(storage_key: impl Into<String>, blobs: Rc<dyn BlobStore>) -> Self {
        Self {
            queries: PersistedList::new(storage_key, blobs),
        }
    }

    /// Saves the current board filter under `name`.
    pub fn create(
        &self,
        name: &str,
        filters: FeatureFilter,
    ) -> Result<SavedQuery, SavedQueryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SavedQueryError::EmptyName);
        }

        let query = SavedQuery::new(name, filters);
        self.queries.append(query.clone())?;
        info!(
            "event=saved_query_create module=service status=ok id={}",
            query.id
        );
        Ok(query)
    }

    /// Deletes by id. Returns whether a query was removed.
    pub fn delete(&self, id: &str) -> StorageResult<bool> {
        let removed = self.queries.remove(id)?;
        info!(
            "event=saved_query_delete module=service status={} id={}",
            if removed { "ok" } else { "missing" },
            id
        );
        Ok(removed)
    }

    pub fn list(&self) -> Vec<SavedQuery> {
        self.queries.load_all()
    }

    pub fn get(&self, id: &str) -> Option<SavedQuery> {
        self.queries.find(id)
    }

    /// Cards matching the saved query `id`; `None` when the id is unknown.
    pub fn apply<'a>(&self, id: &str, cards: &'a [FeatureCard]) -> Option<Vec<&'a FeatureCard>> {
        let query = self.get(id)?;
        Some(
            cards
                .iter()
                .filter(|card| query.filters.matches(card))
                .collect(),
        )
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        self.queries.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::{SavedQueryError, SavedQueryService};
    use crate::model::feature::{FeatureCard, FeatureCategory, FeatureFilter, FeatureStatus};
    use crate::storage::MemoryBlobStore;
    use std::rc::Rc;

    fn service() -> SavedQueryService {
        SavedQueryService::new("test.saved_queries", Rc::new(MemoryBlobStore::new()))
    }

    #[test]
    fn create_rejects_blank_name() {
        let err = service()
            .create("   ", FeatureFilter::default())
            .expect_err("blank names must be rejected");
        assert!(matches!(err, SavedQueryError::EmptyName));
    }

    #[test]
    fn apply_filters_cards_with_stored_filter() {
        let service = service();
        let query = service
            .create(
                "Blocked",
                FeatureFilter {
                    status: Some(FeatureStatus::Blocked),
                    ..FeatureFilter::default()
                },
            )
            .expect("create");

        let cards = vec![
            FeatureCard {
                id: "F001".to_string(),
                description: "Login".to_string(),
                status: FeatureStatus::Blocked,
                category: FeatureCategory::Core,
                priority: 1,
            },
            FeatureCard {
                id: "F002".to_string(),
                description: "Export".to_string(),
                status: FeatureStatus::Verified,
                category: FeatureCategory::Api,
                priority: 3,
            },
        ];

        let hits = service.apply(&query.id, &cards).expect("known query");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "F001");
        assert!(service.apply("sq-missing", &cards).is_none());
    }
}
