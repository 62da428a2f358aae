//! Named collection persisted as one JSON blob.
//!
//! # Responsibility
//! - Load the collection from the blob store on first access.
//! - Write the whole list back and notify observers on every mutation.
//!
//! # Invariants
//! - Absent, unreadable or malformed blobs load as an empty list; the
//!   failure is logged and never returned to the caller.
//! - Insertion order is preserved; identity is `Identified::id`.
//! - A mutation reaches memory and observers only after its blob write
//!   succeeded; a failed write leaves the list unchanged.

use crate::storage::{BlobStore, StorageResult};
use crate::store::observable::{ObservableStore, Subscription};
use log::{debug, warn};
use once_cell::unsync::OnceCell;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;

/// Items stored in a `PersistedList` expose a stable identity.
pub trait Identified {
    fn id(&self) -> &str;
}

pub struct PersistedList<T> {
    storage_key: String,
    blobs: Rc<dyn BlobStore>,
    items: OnceCell<ObservableStore<Vec<T>>>,
}

impl<T> PersistedList<T>
where
    T: Identified + Clone + Serialize + DeserializeOwned + 'static,
{
    pub fn new(storage_key: impl Into<String>, blobs: Rc<dyn BlobStore>) -> Self {
        Self {
            storage_key: storage_key.into(),
            blobs,
            items: OnceCell::new(),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Returns all items in insertion order.
    pub fn load_all(&self) -> Vec<T> {
        self.store().get()
    }

    pub fn find(&self, id: &str) -> Option<T> {
        self.store()
            .with(|items| items.iter().find(|item| item.id() == id).cloned())
    }

    pub fn len(&self) -> usize {
        self.store().with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends `item`, persists the full list, then notifies observers.
    ///
    /// On a write error the list and its observers are left untouched.
    pub fn append(&self, item: T) -> StorageResult<()> {
        let mut next = self.load_all();
        next.push(item);
        self.commit(next)
    }

    /// Removes every entry with identity `id`.
    ///
    /// Returns `Ok(false)` without writing or notifying when nothing matched.
    pub fn remove(&self, id: &str) -> StorageResult<bool> {
        let current = self.load_all();
        let before = current.len();
        let next: Vec<T> = current.into_iter().filter(|item| item.id() != id).collect();
        if next.len() == before {
            return Ok(false);
        }
        self.commit(next)?;
        Ok(true)
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        self.store().subscribe(listener)
    }

    fn store(&self) -> &ObservableStore<Vec<T>> {
        self.items
            .get_or_init(|| ObservableStore::new(self.read_blob()))
    }

    fn commit(&self, next: Vec<T>) -> StorageResult<()> {
        if let Err(err) = self.write_blob(&next) {
            warn!(
                "event=persisted_list_write module=store status=error key={} error={}",
                self.storage_key, err
            );
            return Err(err);
        }
        self.store().set(next);
        Ok(())
    }

    fn write_blob(&self, items: &[T]) -> StorageResult<()> {
        let raw = serde_json::to_string(items)?;
        self.blobs.set(&self.storage_key, &raw)
    }

    fn read_blob(&self) -> Vec<T> {
        let raw = match self.blobs.get(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(
                    "event=persisted_list_load module=store status=empty key={}",
                    self.storage_key
                );
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=persisted_list_load module=store status=recovered key={} reason=read_failed error={}",
                    self.storage_key, err
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => {
                debug!(
                    "event=persisted_list_load module=store status=ok key={} count={}",
                    self.storage_key,
                    items.len()
                );
                items
            }
            Err(err) => {
                warn!(
                    "event=persisted_list_load module=store status=recovered key={} reason=malformed error={}",
                    self.storage_key, err
                );
                Vec::new()
            }
        }
    }
}
