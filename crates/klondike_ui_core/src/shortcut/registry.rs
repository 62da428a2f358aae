//! Shortcut registry keyed by normalized key combination.
//!
//! # Responsibility
//! - Map normalized keys to handlers plus display metadata.
//! - Expose the table as an observable store for help/palette views.
//!
//! # Invariants
//! - Last registration for a normalized key wins.
//! - A `ShortcutRegistration` only removes the entry it created; a stale
//!   unregister after a newer registration is a no-op.
//! - Modifiers pass through the registry's `PlatformPolicy` before
//!   normalization on both register and resolve paths.

use crate::shortcut::key::{normalize, Modifier, NormalizedKey};
use crate::shortcut::platform::PlatformPolicy;
use crate::store::{ObservableStore, Subscription};
use log::debug;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

pub type ShortcutHandler = Rc<dyn Fn()>;

/// Display grouping for shortcut sheets.
///
/// Variant order is the display order: Navigation, Actions, Help, then any
/// other category alphabetically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShortcutCategory {
    Navigation,
    Actions,
    Help,
    Other(String),
}

impl ShortcutCategory {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Navigation" => Self::Navigation,
            "Actions" => Self::Actions,
            "Help" => Self::Help,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Navigation => "Navigation",
            Self::Actions => "Actions",
            Self::Help => "Help",
            Self::Other(label) => label,
        }
    }
}

/// Key combination plus display metadata supplied by the registering region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutSpec {
    pub key: String,
    pub modifiers: Vec<Modifier>,
    pub description: String,
    pub category: ShortcutCategory,
}

impl ShortcutSpec {
    pub fn new(
        key: impl Into<String>,
        modifiers: &[Modifier],
        description: impl Into<String>,
        category: ShortcutCategory,
    ) -> Self {
        Self {
            key: key.into(),
            modifiers: modifiers.to_vec(),
            description: description.into(),
            category,
        }
    }
}

/// One live registry row.
#[derive(Clone)]
pub struct ShortcutEntry {
    pub normalized_key: NormalizedKey,
    pub spec: ShortcutSpec,
    registration_id: u64,
    handler: ShortcutHandler,
}

impl ShortcutEntry {
    pub fn handler(&self) -> ShortcutHandler {
        Rc::clone(&self.handler)
    }
}

impl Debug for ShortcutEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutEntry")
            .field("normalized_key", &self.normalized_key)
            .field("spec", &self.spec)
            .field("registration_id", &self.registration_id)
            .finish_non_exhaustive()
    }
}

type ShortcutTable = BTreeMap<NormalizedKey, ShortcutEntry>;

/// Shortcut row prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutInfo {
    pub normalized_key: NormalizedKey,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutGroup {
    pub category: ShortcutCategory,
    pub entries: Vec<ShortcutInfo>,
}

/// Shared handle to the shortcut table.
#[derive(Clone)]
pub struct ShortcutRegistry {
    policy: PlatformPolicy,
    table: ObservableStore<ShortcutTable>,
    next_registration_id: Rc<Cell<u64>>,
}

impl ShortcutRegistry {
    pub fn new(policy: PlatformPolicy) -> Self {
        Self {
            policy,
            table: ObservableStore::new(BTreeMap::new()),
            next_registration_id: Rc::new(Cell::new(1)),
        }
    }

    pub fn policy(&self) -> PlatformPolicy {
        self.policy
    }

    /// Canonical key after applying the platform policy.
    pub fn normalize(&self, key: &str, modifiers: &[Modifier]) -> NormalizedKey {
        normalize(key, &self.policy.fold(modifiers))
    }

    /// Inserts or replaces the entry for `spec`'s normalized key.
    pub fn register(
        &self,
        spec: ShortcutSpec,
        handler: impl Fn() + 'static,
    ) -> ShortcutRegistration {
        let normalized_key = self.normalize(&spec.key, &spec.modifiers);
        let registration_id = self.next_registration_id.get();
        self.next_registration_id.set(registration_id + 1);

        let entry = ShortcutEntry {
            normalized_key: normalized_key.clone(),
            spec,
            registration_id,
            handler: Rc::new(handler),
        };
        let mut replaced = false;
        self.table.update(|table| {
            replaced = table.insert(normalized_key.clone(), entry).is_some();
            true
        });
        debug!(
            "event=shortcut_register module=shortcut status=ok key={} registration_id={} replaced={}",
            normalized_key, registration_id, replaced
        );

        ShortcutRegistration {
            table: self.table.clone(),
            normalized_key,
            registration_id,
        }
    }

    /// Pure lookup by raw key and modifiers.
    pub fn resolve(&self, key: &str, modifiers: &[Modifier]) -> Option<ShortcutHandler> {
        self.resolve_normalized(&self.normalize(key, modifiers))
    }

    pub fn resolve_normalized(&self, normalized_key: &NormalizedKey) -> Option<ShortcutHandler> {
        self.table
            .with(|table| table.get(normalized_key).map(ShortcutEntry::handler))
    }

    pub fn entries(&self) -> Vec<ShortcutEntry> {
        self.table.with(|table| table.values().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.table.with(BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries grouped by category in display order.
    pub fn list(&self) -> Vec<ShortcutGroup> {
        let mut groups: BTreeMap<ShortcutCategory, Vec<ShortcutInfo>> = BTreeMap::new();
        self.table.with(|table| {
            for entry in table.values() {
                groups
                    .entry(entry.spec.category.clone())
                    .or_default()
                    .push(ShortcutInfo {
                        normalized_key: entry.normalized_key.clone(),
                        label: self
                            .policy
                            .format_shortcut(&entry.spec.key, &entry.spec.modifiers),
                        description: entry.spec.description.clone(),
                    });
            }
        });

        groups
            .into_iter()
            .map(|(category, entries)| ShortcutGroup { category, entries })
            .collect()
    }

    pub fn revision(&self) -> u64 {
        self.table.revision()
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        self.table.subscribe(listener)
    }
}

impl Debug for ShortcutRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutRegistry")
            .field("policy", &self.policy)
            .field("len", &self.len())
            .finish()
    }
}

/// Capability returned by [`ShortcutRegistry::register`].
pub struct ShortcutRegistration {
    table: ObservableStore<ShortcutTable>,
    normalized_key: NormalizedKey,
    registration_id: u64,
}

impl ShortcutRegistration {
    pub fn normalized_key(&self) -> &NormalizedKey {
        &self.normalized_key
    }

    /// Whether the registry still holds this registration's handler.
    pub fn is_current(&self) -> bool {
        self.table.with(|table| {
            table
                .get(&self.normalized_key)
                .is_some_and(|entry| entry.registration_id == self.registration_id)
        })
    }

    /// Removes the entry if it is still this registration's.
    ///
    /// Returns whether anything was removed. Safe to call any number of times.
    pub fn unregister(&self) -> bool {
        let removed = self.table.update(|table| {
            let owned = table
                .get(&self.normalized_key)
                .is_some_and(|entry| entry.registration_id == self.registration_id);
            if owned {
                table.remove(&self.normalized_key);
            }
            owned
        });
        debug!(
            "event=shortcut_unregister module=shortcut status={} key={} registration_id={}",
            if removed { "ok" } else { "stale" },
            self.normalized_key,
            self.registration_id
        );
        removed
    }
}

impl Debug for ShortcutRegistration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutRegistration")
            .field("normalized_key", &self.normalized_key)
            .field("registration_id", &self.registration_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ShortcutCategory, ShortcutRegistry, ShortcutSpec};
    use crate::shortcut::key::Modifier;
    use crate::shortcut::platform::{Platform, PlatformPolicy};

    fn registry() -> ShortcutRegistry {
        ShortcutRegistry::new(PlatformPolicy::new(Platform::Linux, true))
    }

    #[test]
    fn meta_and_ctrl_registrations_share_one_slot() {
        let registry = registry();
        let _ctrl = registry.register(
            ShortcutSpec::new("k", &[Modifier::Ctrl], "palette", ShortcutCategory::Navigation),
            || {},
        );
        let meta = registry.register(
            ShortcutSpec::new("K", &[Modifier::Meta], "palette", ShortcutCategory::Navigation),
            || {},
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(meta.normalized_key().as_str(), "ctrl+k");
        assert!(registry.resolve("k", &[Modifier::Ctrl]).is_some());
    }

    #[test]
    fn list_orders_known_categories_first_then_alphabetical() {
        let registry = registry();
        let specs = [
            ("z", ShortcutCategory::Other("Zoom".to_string())),
            ("?", ShortcutCategory::Help),
            ("b", ShortcutCategory::Other("Board".to_string())),
            ("n", ShortcutCategory::Actions),
            ("g", ShortcutCategory::Navigation),
        ];
        for (key, category) in specs {
            let _registration = registry.register(ShortcutSpec::new(key, &[], key, category), || {});
        }

        let labels: Vec<String> = registry
            .list()
            .into_iter()
            .map(|group| group.category.label().to_string())
            .collect();
        assert_eq!(labels, vec!["Navigation", "Actions", "Help", "Board", "Zoom"]);
    }

    #[test]
    fn category_from_label_recognizes_builtin_names() {
        assert_eq!(ShortcutCategory::from_label("Help"), ShortcutCategory::Help);
        assert_eq!(
            ShortcutCategory::from_label("Board"),
            ShortcutCategory::Other("Board".to_string())
        );
    }
}
