//! Key-combination canonicalization.
//!
//! # Invariants
//! - Modifier order and duplicates never change the normalized key.
//! - Key labels compare case-insensitively.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Physical or logical modifier key.
///
/// Declaration order is the lexicographic order of the names; `Ord` is
/// used directly when canonicalizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Alt,
    Ctrl,
    Meta,
    Shift,
}

impl Modifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alt => "alt",
            Self::Ctrl => "ctrl",
            Self::Meta => "meta",
            Self::Shift => "shift",
        }
    }
}

/// Canonical lookup key, e.g. `ctrl+shift+n`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NormalizedKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the canonical key for `key` held with `modifiers`.
///
/// Modifiers are deduplicated, sorted and joined with `+`, then prefixed to
/// the lower-cased key label.
pub fn normalize(key: &str, modifiers: &[Modifier]) -> NormalizedKey {
    let mut sorted = modifiers.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut normalized = String::new();
    for modifier in sorted {
        normalized.push_str(modifier.as_str());
        normalized.push('+');
    }
    normalized.push_str(&key.to_lowercase());
    NormalizedKey(normalized)
}

#[cfg(test)]
mod tests {
    use super::{normalize, Modifier};

    #[test]
    fn every_permutation_yields_same_key() {
        let set = [Modifier::Shift, Modifier::Ctrl, Modifier::Alt];
        let permutations = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        for order in permutations {
            let modifiers: Vec<Modifier> = order.iter().map(|index| set[*index]).collect();
            assert_eq!(normalize("k", &modifiers).as_str(), "alt+ctrl+shift+k");
        }
    }

    #[test]
    fn key_label_is_lowercased_and_duplicates_collapse() {
        let key = normalize("K", &[Modifier::Ctrl, Modifier::Ctrl]);
        assert_eq!(key.as_str(), "ctrl+k");
        assert_eq!(normalize("Escape", &[]).as_str(), "escape");
    }
}
