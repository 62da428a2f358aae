//! Feature-card projection and board filters.
//!
//! # Responsibility
//! - Mirror the feature registry's status/category vocabulary.
//! - Define the filter object stored inside saved queries.
//!
//! # Invariants
//! - Wire spellings match the feature registry (`not-started`, `ui`, ...).
//! - An empty filter matches every card.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureStatus {
    NotStarted,
    InProgress,
    Blocked,
    Verified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureCategory {
    Core,
    Ui,
    Api,
    Testing,
    Infrastructure,
    Docs,
    Security,
    Performance,
}

/// Minimal board-card view of one feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCard {
    /// Feature id, e.g. `F001`.
    pub id: String,
    pub description: String,
    pub status: FeatureStatus,
    pub category: FeatureCategory,
    /// 1 is most urgent.
    pub priority: u8,
}

/// Board filter persisted inside a saved query.
///
/// Every field is optional; set fields must all match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFilter {
    pub status: Option<FeatureStatus>,
    pub category: Option<FeatureCategory>,
    /// Case-insensitive substring of id or description.
    pub search: Option<String>,
    /// Accept cards with `priority <= max_priority`.
    pub max_priority: Option<u8>,
}

impl FeatureFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, card: &FeatureCard) -> bool {
        if self.status.is_some_and(|status| status != card.status) {
            return false;
        }
        if self
            .category
            .is_some_and(|category| category != card.category)
        {
            return false;
        }
        if self
            .max_priority
            .is_some_and(|max_priority| card.priority > max_priority)
        {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                card.id.to_lowercase().contains(&needle)
                    || card.description.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FeatureCard, FeatureCategory, FeatureFilter, FeatureStatus};

    fn card() -> FeatureCard {
        FeatureCard {
            id: "F012".to_string(),
            description: "Keyboard shortcuts for the board".to_string(),
            status: FeatureStatus::InProgress,
            category: FeatureCategory::Ui,
            priority: 2,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = FeatureFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&card()));
    }

    #[test]
    fn all_set_fields_must_match() {
        let filter = FeatureFilter {
            status: Some(FeatureStatus::InProgress),
            category: Some(FeatureCategory::Ui),
            search: Some("  SHORTCUT ".to_string()),
            max_priority: Some(2),
        };
        assert!(filter.matches(&card()));

        let wrong_status = FeatureFilter {
            status: Some(FeatureStatus::Verified),
            ..filter.clone()
        };
        assert!(!wrong_status.matches(&card()));

        let too_urgent_only = FeatureFilter {
            max_priority: Some(1),
            ..filter
        };
        assert!(!too_urgent_only.matches(&card()));
    }

    #[test]
    fn uses_registry_wire_spellings() {
        let json = serde_json::to_string(&FeatureFilter {
            status: Some(FeatureStatus::NotStarted),
            category: Some(FeatureCategory::Infrastructure),
            ..FeatureFilter::default()
        })
        .expect("serialize filter");
        assert!(json.contains("\"not-started\""));
        assert!(json.contains("\"infrastructure\""));

        let parsed: FeatureFilter =
            serde_json::from_str(r#"{"status":"blocked","unknown":1}"#).expect("lenient parse");
        assert_eq!(parsed.status, Some(FeatureStatus::Blocked));
    }
}
