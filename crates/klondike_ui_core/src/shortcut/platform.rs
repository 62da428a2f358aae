//! Platform-dependent modifier policy and shortcut labels.
//!
//! # Responsibility
//! - Fold ctrl/meta into one logical modifier when cross-platform parity is
//!   enabled.
//! - Render human-readable shortcut labels per platform family.
//!
//! # Invariants
//! - Labels are for display only; matching always goes through `normalize`.

use crate::shortcut::key::Modifier;
use serde::{Deserialize, Serialize};

/// Host platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    /// Platform of the build target.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    pub fn uses_symbol_labels(self) -> bool {
        matches!(self, Self::MacOs)
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformPolicy {
    pub platform: Platform,
    /// Treat meta (Cmd/Win) as ctrl so one binding serves every platform.
    pub collapse_ctrl_meta: bool,
}

impl PlatformPolicy {
    pub fn new(platform: Platform, collapse_ctrl_meta: bool) -> Self {
        Self {
            platform,
            collapse_ctrl_meta,
        }
    }

    /// Current platform with ctrl/meta collapsing enabled.
    pub fn detect() -> Self {
        Self::new(Platform::current(), true)
    }

    /// Maps physical modifiers to the logical set used for matching.
    pub fn fold(&self, modifiers: &[Modifier]) -> Vec<Modifier> {
        let mut folded: Vec<Modifier> = modifiers
            .iter()
            .map(|modifier| match modifier {
                Modifier::Meta if self.collapse_ctrl_meta => Modifier::Ctrl,
                other => *other,
            })
            .collect();
        folded.sort_unstable();
        folded.dedup();
        folded
    }

    /// Formats `key` + `modifiers` for display, e.g. `⌘⇧N` or `Ctrl+Shift+N`.
    pub fn format_shortcut(&self, key: &str, modifiers: &[Modifier]) -> String {
        let folded = self.fold(modifiers);
        let ordered = [Modifier::Ctrl, Modifier::Alt, Modifier::Shift, Modifier::Meta]
            .into_iter()
            .filter(|modifier| folded.contains(modifier));
        let key_label = key_label(key);

        if self.platform.uses_symbol_labels() {
            let mut label: String = ordered.map(|modifier| self.symbol(modifier)).collect();
            label.push_str(&key_label);
            label
        } else {
            let mut parts: Vec<String> = ordered
                .map(|modifier| text_label(modifier).to_string())
                .collect();
            parts.push(key_label);
            parts.join("+")
        }
    }

    fn symbol(&self, modifier: Modifier) -> &'static str {
        match modifier {
            Modifier::Ctrl if self.collapse_ctrl_meta => "⌘",
            Modifier::Ctrl => "⌃",
            Modifier::Alt => "⌥",
            Modifier::Shift => "⇧",
            Modifier::Meta => "⌘",
        }
    }
}

impl Default for PlatformPolicy {
    fn default() -> Self {
        Self::detect()
    }
}

/// Free-function form of [`PlatformPolicy::format_shortcut`].
pub fn format_shortcut(policy: &PlatformPolicy, key: &str, modifiers: &[Modifier]) -> String {
    policy.format_shortcut(key, modifiers)
}

fn text_label(modifier: Modifier) -> &'static str {
    match modifier {
        Modifier::Alt => "Alt",
        Modifier::Ctrl => "Ctrl",
        Modifier::Meta => "Meta",
        Modifier::Shift => "Shift",
    }
}

fn key_label(key: &str) -> String {
    match key {
        " " => return "Space".to_string(),
        "Escape" | "escape" | "Esc" | "esc" => return "Esc".to_string(),
        "ArrowUp" => return "↑".to_string(),
        "ArrowDown" => return "↓".to_string(),
        "ArrowLeft" => return "←".to_string(),
        "ArrowRight" => return "→".to_string(),
        _ => {}
    }

    let mut chars = key.chars();
    match chars.next() {
        Some(first) if chars.as_str().is_empty() => first.to_uppercase().collect(),
        Some(first) => {
            let mut label: String = first.to_uppercase().collect();
            label.push_str(chars.as_str());
            label
        }
        None => String::new(),
    }
}
