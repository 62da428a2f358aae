//! Global key-event dispatcher.
//!
//! # Responsibility
//! - Turn raw key presses into normalized keys and run matching handlers.
//! - Enforce editable-context suppression.
//! - Own the help-overlay visibility flag and its `Escape` rule.
//!
//! # Invariants
//! - In an editable target only `Escape` is resolved.
//! - Shift is ignored for single printable symbols (`?` stays `?`, never
//!   `shift+/`).
//! - Handlers run synchronously inside `dispatch`; their panics are not
//!   caught here.

use crate::shortcut::key::Modifier;
use crate::shortcut::registry::ShortcutRegistry;
use crate::store::ObservableStore;
use log::{debug, trace};

pub const ESCAPE_KEY: &str = "Escape";

/// Raw key press as delivered by the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
    pub target_is_editable: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn in_editable(mut self) -> Self {
        self.target_is_editable = true;
        self
    }

    pub fn is_escape(&self) -> bool {
        self.key.eq_ignore_ascii_case(ESCAPE_KEY) || self.key.eq_ignore_ascii_case("esc")
    }
}

/// What `dispatch` did with one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No shortcut matched.
    Ignored,
    /// Editable target; resolution skipped.
    Suppressed,
    /// `Escape` closed the help overlay and nothing else matched.
    ClosedHelp,
    /// A registered handler ran.
    Handled,
}

impl DispatchOutcome {
    pub fn prevent_default(self) -> bool {
        matches!(self, Self::Handled | Self::ClosedHelp)
    }

    pub fn stop_propagation(self) -> bool {
        matches!(self, Self::Handled | Self::ClosedHelp)
    }
}

#[derive(Clone)]
pub struct ShortcutDispatcher {
    registry: ShortcutRegistry,
    help_visible: ObservableStore<bool>,
}

impl ShortcutDispatcher {
    pub fn new(registry: ShortcutRegistry) -> Self {
        Self {
            registry,
            help_visible: ObservableStore::new(false),
        }
    }

    pub fn registry(&self) -> &ShortcutRegistry {
        &self.registry
    }

    pub fn help_visible(&self) -> &ObservableStore<bool> {
        &self.help_visible
    }

    pub fn toggle_help(&self) {
        let visible = self.help_visible.get();
        self.help_visible.set(!visible);
    }

    /// Physical modifier set of `event`, before platform folding.
    pub fn event_modifiers(event: &KeyEvent) -> Vec<Modifier> {
        let mut modifiers = Vec::with_capacity(4);
        if event.ctrl {
            modifiers.push(Modifier::Ctrl);
        }
        if event.meta {
            modifiers.push(Modifier::Meta);
        }
        if event.alt {
            modifiers.push(Modifier::Alt);
        }
        if event.shift && !is_printable_symbol(&event.key) {
            modifiers.push(Modifier::Shift);
        }
        modifiers
    }

    pub fn dispatch(&self, event: &KeyEvent) -> DispatchOutcome {
        let is_escape = event.is_escape();
        if event.target_is_editable && !is_escape {
            trace!(
                "event=shortcut_dispatch module=shortcut status=suppressed key={}",
                event.key
            );
            return DispatchOutcome::Suppressed;
        }

        let closed_help = is_escape && self.help_visible.get();
        if closed_help {
            self.help_visible.set(false);
        }

        let key = if is_escape { ESCAPE_KEY } else { event.key.as_str() };
        let normalized = self
            .registry
            .normalize(key, &Self::event_modifiers(event));
        match self.registry.resolve_normalized(&normalized) {
            Some(handler) => {
                debug!(
                    "event=shortcut_dispatch module=shortcut status=handled key={}",
                    normalized
                );
                handler();
                DispatchOutcome::Handled
            }
            None if closed_help => DispatchOutcome::ClosedHelp,
            None => DispatchOutcome::Ignored,
        }
    }
}

fn is_printable_symbol(key: &str) -> bool {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => !c.is_alphanumeric() && !c.is_whitespace() && !c.is_control(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_printable_symbol, KeyEvent, ShortcutDispatcher};
    use crate::shortcut::key::Modifier;

    #[test]
    fn printable_symbol_detection() {
        assert!(is_printable_symbol("?"));
        assert!(is_printable_symbol("!"));
        assert!(!is_printable_symbol("N"));
        assert!(!is_printable_symbol("7"));
        assert!(!is_printable_symbol(" "));
        assert!(!is_printable_symbol("Escape"));
    }

    #[test]
    fn shift_dropped_only_for_symbols() {
        let question = KeyEvent::new("?").with_shift();
        assert!(ShortcutDispatcher::event_modifiers(&question).is_empty());

        let letter = KeyEvent::new("N").with_ctrl().with_shift();
        assert_eq!(
            ShortcutDispatcher::event_modifiers(&letter),
            vec![Modifier::Ctrl, Modifier::Shift]
        );
    }
}
