//! Keyboard shortcut registry and global dispatcher.
//!
//! # Responsibility
//! - Canonicalize key combinations independent of modifier order.
//! - Resolve key presses to handlers with last-registration-wins semantics.
//! - Keep platform-specific modifier handling in one policy object.

pub mod dispatcher;
pub mod key;
pub mod platform;
pub mod registry;

pub use dispatcher::{DispatchOutcome, KeyEvent, ShortcutDispatcher, ESCAPE_KEY};
pub use key::{normalize, Modifier, NormalizedKey};
pub use platform::{format_shortcut, Platform, PlatformPolicy};
pub use registry::{
    ShortcutCategory, ShortcutEntry, ShortcutGroup, ShortcutHandler, ShortcutInfo,
    ShortcutRegistration, ShortcutRegistry, ShortcutSpec,
};
