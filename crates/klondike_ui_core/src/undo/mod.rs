//! Timed undo support for destructive list operations.
//!
//! # Responsibility
//! - Provide the repeating-timer abstraction used for countdowns.
//! - Coordinate "perform now, allow undo within a window" actions.

pub mod machine;
pub mod scheduler;

pub use machine::{PendingActionView, UndoableActionMachine, DEFAULT_UNDO_WINDOW_SECONDS};
pub use scheduler::{ManualScheduler, Scheduler, TimerCallback, TimerHandle};
