//! Reactive state primitives shared by UI regions.
//!
//! # Responsibility
//! - Provide the observable cell every other interaction component builds on.
//! - Provide blob-backed lists that survive restarts.
//!
//! # Invariants
//! - Notification is synchronous and total: every current subscriber runs
//!   before a mutating call returns.
//! - Everything here is single-threaded (`Rc`-based, `!Send`).

pub mod observable;
pub mod persisted_list;

pub use observable::{ObservableStore, Subscription};
pub use persisted_list::{Identified, PersistedList};
