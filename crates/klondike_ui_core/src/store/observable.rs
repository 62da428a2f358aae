//! Observable mutable cell with synchronous change notification.
//!
//! # Responsibility
//! - Hold one shared value that several UI regions read and mutate.
//! - Notify every subscriber before a mutating call returns.
//!
//! # Invariants
//! - Each notifying mutation bumps `revision` exactly once.
//! - A notification round runs over the subscriber set captured when the
//!   mutation started; listeners added or removed mid-round take effect on
//!   the next round.
//! - No borrow of the value is held while listeners run, so listeners may
//!   read (or even set) the store re-entrantly.

use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

type Listener = Rc<dyn Fn()>;

struct StoreInner<T> {
    value: RefCell<T>,
    revision: Cell<u64>,
    next_listener_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, Listener)>>,
}

/// Shared handle to an observable value.
///
/// Cloning the handle shares the same cell; it does not copy the value.
pub struct ObservableStore<T> {
    inner: Rc<StoreInner<T>>,
}

impl<T> Clone for ObservableStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> ObservableStore<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                value: RefCell::new(value),
                revision: Cell::new(0),
                next_listener_id: Cell::new(0),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Reads the current value by reference.
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.inner.value.borrow())
    }

    /// Replaces the value and notifies all current subscribers.
    pub fn set(&self, next: T) {
        *self.inner.value.borrow_mut() = next;
        self.bump_and_notify();
    }

    /// Mutates the value in place.
    ///
    /// `mutate` reports whether the logical value changed; subscribers are
    /// notified only in that case. `mutate` must not touch this store.
    pub fn update(&self, mutate: impl FnOnce(&mut T) -> bool) -> bool {
        let changed = mutate(&mut self.inner.value.borrow_mut());
        if changed {
            self.bump_and_notify();
        }
        changed
    }

    /// Change counter, only meaningful for forcing re-observation.
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Registers `listener`, invoked with no arguments after every change.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .listeners
                    .borrow_mut()
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    fn bump_and_notify(&self) {
        self.inner.revision.set(self.inner.revision.get() + 1);
        let snapshot: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener();
        }
    }
}

impl<T: Clone + 'static> ObservableStore<T> {
    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T: Default + 'static> Default for ObservableStore<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Debug> Debug for ObservableStore<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableStore")
            .field("value", &self.inner.value.borrow())
            .field("revision", &self.inner.revision.get())
            .field("subscribers", &self.inner.listeners.borrow().len())
            .finish()
    }
}

/// Capability that removes exactly one listener.
///
/// Dropping a `Subscription` does not unsubscribe; call
/// [`Subscription::unsubscribe`] when the owning region goes away.
/// Repeated calls are no-ops.
pub struct Subscription {
    release: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Subscription {
    pub(crate) fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: RefCell::new(Some(Box::new(release))),
        }
    }

    pub fn unsubscribe(&self) {
        let release = self.release.borrow_mut().take();
        if let Some(release) = release {
            release();
        }
    }

    pub fn is_active(&self) -> bool {
        self.release.borrow().is_some()
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
