//! Fire-and-forget UI intents.
//!
//! Cross-cutting requests (open the palette, open quick-add) that a shortcut
//! raises without knowing which region answers them. No payload, no replies.

use crate::store::Subscription;
use log::debug;
use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiIntent {
    OpenCommandPalette,
    OpenQuickAdd,
    FocusSearch,
}

impl UiIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenCommandPalette => "open_command_palette",
            Self::OpenQuickAdd => "open_quick_add",
            Self::FocusSearch => "focus_search",
        }
    }
}

type IntentListener = Rc<dyn Fn(UiIntent)>;

#[derive(Default)]
struct BusInner {
    next_listener_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, IntentListener)>>,
}

/// Broadcasts intents to every current listener, synchronously.
#[derive(Clone, Default)]
pub struct IntentBus {
    inner: Rc<BusInner>,
}

impl IntentBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, intent: UiIntent) {
        let snapshot: Vec<IntentListener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        debug!(
            "event=intent_emit module=intent intent={} listeners={}",
            intent.as_str(),
            snapshot.len()
        );
        for listener in snapshot {
            listener(intent);
        }
    }

    pub fn subscribe(&self, listener: impl Fn(UiIntent) + 'static) -> Subscription {
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
}

impl Debug for IntentBus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentBus")
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{IntentBus, UiIntent};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn every_listener_receives_intent_until_unsubscribed() {
        let bus = IntentBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first_sink = Rc::clone(&seen);
        let first = bus.subscribe(move |intent| first_sink.borrow_mut().push(("first", intent)));
        let second_sink = Rc::clone(&seen);
        let _second =
            bus.subscribe(move |intent| second_sink.borrow_mut().push(("second", intent)));

        bus.emit(UiIntent::OpenCommandPalette);
        first.unsubscribe();
        bus.emit(UiIntent::OpenQuickAdd);

        assert_eq!(
            *seen.borrow(),
            vec![
                ("first", UiIntent::OpenCommandPalette),
                ("second", UiIntent::OpenCommandPalette),
                ("second", UiIntent::OpenQuickAdd),
            ]
        );
    }
}
