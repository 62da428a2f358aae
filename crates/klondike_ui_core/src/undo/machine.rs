//! Confirm-then-undo action state machine.
//!
//! # Responsibility
//! - Perform an action after a countdown unless the user undoes it first.
//! - Publish the live countdown for the toast view.
//!
//! # State model
//! `Idle -> Pending(remaining) -> Executed | Cancelled`, then back to idle.
//! Starting while pending supersedes: the earlier action's timer is torn
//! down and neither of its callbacks runs.
//!
//! # Invariants
//! - `on_execute` and `on_undo` are mutually exclusive and each runs at most
//!   once per `start`.
//! - Every exit from `Pending` cancels the action's timer exactly once,
//!   including supersede, `dispose` and machine drop.
//! - The pending slot is cleared before a callback runs, so callbacks may
//!   start a new action re-entrantly.

use crate::store::ObservableStore;
use crate::undo::scheduler::{Scheduler, TimerHandle};
use log::{debug, info};
use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};
use std::time::Duration;

pub const DEFAULT_UNDO_WINDOW_SECONDS: u32 = 5;
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Render snapshot of the pending action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingActionView {
    pub id: String,
    pub message: String,
    pub remaining_seconds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActionOutcome {
    Executed,
    Cancelled,
}

impl ActionOutcome {
    fn as_str(self) -> &'static str {
        match self {
            Self::Executed => "executed",
            Self::Cancelled => "cancelled",
        }
    }
}

struct PendingAction {
    id: String,
    message: String,
    remaining_seconds: u32,
    on_execute: Box<dyn FnOnce()>,
    on_undo: Box<dyn FnOnce()>,
    timer: TimerHandle,
}

impl PendingAction {
    fn view(&self) -> PendingActionView {
        PendingActionView {
            id: self.id.clone(),
            message: self.message.clone(),
            remaining_seconds: self.remaining_seconds,
        }
    }
}

struct MachineInner {
    scheduler: Rc<dyn Scheduler>,
    window_seconds: u32,
    next_sequence: Cell<u64>,
    pending: RefCell<Option<PendingAction>>,
    state: ObservableStore<Option<PendingActionView>>,
}

impl MachineInner {
    fn on_tick(&self, action_id: &str) {
        let view = {
            let mut pending = self.pending.borrow_mut();
            match pending.as_mut() {
                Some(action) if action.id == action_id => {
                    action.remaining_seconds = action.remaining_seconds.saturating_sub(1);
                    action.view()
                }
                _ => return,
            }
        };

        if view.remaining_seconds == 0 {
            self.finish(ActionOutcome::Executed);
        } else {
            self.state.set(Some(view));
        }
    }

    fn finish(&self, outcome: ActionOutcome) -> bool {
        let taken = self.pending.borrow_mut().take();
        let Some(action) = taken else {
            return false;
        };
        let PendingAction {
            id,
            remaining_seconds,
            on_execute,
            on_undo,
            timer,
            ..
        } = action;

        timer.cancel();
        self.state.set(None);
        info!(
            "event=undo_finish module=undo status={} action_id={} remaining_seconds={}",
            outcome.as_str(),
            id,
            remaining_seconds
        );

        match outcome {
            ActionOutcome::Executed => on_execute(),
            ActionOutcome::Cancelled => on_undo(),
        }
        true
    }

    /// Tears the pending action down without running either callback.
    fn discard(&self) -> bool {
        let taken = self.pending.borrow_mut().take();
        let Some(action) = taken else {
            return false;
        };
        action.timer.cancel();
        self.state.set(None);
        info!(
            "event=undo_finish module=undo status=discarded action_id={} remaining_seconds={}",
            action.id, action.remaining_seconds
        );
        true
    }
}

impl Drop for MachineInner {
    fn drop(&mut self) {
        if let Some(action) = self.pending.get_mut().take() {
            action.timer.cancel();
            debug!(
                "event=undo_teardown module=undo status=dropped action_id={}",
                action.id
            );
        }
    }
}

/// Shared handle to one undo machine.
#[derive(Clone)]
pub struct UndoableActionMachine {
    inner: Rc<MachineInner>,
}

impl UndoableActionMachine {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self::with_window(scheduler, DEFAULT_UNDO_WINDOW_SECONDS)
    }

    /// Machine whose `start` uses `window_seconds` as its countdown.
    pub fn with_window(scheduler: Rc<dyn Scheduler>, window_seconds: u32) -> Self {
        Self {
            inner: Rc::new(MachineInner {
                scheduler,
                window_seconds,
                next_sequence: Cell::new(1),
                pending: RefCell::new(None),
                state: ObservableStore::new(None),
            }),
        }
    }

    pub fn window_seconds(&self) -> u32 {
        self.inner.window_seconds
    }

    /// Starts a pending action with the configured window. Returns its id.
    pub fn start(
        &self,
        message: impl Into<String>,
        on_execute: impl FnOnce() + 'static,
        on_undo: impl FnOnce() + 'static,
    ) -> String {
        self.start_with_duration(message, on_execute, on_undo, self.inner.window_seconds)
    }

    /// Starts a pending action that executes after `duration_seconds` ticks.
    ///
    /// A duration of zero executes on the first tick.
    pub fn start_with_duration(
        &self,
        message: impl Into<String>,
        on_execute: impl FnOnce() + 'static,
        on_undo: impl FnOnce() + 'static,
        duration_seconds: u32,
    ) -> String {
        let previous = self.inner.pending.borrow_mut().take();
        if let Some(previous) = previous {
            previous.timer.cancel();
            info!(
                "event=undo_finish module=undo status=superseded action_id={} remaining_seconds={}",
                previous.id, previous.remaining_seconds
            );
        }

        let sequence = self.inner.next_sequence.get();
        self.inner.next_sequence.set(sequence + 1);
        let id = format!("undo-{sequence}");

        let weak: Weak<MachineInner> = Rc::downgrade(&self.inner);
        let tick_id = id.clone();
        let timer = self.inner.scheduler.schedule_repeating(
            TICK_PERIOD,
            Rc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.on_tick(&tick_id);
                }
            }),
        );

        let action = PendingAction {
            id: id.clone(),
            message: message.into(),
            remaining_seconds: duration_seconds,
            on_execute: Box::new(on_execute),
            on_undo: Box::new(on_undo),
            timer,
        };
        let view = action.view();
        *self.inner.pending.borrow_mut() = Some(action);
        info!(
            "event=undo_start module=undo status=pending action_id={} duration_seconds={}",
            id, duration_seconds
        );
        self.inner.state.set(Some(view));
        id
    }

    /// User clicked "Undo". Returns `false` when nothing was pending.
    pub fn cancel(&self) -> bool {
        self.inner.finish(ActionOutcome::Cancelled)
    }

    /// User dismissed the toast; execute now. Returns `false` when idle.
    pub fn force_execute(&self) -> bool {
        self.inner.finish(ActionOutcome::Executed)
    }

    /// Owner scope is going away: stop the timer and drop both callbacks
    /// unrun. Returns `false` when idle.
    ///
    /// Callbacks that capture a clone of this machine keep it alive, so
    /// dropping handles alone does not stop a pending countdown.
    pub fn dispose(&self) -> bool {
        self.inner.discard()
    }

    pub fn pending(&self) -> Option<PendingActionView> {
        self.inner.state.get()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.pending.borrow().is_some()
    }

    /// Observable countdown state for rendering.
    pub fn state(&self) -> &ObservableStore<Option<PendingActionView>> {
        &self.inner.state
    }
}

impl Debug for UndoableActionMachine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoableActionMachine")
            .field("window_seconds", &self.inner.window_seconds)
            .field("pending", &self.inner.state.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::UndoableActionMachine;
    use crate::undo::scheduler::ManualScheduler;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn countdown_is_published_every_tick() {
        let scheduler = ManualScheduler::new();
        let machine = UndoableActionMachine::new(Rc::new(scheduler.clone()));
        let id = machine.start_with_duration("Deleted F001", || {}, || {}, 3);

        let view = machine.pending().expect("pending after start");
        assert_eq!(view.id, id);
        assert_eq!(view.remaining_seconds, 3);

        scheduler.advance_seconds(1);
        assert_eq!(machine.pending().map(|v| v.remaining_seconds), Some(2));
        scheduler.advance_seconds(1);
        assert_eq!(machine.pending().map(|v| v.remaining_seconds), Some(1));
        scheduler.advance_seconds(1);
        assert_eq!(machine.pending(), None);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn callback_may_start_follow_up_action() {
        let scheduler = ManualScheduler::new();
        let machine = UndoableActionMachine::new(Rc::new(scheduler.clone()));
        let follow_up_ran = Rc::new(Cell::new(false));

        let chained = machine.clone();
        let flag = Rc::clone(&follow_up_ran);
        machine.start_with_duration(
            "first",
            move || {
                chained.start_with_duration("second", move || flag.set(true), || {}, 1);
            },
            || {},
            1,
        );

        scheduler.advance_seconds(1);
        assert_eq!(
            machine.pending().map(|v| v.message),
            Some("second".to_string())
        );
        scheduler.advance_seconds(1);
        assert!(follow_up_ran.get());
        assert!(!machine.is_pending());
    }

    #[test]
    fn zero_duration_executes_on_first_tick() {
        let scheduler = ManualScheduler::new();
        let machine = UndoableActionMachine::new(Rc::new(scheduler.clone()));
        let executed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&executed);
        machine.start_with_duration("now", move || counter.set(counter.get() + 1), || {}, 0);

        assert!(machine.is_pending());
        scheduler.advance_seconds(1);
        assert_eq!(executed.get(), 1);
    }

    #[test]
    fn dispose_breaks_self_referencing_callbacks() {
        let scheduler = ManualScheduler::new();
        let machine = UndoableActionMachine::new(Rc::new(scheduler.clone()));
        let executed = Rc::new(Cell::new(false));

        let captured = machine.clone();
        let flag = Rc::clone(&executed);
        machine.start(
            "Deleted F009",
            move || {
                flag.set(true);
                drop(captured);
            },
            || {},
        );

        assert!(machine.dispose());
        assert!(!machine.dispose());
        assert_eq!(scheduler.active_timers(), 0);
        assert_eq!(machine.pending(), None);
        assert_eq!(Rc::strong_count(&machine.inner), 1);

        scheduler.advance_seconds(10);
        assert!(!executed.get());
    }
}
