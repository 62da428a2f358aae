//! Repeating-timer primitive with explicit cancellation.
//!
//! # Responsibility
//! - Schedule repeating callbacks and hand back a cancellation token.
//! - Provide a host-driven scheduler for the single-threaded event loop.
//!
//! # Invariants
//! - A cancelled timer never fires again, including later in the same
//!   `advance` call.
//! - `TimerHandle::cancel` is idempotent.
//! - No scheduler borrow is held while a callback runs.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use std::time::Duration;

const MIN_PERIOD: Duration = Duration::from_millis(1);

pub type TimerCallback = Rc<dyn Fn()>;

/// Source of repeating timers.
pub trait Scheduler {
    fn schedule_repeating(&self, period: Duration, callback: TimerCallback) -> TimerHandle;
}

/// Cancellation token returned at schedule time.
pub struct TimerHandle {
    cancel: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: RefCell::new(Some(Box::new(cancel))),
        }
    }

    pub fn cancel(&self) {
        let cancel = self.cancel.borrow_mut().take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.borrow().is_some()
    }
}

impl Debug for TimerHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

struct TimerEntry {
    period: Duration,
    next_due: Duration,
    callback: TimerCallback,
}

#[derive(Default)]
struct SchedulerState {
    now: Duration,
    next_timer_id: u64,
    timers: BTreeMap<u64, TimerEntry>,
}

/// Scheduler whose clock moves only when the host calls `advance`.
///
/// The UI loop feeds it elapsed wall time; tests feed it simulated ticks.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since construction.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn active_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Moves the clock forward by `elapsed`, firing due callbacks in
    /// due-time order. Returns how many callbacks ran.
    pub fn advance(&self, elapsed: Duration) -> usize {
        let target = self.now() + elapsed;
        let mut fired = 0;

        loop {
            let callback = {
                let mut guard = self.state.borrow_mut();
                let state = &mut *guard;
                let due = state
                    .timers
                    .iter()
                    .filter(|(_, timer)| timer.next_due <= target)
                    .min_by_key(|(id, timer)| (timer.next_due, **id))
                    .map(|(id, _)| *id);
                let Some(timer) = due.and_then(|id| state.timers.get_mut(&id)) else {
                    break;
                };
                state.now = timer.next_due;
                timer.next_due += timer.period;
                Rc::clone(&timer.callback)
            };
            callback();
            fired += 1;
        }

        self.state.borrow_mut().now = target;
        fired
    }

    pub fn advance_seconds(&self, seconds: u64) -> usize {
        let mut fired = 0;
        for _ in 0..seconds {
            fired += self.advance(Duration::from_secs(1));
        }
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, period: Duration, callback: TimerCallback) -> TimerHandle {
        let period = period.max(MIN_PERIOD);
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_timer_id;
            state.next_timer_id += 1;
            let next_due = state.now + period;
            state.timers.insert(
                id,
                TimerEntry {
                    period,
                    next_due,
                    callback,
                },
            );
            id
        };

        let weak = Rc::downgrade(&self.state);
        TimerHandle::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().timers.remove(&id);
            }
        })
    }
}

impl Debug for ManualScheduler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("active_timers", &state.timers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ManualScheduler, Scheduler};
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    #[test]
    fn fires_once_per_elapsed_period() {
        let scheduler = ManualScheduler::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let _handle = scheduler.schedule_repeating(
            Duration::from_secs(1),
            Rc::new(move || counter.set(counter.get() + 1)),
        );

        assert_eq!(scheduler.advance(Duration::from_millis(999)), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(1)), 1);
        assert_eq!(scheduler.advance(Duration::from_secs(3)), 3);
        assert_eq!(calls.get(), 4);
        assert_eq!(scheduler.now(), Duration::from_secs(4));
    }

    #[test]
    fn callback_can_cancel_its_own_timer_mid_advance() {
        let scheduler = ManualScheduler::new();
        let calls = Rc::new(Cell::new(0));
        let slot: Rc<Cell<Option<Rc<super::TimerHandle>>>> = Rc::new(Cell::new(None));

        let counter = Rc::clone(&calls);
        let own = Rc::clone(&slot);
        let handle = Rc::new(scheduler.schedule_repeating(
            Duration::from_secs(1),
            Rc::new(move || {
                counter.set(counter.get() + 1);
                if let Some(handle) = own.take() {
                    handle.cancel();
                }
            }),
        ));
        slot.set(Some(Rc::clone(&handle)));

        assert_eq!(scheduler.advance(Duration::from_secs(10)), 1);
        assert_eq!(calls.get(), 1);
        assert_eq!(scheduler.active_timers(), 0);

        handle.cancel();
        assert!(!handle.is_active());
    }
}
