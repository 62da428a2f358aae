use klondike_ui_core::{AppContext, CoreConfig, ManualScheduler, UndoableActionMachine};
use std::cell::Cell;
use std::rc::Rc;

struct Calls {
    executed: Rc<Cell<u32>>,
    undone: Rc<Cell<u32>>,
}

impl Calls {
    fn new() -> Self {
        Self {
            executed: Rc::new(Cell::new(0)),
            undone: Rc::new(Cell::new(0)),
        }
    }

    fn on_execute(&self) -> impl FnOnce() + 'static {
        let executed = Rc::clone(&self.executed);
        move || executed.set(executed.get() + 1)
    }

    fn on_undo(&self) -> impl FnOnce() + 'static {
        let undone = Rc::clone(&self.undone);
        move || undone.set(undone.get() + 1)
    }
}

fn machine() -> (ManualScheduler, UndoableActionMachine) {
    let scheduler = ManualScheduler::new();
    let machine = UndoableActionMachine::new(Rc::new(scheduler.clone()));
    (scheduler, machine)
}

#[test]
fn executes_exactly_once_after_window() {
    let (scheduler, machine) = machine();
    let calls = Calls::new();
    machine.start("Deleted F001", calls.on_execute(), calls.on_undo());

    scheduler.advance_seconds(4);
    assert_eq!(calls.executed.get(), 0);
    assert_eq!(machine.pending().map(|view| view.remaining_seconds), Some(1));

    scheduler.advance_seconds(1);
    assert_eq!(calls.executed.get(), 1);
    assert_eq!(calls.undone.get(), 0);
    assert!(machine.pending().is_none());

    scheduler.advance_seconds(10);
    assert_eq!(calls.executed.get(), 1);
    assert_eq!(scheduler.active_timers(), 0);
}

#[test]
fn cancel_mid_countdown_runs_undo_only() {
    let (scheduler, machine) = machine();
    let calls = Calls::new();
    machine.start("Deleted F002", calls.on_execute(), calls.on_undo());

    scheduler.advance_seconds(2);
    assert_eq!(machine.pending().map(|view| view.remaining_seconds), Some(3));
    assert!(machine.cancel());
    assert_eq!(calls.undone.get(), 1);

    scheduler.advance_seconds(10);
    assert_eq!(calls.executed.get(), 0);
    assert_eq!(calls.undone.get(), 1);
    assert!(!machine.cancel());
    assert_eq!(calls.undone.get(), 1);
}

#[test]
fn starting_again_supersedes_previous_action() {
    let (scheduler, machine) = machine();
    let first = Calls::new();
    let second = Calls::new();

    let first_id = machine.start("first", first.on_execute(), first.on_undo());
    scheduler.advance_seconds(3);
    let second_id = machine.start("second", second.on_execute(), second.on_undo());
    assert_ne!(first_id, second_id);

    let view = machine.pending().expect("second action pending");
    assert_eq!(view.id, second_id);
    assert_eq!(view.remaining_seconds, 5);
    assert_eq!(scheduler.active_timers(), 1);

    scheduler.advance_seconds(5);
    assert_eq!(first.executed.get(), 0);
    assert_eq!(first.undone.get(), 0);
    assert_eq!(second.executed.get(), 1);
    assert_eq!(second.undone.get(), 0);
}

#[test]
fn force_execute_skips_remaining_countdown() {
    let (scheduler, machine) = machine();
    let calls = Calls::new();
    machine.start("Archived F003", calls.on_execute(), calls.on_undo());

    scheduler.advance_seconds(1);
    assert!(machine.force_execute());
    assert!(!machine.force_execute());
    scheduler.advance_seconds(10);

    assert_eq!(calls.executed.get(), 1);
    assert_eq!(calls.undone.get(), 0);
}

#[test]
fn dropping_machine_cancels_timer_without_callbacks() {
    let (scheduler, machine) = machine();
    let calls = Calls::new();
    machine.start("Deleted F004", calls.on_execute(), calls.on_undo());
    assert_eq!(scheduler.active_timers(), 1);

    drop(machine);
    assert_eq!(scheduler.active_timers(), 0);
    scheduler.advance_seconds(10);
    assert_eq!(calls.executed.get(), 0);
    assert_eq!(calls.undone.get(), 0);
}

#[test]
fn countdown_is_observable() {
    let (scheduler, machine) = machine();
    let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let reader = machine.clone();
    let _subscription = machine.state().subscribe(move || {
        log.borrow_mut()
            .push(reader.pending().map(|view| view.remaining_seconds));
    });

    machine.start_with_duration("Deleted F005", || {}, || {}, 2);
    scheduler.advance_seconds(2);
    assert_eq!(*seen.borrow(), vec![Some(2), Some(1), None]);
}

#[test]
fn second_start_before_any_tick_supersedes_first() {
    let (scheduler, machine) = machine();
    let first = Calls::new();
    let second = Calls::new();

    machine.start("first", first.on_execute(), first.on_undo());
    let second_id = machine.start("second", second.on_execute(), second.on_undo());
    assert_eq!(scheduler.active_timers(), 1);
    assert_eq!(machine.pending().map(|view| view.id), Some(second_id));

    assert!(machine.cancel());
    scheduler.advance_seconds(10);
    assert_eq!(first.executed.get(), 0);
    assert_eq!(first.undone.get(), 0);
    assert_eq!(second.executed.get(), 0);
    assert_eq!(second.undone.get(), 1);
}

#[test]
fn dropping_context_tears_down_action_that_captures_machine() {
    let context = AppContext::in_memory(CoreConfig::default()).unwrap();
    let scheduler = context.scheduler().clone();
    let calls = Calls::new();

    let follow_up = context.undo().clone();
    let on_execute = calls.on_execute();
    context.undo().start(
        "Deleted F006",
        move || {
            on_execute();
            follow_up.start("Deleted F007", || {}, || {});
        },
        calls.on_undo(),
    );
    assert_eq!(scheduler.active_timers(), 1);

    drop(context);
    assert_eq!(scheduler.active_timers(), 0);
    scheduler.advance_seconds(10);
    assert_eq!(calls.executed.get(), 0);
    assert_eq!(calls.undone.get(), 0);
}
