//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire an in-memory `AppContext` and print the shortcut sheet.
//! - Replay a scripted key sequence and one undo countdown so output stays
//!   deterministic.
//!
//! Usage: `klondike_ui_cli [config.json]`. A `log_dir` in the config turns
//! on file logging.

use klondike_ui_core::{AppContext, CoreConfig, KeyEvent};
use std::cell::Cell;
use std::process::ExitCode;
use std::rc::Rc;

fn load_config(path: Option<String>) -> Result<CoreConfig, String> {
    let Some(path) = path else {
        return Ok(CoreConfig::default());
    };
    let raw = std::fs::read_to_string(&path).map_err(|err| format!("{path}: {err}"))?;
    CoreConfig::from_json_str(&raw).map_err(|err| format!("{path}: {err}"))
}

fn main() -> ExitCode {
    println!("klondike_ui_cli version={}", env!("CARGO_PKG_VERSION"));

    let context = match load_config(std::env::args().nth(1))
        .and_then(|config| AppContext::in_memory(config).map_err(|err| err.to_string()))
    {
        Ok(context) => context,
        Err(err) => {
            eprintln!("startup failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    let _registrations = context.install_default_shortcuts();
    let _intents = context
        .intents()
        .subscribe(|intent| println!("intent={}", intent.as_str()));

    for group in context.registry().list() {
        println!("[{}]", group.category.label());
        for entry in group.entries {
            println!("  {:<14} {}", entry.label, entry.description);
        }
    }

    let script = [
        KeyEvent::new("k").with_ctrl(),
        KeyEvent::new("/").in_editable(),
        KeyEvent::new("?").with_shift(),
        KeyEvent::new("Escape"),
    ];
    for event in &script {
        println!("key={} outcome={:?}", event.key, context.handle_key(event));
    }

    let executed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&executed);
    let id = context
        .undo()
        .start("Deleted F001", move || flag.set(true), || {});
    for _ in 0..context.undo().window_seconds() {
        context.advance(std::time::Duration::from_secs(1));
        if let Some(view) = context.undo().pending() {
            println!("undo id={} remaining={}", view.id, view.remaining_seconds);
        }
    }
    println!("undo id={id} executed={}", executed.get());
    ExitCode::SUCCESS
}
