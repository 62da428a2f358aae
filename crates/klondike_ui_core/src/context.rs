//! Application-root context owning every interaction store.
//!
//! # Responsibility
//! - Construct the registry, dispatcher, intent bus, undo machine and saved
//!   query service from one validated config.
//! - Start file logging when the config names a log directory.
//! - Install the dashboard's default shortcuts.
//!
//! # Invariants
//! - Each context is independent; tests build a fresh one per case.
//! - All stores share the context's `ManualScheduler` clock.
//! - Dropping the context discards any pending undo action unrun.

use crate::config::{ConfigError, CoreConfig};
use crate::intent::{IntentBus, UiIntent};
use crate::logging::{init_logging, LoggingError};
use crate::service::saved_query_service::SavedQueryService;
use crate::shortcut::{
    DispatchOutcome, KeyEvent, Modifier, ShortcutCategory, ShortcutDispatcher,
    ShortcutRegistration, ShortcutRegistry, ShortcutSpec,
};
use crate::storage::{BlobStore, MemoryBlobStore};
use crate::undo::{ManualScheduler, UndoableActionMachine};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug)]
pub enum ContextError {
    Config(ConfigError),
    Logging(LoggingError),
}

impl Display for ContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ContextError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for ContextError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

pub struct AppContext {
    config: CoreConfig,
    scheduler: ManualScheduler,
    registry: ShortcutRegistry,
    dispatcher: ShortcutDispatcher,
    intents: IntentBus,
    undo: UndoableActionMachine,
    saved_queries: SavedQueryService,
}

impl AppContext {
    pub fn new(config: CoreConfig, blobs: Rc<dyn BlobStore>) -> Result<Self, ContextError> {
        config.validate()?;
        if let Some(log_dir) = config.log_dir.as_deref() {
            init_logging(&config.log_level, log_dir)?;
        }

        let scheduler = ManualScheduler::new();
        let registry = ShortcutRegistry::new(config.platform_policy());
        let dispatcher = ShortcutDispatcher::new(registry.clone());
        let undo = UndoableActionMachine::with_window(
            Rc::new(scheduler.clone()),
            config.undo_window_seconds,
        );
        let saved_queries = SavedQueryService::new(config.saved_queries_key.clone(), blobs);
        info!(
            "event=context_init module=context status=ok platform={:?} undo_window_seconds={}",
            config.platform, config.undo_window_seconds
        );

        Ok(Self {
            config,
            scheduler,
            registry,
            dispatcher,
            intents: IntentBus::new(),
            undo,
            saved_queries,
        })
    }

    /// Context backed by a throwaway in-memory blob store.
    pub fn in_memory(config: CoreConfig) -> Result<Self, ContextError> {
        Self::new(config, Rc::new(MemoryBlobStore::new()))
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &ManualScheduler {
        &self.scheduler
    }

    pub fn registry(&self) -> &ShortcutRegistry {
        &self.registry
    }

    pub fn dispatcher(&self) -> &ShortcutDispatcher {
        &self.dispatcher
    }

    pub fn intents(&self) -> &IntentBus {
        &self.intents
    }

    pub fn undo(&self) -> &UndoableActionMachine {
        &self.undo
    }

    pub fn saved_queries(&self) -> &SavedQueryService {
        &self.saved_queries
    }

    /// Routes one raw key press through the dispatcher.
    pub fn handle_key(&self, event: &KeyEvent) -> DispatchOutcome {
        self.dispatcher.dispatch(event)
    }

    /// Advances timers by wall-clock time elapsed in the host loop.
    pub fn advance(&self, elapsed: Duration) -> usize {
        self.scheduler.advance(elapsed)
    }

    /// Registers the dashboard-wide shortcuts.
    ///
    /// The returned registrations belong to the caller's root scope.
    pub fn install_default_shortcuts(&self) -> Vec<ShortcutRegistration> {
        let help_visible = self.dispatcher.help_visible().clone();
        vec![
            self.register_intent(
                ShortcutSpec::new(
                    "k",
                    &[Modifier::Ctrl],
                    "Open command palette",
                    ShortcutCategory::Navigation,
                ),
                UiIntent::OpenCommandPalette,
            ),
            self.register_intent(
                ShortcutSpec::new("/", &[], "Focus search", ShortcutCategory::Navigation),
                UiIntent::FocusSearch,
            ),
            self.register_intent(
                ShortcutSpec::new(
                    "n",
                    &[Modifier::Ctrl, Modifier::Shift],
                    "Add new feature",
                    ShortcutCategory::Actions,
                ),
                UiIntent::OpenQuickAdd,
            ),
            self.registry.register(
                ShortcutSpec::new("?", &[], "Show keyboard shortcuts", ShortcutCategory::Help),
                move || {
                    let visible = help_visible.get();
                    help_visible.set(!visible);
                },
            ),
        ]
    }

    fn register_intent(&self, spec: ShortcutSpec, intent: UiIntent) -> ShortcutRegistration {
        let intents = self.intents.clone();
        self.registry.register(spec, move || intents.emit(intent))
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        self.undo.dispose();
    }
}
