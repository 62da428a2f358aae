//! Interaction-control core for the Klondike feature dashboard.
//! Observable stores, keyboard shortcuts and timed undo live here; rendering
//! and networking stay outside.

pub mod config;
pub mod context;
pub mod intent;
pub mod logging;
pub mod model;
pub mod service;
pub mod shortcut;
pub mod storage;
pub mod store;
pub mod undo;

pub use config::{ConfigError, CoreConfig};
pub use context::{AppContext, ContextError};
pub use intent::{IntentBus, UiIntent};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError, LoggingStatus};
pub use model::feature::{FeatureCard, FeatureCategory, FeatureFilter, FeatureStatus};
pub use model::saved_query::SavedQuery;
pub use service::saved_query_service::{SavedQueryError, SavedQueryService, SAVED_QUERIES_STORAGE_KEY};
pub use shortcut::{
    format_shortcut, normalize, DispatchOutcome, KeyEvent, Modifier, NormalizedKey, Platform,
    PlatformPolicy, ShortcutCategory, ShortcutDispatcher, ShortcutEntry, ShortcutGroup,
    ShortcutHandler, ShortcutInfo, ShortcutRegistration, ShortcutRegistry, ShortcutSpec,
    ESCAPE_KEY,
};
pub use storage::{BlobStore, MemoryBlobStore, SqliteBlobStore, StorageError, StorageResult};
pub use store::{Identified, ObservableStore, PersistedList, Subscription};
pub use undo::{
    ManualScheduler, PendingActionView, Scheduler, TimerCallback, TimerHandle,
    UndoableActionMachine, DEFAULT_UNDO_WINDOW_SECONDS,
};
