use klondike_ui_core::{
    logging_status, AppContext, ContextError, CoreConfig, LoggingError, MemoryBlobStore,
};
use std::rc::Rc;

fn config(level: &str, log_dir: &str) -> CoreConfig {
    CoreConfig {
        log_level: level.to_string(),
        log_dir: Some(log_dir.to_string()),
        ..CoreConfig::default()
    }
}

// File logging is process-wide, so every step lives in one test.
#[test]
fn context_starts_file_logging_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let log_dir_str = log_dir.to_str().unwrap();

    assert!(logging_status().is_none());
    let relative = AppContext::in_memory(config("info", "logs/dev"));
    assert!(matches!(
        relative,
        Err(ContextError::Logging(LoggingError::RelativeLogDir(_)))
    ));

    let first = AppContext::new(
        config("WARNING", log_dir_str),
        Rc::new(MemoryBlobStore::new()),
    )
    .unwrap();
    let status = logging_status().expect("logging started by context");
    assert_eq!(status.level, "warn");
    assert_eq!(status.log_dir, log_dir);
    assert!(log_dir.is_dir());

    let second = AppContext::in_memory(config("warn", log_dir_str)).unwrap();
    assert_eq!(second.config().log_dir, first.config().log_dir);

    let conflicting = AppContext::in_memory(config("debug", log_dir_str));
    assert!(matches!(
        conflicting,
        Err(ContextError::Logging(LoggingError::Conflict { .. }))
    ));

    let without_dir = AppContext::in_memory(CoreConfig::default()).unwrap();
    assert_eq!(without_dir.config().log_dir, None);
}
