//! Integration tests for logging system

use core_runtime::logging::{init_logging, LogEntry, LogFormat, LogLevel, LogSink, LoggingConfig};
use core_runtime::Error;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CollectingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl LogSink for CollectingSink {
    fn log(&self, entry: LogEntry) {
        self.entries.lock().unwrap().push(entry);
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_spans(true)
        .with_target(false)
        .with_thread_info(true)
        .with_filter("core_codec=trace,bridge_ffi=debug");

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
    assert_eq!(
        config.filter,
        Some("core_codec=trace,bridge_ffi=debug".to_string())
    );
    assert!(config.log_sink.is_none());
}

#[test]
fn test_invalid_filter_is_config_error() {
    let config = LoggingConfig::default().with_filter("core_codec=[");
    assert!(matches!(init_logging(config), Err(Error::Config(_))));
}

// The global subscriber can only be installed once per process, so the whole
// install/forward/reinstall sequence lives in a single test.
#[test]
fn test_global_init_forwards_to_sink() {
    let sink = Arc::new(CollectingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_level(LogLevel::Debug)
        .with_log_sink(sink.clone());

    init_logging(config).unwrap();

    tracing::debug!(target: "core_codec::encoder", channels = 2u64, "encoder created");
    tracing::info!(target: "some_dependency", "filtered at warn");

    {
        let entries = sink.entries.lock().unwrap();
        let created: Vec<_> = entries
            .iter()
            .filter(|entry| entry.message == "encoder created")
            .collect();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].level, LogLevel::Debug);
        assert_eq!(created[0].target, "core_codec::encoder");
        assert_eq!(created[0].fields.get("channels"), Some(&"2".to_string()));
        assert!(entries.iter().all(|entry| entry.message != "filtered at warn"));
    }

    let again = init_logging(LoggingConfig::default());
    assert!(matches!(again, Err(Error::Config(_))));
}
