//! Logging setup for foreign hosts.

use crate::panic_guard::guard_status;
use core_codec::CodecError;
use core_runtime::logging::{init_logging, LogEntry, LogFormat, LogLevel, LogSink, LoggingConfig};
use libc::c_char;
use std::ffi::CString;
use std::sync::Arc;

/// Host callback receiving `(level, target, message)`; the strings are only
/// valid for the duration of the call.
pub type Mp3LogCallback = extern "C" fn(level: i32, target: *const c_char, message: *const c_char);

/// Install the global tracing subscriber.
///
/// `level`: 0 trace, 1 debug, 2 info, 3 warn, 4 error.
/// `format`: 0 pretty, 1 json, 2 compact.
/// `callback` may be null; when set, events at `level` and above are also
/// forwarded to it.
///
/// Returns an [`Mp3Status`](crate::Mp3Status) code. Installing twice fails
/// with `Config`.
#[no_mangle]
pub extern "C" fn mp3_logging_init(level: i32, format: i32, callback: Option<Mp3LogCallback>) -> i32 {
    guard_status("mp3_logging_init", || {
        let level = level_from_code(level)?;
        let format = format_from_code(format)?;

        let mut config = LoggingConfig::default()
            .with_level(level)
            .with_format(format);
        if let Some(callback) = callback {
            config = config.with_log_sink(Arc::new(CallbackSink { callback, level }));
        }

        init_logging(config)?;
        Ok(())
    })
}

fn level_from_code(code: i32) -> Result<LogLevel, CodecError> {
    match code {
        0 => Ok(LogLevel::Trace),
        1 => Ok(LogLevel::Debug),
        2 => Ok(LogLevel::Info),
        3 => Ok(LogLevel::Warn),
        4 => Ok(LogLevel::Error),
        other => Err(CodecError::invalid(format!("Unknown log level: {}", other))),
    }
}

fn format_from_code(code: i32) -> Result<LogFormat, CodecError> {
    match code {
        0 => Ok(LogFormat::Pretty),
        1 => Ok(LogFormat::Json),
        2 => Ok(LogFormat::Compact),
        other => Err(CodecError::invalid(format!("Unknown log format: {}", other))),
    }
}

fn level_code(level: LogLevel) -> i32 {
    match level {
        LogLevel::Trace => 0,
        LogLevel::Debug => 1,
        LogLevel::Info => 2,
        LogLevel::Warn => 3,
        LogLevel::Error => 4,
    }
}

/// Forwards log entries to a C callback.
struct CallbackSink {
    callback: Mp3LogCallback,
    level: LogLevel,
}

impl LogSink for CallbackSink {
    fn log(&self, entry: LogEntry) {
        let target = to_c_string(&entry.target);
        let message = to_c_string(&entry.message);
        (self.callback)(level_code(entry.level), target.as_ptr(), message.as_ptr());
    }

    fn min_level(&self) -> LogLevel {
        self.level
    }
}

fn to_c_string(text: &str) -> CString {
    CString::new(text.replace('\0', " ")).unwrap_or_default()
}
