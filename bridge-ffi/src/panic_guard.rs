use crate::error::{clear_last_error, set_last_error, BridgeError, Result};
use crate::types::Mp3Status;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::error;

/// Run `f`, record its outcome in the last-error slot and turn failures and
/// panics into `on_error`.
pub(crate) fn guard<T>(function: &'static str, on_error: T, f: impl FnOnce() -> Result<T>) -> T {
    run(function, f).unwrap_or(on_error)
}

/// Like [`guard`] for functions that report an [`Mp3Status`] code.
pub(crate) fn guard_status(function: &'static str, f: impl FnOnce() -> Result<()>) -> i32 {
    match run(function, f) {
        Ok(()) => Mp3Status::Ok.code(),
        Err(status) => status.code(),
    }
}

fn run<T>(function: &'static str, f: impl FnOnce() -> Result<T>) -> std::result::Result<T, Mp3Status> {
    let outcome = catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!(function, %message, "Panic caught at FFI boundary");
        Err(BridgeError::Panic { function, message })
    });

    match outcome {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(err) => {
            set_last_error(&err);
            Err(err.status())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::mp3_last_error_code;
    use core_codec::CodecError;

    #[test]
    fn test_success_clears_error() {
        guard("test", -1, || Err(CodecError::invalid("bad").into()));
        assert_eq!(mp3_last_error_code(), Mp3Status::InvalidArgument.code());

        assert_eq!(guard("test", -1, || Ok(5)), 5);
        assert_eq!(mp3_last_error_code(), 0);
    }

    #[test]
    fn test_panic_becomes_internal_error() {
        let value = guard("test", -1, || -> Result<i32> { panic!("boom") });
        assert_eq!(value, -1);
        assert_eq!(mp3_last_error_code(), Mp3Status::Internal.code());
    }

    #[test]
    fn test_status_guard_returns_error_code() {
        let status = guard_status("test", || Err(CodecError::Closed("Encoder").into()));
        assert_eq!(status, Mp3Status::Closed.code());

        assert_eq!(guard_status("test", || Ok(())), 0);
    }
}
