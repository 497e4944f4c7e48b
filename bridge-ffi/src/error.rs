//! Bridge errors and the thread-local last-error slot.

use crate::types::Mp3Status;
use core_codec::CodecError;
use libc::c_char;
use std::cell::RefCell;
use thiserror::Error;

/// Errors surfaced across the C boundary.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Runtime(#[from] core_runtime::Error),

    #[error("Panic in {function}: {message}")]
    Panic {
        function: &'static str,
        message: String,
    },
}

impl BridgeError {
    pub fn status(&self) -> Mp3Status {
        match self {
            BridgeError::Codec(err) => err.kind().into(),
            BridgeError::Runtime(core_runtime::Error::Config(_)) => Mp3Status::Config,
            BridgeError::Panic { .. } => Mp3Status::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

struct LastError {
    status: Mp3Status,
    message: String,
}

thread_local! {
    static LAST_ERROR: RefCell<Option<LastError>> = const { RefCell::new(None) };
}

pub(crate) fn set_last_error(err: &BridgeError) {
    let last = LastError {
        status: err.status(),
        message: err.to_string(),
    };
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(last));
}

pub(crate) fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Status of the last failed call on this thread, or `0` if the last call
/// succeeded.
#[no_mangle]
pub extern "C" fn mp3_last_error_code() -> i32 {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(Mp3Status::Ok.code(), |last| last.status.code())
    })
}

/// Copy the last error message on this thread into `buffer`.
///
/// At most `capacity - 1` bytes are copied and the result is always
/// NUL-terminated when `capacity > 0`. Returns the full message length in
/// bytes (excluding the terminator), or `0` if there is no error.
///
/// # Safety
///
/// `buffer` must be null or valid for writes of `capacity` bytes.
#[no_mangle]
pub unsafe extern "C" fn mp3_last_error_message(buffer: *mut c_char, capacity: usize) -> usize {
    LAST_ERROR.with(|slot| {
        let slot = slot.borrow();
        let Some(last) = slot.as_ref() else {
            if !buffer.is_null() && capacity > 0 {
                *buffer = 0;
            }
            return 0;
        };

        let bytes = last.message.as_bytes();
        if !buffer.is_null() && capacity > 0 {
            let copied = bytes.len().min(capacity - 1);
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), buffer as *mut u8, copied);
            *buffer.add(copied) = 0;
        }
        bytes.len()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> String {
        let mut buffer = [0 as c_char; 128];
        let len = unsafe { mp3_last_error_message(buffer.as_mut_ptr(), buffer.len()) };
        let bytes: Vec<u8> = buffer[..len.min(127)].iter().map(|&c| c as u8).collect();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let err = BridgeError::from(CodecError::Closed("Decoder"));
        assert_eq!(err.status(), Mp3Status::Closed);

        let err = BridgeError::from(core_runtime::Error::Config("bad filter".into()));
        assert_eq!(err.status(), Mp3Status::Config);

        let err = BridgeError::Panic {
            function: "mp3_decoder_create",
            message: "boom".into(),
        };
        assert_eq!(err.status(), Mp3Status::Internal);
    }

    #[test]
    fn test_last_error_roundtrip() {
        clear_last_error();
        assert_eq!(mp3_last_error_code(), 0);
        assert_eq!(message(), "");

        set_last_error(&CodecError::Closed("Encoder").into());
        assert_eq!(mp3_last_error_code(), Mp3Status::Closed.code());
        assert_eq!(message(), "Encoder is closed");

        clear_last_error();
        assert_eq!(mp3_last_error_code(), 0);
    }

    #[test]
    fn test_message_truncation() {
        set_last_error(&CodecError::invalid("x".repeat(40)).into());

        let mut small = [0x7f as c_char; 8];
        let len = unsafe { mp3_last_error_message(small.as_mut_ptr(), small.len()) };
        assert_eq!(len, "Invalid argument: ".len() + 40);
        assert_eq!(small[7], 0);

        assert_eq!(
            unsafe { mp3_last_error_message(std::ptr::null_mut(), 0) },
            len
        );
    }
}
