//! C-compatible FFI layer for the MP3 codec sessions.
//!
//! This crate exposes `extern "C"` functions and `#[repr(C)]` types so that
//! foreign runtimes can drive [`core_codec`] decoder and encoder sessions
//! through opaque 64-bit handles.
//!
//! # Symbol prefix
//!
//! - Functions: `mp3_*`
//! - Types: `Mp3*`
//!
//! # Errors
//!
//! Fallible functions return an [`Mp3Status`] code or a sentinel value and
//! record the failure in a thread-local slot readable through
//! [`mp3_last_error_code`] and [`mp3_last_error_message`]. Panics never cross
//! the boundary.
//!
//! # Thread safety
//!
//! A handle may be moved between threads, but calls on the same handle must
//! be serialized by the caller. Distinct handles are independent.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod logging;
pub mod types;

mod panic_guard;

pub use decoder::*;
pub use encoder::*;
pub use error::{mp3_last_error_code, mp3_last_error_message, BridgeError};
pub use logging::*;
pub use types::*;
