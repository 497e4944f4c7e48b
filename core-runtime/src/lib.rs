//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the MP3 session crates:
//! - Logging and tracing infrastructure
//! - Host log forwarding through a `LogSink`
//!
//! ## Overview
//!
//! The codec crates only emit `tracing` events. Whether and where those events
//! end up is decided here, once, by the host application (or by the C ABI
//! bridge on behalf of a foreign host).

pub mod error;
pub mod logging;

pub use error::{Error, Result};
