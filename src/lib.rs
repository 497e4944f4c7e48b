//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-codec`, `core-runtime`, `bridge-ffi`). Host
//! applications can depend on `mp3-session-workspace` and enable the
//! documented features without needing to wire each crate individually.

#[cfg(feature = "codec")]
pub use core_codec as codec;

#[cfg(feature = "logging")]
pub use core_runtime as runtime;

#[cfg(feature = "ffi")]
pub use bridge_ffi as ffi;
