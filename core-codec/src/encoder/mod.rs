//! # MP3 Encoding
//!
//! - [`EncoderSession`]: write-then-flush encoding of interleaved PCM
//! - [`Mp3StreamEncoder`]: convenience over [`std::io::Write`]
//! - [`LameEncoder`]: the native LAME backend

pub mod lame;
pub mod session;
pub mod stream;

pub use lame::LameEncoder;
pub use session::{estimate_mp3_buffer_size, EncoderSession, FLUSH_BUFFER_SIZE};
pub use stream::Mp3StreamEncoder;
