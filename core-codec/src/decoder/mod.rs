//! # MP3 Decoding
//!
//! - [`DecoderSession`]: one-frame-per-call decoding over caller buffers
//! - [`Mp3StreamDecoder`] / [`decode_all`]: convenience over [`std::io::Read`]
//! - [`Minimp3Decoder`]: the native minimp3 backend

pub mod minimp3;
pub mod session;
pub mod stream;

pub use minimp3::Minimp3Decoder;
pub use session::DecoderSession;
pub use stream::{decode_all, Mp3StreamDecoder};

use crate::types::MAX_SAMPLES_PER_FRAME;

/// Output capacity, in samples, every decode call requires.
pub const fn max_samples_per_frame() -> usize {
    MAX_SAMPLES_PER_FRAME
}
