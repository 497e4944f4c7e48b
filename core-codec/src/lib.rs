//! # MP3 Codec Sessions
//!
//! Streaming MP3 decoding and encoding over native codecs.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`DecoderSession`]: feed compressed bytes, get one frame of PCM per call
//!   (minimp3)
//! - [`EncoderSession`]: feed interleaved PCM, get MP3 bytes, flush the tail
//!   (LAME)
//! - Stream adapters over [`std::io::Read`] / [`std::io::Write`]
//! - Opaque 64-bit handles for foreign callers ([`handle`])
//!
//! Sessions own their native state, release it on [`destroy`] or drop, and
//! report every failure synchronously as a [`CodecError`].
//!
//! [`destroy`]: DecoderSession::destroy

pub mod audio;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod handle;
pub mod traits;
pub mod types;

pub use audio::{Audio, DecodedAudio, PcmEncoding, PcmFormat};
pub use config::{EncoderConfig, StreamDecoderConfig};
pub use decoder::{decode_all, DecoderSession, Minimp3Decoder, Mp3StreamDecoder};
pub use encoder::{
    estimate_mp3_buffer_size, EncoderSession, LameEncoder, Mp3StreamEncoder, FLUSH_BUFFER_SIZE,
};
pub use error::{CodecError, CodecErrorKind, Result};
pub use traits::{ChannelMode, DecodeBackend, EncodeBackend};
pub use types::{
    DecodeOutcome, DecodeProgress, FrameDecode, FrameInfo, StreamInfo, MAX_SAMPLES_PER_FRAME,
};
