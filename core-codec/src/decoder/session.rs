//! # Decoder Session
//!
//! Incremental MP3 to PCM decoding over caller-owned buffers.
//!
//! The caller owns the compressed stream and feeds windows of it; each call
//! decodes at most one frame and reports how far to advance:
//!
//! ```rust,no_run
//! use core_codec::{DecodeOutcome, DecoderSession, MAX_SAMPLES_PER_FRAME};
//!
//! # fn example(mp3: &[u8]) -> core_codec::Result<()> {
//! let mut session = DecoderSession::new();
//! let mut pcm = vec![0i16; MAX_SAMPLES_PER_FRAME];
//! let mut offset = 0;
//!
//! while offset < mp3.len() {
//!     let window = &mp3[offset..];
//!     let progress = session.decode_next_frame(window, window.len(), &mut pcm)?;
//!     offset += progress.consumed_bytes;
//!
//!     match progress.outcome() {
//!         DecodeOutcome::DecodedFrame { produced_samples, .. } => {
//!             println!("{} samples", produced_samples);
//!         }
//!         DecodeOutcome::SkippedBytes(_) => {}
//!         DecodeOutcome::NeedMoreData => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use crate::audio::PcmFormat;
use crate::decoder::minimp3::Minimp3Decoder;
use crate::error::{CodecError, Result};
use crate::traits::DecodeBackend;
use crate::types::{DecodeProgress, StreamInfo, MAX_SAMPLES_PER_FRAME};
use tracing::{debug, trace};

const SUBJECT: &str = "Decoder";

/// One native decoder plus the stream properties seen so far.
///
/// Stream properties stay unknown (reported as `-1`) until the first frame
/// header has been parsed, then track the most recent header.
///
/// Dropping the session releases the native state.
pub struct DecoderSession<B: DecodeBackend = Minimp3Decoder> {
    backend: Option<B>,
    stream_info: Option<StreamInfo>,
}

impl DecoderSession<Minimp3Decoder> {
    /// Create a session over a fresh minimp3 decoder.
    pub fn new() -> Self {
        Self::with_backend(Minimp3Decoder::new())
    }
}

impl Default for DecoderSession<Minimp3Decoder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: DecodeBackend> DecoderSession<B> {
    pub fn with_backend(backend: B) -> Self {
        debug!("Decoder session created");
        Self {
            backend: Some(backend),
            stream_info: None,
        }
    }

    /// Decode at most one frame from `input[..input_length]` into `output`.
    ///
    /// Never reads past `input_length` and never writes more than
    /// [`MAX_SAMPLES_PER_FRAME`] samples. Stream properties are updated only
    /// when the call parsed a frame header.
    ///
    /// # Errors
    ///
    /// - [`CodecError::Closed`] after [`destroy`](Self::destroy)
    /// - [`CodecError::InvalidArgument`] if `output` holds fewer than
    ///   [`MAX_SAMPLES_PER_FRAME`] samples or `input_length` exceeds
    ///   `input.len()`
    pub fn decode_next_frame(
        &mut self,
        input: &[u8],
        input_length: usize,
        output: &mut [i16],
    ) -> Result<DecodeProgress> {
        let backend = self.backend.as_mut().ok_or(CodecError::Closed(SUBJECT))?;

        if output.len() < MAX_SAMPLES_PER_FRAME {
            return Err(CodecError::invalid(format!(
                "Output buffer holds {} samples, at least {} required",
                output.len(),
                MAX_SAMPLES_PER_FRAME
            )));
        }

        if input_length > input.len() {
            return Err(CodecError::invalid(format!(
                "Input length {} exceeds input buffer of {} bytes",
                input_length,
                input.len()
            )));
        }

        let frame = backend.decode_frame(&input[..input_length], output);

        if frame.info.has_header() {
            let info = StreamInfo::from(&frame.info);
            if self.stream_info.is_none() {
                debug!(
                    channels = info.channels,
                    sample_rate = info.sample_rate,
                    bit_rate = info.bit_rate,
                    "First frame header parsed"
                );
            }
            self.stream_info = Some(info);
        }

        if frame.samples_per_channel == 0 {
            trace!(consumed = frame.info.frame_bytes, "No frame decoded");
            return Ok(DecodeProgress::new(frame.info.frame_bytes, 0));
        }

        let produced = frame.samples_per_channel * usize::from(frame.info.channels);
        debug_assert!(produced <= MAX_SAMPLES_PER_FRAME);

        trace!(
            consumed = frame.info.frame_bytes,
            produced,
            "Frame decoded"
        );

        Ok(DecodeProgress::new(frame.info.frame_bytes, produced))
    }

    /// Channel count of the stream, or `-1` before the first header.
    pub fn channel_count(&self) -> Result<i32> {
        self.query(|info| i32::from(info.channels))
    }

    /// Sample rate in Hz, or `-1` before the first header.
    pub fn sample_rate(&self) -> Result<i32> {
        self.query(|info| i32::try_from(info.sample_rate).unwrap_or(i32::MAX))
    }

    /// Bit rate in kbps of the most recent frame, or `-1` before the first
    /// header.
    pub fn bit_rate(&self) -> Result<i32> {
        self.query(|info| i32::try_from(info.bit_rate).unwrap_or(i32::MAX))
    }

    pub fn header_parsed(&self) -> Result<bool> {
        Ok(self.stream_info()?.is_some())
    }

    pub fn stream_info(&self) -> Result<Option<StreamInfo>> {
        self.ensure_open()?;
        Ok(self.stream_info)
    }

    /// PCM layout of the decoded output, once known.
    pub fn pcm_format(&self) -> Result<Option<PcmFormat>> {
        Ok(self
            .stream_info()?
            .map(|info| PcmFormat::signed_16(info.sample_rate, info.channels)))
    }

    /// Release the native decoder. Safe to call any number of times.
    pub fn destroy(&mut self) {
        if self.backend.take().is_some() {
            debug!("Decoder session destroyed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.backend.is_none()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(CodecError::Closed(SUBJECT));
        }
        Ok(())
    }

    fn query(&self, field: impl FnOnce(&StreamInfo) -> i32) -> Result<i32> {
        Ok(self.stream_info()?.as_ref().map_or(-1, field))
    }
}

impl<B: DecodeBackend> Drop for DecoderSession<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}
