//! # Encoder Session
//!
//! Incremental PCM to MP3 encoding with a final flush.
//!
//! ```rust,no_run
//! use core_codec::{EncoderConfig, EncoderSession};
//!
//! # fn example(pcm: &[i16]) -> core_codec::Result<Vec<u8>> {
//! let mut session = EncoderSession::new(EncoderConfig::default())?;
//! let mut mp3 = session.write_samples(pcm)?;
//! mp3.extend(session.flush()?);
//! session.destroy();
//! # Ok(mp3)
//! # }
//! ```

use crate::config::EncoderConfig;
use crate::encoder::lame::LameEncoder;
use crate::error::{CodecError, Result};
use crate::traits::{ChannelMode, EncodeBackend};
use tracing::{debug, instrument, trace, warn};

const SUBJECT: &str = "Encoder";

/// Output buffer size handed to the native flush.
pub const FLUSH_BUFFER_SIZE: usize = 7200;

/// Worst-case encoded size for `num_samples` input samples of one channel:
/// `ceil(1.25 * n + 7200)`.
pub fn estimate_mp3_buffer_size(num_samples: usize) -> usize {
    // Integer form of the ceiling: 1.25 * n == 5n / 4.
    (num_samples * 5).div_ceil(4) + 7200
}

/// One native encoder configured for a fixed channel layout.
///
/// Dropping the session releases the native state.
pub struct EncoderSession<B: EncodeBackend = LameEncoder> {
    backend: Option<B>,
    config: EncoderConfig,
    mode: ChannelMode,
}

impl EncoderSession<LameEncoder> {
    /// Create a session over a freshly configured LAME encoder.
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidArgument`] if `config.channels` is not 1 or 2;
    ///   no native state is allocated in that case
    /// - [`CodecError::Initialization`] if LAME rejects the parameters
    pub fn new(config: EncoderConfig) -> Result<Self> {
        Self::with_backend(config, LameEncoder::open)
    }

    /// Create a session from raw integer parameters.
    ///
    /// Only `channels` is validated. Quality is clamped into range the way
    /// LAME clamps it; a negative sample rate or bit rate is reported as
    /// [`CodecError::Initialization`], as LAME would reject it.
    pub fn create(channels: i32, sample_rate: i32, bit_rate: i32, quality: i32) -> Result<Self> {
        Self::new(config_from_raw(channels, sample_rate, bit_rate, quality)?)
    }
}

impl<B: EncodeBackend> EncoderSession<B> {
    /// Create a session, allocating the native encoder with `open`.
    ///
    /// The channel count is checked before `open` is called.
    #[instrument(skip(open), fields(channels = config.channels, sample_rate = config.sample_rate))]
    pub fn with_backend<F>(config: EncoderConfig, open: F) -> Result<Self>
    where
        F: FnOnce(&EncoderConfig, ChannelMode) -> Result<B>,
    {
        let mode = config.channel_mode()?;
        let backend = open(&config, mode)?;

        debug!(
            bit_rate = config.bit_rate,
            quality = config.quality,
            "Encoder session created"
        );

        Ok(Self {
            backend: Some(backend),
            config,
            mode,
        })
    }

    /// Encode interleaved PCM samples.
    ///
    /// Returns the MP3 bytes LAME produced for this call, which may be empty
    /// while it buffers input.
    ///
    /// # Errors
    ///
    /// - [`CodecError::Closed`] after [`destroy`](Self::destroy)
    /// - [`CodecError::InvalidArgument`] if `pcm.len()` is not a multiple of
    ///   the channel count, or the per-channel sample count exceeds what LAME
    ///   accepts in one call; the native encoder is not called
    /// - [`CodecError::AllocationFailure`] if the scratch buffer cannot be
    ///   reserved
    /// - [`CodecError::EncodeFailure`] if LAME reports an error
    pub fn write_samples(&mut self, pcm: &[i16]) -> Result<Vec<u8>> {
        let backend = self.backend.as_mut().ok_or(CodecError::Closed(SUBJECT))?;
        let channels = usize::from(self.mode.channels());

        if pcm.len() % channels != 0 {
            return Err(CodecError::invalid(format!(
                "Input length {} must be a multiple of the number of channels ({})",
                pcm.len(),
                channels
            )));
        }

        let samples_per_channel = pcm.len() / channels;
        check_native_count(samples_per_channel)?;

        let capacity = estimate_mp3_buffer_size(pcm.len()) * channels;
        let mut scratch = scratch_buffer(capacity)?;

        let result = match self.mode {
            ChannelMode::Mono => backend.encode_mono(pcm, &mut scratch),
            ChannelMode::JointStereo => {
                backend.encode_interleaved(pcm, samples_per_channel, &mut scratch)
            }
        };

        let written = native_output_len(result, capacity, "Failed to encode samples")?;
        scratch.truncate(written);

        trace!(samples = pcm.len(), bytes = written, "Samples encoded");
        Ok(scratch)
    }

    /// Emit the encoder's buffered tail.
    ///
    /// Call once after the last [`write_samples`](Self::write_samples); the
    /// session may then only be destroyed.
    pub fn flush(&mut self) -> Result<Vec<u8>> {
        let backend = self.backend.as_mut().ok_or(CodecError::Closed(SUBJECT))?;

        let mut scratch = scratch_buffer(FLUSH_BUFFER_SIZE)?;
        let result = backend.flush(&mut scratch);

        let written = native_output_len(result, FLUSH_BUFFER_SIZE, "Failed to flush encoder")?;
        scratch.truncate(written);

        debug!(bytes = written, "Encoder flushed");
        Ok(scratch)
    }

    /// Release the native encoder. Safe to call any number of times.
    pub fn destroy(&mut self) {
        if self.backend.take().is_some() {
            debug!("Encoder session destroyed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.backend.is_none()
    }

    /// Interleaved input channels, 1 or 2.
    pub fn channels(&self) -> u16 {
        self.mode.channels()
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn channel_mode(&self) -> ChannelMode {
        self.mode
    }
}

impl<B: EncodeBackend> Drop for EncoderSession<B> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn config_from_raw(
    channels: i32,
    sample_rate: i32,
    bit_rate: i32,
    quality: i32,
) -> Result<EncoderConfig> {
    let channels = u16::try_from(channels)
        .ok()
        .filter(|c| ChannelMode::from_channels(*c).is_some())
        .ok_or_else(|| CodecError::invalid(format!("Invalid number of channels: {}", channels)))?;

    let rate = |name: &str, value: i32| {
        u32::try_from(value).map_err(|_| {
            CodecError::Initialization(format!("LAME does not accept a {} of {}", name, value))
        })
    };

    // LAME clamps quality to 0..=9 itself.
    let quality = u8::try_from(quality.clamp(0, i32::from(u8::MAX))).unwrap_or(u8::MAX);

    Ok(EncoderConfig::new(
        channels,
        rate("sample rate", sample_rate)?,
        rate("bit rate", bit_rate)?,
        quality,
    ))
}

/// LAME takes sample counts as `c_int`.
fn check_native_count(samples_per_channel: usize) -> Result<()> {
    if i32::try_from(samples_per_channel).is_err() {
        return Err(CodecError::invalid(format!(
            "Too many samples per channel for one write: {}",
            samples_per_channel
        )));
    }
    Ok(())
}

fn scratch_buffer(capacity: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(capacity).map_err(|e| {
        CodecError::AllocationFailure(format!(
            "Could not reserve {} byte output buffer: {}",
            capacity, e
        ))
    })?;
    buffer.resize(capacity, 0);
    Ok(buffer)
}

fn native_output_len(result: i32, capacity: usize, context: &str) -> Result<usize> {
    match usize::try_from(result) {
        Ok(written) if written <= capacity => Ok(written),
        Ok(written) => {
            warn!(written, capacity, "Encoder reported more bytes than the buffer holds");
            Err(CodecError::EncodeFailure(format!(
                "{}: output overran buffer",
                context
            )))
        }
        Err(_) => {
            warn!(code = result, "{}", context);
            Err(CodecError::EncodeFailure(format!(
                "{} (LAME error {})",
                context, result
            )))
        }
    }
}
