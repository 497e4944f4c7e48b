//! # Codec Configuration
//!
//! Configuration types for encoder sessions and stream decoding.

use crate::error::{CodecError, Result};
use crate::traits::ChannelMode;
use serde::{Deserialize, Serialize};

/// Lowest (best) LAME quality setting.
pub const QUALITY_BEST: u8 = 0;

/// Highest (fastest) LAME quality setting.
pub const QUALITY_FASTEST: u8 = 9;

/// Encoder session parameters.
///
/// All values except `channels` are forwarded to LAME untouched; LAME's
/// parameter finalisation decides whether a combination is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Number of interleaved input channels. Must be 1 or 2.
    ///
    /// Default: 2.
    #[serde(default = "default_channels")]
    pub channels: u16,

    /// Input sample rate in Hz.
    ///
    /// Default: 44100.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Target bit rate in kbps.
    ///
    /// Default: 128.
    #[serde(default = "default_bit_rate")]
    pub bit_rate: u32,

    /// LAME algorithm quality, 0 (best, slowest) to 9 (worst, fastest).
    ///
    /// Default: 5.
    #[serde(default = "default_quality")]
    pub quality: u8,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            sample_rate: default_sample_rate(),
            bit_rate: default_bit_rate(),
            quality: default_quality(),
        }
    }
}

impl EncoderConfig {
    /// Create a configuration from explicit values.
    pub fn new(channels: u16, sample_rate: u32, bit_rate: u32, quality: u8) -> Self {
        Self {
            channels,
            sample_rate,
            bit_rate,
            quality,
        }
    }

    /// Mono speech at 48 kHz, 64 kbps.
    pub fn voice() -> Self {
        Self {
            channels: 1,
            sample_rate: 48000,
            bit_rate: 64,
            ..Default::default()
        }
    }

    /// Stereo music at 44.1 kHz, 320 kbps, best quality.
    pub fn high_quality() -> Self {
        Self {
            channels: 2,
            sample_rate: 44100,
            bit_rate: 320,
            quality: QUALITY_BEST,
        }
    }

    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_bit_rate(mut self, bit_rate: u32) -> Self {
        self.bit_rate = bit_rate;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// LAME channel mode for the configured channel count.
    pub fn channel_mode(&self) -> Result<ChannelMode> {
        ChannelMode::from_channels(self.channels).ok_or_else(|| {
            CodecError::invalid(format!("Invalid number of channels: {}", self.channels))
        })
    }

    /// Validate every field.
    ///
    /// Session creation only enforces the channel count; call this first to
    /// reject the other obviously unusable values without involving LAME.
    pub fn validate(&self) -> Result<()> {
        self.channel_mode()?;

        if self.sample_rate == 0 {
            return Err(CodecError::invalid("sample_rate must be > 0"));
        }

        if self.bit_rate == 0 {
            return Err(CodecError::invalid("bit_rate must be > 0"));
        }

        if self.quality > QUALITY_FASTEST {
            return Err(CodecError::invalid(format!(
                "quality must be between {} and {}, got {}",
                QUALITY_BEST, QUALITY_FASTEST, self.quality
            )));
        }

        Ok(())
    }
}

/// Buffering policy for [`Mp3StreamDecoder`](crate::decoder::Mp3StreamDecoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDecoderConfig {
    /// Bytes requested from the reader per read call.
    ///
    /// Default: 4 KB.
    #[serde(default = "default_read_chunk_bytes")]
    pub read_chunk_bytes: usize,

    /// Pending bytes kept ahead of the decoder until end of stream.
    ///
    /// minimp3 confirms frame sync by looking at the following frame headers,
    /// so the window handed to it should span several frames.
    ///
    /// Default: 16 KB.
    #[serde(default = "default_min_buffered_bytes")]
    pub min_buffered_bytes: usize,
}

impl Default for StreamDecoderConfig {
    fn default() -> Self {
        Self {
            read_chunk_bytes: default_read_chunk_bytes(),
            min_buffered_bytes: default_min_buffered_bytes(),
        }
    }
}

impl StreamDecoderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.read_chunk_bytes == 0 {
            return Err(CodecError::invalid("read_chunk_bytes must be > 0"));
        }

        if self.min_buffered_bytes == 0 {
            return Err(CodecError::invalid("min_buffered_bytes must be > 0"));
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_channels() -> u16 {
    2
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_bit_rate() -> u32 {
    128
}

fn default_quality() -> u8 {
    5
}

fn default_read_chunk_bytes() -> usize {
    4 * 1024
}

fn default_min_buffered_bytes() -> usize {
    16 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EncoderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.channels, 2);
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.bit_rate, 128);
        assert_eq!(config.quality, 5);
    }

    #[test]
    fn test_presets() {
        let voice = EncoderConfig::voice();
        assert!(voice.validate().is_ok());
        assert_eq!(voice.channels, 1);
        assert_eq!(voice.channel_mode().unwrap(), ChannelMode::Mono);

        let hq = EncoderConfig::high_quality();
        assert!(hq.validate().is_ok());
        assert_eq!(hq.bit_rate, 320);
        assert_eq!(hq.channel_mode().unwrap(), ChannelMode::JointStereo);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EncoderConfig::default();

        config.channels = 3;
        assert!(matches!(
            config.validate(),
            Err(CodecError::InvalidArgument(msg)) if msg.contains("channels: 3")
        ));
        config.channels = 0;
        assert!(config.validate().is_err());
        config.channels = 1;

        config.sample_rate = 0;
        assert!(config.validate().is_err());
        config.sample_rate = 44100;

        config.bit_rate = 0;
        assert!(config.validate().is_err());
        config.bit_rate = 128;

        config.quality = 10;
        assert!(config.validate().is_err());
        config.quality = 9;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_setters() {
        let config = EncoderConfig::default()
            .with_channels(1)
            .with_sample_rate(22050)
            .with_bit_rate(96)
            .with_quality(2);

        assert_eq!(config, EncoderConfig::new(1, 22050, 96, 2));
    }

    #[test]
    fn test_serde_defaults_fill_missing_fields() {
        let config: EncoderConfig = serde_json::from_str(r#"{"channels": 1}"#).unwrap();
        assert_eq!(config.channels, 1);
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.bit_rate, 128);
        assert_eq!(config.quality, 5);

        let stream: StreamDecoderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(stream, StreamDecoderConfig::default());
    }

    #[test]
    fn test_stream_config_validation() {
        let mut config = StreamDecoderConfig::default();
        assert!(config.validate().is_ok());

        config.read_chunk_bytes = 0;
        assert!(config.validate().is_err());
        config.read_chunk_bytes = 1;

        config.min_buffered_bytes = 0;
        assert!(config.validate().is_err());
    }
}
