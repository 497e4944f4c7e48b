//! # Decoded Audio
//!
//! Descriptors for the 16-bit interleaved PCM that decoding produces.

use crate::types::StreamInfo;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bytes per decoded sample.
pub const SAMPLE_SIZE_BYTES: u16 = 2;

/// Sample encoding of decoded PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PcmEncoding {
    SignedInt,
}

/// Layout of a PCM sample stream, suitable for handing to an audio sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmFormat {
    pub encoding: PcmEncoding,
    /// Samples per second per channel.
    pub sample_rate: u32,
    pub sample_size_bits: u16,
    pub channels: u16,
    /// Bytes per interleaved sample frame (all channels).
    pub frame_size_bytes: u16,
    /// Sample frames per second.
    pub frame_rate: u32,
    pub big_endian: bool,
}

impl PcmFormat {
    /// Signed 16-bit native-endian interleaved PCM.
    pub fn signed_16(sample_rate: u32, channels: u16) -> Self {
        Self {
            encoding: PcmEncoding::SignedInt,
            sample_rate,
            sample_size_bits: SAMPLE_SIZE_BYTES * 8,
            channels,
            frame_size_bytes: SAMPLE_SIZE_BYTES * channels,
            frame_rate: sample_rate,
            big_endian: cfg!(target_endian = "big"),
        }
    }

    pub fn bytes_per_second(&self) -> u64 {
        u64::from(self.frame_rate) * u64::from(self.frame_size_bytes)
    }

    /// Playback time of `samples` interleaved samples.
    pub fn duration_of(&self, samples: usize) -> Duration {
        if self.channels == 0 || self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let frames = samples as u64 / u64::from(self.channels);
        Duration::from_secs_f64(frames as f64 / f64::from(self.sample_rate))
    }
}

/// Common view of decoded audio properties.
///
/// Numeric accessors return `-1` while the property is unknown.
pub trait Audio {
    fn stream_info(&self) -> Option<StreamInfo>;

    fn channel_count(&self) -> i32 {
        self.stream_info().map_or(-1, |info| i32::from(info.channels))
    }

    fn sample_rate(&self) -> i32 {
        self.stream_info()
            .map_or(-1, |info| i32::try_from(info.sample_rate).unwrap_or(i32::MAX))
    }

    fn bit_rate(&self) -> i32 {
        self.stream_info()
            .map_or(-1, |info| i32::try_from(info.bit_rate).unwrap_or(i32::MAX))
    }

    fn sample_size_bytes(&self) -> u16 {
        SAMPLE_SIZE_BYTES
    }

    fn sample_size_bits(&self) -> u16 {
        self.sample_size_bytes() * 8
    }

    fn pcm_format(&self) -> Option<PcmFormat> {
        self.stream_info()
            .map(|info| PcmFormat::signed_16(info.sample_rate, info.channels))
    }
}

/// A fully decoded stream held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudio {
    info: Option<StreamInfo>,
    samples: Vec<i16>,
}

impl DecodedAudio {
    pub fn new(info: Option<StreamInfo>, samples: Vec<i16>) -> Self {
        Self { info, samples }
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }

    pub fn duration(&self) -> Duration {
        self.pcm_format()
            .map_or(Duration::ZERO, |format| format.duration_of(self.samples.len()))
    }

    /// Samples as native-endian bytes, matching [`Audio::pcm_format`].
    pub fn to_pcm_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_ne_bytes()).collect()
    }
}

impl Audio for DecodedAudio {
    fn stream_info(&self) -> Option<StreamInfo> {
        self.info
    }
}
