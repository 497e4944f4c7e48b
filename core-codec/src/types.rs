//! # Codec Types
//!
//! Frame metadata, stream metadata and the decode progress report.

use serde::{Deserialize, Serialize};

/// Upper bound on interleaved samples produced by one decoded frame
/// (1152 samples per channel, two channels).
pub const MAX_SAMPLES_PER_FRAME: usize = 1152 * 2;

/// Header fields reported by the native decoder for one call.
///
/// `frame_bytes` is the number of input bytes the call accounted for: a
/// decoded frame, skipped junk, or zero when more input is needed.
/// `channels` is zero when no frame header was recognised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInfo {
    pub frame_bytes: usize,
    pub channels: u16,
    pub sample_rate: u32,
    pub bit_rate_kbps: u32,
}

impl FrameInfo {
    /// Whether this call recognised a frame header.
    pub fn has_header(&self) -> bool {
        self.frame_bytes > 0 && self.channels > 0
    }
}

/// Outcome of a single native decode call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameDecode {
    /// Samples per channel written to the output buffer.
    pub samples_per_channel: usize,
    pub info: FrameInfo,
}

/// Stream properties latched from the most recent frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub channels: u16,
    pub sample_rate: u32,
    /// Bit rate in kbps.
    pub bit_rate: u32,
}

impl From<&FrameInfo> for StreamInfo {
    fn from(info: &FrameInfo) -> Self {
        Self {
            channels: info.channels,
            sample_rate: info.sample_rate,
            bit_rate: info.bit_rate_kbps,
        }
    }
}

/// Result of one `decode_next_frame` call.
///
/// `consumed_bytes` tells the caller how far to advance in its input;
/// `produced_samples` counts interleaved samples written to the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecodeProgress {
    pub consumed_bytes: usize,
    pub produced_samples: usize,
}

/// Interpretation of a [`DecodeProgress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Nothing consumed, nothing produced. Supply more input.
    NeedMoreData,
    /// Bytes were consumed without output (junk, tags, unusable frame).
    SkippedBytes(usize),
    /// A frame was decoded.
    DecodedFrame {
        consumed_bytes: usize,
        produced_samples: usize,
    },
}

impl DecodeProgress {
    pub fn new(consumed_bytes: usize, produced_samples: usize) -> Self {
        Self {
            consumed_bytes,
            produced_samples,
        }
    }

    pub fn outcome(&self) -> DecodeOutcome {
        match (self.consumed_bytes, self.produced_samples) {
            (0, 0) => DecodeOutcome::NeedMoreData,
            (skipped, 0) => DecodeOutcome::SkippedBytes(skipped),
            (consumed_bytes, produced_samples) => DecodeOutcome::DecodedFrame {
                consumed_bytes,
                produced_samples,
            },
        }
    }

    /// Pack into one signed 64-bit value: produced samples in the high 32
    /// bits, consumed bytes in the low 32 bits.
    pub fn pack(&self) -> i64 {
        let produced = self.produced_samples as i32 as i64;
        let consumed = self.consumed_bytes as u32 as i64;
        (produced << 32) | consumed
    }

    /// Inverse of [`DecodeProgress::pack`].
    pub fn unpack(packed: i64) -> Self {
        Self {
            consumed_bytes: packed as u32 as usize,
            produced_samples: (packed >> 32) as i32 as usize,
        }
    }
}
