//! # Native Codec Seams
//!
//! Sessions drive the native codecs through these traits. The production
//! implementations wrap minimp3 and LAME; tests substitute scripted backends.

use crate::types::FrameDecode;
use mp3lame_sys::{MPEG_mode, MPEG_mode_enum};

/// One native MP3 decoder state.
#[cfg_attr(test, mockall::automock)]
pub trait DecodeBackend {
    /// Decode at most one frame from the start of `input` into `pcm`.
    ///
    /// `pcm` always holds at least
    /// [`MAX_SAMPLES_PER_FRAME`](crate::types::MAX_SAMPLES_PER_FRAME) samples.
    fn decode_frame(&mut self, input: &[u8], pcm: &mut [i16]) -> FrameDecode;
}

/// One native MP3 encoder state.
///
/// Return values follow LAME: the number of bytes written to `out`, or a
/// negative error code.
#[cfg_attr(test, mockall::automock)]
pub trait EncodeBackend {
    /// Encode a block of mono samples.
    fn encode_mono(&mut self, pcm: &[i16], out: &mut [u8]) -> i32;

    /// Encode `frames` interleaved stereo sample pairs.
    fn encode_interleaved(&mut self, pcm: &[i16], frames: usize, out: &mut [u8]) -> i32;

    /// Emit the buffered tail of the stream.
    fn flush(&mut self, out: &mut [u8]) -> i32;
}

/// Output channel mode, derived from the input channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelMode {
    Mono,
    JointStereo,
}

impl ChannelMode {
    /// `1 -> Mono`, `2 -> JointStereo`; anything else is unsupported.
    pub fn from_channels(channels: u16) -> Option<Self> {
        match channels {
            1 => Some(ChannelMode::Mono),
            2 => Some(ChannelMode::JointStereo),
            _ => None,
        }
    }

    pub fn channels(&self) -> u16 {
        match self {
            ChannelMode::Mono => 1,
            ChannelMode::JointStereo => 2,
        }
    }
}

impl From<ChannelMode> for MPEG_mode_enum {
    fn from(mode: ChannelMode) -> Self {
        match mode {
            ChannelMode::Mono => MPEG_mode::MONO,
            ChannelMode::JointStereo => MPEG_mode::JOINT_STEREO,
        }
    }
}
