//! minimp3-backed [`DecodeBackend`].

use crate::traits::DecodeBackend;
use crate::types::{FrameDecode, FrameInfo, MAX_SAMPLES_PER_FRAME};
use minimp3_sys::{mp3dec_decode_frame, mp3dec_frame_info_t, mp3dec_init, mp3dec_t};
use std::os::raw::c_int;

/// Native minimp3 decoder state.
///
/// The state is boxed so its address stays stable for the lifetime of the
/// session.
pub struct Minimp3Decoder {
    state: Box<mp3dec_t>,
}

impl Minimp3Decoder {
    pub fn new() -> Self {
        // SAFETY: mp3dec_t is plain C data; all-zero is a valid bit pattern
        // and mp3dec_init resets it before first use.
        let mut state: Box<mp3dec_t> = Box::new(unsafe { std::mem::zeroed() });
        unsafe { mp3dec_init(&mut *state) };
        Self { state }
    }
}

impl Default for Minimp3Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeBackend for Minimp3Decoder {
    fn decode_frame(&mut self, input: &[u8], pcm: &mut [i16]) -> FrameDecode {
        assert!(
            pcm.len() >= MAX_SAMPLES_PER_FRAME,
            "pcm buffer must hold {} samples",
            MAX_SAMPLES_PER_FRAME
        );

        // SAFETY: see Minimp3Decoder::new.
        let mut info: mp3dec_frame_info_t = unsafe { std::mem::zeroed() };
        let input_len = c_int::try_from(input.len()).unwrap_or(c_int::MAX);

        // SAFETY: input is readable for input_len bytes and pcm is writable
        // for a full frame, checked above.
        let samples = unsafe {
            mp3dec_decode_frame(
                &mut *self.state,
                input.as_ptr(),
                input_len,
                pcm.as_mut_ptr(),
                &mut info,
            )
        };

        FrameDecode {
            samples_per_channel: usize::try_from(samples).unwrap_or(0),
            info: FrameInfo {
                frame_bytes: usize::try_from(info.frame_bytes).unwrap_or(0),
                channels: u16::try_from(info.channels).unwrap_or(0),
                sample_rate: u32::try_from(info.hz).unwrap_or(0),
                bit_rate_kbps: u32::try_from(info.bitrate_kbps).unwrap_or(0),
            },
        }
    }
}
