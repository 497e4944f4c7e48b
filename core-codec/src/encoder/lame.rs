//! LAME-backed [`EncodeBackend`].

use crate::config::EncoderConfig;
use crate::error::{CodecError, Result};
use crate::traits::{ChannelMode, EncodeBackend};
use libc::{c_int, c_short, c_uchar};
use mp3lame_sys::{
    lame_close, lame_encode_buffer, lame_encode_buffer_interleaved, lame_encode_flush,
    lame_global_flags, lame_init, lame_init_params, lame_set_brate, lame_set_in_samplerate,
    lame_set_mode, lame_set_num_channels, lame_set_quality, MPEG_mode_enum,
};
use std::ptr;
use tracing::{debug, error};

/// Returned instead of calling LAME when the sample count does not fit in a
/// `c_int`.
const SAMPLE_COUNT_OVERFLOW: i32 = -100;

/// Owned LAME encoder state. Closed on drop.
pub struct LameEncoder {
    lame: *mut lame_global_flags,
}

// SAFETY: the LAME state is only reached through `&mut self`, so it is never
// used from two threads at once.
unsafe impl Send for LameEncoder {}

impl LameEncoder {
    /// Allocate and configure a LAME encoder.
    ///
    /// On any failure the partially initialised state is closed before
    /// returning.
    pub fn open(config: &EncoderConfig, mode: ChannelMode) -> Result<Self> {
        let sample_rate = native_param("sample rate", config.sample_rate)?;
        let bit_rate = native_param("bit rate", config.bit_rate)?;

        let lame = unsafe { lame_init() };
        if lame.is_null() {
            error!("lame_init returned null");
            return Err(CodecError::Initialization(
                "Failed to initialize LAME encoder".to_string(),
            ));
        }

        // Owning the pointer from here on closes it on every early return.
        let encoder = Self { lame };

        unsafe {
            lame_set_num_channels(lame, c_int::from(mode.channels()));
            lame_set_in_samplerate(lame, sample_rate);
            lame_set_brate(lame, bit_rate);
            lame_set_mode(lame, MPEG_mode_enum::from(mode));
            lame_set_quality(lame, c_int::from(config.quality));
        }

        let status = unsafe { lame_init_params(lame) };
        if status < 0 {
            error!(status, "lame_init_params failed");
            return Err(CodecError::Initialization(format!(
                "Failed to initialize LAME parameters (status {})",
                status
            )));
        }

        debug!(?mode, "LAME encoder ready");
        Ok(encoder)
    }
}

impl EncodeBackend for LameEncoder {
    fn encode_mono(&mut self, pcm: &[i16], out: &mut [u8]) -> i32 {
        let Ok(samples) = c_int::try_from(pcm.len()) else {
            return SAMPLE_COUNT_OVERFLOW;
        };
        unsafe {
            lame_encode_buffer(
                self.lame,
                pcm.as_ptr() as *const c_short,
                ptr::null(),
                samples,
                out.as_mut_ptr() as *mut c_uchar,
                saturating_len(out.len()),
            )
        }
    }

    fn encode_interleaved(&mut self, pcm: &[i16], frames: usize, out: &mut [u8]) -> i32 {
        let Ok(frames) = c_int::try_from(frames) else {
            return SAMPLE_COUNT_OVERFLOW;
        };
        // LAME declares the input non-const but only reads it.
        unsafe {
            lame_encode_buffer_interleaved(
                self.lame,
                pcm.as_ptr() as *mut c_short,
                frames,
                out.as_mut_ptr() as *mut c_uchar,
                saturating_len(out.len()),
            )
        }
    }

    fn flush(&mut self, out: &mut [u8]) -> i32 {
        unsafe {
            lame_encode_flush(
                self.lame,
                out.as_mut_ptr() as *mut c_uchar,
                saturating_len(out.len()),
            )
        }
    }
}

impl Drop for LameEncoder {
    fn drop(&mut self) {
        unsafe {
            lame_close(self.lame);
        }
    }
}

fn native_param(name: &str, value: u32) -> Result<c_int> {
    c_int::try_from(value).map_err(|_| {
        CodecError::Initialization(format!("LAME does not accept a {} of {}", name, value))
    })
}

/// Capacity reported to LAME. A larger buffer is only under-reported.
fn saturating_len(len: usize) -> c_int {
    c_int::try_from(len).unwrap_or(c_int::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_param_range() {
        assert_eq!(native_param("sample rate", 44100).unwrap(), 44100);
        assert!(matches!(
            native_param("bit rate", u32::MAX),
            Err(CodecError::Initialization(_))
        ));
    }

    #[test]
    fn test_unrepresentable_rate_fails_before_lame() {
        let config = EncoderConfig::default().with_sample_rate(u32::MAX);
        let result = LameEncoder::open(&config, ChannelMode::JointStereo);
        assert!(matches!(result, Err(CodecError::Initialization(_))));
    }
}
