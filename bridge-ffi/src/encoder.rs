//! Encoder session entry points.

use crate::decoder::raw_slice;
use crate::panic_guard::{guard, guard_status};
use crate::types::Mp3ByteBuffer;
use core_codec::handle::{handle_mut, into_raw_handle, release_handle, RawHandle, NULL_HANDLE};
use core_codec::{CodecError, EncoderSession};

const SUBJECT: &str = "Encoder";

/// Create an encoder session. Returns its handle, or `0` on failure.
///
/// `channels` must be 1 (mono) or 2 (joint stereo); the other parameters are
/// forwarded to LAME.
#[no_mangle]
pub extern "C" fn mp3_encoder_create(
    channels: i32,
    sample_rate: i32,
    bit_rate: i32,
    quality: i32,
) -> RawHandle {
    guard("mp3_encoder_create", NULL_HANDLE, || {
        let session = EncoderSession::create(channels, sample_rate, bit_rate, quality)?;
        Ok(into_raw_handle(session))
    })
}

/// Encode `pcm_len` interleaved samples into a new buffer stored in `*out`.
///
/// Returns an [`Mp3Status`](crate::Mp3Status) code; `*out` is only written on success.
///
/// # Safety
///
/// `handle` must be `0` or a live encoder handle, `pcm` valid for reads of
/// `pcm_len` samples (or null when `pcm_len` is `0`), and `out` writable.
/// Any buffer already in `*out` is overwritten without being freed.
#[no_mangle]
pub unsafe extern "C" fn mp3_encoder_write(
    handle: RawHandle,
    pcm: *const i16,
    pcm_len: usize,
    out: *mut Mp3ByteBuffer,
) -> i32 {
    guard_status("mp3_encoder_write", || {
        let session = handle_mut::<EncoderSession>(handle, SUBJECT)?;
        let out = out
            .as_mut()
            .ok_or_else(|| CodecError::invalid("out is null"))?;
        let pcm = raw_slice(pcm, pcm_len, "pcm")?;

        let bytes = session.write_samples(pcm)?;
        *out = Mp3ByteBuffer::from_vec(bytes);
        Ok(())
    })
}

/// Flush the encoder's tail into a new buffer stored in `*out`.
///
/// # Safety
///
/// Same requirements as [`mp3_encoder_write`].
#[no_mangle]
pub unsafe extern "C" fn mp3_encoder_flush(handle: RawHandle, out: *mut Mp3ByteBuffer) -> i32 {
    guard_status("mp3_encoder_flush", || {
        let session = handle_mut::<EncoderSession>(handle, SUBJECT)?;
        let out = out
            .as_mut()
            .ok_or_else(|| CodecError::invalid("out is null"))?;

        *out = Mp3ByteBuffer::from_vec(session.flush()?);
        Ok(())
    })
}

/// Destroy the encoder behind `*handle_slot` and zero the slot.
///
/// Null slots and zero handles are ignored, so repeated calls are safe.
///
/// # Safety
///
/// `handle_slot` must be null or point to `0` or a live encoder handle.
#[no_mangle]
pub unsafe extern "C" fn mp3_encoder_destroy(handle_slot: *mut RawHandle) {
    guard("mp3_encoder_destroy", (), || {
        if let Some(slot) = handle_slot.as_mut() {
            release_handle::<EncoderSession>(slot);
        }
        Ok(())
    })
}

/// Release a buffer returned by [`mp3_encoder_write`] or
/// [`mp3_encoder_flush`] and reset it to empty.
///
/// # Safety
///
/// `buffer` must be null or point to a buffer filled by this library that
/// has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn mp3_byte_buffer_free(buffer: *mut Mp3ByteBuffer) {
    if let Some(buffer) = buffer.as_mut() {
        buffer.release();
    }
}
