//! Decoder session entry points.

use crate::error::BridgeError;
use crate::panic_guard::guard;
use core_codec::handle::{handle_mut, into_raw_handle, release_handle, RawHandle, NULL_HANDLE};
use core_codec::{CodecError, DecoderSession, MAX_SAMPLES_PER_FRAME};
use std::slice;

const SUBJECT: &str = "Decoder";

/// Create a decoder session. Returns its handle, or `0` on failure.
#[no_mangle]
pub extern "C" fn mp3_decoder_create() -> RawHandle {
    guard("mp3_decoder_create", NULL_HANDLE, || {
        Ok(into_raw_handle(DecoderSession::new()))
    })
}

/// Interleaved samples every output buffer must hold.
#[no_mangle]
pub extern "C" fn mp3_decoder_max_samples_per_frame() -> i32 {
    MAX_SAMPLES_PER_FRAME as i32
}

/// Decode at most one frame from `input[..input_length]`.
///
/// Returns the packed progress (`produced << 32 | consumed`), or `-1` on
/// failure.
///
/// # Safety
///
/// `handle` must be `0` or a live decoder handle. `input` must be valid for
/// reads of `input_capacity` bytes and `output` valid for writes of
/// `output_capacity` samples; either may be null when its capacity is `0`.
#[no_mangle]
pub unsafe extern "C" fn mp3_decoder_decode_next_frame(
    handle: RawHandle,
    input: *const u8,
    input_capacity: usize,
    input_length: i32,
    output: *mut i16,
    output_capacity: usize,
) -> i64 {
    guard("mp3_decoder_decode_next_frame", -1, || {
        let session = handle_mut::<DecoderSession>(handle, SUBJECT)?;

        let input_length = usize::try_from(input_length).map_err(|_| {
            CodecError::invalid(format!("Input length must not be negative: {}", input_length))
        })?;
        let input = raw_slice(input, input_capacity, "input")?;
        let output = raw_slice_mut(output, output_capacity, "output")?;

        let progress = session.decode_next_frame(input, input_length, output)?;
        Ok(progress.pack())
    })
}

/// Channel count, `-1` before the first header or on failure.
///
/// # Safety
///
/// `handle` must be `0` or a live decoder handle.
#[no_mangle]
pub unsafe extern "C" fn mp3_decoder_channel_count(handle: RawHandle) -> i32 {
    guard("mp3_decoder_channel_count", -1, || {
        Ok(handle_mut::<DecoderSession>(handle, SUBJECT)?.channel_count()?)
    })
}

/// Sample rate in Hz, `-1` before the first header or on failure.
///
/// # Safety
///
/// `handle` must be `0` or a live decoder handle.
#[no_mangle]
pub unsafe extern "C" fn mp3_decoder_sample_rate(handle: RawHandle) -> i32 {
    guard("mp3_decoder_sample_rate", -1, || {
        Ok(handle_mut::<DecoderSession>(handle, SUBJECT)?.sample_rate()?)
    })
}

/// Bit rate in kbps, `-1` before the first header or on failure.
///
/// # Safety
///
/// `handle` must be `0` or a live decoder handle.
#[no_mangle]
pub unsafe extern "C" fn mp3_decoder_bit_rate(handle: RawHandle) -> i32 {
    guard("mp3_decoder_bit_rate", -1, || {
        Ok(handle_mut::<DecoderSession>(handle, SUBJECT)?.bit_rate()?)
    })
}

/// `1` once a frame header has been parsed, `0` before, `-1` on failure.
///
/// # Safety
///
/// `handle` must be `0` or a live decoder handle.
#[no_mangle]
pub unsafe extern "C" fn mp3_decoder_header_parsed(handle: RawHandle) -> i32 {
    guard("mp3_decoder_header_parsed", -1, || {
        let parsed = handle_mut::<DecoderSession>(handle, SUBJECT)?.header_parsed()?;
        Ok(i32::from(parsed))
    })
}

/// Destroy the decoder behind `*handle_slot` and zero the slot.
///
/// Null slots and zero handles are ignored, so repeated calls are safe.
///
/// # Safety
///
/// `handle_slot` must be null or point to `0` or a live decoder handle.
#[no_mangle]
pub unsafe extern "C" fn mp3_decoder_destroy(handle_slot: *mut RawHandle) {
    guard("mp3_decoder_destroy", (), || {
        if let Some(slot) = handle_slot.as_mut() {
            release_handle::<DecoderSession>(slot);
        }
        Ok(())
    })
}

pub(crate) unsafe fn raw_slice<'a, T>(
    ptr: *const T,
    len: usize,
    name: &str,
) -> Result<&'a [T], BridgeError> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(CodecError::invalid(format!("{} is null", name)).into());
    }
    Ok(slice::from_raw_parts(ptr, len))
}

pub(crate) unsafe fn raw_slice_mut<'a, T>(
    ptr: *mut T,
    len: usize,
    name: &str,
) -> Result<&'a mut [T], BridgeError> {
    if len == 0 {
        return Ok(&mut []);
    }
    if ptr.is_null() {
        return Err(CodecError::invalid(format!("{} is null", name)).into());
    }
    Ok(slice::from_raw_parts_mut(ptr, len))
}
