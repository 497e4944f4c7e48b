//! `#[repr(C)]` types shared with foreign callers.

use core_codec::CodecErrorKind;
use std::mem::ManuallyDrop;
use std::ptr;

/// Status code returned by fallible FFI functions.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mp3Status {
    Ok = 0,
    InvalidArgument = 1,
    Closed = 2,
    Initialization = 3,
    EncodeFailure = 4,
    AllocationFailure = 5,
    Io = 6,
    /// Logging configuration rejected or already installed.
    Config = 7,
    /// A panic was caught at the boundary.
    Internal = 8,
}

impl Mp3Status {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<CodecErrorKind> for Mp3Status {
    fn from(kind: CodecErrorKind) -> Self {
        match kind {
            CodecErrorKind::InvalidArgument => Mp3Status::InvalidArgument,
            CodecErrorKind::Closed => Mp3Status::Closed,
            CodecErrorKind::Initialization => Mp3Status::Initialization,
            CodecErrorKind::EncodeFailure => Mp3Status::EncodeFailure,
            CodecErrorKind::AllocationFailure => Mp3Status::AllocationFailure,
            CodecErrorKind::Io => Mp3Status::Io,
        }
    }
}

/// Rust-owned byte buffer handed to the caller.
///
/// Must be released with [`mp3_byte_buffer_free`](crate::mp3_byte_buffer_free).
#[repr(C)]
#[derive(Debug)]
pub struct Mp3ByteBuffer {
    pub data: *mut u8,
    pub len: usize,
    pub capacity: usize,
}

impl Mp3ByteBuffer {
    pub fn empty() -> Self {
        Self {
            data: ptr::null_mut(),
            len: 0,
            capacity: 0,
        }
    }

    pub(crate) fn from_vec(bytes: Vec<u8>) -> Self {
        let mut bytes = ManuallyDrop::new(bytes);
        Self {
            data: bytes.as_mut_ptr(),
            len: bytes.len(),
            capacity: bytes.capacity(),
        }
    }

    /// Reclaim the allocation and reset the buffer to empty.
    ///
    /// # Safety
    ///
    /// A non-null `data` must come from [`Mp3ByteBuffer::from_vec`] with the
    /// recorded `len` and `capacity`.
    pub(crate) unsafe fn release(&mut self) {
        if !self.data.is_null() {
            drop(Vec::from_raw_parts(self.data, self.len, self.capacity));
        }
        *self = Self::empty();
    }

    /// View the contents.
    ///
    /// # Safety
    ///
    /// Same provenance requirement as [`Mp3ByteBuffer::release`].
    pub unsafe fn as_slice(&self) -> &[u8] {
        if self.data.is_null() {
            &[]
        } else {
            std::slice::from_raw_parts(self.data, self.len)
        }
    }
}

impl Default for Mp3ByteBuffer {
    fn default() -> Self {
        Self::empty()
    }
}
