//! Opaque 64-bit session handles for foreign callers.
//!
//! A handle is the address of a boxed session; zero means "no session".
//! Releasing goes through the caller's handle slot so the slot is zeroed in
//! the same step and a second release is a no-op.

use crate::error::{CodecError, Result};

pub type RawHandle = i64;

pub const NULL_HANDLE: RawHandle = 0;

/// Move `value` to the heap and return its handle.
pub fn into_raw_handle<T>(value: T) -> RawHandle {
    Box::into_raw(Box::new(value)) as usize as RawHandle
}

/// Borrow the value behind `handle`.
///
/// A zero handle yields [`CodecError::Closed`] naming `subject`.
///
/// # Safety
///
/// A non-zero `handle` must come from [`into_raw_handle::<T>`] and must not
/// have been released. The caller must not create overlapping borrows.
pub unsafe fn handle_mut<'a, T>(handle: RawHandle, subject: &'static str) -> Result<&'a mut T> {
    if handle == NULL_HANDLE {
        return Err(CodecError::Closed(subject));
    }
    Ok(&mut *(handle as usize as *mut T))
}

/// Drop the value behind `*slot` and zero the slot.
///
/// Returns `false` when the slot was already zero.
///
/// # Safety
///
/// Same provenance requirement as [`handle_mut`].
pub unsafe fn release_handle<T>(slot: &mut RawHandle) -> bool {
    let handle = std::mem::replace(slot, NULL_HANDLE);
    if handle == NULL_HANDLE {
        return false;
    }
    drop(Box::from_raw(handle as usize as *mut T));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_handle_roundtrip() {
        let mut handle = into_raw_handle(41_u32);
        assert_ne!(handle, NULL_HANDLE);

        unsafe {
            *handle_mut::<u32>(handle, "Counter").unwrap() += 1;
            assert_eq!(*handle_mut::<u32>(handle, "Counter").unwrap(), 42);
            assert!(release_handle::<u32>(&mut handle));
        }
        assert_eq!(handle, NULL_HANDLE);
    }

    #[test]
    fn test_zero_handle_is_closed() {
        let err = unsafe { handle_mut::<u32>(NULL_HANDLE, "Decoder") }.unwrap_err();
        assert!(matches!(err, CodecError::Closed("Decoder")));
    }

    #[test]
    fn test_double_release_drops_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut slot = into_raw_handle(DropCounter(drops.clone()));

        unsafe {
            assert!(release_handle::<DropCounter>(&mut slot));
            assert!(!release_handle::<DropCounter>(&mut slot));
        }
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }
}
