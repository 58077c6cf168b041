//! Caller-owned bulk buffers
//!
//! The host allocates; the library fills or inspects in place and never
//! keeps the address.

use std::os::raw::c_int;

/// Number of leading bytes [`check_buffer`] inspects
pub const CHECK_BUFFER_LEN: usize = 10;

/// `void make_buffer(uint8_t *addr, int length);`
///
/// Writes `addr[i] = i` (truncated to a byte) for every slot, then inspects
/// the prefix with [`check_buffer`] when the buffer is long enough.
/// A non-positive length writes nothing.
///
/// # Safety
///
/// `addr` must point to at least `length` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn make_buffer(addr: *mut u8, length: c_int) {
    let Ok(len) = usize::try_from(length) else {
        return;
    };
    if len == 0 {
        return;
    }
    let buffer = std::slice::from_raw_parts_mut(addr, len);
    for (i, slot) in buffer.iter_mut().enumerate() {
        *slot = i as u8;
    }
    if len >= CHECK_BUFFER_LEN {
        check_buffer(addr);
    }
}

/// `void check_buffer(uint8_t *addr);`
///
/// # Safety
///
/// `addr` must point to at least [`CHECK_BUFFER_LEN`] readable bytes.
#[no_mangle]
pub unsafe extern "C" fn check_buffer(addr: *const u8) {
    let prefix = std::slice::from_raw_parts(addr, CHECK_BUFFER_LEN);
    for (i, byte) in prefix.iter().enumerate() {
        tracing::debug!(index = i, byte, "check_buffer");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_buffer_fills_indices() {
        let mut buf = [0xFFu8; 16];
        unsafe { make_buffer(buf.as_mut_ptr(), buf.len() as c_int) };
        let expected: Vec<u8> = (0..16).collect();
        assert_eq!(buf.to_vec(), expected);
    }

    #[test]
    fn test_make_buffer_wraps_past_255() {
        let mut buf = vec![0u8; 300];
        unsafe { make_buffer(buf.as_mut_ptr(), 300) };
        assert_eq!(buf[255], 255);
        assert_eq!(buf[256], 0);
        assert_eq!(buf[299], 43);
    }

    #[test]
    fn test_make_buffer_short_and_empty() {
        let mut buf = [9u8; 4];
        unsafe { make_buffer(buf.as_mut_ptr(), 3) };
        assert_eq!(buf, [0, 1, 2, 9]);

        unsafe { make_buffer(buf.as_mut_ptr(), 0) };
        unsafe { make_buffer(buf.as_mut_ptr(), -5) };
        assert_eq!(buf, [0, 1, 2, 9]);
    }
}
