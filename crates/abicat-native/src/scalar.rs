//! Scalar and pointer-mutation entry points
//!
//! Three calling contracts:
//! - by value: arguments copied in, result copied out, no side effects
//! - read-through: the callee dereferences an input pointer without writing
//! - write-through: the callee stores into caller-provided storage and returns void
//!
//! Arithmetic wraps like two's-complement C on every target, so no input can
//! trigger a Rust overflow panic inside the boundary.

use crate::types::IntType;
use std::os::raw::c_int;

/// Value written by [`write_int`]
pub const WRITE_INT_VALUE: i32 = 10;

/// `int sum(int a, int b);`
#[no_mangle]
pub extern "C" fn sum(a: c_int, b: c_int) -> c_int {
    a.wrapping_add(b)
}

/// `INTTYPE sum_with_typedef(INTTYPE a, INTTYPE b);`
///
/// A typedef'd scalar must marshal exactly like its underlying type.
#[no_mangle]
pub extern "C" fn sum_with_typedef(a: IntType, b: IntType) -> IntType {
    a.wrapping_add(b)
}

/// `int subtract(int *a, int b);`
///
/// # Safety
///
/// `a` must point to a readable `int`. The pointee is never written.
#[no_mangle]
pub unsafe extern "C" fn subtract(a: *const c_int, b: c_int) -> c_int {
    (*a).wrapping_sub(b)
}

/// `void write_int(int32_t *out);`
///
/// # Safety
///
/// `out` must point to writable, caller-owned storage for one `int32_t`.
#[no_mangle]
pub unsafe extern "C" fn write_int(out: *mut i32) {
    out.write(WRITE_INT_VALUE);
}

/// `void uint8_tptr_(uint8_t *data);`
///
/// # Safety
///
/// `data` must point to a readable byte.
#[no_mangle]
pub unsafe extern "C" fn uint8_tptr_(data: *const u8) {
    tracing::trace!(value = *data, "uint8_tptr_");
}

/// `void int8_tptr_method(int8_t *data);`
///
/// # Safety
///
/// `data` must point to a readable byte.
#[no_mangle]
pub unsafe extern "C" fn int8_tptr_method(data: *const i8) {
    tracing::trace!(value = *data, "int8_tptr_method");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum() {
        assert_eq!(sum(2, 3), 5);
        assert_eq!(sum(-7, 7), 0);
    }

    #[test]
    fn test_sum_with_typedef_matches_sum() {
        assert_eq!(sum_with_typedef(2, 3), 5);
        assert_eq!(sum_with_typedef(i32::MAX, 1), sum(i32::MAX, 1));
    }

    #[test]
    fn test_sum_wraps_instead_of_panicking() {
        assert_eq!(sum(i32::MAX, 1), i32::MIN);
    }

    #[test]
    fn test_subtract_reads_without_mutating() {
        let a: c_int = 7;
        let result = unsafe { subtract(&a, 3) };
        assert_eq!(result, 4);
        assert_eq!(a, 7);
    }

    #[test]
    fn test_write_int_stores_through_pointer() {
        let mut out: i32 = 0;
        unsafe { write_int(&mut out) };
        assert_eq!(out, 10);
    }

    #[test]
    fn test_byte_pointers_are_read_only() {
        let unsigned: u8 = 200;
        let signed: i8 = -3;
        unsafe {
            uint8_tptr_(&unsigned);
            int8_tptr_method(&signed);
        }
        assert_eq!(unsigned, 200);
        assert_eq!(signed, -3);
    }
}
