//! Heap-returning entry points
//!
//! Each function allocates fresh storage, writes one computed value into it
//! and hands the address to the caller. The library keeps no reference; the
//! caller releases it with the `free_*` function named on each item.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};

/// Slots in the array returned by [`return_array`]
pub const RETURN_ARRAY_LEN: usize = 4;

/// Contents of the array returned by [`return_array`]
pub const RETURN_ARRAY_VALUES: [f64; RETURN_ARRAY_LEN] = [1.0, 2.0, 3.0, 4.0];

/// `int *multiply(int a, int b);` Release with `free_int`.
#[no_mangle]
pub extern "C" fn multiply(a: c_int, b: c_int) -> *mut c_int {
    Box::into_raw(Box::new(a.wrapping_mul(b)))
}

/// `float *divide(int a, int b);` Release with `free_float`.
///
/// Both operands are promoted to `float` before dividing, so `b == 0`
/// yields an IEEE infinity or NaN rather than a fault.
#[no_mangle]
pub extern "C" fn divide(a: c_int, b: c_int) -> *mut f32 {
    Box::into_raw(Box::new(a as f32 / b as f32))
}

/// `double *divide_precision(float *a, float *b);` Release with `free_double`.
///
/// Narrow-to-wide promotion: each `float` is widened before the division.
///
/// # Safety
///
/// `a` and `b` must point to readable `float` values.
#[no_mangle]
pub unsafe extern "C" fn divide_precision(a: *const f32, b: *const f32) -> *mut f64 {
    let quotient = f64::from(*a) / f64::from(*b);
    Box::into_raw(Box::new(quotient))
}

/// `const char *copy_string(const char *instr);` Release with `free_string`.
///
/// Allocates `strlen(instr) + 1` bytes. The input stays caller-owned.
///
/// # Safety
///
/// `instr` must point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn copy_string(instr: *const c_char) -> *const c_char {
    let copy: CString = CStr::from_ptr(instr).to_owned();
    let out = copy.into_raw();
    tracing::debug!(input = ?instr, output = ?out, "copy_string");
    out
}

/// `double *return_array(void);` Release with `free_array`.
#[no_mangle]
pub extern "C" fn return_array() -> *mut f64 {
    Box::into_raw(Box::new(RETURN_ARRAY_VALUES)).cast::<f64>()
}
