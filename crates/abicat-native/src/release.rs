//! Release functions for callee allocations
//!
//! One deleter per allocation shape, each matching the allocation made by
//! its producer. NULL is accepted as a no-op everywhere. Releasing a pointer
//! twice, or one that came from elsewhere, is undefined.

use crate::heap::RETURN_ARRAY_LEN;
use crate::types::MyStruct;
use std::ffi::CString;
use std::os::raw::{c_char, c_int};

/// Slots in the outer array returned by `ptr_ptr`
pub const PTR_PTR_SLOTS: usize = 2;

/// `void free_int(int *ptr);` Releases `multiply` results.
///
/// # Safety
///
/// `ptr` must be null or come from `multiply` and not have been released.
#[no_mangle]
pub unsafe extern "C" fn free_int(ptr: *mut c_int) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// `void free_float(float *ptr);` Releases `divide` results.
///
/// # Safety
///
/// `ptr` must be null or come from `divide` and not have been released.
#[no_mangle]
pub unsafe extern "C" fn free_float(ptr: *mut f32) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// `void free_double(double *ptr);` Releases `divide_precision` results.
///
/// # Safety
///
/// `ptr` must be null or come from `divide_precision` and not have been released.
#[no_mangle]
pub unsafe extern "C" fn free_double(ptr: *mut f64) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// `void free_array(double *ptr);` Releases `return_array` results.
///
/// # Safety
///
/// `ptr` must be null or come from `return_array` and not have been released.
#[no_mangle]
pub unsafe extern "C" fn free_array(ptr: *mut f64) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr.cast::<[f64; RETURN_ARRAY_LEN]>()));
    }
}

/// `void free_string(const char *ptr);`
///
/// Releases `copy_string` results and the `b` field of structs returned by
/// `return_struct_by_value`.
///
/// # Safety
///
/// `ptr` must be null or a string allocated by this library and not yet released.
#[no_mangle]
pub unsafe extern "C" fn free_string(ptr: *const c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr as *mut c_char));
    }
}

/// `void free_ptr_ptr(int **ptr);`
///
/// Releases both inner cells and the outer array returned by `ptr_ptr`.
///
/// # Safety
///
/// `ptr` must be null or come from `ptr_ptr` and not have been released.
#[no_mangle]
pub unsafe extern "C" fn free_ptr_ptr(ptr: *mut *mut c_int) {
    if ptr.is_null() {
        return;
    }
    let outer = Box::from_raw(ptr.cast::<[*mut c_int; PTR_PTR_SLOTS]>());
    for cell in outer.iter() {
        free_int(*cell);
    }
}

/// `void free_struct(MyStruct *ptr);`
///
/// Releases a `return_struct_ptr` result, including a non-null `b` field.
///
/// # Safety
///
/// `ptr` must be null or come from `return_struct_ptr` and not have been
/// released. A non-null `b` must be owned by this library.
#[no_mangle]
pub unsafe extern "C" fn free_struct(ptr: *mut MyStruct) {
    if ptr.is_null() {
        return;
    }
    let owned = Box::from_raw(ptr);
    free_string(owned.b);
}
