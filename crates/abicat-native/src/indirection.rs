//! Indirection and opaque handles
//!
//! `ptr_ptr` allocates a two-level structure; the handle functions only
//! forward addresses and never read through them.

use crate::release::PTR_PTR_SLOTS;
use crate::types::MyOpaqueStruct;
use std::ffi::c_void;
use std::os::raw::c_int;

/// `int **ptr_ptr(int **a, int **b);` Release with `free_ptr_ptr`.
///
/// Returns a fresh `int*[2]` with the values swapped: `*out[0] == **b`,
/// `*out[1] == **a`. Both inner cells are new allocations.
///
/// # Safety
///
/// `a` and `b` must each point to a valid pointer to a readable `int`.
#[no_mangle]
pub unsafe extern "C" fn ptr_ptr(a: *const *const c_int, b: *const *const c_int) -> *mut *mut c_int {
    let first = Box::into_raw(Box::new(**b));
    let second = Box::into_raw(Box::new(**a));
    let outer: Box<[*mut c_int; PTR_PTR_SLOTS]> = Box::new([first, second]);
    Box::into_raw(outer).cast::<*mut c_int>()
}

/// `void accept_opaque_struct_ptr(MyOpaqueStruct *ptr);`
///
/// The handle is only forwarded. Any address, including null, is accepted
/// because the callee never dereferences it.
#[no_mangle]
pub extern "C" fn accept_opaque_struct_ptr(ptr: *mut MyOpaqueStruct) {
    tracing::trace!(handle = ?ptr, "accept_opaque_struct_ptr");
}

/// `void accept_void_ptr(void *arg);`
#[no_mangle]
pub extern "C" fn accept_void_ptr(arg: *mut c_void) {
    tracing::trace!(arg = ?arg, "accept_void_ptr");
}

/// `void *return_void_ptr(void);`
///
/// Always NULL. The shape under test is the untyped pointer return itself.
#[no_mangle]
pub extern "C" fn return_void_ptr() -> *mut c_void {
    std::ptr::null_mut()
}
