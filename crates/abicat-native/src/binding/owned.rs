//! RAII owners for library allocations
//!
//! Each owner releases its allocation with the matching `free_*` export when
//! dropped, so a result is released exactly once and never by the wrong
//! deleter.

use crate::error::{ContractResult, ContractViolation};
use crate::heap::RETURN_ARRAY_LEN;
use crate::release::{free_array, free_ptr_ptr, free_string};
use crate::types::MyStruct;
use std::ffi::CStr;
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::os::raw::{c_char, c_int};
use std::ptr::NonNull;

/// Deleter for a single-cell allocation
pub type Release<T> = unsafe extern "C" fn(*mut T);

/// A single heap cell owned by the caller
pub struct Owned<T> {
    ptr: NonNull<T>,
    release: Release<T>,
}

impl<T> Owned<T> {
    /// Take ownership of `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live allocation that `release` frees.
    pub unsafe fn from_raw(
        ptr: *mut T,
        release: Release<T>,
        function: &'static str,
    ) -> ContractResult<Self> {
        let ptr = NonNull::new(ptr).ok_or(ContractViolation::NullResult { function })?;
        Ok(Self { ptr, release })
    }

    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Give up ownership without releasing
    pub fn into_raw(self) -> *mut T {
        let this = ManuallyDrop::new(self);
        this.ptr.as_ptr()
    }
}

impl<T> Deref for Owned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { self.ptr.as_ref() }
    }
}

impl<T> Drop for Owned<T> {
    fn drop(&mut self) {
        unsafe { (self.release)(self.ptr.as_ptr()) }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Owned<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Owned").field(&**self).finish()
    }
}

/// A `copy_string` result, released with `free_string`
pub struct OwnedCString {
    ptr: NonNull<c_char>,
}

impl OwnedCString {
    /// # Safety
    ///
    /// `ptr` must be null or a NUL-terminated string `free_string` can release.
    pub unsafe fn from_raw(ptr: *const c_char, function: &'static str) -> ContractResult<Self> {
        let ptr = NonNull::new(ptr as *mut c_char).ok_or(ContractViolation::NullResult { function })?;
        Ok(Self { ptr })
    }

    pub fn as_ptr(&self) -> *const c_char {
        self.ptr.as_ptr()
    }
}

impl Deref for OwnedCString {
    type Target = CStr;

    fn deref(&self) -> &CStr {
        unsafe { CStr::from_ptr(self.ptr.as_ptr()) }
    }
}

impl Drop for OwnedCString {
    fn drop(&mut self) {
        unsafe { free_string(self.ptr.as_ptr()) }
    }
}

impl std::fmt::Debug for OwnedCString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OwnedCString").field(&&**self).finish()
    }
}

/// A `return_array` result, released with `free_array`
pub struct OwnedArray {
    ptr: NonNull<f64>,
}

impl OwnedArray {
    /// # Safety
    ///
    /// `ptr` must be null or come from `return_array`.
    pub unsafe fn from_raw(ptr: *mut f64, function: &'static str) -> ContractResult<Self> {
        let ptr = NonNull::new(ptr).ok_or(ContractViolation::NullResult { function })?;
        Ok(Self { ptr })
    }
}

impl Deref for OwnedArray {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), RETURN_ARRAY_LEN) }
    }
}

impl Drop for OwnedArray {
    fn drop(&mut self) {
        unsafe { free_array(self.ptr.as_ptr()) }
    }
}

/// A `MyStruct` returned by value whose `b` field is caller-owned
///
/// The struct itself lives on the stack; dropping it releases only `b`.
pub struct OwnedStruct {
    inner: MyStruct,
}

impl OwnedStruct {
    /// # Safety
    ///
    /// `inner.b` must be null or a string `free_string` can release, and no
    /// other owner may release it.
    pub unsafe fn new(inner: MyStruct) -> Self {
        Self { inner }
    }

    pub fn a(&self) -> f32 {
        self.inner.a
    }

    pub fn b(&self) -> Option<&CStr> {
        if self.inner.b.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(self.inner.b) })
        }
    }

    pub fn c(&self) -> c_int {
        self.inner.c
    }

    /// Raw struct for passing back across the boundary by address
    pub fn as_raw(&self) -> &MyStruct {
        &self.inner
    }
}

impl Drop for OwnedStruct {
    fn drop(&mut self) {
        unsafe { free_string(self.inner.b) }
    }
}

/// A `ptr_ptr` result: two fresh cells behind a fresh `int*[2]`
pub struct IntPair {
    ptr: NonNull<*mut c_int>,
}

impl IntPair {
    /// # Safety
    ///
    /// `ptr` must be null or come from `ptr_ptr`.
    pub unsafe fn from_raw(ptr: *mut *mut c_int, function: &'static str) -> ContractResult<Self> {
        let ptr = NonNull::new(ptr).ok_or(ContractViolation::NullResult { function })?;
        Ok(Self { ptr })
    }

    pub fn first(&self) -> c_int {
        unsafe { **self.ptr.as_ptr() }
    }

    pub fn second(&self) -> c_int {
        unsafe { **self.ptr.as_ptr().add(1) }
    }

    pub fn values(&self) -> (c_int, c_int) {
        (self.first(), self.second())
    }
}

impl Drop for IntPair {
    fn drop(&mut self) {
        unsafe { free_ptr_ptr(self.ptr.as_ptr()) }
    }
}
