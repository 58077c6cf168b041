//! Opaque handles

use crate::indirection::accept_opaque_struct_ptr;
use crate::types::MyOpaqueStruct;
use std::ptr::NonNull;

/// A non-null `MyOpaqueStruct *` that is only ever forwarded
///
/// The layout is unknown on both sides, so the handle exposes no way to
/// read through it. It does not own the pointee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct OpaqueHandle(NonNull<MyOpaqueStruct>);

impl OpaqueHandle {
    /// Wrap a raw handle; `None` for null.
    pub fn from_raw(ptr: *mut MyOpaqueStruct) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(self) -> *mut MyOpaqueStruct {
        self.0.as_ptr()
    }

    /// Pass the handle to `accept_opaque_struct_ptr`
    pub fn forward(self) {
        accept_opaque_struct_ptr(self.as_ptr());
    }
}
