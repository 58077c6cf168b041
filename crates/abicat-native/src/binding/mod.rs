//! Safe Rust bindings over the boundary
//!
//! Every function here calls the matching export through its C signature
//! and converts the raw contract into Rust types:
//! - input pointers become `&T`, output pointers `&mut T`
//! - transferred allocations become RAII owners ([`Owned`], [`OwnedCString`],
//!   [`OwnedArray`], [`OwnedStruct`], [`IntPair`]) that call the right `free_*`
//! - callbacks accept closures ([`callback`])
//! - the nullable callback is an `Option`
//! - enums are passed as [`MyEnum`], so no undeclared tag can be built
//!
//! ```
//! use abicat_native::binding;
//!
//! let product = binding::multiply(6, 7).unwrap();
//! assert_eq!(*product, 42);
//!
//! let copy = binding::copy_string(c"hello").unwrap();
//! assert_eq!(copy.to_str().unwrap(), "hello");
//! ```

pub mod callback;
pub mod handle;
pub mod owned;

pub use callback::{
    accept_fn_pointer_with_no_args, accept_fn_pointer_with_primitive_args,
    accept_fn_pointer_with_ptr_args, accept_fn_typedef_arg,
};
pub use handle::OpaqueHandle;
pub use owned::{IntPair, Owned, OwnedArray, OwnedCString, OwnedStruct};

use crate::buffer::{self, CHECK_BUFFER_LEN};
use crate::error::{ContractResult, ContractViolation};
use crate::release::{free_double, free_float, free_int, free_struct};
use crate::types::{Double3, FunctionTypedef, MyEnum, MyStruct, StructWithArray, StructWithStruct};
use crate::{callbacks, enums, heap, indirection, scalar, structs};
use std::ffi::{c_void, CStr};
use std::os::raw::c_int;
use std::ptr::NonNull;

pub use crate::enums::{bigint_method, return_enum, return_enum_as_int, returns_bool, size_tmethod};
pub use crate::scalar::{sum, sum_with_typedef};
pub use crate::structs::{
    accept_struct_with_array, accept_struct_with_struct, return_struct_with_array_by_value,
    struct_as_argument,
};

// ===== Scalars & pointer mutation =====

/// `*a - b`; `a` is read, never written.
pub fn subtract(a: &c_int, b: c_int) -> c_int {
    unsafe { scalar::subtract(a, b) }
}

/// Store 10 into `out`.
pub fn write_int(out: &mut i32) {
    unsafe { scalar::write_int(out) }
}

pub fn uint8_tptr_(data: &u8) {
    unsafe { scalar::uint8_tptr_(data) }
}

pub fn int8_tptr_method(data: &i8) {
    unsafe { scalar::int8_tptr_method(data) }
}

/// Fill `buf` with `buf[i] = i as u8`.
pub fn make_buffer(buf: &mut [u8]) -> ContractResult<()> {
    let length = c_int::try_from(buf.len()).map_err(|_| ContractViolation::BufferLength {
        function: "make_buffer",
        len: buf.len(),
    })?;
    unsafe { buffer::make_buffer(buf.as_mut_ptr(), length) };
    Ok(())
}

/// Inspect the first 10 bytes of `buf`.
pub fn check_buffer(buf: &[u8]) -> ContractResult<()> {
    if buf.len() < CHECK_BUFFER_LEN {
        return Err(ContractViolation::BufferLength {
            function: "check_buffer",
            len: buf.len(),
        });
    }
    unsafe { buffer::check_buffer(buf.as_ptr()) };
    Ok(())
}

// ===== Heap-returning =====

pub fn multiply(a: c_int, b: c_int) -> ContractResult<Owned<c_int>> {
    unsafe { Owned::from_raw(heap::multiply(a, b), free_int, "multiply") }
}

pub fn divide(a: c_int, b: c_int) -> ContractResult<Owned<f32>> {
    unsafe { Owned::from_raw(heap::divide(a, b), free_float, "divide") }
}

pub fn divide_precision(a: &f32, b: &f32) -> ContractResult<Owned<f64>> {
    unsafe {
        Owned::from_raw(
            heap::divide_precision(a, b),
            free_double,
            "divide_precision",
        )
    }
}

pub fn copy_string(instr: &CStr) -> ContractResult<OwnedCString> {
    unsafe { OwnedCString::from_raw(heap::copy_string(instr.as_ptr()), "copy_string") }
}

pub fn return_array() -> ContractResult<OwnedArray> {
    unsafe { OwnedArray::from_raw(heap::return_array(), "return_array") }
}

// ===== Value structs =====

/// `MyStruct {a, copy of b, 2}`; dropping the result releases the copy.
pub fn return_struct_by_value(a: f32, b: &CStr) -> OwnedStruct {
    unsafe { OwnedStruct::new(structs::return_struct_by_value(a, b.as_ptr())) }
}

pub fn accept_struct_ptr(arg: &MyStruct) {
    unsafe { structs::accept_struct_ptr(arg) }
}

pub fn return_struct_ptr() -> ContractResult<Owned<MyStruct>> {
    unsafe { Owned::from_raw(structs::return_struct_ptr(), free_struct, "return_struct_ptr") }
}

// ===== Indirection & opaque handles =====

/// Fresh pair holding `(*b, *a)`.
pub fn ptr_ptr(a: &c_int, b: &c_int) -> ContractResult<IntPair> {
    let a: *const c_int = a;
    let b: *const c_int = b;
    unsafe { IntPair::from_raw(indirection::ptr_ptr(&a, &b), "ptr_ptr") }
}

/// Forward any address as `void *`; it is never read.
pub fn accept_void_ptr<T>(arg: &mut T) {
    indirection::accept_void_ptr((arg as *mut T).cast::<c_void>());
}

pub fn return_void_ptr() -> Option<NonNull<c_void>> {
    NonNull::new(indirection::return_void_ptr())
}

// ===== Callbacks =====

/// Library-owned function valid while the library is loaded
pub fn return_fn_typedef() -> FunctionTypedef {
    callbacks::return_fn_typedef()
}

// ===== Enums =====

/// `ENUM_VAL1 -> 0`, `ENUM_VAL2 -> 1`
pub fn accept_enum(val: MyEnum) -> c_int {
    enums::accept_enum(val as c_int)
}

/// Components of a [`Double3`] summed by the library
pub fn double3_sum(x: f64, y: f64, z: f64) -> c_int {
    struct_as_argument(Double3 { x, y, z })
}

/// Both halves of a [`StructWithStruct`] built from the library's array struct
pub fn nested_struct() -> StructWithStruct {
    let half: StructWithArray = return_struct_with_array_by_value();
    StructWithStruct {
        struct1: half,
        struct2: half,
    }
}
