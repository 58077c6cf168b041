//! abicat native catalogue
//!
//! A fixed set of C-ABI entry points, each exercising one pattern a binding
//! generator has to marshal correctly:
//! - Scalars by value and through input/output pointers
//! - Heap results whose ownership passes to the caller
//! - `#[repr(C)]` structs by value, nested structs and fixed arrays
//! - Pointer-to-pointer indirection and opaque handles
//! - Function-pointer callbacks (inline, typedef'd, nullable)
//! - Enumerations, 64-bit and size-width integers, `bool`
//! - One exported data symbol (`GLOBALINT`)
//!
//! # Safety
//!
//! The boundary mirrors a raw C ABI: passing invalid pointers is undefined
//! behavior, exactly as it would be in C. Every function that dereferences a
//! caller pointer is an `unsafe extern "C" fn` and documents its
//! preconditions. The [`binding`] module wraps the surface in safe Rust types.

pub mod binding;
pub mod buffer;
pub mod callbacks;
pub mod catalogue;
pub mod enums;
pub mod error;
pub mod global;
pub mod heap;
pub mod indirection;
pub mod logging;
pub mod release;
pub mod scalar;
pub mod structs;
pub mod types;

/// Callee allocations go through the system allocator so a host may also
/// release them with `free()` where `System` is `malloc`.
#[global_allocator]
static GLOBAL: std::alloc::System = std::alloc::System;

pub use error::{ContractResult, ContractViolation};
pub use global::{global_int, set_global_int, GLOBALINT, GLOBALINT_INITIAL};
pub use types::{
    Double3, FunctionTypedef, IntType, MyEnum, MyEnumAsInt, MyOpaqueStruct, MyStruct,
    StructWithArray, StructWithStruct,
};
