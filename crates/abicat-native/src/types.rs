//! C-compatible type catalogue
//!
//! Every aggregate here is `#[repr(C)]` so field order, padding and alignment
//! match the equivalent C declaration exactly:
//!
//! ```c
//! typedef struct { double x; double y; double z; } double3;
//! struct MyStruct { float a; const char* b; int c; };
//! struct StructWithArray { double array1[2]; double array2[3]; };
//! struct StructWithStruct { StructWithArray struct1; StructWithArray struct2; };
//! typedef struct MyOpaqueStruct MyOpaqueStruct;
//! enum MyEnum { ENUM_VAL1, ENUM_VAL2 };
//! enum MyEnumAsInt { ENUM_AS_INT_VAL1, ENUM_AS_INT_VAL2 };
//! typedef void (*FunctionTypedef)(void *const owner);
//! typedef int INTTYPE;
//! ```

use crate::error::{ContractResult, ContractViolation};
use std::ffi::c_void;
use std::marker::{PhantomData, PhantomPinned};
use std::os::raw::{c_char, c_int};

/// `typedef int INTTYPE;`
pub type IntType = c_int;

/// `typedef void (*FunctionTypedef)(void *const owner);`
///
/// Non-nullable: the receiving function always calls it.
pub type FunctionTypedef = extern "C" fn(owner: *mut c_void);

/// Three-component vector passed by value.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Double3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Value struct carrying a pointer-owned sub-field.
///
/// Copying the struct copies the pointer, not the string. When produced by
/// `return_struct_by_value`, `b` is a separate allocation the caller releases
/// with `free_string`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MyStruct {
    pub a: f32,
    pub b: *const c_char,
    pub c: c_int,
}

impl Default for MyStruct {
    fn default() -> Self {
        Self {
            a: 0.0,
            b: std::ptr::null(),
            c: 0,
        }
    }
}

/// Struct with fixed-size array members.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StructWithArray {
    pub array1: [f64; 2],
    pub array2: [f64; 3],
}

/// Struct nesting two [`StructWithArray`] values.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StructWithStruct {
    pub struct1: StructWithArray,
    pub struct2: StructWithArray,
}

/// Incomplete type. Only ever seen behind a pointer.
///
/// Zero-sized with no constructor; the marker makes it `!Send`, `!Sync` and
/// `!Unpin` so Rust code cannot treat a handle as an ordinary value.
#[repr(C)]
pub struct MyOpaqueStruct {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Two-tag enumeration exchanged as a C `int`.
#[repr(C)]
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MyEnum {
    ENUM_VAL1 = 0,
    ENUM_VAL2 = 1,
}

impl MyEnum {
    pub const ALL: [MyEnum; 2] = [MyEnum::ENUM_VAL1, MyEnum::ENUM_VAL2];

    /// Interpret a raw tag received from the host.
    ///
    /// Tags outside the declared set are a contract violation, never mapped
    /// to a default variant.
    pub fn from_raw(tag: c_int) -> ContractResult<Self> {
        match tag {
            0 => Ok(MyEnum::ENUM_VAL1),
            1 => Ok(MyEnum::ENUM_VAL2),
            _ => Err(ContractViolation::InvalidEnumTag {
                enum_name: "MyEnum",
                tag,
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MyEnum::ENUM_VAL1 => "ENUM_VAL1",
            MyEnum::ENUM_VAL2 => "ENUM_VAL2",
        }
    }
}

/// Second enumeration, returned as a bare `enum MyEnumAsInt` (no typedef).
#[repr(C)]
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MyEnumAsInt {
    ENUM_AS_INT_VAL1 = 0,
    ENUM_AS_INT_VAL2 = 1,
}

impl MyEnumAsInt {
    pub const ALL: [MyEnumAsInt; 2] = [MyEnumAsInt::ENUM_AS_INT_VAL1, MyEnumAsInt::ENUM_AS_INT_VAL2];

    pub fn name(self) -> &'static str {
        match self {
            MyEnumAsInt::ENUM_AS_INT_VAL1 => "ENUM_AS_INT_VAL1",
            MyEnumAsInt::ENUM_AS_INT_VAL2 => "ENUM_AS_INT_VAL2",
        }
    }
}
