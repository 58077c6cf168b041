//! Value-struct entry points
//!
//! Structs cross the boundary as their full byte representation. The
//! callee works on its own copy, so nothing it does to an argument is
//! visible to the caller, and every returned struct is an independent value.

use crate::types::{Double3, MyStruct, StructWithArray, StructWithStruct};
use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

/// `c` field of structs built by [`return_struct_by_value`]
pub const RETURN_STRUCT_C: c_int = 2;

/// `int struct_as_argument(double3 vector);`
///
/// Returns the component sum truncated toward zero.
#[no_mangle]
pub extern "C" fn struct_as_argument(mut vector: Double3) -> c_int {
    vector.x += vector.y + vector.z;
    vector.x as c_int
}

/// `MyStruct return_struct_by_value(float a, const char *b);`
///
/// The returned `b` is a fresh copy of the argument string. The struct is a
/// plain value but that field is a separate allocation the caller releases
/// with `free_string`.
///
/// # Safety
///
/// `b` must point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn return_struct_by_value(a: f32, b: *const c_char) -> MyStruct {
    let copy = CStr::from_ptr(b).to_owned().into_raw();
    tracing::debug!(copy = ?copy, "return_struct_by_value: string field allocated");
    MyStruct {
        a,
        b: copy,
        c: RETURN_STRUCT_C,
    }
}

/// `StructWithArray return_struct_with_array_by_value(void);`
#[no_mangle]
pub extern "C" fn return_struct_with_array_by_value() -> StructWithArray {
    StructWithArray {
        array1: [10.0, 20.0],
        array2: [30.0, 40.0, 50.0],
    }
}

/// `void accept_struct_ptr(MyStruct *arg);`
///
/// Borrows the pointee for the duration of the call. Never frees it.
///
/// # Safety
///
/// `arg` must be null or point to a readable `MyStruct`.
#[no_mangle]
pub unsafe extern "C" fn accept_struct_ptr(arg: *const MyStruct) {
    match arg.as_ref() {
        Some(s) => tracing::debug!(a = s.a, c = s.c, "accept_struct_ptr"),
        None => tracing::debug!("accept_struct_ptr: null"),
    }
}

/// `void accept_struct_with_array(StructWithArray arg);`
#[no_mangle]
pub extern "C" fn accept_struct_with_array(arg: StructWithArray) {
    trace_slots("accept_struct_with_array", &arg);
}

/// `void accept_struct_with_struct(StructWithStruct arg);`
#[no_mangle]
pub extern "C" fn accept_struct_with_struct(arg: StructWithStruct) {
    trace_slots("accept_struct_with_struct.struct1", &arg.struct1);
    trace_slots("accept_struct_with_struct.struct2", &arg.struct2);
}

/// `MyStruct *return_struct_ptr(void);` Release with `free_struct`.
///
/// The heap struct starts zeroed with a null `b`.
#[no_mangle]
pub extern "C" fn return_struct_ptr() -> *mut MyStruct {
    Box::into_raw(Box::new(MyStruct::default()))
}

/// Every slot of a [`StructWithArray`] in declaration order.
pub fn array_slots(s: &StructWithArray) -> impl Iterator<Item = f64> + '_ {
    s.array1.iter().chain(s.array2.iter()).copied()
}

fn trace_slots(origin: &'static str, s: &StructWithArray) {
    for (slot, value) in array_slots(s).enumerate() {
        tracing::trace!(origin, slot, value, "struct slot");
    }
}
