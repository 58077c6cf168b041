//! Integration tests for the safe binding layer
//!
//! Closures through callbacks, RAII release and opaque handles.

use abicat_native::binding::{self, OpaqueHandle};
use abicat_native::{MyEnum, MyOpaqueStruct, MyStruct};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::ffi::c_void;
use std::os::raw::c_int;
use std::ptr::NonNull;

// ====================
// Callbacks
// ====================

#[test]
fn test_no_args_closure_runs_once() {
    let mut hits = Vec::new();
    binding::accept_fn_pointer_with_no_args(|| hits.push("called"));
    assert_eq!(hits, vec!["called"]);
}

#[test]
fn test_typedef_closure_gets_null_owner() {
    let mut owners: Vec<*mut c_void> = Vec::new();
    binding::accept_fn_typedef_arg(|owner| owners.push(owner));
    assert_eq!(owners.len(), 1);
    assert!(owners[0].is_null());
}

#[test]
fn test_primitive_closure_gets_42() {
    let mut seen = None;
    binding::accept_fn_pointer_with_primitive_args(Some(|arg: c_int| seen = Some(arg)));
    assert_eq!(seen, Some(42));
}

#[test]
fn test_primitive_none_is_noop() {
    binding::accept_fn_pointer_with_primitive_args(None::<fn(c_int)>);
}

#[test]
fn test_ptr_closure_gets_no_struct() {
    let mut seen: Vec<Option<NonNull<MyStruct>>> = Vec::new();
    binding::accept_fn_pointer_with_ptr_args(|arg| seen.push(arg));
    assert_eq!(seen, vec![None]);
}

#[test]
fn test_returned_typedef_round_trips_through_boundary() {
    let f = binding::return_fn_typedef();
    abicat_native::callbacks::accept_fn_typedef_arg(f);
}

// ====================
// Ownership
// ====================

#[test]
fn test_owned_results_release_on_drop() {
    for i in 0..1000 {
        let product = binding::multiply(i, 2).unwrap();
        assert_eq!(*product, i * 2);
        let copy = binding::copy_string(c"loop").unwrap();
        assert_eq!(copy.to_bytes(), b"loop");
        let pair = binding::ptr_ptr(&i, &-i).unwrap();
        assert_eq!(pair.values(), (-i, i));
    }
}

#[test]
fn test_owned_struct_releases_string_field() {
    let s = binding::return_struct_by_value(0.25, c"owned");
    assert_eq!(s.b().unwrap().to_str().unwrap(), "owned");
    drop(s);
}

#[test]
fn test_owned_heap_struct_fields() {
    let s = binding::return_struct_ptr().unwrap();
    assert_eq!((s.a, s.c), (0.0, 0));
    binding::accept_struct_ptr(&s);
}

// ====================
// Handles & enums
// ====================

#[test]
fn test_opaque_handle_forwarding() {
    let mut backing = 0u64;
    let raw = (&mut backing as *mut u64).cast::<MyOpaqueStruct>();
    let handle = OpaqueHandle::from_raw(raw).unwrap();
    handle.forward();
    assert_eq!(backing, 0);
}

#[rstest]
#[case(MyEnum::ENUM_VAL1, 0)]
#[case(MyEnum::ENUM_VAL2, 1)]
fn test_accept_enum_typed(#[case] tag: MyEnum, #[case] expected: c_int) {
    assert_eq!(binding::accept_enum(tag), expected);
}

#[test]
fn test_short_buffer_fills_but_fails_check() {
    let mut small = [0u8; 3];
    binding::make_buffer(&mut small).unwrap();
    assert_eq!(small, [0, 1, 2]);
    assert!(binding::check_buffer(&small).is_err());
}
