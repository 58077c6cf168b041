//! Self-test probes
//!
//! Each probe drives one boundary property through the safe binding layer
//! and reports pass/fail. The command fails if any probe does.

use abicat_native::binding::{self, OpaqueHandle};
use abicat_native::catalogue;
use abicat_native::{global_int, set_global_int, Double3, MyEnum, MyEnumAsInt, GLOBALINT_INITIAL};
use anyhow::{bail, ensure, Result};
use colored::Colorize;
use serde::Serialize;
use std::os::raw::c_int;
use std::ptr::NonNull;

/// One named property check
pub struct Probe {
    pub name: &'static str,
    pub check: fn() -> Result<()>,
}

/// Outcome of one probe
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub name: &'static str,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

pub static PROBES: &[Probe] = &[
    Probe { name: "sum", check: sum },
    Probe { name: "subtract", check: subtract },
    Probe { name: "write_int", check: write_int },
    Probe { name: "make_buffer", check: make_buffer },
    Probe { name: "multiply", check: multiply },
    Probe { name: "divide", check: divide },
    Probe { name: "divide_precision", check: divide_precision },
    Probe { name: "copy_string", check: copy_string },
    Probe { name: "return_array", check: return_array },
    Probe { name: "struct_as_argument", check: struct_as_argument },
    Probe { name: "return_struct_by_value", check: return_struct_by_value },
    Probe { name: "return_struct_with_array_by_value", check: struct_with_array },
    Probe { name: "return_struct_ptr", check: return_struct_ptr },
    Probe { name: "ptr_ptr", check: ptr_ptr },
    Probe { name: "opaque_handle", check: opaque_handle },
    Probe { name: "void_ptr", check: void_ptr },
    Probe { name: "callback_no_args", check: callback_no_args },
    Probe { name: "callback_typedef", check: callback_typedef },
    Probe { name: "callback_primitive", check: callback_primitive },
    Probe { name: "callback_ptr", check: callback_ptr },
    Probe { name: "return_fn_typedef", check: return_fn_typedef },
    Probe { name: "enums", check: enums },
    Probe { name: "bigint_method", check: bigint_method },
    Probe { name: "size_tmethod", check: size_tmethod },
    Probe { name: "returns_bool", check: returns_bool },
    Probe { name: "globalint", check: globalint },
    Probe { name: "struct_layouts", check: struct_layouts },
    Probe { name: "catalogue", check: catalogue_consistent },
];

fn sum() -> Result<()> {
    ensure!(binding::sum(2, 3) == 5, "sum(2, 3) != 5");
    ensure!(binding::sum_with_typedef(2, 3) == 5, "sum_with_typedef(2, 3) != 5");
    ensure!(binding::sum(c_int::MAX, 1) == c_int::MIN, "sum does not wrap");
    Ok(())
}

fn subtract() -> Result<()> {
    let a: c_int = 7;
    let result = binding::subtract(&a, 3);
    ensure!(result == 4, "subtract(&7, 3) = {}", result);
    ensure!(a == 7, "pointee mutated to {}", a);
    Ok(())
}

fn write_int() -> Result<()> {
    let mut out = 0;
    binding::write_int(&mut out);
    ensure!(out == 10, "wrote {}", out);
    Ok(())
}

fn make_buffer() -> Result<()> {
    let mut buf = [0xffu8; 32];
    binding::make_buffer(&mut buf)?;
    let expected: Vec<u8> = (0..32).collect();
    ensure!(buf[..] == expected[..], "buffer = {:?}", buf);
    binding::check_buffer(&buf)?;
    Ok(())
}

fn multiply() -> Result<()> {
    let first = binding::multiply(6, 7)?;
    let second = binding::multiply(-2, 5)?;
    ensure!(*first == 42 && *second == -10, "products {} and {}", *first, *second);
    drop(first);
    ensure!(*second == -10, "releasing one result changed another");
    Ok(())
}

fn divide() -> Result<()> {
    let q = binding::divide(7, 2)?;
    ensure!(*q == 3.5, "divide(7, 2) = {}", *q);
    Ok(())
}

fn divide_precision() -> Result<()> {
    let q = binding::divide_precision(&1.0, &3.0)?;
    let expected = 1.0f64 / 3.0f64;
    ensure!((*q - expected).abs() < 1e-15, "divide_precision(1, 3) = {}", *q);
    Ok(())
}

fn copy_string() -> Result<()> {
    let input = c"hello";
    let copy = binding::copy_string(input)?;
    ensure!(copy.to_bytes_with_nul() == b"hello\0", "copy = {:?}", &*copy);
    ensure!(copy.as_ptr() != input.as_ptr(), "copy aliases its input");
    Ok(())
}

fn return_array() -> Result<()> {
    let array = binding::return_array()?;
    ensure!(*array == [1.0, 2.0, 3.0, 4.0], "array = {:?}", &*array);
    Ok(())
}

fn struct_as_argument() -> Result<()> {
    let v = Double3 { x: 1.0, y: 2.0, z: 3.0 };
    let result = binding::struct_as_argument(v);
    ensure!(result == 6, "struct_as_argument = {}", result);
    ensure!(v == Double3 { x: 1.0, y: 2.0, z: 3.0 }, "argument mutated");
    Ok(())
}

fn return_struct_by_value() -> Result<()> {
    let s = binding::return_struct_by_value(1.5, c"field");
    ensure!(s.a() == 1.5 && s.c() == 2, "a = {}, c = {}", s.a(), s.c());
    let b = s.b().map(|b| b.to_string_lossy().into_owned());
    ensure!(b.as_deref() == Some("field"), "b = {:?}", b);
    Ok(())
}

fn struct_with_array() -> Result<()> {
    let first = binding::return_struct_with_array_by_value();
    let mut second = binding::return_struct_with_array_by_value();
    ensure!(first.array1 == [10.0, 20.0], "array1 = {:?}", first.array1);
    ensure!(first.array2 == [30.0, 40.0, 50.0], "array2 = {:?}", first.array2);
    second.array1[0] = -1.0;
    let third = binding::return_struct_with_array_by_value();
    ensure!(third.array1[0] == 10.0, "results alias between calls");
    binding::accept_struct_with_array(first);
    binding::accept_struct_with_struct(binding::nested_struct());
    Ok(())
}

fn return_struct_ptr() -> Result<()> {
    let s = binding::return_struct_ptr()?;
    ensure!(s.b.is_null() && s.c == 0, "heap struct not zeroed");
    binding::accept_struct_ptr(&s);
    Ok(())
}

fn ptr_ptr() -> Result<()> {
    let pair = binding::ptr_ptr(&5, &9)?;
    ensure!(pair.values() == (9, 5), "ptr_ptr = {:?}", pair.values());
    Ok(())
}

fn opaque_handle() -> Result<()> {
    let handle = OpaqueHandle::from_raw(NonNull::dangling().as_ptr());
    match handle {
        Some(handle) => handle.forward(),
        None => bail!("dangling handle rejected"),
    }
    ensure!(OpaqueHandle::from_raw(std::ptr::null_mut()).is_none(), "null handle accepted");
    Ok(())
}

fn void_ptr() -> Result<()> {
    let mut x = 5u32;
    binding::accept_void_ptr(&mut x);
    ensure!(binding::return_void_ptr().is_none(), "return_void_ptr not NULL");
    Ok(())
}

fn callback_no_args() -> Result<()> {
    let mut calls = 0;
    binding::accept_fn_pointer_with_no_args(|| calls += 1);
    ensure!(calls == 1, "invoked {} times", calls);
    Ok(())
}

fn callback_typedef() -> Result<()> {
    let mut owners = Vec::new();
    binding::accept_fn_typedef_arg(|owner| owners.push(owner.is_null()));
    ensure!(owners == [true], "owners = {:?}", owners);
    Ok(())
}

fn callback_primitive() -> Result<()> {
    let mut args = Vec::new();
    binding::accept_fn_pointer_with_primitive_args(Some(|arg: c_int| args.push(arg)));
    ensure!(args == [42], "args = {:?}", args);
    binding::accept_fn_pointer_with_primitive_args(None::<fn(c_int)>);
    Ok(())
}

fn callback_ptr() -> Result<()> {
    let mut seen = Vec::new();
    binding::accept_fn_pointer_with_ptr_args(|arg| seen.push(arg.is_none()));
    ensure!(seen == [true], "seen = {:?}", seen);
    Ok(())
}

fn return_fn_typedef() -> Result<()> {
    let f = binding::return_fn_typedef();
    f(std::ptr::null_mut());
    Ok(())
}

fn enums() -> Result<()> {
    ensure!(binding::return_enum() == MyEnum::ENUM_VAL1, "return_enum");
    ensure!(binding::accept_enum(MyEnum::ENUM_VAL1) == 0, "accept_enum(ENUM_VAL1)");
    ensure!(binding::accept_enum(MyEnum::ENUM_VAL2) == 1, "accept_enum(ENUM_VAL2)");
    ensure!(
        binding::return_enum_as_int() == MyEnumAsInt::ENUM_AS_INT_VAL1,
        "return_enum_as_int"
    );
    Ok(())
}

fn bigint_method() -> Result<()> {
    ensure!(binding::bigint_method(u64::MAX) == 0, "no wrap at u64::MAX");
    let high = 1u64 << 40;
    ensure!(binding::bigint_method(high) == high + 1, "high bits truncated");
    Ok(())
}

fn size_tmethod() -> Result<()> {
    ensure!(binding::size_tmethod(usize::MAX) == 0, "no wrap at usize::MAX");
    Ok(())
}

fn returns_bool() -> Result<()> {
    ensure!(!binding::returns_bool(), "returns_bool() is true");
    Ok(())
}

fn globalint() -> Result<()> {
    ensure!(
        global_int() == GLOBALINT_INITIAL,
        "GLOBALINT = {} before any write",
        global_int()
    );
    let previous = set_global_int(17);
    let seen = global_int();
    set_global_int(previous);
    ensure!(seen == 17, "write not visible: {}", seen);
    Ok(())
}

fn struct_layouts() -> Result<()> {
    let layouts = catalogue::struct_layouts();
    let size_of = |name: &str| layouts.iter().find(|l| l.name == name).map(|l| l.size);
    ensure!(size_of("double3") == Some(24), "double3 size");
    ensure!(size_of("StructWithArray") == Some(40), "StructWithArray size");
    ensure!(size_of("StructWithStruct") == Some(80), "StructWithStruct size");
    Ok(())
}

fn catalogue_consistent() -> Result<()> {
    catalogue::validate()?;
    Ok(())
}

/// Run every probe in order
pub fn run_probes() -> Vec<ProbeResult> {
    PROBES
        .iter()
        .map(|probe| {
            let outcome = (probe.check)();
            tracing::debug!(probe = probe.name, passed = outcome.is_ok(), "probe finished");
            ProbeResult {
                name: probe.name,
                passed: outcome.is_ok(),
                detail: outcome.err().map(|e| format!("{:#}", e)),
            }
        })
        .collect()
}

pub fn run(json: bool) -> Result<()> {
    let results = run_probes();
    let failed = results.iter().filter(|r| !r.passed).count();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for r in &results {
            match &r.detail {
                None => println!("{} {}", "PASS".green(), r.name),
                Some(detail) => println!("{} {}: {}", "FAIL".red(), r.name, detail),
            }
        }
        println!("\n{} passed, {} failed", results.len() - failed, failed);
    }

    if failed > 0 {
        bail!("{} of {} probes failed", failed, results.len());
    }
    Ok(())
}
