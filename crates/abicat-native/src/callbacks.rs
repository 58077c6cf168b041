//! Function-pointer callbacks
//!
//! Every callback runs synchronously, at most once, before the receiving
//! function returns, and is never stored. Only
//! `accept_fn_pointer_with_primitive_args` accepts NULL; its parameter is an
//! `Option` and the null case is an explicit branch. The other parameters
//! are plain `extern "C" fn` types, which cannot be null in Rust, so passing
//! NULL there is a caller contract violation.

use crate::types::{FunctionTypedef, MyStruct};
use std::ffi::c_void;
use std::os::raw::c_int;

/// Argument passed by [`accept_fn_pointer_with_primitive_args`]
pub const PRIMITIVE_CALLBACK_ARG: c_int = 42;

/// `void accept_fn_pointer_with_no_args(void (*callback)());`
#[no_mangle]
pub extern "C" fn accept_fn_pointer_with_no_args(callback: extern "C" fn()) {
    callback();
}

/// `void accept_fn_typedef_arg(FunctionTypedef arg);`
///
/// Invoked with a null owner.
#[no_mangle]
pub extern "C" fn accept_fn_typedef_arg(arg: FunctionTypedef) {
    arg(std::ptr::null_mut());
}

/// `void accept_fn_pointer_with_primitive_args(void (*callback)(int arg));`
///
/// NULL is a defined no-op.
#[no_mangle]
pub extern "C" fn accept_fn_pointer_with_primitive_args(callback: Option<extern "C" fn(arg: c_int)>) {
    match callback {
        Some(callback) => callback(PRIMITIVE_CALLBACK_ARG),
        None => tracing::trace!("accept_fn_pointer_with_primitive_args: null callback"),
    }
}

/// `void accept_fn_pointer_with_ptr_args(void (*callback)(MyStruct *arg));`
///
/// Invoked with a null struct pointer.
#[no_mangle]
pub extern "C" fn accept_fn_pointer_with_ptr_args(callback: extern "C" fn(arg: *mut MyStruct)) {
    callback(std::ptr::null_mut());
}

/// `FunctionTypedef return_fn_typedef(void);`
///
/// The returned pointer refers to a function inside this library and stays
/// valid for as long as the library is loaded.
#[no_mangle]
pub extern "C" fn return_fn_typedef() -> FunctionTypedef {
    ignore_owner
}

extern "C" fn ignore_owner(owner: *mut c_void) {
    tracing::trace!(owner = ?owner, "return_fn_typedef target invoked");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    thread_local! {
        static CALLS: Cell<usize> = const { Cell::new(0) };
        static INTS: RefCell<Vec<c_int>> = const { RefCell::new(Vec::new()) };
        static OWNERS: RefCell<Vec<*mut c_void>> = const { RefCell::new(Vec::new()) };
        static STRUCTS: RefCell<Vec<*mut MyStruct>> = const { RefCell::new(Vec::new()) };
    }

    extern "C" fn count() {
        CALLS.with(|c| c.set(c.get() + 1));
    }

    extern "C" fn record_int(arg: c_int) {
        INTS.with(|v| v.borrow_mut().push(arg));
    }

    extern "C" fn record_owner(owner: *mut c_void) {
        OWNERS.with(|v| v.borrow_mut().push(owner));
    }

    extern "C" fn record_struct(arg: *mut MyStruct) {
        STRUCTS.with(|v| v.borrow_mut().push(arg));
    }

    #[test]
    fn test_no_args_callback_invoked_once() {
        CALLS.with(|c| c.set(0));
        accept_fn_pointer_with_no_args(count);
        assert_eq!(CALLS.with(Cell::get), 1);
    }

    #[test]
    fn test_typedef_callback_receives_null_owner() {
        accept_fn_typedef_arg(record_owner);
        OWNERS.with(|v| {
            let v = v.borrow();
            assert_eq!(v.len(), 1);
            assert!(v[0].is_null());
        });
    }

    #[test]
    fn test_primitive_callback_receives_42() {
        accept_fn_pointer_with_primitive_args(Some(record_int));
        INTS.with(|v| assert_eq!(*v.borrow(), vec![42]));
    }

    #[test]
    fn test_primitive_callback_null_is_noop() {
        accept_fn_pointer_with_primitive_args(None);
        INTS.with(|v| assert!(v.borrow().is_empty()));
    }

    #[test]
    fn test_ptr_callback_receives_null_struct() {
        accept_fn_pointer_with_ptr_args(record_struct);
        STRUCTS.with(|v| {
            let v = v.borrow();
            assert_eq!(v.len(), 1);
            assert!(v[0].is_null());
        });
    }

    #[test]
    fn test_return_fn_typedef_is_callable() {
        let f = return_fn_typedef();
        f(std::ptr::null_mut());
        accept_fn_typedef_arg(f);
    }

    #[test]
    fn test_option_fn_is_pointer_sized() {
        assert_eq!(
            std::mem::size_of::<Option<extern "C" fn(c_int)>>(),
            std::mem::size_of::<*const ()>()
        );
    }
}
