//! Closure callbacks
//!
//! The boundary takes plain function pointers with no user-data slot, so a
//! closure cannot cross it directly. Each signature gets one `extern "C"`
//! trampoline that dispatches to a closure installed in a thread-local slot
//! for the duration of the call. Callbacks run synchronously on the calling
//! thread, so the slot never outlives the borrow of the closure.
//!
//! Closures must not panic: unwinding cannot leave an `extern "C"` frame.

use crate::callbacks;
use crate::types::MyStruct;
use std::cell::Cell;
use std::ffi::c_void;
use std::os::raw::c_int;
use std::ptr::NonNull;
use std::thread::LocalKey;

/// Type-erased `&mut F` plus the thunk that knows `F`
struct Pending<A> {
    data: *mut c_void,
    call: unsafe fn(*mut c_void, A),
}

impl<A> Clone for Pending<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Pending<A> {}

type Slot<A> = Cell<Option<Pending<A>>>;

thread_local! {
    static NO_ARGS: Slot<()> = const { Cell::new(None) };
    static OWNER: Slot<*mut c_void> = const { Cell::new(None) };
    static PRIMITIVE: Slot<c_int> = const { Cell::new(None) };
    static STRUCT_PTR: Slot<*mut MyStruct> = const { Cell::new(None) };
}

unsafe fn call_closure<A, F: FnMut(A)>(data: *mut c_void, arg: A) {
    (*data.cast::<F>())(arg)
}

/// Restores the previous slot value when the call returns
struct Restore<A: 'static> {
    slot: &'static LocalKey<Slot<A>>,
    previous: Option<Pending<A>>,
}

impl<A: 'static> Drop for Restore<A> {
    fn drop(&mut self) {
        let previous = self.previous.take();
        self.slot.with(|s| s.set(previous));
    }
}

fn scoped<A: 'static, F: FnMut(A), R>(
    slot: &'static LocalKey<Slot<A>>,
    mut closure: F,
    invoke: impl FnOnce() -> R,
) -> R {
    let pending = Pending {
        data: (&mut closure as *mut F).cast::<c_void>(),
        call: call_closure::<A, F>,
    };
    let previous = slot.with(|s| s.replace(Some(pending)));
    let _restore = Restore { slot, previous };
    invoke()
}

fn dispatch<A: 'static>(slot: &'static LocalKey<Slot<A>>, arg: A) {
    match slot.with(Cell::get) {
        Some(pending) => unsafe { (pending.call)(pending.data, arg) },
        None => tracing::warn!("callback trampoline invoked with no closure installed"),
    }
}

extern "C" fn no_args_trampoline() {
    dispatch(&NO_ARGS, ());
}

extern "C" fn owner_trampoline(owner: *mut c_void) {
    dispatch(&OWNER, owner);
}

extern "C" fn primitive_trampoline(arg: c_int) {
    dispatch(&PRIMITIVE, arg);
}

extern "C" fn struct_ptr_trampoline(arg: *mut MyStruct) {
    dispatch(&STRUCT_PTR, arg);
}

/// Run `callback` through `accept_fn_pointer_with_no_args`
pub fn accept_fn_pointer_with_no_args<F: FnMut()>(mut callback: F) {
    scoped(&NO_ARGS, |()| callback(), || {
        callbacks::accept_fn_pointer_with_no_args(no_args_trampoline)
    });
}

/// Run `callback` through `accept_fn_typedef_arg`; it receives the owner
/// pointer the library passes (NULL).
pub fn accept_fn_typedef_arg<F: FnMut(*mut c_void)>(callback: F) {
    scoped(&OWNER, callback, || {
        callbacks::accept_fn_typedef_arg(owner_trampoline)
    });
}

/// Run `callback` through `accept_fn_pointer_with_primitive_args`.
///
/// `None` crosses as a NULL function pointer.
pub fn accept_fn_pointer_with_primitive_args<F: FnMut(c_int)>(callback: Option<F>) {
    match callback {
        Some(callback) => scoped(&PRIMITIVE, callback, || {
            callbacks::accept_fn_pointer_with_primitive_args(Some(primitive_trampoline))
        }),
        None => callbacks::accept_fn_pointer_with_primitive_args(None),
    }
}

/// Run `callback` through `accept_fn_pointer_with_ptr_args`
pub fn accept_fn_pointer_with_ptr_args<F: FnMut(Option<NonNull<MyStruct>>)>(mut callback: F) {
    scoped(
        &STRUCT_PTR,
        |arg: *mut MyStruct| callback(NonNull::new(arg)),
        || callbacks::accept_fn_pointer_with_ptr_args(struct_ptr_trampoline),
    );
}
