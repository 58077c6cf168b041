//! Process-wide data symbol
//!
//! `extern uint64_t GLOBALINT;` is exported as data, not behind an accessor,
//! so hosts read and write it in place. `AtomicU64` has the size of `u64`,
//! at least its alignment, and lives in writable memory, so the exported
//! symbol reads as a plain `uint64_t`. It is initialised at load time,
//! before any call can observe it, and never torn down.

use std::sync::atomic::{AtomicU64, Ordering};

/// Load-time value of [`GLOBALINT`] (2^63)
pub const GLOBALINT_INITIAL: u64 = 9_223_372_036_854_775_808;

#[no_mangle]
pub static GLOBALINT: AtomicU64 = AtomicU64::new(GLOBALINT_INITIAL);

/// Current value of [`GLOBALINT`].
///
/// Relaxed: the symbol carries no ordering contract with other state.
pub fn global_int() -> u64 {
    GLOBALINT.load(Ordering::Relaxed)
}

/// Overwrite [`GLOBALINT`], returning the previous value.
pub fn set_global_int(value: u64) -> u64 {
    GLOBALINT.swap(value, Ordering::Relaxed)
}
