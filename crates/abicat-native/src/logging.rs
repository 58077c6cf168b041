//! Library-side logging
//!
//! Boundary functions log through `tracing`. Nothing is printed until the
//! host opts in with `abicat_init_logging`, which installs a stderr
//! subscriber filtered by `ABICAT_LOG` (default `warn`).

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "ABICAT_LOG";

const DEFAULT_FILTER: &str = "warn";

static INIT: Once = Once::new();

/// Install the subscriber once per process.
///
/// Returns `true` only on the call that installed it. A host that already
/// set a global subscriber gets `false` and keeps its own.
pub fn init() -> bool {
    let mut installed = false;
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .try_init()
            .is_ok();
    });
    installed
}

/// `bool abicat_init_logging(void);`
#[no_mangle]
pub extern "C" fn abicat_init_logging() -> bool {
    init()
}
