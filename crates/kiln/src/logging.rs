//! Console logging setup for kiln binaries.
//!
//! Installs a `tracing` subscriber with an `EnvFilter`, defaulting the
//! engine crate to `info` when `RUST_LOG` is unset.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

/// Initializes console logging.
///
/// Safe to call multiple times - only the first call has effect, and a
/// subscriber installed elsewhere is left in place.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::builder()
            .with_default_directive("kiln_engine=info".parse().unwrap())
            .from_env_lossy();

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }
}
