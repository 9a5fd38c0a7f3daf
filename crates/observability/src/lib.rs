//! Observability bootstrap shared by hosts and tests.

pub mod tracing;

/// Initialize process-wide tracing/logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
