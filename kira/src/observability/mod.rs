//! Observability utilities.

mod emitter;

pub use emitter::{
    CollectingValidationEmitter, LoggingValidationEmitter, NoOpValidationEmitter,
    ValidationEmitter, ValidationEvent, ValidationSummary, ValidationTimer,
};

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (for example `"kira=debug"`).
///
/// Returns `false` when a global subscriber was already set; calling it
/// again is harmless.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    fmt().with_env_filter(filter).try_init().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_repeatable() {
        let _ = init_tracing("kira=debug");
        assert!(!init_tracing("kira=debug"));
    }
}
