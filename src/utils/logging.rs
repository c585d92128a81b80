//! Logging utilities
//!
//! Provides logging setup and configuration.

use env_logger::Env;

/// Setup logging, honouring `RUST_LOG` and defaulting to `info`.
///
/// Calling it again once a logger is installed has no effect.
pub fn setup_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_twice_is_harmless() {
        setup_logging();
        setup_logging();
        log::info!("logger installed");
    }
}
