//! Logging setup for binaries built on the crate
//!
//! The library itself only emits through the `log` facade.

/// Initialize the logging system with a default level
///
/// `RUST_LOG` still takes precedence when it is set. Calling this more than
/// once is harmless; later calls are ignored.
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_ignored() {
        init_with_level("debug");
        init_with_level("trace");
        log::debug!("logging initialized twice");
    }
}
