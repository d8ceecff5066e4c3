//! Logging initialization and utilities

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// voxseg::core::logging::init();
/// log::info!("Segmentation started");
/// ```
pub fn init() {
    // try_init: tests and embedding hosts may already have installed a logger
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init();
}
