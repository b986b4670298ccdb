//! Integration test for global subscriber installation.
//!
//! Installing a subscriber is process-wide, so this file holds a single test
//! and runs in its own test binary.
//!
//! Run with: `cargo test --test logging_init`

use tempfile::TempDir;

use forge_overlay::config::LoggingConfig;
use forge_overlay::logging::{init_logging, LoggingError};

#[test]
fn test_init_with_file_then_reinit_fails() {
    let temp = TempDir::new().unwrap();
    let log_path = temp.path().join("logs").join("forge-overlay.log");
    std::fs::create_dir_all(log_path.parent().unwrap()).unwrap();

    let config = LoggingConfig::default().with_file(&log_path);
    let guard = init_logging(&config).unwrap();

    assert!(guard.is_some());
    assert!(log_path.is_file());

    tracing::warn!("Logging initialized for integration test");

    // The global subscriber is already set
    let err = init_logging(&LoggingConfig::default()).unwrap_err();
    assert!(matches!(err, LoggingError::AlreadyInitialized));

    drop(guard);
}
