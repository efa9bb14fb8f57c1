//! Helpers shared by the integration suites under `backend/tests/`.
//!
//! Each suite compiles as its own crate, so suites pull this in with
//! `mod support;` and use only what they need.

#![allow(dead_code)]

pub mod embedded_postgres;

pub use embedded_postgres::{MigratedDatabase, migrated_database};

/// True when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes` (any case).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Turn a cluster bootstrap failure into a skip or a hard failure.
///
/// Returns `None` after printing a skip marker when `SKIP_TEST_CLUSTER` is
/// set; panics otherwise so CI does not silently lose coverage.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
