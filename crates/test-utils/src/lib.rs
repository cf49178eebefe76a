//! Shared test utilities for the countrymask workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Test data path helpers
//! - Skip macros for optional data (boundary layers, footprints)
//! - Grid and axis generators
//! - Gap-filling and country polygon fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{require_data_dir, fixtures};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro to skip a test if the required file is not found.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_test_file;
///
/// #[test]
/// fn test_read_footprint() {
///     let path = require_test_file!("EUROPE_footprint.nc");
///     // Test code using path...
/// }
/// ```
///
/// If the file is not found, the test will print a skip message and return early.
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Download test data or set TEST_DATA_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Macro to skip a test when the boundary/footprint data root is not
/// configured.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_data_dir;
///
/// #[test]
/// fn test_real_europe_mask() {
///     let data_dir = require_data_dir!();
///     // Test code using data_dir...
/// }
/// ```
#[macro_export]
macro_rules! require_data_dir {
    () => {{
        match $crate::find_data_dir() {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Data directory not found. Set {} to run this test.",
                    $crate::DATA_PATH_ENV
                );
                return;
            }
        }
    }};
}
