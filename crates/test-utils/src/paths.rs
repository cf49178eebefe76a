//! Path utilities for locating test data.
//!
//! Small fixtures live in per-crate `testdata/` directories. The real
//! boundary layers and footprint archives are large and only available when
//! `COUNTRYMASK_DATA_PATH` points at them.

use std::path::{Path, PathBuf};

/// Environment variable naming the data root.
pub const DATA_PATH_ENV: &str = "COUNTRYMASK_DATA_PATH";

/// Crates whose `testdata/` directories are searched by [`find_test_file`].
const TESTDATA_CRATES: &[&str] = &["countrymask", "netcdf-parser"];

/// Returns the workspace root directory.
///
/// Walks up from this crate's manifest directory to the first `Cargo.toml`
/// declaring a `[workspace]`.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .skip(1)
        .find(|dir| is_workspace_root(dir))
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

fn is_workspace_root(dir: &Path) -> bool {
    std::fs::read_to_string(dir.join("Cargo.toml"))
        .map(|manifest| manifest.lines().any(|line| line.trim() == "[workspace]"))
        .unwrap_or(false)
}

/// Returns `crates/{crate_name}/testdata/`.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Looks for a small fixture file.
///
/// Locations, in order: `$TEST_DATA_DIR`, the `testdata/` directory of each
/// crate that ships fixtures, then `testdata/` at the workspace root.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let from_env = std::env::var_os("TEST_DATA_DIR").map(|dir| PathBuf::from(dir).join(name));
    let from_crates = TESTDATA_CRATES
        .iter()
        .map(|krate| crate_testdata_dir(krate).join(name));
    let from_root = std::iter::once(workspace_root().join("testdata").join(name));

    from_env
        .into_iter()
        .chain(from_crates)
        .chain(from_root)
        .find(|path| path.is_file())
}

/// The data root named by `COUNTRYMASK_DATA_PATH`, if it exists.
pub fn find_data_dir() -> Option<PathBuf> {
    std::env::var_os(DATA_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| path.is_dir())
}

/// Temporary directory for footprints and mask output, removed on drop.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("countrymask_")
        .tempdir()
        .expect("Failed to create temporary test directory")
}
