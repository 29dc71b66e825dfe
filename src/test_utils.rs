//! Test utilities shared across test modules

use crate::paths::Paths;
use crate::profiles::ProfileStore;
use tempfile::TempDir;

/// Create a Paths struct for testing using a temporary directory
///
/// Mirrors the real ~/.npmrcs/ and ~/.npmrc layout inside the temp directory.
pub fn setup_test_paths(temp_dir: &TempDir) -> Paths {
    Paths {
        store_dir: temp_dir.path().join(".npmrcs"),
        active_link: temp_dir.path().join(".npmrc"),
    }
}

/// Create a store handle with the store directory already in place
pub fn setup_test_store(temp_dir: &TempDir) -> ProfileStore {
    let store = ProfileStore::new(setup_test_paths(temp_dir));
    std::fs::create_dir_all(&store.paths().store_dir).unwrap();
    store
}
