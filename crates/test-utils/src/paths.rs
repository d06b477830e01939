//! Locating optional test data.
//!
//! The production land-mass polygon file is large and not checked in. Tests
//! that want it look in a few well-known places and skip when it is absent.

use std::path::PathBuf;

/// Workspace root, two levels above this crate's manifest.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// `crates/{crate_name}/testdata/`
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Find `name` in, in order:
/// 1. `TEST_DATA_DIR`
/// 2. the directory of the file named by `ESPA_LAND_MASS_POLYGON`
/// 3. `crates/land-water-mask/testdata/`
/// 4. `testdata/` at the workspace root
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(dir) = std::env::var("TEST_DATA_DIR") {
        candidates.push(PathBuf::from(dir).join(name));
    }
    if let Ok(polygon_file) = std::env::var("ESPA_LAND_MASS_POLYGON") {
        if let Some(dir) = PathBuf::from(polygon_file).parent() {
            candidates.push(dir.join(name));
        }
    }
    candidates.push(crate_testdata_dir("land-water-mask").join(name));
    candidates.push(workspace_root().join("testdata").join(name));

    candidates.into_iter().find(|path| path.is_file())
}

/// Scratch directory removed on drop, named with `prefix`.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}
