//! Shared test utilities for the folio test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let src = setup_fixtures();
//! let out = TempDir::new().unwrap();
//! build(src.path(), out.path(), &load_config(src.path()).unwrap()).unwrap();
//!
//! let html = read_page(out.path(), "photography/street.html");
//! assert!(html.contains("bridge.jpg"));
//! ```

use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Output lookups, panicking with a clear message on miss
// =========================================================================

/// Read a generated page. Panics if it was not written.
pub fn read_page(output: &Path, relative: &str) -> String {
    std::fs::read_to_string(output.join(relative)).unwrap_or_else(|e| {
        let mut pages: Vec<String> = walkdir::WalkDir::new(output)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                e.path()
                    .strip_prefix(output)
                    .ok()
                    .map(|p| p.display().to_string())
            })
            .collect();
        pages.sort();
        panic!("page '{relative}' not readable ({e}). Written: {pages:?}")
    })
}
