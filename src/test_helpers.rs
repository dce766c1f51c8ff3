//! Shared test utilities for the simple-capsule test suite.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let cartas = find_collection(&manifest, "cartas");
//! assert_eq!(section_stems(cartas, "01_inicio"), vec!["primeira_carta", "segunda_carta"]);
//! ```

use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::scan::Manifest;
use crate::types::{Collection, Document};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
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
// Lookups
// =========================================================================

/// Find a collection by directory name. Panics with the available names.
pub fn find_collection<'a>(manifest: &'a Manifest, name: &str) -> &'a Collection {
    manifest
        .collections
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = manifest.collections.iter().map(|c| c.name.as_str()).collect();
            panic!("collection '{name}' not found, have {names:?}")
        })
}

/// Find a page by stem. Panics with the available stems.
pub fn find_page<'a>(manifest: &'a Manifest, stem: &str) -> &'a Document {
    manifest
        .pages
        .iter()
        .find(|p| p.stem == stem)
        .unwrap_or_else(|| {
            let stems: Vec<&str> = manifest.pages.iter().map(|p| p.stem.as_str()).collect();
            panic!("page '{stem}' not found, have {stems:?}")
        })
}

/// Document stems of one section, in order.
pub fn section_stems<'a>(collection: &'a Collection, key: &str) -> Vec<&'a str> {
    collection
        .section(key)
        .unwrap_or_else(|| panic!("section '{key}' not in {}", collection.name))
        .documents
        .iter()
        .map(|d| d.stem.as_str())
        .collect()
}

// =========================================================================
// Log capture
// =========================================================================

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a warn-level subscriber and return what it logged.
pub fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logged = String::from_utf8_lossy(&buffer.0.lock().unwrap()).to_string();
    (out, logged)
}
