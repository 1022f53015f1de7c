//! Test utilities for pybridge unit tests.
//!
//! Symbol table fixtures live in [`fixtures`]; this module adds helpers for
//! inspecting what a generation pass left on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use pybridge::test_support::{read_artifacts, Session};
//!
//! #[test]
//! fn test_example() {
//!     let session = Session::geom();
//!     let cx = session.cx();
//!     // Emit declarations against `cx`...
//! }
//! ```

pub mod fixtures;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::bind::emit::Streams;
use crate::bind::imports::GoImports;
use crate::bind::printer::Printer;

// Re-export fixtures for convenience
pub use fixtures::*;

/// Owned output buffers for driving emitters one declaration at a time.
#[derive(Debug, Default)]
pub struct Buffers {
    pub glue: Printer,
    pub build: Printer,
    pub wrap: Printer,
    pub imports: GoImports,
}

impl Buffers {
    pub fn streams(&mut self) -> Streams<'_> {
        Streams {
            glue: &mut self.glue,
            build: &mut self.build,
            wrap: &mut self.wrap,
            imports: &mut self.imports,
        }
    }

    /// True when nothing at all was emitted.
    pub fn is_empty(&self) -> bool {
        self.glue.is_empty() && self.build.is_empty() && self.wrap.is_empty() && self.imports.is_empty()
    }
}

/// Every regular file in `dir`, by file name, with its contents.
pub fn read_artifacts(dir: &Path) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    for entry in fs::read_dir(dir).expect("output dir should be readable") {
        let entry = entry.expect("dir entry");
        if entry.file_type().expect("file type").is_file() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let body = fs::read_to_string(entry.path()).expect("artifact should be utf-8");
            files.insert(name, body);
        }
    }
    files
}

/// Number of non-overlapping occurrences of `needle` in `haystack`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_artifacts_skips_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.py"), "x = 1\n").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        let files = read_artifacts(tmp.path());
        assert_eq!(files.len(), 1);
        assert_eq!(files["a.py"], "x = 1\n");
    }

    #[test]
    fn test_count() {
        assert_eq!(count("class A\nclass A\n", "class A"), 2);
        assert_eq!(count("", "x"), 0);
    }
}
