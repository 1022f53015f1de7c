//! Import list of the glue file.
//!
//! Go refuses to build a file with an unused import, so the glue imports
//! exactly the packages its emitted code names. Emitters record a package
//! whenever they write one of its identifiers; the orchestrator renders the
//! header once the pass is over.

use std::collections::BTreeSet;

use crate::bind::convert::Conversion;

/// Sorted set of import paths referenced by emitted glue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoImports {
    paths: BTreeSet<String>,
}

impl GoImports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that glue code names the package at `path`.
    pub fn add(&mut self, path: &str) {
        if !self.paths.contains(path) {
            self.paths.insert(path.to_string());
        }
    }

    /// Record whatever package `conv`'s expressions name, if any.
    pub fn add_conversion(&mut self, conv: &Conversion) {
        if let Some(path) = conv.import() {
            self.add(path);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
