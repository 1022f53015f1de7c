//! The symbol table handed over by the package analyzer.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::core::package::Package;
use crate::core::symbol::{QualName, Symbol};

/// Errors raised while loading a symbol table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read symbol table {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse symbol table: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct RawTable {
    #[serde(default)]
    packages: Vec<Package>,
    #[serde(default)]
    symbols: Vec<Symbol>,
}

/// Ordered target packages plus every symbol reachable from them.
///
/// Symbol order is significant: generation walks `symbols` front to back,
/// so the same table always yields the same output.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    packages: Vec<Package>,
    symbols: Vec<Symbol>,
    index: HashMap<QualName, usize>,
}

impl SymbolTable {
    /// Build a table and associate struct constructors.
    pub fn new(mut packages: Vec<Package>, symbols: Vec<Symbol>) -> Self {
        for pkg in &mut packages {
            pkg.associate_constructors();
        }

        let mut index = HashMap::with_capacity(symbols.len());
        for (i, sym) in symbols.iter().enumerate() {
            // First occurrence wins so lookups agree with emission order.
            index.entry(sym.qual_name()).or_insert(i);
        }

        SymbolTable {
            packages,
            symbols,
            index,
        }
    }

    /// Parse a table from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let raw: RawTable = serde_json::from_str(json)?;
        Ok(Self::new(raw.packages, raw.symbols))
    }

    /// Load a table from a JSON file.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let contents = std::fs::read_to_string(path).map_err(|source| TableError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_json(&contents)?;
        tracing::debug!(
            "loaded symbol table {}: {} packages, {} symbols",
            path.display(),
            table.packages.len(),
            table.symbols.len()
        );
        Ok(table)
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// All symbols in their stable order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn lookup(&self, name: &QualName) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }

    pub fn package(&self, path: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.path == path)
    }
}
