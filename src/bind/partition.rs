//! Target vs. external partitioning of the symbol table.
//!
//! A type symbol is *external* when its owning package is not being bound
//! in this session. External types are still needed (target declarations
//! mention them) so they are emitted centrally: once into the glue file and
//! once into each wrapper file.

use std::collections::{BTreeSet, HashSet};

use crate::core::{Package, QualName, Symbol, SymbolTable};

/// Import paths of the packages bound in this session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    paths: BTreeSet<String>,
}

impl TargetSet {
    pub fn from_packages(packages: &[Package]) -> Self {
        TargetSet {
            paths: packages.iter().map(|p| p.path.clone()).collect(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// A type declared outside every target package.
    pub fn is_external(&self, sym: &Symbol) -> bool {
        sym.is_type() && !self.contains(&sym.package.path)
    }

    /// External type symbols in global symbol order.
    ///
    /// Order is the table's, not grouped by package, so two runs over the
    /// same table interleave external types identically.
    pub fn external_types<'t>(&self, table: &'t SymbolTable) -> Vec<&'t Symbol> {
        table
            .symbols()
            .iter()
            .filter(|sym| self.is_external(sym))
            .collect()
    }
}

/// Symbols already written into one artifact.
///
/// Each artifact gets its own set; a symbol is written into an artifact
/// only the first time [`Emitted::first`] sees it.
#[derive(Debug, Default)]
pub struct Emitted {
    seen: HashSet<QualName>,
}

impl Emitted {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `sym` as emitted; `true` only the first time.
    pub fn first(&mut self, sym: &Symbol) -> bool {
        self.seen.insert(sym.qual_name())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
