//! Core data structures for pybridge.
//!
//! This module contains the model handed over by the package analyzer:
//! - Type references and symbols (QualName, TypeRef, Symbol)
//! - Target packages and their declarations
//! - The symbol table tying both together

pub mod package;
pub mod symbol;
pub mod table;

pub use package::{Const, Field, Func, Interface, Package, Param, Struct, Var};
pub use symbol::{BasicKind, PackageRef, QualName, Symbol, SymbolKind, TypeRef, TypeRefError};
pub use table::{SymbolTable, TableError};
