//! pybridge - Python bindings for Go packages
//!
//! This crate turns the symbol table of one or more analyzed Go packages
//! into a cgo glue file, a pybindgen build script, one Python wrapper per
//! package and a Makefile tying them together.

pub mod bind;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for pybridge unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides symbol table fixtures and helpers for
/// inspecting generated artifacts.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{Package, Symbol, SymbolTable, TypeRef};

pub use bind::{BindError, GenerateError, HandleConfig, HandleKind};
pub use ops::{generate, GenerateOptions};
