//! High-level operations.
//!
//! This module contains the implementation of pybridge commands.

pub mod generate;

pub use generate::{generate, GenerateOptions};
