//! Binding generation errors.
//!
//! Generation never stops at the first problem: every step reports into an
//! [`ErrorList`] and the whole table is still walked, so a single run shows
//! everything that needs fixing.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// A single problem found while generating bindings.
#[derive(Debug, Error, Diagnostic)]
pub enum BindError {
    #[error("could not create output directory {}: {source}", .path.display())]
    #[diagnostic(code(pybridge::io::create_dir))]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not create {}: {source}", .path.display())]
    #[diagnostic(code(pybridge::io::create_file))]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {}: {source}", .path.display())]
    #[diagnostic(code(pybridge::io::write_file))]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{package}.{decl}: {detail}")]
    #[diagnostic(
        code(pybridge::bind::malformed),
        help("regenerate the symbol table; the declaration was skipped")
    )]
    Malformed {
        package: String,
        decl: String,
        detail: String,
    },

    #[error("unsupported python API version {0} (expected 2 or 3)")]
    #[diagnostic(code(pybridge::config::api_version))]
    UnsupportedApiVersion(u32),
}

impl BindError {
    pub fn malformed(
        package: impl Into<String>,
        decl: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        BindError::Malformed {
            package: package.into(),
            decl: decl.into(),
            detail: detail.into(),
        }
    }
}

/// Ordered accumulator of everything that went wrong during one pass.
#[derive(Debug, Default)]
pub struct ErrorList {
    errors: Vec<BindError>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: BindError) {
        tracing::warn!("{}", err);
        self.errors.push(err);
    }

    /// Keep the value of a successful step, record the error of a failed one.
    pub fn record<T>(&mut self, result: Result<T, BindError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.push(err);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok` when nothing was recorded, otherwise one error holding them all.
    pub fn into_result(self) -> Result<(), GenerateError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(GenerateError {
                errors: self.errors,
            })
        }
    }
}

/// Failure of a whole generation pass.
///
/// Displays as every recorded message, in the order encountered, one per
/// line.
#[derive(Debug, Error, Diagnostic)]
#[error("{}", join_messages(.errors))]
#[diagnostic(
    code(pybridge::generate),
    help("the output directory may hold partially written files; treat it as invalid")
)]
pub struct GenerateError {
    #[related]
    pub errors: Vec<BindError>,
}

impl GenerateError {
    pub fn errors(&self) -> &[BindError] {
        &self.errors
    }
}

fn join_messages(errors: &[BindError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
