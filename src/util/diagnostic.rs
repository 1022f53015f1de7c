//! User-friendly diagnostic messages.
//!
//! A failed generation pass can report many problems at once; the CLI
//! renders them as one primary message with a context line per problem and
//! suggested fixes.

use std::fmt;
use std::path::PathBuf;

use crate::bind::errors::{BindError, GenerateError};

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when declarations could not be bound.
    pub const REGENERATE_TABLE: &str =
        "Regenerate the symbol table; declarations referencing unknown types are skipped";

    /// Suggestion when artifacts could not be written.
    pub const CHECK_OUTPUT_DIR: &str =
        "Check that the output directory is writable, or pass a different `--output`";

    /// Suggestion for an unsupported API version.
    pub const API_VERSION: &str = "Pass `--api 3` (or `--api 2` for legacy interpreters)";

    /// Suggestion when the table cannot be loaded.
    pub const TABLE_FORMAT: &str =
        "The table must be JSON with `packages` and `symbols` arrays";
}

/// An error message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Summarize a failed generation pass.
    ///
    /// Every recorded error becomes a context line, in the order it was
    /// encountered; each kind of error contributes one suggestion.
    pub fn from_generate_error(err: &GenerateError, output_dir: impl Into<PathBuf>) -> Self {
        let n = err.errors().len();
        let mut diag = Diagnostic::error(format!(
            "failed to generate bindings ({n} error{})",
            if n == 1 { "" } else { "s" }
        ))
        .with_location(output_dir);

        let (mut io, mut malformed, mut api) = (false, false, false);
        for e in err.errors() {
            diag = diag.with_context(e.to_string());
            match e {
                BindError::CreateDir { .. }
                | BindError::CreateFile { .. }
                | BindError::WriteFile { .. } => io = true,
                BindError::Malformed { .. } => malformed = true,
                BindError::UnsupportedApiVersion(_) => api = true,
            }
        }
        if io {
            diag = diag.with_suggestion(suggestions::CHECK_OUTPUT_DIR);
        }
        if malformed {
            diag = diag.with_suggestion(suggestions::REGENERATE_TABLE);
        }
        if api {
            diag = diag.with_suggestion(suggestions::API_VERSION);
        }
        diag
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let error_prefix = if color { "\x1b[1;31merror\x1b[0m" } else { "error" };

        // Main message
        output.push_str(&format!("{}: {}\n", error_prefix, self.message));

        // Location if present
        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        // Context lines
        for ctx in &self.context {
            output.push_str(&format!("  -> {}\n", ctx));
        }

        // Suggestions
        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
