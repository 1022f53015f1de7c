//! Indenting text buffer for generated artifacts.

use std::fmt;

/// An in-memory artifact under construction.
///
/// Each non-empty line is prefixed with the current indentation when its
/// first character is written. `write!`/`writeln!` work directly on a
/// `Printer` and cannot fail, since the buffer is a `String`.
#[derive(Debug, Clone)]
pub struct Printer {
    buf: String,
    indent_each: &'static str,
    level: usize,
    at_line_start: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Printer::new("\t")
    }
}

impl Printer {
    /// Create an empty printer using `indent_each` per indentation level.
    pub fn new(indent_each: &'static str) -> Self {
        Printer {
            buf: String::new(),
            indent_each,
            level: 0,
            at_line_start: true,
        }
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn outdent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Append text, indenting each line as it starts.
    pub fn push_str(&mut self, text: &str) {
        for line in text.split_inclusive('\n') {
            if self.at_line_start && line != "\n" {
                for _ in 0..self.level {
                    self.buf.push_str(self.indent_each);
                }
            }
            self.buf.push_str(line);
            self.at_line_start = line.ends_with('\n');
        }
    }

    /// Target of the `write!` family of macros.
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(s) => self.push_str(s),
            None => self.push_str(&args.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
