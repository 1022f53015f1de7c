//! Per-package output sections.

use std::fmt;

/// A block of declarations of one kind within a package's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Types,
    Constants,
    Variables,
    Interfaces,
    Structs,
    Constructors,
    Functions,
}

/// The order sections appear in, in both the glue and the wrapper file.
///
/// Later sections may refer to names from earlier ones (a constructor
/// returns a struct's shadow class), so this order is part of the output
/// contract.
pub const SECTION_ORDER: [Section; 7] = [
    Section::Types,
    Section::Constants,
    Section::Variables,
    Section::Interfaces,
    Section::Structs,
    Section::Constructors,
    Section::Functions,
];

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Types => "Types",
            Section::Constants => "Constants",
            Section::Variables => "Global Variables: can only use functions to access",
            Section::Interfaces => "Interfaces",
            Section::Structs => "Structs",
            Section::Constructors => "Constructors",
            Section::Functions => "Functions",
        }
    }

    /// Banner opening this section in the glue file.
    pub fn glue_banner(&self) -> String {
        format!("\n// ---- {} ---\n", self.title())
    }

    /// Banner opening this section in a wrapper file.
    pub fn wrap_banner(&self) -> String {
        match self {
            Section::Constants => {
                "\n# ---- Constants from Go: Python can only ask that you please don't change these! ---\n"
                    .to_string()
            }
            _ => format!("\n# ---- {} ---\n", self.title()),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
