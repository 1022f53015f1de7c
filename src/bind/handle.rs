//! Handle representation for Go objects referenced from Python.
//!
//! A Go value that cannot be copied across the boundary (struct, slice, map,
//! interface) is registered in a handle map on the Go side and Python only
//! ever holds its handle. The handle's type has to agree between the Go
//! glue, the cgo boundary and the pybindgen declarations; [`HandleConfig`]
//! carries the three spellings together.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selectable handle representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    /// 64-bit integer handles (fast)
    #[default]
    Int64,
    /// String handles (slower, readable when debugging)
    String,
}

impl HandleKind {
    pub fn config(self) -> HandleConfig {
        match self {
            HandleKind::Int64 => HandleConfig::INT64,
            HandleKind::String => HandleConfig::STRING,
        }
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleKind::Int64 => write!(f, "int64"),
            HandleKind::String => write!(f, "string"),
        }
    }
}

impl FromStr for HandleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "int64" | "int" => Ok(HandleKind::Int64),
            "string" | "str" => Ok(HandleKind::String),
            _ => Err(format!(
                "invalid handle kind '{}', valid values: int64, string",
                s
            )),
        }
    }
}

/// The three paired spellings of the handle type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleConfig {
    /// Go-side storage type (`type GoHandle ...`)
    pub go: &'static str,
    /// Type at the cgo boundary (`type CGoHandle ...`)
    pub cgo: &'static str,
    /// C type as declared to pybindgen
    pub py: &'static str,
    /// Go helpers `handleToRegistry` / `handleFromRegistry` mapping boundary
    /// handles onto gopyh registry handles
    pub registry: &'static str,
    /// Extra Go imports `registry` needs
    pub imports: &'static [&'static str],
}

impl HandleConfig {
    pub const INT64: HandleConfig = HandleConfig {
        go: "int64",
        cgo: "C.longlong",
        py: "int64_t",
        registry: "func handleToRegistry(h CGoHandle) gopyh.CGoHandle {
\treturn gopyh.CGoHandle(h)
}

func handleFromRegistry(h gopyh.CGoHandle) CGoHandle {
\treturn CGoHandle(h)
}
",
        imports: &[],
    };

    pub const STRING: HandleConfig = HandleConfig {
        go: "string",
        cgo: "*C.char",
        py: "char*",
        registry: "func handleToRegistry(h CGoHandle) gopyh.CGoHandle {
\tn, _ := strconv.ParseInt(C.GoString(h), 10, 64)
\treturn gopyh.CGoHandle(n)
}

func handleFromRegistry(h gopyh.CGoHandle) CGoHandle {
\treturn C.CString(strconv.FormatInt(int64(h), 10))
}
",
        imports: &["strconv"],
    };
}

impl Default for HandleConfig {
    fn default() -> Self {
        HandleConfig::INT64
    }
}
