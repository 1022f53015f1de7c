//! Symbols and type references.
//!
//! A [`Symbol`] is a package-level declaration as reported by the upstream
//! analyzer. Declarations inside packages refer to types through
//! [`TypeRef`]s, which use a compact string form in the symbol table:
//!
//! ```text
//! int                         basic type
//! example.com/geom.Point      named type
//! *example.com/geom.Point     pointer to a named type
//! error                       the error interface (result position only)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Predeclared Go types that cross the boundary by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    #[serde(alias = "rune")]
    Int32,
    Int64,
    Uint,
    #[serde(alias = "byte")]
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
}

impl BasicKind {
    /// The Go spelling of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::String => "string",
        }
    }
}

impl fmt::Display for BasicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BasicKind {
    type Err = TypeRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "bool" => BasicKind::Bool,
            "int" => BasicKind::Int,
            "int8" => BasicKind::Int8,
            "int16" => BasicKind::Int16,
            "int32" | "rune" => BasicKind::Int32,
            "int64" => BasicKind::Int64,
            "uint" => BasicKind::Uint,
            "uint8" | "byte" => BasicKind::Uint8,
            "uint16" => BasicKind::Uint16,
            "uint32" => BasicKind::Uint32,
            "uint64" => BasicKind::Uint64,
            "float32" => BasicKind::Float32,
            "float64" => BasicKind::Float64,
            "string" => BasicKind::String,
            _ => return Err(TypeRefError::UnknownBasic(s.to_string())),
        };
        Ok(kind)
    }
}

/// Error returned when a type reference string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeRefError {
    #[error("empty type reference")]
    Empty,

    #[error("unknown basic type `{0}`")]
    UnknownBasic(String),

    #[error("`{0}` is not a qualified name (expected `import/path.Name`)")]
    Unqualified(String),

    #[error("`{0}`: only named types may be referenced through a pointer")]
    PointerToUnnamed(String),
}

/// A package-qualified name: import path plus declared name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualName {
    pub path: String,
    pub name: String,
}

impl QualName {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        QualName {
            path: path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.path, self.name)
    }
}

impl FromStr for QualName {
    type Err = TypeRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The name separator is the first dot after the last slash, so
        // dotted hosts like `example.com/x.T` split correctly.
        let seg_start = s.rfind('/').map(|i| i + 1).unwrap_or(0);
        let dot = s[seg_start..]
            .find('.')
            .map(|i| seg_start + i)
            .ok_or_else(|| TypeRefError::Unqualified(s.to_string()))?;
        let (path, name) = (&s[..dot], &s[dot + 1..]);
        if path.is_empty() || name.is_empty() {
            return Err(TypeRefError::Unqualified(s.to_string()));
        }
        Ok(QualName::new(path, name))
    }
}

/// A reference to a type from a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    Basic(BasicKind),
    Named(QualName),
    Pointer(QualName),
    Error,
}

impl TypeRef {
    pub fn named(path: impl Into<String>, name: impl Into<String>) -> Self {
        TypeRef::Named(QualName::new(path, name))
    }

    pub fn pointer(path: impl Into<String>, name: impl Into<String>) -> Self {
        TypeRef::Pointer(QualName::new(path, name))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TypeRef::Error)
    }

    /// The named type this reference points at, if any.
    pub fn qual_name(&self) -> Option<&QualName> {
        match self {
            TypeRef::Named(q) | TypeRef::Pointer(q) => Some(q),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Basic(kind) => write!(f, "{kind}"),
            TypeRef::Named(q) => write!(f, "{q}"),
            TypeRef::Pointer(q) => write!(f, "*{q}"),
            TypeRef::Error => f.write_str("error"),
        }
    }
}

impl FromStr for TypeRef {
    type Err = TypeRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TypeRefError::Empty);
        }
        if s == "error" {
            return Ok(TypeRef::Error);
        }
        if let Some(rest) = s.strip_prefix('*') {
            if !rest.contains('.') {
                return Err(TypeRefError::PointerToUnnamed(s.to_string()));
            }
            return rest.parse().map(TypeRef::Pointer);
        }
        if s.contains('.') {
            return s.parse().map(TypeRef::Named);
        }
        s.parse().map(TypeRef::Basic)
    }
}

impl TryFrom<String> for TypeRef {
    type Error = TypeRefError;

    fn try_from(value: String) -> Result<Self, TypeRefError> {
        value.parse()
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

/// Reference from a symbol to the package that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageRef {
    /// Import path
    pub path: String,
    /// Package name as used in Go source
    pub name: String,
}

impl PackageRef {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        PackageRef {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// What a symbol declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SymbolKind {
    Struct,
    Interface,
    Slice { elem: TypeRef },
    Map { key: TypeRef, elem: TypeRef },
    /// A named type whose underlying type is basic, e.g. `type Celsius float64`.
    Basic { underlying: BasicKind },
    Func,
    Const,
    Var,
}

/// A package-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub package: PackageRef,
    #[serde(flatten)]
    pub kind: SymbolKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>, package: PackageRef, kind: SymbolKind) -> Self {
        Symbol {
            name: name.into(),
            package,
            kind,
            doc: String::new(),
        }
    }

    pub fn is_type(&self) -> bool {
        !matches!(
            self.kind,
            SymbolKind::Func | SymbolKind::Const | SymbolKind::Var
        )
    }

    /// Whether values of this type cross the boundary as opaque handles.
    pub fn has_handle(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Struct | SymbolKind::Interface | SymbolKind::Slice { .. } | SymbolKind::Map { .. }
        )
    }

    pub fn qual_name(&self) -> QualName {
        QualName::new(&self.package.path, &self.name)
    }

    /// Identifier used for every generated entry point of this symbol,
    /// e.g. `geom_Point`.
    pub fn id(&self) -> String {
        format!("{}_{}", self.package.name, self.name)
    }

    /// The Go expression naming this type from the glue package.
    pub fn go_expr(&self) -> String {
        format!("{}.{}", self.package.name, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_refs() {
        assert_eq!("int".parse::<TypeRef>().unwrap(), TypeRef::Basic(BasicKind::Int));
        assert_eq!("byte".parse::<TypeRef>().unwrap(), TypeRef::Basic(BasicKind::Uint8));
        assert_eq!("error".parse::<TypeRef>().unwrap(), TypeRef::Error);
        assert_eq!(
            "example.com/geom.Point".parse::<TypeRef>().unwrap(),
            TypeRef::named("example.com/geom", "Point")
        );
        assert_eq!(
            "*example.com/geom.Point".parse::<TypeRef>().unwrap(),
            TypeRef::pointer("example.com/geom", "Point")
        );
        assert_eq!(
            "fmt.Stringer".parse::<TypeRef>().unwrap(),
            TypeRef::named("fmt", "Stringer")
        );
    }

    #[test]
    fn test_parse_type_ref_errors() {
        assert_eq!("".parse::<TypeRef>(), Err(TypeRefError::Empty));
        assert!(matches!(
            "complex128".parse::<TypeRef>(),
            Err(TypeRefError::UnknownBasic(_))
        ));
        assert!(matches!(
            "*int".parse::<TypeRef>(),
            Err(TypeRefError::PointerToUnnamed(_))
        ));
        assert!(matches!(
            "example.com/geom.".parse::<TypeRef>(),
            Err(TypeRefError::Unqualified(_))
        ));
    }

    #[test]
    fn test_type_ref_display_matches_parse() {
        for s in ["string", "error", "a.b/c.D", "*a.b/c.D"] {
            assert_eq!(s.parse::<TypeRef>().unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_symbol_json() {
        let json = r#"{
            "name": "Names",
            "package": {"path": "example.com/geom", "name": "geom"},
            "kind": "slice",
            "elem": "string"
        }"#;
        let sym: Symbol = serde_json::from_str(json).unwrap();
        assert_eq!(
            sym.kind,
            SymbolKind::Slice {
                elem: TypeRef::Basic(BasicKind::String)
            }
        );
        assert!(sym.is_type());
        assert!(sym.has_handle());
        assert_eq!(sym.id(), "geom_Names");
        assert_eq!(sym.go_expr(), "geom.Names");
    }

    #[test]
    fn test_non_type_symbols() {
        let pkg = PackageRef::new("example.com/geom", "geom");
        assert!(!Symbol::new("Area", pkg.clone(), SymbolKind::Func).is_type());
        assert!(!Symbol::new("Pi", pkg.clone(), SymbolKind::Const).is_type());
        let celsius = Symbol::new(
            "Celsius",
            pkg,
            SymbolKind::Basic {
                underlying: BasicKind::Float64,
            },
        );
        assert!(celsius.is_type());
        assert!(!celsius.has_handle());
    }
}
