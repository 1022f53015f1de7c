//! Type conversions across the Go / C / Python boundary.
//!
//! Every [`TypeRef`] mentioned by a declaration resolves to a [`Conversion`]
//! that knows the type's spelling on each side and the expressions that
//! move a value from C to Go and back. All emitters go through
//! [`BindContext::resolve`], which keeps the glue, the build script and the
//! wrappers agreeing on names.

use thiserror::Error;

use crate::bind::emit::py_safe;
use crate::bind::handle::HandleConfig;
use crate::bind::partition::TargetSet;
use crate::core::{BasicKind, QualName, Symbol, SymbolKind, SymbolTable, TypeRef};

/// Why a type reference could not be bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unresolved type `{0}`")]
    Unresolved(QualName),

    #[error("`{0}` is not a type")]
    NotAType(QualName),

    #[error("`error` is only supported as the last result")]
    MisplacedError,

    #[error("pointer to `{0}` is not supported; only struct, slice and map types are passed by pointer")]
    UnsupportedPointer(QualName),
}

/// Everything an emitter needs to know about the session.
#[derive(Debug, Clone, Copy)]
pub struct BindContext<'a> {
    pub table: &'a SymbolTable,
    pub targets: &'a TargetSet,
    pub handle: &'a HandleConfig,
    pub out_name: &'a str,
}

impl<'a> BindContext<'a> {
    /// Python module holding the compiled extension, e.g. `_geom`.
    pub fn ext_module(&self) -> String {
        format!("_{}", self.out_name)
    }

    /// Look up the type symbol a named reference points at.
    pub fn type_symbol(&self, name: &QualName) -> Result<&'a Symbol, ResolveError> {
        let sym = self
            .table
            .lookup(name)
            .ok_or_else(|| ResolveError::Unresolved(name.clone()))?;
        if !sym.is_type() {
            return Err(ResolveError::NotAType(name.clone()));
        }
        Ok(sym)
    }

    /// Python class name of a handle type, as seen from the wrapper of the
    /// package at `scope`.
    ///
    /// Types of the same package use their plain name, types of other
    /// target packages are reached through that package's module, and
    /// external types use the `<pkg>_<Name>` shadow class each wrapper
    /// defines.
    pub fn py_class(&self, sym: &Symbol, scope: &str) -> String {
        if !self.targets.contains(&sym.package.path) {
            sym.id()
        } else if sym.package.path == scope {
            py_safe(&sym.name).into_owned()
        } else {
            format!("{}.{}", sym.package.name, py_safe(&sym.name))
        }
    }

    /// Resolve `ty` for use in the wrapper of the package at `scope`.
    pub fn resolve(&self, ty: &TypeRef, scope: &str) -> Result<Conversion, ResolveError> {
        match ty {
            TypeRef::Basic(kind) => Ok(Conversion::basic(*kind)),
            TypeRef::Error => Err(ResolveError::MisplacedError),
            TypeRef::Named(name) => {
                let sym = self.type_symbol(name)?;
                Ok(match &sym.kind {
                    SymbolKind::Basic { underlying } => Conversion::named_basic(sym, *underlying),
                    SymbolKind::Interface => {
                        self.handle_conversion(sym, scope, sym.go_expr(), HandleAccess::Interface)
                    }
                    _ => self.handle_conversion(sym, scope, sym.go_expr(), HandleAccess::Value),
                })
            }
            TypeRef::Pointer(name) => {
                let sym = self.type_symbol(name)?;
                match sym.kind {
                    SymbolKind::Struct | SymbolKind::Slice { .. } | SymbolKind::Map { .. } => Ok(
                        self.handle_conversion(sym, scope, format!("*{}", sym.go_expr()), HandleAccess::Pointer),
                    ),
                    _ => Err(ResolveError::UnsupportedPointer(name.clone())),
                }
            }
        }
    }

    fn handle_conversion(
        &self,
        sym: &Symbol,
        scope: &str,
        go_type: String,
        access: HandleAccess,
    ) -> Conversion {
        Conversion {
            go_type,
            cgo_type: "CGoHandle".to_string(),
            py_type: self.handle.py.to_string(),
            py_class: Some(self.py_class(sym, scope)),
            import: None,
            kind: ConvKind::Handle {
                id: sym.id(),
                access,
            },
        }
    }
}

/// How a handle maps onto the Go value it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandleAccess {
    /// Registered as a pointer, used by value
    Value,
    /// Registered and used as a pointer
    Pointer,
    /// Interface values are registered as they are
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ConvKind {
    Numeric,
    Bool,
    String,
    /// Named type over a basic one; converts through its underlying type
    NamedBasic { underlying: BasicKind },
    Handle { id: String, access: HandleAccess },
}

/// How values of one type cross the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Go type as written in the glue file
    pub go_type: String,
    /// Type at the cgo boundary
    pub cgo_type: String,
    /// C type declared to pybindgen
    pub py_type: String,
    /// Shadow class wrapping returned handles
    pub py_class: Option<String>,
    /// Import path of the package `to_go` / `to_c` expressions name
    import: Option<String>,
    kind: ConvKind,
}

impl Conversion {
    pub fn basic(kind: BasicKind) -> Self {
        let (cgo, py) = match kind {
            BasicKind::Bool => ("C.char", "bool"),
            BasicKind::Int | BasicKind::Int64 => ("C.longlong", "int64_t"),
            BasicKind::Int8 => ("C.schar", "int8_t"),
            BasicKind::Int16 => ("C.short", "int16_t"),
            BasicKind::Int32 => ("C.int", "int32_t"),
            BasicKind::Uint | BasicKind::Uint64 => ("C.ulonglong", "uint64_t"),
            BasicKind::Uint8 => ("C.uchar", "uint8_t"),
            BasicKind::Uint16 => ("C.ushort", "uint16_t"),
            BasicKind::Uint32 => ("C.uint", "uint32_t"),
            BasicKind::Float32 => ("C.float", "float"),
            BasicKind::Float64 => ("C.double", "double"),
            BasicKind::String => ("*C.char", "char*"),
        };
        let conv = match kind {
            BasicKind::Bool => ConvKind::Bool,
            BasicKind::String => ConvKind::String,
            _ => ConvKind::Numeric,
        };
        Conversion {
            go_type: kind.as_str().to_string(),
            cgo_type: cgo.to_string(),
            py_type: py.to_string(),
            py_class: None,
            import: None,
            kind: conv,
        }
    }

    fn named_basic(sym: &Symbol, underlying: BasicKind) -> Self {
        let base = Conversion::basic(underlying);
        Conversion {
            go_type: sym.go_expr(),
            import: Some(sym.package.path.clone()),
            kind: ConvKind::NamedBasic { underlying },
            ..base
        }
    }

    /// Conversion used for slice indices, lengths and similar plumbing.
    pub fn index() -> Self {
        Conversion::basic(BasicKind::Int64)
    }

    /// Package the glue has to import for this conversion's expressions.
    ///
    /// Handle types go through their `ptrFromHandle_` / `handleFromPtr_`
    /// pair, so only named basic types mention their package directly.
    pub fn import(&self) -> Option<&str> {
        self.import.as_deref()
    }

    pub fn has_handle(&self) -> bool {
        matches!(self.kind, ConvKind::Handle { .. })
    }

    /// Go expression turning the C value `expr` into a Go value.
    pub fn to_go(&self, expr: &str) -> String {
        match &self.kind {
            ConvKind::Numeric => format!("{}({expr})", self.go_type),
            ConvKind::Bool => format!("boolPyToGo({expr})"),
            ConvKind::String => format!("C.GoString({expr})"),
            ConvKind::NamedBasic { underlying } => {
                let inner = Conversion::basic(*underlying).to_go(expr);
                format!("{}({inner})", self.go_type)
            }
            ConvKind::Handle { id, access } => match access {
                HandleAccess::Value => format!("*ptrFromHandle_{id}({expr})"),
                HandleAccess::Pointer | HandleAccess::Interface => {
                    format!("ptrFromHandle_{id}({expr})")
                }
            },
        }
    }

    /// Go expression turning the Go value `expr` into a C value.
    ///
    /// For handle types passed by value `expr` must be addressable.
    pub fn to_c(&self, expr: &str) -> String {
        match &self.kind {
            ConvKind::Numeric => format!("{}({expr})", self.cgo_type),
            ConvKind::Bool => format!("boolGoToPy({expr})"),
            ConvKind::String => format!("C.CString({expr})"),
            ConvKind::NamedBasic { underlying } => {
                let base = Conversion::basic(*underlying);
                base.to_c(&format!("{}({expr})", base.go_type))
            }
            ConvKind::Handle { id, access } => match access {
                HandleAccess::Value => format!("handleFromPtr_{id}(&{expr})"),
                HandleAccess::Pointer | HandleAccess::Interface => {
                    format!("handleFromPtr_{id}({expr})")
                }
            },
        }
    }

    /// Python expression passing the Python value `expr` to the extension.
    pub fn py_arg(&self, expr: &str) -> String {
        if self.has_handle() {
            format!("{expr}.handle")
        } else {
            expr.to_string()
        }
    }

    /// Python expression wrapping a value `expr` returned by the extension.
    pub fn py_ret(&self, expr: &str) -> String {
        match &self.py_class {
            Some(class) => format!("{class}(handle={expr})"),
            None => expr.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Package, PackageRef};

    const GEOM: &str = "example.com/geom";
    const UNITS: &str = "example.com/units";

    fn table() -> SymbolTable {
        let geom = PackageRef::new(GEOM, "geom");
        let units = PackageRef::new(UNITS, "units");
        SymbolTable::new(
            vec![Package::new(GEOM, "geom")],
            vec![
                Symbol::new("Point", geom.clone(), SymbolKind::Struct),
                Symbol::new("Shape", geom.clone(), SymbolKind::Interface),
                Symbol::new(
                    "Celsius",
                    geom.clone(),
                    SymbolKind::Basic {
                        underlying: BasicKind::Float64,
                    },
                ),
                Symbol::new("None", geom.clone(), SymbolKind::Struct),
                Symbol::new("Area", geom, SymbolKind::Func),
                Symbol::new("Meter", units, SymbolKind::Struct),
            ],
        )
    }

    fn with_cx<R>(f: impl FnOnce(&BindContext<'_>) -> R) -> R {
        let table = table();
        let targets = TargetSet::from_packages(table.packages());
        let cx = BindContext {
            table: &table,
            targets: &targets,
            handle: &HandleConfig::INT64,
            out_name: "geom",
        };
        f(&cx)
    }

    #[test]
    fn test_basic_conversions() {
        let int = Conversion::basic(BasicKind::Int);
        assert_eq!(int.to_go("a"), "int(a)");
        assert_eq!(int.to_c("a"), "C.longlong(a)");
        assert_eq!(int.py_type, "int64_t");

        let s = Conversion::basic(BasicKind::String);
        assert_eq!(s.to_go("a"), "C.GoString(a)");
        assert_eq!(s.to_c("a"), "C.CString(a)");

        let b = Conversion::basic(BasicKind::Bool);
        assert_eq!(b.to_go("a"), "boolPyToGo(a)");
        assert_eq!(b.to_c("a"), "boolGoToPy(a)");
        assert_eq!(b.cgo_type, "C.char");
    }

    #[test]
    fn test_named_basic() {
        with_cx(|cx| {
            let c = cx.resolve(&TypeRef::named(GEOM, "Celsius"), GEOM).unwrap();
            assert_eq!(c.go_type, "geom.Celsius");
            assert_eq!(c.cgo_type, "C.double");
            assert_eq!(c.to_go("v"), "geom.Celsius(float64(v))");
            assert_eq!(c.to_c("v"), "C.double(float64(v))");
            assert!(!c.has_handle());
            assert_eq!(c.import(), Some(GEOM));
        });
    }

    #[test]
    fn test_struct_by_value_and_pointer() {
        with_cx(|cx| {
            let v = cx.resolve(&TypeRef::named(GEOM, "Point"), GEOM).unwrap();
            assert_eq!(v.to_go("h"), "*ptrFromHandle_geom_Point(h)");
            assert_eq!(v.to_c("p"), "handleFromPtr_geom_Point(&p)");
            assert_eq!(v.cgo_type, "CGoHandle");
            assert_eq!(v.py_type, "int64_t");
            assert_eq!(v.py_ret("x"), "Point(handle=x)");
            assert_eq!(v.py_arg("p"), "p.handle");

            let p = cx.resolve(&TypeRef::pointer(GEOM, "Point"), GEOM).unwrap();
            assert_eq!(p.go_type, "*geom.Point");
            assert_eq!(p.to_go("h"), "ptrFromHandle_geom_Point(h)");
            assert_eq!(p.to_c("p"), "handleFromPtr_geom_Point(p)");
        });
    }

    #[test]
    fn test_interface() {
        with_cx(|cx| {
            let i = cx.resolve(&TypeRef::named(GEOM, "Shape"), GEOM).unwrap();
            assert_eq!(i.to_go("h"), "ptrFromHandle_geom_Shape(h)");
            assert_eq!(i.to_c("s"), "handleFromPtr_geom_Shape(s)");
            assert_eq!(
                cx.resolve(&TypeRef::pointer(GEOM, "Shape"), GEOM),
                Err(ResolveError::UnsupportedPointer(QualName::new(GEOM, "Shape")))
            );
        });
    }

    #[test]
    fn test_py_class_scopes() {
        with_cx(|cx| {
            let ext = cx.resolve(&TypeRef::named(UNITS, "Meter"), GEOM).unwrap();
            assert_eq!(ext.py_class.as_deref(), Some("units_Meter"));
            let other = cx.resolve(&TypeRef::named(GEOM, "Point"), "example.com/other").unwrap();
            assert_eq!(other.py_class.as_deref(), Some("geom.Point"));
            // Handles are reached through converters, never by package name.
            assert_eq!(other.import(), None);
            assert_eq!(Conversion::basic(BasicKind::Int).import(), None);
        });
    }

    #[test]
    fn test_py_class_avoids_keywords() {
        with_cx(|cx| {
            let own = cx.resolve(&TypeRef::named(GEOM, "None"), GEOM).unwrap();
            assert_eq!(own.py_class.as_deref(), Some("None_"));
            let other = cx.resolve(&TypeRef::named(GEOM, "None"), "example.com/other").unwrap();
            assert_eq!(other.py_class.as_deref(), Some("geom.None_"));
        });
    }

    #[test]
    fn test_resolve_errors() {
        with_cx(|cx| {
            assert_eq!(
                cx.resolve(&TypeRef::named(GEOM, "Missing"), GEOM),
                Err(ResolveError::Unresolved(QualName::new(GEOM, "Missing")))
            );
            assert_eq!(
                cx.resolve(&TypeRef::named(GEOM, "Area"), GEOM),
                Err(ResolveError::NotAType(QualName::new(GEOM, "Area")))
            );
            assert_eq!(cx.resolve(&TypeRef::Error, GEOM), Err(ResolveError::MisplacedError));
        });
    }
}
