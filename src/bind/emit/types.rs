//! Named types: handle converters and container classes.
//!
//! Every handle type gets a `ptrFromHandle_<id>` / `handleFromPtr_<id>`
//! converter pair in the glue file; everything else that passes the type
//! across the boundary goes through that pair. Slices and maps also get
//! container entry points and, in their own package's wrapper, a Python
//! class behaving like a `list` or `dict`.

use crate::bind::convert::{BindContext, Conversion};
use crate::bind::emit::{py_safe, write_handle_init, write_py_doc};
use crate::bind::errors::BindError;
use crate::bind::imports::GoImports;
use crate::bind::printer::Printer;
use crate::core::{Symbol, SymbolKind};

/// A type symbol whose element types have been resolved.
#[derive(Debug, Clone)]
pub struct ResolvedType<'s> {
    sym: &'s Symbol,
    shape: Shape,
}

#[derive(Debug, Clone)]
enum Shape {
    Struct,
    Interface,
    Slice { elem: Conversion },
    Map { key: Conversion, elem: Conversion },
    Basic,
}

impl<'s> ResolvedType<'s> {
    /// Resolve the element types of `sym` for use in the wrapper of the
    /// package at `scope`.
    pub fn resolve(cx: &BindContext<'_>, sym: &'s Symbol, scope: &str) -> Result<Self, BindError> {
        let malformed = |e: crate::bind::convert::ResolveError| {
            BindError::malformed(&sym.package.name, &sym.name, e.to_string())
        };
        let shape = match &sym.kind {
            SymbolKind::Struct => Shape::Struct,
            SymbolKind::Interface => Shape::Interface,
            SymbolKind::Basic { .. } => Shape::Basic,
            SymbolKind::Slice { elem } => Shape::Slice {
                elem: cx.resolve(elem, scope).map_err(malformed)?,
            },
            SymbolKind::Map { key, elem } => {
                let key = cx.resolve(key, scope).map_err(malformed)?;
                if key.has_handle() {
                    return Err(BindError::malformed(
                        &sym.package.name,
                        &sym.name,
                        "map keys must be basic types",
                    ));
                }
                Shape::Map {
                    key,
                    elem: cx.resolve(elem, scope).map_err(malformed)?,
                }
            }
            SymbolKind::Func | SymbolKind::Const | SymbolKind::Var => {
                return Err(BindError::malformed(
                    &sym.package.name,
                    &sym.name,
                    "not a type declaration",
                ))
            }
        };
        Ok(ResolvedType { sym, shape })
    }

    /// Glue converters and container entry points. Every package the glue
    /// names is recorded in `imports`.
    pub fn emit_glue(
        &self,
        cx: &BindContext<'_>,
        glue: &mut Printer,
        build: &mut Printer,
        imports: &mut GoImports,
    ) {
        if matches!(self.shape, Shape::Basic) {
            return;
        }
        imports.add(&self.sym.package.path);
        match &self.shape {
            Shape::Slice { elem } => imports.add_conversion(elem),
            Shape::Map { key, elem } => {
                imports.add_conversion(key);
                imports.add_conversion(elem);
            }
            _ => {}
        }
        self.emit_converters(glue);
        match &self.shape {
            Shape::Slice { elem } => self.emit_slice_glue(cx, elem, glue, build),
            Shape::Map { key, elem } => self.emit_map_glue(cx, key, elem, glue, build),
            _ => {}
        }
    }

    fn emit_converters(&self, glue: &mut Printer) {
        let id = self.sym.id();
        let go = self.sym.go_expr();
        // Interfaces are registered as values, everything else by pointer.
        let (desc, ptr_ty) = match self.shape {
            Shape::Interface => ("interface", go.clone()),
            _ => ("pointer", format!("*{go}")),
        };
        writeln!(glue, "// Converters for {desc} handle type: {go}");
        writeln!(glue, "func ptrFromHandle_{id}(_h CGoHandle) {ptr_ty} {{");
        glue.indent();
        writeln!(glue, "_p := gopyh.VarFromHandle(handleToRegistry(_h), {go:?})");
        writeln!(glue, "if _p == nil {{");
        writeln!(glue, "\treturn nil");
        writeln!(glue, "}}");
        writeln!(glue, "return _p.({ptr_ty})");
        glue.outdent();
        writeln!(glue, "}}");
        writeln!(glue, "func handleFromPtr_{id}(_p interface{{}}) CGoHandle {{");
        writeln!(glue, "\treturn handleFromRegistry(gopyh.Register({go:?}, _p))");
        writeln!(glue, "}}\n");
    }

    fn emit_slice_glue(&self, cx: &BindContext<'_>, elem: &Conversion, glue: &mut Printer, build: &mut Printer) {
        let id = self.sym.id();
        let go = self.sym.go_expr();
        let h = cx.handle.py;
        let idx = Conversion::index();

        self.emit_ctor_glue(cx, glue, build);

        writeln!(glue, "//export {id}_len");
        writeln!(glue, "func {id}_len(_handle CGoHandle) C.longlong {{");
        writeln!(glue, "\treturn C.longlong(len(*ptrFromHandle_{id}(_handle)))");
        writeln!(glue, "}}\n");
        writeln!(build, "mod.add_function('{id}_len', retval('{}'), [param('{h}', 'handle')])", idx.py_type);

        writeln!(glue, "//export {id}_elem");
        writeln!(glue, "func {id}_elem(_handle CGoHandle, _idx C.longlong) {} {{", elem.cgo_type);
        writeln!(glue, "\t_s := ptrFromHandle_{id}(_handle)");
        writeln!(glue, "\treturn {}", elem.to_c("(*_s)[_idx]"));
        writeln!(glue, "}}\n");
        writeln!(
            build,
            "mod.add_function('{id}_elem', retval('{}'), [param('{h}', 'handle'), param('{}', '_idx')])",
            elem.py_type, idx.py_type
        );

        writeln!(glue, "//export {id}_set");
        writeln!(glue, "func {id}_set(_handle CGoHandle, _idx C.longlong, _vl {}) {{", elem.cgo_type);
        writeln!(glue, "\t_s := ptrFromHandle_{id}(_handle)");
        writeln!(glue, "\t(*_s)[_idx] = {}", elem.to_go("_vl"));
        writeln!(glue, "}}\n");
        writeln!(
            build,
            "mod.add_function('{id}_set', None, [param('{h}', 'handle'), param('{}', '_idx'), param('{}', '_vl')])",
            idx.py_type, elem.py_type
        );

        writeln!(glue, "//export {id}_append");
        writeln!(glue, "func {id}_append(_handle CGoHandle, _vl {}) {{", elem.cgo_type);
        writeln!(glue, "\t_s := ptrFromHandle_{id}(_handle)");
        writeln!(glue, "\t*_s = append(*_s, {})", elem.to_go("_vl"));
        writeln!(glue, "}}\n");
        writeln!(
            build,
            "mod.add_function('{id}_append', None, [param('{h}', 'handle'), param('{}', '_vl')])",
            elem.py_type
        );
        tracing::trace!("slice {go}: elem {}", elem.go_type);
    }

    fn emit_map_glue(
        &self,
        cx: &BindContext<'_>,
        key: &Conversion,
        elem: &Conversion,
        glue: &mut Printer,
        build: &mut Printer,
    ) {
        let id = self.sym.id();
        let h = cx.handle.py;
        let idx = Conversion::index();

        self.emit_ctor_glue(cx, glue, build);

        writeln!(glue, "//export {id}_len");
        writeln!(glue, "func {id}_len(_handle CGoHandle) C.longlong {{");
        writeln!(glue, "\treturn C.longlong(len(*ptrFromHandle_{id}(_handle)))");
        writeln!(glue, "}}\n");
        writeln!(build, "mod.add_function('{id}_len', retval('{}'), [param('{h}', 'handle')])", idx.py_type);

        writeln!(glue, "//export {id}_elem");
        writeln!(glue, "func {id}_elem(_handle CGoHandle, _ky {}) {} {{", key.cgo_type, elem.cgo_type);
        glue.indent();
        writeln!(glue, "_s := ptrFromHandle_{id}(_handle)");
        writeln!(glue, "_v, _ok := (*_s)[{}]", key.to_go("_ky"));
        writeln!(glue, "if !_ok {{");
        writeln!(glue, "\tC.PyErr_SetString(C.PyExc_KeyError, C.CString(\"key not in map\"))");
        writeln!(glue, "}}");
        writeln!(glue, "return {}", elem.to_c("_v"));
        glue.outdent();
        writeln!(glue, "}}\n");
        writeln!(
            build,
            "mod.add_function('{id}_elem', retval('{}'), [param('{h}', 'handle'), param('{}', '_ky')])",
            elem.py_type, key.py_type
        );

        writeln!(glue, "//export {id}_set");
        writeln!(glue, "func {id}_set(_handle CGoHandle, _ky {}, _vl {}) {{", key.cgo_type, elem.cgo_type);
        writeln!(glue, "\t_s := ptrFromHandle_{id}(_handle)");
        writeln!(glue, "\t(*_s)[{}] = {}", key.to_go("_ky"), elem.to_go("_vl"));
        writeln!(glue, "}}\n");
        writeln!(
            build,
            "mod.add_function('{id}_set', None, [param('{h}', 'handle'), param('{}', '_ky'), param('{}', '_vl')])",
            key.py_type, elem.py_type
        );

        writeln!(glue, "//export {id}_delete");
        writeln!(glue, "func {id}_delete(_handle CGoHandle, _ky {}) {{", key.cgo_type);
        writeln!(glue, "\t_s := ptrFromHandle_{id}(_handle)");
        writeln!(glue, "\tdelete(*_s, {})", key.to_go("_ky"));
        writeln!(glue, "}}\n");
        writeln!(
            build,
            "mod.add_function('{id}_delete', None, [param('{h}', 'handle'), param('{}', '_ky')])",
            key.py_type
        );
    }

    fn emit_ctor_glue(&self, cx: &BindContext<'_>, glue: &mut Printer, build: &mut Printer) {
        let id = self.sym.id();
        writeln!(glue, "//export {id}_CTor");
        writeln!(glue, "func {id}_CTor() CGoHandle {{");
        writeln!(glue, "\treturn handleFromPtr_{id}(&{}{{}})", self.sym.go_expr());
        writeln!(glue, "}}\n");
        writeln!(build, "mod.add_function('{id}_CTor', retval('{}'), [])", cx.handle.py);
    }

    /// Container class for a slice or map in its own package's wrapper.
    /// Structs, interfaces and basic types are handled elsewhere.
    pub fn emit_container_class(&self, cx: &BindContext<'_>, wrap: &mut Printer) {
        let ext = cx.ext_module();
        let id = self.sym.id();
        match &self.shape {
            Shape::Slice { elem } => {
                writeln!(wrap, "# Python type for slice {}", self.sym.go_expr());
                writeln!(wrap, "class {}(GoClass):", py_safe(&self.sym.name));
                wrap.indent();
                write_py_doc(wrap, &self.sym.doc);
                write_handle_init(
                    wrap,
                    &ext,
                    Some(&format!("{id}_CTor")),
                    "otherwise parameter is a python list that we copy from",
                    |wrap| {
                        writeln!(wrap, "if len(args) > 0:");
                        writeln!(wrap, "\tfor elt in args[0]:");
                        writeln!(wrap, "\t\tself.append(elt)");
                    },
                );
                writeln!(wrap, "def __len__(self):");
                writeln!(wrap, "\treturn {ext}.{id}_len(self.handle)");
                writeln!(wrap, "def __getitem__(self, idx):");
                writeln!(wrap, "\tif idx < 0 or idx >= len(self):");
                writeln!(wrap, "\t\traise IndexError('slice index out of range')");
                writeln!(wrap, "\treturn {}", elem.py_ret(&format!("{ext}.{id}_elem(self.handle, idx)")));
                writeln!(wrap, "def __setitem__(self, idx, value):");
                writeln!(wrap, "\tif idx < 0 or idx >= len(self):");
                writeln!(wrap, "\t\traise IndexError('slice index out of range')");
                writeln!(wrap, "\t{ext}.{id}_set(self.handle, idx, {})", elem.py_arg("value"));
                writeln!(wrap, "def __iter__(self):");
                writeln!(wrap, "\tfor idx in range(len(self)):");
                writeln!(wrap, "\t\tyield self[idx]");
                writeln!(wrap, "def append(self, value):");
                writeln!(wrap, "\t{ext}.{id}_append(self.handle, {})", elem.py_arg("value"));
                wrap.outdent();
                writeln!(wrap);
            }
            Shape::Map { key, elem } => {
                writeln!(wrap, "# Python type for map {}", self.sym.go_expr());
                writeln!(wrap, "class {}(GoClass):", py_safe(&self.sym.name));
                wrap.indent();
                write_py_doc(wrap, &self.sym.doc);
                write_handle_init(
                    wrap,
                    &ext,
                    Some(&format!("{id}_CTor")),
                    "otherwise parameter is a python dict that we copy from",
                    |wrap| {
                        writeln!(wrap, "if len(args) > 0:");
                        writeln!(wrap, "\tfor k, v in args[0].items():");
                        writeln!(wrap, "\t\tself[k] = v");
                    },
                );
                writeln!(wrap, "def __len__(self):");
                writeln!(wrap, "\treturn {ext}.{id}_len(self.handle)");
                writeln!(wrap, "def __getitem__(self, key):");
                writeln!(
                    wrap,
                    "\treturn {}",
                    elem.py_ret(&format!("{ext}.{id}_elem(self.handle, {})", key.py_arg("key")))
                );
                writeln!(wrap, "def __setitem__(self, key, value):");
                writeln!(
                    wrap,
                    "\t{ext}.{id}_set(self.handle, {}, {})",
                    key.py_arg("key"),
                    elem.py_arg("value")
                );
                writeln!(wrap, "def __delitem__(self, key):");
                writeln!(wrap, "\t{ext}.{id}_delete(self.handle, {})", key.py_arg("key"));
                wrap.outdent();
                writeln!(wrap);
            }
            Shape::Struct | Shape::Interface | Shape::Basic => {}
        }
    }
}

/// Minimal handle-only shadow class for a type owned by a package that is
/// not bound in this session. Named basic types need none.
pub fn emit_external_class(cx: &BindContext<'_>, sym: &Symbol, wrap: &mut Printer) {
    let kind = match sym.kind {
        SymbolKind::Struct => "struct",
        SymbolKind::Interface => "interface",
        SymbolKind::Slice { .. } => "slice",
        SymbolKind::Map { .. } => "map",
        SymbolKind::Basic { .. } | SymbolKind::Func | SymbolKind::Const | SymbolKind::Var => return,
    };
    writeln!(wrap, "# Python type for {kind} {}", sym.go_expr());
    writeln!(wrap, "class {}(GoClass):", sym.id());
    wrap.indent();
    write_py_doc(wrap, &sym.doc);
    write_handle_init(wrap, &cx.ext_module(), None, "", |_| {});
    wrap.outdent();
    writeln!(wrap);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BasicKind, Package, PackageRef, SymbolTable, TypeRef};
    use crate::test_support::fixtures::Session;

    fn sym<'a>(session: &'a Session, name: &str) -> &'a Symbol {
        session
            .table
            .symbols()
            .iter()
            .find(|s| s.name == name)
            .unwrap()
    }

    #[test]
    fn test_struct_converters() {
        let session = Session::geom();
        let cx = session.cx();
        let ty = ResolvedType::resolve(&cx, sym(&session, "Point"), "example.com/geom").unwrap();
        let (mut glue, mut build, mut imports) = (Printer::default(), Printer::default(), GoImports::new());
        ty.emit_glue(&cx, &mut glue, &mut build, &mut imports);
        assert!(glue
            .as_str()
            .contains("func ptrFromHandle_geom_Point(_h CGoHandle) *geom.Point {\n"));
        assert!(glue.as_str().contains("\treturn _p.(*geom.Point)\n"));
        assert!(glue.as_str().contains("gopyh.Register(\"geom.Point\", _p)"));
        assert!(build.is_empty());
        assert_eq!(imports.iter().collect::<Vec<_>>(), ["example.com/geom"]);
    }

    #[test]
    fn test_interface_converters_use_values() {
        let session = Session::geom();
        let cx = session.cx();
        let ty = ResolvedType::resolve(&cx, sym(&session, "Shape"), "example.com/geom").unwrap();
        let (mut glue, mut build, mut imports) = (Printer::default(), Printer::default(), GoImports::new());
        ty.emit_glue(&cx, &mut glue, &mut build, &mut imports);
        assert!(glue
            .as_str()
            .contains("func ptrFromHandle_geom_Shape(_h CGoHandle) geom.Shape {\n"));
        assert!(glue.as_str().contains("\treturn _p.(geom.Shape)\n"));
    }

    #[test]
    fn test_slice_of_structs() {
        let session = Session::geom();
        let cx = session.cx();
        let ty = ResolvedType::resolve(&cx, sym(&session, "Path"), "example.com/geom").unwrap();
        let (mut glue, mut build, mut wrap) = (Printer::default(), Printer::default(), Printer::default());
        ty.emit_glue(&cx, &mut glue, &mut build, &mut GoImports::new());
        ty.emit_container_class(&cx, &mut wrap);

        assert!(glue.as_str().contains("\treturn handleFromPtr_geom_Path(&geom.Path{})\n"));
        assert!(glue.as_str().contains("\treturn handleFromPtr_geom_Point(&(*_s)[_idx])\n"));
        assert!(glue.as_str().contains("\t*_s = append(*_s, *ptrFromHandle_geom_Point(_vl))\n"));
        assert!(build.as_str().contains("mod.add_function('geom_Path_append', None,"));
        assert!(wrap.as_str().contains("class Path(GoClass):\n"));
        assert!(wrap
            .as_str()
            .contains("\t\treturn Point(handle=_geom.geom_Path_elem(self.handle, idx))\n"));
        assert!(wrap
            .as_str()
            .contains("\t\t\tself.handle = _geom.geom_Path_CTor()\n\t\t\tif len(args) > 0:\n"));
    }

    #[test]
    fn test_map_glue() {
        let session = Session::geom();
        let cx = session.cx();
        let ty = ResolvedType::resolve(&cx, sym(&session, "Labels"), "example.com/geom").unwrap();
        let (mut glue, mut build, mut wrap) = (Printer::default(), Printer::default(), Printer::default());
        ty.emit_glue(&cx, &mut glue, &mut build, &mut GoImports::new());
        ty.emit_container_class(&cx, &mut wrap);
        assert!(glue.as_str().contains("\t_v, _ok := (*_s)[C.GoString(_ky)]\n"));
        assert!(glue.as_str().contains("\tdelete(*_s, C.GoString(_ky))\n"));
        assert!(wrap.as_str().contains("def __delitem__(self, key):"));
    }

    #[test]
    fn test_basic_type_needs_no_glue() {
        let session = Session::geom();
        let cx = session.cx();
        let ty = ResolvedType::resolve(&cx, sym(&session, "Celsius"), "example.com/geom").unwrap();
        let (mut glue, mut build, mut imports) = (Printer::default(), Printer::default(), GoImports::new());
        ty.emit_glue(&cx, &mut glue, &mut build, &mut imports);
        assert!(glue.is_empty() && build.is_empty());
        assert!(imports.is_empty());
    }

    #[test]
    fn test_container_glue_locals_are_reserved() {
        let session = Session::geom();
        let cx = session.cx();
        let ty = ResolvedType::resolve(&cx, sym(&session, "Labels"), "example.com/geom").unwrap();
        let mut glue = Printer::default();
        ty.emit_glue(&cx, &mut glue, &mut Printer::default(), &mut GoImports::new());
        assert!(glue.as_str().contains("func geom_Labels_len(_handle CGoHandle) C.longlong {\n"));
        assert!(glue.as_str().contains("\t_s := ptrFromHandle_geom_Labels(_handle)\n"));
        assert!(!glue.as_str().contains("(handle CGoHandle"));
    }

    #[test]
    fn test_container_class_avoids_keywords() {
        let geom = PackageRef::new("example.com/geom", "geom");
        let table = SymbolTable::new(
            vec![Package::new("example.com/geom", "geom")],
            vec![Symbol::new(
                "None",
                geom,
                SymbolKind::Slice {
                    elem: TypeRef::Basic(BasicKind::Int),
                },
            )],
        );
        let session = Session::new(table);
        let cx = session.cx();
        let ty = ResolvedType::resolve(&cx, sym(&session, "None"), "example.com/geom").unwrap();
        let mut wrap = Printer::default();
        ty.emit_container_class(&cx, &mut wrap);
        assert!(wrap.as_str().contains("class None_(GoClass):\n"));
        assert!(wrap.as_str().contains("_geom.geom_None_len(self.handle)"));
    }

    #[test]
    fn test_external_class() {
        let session = Session::geom();
        let cx = session.cx();
        let mut wrap = Printer::default();
        emit_external_class(&cx, sym(&session, "Meter"), &mut wrap);
        emit_external_class(&cx, sym(&session, "Celsius"), &mut wrap);
        assert!(wrap.as_str().starts_with("# Python type for struct units.Meter\nclass units_Meter(GoClass):\n"));
        assert!(wrap.as_str().contains("\t\t\tself.handle = 0\n"));
    }

    #[test]
    fn test_unresolved_elem() {
        let session = Session::geom();
        let cx = session.cx();
        let err = ResolvedType::resolve(&cx, sym(&session, "Broken"), "example.com/geom").unwrap_err();
        assert_eq!(
            err.to_string(),
            "geom.Broken: unresolved type `example.com/geom.Nowhere`"
        );
    }
}
