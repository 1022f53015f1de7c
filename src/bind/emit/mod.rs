//! Per-declaration emitters.
//!
//! Each emitter validates its declaration completely before writing a
//! single byte, so a malformed declaration leaves no partial output
//! behind. Everything that reaches the extension module goes through
//! [`Callable::emit`], which writes the glue export, the pybindgen
//! registration and the Python function from one resolved [`Signature`].

pub mod funcs;
pub mod interfaces;
pub mod structs;
pub mod types;
pub mod vars;

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::bind::convert::{BindContext, Conversion};
use crate::bind::errors::BindError;
use crate::bind::imports::GoImports;
use crate::bind::printer::Printer;
use crate::core::{Func, Package};

static IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

const PY_RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "self",
    "try", "while", "with", "yield",
];

/// The three buffers one package's declarations are written into, plus
/// the glue's import list.
pub struct Streams<'p> {
    /// Shared cgo glue
    pub glue: &'p mut Printer,
    /// Shared pybindgen build script
    pub build: &'p mut Printer,
    /// This package's wrapper
    pub wrap: &'p mut Printer,
    /// Packages named by `glue`
    pub imports: &'p mut GoImports,
}

/// Glue-side name of a Go parameter.
///
/// Parameters are renamed so they cannot shadow a package the body calls
/// into (`func Clean(path string)` in package `path`) or the `C` and
/// `gopyh` identifiers.
pub(crate) fn glue_param(name: &str) -> String {
    format!("arg_{name}")
}

pub fn is_ident(name: &str) -> bool {
    IDENT.is_match(name)
}

/// Fail unless `name` can be used verbatim in Go, C and Python.
pub(crate) fn check_ident(pkg: &Package, decl: &str, name: &str) -> Result<(), BindError> {
    if is_ident(name) {
        Ok(())
    } else {
        Err(BindError::malformed(
            &pkg.name,
            decl,
            format!("`{name}` is not a valid identifier"),
        ))
    }
}

/// A name usable as a Python parameter or definition.
pub(crate) fn py_safe(name: &str) -> Cow<'_, str> {
    if PY_RESERVED.contains(&name) {
        Cow::Owned(format!("{name}_"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Write `doc` as a Python doc string at the current indentation.
pub(crate) fn write_py_doc(wrap: &mut Printer, doc: &str) {
    let doc = doc.trim();
    if doc.is_empty() {
        return;
    }
    let doc = doc.replace("\"\"\"", "\\\"\\\"\\\"");
    if doc.contains('\n') {
        writeln!(wrap, "\"\"\"\n{doc}\n\"\"\"");
    } else {
        writeln!(wrap, "\"\"\"{doc}\"\"\"");
    }
}

/// Write the `__init__` of a shadow class.
///
/// Objects are always adopted from an explicit `handle=` or another
/// `GoClass`. Otherwise `ctor` (an extension function name) builds a fresh
/// Go value and `init` may fill it from the arguments; without a
/// constructor the handle stays unset.
pub(crate) fn write_handle_init<F>(wrap: &mut Printer, ext: &str, ctor: Option<&str>, extra_doc: &str, init: F)
where
    F: FnOnce(&mut Printer),
{
    writeln!(wrap, "def __init__(self, *args, **kwargs):");
    wrap.indent();
    writeln!(wrap, "\"\"\"");
    writeln!(wrap, "handle=A Go-side object is always initialized with an explicit handle=arg");
    if !extra_doc.is_empty() {
        writeln!(wrap, "{extra_doc}");
    }
    writeln!(wrap, "\"\"\"");
    writeln!(wrap, "if len(kwargs) == 1 and 'handle' in kwargs:");
    writeln!(wrap, "\tself.handle = kwargs['handle']");
    writeln!(wrap, "elif len(args) == 1 and isinstance(args[0], GoClass):");
    writeln!(wrap, "\tself.handle = args[0].handle");
    writeln!(wrap, "else:");
    wrap.indent();
    match ctor {
        Some(ctor) => {
            writeln!(wrap, "self.handle = {ext}.{ctor}()");
            init(wrap);
        }
        None => writeln!(wrap, "self.handle = 0"),
    }
    wrap.outdent();
    wrap.outdent();
}

/// A function signature with every type resolved.
#[derive(Debug, Clone)]
pub struct Signature {
    pub params: Vec<(String, Conversion)>,
    pub result: Option<Conversion>,
    pub returns_error: bool,
}

impl Signature {
    /// Resolve `func` as declared in `pkg`; `decl` names it in errors.
    pub fn resolve(
        cx: &BindContext<'_>,
        pkg: &Package,
        decl: &str,
        func: &Func,
    ) -> Result<Signature, BindError> {
        let malformed = |detail: String| BindError::malformed(&pkg.name, decl, detail);

        let mut params = Vec::with_capacity(func.params.len());
        for (i, param) in func.params.iter().enumerate() {
            let name = if param.name.is_empty() || param.name == "_" {
                format!("arg{i}")
            } else if is_ident(&param.name) {
                param.name.clone()
            } else {
                return Err(malformed(format!(
                    "parameter `{}` is not a valid identifier",
                    param.name
                )));
            };
            let conv = cx
                .resolve(&param.ty, &pkg.path)
                .map_err(|e| malformed(format!("parameter `{name}`: {e}")))?;
            params.push((name, conv));
        }

        let mut results = Vec::new();
        for ty in func.value_results() {
            let conv = cx
                .resolve(ty, &pkg.path)
                .map_err(|e| malformed(format!("result: {e}")))?;
            results.push(conv);
        }
        if results.len() > 1 {
            return Err(malformed(format!(
                "{} non-error results; at most one is supported",
                results.len()
            )));
        }

        Ok(Signature {
            params,
            result: results.pop(),
            returns_error: func.returns_error(),
        })
    }
}

/// One entry point of the extension module.
#[derive(Debug, Clone)]
pub struct Callable<'a> {
    /// Exported C symbol, e.g. `geom_Point_Area`
    pub export: String,
    /// Name of the Python `def`
    pub py_name: String,
    /// Go expression being called
    pub callee: String,
    /// Import path of the package `callee` names, if it names one
    pub package: Option<&'a str>,
    /// Whether the first argument is the receiver's handle
    pub receiver: bool,
    pub doc: &'a str,
}

impl Callable<'_> {
    /// Write the glue export, its registration and the Python function.
    pub fn emit(&self, cx: &BindContext<'_>, sig: &Signature, out: &mut Streams<'_>) {
        self.emit_glue(sig, out.glue, out.imports);
        self.emit_build(cx, sig, out.build);
        self.emit_wrap(cx, sig, out.wrap);
    }

    fn emit_glue(&self, sig: &Signature, glue: &mut Printer, imports: &mut GoImports) {
        if let Some(path) = self.package {
            imports.add(path);
        }
        for conv in sig.params.iter().map(|(_, c)| c).chain(&sig.result) {
            imports.add_conversion(conv);
        }

        let mut params = Vec::new();
        if self.receiver {
            params.push("_handle CGoHandle".to_string());
        }
        params.extend(
            sig.params
                .iter()
                .map(|(n, c)| format!("{} {}", glue_param(n), c.cgo_type)),
        );

        let ret = match (&sig.result, sig.returns_error) {
            (Some(r), true) => format!(" (_ret {})", r.cgo_type),
            (Some(r), false) => format!(" {}", r.cgo_type),
            (None, _) => String::new(),
        };
        let args: Vec<String> = sig
            .params
            .iter()
            .map(|(n, c)| c.to_go(&glue_param(n)))
            .collect();
        let call = format!("{}({})", self.callee, args.join(", "));

        writeln!(glue, "//export {}", self.export);
        writeln!(glue, "func {}({}){ret} {{", self.export, params.join(", "));
        glue.indent();
        match (&sig.result, sig.returns_error) {
            (None, false) => writeln!(glue, "{call}"),
            (None, true) => {
                writeln!(glue, "__err := {call}");
                write_raise(glue, false);
            }
            (Some(r), false) => {
                writeln!(glue, "_cret := {call}");
                writeln!(glue, "return {}", r.to_c("_cret"));
            }
            (Some(r), true) => {
                writeln!(glue, "_cret, __err := {call}");
                write_raise(glue, true);
                writeln!(glue, "return {}", r.to_c("_cret"));
            }
        }
        glue.outdent();
        writeln!(glue, "}}\n");
    }

    fn emit_build(&self, cx: &BindContext<'_>, sig: &Signature, build: &mut Printer) {
        let mut params = Vec::new();
        if self.receiver {
            params.push(format!("param('{}', '_handle')", cx.handle.py));
        }
        params.extend(
            sig.params
                .iter()
                .map(|(n, c)| format!("param('{}', '{n}')", c.py_type)),
        );
        let retval = match &sig.result {
            Some(r) => format!("retval('{}')", r.py_type),
            None => "None".to_string(),
        };
        writeln!(
            build,
            "mod.add_function('{}', {retval}, [{}])",
            self.export,
            params.join(", ")
        );
    }

    fn emit_wrap(&self, cx: &BindContext<'_>, sig: &Signature, wrap: &mut Printer) {
        let mut params = Vec::new();
        let mut args = Vec::new();
        if self.receiver {
            params.push("self".to_string());
            args.push("self.handle".to_string());
        }
        for (name, conv) in &sig.params {
            let name = py_safe(name);
            args.push(conv.py_arg(&name));
            params.push(name.into_owned());
        }
        let call = format!("{}.{}({})", cx.ext_module(), self.export, args.join(", "));

        writeln!(wrap, "def {}({}):", py_safe(&self.py_name), params.join(", "));
        wrap.indent();
        write_py_doc(wrap, self.doc);
        match &sig.result {
            Some(r) => writeln!(wrap, "return {}", r.py_ret(&call)),
            None => writeln!(wrap, "{call}"),
        }
        wrap.outdent();
    }
}

/// Turn a non-nil Go `__err` into a Python `RuntimeError`.
fn write_raise(glue: &mut Printer, early_return: bool) {
    writeln!(glue, "if __err != nil {{");
    writeln!(
        glue,
        "\tC.PyErr_SetString(C.PyExc_RuntimeError, C.CString(__err.Error()))"
    );
    if early_return {
        writeln!(glue, "\treturn");
    }
    writeln!(glue, "}}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BasicKind, TypeRef};
    use crate::test_support::{Buffers, Session};

    #[test]
    fn test_is_ident() {
        assert!(is_ident("Point"));
        assert!(is_ident("_x9"));
        assert!(!is_ident(""));
        assert!(!is_ident("9lives"));
        assert!(!is_ident("a-b"));
        assert!(!is_ident("a.b"));
    }

    #[test]
    fn test_py_safe() {
        assert_eq!(py_safe("from"), "from_");
        assert_eq!(py_safe("None"), "None_");
        assert_eq!(py_safe("x"), "x");
    }

    #[test]
    fn test_py_doc() {
        let mut p = Printer::default();
        write_py_doc(&mut p, "  one line ");
        write_py_doc(&mut p, "");
        p.indent();
        write_py_doc(&mut p, "two\nlines");
        assert_eq!(
            p.as_str(),
            "\"\"\"one line\"\"\"\n\t\"\"\"\n\ttwo\n\tlines\n\t\"\"\"\n"
        );
    }

    #[test]
    fn test_signature_rules() {
        let session = Session::geom();
        let cx = session.cx();
        let pkg = session.geom_package();

        let ok = Func::new("Scale")
            .with_param("", TypeRef::Basic(BasicKind::Float64))
            .with_result(TypeRef::named(&pkg.path, "Point"))
            .with_result(TypeRef::Error);
        let sig = Signature::resolve(&cx, pkg, "Scale", &ok).unwrap();
        assert_eq!(sig.params[0].0, "arg0");
        assert!(sig.returns_error);
        assert!(sig.result.is_some());

        let two = Func::new("Two")
            .with_result(TypeRef::Basic(BasicKind::Int))
            .with_result(TypeRef::Basic(BasicKind::Int));
        let err = Signature::resolve(&cx, pkg, "Two", &two).unwrap_err();
        assert!(err.to_string().contains("2 non-error results"), "{err}");

        let misplaced = Func::new("Bad")
            .with_result(TypeRef::Error)
            .with_result(TypeRef::Basic(BasicKind::Int));
        let err = Signature::resolve(&cx, pkg, "Bad", &misplaced).unwrap_err();
        assert!(err.to_string().contains("last result"), "{err}");

        let bad_param = Func::new("P").with_param("a b", TypeRef::Basic(BasicKind::Int));
        assert!(Signature::resolve(&cx, pkg, "P", &bad_param).is_err());
    }

    #[test]
    fn test_callable_with_error_result() {
        let session = Session::geom();
        let cx = session.cx();
        let pkg = session.geom_package();
        let func = Func::new("Parse")
            .with_param("s", TypeRef::Basic(BasicKind::String))
            .with_result(TypeRef::named(&pkg.path, "Point"))
            .with_result(TypeRef::Error);
        let sig = Signature::resolve(&cx, pkg, "Parse", &func).unwrap();

        let mut out = Buffers::default();
        Callable {
            export: "geom_Parse".into(),
            py_name: "Parse".into(),
            callee: "geom.Parse".into(),
            package: Some(pkg.path.as_str()),
            receiver: false,
            doc: "Parse reads a point.",
        }
        .emit(&cx, &sig, &mut out.streams());

        let glue = out.glue.as_str();
        assert!(glue.contains("//export geom_Parse\nfunc geom_Parse(arg_s *C.char) (_ret CGoHandle) {\n"));
        assert!(glue.contains("\t_cret, __err := geom.Parse(C.GoString(arg_s))\n"));
        assert!(glue.contains("C.PyErr_SetString(C.PyExc_RuntimeError"));
        assert!(glue.contains("\treturn handleFromPtr_geom_Point(&_cret)\n"));
        assert_eq!(out.imports.iter().collect::<Vec<_>>(), ["example.com/geom"]);
        assert_eq!(
            out.build.as_str(),
            "mod.add_function('geom_Parse', retval('int64_t'), [param('char*', 's')])\n"
        );
        assert_eq!(
            out.wrap.as_str(),
            "def Parse(s):\n\t\"\"\"Parse reads a point.\"\"\"\n\treturn Point(handle=_geom.geom_Parse(s))\n"
        );
    }

    #[test]
    fn test_params_cannot_shadow_packages() {
        let session = Session::geom();
        let cx = session.cx();
        let pkg = session.geom_package();
        // Same name as the package, and as the cgo pseudo-package.
        let func = Func::new("Dist")
            .with_param("geom", TypeRef::Basic(BasicKind::Float64))
            .with_param("C", TypeRef::named(&pkg.path, "Celsius"))
            .with_result(TypeRef::Basic(BasicKind::Float64));
        let sig = Signature::resolve(&cx, pkg, "Dist", &func).unwrap();

        let mut out = Buffers::default();
        Callable {
            export: "geom_Dist".into(),
            py_name: "Dist".into(),
            callee: "geom.Dist".into(),
            package: Some(pkg.path.as_str()),
            receiver: false,
            doc: "",
        }
        .emit(&cx, &sig, &mut out.streams());

        let glue = out.glue.as_str();
        assert!(glue.contains("func geom_Dist(arg_geom C.double, arg_C C.double) C.double {\n"), "{glue}");
        assert!(glue.contains(
            "\t_cret := geom.Dist(float64(arg_geom), geom.Celsius(float64(arg_C)))\n"
        ));
        // Python keeps the declared names.
        assert!(out.wrap.as_str().starts_with("def Dist(geom, C):\n"));
    }
}
