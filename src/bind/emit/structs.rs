//! Structs: constructor, field accessors, methods and the shadow class.

use crate::bind::convert::{BindContext, Conversion};
use crate::bind::emit::{
    check_ident, py_safe, write_handle_init, write_py_doc, Callable, Signature, Streams,
};
use crate::bind::errors::BindError;
use crate::bind::printer::Printer;
use crate::core::{Func, Package, Struct, Symbol, SymbolKind};

/// Go only lets the glue package reach exported names.
pub(crate) fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Look up the type symbol behind a struct or interface declaration and
/// check that both agree on what it is.
pub(crate) fn declared_symbol<'a>(
    cx: &BindContext<'a>,
    pkg: &Package,
    name: &str,
    expected: fn(&SymbolKind) -> bool,
    what: &str,
) -> Result<&'a Symbol, BindError> {
    let sym = cx
        .type_symbol(&pkg.qualify(name))
        .map_err(|e| BindError::malformed(&pkg.name, name, e.to_string()))?;
    if !expected(&sym.kind) {
        return Err(BindError::malformed(
            &pkg.name,
            name,
            format!("declared as {what} but the symbol table records a different kind"),
        ));
    }
    Ok(sym)
}

/// Methods of a struct or interface, resolved.
pub(crate) fn resolve_methods<'f>(
    cx: &BindContext<'_>,
    pkg: &Package,
    owner: &str,
    methods: &'f [Func],
) -> Result<Vec<(&'f Func, Signature)>, BindError> {
    let mut resolved = Vec::with_capacity(methods.len());
    for method in methods {
        if !is_exported(&method.name) {
            tracing::debug!("skipping unexported method {}.{}.{}", pkg.name, owner, method.name);
            continue;
        }
        let decl = format!("{owner}.{}", method.name);
        check_ident(pkg, &decl, &method.name)?;
        let sig = Signature::resolve(cx, pkg, &decl, method)?;
        resolved.push((method, sig));
    }
    Ok(resolved)
}

/// Write resolved methods into the glue, the build script and the class
/// body currently open in the wrapper.
pub(crate) fn emit_methods(
    cx: &BindContext<'_>,
    sym: &Symbol,
    methods: &[(&Func, Signature)],
    out: &mut Streams<'_>,
) {
    let id = sym.id();
    for (method, sig) in methods {
        Callable {
            export: format!("{id}_{}", method.name),
            py_name: method.name.clone(),
            callee: format!("ptrFromHandle_{id}(_handle).{}", method.name),
            package: None,
            receiver: true,
            doc: &method.doc,
        }
        .emit(cx, sig, out);
    }
}

/// Emit a struct declared in `pkg`.
pub fn emit_struct(
    cx: &BindContext<'_>,
    pkg: &Package,
    st: &Struct,
    out: &mut Streams<'_>,
) -> Result<(), BindError> {
    check_ident(pkg, &st.name, &st.name)?;
    let sym = declared_symbol(cx, pkg, &st.name, |k| matches!(k, SymbolKind::Struct), "a struct")?;

    let mut fields = Vec::with_capacity(st.fields.len());
    for field in &st.fields {
        if !is_exported(&field.name) {
            tracing::debug!("skipping unexported field {}.{}.{}", pkg.name, st.name, field.name);
            continue;
        }
        let decl = format!("{}.{}", st.name, field.name);
        check_ident(pkg, &decl, &field.name)?;
        let conv = cx
            .resolve(&field.ty, &pkg.path)
            .map_err(|e| BindError::malformed(&pkg.name, &decl, e.to_string()))?;
        fields.push((field, conv));
    }
    let methods = resolve_methods(cx, pkg, &st.name, &st.methods)?;

    let id = sym.id();
    let ext = cx.ext_module();

    out.imports.add(&pkg.path);
    writeln!(out.glue, "// --- wrapping struct: {} ---", sym.go_expr());
    writeln!(out.glue, "//export {id}_CTor");
    writeln!(out.glue, "func {id}_CTor() CGoHandle {{");
    writeln!(out.glue, "\treturn handleFromPtr_{id}(&{}{{}})", sym.go_expr());
    writeln!(out.glue, "}}\n");
    writeln!(
        out.build,
        "mod.add_function('{id}_CTor', retval('{}'), [])",
        cx.handle.py
    );

    writeln!(out.wrap, "# Python type for struct {}", sym.go_expr());
    writeln!(out.wrap, "class {}(GoClass):", py_safe(&st.name));
    out.wrap.indent();
    write_py_doc(out.wrap, &st.doc);
    write_handle_init(
        out.wrap,
        &ext,
        Some(&format!("{id}_CTor")),
        "otherwise parameters can be unnamed in order of field names or named fields\n\
         in which case a new Go object is constructed first",
        |wrap| {
            for (i, (field, _)) in fields.iter().enumerate() {
                let name = py_safe(&field.name);
                writeln!(wrap, "if {i} < len(args):");
                writeln!(wrap, "\tself.{name} = args[{i}]");
                writeln!(wrap, "if {:?} in kwargs:", field.name);
                writeln!(wrap, "\tself.{name} = kwargs[{:?}]", field.name);
            }
        },
    );

    for (field, conv) in &fields {
        emit_field(cx, &id, &field.name, &field.doc, conv, out);
    }
    emit_methods(cx, sym, &methods, out);
    out.wrap.outdent();
    writeln!(out.wrap);
    Ok(())
}

fn emit_field(
    cx: &BindContext<'_>,
    id: &str,
    name: &str,
    doc: &str,
    conv: &Conversion,
    out: &mut Streams<'_>,
) {
    let ext = cx.ext_module();
    let h = cx.handle.py;
    let get = format!("{id}_{name}_Get");
    let set = format!("{id}_{name}_Set");

    out.imports.add_conversion(conv);
    writeln!(out.glue, "//export {get}");
    writeln!(out.glue, "func {get}(_handle CGoHandle) {} {{", conv.cgo_type);
    writeln!(out.glue, "\t_op := ptrFromHandle_{id}(_handle)");
    writeln!(out.glue, "\treturn {}", conv.to_c(&format!("_op.{name}")));
    writeln!(out.glue, "}}\n");
    writeln!(out.glue, "//export {set}");
    writeln!(out.glue, "func {set}(_handle CGoHandle, _val {}) {{", conv.cgo_type);
    writeln!(out.glue, "\t_op := ptrFromHandle_{id}(_handle)");
    writeln!(out.glue, "\t_op.{name} = {}", conv.to_go("_val"));
    writeln!(out.glue, "}}\n");

    writeln!(
        out.build,
        "mod.add_function('{get}', retval('{}'), [param('{h}', 'handle')])",
        conv.py_type
    );
    writeln!(
        out.build,
        "mod.add_function('{set}', None, [param('{h}', 'handle'), param('{}', 'val')])",
        conv.py_type
    );

    let py_name = py_safe(name);
    let wrap: &mut Printer = out.wrap;
    writeln!(wrap, "@property");
    writeln!(wrap, "def {py_name}(self):");
    wrap.indent();
    write_py_doc(wrap, doc);
    writeln!(wrap, "return {}", conv.py_ret(&format!("{ext}.{get}(self.handle)")));
    wrap.outdent();
    writeln!(wrap, "@{py_name}.setter");
    writeln!(wrap, "def {py_name}(self, value):");
    writeln!(wrap, "\t{ext}.{set}(self.handle, {})", conv.py_arg("value"));
}
