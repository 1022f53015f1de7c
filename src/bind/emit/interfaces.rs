//! Interfaces: a shadow class whose methods dispatch through the handle.

use crate::bind::convert::BindContext;
use crate::bind::emit::structs::{declared_symbol, emit_methods, resolve_methods};
use crate::bind::emit::{check_ident, py_safe, write_handle_init, write_py_doc, Streams};
use crate::bind::errors::BindError;
use crate::core::{Interface, Package, SymbolKind};

pub fn emit_interface(
    cx: &BindContext<'_>,
    pkg: &Package,
    iface: &Interface,
    out: &mut Streams<'_>,
) -> Result<(), BindError> {
    check_ident(pkg, &iface.name, &iface.name)?;
    let sym = declared_symbol(
        cx,
        pkg,
        &iface.name,
        |k| matches!(k, SymbolKind::Interface),
        "an interface",
    )?;
    let methods = resolve_methods(cx, pkg, &iface.name, &iface.methods)?;

    writeln!(out.glue, "// --- wrapping interface: {} ---", sym.go_expr());
    writeln!(out.wrap, "# Python type for interface {}", sym.go_expr());
    writeln!(out.wrap, "class {}(GoClass):", py_safe(&iface.name));
    out.wrap.indent();
    write_py_doc(out.wrap, &iface.doc);
    write_handle_init(out.wrap, &cx.ext_module(), None, "", |_| {});
    emit_methods(cx, sym, &methods, out);
    out.wrap.outdent();
    writeln!(out.wrap);
    Ok(())
}
