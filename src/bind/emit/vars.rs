//! Package-level constants and variables.
//!
//! Python cannot see Go globals directly: constants are copied into the
//! wrapper by value, variables are reached through a getter and a setter.

use crate::bind::convert::BindContext;
use crate::bind::emit::{check_ident, py_safe, write_py_doc, Streams};
use crate::bind::errors::BindError;
use crate::bind::printer::Printer;
use crate::core::{Const, Package, Var};

/// Emit a constant into the wrapper.
pub fn emit_const(
    cx: &BindContext<'_>,
    pkg: &Package,
    c: &Const,
    wrap: &mut Printer,
) -> Result<(), BindError> {
    check_ident(pkg, &c.name, &c.name)?;
    cx.resolve(&c.ty, &pkg.path)
        .map_err(|e| BindError::malformed(&pkg.name, &c.name, e.to_string()))?;
    if c.value.trim().is_empty() {
        return Err(BindError::malformed(&pkg.name, &c.name, "constant has no value"));
    }

    for line in c.doc.lines().filter(|l| !l.trim().is_empty()) {
        writeln!(wrap, "# {}", line.trim());
    }
    writeln!(wrap, "{} = {}", py_safe(&c.name), py_literal(c.value.trim()));
    Ok(())
}

/// Python spelling of a Go constant literal.
fn py_literal(value: &str) -> String {
    match value {
        "true" => "True".to_string(),
        "false" => "False".to_string(),
        raw if raw.len() >= 2 && raw.starts_with('`') && raw.ends_with('`') => {
            format!("{:?}", &raw[1..raw.len() - 1])
        }
        other => other.to_string(),
    }
}

/// Emit the getter and setter of a variable.
pub fn emit_var(
    cx: &BindContext<'_>,
    pkg: &Package,
    v: &Var,
    out: &mut Streams<'_>,
) -> Result<(), BindError> {
    check_ident(pkg, &v.name, &v.name)?;
    let conv = cx
        .resolve(&v.ty, &pkg.path)
        .map_err(|e| BindError::malformed(&pkg.name, &v.name, e.to_string()))?;

    let ext = cx.ext_module();
    let go_var = format!("{}.{}", pkg.name, v.name);
    let getter = format!("{}_{}", pkg.name, v.name);
    let setter = format!("{}_Set_{}", pkg.name, v.name);
    out.imports.add(&pkg.path);
    out.imports.add_conversion(&conv);

    // getter
    writeln!(out.glue, "//export {getter}");
    writeln!(out.glue, "func {getter}() {} {{", conv.cgo_type);
    writeln!(out.glue, "\treturn {}", conv.to_c(&go_var));
    writeln!(out.glue, "}}\n");
    writeln!(
        out.build,
        "mod.add_function('{getter}', retval('{}'), [])",
        conv.py_type
    );
    writeln!(out.wrap, "def {}():", py_safe(&v.name));
    out.wrap.indent();
    write_py_doc(
        out.wrap,
        &format!("{} Gets Go Variable: {go_var}\n{}", v.name, v.doc),
    );
    writeln!(out.wrap, "return {}", conv.py_ret(&format!("{ext}.{getter}()")));
    out.wrap.outdent();
    writeln!(out.wrap);

    // setter
    writeln!(out.glue, "//export {setter}");
    writeln!(out.glue, "func {setter}(_val {}) {{", conv.cgo_type);
    writeln!(out.glue, "\t{go_var} = {}", conv.to_go("_val"));
    writeln!(out.glue, "}}\n");
    writeln!(
        out.build,
        "mod.add_function('{setter}', None, [param('{}', 'val')])",
        conv.py_type
    );
    writeln!(out.wrap, "def Set_{}(value):", v.name);
    out.wrap.indent();
    write_py_doc(
        out.wrap,
        &format!("Set_{} Sets Go Variable: {go_var}\n{}", v.name, v.doc),
    );
    writeln!(out.wrap, "{ext}.{setter}({})", conv.py_arg("value"));
    out.wrap.outdent();
    writeln!(out.wrap);
    Ok(())
}
