//! Package-level functions and struct constructors.

use crate::bind::convert::BindContext;
use crate::bind::emit::{check_ident, Callable, Signature, Streams};
use crate::bind::errors::BindError;
use crate::core::{Func, Package};

/// Emit one package-level function.
///
/// Constructors go through here too; they differ from plain functions only
/// in which section they land in.
pub fn emit_func(
    cx: &BindContext<'_>,
    pkg: &Package,
    func: &Func,
    out: &mut Streams<'_>,
) -> Result<(), BindError> {
    check_ident(pkg, &func.name, &func.name)?;
    let sig = Signature::resolve(cx, pkg, &func.name, func)?;

    Callable {
        export: format!("{}_{}", pkg.name, func.name),
        py_name: func.name.clone(),
        callee: format!("{}.{}", pkg.name, func.name),
        package: Some(pkg.path.as_str()),
        receiver: false,
        doc: &func.doc,
    }
    .emit(cx, &sig, out);
    writeln!(out.wrap);
    Ok(())
}
