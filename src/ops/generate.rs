//! Implementation of `pybridge gen`.
//!
//! One call to [`generate`] is one generation session: it owns every
//! buffer and every once-only set it uses, so separate sessions in the same
//! process cannot interfere.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::bind::convert::BindContext;
use crate::bind::emit::funcs::emit_func;
use crate::bind::emit::interfaces::emit_interface;
use crate::bind::emit::structs::emit_struct;
use crate::bind::emit::types::{emit_external_class, ResolvedType};
use crate::bind::emit::vars::{emit_const, emit_var};
use crate::bind::emit::Streams;
use crate::bind::errors::{BindError, ErrorList, GenerateError};
use crate::bind::handle::HandleConfig;
use crate::bind::imports::GoImports;
use crate::bind::output::{ensure_dir, write_artifact};
use crate::bind::partition::{Emitted, TargetSet};
use crate::bind::preamble::{library_config_path, Preambles};
use crate::bind::printer::Printer;
use crate::bind::section::{Section, SECTION_ORDER};
use crate::core::{Package, SymbolTable};
use crate::util::config::{default_lib_ext, DEFAULT_API_VERSION, DEFAULT_VM};

/// Name of the pybindgen build script.
pub const BUILD_SCRIPT_NAME: &str = "build.py";

/// Name of the build recipe.
pub const MAKEFILE_NAME: &str = "Makefile";

/// Name of the (empty) Python package marker.
pub const PACKAGE_MARKER_NAME: &str = "__init__.py";

const EXTERNAL_TITLE: &str = "External Types Outside of Targeted Packages";

/// Options for the gen command.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory the artifacts are written to
    pub output_dir: PathBuf,

    /// Python package name; also names the glue file and `_<name>` module
    pub output_name: String,

    /// Command line recorded in every artifact
    pub invocation: String,

    /// Python interpreter the extension is built for
    pub interpreter: PathBuf,

    /// Shared library extension, e.g. `.so`
    pub lib_ext: String,

    /// Python API major version
    pub api_version: u32,

    /// Handle representation
    pub handle: HandleConfig,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            output_dir: PathBuf::from("."),
            output_name: "out".to_string(),
            invocation: String::new(),
            interpreter: PathBuf::from(DEFAULT_VM),
            lib_ext: default_lib_ext().to_string(),
            api_version: DEFAULT_API_VERSION,
            handle: HandleConfig::default(),
        }
    }
}

impl GenerateOptions {
    pub fn new(output_dir: impl Into<PathBuf>, output_name: impl Into<String>) -> Self {
        GenerateOptions {
            output_dir: output_dir.into(),
            output_name: output_name.into(),
            ..Default::default()
        }
    }

    pub fn with_invocation(mut self, invocation: impl Into<String>) -> Self {
        self.invocation = invocation.into();
        self
    }

    pub fn with_interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn with_lib_ext(mut self, lib_ext: impl Into<String>) -> Self {
        self.lib_ext = lib_ext.into();
        self
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn with_handle(mut self, handle: HandleConfig) -> Self {
        self.handle = handle;
        self
    }

    /// File name of the shared cgo glue.
    pub fn glue_file_name(&self) -> String {
        format!("{}.go", self.output_name)
    }
}

/// Generate bindings for every package in `table`.
///
/// Never stops early: every problem is recorded and the rest of the table
/// is still processed, so the returned error lists everything at once.
/// Artifacts written before an error are left in place.
pub fn generate(table: &SymbolTable, opts: &GenerateOptions) -> Result<(), GenerateError> {
    let mut errors = ErrorList::new();
    let dir = opts.output_dir.as_path();

    errors.record(ensure_dir(dir));
    if !matches!(opts.api_version, 2 | 3) {
        errors.push(BindError::UnsupportedApiVersion(opts.api_version));
    }

    let targets = TargetSet::from_packages(table.packages());
    let cx = BindContext {
        table,
        targets: &targets,
        handle: &opts.handle,
        out_name: &opts.output_name,
    };
    let pre = Preambles::new(&opts.output_name, &opts.invocation);

    // The glue header is rendered last, once the body has named its imports.
    let mut imports = GoImports::new();
    let mut glue = Printer::default();
    let mut build = Printer::default();
    build.push_str(&pre.build_script());
    let mut makefile = Printer::default();
    makefile.push_str(&pre.makefile(&opts.interpreter.to_string_lossy(), &opts.lib_ext));

    errors.record(write_artifact(dir, PACKAGE_MARKER_NAME, &Printer::default()));

    // Every handle type gets its converters exactly once in the glue.
    let mut glue_types = Emitted::new();
    writeln!(glue, "\n// ---- {EXTERNAL_TITLE} ---");
    for sym in targets.external_types(table) {
        if !glue_types.first(sym) {
            continue;
        }
        if let Some(ty) = errors.record(ResolvedType::resolve(&cx, sym, &sym.package.path)) {
            ty.emit_glue(&cx, &mut glue, &mut build, &mut imports);
        }
    }

    let mut bound = HashSet::new();
    for pkg in table.packages() {
        if !bound.insert(pkg.path.as_str()) {
            tracing::warn!("package {} listed twice, binding it once", pkg.path);
            continue;
        }
        tracing::debug!("binding package {}", pkg.path);

        let deps: Vec<&str> = pkg
            .imports
            .iter()
            .filter_map(|path| table.package(path))
            .map(|dep| dep.name.as_str())
            .collect();
        let mut wrap = Printer::default();
        wrap.push_str(&pre.wrapper(pkg, &deps));

        writeln!(wrap, "\n# ---- {EXTERNAL_TITLE} ---");
        let mut wrap_types = Emitted::new();
        for sym in targets.external_types(table) {
            if wrap_types.first(sym) {
                emit_external_class(&cx, sym, &mut wrap);
            }
        }

        for section in SECTION_ORDER {
            glue.push_str(&section.glue_banner());
            wrap.push_str(&section.wrap_banner());
            let mut out = Streams {
                glue: &mut glue,
                build: &mut build,
                wrap: &mut wrap,
                imports: &mut imports,
            };
            emit_section(&cx, pkg, section, &mut out, &mut glue_types, &mut errors);
        }

        errors.record(write_artifact(dir, &format!("{}.py", pkg.name), &wrap));
    }

    build.push_str(&pre.build_script_footer());
    let imports: Vec<&str> = imports.iter().collect();
    let mut glue_file = Printer::default();
    glue_file.push_str(&pre.glue(&library_config_path(&opts.interpreter), &opts.handle, &imports));
    glue_file.push_str(glue.as_str());
    errors.record(write_artifact(dir, &opts.glue_file_name(), &glue_file));
    errors.record(write_artifact(dir, BUILD_SCRIPT_NAME, &build));
    errors.record(write_artifact(dir, MAKEFILE_NAME, &makefile));

    tracing::info!(
        "generated bindings for {} package(s) into {} ({} error(s))",
        bound.len(),
        dir.display(),
        errors.len()
    );
    errors.into_result()
}

/// Emit one section of `pkg`, recording malformed declarations.
fn emit_section(
    cx: &BindContext<'_>,
    pkg: &Package,
    section: Section,
    out: &mut Streams<'_>,
    glue_types: &mut Emitted,
    errors: &mut ErrorList,
) {
    match section {
        Section::Types => {
            let own_types = cx
                .table
                .symbols()
                .iter()
                .filter(|sym| sym.is_type() && sym.package.path == pkg.path);
            for sym in own_types {
                if !glue_types.first(sym) {
                    continue;
                }
                if let Some(ty) = errors.record(ResolvedType::resolve(cx, sym, &pkg.path)) {
                    ty.emit_glue(cx, out.glue, out.build, out.imports);
                    ty.emit_container_class(cx, out.wrap);
                }
            }
        }
        Section::Constants => {
            for c in &pkg.consts {
                errors.record(emit_const(cx, pkg, c, out.wrap));
            }
        }
        Section::Variables => {
            for v in &pkg.vars {
                errors.record(emit_var(cx, pkg, v, out));
            }
        }
        Section::Interfaces => {
            for iface in &pkg.interfaces {
                errors.record(emit_interface(cx, pkg, iface, out));
            }
        }
        Section::Structs => {
            for st in &pkg.structs {
                errors.record(emit_struct(cx, pkg, st, out));
            }
        }
        Section::Constructors => {
            for ctor in pkg.structs.iter().flat_map(|st| &st.ctors) {
                errors.record(emit_func(cx, pkg, ctor, out));
            }
        }
        Section::Functions => {
            for func in &pkg.funcs {
                errors.record(emit_func(cx, pkg, func, out));
            }
        }
    }
}
