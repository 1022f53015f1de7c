//! `pybridge gen` command

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::cli::GenArgs;
use pybridge::bind::preamble::TOOL_NAME;
use pybridge::core::SymbolTable;
use pybridge::ops::generate::{generate, GenerateOptions};
use pybridge::util::config::{global_config_path, load_config, project_config_path};
use pybridge::util::diagnostic::{self, suggestions, Diagnostic};

pub fn execute(args: GenArgs, color: bool) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;

    // Load configuration (global + project)
    let global = global_config_path().unwrap_or_default();
    let config = load_config(&global, &project_config_path(&cwd));

    let table = match SymbolTable::load(&args.table) {
        Ok(table) => table,
        Err(e) => {
            let diag = Diagnostic::error("failed to load symbol table")
                .with_location(&args.table)
                .with_context(e.to_string())
                .with_suggestion(suggestions::TABLE_FORMAT);
            diagnostic::emit(&diag, color);
            return Err(e).with_context(|| format!("could not load {}", args.table.display()));
        }
    };

    // CLI > config > defaults
    let output_dir = args.output.unwrap_or_else(|| config.output_dir());
    let output_name = args
        .name
        .or_else(|| config.output.name.clone())
        .or_else(|| table.packages().first().map(|p| p.name.clone()))
        .unwrap_or_else(|| "out".to_string());
    let vm = args.vm.unwrap_or_else(|| config.vm().to_string());
    let lib_ext = args.libext.unwrap_or_else(|| config.lib_ext().to_string());
    let api_version = args.api.unwrap_or_else(|| config.api_version());
    let handle = args.handle.unwrap_or_else(|| config.handle_kind());

    let opts = GenerateOptions::new(&output_dir, &output_name)
        .with_invocation(invocation())
        .with_interpreter(resolve_interpreter(&vm))
        .with_lib_ext(lib_ext)
        .with_api_version(api_version)
        .with_handle(handle.config());

    tracing::debug!(
        "generating {} into {} (handles: {})",
        output_name,
        output_dir.display(),
        handle
    );

    if let Err(err) = generate(&table, &opts) {
        diagnostic::emit(&Diagnostic::from_generate_error(&err, &output_dir), color);
        bail!(
            "could not generate bindings for `{}` ({} error(s))",
            output_name,
            err.errors().len()
        );
    }

    eprintln!(
        "   Generated {} ({} package(s)) in {}",
        output_name,
        table.packages().len(),
        output_dir.display()
    );
    Ok(())
}

/// The command line as typed, with the program path normalized to the
/// tool name so the recorded invocation is portable.
fn invocation() -> String {
    std::iter::once(TOOL_NAME.to_string())
        .chain(std::env::args().skip(1))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a bare interpreter name on `PATH`; paths are used as given.
fn resolve_interpreter(vm: &str) -> PathBuf {
    let path = Path::new(vm);
    if path.components().count() > 1 {
        return path.to_path_buf();
    }
    match which::which(vm) {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!("interpreter `{}` not found on PATH ({}), using it as given", vm, e);
            path.to_path_buf()
        }
    }
}
