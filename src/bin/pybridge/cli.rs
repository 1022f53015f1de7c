//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use pybridge::HandleKind;

/// pybridge - Python bindings for Go packages
#[derive(Parser)]
#[command(name = "pybridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate binding sources from a symbol table
    Gen(GenArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenArgs {
    /// Symbol table produced by the package analyzer (JSON)
    #[arg(long, env = "PYBRIDGE_TABLE")]
    pub table: PathBuf,

    /// Output directory (default: config or current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name of the generated Python package (default: first package's name)
    #[arg(long)]
    pub name: Option<String>,

    /// Python interpreter to build against
    #[arg(long, env = "PYBRIDGE_VM")]
    pub vm: Option<String>,

    /// Shared library extension, e.g. .so
    #[arg(long)]
    pub libext: Option<String>,

    /// Python API major version (2 or 3)
    #[arg(long)]
    pub api: Option<u32>,

    /// Handle representation (int64, string)
    #[arg(long)]
    pub handle: Option<HandleKind>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
