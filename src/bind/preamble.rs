//! Fixed headers and footers of the generated artifacts.
//!
//! Everything here is a pure function of the session configuration; no I/O
//! happens and nothing can fail.

use std::path::{Path, PathBuf};

use crate::bind::codec::{FALSE_BYTE, TRUE_BYTE};
use crate::bind::handle::HandleConfig;
use crate::core::Package;

/// Name of this tool as it appears in invocation strings.
pub const TOOL_NAME: &str = "pybridge";

/// Flags that redirect output; dropped from the recipe's `gen` command.
const OUTPUT_FLAGS: [&str; 3] = ["-output", "--output", "-o"];

/// Session-wide values shared by every preamble.
#[derive(Debug, Clone, Copy)]
pub struct Preambles<'a> {
    /// Overall output (Python package) name
    pub out_name: &'a str,
    /// Command line that produced the artifacts, embedded as provenance
    pub invocation: &'a str,
}

impl<'a> Preambles<'a> {
    pub fn new(out_name: &'a str, invocation: &'a str) -> Self {
        Preambles {
            out_name,
            invocation,
        }
    }

    /// Header of the cgo glue file.
    pub fn glue(&self, libcfg: &Path, handle: &HandleConfig, imports: &[&str]) -> String {
        let imports: String = handle
            .imports
            .iter()
            .chain(imports)
            .map(|p| format!("\n\t{p:?}"))
            .collect();
        format!(
            "/*
cgo stubs for package {out}.
File is generated by {tool}. Do not edit.
{cmd}
*/

package main

/*
#cgo pkg-config: {libcfg}
#define Py_LIMITED_API
#include <Python.h>
*/
import \"C\"
import (
\t\"github.com/go-python/gopy/gopyh\" // handle registry{imports}
)

func main() {{}}

// handle types shared with {out}.py wrappers
type GoHandle {go}
type CGoHandle {cgo}

{registry}
// boolGoToPy converts a Go bool to a python-compatible C.char
func boolGoToPy(b bool) C.char {{
\tif b {{
\t\treturn {t}
\t}}
\treturn {f}
}}

// boolPyToGo converts a python-compatible C.char to a Go bool.
// Any nonzero value is true.
func boolPyToGo(b C.char) bool {{
\treturn b != {f}
}}

// --- generated code for package: {out} below: ---

",
            out = self.out_name,
            tool = TOOL_NAME,
            cmd = self.invocation,
            libcfg = libcfg.display(),
            go = handle.go,
            cgo = handle.cgo,
            registry = handle.registry,
            t = TRUE_BYTE,
            f = FALSE_BYTE,
        )
    }

    /// Header of the pybindgen build script.
    pub fn build_script(&self) -> String {
        format!(
            "# python build stubs for package {out}
# File is generated by {tool}. Do not edit.
# {cmd}

from pybindgen import retval, param, Module
import sys

mod = Module('_{out}')
mod.add_include('\"{out}_go.h\"')
",
            out = self.out_name,
            tool = TOOL_NAME,
            cmd = self.invocation,
        )
    }

    /// Closing lines of the build script: have pybindgen write the C module.
    pub fn build_script_footer(&self) -> String {
        format!("\nmod.generate(open('{}.c', 'w'))\n\n", self.out_name)
    }

    /// Header of one package's wrapper file.
    ///
    /// `target_deps` are the names of imported packages that are bound in
    /// this session too; they are re-exported through the output package.
    pub fn wrapper(&self, pkg: &Package, target_deps: &[&str]) -> String {
        let doc = if pkg.doc.is_empty() {
            String::new()
        } else {
            format!("\"\"\"\n{}\n\"\"\"\n", pkg.doc.trim_end())
        };
        let imports: String = target_deps
            .iter()
            .map(|dep| format!("from {} import {}\n", self.out_name, dep))
            .collect();
        format!(
            "{doc}# python wrapper for package {path} within overall package {out}
# This is what you import to use the package.
# File is generated by {tool}. Do not edit.
# {cmd}

# the following is required to enable dlopen to open the _go.so file
import os,sys,inspect
cwd = os.getcwd()
currentdir = os.path.dirname(os.path.abspath(inspect.getfile(inspect.currentframe())))
os.chdir(currentdir)
import _{out}
os.chdir(cwd)

# to use this code in your end-user python file, import it as follows:
# from {out} import {name}
# and then refer to everything using {name}. prefix
# packages imported by this package listed below:

{imports}
class GoClass(object):
\t\"\"\"GoClass is the base class for all generated wrapper classes\"\"\"
\tpass

",
            path = pkg.path,
            name = pkg.name,
            out = self.out_name,
            tool = TOOL_NAME,
            cmd = self.invocation,
        )
    }

    /// The complete build recipe.
    pub fn makefile(&self, vm: &str, lib_ext: &str) -> String {
        format!(
            "# Makefile for python interface for package {out}.
# File is generated by {tool}. Do not edit.
# {cmd}

GOCMD=go
GOBUILD=$(GOCMD) build
PYTHON={vm}
PYTHON_CFG=$(PYTHON)-config
GCC=gcc
LIBEXT={lib_ext}

# get the flags used to build python:
CFLAGS = $(shell $(PYTHON_CFG) --cflags)
LDFLAGS = $(shell $(PYTHON_CFG) --ldflags)

all: gen build

gen:
\t{gen}

build:
\t# build target builds the generated files
\t- rm {out}.c
\t# generate {out}_go$(LIBEXT) from {out}.go -- the cgo wrappers to go functions
\t$(GOBUILD) -buildmode=c-shared -ldflags=\"-s -w\" -o {out}_go$(LIBEXT) {out}.go
\t# use pybindgen to build the {out}.c file which are the CPython wrappers to cgo wrappers
\t# note: pip install pybindgen to get pybindgen if this fails
\t$(PYTHON) build.py
\t# build the _{out}$(LIBEXT) library that contains the cgo and CPython wrappers
\t# generated {out}.py python wrapper imports this c-code package
\t$(GCC) {out}.c -dynamiclib {out}_go$(LIBEXT) -o _{out}$(LIBEXT) $(CFLAGS) $(LDFLAGS)

",
            out = self.out_name,
            tool = TOOL_NAME,
            cmd = self.invocation,
            gen = gen_command(self.invocation),
        )
    }
}

/// Location of the interpreter's pkg-config file.
///
/// `/usr/local/bin/python3` maps to `/usr/local/lib/pkgconfig/python3.pc`:
/// the executable name is kept and one directory level (`bin`) is dropped.
pub fn library_config_path(interpreter: &Path) -> PathBuf {
    let exe = interpreter
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let root = interpreter
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    root.join("lib").join("pkgconfig").join(format!("{exe}.pc"))
}

/// The generate-only variant of an invocation, safe to rerun from the
/// output directory itself.
pub fn gen_command(invocation: &str) -> String {
    let cmd = invocation.replacen(
        &format!("{TOOL_NAME} build"),
        &format!("{TOOL_NAME} gen"),
        1,
    );
    strip_output_from_cmd(&cmd)
}

/// Remove any output-directory override from a command line.
pub fn strip_output_from_cmd(cmd: &str) -> String {
    let mut kept = Vec::new();
    let mut tokens = cmd.split_whitespace();
    while let Some(tok) = tokens.next() {
        if OUTPUT_FLAGS.contains(&tok) {
            // flag and its separate value
            tokens.next();
            continue;
        }
        let is_joined = OUTPUT_FLAGS
            .iter()
            .any(|flag| tok.strip_prefix(flag).is_some_and(|rest| rest.starts_with('=')));
        if !is_joined {
            kept.push(tok);
        }
    }
    kept.join(" ")
}
