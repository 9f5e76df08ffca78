// Dieselc - A compiler for the Diesel teaching language emitting x86-64 assembly
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Diesel Compiler Library
//!
//! This library compiles programs in Diesel, a small block-structured
//! Pascal-like language, into Intel-syntax x86-64 assembly.
//!
//! # Modules
//!
//! - [`error`] - Error types and error reporting
//! - [`lexer`] - Tokenization of source code
//! - [`parser`] - Recursive descent parsing with symbol installation
//! - [`ast`] - Abstract Syntax Tree definitions
//! - [`symtab`] - Symbol table and scope manager
//! - [`analyzer`] - Semantic analysis, type checking and cast insertion
//! - [`optimizer`] - Integer constant folding
//! - [`quads`] - Quadruple intermediate representation
//! - [`codegen`] - x86-64 assembly generation
//! - [`pipeline`] - Per-routine driver tying the passes together
//!
//! # Example
//!
//! ```no_run
//! use dieselc::{compile_with_options, CompileOptions};
//!
//! let source = "program hello; var x : integer; begin x := 1 end.";
//! let options = CompileOptions::default().with_trace(true);
//! match compile_with_options(source, &options) {
//!     Ok(compilation) => print!("{}", compilation.assembly),
//!     Err(errors) => {
//!         for error in errors {
//!             eprintln!("{}", error);
//!         }
//!     }
//! }
//! ```

pub mod analyzer;
pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod optimizer;
pub mod parser;
pub mod pipeline;
pub mod quads;
pub mod symtab;

// Re-export commonly used types
pub use error::{
    format_error, render_report, CompileError, ErrorCode, InternalError, Result, SourceLocation,
    Span,
};
pub use lexer::Token;
pub use pipeline::{Compilation, Pipeline};
pub use quads::{QuadList, QuadOp, Quadruple};
pub use symtab::SymbolTable;

/// The version of the Diesel compiler.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the compiler.
pub const NAME: &str = "dieselc";

/// Options controlling a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Interleave quad, prologue and epilogue comments with the assembly.
    pub trace: bool,
    /// Fold integer constant expressions before generating quads.
    pub optimize: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            trace: false,
            optimize: true,
        }
    }
}

impl CompileOptions {
    /// Set trace comments on or off.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Set constant folding on or off.
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }
}

/// Compile source code to assembly with default options.
///
/// Only the first error is returned; use [`compile_with_options`] to get
/// all of them.
///
/// # Example
///
/// ```no_run
/// let source = "program p; var x : real; begin x := 3 end.";
///
/// match dieselc::compile(source) {
///     Ok(asm) => println!("{} lines of assembly", asm.lines().count()),
///     Err(e) => eprintln!("Compilation error: {}", e),
/// }
/// ```
pub fn compile(source: &str) -> std::result::Result<String, CompileError> {
    compile_with_options(source, &CompileOptions::default())
        .map(|compilation| compilation.assembly)
        .map_err(|errors| {
            errors.into_iter().next().unwrap_or_else(|| {
                CompileError::new(ErrorCode::Internal, "compilation failed", Span::default())
            })
        })
}

/// Compile source code, returning every diagnostic on failure.
pub fn compile_with_options(
    source: &str,
    options: &CompileOptions,
) -> std::result::Result<Compilation, Vec<CompileError>> {
    Pipeline::run(source, options)
}
