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

//! Syntax tree definitions for Diesel routine bodies.
//!
//! Declarations never appear in the tree: the parser installs them straight
//! into the [`SymbolTable`](crate::symtab::SymbolTable) and every name in a
//! body is already resolved to a [`SymIndex`](crate::symtab::SymIndex).
//! Each expression carries a type field that semantic analysis fills in.

mod expr;
mod stmt;

pub use expr::*;
pub use stmt::*;

use crate::error::Span;
use crate::symtab::SymIndex;

/// The body of one procedure, function or the main program.
#[derive(Debug, Clone)]
pub struct Block {
    /// The routine that owns this body.
    pub environment: SymIndex,
    /// The statements in this block.
    pub statements: Vec<Stmt>,
    /// The span of the routine's name, for routine-level diagnostics.
    pub name_span: Span,
    /// The source span of this block.
    pub span: Span,
}

impl Block {
    /// Create a new block.
    pub fn new(environment: SymIndex, statements: Vec<Stmt>, name_span: Span, span: Span) -> Self {
        Self {
            environment,
            statements,
            name_span,
            span,
        }
    }

    /// Check if this block is empty.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
