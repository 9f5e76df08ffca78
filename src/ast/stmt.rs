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

//! Statement nodes.

use crate::error::Span;
use crate::symtab::SymIndex;

use super::Expr;

/// A statement.
#[derive(Debug, Clone)]
pub struct Stmt {
    /// The kind of statement.
    pub kind: StmtKind,
    /// The source span of this statement.
    pub span: Span,
}

impl Stmt {
    /// Create a new statement.
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of statement.
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// `target := value`
    Assign { target: LValue, value: Expr },

    /// A procedure call.
    Call {
        callee: SymIndex,
        callee_span: Span,
        args: Vec<Expr>,
    },

    /// `if ... then ... elsif ... else ... end`
    If(IfStatement),

    /// `while condition do body end`
    While { condition: Expr, body: Vec<Stmt> },

    /// `return [value]`
    Return(Option<Expr>),
}

/// An if statement with its elsif chain.
#[derive(Debug, Clone)]
pub struct IfStatement {
    /// The condition.
    pub condition: Expr,
    /// Statements run when the condition holds.
    pub then_body: Vec<Stmt>,
    /// `elsif` branches, in source order.
    pub elsif_branches: Vec<ElsifBranch>,
    /// The `else` branch.
    pub else_body: Option<Vec<Stmt>>,
}

/// One `elsif` branch.
#[derive(Debug, Clone)]
pub struct ElsifBranch {
    /// The condition.
    pub condition: Expr,
    /// Statements run when the condition holds.
    pub body: Vec<Stmt>,
    /// The span of the branch.
    pub span: Span,
}

/// The left side of an assignment.
#[derive(Debug, Clone)]
pub struct LValue {
    /// Plain identifier or array element.
    pub kind: LValueKind,
    /// The type of the stored value.
    pub ty: SymIndex,
    /// The source span.
    pub span: Span,
}

/// The kind of assignment target.
#[derive(Debug, Clone)]
pub enum LValueKind {
    /// A variable or parameter.
    Identifier(SymIndex),
    /// An array element.
    Indexed {
        array: SymIndex,
        array_span: Span,
        index: Box<Expr>,
    },
}

impl LValue {
    /// Create a new assignment target.
    pub fn new(kind: LValueKind, ty: SymIndex, span: Span) -> Self {
        Self { kind, ty, span }
    }

    /// The symbol written to.
    pub fn symbol(&self) -> SymIndex {
        match &self.kind {
            LValueKind::Identifier(symbol) => *symbol,
            LValueKind::Indexed { array, .. } => *array,
        }
    }
}
