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

//! Expression nodes.

use crate::error::Span;
use crate::symtab::SymIndex;

/// An expression.
#[derive(Debug, Clone)]
pub struct Expr {
    /// The kind of expression.
    pub kind: ExprKind,
    /// The synthesized type, a nametype index.
    pub ty: SymIndex,
    /// The source span of this expression.
    pub span: Span,
}

impl Expr {
    /// Create a new expression.
    pub fn new(kind: ExprKind, ty: SymIndex, span: Span) -> Self {
        Self { kind, ty, span }
    }

    /// Create an integer literal.
    pub fn integer(value: i64, ty: SymIndex, span: Span) -> Self {
        Self::new(ExprKind::Integer(value), ty, span)
    }

    /// Wrap `inner` in an integer-to-real cast of type `real`.
    pub fn cast(inner: Expr, real: SymIndex) -> Self {
        let span = inner.span;
        Self::new(ExprKind::Cast(Box::new(inner)), real, span)
    }

    /// The value of an integer literal.
    pub fn as_integer(&self) -> Option<i64> {
        match self.kind {
            ExprKind::Integer(value) => Some(value),
            _ => None,
        }
    }

    /// Check if this node is an inserted cast.
    pub fn is_cast(&self) -> bool {
        matches!(self.kind, ExprKind::Cast(_))
    }
}

/// The kind of expression.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// An integer literal.
    Integer(i64),

    /// A real literal.
    Real(f64),

    /// A reference to a variable, parameter or constant.
    Identifier(SymIndex),

    /// An array element read.
    Indexed {
        array: SymIndex,
        array_span: Span,
        index: Box<Expr>,
    },

    /// A binary operation.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// A unary operation.
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// An integer-to-real conversion inserted by the analyzer.
    Cast(Box<Expr>),

    /// A function call.
    Call {
        callee: SymIndex,
        callee_span: Span,
        args: Vec<Expr>,
    },
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Divide,
    IntDiv,
    Mod,

    // Logical
    And,
    Or,

    // Relational
    Equal,
    NotEqual,
    Less,
    Greater,
}

impl BinaryOp {
    /// Check if this operator compares its operands.
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOp::Equal | BinaryOp::NotEqual | BinaryOp::Less | BinaryOp::Greater
        )
    }

    /// Check if this operator only accepts integer operands.
    pub fn is_integer_only(&self) -> bool {
        matches!(
            self,
            BinaryOp::IntDiv | BinaryOp::Mod | BinaryOp::And | BinaryOp::Or
        )
    }

    /// Get a string representation of this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Divide => "/",
            BinaryOp::IntDiv => "div",
            BinaryOp::Mod => "mod",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Equal => "=",
            BinaryOp::NotEqual => "<>",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Logical NOT (`not x`).
    Not,
}

impl UnaryOp {
    /// Get a string representation of this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "not",
        }
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relational_operators() {
        assert!(BinaryOp::Less.is_relational());
        assert!(BinaryOp::NotEqual.is_relational());
        assert!(!BinaryOp::Add.is_relational());
        assert!(!BinaryOp::And.is_relational());
    }

    #[test]
    fn test_integer_only_operators() {
        assert!(BinaryOp::Mod.is_integer_only());
        assert!(BinaryOp::Or.is_integer_only());
        assert!(!BinaryOp::Divide.is_integer_only());
    }

    #[test]
    fn test_cast_keeps_span() {
        let inner = Expr::integer(3, SymIndex(2), Span::new(4, 5));
        let cast = Expr::cast(inner, SymIndex(3));
        assert!(cast.is_cast());
        assert_eq!(cast.span, Span::new(4, 5));
        assert_eq!(cast.ty, SymIndex(3));
    }

    #[test]
    fn test_operator_display() {
        assert_eq!(BinaryOp::IntDiv.to_string(), "div");
        assert_eq!(UnaryOp::Not.to_string(), "not");
    }
}
