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

//! Operator checking for the semantic analyzer.
//!
//! This module provides type checking for binary and unary operators:
//! - Arithmetic operators (+, -, *) with integer-to-real promotion
//! - Real division (/), which promotes both sides
//! - Relational operators (=, <>, <, >), which always yield integer
//! - Integer-only operators (div, mod, and, or, not)

use super::Analyzer;
use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::{CompileError, ErrorCode};
use crate::symtab::SymIndex;

/// Extension trait for operator type checking.
pub trait OperatorChecker {
    /// Type a binary operation whose operands are already typed,
    /// inserting casts where needed, and return the result type.
    fn check_binary_op(&mut self, op: BinaryOp, left: &mut Expr, right: &mut Expr) -> SymIndex;

    /// Type a unary operation whose operand is already typed.
    fn check_unary_op(&mut self, op: UnaryOp, operand: &Expr) -> SymIndex;

    /// Replace an integer expression with a cast to real around itself.
    fn insert_cast(&self, expr: &mut Expr);
}

impl OperatorChecker for Analyzer<'_> {
    fn check_binary_op(&mut self, op: BinaryOp, left: &mut Expr, right: &mut Expr) -> SymIndex {
        let void = self.symtab.void_type();
        if self.is_void(left.ty) || self.is_void(right.ty) {
            return void;
        }

        if op.is_integer_only() {
            for operand in [&*left, &*right] {
                if !self.is_integer(operand.ty) {
                    let message = format!(
                        "Operator '{}' requires integer operands, found {}",
                        op,
                        self.type_name(operand.ty)
                    );
                    self.error(CompileError::new(
                        ErrorCode::InvalidOperandType,
                        message,
                        operand.span,
                    ));
                    return void;
                }
            }
            return self.symtab.integer_type();
        }

        for operand in [&*left, &*right] {
            if !self.is_numeric(operand.ty) {
                let message = format!(
                    "Operator '{}' requires numeric operands, found {}",
                    op,
                    self.type_name(operand.ty)
                );
                self.error(CompileError::new(
                    ErrorCode::InvalidOperandType,
                    message,
                    operand.span,
                ));
                return void;
            }
        }

        if op == BinaryOp::Divide {
            if self.is_integer(left.ty) {
                self.insert_cast(left);
            }
            if self.is_integer(right.ty) {
                self.insert_cast(right);
            }
            return self.symtab.real_type();
        }

        let unified = if left.ty == right.ty {
            left.ty
        } else {
            if self.is_integer(left.ty) {
                self.insert_cast(left);
            } else {
                self.insert_cast(right);
            }
            self.symtab.real_type()
        };

        if op.is_relational() {
            self.symtab.integer_type()
        } else {
            unified
        }
    }

    fn check_unary_op(&mut self, op: UnaryOp, operand: &Expr) -> SymIndex {
        let void = self.symtab.void_type();
        if self.is_void(operand.ty) {
            return void;
        }
        let accepted = match op {
            UnaryOp::Negate => self.is_numeric(operand.ty),
            UnaryOp::Not => self.is_integer(operand.ty),
        };
        if !accepted {
            let expected = match op {
                UnaryOp::Negate => "a numeric",
                UnaryOp::Not => "an integer",
            };
            let message = format!(
                "Operator '{}' requires {} operand, found {}",
                op,
                expected,
                self.type_name(operand.ty)
            );
            self.error(CompileError::new(
                ErrorCode::InvalidOperandType,
                message,
                operand.span,
            ));
            return void;
        }
        operand.ty
    }

    fn insert_cast(&self, expr: &mut Expr) {
        let placeholder = Expr::integer(0, self.symtab.integer_type(), expr.span);
        let inner = std::mem::replace(expr, placeholder);
        *expr = Expr::cast(inner, self.symtab.real_type());
    }
}
