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

//! Expression analysis for the semantic analyzer.

use super::functions::FunctionAnalyzer;
use super::operators::OperatorChecker;
use super::Analyzer;
use crate::ast::{Expr, ExprKind};
use crate::error::{CompileError, ErrorCode, Span};
use crate::symtab::{SymIndex, SymbolKind};

/// Extension trait for expression analysis.
pub trait ExpressionAnalyzer {
    /// Type an expression tree bottom-up, store each node's type and
    /// return the type of the root.
    fn analyze_expression(&mut self, expr: &mut Expr) -> SymIndex;

    /// Type a bare name used as a value.
    fn analyze_identifier(&mut self, symbol: SymIndex, span: Span) -> SymIndex;

    /// Check an array element access and return the element type.
    fn analyze_indexed(&mut self, array: SymIndex, array_span: Span, index: &mut Expr)
        -> SymIndex;
}

impl ExpressionAnalyzer for Analyzer<'_> {
    fn analyze_expression(&mut self, expr: &mut Expr) -> SymIndex {
        let ty = match &mut expr.kind {
            ExprKind::Integer(_) => self.symtab.integer_type(),
            ExprKind::Real(_) => self.symtab.real_type(),
            ExprKind::Identifier(symbol) => {
                let symbol = *symbol;
                self.analyze_identifier(symbol, expr.span)
            }
            ExprKind::Indexed {
                array,
                array_span,
                index,
            } => {
                let (array, array_span) = (*array, *array_span);
                self.analyze_indexed(array, array_span, index)
            }
            ExprKind::Binary { op, left, right } => {
                let op = *op;
                self.analyze_expression(left);
                self.analyze_expression(right);
                self.check_binary_op(op, left, right)
            }
            ExprKind::Unary { op, operand } => {
                let op = *op;
                self.analyze_expression(operand);
                self.check_unary_op(op, operand)
            }
            ExprKind::Cast(inner) => {
                self.analyze_expression(inner);
                self.symtab.real_type()
            }
            ExprKind::Call {
                callee,
                callee_span,
                args,
            } => {
                let (callee, callee_span) = (*callee, *callee_span);
                self.analyze_function_call(callee, callee_span, args)
            }
        };
        expr.ty = ty;
        ty
    }

    fn analyze_identifier(&mut self, symbol: SymIndex, span: Span) -> SymIndex {
        match self.kind_of(symbol) {
            SymbolKind::Variable | SymbolKind::Parameter { .. } | SymbolKind::Constant(_) => {
                self.symtab.type_of(symbol)
            }
            SymbolKind::Undefined => self.symtab.void_type(),
            other => {
                let message = format!(
                    "'{}' ({}) cannot be used as a value",
                    self.symtab.name_of(symbol),
                    other.name()
                );
                self.error(CompileError::new(ErrorCode::NotAValue, message, span));
                self.symtab.void_type()
            }
        }
    }

    fn analyze_indexed(
        &mut self,
        array: SymIndex,
        array_span: Span,
        index: &mut Expr,
    ) -> SymIndex {
        let index_type = self.analyze_expression(index);
        if !self.is_void(index_type) && !self.is_integer(index_type) {
            let message = format!(
                "Array index must be integer, found {}",
                self.type_name(index_type)
            );
            self.error(CompileError::new(
                ErrorCode::ArrayIndexMustBeInteger,
                message,
                index.span,
            ));
        }

        match self.kind_of(array) {
            SymbolKind::Array { .. } => self.symtab.type_of(array),
            SymbolKind::Undefined => self.symtab.void_type(),
            _ => {
                let message = format!("'{}' is not an array", self.symtab.name_of(array));
                self.error(CompileError::new(
                    ErrorCode::CannotIndexNonArray,
                    message,
                    array_span,
                ));
                self.symtab.void_type()
            }
        }
    }
}
