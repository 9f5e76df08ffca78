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

//! Statement analysis for the semantic analyzer.

use super::control_flow::ControlFlowAnalyzer;
use super::expressions::ExpressionAnalyzer;
use super::functions::FunctionAnalyzer;
use super::operators::OperatorChecker;
use super::Analyzer;
use crate::ast::{Expr, LValue, LValueKind, Stmt, StmtKind};
use crate::error::{CompileError, ErrorCode};
use crate::symtab::SymbolKind;

/// Extension trait for statement analysis.
pub trait StatementAnalyzer {
    /// Analyze every statement of a list.
    fn check_statements(&mut self, statements: &mut [Stmt]);

    /// Analyze a single statement.
    fn check_statement(&mut self, statement: &mut Stmt);

    /// Analyze an assignment, coercing an integer value stored into a real.
    fn check_assignment(&mut self, target: &mut LValue, value: &mut Expr);

    /// Check that an assignment target is writable and type it.
    /// Returns false when the target has already been diagnosed.
    fn check_target(&mut self, target: &mut LValue) -> bool;
}

impl StatementAnalyzer for Analyzer<'_> {
    fn check_statements(&mut self, statements: &mut [Stmt]) {
        for statement in statements {
            self.check_statement(statement);
        }
    }

    fn check_statement(&mut self, statement: &mut Stmt) {
        let span = statement.span;
        match &mut statement.kind {
            StmtKind::Assign { target, value } => self.check_assignment(target, value),
            StmtKind::Call {
                callee,
                callee_span,
                args,
            } => {
                let (callee, callee_span) = (*callee, *callee_span);
                self.analyze_procedure_call(callee, callee_span, args);
            }
            StmtKind::If(if_stmt) => self.analyze_if_statement(if_stmt),
            StmtKind::While { condition, body } => self.analyze_while_statement(condition, body),
            StmtKind::Return(value) => self.analyze_return_statement(value.as_mut(), span),
        }
    }

    fn check_assignment(&mut self, target: &mut LValue, value: &mut Expr) {
        let target_ok = self.check_target(target);
        let value_type = self.analyze_expression(value);
        if !target_ok || self.is_void(value_type) || value_type == target.ty {
            return;
        }

        if self.is_real(target.ty) && self.is_integer(value_type) {
            self.insert_cast(value);
            return;
        }

        let message = format!(
            "Cannot assign {} to {} '{}'",
            self.type_name(value_type),
            self.type_name(target.ty),
            self.symtab.name_of(target.symbol())
        );
        self.error(CompileError::new(ErrorCode::TypeMismatch, message, value.span));
    }

    fn check_target(&mut self, target: &mut LValue) -> bool {
        let span = target.span;
        let ty = match &mut target.kind {
            LValueKind::Identifier(symbol) => {
                let symbol = *symbol;
                let name = self.symtab.name_of(symbol).to_string();
                match self.kind_of(symbol) {
                    SymbolKind::Variable | SymbolKind::Parameter { .. } => {
                        Some(self.symtab.type_of(symbol))
                    }
                    SymbolKind::Undefined => None,
                    SymbolKind::Constant(_) => {
                        let message = format!("Cannot assign to constant '{}'", name);
                        self.error(CompileError::new(
                            ErrorCode::CannotAssignToConstant,
                            message,
                            span,
                        ));
                        None
                    }
                    SymbolKind::Array { .. } => {
                        let message = format!("Cannot assign to whole array '{}'", name);
                        self.error(
                            CompileError::new(ErrorCode::InvalidAssignmentTarget, message, span)
                                .with_hint("Assign to individual elements with 'name[index] := value'"),
                        );
                        None
                    }
                    other => {
                        let message =
                            format!("Cannot assign to {} '{}'", other.name(), name);
                        self.error(CompileError::new(
                            ErrorCode::InvalidAssignmentTarget,
                            message,
                            span,
                        ));
                        None
                    }
                }
            }
            LValueKind::Indexed {
                array,
                array_span,
                index,
            } => {
                let (array, array_span) = (*array, *array_span);
                let element = self.analyze_indexed(array, array_span, index);
                (!self.is_void(element)).then_some(element)
            }
        };

        match ty {
            Some(ty) => {
                target.ty = ty;
                true
            }
            None => false,
        }
    }
}
