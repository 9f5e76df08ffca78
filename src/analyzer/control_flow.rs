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

//! Control flow analysis for the semantic analyzer.
//!
//! This module provides control flow statement analysis:
//! - If/elsif/else statements
//! - While loops
//! - Return statements

use super::expressions::ExpressionAnalyzer;
use super::statements::StatementAnalyzer;
use super::Analyzer;
use crate::ast::{Expr, IfStatement, Stmt};
use crate::error::{CompileError, ErrorCode, Span};
use crate::symtab::SymbolKind;

/// Extension trait for control flow analysis.
pub trait ControlFlowAnalyzer {
    /// Analyze an if statement, every branch included.
    fn analyze_if_statement(&mut self, if_stmt: &mut IfStatement);

    /// Analyze a while statement.
    fn analyze_while_statement(&mut self, condition: &mut Expr, body: &mut [Stmt]);

    /// Analyze a return statement against the enclosing routine.
    fn analyze_return_statement(&mut self, value: Option<&mut Expr>, span: Span);

    /// Check that a condition is an integer expression.
    fn check_condition(&mut self, condition: &mut Expr);
}

impl ControlFlowAnalyzer for Analyzer<'_> {
    fn analyze_if_statement(&mut self, if_stmt: &mut IfStatement) {
        self.check_condition(&mut if_stmt.condition);
        self.check_statements(&mut if_stmt.then_body);

        for branch in &mut if_stmt.elsif_branches {
            self.check_condition(&mut branch.condition);
            self.check_statements(&mut branch.body);
        }

        if let Some(else_body) = &mut if_stmt.else_body {
            self.check_statements(else_body);
        }
    }

    fn analyze_while_statement(&mut self, condition: &mut Expr, body: &mut [Stmt]) {
        self.check_condition(condition);
        self.check_statements(body);
    }

    fn analyze_return_statement(&mut self, value: Option<&mut Expr>, span: Span) {
        self.context.has_return = true;
        let routine = self.context.routine;
        let name = self.symtab.name_of(routine).to_string();
        let is_function = matches!(self.kind_of(routine), SymbolKind::Function(_));

        match value {
            Some(value) => {
                let value_type = self.analyze_expression(value);
                if !is_function {
                    let message = format!("Procedure '{}' cannot return a value", name);
                    self.error(CompileError::new(
                        ErrorCode::CannotReturnValueFromProcedure,
                        message,
                        value.span,
                    ));
                    return;
                }
                let expected = self.symtab.type_of(routine);
                if value_type != expected && !self.is_void(value_type) {
                    let message = format!(
                        "Function '{}' returns {}, found {}",
                        name,
                        self.type_name(expected),
                        self.type_name(value_type)
                    );
                    self.error(CompileError::new(
                        ErrorCode::ReturnTypeMismatch,
                        message,
                        value.span,
                    ));
                }
            }
            None if is_function => {
                let message = format!("Function '{}' must return a value", name);
                self.error(CompileError::new(ErrorCode::MissingReturnValue, message, span));
            }
            None => {}
        }
    }

    fn check_condition(&mut self, condition: &mut Expr) {
        let ty = self.analyze_expression(condition);
        if !self.is_void(ty) && !self.is_integer(ty) {
            let message = format!("Condition must be integer, found {}", self.type_name(ty));
            self.error(
                CompileError::new(ErrorCode::ConditionMustBeInteger, message, condition.span)
                    .with_hint("Compare the value explicitly, e.g. 'x <> 0'"),
            );
        }
    }
}
