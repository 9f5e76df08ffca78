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

//! Call analysis for the semantic analyzer.
//!
//! Actuals are matched against formals tail-first, so a missing or extra
//! argument shifts the mismatch to the front of the list.

use super::expressions::ExpressionAnalyzer;
use super::Analyzer;
use crate::ast::Expr;
use crate::error::{CompileError, ErrorCode, Span};
use crate::symtab::{SymIndex, SymbolKind};

/// Extension trait for call analysis.
pub trait FunctionAnalyzer {
    /// Check a call used as a value and return the function's type.
    fn analyze_function_call(&mut self, callee: SymIndex, span: Span, args: &mut [Expr])
        -> SymIndex;

    /// Check a call used as a statement.
    fn analyze_procedure_call(&mut self, callee: SymIndex, span: Span, args: &mut [Expr]);

    /// Type every actual and compare it with the callee's formals.
    fn check_arguments(&mut self, callee: SymIndex, span: Span, args: &mut [Expr]);
}

impl FunctionAnalyzer for Analyzer<'_> {
    fn analyze_function_call(
        &mut self,
        callee: SymIndex,
        span: Span,
        args: &mut [Expr],
    ) -> SymIndex {
        match self.kind_of(callee) {
            SymbolKind::Function(_) => {
                self.check_arguments(callee, span, args);
                self.symtab.type_of(callee)
            }
            kind => {
                if !matches!(kind, SymbolKind::Undefined) {
                    let message = format!(
                        "'{}' is a {}, not a function",
                        self.symtab.name_of(callee),
                        kind.name()
                    );
                    self.error(CompileError::new(ErrorCode::NotAFunction, message, span));
                }
                for arg in args.iter_mut() {
                    self.analyze_expression(arg);
                }
                self.symtab.void_type()
            }
        }
    }

    fn analyze_procedure_call(&mut self, callee: SymIndex, span: Span, args: &mut [Expr]) {
        match self.kind_of(callee) {
            SymbolKind::Procedure(_) => self.check_arguments(callee, span, args),
            kind => {
                if !matches!(kind, SymbolKind::Undefined) {
                    let message = format!(
                        "'{}' is a {}, not a procedure",
                        self.symtab.name_of(callee),
                        kind.name()
                    );
                    self.error(
                        CompileError::new(ErrorCode::NotAProcedure, message, span)
                            .with_hint("A function result must be used in an expression"),
                    );
                }
                for arg in args.iter_mut() {
                    self.analyze_expression(arg);
                }
            }
        }
    }

    fn check_arguments(&mut self, callee: SymIndex, span: Span, args: &mut [Expr]) {
        for arg in args.iter_mut() {
            self.analyze_expression(arg);
        }

        let formals: &[SymIndex] = self
            .kind_of(callee)
            .routine()
            .map(|routine| routine.parameters.as_slice())
            .unwrap_or_default();

        for (formal, actual) in formals.iter().rev().zip(args.iter().rev()) {
            let expected = self.symtab.type_of(*formal);
            if actual.ty != expected && !self.is_void(actual.ty) {
                let message = format!(
                    "Argument for '{}' must be {}, found {}",
                    self.symtab.name_of(*formal),
                    self.type_name(expected),
                    self.type_name(actual.ty)
                );
                self.error(CompileError::new(
                    ErrorCode::ArgumentTypeMismatch,
                    message,
                    actual.span,
                ));
            }
        }

        if formals.len() != args.len() {
            let message = format!(
                "'{}' expects {} argument(s), found {}",
                self.symtab.name_of(callee),
                formals.len(),
                args.len()
            );
            self.error(CompileError::new(
                ErrorCode::WrongNumberOfArguments,
                message,
                span,
            ));
        }
    }
}
