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

//! Semantic analyzer for the Diesel compiler.
//!
//! This module type-checks one routine body at a time and annotates the
//! tree in place:
//! - Every expression gets its synthesized type
//! - Integer operands that meet a real are wrapped in a cast node
//! - Call arity and argument types are checked against the callee
//! - `return` statements are checked against the enclosing routine
//!
//! Errors never stop the walk. An expression whose type is void has
//! already been diagnosed, so checks that see a void operand stay quiet.
//!
//! # Module Structure
//!
//! - `context` - Per-routine analysis state (AnalysisContext)
//! - `control_flow` - If/while/return analysis (ControlFlowAnalyzer trait)
//! - `expressions` - Expression typing (ExpressionAnalyzer trait)
//! - `functions` - Call checking (FunctionAnalyzer trait)
//! - `operators` - Operator typing and cast insertion (OperatorChecker trait)
//! - `statements` - Statement analysis (StatementAnalyzer trait)

pub mod context;
pub mod control_flow;
pub mod expressions;
pub mod functions;
pub mod operators;
pub mod statements;

pub use context::AnalysisContext;

use statements::StatementAnalyzer;

use crate::ast::Block;
use crate::error::{CompileError, ErrorCode};
use crate::symtab::{SymIndex, SymbolKind, SymbolTable};

/// The semantic analyzer.
pub struct Analyzer<'a> {
    /// The symbol table, with the checked routine's scope open.
    pub(crate) symtab: &'a SymbolTable,
    /// Collected errors.
    errors: Vec<CompileError>,
    /// Analysis context.
    pub(crate) context: AnalysisContext,
}

impl<'a> Analyzer<'a> {
    /// Create a new analyzer.
    pub fn new(symtab: &'a SymbolTable) -> Self {
        Self {
            symtab,
            errors: Vec::new(),
            context: AnalysisContext::new(symtab.current_environment()),
        }
    }

    /// Check one routine body.
    pub fn check_block(&mut self, block: &mut Block) {
        self.context = AnalysisContext::new(block.environment);
        self.check_statements(&mut block.statements);

        let is_function = matches!(
            self.symtab.symbol(block.environment).map(|s| &s.kind),
            Ok(SymbolKind::Function(_))
        );
        if is_function && !self.context.has_return {
            let name = self.symtab.name_of(block.environment).to_string();
            self.error(
                CompileError::new(
                    ErrorCode::MissingReturnStatement,
                    format!("Function '{}' has no return statement", name),
                    block.name_span,
                )
                .with_hint("Add 'return <value>' to the function body"),
            );
        }
    }

    /// Record an error.
    pub(crate) fn error(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    /// The errors recorded so far.
    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }

    /// Check if any errors were recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consume the analyzer and return its errors.
    pub fn into_errors(self) -> Vec<CompileError> {
        self.errors
    }

    // ========================================
    // Type Helpers
    // ========================================

    pub(crate) fn is_integer(&self, ty: SymIndex) -> bool {
        ty == self.symtab.integer_type()
    }

    pub(crate) fn is_real(&self, ty: SymIndex) -> bool {
        ty == self.symtab.real_type()
    }

    pub(crate) fn is_numeric(&self, ty: SymIndex) -> bool {
        self.is_integer(ty) || self.is_real(ty)
    }

    pub(crate) fn is_void(&self, ty: SymIndex) -> bool {
        ty == self.symtab.void_type()
    }

    /// The kind of a symbol, or `Undefined` for an index out of range.
    pub(crate) fn kind_of(&self, index: SymIndex) -> &'a SymbolKind {
        let symtab: &'a SymbolTable = self.symtab;
        symtab
            .symbol(index)
            .map(|s| &s.kind)
            .unwrap_or(&SymbolKind::Undefined)
    }

    /// Display name of a type for messages.
    pub(crate) fn type_name(&self, ty: SymIndex) -> String {
        self.symtab.name_of(ty).to_ascii_lowercase()
    }
}

/// Check one routine body and return the errors found.
pub fn analyze(symtab: &SymbolTable, block: &mut Block) -> Vec<CompileError> {
    let mut analyzer = Analyzer::new(symtab);
    analyzer.check_block(block);
    analyzer.into_errors()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, StmtKind};
    use crate::lexer::tokenize;
    use crate::parser::{parse, BlockCollector};

    /// Parse and check every routine; returns the table, blocks and errors.
    fn check(source: &str) -> (SymbolTable, Vec<Block>, Vec<CompileError>) {
        let tokens = tokenize(source).expect("lexing failed");
        let mut symtab = SymbolTable::new();
        let mut collector = BlockCollector::default();
        parse(&tokens, &mut symtab, &mut collector).expect("parse failed");
        let mut errors = collector.errors;
        let mut blocks = collector.blocks;
        for block in &mut blocks {
            errors.extend(analyze(&symtab, block));
        }
        (symtab, blocks, errors)
    }

    fn codes(source: &str) -> Vec<ErrorCode> {
        check(source).2.iter().map(|e| e.code).collect()
    }

    fn assigned_value(block: &Block, statement: usize) -> &crate::ast::Expr {
        match &block.statements[statement].kind {
            StmtKind::Assign { value, .. } => value,
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    // ========================================
    // Coercion Tests
    // ========================================

    #[test]
    fn test_mixed_addition_casts_integer_side() {
        let (symtab, blocks, errors) = check(
            "program p; var r : real; i : integer; begin r := i + r end.",
        );
        assert!(errors.is_empty(), "{:?}", errors);
        let value = assigned_value(&blocks[0], 0);
        assert_eq!(value.ty, symtab.real_type());
        match &value.kind {
            ExprKind::Binary { left, right, .. } => {
                assert!(left.is_cast());
                assert!(!right.is_cast());
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_same_type_inserts_no_cast() {
        let (symtab, blocks, _) =
            check("program p; var i : integer; begin i := i * 2 end.");
        let value = assigned_value(&blocks[0], 0);
        assert_eq!(value.ty, symtab.integer_type());
        match &value.kind {
            ExprKind::Binary { left, right, .. } => {
                assert!(!left.is_cast() && !right.is_cast());
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_relational_is_integer_after_coercion() {
        let (symtab, blocks, errors) = check(
            "program p; var i : integer; r : real; begin i := r < 1 end.",
        );
        assert!(errors.is_empty(), "{:?}", errors);
        let value = assigned_value(&blocks[0], 0);
        assert_eq!(value.ty, symtab.integer_type());
        match &value.kind {
            ExprKind::Binary { right, .. } => assert!(right.is_cast()),
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_division_is_always_real() {
        let (symtab, blocks, errors) = check(
            "program p; var r : real; begin r := 1 / 2 end.",
        );
        assert!(errors.is_empty(), "{:?}", errors);
        let value = assigned_value(&blocks[0], 0);
        assert_eq!(value.ty, symtab.real_type());
        match &value.kind {
            ExprKind::Binary { left, right, .. } => {
                assert!(left.is_cast() && right.is_cast());
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_real_assignment_from_integer_casts_once() {
        let (_, blocks, errors) = check("program p; var r : real; begin r := 3 end.");
        assert!(errors.is_empty());
        let value = assigned_value(&blocks[0], 0);
        assert!(value.is_cast());
        match &value.kind {
            ExprKind::Cast(inner) => assert!(!inner.is_cast()),
            other => panic!("expected cast, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_assignment_from_real_fails() {
        assert_eq!(
            codes("program p; var i : integer; begin i := 3.0 end."),
            vec![ErrorCode::TypeMismatch]
        );
    }

    // ========================================
    // Operator Tests
    // ========================================

    #[test]
    fn test_integer_only_operators() {
        assert_eq!(
            codes("program p; var i : integer; r : real; begin i := r div 2; i := i mod r; i := r and 1 end."),
            vec![
                ErrorCode::InvalidOperandType,
                ErrorCode::InvalidOperandType,
                ErrorCode::InvalidOperandType
            ]
        );
    }

    #[test]
    fn test_not_requires_integer() {
        assert_eq!(
            codes("program p; var i : integer; begin i := not 1.5 end."),
            vec![ErrorCode::InvalidOperandType]
        );
    }

    #[test]
    fn test_errors_do_not_cascade() {
        assert_eq!(
            codes("program p; var i : integer; begin i := (q + 1) * 2 end."),
            vec![ErrorCode::UndefinedIdentifier]
        );
    }

    // ========================================
    // Call and Return Tests
    // ========================================

    #[test]
    fn test_arity_reported_once_and_arguments_checked() {
        let errors = codes(
            "program p;
             procedure q(a : integer; b : real); begin end;
             begin q(1) end.",
        );
        assert_eq!(
            errors,
            vec![ErrorCode::ArgumentTypeMismatch, ErrorCode::WrongNumberOfArguments]
        );
    }

    #[test]
    fn test_call_kind_must_match_position() {
        let errors = codes(
            "program p; var i : integer;
             procedure q; begin end;
             function f : integer; begin return 1 end;
             begin i := q(); f() end.",
        );
        assert_eq!(errors, vec![ErrorCode::NotAFunction, ErrorCode::NotAProcedure]);
    }

    #[test]
    fn test_missing_return_reported_once() {
        let errors = codes(
            "program p;
             function f(a : integer) : integer;
             begin if a > 0 then a := 1 end; a := 2 end;
             begin end.",
        );
        assert_eq!(errors, vec![ErrorCode::MissingReturnStatement]);
    }

    #[test]
    fn test_return_discipline() {
        let errors = codes(
            "program p;
             procedure q; begin return 1 end;
             function f : integer; begin return end;
             function g : integer; begin return 1.5 end;
             begin end.",
        );
        assert_eq!(
            errors,
            vec![
                ErrorCode::CannotReturnValueFromProcedure,
                ErrorCode::MissingReturnValue,
                ErrorCode::ReturnTypeMismatch
            ]
        );
    }

    // ========================================
    // Statement Tests
    // ========================================

    #[test]
    fn test_every_branch_is_checked() {
        let errors = codes(
            "program p; var i : integer;
             begin
               if 1 then i := 1.5; i := 2 elsif 2.5 then i := 2.5 else i := 3.5 end
             end.",
        );
        assert_eq!(
            errors,
            vec![
                ErrorCode::TypeMismatch,
                ErrorCode::ConditionMustBeInteger,
                ErrorCode::TypeMismatch,
                ErrorCode::TypeMismatch
            ]
        );
    }

    #[test]
    fn test_while_condition_must_be_integer() {
        assert_eq!(
            codes("program p; var r : real; begin while r do r := 0.0 end end."),
            vec![ErrorCode::ConditionMustBeInteger]
        );
    }

    #[test]
    fn test_index_checks() {
        assert_eq!(
            codes(
                "program p; var a : array[3] of integer; i : integer;
                 begin a[1.5] := 1; i := i[0] end."
            ),
            vec![ErrorCode::ArrayIndexMustBeInteger, ErrorCode::CannotIndexNonArray]
        );
    }

    #[test]
    fn test_assignment_targets() {
        assert_eq!(
            codes(
                "program p; const c = 1; var a : array[3] of integer;
                 begin c := 2; a := 1 end."
            ),
            vec![ErrorCode::CannotAssignToConstant, ErrorCode::InvalidAssignmentTarget]
        );
    }

    #[test]
    fn test_routine_is_not_a_value() {
        assert_eq!(
            codes(
                "program p; var i : integer;
                 procedure q; begin end;
                 begin i := q end."
            ),
            vec![ErrorCode::NotAValue]
        );
    }
}
