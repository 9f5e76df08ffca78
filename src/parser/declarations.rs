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

//! Declaration parsing.
//!
//! Constants, variables, parameters and routines are entered into the
//! symbol table the moment their heading has been read.

use super::helpers::ParserHelpers;
use super::statements::StatementParser;
use super::Parser;
use crate::ast::Block;
use crate::error::{CompileError, ErrorCode, InternalError, Span};
use crate::lexer::Token;
use crate::symtab::{ConstantValue, SymIndex, SymbolKind, MAX_FRAME_SIZE, STACK_WIDTH};

/// Trait for declaration parsing.
pub trait DeclarationParser {
    /// Parse the optional `const` and `var` sections.
    fn parse_declarations(&mut self) -> Result<(), CompileError>;

    /// Parse a constant value: an optionally negated literal or constant name.
    fn parse_constant_value(&mut self) -> Result<ConstantValue, CompileError>;

    /// Parse a `var` entry's type and install the variable.
    fn parse_variable(&mut self, name: &str, span: Span) -> Result<(), CompileError>;

    /// Parse a type name and return its nametype.
    fn parse_type_name(&mut self) -> Result<SymIndex, CompileError>;

    /// Parse an array size: a positive integer literal or integer constant.
    fn parse_array_size(&mut self) -> Result<usize, CompileError>;

    /// Parse nested procedure and function declarations.
    fn parse_subprograms(&mut self) -> Result<(), CompileError>;

    /// Parse one procedure or function declaration.
    fn parse_routine(&mut self, function: bool) -> Result<(), CompileError>;

    /// Parse a parenthesized formal parameter list.
    fn parse_parameters(&mut self) -> Result<(), CompileError>;

    /// Parse declarations, nested routines and the body of an open routine,
    /// hand the body to the sink and close the routine's scope.
    fn parse_routine_body(&mut self, routine: SymIndex, name_span: Span)
        -> Result<(), CompileError>;
}

impl DeclarationParser for Parser<'_> {
    fn parse_declarations(&mut self) -> Result<(), CompileError> {
        if self.match_token(&Token::Const) {
            while let Some(Token::Identifier(_)) = self.peek() {
                let (name, span) = self.expect_identifier("Expected constant name")?;
                self.expect(&Token::Equal, "Expected '=' after constant name")?;
                let value = self.parse_constant_value()?;
                self.expect(&Token::Semicolon, "Expected ';' after constant")?;
                if self.symtab.enter_constant(&name, span, value).is_err() {
                    self.report(already_defined(&name, span));
                }
            }
        }

        if self.match_token(&Token::Var) {
            while let Some(Token::Identifier(_)) = self.peek() {
                let (name, span) = self.expect_identifier("Expected variable name")?;
                self.expect(&Token::Colon, "Expected ':' after variable name")?;
                self.parse_variable(&name, span)?;
                self.expect(&Token::Semicolon, "Expected ';' after variable")?;
            }
        }
        Ok(())
    }

    fn parse_constant_value(&mut self) -> Result<ConstantValue, CompileError> {
        let negate = self.match_token(&Token::Minus);
        let span = self.peek_span().unwrap_or_else(|| self.previous_span());
        let value = match self.advance() {
            Some((Token::Integer(value), _)) => ConstantValue::Integer(value),
            Some((Token::Real(value), _)) => ConstantValue::Real(value),
            Some((Token::Identifier(name), _)) => {
                let constant = self
                    .symtab
                    .lookup(&name)
                    .and_then(|index| self.symtab.symbol(index).ok())
                    .and_then(|symbol| match &symbol.kind {
                        SymbolKind::Constant(value) => Some(*value),
                        _ => None,
                    });
                constant.ok_or_else(|| {
                    CompileError::new(
                        ErrorCode::ExpectedConstantValue,
                        format!("'{}' is not a constant", name),
                        span,
                    )
                })?
            }
            _ => {
                return Err(CompileError::new(
                    ErrorCode::ExpectedConstantValue,
                    "Expected a number or constant name",
                    span,
                ))
            }
        };

        Ok(match (negate, value) {
            (false, value) => value,
            (true, ConstantValue::Integer(v)) => ConstantValue::Integer(v.wrapping_neg()),
            (true, ConstantValue::Real(v)) => ConstantValue::Real(-v),
        })
    }

    fn parse_variable(&mut self, name: &str, span: Span) -> Result<(), CompileError> {
        let entered = if self.match_token(&Token::Array) {
            self.expect(&Token::LeftBracket, "Expected '[' after 'array'")?;
            let cardinality = self.parse_array_size()?;
            self.expect(&Token::RightBracket, "Expected ']' after array size")?;
            self.expect(&Token::Of, "Expected 'of' after array size")?;
            let ty = self.parse_type_name()?;
            self.symtab.enter_array(name, span, ty, cardinality)
        } else {
            let ty = self.parse_type_name()?;
            self.symtab.enter_variable(name, span, ty)
        };

        match entered {
            Ok(Ok(_)) => {}
            Ok(Err(_)) => self.report(already_defined(name, span)),
            Err(InternalError::FrameTooLarge { routine, limit }) => {
                self.report(
                    CompileError::new(
                        ErrorCode::FrameTooLarge,
                        format!(
                            "'{}' does not fit: the variables of '{}' exceed {} bytes",
                            name, routine, limit
                        ),
                        span,
                    )
                    .with_hint("use smaller arrays or spread them over several routines"),
                );
            }
            Err(error) => return Err(error.into()),
        }
        Ok(())
    }

    fn parse_type_name(&mut self) -> Result<SymIndex, CompileError> {
        let (name, span) = self.expect_identifier("Expected type name")?;
        let nametype = self.symtab.lookup(&name).filter(|&index| {
            index != self.symtab.void_type()
                && matches!(
                    self.symtab.symbol(index).map(|s| &s.kind),
                    Ok(SymbolKind::NameType)
                )
        });
        nametype.ok_or_else(|| {
            CompileError::new(
                ErrorCode::ExpectedType,
                format!("'{}' is not a type", name),
                span,
            )
            .with_hint("Available types are 'integer' and 'real'")
        })
    }

    fn parse_array_size(&mut self) -> Result<usize, CompileError> {
        let span = self.peek_span().unwrap_or_else(|| self.previous_span());
        let size = match self.parse_constant_value()? {
            ConstantValue::Integer(size) => size,
            ConstantValue::Real(_) => {
                return Err(CompileError::new(
                    ErrorCode::ExpectedConstantValue,
                    "Array size must be an integer",
                    span,
                ))
            }
        };
        match usize::try_from(size) {
            Ok(size) if size > MAX_FRAME_SIZE / STACK_WIDTH => {
                self.report(
                    CompileError::new(
                        ErrorCode::ArraySizeTooLarge,
                        format!("Array size {} is too large", size),
                        span,
                    )
                    .with_hint(format!(
                        "an array may hold at most {} elements",
                        MAX_FRAME_SIZE / STACK_WIDTH
                    )),
                );
                Ok(1)
            }
            Ok(size) if size > 0 => Ok(size),
            _ => {
                self.report(CompileError::new(
                    ErrorCode::ArraySizeMustBePositive,
                    format!("Array size must be positive, got {}", size),
                    span,
                ));
                Ok(1)
            }
        }
    }

    fn parse_subprograms(&mut self) -> Result<(), CompileError> {
        loop {
            if self.match_token(&Token::Procedure) {
                self.parse_routine(false)?;
            } else if self.match_token(&Token::Function) {
                self.parse_routine(true)?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_routine(&mut self, function: bool) -> Result<(), CompileError> {
        let (name, name_span) = self.expect_identifier("Expected routine name")?;
        let entered = if function {
            self.symtab.enter_function(&name, name_span)
        } else {
            self.symtab.enter_procedure(&name, name_span)
        };
        let routine = match entered {
            Ok(index) => index,
            Err(_) => {
                self.report(already_defined(&name, name_span));
                self.shadow_routine(&name, name_span, function)
            }
        };

        self.open_routine_scope()?;
        if self.check(&Token::LeftParen) {
            self.parse_parameters()?;
        }
        if function {
            self.expect(&Token::Colon, "Expected ':' and return type after function heading")?;
            let ty = self.parse_type_name()?;
            self.symtab.set_type(routine, ty)?;
        }
        self.expect(&Token::Semicolon, "Expected ';' after routine heading")?;

        self.parse_routine_body(routine, name_span)?;
        self.expect(&Token::Semicolon, "Expected ';' after routine body")?;
        Ok(())
    }

    fn parse_parameters(&mut self) -> Result<(), CompileError> {
        self.expect(&Token::LeftParen, "Expected '('")?;
        loop {
            let (name, span) = self.expect_identifier("Expected parameter name")?;
            self.expect(&Token::Colon, "Expected ':' after parameter name")?;
            let ty = self.parse_type_name()?;
            if self.symtab.enter_parameter(&name, span, ty)?.is_err() {
                self.report(already_defined(&name, span));
            }
            if !self.match_token(&Token::Semicolon) {
                break;
            }
        }
        self.expect(&Token::RightParen, "Expected ')' after parameters")?;
        Ok(())
    }

    fn parse_routine_body(
        &mut self,
        routine: SymIndex,
        name_span: Span,
    ) -> Result<(), CompileError> {
        self.parse_declarations()?;
        self.parse_subprograms()?;

        let start = self.expect(&Token::Begin, "Expected 'begin'")?;
        let statements = self.parse_statements()?;
        let end = self.expect(&Token::End, "Expected 'end'")?;

        let block = Block::new(routine, statements, name_span, start.merge(&end));
        self.sink.routine(self.symtab, block)?;
        self.symtab.close_scope()?;
        Ok(())
    }
}

fn already_defined(name: &str, span: Span) -> CompileError {
    CompileError::new(
        ErrorCode::AlreadyDefined,
        format!("'{}' is already declared in this scope", name),
        span,
    )
}
