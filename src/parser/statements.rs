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

//! Statement parsing.

use super::expressions::ExpressionParser;
use super::helpers::ParserHelpers;
use super::Parser;
use crate::ast::{ElsifBranch, IfStatement, LValue, LValueKind, Stmt, StmtKind};
use crate::error::{CompileError, ErrorCode};
use crate::lexer::Token;

/// Trait for statement parsing.
pub trait StatementParser {
    /// Parse a `;`-separated statement list. Empty statements are dropped.
    fn parse_statements(&mut self) -> Result<Vec<Stmt>, CompileError>;

    /// Parse a single statement, or nothing if the list ends here.
    fn parse_statement(&mut self) -> Result<Option<Stmt>, CompileError>;

    /// Parse an assignment or procedure call starting with an identifier.
    fn parse_identifier_statement(&mut self) -> Result<Stmt, CompileError>;

    /// Parse an if statement.
    fn parse_if_statement(&mut self) -> Result<Stmt, CompileError>;

    /// Parse a while statement.
    fn parse_while_statement(&mut self) -> Result<Stmt, CompileError>;

    /// Parse a return statement.
    fn parse_return_statement(&mut self) -> Result<Stmt, CompileError>;
}

impl StatementParser for Parser<'_> {
    fn parse_statements(&mut self) -> Result<Vec<Stmt>, CompileError> {
        let mut statements = Vec::new();
        loop {
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
            if !self.match_token(&Token::Semicolon) {
                return Ok(statements);
            }
        }
    }

    fn parse_statement(&mut self) -> Result<Option<Stmt>, CompileError> {
        let statement = match self.peek() {
            Some(Token::Identifier(_)) => self.parse_identifier_statement()?,
            Some(Token::If) => self.parse_if_statement()?,
            Some(Token::While) => self.parse_while_statement()?,
            Some(Token::Return) => self.parse_return_statement()?,
            Some(Token::Semicolon | Token::End | Token::Else | Token::Elsif) => return Ok(None),
            Some(other) => {
                let message = format!("Expected a statement, found {}", other.describe());
                return Err(self.error(ErrorCode::UnexpectedToken, message));
            }
            None => return Err(self.error(ErrorCode::UnexpectedEndOfFile, "Expected a statement")),
        };
        Ok(Some(statement))
    }

    fn parse_identifier_statement(&mut self) -> Result<Stmt, CompileError> {
        let (name, span) = self.expect_identifier("Expected identifier")?;
        let symbol = self.resolve(&name, span);

        if self.check(&Token::Assign) || self.check(&Token::LeftBracket) {
            let target = if self.match_token(&Token::LeftBracket) {
                let index = self.parse_expression()?;
                let close = self.expect(&Token::RightBracket, "Expected ']' after index")?;
                LValue::new(
                    LValueKind::Indexed {
                        array: symbol,
                        array_span: span,
                        index: Box::new(index),
                    },
                    self.symtab.type_of(symbol),
                    span.merge(&close),
                )
            } else {
                LValue::new(
                    LValueKind::Identifier(symbol),
                    self.symtab.type_of(symbol),
                    span,
                )
            };
            self.expect(&Token::Assign, "Expected ':=' in assignment")?;
            let value = self.parse_expression()?;
            let full = target.span.merge(&value.span);
            return Ok(Stmt::new(StmtKind::Assign { target, value }, full));
        }

        let (args, end) = if self.check(&Token::LeftParen) {
            self.parse_arguments()?
        } else {
            (Vec::new(), span)
        };
        Ok(Stmt::new(
            StmtKind::Call {
                callee: symbol,
                callee_span: span,
                args,
            },
            span.merge(&end),
        ))
    }

    fn parse_if_statement(&mut self) -> Result<Stmt, CompileError> {
        let start = self.expect(&Token::If, "Expected 'if'")?;
        let condition = self.parse_expression()?;
        self.expect(&Token::Then, "Expected 'then' after condition")?;
        let then_body = self.parse_statements()?;

        let mut elsif_branches = Vec::new();
        while self.check(&Token::Elsif) {
            let branch_start = self.expect(&Token::Elsif, "Expected 'elsif'")?;
            let condition = self.parse_expression()?;
            self.expect(&Token::Then, "Expected 'then' after condition")?;
            let body = self.parse_statements()?;
            elsif_branches.push(ElsifBranch {
                condition,
                body,
                span: branch_start.merge(&self.previous_span()),
            });
        }

        let else_body = if self.match_token(&Token::Else) {
            Some(self.parse_statements()?)
        } else {
            None
        };
        let end = self.expect(&Token::End, "Expected 'end' to close 'if'")?;

        Ok(Stmt::new(
            StmtKind::If(IfStatement {
                condition,
                then_body,
                elsif_branches,
                else_body,
            }),
            start.merge(&end),
        ))
    }

    fn parse_while_statement(&mut self) -> Result<Stmt, CompileError> {
        let start = self.expect(&Token::While, "Expected 'while'")?;
        let condition = self.parse_expression()?;
        self.expect(&Token::Do, "Expected 'do' after condition")?;
        let body = self.parse_statements()?;
        let end = self.expect(&Token::End, "Expected 'end' to close 'while'")?;
        Ok(Stmt::new(
            StmtKind::While { condition, body },
            start.merge(&end),
        ))
    }

    fn parse_return_statement(&mut self) -> Result<Stmt, CompileError> {
        let start = self.expect(&Token::Return, "Expected 'return'")?;
        if self.check_any(&[Token::Semicolon, Token::End, Token::Else, Token::Elsif]) {
            return Ok(Stmt::new(StmtKind::Return(None), start));
        }
        let value = self.parse_expression()?;
        let span = start.merge(&value.span);
        Ok(Stmt::new(StmtKind::Return(Some(value)), span))
    }
}
