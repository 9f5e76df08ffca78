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

//! Expression parsing.
//!
//! Precedence, lowest first:
//! 1. Relational: `=`, `<>`, `<`, `>` (non-associative)
//! 2. Additive: `+`, `-`, `or`
//! 3. Multiplicative: `*`, `/`, `div`, `mod`, `and`
//! 4. Unary: `-`, `not`
//!
//! Leaves get their type from the symbol table; composite nodes start out
//! void and are typed by the analyzer.

use super::helpers::ParserHelpers;
use super::Parser;
use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::error::{CompileError, ErrorCode, Span};
use crate::lexer::Token;
use crate::symtab::SymIndex;

/// Trait for expression parsing.
pub trait ExpressionParser {
    /// Parse an expression.
    fn parse_expression(&mut self) -> Result<Expr, CompileError>;

    /// Parse additive operators.
    fn parse_simple_expression(&mut self) -> Result<Expr, CompileError>;

    /// Parse multiplicative operators.
    fn parse_term(&mut self) -> Result<Expr, CompileError>;

    /// Parse unary operators, literals, names, calls and parentheses.
    fn parse_factor(&mut self) -> Result<Expr, CompileError>;

    /// Parse a parenthesized argument list; returns the closing span.
    fn parse_arguments(&mut self) -> Result<(Vec<Expr>, Span), CompileError>;

    /// Look up a name, reporting it once if it is undeclared.
    fn resolve(&mut self, name: &str, span: Span) -> SymIndex;
}

impl ExpressionParser for Parser<'_> {
    fn parse_expression(&mut self) -> Result<Expr, CompileError> {
        let left = self.parse_simple_expression()?;
        let op = match self.peek() {
            Some(Token::Equal) => BinaryOp::Equal,
            Some(Token::NotEqual) => BinaryOp::NotEqual,
            Some(Token::Less) => BinaryOp::Less,
            Some(Token::Greater) => BinaryOp::Greater,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_simple_expression()?;
        Ok(binary(self, op, left, right))
    }

    fn parse_simple_expression(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                Some(Token::Or) => BinaryOp::Or,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_term()?;
            left = binary(self, op, left, right);
        }
    }

    fn parse_term(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Divide,
                Some(Token::Div) => BinaryOp::IntDiv,
                Some(Token::Mod) => BinaryOp::Mod,
                Some(Token::And) => BinaryOp::And,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_factor()?;
            left = binary(self, op, left, right);
        }
    }

    fn parse_factor(&mut self) -> Result<Expr, CompileError> {
        let void = self.symtab.void_type();
        let Some((token, span)) = self.advance() else {
            return Err(self.error(ErrorCode::UnexpectedEndOfFile, "Expected expression"));
        };

        match token {
            Token::Minus | Token::Not => {
                let op = if token == Token::Minus {
                    UnaryOp::Negate
                } else {
                    UnaryOp::Not
                };
                let operand = self.parse_factor()?;
                let full = span.merge(&operand.span);
                Ok(Expr::new(
                    ExprKind::Unary {
                        op,
                        operand: Box::new(operand),
                    },
                    void,
                    full,
                ))
            }
            Token::LeftParen => {
                let mut inner = self.parse_expression()?;
                let close = self.expect(&Token::RightParen, "Expected ')'")?;
                inner.span = span.merge(&close);
                Ok(inner)
            }
            Token::Integer(value) => Ok(Expr::integer(value, self.symtab.integer_type(), span)),
            Token::Real(value) => Ok(Expr::new(
                ExprKind::Real(value),
                self.symtab.real_type(),
                span,
            )),
            Token::Identifier(name) => {
                let symbol = self.resolve(&name, span);
                let ty = self.symtab.type_of(symbol);
                if self.match_token(&Token::LeftBracket) {
                    let index = self.parse_expression()?;
                    let close = self.expect(&Token::RightBracket, "Expected ']' after index")?;
                    Ok(Expr::new(
                        ExprKind::Indexed {
                            array: symbol,
                            array_span: span,
                            index: Box::new(index),
                        },
                        ty,
                        span.merge(&close),
                    ))
                } else if self.check(&Token::LeftParen) {
                    let (args, close) = self.parse_arguments()?;
                    Ok(Expr::new(
                        ExprKind::Call {
                            callee: symbol,
                            callee_span: span,
                            args,
                        },
                        ty,
                        span.merge(&close),
                    ))
                } else {
                    Ok(Expr::new(ExprKind::Identifier(symbol), ty, span))
                }
            }
            other => {
                self.position -= 1;
                Err(self.error(
                    ErrorCode::ExpectedExpression,
                    format!("Expected expression, found {}", other.describe()),
                ))
            }
        }
    }

    fn parse_arguments(&mut self) -> Result<(Vec<Expr>, Span), CompileError> {
        self.expect(&Token::LeftParen, "Expected '('")?;
        let mut args = Vec::new();
        if !self.check(&Token::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        let close = self.expect(&Token::RightParen, "Expected ')' after arguments")?;
        Ok((args, close))
    }

    fn resolve(&mut self, name: &str, span: Span) -> SymIndex {
        if let Some(index) = self.symtab.lookup(name) {
            return index;
        }
        self.report(CompileError::new(
            ErrorCode::UndefinedIdentifier,
            format!("Undefined identifier '{}'", name),
            span,
        ));
        self.symtab.install(name, span)
    }
}

fn binary(parser: &Parser<'_>, op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(&right.span);
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        parser.symtab.void_type(),
        span,
    )
}
