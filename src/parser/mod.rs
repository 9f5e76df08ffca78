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

//! Parser module for the Diesel compiler.
//!
//! This module reads a token stream by recursive descent. Declarations are
//! installed into the [`SymbolTable`] as they are read, so every identifier
//! in the produced tree is already resolved to a [`SymIndex`](crate::symtab::SymIndex).
//! Each routine body is handed to a [`RoutineSink`] as soon as it is
//! complete, while the routine's scope is still open.
//!
//! # Module Structure
//!
//! - `declarations` - Constants, variables, routines (DeclarationParser trait)
//! - `expressions` - Expression parsing (ExpressionParser trait)
//! - `helpers` - Token stream navigation and error handling (ParserHelpers trait)
//! - `statements` - Statement parsing (StatementParser trait)

pub mod declarations;
pub mod expressions;
pub mod helpers;
pub mod statements;

use declarations::DeclarationParser;
use helpers::ParserHelpers;
use statements::StatementParser;

use crate::ast::Block;
use crate::error::{CompileError, ErrorCode, InternalError, Span};
use crate::lexer::Token;
use crate::symtab::{SymIndex, SymbolTable};

/// Receives finished routine bodies and non-fatal diagnostics.
pub trait RoutineSink {
    /// Record an error that does not stop parsing.
    fn report(&mut self, error: CompileError);

    /// Process a complete routine body. Called innermost routine first,
    /// the main program last, before the routine's scope is closed.
    fn routine(&mut self, symtab: &mut SymbolTable, block: Block) -> Result<(), InternalError>;
}

/// A sink that keeps every block and error for later inspection.
#[derive(Debug, Default)]
pub struct BlockCollector {
    /// Routine bodies in completion order.
    pub blocks: Vec<Block>,
    /// Reported errors in order.
    pub errors: Vec<CompileError>,
}

impl RoutineSink for BlockCollector {
    fn report(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    fn routine(&mut self, _symtab: &mut SymbolTable, block: Block) -> Result<(), InternalError> {
        self.blocks.push(block);
        Ok(())
    }
}

/// The parser state.
pub struct Parser<'a> {
    /// The token stream to parse.
    pub(crate) tokens: &'a [(Token, Span)],
    /// Current position in the token stream.
    pub(crate) position: usize,
    /// Declarations are installed here.
    pub(crate) symtab: &'a mut SymbolTable,
    /// Finished routines and non-fatal errors go here.
    pub(crate) sink: &'a mut dyn RoutineSink,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given token stream.
    pub fn new(
        tokens: &'a [(Token, Span)],
        symtab: &'a mut SymbolTable,
        sink: &'a mut dyn RoutineSink,
    ) -> Self {
        Self {
            tokens,
            position: 0,
            symtab,
            sink,
        }
    }

    // ========================================
    // Program Parsing
    // ========================================

    /// Parse the complete program.
    pub fn parse(&mut self) -> Result<(), CompileError> {
        self.expect(&Token::Program, "Expected 'program'")?;
        let (name, name_span) = self.expect_identifier("Expected program name")?;
        self.expect(&Token::Semicolon, "Expected ';' after program name")?;

        let program = match self.symtab.enter_procedure(&name, name_span) {
            Ok(index) => index,
            Err(_) => self.shadow_routine(&name, name_span, false),
        };
        self.open_routine_scope()?;
        self.parse_routine_body(program, name_span)?;
        self.expect(&Token::Dot, "Expected '.' after program body")?;

        if !self.is_at_end() {
            return Err(self.error(
                ErrorCode::UnexpectedToken,
                "Unexpected input after end of program",
            ));
        }
        Ok(())
    }

    /// Open the scope of the routine installed last.
    pub(crate) fn open_routine_scope(&mut self) -> Result<(), CompileError> {
        self.symtab.open_scope().map_err(|_| {
            self.error(
                ErrorCode::NestingTooDeep,
                "Routines are nested too deeply",
            )
        })
    }

    /// Install a routine under a name no identifier can spell, so that the
    /// body of a redeclared routine still parses in its own scope.
    pub(crate) fn shadow_routine(&mut self, name: &str, span: Span, function: bool) -> SymIndex {
        let mut alias = format!("{}$", name);
        loop {
            let entered = if function {
                self.symtab.enter_function(&alias, span)
            } else {
                self.symtab.enter_procedure(&alias, span)
            };
            match entered {
                Ok(index) => return index,
                Err(_) => alias.push('$'),
            }
        }
    }
}

/// Parse a token stream, installing declarations into `symtab` and
/// handing every routine body to `sink`.
pub fn parse(
    tokens: &[(Token, Span)],
    symtab: &mut SymbolTable,
    sink: &mut dyn RoutineSink,
) -> Result<(), CompileError> {
    let mut parser = Parser::new(tokens, symtab, sink);
    parser.parse()
}
