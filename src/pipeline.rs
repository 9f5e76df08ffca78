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

//! Per-routine compilation driver.
//!
//! The parser hands every finished routine body to a [`Pipeline`], which
//! runs the middle and back end on it while the routine's scope is still
//! open: analysis, folding, quadruple generation and code generation.
//! Once any error has been recorded, later routines are still analyzed but
//! produce no code.

use crate::analyzer;
use crate::ast::Block;
use crate::codegen::{CodeGenerator, ASSEMBLY_HEADER};
use crate::error::{CompileError, Errors, InternalError};
use crate::lexer;
use crate::optimizer;
use crate::parser::{self, RoutineSink};
use crate::quads::{do_quads, QuadList};
use crate::symtab::SymbolTable;
use crate::CompileOptions;

/// The result of a successful compilation.
#[derive(Debug)]
pub struct Compilation {
    /// The complete assembly file.
    pub assembly: String,
    /// Each routine's quadruples, innermost routine first.
    pub quads: Vec<(String, QuadList)>,
    /// The symbol table after the last scope has closed.
    pub symbols: SymbolTable,
    /// Number of expressions replaced by constant folding.
    pub folded: usize,
}

/// Collects diagnostics and output while the parser drives it.
pub struct Pipeline<'o> {
    options: &'o CompileOptions,
    errors: Errors,
    assembly: String,
    quads: Vec<(String, QuadList)>,
    folded: usize,
}

impl<'o> Pipeline<'o> {
    /// Create a pipeline with the given options.
    pub fn new(options: &'o CompileOptions) -> Self {
        Self {
            options,
            errors: Errors::new(),
            assembly: String::from(ASSEMBLY_HEADER),
            quads: Vec::new(),
            folded: 0,
        }
    }

    /// Check if any error has been recorded.
    pub fn has_errors(&self) -> bool {
        self.errors.has_errors()
    }

    /// Lex, parse and compile a whole program.
    pub fn run(
        source: &str,
        options: &CompileOptions,
    ) -> Result<Compilation, Vec<CompileError>> {
        let tokens = lexer::tokenize(source).map_err(|error| vec![error])?;

        let mut symbols = SymbolTable::new();
        let mut pipeline = Pipeline::new(options);
        if let Err(error) = parser::parse(&tokens, &mut symbols, &mut pipeline) {
            pipeline.errors.push(error);
        }
        if pipeline.has_errors() {
            return Err(pipeline.errors.into_vec());
        }

        Ok(Compilation {
            assembly: pipeline.assembly,
            quads: pipeline.quads,
            symbols,
            folded: pipeline.folded,
        })
    }
}

impl RoutineSink for Pipeline<'_> {
    fn report(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    fn routine(&mut self, symtab: &mut SymbolTable, mut block: Block) -> Result<(), InternalError> {
        self.errors.extend(analyzer::analyze(symtab, &mut block));
        if self.has_errors() {
            return Ok(());
        }

        if self.options.optimize {
            self.folded += optimizer::fold_block(symtab, &mut block);
        }

        let quads = do_quads(symtab, &block)?;
        let mut generator = CodeGenerator::new(symtab, self.options.trace);
        generator.generate_routine(block.environment, &quads)?;
        self.assembly.push_str(&generator.finish());

        let name = symtab.name_of(block.environment).to_string();
        self.quads.push((name, quads));
        Ok(())
    }
}
