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

//! Per-routine quadruple generation and statement lowering.

use super::control_flow::ControlFlowLowering;
use super::expressions::ExpressionLowering;
use super::{Operand, QuadList, QuadOp, Quadruple};
use crate::ast::{Block, Expr, LValue, LValueKind, Stmt, StmtKind};
use crate::error::InternalError;
use crate::symtab::{SymIndex, SymbolTable};

/// Lowers one checked routine body to quadruples.
///
/// Temporaries are installed in the symbol table's current environment,
/// so the routine's scope must still be open.
pub struct QuadGenerator<'a> {
    pub(crate) symtab: &'a mut SymbolTable,
    pub(crate) quads: QuadList,
}

impl<'a> QuadGenerator<'a> {
    /// Create a generator and reserve the routine's exit label.
    pub fn new(symtab: &'a mut SymbolTable) -> Self {
        let exit_label = symtab.next_label();
        Self {
            symtab,
            quads: QuadList::new(exit_label),
        }
    }

    /// Lower a routine body; the exit label closes the list.
    pub fn generate_block(mut self, block: &Block) -> Result<QuadList, InternalError> {
        self.generate_statements(&block.statements)?;
        let exit = self.quads.exit_label();
        self.quads.push(Quadruple::label(exit));
        Ok(self.quads)
    }

    /// Append a quadruple.
    pub(crate) fn emit(&mut self, op: QuadOp, a: Operand, b: Operand, c: Operand) {
        self.quads.push(Quadruple::new(op, a, b, c));
    }

    /// Pick the integer or real opcode for values of type `ty`.
    pub(crate) fn domain(
        &self,
        ty: SymIndex,
        integer: QuadOp,
        real: QuadOp,
    ) -> Result<QuadOp, InternalError> {
        if ty == self.symtab.integer_type() {
            Ok(integer)
        } else if ty == self.symtab.real_type() {
            Ok(real)
        } else {
            Err(InternalError::NotNumeric(self.symtab.name_of(ty).to_string()))
        }
    }

    pub(crate) fn generate_statements(&mut self, statements: &[Stmt]) -> Result<(), InternalError> {
        for statement in statements {
            self.generate_statement(statement)?;
        }
        Ok(())
    }

    fn generate_statement(&mut self, statement: &Stmt) -> Result<(), InternalError> {
        match &statement.kind {
            StmtKind::Assign { target, value } => self.generate_assignment(target, value),
            StmtKind::Call { callee, args, .. } => {
                self.generate_call(*callee, args, None)?;
                Ok(())
            }
            StmtKind::If(if_stmt) => self.generate_if(if_stmt),
            StmtKind::While { condition, body } => self.generate_while(condition, body),
            StmtKind::Return(value) => self.generate_return(value.as_ref()),
        }
    }

    fn generate_assignment(&mut self, target: &LValue, value: &Expr) -> Result<(), InternalError> {
        let rhs = self.generate_expr(value)?;
        match &target.kind {
            LValueKind::Identifier(symbol) => {
                let op = self.domain(target.ty, QuadOp::Iassign, QuadOp::Rassign)?;
                self.emit(op, Operand::Sym(rhs), Operand::None, Operand::Sym(*symbol));
            }
            LValueKind::Indexed { array, index, .. } => {
                let index = self.generate_expr(index)?;
                let integer = self.symtab.integer_type();
                let address = self.symtab.new_temporary(integer)?;
                self.emit(
                    QuadOp::Lindex,
                    Operand::Sym(*array),
                    Operand::Sym(index),
                    Operand::Sym(address),
                );
                let op = self.domain(target.ty, QuadOp::Istore, QuadOp::Rstore)?;
                self.emit(op, Operand::Sym(rhs), Operand::None, Operand::Sym(address));
            }
        }
        Ok(())
    }
}

/// Lower a checked routine body. The routine's scope must be open.
pub fn do_quads(symtab: &mut SymbolTable, block: &Block) -> Result<QuadList, InternalError> {
    QuadGenerator::new(symtab).generate_block(block)
}
