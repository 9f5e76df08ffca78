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

//! Control flow lowering: if/elsif/else, while and return.

use super::expressions::ExpressionLowering;
use super::generator::QuadGenerator;
use super::{Operand, QuadOp, Quadruple};
use crate::ast::{Expr, IfStatement, Stmt};
use crate::error::InternalError;

/// Extension trait for control flow lowering.
pub trait ControlFlowLowering {
    /// `cond; jmpf next; body; jmp end; labl next` per branch, then the
    /// else body and the shared end label.
    fn generate_if(&mut self, if_stmt: &IfStatement) -> Result<(), InternalError>;

    /// `labl top; cond; jmpf bottom; body; jmp top; labl bottom`
    fn generate_while(&mut self, condition: &Expr, body: &[Stmt]) -> Result<(), InternalError>;

    /// A valued return stores into the result and jumps to the exit label;
    /// a bare return just jumps there.
    fn generate_return(&mut self, value: Option<&Expr>) -> Result<(), InternalError>;
}

impl ControlFlowLowering for QuadGenerator<'_> {
    fn generate_if(&mut self, if_stmt: &IfStatement) -> Result<(), InternalError> {
        let end = self.symtab.next_label();

        let branches = std::iter::once((&if_stmt.condition, &if_stmt.then_body)).chain(
            if_stmt
                .elsif_branches
                .iter()
                .map(|branch| (&branch.condition, &branch.body)),
        );
        for (condition, body) in branches {
            let next = self.symtab.next_label();
            let result = self.generate_expr(condition)?;
            self.quads.push(Quadruple::jump_false(next, result));
            self.generate_statements(body)?;
            self.quads.push(Quadruple::jump(end));
            self.quads.push(Quadruple::label(next));
        }

        if let Some(else_body) = &if_stmt.else_body {
            self.generate_statements(else_body)?;
        }
        self.quads.push(Quadruple::label(end));
        Ok(())
    }

    fn generate_while(&mut self, condition: &Expr, body: &[Stmt]) -> Result<(), InternalError> {
        let top = self.symtab.next_label();
        let bottom = self.symtab.next_label();

        self.quads.push(Quadruple::label(top));
        let result = self.generate_expr(condition)?;
        self.quads.push(Quadruple::jump_false(bottom, result));
        self.generate_statements(body)?;
        self.quads.push(Quadruple::jump(top));
        self.quads.push(Quadruple::label(bottom));
        Ok(())
    }

    fn generate_return(&mut self, value: Option<&Expr>) -> Result<(), InternalError> {
        let exit = self.quads.exit_label();
        match value {
            Some(value) => {
                let result = self.generate_expr(value)?;
                let op = self.domain(value.ty, QuadOp::Ireturn, QuadOp::Rreturn)?;
                self.emit(op, Operand::Label(exit), Operand::Sym(result), Operand::None);
            }
            None => self.quads.push(Quadruple::jump(exit)),
        }
        Ok(())
    }
}
