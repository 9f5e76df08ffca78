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

//! Expression lowering.
//!
//! Every expression yields the symbol that holds its value. Named values
//! are used in place; everything else lands in a fresh temporary.

use super::generator::QuadGenerator;
use super::{Operand, QuadOp};
use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::error::InternalError;
use crate::symtab::{SymIndex, SymbolTable};

/// Extension trait for expression lowering.
pub trait ExpressionLowering {
    /// Lower an expression and return the symbol holding its value.
    fn generate_expr(&mut self, expr: &Expr) -> Result<SymIndex, InternalError>;

    /// Lower a binary operation.
    fn generate_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        ty: SymIndex,
    ) -> Result<SymIndex, InternalError>;

    /// Lower a call. Arguments are evaluated left to right, then pushed
    /// last formal first. `result` is the function type, or `None` for a
    /// procedure call.
    fn generate_call(
        &mut self,
        callee: SymIndex,
        args: &[Expr],
        result: Option<SymIndex>,
    ) -> Result<Option<SymIndex>, InternalError>;
}

/// Integer and real opcodes for a binary operator; `Nop` marks a domain
/// the analyzer never lets through.
fn binary_opcodes(op: BinaryOp) -> (QuadOp, QuadOp) {
    match op {
        BinaryOp::Add => (QuadOp::Iplus, QuadOp::Rplus),
        BinaryOp::Sub => (QuadOp::Iminus, QuadOp::Rminus),
        BinaryOp::Mul => (QuadOp::Imult, QuadOp::Rmult),
        BinaryOp::Divide => (QuadOp::Nop, QuadOp::Rdivide),
        BinaryOp::IntDiv => (QuadOp::Idivide, QuadOp::Nop),
        BinaryOp::Mod => (QuadOp::Imod, QuadOp::Nop),
        BinaryOp::And => (QuadOp::Iand, QuadOp::Nop),
        BinaryOp::Or => (QuadOp::Ior, QuadOp::Nop),
        BinaryOp::Equal => (QuadOp::Ieq, QuadOp::Req),
        BinaryOp::NotEqual => (QuadOp::Ine, QuadOp::Rne),
        BinaryOp::Less => (QuadOp::Ilt, QuadOp::Rlt),
        BinaryOp::Greater => (QuadOp::Igt, QuadOp::Rgt),
    }
}

impl ExpressionLowering for QuadGenerator<'_> {
    fn generate_expr(&mut self, expr: &Expr) -> Result<SymIndex, InternalError> {
        match &expr.kind {
            ExprKind::Integer(value) => {
                let integer = self.symtab.integer_type();
                let temp = self.symtab.new_temporary(integer)?;
                self.emit(
                    QuadOp::Iload,
                    Operand::Int(*value),
                    Operand::None,
                    Operand::Sym(temp),
                );
                Ok(temp)
            }
            ExprKind::Real(value) => {
                let real = self.symtab.real_type();
                let temp = self.symtab.new_temporary(real)?;
                self.emit(
                    QuadOp::Rload,
                    Operand::Int(SymbolTable::ieee(*value)),
                    Operand::None,
                    Operand::Sym(temp),
                );
                Ok(temp)
            }
            ExprKind::Identifier(symbol) => Ok(*symbol),
            ExprKind::Indexed { array, index, .. } => {
                let index = self.generate_expr(index)?;
                let op = self.domain(expr.ty, QuadOp::Irindex, QuadOp::Rrindex)?;
                let temp = self.symtab.new_temporary(expr.ty)?;
                self.emit(
                    op,
                    Operand::Sym(*array),
                    Operand::Sym(index),
                    Operand::Sym(temp),
                );
                Ok(temp)
            }
            ExprKind::Binary { op, left, right } => self.generate_binary(*op, left, right, expr.ty),
            ExprKind::Unary { op, operand } => {
                let source = self.generate_expr(operand)?;
                let op = match op {
                    UnaryOp::Negate => self.domain(operand.ty, QuadOp::Iuminus, QuadOp::Ruminus)?,
                    UnaryOp::Not => QuadOp::Inot,
                };
                let temp = self.symtab.new_temporary(expr.ty)?;
                self.emit(op, Operand::Sym(source), Operand::None, Operand::Sym(temp));
                Ok(temp)
            }
            ExprKind::Cast(inner) => {
                let source = self.generate_expr(inner)?;
                let real = self.symtab.real_type();
                let temp = self.symtab.new_temporary(real)?;
                self.emit(
                    QuadOp::Itor,
                    Operand::Sym(source),
                    Operand::None,
                    Operand::Sym(temp),
                );
                Ok(temp)
            }
            ExprKind::Call { callee, args, .. } => self
                .generate_call(*callee, args, Some(expr.ty))?
                .ok_or(InternalError::VoidTemporary),
        }
    }

    fn generate_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        ty: SymIndex,
    ) -> Result<SymIndex, InternalError> {
        let left_sym = self.generate_expr(left)?;
        let right_sym = self.generate_expr(right)?;

        let (integer_op, real_op) = binary_opcodes(op);
        let quad_op = self.domain(left.ty, integer_op, real_op)?;
        let result_type = if op.is_relational() {
            self.symtab.integer_type()
        } else {
            ty
        };
        let temp = self.symtab.new_temporary(result_type)?;
        self.emit(
            quad_op,
            Operand::Sym(left_sym),
            Operand::Sym(right_sym),
            Operand::Sym(temp),
        );
        Ok(temp)
    }

    fn generate_call(
        &mut self,
        callee: SymIndex,
        args: &[Expr],
        result: Option<SymIndex>,
    ) -> Result<Option<SymIndex>, InternalError> {
        let values = args
            .iter()
            .map(|arg| self.generate_expr(arg))
            .collect::<Result<Vec<_>, _>>()?;

        for value in values.iter().rev() {
            self.emit(QuadOp::Param, Operand::Sym(*value), Operand::None, Operand::None);
        }

        let destination = match result {
            Some(ty) => Some(self.symtab.new_temporary(ty)?),
            None => None,
        };
        self.emit(
            QuadOp::Call,
            Operand::Sym(callee),
            Operand::Int(values.len() as i64),
            destination.map_or(Operand::None, Operand::Sym),
        );
        Ok(destination)
    }
}
