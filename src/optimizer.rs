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

//! Integer constant folding.
//!
//! Runs on a type-checked routine body. Integer subtrees whose leaves are
//! literals or integer named constants collapse into a single literal.
//! Real arithmetic is left alone, as are `div` and `mod` by zero.

use crate::ast::{BinaryOp, Block, Expr, ExprKind, LValueKind, Stmt, StmtKind, UnaryOp};
use crate::symtab::{ConstantValue, SymbolKind, SymbolTable};

/// Folds integer constant expressions in place.
pub struct ConstantFolder<'a> {
    symtab: &'a SymbolTable,
    folded: usize,
}

impl<'a> ConstantFolder<'a> {
    /// Create a folder reading constants from `symtab`.
    pub fn new(symtab: &'a SymbolTable) -> Self {
        Self { symtab, folded: 0 }
    }

    /// Number of nodes replaced so far.
    pub fn folded(&self) -> usize {
        self.folded
    }

    /// Fold every expression in a routine body.
    pub fn fold_block(&mut self, block: &mut Block) {
        self.fold_statements(&mut block.statements);
    }

    fn fold_statements(&mut self, statements: &mut [Stmt]) {
        for statement in statements {
            self.fold_statement(statement);
        }
    }

    fn fold_statement(&mut self, statement: &mut Stmt) {
        match &mut statement.kind {
            StmtKind::Assign { target, value } => {
                if let LValueKind::Indexed { index, .. } = &mut target.kind {
                    self.fold_expr(index);
                }
                self.fold_expr(value);
            }
            StmtKind::Call { args, .. } => {
                for arg in args {
                    self.fold_expr(arg);
                }
            }
            StmtKind::If(if_stmt) => {
                self.fold_expr(&mut if_stmt.condition);
                self.fold_statements(&mut if_stmt.then_body);
                for branch in &mut if_stmt.elsif_branches {
                    self.fold_expr(&mut branch.condition);
                    self.fold_statements(&mut branch.body);
                }
                if let Some(else_body) = &mut if_stmt.else_body {
                    self.fold_statements(else_body);
                }
            }
            StmtKind::While { condition, body } => {
                self.fold_expr(condition);
                self.fold_statements(body);
            }
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.fold_expr(value);
                }
            }
        }
    }

    /// Fold an expression bottom-up.
    pub fn fold_expr(&mut self, expr: &mut Expr) {
        match &mut expr.kind {
            ExprKind::Integer(_) | ExprKind::Real(_) | ExprKind::Identifier(_) => {}
            ExprKind::Indexed { index, .. } => self.fold_expr(index),
            ExprKind::Binary { left, right, .. } => {
                self.fold_expr(left);
                self.fold_expr(right);
            }
            ExprKind::Unary { operand, .. } => self.fold_expr(operand),
            ExprKind::Cast(inner) => self.fold_expr(inner),
            ExprKind::Call { args, .. } => {
                for arg in args {
                    self.fold_expr(arg);
                }
            }
        }

        if matches!(expr.kind, ExprKind::Integer(_)) {
            return;
        }
        if let Some(value) = self.try_eval_constant(expr) {
            *expr = Expr::integer(value, self.symtab.integer_type(), expr.span);
            self.folded += 1;
        }
    }

    /// Evaluate a node whose children are already folded.
    fn try_eval_constant(&self, expr: &Expr) -> Option<i64> {
        if expr.ty != self.symtab.integer_type() {
            return None;
        }
        match &expr.kind {
            ExprKind::Integer(value) => Some(*value),
            ExprKind::Identifier(symbol) => match self.symtab.symbol(*symbol).ok()?.kind {
                SymbolKind::Constant(ConstantValue::Integer(value)) => Some(value),
                _ => None,
            },
            ExprKind::Unary { op, operand } => {
                let value = operand.as_integer()?;
                match op {
                    UnaryOp::Negate => Some(value.wrapping_neg()),
                    UnaryOp::Not => Some(i64::from(value == 0)),
                }
            }
            ExprKind::Binary { op, left, right } => {
                let left = left.as_integer()?;
                let right = right.as_integer()?;
                match op {
                    BinaryOp::Add => Some(left.wrapping_add(right)),
                    BinaryOp::Sub => Some(left.wrapping_sub(right)),
                    BinaryOp::Mul => Some(left.wrapping_mul(right)),
                    BinaryOp::IntDiv => left.checked_div(right),
                    BinaryOp::Mod => left.checked_rem(right),
                    BinaryOp::And => Some(i64::from(left != 0 && right != 0)),
                    BinaryOp::Or => Some(i64::from(left != 0 || right != 0)),
                    BinaryOp::Equal => Some(i64::from(left == right)),
                    BinaryOp::NotEqual => Some(i64::from(left != right)),
                    BinaryOp::Less => Some(i64::from(left < right)),
                    BinaryOp::Greater => Some(i64::from(left > right)),
                    BinaryOp::Divide => None,
                }
            }
            _ => None,
        }
    }
}

/// Fold one routine body and return the number of replaced nodes.
pub fn fold_block(symtab: &SymbolTable, block: &mut Block) -> usize {
    let mut folder = ConstantFolder::new(symtab);
    folder.fold_block(block);
    folder.folded()
}
