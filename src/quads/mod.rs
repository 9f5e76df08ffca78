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

//! Quadruple intermediate representation.
//!
//! A routine body lowers to a flat list of three-address instructions.
//! Operand slots are positional; their meaning depends on the opcode:
//!
//! | opcode                       | a          | b          | c            |
//! |------------------------------|------------|------------|--------------|
//! | `iload` `rload`              | immediate  | -          | destination  |
//! | unary, `itor`, assign        | source     | -          | destination  |
//! | binary, relational, logical  | left       | right      | destination  |
//! | `istore` `rstore`            | value      | -          | address temp |
//! | `lindex` `irindex` `rrindex` | array      | index      | destination  |
//! | `call`                       | callee     | arg count  | result / -   |
//! | `ireturn` `rreturn`          | exit label | value      | -            |
//! | `jmp` `labl`                 | label      | -          | -            |
//! | `jmpf`                       | label      | condition  | -            |
//! | `param`                      | argument   | -          | -            |
//!
//! # Module Structure
//!
//! - `control_flow` - If/while/return lowering (ControlFlowLowering trait)
//! - `expressions` - Expression lowering (ExpressionLowering trait)
//! - `generator` - Per-routine driver and statement lowering

pub mod control_flow;
pub mod expressions;
pub mod generator;

pub use generator::{do_quads, QuadGenerator};

use std::fmt;

use crate::symtab::{LabelId, SymIndex, SymbolTable};

/// Quadruple opcodes. `i` and `r` prefixes select the integer or real domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuadOp {
    Iload,
    Rload,
    Inot,
    Ruminus,
    Iuminus,
    Rplus,
    Iplus,
    Rminus,
    Iminus,
    Ior,
    Iand,
    Rmult,
    Imult,
    Rdivide,
    Idivide,
    Imod,
    Req,
    Ieq,
    Rne,
    Ine,
    Rlt,
    Ilt,
    Rgt,
    Igt,
    Rstore,
    Istore,
    Rassign,
    Iassign,
    Call,
    Rreturn,
    Ireturn,
    Lindex,
    Rrindex,
    Irindex,
    Itor,
    Jmp,
    Jmpf,
    Param,
    Labl,
    Nop,
}

impl QuadOp {
    /// The listing mnemonic.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuadOp::Iload => "q_iload",
            QuadOp::Rload => "q_rload",
            QuadOp::Inot => "q_inot",
            QuadOp::Ruminus => "q_ruminus",
            QuadOp::Iuminus => "q_iuminus",
            QuadOp::Rplus => "q_rplus",
            QuadOp::Iplus => "q_iplus",
            QuadOp::Rminus => "q_rminus",
            QuadOp::Iminus => "q_iminus",
            QuadOp::Ior => "q_ior",
            QuadOp::Iand => "q_iand",
            QuadOp::Rmult => "q_rmult",
            QuadOp::Imult => "q_imult",
            QuadOp::Rdivide => "q_rdivide",
            QuadOp::Idivide => "q_idivide",
            QuadOp::Imod => "q_imod",
            QuadOp::Req => "q_req",
            QuadOp::Ieq => "q_ieq",
            QuadOp::Rne => "q_rne",
            QuadOp::Ine => "q_ine",
            QuadOp::Rlt => "q_rlt",
            QuadOp::Ilt => "q_ilt",
            QuadOp::Rgt => "q_rgt",
            QuadOp::Igt => "q_igt",
            QuadOp::Rstore => "q_rstore",
            QuadOp::Istore => "q_istore",
            QuadOp::Rassign => "q_rassign",
            QuadOp::Iassign => "q_iassign",
            QuadOp::Call => "q_call",
            QuadOp::Rreturn => "q_rreturn",
            QuadOp::Ireturn => "q_ireturn",
            QuadOp::Lindex => "q_lindex",
            QuadOp::Rrindex => "q_rrindex",
            QuadOp::Irindex => "q_irindex",
            QuadOp::Itor => "q_itor",
            QuadOp::Jmp => "q_jmp",
            QuadOp::Jmpf => "q_jmpf",
            QuadOp::Param => "q_param",
            QuadOp::Labl => "q_labl",
            QuadOp::Nop => "q_nop",
        }
    }
}

impl fmt::Display for QuadOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One operand slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Operand {
    /// A symbol: variable, parameter, constant, temporary, array or routine.
    Sym(SymIndex),
    /// An immediate integer (a real's IEEE bits for `rload`).
    Int(i64),
    /// A label id.
    Label(LabelId),
    /// Unused slot.
    #[default]
    None,
}

impl Operand {
    /// The symbol in this slot, if any.
    pub fn sym(&self) -> Option<SymIndex> {
        match self {
            Operand::Sym(index) => Some(*index),
            _ => None,
        }
    }

    /// The immediate in this slot, if any.
    pub fn int(&self) -> Option<i64> {
        match self {
            Operand::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The label in this slot, if any.
    pub fn label(&self) -> Option<LabelId> {
        match self {
            Operand::Label(label) => Some(*label),
            _ => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Sym(index) => write!(f, "#{}", index),
            Operand::Int(value) => write!(f, "{}", value),
            Operand::Label(label) => write!(f, "L{}", label),
            Operand::None => write!(f, "-"),
        }
    }
}

/// A single three-address instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quadruple {
    pub op: QuadOp,
    pub a: Operand,
    pub b: Operand,
    pub c: Operand,
}

impl Quadruple {
    /// Create a quadruple.
    pub fn new(op: QuadOp, a: Operand, b: Operand, c: Operand) -> Self {
        Self { op, a, b, c }
    }

    /// `labl label`
    pub fn label(label: LabelId) -> Self {
        Self::new(QuadOp::Labl, Operand::Label(label), Operand::None, Operand::None)
    }

    /// `jmp label`
    pub fn jump(label: LabelId) -> Self {
        Self::new(QuadOp::Jmp, Operand::Label(label), Operand::None, Operand::None)
    }

    /// `jmpf label, condition`
    pub fn jump_false(label: LabelId, condition: SymIndex) -> Self {
        Self::new(
            QuadOp::Jmpf,
            Operand::Label(label),
            Operand::Sym(condition),
            Operand::None,
        )
    }

    fn write_operand(
        f: &mut fmt::Formatter<'_>,
        operand: &Operand,
        symtab: Option<&SymbolTable>,
    ) -> fmt::Result {
        match (operand, symtab) {
            (Operand::Sym(index), Some(symtab)) => write!(f, "{:<11}", symtab.name_of(*index)),
            (operand, _) => write!(f, "{:<11}", operand.to_string()),
        }
    }

    fn write_row(&self, f: &mut fmt::Formatter<'_>, symtab: Option<&SymbolTable>) -> fmt::Result {
        write!(f, "{:<11}", self.op.as_str())?;
        Self::write_operand(f, &self.a, symtab)?;
        Self::write_operand(f, &self.b, symtab)?;
        Self::write_operand(f, &self.c, symtab)
    }
}

impl fmt::Display for Quadruple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_row(f, None)
    }
}

/// Display adapter returned by [`Quadruple::named`].
pub struct NamedQuad<'a> {
    quad: &'a Quadruple,
    symtab: &'a SymbolTable,
}

impl Quadruple {
    /// A row that prints symbol names instead of indices.
    pub fn named<'a>(&'a self, symtab: &'a SymbolTable) -> NamedQuad<'a> {
        NamedQuad { quad: self, symtab }
    }
}

impl fmt::Display for NamedQuad<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.quad.write_row(f, Some(self.symtab))
    }
}

/// The quadruples of one routine body, with the routine's exit label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadList {
    quads: Vec<Quadruple>,
    exit_label: LabelId,
}

impl QuadList {
    /// Create an empty list for a routine exiting through `exit_label`.
    pub fn new(exit_label: LabelId) -> Self {
        Self {
            quads: Vec::new(),
            exit_label,
        }
    }

    /// Append a quadruple.
    pub fn push(&mut self, quad: Quadruple) {
        self.quads.push(quad);
    }

    /// The label every `return` jumps to.
    pub fn exit_label(&self) -> LabelId {
        self.exit_label
    }

    /// Iterate over the quadruples in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Quadruple> {
        self.quads.iter()
    }

    /// Number of quadruples.
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// A listing that prints symbol names instead of indices.
    pub fn named<'a>(&'a self, symtab: &'a SymbolTable) -> NamedQuadList<'a> {
        NamedQuadList { list: self, symtab }
    }

    fn write_listing(&self, f: &mut fmt::Formatter<'_>, symtab: Option<&SymbolTable>) -> fmt::Result {
        for (number, quad) in self.quads.iter().enumerate() {
            write!(f, "{:>5}    ", number + 1)?;
            quad.write_row(f, symtab)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a QuadList {
    type Item = &'a Quadruple;
    type IntoIter = std::slice::Iter<'a, Quadruple>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for QuadList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_listing(f, None)
    }
}

/// Display adapter returned by [`QuadList::named`].
pub struct NamedQuadList<'a> {
    list: &'a QuadList,
    symtab: &'a SymbolTable,
}

impl fmt::Display for NamedQuadList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.list.write_listing(f, Some(self.symtab))
    }
}
