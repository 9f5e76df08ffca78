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

//! Relational and logical operators.
//!
//! Every operator lowers to the same shape: test, conditionally jump to a
//! fresh target label, load the fall-through value, jump to a fresh join
//! label, load the taken value at the target, and store at the join.

use super::emit::{EmitHelpers, Register};
use super::frame::FrameAccess;
use super::CodeGenerator;
use crate::error::InternalError;
use crate::quads::QuadOp;
use crate::symtab::{LabelId, SymIndex};

/// Extension trait for comparison code generation.
pub trait ComparisonEmitter {
    /// `ieq ine ilt igt`.
    fn integer_compare(
        &mut self,
        op: QuadOp,
        left: SymIndex,
        right: SymIndex,
        dest: SymIndex,
    ) -> Result<(), InternalError>;

    /// `req rne rlt rgt` via `fcomip`.
    fn real_compare(
        &mut self,
        op: QuadOp,
        left: SymIndex,
        right: SymIndex,
        dest: SymIndex,
    ) -> Result<(), InternalError>;

    /// `iand ior`. Both operands are already evaluated.
    fn logical_binary(
        &mut self,
        op: QuadOp,
        left: SymIndex,
        right: SymIndex,
        dest: SymIndex,
    ) -> Result<(), InternalError>;

    /// `inot`.
    fn logical_not(&mut self, src: SymIndex, dest: SymIndex) -> Result<(), InternalError>;
}

impl CodeGenerator<'_> {
    /// Finish the idiom after the conditional jumps to `target`.
    fn select(
        &mut self,
        target: LabelId,
        taken: i64,
        fallthrough: i64,
        dest: SymIndex,
    ) -> Result<(), InternalError> {
        let join = self.symtab.next_label();
        self.emit("mov", &format!("rax, {}", fallthrough));
        self.emit_jump("jmp", join);
        self.emit_label(target);
        self.emit("mov", &format!("rax, {}", taken));
        self.emit_label(join);
        self.store(Register::Rax, dest)
    }

    fn not_a_comparison(op: QuadOp) -> InternalError {
        InternalError::BadOperand {
            quad: 0,
            op: op.as_str(),
            slot: 0,
            expected: "a comparison opcode",
        }
    }
}

impl ComparisonEmitter for CodeGenerator<'_> {
    fn integer_compare(
        &mut self,
        op: QuadOp,
        left: SymIndex,
        right: SymIndex,
        dest: SymIndex,
    ) -> Result<(), InternalError> {
        let jump = match op {
            QuadOp::Ieq => "je",
            QuadOp::Ine => "jne",
            QuadOp::Ilt => "jl",
            QuadOp::Igt => "jg",
            _ => return Err(Self::not_a_comparison(op)),
        };
        let target = self.symtab.next_label();
        self.fetch(left, Register::Rax)?;
        self.fetch(right, Register::Rcx)?;
        self.emit("cmp", "rax, rcx");
        self.emit_jump(jump, target);
        self.select(target, 1, 0, dest)
    }

    fn real_compare(
        &mut self,
        op: QuadOp,
        left: SymIndex,
        right: SymIndex,
        dest: SymIndex,
    ) -> Result<(), InternalError> {
        // fcomip compares ST(0) against ST(1), so ordered tests load the
        // right operand first.
        let (jump, first, second) = match op {
            QuadOp::Req => ("je", left, right),
            QuadOp::Rne => ("jne", left, right),
            QuadOp::Rlt => ("jb", right, left),
            QuadOp::Rgt => ("ja", right, left),
            _ => return Err(Self::not_a_comparison(op)),
        };
        let target = self.symtab.next_label();
        self.fetch_float(first)?;
        self.fetch_float(second)?;
        self.emit("fcomip", "ST(0), ST(1)");
        self.emit("fstp", "ST(0)");
        self.emit_jump(jump, target);
        self.select(target, 1, 0, dest)
    }

    fn logical_binary(
        &mut self,
        op: QuadOp,
        left: SymIndex,
        right: SymIndex,
        dest: SymIndex,
    ) -> Result<(), InternalError> {
        let (jump, taken, fallthrough) = match op {
            QuadOp::Ior => ("jne", 1, 0),
            QuadOp::Iand => ("je", 0, 1),
            _ => return Err(Self::not_a_comparison(op)),
        };
        let target = self.symtab.next_label();
        self.fetch(left, Register::Rax)?;
        self.fetch(right, Register::Rcx)?;
        self.emit("cmp", "rax, 0");
        self.emit_jump(jump, target);
        self.emit("cmp", "rcx, 0");
        self.emit_jump(jump, target);
        self.select(target, taken, fallthrough, dest)
    }

    fn logical_not(&mut self, src: SymIndex, dest: SymIndex) -> Result<(), InternalError> {
        let target = self.symtab.next_label();
        self.fetch(src, Register::Rax)?;
        self.emit("cmp", "rax, 0");
        self.emit_jump("je", target);
        self.select(target, 1, 0, dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;
    use crate::symtab::SymbolTable;
    use pretty_assertions::assert_eq;

    fn setup() -> (SymbolTable, [SymIndex; 3]) {
        let mut symtab = SymbolTable::new();
        symtab.enter_procedure("P", Span::new(0, 1)).unwrap();
        symtab.open_scope().unwrap();
        let integer = symtab.integer_type();
        let vars = ["A", "B", "C"].map(|name| {
            symtab
                .enter_variable(name, Span::new(0, 1), integer)
                .unwrap()
                .unwrap()
        });
        (symtab, vars)
    }

    fn lines(asm: &str) -> Vec<String> {
        asm.lines().map(|line| line.trim().to_string()).collect()
    }

    #[test]
    fn test_integer_less_than_idiom() {
        let (mut symtab, [a, b, c]) = setup();
        let target = symtab.next_label() + 1;
        let join = target + 1;
        let mut generator = CodeGenerator::new(&mut symtab, false);
        generator.integer_compare(QuadOp::Ilt, a, b, c).unwrap();
        assert_eq!(
            lines(&generator.finish()),
            vec![
                "mov\trcx, [rbp-8]".to_string(),
                "mov\trax, [rcx-16]".to_string(),
                "mov\trcx, [rbp-8]".to_string(),
                "mov\trcx, [rcx-24]".to_string(),
                "cmp\trax, rcx".to_string(),
                format!("jl\tL{}", target),
                "mov\trax, 0".to_string(),
                format!("jmp\tL{}", join),
                format!("L{}:", target),
                "mov\trax, 1".to_string(),
                format!("L{}:", join),
                "mov\trcx, [rbp-8]".to_string(),
                "mov\t[rcx-32], rax".to_string(),
            ]
        );
    }

    #[test]
    fn test_real_less_than_loads_right_first() {
        let (mut symtab, [a, b, c]) = setup();
        let mut generator = CodeGenerator::new(&mut symtab, false);
        generator.real_compare(QuadOp::Rlt, a, b, c).unwrap();
        let asm = lines(&generator.finish());
        assert_eq!(asm[1], "fld\tqword ptr [rcx-24]");
        assert_eq!(asm[3], "fld\tqword ptr [rcx-16]");
        assert_eq!(asm[4], "fcomip\tST(0), ST(1)");
        assert_eq!(asm[5], "fstp\tST(0)");
        assert!(asm[6].starts_with("jb\tL"));
    }

    #[test]
    fn test_and_takes_zero_on_either_false_operand() {
        let (mut symtab, [a, b, c]) = setup();
        let mut generator = CodeGenerator::new(&mut symtab, false);
        generator.logical_binary(QuadOp::Iand, a, b, c).unwrap();
        let asm = lines(&generator.finish());
        assert_eq!(asm.iter().filter(|line| line.starts_with("je\t")).count(), 2);
        assert!(asm.contains(&"mov\trax, 1".to_string()));
        let taken = asm.iter().position(|line| line.ends_with(':')).unwrap();
        assert_eq!(asm[taken + 1], "mov\trax, 0");
    }

    #[test]
    fn test_not_idiom() {
        let (mut symtab, [a, _, c]) = setup();
        let mut generator = CodeGenerator::new(&mut symtab, false);
        generator.logical_not(a, c).unwrap();
        let asm = lines(&generator.finish());
        assert_eq!(asm[2], "cmp\trax, 0");
        assert!(asm[3].starts_with("je\tL"));
        assert_eq!(asm[4], "mov\trax, 0");
        assert_eq!(asm[7], "mov\trax, 1");
    }

    #[test]
    fn test_idiom_labels_are_fresh() {
        let (mut symtab, [a, b, c]) = setup();
        let mut generator = CodeGenerator::new(&mut symtab, false);
        generator.integer_compare(QuadOp::Ieq, a, b, c).unwrap();
        generator.integer_compare(QuadOp::Ieq, a, b, c).unwrap();
        let asm = lines(&generator.finish());
        let labels: Vec<&String> = asm.iter().filter(|line| line.ends_with(':')).collect();
        assert_eq!(labels.len(), 4);
        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }
}
