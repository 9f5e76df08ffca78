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

//! Code generation module for the Diesel compiler.
//!
//! This module expands a routine's quadruples into Intel-syntax x86-64
//! assembly. It handles:
//! - Activation records and the display of enclosing frames
//! - Integer arithmetic in `rax`/`rcx`/`rdx`
//! - Real arithmetic on the x87 stack
//! - Comparisons and logical operators
//! - Calls, parameters and returns
//!
//! # Module Structure
//!
//! - `emit` - Text emission helpers (EmitHelpers trait)
//! - `frame` - Prologue, epilogue and operand access (FrameAccess trait)
//! - `arithmetic` - Arithmetic, conversion and array access (ArithmeticEmitter trait)
//! - `comparisons` - Relational and logical operators (ComparisonEmitter trait)
//! - `functions` - Parameters, calls and returns (CallEmitter trait)

pub mod arithmetic;
pub mod comparisons;
pub mod emit;
pub mod frame;
pub mod functions;

pub use emit::Register;

use arithmetic::ArithmeticEmitter;
use comparisons::ComparisonEmitter;
use emit::EmitHelpers;
use frame::FrameAccess;
use functions::CallEmitter;

use crate::error::InternalError;
use crate::quads::{Operand, QuadList, QuadOp, Quadruple};
use crate::symtab::{LabelId, SymIndex, SymbolTable};

/// Lines opening every assembly file.
pub const ASSEMBLY_HEADER: &str = "\t\t.intel_syntax noprefix\n\t\t.text\n";

/// The x86-64 code generator.
///
/// Output accumulates across routines; the symbol table is borrowed
/// mutably because the comparison idiom draws fresh labels.
pub struct CodeGenerator<'a> {
    pub(crate) symtab: &'a mut SymbolTable,
    pub(crate) output: String,
    pub(crate) trace: bool,
}

impl<'a> CodeGenerator<'a> {
    /// Create a generator. With `trace` set, quads, prologues and
    /// epilogues are echoed as comments.
    pub fn new(symtab: &'a mut SymbolTable, trace: bool) -> Self {
        Self {
            symtab,
            output: String::new(),
            trace,
        }
    }

    /// Expand one routine: prologue, body quads, epilogue.
    pub fn generate_routine(
        &mut self,
        routine: SymIndex,
        quads: &QuadList,
    ) -> Result<(), InternalError> {
        self.prologue(routine)?;
        self.expand(quads)?;
        self.epilogue(routine);
        Ok(())
    }

    /// Expand a quad list without prologue or epilogue.
    pub fn expand(&mut self, quads: &QuadList) -> Result<(), InternalError> {
        for (number, quad) in quads.iter().enumerate() {
            if self.trace {
                let row = quad.named(self.symtab).to_string();
                self.emit_trace(&format!("QUAD {}: {}", number + 1, row.trim_end()));
            }
            self.expand_quad(number + 1, quad)?;
        }
        Ok(())
    }

    /// The assembly produced so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Consume the generator and return its assembly.
    pub fn finish(self) -> String {
        self.output
    }

    fn expand_quad(&mut self, number: usize, quad: &Quadruple) -> Result<(), InternalError> {
        let ops = QuadOperands { number, quad };
        match quad.op {
            QuadOp::Iload | QuadOp::Rload => {
                self.load_immediate(ops.int(0)?, ops.sym(2)?)
            }
            QuadOp::Iplus | QuadOp::Iminus | QuadOp::Imult | QuadOp::Idivide | QuadOp::Imod => {
                self.integer_binary(quad.op, ops.sym(0)?, ops.sym(1)?, ops.sym(2)?)
            }
            QuadOp::Rplus | QuadOp::Rminus | QuadOp::Rmult | QuadOp::Rdivide => {
                self.real_binary(quad.op, ops.sym(0)?, ops.sym(1)?, ops.sym(2)?)
            }
            QuadOp::Iuminus => self.integer_negate(ops.sym(0)?, ops.sym(2)?),
            QuadOp::Ruminus => self.real_negate(ops.sym(0)?, ops.sym(2)?),
            QuadOp::Itor => self.integer_to_real(ops.sym(0)?, ops.sym(2)?),
            QuadOp::Iassign | QuadOp::Rassign => self.assign(ops.sym(0)?, ops.sym(2)?),
            QuadOp::Istore | QuadOp::Rstore => self.store_indirect(ops.sym(0)?, ops.sym(2)?),
            QuadOp::Lindex => self.element_address(ops.sym(0)?, ops.sym(1)?, ops.sym(2)?),
            QuadOp::Irindex | QuadOp::Rrindex => {
                self.element_load(ops.sym(0)?, ops.sym(1)?, ops.sym(2)?)
            }
            QuadOp::Ieq | QuadOp::Ine | QuadOp::Ilt | QuadOp::Igt => {
                self.integer_compare(quad.op, ops.sym(0)?, ops.sym(1)?, ops.sym(2)?)
            }
            QuadOp::Req | QuadOp::Rne | QuadOp::Rlt | QuadOp::Rgt => {
                self.real_compare(quad.op, ops.sym(0)?, ops.sym(1)?, ops.sym(2)?)
            }
            QuadOp::Iand | QuadOp::Ior => {
                self.logical_binary(quad.op, ops.sym(0)?, ops.sym(1)?, ops.sym(2)?)
            }
            QuadOp::Inot => self.logical_not(ops.sym(0)?, ops.sym(2)?),
            QuadOp::Param => self.param(ops.sym(0)?),
            QuadOp::Call => self.call(ops.sym(0)?, ops.int(1)?, quad.c.sym()),
            QuadOp::Ireturn | QuadOp::Rreturn => self.return_value(ops.label(0)?, ops.sym(1)?),
            QuadOp::Jmp => {
                self.emit_jump("jmp", ops.label(0)?);
                Ok(())
            }
            QuadOp::Jmpf => {
                let label = ops.label(0)?;
                self.fetch(ops.sym(1)?, Register::Rax)?;
                self.emit("cmp", "rax, 0");
                self.emit_jump("je", label);
                Ok(())
            }
            QuadOp::Labl => {
                self.emit_label(ops.label(0)?);
                Ok(())
            }
            QuadOp::Nop => Err(InternalError::NopQuad(number)),
        }
    }
}

/// Typed access to a quadruple's operand slots.
struct QuadOperands<'q> {
    number: usize,
    quad: &'q Quadruple,
}

impl QuadOperands<'_> {
    fn slot(&self, slot: usize) -> &Operand {
        match slot {
            0 => &self.quad.a,
            1 => &self.quad.b,
            _ => &self.quad.c,
        }
    }

    fn bad(&self, slot: usize, expected: &'static str) -> InternalError {
        InternalError::BadOperand {
            quad: self.number,
            op: self.quad.op.as_str(),
            slot,
            expected,
        }
    }

    fn sym(&self, slot: usize) -> Result<SymIndex, InternalError> {
        self.slot(slot).sym().ok_or_else(|| self.bad(slot, "a symbol"))
    }

    fn int(&self, slot: usize) -> Result<i64, InternalError> {
        self.slot(slot).int().ok_or_else(|| self.bad(slot, "an integer"))
    }

    fn label(&self, slot: usize) -> Result<LabelId, InternalError> {
        self.slot(slot).label().ok_or_else(|| self.bad(slot, "a label"))
    }
}

/// Expand the quads of one routine into a fresh string.
pub fn generate_assembler(
    symtab: &mut SymbolTable,
    routine: SymIndex,
    quads: &QuadList,
    trace: bool,
) -> Result<String, InternalError> {
    let mut generator = CodeGenerator::new(symtab, trace);
    generator.generate_routine(routine, quads)?;
    Ok(generator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Span;
    use pretty_assertions::assert_eq;

    fn span() -> Span {
        Span::new(0, 1)
    }

    // ========================================
    // Routine Expansion Tests
    // ========================================

    #[test]
    fn test_empty_program_routine() {
        let mut symtab = SymbolTable::new();
        let main = symtab.enter_procedure("MAIN", span()).unwrap();
        symtab.open_scope().unwrap();
        let label = symtab.routine(main).unwrap().label;
        let mut quads = QuadList::new(symtab.next_label());
        quads.push(Quadruple::label(quads.exit_label()));
        let exit = quads.exit_label();

        let asm = generate_assembler(&mut symtab, main, &quads, false).unwrap();
        assert_eq!(
            asm,
            format!(
                "L{label}:\t\t\t# MAIN\n\
                 \t\tpush\trbp\n\
                 \t\tmov\trcx, rsp\n\
                 \t\tpush\trcx\n\
                 \t\tmov\trbp, rcx\n\
                 \t\tsub\trsp, 0\n\
                 L{exit}:\n\
                 \t\tleave\n\
                 \t\tret\n"
            )
        );
    }

    #[test]
    fn test_trace_adds_comments_only() {
        let mut symtab = SymbolTable::new();
        let main = symtab.enter_procedure("MAIN", span()).unwrap();
        symtab.open_scope().unwrap();
        let mut quads = QuadList::new(symtab.next_label());
        quads.push(Quadruple::label(quads.exit_label()));

        let plain = generate_assembler(&mut symtab, main, &quads, false).unwrap();
        let traced = generate_assembler(&mut symtab, main, &quads, true).unwrap();
        assert!(traced.contains("\t# PROLOGUE (MAIN)\n"));
        assert!(traced.contains("\t# QUAD 1: q_labl"));
        assert!(traced.contains("\t# EPILOGUE (MAIN)\n"));
        let stripped: String = traced
            .lines()
            .filter(|line| !line.starts_with("\t#"))
            .map(|line| format!("{}\n", line))
            .collect();
        assert_eq!(stripped, plain);
    }

    #[test]
    fn test_nop_is_fatal() {
        let mut symtab = SymbolTable::new();
        let mut quads = QuadList::new(0);
        quads.push(Quadruple::new(
            QuadOp::Nop,
            Operand::None,
            Operand::None,
            Operand::None,
        ));
        let mut generator = CodeGenerator::new(&mut symtab, false);
        assert_eq!(generator.expand(&quads), Err(InternalError::NopQuad(1)));
    }

    #[test]
    fn test_wrong_operand_is_fatal() {
        let mut symtab = SymbolTable::new();
        let mut quads = QuadList::new(0);
        quads.push(Quadruple::new(
            QuadOp::Jmp,
            Operand::Int(3),
            Operand::None,
            Operand::None,
        ));
        let mut generator = CodeGenerator::new(&mut symtab, false);
        assert!(matches!(
            generator.expand(&quads),
            Err(InternalError::BadOperand { quad: 1, slot: 0, .. })
        ));
    }

    #[test]
    fn test_conditional_jump() {
        let mut symtab = SymbolTable::new();
        symtab.enter_procedure("P", span()).unwrap();
        symtab.open_scope().unwrap();
        let integer = symtab.integer_type();
        let x = symtab.enter_variable("X", span(), integer).unwrap().unwrap();
        let mut quads = QuadList::new(0);
        quads.push(Quadruple::jump_false(5, x));
        let mut generator = CodeGenerator::new(&mut symtab, false);
        generator.expand(&quads).unwrap();
        assert_eq!(
            generator.finish(),
            "\t\tmov\trcx, [rbp-8]\n\t\tmov\trax, [rcx-16]\n\t\tcmp\trax, 0\n\t\tje\tL5\n"
        );
    }
}
