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

//! Emit helper methods for code generation.
//!
//! This module provides low-level text emission utilities for generating
//! Intel-syntax x86-64 assembly. It includes:
//! - Instruction and label lines
//! - Trace comments
//! - Jumps to numbered labels

use std::fmt;
use std::fmt::Write as _;

use super::CodeGenerator;
use crate::symtab::LabelId;

/// Scratch registers used by the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Rax,
    Rcx,
    Rdx,
}

impl Register {
    /// The register's assembler name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Register::Rax => "rax",
            Register::Rcx => "rcx",
            Register::Rdx => "rdx",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Format a frame-relative memory operand off `rcx`.
pub fn frame_slot(offset: i64) -> String {
    if offset < 0 {
        format!("[rcx-{}]", offset.unsigned_abs())
    } else {
        format!("[rcx+{}]", offset)
    }
}

/// Extension trait for assembly text emission.
pub trait EmitHelpers {
    /// Emit an instruction with operands, e.g. `mov rax, rcx`.
    fn emit(&mut self, mnemonic: &str, operands: &str);

    /// Emit an instruction without operands, e.g. `leave`.
    fn emit_bare(&mut self, mnemonic: &str);

    /// Emit `L<n>:`.
    fn emit_label(&mut self, label: LabelId);

    /// Emit a routine's entry label, commented with its name.
    fn emit_routine_label(&mut self, label: LabelId, name: &str);

    /// Emit a jump-family instruction to `L<n>`.
    fn emit_jump(&mut self, mnemonic: &str, label: LabelId);

    /// Emit a comment line when tracing.
    fn emit_trace(&mut self, text: &str);
}

impl EmitHelpers for CodeGenerator<'_> {
    fn emit(&mut self, mnemonic: &str, operands: &str) {
        let _ = writeln!(self.output, "\t\t{}\t{}", mnemonic, operands);
    }

    fn emit_bare(&mut self, mnemonic: &str) {
        let _ = writeln!(self.output, "\t\t{}", mnemonic);
    }

    fn emit_label(&mut self, label: LabelId) {
        let _ = writeln!(self.output, "L{}:", label);
    }

    fn emit_routine_label(&mut self, label: LabelId, name: &str) {
        let _ = writeln!(self.output, "L{}:\t\t\t# {}", label, name);
    }

    fn emit_jump(&mut self, mnemonic: &str, label: LabelId) {
        self.emit(mnemonic, &format!("L{}", label));
    }

    fn emit_trace(&mut self, text: &str) {
        if self.trace {
            let _ = writeln!(self.output, "\t# {}", text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symtab::SymbolTable;

    #[test]
    fn test_frame_slot_sign() {
        assert_eq!(frame_slot(-24), "[rcx-24]");
        assert_eq!(frame_slot(16), "[rcx+16]");
    }

    #[test]
    fn test_emitted_lines() {
        let mut symtab = SymbolTable::new();
        let mut generator = CodeGenerator::new(&mut symtab, false);
        generator.emit("mov", "rax, 1");
        generator.emit_bare("leave");
        generator.emit_label(4);
        generator.emit_jump("jmp", 4);
        generator.emit_trace("hidden");
        generator.emit_routine_label(2, "FIB");
        assert_eq!(
            generator.finish(),
            "\t\tmov\trax, 1\n\t\tleave\nL4:\n\t\tjmp\tL4\nL2:\t\t\t# FIB\n"
        );
    }

    #[test]
    fn test_trace_comments() {
        let mut symtab = SymbolTable::new();
        let mut generator = CodeGenerator::new(&mut symtab, true);
        generator.emit_trace("QUAD 1: q_nop");
        assert_eq!(generator.finish(), "\t# QUAD 1: q_nop\n");
    }
}
