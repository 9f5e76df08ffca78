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

//! Arithmetic, conversion, assignment and array access.
//!
//! Integer operands meet in `rax` (left) and `rcx` (right). Real operands
//! are pushed onto the x87 stack left first and combined with the popping
//! form of the instruction.

use super::emit::{EmitHelpers, Register};
use super::frame::FrameAccess;
use super::CodeGenerator;
use crate::error::InternalError;
use crate::quads::QuadOp;
use crate::symtab::{SymIndex, STACK_WIDTH};

/// Extension trait for arithmetic code generation.
pub trait ArithmeticEmitter {
    /// `iload`/`rload`: move an immediate into `dest`.
    fn load_immediate(&mut self, value: i64, dest: SymIndex) -> Result<(), InternalError>;

    /// `iplus iminus imult idivide imod`.
    fn integer_binary(
        &mut self,
        op: QuadOp,
        left: SymIndex,
        right: SymIndex,
        dest: SymIndex,
    ) -> Result<(), InternalError>;

    /// `rplus rminus rmult rdivide`.
    fn real_binary(
        &mut self,
        op: QuadOp,
        left: SymIndex,
        right: SymIndex,
        dest: SymIndex,
    ) -> Result<(), InternalError>;

    /// `iuminus`.
    fn integer_negate(&mut self, src: SymIndex, dest: SymIndex) -> Result<(), InternalError>;

    /// `ruminus`.
    fn real_negate(&mut self, src: SymIndex, dest: SymIndex) -> Result<(), InternalError>;

    /// `itor`: convert through a stack slot with `fild`.
    fn integer_to_real(&mut self, src: SymIndex, dest: SymIndex) -> Result<(), InternalError>;

    /// `iassign`/`rassign`. Reals are copied bitwise.
    fn assign(&mut self, src: SymIndex, dest: SymIndex) -> Result<(), InternalError>;

    /// `istore`/`rstore`: write `value` through the address held in `address`.
    fn store_indirect(&mut self, value: SymIndex, address: SymIndex) -> Result<(), InternalError>;

    /// `lindex`: compute the address of `array[index]` into `dest`.
    fn element_address(
        &mut self,
        array: SymIndex,
        index: SymIndex,
        dest: SymIndex,
    ) -> Result<(), InternalError>;

    /// `irindex`/`rrindex`: load `array[index]` into `dest`.
    fn element_load(
        &mut self,
        array: SymIndex,
        index: SymIndex,
        dest: SymIndex,
    ) -> Result<(), InternalError>;
}

impl CodeGenerator<'_> {
    /// Leave the address of `array[index]` in `rax`.
    fn index_into(&mut self, array: SymIndex, index: SymIndex) -> Result<(), InternalError> {
        self.array_address(array, Register::Rax)?;
        self.fetch(index, Register::Rcx)?;
        self.emit("imul", &format!("rcx, {}", STACK_WIDTH));
        self.emit("sub", "rax, rcx");
        Ok(())
    }
}

impl ArithmeticEmitter for CodeGenerator<'_> {
    fn load_immediate(&mut self, value: i64, dest: SymIndex) -> Result<(), InternalError> {
        self.emit("mov", &format!("rax, {}", value));
        self.store(Register::Rax, dest)
    }

    fn integer_binary(
        &mut self,
        op: QuadOp,
        left: SymIndex,
        right: SymIndex,
        dest: SymIndex,
    ) -> Result<(), InternalError> {
        self.fetch(left, Register::Rax)?;
        self.fetch(right, Register::Rcx)?;
        let result = match op {
            QuadOp::Iplus => {
                self.emit("add", "rax, rcx");
                Register::Rax
            }
            QuadOp::Iminus => {
                self.emit("sub", "rax, rcx");
                Register::Rax
            }
            QuadOp::Imult => {
                self.emit("imul", "rax, rcx");
                Register::Rax
            }
            QuadOp::Idivide | QuadOp::Imod => {
                self.emit_bare("cqo");
                self.emit("idiv", "rcx");
                if op == QuadOp::Imod {
                    Register::Rdx
                } else {
                    Register::Rax
                }
            }
            _ => {
                return Err(InternalError::BadOperand {
                    quad: 0,
                    op: op.as_str(),
                    slot: 0,
                    expected: "an integer arithmetic opcode",
                })
            }
        };
        self.store(result, dest)
    }

    fn real_binary(
        &mut self,
        op: QuadOp,
        left: SymIndex,
        right: SymIndex,
        dest: SymIndex,
    ) -> Result<(), InternalError> {
        let mnemonic = match op {
            QuadOp::Rplus => "faddp",
            QuadOp::Rminus => "fsubp",
            QuadOp::Rmult => "fmulp",
            QuadOp::Rdivide => "fdivp",
            _ => {
                return Err(InternalError::BadOperand {
                    quad: 0,
                    op: op.as_str(),
                    slot: 0,
                    expected: "a real arithmetic opcode",
                })
            }
        };
        self.fetch_float(left)?;
        self.fetch_float(right)?;
        self.emit_bare(mnemonic);
        self.store_float(dest)
    }

    fn integer_negate(&mut self, src: SymIndex, dest: SymIndex) -> Result<(), InternalError> {
        self.fetch(src, Register::Rax)?;
        self.emit("neg", "rax");
        self.store(Register::Rax, dest)
    }

    fn real_negate(&mut self, src: SymIndex, dest: SymIndex) -> Result<(), InternalError> {
        self.fetch_float(src)?;
        self.emit_bare("fchs");
        self.store_float(dest)
    }

    fn integer_to_real(&mut self, src: SymIndex, dest: SymIndex) -> Result<(), InternalError> {
        self.fetch(src, Register::Rax)?;
        self.emit("push", "rax");
        self.emit("fild", "qword ptr [rsp]");
        self.emit("add", &format!("rsp, {}", STACK_WIDTH));
        self.store_float(dest)
    }

    fn assign(&mut self, src: SymIndex, dest: SymIndex) -> Result<(), InternalError> {
        self.fetch(src, Register::Rax)?;
        self.store(Register::Rax, dest)
    }

    fn store_indirect(&mut self, value: SymIndex, address: SymIndex) -> Result<(), InternalError> {
        self.fetch(value, Register::Rax)?;
        self.fetch(address, Register::Rcx)?;
        self.emit("mov", "[rcx], rax");
        Ok(())
    }

    fn element_address(
        &mut self,
        array: SymIndex,
        index: SymIndex,
        dest: SymIndex,
    ) -> Result<(), InternalError> {
        self.index_into(array, index)?;
        self.store(Register::Rax, dest)
    }

    fn element_load(
        &mut self,
        array: SymIndex,
        index: SymIndex,
        dest: SymIndex,
    ) -> Result<(), InternalError> {
        self.index_into(array, index)?;
        self.emit("mov", "rax, [rax]");
        self.store(Register::Rax, dest)
    }
}
