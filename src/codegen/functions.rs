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

//! Parameters, calls and returns.
//!
//! Arguments are pushed last formal first, so the first formal lands
//! right above the return address at `[rbp+16]` in the callee. Results of
//! both domains travel back in `rax`; reals as their bit pattern.

use super::emit::{EmitHelpers, Register};
use super::frame::FrameAccess;
use super::CodeGenerator;
use crate::error::InternalError;
use crate::symtab::{LabelId, SymIndex, STACK_WIDTH};

/// Extension trait for call code generation.
pub trait CallEmitter {
    /// `param`: push one argument.
    fn param(&mut self, argument: SymIndex) -> Result<(), InternalError>;

    /// `call`: transfer control, collect a function result, pop arguments.
    fn call(
        &mut self,
        callee: SymIndex,
        arguments: i64,
        dest: Option<SymIndex>,
    ) -> Result<(), InternalError>;

    /// `ireturn`/`rreturn`: load the result and leave through `exit`.
    fn return_value(&mut self, exit: LabelId, value: SymIndex) -> Result<(), InternalError>;
}

impl CallEmitter for CodeGenerator<'_> {
    fn param(&mut self, argument: SymIndex) -> Result<(), InternalError> {
        self.fetch(argument, Register::Rax)?;
        self.emit("push", "rax");
        Ok(())
    }

    fn call(
        &mut self,
        callee: SymIndex,
        arguments: i64,
        dest: Option<SymIndex>,
    ) -> Result<(), InternalError> {
        let label = self.symtab.routine(callee)?.label;
        self.emit_jump("call", label);
        if let Some(dest) = dest {
            self.store(Register::Rax, dest)?;
        }
        if arguments > 0 {
            self.emit("add", &format!("rsp, {}", arguments * STACK_WIDTH as i64));
        }
        Ok(())
    }

    fn return_value(&mut self, exit: LabelId, value: SymIndex) -> Result<(), InternalError> {
        self.fetch(value, Register::Rax)?;
        self.emit_jump("jmp", exit);
        Ok(())
    }
}
