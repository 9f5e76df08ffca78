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

//! Activation records, the display and operand access.
//!
//! Every routine keeps a display of enclosing frame pointers right below
//! its saved `rbp`; the frame pointer of lexical level `n` sits at
//! `[rbp-8*n]`. Non-local access loads that slot into `rcx` and addresses
//! relative to it.

use super::emit::{frame_slot, EmitHelpers, Register};
use super::CodeGenerator;
use crate::error::InternalError;
use crate::symtab::{ConstantValue, SymIndex, SymbolKind, SymbolTable, STACK_WIDTH};

/// Round a frame size up to the stack width.
pub fn align(size: usize) -> usize {
    size.div_ceil(STACK_WIDTH) * STACK_WIDTH
}

/// Extension trait for frame setup and operand access.
pub trait FrameAccess {
    /// Emit the routine label, save `rbp`, build the display and reserve
    /// the activation record.
    fn prologue(&mut self, routine: SymIndex) -> Result<(), InternalError>;

    /// Emit `leave` and `ret`.
    fn epilogue(&mut self, routine: SymIndex);

    /// Load the frame pointer of lexical `level` into `dest`.
    fn frame_address(&mut self, level: usize, dest: Register);

    /// Load the frame of a variable or parameter into `rcx` and return the
    /// memory operand that addresses it.
    fn locate(&mut self, symbol: SymIndex) -> Result<String, InternalError>;

    /// Load an integer value, or a real's bit pattern, into `dest`.
    fn fetch(&mut self, symbol: SymIndex, dest: Register) -> Result<(), InternalError>;

    /// Store `src` into a variable or parameter.
    fn store(&mut self, src: Register, symbol: SymIndex) -> Result<(), InternalError>;

    /// Push a real value onto the x87 stack.
    fn fetch_float(&mut self, symbol: SymIndex) -> Result<(), InternalError>;

    /// Pop the x87 stack top into a variable or parameter.
    fn store_float(&mut self, symbol: SymIndex) -> Result<(), InternalError>;

    /// Load the address of an array's first element into `dest`.
    fn array_address(&mut self, array: SymIndex, dest: Register) -> Result<(), InternalError>;
}

impl FrameAccess for CodeGenerator<'_> {
    fn prologue(&mut self, routine: SymIndex) -> Result<(), InternalError> {
        let (level, ar_size, label) = {
            let symbol = self.symtab.symbol(routine)?;
            let data = self.symtab.routine(routine)?;
            (symbol.level, data.ar_size, data.label)
        };
        let name = self.symtab.name_of(routine).to_string();

        self.emit_routine_label(label, &name);
        self.emit_trace(&format!("PROLOGUE ({})", name));
        self.emit("push", "rbp");
        self.emit("mov", "rcx, rsp");
        for i in 1..=level {
            self.emit("push", &format!("qword ptr [rbp-{}]", i * STACK_WIDTH));
        }
        self.emit("push", "rcx");
        self.emit("mov", "rbp, rcx");
        self.emit("sub", &format!("rsp, {}", align(ar_size)));
        Ok(())
    }

    fn epilogue(&mut self, routine: SymIndex) {
        let name = self.symtab.name_of(routine).to_string();
        self.emit_trace(&format!("EPILOGUE ({})", name));
        self.emit_bare("leave");
        self.emit_bare("ret");
    }

    fn frame_address(&mut self, level: usize, dest: Register) {
        self.emit("mov", &format!("{}, [rbp-{}]", dest, level * STACK_WIDTH));
    }

    fn locate(&mut self, symbol: SymIndex) -> Result<String, InternalError> {
        let (level, offset) = self.symtab.frame_offset_of(symbol)?;
        self.frame_address(level, Register::Rcx);
        Ok(frame_slot(offset))
    }

    fn fetch(&mut self, symbol: SymIndex, dest: Register) -> Result<(), InternalError> {
        match &self.symtab.symbol(symbol)?.kind {
            SymbolKind::Constant(ConstantValue::Integer(value)) => {
                let value = *value;
                self.emit("mov", &format!("{}, {}", dest, value));
            }
            SymbolKind::Constant(ConstantValue::Real(value)) => {
                let bits = SymbolTable::ieee(*value);
                self.emit("mov", &format!("{}, {}", dest, bits));
            }
            SymbolKind::Variable | SymbolKind::Parameter { .. } => {
                let slot = self.locate(symbol)?;
                self.emit("mov", &format!("{}, {}", dest, slot));
            }
            _ => return Err(self.symtab.illegal_kind(symbol, "constant, variable or parameter")),
        }
        Ok(())
    }

    fn store(&mut self, src: Register, symbol: SymIndex) -> Result<(), InternalError> {
        match self.symtab.symbol(symbol)?.kind {
            SymbolKind::Variable | SymbolKind::Parameter { .. } => {
                let slot = self.locate(symbol)?;
                self.emit("mov", &format!("{}, {}", slot, src));
                Ok(())
            }
            _ => Err(self.symtab.illegal_kind(symbol, "variable or parameter")),
        }
    }

    fn fetch_float(&mut self, symbol: SymIndex) -> Result<(), InternalError> {
        match &self.symtab.symbol(symbol)?.kind {
            SymbolKind::Constant(ConstantValue::Real(value)) => {
                let bits = SymbolTable::ieee(*value);
                self.emit("mov", &format!("rax, {}", bits));
                self.emit("push", "rax");
                self.emit("fld", "qword ptr [rsp]");
                self.emit("add", &format!("rsp, {}", STACK_WIDTH));
            }
            SymbolKind::Variable | SymbolKind::Parameter { .. } => {
                let slot = self.locate(symbol)?;
                self.emit("fld", &format!("qword ptr {}", slot));
            }
            _ => return Err(self.symtab.illegal_kind(symbol, "real constant, variable or parameter")),
        }
        Ok(())
    }

    fn store_float(&mut self, symbol: SymIndex) -> Result<(), InternalError> {
        match self.symtab.symbol(symbol)?.kind {
            SymbolKind::Variable | SymbolKind::Parameter { .. } => {
                let slot = self.locate(symbol)?;
                self.emit("fstp", &format!("qword ptr {}", slot));
                Ok(())
            }
            _ => Err(self.symtab.illegal_kind(symbol, "variable or parameter")),
        }
    }

    fn array_address(&mut self, array: SymIndex, dest: Register) -> Result<(), InternalError> {
        if !matches!(self.symtab.symbol(array)?.kind, SymbolKind::Array { .. }) {
            return Err(self.symtab.illegal_kind(array, "array"));
        }
        let (level, offset) = self.symtab.frame_offset_of(array)?;
        self.frame_address(level, dest);
        self.emit("sub", &format!("{}, {}", dest, offset.unsigned_abs()));
        Ok(())
    }
}
