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

//! Activation record layout.
//!
//! After the prologue a routine at body level `L` sees its frame pointer
//! `rbp` pointing at the saved caller frame pointer. Above it are the
//! return address and the arguments; below it are the display slots for
//! levels `1..=L` (slot `L` holds `rbp` itself), then locals and
//! temporaries:
//!
//! ```text
//!   [rbp+16+8k]        argument k (k = 0 is the first formal)
//!   [rbp+8]            return address
//!   [rbp]              caller's rbp
//!   [rbp-8*l]          frame pointer of level l, 1 <= l <= L
//!   [rbp-8*(L+1)-o]    local at activation record offset o
//! ```

use super::{SymIndex, SymbolKind, SymbolTable, STACK_WIDTH};
use crate::error::InternalError;

impl SymbolTable {
    /// Resolve a variable, array, temporary or parameter to the level whose
    /// frame holds it and the signed byte offset from that frame pointer.
    ///
    /// Locals resolve negative, parameters positive.
    pub fn frame_offset_of(&self, index: SymIndex) -> Result<(usize, i64), InternalError> {
        let symbol = self.symbol(index)?;
        let level = symbol.level;
        match symbol.kind {
            SymbolKind::Variable | SymbolKind::Array { .. } => symbol
                .offset
                .checked_add(STACK_WIDTH * (1 + level))
                .and_then(|offset| i32::try_from(offset).ok())
                .map(|offset| (level, -i64::from(offset)))
                .ok_or_else(|| InternalError::FrameTooLarge {
                    routine: self
                        .environment_at(level)
                        .map_or_else(|| self.name_of(index), |env| self.name_of(env))
                        .to_string(),
                    limit: i32::MAX as usize,
                }),
            SymbolKind::Parameter { .. } => {
                let environment = self
                    .environment_at(level)
                    .ok_or_else(|| InternalError::ParameterNotFound(self.name_of(index).into()))?;
                let mut offset = 2 * STACK_WIDTH;
                for &formal in &self.routine(environment)?.parameters {
                    if formal == index {
                        return Ok((level, offset as i64));
                    }
                    offset += match self.symbol(formal)?.kind {
                        SymbolKind::Parameter { size, .. } => size,
                        _ => return Err(self.illegal_kind(formal, "parameter")),
                    };
                }
                Err(InternalError::ParameterNotFound(self.name_of(index).into()))
            }
            _ => Err(self.illegal_kind(index, "variable, array or parameter")),
        }
    }
}
