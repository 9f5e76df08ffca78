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

//! Scope management.
//!
//! Each open lexical level has one mark: the routine symbol that opened it.
//! Closing a level unlinks every symbol declared at that level from its
//! hash chain. The entries stay in the table so later passes and listings
//! can still reach them by index.

use super::{SymIndex, SymbolTable, MAX_BLOCK};
use crate::error::InternalError;

impl SymbolTable {
    /// The current lexical level; 0 is global.
    pub fn level(&self) -> usize {
        self.blocks.len().saturating_sub(1)
    }

    /// Open a new level owned by the most recently installed symbol.
    pub fn open_scope(&mut self) -> Result<(), InternalError> {
        if self.blocks.len() >= MAX_BLOCK {
            return Err(InternalError::ScopeOverflow(MAX_BLOCK));
        }
        let owner = SymIndex(self.symbols.len().saturating_sub(1));
        self.blocks.push(owner);
        Ok(())
    }

    /// Close the current level and return the environment that is current
    /// afterwards.
    pub fn close_scope(&mut self) -> Result<SymIndex, InternalError> {
        if self.blocks.len() <= 1 {
            return Err(InternalError::ScopeUnderflow);
        }
        let level = self.level();
        let mark = self.current_environment();

        for i in (mark.0 + 1..self.symbols.len()).rev() {
            let symbol = &self.symbols[i];
            if symbol.level != level {
                continue;
            }
            let bucket = Self::hash(self.pool.lookup(symbol.id));
            self.hash_table[bucket] = symbol.hash_link;
        }

        self.blocks.pop();
        Ok(self.current_environment())
    }

    /// The routine owning the current level.
    pub fn current_environment(&self) -> SymIndex {
        self.blocks.last().copied().unwrap_or(SymIndex(0))
    }

    /// The routine owning an open `level`.
    pub fn environment_at(&self, level: usize) -> Option<SymIndex> {
        self.blocks.get(level).copied()
    }
}
