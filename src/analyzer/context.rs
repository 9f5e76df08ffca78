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

//! Analysis context for the semantic analyzer.
//!
//! Tracks the routine whose body is being checked and whether a `return`
//! has been seen in it.

use crate::symtab::SymIndex;

/// Context for one routine body.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext {
    /// The routine that owns the body.
    pub routine: SymIndex,
    /// Whether the body contains any `return` statement.
    pub has_return: bool,
}

impl AnalysisContext {
    /// Start checking the body of `routine`.
    pub fn new(routine: SymIndex) -> Self {
        Self {
            routine,
            has_return: false,
        }
    }
}
