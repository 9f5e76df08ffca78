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

//! Symbol definitions for the symbol table.
//!
//! Every entry shares the same header (name, type, level, frame offset and
//! hash link). What differs per kind lives in [`SymbolKind`].

use super::pool::PoolIndex;
use super::{LabelId, SymIndex};
use crate::error::Span;

/// The value of a named constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstantValue {
    /// An integer constant.
    Integer(i64),
    /// A real constant.
    Real(f64),
}

impl std::fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstantValue::Integer(value) => write!(f, "{}", value),
            ConstantValue::Real(value) => write!(f, "{:?}", value),
        }
    }
}

/// Data shared by procedures and functions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Routine {
    /// Bytes of locals and temporaries in the activation record.
    pub ar_size: usize,
    /// Assembler label of the routine's entry point.
    pub label: LabelId,
    /// Head of the most-recent-first parameter chain.
    pub last_parameter: Option<SymIndex>,
    /// Formal parameters in declaration order.
    pub parameters: Vec<SymIndex>,
}

/// The kind of a symbol and its kind-specific data.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    /// Freshly installed, not yet finalized by its declaration.
    Undefined,
    /// A named type (`VOID`, `INTEGER`, `REAL`).
    NameType,
    /// A named constant.
    Constant(ConstantValue),
    /// A scalar variable or compiler temporary.
    Variable,
    /// An array; the element type is the symbol's type.
    Array {
        index_type: SymIndex,
        cardinality: usize,
    },
    /// A by-value formal parameter.
    Parameter {
        size: usize,
        preceding: Option<SymIndex>,
    },
    /// A procedure.
    Procedure(Routine),
    /// A function; the return type is the symbol's type.
    Function(Routine),
}

impl SymbolKind {
    /// A short name of the kind, for messages and listings.
    pub fn name(&self) -> &'static str {
        match self {
            SymbolKind::Undefined => "undefined",
            SymbolKind::NameType => "nametype",
            SymbolKind::Constant(_) => "constant",
            SymbolKind::Variable => "variable",
            SymbolKind::Array { .. } => "array",
            SymbolKind::Parameter { .. } => "parameter",
            SymbolKind::Procedure(_) => "procedure",
            SymbolKind::Function(_) => "function",
        }
    }

    /// The routine data of a procedure or function.
    pub fn routine(&self) -> Option<&Routine> {
        match self {
            SymbolKind::Procedure(routine) | SymbolKind::Function(routine) => Some(routine),
            _ => None,
        }
    }

    /// Mutable routine data of a procedure or function.
    pub fn routine_mut(&mut self) -> Option<&mut Routine> {
        match self {
            SymbolKind::Procedure(routine) | SymbolKind::Function(routine) => Some(routine),
            _ => None,
        }
    }

    /// Whether a reference to this symbol can be read as a value.
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            SymbolKind::Constant(_) | SymbolKind::Variable | SymbolKind::Parameter { .. }
        )
    }
}

/// Symbol table entry.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// The name, interned in the string pool.
    pub id: PoolIndex,
    /// The kind and its data.
    pub kind: SymbolKind,
    /// Index of the type's nametype symbol.
    pub ty: SymIndex,
    /// Lexical level of the declaration.
    pub level: usize,
    /// Position inside the owning activation record, in bytes.
    ///
    /// For parameters this is the position among the formals. Use
    /// [`super::SymbolTable::frame_offset_of`] for the signed offset used
    /// in addressing.
    pub offset: usize,
    /// Next older symbol in the same hash bucket.
    pub hash_link: Option<SymIndex>,
    /// The span where this symbol was declared.
    pub span: Span,
}

impl Symbol {
    pub(crate) fn new(id: PoolIndex, ty: SymIndex, level: usize, span: Span) -> Self {
        Self {
            id,
            kind: SymbolKind::Undefined,
            ty,
            level,
            offset: 0,
            hash_link: None,
            span,
        }
    }

    /// Check if this symbol is a procedure or a function.
    pub fn is_routine(&self) -> bool {
        self.kind.routine().is_some()
    }
}
