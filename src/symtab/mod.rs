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

//! Symbol table and scope manager.
//!
//! One [`SymbolTable`] is shared by every pass of a compilation. The parser
//! installs declarations, the analyzer reads types, and the quadruple and
//! code generators allocate temporaries and labels and resolve frame
//! offsets. Entries are never removed; closing a scope only unlinks them
//! from the hash chains so lookups stop finding them.

mod frame;
mod pool;
mod scope;
mod symbol;

pub use pool::{PoolIndex, StringPool};
pub use symbol::{ConstantValue, Routine, Symbol, SymbolKind};

use std::fmt::Write as _;

use crate::error::{InternalError, Span};

/// Index of a symbol in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymIndex(pub usize);

impl std::fmt::Display for SymIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An assembler label number.
pub type LabelId = usize;

/// Maximum number of simultaneously open lexical levels.
pub const MAX_BLOCK: usize = 8;

/// Number of hash buckets.
pub const MAX_HASH: usize = 512;

/// Size in bytes of every integer, real, parameter and stack slot.
pub const STACK_WIDTH: usize = 8;

/// Largest activation record, in bytes, that declared variables and arrays
/// may fill.
pub const MAX_FRAME_SIZE: usize = 1 << 30;

/// Largest activation record once temporaries are added. Every local must
/// stay reachable with a 32-bit displacement below the display.
const MAX_DISPLACEMENT: usize = i32::MAX as usize - STACK_WIDTH * (1 + MAX_BLOCK);

/// Name of the outermost environment.
pub const GLOBAL_NAME: &str = "GLOBAL.";

/// The symbol table.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    pool: StringPool,
    symbols: Vec<Symbol>,
    hash_table: Vec<Option<SymIndex>>,
    /// Scope marks: `blocks[level]` is the environment that opened `level`.
    blocks: Vec<SymIndex>,
    label_counter: LabelId,
    temp_counter: usize,
    void_type: SymIndex,
    integer_type: SymIndex,
    real_type: SymIndex,
}

impl SymbolTable {
    /// Create a table holding the global environment and the built-in
    /// types `VOID`, `INTEGER` and `REAL`.
    pub fn new() -> Self {
        let mut table = Self {
            pool: StringPool::new(),
            symbols: Vec::new(),
            hash_table: vec![None; MAX_HASH],
            blocks: Vec::new(),
            label_counter: 0,
            temp_counter: 0,
            void_type: SymIndex(0),
            integer_type: SymIndex(0),
            real_type: SymIndex(0),
        };

        let global = table.install(GLOBAL_NAME, Span::default());
        let label = table.next_label();
        table.symbols[global.0].kind = SymbolKind::Procedure(Routine {
            label,
            ..Routine::default()
        });
        table.blocks.push(global);

        table.void_type = table.builtin_type("VOID");
        table.integer_type = table.builtin_type("INTEGER");
        table.real_type = table.builtin_type("REAL");
        for index in [global, table.void_type, table.integer_type, table.real_type] {
            table.symbols[index.0].ty = table.void_type;
        }
        table
    }

    fn builtin_type(&mut self, name: &str) -> SymIndex {
        let index = self.install(name, Span::default());
        self.symbols[index.0].kind = SymbolKind::NameType;
        index
    }

    /// The `VOID` nametype.
    pub fn void_type(&self) -> SymIndex {
        self.void_type
    }

    /// The `INTEGER` nametype.
    pub fn integer_type(&self) -> SymIndex {
        self.integer_type
    }

    /// The `REAL` nametype.
    pub fn real_type(&self) -> SymIndex {
        self.real_type
    }

    /// Number of entries, including hidden ones.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false; the built-ins are installed on construction.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    // ------------------------------------------------------------------
    // String pool
    // ------------------------------------------------------------------

    /// Intern a string.
    pub fn pool_install(&mut self, text: &str) -> PoolIndex {
        self.pool.install(text)
    }

    /// The string at a pool index.
    pub fn pool_lookup(&self, index: PoolIndex) -> &str {
        self.pool.lookup(index)
    }

    /// Compare two pool entries by content.
    pub fn pool_compare(&self, a: PoolIndex, b: PoolIndex) -> bool {
        self.pool.compare(a, b)
    }

    fn hash(name: &str) -> usize {
        name.bytes()
            .fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(b as usize))
            % MAX_HASH
    }

    // ------------------------------------------------------------------
    // Install and lookup
    // ------------------------------------------------------------------

    /// Install `name` at the current level.
    ///
    /// If a symbol with the same name already exists at the current level
    /// its index is returned instead and no symbol is added. New entries
    /// are [`SymbolKind::Undefined`] with void type.
    pub fn install(&mut self, name: &str, span: Span) -> SymIndex {
        let level = self.level();
        let bucket = Self::hash(name);
        let id = self.pool_install(name);

        let mut link = self.hash_table[bucket];
        while let Some(index) = link {
            let symbol = &self.symbols[index.0];
            if symbol.level == level && self.pool_compare(symbol.id, id) {
                return index;
            }
            link = symbol.hash_link;
        }

        let index = SymIndex(self.symbols.len());
        let mut symbol = Symbol::new(id, self.void_type, level, span);
        symbol.hash_link = self.hash_table[bucket];
        self.symbols.push(symbol);
        self.hash_table[bucket] = Some(index);
        index
    }

    /// Find the innermost visible symbol called `name`.
    pub fn lookup(&self, name: &str) -> Option<SymIndex> {
        let mut link = self.hash_table[Self::hash(name)];
        while let Some(index) = link {
            let symbol = &self.symbols[index.0];
            if self.pool_lookup(symbol.id) == name {
                return Some(index);
            }
            link = symbol.hash_link;
        }
        None
    }

    /// Get a symbol.
    pub fn symbol(&self, index: SymIndex) -> Result<&Symbol, InternalError> {
        self.symbols
            .get(index.0)
            .ok_or(InternalError::NoSuchSymbol(index.0))
    }

    /// Get a symbol mutably.
    pub fn symbol_mut(&mut self, index: SymIndex) -> Result<&mut Symbol, InternalError> {
        self.symbols
            .get_mut(index.0)
            .ok_or(InternalError::NoSuchSymbol(index.0))
    }

    /// Iterate over all entries, hidden ones included.
    pub fn iter(&self) -> impl Iterator<Item = (SymIndex, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| (SymIndex(i), symbol))
    }

    /// The name of a symbol, or `"?"` for an invalid index.
    pub fn name_of(&self, index: SymIndex) -> &str {
        self.symbols
            .get(index.0)
            .map(|symbol| self.pool_lookup(symbol.id))
            .unwrap_or("?")
    }

    /// The type of a symbol, or void for an invalid index.
    pub fn type_of(&self, index: SymIndex) -> SymIndex {
        self.symbols
            .get(index.0)
            .map(|symbol| symbol.ty)
            .unwrap_or(self.void_type)
    }

    /// Set the type of a symbol.
    pub fn set_type(&mut self, index: SymIndex, ty: SymIndex) -> Result<(), InternalError> {
        self.symbol_mut(index)?.ty = ty;
        Ok(())
    }

    /// The routine data of a procedure or function.
    pub fn routine(&self, index: SymIndex) -> Result<&Routine, InternalError> {
        let symbol = self.symbol(index)?;
        symbol
            .kind
            .routine()
            .ok_or_else(|| self.illegal_kind(index, "procedure or function"))
    }

    fn routine_mut(&mut self, index: SymIndex) -> Result<&mut Routine, InternalError> {
        if !self.symbol(index)?.is_routine() {
            return Err(self.illegal_kind(index, "procedure or function"));
        }
        self.symbol_mut(index)?
            .kind
            .routine_mut()
            .ok_or(InternalError::NoSuchSymbol(index.0))
    }

    /// Build the error for accessing `index` as the wrong kind.
    pub fn illegal_kind(&self, index: SymIndex, expected: &'static str) -> InternalError {
        match self.symbols.get(index.0) {
            Some(symbol) => InternalError::IllegalKind {
                index: index.0,
                name: self.pool.lookup(symbol.id).to_string(),
                expected,
                actual: symbol.kind.name(),
            },
            None => InternalError::NoSuchSymbol(index.0),
        }
    }

    /// Byte size of a value of type `ty`.
    pub fn size_of(&self, ty: SymIndex) -> usize {
        if ty == self.integer_type || ty == self.real_type {
            STACK_WIDTH
        } else {
            0
        }
    }

    /// The bit pattern of a real, for loading it as an immediate.
    pub fn ieee(value: f64) -> i64 {
        value.to_bits() as i64
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    /// Install and finalize a symbol, or return the clashing one.
    fn enter(
        &mut self,
        name: &str,
        span: Span,
        kind: SymbolKind,
        ty: SymIndex,
    ) -> Result<SymIndex, SymIndex> {
        let index = self.install(name, span);
        let symbol = &mut self.symbols[index.0];
        if symbol.kind != SymbolKind::Undefined {
            return Err(index);
        }
        symbol.kind = kind;
        symbol.ty = ty;
        Ok(index)
    }

    /// Reserve `size` bytes in the current environment's activation record
    /// and return the offset of the reservation. Fails if the record would
    /// grow past `limit`.
    fn reserve(&mut self, size: usize, limit: usize) -> Result<usize, InternalError> {
        let environment = self.current_environment();
        let routine = self.routine_mut(environment)?;
        let offset = routine.ar_size;
        if let Some(end) = offset.checked_add(size).filter(|&end| end <= limit) {
            routine.ar_size = end;
            return Ok(offset);
        }
        Err(InternalError::FrameTooLarge {
            routine: self.name_of(environment).to_string(),
            limit,
        })
    }

    /// Declare a scalar local and give it frame space.
    fn enter_local(
        &mut self,
        name: &str,
        span: Span,
        ty: SymIndex,
        limit: usize,
    ) -> Result<Result<SymIndex, SymIndex>, InternalError> {
        let index = match self.enter(name, span, SymbolKind::Variable, ty) {
            Ok(index) => index,
            Err(existing) => return Ok(Err(existing)),
        };
        let size = self.size_of(ty);
        self.symbols[index.0].offset = self.reserve(size, limit)?;
        Ok(Ok(index))
    }

    /// Declare a nametype.
    pub fn enter_nametype(&mut self, name: &str, span: Span) -> Result<SymIndex, SymIndex> {
        let void = self.void_type;
        self.enter(name, span, SymbolKind::NameType, void)
    }

    /// Declare a named constant; its type follows the value.
    pub fn enter_constant(
        &mut self,
        name: &str,
        span: Span,
        value: ConstantValue,
    ) -> Result<SymIndex, SymIndex> {
        let ty = match value {
            ConstantValue::Integer(_) => self.integer_type,
            ConstantValue::Real(_) => self.real_type,
        };
        self.enter(name, span, SymbolKind::Constant(value), ty)
    }

    /// Declare a scalar variable in the current environment's frame.
    pub fn enter_variable(
        &mut self,
        name: &str,
        span: Span,
        ty: SymIndex,
    ) -> Result<Result<SymIndex, SymIndex>, InternalError> {
        self.enter_local(name, span, ty, MAX_FRAME_SIZE)
    }

    /// Declare an array of `cardinality` elements of type `ty`.
    ///
    /// Fails with [`InternalError::FrameTooLarge`] once declared storage
    /// passes [`MAX_FRAME_SIZE`].
    pub fn enter_array(
        &mut self,
        name: &str,
        span: Span,
        ty: SymIndex,
        cardinality: usize,
    ) -> Result<Result<SymIndex, SymIndex>, InternalError> {
        let kind = SymbolKind::Array {
            index_type: self.integer_type,
            cardinality,
        };
        let index = match self.enter(name, span, kind, ty) {
            Ok(index) => index,
            Err(existing) => return Ok(Err(existing)),
        };
        let size = self.size_of(ty).saturating_mul(cardinality);
        self.symbols[index.0].offset = self.reserve(size, MAX_FRAME_SIZE)?;
        Ok(Ok(index))
    }

    /// Declare a formal parameter of the current environment.
    pub fn enter_parameter(
        &mut self,
        name: &str,
        span: Span,
        ty: SymIndex,
    ) -> Result<Result<SymIndex, SymIndex>, InternalError> {
        let environment = self.current_environment();
        let (preceding, position) = {
            let routine = self.routine(environment)?;
            (routine.last_parameter, routine.parameters.len() * STACK_WIDTH)
        };
        let size = self.size_of(ty);
        let kind = SymbolKind::Parameter { size, preceding };
        let index = match self.enter(name, span, kind, ty) {
            Ok(index) => index,
            Err(existing) => return Ok(Err(existing)),
        };
        self.symbols[index.0].offset = position;

        let routine = self.routine_mut(environment)?;
        routine.last_parameter = Some(index);
        routine.parameters.push(index);
        Ok(Ok(index))
    }

    /// Declare a procedure and give it a fresh label.
    pub fn enter_procedure(&mut self, name: &str, span: Span) -> Result<SymIndex, SymIndex> {
        let label = self.next_label();
        let void = self.void_type;
        let routine = Routine {
            label,
            ..Routine::default()
        };
        self.enter(name, span, SymbolKind::Procedure(routine), void)
    }

    /// Declare a function and give it a fresh label.
    ///
    /// The return type is void until [`SymbolTable::set_type`] is called
    /// after the heading has been read.
    pub fn enter_function(&mut self, name: &str, span: Span) -> Result<SymIndex, SymIndex> {
        let label = self.next_label();
        let void = self.void_type;
        let routine = Routine {
            label,
            ..Routine::default()
        };
        self.enter(name, span, SymbolKind::Function(routine), void)
    }

    // ------------------------------------------------------------------
    // Labels and temporaries
    // ------------------------------------------------------------------

    /// Hand out the next assembler label. Labels are never reused.
    pub fn next_label(&mut self) -> LabelId {
        let label = self.label_counter;
        self.label_counter += 1;
        label
    }

    /// Install a compiler temporary of type `ty` in the current
    /// environment's frame.
    pub fn new_temporary(&mut self, ty: SymIndex) -> Result<SymIndex, InternalError> {
        if ty == self.void_type {
            return Err(InternalError::VoidTemporary);
        }
        self.temp_counter += 1;
        let name = format!("${}", self.temp_counter);
        match self.enter_local(&name, Span::default(), ty, MAX_DISPLACEMENT)? {
            Ok(index) => Ok(index),
            Err(existing) => Err(self.illegal_kind(existing, "fresh temporary")),
        }
    }

    /// Check if a symbol is a compiler temporary.
    pub fn is_temporary(&self, index: SymIndex) -> bool {
        self.name_of(index).starts_with('$')
    }

    // ------------------------------------------------------------------
    // Listing
    // ------------------------------------------------------------------

    /// A one-line-per-symbol listing of the whole table.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>4}  {:<12} {:<10} {:<8} {:>5} {:>6}  {}",
            "idx", "name", "kind", "type", "level", "offset", "details"
        );
        for (index, symbol) in self.iter() {
            let details = match &symbol.kind {
                SymbolKind::Constant(value) => format!("value={}", value),
                SymbolKind::Array { cardinality, .. } => format!("card={}", cardinality),
                SymbolKind::Parameter { size, preceding } => match preceding {
                    Some(prev) => format!("size={} preceding={}", size, self.name_of(*prev)),
                    None => format!("size={}", size),
                },
                SymbolKind::Procedure(routine) | SymbolKind::Function(routine) => format!(
                    "label=L{} ar_size={} params={}",
                    routine.label,
                    routine.ar_size,
                    routine.parameters.len()
                ),
                _ => String::new(),
            };
            let kind = if self.is_temporary(index) {
                "temporary"
            } else {
                symbol.kind.name()
            };
            let _ = writeln!(
                out,
                "{:>4}  {:<12} {:<10} {:<8} {:>5} {:>6}  {}",
                index.0,
                self.name_of(index),
                kind,
                self.name_of(symbol.ty),
                symbol.level,
                symbol.offset,
                details
            );
        }
        out
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
