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

//! The string pool.
//!
//! Names are appended once and never removed. Each entry is stored as a
//! four byte little-endian length followed by the UTF-8 bytes, so a
//! [`PoolIndex`] is simply the offset of the length prefix.

/// Offset of an entry in the [`StringPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolIndex(pub usize);

const LENGTH_PREFIX: usize = 4;

/// Append-only, length-prefixed string storage.
#[derive(Debug, Clone, Default)]
pub struct StringPool {
    bytes: Vec<u8>,
}

impl StringPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a string and return its index.
    pub fn install(&mut self, text: &str) -> PoolIndex {
        let index = PoolIndex(self.bytes.len());
        self.bytes
            .extend_from_slice(&(text.len() as u32).to_le_bytes());
        self.bytes.extend_from_slice(text.as_bytes());
        index
    }

    /// The string stored at `index`, or `""` for an index that is not the
    /// start of an entry.
    pub fn lookup(&self, index: PoolIndex) -> &str {
        let start = index.0;
        let Some(prefix) = self.bytes.get(start..start + LENGTH_PREFIX) else {
            return "";
        };
        let mut length = [0u8; LENGTH_PREFIX];
        length.copy_from_slice(prefix);
        let length = u32::from_le_bytes(length) as usize;
        let body = start + LENGTH_PREFIX;
        self.bytes
            .get(body..body + length)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .unwrap_or("")
    }

    /// Compare two entries by content.
    pub fn compare(&self, a: PoolIndex, b: PoolIndex) -> bool {
        self.lookup(a) == self.lookup(b)
    }

    /// Total bytes in use.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if nothing has been installed yet.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_and_lookup() {
        let mut pool = StringPool::new();
        let a = pool.install("GLOBAL.");
        let b = pool.install("INTEGER");
        assert_eq!(pool.lookup(a), "GLOBAL.");
        assert_eq!(pool.lookup(b), "INTEGER");
        assert_eq!(b.0, 4 + "GLOBAL.".len());
    }

    #[test]
    fn test_compare_by_content_not_offset() {
        let mut pool = StringPool::new();
        let first = pool.install("X");
        let second = pool.install("X");
        let other = pool.install("Y");
        assert_ne!(first, second);
        assert!(pool.compare(first, second));
        assert!(!pool.compare(first, other));
    }

    #[test]
    fn test_lookup_out_of_range() {
        let pool = StringPool::new();
        assert_eq!(pool.lookup(PoolIndex(42)), "");
    }

    #[test]
    fn test_empty_string() {
        let mut pool = StringPool::new();
        let index = pool.install("");
        assert_eq!(pool.lookup(index), "");
        assert_eq!(pool.len(), 4);
    }
}
