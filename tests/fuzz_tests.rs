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

//! Property-based fuzz tests for the Diesel compiler.
//!
//! These tests use proptest to generate random inputs and verify
//! that the compiler handles them gracefully (no panics). Any input must
//! end in assembly or in user-facing errors, never an internal error.

use dieselc::{compile_with_options, CompileOptions, ErrorCode};
use proptest::prelude::*;

fn assert_no_internal_error(source: &str) {
    if let Err(errors) = compile_with_options(source, &CompileOptions::default()) {
        assert!(!errors.is_empty());
        for error in errors {
            assert_ne!(error.code, ErrorCode::Internal, "{}\n{}", error, source);
        }
    }
}

// ============================================================================
// Lexer Fuzzing
// ============================================================================

proptest! {
    /// Fuzz the lexer with random ASCII strings.
    #[test]
    fn fuzz_lexer_ascii(s in "[ -~]{0,500}") {
        let _ = dieselc::lexer::tokenize(&s);
    }

    /// Fuzz the lexer with strings that look like Diesel code.
    #[test]
    fn fuzz_lexer_codelike(
        keyword in prop::sample::select(vec!["program", "begin", "end", "if", "then", "while", "do", "return", "var", "const"]),
        ident in "[a-z][a-z0-9_]{0,10}",
        num in 0u32..100000,
        op in prop::sample::select(vec!["+", "-", "*", "/", "=", "<>", "<", ">", ":=", "(", ")", "[", "]", ";"]),
    ) {
        let source = format!("{} {} {} {} {}", keyword, ident, op, num, ident);
        let _ = dieselc::lexer::tokenize(&source);
    }
}

// ============================================================================
// Whole-Compiler Fuzzing
// ============================================================================

proptest! {
    /// Random statement soup inside a valid program frame.
    #[test]
    fn fuzz_statement_bodies(
        statements in prop::collection::vec(
            prop::sample::select(vec![
                "x := 1", "x := r", "r := x", "r := x / 2", "x := a[x]", "a[1] := r",
                "x := f(x)", "x := f(r)", "p(x, r)", "p(x)", "p", "return", "return x",
                "if x then x := 2 end", "while r do end", "x := not r", "x := -x mod 3",
                "y := 1", "f(1)", "x := p(1, 2.0)", "a := 1", "c := 2",
            ]),
            0..12,
        ),
    ) {
        let source = format!(
            "program m;
             const c = 4;
             var x : integer;
                 r : real;
                 a : array[c] of integer;
             procedure p(i : integer; q : real); begin x := i; r := q end;
             function f(n : integer) : integer; begin return n * 2 end;
             begin {} end.",
            statements.join("; ")
        );
        assert_no_internal_error(&source);
    }

    /// Random token sequences never produce internal errors.
    #[test]
    fn fuzz_token_soup(
        tokens in prop::collection::vec(
            prop::sample::select(vec![
                "program", "p", ";", "begin", "end", ".", "x", ":=", "1", "2.5", "+",
                "(", ")", "var", ":", "integer", "real", "procedure", "function",
                "if", "then", "else", "while", "do", "return", "[", "]", ",",
            ]),
            0..40,
        ),
    ) {
        assert_no_internal_error(&tokens.join(" "));
    }
}
