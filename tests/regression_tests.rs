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

//! Regression tests for the Diesel compiler.
//!
//! These tests pin down behavior that earlier Diesel compilers got wrong
//! or left unspecified, so that it stays fixed.

use dieselc::quads::{Operand, QuadOp};
use dieselc::{compile, compile_with_options, CompileOptions, ErrorCode};
use pretty_assertions::assert_eq;

fn codes(source: &str) -> Vec<ErrorCode> {
    match compile_with_options(source, &CompileOptions::default()) {
        Ok(_) => Vec::new(),
        Err(errors) => errors.iter().map(|e| e.code).collect(),
    }
}

// ============================================================================
// Semantic Analysis
// ============================================================================

/// Every statement of every if branch is checked, not only the last
/// statement of the first branch.
#[test]
fn test_if_checks_all_branch_statements() {
    let codes = codes(
        "program m;
         var x : integer;
         begin
           if x = 0 then
             x := 1.5;
             x := 1
           elsif x = 1 then
             x := 2.5
           else
             x := 3.5;
             x := 3
           end
         end.",
    );
    assert_eq!(codes, vec![ErrorCode::TypeMismatch; 3]);
}

/// Arguments are not coerced: an integer actual for a real formal is an
/// error, unlike assignment.
#[test]
fn test_integer_argument_for_real_formal_is_rejected() {
    let codes = codes(
        "program m;
         procedure q(r : real); begin end;
         begin q(1) end.",
    );
    assert_eq!(codes, vec![ErrorCode::ArgumentTypeMismatch]);
}

/// Assigning an integer to a real inserts exactly one cast.
#[test]
fn test_integer_into_real_inserts_one_itor() {
    let compilation = compile_with_options(
        "program m; var r : real; begin r := 3 end.",
        &CompileOptions::default(),
    )
    .unwrap();
    let quads = &compilation.quads[0].1;
    let casts = quads.iter().filter(|q| q.op == QuadOp::Itor).count();
    assert_eq!(casts, 1);
    assert!(quads.iter().any(|q| q.op == QuadOp::Rassign));
}

/// Using an undefined name in several places reports it once, and the
/// expressions built on it stay quiet.
#[test]
fn test_undefined_name_does_not_cascade() {
    let codes = codes(
        "program m;
         var x : integer;
         begin
           x := y + 1;
           if y then x := y[2] end;
           y(1, 2)
         end.",
    );
    assert_eq!(codes, vec![ErrorCode::UndefinedIdentifier]);
}

/// A redeclared routine still gets its body parsed and checked.
#[test]
fn test_redeclared_routine_body_is_checked() {
    let codes = codes(
        "program m;
         var x : integer;
         procedure q; begin end;
         procedure q; begin x := 1.5 end;
         begin end.",
    );
    assert_eq!(codes, vec![ErrorCode::AlreadyDefined, ErrorCode::TypeMismatch]);
}

// ============================================================================
// Code Generation
// ============================================================================

/// Integer division uses the one-operand `idiv` after sign extension.
#[test]
fn test_idiv_form() {
    let asm = compile("program m; var a : integer; begin a := a div 3 end.").unwrap();
    assert!(asm.contains("\t\tcqo\n\t\tidiv\trcx\n"));
    assert!(!asm.contains("idiv\trax"));
}

/// A call without arguments leaves the stack pointer alone.
#[test]
fn test_call_without_arguments_has_no_cleanup() {
    let asm = compile(
        "program m;
         procedure q; begin end;
         begin q end.",
    )
    .unwrap();
    let call = asm.find("\t\tcall\t").unwrap();
    let next = asm[call..].lines().nth(1).unwrap();
    assert!(!next.contains("add\trsp"), "unexpected cleanup: {}", next);
}

/// Parameters are pushed last formal first, so the first formal sits at
/// `[rbp+16]` of the callee.
#[test]
fn test_params_pushed_in_reverse_order() {
    let compilation = compile_with_options(
        "program m;
         var a : integer;
             b : integer;
         procedure q(x : integer; y : integer); begin a := x; b := y end;
         begin q(a, b) end.",
        &CompileOptions::default(),
    )
    .unwrap();
    let (_, main) = compilation.quads.last().unwrap();
    let a = compilation.symbols.lookup("A");
    let b = compilation.symbols.lookup("B");
    let params: Vec<Operand> = main
        .iter()
        .filter(|q| q.op == QuadOp::Param)
        .map(|q| q.a)
        .collect();
    assert_eq!(params, vec![Operand::Sym(b.unwrap()), Operand::Sym(a.unwrap())]);

    let asm = &compilation.assembly;
    assert!(asm.contains("mov\trax, [rcx+16]\n\t\tmov\trcx, [rbp-8]\n\t\tmov\t[rcx-16], rax"));
    assert!(asm.contains("mov\trax, [rcx+24]\n\t\tmov\trcx, [rbp-8]\n\t\tmov\t[rcx-24], rax"));
}

/// Division by a literal zero is left for run time.
#[test]
fn test_division_by_zero_is_not_folded() {
    let compilation = compile_with_options(
        "program m; var a : integer; begin a := 7 div 0 end.",
        &CompileOptions::default(),
    )
    .unwrap();
    assert_eq!(compilation.folded, 0);
    assert!(compilation.quads[0].1.iter().any(|q| q.op == QuadOp::Idivide));
}

/// Real constants are loaded by bit pattern, never as decimal text.
#[test]
fn test_real_constant_loaded_as_bits() {
    let asm = compile("program m; const half = 0.5; var r : real; begin r := r * half end.").unwrap();
    let bits = 0.5f64.to_bits() as i64;
    assert!(asm.contains(&format!("mov\trax, {}\n\t\tpush\trax\n\t\tfld\tqword ptr [rsp]", bits)));
}
