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

//! Property-based tests for the Diesel compiler.
//!
//! These tests use proptest to check invariants over generated inputs:
//! constant folding agrees with direct evaluation, the numeric coercion
//! rule, and label and temporary uniqueness.

use std::collections::HashSet;

use dieselc::analyzer::expressions::ExpressionAnalyzer;
use dieselc::analyzer::Analyzer;
use dieselc::ast::{BinaryOp, Expr, ExprKind};
use dieselc::quads::{Operand, QuadOp};
use dieselc::{compile_with_options, CompileOptions, Span, SymbolTable};
use proptest::prelude::*;

// ============================================================================
// Constant Folding
// ============================================================================

fn apply(op: &str, a: i64, b: i64) -> Option<i64> {
    match op {
        "+" => Some(a.wrapping_add(b)),
        "-" => Some(a.wrapping_sub(b)),
        "*" => Some(a.wrapping_mul(b)),
        "div" => a.checked_div(b),
        "mod" => a.checked_rem(b),
        "and" => Some(i64::from(a != 0 && b != 0)),
        "or" => Some(i64::from(a != 0 || b != 0)),
        "=" => Some(i64::from(a == b)),
        "<>" => Some(i64::from(a != b)),
        "<" => Some(i64::from(a < b)),
        ">" => Some(i64::from(a > b)),
        _ => None,
    }
}

/// A parenthesized integer expression and its value, if it has one.
fn int_expr() -> impl Strategy<Value = (String, Option<i64>)> {
    let leaf = (0i64..50).prop_map(|n| (n.to_string(), Some(n)));
    leaf.prop_recursive(4, 32, 2, |inner| {
        let ops = vec!["+", "-", "*", "div", "mod", "and", "or", "=", "<>", "<", ">"];
        prop_oneof![
            (inner.clone(), prop::sample::select(ops), inner.clone()).prop_map(
                |((left, lv), op, (right, rv))| {
                    let value = match (lv, rv) {
                        (Some(a), Some(b)) => apply(op, a, b),
                        _ => None,
                    };
                    (format!("({} {} {})", left, op, right), value)
                }
            ),
            inner
                .clone()
                .prop_map(|(text, v)| (format!("(-{})", text), v.map(i64::wrapping_neg))),
            inner.prop_map(|(text, v)| (format!("(not {})", text), v.map(|v| i64::from(v == 0)))),
        ]
    })
}

proptest! {
    /// A fully constant right-hand side folds to one load of its value.
    #[test]
    fn prop_folding_matches_evaluation((text, value) in int_expr()) {
        prop_assume!(value.is_some());
        let source = format!("program p; var x : integer; begin x := {} end.", text);
        let compilation = compile_with_options(&source, &CompileOptions::default()).unwrap();
        let quads: Vec<_> = compilation.quads[0].1.iter().copied().collect();

        prop_assert_eq!(quads.len(), 3);
        prop_assert_eq!(quads[0].op, QuadOp::Iload);
        prop_assert_eq!(quads[0].a, Operand::Int(value.unwrap()));
        prop_assert_eq!(quads[1].op, QuadOp::Iassign);
    }

    /// Folding never changes whether a program compiles.
    #[test]
    fn prop_folding_preserves_acceptance((text, _) in int_expr()) {
        let source = format!("program p; var x : integer; begin x := {} end.", text);
        let folded = compile_with_options(&source, &CompileOptions::default());
        let plain = compile_with_options(&source, &CompileOptions::default().with_optimize(false));
        prop_assert_eq!(folded.is_ok(), plain.is_ok());
    }
}

// ============================================================================
// Coercion Rule
// ============================================================================

fn operand(symtab: &SymbolTable, real: bool) -> Expr {
    let name = if real { "R" } else { "I" };
    let symbol = symtab.lookup(name).unwrap();
    Expr::new(ExprKind::Identifier(symbol), symtab.type_of(symbol), Span::new(0, 1))
}

fn scope_with_operands() -> SymbolTable {
    let mut symtab = SymbolTable::new();
    symtab.enter_procedure("P", Span::new(0, 1)).unwrap();
    symtab.open_scope().unwrap();
    let integer = symtab.integer_type();
    let real = symtab.real_type();
    symtab.enter_variable("I", Span::new(0, 1), integer).unwrap().unwrap();
    symtab.enter_variable("R", Span::new(0, 1), real).unwrap().unwrap();
    symtab
}

proptest! {
    #[test]
    fn prop_coercion_rule(
        op in prop::sample::select(vec![
            BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul,
            BinaryOp::Equal, BinaryOp::NotEqual, BinaryOp::Less, BinaryOp::Greater,
        ]),
        left_real in any::<bool>(),
        right_real in any::<bool>(),
    ) {
        let symtab = scope_with_operands();
        let mut expr = Expr::new(
            ExprKind::Binary {
                op,
                left: Box::new(operand(&symtab, left_real)),
                right: Box::new(operand(&symtab, right_real)),
            },
            symtab.void_type(),
            Span::new(0, 1),
        );

        let mut analyzer = Analyzer::new(&symtab);
        let ty = analyzer.analyze_expression(&mut expr);
        prop_assert!(!analyzer.has_errors());

        let expected = if op.is_relational() {
            symtab.integer_type()
        } else if left_real || right_real {
            symtab.real_type()
        } else {
            symtab.integer_type()
        };
        prop_assert_eq!(ty, expected);
        prop_assert_eq!(expr.ty, expected);

        let ExprKind::Binary { left, right, .. } = &expr.kind else {
            panic!("binary node replaced");
        };
        let casts = usize::from(left.is_cast()) + usize::from(right.is_cast());
        prop_assert_eq!(casts, usize::from(left_real != right_real));
        prop_assert_eq!(left.is_cast(), !left_real && right_real);
        prop_assert_eq!(left.ty, right.ty);
    }
}

// ============================================================================
// Label and Temporary Uniqueness
// ============================================================================

proptest! {
    #[test]
    fn prop_labels_and_temporaries_are_fresh(steps in prop::collection::vec(any::<bool>(), 1..100)) {
        let mut symtab = scope_with_operands();
        let integer = symtab.integer_type();
        let mut labels = HashSet::new();
        let mut temps = HashSet::new();
        for take_label in steps {
            if take_label {
                prop_assert!(labels.insert(symtab.next_label()));
            } else {
                let temp = symtab.new_temporary(integer).unwrap();
                prop_assert!(temps.insert(temp));
                prop_assert!(symtab.is_temporary(temp));
            }
        }
    }

    /// Every routine ends in its own exit label and no label is placed twice.
    #[test]
    fn prop_placed_labels_are_unique(loops in 0usize..5, ifs in 0usize..5, routines in 1usize..4) {
        let mut body = String::from("x := 0");
        for _ in 0..loops {
            body.push_str("; while x < 3 do x := x + 1 end");
        }
        for _ in 0..ifs {
            body.push_str("; if x = 1 then x := 2 elsif x = 2 then x := 3 else x := 0 end");
        }
        let mut source = String::from("program p; var x : integer; ");
        for i in 0..routines {
            source.push_str(&format!("procedure q{}; begin {}; return end; ", i, body));
        }
        source.push_str(&format!("begin {} end.", body));

        let compilation = compile_with_options(&source, &CompileOptions::default()).unwrap();
        let mut placed = HashSet::new();
        for (_, quads) in &compilation.quads {
            let exit = quads.exit_label();
            let last = quads.iter().last().unwrap();
            prop_assert_eq!(last.op, QuadOp::Labl);
            prop_assert_eq!(last.a, Operand::Label(exit));

            let exits = quads
                .iter()
                .filter(|q| q.op == QuadOp::Labl && q.a == Operand::Label(exit))
                .count();
            prop_assert_eq!(exits, 1);

            for quad in quads.iter().filter(|q| q.op == QuadOp::Labl) {
                prop_assert!(placed.insert(quad.a));
            }
        }
        prop_assert_eq!(compilation.quads.len(), routines + 1);
    }
}
