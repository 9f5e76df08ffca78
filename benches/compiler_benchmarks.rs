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

//! Performance benchmarks for the Diesel compiler.
//!
//! Run with: cargo bench
//!
//! Results are saved to target/criterion/ with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dieselc::parser::BlockCollector;
use dieselc::{compile_with_options, CompileOptions, SymbolTable};

// ============================================================================
// Benchmark Inputs
// ============================================================================

/// A program with `routines` sibling functions, each with a loop, a branch,
/// real arithmetic and an array.
fn generate_program(routines: usize) -> String {
    let mut source = String::from("program bench;\nvar total : real;\n");
    for i in 0..routines {
        source.push_str(&format!(
            "function f{i}(n : integer; scale : real) : real;
             var v : array[16] of integer;
                 k : integer;
                 acc : real;
             begin
               k := 0;
               acc := 0.0;
               while k < 16 do
                 v[k] := k * {i} + 2 * 3;
                 if v[k] mod 2 = 0 then
                   acc := acc + v[k] * scale
                 elsif k > n then
                   acc := acc - k / 2
                 else
                   acc := -acc
                 end;
                 k := k + 1
               end;
               return acc
             end;\n"
        ));
    }
    source.push_str("begin\n  total := 0.0");
    for i in 0..routines {
        source.push_str(&format!(";\n  total := total + f{i}({i}, 1.5)"));
    }
    source.push_str("\nend.\n");
    source
}

fn inputs() -> Vec<(&'static str, String)> {
    vec![
        ("small", generate_program(2)),
        ("medium", generate_program(20)),
        ("large", generate_program(200)),
    ]
}

// ============================================================================
// Lexer Benchmarks
// ============================================================================

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");
    for (name, source) in inputs() {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("tokenize", name), &source, |b, src| {
            b.iter(|| dieselc::lexer::tokenize(black_box(src)))
        });
    }
    group.finish();
}

// ============================================================================
// Parser Benchmarks
// ============================================================================

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");
    for (name, source) in inputs() {
        let tokens = dieselc::lexer::tokenize(&source).unwrap();
        group.throughput(Throughput::Elements(tokens.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", name), &tokens, |b, tokens| {
            b.iter(|| {
                let mut symtab = SymbolTable::new();
                let mut collector = BlockCollector::default();
                dieselc::parser::parse(black_box(tokens), &mut symtab, &mut collector)
            })
        });
    }
    group.finish();
}

// ============================================================================
// Full Pipeline Benchmarks
// ============================================================================

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let folding = CompileOptions::default();
    let plain = CompileOptions::default().with_optimize(false);
    for (name, source) in inputs() {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("compile", name), &source, |b, src| {
            b.iter(|| compile_with_options(black_box(src), &folding))
        });
        group.bench_with_input(BenchmarkId::new("compile_no_fold", name), &source, |b, src| {
            b.iter(|| compile_with_options(black_box(src), &plain))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lexer, bench_parser, bench_pipeline);
criterion_main!(benches);
