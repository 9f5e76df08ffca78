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

//! End-to-end CLI integration tests.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const PROGRAM: &str = "program cli;
var x : integer;
begin
  x := 1 + 2
end.
";

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dieselc"))
}

fn write_source(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn run(source: &Path) -> Output {
    cargo_bin()
        .arg(source)
        .output()
        .expect("Failed to execute command")
}

/// Test --help flag.
#[test]
fn test_help_flag() {
    let output = cargo_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("dieselc"));
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--trace"));
    assert!(stdout.contains("--no-fold"));
}

/// Test --version flag.
#[test]
fn test_version_flag() {
    let output = cargo_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("dieselc"));
    assert!(stdout.contains("0.1.0"));
}

/// The default output path replaces the extension with `.s`.
#[test]
fn test_compile_to_default_output() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "cli.d", PROGRAM);

    let output = run(&source);
    assert!(
        output.status.success(),
        "Compilation failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let asm = std::fs::read_to_string(dir.path().join("cli.s")).unwrap();
    assert!(asm.contains(".intel_syntax noprefix"));
    assert!(asm.contains("# CLI"));
}

#[test]
fn test_compile_to_explicit_output_with_trace() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "cli.d", PROGRAM);
    let target = dir.path().join("out.asm");

    let output = cargo_bin()
        .arg(&source)
        .arg("-o")
        .arg(&target)
        .arg("--trace")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let asm = std::fs::read_to_string(&target).unwrap();
    assert!(asm.contains("\t# QUAD 1: q_iload"));
    assert!(asm.contains("\t# PROLOGUE (CLI)"));
}

#[test]
fn test_dump_quads_respects_no_fold() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "cli.d", PROGRAM);

    let folded = cargo_bin()
        .arg(&source)
        .arg("--dump-quads")
        .output()
        .unwrap();
    let plain = cargo_bin()
        .arg(&source)
        .arg("--dump-quads")
        .arg("--no-fold")
        .output()
        .unwrap();

    let folded = String::from_utf8_lossy(&folded.stdout);
    let plain = String::from_utf8_lossy(&plain.stdout);
    assert!(folded.contains("Quadruples for CLI:"));
    assert!(folded.contains("q_iload    3"));
    assert!(plain.contains("q_iplus"));
    assert!(!folded.contains("q_iplus"));
}

#[test]
fn test_dump_symbols_and_verbose() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "cli.d", PROGRAM);

    let output = cargo_bin()
        .arg(&source)
        .arg("--dump-symbols")
        .arg("-v")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Diesel Compiler v"));
    assert!(stdout.contains("CLI: "));
    assert!(stdout.contains("GLOBAL."));
    assert!(stdout.contains("INTEGER"));
}

// ============================================================================
// Failure Exit Codes
// ============================================================================

#[test]
fn test_compile_error_exit_code() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "bad.d", "program bad; begin x := 1.5 end.");

    let output = run(&source);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("E200"));
    assert!(!dir.path().join("bad.s").exists());
}

#[test]
fn test_missing_source_exit_code() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir.path().join("missing.d"));
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_unwritable_output_exit_code() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "cli.d", PROGRAM);
    let target = dir.path().join("no_such_dir").join("out.s");

    let output = cargo_bin()
        .arg(&source)
        .arg("-o")
        .arg(&target)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_usage_error_exit_code() {
    let output = cargo_bin().arg("--no-such-flag").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_output_must_not_overwrite_source() {
    let dir = TempDir::new().unwrap();
    let source = write_source(&dir, "cli.s", PROGRAM);
    let output = run(&source);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(std::fs::read_to_string(&source).unwrap(), PROGRAM);
}
