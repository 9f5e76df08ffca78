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

//! Diesel Compiler CLI
//!
//! Compiles a Diesel source file into x86-64 assembly.

use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use dieselc::{compile_with_options, render_report, CompileOptions};

/// dieselc - A compiler for the Diesel teaching language
#[derive(Parser, Debug)]
#[command(name = "dieselc")]
#[command(author = "Diesel Team")]
#[command(version)]
#[command(about = "A compiler for the Diesel teaching language emitting x86-64 assembly")]
#[command(long_about = r#"
dieselc compiles a Diesel program into Intel-syntax x86-64 assembly.

Each procedure and function becomes one labelled routine with its own
activation record; nested routines reach enclosing variables through a
display of frame pointers.

Example usage:
  dieselc fib.d
  dieselc fib.d -o fib.s --trace
  dieselc fib.d --dump-quads --no-fold
"#)]
struct Cli {
    /// Source file to compile (.d)
    source: PathBuf,

    /// Output file. Defaults to the source path with a .s extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose output (implies --trace)
    #[arg(short, long)]
    verbose: bool,

    /// Interleave quadruple and frame comments with the assembly
    #[arg(long)]
    trace: bool,

    /// Disable integer constant folding
    #[arg(long)]
    no_fold: bool,

    /// Print each routine's quadruple listing
    #[arg(long)]
    dump_quads: bool,

    /// Print the symbol table after compilation
    #[arg(long)]
    dump_symbols: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.source.with_extension("s"));
    if output_path == cli.source {
        eprintln!("Error: Output file would overwrite the source file.");
        return ExitCode::from(2);
    }

    if cli.verbose {
        println!("Diesel Compiler v{}", dieselc::VERSION);
        println!("Source: {}", cli.source.display());
        println!("Output: {}", output_path.display());
        println!();
    }

    let source = match std::fs::read_to_string(&cli.source) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error: Cannot read {}: {}", cli.source.display(), e);
            return ExitCode::from(3);
        }
    };

    let filename = cli
        .source
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("<input>");

    let options = CompileOptions::default()
        .with_trace(cli.trace || cli.verbose)
        .with_optimize(!cli.no_fold);

    if cli.verbose {
        println!("Compiling...");
    }

    let compilation = match compile_with_options(&source, &options) {
        Ok(compilation) => compilation,
        Err(errors) => {
            let color = std::io::stderr().is_terminal();
            for error in &errors {
                eprint!("{}", render_report(error, &source, Some(filename), color));
            }
            eprintln!(
                "Error: {} error{} found, no output written.",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            );
            return ExitCode::from(1);
        }
    };

    if cli.verbose {
        for (name, quads) in &compilation.quads {
            println!("  {}: {} quadruples", name, quads.len());
        }
        println!("Folded {} constant expressions", compilation.folded);
        println!(
            "Generated {} lines of assembly",
            compilation.assembly.lines().count()
        );
    }

    if cli.dump_quads {
        for (name, quads) in &compilation.quads {
            println!("Quadruples for {}:", name);
            print!("{}", quads.named(&compilation.symbols));
            println!();
        }
    }

    if cli.dump_symbols {
        print!("{}", compilation.symbols.dump());
    }

    if cli.verbose {
        println!("Writing {}...", output_path.display());
    }

    if let Err(e) = std::fs::write(&output_path, &compilation.assembly) {
        eprintln!("Error: Cannot write {}: {}", output_path.display(), e);
        return ExitCode::from(4);
    }

    if cli.verbose {
        println!("Done!");
    }

    ExitCode::SUCCESS
}
