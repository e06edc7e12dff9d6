//! The Nova compiler CLI.
//!
//! Provides the `novac` command with the following subcommands:
//!
//! - `novac check [--strict] [--skip-codegen] <file>` - Parse, analyze, and
//!   (unless skipped) compile a Nova source file to a throwaway object
//! - `novac new <dir>` - Create a new Nova project
//! - `novac fmt [file]` - Format a source file (stdin when omitted)
//! - `novac lsp` - Run the language server on stdio
//!
//! Exit codes: 0 on success, 1 on compilation failure, 2 on usage errors
//! (clap's default).

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use nova_common::diagnostic::{Diagnostic, Severity};
use nova_typeck::diagnostics::{render_diagnostic, DiagnosticOptions};

#[derive(Parser)]
#[command(name = "novac", version, about = "The Nova compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a Nova source file (and compile it unless told otherwise)
    Check {
        /// Path to the source file
        file: PathBuf,

        /// Treat warnings as failures
        #[arg(long)]
        strict: bool,

        /// Stop after semantic analysis
        #[arg(long = "skip-codegen")]
        skip_codegen: bool,
    },

    /// Create a new Nova project
    New {
        /// Path of the project directory to create
        dir: PathBuf,
    },

    /// Format a Nova source file to stdout
    Fmt {
        /// Path to the source file; stdin when omitted
        file: Option<PathBuf>,
    },

    /// Run the Nova language server on stdio
    Lsp,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            file,
            strict,
            skip_codegen,
        } => {
            if let Err(message) = check(&file, strict, skip_codegen) {
                if !message.is_empty() {
                    eprintln!("novac: {}", message);
                }
                process::exit(1);
            }
        }
        Commands::New { dir } => {
            if let Err(message) = nova_pkg::scaffold_project(&dir) {
                eprintln!("novac: {}", message);
                process::exit(1);
            }
            println!("Created Nova project in {}", dir.display());
        }
        Commands::Fmt { file } => {
            if let Err(message) = fmt(file.as_deref()) {
                eprintln!("novac: {}", message);
                process::exit(1);
            }
        }
        Commands::Lsp => {
            let runtime = tokio::runtime::Runtime::new().expect("failed to start async runtime");
            runtime.block_on(nova_lsp::run_stdio());
        }
    }
}

/// Run the check pipeline: parse, analyze, and unless skipped, lower and
/// emit a throwaway object under `build/`.
fn check(file: &Path, strict: bool, skip_codegen: bool) -> Result<(), String> {
    let source = std::fs::read_to_string(file)
        .map_err(|e| format!("failed to read {}: {}", file.display(), e))?;

    let parse = nova_parser::parse(&source);
    if parse.had_error {
        report_diagnostics(&parse.diagnostics, &source);
        return Err(String::new());
    }

    let semantics = nova_typeck::analyze(&parse.program, &source);
    report_diagnostics(&semantics.diagnostics, &source);

    let warning_count = count(&semantics.diagnostics, Severity::Warning);
    let error_count = count(&semantics.diagnostics, Severity::Error);
    if error_count > 0 || (strict && warning_count > 0) {
        return Err(String::new());
    }

    if !skip_codegen {
        let ir = nova_ir::lower(&parse.program, &semantics, &source)
            .map_err(|e| format!("cannot lower '{}': {}", e.function.text(&source), e.message))?;

        std::fs::create_dir_all("build")
            .map_err(|e| format!("failed to create build directory: {}", e))?;
        let object_path = PathBuf::from(format!("build/nova-check-{}.o", process::id()));

        nova_codegen::emit_object(&ir, &semantics, &source, &object_path)
            .map_err(|e| e.to_string())?;
        let _ = std::fs::remove_file(&object_path);
    }

    println!("nova-check: ok ({} warnings)", warning_count);
    Ok(())
}

/// Format a file (or stdin) to stdout.
fn fmt(file: Option<&Path>) -> Result<(), String> {
    let source = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("failed to read stdin: {}", e))?;
            buffer
        }
    };

    match nova_fmt::format_source(&source) {
        Ok(formatted) => {
            print!("{}", formatted);
            Ok(())
        }
        Err(diagnostics) => {
            report_diagnostics(&diagnostics, &source);
            Err(format!("parse failed with {} errors", diagnostics.len()))
        }
    }
}

/// Render diagnostics to stderr with labeled source excerpts.
fn report_diagnostics(diagnostics: &[Diagnostic], source: &str) {
    let options = DiagnosticOptions { color: false };
    for diag in diagnostics {
        eprint!("{}", render_diagnostic(diag, source, &options));
    }
}

fn count(diagnostics: &[Diagnostic], severity: Severity) -> usize {
    diagnostics
        .iter()
        .filter(|d| d.severity == severity)
        .count()
}
