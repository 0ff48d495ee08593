//! Ember CLI

use clap::{Parser, Subcommand};
use ember::error::{report_error, report_runtime_error};
use ember::interp::Interpreter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ember", version, about = "Ember - a small expression language")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run an Ember source file
    Run {
        /// Source file to run
        file: PathBuf,
    },
    /// Start the interactive REPL
    Repl,
    /// Parse and dump AST (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Command::Repl) {
        Command::Run { file } => run_file(&file),
        Command::Repl => start_repl(),
        Command::Parse { file } => parse_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`)
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

type CliResult = Result<ExitCode, Box<dyn std::error::Error>>;

fn run_file(path: &Path) -> CliResult {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let program = match ember::lexer::tokenize(&source)
        .and_then(|tokens| ember::parser::parse(&filename, &source, tokens))
    {
        Ok(program) => program,
        Err(err) => {
            report_error(&filename, &source, &err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut interpreter = Interpreter::new();
    match interpreter.run(&program) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            report_runtime_error(&filename, &source, &err)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn start_repl() -> CliResult {
    let mut repl = ember::repl::Repl::new()?;
    repl.run()?;
    Ok(ExitCode::SUCCESS)
}

fn parse_file(path: &Path) -> CliResult {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let tokens = ember::lexer::tokenize(&source)?;
    let ast = ember::parser::parse(&filename, &source, tokens)?;

    println!("{}", serde_json::to_string_pretty(&ast)?);
    Ok(ExitCode::SUCCESS)
}

fn tokenize_file(path: &Path) -> CliResult {
    let source = std::fs::read_to_string(path)?;

    let tokens = ember::lexer::tokenize(&source)?;
    for (tok, span) in &tokens {
        println!("{:?} @ {}..{}", tok, span.start, span.end);
    }

    Ok(ExitCode::SUCCESS)
}
