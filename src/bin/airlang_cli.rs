//! AIRlang compiler CLI
//!
//! Compiles structured notice records (the JSON produced by the
//! extraction step) into AIRlang rule text.
//!
//! # Usage
//!
//! ```bash
//! # Compile a record file to AIRlang
//! airlang_cli compile --file record.json
//!
//! # Or from stdin
//! cat record.json | airlang_cli compile
//!
//! # Machine-readable output with diagnostics
//! airlang_cli compile --file record.json -o json
//!
//! # Record-level lint without compiling
//! airlang_cli lint --file record.json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use flylang::{compile, NotamRecord};

#[derive(Parser)]
#[command(name = "airlang_cli")]
#[command(version = "0.1.0")]
#[command(about = "Compile structured NOTAM records into AIRlang rules")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: json or text (default)
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a record into AIRlang text
    Compile {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Report record-level lint findings without compiling
    Lint {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Compile { file } => {
            let record = read_record(file.as_deref())?;
            let output = compile(&record);

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
                OutputFormat::Text => {
                    for diagnostic in &output.diagnostics {
                        if diagnostic.is_error() {
                            eprintln!("{} {diagnostic}", "error:".red().bold());
                        } else {
                            eprintln!("{} {diagnostic}", "warning:".yellow().bold());
                        }
                    }
                    if !output.code.is_empty() {
                        println!("{}", output.code);
                    }
                }
            }

            Ok(if output.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Commands::Lint { file } => {
            let record = read_record(file.as_deref())?;
            let findings = record.lint();

            match cli.format {
                OutputFormat::Json => {
                    let messages: Vec<String> = findings.iter().map(|f| f.to_string()).collect();
                    println!("{}", serde_json::to_string_pretty(&messages)?);
                }
                OutputFormat::Text => {
                    for finding in &findings {
                        eprintln!("{} {finding}", "warning:".yellow().bold());
                    }
                    if findings.is_empty() {
                        println!("record is clean");
                    }
                }
            }

            Ok(if findings.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn read_record(file: Option<&Path>) -> anyhow::Result<NotamRecord> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("cannot read stdin")?;
            buffer
        }
    };
    serde_json::from_str(&raw).context("input is not a valid notice record")
}
