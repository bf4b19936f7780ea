//! AlgoFX CLI - French pseudocode to Python transpiler

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use algofx::errors::print_diagnostics;
use algofx::{
    check_with_locale, compile_with_map, summary, AlgofxError, AlgofxResult, CompileOptions,
    Diagnostic, Locale,
};

#[derive(Parser)]
#[command(name = "algofx")]
#[command(about = "Validate French algorithmic pseudocode and translate it to Python")]
#[command(version)]
struct Cli {
    /// Language of diagnostic messages
    #[arg(long, default_value = "french", env = "ALGOFX_LANG", global = true, value_parser = parse_locale)]
    lang: Locale,

    /// Diagnostic output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a source file and report every problem found
    Check {
        /// Input file (use '-' for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Translate a source file to Python
    Compile {
        /// Input file (use '-' for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Iterations a loop may run before the generated program aborts
        #[arg(long, default_value_t = 1000, env = "ALGOFX_MAX_ITERATIONS")]
        max_iterations: u32,

        /// Translate without validating first
        #[arg(long)]
        no_check: bool,

        /// Write the generated-to-source line map as JSON to this file
        #[arg(long, value_name = "FILE")]
        line_map: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Annotated source excerpts
    Text,
    /// One JSON array of diagnostics
    Json,
}

fn parse_locale(s: &str) -> Result<Locale, String> {
    s.parse()
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> AlgofxResult<ExitCode> {
    match cli.command {
        Commands::Check { input } => {
            let (source, filename) = read_source(&input)?;
            let diagnostics = check_with_locale(&source, cli.lang);
            report(&source, &filename, &diagnostics, cli.format);

            if diagnostics.is_empty() {
                if cli.format == Format::Text {
                    eprintln!("{}: no problems found", filename);
                }
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Compile {
            input,
            output,
            max_iterations,
            no_check,
            line_map,
        } => {
            let (source, filename) = read_source(&input)?;

            if !no_check {
                let diagnostics = check_with_locale(&source, cli.lang);
                if !diagnostics.is_empty() {
                    report(&source, &filename, &diagnostics, cli.format);
                    if cli.format == Format::Text {
                        if let Some(text) = summary(&diagnostics, cli.lang) {
                            eprintln!("{}", text);
                        }
                    }
                    return Ok(ExitCode::FAILURE);
                }
            }

            let options = CompileOptions::default().with_max_iterations(max_iterations);
            let compiled = match compile_with_map(&source, &options) {
                Ok(compiled) => compiled,
                Err(e @ AlgofxError::MissingStructure { .. }) => {
                    eprintln!("{}", e);
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e),
            };

            if let Some(path) = line_map {
                match serde_json::to_string_pretty(&compiled.line_map) {
                    Ok(json) => fs::write(&path, json)?,
                    Err(e) => log::error!("failed to serialize line map: {}", e),
                }
            }

            match output {
                Some(path) => {
                    fs::write(&path, compiled.code)?;
                    log::info!("wrote {}", path.display());
                }
                None => print!("{}", compiled.code),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn report(source: &str, filename: &str, diagnostics: &[Diagnostic], format: Format) {
    match format {
        Format::Text => print_diagnostics(source, filename, diagnostics),
        Format::Json => match serde_json::to_string_pretty(diagnostics) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("failed to serialize diagnostics: {}", e),
        },
    }
}

/// Read source from a file, or stdin for `-`
fn read_source(input: &Path) -> AlgofxResult<(String, String)> {
    if input.to_str() == Some("-") {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        return Ok((source, "<stdin>".to_string()));
    }

    let source = fs::read_to_string(input)?;
    Ok((source, input.display().to_string()))
}
