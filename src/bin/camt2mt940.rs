//! camt2mt940 - CLI tool for converting CAMT.053 statements to MT940.

use camt2mt940::{
    output_file_name, Camt053Parser, CamtToMt940Converter, ConversionOptions, Error, Mt940File,
    ParserConfig, Result,
};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "camt2mt940")]
#[command(about = "Convert CAMT.053 bank statements to MT940", long_about = None)]
struct Cli {
    /// Input file path (or stdin if not provided)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file path (or stdout if not provided)
    #[arg(short, long, conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Directory to write `<input>.mt940.txt` into
    #[arg(long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Treat a missing message id or creation time as an error
    #[arg(long)]
    strict: bool,

    /// Check opening balance plus entries against the closing balance
    #[arg(long = "validate-balances")]
    validate_balances: bool,

    /// Write one statement line per entry instead of per entry detail
    #[arg(long = "no-entry-details")]
    no_entry_details: bool,

    /// Prefix for the statement number in tag 28C
    #[arg(long = "statement-prefix", default_value = "")]
    statement_prefix: String,

    /// Also write available balances (tags 64 and 65)
    #[arg(long = "available-balances")]
    available_balances: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the input could not be parsed.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    let output = output_path(&cli)?;

    let parser = Camt053Parser::new(ParserConfig {
        strict_mode: cli.strict,
        validate_balances: cli.validate_balances,
        parse_nested_transactions: true,
    });

    let result = match cli.input {
        Some(ref input_path) => parser.from_read(&mut File::open(input_path)?)?,
        None => parser.from_read(&mut io::stdin())?,
    };

    let document = match result.data {
        Some(document) if result.success => document,
        _ => {
            for error in result.errors.iter().flatten() {
                eprintln!("Error: {}", error);
            }
            return Ok(false);
        }
    };

    let converter = CamtToMt940Converter::new(ConversionOptions {
        statement_number_prefix: cli.statement_prefix.clone(),
        include_entry_details: !cli.no_entry_details,
        include_available_balances: cli.available_balances,
        ..Default::default()
    });
    let mt940 = converter.convert(&document)?;

    match output {
        Some(path) => {
            let mut file = File::create(&path)?;
            mt940.write_to(&mut file)?;
            info!(
                "Wrote {} statement(s) to {}",
                mt940.statements.len(),
                path.display()
            );
        }
        None => write_stdout(&mt940)?,
    }

    Ok(true)
}

fn output_path(cli: &Cli) -> Result<Option<PathBuf>> {
    if let Some(ref output) = cli.output {
        return Ok(Some(output.clone()));
    }

    let Some(dir) = cli.output_dir.as_ref() else {
        return Ok(None);
    };
    if !dir.is_dir() {
        return Err(Error::InvalidArgument(format!(
            "output directory {} does not exist",
            dir.display()
        )));
    }

    let input_name = cli
        .input
        .as_deref()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Some(dir.join(output_file_name(&input_name))))
}

fn write_stdout(mt940: &Mt940File) -> Result<()> {
    let mut stdout = io::stdout().lock();
    mt940.write_to(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}
