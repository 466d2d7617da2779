//! CAMT.053 to MT940 Converter Library
//!
//! Reads ISO 20022 CAMT.053 bank-to-customer statements and renders them as
//! SWIFT MT940 customer statements.
//!
//! # Pipeline
//!
//! - [`camt053_format`]: XML text to a [`camt053::Document`], collecting
//!   errors and warnings instead of aborting on the first problem
//! - [`conversion`]: [`camt053::Document`] to [`mt940::Mt940File`]
//! - [`mt940_format`]: [`mt940::Mt940File`] to MT940 text within the SWIFT
//!   field limits from [`limits`]
//!
//! # Examples
//!
//! ## Converting a file
//!
//! ```no_run
//! use std::fs;
//!
//! let xml = fs::read_to_string("statement.camt053.xml")?;
//! let outcome = camt2mt940::convert_to_mt940(&xml);
//!
//! match outcome.mt940 {
//!     Some(mt940) => fs::write(camt2mt940::output_file_name("statement.camt053.xml"), mt940.to_string())?,
//!     None => eprintln!("conversion failed: {:?}", outcome.conversion_error),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Running the stages separately
//!
//! ```no_run
//! use camt2mt940::camt053_format::{Camt053Parser, ParserConfig};
//! use camt2mt940::conversion::{CamtToMt940Converter, ConversionOptions};
//!
//! let xml = std::fs::read_to_string("statement.xml")?;
//! let parser = Camt053Parser::new(ParserConfig { strict_mode: true, ..Default::default() });
//! let result = parser.parse(&xml);
//!
//! if let Some(document) = result.data {
//!     let converter = CamtToMt940Converter::new(ConversionOptions::default());
//!     let mt940 = converter.convert(&document)?;
//!     print!("{}", camt2mt940::mt940_format::format(&mt940));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod camt053;
pub mod mt940;
pub mod limits;
pub mod xml;
pub mod camt053_format;
pub mod conversion;
pub mod mt940_format;

use log::debug;

// Re-export commonly used types
pub use camt053::Document;
pub use camt053_format::{Camt053Parser, ParseResult, ParserConfig};
pub use conversion::{CamtToMt940Converter, ConversionOptions};
pub use error::{Error, Result};
pub use mt940::Mt940File;

/// Result of [`convert_to_mt940`].
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    /// Everything the parser reported, including its warnings.
    pub parse_result: ParseResult,
    /// The converted file, present only when parsing and conversion succeeded.
    pub mt940: Option<Mt940File>,
    /// Why conversion failed after a successful parse.
    pub conversion_error: Option<String>,
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        self.mt940.is_some()
    }
}

/// Parse `xml` and convert it to MT940 using default options.
///
/// Balance reconciliation is skipped. Conversion only runs when parsing
/// succeeded; a conversion failure is reported as text in
/// [`ConversionOutcome::conversion_error`].
pub fn convert_to_mt940(xml: &str) -> ConversionOutcome {
    let parser = Camt053Parser::new(ParserConfig {
        validate_balances: false,
        parse_nested_transactions: true,
        ..Default::default()
    });
    let parse_result = parser.parse(xml);

    let document = match (&parse_result.data, parse_result.success) {
        (Some(document), true) => document,
        _ => {
            debug!("Skipping conversion, parsing did not succeed");
            return ConversionOutcome {
                parse_result,
                mt940: None,
                conversion_error: None,
            };
        }
    };

    let converter = CamtToMt940Converter::new(ConversionOptions {
        include_entry_details: true,
        ..Default::default()
    });

    match converter.convert(document) {
        Ok(mt940) => ConversionOutcome {
            parse_result,
            mt940: Some(mt940),
            conversion_error: None,
        },
        Err(e) => ConversionOutcome {
            parse_result,
            mt940: None,
            conversion_error: Some(e.to_string()),
        },
    }
}

/// Derive the MT940 file name for a CAMT input file name.
///
/// A trailing `.camt053.xml` or `.xml` (any case) is replaced by `.mt940.txt`.
///
/// ```
/// assert_eq!(camt2mt940::output_file_name("stmt.CAMT053.xml"), "stmt.mt940.txt");
/// assert_eq!(camt2mt940::output_file_name(""), "output.mt940.txt");
/// ```
pub fn output_file_name(input_name: &str) -> String {
    const SUFFIX: &str = ".mt940.txt";

    let lower = input_name.to_ascii_lowercase();
    let stem = [".camt053.xml", ".xml"]
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map_or(input_name, |ext| &input_name[..input_name.len() - ext.len()]);

    if stem.is_empty() {
        format!("output{}", SUFFIX)
    } else {
        format!("{}{}", stem, SUFFIX)
    }
}
