//! Error types for the camt2mt940 library.

use std::io;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while parsing, converting and writing statements.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred during read or write operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not well-formed XML.
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// The CAMT document has no `GrpHdr` element.
    #[error("Group header not found")]
    MissingGroupHeader,

    /// A statement offers no balance usable as opening or closing balance.
    #[error("Statement {statement}: Missing opening or closing balance")]
    MissingBalance { statement: String },

    /// Invalid or missing date.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Invalid amount format.
    #[error("Invalid amount format: {0}")]
    InvalidAmount(String),

    /// A value does not fit into its MT940 field.
    #[error("Field '{field}' exceeds MT940 limit of {limit} characters (current: {actual})")]
    FieldTooLong {
        field: String,
        limit: usize,
        actual: usize,
    },

    /// Invalid command line or configuration value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_balance_message_names_statement() {
        let err = Error::MissingBalance {
            statement: "STMT-7".into(),
        };
        assert_eq!(
            err.to_string(),
            "Statement STMT-7: Missing opening or closing balance"
        );
    }

    #[test]
    fn test_field_too_long_message() {
        let err = Error::FieldTooLong {
            field: "20".into(),
            limit: 16,
            actual: 20,
        };
        assert_eq!(
            err.to_string(),
            "Field '20' exceeds MT940 limit of 16 characters (current: 20)"
        );
    }
}
