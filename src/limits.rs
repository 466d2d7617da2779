//! MT940 field length limits and the truncation/wrapping helpers that enforce them.
//!
//! All lengths count characters, not bytes.

use crate::error::{Error, Result};
use log::warn;

/// Tag 20: transaction reference number.
pub const TRANSACTION_REFERENCE: usize = 16;
/// Tag 21: related reference.
pub const RELATED_REFERENCE: usize = 16;
/// Tag 25: account identification.
pub const ACCOUNT_NUMBER: usize = 35;
/// Tag 28C: statement number.
pub const STATEMENT_NUMBER: usize = 5;
/// Tag 28C: sequence number.
pub const SEQUENCE_NUMBER: usize = 5;
/// Tag 61: reference for the account owner.
pub const CUSTOMER_REFERENCE: usize = 16;
/// Tag 61: reference of the account servicing institution.
pub const BANK_REFERENCE: usize = 16;
/// Tag 61: supplementary details.
pub const SUPPLEMENTARY_DETAILS: usize = 34;
/// Tag 86: maximum characters per line.
pub const INFO_LINE_LENGTH: usize = 65;
/// Tag 86: `?00` transaction code.
pub const TRANSACTION_CODE: usize = 3;
/// Tag 86: each of the `?20`..`?29` description sub-fields.
pub const DESCRIPTION_FIELD: usize = 27;
/// Tag 86: each of the `?32`..`?33` name sub-fields.
pub const NAME_FIELD: usize = 27;
/// Tag 86: `?30`/`?31` account and bank code.
pub const ACCOUNT_FIELD: usize = 34;
/// Tag 86: `?34` reference.
pub const REFERENCE_FIELD: usize = 16;

/// Number of description sub-fields (`?20`..`?29`).
pub const DESCRIPTION_SUBFIELDS: usize = 10;
/// Number of name sub-fields (`?32`..`?33`).
pub const NAME_SUBFIELDS: usize = 2;
/// Tag 86 content per line once the `:86:` prefix is accounted for.
pub const INFO_CONTENT_LENGTH: usize = INFO_LINE_LENGTH - 4;

/// Result of [`truncate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated {
    pub value: String,
    pub truncated: bool,
}

/// Check that `value` fits into `limit` characters.
pub fn validate_field_length(value: &str, limit: usize, field: &str) -> Result<()> {
    let actual = value.chars().count();
    if actual <= limit {
        return Ok(());
    }
    Err(Error::FieldTooLong {
        field: field.to_string(),
        limit,
        actual,
    })
}

/// Cut `value` down to at most `limit` characters.
pub fn truncate(value: &str, limit: usize) -> Truncated {
    match value.char_indices().nth(limit) {
        Some((byte_idx, _)) => Truncated {
            value: value[..byte_idx].to_string(),
            truncated: true,
        },
        None => Truncated {
            value: value.to_string(),
            truncated: false,
        },
    }
}

/// Like [`truncate`], logging a warning naming `field` when characters were dropped.
pub fn truncate_field(value: &str, limit: usize, field: &str) -> String {
    let result = truncate(value, limit);
    if result.truncated {
        warn!(
            "MT940: Field '{}' truncated from {} to {} characters",
            field,
            value.chars().count(),
            limit
        );
    }
    result.value
}

/// Split `text` into lines of at most `max` characters.
///
/// Greedy: when a space sits at or after 70% of `max` inside the window the
/// line breaks there and the leading spaces of the remainder are dropped;
/// otherwise the text is hard-broken at `max`.
pub fn wrap(text: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if max == 0 {
        return lines;
    }

    let chars: Vec<char> = text.chars().collect();
    let min_break = (max * 7).div_ceil(10);
    let mut start = 0;

    while start < chars.len() {
        let rest = &chars[start..];
        if rest.len() <= max {
            lines.push(rest.iter().collect());
            break;
        }

        match (min_break..=max).rev().find(|&i| rest[i] == ' ') {
            Some(space) => {
                let line: String = rest[..space].iter().collect();
                let line = line.trim_end();
                if !line.is_empty() {
                    lines.push(line.to_string());
                }
                start += space;
                while start < chars.len() && chars[start] == ' ' {
                    start += 1;
                }
            }
            None => {
                lines.push(rest[..max].iter().collect());
                start += max;
            }
        }
    }

    lines
}
