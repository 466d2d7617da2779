//! MT940 writer.
//!
//! Renders an [`Mt940File`] as SWIFT MT940 text: one tag per line, CRLF line
//! endings and a trailing CRLF. Values that do not fit their field are
//! truncated or wrapped, never rejected.

use crate::error::Result;
use crate::limits::{
    self, ACCOUNT_FIELD, ACCOUNT_NUMBER, BANK_REFERENCE, CUSTOMER_REFERENCE, DESCRIPTION_FIELD,
    DESCRIPTION_SUBFIELDS, INFO_CONTENT_LENGTH, NAME_FIELD, NAME_SUBFIELDS, REFERENCE_FIELD,
    RELATED_REFERENCE, SEQUENCE_NUMBER, STATEMENT_NUMBER, SUPPLEMENTARY_DETAILS,
    TRANSACTION_CODE, TRANSACTION_REFERENCE,
};
use crate::mt940::{
    BalanceLine, Mt940File, Mt940Statement, StatementLine, TransactionInformation,
};
use chrono::NaiveDate;
use log::warn;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::io::Write;

const CRLF: &str = "\r\n";

/// Transaction type written when a statement line has none.
const DEFAULT_TRANSACTION_TYPE: &str = "NMSC";

/// Render `file` as MT940 text. An empty file renders as an empty string.
pub fn format(file: &Mt940File) -> String {
    if file.statements.is_empty() {
        return String::new();
    }

    let mut lines = Vec::new();
    for statement in &file.statements {
        format_statement(statement, &mut lines);
    }

    let mut output = lines.join(CRLF);
    output.push_str(CRLF);
    output
}

impl Mt940File {
    /// Write the file as MT940 text to any destination implementing `Write`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use camt2mt940::mt940::Mt940File;
    ///
    /// let mt940 = Mt940File::default();
    /// let mut file = File::create("output.mt940.txt")?;
    /// mt940.write_to(&mut file)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(format(self).as_bytes())?;
        Ok(())
    }
}

impl fmt::Display for Mt940File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(self))
    }
}

fn format_statement(statement: &Mt940Statement, lines: &mut Vec<String>) {
    lines.push(format!(
        ":20:{}",
        limits::truncate_field(&statement.transaction_reference, TRANSACTION_REFERENCE, "20")
    ));

    if let Some(related) = &statement.related_reference {
        lines.push(format!(
            ":21:{}",
            limits::truncate_field(related, RELATED_REFERENCE, "21")
        ));
    }

    lines.push(format!(
        ":25:{}",
        limits::truncate_field(&statement.account_identification, ACCOUNT_NUMBER, "25")
    ));

    let number = &statement.statement_number;
    let mut line28 = format!(
        ":28C:{}",
        limits::truncate_field(&number.statement_number, STATEMENT_NUMBER, "28C statement number")
    );
    if let Some(sequence) = number.sequence_number.as_deref().filter(|s| !s.is_empty()) {
        line28.push('/');
        line28.push_str(&limits::truncate_field(
            sequence,
            SEQUENCE_NUMBER,
            "28C sequence number",
        ));
    }
    lines.push(line28);

    lines.push(format_balance(&statement.opening_balance));

    for transaction in &statement.transactions {
        lines.push(format_statement_line(transaction));
        if let Some(info) = &transaction.information {
            lines.extend(format_information(info));
        }
    }

    lines.push(format_balance(&statement.closing_balance));

    if let Some(available) = &statement.closing_available_balance {
        lines.push(format_balance(available));
    }
    for forward in &statement.forward_available_balances {
        lines.push(format_balance(forward));
    }
}

/// `:{tag}:{D/C}{YYMMDD}{currency}{amount}`
fn format_balance(balance: &BalanceLine) -> String {
    format!(
        ":{}:{}{}{}{}",
        balance.tag.as_str(),
        balance.debit_credit.as_str(),
        format_date(&balance.date),
        balance.currency,
        format_amount(balance.amount)
    )
}

/// Tag 61. Supplementary details go on a continuation line.
fn format_statement_line(line: &StatementLine) -> String {
    let mut out = format!(":61:{}", format_date(&line.value_date));

    if let Some(entry_date) = line.entry_date.filter(|d| *d != line.value_date) {
        out.push_str(&format_date(&entry_date));
    }

    out.push_str(line.debit_credit.as_str());
    if let Some(funds_code) = non_empty(&line.funds_code) {
        out.push_str(funds_code);
    }
    out.push_str(&format_amount(line.amount));
    out.push_str(non_empty(&line.transaction_type).unwrap_or(DEFAULT_TRANSACTION_TYPE));

    if let Some(customer_reference) = non_empty(&line.customer_reference) {
        out.push_str(&limits::truncate_field(
            customer_reference,
            CUSTOMER_REFERENCE,
            "61 customer reference",
        ));
    }
    if let Some(bank_reference) = non_empty(&line.bank_reference) {
        out.push_str("//");
        out.push_str(&limits::truncate_field(
            bank_reference,
            BANK_REFERENCE,
            "61 bank reference",
        ));
    }
    if let Some(details) = non_empty(&line.supplementary_details) {
        out.push_str(CRLF);
        out.push_str(&limits::truncate_field(
            details,
            SUPPLEMENTARY_DETAILS,
            "61 supplementary details",
        ));
    }

    out
}

/// Tag 86 as one or more physical lines; only the first carries `:86:`.
fn format_information(info: &TransactionInformation) -> Vec<String> {
    let fields = information_fields(info);

    // Any non-empty field yields a sub-field, so nothing is left to write.
    if fields.is_empty() {
        return vec![":86:".to_string()];
    }

    let content: String = fields
        .iter()
        .map(|(code, value)| format!("?{:02}{}", code, value))
        .collect();

    // Word-aware wrap over the joined string: a break may fall inside a
    // sub-field value, and the space it breaks at is dropped.
    let mut lines = limits::wrap(&content, INFO_CONTENT_LENGTH);
    if let Some(first) = lines.first_mut() {
        first.insert_str(0, ":86:");
    }
    lines
}

/// Tag 86 sub-fields as `(number, value)` pairs in field-number order.
pub(crate) fn information_fields(info: &TransactionInformation) -> Vec<(u8, String)> {
    let mut fields = Vec::new();

    if let Some(code) = non_empty(&info.transaction_code) {
        fields.push((0, limits::truncate_field(code, TRANSACTION_CODE, "86?00")));
    }
    if let Some(description) = non_empty(&info.description) {
        let parts = subfields(description, DESCRIPTION_FIELD, DESCRIPTION_SUBFIELDS, "86?20-?29");
        fields.extend((20..).zip(parts));
    }
    if let Some(account) = non_empty(&info.account_number) {
        fields.push((30, limits::truncate_field(account, ACCOUNT_FIELD, "86?30")));
    }
    if let Some(bank_code) = non_empty(&info.bank_code) {
        fields.push((31, limits::truncate_field(bank_code, ACCOUNT_FIELD, "86?31")));
    }
    if let Some(name) = non_empty(&info.name) {
        let parts = subfields(name, NAME_FIELD, NAME_SUBFIELDS, "86?32-?33");
        fields.extend((32..).zip(parts));
    }
    if let Some(reference) = non_empty(&info.reference) {
        fields.push((34, limits::truncate_field(reference, REFERENCE_FIELD, "86?34")));
    }
    if let Some(details) = non_empty(&info.details) {
        fields.push((60, details.to_string()));
    }
    if let Some(additional) = non_empty(&info.additional_info) {
        fields.push((61, additional.to_string()));
    }

    fields
}

/// Wrap `text` into at most `count` pieces of `width` characters.
fn subfields(text: &str, width: usize, count: usize, field: &str) -> Vec<String> {
    let mut parts = limits::wrap(text, width);
    if parts.len() > count {
        warn!(
            "MT940: Field '{}' needs {} sub-fields, keeping the first {}",
            field,
            parts.len(),
            count
        );
        parts.truncate(count);
    }
    parts
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// `YYMMDD`
fn format_date(date: &NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

/// Two decimals, comma as decimal separator, no thousands separator.
fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded).replace('.', ",")
}
