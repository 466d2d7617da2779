//! CAMT.053 to MT940 conversion.
//!
//! MT940 is a much narrower format than CAMT.053: exactly one opening and one
//! closing balance per statement, a four-letter transaction type and a small
//! set of tag 86 sub-fields. This module picks the balances, maps the codes and
//! flattens entries (or their details) into statement lines.

use crate::camt053::{
    AccountIdentification, Balance, BalanceType, BankTransactionCode, Document, Entry,
    EntryDetail, Statement,
};
use crate::error::{Error, Result};
use crate::mt940::{
    BalanceLine, DebitCredit, Mt940File, Mt940Statement, StatementLine, StatementNumber,
    TransactionInformation,
};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

/// Balance types usable as opening balance, in order of preference.
const OPENING_BALANCE_TYPES: [BalanceType; 3] =
    [BalanceType::Opbd, BalanceType::Prcd, BalanceType::Itbd];

/// Balance types usable as closing balance, in order of preference.
const CLOSING_BALANCE_TYPES: [BalanceType; 3] =
    [BalanceType::Clbd, BalanceType::Clav, BalanceType::Fwav];

/// Options for [`CamtToMt940Converter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Currency for balances that carry none.
    pub default_currency: String,
    /// Prepended to every statement number in tag 28C.
    pub statement_number_prefix: String,
    /// Emit one statement line per entry detail instead of per entry.
    pub include_entry_details: bool,
    /// Emit tag 64 (from CLAV) and tag 65 (from FWAV) balances.
    pub include_available_balances: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            default_currency: "EUR".to_string(),
            statement_number_prefix: String::new(),
            include_entry_details: true,
            include_available_balances: false,
        }
    }
}

/// Converts parsed CAMT.053 documents into MT940 files.
#[derive(Debug, Clone, Default)]
pub struct CamtToMt940Converter {
    options: ConversionOptions,
}

/// Convert `document` with the given options.
pub fn convert(document: &Document, options: &ConversionOptions) -> Result<Mt940File> {
    CamtToMt940Converter::new(options.clone()).convert(document)
}

impl CamtToMt940Converter {
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert every statement of `document`.
    ///
    /// Fails as a whole if any statement lacks a usable opening or closing
    /// balance; no partial file is produced.
    pub fn convert(&self, document: &Document) -> Result<Mt940File> {
        let statements = document
            .statements
            .iter()
            .enumerate()
            .map(|(index, stmt)| self.convert_statement(stmt, index))
            .collect::<Result<Vec<_>>>()?;

        Ok(Mt940File { statements })
    }

    fn convert_statement(&self, stmt: &Statement, index: usize) -> Result<Mt940Statement> {
        let (opening, closing) = match (
            find_opening_balance(&stmt.balances),
            find_closing_balance(&stmt.balances),
        ) {
            (Some(opening), Some(closing)) => (opening, closing),
            _ => {
                return Err(Error::MissingBalance {
                    statement: stmt.identification.clone(),
                })
            }
        };

        let opening_balance = BalanceLine::opening(
            DebitCredit::from_camt(&opening.credit_debit_indicator),
            self.balance_date(stmt, opening)?,
            self.balance_currency(opening),
            opening.amount.value,
        );
        let closing_balance = BalanceLine::closing(
            DebitCredit::from_camt(&closing.credit_debit_indicator),
            self.balance_date(stmt, closing)?,
            self.balance_currency(closing),
            closing.amount.value,
        );

        let transactions = if self.options.include_entry_details {
            self.convert_entries_with_details(&stmt.entries, opening_balance.date)
        } else {
            stmt.entries
                .iter()
                .map(|entry| convert_entry(entry, opening_balance.date))
                .collect()
        };

        let (closing_available_balance, forward_available_balances) =
            if self.options.include_available_balances {
                self.available_balances(stmt)?
            } else {
                (None, Vec::new())
            };

        let sequence = stmt.electronic_sequence_number.unwrap_or(index as u64 + 1);

        debug!(
            "Converted statement {} with {} line(s)",
            stmt.identification,
            transactions.len()
        );

        Ok(Mt940Statement {
            transaction_reference: stmt.identification.clone(),
            related_reference: None,
            account_identification: account_number(&stmt.account),
            statement_number: StatementNumber {
                statement_number: format!("{}{}", self.options.statement_number_prefix, sequence),
                sequence_number: stmt.legal_sequence_number.map(|n| n.to_string()),
            },
            opening_balance,
            transactions,
            closing_balance,
            closing_available_balance,
            forward_available_balances,
        })
    }

    fn convert_entries_with_details(
        &self,
        entries: &[Entry],
        fallback_date: NaiveDate,
    ) -> Vec<StatementLine> {
        let mut lines = Vec::new();

        for entry in entries {
            match entry.entry_details.as_deref() {
                Some(details) if !details.is_empty() => {
                    lines.extend(
                        details
                            .iter()
                            .map(|detail| convert_entry_detail(entry, detail, fallback_date)),
                    );
                }
                _ => lines.push(convert_entry(entry, fallback_date)),
            }
        }

        lines
    }

    fn available_balances(
        &self,
        stmt: &Statement,
    ) -> Result<(Option<BalanceLine>, Vec<BalanceLine>)> {
        let closing_available = match stmt.balance(&BalanceType::Clav) {
            Some(balance) => Some(BalanceLine::closing_available(
                DebitCredit::from_camt(&balance.credit_debit_indicator),
                self.balance_date(stmt, balance)?,
                self.balance_currency(balance),
                balance.amount.value,
            )),
            None => None,
        };

        let forward_available = stmt
            .balances
            .iter()
            .filter(|b| b.balance_type == BalanceType::Fwav)
            .map(|balance| {
                Ok(BalanceLine::forward_available(
                    DebitCredit::from_camt(&balance.credit_debit_indicator),
                    self.balance_date(stmt, balance)?,
                    self.balance_currency(balance),
                    balance.amount.value,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((closing_available, forward_available))
    }

    fn balance_date(&self, stmt: &Statement, balance: &Balance) -> Result<NaiveDate> {
        balance.date.ok_or_else(|| {
            Error::InvalidDate(format!(
                "Statement {}: {} balance has no valid date",
                stmt.identification,
                balance.balance_type.code()
            ))
        })
    }

    fn balance_currency(&self, balance: &Balance) -> String {
        if balance.amount.currency.is_empty() {
            self.options.default_currency.clone()
        } else {
            balance.amount.currency.clone()
        }
    }
}

/// Opening balance: first of OPBD, PRCD, ITBD; otherwise the first balance
/// that is not a closing type.
pub fn find_opening_balance(balances: &[Balance]) -> Option<&Balance> {
    OPENING_BALANCE_TYPES
        .iter()
        .find_map(|wanted| balances.iter().find(|b| &b.balance_type == wanted))
        .or_else(|| {
            balances
                .iter()
                .find(|b| !CLOSING_BALANCE_TYPES.contains(&b.balance_type))
        })
}

/// Closing balance: first of CLBD, CLAV, FWAV; otherwise the last balance.
pub fn find_closing_balance(balances: &[Balance]) -> Option<&Balance> {
    CLOSING_BALANCE_TYPES
        .iter()
        .find_map(|wanted| balances.iter().find(|b| &b.balance_type == wanted))
        .or_else(|| balances.last())
}

/// Account number for tag 25: IBAN, other identification, account name, or `UNKNOWN`.
pub fn account_number(account: &AccountIdentification) -> String {
    [
        account.iban.as_deref(),
        account.other.as_ref().map(|o| o.identification.as_str()),
        account.name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find(|value| !value.is_empty())
    .unwrap_or("UNKNOWN")
    .to_string()
}

/// Map a CAMT bank transaction code to a four-letter MT940 transaction type.
///
/// A proprietary code is used verbatim; otherwise the domain family and
/// sub-family decide, defaulting to `NMSC`.
pub fn map_bank_transaction_code(btc: &BankTransactionCode) -> String {
    if let Some(proprietary) = btc.proprietary.as_deref().filter(|p| !p.is_empty()) {
        return proprietary.to_string();
    }

    let family = btc.family.as_deref().unwrap_or("");
    let sub_family = btc.sub_family.as_deref().unwrap_or("");

    let code = match (family, sub_family) {
        ("PMNT", "RCDT") | ("PMNT", "ICDT") => "NTRF",
        ("PMNT", "RDDT") | ("PMNT", "IDDT") => "NDDT",
        ("MCOP", _) => "MCOP",
        ("CAJT", "CHRG") => "NCHG",
        ("CAJT", "COMM") => "NCOM",
        ("ICDT", _) | ("RCDT", _) => "NTRF",
        ("DDBT", _) => "NDDT",
        _ => "NMSC",
    };
    code.to_string()
}

fn value_date(entry: &Entry, fallback: NaiveDate) -> NaiveDate {
    entry.value_date.or(entry.booking_date).unwrap_or(fallback)
}

fn convert_entry(entry: &Entry, fallback_date: NaiveDate) -> StatementLine {
    let mut line = StatementLine::new(
        value_date(entry, fallback_date),
        DebitCredit::from_camt(&entry.credit_debit_indicator),
        entry.amount.value,
    );
    line.entry_date = entry.booking_date;
    line.bank_reference = entry.account_servicer_reference.clone();
    line.transaction_type = entry
        .bank_transaction_code
        .as_ref()
        .map(map_bank_transaction_code);

    if let Some(info) = &entry.additional_entry_information {
        line.information = Some(TransactionInformation {
            description: Some(info.clone()),
            ..Default::default()
        });
    }

    line
}

fn convert_entry_detail(entry: &Entry, detail: &EntryDetail, fallback_date: NaiveDate) -> StatementLine {
    let mut line = StatementLine::new(
        value_date(entry, fallback_date),
        DebitCredit::from_camt(&detail.credit_debit_indicator),
        detail.amount.value,
    );
    line.entry_date = entry.booking_date;
    line.bank_reference = detail
        .account_servicer_reference
        .clone()
        .or_else(|| entry.account_servicer_reference.clone());
    line.transaction_type = detail
        .bank_transaction_code
        .as_ref()
        .map(map_bank_transaction_code);

    let info = transaction_information(detail);
    if info.has_content() {
        line.information = Some(info);
    }

    line
}

/// Tag 86 content of an entry detail.
pub fn transaction_information(detail: &EntryDetail) -> TransactionInformation {
    let description = detail
        .remittance_information
        .as_ref()
        .map(|rmt| rmt.unstructured.join(" "))
        .filter(|d| !d.is_empty());

    TransactionInformation {
        transaction_code: detail
            .bank_transaction_code
            .as_ref()
            .and_then(|btc| btc.proprietary.clone()),
        description,
        name: counterparty_name(detail),
        account_number: counterparty_account(detail),
        reference: remittance_reference(detail),
        ..Default::default()
    }
}

/// Creditor name, falling back to the debtor name.
fn counterparty_name(detail: &EntryDetail) -> Option<String> {
    let parties = detail.related_parties.as_ref()?;
    [parties.creditor.as_ref(), parties.debtor.as_ref()]
        .into_iter()
        .flatten()
        .find_map(|party| party.name.clone())
}

/// Creditor IBAN, falling back to the debtor IBAN.
fn counterparty_account(detail: &EntryDetail) -> Option<String> {
    let parties = detail.related_parties.as_ref()?;
    [parties.creditor_account.as_ref(), parties.debtor_account.as_ref()]
        .into_iter()
        .flatten()
        .find_map(|account| account.iban.clone())
}

/// Structured creditor reference, falling back to the end-to-end identification.
fn remittance_reference(detail: &EntryDetail) -> Option<String> {
    let creditor_reference = detail
        .remittance_information
        .as_ref()
        .and_then(|rmt| rmt.structured.as_ref())
        .and_then(|strd| strd.creditor_reference.as_ref())
        .and_then(|cdtr_ref| cdtr_ref.reference.clone());

    creditor_reference.or_else(|| {
        detail
            .references
            .as_ref()
            .and_then(|refs| refs.end_to_end_identification.clone())
    })
}
