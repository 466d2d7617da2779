//! MT940 customer statement model.
//!
//! Built by [`crate::conversion`] and rendered by [`crate::mt940_format`].
//! Each type carries the MT940 tag it is written under.

use crate::camt053::CreditDebitCode;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Debit/Credit mark of a balance or statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebitCredit {
    /// `D`
    Debit,
    /// `C`
    Credit,
    /// `RD` (reversal of debit)
    ReversalDebit,
    /// `RC` (reversal of credit)
    ReversalCredit,
}

impl DebitCredit {
    /// Map a CAMT indicator. Unknown indicators are treated as credit.
    pub fn from_camt(code: &CreditDebitCode) -> Self {
        match code {
            CreditDebitCode::Debit => DebitCredit::Debit,
            CreditDebitCode::Credit | CreditDebitCode::Other(_) => DebitCredit::Credit,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DebitCredit::Debit => "D",
            DebitCredit::Credit => "C",
            DebitCredit::ReversalDebit => "RD",
            DebitCredit::ReversalCredit => "RC",
        }
    }
}

impl FromStr for DebitCredit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "D" => Ok(DebitCredit::Debit),
            "C" => Ok(DebitCredit::Credit),
            "RD" => Ok(DebitCredit::ReversalDebit),
            "RC" => Ok(DebitCredit::ReversalCredit),
            _ => Err(format!("Invalid debit/credit mark: {}", s)),
        }
    }
}

/// Tag of a balance line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceTag {
    /// `60F`
    OpeningFinal,
    /// `60M`
    OpeningIntermediate,
    /// `62F`
    ClosingFinal,
    /// `62M`
    ClosingIntermediate,
    /// `64`
    ClosingAvailable,
    /// `65`
    ForwardAvailable,
}

impl BalanceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceTag::OpeningFinal => "60F",
            BalanceTag::OpeningIntermediate => "60M",
            BalanceTag::ClosingFinal => "62F",
            BalanceTag::ClosingIntermediate => "62M",
            BalanceTag::ClosingAvailable => "64",
            BalanceTag::ForwardAvailable => "65",
        }
    }
}

/// Balance line (tags 60F/60M, 62F/62M, 64 and 65).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceLine {
    pub tag: BalanceTag,
    pub debit_credit: DebitCredit,
    pub date: NaiveDate,
    pub currency: String,
    pub amount: Decimal,
}

impl BalanceLine {
    fn with_tag(
        tag: BalanceTag,
        debit_credit: DebitCredit,
        date: NaiveDate,
        currency: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            tag,
            debit_credit,
            date,
            currency: currency.into(),
            amount,
        }
    }

    /// Final opening balance (`60F`).
    pub fn opening(
        debit_credit: DebitCredit,
        date: NaiveDate,
        currency: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self::with_tag(BalanceTag::OpeningFinal, debit_credit, date, currency, amount)
    }

    /// Final closing balance (`62F`).
    pub fn closing(
        debit_credit: DebitCredit,
        date: NaiveDate,
        currency: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self::with_tag(BalanceTag::ClosingFinal, debit_credit, date, currency, amount)
    }

    /// Closing available balance (`64`).
    pub fn closing_available(
        debit_credit: DebitCredit,
        date: NaiveDate,
        currency: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self::with_tag(BalanceTag::ClosingAvailable, debit_credit, date, currency, amount)
    }

    /// Forward available balance (`65`).
    pub fn forward_available(
        debit_credit: DebitCredit,
        date: NaiveDate,
        currency: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self::with_tag(BalanceTag::ForwardAvailable, debit_credit, date, currency, amount)
    }
}

/// Information to account owner (tag 86).
///
/// Every populated field is written under a fixed `?NN` sub-field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionInformation {
    /// `?00`
    pub transaction_code: Option<String>,
    /// `?20`..`?29`
    pub description: Option<String>,
    /// `?32`..`?33`
    pub name: Option<String>,
    /// `?30`
    pub account_number: Option<String>,
    /// `?31`
    pub bank_code: Option<String>,
    /// `?34`
    pub reference: Option<String>,
    /// `?60`
    pub details: Option<String>,
    /// `?61`
    pub additional_info: Option<String>,
}

impl TransactionInformation {
    /// Whether at least one field is populated.
    pub fn has_content(&self) -> bool {
        [
            &self.transaction_code,
            &self.description,
            &self.name,
            &self.account_number,
            &self.bank_code,
            &self.reference,
            &self.details,
            &self.additional_info,
        ]
        .iter()
        .any(|field| field.is_some())
    }
}

/// Statement line (tag 61) with its optional tag 86.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementLine {
    pub value_date: NaiveDate,
    pub entry_date: Option<NaiveDate>,
    pub debit_credit: DebitCredit,
    pub funds_code: Option<String>,
    pub amount: Decimal,
    pub transaction_type: Option<String>,
    pub customer_reference: Option<String>,
    pub bank_reference: Option<String>,
    pub supplementary_details: Option<String>,
    pub information: Option<TransactionInformation>,
}

impl StatementLine {
    /// A line with only the mandatory parts set.
    pub fn new(value_date: NaiveDate, debit_credit: DebitCredit, amount: Decimal) -> Self {
        Self {
            value_date,
            entry_date: None,
            debit_credit,
            funds_code: None,
            amount,
            transaction_type: None,
            customer_reference: None,
            bank_reference: None,
            supplementary_details: None,
            information: None,
        }
    }
}

/// Statement number and optional sequence number (tag 28C).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementNumber {
    pub statement_number: String,
    pub sequence_number: Option<String>,
}

/// A single MT940 statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mt940Statement {
    /// Tag 20.
    pub transaction_reference: String,
    /// Tag 21.
    pub related_reference: Option<String>,
    /// Tag 25.
    pub account_identification: String,
    /// Tag 28C.
    pub statement_number: StatementNumber,
    pub opening_balance: BalanceLine,
    pub transactions: Vec<StatementLine>,
    pub closing_balance: BalanceLine,
    pub closing_available_balance: Option<BalanceLine>,
    pub forward_available_balances: Vec<BalanceLine>,
}

/// An MT940 file: one or more statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mt940File {
    pub statements: Vec<Mt940Statement>,
}
