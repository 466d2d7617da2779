//! CAMT.053 (ISO 20022 Bank-to-Customer Statement) document model.
//!
//! These types are produced by [`crate::camt053_format::Camt053Parser`] and are
//! not mutated afterwards. Element names from the XML are noted next to each
//! field.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monetary amount with its ISO 4217 currency (`Amt` with `Ccy` attribute).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub value: Decimal,
    pub currency: String,
}

impl Default for Amount {
    fn default() -> Self {
        Self {
            value: Decimal::ZERO,
            currency: "EUR".to_string(),
        }
    }
}

impl Amount {
    /// The amount signed by a credit/debit indicator. Only `CRDT` is positive.
    pub fn signed(&self, indicator: &CreditDebitCode) -> Decimal {
        match indicator {
            CreditDebitCode::Credit => self.value,
            _ => -self.value,
        }
    }
}

/// Credit/Debit indicator (`CdtDbtInd`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditDebitCode {
    /// `CRDT`
    Credit,
    /// `DBIT`
    Debit,
    /// Any other (or missing) value, kept verbatim.
    Other(String),
}

impl CreditDebitCode {
    pub fn from_code(code: &str) -> Self {
        match code {
            "CRDT" => CreditDebitCode::Credit,
            "DBIT" => CreditDebitCode::Debit,
            other => CreditDebitCode::Other(other.to_string()),
        }
    }

    pub fn is_debit(&self) -> bool {
        matches!(self, CreditDebitCode::Debit)
    }
}

impl fmt::Display for CreditDebitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreditDebitCode::Credit => f.write_str("CRDT"),
            CreditDebitCode::Debit => f.write_str("DBIT"),
            CreditDebitCode::Other(code) => f.write_str(code),
        }
    }
}

/// Entry status (`Sts`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    /// Booked.
    Book,
    /// Pending.
    Pdng,
    /// Information only.
    Info,
    Other(String),
}

impl EntryStatus {
    pub fn from_code(code: &str) -> Self {
        match code {
            "BOOK" => EntryStatus::Book,
            "PDNG" => EntryStatus::Pdng,
            "INFO" => EntryStatus::Info,
            other => EntryStatus::Other(other.to_string()),
        }
    }
}

/// Balance type code (`Bal/Tp/CdOrPrtry/Cd`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceType {
    /// Opening booked.
    Opbd,
    /// Closing booked.
    Clbd,
    /// Interim booked.
    Itbd,
    /// Closing available.
    Clav,
    /// Forward available.
    Fwav,
    /// Previously closed booked.
    Prcd,
    Other(String),
}

impl BalanceType {
    /// Parse a balance code. A missing code is read as opening booked.
    pub fn from_code(code: &str) -> Self {
        match code {
            "" | "OPBD" => BalanceType::Opbd,
            "CLBD" => BalanceType::Clbd,
            "ITBD" => BalanceType::Itbd,
            "CLAV" => BalanceType::Clav,
            "FWAV" => BalanceType::Fwav,
            "PRCD" => BalanceType::Prcd,
            other => BalanceType::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            BalanceType::Opbd => "OPBD",
            BalanceType::Clbd => "CLBD",
            BalanceType::Itbd => "ITBD",
            BalanceType::Clav => "CLAV",
            BalanceType::Fwav => "FWAV",
            BalanceType::Prcd => "PRCD",
            BalanceType::Other(code) => code,
        }
    }
}

/// Account statement balance (`Bal`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub balance_type: BalanceType,
    pub credit_debit_indicator: CreditDebitCode,
    pub amount: Amount,
    /// `None` when the date is missing or could not be parsed.
    pub date: Option<NaiveDate>,
}

impl Balance {
    pub fn signed_amount(&self) -> Decimal {
        self.amount.signed(&self.credit_debit_indicator)
    }
}

/// Bank transaction code (`BkTxCd`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankTransactionCode {
    /// `Domn/Cd`
    pub domain: Option<String>,
    /// `Domn/Fmly/Cd`
    pub family: Option<String>,
    /// `Domn/Fmly/SubFmlyCd`
    pub sub_family: Option<String>,
    /// `Prtry/Cd`
    pub proprietary: Option<String>,
}

/// Party identification (`Dbtr`, `Cdtr`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyIdentification {
    pub name: Option<String>,
}

/// Non-IBAN account identification (`Id/Othr`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherAccountId {
    pub identification: String,
    pub scheme_name: Option<String>,
}

/// Account identification (`Acct`, `DbtrAcct`, `CdtrAcct`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountIdentification {
    pub iban: Option<String>,
    pub other: Option<OtherAccountId>,
    pub currency: Option<String>,
    pub name: Option<String>,
}

/// Related parties of a transaction (`RltdPties`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedParties {
    pub debtor: Option<PartyIdentification>,
    pub debtor_account: Option<AccountIdentification>,
    pub creditor: Option<PartyIdentification>,
    pub creditor_account: Option<AccountIdentification>,
}

/// Creditor reference (`Strd/CdtrRefInf`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditorReference {
    pub reference_type: Option<String>,
    pub reference: Option<String>,
}

/// Structured remittance information (`RmtInf/Strd`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredRemittance {
    pub creditor_reference: Option<CreditorReference>,
    pub additional_information: Vec<String>,
}

/// Remittance information (`RmtInf`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemittanceInformation {
    /// One item per `Ustrd` element.
    pub unstructured: Vec<String>,
    pub structured: Option<StructuredRemittance>,
}

/// Transaction references (`Refs`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionReferences {
    pub end_to_end_identification: Option<String>,
    pub mandate_identification: Option<String>,
}

/// One underlying customer transaction of an entry (`NtryDtls/TxDtls`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDetail {
    pub amount: Amount,
    pub credit_debit_indicator: CreditDebitCode,
    pub account_servicer_reference: Option<String>,
    pub bank_transaction_code: Option<BankTransactionCode>,
    pub related_parties: Option<RelatedParties>,
    pub remittance_information: Option<RemittanceInformation>,
    pub references: Option<TransactionReferences>,
}

/// Statement entry (`Ntry`).
///
/// An entry with details is one bank booking that decomposes into the
/// customer transactions listed in `entry_details`; an entry without details
/// is itself the transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub amount: Amount,
    pub credit_debit_indicator: CreditDebitCode,
    pub status: EntryStatus,
    pub booking_date: Option<NaiveDate>,
    pub value_date: Option<NaiveDate>,
    pub account_servicer_reference: Option<String>,
    pub bank_transaction_code: Option<BankTransactionCode>,
    pub additional_entry_information: Option<String>,
    pub entry_details: Option<Vec<EntryDetail>>,
}

impl Entry {
    pub fn signed_amount(&self) -> Decimal {
        self.amount.signed(&self.credit_debit_indicator)
    }
}

/// Account statement (`Stmt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub identification: String,
    pub electronic_sequence_number: Option<u64>,
    pub legal_sequence_number: Option<u64>,
    pub creation_date_time: Option<NaiveDateTime>,
    pub from_date_time: Option<NaiveDateTime>,
    pub to_date_time: Option<NaiveDateTime>,
    pub account: AccountIdentification,
    pub balances: Vec<Balance>,
    pub entries: Vec<Entry>,
}

impl Statement {
    /// First balance of the given type, if any.
    pub fn balance(&self, balance_type: &BalanceType) -> Option<&Balance> {
        self.balances.iter().find(|b| &b.balance_type == balance_type)
    }
}

/// Group header (`GrpHdr`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupHeader {
    pub message_identification: String,
    pub creation_date_time: Option<NaiveDateTime>,
    pub additional_information: Option<String>,
}

/// A parsed CAMT.053 document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub group_header: GroupHeader,
    pub statements: Vec<Statement>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_signed_amount() {
        let amount = Amount {
            value: Decimal::from_str("12.50").unwrap(),
            currency: "EUR".into(),
        };
        assert_eq!(
            amount.signed(&CreditDebitCode::Debit),
            Decimal::from_str("-12.50").unwrap()
        );
        assert_eq!(amount.signed(&CreditDebitCode::Credit), amount.value);
        assert_eq!(
            amount.signed(&CreditDebitCode::Other("XXXX".into())),
            -amount.value
        );
    }

    #[test]
    fn test_balance_type_codes() {
        assert_eq!(BalanceType::from_code(""), BalanceType::Opbd);
        assert_eq!(BalanceType::from_code("CLAV"), BalanceType::Clav);
        assert_eq!(
            BalanceType::from_code("OPAV"),
            BalanceType::Other("OPAV".into())
        );
        assert_eq!(BalanceType::Other("OPAV".into()).code(), "OPAV");
    }

    #[test]
    fn test_credit_debit_code_display() {
        assert_eq!(CreditDebitCode::from_code("DBIT").to_string(), "DBIT");
        assert_eq!(CreditDebitCode::from_code("").to_string(), "");
    }
}
