//! CAMT.053 (ISO 20022) parser.
//!
//! CAMT.053 is an XML-based bank-to-customer account statement format
//! defined by the ISO 20022 standard. Files seen in the wild differ in
//! namespace usage, schema version and the container element, so the parser
//! walks a namespace-agnostic tree (see [`crate::xml`]) and treats missing
//! optional elements as absent rather than as errors.

use crate::camt053::{
    AccountIdentification, Amount, Balance, BalanceType, BankTransactionCode, CreditDebitCode,
    CreditorReference, Document, Entry, EntryDetail, EntryStatus, GroupHeader, OtherAccountId,
    PartyIdentification, RelatedParties, RemittanceInformation, Statement, StructuredRemittance,
    TransactionReferences,
};
use crate::error::{Error, Result};
use crate::xml::{self, Element};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::str::FromStr;

/// Tolerance used when reconciling balances against entries.
const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Report structural gaps in the group header as errors instead of warnings.
    pub strict_mode: bool,
    /// Reconcile opening + entries against closing balance and warn on mismatch.
    pub validate_balances: bool,
    /// Read `NtryDtls/TxDtls` into [`EntryDetail`]s.
    pub parse_nested_transactions: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            validate_balances: true,
            parse_nested_transactions: true,
        }
    }
}

/// Outcome of [`Camt053Parser::parse`].
///
/// `errors` and `warnings` are `None` when there is nothing to report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub success: bool,
    pub data: Option<Document>,
    pub errors: Option<Vec<String>>,
    pub warnings: Option<Vec<String>>,
}

/// Errors and warnings collected during a single parse.
#[derive(Debug, Default)]
struct Diagnostics {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Diagnostics {
    fn error(&mut self, message: String) {
        warn!("CAMT error: {}", message);
        self.errors.push(message);
    }

    fn warning(&mut self, message: String) {
        warn!("CAMT warning: {}", message);
        self.warnings.push(message);
    }

    fn finish(self, data: Option<Document>) -> ParseResult {
        ParseResult {
            success: self.errors.is_empty(),
            data,
            errors: Some(self.errors).filter(|e| !e.is_empty()),
            warnings: Some(self.warnings).filter(|w| !w.is_empty()),
        }
    }
}

/// Parse `xml` with the given configuration.
pub fn parse(xml: &str, config: &ParserConfig) -> ParseResult {
    Camt053Parser::new(config.clone()).parse(xml)
}

/// CAMT.053 parser. Holds only its configuration, so one instance can be
/// shared between threads and reused for any number of documents.
#[derive(Debug, Clone, Default)]
pub struct Camt053Parser {
    config: ParserConfig,
}

impl Camt053Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a CAMT.053 document from any source implementing `Read`.
    ///
    /// Only I/O failures are returned as `Err`; everything about the document
    /// itself is reported through the [`ParseResult`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::fs::File;
    /// use camt2mt940::camt053_format::Camt053Parser;
    ///
    /// let mut file = File::open("statement.xml")?;
    /// let result = Camt053Parser::default().from_read(&mut file)?;
    /// println!("parsed: {}", result.success);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_read<R: Read>(&self, reader: &mut R) -> Result<ParseResult> {
        let mut xml_content = String::new();
        reader.read_to_string(&mut xml_content)?;
        Ok(self.parse(&xml_content))
    }

    /// Parse a CAMT.053 document held in a string.
    pub fn parse(&self, xml_string: &str) -> ParseResult {
        let mut diagnostics = Diagnostics::default();

        let root = match xml::parse_document(xml_string) {
            Ok(root) => root,
            Err(e) => {
                diagnostics.error(e.to_string());
                return diagnostics.finish(None);
            }
        };

        match self.parse_document(&root, &mut diagnostics) {
            Ok(document) => {
                if self.config.validate_balances {
                    validate_balances(&document, &mut diagnostics);
                }
                debug!(
                    "Parsed CAMT document {} with {} statement(s)",
                    document.group_header.message_identification,
                    document.statements.len()
                );
                diagnostics.finish(Some(document))
            }
            Err(e) => {
                diagnostics.error(format!("Parse error: {}", e));
                diagnostics.finish(None)
            }
        }
    }

    fn parse_document(&self, root: &Element, diag: &mut Diagnostics) -> Result<Document> {
        // Statements usually sit in <BkToCstmrStmt>; some producers use the
        // report container or put everything directly under the root.
        let container = root
            .child("BkToCstmrStmt")
            .or_else(|| root.child("BkToCstmrAcctRpt"))
            .unwrap_or(root);

        let grp_hdr = container.child("GrpHdr").ok_or(Error::MissingGroupHeader)?;
        let group_header = self.parse_group_header(grp_hdr, diag);

        let statements = container
            .children_named("Stmt")
            .map(|stmt| self.parse_statement(stmt, diag))
            .collect();

        Ok(Document {
            group_header,
            statements,
        })
    }

    fn parse_group_header(&self, node: &Element, diag: &mut Diagnostics) -> GroupHeader {
        let message_identification = node.text_at("MsgId");
        if message_identification.is_empty() {
            self.structural_gap(diag, "Group header: MsgId is missing".to_string());
        }

        let cre_dt_tm = node.text_at("CreDtTm");
        if cre_dt_tm.is_empty() {
            self.structural_gap(diag, "Group header: CreDtTm is missing".to_string());
        }

        GroupHeader {
            message_identification,
            creation_date_time: date_time_value(&cre_dt_tm, "GrpHdr/CreDtTm", diag),
            additional_information: node.opt_text_at("AddtlInf"),
        }
    }

    fn structural_gap(&self, diag: &mut Diagnostics, message: String) {
        if self.config.strict_mode {
            diag.error(message);
        } else {
            diag.warning(message);
        }
    }

    fn parse_statement(&self, node: &Element, diag: &mut Diagnostics) -> Statement {
        let identification = node.text_at("Id");

        Statement {
            electronic_sequence_number: sequence_number(node, "ElctrncSeqNb", &identification, diag),
            legal_sequence_number: sequence_number(node, "LglSeqNb", &identification, diag),
            creation_date_time: date_time_value(&node.text_at("CreDtTm"), "Stmt/CreDtTm", diag),
            from_date_time: date_time_value(&node.text_at("FrToDt/FrDtTm"), "FrToDt/FrDtTm", diag),
            to_date_time: date_time_value(&node.text_at("FrToDt/ToDtTm"), "FrToDt/ToDtTm", diag),
            account: node.child("Acct").map(parse_account).unwrap_or_default(),
            balances: node
                .children_named("Bal")
                .map(|bal| parse_balance(bal, diag))
                .collect(),
            entries: node
                .children_named("Ntry")
                .map(|entry| self.parse_entry(entry, diag))
                .collect(),
            identification,
        }
    }

    fn parse_entry(&self, node: &Element, diag: &mut Diagnostics) -> Entry {
        let credit_debit_indicator = CreditDebitCode::from_code(&node.text_at("CdtDbtInd"));

        let entry_details = if self.config.parse_nested_transactions {
            let details: Vec<EntryDetail> = node
                .children_named("NtryDtls")
                .flat_map(|dtls| dtls.children_named("TxDtls"))
                .map(|tx| parse_entry_detail(tx, &credit_debit_indicator, diag))
                .collect();
            Some(details).filter(|d| !d.is_empty())
        } else {
            None
        };

        Entry {
            amount: amount_at(node, "Amt", diag),
            // Newer schema versions nest the code as <Sts><Cd>BOOK</Cd></Sts>;
            // the text of <Sts> covers both layouts.
            status: EntryStatus::from_code(&node.text_at("Sts")),
            booking_date: date_choice(node, "BookgDt", diag),
            value_date: date_choice(node, "ValDt", diag),
            account_servicer_reference: node.opt_text_at("AcctSvcrRef"),
            bank_transaction_code: node.child("BkTxCd").map(parse_bank_transaction_code),
            additional_entry_information: node.opt_text_at("AddtlNtryInf"),
            entry_details,
            credit_debit_indicator,
        }
    }
}

fn parse_entry_detail(
    node: &Element,
    entry_indicator: &CreditDebitCode,
    diag: &mut Diagnostics,
) -> EntryDetail {
    let amount = if node.child("Amt").is_some() {
        amount_at(node, "Amt", diag)
    } else {
        amount_at(node, "AmtDtls/TxAmt/Amt", diag)
    };

    let credit_debit_indicator = match node.opt_text_at("CdtDbtInd") {
        Some(code) => CreditDebitCode::from_code(&code),
        None => entry_indicator.clone(),
    };

    let debtor = node.find("RltdPties/Dbtr").map(parse_party);
    let debtor_account = node.find("RltdPties/DbtrAcct").map(parse_account);
    let creditor = node.find("RltdPties/Cdtr").map(parse_party);
    let creditor_account = node.find("RltdPties/CdtrAcct").map(parse_account);
    let related_parties = if debtor.is_some()
        || debtor_account.is_some()
        || creditor.is_some()
        || creditor_account.is_some()
    {
        Some(RelatedParties {
            debtor,
            debtor_account,
            creditor,
            creditor_account,
        })
    } else {
        None
    };

    let references = node.child("Refs").map(|refs| TransactionReferences {
        end_to_end_identification: refs.opt_text_at("EndToEndId"),
        mandate_identification: refs.opt_text_at("MndtId"),
    });

    EntryDetail {
        amount,
        credit_debit_indicator,
        account_servicer_reference: node.opt_text_at("Refs/AcctSvcrRef"),
        bank_transaction_code: node.child("BkTxCd").map(parse_bank_transaction_code),
        related_parties,
        remittance_information: node.child("RmtInf").map(parse_remittance_information),
        references,
    }
}

fn parse_balance(node: &Element, diag: &mut Diagnostics) -> Balance {
    Balance {
        balance_type: BalanceType::from_code(&node.text_at("Tp/CdOrPrtry/Cd")),
        credit_debit_indicator: CreditDebitCode::from_code(&node.text_at("CdtDbtInd")),
        amount: amount_at(node, "Amt", diag),
        date: date_choice(node, "Dt", diag),
    }
}

fn parse_account(node: &Element) -> AccountIdentification {
    AccountIdentification {
        iban: node.opt_text_at("Id/IBAN"),
        other: node.find("Id/Othr").map(|othr| OtherAccountId {
            identification: othr.text_at("Id"),
            scheme_name: othr.opt_text_at("SchmeNm/Cd"),
        }),
        currency: node.opt_text_at("Ccy"),
        name: node.opt_text_at("Nm"),
    }
}

fn parse_party(node: &Element) -> PartyIdentification {
    // camt.053.001.08 moved the name into <Pty>.
    PartyIdentification {
        name: node.opt_text_at("Nm").or_else(|| node.opt_text_at("Pty/Nm")),
    }
}

fn parse_bank_transaction_code(node: &Element) -> BankTransactionCode {
    BankTransactionCode {
        domain: node.opt_text_at("Domn/Cd"),
        family: node.opt_text_at("Domn/Fmly/Cd"),
        sub_family: node.opt_text_at("Domn/Fmly/SubFmlyCd"),
        proprietary: node.opt_text_at("Prtry/Cd"),
    }
}

fn parse_remittance_information(node: &Element) -> RemittanceInformation {
    RemittanceInformation {
        unstructured: node.children_named("Ustrd").map(Element::text).collect(),
        structured: node.child("Strd").map(|strd| StructuredRemittance {
            creditor_reference: strd.child("CdtrRefInf").map(|cdtr_ref| CreditorReference {
                reference_type: cdtr_ref.opt_text_at("Tp/CdOrPrtry/Cd"),
                reference: cdtr_ref.opt_text_at("Ref"),
            }),
            additional_information: strd.children_named("AddtlRmtInf").map(Element::text).collect(),
        }),
    }
}

/// Amount at `path` with its `Ccy` attribute; `0 EUR` when the element is missing.
fn amount_at(node: &Element, path: &str, diag: &mut Diagnostics) -> Amount {
    let Some(amt) = node.find(path) else {
        return Amount::default();
    };

    let text = amt.text();
    let value = match Decimal::from_str(&text) {
        Ok(value) => value,
        Err(_) => {
            diag.warning(Error::InvalidAmount(text).to_string());
            Decimal::ZERO
        }
    };

    Amount {
        value,
        currency: amt
            .attribute("Ccy")
            .filter(|ccy| !ccy.is_empty())
            .unwrap_or("EUR")
            .to_string(),
    }
}

fn sequence_number(
    node: &Element,
    path: &str,
    statement: &str,
    diag: &mut Diagnostics,
) -> Option<u64> {
    let text = node.opt_text_at(path)?;
    match text.parse() {
        Ok(number) => Some(number),
        Err(_) => {
            diag.warning(format!(
                "Statement {}: {} is not a number: {}",
                statement, path, text
            ));
            None
        }
    }
}

/// Date of a `<Dt>`/`<DtTm>` choice element such as `BookgDt` or `Bal/Dt`.
fn date_choice(node: &Element, path: &str, diag: &mut Diagnostics) -> Option<NaiveDate> {
    let choice = node.find(path)?;
    if let Some(date) = choice.opt_text_at("Dt") {
        return date_value(&date, path, diag);
    }
    let date_time = choice.opt_text_at("DtTm")?;
    date_time_value(&date_time, path, diag).map(|dt| dt.date())
}

fn date_value(text: &str, field: &str, diag: &mut Diagnostics) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }
    let parsed = parse_date(text);
    if parsed.is_none() {
        diag.warning(Error::InvalidDate(format!("{} in {}", text, field)).to_string());
    }
    parsed
}

fn date_time_value(text: &str, field: &str, diag: &mut Diagnostics) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }
    let parsed = parse_date_time(text);
    if parsed.is_none() {
        diag.warning(Error::InvalidDate(format!("{} in {}", text, field)).to_string());
    }
    parsed
}

/// Lenient calendar date parser: ISO date, or the date part of a date-time.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_date_time(value).map(|dt| dt.date()))
}

/// Lenient date-time parser.
///
/// Accepts RFC 3339 with offset (kept as the local wall-clock time),
/// `YYYY-MM-DDTHH:MM:SS[.fff]` and a bare date (midnight).
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn validate_balances(document: &Document, diag: &mut Diagnostics) {
    for stmt in &document.statements {
        let opening = stmt.balance(&BalanceType::Opbd);
        let closing = stmt.balance(&BalanceType::Clbd);

        if opening.is_none() {
            diag.warning(format!(
                "Statement {}: No opening balance found",
                stmt.identification
            ));
        }
        if closing.is_none() {
            diag.warning(format!(
                "Statement {}: No closing balance found",
                stmt.identification
            ));
        }

        if let (Some(opening), Some(closing)) = (opening, closing) {
            // The opening balance is negative only when explicitly marked DBIT.
            let opening_amount = if opening.credit_debit_indicator.is_debit() {
                -opening.amount.value
            } else {
                opening.amount.value
            };
            let calculated = stmt
                .entries
                .iter()
                .fold(opening_amount, |sum, entry| sum + entry.signed_amount());
            let expected = closing.signed_amount();

            if (calculated - expected).abs() > BALANCE_TOLERANCE {
                diag.warning(format!(
                    "Statement {}: Balance mismatch. Expected {}, calculated {}",
                    stmt.identification, expected, calculated
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;

    fn statement_xml(balances: &str, entries: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.02">
  <BkToCstmrStmt>
    <GrpHdr>
      <MsgId>MSG-1</MsgId>
      <CreDtTm>2024-01-02T08:30:00</CreDtTm>
    </GrpHdr>
    <Stmt>
      <Id>STMT-1</Id>
      <ElctrncSeqNb>7</ElctrncSeqNb>
      <CreDtTm>2024-01-02T08:30:00</CreDtTm>
      <Acct><Id><IBAN>DE89370400440532013000</IBAN></Id><Ccy>EUR</Ccy></Acct>
      {balances}
      {entries}
    </Stmt>
  </BkToCstmrStmt>
</Document>"#
        )
    }

    fn balance(code: &str, ind: &str, amount: &str) -> String {
        format!(
            r#"<Bal><Tp><CdOrPrtry><Cd>{code}</Cd></CdOrPrtry></Tp><Amt Ccy="EUR">{amount}</Amt><CdtDbtInd>{ind}</CdtDbtInd><Dt><Dt>2024-01-01</Dt></Dt></Bal>"#
        )
    }

    fn entry(ind: &str, amount: &str) -> String {
        format!(
            r#"<Ntry><Amt Ccy="EUR">{amount}</Amt><CdtDbtInd>{ind}</CdtDbtInd><Sts>BOOK</Sts><BookgDt><Dt>2024-01-01</Dt></BookgDt></Ntry>"#
        )
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2023-04-20T23:24:31").unwrap();
        assert_eq!(date.year(), 2023);
        assert_eq!(date.month(), 4);
        assert_eq!(date.day(), 20);
        assert!(parse_date("20.04.2023").is_none());
    }

    #[test]
    fn test_parse_date_time_variants() {
        let with_offset = parse_date_time("2024-03-05T10:15:00+01:00").unwrap();
        assert_eq!(with_offset.hour(), 10);
        let fractional = parse_date_time("2024-03-05T10:15:00.123").unwrap();
        assert_eq!(fractional.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        let date_only = parse_date_time("2024-03-05").unwrap();
        assert_eq!(date_only.hour(), 0);
        assert!(parse_date_time("yesterday").is_none());
    }

    #[test]
    fn test_balanced_statement_has_no_warnings() {
        let xml = statement_xml(
            &format!("{}{}", balance("OPBD", "CRDT", "1000.00"), balance("CLBD", "CRDT", "1400.00")),
            &format!("{}{}", entry("CRDT", "500.00"), entry("DBIT", "100.00")),
        );
        let result = parse(&xml, &ParserConfig::default());

        assert!(result.success);
        assert_eq!(result.errors, None);
        assert_eq!(result.warnings, None);
        let doc = result.data.unwrap();
        assert_eq!(doc.group_header.message_identification, "MSG-1");
        assert_eq!(doc.statements[0].electronic_sequence_number, Some(7));
        assert_eq!(doc.statements[0].entries.len(), 2);
    }

    #[test]
    fn test_balance_mismatch_is_a_warning() {
        let xml = statement_xml(
            &format!("{}{}", balance("OPBD", "CRDT", "1000.00"), balance("CLBD", "CRDT", "2000.00")),
            &entry("CRDT", "500.00"),
        );
        let result = parse(&xml, &ParserConfig::default());

        assert!(result.success);
        assert!(result.data.is_some());
        assert_eq!(
            result.warnings,
            Some(vec![
                "Statement STMT-1: Balance mismatch. Expected 2000.00, calculated 1500.00".to_string()
            ])
        );
    }

    #[test]
    fn test_debit_opening_balance_is_negative() {
        let xml = statement_xml(
            &format!("{}{}", balance("OPBD", "DBIT", "100.00"), balance("CLBD", "CRDT", "400.00")),
            &entry("CRDT", "500.00"),
        );
        let result = parse(&xml, &ParserConfig::default());
        assert_eq!(result.warnings, None);
    }

    #[test]
    fn test_unknown_indicator_reconciles_as_debit() {
        let xml = statement_xml(
            &format!("{}{}", balance("OPBD", "CRDT", "1000.00"), balance("CLBD", "CRDT", "900.00")),
            &entry("XXXX", "100.00"),
        );
        assert_eq!(parse(&xml, &ParserConfig::default()).warnings, None);

        let closing_unknown = statement_xml(
            &format!("{}{}", balance("OPBD", "CRDT", "100.00"), balance("CLBD", "XXXX", "100.00")),
            "",
        );
        assert_eq!(
            parse(&closing_unknown, &ParserConfig::default()).warnings,
            Some(vec![
                "Statement STMT-1: Balance mismatch. Expected -100.00, calculated 100.00".to_string()
            ])
        );
    }

    #[test]
    fn test_unknown_opening_indicator_stays_positive() {
        let xml = statement_xml(
            &format!("{}{}", balance("OPBD", "XXXX", "100.00"), balance("CLBD", "CRDT", "600.00")),
            &entry("CRDT", "500.00"),
        );
        assert_eq!(parse(&xml, &ParserConfig::default()).warnings, None);
    }

    #[test]
    fn test_missing_balances_warn_only_when_validating() {
        let xml = statement_xml(&balance("ITBD", "CRDT", "10.00"), "");

        let result = parse(&xml, &ParserConfig::default());
        assert!(result.success);
        assert_eq!(
            result.warnings,
            Some(vec![
                "Statement STMT-1: No opening balance found".to_string(),
                "Statement STMT-1: No closing balance found".to_string(),
            ])
        );

        let lenient = ParserConfig {
            validate_balances: false,
            ..ParserConfig::default()
        };
        assert_eq!(parse(&xml, &lenient).warnings, None);
    }

    #[test]
    fn test_malformed_xml_fails_without_data() {
        let result = parse("<Document><BkToCstmrStmt></Document>", &ParserConfig::default());
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.errors.as_ref().map(Vec::len), Some(1));
        assert!(result.errors.unwrap()[0].starts_with("XML parsing error"));
    }

    #[test]
    fn test_missing_group_header_is_fatal() {
        let result = parse(
            "<Document><BkToCstmrStmt><Stmt><Id>X</Id></Stmt></BkToCstmrStmt></Document>",
            &ParserConfig::default(),
        );
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(
            result.errors,
            Some(vec!["Parse error: Group header not found".to_string()])
        );
    }

    #[test]
    fn test_strict_mode_turns_header_gaps_into_errors() {
        let xml = "<Document><GrpHdr><CreDtTm>2024-01-01T00:00:00</CreDtTm></GrpHdr></Document>";

        let lenient = parse(xml, &ParserConfig::default());
        assert!(lenient.success);
        assert_eq!(
            lenient.warnings,
            Some(vec!["Group header: MsgId is missing".to_string()])
        );

        let strict = parse(
            xml,
            &ParserConfig {
                strict_mode: true,
                ..ParserConfig::default()
            },
        );
        assert!(!strict.success);
        assert!(strict.data.is_some());
        assert_eq!(strict.errors, Some(vec!["Group header: MsgId is missing".to_string()]));
    }

    #[test]
    fn test_root_container_fallback() {
        let xml = "<Document><GrpHdr><MsgId>M</MsgId><CreDtTm>2024-01-01</CreDtTm></GrpHdr><Stmt><Id>S</Id></Stmt></Document>";
        let doc = parse(xml, &ParserConfig::default()).data.unwrap();
        assert_eq!(doc.statements.len(), 1);
        assert_eq!(doc.statements[0].identification, "S");
    }

    #[test]
    fn test_account_report_container() {
        let xml = "<Document><BkToCstmrAcctRpt><GrpHdr><MsgId>M</MsgId><CreDtTm>2024-01-01</CreDtTm></GrpHdr><Stmt><Id>RPT-1</Id></Stmt><Stmt><Id>RPT-2</Id></Stmt></BkToCstmrAcctRpt></Document>";
        let result = parse(xml, &ParserConfig::default());
        assert!(result.success);
        let doc = result.data.unwrap();
        assert_eq!(doc.group_header.message_identification, "M");
        let ids: Vec<&str> = doc.statements.iter().map(|s| s.identification.as_str()).collect();
        assert_eq!(ids, vec!["RPT-1", "RPT-2"]);
    }

    #[test]
    fn test_statement_container_preferred_over_account_report() {
        let xml = "<Document>\
            <BkToCstmrAcctRpt><GrpHdr><MsgId>RPT</MsgId><CreDtTm>2024-01-01</CreDtTm></GrpHdr><Stmt><Id>FROM-RPT</Id></Stmt></BkToCstmrAcctRpt>\
            <BkToCstmrStmt><GrpHdr><MsgId>STMT</MsgId><CreDtTm>2024-01-01</CreDtTm></GrpHdr><Stmt><Id>FROM-STMT</Id></Stmt></BkToCstmrStmt>\
            </Document>";
        let doc = parse(xml, &ParserConfig::default()).data.unwrap();
        assert_eq!(doc.group_header.message_identification, "STMT");
        assert_eq!(doc.statements.len(), 1);
        assert_eq!(doc.statements[0].identification, "FROM-STMT");
    }

    #[test]
    fn test_missing_amount_defaults_to_zero_eur() {
        let xml = statement_xml("", "<Ntry><CdtDbtInd>CRDT</CdtDbtInd><Sts>BOOK</Sts></Ntry>");
        let doc = parse(&xml, &ParserConfig::default()).data.unwrap();
        assert_eq!(doc.statements[0].entries[0].amount, Amount::default());
    }

    #[test]
    fn test_invalid_date_degrades_to_none_with_warning() {
        let xml = statement_xml(
            "",
            r#"<Ntry><Amt Ccy="EUR">1.00</Amt><CdtDbtInd>CRDT</CdtDbtInd><Sts>BOOK</Sts><BookgDt><Dt>2024-13-45</Dt></BookgDt></Ntry>"#,
        );
        let config = ParserConfig {
            validate_balances: false,
            ..ParserConfig::default()
        };
        let result = parse(&xml, &config);
        assert!(result.success);
        assert_eq!(result.data.unwrap().statements[0].entries[0].booking_date, None);
        assert_eq!(
            result.warnings,
            Some(vec!["Invalid date: 2024-13-45 in BookgDt".to_string()])
        );
    }

    #[test]
    fn test_nested_transactions() {
        let ntry = r#"<Ntry>
  <Amt Ccy="EUR">300.00</Amt><CdtDbtInd>CRDT</CdtDbtInd><Sts><Cd>BOOK</Cd></Sts>
  <BookgDt><DtTm>2024-01-01T12:00:00</DtTm></BookgDt>
  <NtryDtls>
    <TxDtls>
      <Refs><EndToEndId>E2E-1</EndToEndId><MndtId>M-1</MndtId></Refs>
      <AmtDtls><TxAmt><Amt Ccy="EUR">100.00</Amt></TxAmt></AmtDtls>
      <RltdPties><Dbtr><Pty><Nm>Jane Doe</Nm></Pty></Dbtr><DbtrAcct><Id><IBAN>FR1420041010050500013M02606</IBAN></Id></DbtrAcct></RltdPties>
      <RmtInf><Ustrd>Part one</Ustrd><Ustrd>Part two</Ustrd><Strd><CdtrRefInf><Ref>RF18539007547034</Ref></CdtrRefInf></Strd></RmtInf>
    </TxDtls>
    <TxDtls><Amt Ccy="EUR">200.00</Amt><CdtDbtInd>CRDT</CdtDbtInd></TxDtls>
  </NtryDtls>
</Ntry>"#;
        let xml = statement_xml("", ntry);
        let doc = parse(&xml, &ParserConfig::default()).data.unwrap();
        let entry = &doc.statements[0].entries[0];

        assert_eq!(entry.status, EntryStatus::Book);
        assert_eq!(entry.booking_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        let details = entry.entry_details.as_ref().unwrap();
        assert_eq!(details.len(), 2);

        let first = &details[0];
        assert_eq!(first.amount.value, Decimal::from_str("100.00").unwrap());
        assert_eq!(first.credit_debit_indicator, CreditDebitCode::Credit);
        let parties = first.related_parties.as_ref().unwrap();
        assert_eq!(parties.debtor.as_ref().unwrap().name.as_deref(), Some("Jane Doe"));
        let rmt = first.remittance_information.as_ref().unwrap();
        assert_eq!(rmt.unstructured, vec!["Part one", "Part two"]);
        assert_eq!(
            rmt.structured.as_ref().unwrap().creditor_reference.as_ref().unwrap().reference.as_deref(),
            Some("RF18539007547034")
        );
        assert_eq!(
            first.references.as_ref().unwrap().end_to_end_identification.as_deref(),
            Some("E2E-1")
        );

        let flat = ParserConfig {
            parse_nested_transactions: false,
            ..ParserConfig::default()
        };
        let doc = parse(&xml, &flat).data.unwrap();
        assert_eq!(doc.statements[0].entries[0].entry_details, None);
    }

    #[test]
    fn test_parser_config_partial_input_uses_defaults() {
        let config: ParserConfig =
            quick_xml::de::from_str("<ParserConfig><strict_mode>true</strict_mode></ParserConfig>")
                .unwrap();
        assert_eq!(
            config,
            ParserConfig {
                strict_mode: true,
                ..ParserConfig::default()
            }
        );

        let xml = quick_xml::se::to_string(&config).unwrap();
        assert_eq!(quick_xml::de::from_str::<ParserConfig>(&xml).unwrap(), config);
    }

    #[test]
    fn test_from_read() {
        let xml = statement_xml(&balance("OPBD", "CRDT", "0"), "");
        let result = Camt053Parser::default()
            .from_read(&mut xml.as_bytes())
            .unwrap();
        assert!(result.data.is_some());
    }
}
