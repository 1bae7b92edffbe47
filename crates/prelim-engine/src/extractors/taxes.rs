//! Tax parcels, tax defaults and other assessments

use lazy_static::lazy_static;
use prelim_types::{
    InstallmentStatus, Money, OtherAssessment, RedemptionEntry, Stated, TaxDefault, TaxParcel,
};
use regex::Regex;

use crate::patterns::{
    contains_any, explicit_installment_status, first_sentence, first_token, money_from_value,
    scan_labeled_fields, stated_text, LabeledFields, MONEY,
};

lazy_static! {
    /// `Amount: $1,250.00, by March 2026`
    static ref REDEMPTION: Regex = Regex::new(
        r"(?i)amount\s*:\s*(\$\d[\d,]*\.\d{2})\s*,?\s*(?:due\s+by|on\s+or\s+before|by|through|until)\s+((?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?(?:\s+\d{1,2},?)?\s+\d{4}|\d{1,2}/\d{1,2}/\d{2,4})"
    )
    .unwrap();

    /// `Default No.: 19-0001234`
    pub static ref DEFAULT_NUMBER_LABEL: Regex =
        Regex::new(r"(?i)default\s+(?:no\.?|number)\s*:").unwrap();

    /// `fiscal year 2025-2026`, `2025-26`
    static ref FISCAL_YEAR: Regex = Regex::new(r"\b(\d{4}\s*-\s*\d{2,4})\b").unwrap();
}

const TAX_ID: &[&str] = &[
    "tax id",
    "tax identification no",
    "tax identification number",
    "apn",
    "parcel no",
    "parcel number",
    "assessor's parcel no",
    "assessor's parcel number",
];
const FIRST_INSTALLMENT: &[&str] = &["1st installment", "first installment"];
const SECOND_INSTALLMENT: &[&str] = &["2nd installment", "second installment"];
const EXEMPTION: &[&str] = &[
    "homeowners exemption",
    "homeowner exemption",
    "homeowner's exemption",
    "homeowners' exemption",
    "exemption",
];
const AMOUNT: &[&str] = &["amount", "amount due", "total amount"];

/// Language that signals a prior-year tax default
pub const DEFAULT_PHRASES: &[&str] = &[
    "defaulted",
    "tax default",
    "tax-defaulted",
    "redemption",
    "redeem",
];

/// Assessment kinds, checked in order against lowercased text
const ASSESSMENT_KINDS: &[(&[&str], &str)] = &[
    (
        &["community facilities district", "mello-roos", "mello roos"],
        "Community Facilities District",
    ),
    (&["supplemental"], "Supplemental Taxes"),
    (&["special assessment", "assessment district"], "Special Assessment"),
    (&["improvement bond", "bond act", "bond"], "Improvement Bond"),
];

pub fn is_assessment(lower: &str) -> bool {
    ASSESSMENT_KINDS
        .iter()
        .any(|(keywords, _)| contains_any(lower, keywords))
}

/// Redemption entries in source order
pub fn parse_redemption_schedule(text: &str) -> Vec<RedemptionEntry> {
    REDEMPTION
        .captures_iter(text)
        .filter_map(|caps| {
            Some(RedemptionEntry {
                amount: Stated::Value(caps.get(1)?.as_str().to_string()),
                due_by: Stated::Value(caps.get(2)?.as_str().trim().to_string()),
            })
        })
        .collect()
}

pub fn has_redemption_schedule(text: &str) -> bool {
    REDEMPTION.is_match(text)
}

/// Status of one installment.
///
/// An explicit word wins. A stated amount without one is `OPEN`; a label
/// whose value is unreadable is `UNCLEAR`; no label at all is `NOT_STATED`.
fn installment_status(value: Option<&str>, amount: &Money) -> Stated<InstallmentStatus> {
    if stated_text(value).is_not_stated() {
        return Stated::NotStated;
    }
    if let Some(status) = value.and_then(explicit_installment_status) {
        return Stated::Value(status);
    }
    if amount.is_value() {
        Stated::Value(InstallmentStatus::Open)
    } else {
        Stated::Unclear
    }
}

/// Build a parcel from already-scanned fields
pub fn parcel_from_fields(fields: &LabeledFields, text: &str, item_number: Option<u32>) -> TaxParcel {
    let first_value = fields.first(FIRST_INSTALLMENT);
    let second_value = fields.first(SECOND_INSTALLMENT);
    let first_installment_amount = money_from_value(first_value);
    let second_installment_amount = money_from_value(second_value);

    let fiscal_year = match fields.first(&["fiscal year"]) {
        Some(value) => stated_text(Some(value)),
        None => FISCAL_YEAR
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| Stated::Value(m.as_str().replace(' ', "")))
            .unwrap_or(Stated::NotStated),
    };

    TaxParcel {
        item_number,
        tax_id: first_token(fields.first(TAX_ID)),
        fiscal_year,
        first_installment_status: installment_status(first_value, &first_installment_amount),
        first_installment_amount,
        second_installment_status: installment_status(second_value, &second_installment_amount),
        second_installment_amount,
        penalty: money_from_value(fields.first(&["penalty"])),
        homeowner_exemption: money_from_value(fields.first(EXEMPTION)),
        code_area: first_token(fields.first(&["code area"])),
    }
}

pub fn parse_tax_parcel(text: &str, item_number: Option<u32>) -> TaxParcel {
    parcel_from_fields(&scan_labeled_fields(text), text, item_number)
}

pub fn parse_tax_default(text: &str, item_number: Option<u32>) -> TaxDefault {
    let fields = scan_labeled_fields(text);
    TaxDefault {
        item_number,
        default_number: first_token(fields.first(&["default no", "default number"])),
        parcel_id: first_token(fields.first(TAX_ID)).value().cloned(),
        message: first_sentence(text, 200),
        redemption_schedule: parse_redemption_schedule(text),
    }
}

pub fn parse_assessment(text: &str, item_number: Option<u32>) -> OtherAssessment {
    let lower = text.to_lowercase();
    let assessment_type = ASSESSMENT_KINDS
        .iter()
        .find(|(keywords, _)| contains_any(&lower, keywords))
        .map(|(_, label)| *label)
        .unwrap_or("Assessment");

    let fields = scan_labeled_fields(text);
    let amount = match fields.first(AMOUNT) {
        Some(value) => money_from_value(Some(value)),
        None => MONEY
            .find(text)
            .map(|m| Stated::Value(m.as_str().to_string()))
            .unwrap_or(Stated::NotStated),
    };

    OtherAssessment {
        item_number,
        assessment_type: assessment_type.to_string(),
        amount,
        details: first_sentence(text, 200),
    }
}
