//! Deeds of trust with their chain of title, HOA liens and foreclosure notices

use lazy_static::lazy_static;
use prelim_types::{
    ChainEntry, ForeclosureNotice, ForeclosureNoticeType, HoaLien, HoaLienStatus, LienRecord,
    Stated,
};
use regex::Regex;

use crate::patterns::{
    first_token, money_from_value, ordinal, scan_labeled_fields, stated_text, LabeledFields, DATE,
    MONEY, RECORDING_NUMBER,
};

lazy_static! {
    /// Where a deed-of-trust clause turns to a later instrument in its chain
    static ref CHAIN_MARKER: Regex = Regex::new(
        r"(?i)assignment\s+of\s+(?:the\s+)?beneficial\s+interest|substitution\s+of\s+trustee|notice\s+of\s+default|notice\s+of\s+trustee[’']?s\s+sale"
    )
    .unwrap();

    /// `to secure an indebtedness of $450,000.00`
    static ref INDEBTEDNESS: Regex =
        Regex::new(r"(?i)indebtedness\s+(?:in\s+the\s+(?:original\s+)?amount\s+)?of\s+(\$\d[\d,]*\.\d{2})\b").unwrap();

    /// An association name written out in prose
    static ref ASSOCIATION_NAME: Regex = Regex::new(
        r"\b((?:[A-Z][\w&'.-]*\s+)+(?:Homeowners['’]?|Owners['’]?|Community|Maintenance)\s+Association)\b"
    )
    .unwrap();
}

const RECORDING_NO: &[&str] = &[
    "recording no",
    "recording number",
    "instrument no",
    "instrument number",
    "document no",
    "document number",
];
const RECORDED: &[&str] = &["recording date", "recorded"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainSegment {
    Assignment,
    Substitution,
    NoticeOfDefault,
    NoticeOfSale,
}

impl ChainSegment {
    fn from_marker(marker: &str) -> Self {
        let lower = marker.to_lowercase();
        if lower.starts_with("assignment") {
            ChainSegment::Assignment
        } else if lower.starts_with("substitution") {
            ChainSegment::Substitution
        } else if lower.contains("default") {
            ChainSegment::NoticeOfDefault
        } else {
            ChainSegment::NoticeOfSale
        }
    }
}

/// Recording number and date of one instrument.
///
/// Prefers the labeled values; falls back to the shapes inside a
/// `Recorded: March 5, 2019 as Instrument No. 2019-0012345` value.
fn recording_of(fields: &LabeledFields) -> (Stated<String>, Stated<String>) {
    let recorded = fields.first(RECORDED);
    let number = match fields.first(RECORDING_NO) {
        Some(value) => first_token(Some(value)),
        None => recorded
            .and_then(|v| RECORDING_NUMBER.find(v))
            .map(|m| Stated::Value(m.as_str().to_string()))
            .unwrap_or(Stated::NotStated),
    };
    let date = match recorded {
        Some(value) => DATE
            .find(value)
            .map(|m| Stated::Value(m.as_str().to_string()))
            .unwrap_or(Stated::Unclear),
        None => Stated::NotStated,
    };
    (number, date)
}

fn sale_date_of(fields: &LabeledFields, text: &str) -> Stated<String> {
    match fields.first(&["date of sale", "sale date"]) {
        Some(value) => stated_text(Some(value)),
        None => DATE
            .find(text)
            .map(|m| Stated::Value(m.as_str().to_string()))
            .unwrap_or(Stated::NotStated),
    }
}

/// Parse a deed-of-trust clause. `index` is the lien's discovery order.
pub fn parse_deed_of_trust(text: &str, item_number: Option<u32>, index: usize) -> LienRecord {
    let markers: Vec<(usize, ChainSegment)> = CHAIN_MARKER
        .find_iter(text)
        .map(|m| (m.start(), ChainSegment::from_marker(m.as_str())))
        .collect();
    let base_end = markers.first().map(|m| m.0).unwrap_or(text.len());
    let base = &text[..base_end];
    let fields = scan_labeled_fields(base);

    let amount = match fields.first(&["amount", "original amount"]) {
        Some(value) => money_from_value(Some(value)),
        None => INDEBTEDNESS
            .captures(base)
            .and_then(|c| c.get(1))
            .map(|m| Stated::Value(m.as_str().to_string()))
            .unwrap_or(Stated::NotStated),
    };
    let (recording_number, recording_date) = recording_of(&fields);

    let mut lien = LienRecord {
        position: ordinal(index + 1),
        item_number,
        amount,
        beneficiary: stated_text(fields.first(&["beneficiary"])),
        trustor: stated_text(fields.first(&["trustor/grantor", "trustor", "grantor"])),
        trustee: stated_text(fields.first(&["trustee"])),
        dated: stated_text(fields.first(&["dated"])),
        recording_number,
        recording_date,
        ..LienRecord::default()
    };

    for (i, &(start, segment)) in markers.iter().enumerate() {
        let end = markers.get(i + 1).map(|m| m.0).unwrap_or(text.len());
        let body = &text[start..end];
        let fields = scan_labeled_fields(body);
        let (recording_number, recording_date) = recording_of(&fields);

        match segment {
            ChainSegment::Assignment => lien.assignments.push(ChainEntry {
                actor: stated_text(fields.first(&["assignee"])),
                recording_number,
                recording_date,
            }),
            ChainSegment::Substitution => lien.substitutions.push(ChainEntry {
                actor: stated_text(fields.first(&["trustee"])),
                recording_number,
                recording_date,
            }),
            ChainSegment::NoticeOfDefault => lien.has_notice_of_default = true,
            ChainSegment::NoticeOfSale => {
                lien.has_notice_of_trustee_sale = true;
                lien.sale_date.fill_from(sale_date_of(&fields, body));
            }
        }
    }

    lien
}

pub fn parse_hoa_lien(text: &str, item_number: Option<u32>) -> HoaLien {
    let fields = scan_labeled_fields(text);
    let lower = text.to_lowercase();

    let association_name = match fields.first(&["association", "claimant"]) {
        Some(value) => stated_text(Some(value)),
        None => ASSOCIATION_NAME
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| Stated::Value(m.as_str().trim().to_string()))
            .unwrap_or(Stated::NotStated),
    };
    let amount = match fields.first(&["amount due", "total amount", "amount"]) {
        Some(value) => money_from_value(Some(value)),
        None => MONEY
            .find(text)
            .map(|m| Stated::Value(m.as_str().to_string()))
            .unwrap_or(Stated::NotStated),
    };
    let status = if lower.contains("release") {
        HoaLienStatus::Released
    } else if lower.contains("delinquent") {
        HoaLienStatus::Delinquent
    } else {
        HoaLienStatus::Recorded
    };
    let (recording_number, recording_date) = recording_of(&fields);

    HoaLien {
        item_number,
        association_name,
        amount,
        status,
        recording_number,
        recording_date,
    }
}

/// What a standalone foreclosure clause says
#[derive(Debug, Clone, PartialEq)]
pub enum ForeclosureClause {
    Notice(ForeclosureNotice),
    /// A recorded notice of default; no sale scheduled
    DefaultOnly,
}

/// Classify a foreclosure clause: federal redemption right, then notice of
/// trustee's sale, then trustee's deed exception
pub fn parse_foreclosure(text: &str, item_number: Option<u32>) -> ForeclosureClause {
    let lower = text.to_lowercase().replace('’', "'");
    let notice_type = if lower.contains("right of redemption") && lower.contains("united states") {
        ForeclosureNoticeType::UsRedemption
    } else if lower.contains("notice of trustee's sale") || lower.contains("notice of trustee sale") {
        ForeclosureNoticeType::NoticeOfTrusteeSale
    } else if lower.contains("trustee's deed") || lower.contains("trustees deed") {
        ForeclosureNoticeType::TrusteesDeedException
    } else {
        return ForeclosureClause::DefaultOnly;
    };

    let fields = scan_labeled_fields(text);
    let sale_date = if notice_type == ForeclosureNoticeType::NoticeOfTrusteeSale {
        sale_date_of(&fields, text)
    } else {
        stated_text(fields.first(&["date of sale", "sale date"]))
    };

    ForeclosureClause::Notice(ForeclosureNotice {
        item_number,
        notice_type,
        sale_date,
        sale_time: stated_text(fields.first(&["time of sale"])),
        sale_location: stated_text(fields.first(&["place of sale", "location of sale"])),
    })
}
