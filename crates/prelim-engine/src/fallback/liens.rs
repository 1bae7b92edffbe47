//! Liens section parser: one `- Priority:` chunk per lien

use lazy_static::lazy_static;
use prelim_types::{LienCard, LienRecord, Stated};
use regex::Regex;

use super::{chunk_by_label, field_lines};
use crate::patterns::{
    money_from_value, ordinal, stated_text, LabeledFields, DATE, ITEM_REFERENCE, RECORDING_NUMBER,
};

lazy_static! {
    static ref POSITION_NUMBER: Regex = Regex::new(r"\d+").unwrap();
}

const AMOUNT: &[&str] = &["amount", "original amount", "loan amount", "principal"];
const BENEFICIARY: &[&str] = &["beneficiary", "lender", "holder", "current beneficiary"];
const TRUSTOR: &[&str] = &["trustor", "borrower", "trustor/grantor"];
const RECORDING: &[&str] = &[
    "recording",
    "recording no",
    "recording number",
    "recorded",
    "instrument no",
    "instrument number",
    "document no",
];
const RECORDING_DATE: &[&str] = &["recording date", "recorded on"];
const FORECLOSURE: &[&str] = &["foreclosure", "foreclosure status", "foreclosure info"];
const ACTION: &[&str] = &["suggested action", "action", "recommended action", "next step"];

const POSITION_WORDS: &[(&str, usize)] = &[
    ("first", 1),
    ("second", 2),
    ("third", 3),
    ("fourth", 4),
    ("fifth", 5),
];

fn position_label(value: Option<&str>, index: usize) -> String {
    let fallback = index + 1;
    let Some(value) = value else {
        return ordinal(fallback);
    };
    if let Some(n) = POSITION_NUMBER
        .find(value)
        .and_then(|m| m.as_str().parse::<usize>().ok())
    {
        return ordinal(n);
    }
    let lower = value.to_lowercase();
    let n = POSITION_WORDS
        .iter()
        .find(|(word, _)| lower.contains(word))
        .map(|(_, n)| *n)
        .unwrap_or(fallback);
    ordinal(n)
}

fn recording_number(value: Option<&str>) -> Stated<String> {
    match stated_text(value) {
        Stated::Value(text) => match RECORDING_NUMBER.find(&text) {
            Some(m) => Stated::Value(m.as_str().to_string()),
            None => Stated::Unclear,
        },
        other => other,
    }
}

fn date_in(value: Option<&str>) -> Stated<String> {
    match stated_text(value) {
        Stated::Value(text) => match DATE.find(&text) {
            Some(m) => Stated::Value(m.as_str().to_string()),
            None => Stated::Unclear,
        },
        other => other,
    }
}

fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric()).any(|w| w == word)
}

fn lien_record(chunk: &str, fields: &LabeledFields, index: usize) -> LienRecord {
    let foreclosure = fields
        .first(FORECLOSURE)
        .map(|v| v.to_lowercase())
        .unwrap_or_default();
    let status = fields
        .first(&["status"])
        .map(|v| v.to_lowercase())
        .unwrap_or_default();
    let notes = format!("{} {}", foreclosure, status).replace('’', "'");

    let recording = fields.first(RECORDING);
    let recording_date = match fields.first(RECORDING_DATE) {
        Some(value) => date_in(Some(value)),
        None => recording
            .and_then(|v| DATE.find(v))
            .map(|m| Stated::Value(m.as_str().to_string()))
            .unwrap_or(Stated::NotStated),
    };
    let has_notice_of_trustee_sale = notes.contains("trustee's sale")
        || notes.contains("trustee sale")
        || has_word(&notes, "nots");

    LienRecord {
        position: position_label(fields.first(&["priority"]), index),
        item_number: ITEM_REFERENCE
            .captures(chunk)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok()),
        amount: money_from_value(fields.first(AMOUNT)),
        beneficiary: stated_text(fields.first(BENEFICIARY)),
        trustor: stated_text(fields.first(TRUSTOR)),
        trustee: stated_text(fields.first(&["trustee"])),
        dated: stated_text(fields.first(&["dated"])),
        recording_number: recording_number(recording),
        recording_date,
        substitutions: Vec::new(),
        assignments: Vec::new(),
        has_notice_of_default: notes.contains("notice of default") || has_word(&notes, "nod"),
        has_notice_of_trustee_sale,
        sale_date: if has_notice_of_trustee_sale {
            date_in(fields.first(FORECLOSURE).or(fields.first(&["sale date"])))
        } else {
            stated_text(fields.first(&["sale date"]))
        },
    }
}

/// Parse lien cards, one per `- Priority:` chunk, in source order
pub fn parse_liens(content: &str) -> Vec<LienCard> {
    chunk_by_label(content, &["priority"])
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            let fields = field_lines(chunk);
            LienCard {
                record: lien_record(chunk, &fields, index),
                lien_type: stated_text(fields.first(&["type", "lien type"])),
                status: stated_text(fields.first(&["status"])),
                foreclosure_info: stated_text(fields.first(FORECLOSURE)),
                suggested_action: stated_text(fields.first(ACTION)),
            }
        })
        .collect()
}
