use lazy_static::lazy_static;
use prelim_types::{PropertyIdentity, Stated};
use regex::Regex;

use crate::patterns::{first_token, money_from_value, stated_text, LabeledFields, DATE};

lazy_static! {
    static ref DATED_AS_OF: Regex = Regex::new(r"(?i)\bdated\s+as\s+of\s+").unwrap();
}

/// Property identity from whole-document labels
pub fn extract_property(text: &str, fields: &LabeledFields) -> PropertyIdentity {
    let address = fields
        .first(&["property address", "situs address"])
        .or_else(|| fields.first(&["address"]));

    let effective_date = match fields.first(&["effective date"]) {
        Some(value) => stated_text(Some(value)),
        None => DATED_AS_OF
            .find(text)
            .and_then(|m| DATE.find_at(text, m.end()).filter(|d| d.start() == m.end()))
            .map(|d| Stated::Value(d.as_str().to_string()))
            .unwrap_or(Stated::NotStated),
    };

    PropertyIdentity {
        address: stated_text(address),
        parcel_id: first_token(fields.first(&[
            "apn",
            "assessor's parcel no",
            "assessor's parcel number",
            "parcel no",
            "parcel number",
        ])),
        effective_date,
        proposed_loan_amount: money_from_value(fields.first(&[
            "proposed loan amount",
            "proposed amount of insurance",
            "proposed amount",
        ])),
        proposed_lender: stated_text(fields.first(&[
            "proposed lender",
            "proposed insured lender",
            "proposed insured",
        ])),
    }
}
