//! Taxes section: parcel fields plus the tax-default callout

use prelim_types::{ExtractedFacts, RecordSource, TaxDefaultCallout, TaxParcel, TaxesView};

use super::{chunk_by_label, field_lines, render_plain};
use crate::extractors::taxes::{parcel_from_fields, parse_redemption_schedule, DEFAULT_PHRASES};
use crate::patterns::{contains_any, first_sentence};

const PARCEL_LABELS: &[&str] = &[
    "tax id",
    "apn",
    "parcel",
    "parcel no",
    "parcel number",
    "assessor's parcel no",
    "assessor's parcel number",
];

const INSTALLMENT_LABELS: &[&str] = &[
    "1st installment",
    "first installment",
    "2nd installment",
    "second installment",
];

/// Parcels described by the section, one per `Tax ID`/`APN` chunk.
///
/// A section listing installments without any parcel label is read as a
/// single parcel.
pub fn parse_narrative_parcels(content: &str) -> Vec<TaxParcel> {
    let chunks = chunk_by_label(content, PARCEL_LABELS);
    if !chunks.is_empty() {
        return chunks
            .iter()
            .map(|chunk| parcel_from_fields(&field_lines(chunk), chunk, None))
            .collect();
    }

    let fields = field_lines(content);
    if fields.has(INSTALLMENT_LABELS) {
        vec![parcel_from_fields(&fields, content, None)]
    } else {
        Vec::new()
    }
}

/// The section as text, with a default callout when one applies.
///
/// Defaults found in the raw report take precedence over the narrative's
/// own wording.
pub fn parse_taxes(content: &str, facts: &ExtractedFacts) -> TaxesView {
    let lower = content.to_lowercase();
    let callout = if let Some(first) = facts.tax_defaults.first() {
        Some(TaxDefaultCallout {
            message: first.message.clone(),
            redemption_schedule: facts
                .tax_defaults
                .iter()
                .flat_map(|d| d.redemption_schedule.iter().cloned())
                .collect(),
            source: RecordSource::Document,
        })
    } else if contains_any(&lower, DEFAULT_PHRASES) {
        let line = content
            .lines()
            .find(|l| contains_any(&l.to_lowercase(), DEFAULT_PHRASES))
            .unwrap_or(content);
        let line = line.trim().trim_start_matches(['-', '*', '•']).trim();
        Some(TaxDefaultCallout {
            message: first_sentence(&line.replace("**", ""), 200),
            redemption_schedule: parse_redemption_schedule(content),
            source: RecordSource::Narrative,
        })
    } else {
        None
    };

    TaxesView {
        callout,
        text: render_plain(content),
    }
}
