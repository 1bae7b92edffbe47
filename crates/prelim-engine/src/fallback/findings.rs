use prelim_types::{Finding, FindingImpact, Stated};

use super::{chunk_by_label, field_lines};
use crate::patterns::{stated_text, RECORDING_NUMBER};

const RECORDING_LABELS: &[&str] = &[
    "recording",
    "recording no",
    "recording number",
    "recording ref",
    "recording reference",
    "instrument",
    "instrument no",
    "reference",
];

fn impact_of(value: Option<&str>) -> FindingImpact {
    let lower = value.unwrap_or("").to_lowercase();
    if lower.starts_with("high") {
        FindingImpact::High
    } else if lower.starts_with("low") {
        FindingImpact::Low
    } else {
        FindingImpact::Medium
    }
}

/// One finding per `- Type:` chunk
pub fn parse_findings(content: &str) -> Vec<Finding> {
    chunk_by_label(content, &["type"])
        .iter()
        .map(|chunk| {
            let fields = field_lines(chunk);
            let finding_type = match stated_text(fields.first(&["type"])) {
                Stated::Value(t) => t,
                _ => "Other".to_string(),
            };
            let recording_ref = fields
                .first(RECORDING_LABELS)
                .and_then(|v| RECORDING_NUMBER.find(v))
                .map(|m| m.as_str().to_string());

            Finding {
                finding_type,
                details: stated_text(fields.first(&["details", "description"])),
                impact: impact_of(fields.first(&["impact", "severity"])),
                action: stated_text(fields.first(&["action", "suggested action", "next step"])),
                recording_ref,
            }
        })
        .collect()
}
