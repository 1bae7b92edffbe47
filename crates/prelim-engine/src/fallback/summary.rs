//! Summary section parser: the "Top Closing Risks" list plus free narrative

use lazy_static::lazy_static;
use prelim_types::{ClosingRisk, Severity, Stated, SummaryView};
use regex::Regex;

use crate::patterns::{contains_any, stated_text};

lazy_static! {
    /// `1. `, `1) `, `- `, `* `, `• ` at line start
    static ref LIST_MARKER: Regex = Regex::new(r"^\s*(?:\d{1,2}[.)]|[-*•])\s+").unwrap();
}

/// Phrases that mark a risk as closing-blocking
const BLOCKER_PHRASES: &[&str] = &[
    "blocker",
    "cannot close",
    "can't close",
    "cannot insure",
    "will not insure",
    "prevent closing",
    "prevents closing",
    "stop closing",
    "must be resolved before closing",
    "must be cleared before closing",
    "before closing can proceed",
];

/// Documents the title company will not insure without
const MANDATORY_DOCUMENTS: &[&str] = &[
    "statement of information",
    "statements of information",
    "certification of trust",
    "certificate of trust",
    "trust certification",
    "operating agreement",
    "resolution",
    "revivor",
    "spousal joinder",
];

fn risk_severity(body: &str) -> Severity {
    let lower = body.to_lowercase();
    if contains_any(&lower, BLOCKER_PHRASES) || contains_any(&lower, MANDATORY_DOCUMENTS) {
        Severity::Blocker
    } else {
        Severity::Material
    }
}

const RISK_KEY_CHARS: usize = 40;

fn is_risks_heading(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("closing risks") && !LIST_MARKER.is_match(line)
}

/// Split a risk line on the first em or en dash (or a spaced hyphen)
fn split_risk(text: &str) -> (String, Stated<String>) {
    for separator in [" — ", "—", " – ", "–", " - "] {
        if let Some((title, explanation)) = text.split_once(separator) {
            return (title.trim().to_string(), stated_text(Some(explanation)));
        }
    }
    (text.trim().to_string(), Stated::NotStated)
}

/// Lowercased alphanumeric prefix used to detect repeated risks
fn risk_key(text: &str) -> String {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    normalized
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(RISK_KEY_CHARS)
        .collect()
}

pub fn parse_summary(content: &str) -> SummaryView {
    let mut risks: Vec<ClosingRisk> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    let mut narrative_lines: Vec<&str> = Vec::new();
    let mut in_block = false;

    for line in content.lines() {
        if is_risks_heading(line) {
            in_block = true;
            continue;
        }
        if in_block {
            if let Some(marker) = LIST_MARKER.find(line) {
                let body = line[marker.end()..].replace("**", "");
                let key = risk_key(&body);
                if key.is_empty() || seen.contains(&key) {
                    continue;
                }
                let severity = risk_severity(&body);
                let (title, explanation) = split_risk(&body);
                seen.push(key);
                risks.push(ClosingRisk {
                    title,
                    explanation,
                    severity,
                });
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            // Indented text continues the previous risk
            if line.starts_with([' ', '\t']) {
                if let Some(last) = risks.last_mut() {
                    let extra = line.trim().replace("**", "");
                    last.explanation = match &last.explanation {
                        Stated::Value(v) => Stated::Value(format!("{} {}", v, extra)),
                        _ => Stated::Value(extra),
                    };
                    continue;
                }
            }
            in_block = false;
        }
        narrative_lines.push(line);
    }

    SummaryView {
        risks,
        narrative: paragraphs(&narrative_lines),
    }
}

/// Re-join lines into trimmed paragraphs separated by one blank line
fn paragraphs(lines: &[&str]) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SUMMARY: &str = "\
Title is vested in John Doe, a single man.

**Top Closing Risks:**
1. Delinquent taxes — second installment is delinquent and must be resolved before closing.
2. Two open deeds of trust – payoff demands needed from both lenders.
3. Delinquent taxes — second installment is delinquent; repeated later in the report.

Overall the file is workable with lender cooperation.";

    #[test]
    fn test_risks_are_split_and_ranked() {
        let view = parse_summary(SUMMARY);
        assert_eq!(view.risks.len(), 2);
        assert_eq!(view.risks[0].title, "Delinquent taxes");
        assert_eq!(view.risks[0].severity, Severity::Blocker);
        assert_eq!(view.risks[1].title, "Two open deeds of trust");
        assert_eq!(
            view.risks[1].explanation,
            Stated::Value("payoff demands needed from both lenders.".to_string())
        );
        assert_eq!(view.risks[1].severity, Severity::Material);
    }

    #[test]
    fn test_prefix_dedupe_uses_forty_chars() {
        let a = "Delinquent taxes — second installment is delinquent";
        let b = "Delinquent taxes — duplicate wording";
        assert_ne!(risk_key(a), risk_key(b));
        assert_eq!(
            risk_key("Delinquent taxes — second installment is delinquent and more"),
            risk_key("Delinquent  taxes - second installment is delinquent, really")
        );
    }

    #[test]
    fn test_other_paragraphs_become_narrative() {
        let view = parse_summary(SUMMARY);
        assert_eq!(
            view.narrative,
            "Title is vested in John Doe, a single man.\n\nOverall the file is workable with lender cooperation."
        );
    }

    #[test]
    fn test_risk_without_dash_has_no_explanation() {
        let view = parse_summary("Top Closing Risks\n- HOA lien recorded");
        assert_eq!(view.risks[0].title, "HOA lien recorded");
        assert_eq!(view.risks[0].explanation, Stated::NotStated);
    }

    #[test]
    fn test_mandatory_documents_rank_as_blockers() {
        let view = parse_summary(
            "Top Closing Risks\n1. Statement of Information required — name search shows judgments against a similar name.\n2. Trust certification missing — trustee authority not shown.\n3. Payoff demand outstanding — lender has not responded.",
        );
        let severities: Vec<_> = view.risks.iter().map(|r| r.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Blocker, Severity::Blocker, Severity::Material]
        );
    }

    #[test]
    fn test_no_risk_block() {
        let view = parse_summary("Clean title. Nothing of note.");
        assert!(view.risks.is_empty());
        assert_eq!(view.narrative, "Clean title. Nothing of note.");
    }
}
