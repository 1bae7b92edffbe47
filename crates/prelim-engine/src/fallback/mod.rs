//! Per-section fallback parsers for the narrative summary
//!
//! Each parser reads the bullet/field syntax of one section into the same
//! typed shapes the deterministic extractor produces. A missing field is
//! `NOT_STATED`, an unreadable one is `UNCLEAR`, and a section with nothing
//! structured in it is shown as plain text with bolded currency.

pub mod findings;
pub mod liens;
pub mod property;
pub mod requirements;
pub mod status;
pub mod summary;
pub mod taxes;

use lazy_static::lazy_static;
use prelim_types::{
    DocumentSection, ExtractedFacts, PlainSection, PropertyIdentity, SectionTitle, SectionViews,
    TaxParcel,
};
use regex::Regex;
use tracing::debug;

use crate::patterns::{clean_value, normalize_label, LabeledFields, MONEY};

lazy_static! {
    /// `- Label: value`, `**Label:** value`, `Label: value`
    static ref FIELD_LINE: Regex = Regex::new(
        r"^\s*(?:[-*•]\s+)?(?:\*\*)?([A-Za-z][A-Za-z0-9 '’/&().#-]{0,48}?)(?:\*\*)?\s*:(?:\*\*)?(?:\s+(.*)|\s*)$"
    )
    .unwrap();
}

/// One `Label: value` line, with the label as written and normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLine {
    pub label: String,
    pub raw_label: String,
    pub value: String,
}

/// Parse a single field line
pub fn field_line(line: &str) -> Option<FieldLine> {
    let caps = FIELD_LINE.captures(line)?;
    let raw_label = caps.get(1)?.as_str().trim().to_string();
    let value = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    Some(FieldLine {
        label: normalize_label(&raw_label),
        raw_label,
        value: clean_value(value),
    })
}

/// Every field line of a block, in source order
pub fn field_lines(content: &str) -> LabeledFields {
    content
        .lines()
        .filter_map(field_line)
        .map(|f| (f.label, f.value))
        .collect()
}

/// Split a block into chunks, each starting at a field line whose label is
/// one of `labels`. Lines before the first such field are dropped.
pub fn chunk_by_label(content: &str, labels: &[&str]) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    for line in content.lines() {
        let starts_chunk = field_line(line).is_some_and(|f| labels.contains(&f.label.as_str()));
        if starts_chunk {
            chunks.push(format!("{}\n", line));
        } else if let Some(chunk) = chunks.last_mut() {
            chunk.push_str(line);
            chunk.push('\n');
        }
    }
    chunks.into_iter().map(|c| c.trim_end().to_string()).collect()
}

/// Plain-text rendering: the text as-is with money literals in bold.
///
/// Amounts already touching `**` are left alone, so rendering is idempotent.
pub fn render_plain(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut copied_to = 0;
    for m in MONEY.find_iter(text) {
        let already_bold = text[..m.start()].ends_with("**") || text[m.end()..].starts_with("**");
        if already_bold {
            continue;
        }
        out.push_str(&text[copied_to..m.start()]);
        out.push_str("**");
        out.push_str(m.as_str());
        out.push_str("**");
        copied_to = m.end();
    }
    out.push_str(&text[copied_to..]);
    out
}

/// Everything the narrative contributed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NarrativeParse {
    pub property: PropertyIdentity,
    pub tax_parcels: Vec<TaxParcel>,
    pub views: SectionViews,
}

/// Run every section's parser. `facts` supplies the tax default callout when
/// the narrative itself has no default language.
pub fn parse_sections(sections: &[DocumentSection], facts: &ExtractedFacts) -> NarrativeParse {
    let mut parse = NarrativeParse::default();

    for section in sections {
        let content = section.content.as_str();
        let structured = match section.title {
            SectionTitle::Requirements => {
                let view = requirements::parse_requirements(content);
                let found = !view.is_empty();
                if found {
                    parse.views.requirements = Some(view);
                }
                found
            }
            SectionTitle::Summary => {
                let view = summary::parse_summary(content);
                let found = !view.risks.is_empty();
                if found {
                    parse.views.summary = Some(view);
                }
                found
            }
            SectionTitle::Property => {
                parse.property = property::parse_property(content);
                !parse.property.is_empty()
            }
            SectionTitle::Liens => {
                parse.views.liens = liens::parse_liens(content);
                !parse.views.liens.is_empty()
            }
            SectionTitle::Taxes => {
                parse.tax_parcels = taxes::parse_narrative_parcels(content);
                parse.views.taxes = Some(taxes::parse_taxes(content, facts));
                true
            }
            SectionTitle::OtherFindings => {
                parse.views.findings = findings::parse_findings(content);
                !parse.views.findings.is_empty()
            }
            SectionTitle::DocumentStatus => {
                let view = status::parse_document_status(content);
                let found = !view.is_empty();
                if found {
                    parse.views.document_status = Some(view);
                }
                found
            }
            SectionTitle::Other => false,
        };

        if !structured && !content.trim().is_empty() {
            parse.views.plain.push(PlainSection {
                title: section.title,
                text: render_plain(content),
            });
        }
    }

    debug!(
        liens = parse.views.liens.len(),
        findings = parse.views.findings.len(),
        plain = parse.views.plain.len(),
        "Parsed narrative sections"
    );
    parse
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::segment_sections;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_line_variants() {
        let f = field_line("- Beneficiary: ABC Bank").unwrap();
        assert_eq!(f.label, "beneficiary");
        assert_eq!(f.value, "ABC Bank");

        let bold = field_line("**Recording No.:** 2019-0012345").unwrap();
        assert_eq!(bold.label, "recording no");
        assert_eq!(bold.raw_label, "Recording No.");
        assert_eq!(bold.value, "2019-0012345");

        let empty = field_line("- Foreclosure:").unwrap();
        assert_eq!(empty.value, "");

        assert!(field_line("Title is vested in John Doe.").is_none());
        assert!(field_line("").is_none());
    }

    #[test]
    fn test_chunk_by_label() {
        let content = "Intro text\n- Priority: 1st\n- Amount: $1.00\n- Priority: 2nd\n- Amount: $2.00";
        let chunks = chunk_by_label(content, &["priority"]);
        assert_eq!(
            chunks,
            vec![
                "- Priority: 1st\n- Amount: $1.00".to_string(),
                "- Priority: 2nd\n- Amount: $2.00".to_string(),
            ]
        );
    }

    #[test]
    fn test_render_plain_bolds_currency() {
        assert_eq!(
            render_plain("Taxes of $2,129.89 are due."),
            "Taxes of **$2,129.89** are due."
        );
        assert_eq!(render_plain("Already **$5.00** bold."), "Already **$5.00** bold.");
        assert_eq!(render_plain("No money here."), "No money here.");
    }

    #[test]
    fn test_unstructured_sections_become_plain() {
        let sections = segment_sections(
            "LIENS AND ENCUMBRANCES\nNo liens of record. Balance $0.00.\nOTHER FINDINGS\n- Type: Easement\n- Impact: Low",
        );
        let parse = parse_sections(&sections, &ExtractedFacts::default());

        assert_eq!(parse.views.plain.len(), 1);
        assert_eq!(parse.views.plain[0].title, SectionTitle::Liens);
        assert_eq!(parse.views.plain[0].text, "No liens of record. Balance **$0.00**.");
        assert_eq!(parse.views.findings.len(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Re-rendering rendered output changes nothing
        #[test]
        fn render_plain_is_idempotent(text in "[A-Za-z $,.*0-9\\n]{0,200}") {
            let once = render_plain(&text);
            let twice = render_plain(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
