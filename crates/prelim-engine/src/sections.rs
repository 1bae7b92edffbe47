//! Section segmenter for the narrative protocol
//!
//! The narrative carries seven literal headers. Content is sliced between
//! consecutive headers in file order, then reported in canonical order.
//! Missing headers are simply absent; text outside every header is kept as a
//! synthetic `Other` section.

use std::collections::BTreeMap;

use prelim_types::{DocumentSection, SectionTitle};

use crate::fallback::{self, requirements, summary};
use crate::patterns::truncate_chars;
use crate::splitter::split_numbered_items;

/// Maximum preview length, in characters
pub const PREVIEW_CHARS: usize = 120;

/// Recognize a header line. Markdown `#` marks, `**` wrapping and a trailing
/// colon are tolerated; the words must match exactly.
pub fn header_title(line: &str) -> Option<SectionTitle> {
    let text = line.trim().trim_start_matches('#').trim();
    let text = text
        .strip_prefix("**")
        .and_then(|t| t.strip_suffix("**"))
        .unwrap_or(text)
        .trim();
    let text = text.strip_suffix(':').unwrap_or(text).trim();

    SectionTitle::CANONICAL
        .into_iter()
        .find(|title| title.header() == Some(text))
}

/// Split a narrative into sections in canonical order
pub fn segment_sections(text: &str) -> Vec<DocumentSection> {
    let mut bodies: BTreeMap<SectionTitle, Vec<String>> = BTreeMap::new();
    let mut current = SectionTitle::Other;
    let mut buffer = String::new();

    for line in text.lines() {
        if let Some(title) = header_title(line) {
            flush(&mut bodies, current, &mut buffer);
            current = title;
        } else {
            buffer.push_str(line);
            buffer.push('\n');
        }
    }
    flush(&mut bodies, current, &mut buffer);

    bodies
        .into_iter()
        .map(|(title, parts)| build_section(title, parts.join("\n\n")))
        .collect()
}

fn flush(bodies: &mut BTreeMap<SectionTitle, Vec<String>>, title: SectionTitle, buffer: &mut String) {
    let content = buffer.trim();
    // A header with no body still marks its section present
    if !content.is_empty() || title != SectionTitle::Other {
        let parts = bodies.entry(title).or_default();
        if !content.is_empty() {
            parts.push(content.to_string());
        }
    }
    buffer.clear();
}

fn build_section(title: SectionTitle, content: String) -> DocumentSection {
    DocumentSection {
        title,
        icon: title.icon().to_string(),
        border_color: title.border_color().to_string(),
        item_count: count_items(title, &content),
        preview: preview(&content),
        content,
    }
}

/// Number of recognized sub-items for a section's grammar
pub fn count_items(title: SectionTitle, content: &str) -> usize {
    match title {
        SectionTitle::Requirements => {
            let items = requirements::count_item_lines(content);
            if items > 0 {
                items
            } else {
                split_numbered_items(content).len()
            }
        }
        SectionTitle::Summary => summary::parse_summary(content).risks.len(),
        SectionTitle::Liens => fallback::chunk_by_label(content, &["priority"]).len(),
        SectionTitle::OtherFindings => fallback::chunk_by_label(content, &["type"]).len(),
        SectionTitle::Property
        | SectionTitle::Taxes
        | SectionTitle::DocumentStatus
        | SectionTitle::Other => fallback::field_lines(content).len(),
    }
}

/// First non-empty content sentence, cleaned of list markers and bold marks
pub fn preview(content: &str) -> String {
    let line = content
        .lines()
        .map(|l| {
            l.trim()
                .trim_start_matches(['-', '*', '•'])
                .replace("**", "")
                .trim()
                .to_string()
        })
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    let sentence = match line.find(". ") {
        Some(idx) => &line[..=idx],
        None => line.as_str(),
    };
    truncate_chars(sentence, PREVIEW_CHARS)
}
