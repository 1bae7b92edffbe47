//! Numbered-item splitter
//!
//! Reconstructs `1. ...`, `2. ...` clauses from text whose line breaks may
//! have collapsed during PDF extraction. Splitting is purely positional: it
//! never reorders content, and running it on its own output changes nothing.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::patterns::tail_chars;

lazy_static! {
    /// A possible item marker anywhere in the text
    static ref CANDIDATE_MARKER: Regex = Regex::new(r"(\d{1,3})\.[ \t\r\n]+").unwrap();

    /// A marker at the start of a line, after normalization
    static ref LINE_MARKER: Regex = Regex::new(r"(?m)^[ \t]*(\d{1,3})\.[ \t]+").unwrap();
}

/// Phrases that introduce a numbered list in title reports
pub const LIST_ANCHORS: &[&str] = &[
    "will require the following",
    "are as follows",
    "the following matters",
    "exceptions:",
    "requirements:",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedItem {
    pub num: u32,
    pub raw: String,
}

/// Split text into numbered clauses, in source order.
///
/// Returns an empty list when no marker is found; callers then show the text
/// verbatim. Numbers may have gaps.
pub fn split_numbered_items(text: &str) -> Vec<NumberedItem> {
    split_with_preamble(text).1
}

/// Like [`split_numbered_items`], also returning the text before the first item
pub fn split_with_preamble(text: &str) -> (String, Vec<NumberedItem>) {
    let normalized = normalize_item_breaks(text);
    let markers: Vec<(usize, usize, u32)> = LINE_MARKER
        .captures_iter(&normalized)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let num = caps.get(1)?.as_str().parse().ok()?;
            Some((whole.start(), whole.end(), num))
        })
        .collect();

    let preamble_end = markers.first().map(|m| m.0).unwrap_or(normalized.len());
    let preamble = normalized[..preamble_end].trim().to_string();

    let items = markers
        .iter()
        .enumerate()
        .filter_map(|(i, &(_, body_start, num))| {
            let body_end = markers
                .get(i + 1)
                .map(|next| next.0)
                .unwrap_or(normalized.len());
            let raw = normalized[body_start..body_end].trim();
            (!raw.is_empty()).then(|| NumberedItem {
                num,
                raw: raw.to_string(),
            })
        })
        .collect();

    (preamble, items)
}

/// Insert a line break before item markers that lost theirs.
///
/// A marker is moved to its own line when it follows two or more spaces, a
/// `:` or `;`, or a list anchor phrase. A marker whose number is the
/// successor of the previous item also breaks after a sentence end, or when
/// a capitalized word follows it.
pub fn normalize_item_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut copied_to = 0;
    let mut last_num: Option<u32> = None;

    for caps in CANDIDATE_MARKER.captures_iter(text) {
        let (Some(marker), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Ok(num) = digits.as_str().parse::<u32>() else {
            continue;
        };
        let before = &text[..marker.start()];
        let before_trimmed = before.trim_end_matches([' ', '\t']);

        if before_trimmed.is_empty() || before_trimmed.ends_with('\n') {
            last_num = Some(num);
            continue;
        }

        let gap = before.len() - before_trimmed.len();
        let after_wide_gap = gap >= 2;
        let after_separator = before_trimmed.ends_with([':', ';']);
        let after_anchor = {
            let tail = tail_chars(before_trimmed, 48).to_lowercase();
            LIST_ANCHORS.iter().any(|anchor| tail.ends_with(anchor))
        };
        let successor = last_num.is_some_and(|prev| num == prev + 1);
        let opens_clause = text[marker.end()..].starts_with(char::is_uppercase);
        let after_sentence =
            gap >= 1 && successor && (before_trimmed.ends_with(['.', ')']) || opens_clause);

        if after_wide_gap || after_separator || after_anchor || after_sentence {
            out.push_str(&text[copied_to..before_trimmed.len()]);
            out.push('\n');
            copied_to = marker.start();
            last_num = Some(num);
        }
    }

    out.push_str(&text[copied_to..]);
    out
}
