//! Regex patterns and field helpers shared by the extractors and fallback parsers

use lazy_static::lazy_static;
use prelim_types::{Money, Stated};
use regex::Regex;

lazy_static! {
    /// A money literal anywhere in text, e.g. `$2,129.89`
    pub static ref MONEY: Regex = Regex::new(r"\$\d[\d,]*\.\d{2}\b").unwrap();

    /// A written-out or numeric date, e.g. `March 5, 2019`, `March 2026`, `03/05/2019`
    pub static ref DATE: Regex = Regex::new(
        r"(?i)\b(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?(?:\s+\d{1,2},?)?\s+\d{4}|\d{1,2}/\d{1,2}/\d{2,4})\b"
    )
    .unwrap();

    /// A recording/instrument number such as `2019-0012345` or `20190012345`
    pub static ref RECORDING_NUMBER: Regex =
        Regex::new(r"\b(\d{2,4}-\d{3,}|\d{6,})\b").unwrap();

    /// `item no. 4`, `item #4`, `item 4`
    pub static ref ITEM_REFERENCE: Regex =
        Regex::new(r"(?i)\bitem\s+(?:no\.?\s*)?#?\s*(\d{1,3})\b").unwrap();

    /// `Label: value` labels the raw report uses. The value runs to the next
    /// label or the end of the line, so fields survive lost line breaks.
    static ref RAW_LABEL: Regex = Regex::new(
        r"(?i)\b(proposed\s+loan\s+amount|proposed\s+amount\s+of\s+insurance|proposed\s+amount|proposed\s+insured\s+lender|proposed\s+lender|proposed\s+insured|property\s+address|situs\s+address|effective\s+date|assessor[’']?s\s+parcel\s+(?:no\.?|number)|tax\s+identification\s+(?:no\.?|number)|tax\s+id|parcel\s+(?:no\.?|number)|apn|fiscal\s+year|code\s+area|(?:1st|first|2nd|second)\s+installment|penalty|homeowners?[’']?\s+exemption|exemption|default\s+(?:no\.?|number)|trustor/grantor|trustor|grantor|trustee|beneficiary|assignee|assignor|recording\s+date|recording\s+(?:no\.?|number)|recorded|instrument\s+(?:no\.?|number)|document\s+(?:no\.?|number)|loan\s+(?:no\.?|number)|dated|claimant|association|date\s+of\s+sale|sale\s+date|time\s+of\s+sale|place\s+of\s+sale|location\s+of\s+sale|address|amount\s+due|total\s+amount|amount)\s*:"
    )
    .unwrap();

    static ref PAID_WORD: Regex = Regex::new(r"(?i)\bpaid\b").unwrap();
    static ref OPEN_WORD: Regex = Regex::new(r"(?i)\b(open|unpaid|due|payable)\b").unwrap();
}

/// Values that mean the source explicitly has nothing for the field
const NOT_STATED_PHRASES: &[&str] = &[
    "not stated",
    "not provided",
    "not shown",
    "not listed",
    "not specified",
    "not available",
    "n/a",
    "na",
    "none",
    "none stated",
    "-",
];

/// Values that mean the field is there but unreadable
const UNCLEAR_PHRASES: &[&str] = &[
    "unclear",
    "unknown",
    "illegible",
    "ambiguous",
    "unreadable",
    "?",
];

/// Labeled fields of one clause, in source order
#[derive(Debug, Default, Clone)]
pub struct LabeledFields(Vec<(String, String)>);

impl LabeledFields {
    /// First non-empty value (in source order) whose label is one of `labels`
    pub fn first(&self, labels: &[&str]) -> Option<&str> {
        self.0
            .iter()
            .find(|(label, value)| !value.is_empty() && labels.contains(&label.as_str()))
            .map(|(_, value)| value.as_str())
    }

    /// True when any of `labels` appears, even with an empty value
    pub fn has(&self, labels: &[&str]) -> bool {
        self.0.iter().any(|(label, _)| labels.contains(&label.as_str()))
    }

    /// Every value for the given labels, in source order
    pub fn all(&self, labels: &[&str]) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(label, _)| labels.contains(&label.as_str()))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(label, value)| (label.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for LabeledFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        LabeledFields(iter.into_iter().collect())
    }
}

/// Scan raw report text for `Label: value` pairs.
pub fn scan_labeled_fields(text: &str) -> LabeledFields {
    let matches: Vec<_> = RAW_LABEL.captures_iter(text).collect();
    let mut fields = Vec::with_capacity(matches.len());

    for (i, caps) in matches.iter().enumerate() {
        let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let next_start = matches
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());
        let tail = &text[whole.end()..next_start];
        let value = tail.split('\n').next().unwrap_or("");
        fields.push((normalize_label(label.as_str()), clean_value(value)));
    }

    LabeledFields(fields)
}

/// Lowercase a label, drop `.`/`:`/`*`, fold curly apostrophes and collapse whitespace
pub fn normalize_label(label: &str) -> String {
    let folded: String = label
        .chars()
        .filter(|c| !matches!(c, '.' | ':' | '*'))
        .map(|c| if c == '’' { '\'' } else { c })
        .collect::<String>()
        .to_lowercase();
    collapse_whitespace(&folded)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trim a field value of whitespace, markdown bold and trailing separators
pub fn clean_value(value: &str) -> String {
    value
        .trim()
        .trim_matches('*')
        .trim()
        .trim_end_matches([',', ';'])
        .trim()
        .to_string()
}

/// Map an optional field value to a `Stated` string
pub fn stated_text(value: Option<&str>) -> Stated<String> {
    let Some(value) = value else {
        return Stated::NotStated;
    };
    let cleaned = clean_value(value);
    let lower = cleaned.to_lowercase();
    let lower = lower.trim_end_matches('.');

    if cleaned.is_empty() || NOT_STATED_PHRASES.contains(&lower) {
        Stated::NotStated
    } else if UNCLEAR_PHRASES.contains(&lower) {
        Stated::Unclear
    } else {
        Stated::Value(cleaned)
    }
}

/// Map an optional field value to money.
///
/// A money literal inside the value is copied verbatim. A value with no
/// literal is `Unclear`; it is never converted or rounded.
pub fn money_from_value(value: Option<&str>) -> Money {
    match stated_text(value) {
        Stated::Value(text) => match MONEY.find(&text) {
            Some(m) => Stated::Value(m.as_str().to_string()),
            None => Stated::Unclear,
        },
        other => other,
    }
}

/// First whitespace-separated token of a field value, e.g. a recording number
pub fn first_token(value: Option<&str>) -> Stated<String> {
    match stated_text(value) {
        Stated::Value(text) => {
            let token = text
                .split_whitespace()
                .next()
                .unwrap_or("")
                .trim_end_matches([',', ';', '.', ')'])
                .to_string();
            if token.is_empty() {
                Stated::Unclear
            } else {
                Stated::Value(token)
            }
        }
        other => other,
    }
}

/// Explicit payment status words in an installment value
pub fn explicit_installment_status(value: &str) -> Option<prelim_types::InstallmentStatus> {
    use prelim_types::InstallmentStatus;

    let lower = value.to_lowercase();
    if lower.contains("delinquent") {
        Some(InstallmentStatus::Delinquent)
    } else if PAID_WORD.is_match(value) {
        Some(InstallmentStatus::Paid)
    } else if OPEN_WORD.is_match(value) {
        Some(InstallmentStatus::Open)
    } else {
        None
    }
}

/// Ordinal label for a lien position
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// First sentence (or line) of a clause, capped at `max_chars`
pub fn first_sentence(text: &str, max_chars: usize) -> String {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    let sentence = match line.find(". ") {
        Some(idx) => &line[..=idx],
        None => line,
    };
    truncate_chars(sentence.trim(), max_chars)
}

/// Truncate on a character boundary, marking the cut with an ellipsis
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Last `n` characters of `text`, on a character boundary
pub fn tail_chars(text: &str, n: usize) -> &str {
    match text.char_indices().rev().nth(n.saturating_sub(1)) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Check if lowercase text contains any of the keywords
pub fn contains_any(text_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text_lower.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prelim_types::InstallmentStatus;

    #[test]
    fn test_scan_fields_on_separate_lines() {
        let text = "Amount: $450,000.00\nDated: March 1, 2019\nTrustee: First American Title Company";
        let fields = scan_labeled_fields(text);
        assert_eq!(fields.first(&["amount"]), Some("$450,000.00"));
        assert_eq!(fields.first(&["dated"]), Some("March 1, 2019"));
        assert_eq!(fields.first(&["trustee"]), Some("First American Title Company"));
    }

    #[test]
    fn test_scan_fields_survives_collapsed_lines() {
        let text = "Trustor/Grantor: John Doe, a single man Trustee: First American Title Company Beneficiary: ABC Bank";
        let fields = scan_labeled_fields(text);
        assert_eq!(fields.first(&["trustor/grantor"]), Some("John Doe, a single man"));
        assert_eq!(fields.first(&["trustee"]), Some("First American Title Company"));
        assert_eq!(fields.first(&["beneficiary"]), Some("ABC Bank"));
    }

    #[test]
    fn test_longer_label_wins_over_suffix() {
        let fields = scan_labeled_fields("Proposed Loan Amount: $600,000.00");
        assert_eq!(fields.first(&["proposed loan amount"]), Some("$600,000.00"));
        assert_eq!(fields.first(&["amount"]), None);
    }

    #[test]
    fn test_stated_text_sentinels() {
        assert_eq!(stated_text(None), Stated::NotStated);
        assert_eq!(stated_text(Some("  ")), Stated::NotStated);
        assert_eq!(stated_text(Some("Not stated")), Stated::NotStated);
        assert_eq!(stated_text(Some("N/A")), Stated::NotStated);
        assert_eq!(stated_text(Some("Unclear")), Stated::Unclear);
        assert_eq!(stated_text(Some("**ABC Bank**")), Stated::Value("ABC Bank".to_string()));
    }

    #[test]
    fn test_money_is_copied_verbatim_or_unclear() {
        assert_eq!(
            money_from_value(Some("$2,129.89 (PAID)")),
            Stated::Value("$2,129.89".to_string())
        );
        assert_eq!(money_from_value(Some("about 450k")), Stated::Unclear);
        assert_eq!(money_from_value(Some("$450,000")), Stated::Unclear);
        assert_eq!(money_from_value(Some("not stated")), Stated::NotStated);
        assert_eq!(money_from_value(None), Stated::NotStated);
    }

    #[test]
    fn test_installment_status_words() {
        assert_eq!(explicit_installment_status("(PAID)"), Some(InstallmentStatus::Paid));
        assert_eq!(
            explicit_installment_status("$1.00 DELINQUENT"),
            Some(InstallmentStatus::Delinquent)
        );
        assert_eq!(explicit_installment_status("unpaid"), Some(InstallmentStatus::Open));
        assert_eq!(explicit_installment_status("$1.00"), None);
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(22), "22nd");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("ééééé", 3), "éé…");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(tail_chars("abcdé", 2), "dé");
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(
            first_sentence("\nTaxes defaulted. Amount to redeem below.", 80),
            "Taxes defaulted."
        );
    }
}
