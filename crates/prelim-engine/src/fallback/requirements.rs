//! Requirements section parser
//!
//! A small state machine: sub-header lines move the parser between the four
//! requirement lists, `Item #N` lines open a record, and field lines fill the
//! open record. Each state keeps its own accumulator, flushed whenever the
//! state changes.

use lazy_static::lazy_static;
use prelim_types::{NarrativeRequirement, RequirementMode, RequirementsView, Severity, Stated};
use regex::Regex;

use crate::patterns::{collapse_whitespace, first_sentence, stated_text};
use crate::splitter::split_numbered_items;

lazy_static! {
    /// `- Item #7: Title`, `**Items #3, #5:** Title`, `Item 12 - Title`
    static ref ITEM_LINE: Regex = Regex::new(
        r"(?i)^\s*(?:[-*•]\s+)?(?:\*\*)?items?\s+(#?\s*\d{1,3}(?:\s*(?:,|&|and)\s*#?\s*\d{1,3})*)(?:\*\*)?\s*(?:[:.–—-](?:\*\*)?\s*(.*))?$"
    )
    .unwrap();

    static ref ITEM_NUMBER: Regex = Regex::new(r"\d{1,3}").unwrap();

    /// `- Details: ...` and the other per-record fields
    static ref RECORD_FIELD: Regex = Regex::new(
        r"(?i)^\s*(?:[-*•]\s+)?(?:\*\*)?(details|next\s+steps?|owner|responsible\s+party|closing\s+impact|impact|why\s+it\s+matters)(?:\*\*)?\s*:(?:\*\*)?\s*(.*)$"
    )
    .unwrap();
}

/// Parser states. `Preamble` holds until the first sub-header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Preamble,
    ActionList,
    PrioritySchedule,
    CompanyRequirements,
    ClearingItems,
}

impl ParseState {
    /// The list a record opened in this state belongs to
    pub fn mode(&self) -> RequirementMode {
        match self {
            ParseState::ActionList => RequirementMode::ActionList,
            ParseState::PrioritySchedule => RequirementMode::PrioritySchedule,
            ParseState::Preamble | ParseState::CompanyRequirements => {
                RequirementMode::CompanyRequirements
            }
            ParseState::ClearingItems => RequirementMode::ClearingItems,
        }
    }
}

/// Transition table keyed on normalized sub-header text
const SUB_HEADERS: &[(&str, ParseState)] = &[
    ("action list", ParseState::ActionList),
    ("agent action list", ParseState::ActionList),
    ("closing action list", ParseState::ActionList),
    ("action items", ParseState::ActionList),
    ("priority schedule", ParseState::PrioritySchedule),
    ("by priority", ParseState::PrioritySchedule),
    ("requirements by priority", ParseState::PrioritySchedule),
    ("company requirements", ParseState::CompanyRequirements),
    ("title company requirements", ParseState::CompanyRequirements),
    ("requirements of the company", ParseState::CompanyRequirements),
    ("clearing items", ParseState::ClearingItems),
    ("items to clear", ParseState::ClearingItems),
    ("items to clear before closing", ParseState::ClearingItems),
];

/// The state a sub-header line moves to, if the line is a sub-header
pub fn next_state(line: &str) -> Option<ParseState> {
    let text = line.trim().trim_start_matches('#').trim();
    let text = text.trim_matches('*').trim();
    let text = text.strip_suffix(':').unwrap_or(text).trim_matches('*').trim();
    let key = collapse_whitespace(&text.to_lowercase());
    SUB_HEADERS
        .iter()
        .find(|(header, _)| *header == key)
        .map(|(_, state)| *state)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Details,
    NextStep,
    Owner,
    ClosingImpact,
    WhyItMatters,
}

impl FieldKind {
    fn from_label(label: &str) -> Option<Self> {
        let label = collapse_whitespace(&label.to_lowercase());
        match label.as_str() {
            "details" => Some(FieldKind::Details),
            "next step" | "next steps" => Some(FieldKind::NextStep),
            "owner" | "responsible party" => Some(FieldKind::Owner),
            "closing impact" | "impact" => Some(FieldKind::ClosingImpact),
            "why it matters" => Some(FieldKind::WhyItMatters),
            _ => None,
        }
    }
}

/// Map a `Closing impact:` value to a severity
pub fn severity_from_impact(impact: &Stated<String>) -> Severity {
    let Some(value) = impact.value() else {
        return Severity::Material;
    };
    let lower = value.trim_start_matches(['*', ' ']).to_lowercase();
    if lower.starts_with("block") {
        Severity::Blocker
    } else if lower.starts_with("info") {
        Severity::Informational
    } else {
        Severity::Material
    }
}

#[derive(Debug)]
struct Draft {
    item_numbers: Vec<u32>,
    title: String,
    fields: Vec<(FieldKind, String)>,
    last_field: Option<FieldKind>,
}

impl Draft {
    fn field(&self, kind: FieldKind) -> Stated<String> {
        let value = self
            .fields
            .iter()
            .find(|(k, v)| *k == kind && !v.is_empty())
            .map(|(_, v)| v.as_str());
        stated_text(value)
    }

    fn append(&mut self, line: &str) {
        let Some(kind) = self.last_field else {
            return;
        };
        if let Some((_, value)) = self.fields.iter_mut().rev().find(|(k, _)| *k == kind) {
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(line.trim());
        }
    }

    fn finish(self, mode: RequirementMode) -> NarrativeRequirement {
        let closing_impact = self.field(FieldKind::ClosingImpact);
        NarrativeRequirement {
            mode,
            severity: severity_from_impact(&closing_impact),
            details: self.field(FieldKind::Details),
            next_step: self.field(FieldKind::NextStep),
            owner: self.field(FieldKind::Owner),
            why_it_matters: self.field(FieldKind::WhyItMatters),
            closing_impact,
            item_numbers: self.item_numbers,
            title: self.title,
        }
    }
}

/// Per-state accumulator
#[derive(Debug)]
struct Accumulator {
    state: ParseState,
    open: Option<Draft>,
    done: Vec<NarrativeRequirement>,
}

impl Accumulator {
    fn new(state: ParseState) -> Self {
        Self {
            state,
            open: None,
            done: Vec::new(),
        }
    }

    fn close_open(&mut self) {
        if let Some(draft) = self.open.take() {
            self.done.push(draft.finish(self.state.mode()));
        }
    }

    fn flush(mut self) -> Vec<NarrativeRequirement> {
        self.close_open();
        self.done
    }
}

/// Item numbers and title of an `Item #N` line
pub fn item_line(line: &str) -> Option<(Vec<u32>, String)> {
    let caps = ITEM_LINE.captures(line)?;
    let numbers: Vec<u32> = ITEM_NUMBER
        .find_iter(caps.get(1)?.as_str())
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    if numbers.is_empty() {
        return None;
    }
    let title = caps
        .get(2)
        .map(|m| m.as_str().replace("**", "").trim().to_string())
        .unwrap_or_default();
    Some((numbers, title))
}

/// Number of distinct `Item #` records in a block
pub fn count_item_lines(content: &str) -> usize {
    let mut seen: Vec<Vec<u32>> = Vec::new();
    for (numbers, _) in content.lines().filter_map(item_line) {
        let key = sorted(numbers);
        if !seen.contains(&key) {
            seen.push(key);
        }
    }
    seen.len()
}

fn sorted(mut numbers: Vec<u32>) -> Vec<u32> {
    numbers.sort_unstable();
    numbers.dedup();
    numbers
}

/// Parse the Requirements section into its four lists
pub fn parse_requirements(content: &str) -> RequirementsView {
    let records = if count_item_lines(content) > 0 {
        run_state_machine(content)
    } else {
        numbered_fallback(content)
    };

    let mut view = RequirementsView::default();
    for record in dedupe(records) {
        match record.mode {
            RequirementMode::ActionList => view.action_list.push(record),
            RequirementMode::PrioritySchedule => view.priority_schedule.push(record),
            RequirementMode::CompanyRequirements => view.company_requirements.push(record),
            RequirementMode::ClearingItems => view.clearing_items.push(record),
        }
    }
    view
}

fn run_state_machine(content: &str) -> Vec<NarrativeRequirement> {
    let mut records = Vec::new();
    let mut acc = Accumulator::new(ParseState::Preamble);

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(state) = next_state(line) {
            records.extend(acc.flush());
            acc = Accumulator::new(state);
            continue;
        }
        if let Some((item_numbers, title)) = item_line(line) {
            acc.close_open();
            acc.open = Some(Draft {
                item_numbers,
                title,
                fields: Vec::new(),
                last_field: None,
            });
            continue;
        }
        let Some(draft) = acc.open.as_mut() else {
            continue;
        };
        let field = RECORD_FIELD
            .captures(line)
            .and_then(|caps| Some((FieldKind::from_label(caps.get(1)?.as_str())?, caps.get(2)?)));
        match field {
            Some((kind, value)) => {
                draft
                    .fields
                    .push((kind, value.as_str().replace("**", "").trim().to_string()));
                draft.last_field = Some(kind);
            }
            None => draft.append(line),
        }
    }
    records.extend(acc.flush());
    records
}

fn numbered_fallback(content: &str) -> Vec<NarrativeRequirement> {
    split_numbered_items(content)
        .into_iter()
        .map(|item| NarrativeRequirement {
            mode: RequirementMode::CompanyRequirements,
            item_numbers: vec![item.num],
            title: first_sentence(&item.raw, 120),
            details: stated_text(Some(&item.raw)),
            next_step: Stated::NotStated,
            owner: Stated::NotStated,
            closing_impact: Stated::NotStated,
            why_it_matters: Stated::NotStated,
            severity: Severity::Material,
        })
        .collect()
}

/// First occurrence of an item set wins; later ones only fill its gaps
fn dedupe(records: Vec<NarrativeRequirement>) -> Vec<NarrativeRequirement> {
    let mut kept: Vec<(Vec<u32>, NarrativeRequirement)> = Vec::new();
    for record in records {
        let key = sorted(record.item_numbers.clone());
        match kept.iter_mut().find(|(k, _)| *k == key) {
            Some((_, first)) => {
                if first.title.is_empty() {
                    first.title = record.title;
                }
                first.details.fill_from(record.details);
                first.next_step.fill_from(record.next_step);
                first.owner.fill_from(record.owner);
                first.why_it_matters.fill_from(record.why_it_matters);
                if first.closing_impact.is_not_stated() && record.closing_impact.is_value() {
                    first.closing_impact = record.closing_impact;
                    first.severity = record.severity;
                }
            }
            None => kept.push((key, record)),
        }
    }
    kept.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SECTION: &str = "\
### Action List
- Item #4: Statement of Information
  - Details: Required from all sellers.
  - Owner: Seller
  - Closing impact: Blocker - name hits must be cleared
- Items #7, #8: Payoff demands
  - Next step: Order demands from both lenders
  - Closing impact: Material

### Clearing Items
- Item #4: Statement of Information
  - Why it matters: Name hits can hold up recording.
- Item #12: Survey review
  - Closing impact: Informational
";

    #[test]
    fn test_sub_headers_drive_state() {
        assert_eq!(next_state("### Action List"), Some(ParseState::ActionList));
        assert_eq!(next_state("**Clearing Items:**"), Some(ParseState::ClearingItems));
        assert_eq!(next_state("Priority Schedule"), Some(ParseState::PrioritySchedule));
        assert_eq!(next_state("- Item #4: Statement"), None);
    }

    #[test]
    fn test_item_line_forms() {
        assert_eq!(item_line("- Item #7: Payoff"), Some((vec![7], "Payoff".to_string())));
        assert_eq!(
            item_line("**Items #3, #5:** Reconveyance"),
            Some((vec![3, 5], "Reconveyance".to_string()))
        );
        assert_eq!(item_line("Item 12 - Survey"), Some((vec![12], "Survey".to_string())));
        assert_eq!(item_line("Items to clear"), None);
    }

    #[test]
    fn test_records_land_in_their_lists() {
        let view = parse_requirements(SECTION);
        assert_eq!(view.action_list.len(), 2);
        assert_eq!(view.clearing_items.len(), 1);
        assert_eq!(view.clearing_items[0].item_numbers, vec![12]);
        assert_eq!(view.clearing_items[0].severity, Severity::Informational);
    }

    #[test]
    fn test_duplicate_item_fills_first_occurrence() {
        let view = parse_requirements(SECTION);
        let soi = &view.action_list[0];
        assert_eq!(soi.item_numbers, vec![4]);
        assert_eq!(soi.severity, Severity::Blocker);
        assert_eq!(soi.owner, Stated::Value("Seller".to_string()));
        assert_eq!(
            soi.why_it_matters,
            Stated::Value("Name hits can hold up recording.".to_string())
        );
    }

    #[test]
    fn test_missing_closing_impact_defaults_to_material() {
        let view = parse_requirements("- Item #9: Provide a survey\n  - Details: ALTA survey required.");
        let record = &view.company_requirements[0];
        assert_eq!(record.severity, Severity::Material);
        assert_eq!(record.closing_impact, Stated::NotStated);
        assert_eq!(record.next_step, Stated::NotStated);
    }

    #[test]
    fn test_numbered_items_when_no_item_lines() {
        let view = parse_requirements("1. Statement of Information.\n2. Payoff demand for item 7.");
        assert_eq!(view.company_requirements.len(), 2);
        assert_eq!(view.company_requirements[1].item_numbers, vec![2]);
        assert_eq!(view.company_requirements[1].severity, Severity::Material);
    }

    #[test]
    fn test_continuation_lines_extend_last_field() {
        let view = parse_requirements("- Item #2: Reconveyance\n  - Details: Lender must\n    record a reconveyance.");
        assert_eq!(
            view.company_requirements[0].details,
            Stated::Value("Lender must record a reconveyance.".to_string())
        );
    }

    #[test]
    fn test_count_item_lines_counts_distinct_sets() {
        assert_eq!(count_item_lines(SECTION), 3);
        assert_eq!(count_item_lines("No items."), 0);
    }
}
