use prelim_types::{DocumentStatusView, LabeledValue, Stated};

use super::field_line;
use crate::patterns::stated_text;

#[derive(Debug, Clone, Copy)]
enum StatusField {
    ReportType,
    EffectiveDate,
    OrderNumber,
    Underwriter,
    Officer,
    Scope,
    PageCount,
    Status,
}

const STATUS_LABELS: &[(&str, StatusField)] = &[
    ("report type", StatusField::ReportType),
    ("type", StatusField::ReportType),
    ("effective date", StatusField::EffectiveDate),
    ("as of", StatusField::EffectiveDate),
    ("order number", StatusField::OrderNumber),
    ("order no", StatusField::OrderNumber),
    ("order #", StatusField::OrderNumber),
    ("file no", StatusField::OrderNumber),
    ("file number", StatusField::OrderNumber),
    ("underwriter", StatusField::Underwriter),
    ("title officer", StatusField::Officer),
    ("officer", StatusField::Officer),
    ("escrow officer", StatusField::Officer),
    ("scope", StatusField::Scope),
    ("coverage", StatusField::Scope),
    ("page count", StatusField::PageCount),
    ("pages", StatusField::PageCount),
    ("status", StatusField::Status),
    ("report status", StatusField::Status),
];

impl StatusField {
    fn slot<'a>(&self, view: &'a mut DocumentStatusView) -> &'a mut Stated<String> {
        match self {
            StatusField::ReportType => &mut view.report_type,
            StatusField::EffectiveDate => &mut view.effective_date,
            StatusField::OrderNumber => &mut view.order_number,
            StatusField::Underwriter => &mut view.underwriter,
            StatusField::Officer => &mut view.officer,
            StatusField::Scope => &mut view.scope,
            StatusField::PageCount => &mut view.page_count,
            StatusField::Status => &mut view.status,
        }
    }
}

/// Known labels fill their slot (first stated value wins); anything else is
/// kept in `additional` as written
pub fn parse_document_status(content: &str) -> DocumentStatusView {
    let mut view = DocumentStatusView::default();

    for field in content.lines().filter_map(field_line) {
        let known = STATUS_LABELS
            .iter()
            .find(|(label, _)| *label == field.label)
            .map(|(_, slot)| *slot);

        match known {
            Some(slot) => slot.slot(&mut view).fill_from(stated_text(Some(&field.value))),
            None if !field.value.is_empty() => view.additional.push(LabeledValue {
                label: field.raw_label,
                value: field.value,
            }),
            None => {}
        }
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_and_additional_labels() {
        let content = "- Report Type: Preliminary Report\n- Effective Date: January 2, 2026\n- Order No.: 0123-4567\n- Underwriter: First American Title Insurance Company\n- Title Officer: Jane Smith\n- Pages: 14\n- Status: Complete\n- Escrow No.: E-998";
        let view = parse_document_status(content);

        assert_eq!(view.report_type, Stated::Value("Preliminary Report".to_string()));
        assert_eq!(view.order_number, Stated::Value("0123-4567".to_string()));
        assert_eq!(view.officer, Stated::Value("Jane Smith".to_string()));
        assert_eq!(view.page_count, Stated::Value("14".to_string()));
        assert_eq!(view.status, Stated::Value("Complete".to_string()));
        assert_eq!(view.scope, Stated::NotStated);
        assert_eq!(
            view.additional,
            vec![LabeledValue {
                label: "Escrow No.".to_string(),
                value: "E-998".to_string(),
            }]
        );
        assert!(!view.is_empty());
    }

    #[test]
    fn test_sentinel_values() {
        let view = parse_document_status("- Underwriter: Not stated\n- Scope: unclear");
        assert_eq!(view.underwriter, Stated::NotStated);
        assert_eq!(view.scope, Stated::Unclear);
    }

    #[test]
    fn test_prose_only_is_empty() {
        assert!(parse_document_status("The report appears complete.").is_empty());
    }
}
