//! End-to-end analysis of a report plus its narrative summary

use prelim_engine::{AnalysisInput, TitleEngine};
use prelim_types::{
    is_money_literal, ComplexityLevel, FindingImpact, RecordSource, RequirementType, SectionTitle,
    Severity, Stated, TitleAnalysis, NOT_STATED, UNCLEAR,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::Value;

const RAW: &str = "\
PRELIMINARY REPORT
Property Address: 456 Oak Ave, Springfield, CA 90001
APN: 222-333-444
Proposed Loan Amount: $600,000.00

At the date hereof exceptions to coverage are as follows:
1. General and special taxes for the fiscal year 2025-2026. Tax ID: 222-333-444 1st Installment: $3,000.00 PAID 2nd Installment: $3,000.00 DELINQUENT Penalty: $300.00
2. Taxes for the year 2019-2020 defaulted. Default No.: 19-0005555 Amount: $2,500.00, by March 2026 Amount: $2,650.00, by April 2026
3. A Deed of Trust to secure an indebtedness. Amount: $450,000.00 Trustor/Grantor: Jane Roe Beneficiary: ABC Bank Recording No.: 2019-0012345
4. A Notice of Default under the deed of trust shown as item no. 3. Recording No.: 2025-0001111
5. A Notice of Delinquent Assessment by Oak Grove Homeowners Association. Amount: $3,412.00
6. The Company will require a payoff demand from ABC Bank.";

const NARRATIVE: &str = "\
SUMMARY
Top Closing Risks
1. Notice of Default on the first deed of trust — lender has started foreclosure; must be resolved before closing.
2. Delinquent HOA assessment — $3,412.00 owed to the association.
The file otherwise appears routine.
REQUIREMENTS
COMPANY REQUIREMENTS
- Item #6: Payoff demand from ABC Bank
  - Closing impact: Material
  - Next step: Order the payoff demand today
- Item #9: Statement of Information from the buyer
  - Closing impact: Informational
LIENS AND ENCUMBRANCES
- Priority: 1st
- Type: Deed of Trust
- Beneficiary: ABC Bank
- Recording: 2019-0012345 on March 5, 2019
- Foreclosure: Notice of Default recorded
- Action: Order payoff demand
- Priority: 2nd
- Type: HELOC
- Lender: XYZ Credit Union
- Recording: 2021-0098765
TAXES AND ASSESSMENTS
Second installment is delinquent. Prior-year taxes are tax-defaulted.
OTHER FINDINGS
- Type: Easement
- Details: Public utility easement
- Impact: Low
DOCUMENT STATUS
- Report Type: Preliminary Report
- Order No.: 0123-4567";

const MONEY_KEYS: &[&str] = &[
    "amount",
    "firstInstallmentAmount",
    "secondInstallmentAmount",
    "penalty",
    "homeownerExemption",
    "proposedLoanAmount",
    "totalDelinquentAmount",
    "totalRedemptionAmount",
];

fn analyze(raw: &str, narrative: &str) -> TitleAnalysis {
    TitleEngine::new().analyze(&AnalysisInput::new(raw, narrative))
}

/// Every money-valued string in the facts, wherever it sits
fn money_values(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                match v {
                    Value::String(s) if MONEY_KEYS.contains(&key.as_str()) => out.push(s.clone()),
                    _ => money_values(v, out),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|v| money_values(v, out)),
        _ => {}
    }
}

fn assert_money_shape(analysis: &TitleAnalysis) {
    let json = serde_json::to_value(&analysis.facts).unwrap();
    let mut values = Vec::new();
    money_values(&json, &mut values);
    for value in values {
        assert!(
            is_money_literal(&value) || value == NOT_STATED || value == UNCLEAR,
            "bad money value {:?}",
            value
        );
    }
}

#[test]
fn test_full_report_facts() {
    let analysis = analyze(RAW, NARRATIVE);
    let facts = &analysis.facts;

    assert_eq!(
        facts.property.proposed_loan_amount,
        Stated::Value("$600,000.00".to_string())
    );
    assert_eq!(facts.tax_parcels.len(), 1);
    assert!(facts.has_delinquent_taxes);
    assert_eq!(facts.total_delinquent_amount, Stated::Value("$3,000.00".to_string()));
    assert_eq!(facts.total_redemption_amount, Stated::Value("$2,500.00".to_string()));
    assert_eq!(facts.tax_defaults[0].redemption_schedule.len(), 2);
    assert_eq!(facts.hoa_liens.len(), 1);
    assert_eq!(facts.hoa_liens[0].amount, Stated::Value("$3,412.00".to_string()));

    assert_eq!(facts.lien_records.len(), 1);
    let lien = &facts.lien_records[0];
    assert_eq!(lien.item_number, Some(3));
    assert!(lien.has_notice_of_default);
    assert_eq!(lien.amount, Stated::Value("$450,000.00".to_string()));
    assert_eq!(lien.recording_date, Stated::Value("March 5, 2019".to_string()));

    assert_money_shape(&analysis);
}

#[test]
fn test_full_report_views() {
    let analysis = analyze(RAW, NARRATIVE);
    let views = &analysis.views;

    let titles: Vec<_> = analysis.sections.iter().map(|s| s.title).collect();
    assert_eq!(
        titles,
        vec![
            SectionTitle::Requirements,
            SectionTitle::Summary,
            SectionTitle::Liens,
            SectionTitle::Taxes,
            SectionTitle::OtherFindings,
            SectionTitle::DocumentStatus,
        ]
    );

    let summary = views.summary.as_ref().unwrap();
    assert_eq!(summary.risks.len(), 2);
    assert_eq!(summary.risks[0].severity, Severity::Blocker);
    assert_eq!(summary.risks[1].severity, Severity::Material);

    // Only the card matching the extracted lien survives
    assert_eq!(views.liens.len(), 1);
    assert_eq!(views.liens[0].record, analysis.facts.lien_records[0]);

    let callout = views.taxes.as_ref().and_then(|t| t.callout.as_ref()).unwrap();
    assert_eq!(callout.source, RecordSource::Document);
    assert_eq!(callout.redemption_schedule.len(), 2);

    assert_eq!(views.findings.len(), 1);
    assert_eq!(views.findings[0].impact, FindingImpact::Low);
    assert_eq!(
        views.document_status.as_ref().unwrap().order_number,
        Stated::Value("0123-4567".to_string())
    );
    assert!(views.plain.is_empty());
}

#[test]
fn test_full_report_requirements_and_guidance() {
    let analysis = analyze(RAW, NARRATIVE);

    assert_eq!(analysis.requirements.len(), 2);
    assert_eq!(analysis.requirements[0].item_numbers, vec![6]);
    assert_eq!(analysis.requirements[0].source, RecordSource::Document);
    assert_eq!(
        analysis.requirements[0].classification.requirement_type,
        RequirementType::PayoffDemand
    );
    assert_eq!(analysis.requirements[1].item_numbers, vec![9]);
    assert_eq!(
        analysis.requirements[1].classification.severity,
        Severity::Informational
    );

    let complexity = &analysis.complexity;
    assert_eq!(
        complexity.blockers + complexity.material + complexity.informational,
        analysis.requirements.len()
    );
    assert_eq!(complexity.level, ComplexityLevel::Lower);

    assert_eq!(
        analysis.guidance[0].talking_point,
        "Item 6: Order the payoff demand today"
    );
}

#[test]
fn test_output_is_byte_identical_across_runs() {
    let first = serde_json::to_string(&analyze(RAW, NARRATIVE)).unwrap();
    let second = serde_json::to_string(&analyze(RAW, NARRATIVE)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_narrative_only_input() {
    let analysis = TitleEngine::new().analyze(&AnalysisInput::narrative(NARRATIVE));

    // With nothing extracted, both narrative liens are kept
    assert_eq!(analysis.facts.lien_records.len(), 2);
    assert_eq!(analysis.views.liens.len(), 2);
    assert!(analysis
        .requirements
        .iter()
        .all(|r| r.source == RecordSource::Narrative));
    let callout = analysis.views.taxes.unwrap().callout.unwrap();
    assert_eq!(callout.source, RecordSource::Narrative);
}

#[test]
fn test_blank_input() {
    let analysis = analyze("", "   ");
    assert!(analysis.facts.is_empty());
    assert!(analysis.requirements.is_empty());
    assert_eq!(analysis.complexity.label, "Lower complexity");
}

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Amount: $1,250.00, by March 2026".to_string()),
        Just("1st Installment: $2,129.89 DELINQUENT".to_string()),
        Just("2nd Installment: see attached".to_string()),
        Just("A Deed of Trust to secure an indebtedness. Amount: about 450k".to_string()),
        Just("Notice of Delinquent Assessment by Oak Grove HOA".to_string()),
        Just("taxes defaulted".to_string()),
        Just("- Amount: $12.00".to_string()),
        Just("- Priority: 1st".to_string()),
        Just("LIENS AND ENCUMBRANCES".to_string()),
        "[A-Za-z0-9 $.,:]{0,40}",
    ]
}

proptest! {
    /// Money fields are literals or sentinels, whatever the input
    #[test]
    fn money_fields_keep_their_shape(
        fragments in prop::collection::vec(fragment(), 0..12),
        numbered in any::<bool>()
    ) {
        let text: String = fragments
            .iter()
            .enumerate()
            .map(|(i, f)| if numbered { format!("{}. {}\n", i + 1, f) } else { format!("{}\n", f) })
            .collect();
        let analysis = analyze(&text, &text);
        assert_money_shape(&analysis);

        let c = &analysis.complexity;
        prop_assert_eq!(c.blockers + c.material + c.informational, analysis.requirements.len());
    }
}
