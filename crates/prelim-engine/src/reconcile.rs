//! Precedence between ground-truth facts and narrative data
//!
//! Facts read from the raw report always win. The narrative only fills fields
//! the report left `NOT_STATED`, and adds records the report did not have.

use prelim_types::{
    Classification, ComplexityLevel, ComplexitySummary, DocumentSection, LienCard, LienRecord,
    NarrativeRequirement, PropertyIdentity, RecordSource, RequirementRecord, RequirementsView,
    Severity, TitleAnalysis,
};
use tracing::debug;

use crate::classifier::classify;
use crate::extractors::Extraction;
use crate::fallback::NarrativeParse;
use crate::guidance::{build_guidance, narrative_text};

/// First row whose minimums are both met decides the level
pub struct ComplexityThreshold {
    pub min_blockers: usize,
    pub min_material: usize,
    pub level: ComplexityLevel,
}

pub const COMPLEXITY_THRESHOLDS: &[ComplexityThreshold] = &[
    ComplexityThreshold {
        min_blockers: 3,
        min_material: 0,
        level: ComplexityLevel::High,
    },
    ComplexityThreshold {
        min_blockers: 1,
        min_material: 0,
        level: ComplexityLevel::Moderate,
    },
    ComplexityThreshold {
        min_blockers: 0,
        min_material: 3,
        level: ComplexityLevel::Moderate,
    },
    ComplexityThreshold {
        min_blockers: 0,
        min_material: 0,
        level: ComplexityLevel::Lower,
    },
];

pub fn complexity(records: &[RequirementRecord]) -> ComplexitySummary {
    let count = |severity: Severity| {
        records
            .iter()
            .filter(|r| r.classification.severity == severity)
            .count()
    };
    let blockers = count(Severity::Blocker);
    let material = count(Severity::Material);
    let informational = count(Severity::Informational);

    let level = COMPLEXITY_THRESHOLDS
        .iter()
        .find(|t| blockers >= t.min_blockers && material >= t.min_material)
        .map(|t| t.level)
        .unwrap_or(ComplexityLevel::Lower);

    ComplexitySummary {
        blockers,
        material,
        informational,
        level,
        label: level.label().to_string(),
    }
}

/// Ground fields win; the narrative fills `NOT_STATED` gaps
pub fn merge_property(mut ground: PropertyIdentity, narrative: PropertyIdentity) -> PropertyIdentity {
    ground.address.fill_from(narrative.address);
    ground.parcel_id.fill_from(narrative.parcel_id);
    ground.effective_date.fill_from(narrative.effective_date);
    ground
        .proposed_loan_amount
        .fill_from(narrative.proposed_loan_amount);
    ground.proposed_lender.fill_from(narrative.proposed_lender);
    ground
}

fn same_lien(ground: &LienRecord, narrative: &LienRecord) -> bool {
    match (ground.recording_number.value(), narrative.recording_number.value()) {
        (Some(a), Some(b)) => a == b,
        _ => ground.position == narrative.position,
    }
}

/// Merge narrative lien cards into the extracted liens.
///
/// With no extracted liens the narrative's are used as-is. Otherwise each
/// card that matches an extracted lien fills that lien's gaps and is shown
/// with the merged record; cards matching nothing are dropped.
pub fn reconcile_liens(
    mut ground: Vec<LienRecord>,
    cards: Vec<LienCard>,
) -> (Vec<LienRecord>, Vec<LienCard>) {
    if ground.is_empty() {
        let records = cards.iter().map(|c| c.record.clone()).collect();
        return (records, cards);
    }

    let matched: Vec<(usize, LienCard)> = cards
        .into_iter()
        .filter_map(|card| {
            let index = ground.iter().position(|g| same_lien(g, &card.record))?;
            Some((index, card))
        })
        .collect();

    for (index, card) in &matched {
        ground[*index].fill_gaps_from(&card.record);
    }

    let cards = matched
        .into_iter()
        .map(|(index, mut card)| {
            card.record = ground[index].clone();
            card
        })
        .collect();
    (ground, cards)
}

/// A requirement record read from the narrative
pub fn narrative_record(requirement: &NarrativeRequirement) -> RequirementRecord {
    let raw = narrative_text(requirement);
    let requirement_type = classify(&raw).requirement_type;
    RequirementRecord {
        item_numbers: requirement.item_numbers.clone(),
        raw,
        classification: Classification {
            requirement_type,
            severity: requirement.severity,
        },
        source: RecordSource::Narrative,
    }
}

/// Extracted records first; narrative records are appended unless an
/// extracted record already covers one of their item numbers
pub fn merge_requirements(
    document: Vec<RequirementRecord>,
    narrative: Option<&RequirementsView>,
) -> Vec<RequirementRecord> {
    let covered: Vec<u32> = document
        .iter()
        .flat_map(|r| r.item_numbers.iter().copied())
        .collect();

    let mut records = document;
    if let Some(view) = narrative {
        records.extend(
            view.iter()
                .filter(|r| !r.item_numbers.iter().any(|n| covered.contains(n)))
                .map(narrative_record),
        );
    }
    records
}

/// Combine extractor output and parsed narrative into the final analysis
pub fn reconcile(
    extraction: Extraction,
    sections: Vec<DocumentSection>,
    parse: NarrativeParse,
) -> TitleAnalysis {
    let Extraction {
        mut facts,
        requirements,
    } = extraction;
    let NarrativeParse {
        property,
        tax_parcels,
        mut views,
    } = parse;

    facts.property = merge_property(facts.property, property);
    if facts.tax_parcels.is_empty() {
        facts.tax_parcels = tax_parcels;
    }

    let (lien_records, cards) =
        reconcile_liens(std::mem::take(&mut facts.lien_records), std::mem::take(&mut views.liens));
    facts.lien_records = lien_records;
    views.liens = cards;
    facts.refresh_aggregates();

    let requirements = merge_requirements(requirements, views.requirements.as_ref());
    let guidance = build_guidance(&requirements, views.requirements.as_ref());
    let complexity = complexity(&requirements);

    debug!(
        requirements = requirements.len(),
        liens = facts.lien_records.len(),
        level = complexity.label.as_str(),
        "Reconciled analysis"
    );

    TitleAnalysis {
        facts,
        sections,
        requirements,
        guidance,
        complexity,
        views,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prelim_types::{RequirementMode, RequirementType, Stated};

    fn record(items: &[u32], severity: Severity) -> RequirementRecord {
        RequirementRecord {
            item_numbers: items.to_vec(),
            raw: String::new(),
            classification: Classification {
                requirement_type: RequirementType::Unspecified,
                severity,
            },
            source: RecordSource::Document,
        }
    }

    fn lien(position: &str, recording: Stated<String>) -> LienRecord {
        LienRecord {
            position: position.to_string(),
            recording_number: recording,
            ..LienRecord::default()
        }
    }

    fn card(record: LienRecord) -> LienCard {
        LienCard {
            record,
            lien_type: Stated::Value("Deed of Trust".to_string()),
            status: Stated::NotStated,
            foreclosure_info: Stated::NotStated,
            suggested_action: Stated::NotStated,
        }
    }

    fn narrative(items: &[u32], title: &str, severity: Severity) -> NarrativeRequirement {
        NarrativeRequirement {
            mode: RequirementMode::CompanyRequirements,
            item_numbers: items.to_vec(),
            title: title.to_string(),
            details: Stated::NotStated,
            next_step: Stated::NotStated,
            owner: Stated::NotStated,
            closing_impact: Stated::NotStated,
            why_it_matters: Stated::NotStated,
            severity,
        }
    }

    #[test]
    fn test_complexity_moderate_with_two_blockers() {
        let mut records = vec![record(&[1], Severity::Blocker), record(&[2], Severity::Blocker)];
        records.extend((3..7).map(|n| record(&[n], Severity::Material)));
        records.push(record(&[7], Severity::Informational));

        let summary = complexity(&records);
        assert_eq!(summary.label, "Moderate complexity");
        assert_eq!(
            (summary.blockers, summary.material, summary.informational),
            (2, 4, 1)
        );
        assert_eq!(
            summary.blockers + summary.material + summary.informational,
            records.len()
        );
    }

    #[test]
    fn test_complexity_levels() {
        let three_blockers: Vec<_> = (1..4).map(|n| record(&[n], Severity::Blocker)).collect();
        assert_eq!(complexity(&three_blockers).level, ComplexityLevel::High);

        let three_material: Vec<_> = (1..4).map(|n| record(&[n], Severity::Material)).collect();
        assert_eq!(complexity(&three_material).level, ComplexityLevel::Moderate);

        let two_material: Vec<_> = (1..3).map(|n| record(&[n], Severity::Material)).collect();
        assert_eq!(complexity(&two_material).label, "Lower complexity");
        assert_eq!(complexity(&[]).level, ComplexityLevel::Lower);
    }

    #[test]
    fn test_merge_property_fills_gaps_only() {
        let ground = PropertyIdentity {
            parcel_id: Stated::Value("123-456-789".to_string()),
            ..PropertyIdentity::default()
        };
        let narrative = PropertyIdentity {
            address: Stated::Value("123 Main St".to_string()),
            parcel_id: Stated::Value("999-999-999".to_string()),
            ..PropertyIdentity::default()
        };
        let merged = merge_property(ground, narrative);
        assert_eq!(merged.parcel_id, Stated::Value("123-456-789".to_string()));
        assert_eq!(merged.address, Stated::Value("123 Main St".to_string()));
    }

    #[test]
    fn test_ground_liens_win_and_unmatched_cards_drop() {
        let mut ground_lien = lien("1st", Stated::Value("2019-0012345".to_string()));
        ground_lien.amount = Stated::Value("$450,000.00".to_string());

        let mut matching = lien("2nd", Stated::Value("2019-0012345".to_string()));
        matching.amount = Stated::Value("$1.00".to_string());
        matching.beneficiary = Stated::Value("ABC Bank".to_string());
        matching.has_notice_of_default = true;
        let stray = lien("3rd", Stated::Value("2020-0000001".to_string()));

        let (records, cards) = reconcile_liens(vec![ground_lien], vec![card(matching), card(stray)]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, Stated::Value("$450,000.00".to_string()));
        assert_eq!(records[0].beneficiary, Stated::Value("ABC Bank".to_string()));
        assert!(records[0].has_notice_of_default);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].record, records[0]);
    }

    #[test]
    fn test_liens_match_by_position_without_recording_numbers() {
        let ground = lien("1st", Stated::NotStated);
        let mut narrative = lien("1st", Stated::Value("2019-0012345".to_string()));
        narrative.trustee = Stated::Value("First American Title Company".to_string());

        let (records, _) = reconcile_liens(vec![ground], vec![card(narrative)]);
        assert_eq!(
            records[0].recording_number,
            Stated::Value("2019-0012345".to_string())
        );
        assert_eq!(
            records[0].trustee,
            Stated::Value("First American Title Company".to_string())
        );
    }

    #[test]
    fn test_narrative_liens_used_when_none_extracted() {
        let narrative = lien("1st", Stated::Value("2019-0012345".to_string()));
        let (records, cards) = reconcile_liens(Vec::new(), vec![card(narrative.clone())]);
        assert_eq!(records, vec![narrative]);
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn test_document_record_wins_per_item_number() {
        let document = vec![RequirementRecord {
            item_numbers: vec![7],
            raw: "Statement of Information".to_string(),
            classification: Classification {
                requirement_type: RequirementType::StatementOfInformation,
                severity: Severity::Material,
            },
            source: RecordSource::Document,
        }];
        let view = RequirementsView {
            company_requirements: vec![
                narrative(&[7], "Payoff demand", Severity::Blocker),
                narrative(&[9], "Informational note about the CC&Rs", Severity::Informational),
            ],
            ..RequirementsView::default()
        };

        let merged = merge_requirements(document, Some(&view));
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].source, RecordSource::Document);
        assert_eq!(merged[1].item_numbers, vec![9]);
        assert_eq!(merged[1].source, RecordSource::Narrative);
        assert_eq!(merged[1].classification.severity, Severity::Informational);
    }

    #[test]
    fn test_narrative_record_classifies_title_and_details() {
        let mut requirement = narrative(&[4], "Lender payoff", Severity::Material);
        requirement.details = Stated::Value("Obtain a payoff demand from ABC Bank".to_string());
        let record = narrative_record(&requirement);
        assert_eq!(
            record.classification.requirement_type,
            RequirementType::PayoffDemand
        );
        assert_eq!(record.raw, "Lender payoff: Obtain a payoff demand from ABC Bank");
    }
}
