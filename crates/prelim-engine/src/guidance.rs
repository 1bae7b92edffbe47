//! Closing-agent cheat sheet built from classified requirements

use prelim_types::{
    AgentGuidanceItem, NarrativeRequirement, RequirementRecord, RequirementType, RequirementsView,
    Severity, Stated,
};
use tracing::debug;

use crate::classifier::classify;

/// Fixed guidance text for one requirement type
pub struct Guidance {
    pub requirement_type: RequirementType,
    pub label: &'static str,
    pub why_it_matters: &'static str,
    pub responsible_party: &'static str,
    pub ask: &'static str,
}

pub static GUIDANCE: &[Guidance] = &[
    Guidance {
        requirement_type: RequirementType::StatementOfInformationHits,
        label: "Statement of Information (name hits)",
        why_it_matters: "Judgments or liens recorded against similar names attach to the deal until the parties are ruled out.",
        responsible_party: "Buyer and seller",
        ask: "Please complete and return your Statements of Information so the name hits can be cleared.",
    },
    Guidance {
        requirement_type: RequirementType::StatementOfInformation,
        label: "Statement of Information",
        why_it_matters: "The title company uses it to rule out liens against people with similar names.",
        responsible_party: "All parties",
        ask: "Please complete the Statement of Information in your escrow package.",
    },
    Guidance {
        requirement_type: RequirementType::SuspendedCorporationCure,
        label: "Suspended entity revival",
        why_it_matters: "A suspended entity cannot convey or encumber title until it is revived.",
        responsible_party: "Entity owner",
        ask: "Please provide proof of revivor from the Secretary of State and the Franchise Tax Board.",
    },
    Guidance {
        requirement_type: RequirementType::LlcAuthority,
        label: "LLC authority documents",
        why_it_matters: "The title company must confirm who may sign for the LLC.",
        responsible_party: "LLC members or managers",
        ask: "Please send the operating agreement and a current Statement of Information for the LLC.",
    },
    Guidance {
        requirement_type: RequirementType::CorporateAuthority,
        label: "Corporate authority resolution",
        why_it_matters: "Signers for a corporation need a board resolution authorizing the transaction.",
        responsible_party: "Corporate officers",
        ask: "Please provide a resolution authorizing this transaction and naming the signers.",
    },
    Guidance {
        requirement_type: RequirementType::TrustCertification,
        label: "Certification of trust",
        why_it_matters: "The trustee's power to sell or borrow must be confirmed before the trust can sign.",
        responsible_party: "Trustee",
        ask: "Please provide a certification of trust signed by the current trustee.",
    },
    Guidance {
        requirement_type: RequirementType::SpousalJoinder,
        label: "Spousal joinder",
        why_it_matters: "A spouse may hold a community property interest that must be joined or released.",
        responsible_party: "Seller and spouse",
        ask: "Please confirm marital status; the spouse may need to sign or quitclaim.",
    },
    Guidance {
        requirement_type: RequirementType::MultiBeneficiaryDemand,
        label: "Demand signed by all beneficiaries",
        why_it_matters: "A loan with several beneficiaries cannot be paid off until each one signs the demand.",
        responsible_party: "Lender or servicer",
        ask: "Please have every beneficiary sign the payoff demand.",
    },
    Guidance {
        requirement_type: RequirementType::ReconveyancePackage,
        label: "Reconveyance package",
        why_it_matters: "A paid loan still clouds title until its deed of trust is reconveyed.",
        responsible_party: "Prior lender",
        ask: "Please provide the original note and deed of trust with a request for full reconveyance.",
    },
    Guidance {
        requirement_type: RequirementType::ReconveyanceConfirmation,
        label: "Reconveyance confirmation",
        why_it_matters: "The title company must see the old loan released of record.",
        responsible_party: "Prior lender or trustee",
        ask: "Please confirm the reconveyance recorded, or send a copy.",
    },
    Guidance {
        requirement_type: RequirementType::HoaClearance,
        label: "HOA clearance",
        why_it_matters: "Unpaid dues and association liens are collected through escrow.",
        responsible_party: "HOA or management company",
        ask: "Please order the HOA demand and resale documents.",
    },
    Guidance {
        requirement_type: RequirementType::SubordinationAgreement,
        label: "Subordination agreement",
        why_it_matters: "An existing lien must move behind the new loan for the lender to get first position.",
        responsible_party: "Existing lienholder",
        ask: "Please obtain a recordable subordination agreement from the existing lienholder.",
    },
    Guidance {
        requirement_type: RequirementType::PayoffDemand,
        label: "Payoff demand",
        why_it_matters: "Escrow cannot close without an exact payoff figure for each lien being paid.",
        responsible_party: "Lender or servicer",
        ask: "Please request a written payoff demand from the lender.",
    },
    Guidance {
        requirement_type: RequirementType::Unspecified,
        label: "Title company requirement",
        why_it_matters: "The title company lists this as a condition of insuring.",
        responsible_party: "Escrow officer",
        ask: "Please review this requirement with the title officer.",
    },
];

/// Guidance entry for a type; every type has one
pub fn guidance_for(requirement_type: RequirementType) -> &'static Guidance {
    GUIDANCE
        .iter()
        .find(|g| g.requirement_type == requirement_type)
        .unwrap_or(&GUIDANCE[GUIDANCE.len() - 1])
}

pub fn label_for(requirement_type: RequirementType) -> &'static str {
    guidance_for(requirement_type).label
}

pub fn timing_for(severity: Severity) -> &'static str {
    match severity {
        Severity::Blocker => "Resolve before signing",
        Severity::Material => "Resolve before closing",
        Severity::Informational => "For awareness",
    }
}

/// `Item 7: …` or `Items 3, 5: …`
fn talking_point(item_numbers: &[u32], ask: &str) -> String {
    let joined = item_numbers
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    match item_numbers.len() {
        0 => ask.to_string(),
        1 => format!("Item {}: {}", joined, ask),
        _ => format!("Items {}: {}", joined, ask),
    }
}

/// The narrative record that speaks for a group: one sharing an item
/// number, else one classified as the same type
fn narrative_match<'a>(
    view: Option<&'a RequirementsView>,
    requirement_type: RequirementType,
    item_numbers: &[u32],
) -> Option<&'a NarrativeRequirement> {
    let view = view?;
    view.iter()
        .find(|r| r.item_numbers.iter().any(|n| item_numbers.contains(n)))
        .or_else(|| {
            view.iter()
                .find(|r| classify(&narrative_text(r)).requirement_type == requirement_type)
        })
}

/// Text a narrative requirement is classified on
pub fn narrative_text(requirement: &NarrativeRequirement) -> String {
    match &requirement.details {
        Stated::Value(details) => format!("{}: {}", requirement.title, details),
        _ => requirement.title.clone(),
    }
}

fn override_or(value: &Stated<String>, default: &str) -> String {
    value.value().cloned().unwrap_or_else(|| default.to_string())
}

/// One guidance item per requirement type, in first-appearance order.
///
/// Item numbers are the union over every record of the type (sorted) and
/// severity is the most severe among them.
pub fn build_guidance(
    records: &[RequirementRecord],
    narrative: Option<&RequirementsView>,
) -> Vec<AgentGuidanceItem> {
    let mut groups: Vec<(RequirementType, Vec<u32>, Severity)> = Vec::new();
    for record in records {
        let kind = record.classification.requirement_type;
        let severity = record.classification.severity;
        match groups.iter_mut().find(|(t, _, _)| *t == kind) {
            Some((_, items, worst)) => {
                items.extend(&record.item_numbers);
                *worst = (*worst).min(severity);
            }
            None => groups.push((kind, record.item_numbers.clone(), severity)),
        }
    }

    let guidance: Vec<AgentGuidanceItem> = groups
        .into_iter()
        .map(|(requirement_type, mut item_numbers, severity)| {
            item_numbers.sort_unstable();
            item_numbers.dedup();

            let defaults = guidance_for(requirement_type);
            let matched = narrative_match(narrative, requirement_type, &item_numbers);
            let (why, party, ask) = match matched {
                Some(r) => (
                    override_or(&r.why_it_matters, defaults.why_it_matters),
                    override_or(&r.owner, defaults.responsible_party),
                    override_or(&r.next_step, defaults.ask),
                ),
                None => (
                    defaults.why_it_matters.to_string(),
                    defaults.responsible_party.to_string(),
                    defaults.ask.to_string(),
                ),
            };

            AgentGuidanceItem {
                talking_point: talking_point(&item_numbers, &ask),
                item_numbers,
                requirement_type,
                label: defaults.label.to_string(),
                severity,
                why_it_matters: why,
                responsible_party: party,
                timing: timing_for(severity).to_string(),
            }
        })
        .collect();

    debug!(items = guidance.len(), "Built agent guidance");
    guidance
}
