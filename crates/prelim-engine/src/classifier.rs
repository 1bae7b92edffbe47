//! Requirement classifier
//!
//! An ordered rule table: each rule pairs a predicate over the lowercased
//! clause with a requirement type, and the first match wins. The last rule
//! always matches, so classification is total.

use lazy_static::lazy_static;
use prelim_types::{Classification, RequirementType};
use regex::Regex;

use crate::patterns::contains_any;

lazy_static! {
    static ref LLC_WORD: Regex = Regex::new(r"\bl\.?l\.?c\b").unwrap();
    static ref HOA_WORD: Regex = Regex::new(r"\bhoa\b").unwrap();
    static ref HITS_WORD: Regex = Regex::new(r"\bhits?\b").unwrap();
    static ref TRUST_INSTRUMENT: Regex = Regex::new(
        r"certification of trust|certificate of trust|trust certification|trust agreement|\b(?:revocable|irrevocable|living|family|survivor'?s?)\s+trust\b"
    )
    .unwrap();
}

const STATEMENT_OF_INFORMATION: &[&str] = &["statement of information", "statements of information"];

const NAME_SEARCH_HITS: &[&str] = &[
    "similar name",
    "similar names",
    "same or similar",
    "name search",
    "name index",
    "general index",
    "may be the same party",
    "against a party with",
];

const CORPORATE_ENTITY: &[&str] = &["corporation", "corporate", " inc.", " inc,"];

const AUTHORITY: &[&str] = &[
    "resolution",
    "authoriz",
    "authority",
    "officers",
    "bylaws",
    "good standing",
    "incumbency",
];

const LLC_DOCUMENTS: &[&str] = &[
    "operating agreement",
    "articles of organization",
    "authority",
    "authoriz",
    "members",
    "manager",
    "statement of information",
];

const SPOUSAL: &[&str] = &[
    "spouse",
    "spousal",
    "joinder",
    "community property",
    "domestic partner",
    "marital status",
];

const RECONVEYANCE_PACKAGE: &[&str] = &[
    "request for full reconveyance",
    "request for reconveyance",
    "original note",
    "original promissory note",
    "reconveyance package",
    "reconveyance fee",
];

const ASSOCIATION: &[&str] = &[
    "homeowners association",
    "homeowners' association",
    "homeowner's association",
    "owners association",
    "owners' association",
    "association dues",
];

const PAYOFF: &[&str] = &[
    "payoff",
    "pay-off",
    "pay off",
    "beneficiary's demand",
    "beneficiary demand",
    "paid in full",
    "paid off",
];

/// One entry of the classification table
pub struct ClassificationRule {
    pub requirement_type: RequirementType,
    matches: fn(&str) -> bool,
}

impl ClassificationRule {
    /// Test the rule against already-lowercased text
    pub fn matches(&self, text_lower: &str) -> bool {
        (self.matches)(text_lower)
    }
}

fn is_statement_of_information_hits(t: &str) -> bool {
    contains_any(t, STATEMENT_OF_INFORMATION)
        && (contains_any(t, NAME_SEARCH_HITS) || HITS_WORD.is_match(t))
}

fn is_statement_of_information(t: &str) -> bool {
    contains_any(t, STATEMENT_OF_INFORMATION)
}

fn is_suspended_corporation(t: &str) -> bool {
    t.contains("suspended")
        && contains_any(
            t,
            &["corporation", "franchise tax", "secretary of state", "revivor", "good standing", "llc"],
        )
}

fn is_llc_authority(t: &str) -> bool {
    (t.contains("limited liability company") || LLC_WORD.is_match(t)) && contains_any(t, LLC_DOCUMENTS)
}

fn is_corporate_authority(t: &str) -> bool {
    contains_any(t, CORPORATE_ENTITY) && contains_any(t, AUTHORITY)
}

fn is_trust_certification(t: &str) -> bool {
    TRUST_INSTRUMENT.is_match(t)
}

fn is_spousal_joinder(t: &str) -> bool {
    contains_any(t, SPOUSAL) || (t.contains("husband") && t.contains("wife"))
}

fn is_multi_beneficiary_demand(t: &str) -> bool {
    (t.contains("beneficiaries") && contains_any(t, &["demand", "payoff"]))
        || contains_any(t, &["each beneficiary", "multiple beneficiaries", "all beneficiaries"])
}

fn is_reconveyance_package(t: &str) -> bool {
    contains_any(t, RECONVEYANCE_PACKAGE)
}

fn is_reconveyance_confirmation(t: &str) -> bool {
    t.contains("reconvey")
}

fn is_hoa_clearance(t: &str) -> bool {
    HOA_WORD.is_match(t) || contains_any(t, ASSOCIATION)
}

fn is_subordination(t: &str) -> bool {
    t.contains("subordinat")
}

fn is_payoff_demand(t: &str) -> bool {
    contains_any(t, PAYOFF)
}

fn always(_: &str) -> bool {
    true
}

/// The classification table, in evaluation order
pub static RULES: &[ClassificationRule] = &[
    ClassificationRule {
        requirement_type: RequirementType::StatementOfInformationHits,
        matches: is_statement_of_information_hits,
    },
    ClassificationRule {
        requirement_type: RequirementType::StatementOfInformation,
        matches: is_statement_of_information,
    },
    ClassificationRule {
        requirement_type: RequirementType::SuspendedCorporationCure,
        matches: is_suspended_corporation,
    },
    ClassificationRule {
        requirement_type: RequirementType::LlcAuthority,
        matches: is_llc_authority,
    },
    ClassificationRule {
        requirement_type: RequirementType::CorporateAuthority,
        matches: is_corporate_authority,
    },
    ClassificationRule {
        requirement_type: RequirementType::TrustCertification,
        matches: is_trust_certification,
    },
    ClassificationRule {
        requirement_type: RequirementType::SpousalJoinder,
        matches: is_spousal_joinder,
    },
    ClassificationRule {
        requirement_type: RequirementType::MultiBeneficiaryDemand,
        matches: is_multi_beneficiary_demand,
    },
    ClassificationRule {
        requirement_type: RequirementType::ReconveyancePackage,
        matches: is_reconveyance_package,
    },
    ClassificationRule {
        requirement_type: RequirementType::ReconveyanceConfirmation,
        matches: is_reconveyance_confirmation,
    },
    ClassificationRule {
        requirement_type: RequirementType::HoaClearance,
        matches: is_hoa_clearance,
    },
    ClassificationRule {
        requirement_type: RequirementType::SubordinationAgreement,
        matches: is_subordination,
    },
    ClassificationRule {
        requirement_type: RequirementType::PayoffDemand,
        matches: is_payoff_demand,
    },
    ClassificationRule {
        requirement_type: RequirementType::Unspecified,
        matches: always,
    },
];

/// Classify a requirement clause. Pure and total.
pub fn classify(text: &str) -> Classification {
    let lower = text.to_lowercase();
    let requirement_type = RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.requirement_type)
        .unwrap_or(RequirementType::Unspecified);

    Classification {
        requirement_type,
        severity: requirement_type.default_severity(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use prelim_types::Severity;

    proptest! {
        /// Classification is deterministic and never returns Informational
        #[test]
        fn classify_is_pure_and_total(text in "\\PC{0,300}") {
            let first = classify(&text);
            let second = classify(&text);
            prop_assert_eq!(first, second);
            prop_assert_ne!(first.severity, Severity::Informational);
            prop_assert_eq!(first.severity, first.requirement_type.default_severity());
        }
    }
}
