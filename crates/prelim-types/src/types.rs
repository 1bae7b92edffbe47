use serde::{Deserialize, Serialize};

/// How strongly a requirement affects the ability to close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Blocker,
    Material,
    Informational,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Blocker => "Blocker",
            Severity::Material => "Material",
            Severity::Informational => "Informational",
        }
    }
}

/// Closed requirement taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementType {
    StatementOfInformationHits,
    StatementOfInformation,
    SuspendedCorporationCure,
    LlcAuthority,
    CorporateAuthority,
    TrustCertification,
    SpousalJoinder,
    MultiBeneficiaryDemand,
    ReconveyancePackage,
    ReconveyanceConfirmation,
    HoaClearance,
    SubordinationAgreement,
    PayoffDemand,
    Unspecified,
}

impl RequirementType {
    pub const ALL: [RequirementType; 14] = [
        RequirementType::StatementOfInformationHits,
        RequirementType::StatementOfInformation,
        RequirementType::SuspendedCorporationCure,
        RequirementType::LlcAuthority,
        RequirementType::CorporateAuthority,
        RequirementType::TrustCertification,
        RequirementType::SpousalJoinder,
        RequirementType::MultiBeneficiaryDemand,
        RequirementType::ReconveyancePackage,
        RequirementType::ReconveyanceConfirmation,
        RequirementType::HoaClearance,
        RequirementType::SubordinationAgreement,
        RequirementType::PayoffDemand,
        RequirementType::Unspecified,
    ];

    /// Fixed severity carried by each type
    pub fn default_severity(&self) -> Severity {
        match self {
            RequirementType::StatementOfInformationHits
            | RequirementType::SuspendedCorporationCure
            | RequirementType::LlcAuthority
            | RequirementType::CorporateAuthority
            | RequirementType::TrustCertification
            | RequirementType::SpousalJoinder => Severity::Blocker,
            RequirementType::StatementOfInformation
            | RequirementType::MultiBeneficiaryDemand
            | RequirementType::ReconveyancePackage
            | RequirementType::ReconveyanceConfirmation
            | RequirementType::HoaClearance
            | RequirementType::SubordinationAgreement
            | RequirementType::PayoffDemand
            | RequirementType::Unspecified => Severity::Material,
        }
    }

    /// Wire name, e.g. `statement_of_information_hits`
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementType::StatementOfInformationHits => "statement_of_information_hits",
            RequirementType::StatementOfInformation => "statement_of_information",
            RequirementType::SuspendedCorporationCure => "suspended_corporation_cure",
            RequirementType::LlcAuthority => "llc_authority",
            RequirementType::CorporateAuthority => "corporate_authority",
            RequirementType::TrustCertification => "trust_certification",
            RequirementType::SpousalJoinder => "spousal_joinder",
            RequirementType::MultiBeneficiaryDemand => "multi_beneficiary_demand",
            RequirementType::ReconveyancePackage => "reconveyance_package",
            RequirementType::ReconveyanceConfirmation => "reconveyance_confirmation",
            RequirementType::HoaClearance => "hoa_clearance",
            RequirementType::SubordinationAgreement => "subordination_agreement",
            RequirementType::PayoffDemand => "payoff_demand",
            RequirementType::Unspecified => "unspecified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub requirement_type: RequirementType,
    pub severity: Severity,
}

/// Which input a record was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    /// Raw extracted report text
    Document,
    /// The narrative summary
    Narrative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementRecord {
    pub item_numbers: Vec<u32>,
    pub raw: String,
    pub classification: Classification,
    pub source: RecordSource,
}

/// Cheat-sheet entry for the closing agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentGuidanceItem {
    pub item_numbers: Vec<u32>,
    pub requirement_type: RequirementType,
    pub label: String,
    pub severity: Severity,
    pub why_it_matters: String,
    pub responsible_party: String,
    pub timing: String,
    pub talking_point: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    High,
    Moderate,
    Lower,
}

impl ComplexityLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ComplexityLevel::High => "High complexity",
            ComplexityLevel::Moderate => "Moderate complexity",
            ComplexityLevel::Lower => "Lower complexity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexitySummary {
    pub blockers: usize,
    pub material: usize,
    pub informational: usize,
    pub level: ComplexityLevel,
    pub label: String,
}

/// Section titles in canonical display order, plus the pass-through bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionTitle {
    Requirements,
    Summary,
    Property,
    Liens,
    Taxes,
    #[serde(rename = "Other Findings")]
    OtherFindings,
    #[serde(rename = "Document Status")]
    DocumentStatus,
    /// Content found outside every known header
    Other,
}

impl SectionTitle {
    /// The seven headers the narrative protocol defines, in canonical order
    pub const CANONICAL: [SectionTitle; 7] = [
        SectionTitle::Requirements,
        SectionTitle::Summary,
        SectionTitle::Property,
        SectionTitle::Liens,
        SectionTitle::Taxes,
        SectionTitle::OtherFindings,
        SectionTitle::DocumentStatus,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SectionTitle::Requirements => "Requirements",
            SectionTitle::Summary => "Summary",
            SectionTitle::Property => "Property",
            SectionTitle::Liens => "Liens",
            SectionTitle::Taxes => "Taxes",
            SectionTitle::OtherFindings => "Other Findings",
            SectionTitle::DocumentStatus => "Document Status",
            SectionTitle::Other => "Other",
        }
    }

    /// Literal header line in the narrative; `None` for the synthetic bucket
    pub fn header(&self) -> Option<&'static str> {
        match self {
            SectionTitle::Requirements => Some("REQUIREMENTS"),
            SectionTitle::Summary => Some("SUMMARY"),
            SectionTitle::Property => Some("PROPERTY INFORMATION"),
            SectionTitle::Liens => Some("LIENS AND ENCUMBRANCES"),
            SectionTitle::Taxes => Some("TAXES AND ASSESSMENTS"),
            SectionTitle::OtherFindings => Some("OTHER FINDINGS"),
            SectionTitle::DocumentStatus => Some("DOCUMENT STATUS"),
            SectionTitle::Other => None,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SectionTitle::Requirements => "clipboard-check",
            SectionTitle::Summary => "file-text",
            SectionTitle::Property => "home",
            SectionTitle::Liens => "landmark",
            SectionTitle::Taxes => "receipt",
            SectionTitle::OtherFindings => "search",
            SectionTitle::DocumentStatus => "info",
            SectionTitle::Other => "file",
        }
    }

    pub fn border_color(&self) -> &'static str {
        match self {
            SectionTitle::Requirements => "#dc2626",
            SectionTitle::Summary => "#2563eb",
            SectionTitle::Property => "#0891b2",
            SectionTitle::Liens => "#ea580c",
            SectionTitle::Taxes => "#ca8a04",
            SectionTitle::OtherFindings => "#7c3aed",
            SectionTitle::DocumentStatus => "#64748b",
            SectionTitle::Other => "#94a3b8",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSection {
    pub title: SectionTitle,
    pub icon: String,
    pub border_color: String,
    pub item_count: usize,
    pub preview: String,
    pub content: String,
}
