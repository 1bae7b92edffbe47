//! Per-section shapes parsed from the narrative, and the final analysis

use serde::{Deserialize, Serialize};

use crate::facts::{ExtractedFacts, LienRecord, RedemptionEntry};
use crate::stated::Stated;
use crate::types::{
    AgentGuidanceItem, ComplexitySummary, DocumentSection, RecordSource, RequirementRecord,
    SectionTitle, Severity,
};

/// Sub-header under which a narrative requirement appeared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequirementMode {
    ActionList,
    PrioritySchedule,
    CompanyRequirements,
    ClearingItems,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeRequirement {
    pub mode: RequirementMode,
    pub item_numbers: Vec<u32>,
    pub title: String,
    pub details: Stated<String>,
    pub next_step: Stated<String>,
    pub owner: Stated<String>,
    /// Raw `Closing impact:` value
    pub closing_impact: Stated<String>,
    pub why_it_matters: Stated<String>,
    /// Mapped from `closing_impact`; `Material` when the line is absent
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementsView {
    pub action_list: Vec<NarrativeRequirement>,
    pub priority_schedule: Vec<NarrativeRequirement>,
    pub company_requirements: Vec<NarrativeRequirement>,
    pub clearing_items: Vec<NarrativeRequirement>,
}

impl RequirementsView {
    pub fn is_empty(&self) -> bool {
        self.action_list.is_empty()
            && self.priority_schedule.is_empty()
            && self.company_requirements.is_empty()
            && self.clearing_items.is_empty()
    }

    /// All records in mode order, then source order
    pub fn iter(&self) -> impl Iterator<Item = &NarrativeRequirement> {
        self.action_list
            .iter()
            .chain(&self.priority_schedule)
            .chain(&self.company_requirements)
            .chain(&self.clearing_items)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingRisk {
    pub title: String,
    pub explanation: Stated<String>,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub risks: Vec<ClosingRisk>,
    pub narrative: String,
}

/// A lien as the narrative describes it, with display-only fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LienCard {
    pub record: LienRecord,
    pub lien_type: Stated<String>,
    pub status: Stated<String>,
    pub foreclosure_info: Stated<String>,
    pub suggested_action: Stated<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxDefaultCallout {
    pub message: String,
    pub redemption_schedule: Vec<RedemptionEntry>,
    pub source: RecordSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxesView {
    /// Present whenever default or redemption language was found
    pub callout: Option<TaxDefaultCallout>,
    /// Section text with currency bolding
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingImpact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub finding_type: String,
    pub details: Stated<String>,
    pub impact: FindingImpact,
    pub action: Stated<String>,
    pub recording_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStatusView {
    pub report_type: Stated<String>,
    pub effective_date: Stated<String>,
    pub order_number: Stated<String>,
    pub underwriter: Stated<String>,
    pub officer: Stated<String>,
    pub scope: Stated<String>,
    pub page_count: Stated<String>,
    pub status: Stated<String>,
    /// Labels outside the known set, in source order
    pub additional: Vec<LabeledValue>,
}

impl DocumentStatusView {
    /// True when no field carries a value or sentinel and nothing extra was found
    pub fn is_empty(&self) -> bool {
        [
            &self.report_type,
            &self.effective_date,
            &self.order_number,
            &self.underwriter,
            &self.officer,
            &self.scope,
            &self.page_count,
            &self.status,
        ]
        .iter()
        .all(|f| f.is_not_stated())
            && self.additional.is_empty()
    }
}

/// A section shown as text because nothing structured was found in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainSection {
    pub title: SectionTitle,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionViews {
    pub requirements: Option<RequirementsView>,
    pub summary: Option<SummaryView>,
    pub liens: Vec<LienCard>,
    pub taxes: Option<TaxesView>,
    pub findings: Vec<Finding>,
    pub document_status: Option<DocumentStatusView>,
    pub plain: Vec<PlainSection>,
}

/// Everything the rendering layer may depend on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleAnalysis {
    pub facts: ExtractedFacts,
    pub sections: Vec<DocumentSection>,
    pub requirements: Vec<RequirementRecord>,
    pub guidance: Vec<AgentGuidanceItem>,
    pub complexity: ComplexitySummary,
    pub views: SectionViews,
}
