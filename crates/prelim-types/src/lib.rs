//! Output contract of the preliminary title report engine.
//!
//! Everything here is plain data: JSON-serializable, no function values and no
//! cyclic references. The rendering layer depends on these shapes only.

pub mod facts;
pub mod stated;
pub mod types;
pub mod views;

pub use facts::{
    ChainEntry, ExtractedFacts, ForeclosureNotice, ForeclosureNoticeType, HoaLien, HoaLienStatus,
    InstallmentStatus, LienRecord, OtherAssessment, PropertyIdentity, RedemptionEntry, TaxDefault,
    TaxParcel,
};
pub use stated::{format_cents, is_money_literal, parse_cents, Money, Stated, NOT_STATED, UNCLEAR};
pub use types::{
    AgentGuidanceItem, Classification, ComplexityLevel, ComplexitySummary, DocumentSection,
    RecordSource, RequirementRecord, RequirementType, SectionTitle, Severity,
};
pub use views::{
    ClosingRisk, DocumentStatusView, Finding, FindingImpact, LabeledValue, LienCard,
    NarrativeRequirement, PlainSection, RequirementMode, RequirementsView, SectionViews,
    SummaryView, TaxDefaultCallout, TaxesView, TitleAnalysis,
};
