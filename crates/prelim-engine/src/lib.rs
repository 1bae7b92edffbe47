//! Preliminary title report engine.
//!
//! Raw report text goes through the numbered-item splitter and the
//! deterministic extractor; a narrative summary is segmented into its seven
//! sections and parsed section by section. Reconciliation then merges both
//! into one [`TitleAnalysis`], with facts read from the report taking
//! precedence.

pub mod classifier;
pub mod extractors;
pub mod fallback;
pub mod guidance;
pub mod patterns;
pub mod reconcile;
pub mod sections;
pub mod splitter;

use prelim_types::{Classification, DocumentSection, TitleAnalysis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Either input may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    pub raw_text: Option<String>,
    pub narrative: Option<String>,
}

impl AnalysisInput {
    pub fn new(raw_text: impl Into<String>, narrative: impl Into<String>) -> Self {
        Self {
            raw_text: Some(raw_text.into()),
            narrative: Some(narrative.into()),
        }
    }

    pub fn raw(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: Some(raw_text.into()),
            narrative: None,
        }
    }

    pub fn narrative(narrative: impl Into<String>) -> Self {
        Self {
            raw_text: None,
            narrative: Some(narrative.into()),
        }
    }

    /// True when neither input has any non-whitespace text
    pub fn is_blank(&self) -> bool {
        let blank = |s: &Option<String>| s.as_deref().map_or(true, |t| t.trim().is_empty());
        blank(&self.raw_text) && blank(&self.narrative)
    }
}

/// TitleEngine entry point
pub struct TitleEngine;

impl TitleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Run the full pipeline. Never fails: blank input yields a blank analysis.
    pub fn analyze(&self, input: &AnalysisInput) -> TitleAnalysis {
        let raw = input.raw_text.as_deref().unwrap_or("");
        let narrative = input.narrative.as_deref().unwrap_or("");

        let extraction = extractors::extract_facts(raw);
        let sections = sections::segment_sections(narrative);
        let parse = fallback::parse_sections(&sections, &extraction.facts);

        debug!(
            raw_chars = raw.len(),
            narrative_chars = narrative.len(),
            sections = sections.len(),
            "Analyzing title report"
        );
        reconcile::reconcile(extraction, sections, parse)
    }

    pub fn classify(&self, text: &str) -> Classification {
        classifier::classify(text)
    }

    pub fn segment(&self, narrative: &str) -> Vec<DocumentSection> {
        sections::segment_sections(narrative)
    }
}

impl Default for TitleEngine {
    fn default() -> Self {
        Self::new()
    }
}
