//! API handlers for the title report server
//!
//! Provides REST endpoints for:
//! - Full report analysis
//! - Requirement classification
//! - Requirement taxonomy listing

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use prelim_engine::guidance::label_for;
use prelim_engine::AnalysisInput;
use prelim_types::{Classification, RequirementType, Severity, TitleAnalysis};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ServerError;
use crate::AppState;

/// Inputs larger than this are analyzed on the blocking pool
pub const BLOCKING_THRESHOLD_BYTES: usize = 64 * 1024;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "prelim-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// One entry of the requirement taxonomy
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementTypeInfo {
    #[serde(rename = "type")]
    pub requirement_type: RequirementType,
    pub label: &'static str,
    pub default_severity: Severity,
}

#[derive(Serialize)]
pub struct RequirementTypeListResponse {
    pub success: bool,
    pub types: Vec<RequirementTypeInfo>,
    pub count: usize,
}

/// Handler: GET /api/requirement-types
pub async fn handle_list_requirement_types() -> Json<RequirementTypeListResponse> {
    let types: Vec<RequirementTypeInfo> = RequirementType::ALL
        .into_iter()
        .map(|t| RequirementTypeInfo {
            requirement_type: t,
            label: label_for(t),
            default_severity: t.default_severity(),
        })
        .collect();
    let count = types.len();

    Json(RequirementTypeListResponse {
        success: true,
        types,
        count,
    })
}

/// Classification request body
#[derive(Deserialize)]
pub struct ClassifyRequest {
    /// Requirement clause text
    pub text: String,
}

#[derive(Serialize)]
pub struct ClassifyResponse {
    pub success: bool,
    pub classification: Classification,
}

/// Handler: POST /api/classify
pub async fn handle_classify(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, ServerError> {
    let Json(req) = payload?;
    let classification = state.engine.classify(&req.text);
    debug!(
        "Classified {} chars as {}",
        req.text.len(),
        classification.requirement_type.as_str()
    );

    Ok(Json(ClassifyResponse {
        success: true,
        classification,
    }))
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: TitleAnalysis,
}

/// Handler: POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisInput>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ServerError> {
    let Json(input) = payload?;
    if input.is_blank() {
        return Err(ServerError::InvalidRequest(
            "Provide rawText or narrative".to_string(),
        ));
    }

    let size = input.raw_text.as_deref().map_or(0, str::len)
        + input.narrative.as_deref().map_or(0, str::len);
    info!("Analyze request: {} bytes", size);

    let analysis = if size > BLOCKING_THRESHOLD_BYTES {
        let engine = state.engine.clone();
        tokio::task::spawn_blocking(move || engine.analyze(&input))
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?
    } else {
        state.engine.analyze(&input)
    };

    info!(
        "Analysis complete: {} requirements, {}",
        analysis.requirements.len(),
        analysis.complexity.label
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
    }))
}
