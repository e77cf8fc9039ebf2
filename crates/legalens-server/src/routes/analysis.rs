//! Document analysis routes: `/v1/analysis/*`
//!
//! Open to anonymous callers. Analysis never fails because of the completion
//! service; the response records whether the synthetic fallback was used.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use legalens_core::model::{AnalysisResult, AnalysisSource, Severity};

use crate::error::AppError;
use crate::routes::ApiJson;
use crate::state::AppState;

/// File name offered for the plain-text export.
pub const EXPORT_FILE_NAME: &str = "LegaLens_Analysis_Summary.txt";

/// Build the `/v1/analysis` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(analyze))
        .route("/export", post(export))
}

// ── Request / Response types ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Already-extracted document text. May be empty.
    #[serde(default)]
    pub document_text: String,
    /// Document type hint, e.g. `Contract` or `Lease`.
    #[serde(default)]
    pub document_type: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub source: AnalysisSource,
    pub overall_risk: Option<Severity>,
    pub analysis: AnalysisResult,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// `POST /v1/analysis` — analyze a document.
async fn analyze(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let outcome = state
        .analyzer
        .analyze_detailed(&body.document_text, &body.document_type)
        .await?;

    let analysis_id = Uuid::new_v4();
    info!(
        %analysis_id,
        source = ?outcome.source,
        bytes = body.document_text.len(),
        "document analyzed"
    );

    Ok(Json(AnalyzeResponse {
        analysis_id,
        analyzed_at: Utc::now(),
        source: outcome.source,
        overall_risk: outcome.result.overall_risk(),
        analysis: outcome.result,
    }))
}

/// `POST /v1/analysis/export` — render an analysis as a plain-text download.
async fn export(ApiJson(analysis): ApiJson<AnalysisResult>) -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        analysis.to_summary_text(),
    )
}
