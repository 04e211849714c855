//! Axum route handlers for the Analysis API.

use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    Json,
};
use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::analysis::boolean_strings::generate_boolean_strings;
use crate::analysis::relevancy::{analyze_relevancy, RelevancyVerdict};
use crate::errors::AppError;
use crate::extraction::ResumeDocument;
use crate::state::AppState;

pub const PDF_FIELD: &str = "pdf";
pub const BOOLEAN_STRINGS_FIELD: &str = "booleanStrings";

const MISSING_RELEVANCY_INPUT: &str = "PDF file and boolean strings are required";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeJdRequest {
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeJdResponse {
    pub boolean_strings: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze_jd
///
/// Generates boolean search strings from a job description.
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn handle_analyze_jd(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeJdRequest>, JsonRejection>,
) -> Result<Json<AnalyzeJdResponse>, AppError> {
    let Json(request) =
        payload.map_err(|e| AppError::Validation(format!("Invalid request body: {}", e.body_text())))?;

    let job_description = request
        .job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Job description is required".to_string()))?;

    let boolean_strings = generate_boolean_strings(&job_description, state.llm.as_ref()).await?;

    Ok(Json(AnalyzeJdResponse { boolean_strings }))
}

/// POST /api/analyze-relevancy
///
/// Scores an uploaded resume PDF against previously generated boolean strings.
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn handle_analyze_relevancy(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RelevancyVerdict>, AppError> {
    let mut multipart =
        multipart.map_err(|e| AppError::Validation(format!("Invalid request body: {}", e.body_text())))?;

    let mut document: Option<ResumeDocument> = None;
    let mut boolean_strings: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(PDF_FIELD) => {
                let media_type = field.content_type().map(str::to_owned);
                let file_name = field.file_name().map(str::to_owned);
                let content = read_limited(field, state.config.max_pdf_bytes).await?;
                if content.is_empty() {
                    continue;
                }
                document = Some(
                    ResumeDocument::new(content, media_type.as_deref(), file_name)
                        .map_err(AppError::Validation)?,
                );
            }
            Some(BOOLEAN_STRINGS_FIELD) => {
                boolean_strings = Some(field.text().await?);
            }
            _ => {} // unknown fields are ignored
        }
    }

    let boolean_strings = boolean_strings.filter(|s| !s.trim().is_empty());
    let (Some(document), Some(boolean_strings)) = (document, boolean_strings) else {
        return Err(AppError::Validation(MISSING_RELEVANCY_INPUT.to_string()));
    };

    let verdict = analyze_relevancy(
        &document,
        &boolean_strings,
        state.extractor.as_ref(),
        state.llm.as_ref(),
    )
    .await?;

    Ok(Json(verdict))
}

/// Reads a multipart field chunk by chunk, failing as soon as it exceeds `max_bytes`.
async fn read_limited(mut field: Field<'_>, max_bytes: usize) -> Result<Bytes, AppError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await? {
        if buf.len() + chunk.len() > max_bytes {
            return Err(AppError::Validation(format!(
                "Resume PDF exceeds the {max_bytes} byte limit"
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}
