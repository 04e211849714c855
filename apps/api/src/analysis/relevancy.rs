//! Resume relevancy analyzer — scores extracted resume text against boolean search strings.
//!
//! The model's JSON is validated before it reaches the caller: all three verdict
//! fields present, score within 0–100, keyword lists de-duplicated. Extra fields are dropped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::analysis::prompts::{fill_template, RELEVANCY_PROMPT_TEMPLATE, RELEVANCY_SYSTEM};
use crate::errors::AppError;
use crate::extraction::{DocumentExtractor, ResumeDocument};
use crate::llm_client::{complete_json, CompletionRequest, CompletionService, OutputFormat};

const RELEVANCY_TEMPERATURE: f32 = 0.3;
pub const MAX_SCORE: u8 = 100;

/// Validated relevancy verdict returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelevancyVerdict {
    pub score: u8, // 0 – 100
    pub present_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

/// The verdict exactly as the model produced it, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVerdict {
    score: f64,
    present_keywords: Vec<String>,
    missing_keywords: Vec<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum VerdictError {
    #[error("score {0} is outside 0..=100")]
    ScoreOutOfRange(f64),
}

impl TryFrom<RawVerdict> for RelevancyVerdict {
    type Error = VerdictError;

    fn try_from(raw: RawVerdict) -> Result<Self, Self::Error> {
        if !raw.score.is_finite() || raw.score < 0.0 || raw.score > f64::from(MAX_SCORE) {
            return Err(VerdictError::ScoreOutOfRange(raw.score));
        }

        Ok(RelevancyVerdict {
            score: raw.score.round() as u8,
            present_keywords: dedup_keywords(raw.present_keywords),
            missing_keywords: dedup_keywords(raw.missing_keywords),
        })
    }
}

/// Trims, drops blanks and removes repeats, keeping first-seen order.
/// Matching is case-sensitive; the two lists are not reconciled with each other.
fn dedup_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && seen.insert(k.clone()))
        .collect()
}

/// Asks the completion service to score `resume_text` against `boolean_strings`.
pub async fn score_resume(
    boolean_strings: &str,
    resume_text: &str,
    llm: &dyn CompletionService,
) -> Result<RelevancyVerdict, AppError> {
    let prompt = fill_template(
        RELEVANCY_PROMPT_TEMPLATE,
        &[
            ("boolean_strings", boolean_strings),
            ("resume_text", resume_text),
        ],
    );

    let raw: RawVerdict = complete_json(
        llm,
        CompletionRequest {
            system: RELEVANCY_SYSTEM,
            prompt: &prompt,
            format: OutputFormat::JsonObject,
            temperature: RELEVANCY_TEMPERATURE,
        },
    )
    .await?;

    RelevancyVerdict::try_from(raw).map_err(|e| AppError::MalformedResponse(e.to_string()))
}

/// Full relevancy pipeline: PDF text extraction → prompt → validated verdict.
pub async fn analyze_relevancy(
    document: &ResumeDocument,
    boolean_strings: &str,
    extractor: &dyn DocumentExtractor,
    llm: &dyn CompletionService,
) -> Result<RelevancyVerdict, AppError> {
    if boolean_strings.trim().is_empty() {
        return Err(AppError::Validation(
            "Boolean strings are required".to_string(),
        ));
    }

    let text = extractor.extract_text(document).await?;
    let resume_text = text.joined();

    info!(
        "Scoring resume: file={:?}, media_type={}, pages={}, resume_chars={}, boolean_chars={}",
        document.file_name,
        document.media_type,
        text.page_count(),
        resume_text.len(),
        boolean_strings.len()
    );

    let verdict = score_resume(boolean_strings, &resume_text, llm).await?;

    info!(
        "Relevancy verdict: score={}, present={}, missing={}",
        verdict.score,
        verdict.present_keywords.len(),
        verdict.missing_keywords.len()
    );

    Ok(verdict)
}
