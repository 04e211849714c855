//! Job-description analyzer — turns a job description into recruiter boolean search strings.

use tracing::info;

use crate::analysis::prompts::{
    fill_template, BOOLEAN_STRINGS_PROMPT_TEMPLATE, BOOLEAN_STRINGS_SYSTEM,
};
use crate::errors::AppError;
use crate::llm_client::{CompletionRequest, CompletionService, OutputFormat};

const BOOLEAN_STRINGS_TEMPERATURE: f32 = 0.7;

/// Asks the completion service for boolean search strings and returns its text unmodified.
pub async fn generate_boolean_strings(
    job_description: &str,
    llm: &dyn CompletionService,
) -> Result<String, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description is required".to_string(),
        ));
    }

    let prompt = fill_template(
        BOOLEAN_STRINGS_PROMPT_TEMPLATE,
        &[("job_description", job_description)],
    );

    let boolean_strings = llm
        .complete(CompletionRequest {
            system: BOOLEAN_STRINGS_SYSTEM,
            prompt: &prompt,
            format: OutputFormat::Text,
            temperature: BOOLEAN_STRINGS_TEMPERATURE,
        })
        .await
        .map_err(|e| AppError::Upstream(format!("Boolean string generation failed: {e}")))?;

    info!(
        "Generated boolean strings: jd_chars={}, output_chars={}",
        job_description.len(),
        boolean_strings.len()
    );

    Ok(boolean_strings)
}
