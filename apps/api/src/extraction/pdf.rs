use async_trait::async_trait;
use tracing::debug;

use super::{DocumentExtractor, ExtractedText, ExtractionError, ResumeDocument};

/// Extracts resume text with `pdf-extract` on the blocking thread pool.
pub struct PdfExtractor {
    max_pages: usize,
}

impl PdfExtractor {
    pub fn new(max_pages: usize) -> Self {
        Self { max_pages }
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract_text(&self, document: &ResumeDocument) -> Result<ExtractedText, ExtractionError> {
        let content = document.content.clone();

        // pdf-extract can panic on malformed input; the JoinError captures it.
        let raw_pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&content).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| ExtractionError::Failed(format!("extraction task aborted: {e}")))?
        .map_err(ExtractionError::Failed)?;

        let text = paginate(raw_pages, self.max_pages)?;
        debug!(
            "Extracted {} pages ({} chars) from resume",
            text.page_count(),
            text.pages.iter().map(String::len).sum::<usize>()
        );
        Ok(text)
    }
}

/// Normalizes per-page output, drops blank pages and enforces the page bound.
fn paginate(raw_pages: Vec<String>, max_pages: usize) -> Result<ExtractedText, ExtractionError> {
    let pages: Vec<String> = raw_pages
        .iter()
        .map(|p| normalize_whitespace(p))
        .filter(|p| !p.is_empty())
        .collect();

    if pages.is_empty() {
        return Err(ExtractionError::NoText);
    }
    if pages.len() > max_pages {
        return Err(ExtractionError::TooManyPages {
            pages: pages.len(),
            max: max_pages,
        });
    }

    Ok(ExtractedText { pages })
}

fn normalize_whitespace(page: &str) -> String {
    page.split_whitespace().collect::<Vec<_>>().join(" ")
}
