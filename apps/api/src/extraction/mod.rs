//! Resume text extraction.
//!
//! Handlers depend on the `DocumentExtractor` trait; production uses `PdfExtractor`
//! (backed by `pdf-extract`), tests inject a stub.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod pdf;

pub use pdf::PdfExtractor;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
const PDF_SIGNATURE: &[u8] = b"%PDF-";

#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    #[error("The PDF has {pages} pages; at most {max} are accepted")]
    TooManyPages { pages: usize, max: usize },

    #[error("The PDF contains no extractable text")]
    NoText,

    #[error("{0}")]
    Failed(String),
}

/// An uploaded resume. Construction checks the declared media type and the file signature.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub content: Bytes,
    pub media_type: String,
    pub file_name: Option<String>,
}

impl ResumeDocument {
    /// Returns a user-facing reason when the upload is not an acceptable PDF.
    pub fn new(
        content: Bytes,
        media_type: Option<&str>,
        file_name: Option<String>,
    ) -> Result<Self, String> {
        let media_type = media_type
            .map(|m| m.split(';').next().unwrap_or(m).trim().to_ascii_lowercase())
            .unwrap_or_default();

        if media_type != PDF_MEDIA_TYPE {
            return Err(format!(
                "Resume must be uploaded as {PDF_MEDIA_TYPE}, got '{}'",
                if media_type.is_empty() { "none" } else { media_type.as_str() }
            ));
        }
        if content.is_empty() {
            return Err("Resume PDF is empty".to_string());
        }
        if !content.starts_with(PDF_SIGNATURE) {
            return Err("Resume is not a valid PDF file".to_string());
        }

        Ok(ResumeDocument {
            content,
            media_type,
            file_name,
        })
    }
}

/// Plain text of a document, one entry per non-blank page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub pages: Vec<String>,
}

impl ExtractedText {
    /// All page segments joined with single spaces.
    pub fn joined(&self) -> String {
        self.pages.join(" ")
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(&self, document: &ResumeDocument) -> Result<ExtractedText, ExtractionError>;
}
