use std::sync::Arc;

use crate::config::Config;
use crate::extraction::DocumentExtractor;
use crate::llm_client::CompletionService;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; nothing here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    /// Completion service seam. Production: `LlmClient`. Tests: a canned stub.
    pub llm: Arc<dyn CompletionService>,
    /// Resume text extraction seam. Production: `PdfExtractor`.
    pub extractor: Arc<dyn DocumentExtractor>,
    pub config: Config,
}
