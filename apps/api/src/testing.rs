//! Test doubles for the completion service and the extractor, plus request builders.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::config::Config;
use crate::extraction::{DocumentExtractor, ExtractedText, ExtractionError, ResumeDocument};
use crate::llm_client::{CompletionRequest, CompletionService, LlmError, OutputFormat};
use crate::state::AppState;

pub const MULTIPART_BOUNDARY: &str = "relevancy-test-boundary";
pub const MINIMAL_PDF: &[u8] = b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\n%%EOF\n";

/// An owned copy of a `CompletionRequest`, kept for assertions.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub prompt: String,
    pub format: OutputFormat,
    pub temperature: f32,
}

enum Reply {
    Text(String),
    Status(u16),
}

/// Completion service that returns a canned reply and records every request.
pub struct StubCompletion {
    reply: Reply,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubCompletion {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Reply::Text(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call as if the API answered with `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            reply: Reply::Status(status),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for StubCompletion {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: request.system.to_string(),
            prompt: request.prompt.to_string(),
            format: request.format,
            temperature: request.temperature,
        });

        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Status(status) => Err(LlmError::Api {
                status: *status,
                message: "stubbed upstream failure".to_string(),
            }),
        }
    }
}

/// Extractor that returns fixed pages (or a fixed error) without parsing the PDF.
pub struct StubExtractor {
    result: Result<ExtractedText, ExtractionError>,
    calls: AtomicUsize,
}

impl StubExtractor {
    pub fn pages(pages: &[&str]) -> Self {
        Self {
            result: Ok(ExtractedText {
                pages: pages.iter().map(|p| p.to_string()).collect(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: ExtractionError) -> Self {
        Self {
            result: Err(err),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentExtractor for StubExtractor {
    async fn extract_text(&self, _document: &ResumeDocument) -> Result<ExtractedText, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

pub fn pdf_document() -> ResumeDocument {
    ResumeDocument::new(
        Bytes::from_static(MINIMAL_PDF),
        Some("application/pdf"),
        Some("resume.pdf".to_string()),
    )
    .unwrap()
}

/// Builds a valid PDF with one Courier text line per page.
pub fn multi_page_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|text| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            page_id.into()
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

pub fn test_config() -> Config {
    Config {
        openai_api_key: "sk-test".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
        max_pdf_bytes: 64 * 1024,
        max_pdf_pages: 5,
    }
}

pub fn test_state(llm: Arc<StubCompletion>, extractor: Arc<StubExtractor>) -> AppState {
    AppState {
        llm,
        extractor,
        config: test_config(),
    }
}

/// One part of a hand-built multipart/form-data body.
pub enum Part<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        content: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                content,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(content);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
}
