// Job-description and resume-relevancy analysis.
// All completion calls go through the llm_client seam; nothing here talks to OpenAI directly.

pub mod boolean_strings;
pub mod handlers;
pub mod prompts;
pub mod relevancy;
