//! Study notes generation.
//!
//! Extracted text is turned into condensed study notes by a generative model
//! behind the [`NotesService`] trait. A Gemini REST client is provided with the
//! `notes` feature. Calls are made once; a failure is reported to the caller as
//! [`NotesmithError::Service`](crate::NotesmithError::Service) and never retried.

#[cfg(feature = "notes")]
pub mod gemini;

#[cfg(feature = "notes")]
pub use gemini::GeminiNotesClient;

use async_trait::async_trait;

use crate::Result;

/// Default instruction placed in front of the document text.
pub const DEFAULT_PROMPT_PREFIX: &str = "Convert to study notes for my exam: ";

/// A service that condenses document text into study notes.
#[async_trait]
pub trait NotesService: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Generate notes for `text`. `text` may be empty.
    async fn generate_notes(&self, text: &str) -> Result<String>;
}

/// Build the model prompt for `text`.
pub fn build_notes_prompt(prefix: &str, text: &str) -> String {
    format!("{}{}", prefix, text)
}
