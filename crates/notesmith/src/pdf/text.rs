//! PDF text layer extraction.
//!
//! Reads the embedded text of every page with `lopdf` and concatenates it with
//! no separator between pages.

use std::path::Path;

use lopdf::Document;

use super::error::PdfError;
use super::page::page_resources;
use crate::types::preview;

/// Text recovered from a PDF's text layer.
///
/// `failure` is set when reading stopped early; `text` then holds whatever
/// the pages before the failure produced.
#[derive(Debug, Default)]
pub struct TextLayer {
    pub text: String,
    pub page_count: usize,
    pub failure: Option<PdfError>,
}

impl TextLayer {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Open `pdf_path` and read the text layer of all its pages in order.
pub fn read_text_layer(pdf_path: &Path) -> TextLayer {
    match Document::load(pdf_path) {
        Ok(document) => read_document_text(&document),
        Err(e) => TextLayer {
            failure: Some(PdfError::from(e)),
            ..Default::default()
        },
    }
}

/// Read the text layer of an already loaded document.
pub fn read_document_text(document: &Document) -> TextLayer {
    let pages = document.get_pages();
    let mut layer = TextLayer {
        page_count: pages.len(),
        ..Default::default()
    };
    tracing::info!("Number of pages: {}", layer.page_count);

    for (page_number, page_id) in pages {
        let text = page_resources(document, page_id, page_number).and_then(|_| page_text(document, page_number));
        match text {
            Ok(text) if !text.is_empty() => {
                tracing::info!("Extracted text from page {}: {}...", page_number, preview(&text, 50));
                layer.text.push_str(&text);
            }
            Ok(_) => tracing::debug!("Page {} has no text layer", page_number),
            Err(e) => {
                layer.failure = Some(e);
                break;
            }
        }
    }

    layer
}

/// Text of a single page (1-based `page_number`).
///
/// `lopdf` closes every text object with a line break. Breaks at the very start
/// and end of the page are dropped so that consecutive pages abut exactly.
pub fn page_text(document: &Document, page_number: u32) -> Result<String, PdfError> {
    let text = document
        .extract_text(&[page_number])
        .map_err(|e| PdfError::TextExtractionFailed {
            page: page_number,
            message: e.to_string(),
        })?;

    Ok(text.trim_matches(['\n', '\r']).to_string())
}
