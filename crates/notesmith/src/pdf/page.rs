//! Page-level lookups shared by the text and image readers.

use lopdf::{Dictionary, Document, Object, ObjectId};

use super::error::{PdfError, Result};

/// Inherited `Resources` lookups stop after this many `Parent` hops.
const MAX_PAGE_TREE_DEPTH: usize = 32;

/// The page's `/Resources` dictionary, following inheritance up the page tree.
///
/// `Ok(None)` when neither the page nor any ancestor declares resources. A
/// `/Resources` entry that does not resolve to a dictionary makes the page
/// unreadable and is reported as [`PdfError::MalformedPage`].
pub(crate) fn page_resources(document: &Document, page_id: ObjectId, page_number: u32) -> Result<Option<&Dictionary>> {
    let malformed = |message: String| PdfError::MalformedPage {
        page: page_number,
        message,
    };

    let mut node = document
        .get_dictionary(page_id)
        .map_err(|e| malformed(e.to_string()))?;

    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(resources) = node.get(b"Resources") {
            let resources = match resources {
                Object::Reference(id) => document
                    .get_object(*id)
                    .map_err(|e| malformed(format!("/Resources: {}", e)))?,
                other => other,
            };
            return resources
                .as_dict()
                .map(Some)
                .map_err(|_| malformed("/Resources is not a dictionary".to_string()));
        }

        match node.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent_id) => {
                node = document
                    .get_dictionary(parent_id)
                    .map_err(|e| malformed(format!("/Parent: {}", e)))?
            }
            Err(_) => break,
        }
    }

    Ok(None)
}
