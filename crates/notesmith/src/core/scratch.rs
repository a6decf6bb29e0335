//! Request-scoped scratch storage.
//!
//! Each extraction request gets its own directory, named after a fresh request
//! id. Intermediate artifacts (uploaded documents, images pulled out of PDFs)
//! live there and are keyed by page and image index, so concurrent requests
//! never share a path. Dropping the arena removes the directory and whatever
//! is still inside it.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use uuid::Uuid;

use crate::Result;

#[derive(Debug)]
pub struct ScratchArena {
    request_id: Uuid,
    dir: TempDir,
}

impl ScratchArena {
    /// Create a new arena under `base`, or under the system temp dir when `base` is `None`.
    pub fn new(base: Option<&Path>) -> Result<Self> {
        let request_id = Uuid::new_v4();
        let prefix = format!("notesmith-{}-", request_id);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let dir = match base {
            Some(base) => {
                std::fs::create_dir_all(base)?;
                builder.tempdir_in(base)?
            }
            None => builder.tempdir()?,
        };

        tracing::debug!("Created scratch directory {}", dir.path().display());
        Ok(Self { request_id, dir })
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path for the `image_index`-th image on page `page_index` (both 0-based).
    ///
    /// File names are 1-based: `page_1_image_1.png` is the first image on the first page.
    pub fn image_path(&self, page_index: usize, image_index: usize, extension: &str) -> PathBuf {
        self.dir
            .path()
            .join(format!("page_{}_image_{}.{}", page_index + 1, image_index + 1, extension))
    }

    /// Path where an uploaded document of the given extension is stored.
    pub fn upload_path(&self, extension: &str) -> PathBuf {
        self.dir.path().join(format!("upload.{}", extension))
    }
}
