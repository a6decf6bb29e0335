//! Raster image extraction from PDF pages.
//!
//! Images are discovered by walking each page's content stream and following
//! `Do` operators into the page's XObject resources, so they come out in the
//! order the page draws them. Every image is written to the request's scratch
//! directory and handed out as an [`ExtractedImage`] that deletes its file when
//! dropped.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::io::Cursor;
use std::iter::{Enumerate, FusedIterator};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::error::{PdfError, Result};
use super::page::page_resources;
use crate::core::scratch::ScratchArena;
use crate::types::Diagnostic;


/// An image pulled out of a PDF and materialized on disk.
///
/// The file is removed when the handle is dropped (or [`release`](Self::release)d).
/// The handle keeps the request's scratch directory alive, so it stays valid even
/// after the [`PdfImages`] iterator that produced it is gone.
#[derive(Debug)]
pub struct ExtractedImage {
    path: PathBuf,
    page_index: usize,
    image_index: usize,
    extension: &'static str,
    removed: bool,
    _arena: Arc<ScratchArena>,
}

impl ExtractedImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 0-based page the image was drawn on.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// 0-based position among the images drawn on the same page.
    pub fn image_index(&self) -> usize {
        self.image_index
    }

    /// `jpg`, `jp2` or `png`.
    pub fn extension(&self) -> &'static str {
        self.extension
    }

    /// Delete the file now instead of on drop.
    pub fn release(mut self) -> std::io::Result<()> {
        self.removed = true;
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl Drop for ExtractedImage {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!("Failed to remove extracted image {}: {}", self.path.display(), e);
        }
    }
}

/// Pulls embedded raster images out of PDFs.
#[derive(Debug, Clone, Default)]
pub struct PdfImageExtractor {
    scratch_dir: Option<PathBuf>,
}

impl PdfImageExtractor {
    /// Extractor that materializes images under the system temp dir.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor that materializes images under `scratch_dir`.
    pub fn with_scratch_dir(scratch_dir: Option<PathBuf>) -> Self {
        Self { scratch_dir }
    }

    /// Open `pdf_path` and return a lazy sequence of its images, page by page.
    ///
    /// Never fails. A PDF that cannot be opened produces an empty sequence; a page
    /// that cannot be parsed ends the sequence early. Both cases are recorded in
    /// [`PdfImages::diagnostics`].
    pub fn extract_images(&self, pdf_path: impl AsRef<Path>) -> PdfImages {
        let pdf_path = pdf_path.as_ref();
        tracing::info!("Extracting images from PDF: {}", pdf_path.display());

        let mut images = PdfImages {
            state: None,
            diagnostics: Vec::new(),
        };

        let document = match Document::load(pdf_path) {
            Ok(document) => document,
            Err(e) => {
                let err = PdfError::from(e);
                tracing::error!("Error extracting images from PDF {}: {}", pdf_path.display(), err);
                images.diagnostics.push(Diagnostic::pdf_parse_failure(err.to_string()));
                return images;
            }
        };

        let arena = match ScratchArena::new(self.scratch_dir.as_deref()) {
            Ok(arena) => Arc::new(arena),
            Err(e) => {
                tracing::error!("Could not create scratch directory for {}: {}", pdf_path.display(), e);
                images
                    .diagnostics
                    .push(Diagnostic::pdf_parse_failure(format!("scratch directory unavailable: {}", e)));
                return images;
            }
        };

        images.state = Some(ImageWalk::new(document, arena));
        images
    }
}

/// Lazy, single-pass sequence of [`ExtractedImage`]s in page-then-drawing order.
///
/// Each image is written to disk only when the iterator reaches it.
pub struct PdfImages {
    state: Option<ImageWalk>,
    diagnostics: Vec<Diagnostic>,
}

impl PdfImages {
    /// Failures encountered so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Iterator for PdfImages {
    type Item = ExtractedImage;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let walk = self.state.as_mut()?;

            if let Some((image_index, object_id)) = walk.pending.pop_front() {
                match walk.materialize(object_id, image_index) {
                    Ok(image) => {
                        tracing::info!("Extracted image: {}", image.path().display());
                        return Some(image);
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Skipping image {} on page {}: {}",
                            image_index + 1,
                            walk.page_index + 1,
                            e
                        );
                        self.diagnostics.push(Diagnostic::decode_failure(format!(
                            "page {} image {}: {}",
                            walk.page_index + 1,
                            image_index + 1,
                            e
                        )));
                        continue;
                    }
                }
            }

            let Some((page_index, (page_number, page_id))) = walk.pages.next() else {
                self.state = None;
                return None;
            };

            walk.page_index = page_index;
            match page_images(&walk.document, page_id, page_number) {
                Ok(pending) => {
                    tracing::debug!("Page {} draws {} image(s)", page_number, pending.len());
                    walk.pending = pending;
                }
                Err(e) => {
                    tracing::error!("Error extracting images from PDF: {}", e);
                    self.diagnostics.push(Diagnostic::pdf_parse_failure(e.to_string()));
                    self.state = None;
                    return None;
                }
            }
        }
    }
}

impl FusedIterator for PdfImages {}

struct ImageWalk {
    document: Document,
    arena: Arc<ScratchArena>,
    pages: Enumerate<std::vec::IntoIter<(u32, ObjectId)>>,
    page_index: usize,
    pending: VecDeque<(usize, ObjectId)>,
}

impl ImageWalk {
    fn new(document: Document, arena: Arc<ScratchArena>) -> Self {
        let pages: Vec<(u32, ObjectId)> = document.get_pages().into_iter().collect();
        tracing::info!("Number of pages: {}", pages.len());
        Self {
            document,
            arena,
            pages: pages.into_iter().enumerate(),
            page_index: 0,
            pending: VecDeque::new(),
        }
    }

    fn materialize(&self, object_id: ObjectId, image_index: usize) -> Result<ExtractedImage> {
        let stream = self.document.get_object(object_id)?.as_stream()?;
        let (bytes, extension) = encode_image(&self.document, stream)?;

        let path = self.arena.image_path(self.page_index, image_index, extension);
        std::fs::write(&path, &bytes).map_err(|e| PdfError::IOError(format!("{}: {}", path.display(), e)))?;

        Ok(ExtractedImage {
            path,
            page_index: self.page_index,
            image_index,
            extension,
            removed: false,
            _arena: Arc::clone(&self.arena),
        })
    }
}

/// Image XObjects drawn on a page, in drawing order, each listed once.
fn page_images(document: &Document, page_id: ObjectId, page_number: u32) -> Result<VecDeque<(usize, ObjectId)>> {
    let content_bytes = document
        .get_page_content(page_id)
        .map_err(|e| PdfError::ContentStreamFailed {
            page: page_number,
            message: e.to_string(),
        })?;
    let content = Content::decode(&content_bytes).map_err(|e| PdfError::ContentStreamFailed {
        page: page_number,
        message: e.to_string(),
    })?;

    let xobjects = page_xobjects(document, page_id, page_number)?;
    let mut seen = HashSet::new();
    let mut images = VecDeque::new();

    for operation in &content.operations {
        if operation.operator != "Do" {
            continue;
        }
        let Some(name) = operation.operands.first().and_then(|o| o.as_name().ok()) else {
            continue;
        };
        if !seen.insert(name.to_vec()) {
            continue;
        }
        let Some(&object_id) = xobjects.get(name) else {
            tracing::debug!(
                "Page {} draws unknown XObject /{}",
                page_number,
                String::from_utf8_lossy(name)
            );
            continue;
        };
        if is_image_xobject(document, object_id) {
            images.push_back((images.len(), object_id));
        }
    }

    Ok(images)
}

/// The page's `/Resources /XObject` entries, including inherited resources.
fn page_xobjects(document: &Document, page_id: ObjectId, page_number: u32) -> Result<BTreeMap<Vec<u8>, ObjectId>> {
    let Some(resources) = page_resources(document, page_id, page_number)? else {
        return Ok(BTreeMap::new());
    };
    let Ok(xobject) = resources.get(b"XObject") else {
        return Ok(BTreeMap::new());
    };
    let xobject = resolve(document, xobject)?.as_dict()?;
    Ok(xobject
        .iter()
        .filter_map(|(name, object)| object.as_reference().ok().map(|id| (name.clone(), id)))
        .collect())
}

fn is_image_xobject(document: &Document, object_id: ObjectId) -> bool {
    document
        .get_object(object_id)
        .and_then(Object::as_stream)
        .and_then(|stream| stream.dict.get(b"Subtype"))
        .and_then(Object::as_name)
        .is_ok_and(|subtype| subtype == b"Image")
}

fn resolve<'a>(document: &'a Document, object: &'a Object) -> Result<&'a Object> {
    match object {
        Object::Reference(id) => Ok(document.get_object(*id)?),
        other => Ok(other),
    }
}

fn stream_filters(document: &Document, dict: &Dictionary) -> Vec<Vec<u8>> {
    let Ok(filter) = dict.get(b"Filter").and_then(|f| match f {
        Object::Reference(id) => document.get_object(*id),
        other => Ok(other),
    }) else {
        return Vec::new();
    };

    match filter {
        Object::Name(name) => vec![name.clone()],
        Object::Array(items) => items
            .iter()
            .filter_map(|item| item.as_name().ok().map(<[u8]>::to_vec))
            .collect(),
        _ => Vec::new(),
    }
}

/// Bytes to write for an image stream plus the file extension they should carry.
///
/// JPEG and JPEG 2000 data are passed through untouched. Everything else is
/// decoded to raw samples and re-encoded as PNG.
fn encode_image(document: &Document, stream: &Stream) -> Result<(Vec<u8>, &'static str)> {
    let filters = stream_filters(document, &stream.dict);

    match filters.as_slice() {
        [only] if only == b"DCTDecode" => return Ok((stream.content.clone(), "jpg")),
        [only] if only == b"JPXDecode" => return Ok((stream.content.clone(), "jp2")),
        _ => {}
    }

    if filters
        .iter()
        .any(|f| matches!(f.as_slice(), b"DCTDecode" | b"JPXDecode" | b"JBIG2Decode" | b"CCITTFaxDecode"))
    {
        let names: Vec<String> = filters.iter().map(|f| String::from_utf8_lossy(f).into_owned()).collect();
        return Err(PdfError::UnsupportedImage(format!("filter chain [{}]", names.join(", "))));
    }

    let samples = if filters.is_empty() {
        stream.content.clone()
    } else {
        stream.decompressed_content()?
    };

    let image = decode_samples(document, &stream.dict, samples)?;
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| PdfError::UnsupportedImage(format!("PNG encoding failed: {}", e)))?;

    Ok((buffer.into_inner(), "png"))
}

fn dict_integer(document: &Document, dict: &Dictionary, key: &[u8]) -> Option<i64> {
    dict.get(key)
        .ok()
        .and_then(|value| resolve(document, value).ok())
        .and_then(|value| value.as_i64().ok())
}

fn color_components(document: &Document, dict: &Dictionary) -> Result<u32> {
    let is_mask = dict.get(b"ImageMask").and_then(Object::as_bool).unwrap_or(false);
    let color_space = match dict.get(b"ColorSpace") {
        Ok(cs) => resolve(document, cs)?,
        Err(_) if is_mask => return Ok(1),
        Err(_) => return Err(PdfError::UnsupportedImage("image has no ColorSpace".to_string())),
    };

    let family = match color_space {
        Object::Name(name) => name.as_slice(),
        Object::Array(items) => items
            .first()
            .and_then(|item| item.as_name().ok())
            .ok_or_else(|| PdfError::UnsupportedImage("malformed ColorSpace array".to_string()))?,
        _ => return Err(PdfError::UnsupportedImage("malformed ColorSpace".to_string())),
    };

    match family {
        b"DeviceGray" | b"CalGray" | b"G" => Ok(1),
        b"DeviceRGB" | b"CalRGB" | b"RGB" => Ok(3),
        b"DeviceCMYK" | b"CMYK" => Ok(4),
        b"ICCBased" => {
            let profile = match color_space {
                Object::Array(items) => items.get(1),
                _ => None,
            };
            profile
                .and_then(|p| resolve(document, p).ok())
                .and_then(|p| p.as_stream().ok())
                .and_then(|p| dict_integer(document, &p.dict, b"N"))
                .and_then(|n| u32::try_from(n).ok())
                .filter(|n| matches!(n, 1 | 3 | 4))
                .ok_or_else(|| PdfError::UnsupportedImage("ICCBased profile without a usable /N".to_string()))
        }
        other => Err(PdfError::UnsupportedImage(format!(
            "{} color space",
            String::from_utf8_lossy(other)
        ))),
    }
}

fn decode_samples(document: &Document, dict: &Dictionary, samples: Vec<u8>) -> Result<DynamicImage> {
    let dimension = |key: &[u8]| {
        dict_integer(document, dict, key)
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v > 0)
            .ok_or_else(|| {
                PdfError::UnsupportedImage(format!("missing or invalid /{}", String::from_utf8_lossy(key)))
            })
    };
    let width = dimension(b"Width")?;
    let height = dimension(b"Height")?;
    let bits = dict_integer(document, dict, b"BitsPerComponent").unwrap_or(8);
    let components = color_components(document, dict)?;

    let too_short = || PdfError::UnsupportedImage(format!("sample data too short for {}x{}", width, height));
    let overflow = || PdfError::UnsupportedImage("image dimensions overflow".to_string());
    let pixels = (width as usize).checked_mul(height as usize).ok_or_else(overflow)?;
    let sample_len = |per_pixel: usize| pixels.checked_mul(per_pixel).ok_or_else(overflow);

    match (components, bits) {
        (1, 8) => {
            let mut samples = samples;
            samples.truncate(sample_len(1)?);
            GrayImage::from_raw(width, height, samples)
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(too_short)
        }
        (3, 8) => {
            let mut samples = samples;
            samples.truncate(sample_len(3)?);
            RgbImage::from_raw(width, height, samples)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(too_short)
        }
        (4, 8) => {
            if samples.len() < sample_len(4)? {
                return Err(too_short());
            }
            let rgb = samples
                .chunks_exact(4)
                .take(pixels)
                .flat_map(|cmyk| {
                    let k = 255 - u16::from(cmyk[3]);
                    let channel = |c: u8| ((255 - u16::from(c)) * k / 255) as u8;
                    [channel(cmyk[0]), channel(cmyk[1]), channel(cmyk[2])]
                })
                .collect();
            RgbImage::from_raw(width, height, rgb)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(too_short)
        }
        (1, 1) => {
            let row_bytes = (width as usize).div_ceil(8);
            if samples.len() < row_bytes.checked_mul(height as usize).ok_or_else(overflow)? {
                return Err(too_short());
            }
            let gray = GrayImage::from_fn(width, height, |x, y| {
                let byte = samples[y as usize * row_bytes + x as usize / 8];
                let bit = (byte >> (7 - (x % 8))) & 1;
                image::Luma([if bit == 1 { 255 } else { 0 }])
            });
            Ok(DynamicImage::ImageLuma8(gray))
        }
        (components, bits) => Err(PdfError::UnsupportedImage(format!(
            "{} component(s) at {} bits per component",
            components, bits
        ))),
    }
}
