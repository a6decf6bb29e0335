//! Shared fixtures for integration tests.
//!
//! PDFs are generated with `lopdf` so tests never depend on checked-in binaries.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{DynamicImage, GrayImage, ImageBuffer, ImageFormat, Luma, Rgb};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use notesmith::{OcrBackend, Result};

/// One page of a generated PDF.
#[derive(Debug, Clone, Default)]
pub struct TestPage {
    /// Text drawn with a standard Type1 font, if any.
    pub text: Option<&'static str>,
    /// Widths of the grayscale images drawn on the page, in drawing order.
    pub image_widths: Vec<u32>,
    /// Draw the first image a second time at the end of the page.
    pub redraw_first_image: bool,
    /// A full grayscale picture drawn after the plain images.
    pub picture: Option<GrayImage>,
    /// Replace the page's `/Resources` dictionary with an integer.
    pub malformed_resources: bool,
}

impl TestPage {
    pub fn text(text: &'static str) -> Self {
        Self {
            text: Some(text),
            ..Default::default()
        }
    }

    pub fn images(widths: &[u32]) -> Self {
        Self {
            image_widths: widths.to_vec(),
            ..Default::default()
        }
    }

    pub fn picture(picture: GrayImage) -> Self {
        Self {
            picture: Some(picture),
            ..Default::default()
        }
    }

    pub fn blank() -> Self {
        Self::default()
    }

    pub fn malformed(self) -> Self {
        Self {
            malformed_resources: true,
            ..self
        }
    }
}

const IMAGE_HEIGHT: u32 = 8;

pub fn build_pdf(pages: &[TestPage]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let mut operations = Vec::new();
        let mut xobjects = Dictionary::new();

        if let Some(text) = page.text {
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ]);
        }

        for (index, &width) in page.image_widths.iter().enumerate() {
            let name = format!("Im{}", index + 1);
            let image_id = doc.add_object(gray_image_stream(width, IMAGE_HEIGHT, (index as u8).wrapping_mul(40)));
            xobjects.set(name.as_bytes().to_vec(), image_id);
            operations.extend(draw_image(&name, width as i64, index as i64 * 100));
        }

        if let Some(picture) = &page.picture {
            let (width, height) = picture.dimensions();
            let image_id = doc.add_object(gray_stream(width, height, picture.as_raw().clone()));
            xobjects.set("Pic", image_id);
            operations.extend([
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![(width as i64).into(), 0.into(), 0.into(), (height as i64).into(), 0.into(), 0.into()],
                ),
                Operation::new("Do", vec![Object::Name(b"Pic".to_vec())]),
                Operation::new("Q", vec![]),
            ]);
        }

        if page.redraw_first_image && !page.image_widths.is_empty() {
            operations.extend(draw_image("Im1", page.image_widths[0] as i64, 500));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let resources = if page.malformed_resources {
            Object::Integer(7)
        } else {
            Object::Dictionary(dictionary! {
                "Font" => dictionary! { "F1" => font_id },
                "XObject" => xobjects,
            })
        };
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(page_id.into());
    }

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
    doc
}

fn gray_image_stream(width: u32, height: u32, shade: u8) -> Stream {
    gray_stream(width, height, vec![shade; (width * height) as usize])
}

fn gray_stream(width: u32, height: u32, pixels: Vec<u8>) -> Stream {
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
        },
        pixels,
    )
}

fn draw_image(name: &str, width: i64, y: i64) -> [Operation; 4] {
    [
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![width.into(), 0.into(), 0.into(), (IMAGE_HEIGHT as i64).into(), 72.into(), y.into()],
        ),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

/// Route `tracing` output through the test harness. Honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Write a generated PDF to `dir/name` and return its path.
pub fn write_pdf(dir: &Path, name: &str, pages: &[TestPage]) -> PathBuf {
    let path = dir.join(name);
    let mut doc = build_pdf(pages);
    doc.save(&path).unwrap();
    path
}

/// Write a small striped PNG to `path`.
pub fn write_png(path: &Path, width: u32, height: u32) {
    let img = ImageBuffer::from_fn(width, height, |x, _| {
        if x % 2 == 0 { Rgb([255u8, 255, 255]) } else { Rgb([0, 0, 0]) }
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

fn glyph(c: char) -> [&'static str; 7] {
    match c {
        'A' => [".###.", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'C' => [".###.", "#...#", "#....", "#....", "#....", "#...#", ".###."],
        'D' => ["####.", "#...#", "#...#", "#...#", "#...#", "#...#", "####."],
        'E' => ["#####", "#....", "#....", "####.", "#....", "#....", "#####"],
        'H' => ["#...#", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'L' => ["#....", "#....", "#....", "#....", "#....", "#....", "#####"],
        'N' => ["#...#", "##..#", "#.#.#", "#..##", "#...#", "#...#", "#...#"],
        'O' => [".###.", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."],
        'R' => ["####.", "#...#", "#...#", "####.", "#.#..", "#..#.", "#...#"],
        'S' => [".####", "#....", "#....", ".###.", "....#", "....#", "####."],
        'T' => ["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "..#.."],
        'W' => ["#...#", "#...#", "#...#", "#.#.#", "#.#.#", "##.##", "#...#"],
        'X' => ["#...#", "#...#", ".#.#.", "..#..", ".#.#.", "#...#", "#...#"],
        _ => ["....."; 7],
    }
}

/// Render upper-case `text` as black block letters on white, `scale` pixels per dot.
///
/// Covers the letters used by the OCR tests; anything else renders as a space.
pub fn render_text(text: &str, scale: u32) -> GrayImage {
    let margin = 4 * scale;
    let advance = (GLYPH_WIDTH + 1) * scale;
    let chars: Vec<char> = text.chars().collect();
    let width = margin * 2 + advance * chars.len() as u32;
    let height = margin * 2 + GLYPH_HEIGHT * scale;

    let mut img = GrayImage::from_pixel(width, height, Luma([255]));
    for (i, &c) in chars.iter().enumerate() {
        let left = margin + advance * i as u32;
        for (row, line) in glyph(c).iter().enumerate() {
            for (col, dot) in line.chars().enumerate() {
                if dot != '#' {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        img.put_pixel(left + col as u32 * scale + dx, margin + row as u32 * scale + dy, Luma([0]));
                    }
                }
            }
        }
    }
    img
}

/// Count regular files anywhere below `dir`.
pub fn count_files(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let path = entry.path();
            if path.is_dir() { count_files(&path) } else { 1 }
        })
        .sum()
}

/// OCR backend that returns fixed text and records what it was shown.
pub struct RecordingBackend {
    text: String,
    calls: AtomicUsize,
    widths: Mutex<Vec<u32>>,
    watch_dir: Option<PathBuf>,
    max_files_seen: AtomicUsize,
}

impl RecordingBackend {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
            widths: Mutex::new(Vec::new()),
            watch_dir: None,
            max_files_seen: AtomicUsize::new(0),
        }
    }

    /// Also record the largest number of files present under `dir` during any call.
    pub fn watching(text: &str, dir: &Path) -> Self {
        Self {
            watch_dir: Some(dir.to_path_buf()),
            ..Self::new(text)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn widths(&self) -> Vec<u32> {
        self.widths.lock().unwrap().clone()
    }

    pub fn max_files_seen(&self) -> usize {
        self.max_files_seen.load(Ordering::SeqCst)
    }
}

impl OcrBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.widths.lock().unwrap().push(image.width());
        if let Some(dir) = &self.watch_dir {
            self.max_files_seen.fetch_max(count_files(dir), Ordering::SeqCst);
        }
        Ok(self.text.clone())
    }
}
