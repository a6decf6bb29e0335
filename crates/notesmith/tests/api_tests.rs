//! HTTP API tests driving the router in-process.
#![cfg(feature = "api")]

mod helpers;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use helpers::{RecordingBackend, TestPage, build_pdf, count_files};
use notesmith::api::{ErrorResponse, HealthResponse, NotesResponse, ReadResponse, create_router_with_services};
use notesmith::{DocumentExtractionPipeline, NotesService, NotesmithConfig, NotesmithError, Result};
use tempfile::{TempDir, tempdir};
use tower::ServiceExt;

const BOUNDARY: &str = "notesmith-test-boundary";

/// Notes service that echoes its input or always fails.
struct StubNotes {
    fail: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl NotesService for StubNotes {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate_notes(&self, text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(NotesmithError::service("quota exceeded"))
        } else {
            Ok(format!("NOTES: {}", text))
        }
    }
}

struct TestApp {
    router: Router,
    scratch: TempDir,
    notes: Arc<StubNotes>,
}

fn app(notes_fail: bool) -> TestApp {
    let scratch = tempdir().unwrap();
    let mut config = NotesmithConfig::default();
    config.extraction.scratch_dir = Some(scratch.path().to_path_buf());

    let backend = Arc::new(RecordingBackend::new("SCANNED"));
    let pipeline = DocumentExtractionPipeline::with_scratch_dir(backend, Some(scratch.path().to_path_buf()));
    let notes = Arc::new(StubNotes {
        fail: notes_fail,
        calls: AtomicUsize::new(0),
    });

    TestApp {
        router: create_router_with_services(config, pipeline, notes.clone()),
        scratch,
        notes,
    }
}

fn multipart_request(uri: &str, field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn pdf_bytes(pages: &[TestPage]) -> Vec<u8> {
    let mut doc = build_pdf(pages);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(12, 6, image::Rgb([255, 255, 255]));
    let mut bytes = std::io::Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    bytes.into_inner()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_index() {
    let app = app(false);
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, body) = send(app.router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), "Welcome to Notes Summarizer!");
}

#[tokio::test]
async fn test_health() {
    let app = app(false);
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(app.router, request).await;

    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "healthy");
    assert!(!health.version.is_empty());
}

#[tokio::test]
async fn test_read_text_pdf() {
    let app = app(false);
    let pdf = pdf_bytes(&[TestPage::text("Hello"), TestPage::text("World")]);

    let (status, body) = send(app.router, multipart_request("/read", "file", "lecture.pdf", &pdf)).await;

    assert_eq!(status, StatusCode::OK);
    let response: ReadResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.text, "HelloWorld");
    assert_eq!(count_files(app.scratch.path()), 0, "upload is removed after the request");
}

#[tokio::test]
async fn test_read_scanned_pdf_uses_ocr() {
    let app = app(false);
    let pdf = pdf_bytes(&[TestPage::images(&[10, 12])]);

    let (status, body) = send(app.router, multipart_request("/read", "file", "scan.pdf", &pdf)).await;

    assert_eq!(status, StatusCode::OK);
    let response: ReadResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.text, "SCANNEDSCANNED");
    assert_eq!(count_files(app.scratch.path()), 0);
}

#[tokio::test]
async fn test_read_image_upload() {
    let app = app(false);

    let (status, body) = send(app.router, multipart_request("/read", "file", "Board.PNG", &png_bytes())).await;

    assert_eq!(status, StatusCode::OK);
    let response: ReadResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.text, "SCANNED");
}

#[tokio::test]
async fn test_read_without_file_field() {
    let app = app(false);

    let (status, body) = send(app.router, multipart_request("/read", "document", "a.pdf", b"%PDF")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "No file provided");
}

#[tokio::test]
async fn test_read_unsupported_format() {
    let app = app(false);

    let (status, body) = send(app.router, multipart_request("/read", "file", "notes.txt", b"plain")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.error, "Unsupported file format");
    assert_eq!(count_files(app.scratch.path()), 0);
}

#[tokio::test]
async fn test_read_rejects_file_name_without_extension() {
    let app = app(false);
    let pdf = pdf_bytes(&[TestPage::text("Hidden")]);

    for name in ["pdf", "PNG"] {
        let (status, body) = send(app.router.clone(), multipart_request("/read", "file", name, &pdf)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", name);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "Unsupported file format");
    }
    assert_eq!(count_files(app.scratch.path()), 0);
}

#[tokio::test]
async fn test_read_corrupt_pdf_returns_empty_text() {
    let app = app(false);

    let (status, body) = send(app.router, multipart_request("/read", "file", "bad.pdf", b"garbage")).await;

    assert_eq!(status, StatusCode::OK);
    let response: ReadResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.text, "");
}

#[tokio::test]
async fn test_generate_notes() {
    let app = app(false);
    let pdf = pdf_bytes(&[TestPage::text("Mitochondria")]);

    let (status, body) = send(
        app.router,
        multipart_request("/generate_notes", "file", "bio.pdf", &pdf),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: NotesResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.notes, "NOTES: Mitochondria");
    assert_eq!(app.notes.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_generate_notes_service_failure() {
    let app = app(true);
    let pdf = pdf_bytes(&[TestPage::text("Mitochondria")]);

    let (status, body) = send(
        app.router,
        multipart_request("/generate_notes", "file", "bio.pdf", &pdf),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert!(error.error.starts_with("Error generating study notes:"));
    assert!(error.error.contains("quota exceeded"));
}

#[tokio::test]
async fn test_generate_notes_unsupported_format_skips_service() {
    let app = app(false);

    let (status, _) = send(
        app.router,
        multipart_request("/generate_notes", "file", "slides.pptx", b"PK"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.notes.calls.load(Ordering::SeqCst), 0);
}
