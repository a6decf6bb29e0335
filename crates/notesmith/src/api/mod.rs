//! REST API server for Notesmith.
//!
//! An Axum-based HTTP server wrapping the extraction pipeline and the notes service.
//!
//! # Endpoints
//!
//! - `GET /` - Welcome message
//! - `GET /health` - Health check endpoint
//! - `POST /read` - Extract text from an uploaded file (multipart field `file`)
//! - `POST /generate_notes` - Extract text and turn it into study notes
//!
//! # Examples
//!
//! ## Starting the server
//!
//! ```no_run
//! use notesmith::api::serve;
//!
//! #[tokio::main]
//! async fn main() -> notesmith::Result<()> {
//!     serve("127.0.0.1", 5000).await?;
//!     Ok(())
//! }
//! ```
//!
//! # cURL Examples
//!
//! ```bash
//! curl -F "file=@lecture.pdf" http://localhost:5000/read
//! curl -F "file=@whiteboard.jpg" http://localhost:5000/generate_notes
//! curl http://localhost:5000/health
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use server::{create_router, create_router_with_services, serve, serve_with_config};
pub use types::{ApiState, ErrorResponse, HealthResponse, NotesResponse, ReadResponse};
