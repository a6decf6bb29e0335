//! API request and response types.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::config::NotesmithConfig;
use crate::core::pipeline::DocumentExtractionPipeline;
use crate::notes::NotesService;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// API version
    pub version: String,
}

/// `POST /read` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResponse {
    pub text: String,
}

/// `POST /generate_notes` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesResponse {
    pub notes: String,
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API server state.
///
/// The pipeline and notes service are built once at startup and shared by all requests.
#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<NotesmithConfig>,
    pub pipeline: Arc<DocumentExtractionPipeline>,
    pub notes: Arc<dyn NotesService>,
}
