//! Configuration loading and management.
//!
//! Configuration is read from a `notesmith.toml` file, either given explicitly or
//! discovered by walking up from the current directory. Every section is optional;
//! missing keys fall back to the defaults documented on each field.

use crate::{NotesmithError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the file looked up by [`NotesmithConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "notesmith.toml";

/// Environment variable that overrides `notes.api_key`.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotesmithConfig {
    #[serde(default)]
    pub ocr: OcrConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub notes: NotesConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// OCR engine settings. Applied once when the backend is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language code(s), `+`-separated (default: "eng")
    #[serde(default = "default_language")]
    pub language: String,

    /// Page segmentation mode, 0-13 (default: 3, fully automatic)
    #[serde(default = "default_psm")]
    pub psm: u8,

    /// Directory holding `*.traineddata`. Falls back to `TESSDATA_PREFIX` and system paths.
    #[serde(default)]
    pub tessdata_path: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            psm: default_psm(),
            tessdata_path: None,
        }
    }
}

/// Scratch storage used while extracting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Parent directory for per-request scratch directories (default: system temp dir)
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

/// Notes generation service settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct NotesConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Text placed in front of the extracted document in the prompt
    #[serde(default = "default_prompt_prefix")]
    pub prompt_prefix: String,

    /// API key. `GEMINI_API_KEY` takes precedence when set.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            prompt_prefix: default_prompt_prefix(),
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for NotesConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotesConfig")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("prompt_prefix", &self.prompt_prefix)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl NotesConfig {
    /// API key from the environment, falling back to the config file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum request body size in bytes (default: 100 MB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Abandon extraction after this many seconds. `None` waits indefinitely.
    #[serde(default)]
    pub extraction_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            cors_origins: Vec::new(),
            extraction_timeout_secs: None,
        }
    }
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_psm() -> u8 {
    3
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_prompt_prefix() -> String {
    "Convert to study notes for my exam: ".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    100 * 1024 * 1024
}

impl NotesmithConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            NotesmithError::validation(format!("Failed to read config file {}: {}", path.as_ref().display(), e))
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| NotesmithError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Discover configuration file in parent directories.
    ///
    /// Searches for `notesmith.toml` in the current directory and its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let current = std::env::current_dir().map_err(NotesmithError::Io)?;
        Self::discover_from(&current)
    }

    /// Like [`discover`](Self::discover), starting from `start` instead of the current directory.
    pub fn discover_from(start: &Path) -> Result<Option<Self>> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!("Found config file at {}", candidate.display());
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.ocr.language.trim().is_empty() {
            return Err(NotesmithError::validation(
                "ocr.language cannot be empty. Please specify a valid language code (e.g., 'eng')",
            ));
        }
        if self.ocr.psm > 13 {
            return Err(NotesmithError::validation(format!(
                "ocr.psm must be between 0 and 13, got {}",
                self.ocr.psm
            )));
        }
        if self.server.port == 0 {
            return Err(NotesmithError::validation("server.port must be non-zero"));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(NotesmithError::validation("server.max_upload_bytes must be greater than 0"));
        }
        if self.server.extraction_timeout_secs == Some(0) {
            return Err(NotesmithError::validation(
                "server.extraction_timeout_secs must be greater than 0 when set",
            ));
        }
        Ok(())
    }
}
