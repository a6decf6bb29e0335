//! API server setup and configuration.

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::core::config::NotesmithConfig;
use crate::core::pipeline::DocumentExtractionPipeline;
use crate::notes::{GeminiNotesClient, NotesService};
use crate::{NotesmithError, Result};

use super::{
    handlers::{generate_notes_handler, health_handler, index_handler, read_handler},
    types::ApiState,
};

/// Create the API router with the pipeline and notes client built from `config`.
///
/// # Errors
///
/// Fails when the OCR backend cannot be initialized (e.g. the configured
/// language is not installed) or the HTTP client cannot be created.
pub fn create_router(config: NotesmithConfig) -> Result<Router> {
    let pipeline = DocumentExtractionPipeline::from_config(&config)?;
    let notes = GeminiNotesClient::new(&config.notes)?;
    Ok(create_router_with_services(config, pipeline, Arc::new(notes)))
}

/// Create the API router around an existing pipeline and notes service.
///
/// This is public to allow embedding the router with custom OCR backends or notes services.
pub fn create_router_with_services(
    config: NotesmithConfig,
    pipeline: DocumentExtractionPipeline,
    notes: Arc<dyn NotesService>,
) -> Router {
    let max_body = config.server.max_upload_bytes;
    let cors_layer = cors_layer(&config.server.cors_origins);

    let state = ApiState {
        config: Arc::new(config),
        pipeline: Arc::new(pipeline),
        notes,
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/read", post(read_handler))
        .route("/generate_notes", post(generate_notes_handler))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<_> = origins
        .iter()
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!(
            "CORS configured to allow all origins (default). For production, set server.cors_origins \
             to the list of allowed origins (e.g. ['https://notes.example.com'])"
        );
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        tracing::info!("CORS configured with {} explicit allowed origin(s)", origins.len());
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server with config file discovery.
///
/// Searches for `notesmith.toml` in the current and parent directories and
/// falls back to defaults. `host` and `port` override the file's `[server]` section.
///
/// # Examples
///
/// ```no_run
/// use notesmith::api::serve;
///
/// #[tokio::main]
/// async fn main() -> notesmith::Result<()> {
///     serve("0.0.0.0", 5000).await?;
///     Ok(())
/// }
/// ```
pub async fn serve(host: impl AsRef<str>, port: u16) -> Result<()> {
    let mut config = match NotesmithConfig::discover()? {
        Some(config) => {
            tracing::info!("Loaded config from discovered file");
            config
        }
        None => {
            tracing::info!("No config file found, using default configuration");
            NotesmithConfig::default()
        }
    };

    config.server.host = host.as_ref().to_string();
    config.server.port = port;
    serve_with_config(config).await
}

/// Start the API server on `config.server.host:config.server.port`.
pub async fn serve_with_config(config: NotesmithConfig) -> Result<()> {
    let ip: IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| NotesmithError::validation(format!("Invalid host address: {}", e)))?;

    let addr = SocketAddr::new(ip, config.server.port);
    let app = create_router(config)?;

    tracing::info!("Starting Notesmith API server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(NotesmithError::Io)?;

    axum::serve(listener, app)
        .await
        .map_err(|e| NotesmithError::Other(e.to_string()))?;

    Ok(())
}
