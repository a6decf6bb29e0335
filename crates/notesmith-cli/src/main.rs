//! Notesmith command-line interface.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use notesmith::{DocumentExtractionPipeline, DocumentKind, GeminiNotesClient, NotesService, NotesmithConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Plain extracted text
    Text,
    /// JSON with text, diagnostics and whether OCR fallback ran
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "notesmith", version)]
#[command(about = "Extract text from PDFs and images and turn it into study notes", long_about = None)]
struct Cli {
    /// Configuration file (defaults to notesmith.toml in the current or a parent directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract text from a PDF, PNG, JPEG or BMP file
    Extract {
        /// Document to read
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Extract text and generate study notes from it
    Notes {
        /// Document to read
        path: PathBuf,
    },

    /// Start the API server
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn load_config(path: Option<&Path>) -> Result<NotesmithConfig> {
    if let Some(path) = path {
        return NotesmithConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }
    Ok(NotesmithConfig::discover()?.unwrap_or_default())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract { path, format } => {
            let kind = DocumentKind::from_path(&path)?;
            let pipeline = DocumentExtractionPipeline::from_config(&config)?;
            let outcome = tokio::task::spawn_blocking(move || pipeline.run_kind_detailed(&path, kind)).await?;

            match format {
                OutputFormat::Text => println!("{}", outcome.text),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
            }
            Ok(())
        }

        Commands::Notes { path } => {
            let kind = DocumentKind::from_path(&path)?;
            let pipeline = DocumentExtractionPipeline::from_config(&config)?;
            let notes = GeminiNotesClient::new(&config.notes)?;

            let text = tokio::task::spawn_blocking(move || pipeline.run_kind(&path, kind)).await?;
            tracing::info!("Sending {} chars to {}", text.len(), notes.name());
            let notes = notes
                .generate_notes(&text)
                .await
                .context("Error generating study notes")?;

            println!("{}", notes);
            Ok(())
        }

        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            notesmith::api::serve_with_config(config).await?;
            Ok(())
        }
    }
}
