//! `urlslug` — format, generate and interactively edit URL slugs.
//!
//! Reads `urlslug.toml` (or the path given with `--config`) for field options
//! and the per-document-type prefix table.
//!
//! # Usage
//!
//! ```text
//! urlslug format "Don't Stop!"
//! urlslug generate --document article.json
//! urlslug session --document article.json < events.jsonl
//! ```

mod config;
mod session;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use urlslug_core::{
  document::SourceDocument,
  format::{format_prefix, format_slug_text},
  generate::generate_url_slug,
  value::{Preview, SlugValue, validate_slug},
};

use crate::{
  config::AppConfig,
  session::{Session, SessionEvent},
};

#[derive(Parser)]
#[command(name = "urlslug", version, about = "URL slug formatting and editing")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "urlslug.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Format free text into a slug.
  Format {
    text:       String,
    /// Overrides `field.max_length`.
    #[arg(long)]
    max_length: Option<usize>,
  },
  /// Show how a raw URL prefix is displayed.
  Prefix { raw: String },
  /// Generate a slug value for a JSON document.
  Generate {
    #[arg(short, long)]
    document:   PathBuf,
    /// Overrides `field.source`.
    #[arg(long)]
    source:     Option<String>,
    #[arg(long)]
    max_length: Option<usize>,
  },
  /// Check a stored slug value (JSON) and print its preview.
  Check { value: String },
  /// Drive an editing session with JSON-lines events on stdin.
  Session {
    /// Document to load before reading events.
    #[arg(short, long)]
    document:   Option<PathBuf>,
    #[arg(long)]
    source:     Option<String>,
    #[arg(long)]
    max_length: Option<usize>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)
    .with_context(|| format!("loading {}", cli.config.display()))?;

  match cli.command {
    Command::Format { text, max_length } => {
      println!("{}", format_slug_text(&text, max_length.or(cfg.field.max_length)));
    }
    Command::Prefix { raw } => {
      println!("{}", format_prefix(&raw));
    }
    Command::Generate {
      document,
      source,
      max_length,
    } => {
      let doc = read_document(&document)?;
      let mut options = cfg.field.options();
      options.source = source.or(options.source);
      options.max_length = max_length.or(options.max_length);

      let value = generate_url_slug(&doc, &options, &cfg.prefixes)
        .await
        .map_err(|e| anyhow::anyhow!("couldn't resolve URL prefix: {e}"))?;
      println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Command::Check { value } => {
      let value: Option<SlugValue> =
        serde_json::from_str(&value).context("parsing slug value")?;
      println!("{}", serde_json::to_string_pretty(&Preview::of(value.as_ref()))?);
      if let Err(e) = validate_slug(value.as_ref()) {
        bail!(e);
      }
    }
    Command::Session {
      document,
      source,
      max_length,
    } => {
      let mut options = cfg.field.options();
      options.source = source.or(options.source);
      options.max_length = max_length.or(options.max_length);

      let mut session = Session::new(options, cfg.prefixes.clone(), cfg.field.suppress_window());
      if let Some(path) = document {
        let doc = read_document(&path)?;
        session
          .handle(SessionEvent::Document {
            document: Some(doc),
          })
          .await?;
      }

      tracing::info!("reading session events from stdin");
      let stdin = tokio::io::BufReader::new(tokio::io::stdin());
      let mut stdout = tokio::io::stdout();
      session.run(stdin, &mut stdout).await?;
    }
  }

  Ok(())
}

fn read_document(path: &Path) -> anyhow::Result<SourceDocument> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading document {}", path.display()))?;
  serde_json::from_str(&raw).with_context(|| format!("parsing document {}", path.display()))
}
