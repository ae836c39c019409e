//! Configuration: `urlslug.toml` layered with `URLSLUG_*` environment
//! variables.

use std::{path::Path, time::Duration};

use anyhow::Context as _;
use serde::Deserialize;
use urlslug_core::{options::SlugOptions, table::PrefixTable};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  pub field:    FieldConfig,
  /// Document type -> prefix template. The `config` crate lowercases file
  /// keys; [`PrefixTable`] matches `_type` case-insensitively.
  pub prefixes: PrefixTable,
}

/// The `[field]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
  pub source:             Option<String>,
  pub max_length:         Option<usize>,
  pub watch_fields:       Vec<String>,
  pub suppress_window_ms: u64,
}

impl Default for FieldConfig {
  fn default() -> Self {
    Self {
      source:             None,
      max_length:         None,
      watch_fields:       Vec::new(),
      suppress_window_ms: 200,
    }
  }
}

impl FieldConfig {
  pub fn options(&self) -> SlugOptions {
    SlugOptions {
      source:       self.source.clone(),
      max_length:   self.max_length,
      watch_fields: self.watch_fields.clone(),
    }
  }

  pub fn suppress_window(&self) -> Duration { Duration::from_millis(self.suppress_window_ms) }
}

impl AppConfig {
  /// Load from `path` (optional on disk) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("URLSLUG")
          .prefix_separator("_")
          .separator("__")
          .list_separator(",")
          .with_list_parse_key("field.watch_fields")
          .try_parsing(true),
      )
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use urlslug_core::document::SourceDocument;

  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let cfg = AppConfig::load(Path::new("/nonexistent/urlslug.toml")).unwrap();
    assert_eq!(cfg.field.suppress_window(), Duration::from_millis(200));
    assert!(cfg.prefixes.is_empty());
  }

  #[test]
  fn reads_field_options_and_prefixes() {
    let path = std::env::temp_dir().join(format!("urlslug-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
      file,
      r#"
[field]
source = "title"
max_length = 40
watch_fields = ["language"]

[prefixes]
bike = "/bikes/"
article = "{{language}}/articles/"
"#
    )
    .unwrap();

    let cfg = AppConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let options = cfg.field.options();
    assert_eq!(options.source.as_deref(), Some("title"));
    assert_eq!(options.max_length, Some(40));
    assert_eq!(options.watch_fields, vec!["language".to_owned()]);
    assert_eq!(cfg.prefixes.template("bike"), Some("/bikes/"));
    assert_eq!(cfg.prefixes.template("article"), Some("{language}/articles/"));
  }

  #[test]
  fn camel_case_document_types_keep_their_prefix() {
    let path =
      std::env::temp_dir().join(format!("urlslug-camel-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
      file,
      r#"
[prefixes]
clothingCategory = "/clothing/"
article = "{{language|}}/articles/"
"#
    )
    .unwrap();

    let cfg = AppConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let category = SourceDocument::new("c1").with_type("clothingCategory");
    assert_eq!(cfg.prefixes.template("clothingCategory"), Some("/clothing/"));
    assert_eq!(cfg.prefixes.render(&category).unwrap(), "/clothing/");

    let untranslated = SourceDocument::new("a1").with_type("article");
    assert_eq!(cfg.prefixes.render(&untranslated).unwrap(), "/articles/");
  }
}
