//! Static per-field configuration.

use serde::{Deserialize, Serialize};

use crate::document::SourceDocument;

/// Options fixed for the lifetime of a slug field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlugOptions {
  /// Document field read as default slug text when generating.
  pub source:       Option<String>,
  /// Upper bound on emitted slug length, in characters.
  pub max_length:   Option<usize>,
  /// Fields whose change triggers prefix re-resolution. Empty means any
  /// change does.
  pub watch_fields: Vec<String>,
}

impl SlugOptions {
  pub fn with_source(mut self, source: impl Into<String>) -> Self {
    self.source = Some(source.into());
    self
  }

  pub fn with_max_length(mut self, max_length: usize) -> Self {
    self.max_length = Some(max_length);
    self
  }

  pub fn watching<I, S>(mut self, fields: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.watch_fields = fields.into_iter().map(Into::into).collect();
    self
  }

  /// The text of the configured source field, if it names a string field
  /// present on `document`.
  pub fn source_text<'a>(&self, document: &'a SourceDocument) -> Option<&'a str> {
    document.get_str(self.source.as_deref()?)
  }
}
