//! The governing document a slug field belongs to.
//!
//! Documents are owned by the host. The slug field only ever reads `_id`,
//! `_type`, the configured source field and whichever fields a prefix
//! resolver consults.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A snapshot of the host document at the time of a change notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
  #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
  pub id:       Option<String>,
  #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
  pub doc_type: Option<String>,
  /// Every other field, keyed by name.
  #[serde(flatten)]
  pub fields:   Map<String, Value>,
}

impl SourceDocument {
  /// A document with the given `_id` and no other fields.
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: Some(id.into()),
      ..Self::default()
    }
  }

  pub fn with_type(mut self, doc_type: impl Into<String>) -> Self {
    self.doc_type = Some(doc_type.into());
    self
  }

  pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.fields.insert(name.into(), value.into());
    self
  }

  /// `true` when the document carries a non-empty `_id`.
  ///
  /// Documents without an identity have not been created yet; no prefix is
  /// resolved for them.
  pub fn has_identity(&self) -> bool {
    self.id.as_deref().is_some_and(|id| !id.is_empty())
  }

  /// Look up a field by name, including the reserved `_id` and `_type`.
  pub fn get(&self, name: &str) -> Option<Value> {
    match name {
      "_id" => self.id.clone().map(Value::String),
      "_type" => self.doc_type.clone().map(Value::String),
      _ => self.fields.get(name).cloned(),
    }
  }

  /// Look up a field that holds a plain string. Any other JSON type yields
  /// `None`.
  pub fn get_str(&self, name: &str) -> Option<&str> {
    match name {
      "_id" => self.id.as_deref(),
      "_type" => self.doc_type.as_deref(),
      _ => self.fields.get(name).and_then(Value::as_str),
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn deserializes_reserved_and_free_fields() {
    let doc: SourceDocument = serde_json::from_value(json!({
      "_id": "d1",
      "_type": "article",
      "language": "fr",
      "title": "Mon Article",
    }))
    .unwrap();

    assert_eq!(doc.id.as_deref(), Some("d1"));
    assert_eq!(doc.doc_type.as_deref(), Some("article"));
    assert_eq!(doc.get_str("language"), Some("fr"));
    assert_eq!(doc.get_str("_type"), Some("article"));
    assert!(doc.fields.get("_id").is_none());
  }

  #[test]
  fn empty_id_has_no_identity() {
    assert!(!SourceDocument::new("").has_identity());
    assert!(!SourceDocument::default().has_identity());
    assert!(SourceDocument::new("d1").has_identity());
  }

  #[test]
  fn non_string_fields_are_not_strings() {
    let doc = SourceDocument::new("d1").with_field("rank", 3);
    assert_eq!(doc.get_str("rank"), None);
    assert_eq!(doc.get("rank"), Some(json!(3)));
  }
}
