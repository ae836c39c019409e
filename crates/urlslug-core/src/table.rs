//! Per-document-type URL prefix table.
//!
//! Each entry maps a document `_type` to a prefix template. A template is
//! either a literal (`"/bikes/"`) or contains `{field}` placeholders that are
//! filled from the document (`"{language}/articles/"`). A placeholder may name
//! a fallback after `|` for when the field is missing or null:
//! `"{language|}/articles/"` renders `/articles/` for a document without a
//! language. Document types with no entry resolve to the empty prefix.
//!
//! Type names match case-insensitively. Configuration loaders may lowercase
//! table keys while the host keeps `_type` as declared (`bikeSettings`).

use std::{collections::BTreeMap, future::Future};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  Error, Result,
  document::SourceDocument,
  resolver::{PrefixResolver, ResolveError},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixTable {
  templates: BTreeMap<String, String>,
}

impl PrefixTable {
  pub fn new() -> Self { Self::default() }

  pub fn with(mut self, doc_type: impl Into<String>, template: impl Into<String>) -> Self {
    self.templates.insert(doc_type.into(), template.into());
    self
  }

  /// The template for `doc_type`. An exact match wins over a
  /// case-insensitive one.
  pub fn template(&self, doc_type: &str) -> Option<&str> {
    self
      .templates
      .get(doc_type)
      .or_else(|| {
        let wanted = doc_type.to_lowercase();
        self
          .templates
          .iter()
          .find(|(key, _)| key.to_lowercase() == wanted)
          .map(|(_, template)| template)
      })
      .map(String::as_str)
  }

  pub fn is_empty(&self) -> bool { self.templates.is_empty() }

  /// Render the prefix for `document` from its type's template.
  pub fn render(&self, document: &SourceDocument) -> Result<String> {
    match document.doc_type.as_deref().and_then(|t| self.template(t)) {
      Some(template) => render_template(template, document),
      None => Ok(String::new()),
    }
  }
}

impl PrefixResolver for PrefixTable {
  fn resolve<'a>(
    &'a self,
    document: &'a SourceDocument,
  ) -> impl Future<Output = Result<String, ResolveError>> + Send + 'a {
    std::future::ready(self.render(document).map_err(ResolveError::from))
  }
}

/// Substitute `{field}` and `{field|fallback}` placeholders. An unmatched `{`
/// is kept literally.
fn render_template(template: &str, document: &SourceDocument) -> Result<String> {
  let mut out = String::with_capacity(template.len());
  let mut rest = template;

  while let Some(open) = rest.find('{') {
    let Some(close) = rest[open..].find('}') else {
      break;
    };
    out.push_str(&rest[..open]);
    let placeholder = &rest[open + 1..open + close];
    let (field, fallback) = match placeholder.split_once('|') {
      Some((field, fallback)) => (field, Some(fallback)),
      None => (placeholder, None),
    };
    out.push_str(&field_text(document, field, fallback)?);
    rest = &rest[open + close + 1..];
  }
  out.push_str(rest);

  Ok(out)
}

fn field_text(
  document: &SourceDocument,
  field: &str,
  fallback: Option<&str>,
) -> Result<String> {
  match document.get(field) {
    Some(Value::String(s)) => Ok(s),
    Some(Value::Number(n)) => Ok(n.to_string()),
    Some(Value::Null) | None => match fallback {
      Some(fallback) => Ok(fallback.to_owned()),
      None => Err(Error::MissingField(field.to_owned())),
    },
    Some(_) => Err(Error::NonStringField(field.to_owned())),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn table() -> PrefixTable {
    PrefixTable::new()
      .with("bike", "/bikes/")
      .with("article", "{language}/articles/")
      .with("edition", "{year}/{_type}")
  }

  #[test]
  fn literal_templates_are_returned_verbatim() {
    let doc = SourceDocument::new("b1").with_type("bike");
    assert_eq!(table().render(&doc).unwrap(), "/bikes/");
  }

  #[test]
  fn placeholders_are_filled_from_fields() {
    let doc = SourceDocument::new("a1")
      .with_type("article")
      .with_field("language", "fr");
    assert_eq!(table().render(&doc).unwrap(), "fr/articles/");

    let doc = SourceDocument::new("e1")
      .with_type("edition")
      .with_field("year", 2024);
    assert_eq!(table().render(&doc).unwrap(), "2024/edition");
  }

  #[test]
  fn unknown_types_have_no_prefix() {
    let doc = SourceDocument::new("x1").with_type("car");
    assert_eq!(table().render(&doc).unwrap(), "");
    assert_eq!(table().render(&SourceDocument::new("x2")).unwrap(), "");
  }

  #[test]
  fn missing_placeholder_field_is_an_error() {
    let doc = SourceDocument::new("a1").with_type("article");
    let err = table().render(&doc).unwrap_err();
    assert!(matches!(err, Error::MissingField(ref f) if f == "language"));
    assert_eq!(
      err.to_string(),
      "prefix template references missing field `language`"
    );
  }

  #[test]
  fn structured_placeholder_field_is_an_error() {
    let doc = SourceDocument::new("a1")
      .with_type("article")
      .with_field("language", json!({ "code": "fr" }));
    assert!(matches!(
      table().render(&doc),
      Err(Error::NonStringField(_))
    ));
  }

  #[test]
  fn fallback_covers_missing_and_null_fields() {
    let table = PrefixTable::new()
      .with("article", "{language|}/articles/")
      .with("page", "{language|en}/pages/");

    let bare = SourceDocument::new("a1").with_type("article");
    assert_eq!(table.render(&bare).unwrap(), "/articles/");

    let null = SourceDocument::new("a2")
      .with_type("article")
      .with_field("language", Value::Null);
    assert_eq!(table.render(&null).unwrap(), "/articles/");

    let french = SourceDocument::new("a3")
      .with_type("article")
      .with_field("language", "fr");
    assert_eq!(table.render(&french).unwrap(), "fr/articles/");

    let page = SourceDocument::new("p1").with_type("page");
    assert_eq!(table.render(&page).unwrap(), "en/pages/");
  }

  #[test]
  fn fallback_does_not_hide_structured_fields() {
    let table = PrefixTable::new().with("article", "{language|}/articles/");
    let doc = SourceDocument::new("a1")
      .with_type("article")
      .with_field("language", json!(["fr"]));
    assert!(matches!(table.render(&doc), Err(Error::NonStringField(_))));
  }

  #[test]
  fn type_lookup_ignores_case() {
    let table = PrefixTable::new()
      .with("clothingcategory", "/clothing/")
      .with("bikeSettings", "/bikes/settings/");

    let doc = SourceDocument::new("c1").with_type("clothingCategory");
    assert_eq!(table.template("clothingCategory"), Some("/clothing/"));
    assert_eq!(table.render(&doc).unwrap(), "/clothing/");

    let settings = SourceDocument::new("s1").with_type("bikesettings");
    assert_eq!(table.render(&settings).unwrap(), "/bikes/settings/");
  }

  #[test]
  fn exact_type_match_wins() {
    let table = PrefixTable::new()
      .with("Bike", "/upper/")
      .with("bike", "/lower/");
    assert_eq!(table.template("Bike"), Some("/upper/"));
    assert_eq!(table.template("bike"), Some("/lower/"));
  }

  #[test]
  fn unterminated_brace_is_literal() {
    let table = PrefixTable::new().with("odd", "a/{b");
    let doc = SourceDocument::new("o1").with_type("odd");
    assert_eq!(table.render(&doc).unwrap(), "a/{b");
  }

  #[test]
  fn deserializes_from_a_plain_map() {
    let table: PrefixTable =
      serde_json::from_value(json!({ "bike": "/bikes/" })).unwrap();
    assert_eq!(table.template("bike"), Some("/bikes/"));
  }

  #[tokio::test]
  async fn resolver_reports_render_errors() {
    let doc = SourceDocument::new("a1").with_type("article");
    let err = table().resolve(&doc).await.unwrap_err();
    assert!(err.to_string().contains("language"));
  }
}
