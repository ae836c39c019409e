//! One-shot, non-interactive slug generation.

use crate::{
  document::SourceDocument,
  format::{format_prefix, format_slug_text},
  options::SlugOptions,
  resolver::{PrefixResolver, ResolveError, resolve_url_prefix},
  value::SlugValue,
};

/// Build a complete slug value for `document` from its source field.
///
/// Returns `Ok(None)` when the source field is unset, empty, or formats to
/// nothing. Unlike the interactive field, resolver failures are returned to
/// the caller.
pub async fn generate_url_slug<R>(
  document: &SourceDocument,
  options: &SlugOptions,
  resolver: &R,
) -> Result<Option<SlugValue>, ResolveError>
where
  R: PrefixResolver + ?Sized,
{
  let Some(source) = options.source_text(document).filter(|s| !s.is_empty()) else {
    return Ok(None);
  };

  let current = format_slug_text(source, options.max_length);
  if current.is_empty() {
    return Ok(None);
  }

  let prefix = resolve_url_prefix(Some(document), resolver).await?;
  Ok(Some(SlugValue::compose(current, &format_prefix(&prefix))))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{resolver::StaticPrefix, table::PrefixTable};

  fn article(title: &str) -> SourceDocument {
    SourceDocument::new("a1")
      .with_type("article")
      .with_field("language", "fr")
      .with_field("title", title)
  }

  #[tokio::test]
  async fn generates_from_source_and_prefix() {
    let table = PrefixTable::new().with("article", "{language}/articles");
    let options = SlugOptions::default().with_source("title");

    let value = generate_url_slug(&article("Mon Article"), &options, &table)
      .await
      .unwrap()
      .unwrap();

    assert_eq!(value.current, "mon-article");
    assert_eq!(value.full_url.as_deref(), Some("fr/articles/mon-article"));
  }

  #[tokio::test]
  async fn respects_max_length() {
    let options = SlugOptions::default().with_source("title").with_max_length(3);
    let value = generate_url_slug(&article("abcdef"), &options, &StaticPrefix::new(""))
      .await
      .unwrap()
      .unwrap();
    assert_eq!(value.current, "abc");
    assert_eq!(value.full_url, None);
  }

  #[tokio::test]
  async fn missing_source_yields_nothing() {
    let resolver = StaticPrefix::new("/x/");
    let no_source = SlugOptions::default();
    assert_eq!(
      generate_url_slug(&article("t"), &no_source, &resolver).await.unwrap(),
      None
    );

    let wrong_field = SlugOptions::default().with_source("headline");
    assert_eq!(
      generate_url_slug(&article("t"), &wrong_field, &resolver).await.unwrap(),
      None
    );

    let punctuation = SlugOptions::default().with_source("title");
    assert_eq!(
      generate_url_slug(&article("!!!"), &punctuation, &resolver).await.unwrap(),
      None
    );
  }

  #[tokio::test]
  async fn resolver_errors_propagate() {
    let table = PrefixTable::new().with("article", "{region}/");
    let options = SlugOptions::default().with_source("title");
    assert!(generate_url_slug(&article("x"), &options, &table).await.is_err());
  }
}
