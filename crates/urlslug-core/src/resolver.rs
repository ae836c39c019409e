//! The `PrefixResolver` trait and its stock implementations.
//!
//! A resolver decides which URL prefix a document's slug lives under (for
//! example `fr/articles/` for a French article). Resolution is asynchronous
//! because real resolvers usually query the content store.

use std::{future::Future, sync::Arc};

use crate::document::SourceDocument;

/// Any failure raised by a resolver. Its `Display` output is what editors
/// see; an empty message is shown as "Unknown error".
pub type ResolveError = Box<dyn std::error::Error + Send + Sync>;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Computes the raw (unformatted) URL prefix for a document.
///
/// Implementations must return `Send` futures so that resolutions can be
/// spawned onto a multi-threaded runtime.
pub trait PrefixResolver: Send + Sync {
  fn resolve<'a>(
    &'a self,
    document: &'a SourceDocument,
  ) -> impl Future<Output = Result<String, ResolveError>> + Send + 'a;
}

impl<R: PrefixResolver + ?Sized> PrefixResolver for Arc<R> {
  fn resolve<'a>(
    &'a self,
    document: &'a SourceDocument,
  ) -> impl Future<Output = Result<String, ResolveError>> + Send + 'a {
    (**self).resolve(document)
  }
}

// ─── Stock resolvers ─────────────────────────────────────────────────────────

/// Resolves every document to the empty prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrefix;

impl PrefixResolver for NoPrefix {
  fn resolve<'a>(
    &'a self,
    _document: &'a SourceDocument,
  ) -> impl Future<Output = Result<String, ResolveError>> + Send + 'a {
    std::future::ready(Ok(String::new()))
  }
}

/// A constant prefix, independent of the document.
#[derive(Debug, Clone, Default)]
pub struct StaticPrefix(pub String);

impl StaticPrefix {
  pub fn new(prefix: impl Into<String>) -> Self { Self(prefix.into()) }
}

impl PrefixResolver for StaticPrefix {
  fn resolve<'a>(
    &'a self,
    _document: &'a SourceDocument,
  ) -> impl Future<Output = Result<String, ResolveError>> + Send + 'a {
    std::future::ready(Ok(self.0.clone()))
  }
}

/// Adapts an async closure into a resolver.
///
/// The closure receives its own copy of the document so the returned future
/// does not borrow from the caller.
///
/// ```
/// use urlslug_core::{document::SourceDocument, resolver::{FnPrefix, ResolveError}};
///
/// let resolver = FnPrefix::new(|doc: SourceDocument| async move {
///   let language = doc.get_str("language").unwrap_or("en").to_owned();
///   Ok::<_, ResolveError>(format!("{language}/articles/"))
/// });
/// # let _ = resolver;
/// ```
#[derive(Clone)]
pub struct FnPrefix<F>(F);

impl<F, Fut> FnPrefix<F>
where
  F: Fn(SourceDocument) -> Fut + Send + Sync,
  Fut: Future<Output = Result<String, ResolveError>> + Send + 'static,
{
  pub fn new(f: F) -> Self { Self(f) }
}

impl<F, Fut> PrefixResolver for FnPrefix<F>
where
  F: Fn(SourceDocument) -> Fut + Send + Sync,
  Fut: Future<Output = Result<String, ResolveError>> + Send + 'static,
{
  fn resolve<'a>(
    &'a self,
    document: &'a SourceDocument,
  ) -> impl Future<Output = Result<String, ResolveError>> + Send + 'a {
    (self.0)(document.clone())
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Resolve the prefix for an optional document.
///
/// Absent documents, and documents without an `_id`, resolve to `""` without
/// consulting the resolver.
pub async fn resolve_url_prefix<R>(
  document: Option<&SourceDocument>,
  resolver: &R,
) -> Result<String, ResolveError>
where
  R: PrefixResolver + ?Sized,
{
  match document {
    Some(doc) if doc.has_identity() => resolver.resolve(doc).await,
    _ => Ok(String::new()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn static_prefix_ignores_the_document() {
    let resolver = StaticPrefix::new("/bikes/");
    let doc = SourceDocument::new("b1");
    assert_eq!(resolver.resolve(&doc).await.unwrap(), "/bikes/");
  }

  #[tokio::test]
  async fn closure_resolver_reads_fields() {
    let resolver = FnPrefix::new(|doc: SourceDocument| async move {
      let language = doc.get_str("language").unwrap_or("en").to_owned();
      Ok::<_, ResolveError>(format!("{language}/articles/"))
    });
    let doc = SourceDocument::new("a1").with_field("language", "fr");
    assert_eq!(resolver.resolve(&doc).await.unwrap(), "fr/articles/");
  }

  #[tokio::test]
  async fn documents_without_identity_resolve_to_empty() {
    let resolver = StaticPrefix::new("/bikes/");
    assert_eq!(resolve_url_prefix(None, &resolver).await.unwrap(), "");

    let unsaved = SourceDocument::default().with_field("title", "x");
    assert_eq!(
      resolve_url_prefix(Some(&unsaved), &resolver).await.unwrap(),
      ""
    );

    let saved = SourceDocument::new("b1");
    assert_eq!(
      resolve_url_prefix(Some(&saved), &resolver).await.unwrap(),
      "/bikes/"
    );
  }
}
