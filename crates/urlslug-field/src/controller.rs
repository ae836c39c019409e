//! [`SlugFieldController`] — the state machine behind one slug field.
//!
//! Prefix resolution moves through `Idle -> Loading -> Resolved | Failed` and
//! re-enters `Loading` on every qualifying document change. Writing a value
//! opens a short suppression window: the host echoes our own write back as a
//! document change, and refetching the prefix on every keystroke would make
//! the field flicker.

use std::{sync::Arc, time::Duration};

use serde_json::Value;
use tokio::{
  sync::watch,
  task::JoinHandle,
  time::Instant,
};
use urlslug_core::{
  document::SourceDocument,
  format::format_slug_text,
  options::SlugOptions,
  resolver::PrefixResolver,
  value::{SlugPatch, SlugValue},
};

use crate::{resolution::PrefixResolution, sink::ValueSink, view::SlugFieldView};

/// How long after a write document changes are ignored.
pub const DEFAULT_SUPPRESS_WINDOW: Duration = Duration::from_millis(200);

// ─── Watch snapshot ──────────────────────────────────────────────────────────

/// The parts of a document that decide whether a change qualifies.
#[derive(Debug, Clone, PartialEq)]
struct WatchSnapshot {
  id:     Option<String>,
  values: Vec<Option<Value>>,
}

impl WatchSnapshot {
  fn of(document: Option<&SourceDocument>, fields: &[String]) -> Self {
    match document {
      Some(doc) => Self {
        id:     doc.id.clone(),
        values: fields.iter().map(|f| doc.get(f)).collect(),
      },
      None => Self {
        id:     None,
        values: Vec::new(),
      },
    }
  }
}

// ─── Controller ──────────────────────────────────────────────────────────────

/// Drives a single slug field.
///
/// Field instances are independent; nothing is shared between controllers.
/// All methods that start a resolution must be called from within a tokio
/// runtime.
pub struct SlugFieldController<R, S> {
  options:         SlugOptions,
  resolver:        Arc<R>,
  sink:            S,
  resolution:      Arc<watch::Sender<PrefixResolution>>,
  suppress_window: Duration,
  suppress_until:  Option<Instant>,
  document:        Option<SourceDocument>,
  last_watched:    Option<WatchSnapshot>,
  value:           Option<SlugValue>,
}

impl<R, S> SlugFieldController<R, S>
where
  R: PrefixResolver + 'static,
  S: ValueSink,
{
  pub fn new(options: SlugOptions, resolver: R, sink: S) -> Self {
    let (resolution, _) = watch::channel(PrefixResolution::default());
    Self {
      options,
      resolver: Arc::new(resolver),
      sink,
      resolution: Arc::new(resolution),
      suppress_window: DEFAULT_SUPPRESS_WINDOW,
      suppress_until: None,
      document: None,
      last_watched: None,
      value: None,
    }
  }

  pub fn with_suppress_window(mut self, window: Duration) -> Self {
    self.suppress_window = window;
    self
  }

  /// Seed the field with the value currently persisted on the document.
  pub fn with_value(mut self, value: Option<SlugValue>) -> Self {
    self.value = value;
    self
  }

  // ── Accessors ─────────────────────────────────────────────────────────

  pub fn options(&self) -> &SlugOptions { &self.options }

  pub fn document(&self) -> Option<&SourceDocument> { self.document.as_ref() }

  pub fn value(&self) -> Option<&SlugValue> { self.value.as_ref() }

  pub fn sink(&self) -> &S { &self.sink }

  pub fn sink_mut(&mut self) -> &mut S { &mut self.sink }

  /// Current prefix resolution state.
  pub fn resolution(&self) -> PrefixResolution { self.resolution.borrow().clone() }

  /// Subscribe to prefix resolution updates.
  pub fn subscribe(&self) -> watch::Receiver<PrefixResolution> {
    self.resolution.subscribe()
  }

  /// `true` while document changes are being ignored after a write.
  pub fn is_suppressed(&self) -> bool {
    self.suppress_until.is_some_and(|until| Instant::now() < until)
  }

  /// Display snapshot for the rendering layer.
  pub fn view(&self) -> SlugFieldView {
    let resolution = self.resolution.borrow();
    SlugFieldView {
      prefix_display: resolution.formatted_prefix(),
      is_loading:     resolution.is_loading,
      error:          resolution.error.clone(),
      current:        self.value.as_ref().map(|v| v.current.clone()),
      can_generate:   self.options.source.is_some(),
    }
  }

  // ── Host events ───────────────────────────────────────────────────────

  /// Replace the stored value after an external edit. Emits nothing.
  pub fn set_value(&mut self, value: Option<SlugValue>) { self.value = value; }

  /// React to a new snapshot of the governing document.
  ///
  /// Returns the handle of the spawned resolution, if one was started. No
  /// resolution starts when the change does not touch a watched field, when
  /// it arrives inside the suppression window, or when the document has no
  /// `_id` (the prefix is cleared instead).
  ///
  /// # Panics
  ///
  /// Panics if called outside a tokio runtime and a resolution is started.
  pub fn on_document_changed(
    &mut self,
    document: Option<SourceDocument>,
  ) -> Option<JoinHandle<()>> {
    let snapshot = WatchSnapshot::of(document.as_ref(), &self.options.watch_fields);
    self.document = document;

    if !self.options.watch_fields.is_empty()
      && self.last_watched.as_ref() == Some(&snapshot)
    {
      tracing::trace!("document change does not touch watched fields");
      return None;
    }
    self.last_watched = Some(snapshot);

    if self.is_suppressed() {
      tracing::trace!("document change inside suppression window, ignoring");
      return None;
    }

    let document = match &self.document {
      Some(doc) if doc.has_identity() => doc.clone(),
      _ => {
        self.resolution.send_modify(PrefixResolution::clear);
        return None;
      }
    };

    Some(self.spawn_resolution(document))
  }

  fn spawn_resolution(&self, document: SourceDocument) -> JoinHandle<()> {
    let mut attempt = 0;
    self.resolution.send_modify(|r| attempt = r.begin());
    tracing::debug!(document_id = ?document.id, attempt, "resolving URL prefix");

    let resolver = Arc::clone(&self.resolver);
    let resolution = Arc::clone(&self.resolution);

    tokio::spawn(async move {
      let outcome = resolver.resolve(&document).await;
      if let Err(err) = &outcome {
        tracing::warn!(document_id = ?document.id, error = %err, "couldn't resolve URL prefix");
      }
      let applied = resolution.send_if_modified(|r| r.finish(attempt, outcome));
      if applied {
        let state = resolution.borrow().state();
        tracing::debug!(attempt, state = state.as_ref(), "prefix resolution settled");
      } else {
        tracing::debug!(attempt, "discarding stale prefix resolution");
      }
    })
  }

  // ── Editor actions ────────────────────────────────────────────────────

  /// Emit `text` as the new slug.
  ///
  /// Empty text unsets the field. Opens (or extends) the suppression window.
  /// The emitted patch is also returned.
  pub fn update_value(&mut self, text: &str) -> SlugPatch {
    self.suppress_until = Some(Instant::now() + self.suppress_window);

    let patch = if text.is_empty() {
      SlugPatch::Unset
    } else {
      let prefix = self.resolution.borrow().formatted_prefix();
      SlugPatch::Set(SlugValue::compose(text, &prefix))
    };

    tracing::debug!(?patch, "emitting slug value");
    self.value = patch.value().cloned();
    self.sink.emit(patch.clone());
    patch
  }

  /// Format `input`, or the stored slug when `input` is `None`, and emit it.
  pub fn format_slug(&mut self, input: Option<&str>) -> SlugPatch {
    let raw = match input {
      Some(text) => text.to_owned(),
      None => self.value.as_ref().map(|v| v.current.clone()).unwrap_or_default(),
    };
    let formatted = format_slug_text(&raw, self.options.max_length);
    self.update_value(&formatted)
  }

  /// Regenerate the slug from the configured source field.
  ///
  /// Does nothing without a document. A missing or non-string source field
  /// clears the slug.
  pub fn generate_slug(&mut self) -> Option<SlugPatch> {
    let document = self.document.as_ref()?;
    let source = self.options.source_text(document).unwrap_or_default().to_owned();
    Some(self.format_slug(Some(&source)))
  }
}
