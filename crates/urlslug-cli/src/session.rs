//! JSON-lines editing session driving a [`SlugFieldController`].
//!
//! Each input line is one [`SessionEvent`]. For every event the session
//! writes the patches the field emitted, then a snapshot of the field view.

use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tokio::{
  io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
  sync::mpsc,
  task::JoinHandle,
};
use urlslug_core::{
  document::SourceDocument,
  options::SlugOptions,
  resolver::PrefixResolver,
  value::SlugPatch,
};
use urlslug_field::{SlugFieldController, SlugFieldView};

// ─── Wire types ───────────────────────────────────────────────────────────────

/// One line of session input.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
  /// The host reports a new document snapshot (`null` for none).
  Document { document: Option<SourceDocument> },
  /// The editor typed into the slug input.
  Input { text: String },
  /// The slug input lost focus; `text` defaults to the stored slug.
  Blur {
    #[serde(default)]
    text: Option<String>,
  },
  /// The editor pressed "generate".
  Generate,
  /// Let time pass, e.g. to close the suppression window.
  Wait { ms: u64 },
  /// Wait for outstanding prefix resolutions.
  Settle,
}

/// One line of session output.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Output<'a> {
  Patch { patch: &'a SlugPatch },
  View { view: &'a SlugFieldView },
  Error { message: String },
}

// ─── Session ──────────────────────────────────────────────────────────────────

pub struct Session<R> {
  field:   SlugFieldController<R, mpsc::UnboundedSender<SlugPatch>>,
  patches: mpsc::UnboundedReceiver<SlugPatch>,
  pending: Vec<JoinHandle<()>>,
}

impl<R> Session<R>
where
  R: PrefixResolver + 'static,
{
  pub fn new(options: SlugOptions, resolver: R, suppress_window: Duration) -> Self {
    let (tx, patches) = mpsc::unbounded_channel();
    let field = SlugFieldController::new(options, resolver, tx)
      .with_suppress_window(suppress_window);
    Self {
      field,
      patches,
      pending: Vec::new(),
    }
  }

  /// Apply one event to the field.
  pub async fn handle(&mut self, event: SessionEvent) -> anyhow::Result<()> {
    match event {
      SessionEvent::Document { document } => {
        self.pending.retain(|h| !h.is_finished());
        if let Some(handle) = self.field.on_document_changed(document) {
          self.pending.push(handle);
        }
      }
      SessionEvent::Input { text } => {
        self.field.update_value(&text);
      }
      SessionEvent::Blur { text } => {
        self.field.format_slug(text.as_deref());
      }
      SessionEvent::Generate => {
        if self.field.generate_slug().is_none() {
          tracing::info!("generate ignored: no document yet");
        }
      }
      SessionEvent::Wait { ms } => tokio::time::sleep(Duration::from_millis(ms)).await,
      SessionEvent::Settle => self.settle().await?,
    }
    Ok(())
  }

  /// Await every outstanding prefix resolution.
  pub async fn settle(&mut self) -> anyhow::Result<()> {
    for handle in self.pending.drain(..) {
      handle.await.context("prefix resolution task failed")?;
    }
    Ok(())
  }

  /// Read events from `input` until EOF, writing results to `output`.
  ///
  /// Malformed lines are reported on `output` and skipped.
  pub async fn run<I, O>(mut self, input: I, output: &mut O) -> anyhow::Result<()>
  where
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
  {
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await.context("reading session input")? {
      if line.trim().is_empty() {
        continue;
      }
      match serde_json::from_str::<SessionEvent>(&line) {
        Ok(event) => {
          tracing::debug!(?event, "session event");
          self.handle(event).await?;
          self.flush(output).await?;
        }
        Err(e) => {
          tracing::warn!(error = %e, "skipping malformed session event");
          write_line(output, &Output::Error { message: e.to_string() }).await?;
        }
      }
    }

    self.settle().await?;
    self.flush(output).await
  }

  /// Write pending patches followed by the current view.
  async fn flush<O: AsyncWrite + Unpin>(&mut self, output: &mut O) -> anyhow::Result<()> {
    while let Ok(patch) = self.patches.try_recv() {
      write_line(output, &Output::Patch { patch: &patch }).await?;
    }
    let view = self.field.view();
    write_line(output, &Output::View { view: &view }).await
  }
}

async fn write_line<O: AsyncWrite + Unpin>(output: &mut O, item: &Output<'_>) -> anyhow::Result<()> {
  let mut line = serde_json::to_vec(item).context("serialising session output")?;
  line.push(b'\n');
  output.write_all(&line).await.context("writing session output")?;
  output.flush().await.context("flushing session output")
}
