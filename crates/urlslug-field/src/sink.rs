//! Where the field sends its edits.

use tokio::sync::mpsc;
use urlslug_core::value::SlugPatch;

/// Accepts value patches from a slug field; the host persists them.
pub trait ValueSink: Send {
  fn emit(&mut self, patch: SlugPatch);
}

impl ValueSink for mpsc::UnboundedSender<SlugPatch> {
  fn emit(&mut self, patch: SlugPatch) {
    if self.send(patch).is_err() {
      tracing::debug!("value sink closed, dropping patch");
    }
  }
}

/// Records patches in order. Handy for hosts that batch writes.
impl ValueSink for Vec<SlugPatch> {
  fn emit(&mut self, patch: SlugPatch) { self.push(patch); }
}
