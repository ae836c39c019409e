//! Prefix resolution state.

use serde::Serialize;
use urlslug_core::{format::format_prefix, resolver::ResolveError};

/// Shown when a resolver fails without a message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Transient, non-persisted state of the field's prefix lookup.
///
/// `prefix` survives while a new attempt is loading, so values composed
/// mid-flight still use the last known prefix. [`PrefixResolution::state`]
/// gives the single display state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrefixResolution {
  pub prefix:     Option<String>,
  pub is_loading: bool,
  pub error:      Option<String>,
  /// Sequence number of the most recent attempt.
  #[serde(skip)]
  attempt:        u64,
}

/// The mutually exclusive display states of a [`PrefixResolution`].
#[derive(Debug, Clone, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum PrefixState {
  Loading,
  Failed(String),
  Resolved(String),
  Absent,
}

impl PrefixResolution {
  pub fn state(&self) -> PrefixState {
    if self.is_loading {
      return PrefixState::Loading;
    }
    if let Some(error) = &self.error {
      return PrefixState::Failed(error.clone());
    }
    match self.prefix.as_deref() {
      Some(prefix) if !prefix.is_empty() => PrefixState::Resolved(prefix.to_owned()),
      _ => PrefixState::Absent,
    }
  }

  /// The prefix with a trailing separator, or `""` when there is none.
  pub fn formatted_prefix(&self) -> String {
    format_prefix(self.prefix.as_deref().unwrap_or_default())
  }

  pub fn attempt(&self) -> u64 { self.attempt }

  /// Start a new attempt and return its sequence number. Any outstanding
  /// attempt becomes stale.
  pub(crate) fn begin(&mut self) -> u64 {
    self.attempt += 1;
    self.is_loading = true;
    self.error = None;
    self.attempt
  }

  /// Record the outcome of `attempt`. Returns `false`, leaving the state
  /// untouched, when a newer attempt has started since.
  pub(crate) fn finish(
    &mut self,
    attempt: u64,
    outcome: Result<String, ResolveError>,
  ) -> bool {
    if attempt != self.attempt {
      return false;
    }
    match outcome {
      Ok(prefix) => {
        self.prefix = Some(prefix);
        self.error = None;
      }
      Err(err) => {
        self.prefix = None;
        self.error = Some(failure_message(&*err));
      }
    }
    self.is_loading = false;
    true
  }

  /// Drop back to the idle state used when there is no saved document.
  pub(crate) fn clear(&mut self) {
    self.attempt += 1;
    self.prefix = None;
    self.is_loading = false;
    self.error = None;
  }
}

/// The editor-facing message for a resolver failure.
pub fn failure_message(err: &(dyn std::error::Error + Send + Sync)) -> String {
  let message = err.to_string();
  if message.is_empty() {
    UNKNOWN_ERROR.to_owned()
  } else {
    message
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn states_are_exclusive() {
    let mut r = PrefixResolution::default();
    assert_eq!(r.state(), PrefixState::Absent);

    let first = r.begin();
    assert_eq!(r.state(), PrefixState::Loading);

    assert!(r.finish(first, Err("boom".into())));
    assert_eq!(r.state(), PrefixState::Failed("boom".into()));
    assert_eq!(r.prefix, None);

    let second = r.begin();
    assert_eq!(r.error, None);
    assert!(r.finish(second, Ok("fr/".into())));
    assert_eq!(r.state(), PrefixState::Resolved("fr/".into()));
  }

  #[test]
  fn stale_outcomes_are_discarded() {
    let mut r = PrefixResolution::default();
    let stale = r.begin();
    let fresh = r.begin();

    assert!(r.finish(fresh, Ok("de/".into())));
    assert!(!r.finish(stale, Ok("fr/".into())));
    assert_eq!(r.prefix.as_deref(), Some("de/"));
  }

  #[test]
  fn loading_keeps_the_previous_prefix() {
    let mut r = PrefixResolution::default();
    let a = r.begin();
    r.finish(a, Ok("en/articles".into()));
    r.begin();
    assert_eq!(r.formatted_prefix(), "en/articles/");
  }

  #[test]
  fn empty_resolved_prefix_is_absent() {
    let mut r = PrefixResolution::default();
    let a = r.begin();
    r.finish(a, Ok(String::new()));
    assert_eq!(r.state(), PrefixState::Absent);
    assert_eq!(r.formatted_prefix(), "");
  }

  #[test]
  fn state_labels() {
    assert_eq!(PrefixState::Loading.as_ref(), "loading");
    assert_eq!(PrefixState::Failed("x".into()).as_ref(), "failed");
  }
}
