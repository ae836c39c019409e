//! The persisted slug value and the patches that replace it.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, format::format_prefix};

// ─── SlugValue ───────────────────────────────────────────────────────────────

/// The two-part value stored on a document: the editable slug and the full
/// URL derived from it.
///
/// Values are never edited in place; every change builds a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugValue {
  pub current:  String,
  /// `formatted prefix + current`. Read-only; absent when there is no prefix.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub full_url: Option<String>,
}

impl SlugValue {
  /// Join `current` under an already formatted prefix. An empty prefix
  /// yields no `full_url`.
  pub fn compose(current: impl Into<String>, formatted_prefix: &str) -> Self {
    let current = current.into();
    let full_url =
      (!formatted_prefix.is_empty()).then(|| format!("{formatted_prefix}{current}"));
    Self { current, full_url }
  }

  /// Like [`SlugValue::compose`] but formats a raw prefix first.
  pub fn with_prefix(current: impl Into<String>, raw_prefix: Option<&str>) -> Self {
    Self::compose(current, &format_prefix(raw_prefix.unwrap_or_default()))
  }

  /// Title and subtitle for list previews.
  pub fn preview(&self) -> Preview {
    Preview::of(Some(self))
  }
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// What the field hands back to the host after an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum SlugPatch {
  /// Replace the stored value.
  Set(SlugValue),
  /// Remove the field from the document entirely.
  Unset,
}

impl SlugPatch {
  pub fn value(&self) -> Option<&SlugValue> {
    match self {
      Self::Set(value) => Some(value),
      Self::Unset => None,
    }
  }

  pub fn into_value(self) -> Option<SlugValue> {
    match self {
      Self::Set(value) => Some(value),
      Self::Unset => None,
    }
  }
}

// ─── Preview & validation ────────────────────────────────────────────────────

/// List-row rendering of a (possibly absent) slug value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
  pub title:    String,
  pub subtitle: String,
}

impl Preview {
  pub fn of(value: Option<&SlugValue>) -> Self {
    let title = value
      .map(|v| v.current.as_str())
      .filter(|s| !s.is_empty())
      .unwrap_or("No slug");
    let subtitle = value
      .and_then(|v| v.full_url.as_deref())
      .filter(|s| !s.is_empty())
      .unwrap_or("No URL");
    Self {
      title:    title.to_owned(),
      subtitle: subtitle.to_owned(),
    }
  }
}

/// A slug field must hold a non-empty `current` before the document can be
/// published.
pub fn validate_slug(value: Option<&SlugValue>) -> Result<()> {
  match value {
    Some(v) if !v.current.is_empty() => Ok(()),
    _ => Err(Error::SlugRequired),
  }
}
