//! What the rendering layer needs from a slug field.

use serde::Serialize;

/// Display snapshot of a slug field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugFieldView {
  /// Formatted prefix shown before the input, `""` when there is none.
  pub prefix_display: String,
  pub is_loading:     bool,
  pub error:          Option<String>,
  pub current:        Option<String>,
  /// Whether a "generate" action should be offered.
  pub can_generate:   bool,
}
