//! Slug and prefix formatting.
//!
//! Slugs are path-like: `/` separates segments, and each segment is
//! sanitised on its own. Output segments only ever contain `[a-z0-9_-]`.

use std::ops::RangeInclusive;

use unicode_normalization::UnicodeNormalization;

/// The "Combining Diacritical Marks" block, stripped after NFD decomposition.
const COMBINING_MARKS: RangeInclusive<char> = '\u{0300}'..='\u{036f}';

// ─── Prefix ──────────────────────────────────────────────────────────────────

/// Ensure a non-empty prefix ends in `/` so a slug can be appended to it.
///
/// Prefixes that already end in `/`, or that carry a query (`?`) or fragment
/// (`#`) marker, are returned unchanged.
pub fn format_prefix(raw: &str) -> String {
  if raw.is_empty() || raw.ends_with('/') || raw.contains('#') || raw.contains('?') {
    raw.to_owned()
  } else {
    format!("{raw}/")
  }
}

// ─── Slug ────────────────────────────────────────────────────────────────────

/// Format free text into a slug.
///
/// Empty path segments are dropped, including segments that sanitise down to
/// nothing, so formatting an already formatted slug is a no-op. A
/// `max_length` of `Some(n)` with `n > 0` hard-cuts the result to `n`
/// characters; the cut is not segment-aware.
pub fn format_slug_text(input: &str, max_length: Option<usize>) -> String {
  let slug = input
    .split('/')
    .filter(|segment| !segment.is_empty())
    .map(sanitize_segment)
    .filter(|segment| !segment.is_empty())
    .collect::<Vec<_>>()
    .join("/");

  match max_length {
    Some(max) if max > 0 => truncate_chars(slug, max),
    _ => slug,
  }
}

/// Sanitise a single path segment.
///
/// Lowercases, strips diacritics, drops apostrophes and any character that is
/// not an ASCII word character, whitespace or hyphen, then turns whitespace
/// runs into single hyphens. Runs of hyphens collapse to one and leading or
/// trailing hyphens are removed.
pub fn sanitize_segment(segment: &str) -> String {
  let lowered = segment.to_lowercase();
  let mut out = String::with_capacity(lowered.len());
  let mut pending_hyphen = false;

  for c in lowered.nfd() {
    if COMBINING_MARKS.contains(&c) || c == '\'' {
      continue;
    }
    if c == '-' || is_separator_space(c) {
      pending_hyphen = true;
    } else if is_word_char(c) {
      if pending_hyphen && !out.is_empty() {
        out.push('-');
      }
      pending_hyphen = false;
      out.push(c.to_ascii_lowercase());
    }
  }

  out
}

/// Slugify a single segment, optionally nesting it under `prefix/`.
pub fn clean_slug(input: &str, prefix: Option<&str>) -> String {
  let cleaned = sanitize_segment(input);
  match prefix {
    Some(prefix) if !prefix.is_empty() => format!("{prefix}/{cleaned}"),
    _ => cleaned,
  }
}

/// Slugify only the last path segment and keep the leading segments verbatim.
///
/// `"en-US/store/Product Title"` becomes `"en-US/store/product-title"`.
pub fn path_slug(input: &str) -> String {
  match input.rsplit_once('/') {
    Some((head, last)) => format!("{head}/{}", sanitize_segment(last)),
    None => sanitize_segment(input),
  }
}

fn is_word_char(c: char) -> bool { c.is_ascii_alphanumeric() || c == '_' }

/// Whitespace as understood by ECMAScript `\s`: Unicode `White_Space` minus
/// NEL, plus the byte-order mark.
fn is_separator_space(c: char) -> bool {
  c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

fn truncate_chars(mut s: String, max: usize) -> String {
  if let Some((idx, _)) = s.char_indices().nth(max) {
    s.truncate(idx);
  }
  s
}
