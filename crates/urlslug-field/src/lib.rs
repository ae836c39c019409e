//! Interactive controller for a URL slug field.
//!
//! [`SlugFieldController`] owns the reactive lifecycle of one slug field: it
//! resolves the URL prefix whenever the governing document changes, formats
//! what the editor types, and hands new values back to the host through a
//! [`ValueSink`]. Prefix resolutions run as tokio tasks; their progress is
//! published on a `watch` channel as a [`PrefixResolution`].

mod controller;
mod resolution;
mod sink;
mod view;

pub use controller::{DEFAULT_SUPPRESS_WINDOW, SlugFieldController};
pub use resolution::{PrefixResolution, PrefixState, UNKNOWN_ERROR, failure_message};
pub use sink::ValueSink;
pub use view::SlugFieldView;
