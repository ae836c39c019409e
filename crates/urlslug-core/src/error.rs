//! Error types for `urlslug-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Slug is required")]
  SlugRequired,

  #[error("prefix template references missing field `{0}`")]
  MissingField(String),

  #[error("field `{0}` cannot be used in a URL prefix")]
  NonStringField(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
