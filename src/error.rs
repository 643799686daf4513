//! Error types raised while registering filters.
//!
//! All errors here surface synchronously at registration time. Applying a
//! query never raises: records lacking the addressed value are simply treated
//! as non-matching.

use thiserror::Error;

/// Errors raised when a filter registration cannot be completed.
///
/// Registration is not retried; the caller must correct the token or path and
/// register again.
#[derive(Error, Debug)]
pub enum FilterError {
  /// A path segment could not be resolved against the record's shape.
  #[error("failed to register filter `{token}`: path `{path}` does not resolve, unknown segment `{segment}`")]
  InvalidPath {
    token: String,
    path: String,
    segment: String,
  },
  /// The path resolved structurally but cannot be bound to a filter, e.g.
  /// it terminates in a polymorphic or non-scalar value.
  #[error("failed to register filter `{token}` at path `{path}`: {reason}")]
  InvalidBinding {
    token: String,
    path: String,
    reason: String,
  },
  /// The record type has no usable shape descriptor.
  #[error("type `{type_name}` has no property shape to resolve paths against")]
  MissingPropertyBag { type_name: String },
  /// Filter tokens are unique per backend instance.
  #[error("filter token `{token}` is already registered")]
  DuplicateToken { token: String },
}

pub type Result<T> = std::result::Result<T, FilterError>;
