//! Property paths addressing nested fields within a record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single segment of a [`PropertyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathPart {
  /// A named field, e.g. `position` in `position.x`.
  Name(String),
  /// A positional element, e.g. `[3]` in `items[3]`.
  Index(usize),
  /// A keyed element, e.g. `["fr"]` in `labels["fr"]`.
  Key(String),
}

impl fmt::Display for PathPart {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PathPart::Name(name) => write!(f, "{name}"),
      PathPart::Index(index) => write!(f, "[{index}]"),
      PathPart::Key(key) => write!(f, "[\"{key}\"]"),
    }
  }
}

/// An ordered sequence of path segments identifying a nested field.
///
/// Paths are written in dot/bracket syntax: `position.x`, `items[3].name`,
/// `labels["fr"]`. Bracket segments holding an unsigned integer become
/// [`PathPart::Index`]; anything else in brackets becomes [`PathPart::Key`]
/// (surrounding quotes are stripped).
///
/// Parsing is lenient: malformed bracket segments are kept as literal name
/// text, so the error is reported with the offending segment when the path is
/// resolved against a shape at filter registration.
///
/// # Examples
///
/// ```rust
/// use propsift::path::{PathPart, PropertyPath};
///
/// let path = PropertyPath::parse("items[3].name");
/// assert_eq!(
///     path.parts(),
///     &[
///         PathPart::Name("items".into()),
///         PathPart::Index(3),
///         PathPart::Name("name".into()),
///     ]
/// );
/// assert_eq!(path.to_string(), "items[3].name");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyPath {
  parts: Vec<PathPart>,
}

impl PropertyPath {
  /// Creates an empty path.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a path from pre-built parts.
  pub fn from_parts(parts: Vec<PathPart>) -> Self {
    Self { parts }
  }

  /// Parses a path from dot/bracket syntax.
  pub fn parse(text: &str) -> Self {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
      match c {
        '.' => {
          if !buf.is_empty() {
            parts.push(PathPart::Name(std::mem::take(&mut buf)));
          }
        }
        '[' => {
          if !buf.is_empty() {
            parts.push(PathPart::Name(std::mem::take(&mut buf)));
          }
          let mut segment = String::new();
          let mut closed = false;
          for c in chars.by_ref() {
            if c == ']' {
              closed = true;
              break;
            }
            segment.push(c);
          }
          if !closed {
            // Unclosed bracket: keep the raw text as a name so
            // shape resolution reports the segment verbatim.
            buf.push('[');
            buf.push_str(&segment);
            continue;
          }
          let trimmed = segment.trim();
          if let Ok(index) = trimmed.parse::<usize>() {
            parts.push(PathPart::Index(index));
          } else {
            let key = trimmed.trim_matches(|c| c == '"' || c == '\'');
            parts.push(PathPart::Key(key.to_string()));
          }
        }
        _ => buf.push(c),
      }
    }
    if !buf.is_empty() {
      parts.push(PathPart::Name(buf));
    }

    Self { parts }
  }

  /// Appends a segment to the path.
  pub fn push(&mut self, part: PathPart) {
    self.parts.push(part);
  }

  /// The segments of this path, in order.
  pub fn parts(&self) -> &[PathPart] {
    &self.parts
  }

  /// The number of segments.
  pub fn len(&self) -> usize {
    self.parts.len()
  }

  /// Whether the path has no segments.
  pub fn is_empty(&self) -> bool {
    self.parts.is_empty()
  }
}

impl fmt::Display for PropertyPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, part) in self.parts.iter().enumerate() {
      if i > 0 && matches!(part, PathPart::Name(_)) {
        write!(f, ".")?;
      }
      write!(f, "{part}")?;
    }
    Ok(())
  }
}

impl From<&str> for PropertyPath {
  fn from(text: &str) -> Self {
    Self::parse(text)
  }
}

impl From<String> for PropertyPath {
  fn from(text: String) -> Self {
    Self::parse(&text)
  }
}
