//! Filter values, operators and their comparison semantics.

use crate::path::{PathPart, PropertyPath};
use crate::shape::ScalarKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// A scalar value a filter compares against.
///
/// The `#[serde(untagged)]` attribute allows for flexible deserialization from
/// JSON, matching the value to a variant without requiring a specific tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
  /// A string value.
  String(String),
  /// A floating-point number value.
  Number(f64),
  /// A boolean value.
  Bool(bool),
}

impl FilterValue {
  /// The scalar kind of this value.
  pub fn kind(&self) -> ScalarKind {
    match self {
      FilterValue::String(_) => ScalarKind::String,
      FilterValue::Number(_) => ScalarKind::Number,
      FilterValue::Bool(_) => ScalarKind::Bool,
    }
  }

  /// Converts a scalar JSON value. Arrays, objects and null yield `None`.
  pub fn from_json(value: &Value) -> Option<FilterValue> {
    match value {
      Value::String(s) => Some(FilterValue::String(s.clone())),
      Value::Number(n) => n.as_f64().map(FilterValue::Number),
      Value::Bool(b) => Some(FilterValue::Bool(*b)),
      _ => None,
    }
  }

  /// Parses raw user input as the given scalar kind.
  ///
  /// Returns `None` when the input cannot represent the kind; the caller
  /// compiles such clauses to a no-match rather than comparing loosely.
  pub fn parse_as(kind: ScalarKind, raw: &str) -> Option<FilterValue> {
    match kind {
      ScalarKind::String => Some(FilterValue::String(raw.to_string())),
      ScalarKind::Number => raw.trim().parse::<f64>().ok().map(FilterValue::Number),
      ScalarKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(FilterValue::Bool(true)),
        "false" => Some(FilterValue::Bool(false)),
        _ => None,
      },
    }
  }
}

impl fmt::Display for FilterValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FilterValue::String(s) => write!(f, "{s}"),
      FilterValue::Number(n) => write!(f, "{n}"),
      FilterValue::Bool(b) => write!(f, "{b}"),
    }
  }
}

impl From<&str> for FilterValue {
  fn from(value: &str) -> Self {
    FilterValue::String(value.to_string())
  }
}

impl From<String> for FilterValue {
  fn from(value: String) -> Self {
    FilterValue::String(value)
  }
}

impl From<bool> for FilterValue {
  fn from(value: bool) -> Self {
    FilterValue::Bool(value)
  }
}

macro_rules! numeric_filter_value {
  ($($t:ty),* $(,)?) => {
    $(impl From<$t> for FilterValue {
      fn from(value: $t) -> Self {
        FilterValue::Number(value as f64)
      }
    })*
  };
}

numeric_filter_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// The filter operators a query token can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
  /// `:` - substring containment on the string representation.
  Contains,
  /// `=` - typed equality.
  Equal,
  /// `!=` - typed inequality.
  NotEqual,
  /// `<`
  Less,
  /// `<=`
  LessOrEqual,
  /// `>`
  Greater,
  /// `>=`
  GreaterOrEqual,
}

impl FilterOperator {
  /// Every operator, in longest-match-first recognition order.
  pub const ALL: [FilterOperator; 7] = [
    FilterOperator::NotEqual,
    FilterOperator::LessOrEqual,
    FilterOperator::GreaterOrEqual,
    FilterOperator::Less,
    FilterOperator::Greater,
    FilterOperator::Equal,
    FilterOperator::Contains,
  ];

  /// The token users type for this operator.
  pub fn token(&self) -> &'static str {
    match self {
      FilterOperator::Contains => ":",
      FilterOperator::Equal => "=",
      FilterOperator::NotEqual => "!=",
      FilterOperator::Less => "<",
      FilterOperator::LessOrEqual => "<=",
      FilterOperator::Greater => ">",
      FilterOperator::GreaterOrEqual => ">=",
    }
  }

  /// Finds the first operator occurrence in a query word.
  ///
  /// Multi-character operators are recognized before their single-character
  /// prefixes, so `id<=3` yields `<=` rather than `<`. Returns the byte
  /// offset of the operator, the operator, and its length in bytes.
  pub fn find_in(word: &str) -> Option<(usize, FilterOperator, usize)> {
    for (i, _) in word.char_indices() {
      let rest = &word[i..];
      for op in FilterOperator::ALL {
        if rest.starts_with(op.token()) {
          return Some((i, op, op.token().len()));
        }
      }
    }
    None
  }
}

impl fmt::Display for FilterOperator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.token())
  }
}

/// How strings are compared during containment matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StringComparison {
  /// Case-insensitive comparison. The default, matching interactive search
  /// expectations.
  #[default]
  IgnoreCase,
  /// Exact byte-wise comparison.
  Ordinal,
}

impl StringComparison {
  /// Whether `haystack` contains `needle` under this comparison.
  pub fn contains(&self, haystack: &str, needle: &str) -> bool {
    match self {
      StringComparison::IgnoreCase => {
        haystack.to_lowercase().contains(&needle.to_lowercase())
      }
      StringComparison::Ordinal => haystack.contains(needle),
    }
  }
}

/// Applies a filter operator to a resolved value and the user's input.
///
/// Containment stringifies both sides and honors the configured comparison;
/// equality and ordering are typed, so kind mismatches yield `false` rather
/// than a coerced result.
pub fn apply_operator(
  op: FilterOperator,
  value: &FilterValue,
  input: &FilterValue,
  comparison: StringComparison,
) -> bool {
  match op {
    FilterOperator::Contains => {
      comparison.contains(&value.to_string(), &input.to_string())
    }
    FilterOperator::Equal => scalar_eq(value, input),
    FilterOperator::NotEqual => value.kind() == input.kind() && !scalar_eq(value, input),
    FilterOperator::Less => matches!(scalar_cmp(value, input), Some(Ordering::Less)),
    FilterOperator::LessOrEqual => matches!(
      scalar_cmp(value, input),
      Some(Ordering::Less | Ordering::Equal)
    ),
    FilterOperator::Greater => matches!(scalar_cmp(value, input), Some(Ordering::Greater)),
    FilterOperator::GreaterOrEqual => matches!(
      scalar_cmp(value, input),
      Some(Ordering::Greater | Ordering::Equal)
    ),
  }
}

fn scalar_eq(a: &FilterValue, b: &FilterValue) -> bool {
  match (a, b) {
    (FilterValue::String(a), FilterValue::String(b)) => a == b,
    (FilterValue::Number(a), FilterValue::Number(b)) => a == b,
    (FilterValue::Bool(a), FilterValue::Bool(b)) => a == b,
    _ => false,
  }
}

fn scalar_cmp(a: &FilterValue, b: &FilterValue) -> Option<Ordering> {
  match (a, b) {
    (FilterValue::String(a), FilterValue::String(b)) => Some(a.cmp(b)),
    (FilterValue::Number(a), FilterValue::Number(b)) => a.partial_cmp(b),
    (FilterValue::Bool(a), FilterValue::Bool(b)) => Some(a.cmp(b)),
    _ => None,
  }
}

/// Resolves a property path against a serialized record.
///
/// Missing names, out-of-range indices and null intermediates all yield
/// `None`; query application treats that as "no match", never an error.
pub fn extract<'a>(value: &'a Value, path: &PropertyPath) -> Option<&'a Value> {
  let mut current = value;
  for part in path.parts() {
    current = match part {
      PathPart::Name(name) => current.get(name.as_str())?,
      PathPart::Index(index) => current.get(*index)?,
      PathPart::Key(key) => current.get(key.as_str())?,
    };
  }
  Some(current)
}
