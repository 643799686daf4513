//! The shared backend contract and once-at-startup backend selection.

use crate::basic::SubstringBackend;
#[cfg(feature = "query-engine")]
use crate::engine::QueryEngine;
use crate::error::FilterError;
use crate::path::PropertyPath;
use crate::shape::PropertyBag;
use crate::value::{FilterOperator, FilterValue};
use serde::Serialize;

/// A parsed, immutable representation of a search string.
///
/// Queries are produced by [`SearchBackend::parse`] and are independent of
/// later parses: applying the same query twice, or re-parsing the same string
/// against unchanged registrations, yields identical results.
pub trait SearchQuery<T> {
  /// The original search string.
  fn search_string(&self) -> &str;

  /// The whitespace-separated tokens of the search string.
  fn tokens(&self) -> Vec<String>;

  /// Whether a single record matches this query.
  fn matches(&self, record: &T) -> bool;

  /// Applies the query to a record sequence, preserving input order.
  fn apply<'a>(&self, records: &'a [T]) -> Vec<&'a T> {
    records.iter().filter(|record| self.matches(record)).collect()
  }
}

/// The contract both search backends implement.
///
/// Callers register search data and filters once, then parse each query
/// string into a reusable [`SearchQuery`]. Registration errors surface
/// synchronously; parsing and application never raise.
///
/// The trait is object-safe so a backend can be selected once at startup and
/// handed around as `Box<dyn SearchBackend<T>>`.
pub trait SearchBackend<T: Serialize> {
  /// Parses a query string into a reusable query object.
  ///
  /// Empty or whitespace-only text yields a query that passes all records
  /// through unfiltered.
  fn parse(&self, text: &str) -> Box<dyn SearchQuery<T> + '_>;

  /// Registers a property path projected into the record's search data.
  fn add_search_data_property(&mut self, path: PropertyPath);

  /// Registers a callback projecting a record into search-data strings.
  fn add_search_data_callback(&mut self, get_search_data: Box<dyn Fn(&T) -> Vec<String>>);

  /// Registers a filter token bound to a property path.
  ///
  /// `operators` restricts the operators users may apply; `None` allows
  /// every operator the terminal type supports.
  fn add_search_filter_property(
    &mut self,
    token: &str,
    path: PropertyPath,
    operators: Option<Vec<FilterOperator>>,
  ) -> Result<(), FilterError>;

  /// Registers a filter token bound to an arbitrary value extractor, for
  /// values not reachable by path.
  fn add_search_filter_callback(
    &mut self,
    token: &str,
    get_filter_data: Box<dyn Fn(&T) -> FilterValue>,
    operators: Option<Vec<FilterOperator>>,
  ) -> Result<(), FilterError>;
}

/// The available backend strategies.
///
/// Mirrors the optional-dependency split of the original design: the full
/// query engine exists only when the `query-engine` feature is compiled in,
/// and the substring backend is the degraded fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
  /// Whole-string substring search; filter registrations are no-ops.
  Substring,
  /// Tokenized queries with per-property filter operators.
  #[cfg(feature = "query-engine")]
  QueryEngine,
}

impl Default for BackendKind {
  fn default() -> Self {
    #[cfg(feature = "query-engine")]
    {
      BackendKind::QueryEngine
    }
    #[cfg(not(feature = "query-engine"))]
    {
      BackendKind::Substring
    }
  }
}

/// Creates a backend of the given kind for a record type.
///
/// Intended to be called once at process start; the returned trait object is
/// the single point the rest of the application talks to.
pub fn create_backend<T>(kind: BackendKind) -> Box<dyn SearchBackend<T>>
where
  T: Serialize + PropertyBag + 'static,
{
  match kind {
    BackendKind::Substring => Box::new(SubstringBackend::new()),
    #[cfg(feature = "query-engine")]
    BackendKind::QueryEngine => Box::new(QueryEngine::with_shape(T::property_shape())),
  }
}

/// Creates the fullest backend the build supports.
pub fn default_backend<T>() -> Box<dyn SearchBackend<T>>
where
  T: Serialize + PropertyBag + 'static,
{
  create_backend(BackendKind::default())
}
