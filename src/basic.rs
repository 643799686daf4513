//! The substring backend: the degraded fallback when the full query engine is
//! not compiled in.

use crate::backend::{SearchBackend, SearchQuery};
use crate::data::SearchData;
use crate::error::FilterError;
use crate::path::PropertyPath;
use crate::value::{FilterOperator, FilterValue, StringComparison};
use serde::Serialize;

/// Case-insensitive whole-string substring search over the registered search
/// data.
///
/// Filter registrations are accepted and ignored: in this mode `id<10` is
/// just ordinary query text, looked up as a literal substring. This is a
/// deliberate degraded behavior, not an error, so callers can register
/// filters unconditionally and still run against the fallback.
pub struct SubstringBackend<T> {
  search_data: SearchData<T>,
}

impl<T> SubstringBackend<T> {
  pub fn new() -> Self {
    Self {
      search_data: SearchData::new(),
    }
  }

  /// Registers a property path projected into the search data.
  pub fn add_data_property(&mut self, path: PropertyPath) {
    self.search_data.add_property(path);
  }

  /// Registers a callback projecting a record into search strings.
  pub fn add_data_callback(&mut self, get_search_data: impl Fn(&T) -> Vec<String> + 'static) {
    self.search_data.add_callback(get_search_data);
  }

  /// Parses a query string. Empty text passes all records through.
  pub fn parse(&self, text: &str) -> SubstringQuery<'_, T> {
    SubstringQuery {
      search_string: text.to_string(),
      search_data: &self.search_data,
    }
  }
}

impl<T> Default for SubstringBackend<T> {
  fn default() -> Self {
    Self::new()
  }
}

/// A query produced by [`SubstringBackend::parse`].
pub struct SubstringQuery<'b, T> {
  search_string: String,
  search_data: &'b SearchData<T>,
}

impl<T: Serialize> SearchQuery<T> for SubstringQuery<'_, T> {
  fn search_string(&self) -> &str {
    &self.search_string
  }

  fn tokens(&self) -> Vec<String> {
    self.search_string
      .split_whitespace()
      .map(str::to_string)
      .collect()
  }

  fn matches(&self, record: &T) -> bool {
    if self.search_string.trim().is_empty() {
      return true;
    }
    // The whole search string is matched as one substring; there is no
    // tokenization in this mode.
    self.search_data
      .strings_for(record)
      .iter()
      .any(|s| StringComparison::IgnoreCase.contains(s, &self.search_string))
  }
}

impl<T: Serialize + 'static> SearchBackend<T> for SubstringBackend<T> {
  fn parse(&self, text: &str) -> Box<dyn SearchQuery<T> + '_> {
    Box::new(SubstringBackend::parse(self, text))
  }

  fn add_search_data_property(&mut self, path: PropertyPath) {
    self.add_data_property(path);
  }

  fn add_search_data_callback(&mut self, get_search_data: Box<dyn Fn(&T) -> Vec<String>>) {
    self.add_data_callback(get_search_data);
  }

  fn add_search_filter_property(
    &mut self,
    token: &str,
    path: PropertyPath,
    _operators: Option<Vec<FilterOperator>>,
  ) -> Result<(), FilterError> {
    tracing::debug!(token, path = %path, "substring backend ignores filter registrations");
    Ok(())
  }

  fn add_search_filter_callback(
    &mut self,
    token: &str,
    _get_filter_data: Box<dyn Fn(&T) -> FilterValue>,
    _operators: Option<Vec<FilterOperator>>,
  ) -> Result<(), FilterError> {
    tracing::debug!(token, "substring backend ignores filter registrations");
    Ok(())
  }
}
