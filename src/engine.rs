//! The full query engine: tokenized queries with per-property filter
//! operators.
//!
//! Filters are registered once against the record type's [`Shape`] and reused
//! across every parse. `parse` itself is stateless with respect to prior
//! parses and produces an independent [`ParsedQuery`] each time.

use crate::backend::{SearchBackend, SearchQuery};
use crate::data::SearchData;
use crate::error::FilterError;
use crate::path::PropertyPath;
use crate::shape::{PropertyBag, ResolveError, ScalarKind, Shape};
use crate::value::{self, apply_operator, FilterOperator, FilterValue, StringComparison};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// A search backend supporting filter tokens of the form `token<op>value`.
///
/// Query words that carry a registered token and a supported operator become
/// typed filter clauses; every other word is matched as a case-insensitive
/// substring of the record's search data. Clauses combine with AND.
///
/// # Examples
///
/// ```rust
/// use propsift::prelude::*;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Entry {
///     id: u32,
///     label: String,
/// }
///
/// impl PropertyBag for Entry {
///     fn property_shape() -> Shape {
///         Shape::object()
///             .field("id", Shape::number())
///             .field("label", Shape::string())
///             .build()
///     }
/// }
///
/// let mut engine: QueryEngine<Entry> = QueryEngine::new();
/// engine.add_filter_property("id", "id".into(), None).unwrap();
///
/// let entries: Vec<Entry> = (0..20)
///     .map(|i| Entry { id: i, label: format!("entry {i}") })
///     .collect();
///
/// let query = engine.parse("id<10");
/// assert_eq!(query.apply(&entries).len(), 10);
/// ```
pub struct QueryEngine<T> {
  shape: Shape,
  filters: HashMap<String, FilterEntry<T>>,
  search_data: SearchData<T>,
  comparison: StringComparison,
}

struct FilterEntry<T> {
  supported: Vec<FilterOperator>,
  access: FilterAccess<T>,
}

enum FilterAccess<T> {
  /// The path resolved to a scalar terminal of the given kind.
  Scalar { path: PropertyPath, kind: ScalarKind },
  /// The path resolved to a collection of scalar elements; the filter
  /// matches when ANY element satisfies the operator.
  Collection { path: PropertyPath, element: ScalarKind },
  /// An arbitrary extractor for values not reachable by path.
  Callback { get: Box<dyn Fn(&T) -> FilterValue> },
}

impl<T> QueryEngine<T> {
  /// Creates an engine for a type exposing its own shape.
  pub fn new() -> Self
  where
    T: PropertyBag,
  {
    Self::with_shape(T::property_shape())
  }

  /// Creates an engine with an explicit shape descriptor.
  pub fn with_shape(shape: Shape) -> Self {
    Self {
      shape,
      filters: HashMap::new(),
      search_data: SearchData::new(),
      comparison: StringComparison::default(),
    }
  }

  /// The string comparison used for containment and plain-text matching.
  pub fn string_comparison(&self) -> StringComparison {
    self.comparison
  }

  /// Sets the string comparison used for containment and plain-text
  /// matching. Equality and ordering stay typed and exact.
  pub fn set_string_comparison(&mut self, comparison: StringComparison) {
    self.comparison = comparison;
  }

  /// Registers a property path projected into the search data.
  pub fn add_data_property(&mut self, path: PropertyPath) {
    self.search_data.add_property(path);
  }

  /// Registers a callback projecting a record into search strings.
  pub fn add_data_callback(&mut self, get_search_data: impl Fn(&T) -> Vec<String> + 'static) {
    self.search_data.add_callback(get_search_data);
  }

  /// Registers a filter token bound to a property path.
  ///
  /// The path is resolved against the record shape here, at registration
  /// time, never per query:
  ///
  /// - an unresolvable segment raises [`FilterError::InvalidPath`],
  /// - opaque (polymorphic) or structured terminals raise
  ///   [`FilterError::InvalidBinding`],
  /// - a collection terminal with scalar elements registers element-wise
  ///   "any element matches" semantics,
  /// - a record shape that is not an object raises
  ///   [`FilterError::MissingPropertyBag`].
  ///
  /// `operators` restricts what users may type; `None` allows all of them.
  pub fn add_filter_property(
    &mut self,
    token: &str,
    path: PropertyPath,
    operators: Option<Vec<FilterOperator>>,
  ) -> Result<(), FilterError> {
    self.ensure_token_free(token)?;
    if !matches!(self.shape, Shape::Object(_)) {
      return Err(FilterError::MissingPropertyBag {
        type_name: std::any::type_name::<T>().to_string(),
      });
    }

    let terminal = self.shape.resolve(&path).map_err(|err| match err {
      ResolveError::UnknownSegment { part } => FilterError::InvalidPath {
        token: token.to_string(),
        path: path.to_string(),
        segment: part.to_string(),
      },
      ResolveError::Polymorphic => FilterError::InvalidBinding {
        token: token.to_string(),
        path: path.to_string(),
        reason: "cannot bind to polymorphic fields".to_string(),
      },
    })?;

    let path_display = path.to_string();
    let invalid_binding = move |reason: &str| FilterError::InvalidBinding {
      token: token.to_string(),
      path: path_display,
      reason: reason.to_string(),
    };

    let access = match terminal {
      Shape::Scalar(kind) => {
        let kind = *kind;
        FilterAccess::Scalar { path, kind }
      }
      Shape::Array(element) | Shape::Map(element) => match element.scalar_kind() {
        Some(element) => FilterAccess::Collection { path, element },
        None => return Err(invalid_binding("collection elements are not scalar")),
      },
      Shape::Opaque => return Err(invalid_binding("cannot bind to polymorphic fields")),
      Shape::Object(_) => return Err(invalid_binding("path terminates in a structured value")),
    };

    self.insert_filter(token, access, operators);
    Ok(())
  }

  /// Registers a filter token bound to an arbitrary value extractor.
  ///
  /// Use this for values not reachable by reflection over the serde
  /// projection. Input conversion happens per record against the extracted
  /// value's kind.
  pub fn add_filter_callback<V, F>(
    &mut self,
    token: &str,
    get_filter_data: F,
    operators: Option<Vec<FilterOperator>>,
  ) -> Result<(), FilterError>
  where
    V: Into<FilterValue>,
    F: Fn(&T) -> V + 'static,
  {
    self.ensure_token_free(token)?;
    self.insert_filter(
      token,
      FilterAccess::Callback {
        get: Box::new(move |record| get_filter_data(record).into()),
      },
      operators,
    );
    Ok(())
  }

  /// Parses a query string into a reusable query object.
  ///
  /// Empty or whitespace-only text yields a query that passes every record
  /// through. Double-quoted phrases stay single tokens.
  pub fn parse(&self, text: &str) -> ParsedQuery<'_, T> {
    let clauses = if text.trim().is_empty() {
      Vec::new()
    } else {
      split_query(text)
        .iter()
        .map(|word| self.compile_word(word))
        .collect()
    };
    tracing::trace!(text, clauses = clauses.len(), "parsed query");
    ParsedQuery {
      search_string: text.to_string(),
      engine: self,
      clauses,
    }
  }

  fn ensure_token_free(&self, token: &str) -> Result<(), FilterError> {
    if self.filters.contains_key(token) {
      return Err(FilterError::DuplicateToken {
        token: token.to_string(),
      });
    }
    Ok(())
  }

  fn insert_filter(
    &mut self,
    token: &str,
    access: FilterAccess<T>,
    operators: Option<Vec<FilterOperator>>,
  ) {
    match &access {
      FilterAccess::Scalar { path, .. } | FilterAccess::Collection { path, .. } => {
        tracing::debug!(token, path = %path, "registered property filter");
      }
      FilterAccess::Callback { .. } => {
        tracing::debug!(token, "registered callback filter");
      }
    }
    let supported = operators.unwrap_or_else(|| FilterOperator::ALL.to_vec());
    self.filters
      .insert(token.to_string(), FilterEntry { supported, access });
  }

  fn compile_word(&self, word: &str) -> Clause<'_, T> {
    if let Some((start, op, len)) = FilterOperator::find_in(word) {
      if start > 0 {
        if let Some(entry) = self.filters.get(&word[..start]) {
          if !entry.supported.contains(&op) {
            tracing::trace!(
              token = &word[..start],
              op = op.token(),
              "operator not supported by filter; clause matches nothing"
            );
            return Clause::NoMatch;
          }
          let raw = unquote(&word[start + len..]);
          let input = match &entry.access {
            FilterAccess::Scalar { kind, .. } => {
              match FilterValue::parse_as(*kind, &raw) {
                Some(input) => FilterInput::Typed(input),
                None => return Clause::NoMatch,
              }
            }
            FilterAccess::Collection { element, .. } => {
              match FilterValue::parse_as(*element, &raw) {
                Some(input) => FilterInput::Typed(input),
                None => return Clause::NoMatch,
              }
            }
            FilterAccess::Callback { .. } => FilterInput::Raw(raw),
          };
          return Clause::Filter { entry, op, input };
        }
      }
    }
    // Unregistered tokens and plain words fall through to substring
    // search over the search data.
    Clause::Text(unquote(word))
  }
}

impl<T: PropertyBag> Default for QueryEngine<T> {
  fn default() -> Self {
    Self::new()
  }
}

enum Clause<'e, T> {
  /// A plain word matched against the search data.
  Text(String),
  /// A compiled filter clause.
  Filter {
    entry: &'e FilterEntry<T>,
    op: FilterOperator,
    input: FilterInput,
  },
  /// A clause that can never match: unsupported operator or input that does
  /// not convert to the terminal kind. Explicit, so incompatible queries
  /// never silently produce wrong results.
  NoMatch,
}

enum FilterInput {
  /// Converted once at parse time, for filters with a statically known
  /// terminal kind.
  Typed(FilterValue),
  /// Raw user input, converted per record for callback filters.
  Raw(String),
}

/// A query produced by [`QueryEngine::parse`].
pub struct ParsedQuery<'e, T> {
  search_string: String,
  engine: &'e QueryEngine<T>,
  clauses: Vec<Clause<'e, T>>,
}

impl<T: Serialize> ParsedQuery<'_, T> {
  fn match_filter(
    &self,
    record: &T,
    entry: &FilterEntry<T>,
    op: FilterOperator,
    input: &FilterInput,
    json: &mut Option<Option<Value>>,
  ) -> bool {
    let comparison = self.engine.comparison;
    match &entry.access {
      FilterAccess::Callback { get } => {
        let value = get(record);
        let input = match input {
          FilterInput::Typed(input) => input.clone(),
          FilterInput::Raw(raw) => match FilterValue::parse_as(value.kind(), raw) {
            Some(input) => input,
            None => return false,
          },
        };
        apply_operator(op, &value, &input, comparison)
      }
      FilterAccess::Scalar { path, .. } => {
        let FilterInput::Typed(input) = input else {
          return false;
        };
        let Some(json) = json.get_or_insert_with(|| serde_json::to_value(record).ok())
        else {
          return false;
        };
        let Some(resolved) = value::extract(json, path) else {
          return false;
        };
        match FilterValue::from_json(resolved) {
          Some(value) => apply_operator(op, &value, input, comparison),
          None => false,
        }
      }
      FilterAccess::Collection { path, .. } => {
        let FilterInput::Typed(input) = input else {
          return false;
        };
        let Some(json) = json.get_or_insert_with(|| serde_json::to_value(record).ok())
        else {
          return false;
        };
        let Some(resolved) = value::extract(json, path) else {
          return false;
        };
        // Null or absent collections never match; otherwise ANY
        // element satisfying the operator is enough.
        let elements: Vec<&Value> = match resolved {
          Value::Array(items) => items.iter().collect(),
          Value::Object(entries) => entries.values().collect(),
          _ => return false,
        };
        elements.iter().any(|element| {
          FilterValue::from_json(element)
            .map(|value| apply_operator(op, &value, input, comparison))
            .unwrap_or(false)
        })
      }
    }
  }
}

impl<T: Serialize> SearchQuery<T> for ParsedQuery<'_, T> {
  fn search_string(&self) -> &str {
    &self.search_string
  }

  fn tokens(&self) -> Vec<String> {
    split_query(&self.search_string)
  }

  fn matches(&self, record: &T) -> bool {
    if self.clauses.is_empty() {
      return true;
    }
    // Both caches fill lazily, at most once per record.
    let mut json: Option<Option<Value>> = None;
    let mut strings: Option<Vec<String>> = None;
    for clause in &self.clauses {
      let matched = match clause {
        Clause::NoMatch => false,
        Clause::Text(term) => strings
          .get_or_insert_with(|| self.engine.search_data.strings_for(record))
          .iter()
          .any(|s| self.engine.comparison.contains(s, term)),
        Clause::Filter { entry, op, input } => {
          self.match_filter(record, entry, *op, input, &mut json)
        }
      };
      if !matched {
        return false;
      }
    }
    true
  }
}

impl<T: Serialize + 'static> SearchBackend<T> for QueryEngine<T> {
  fn parse(&self, text: &str) -> Box<dyn SearchQuery<T> + '_> {
    Box::new(QueryEngine::parse(self, text))
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
    operators: Option<Vec<FilterOperator>>,
  ) -> Result<(), FilterError> {
    self.add_filter_property(token, path, operators)
  }

  fn add_search_filter_callback(
    &mut self,
    token: &str,
    get_filter_data: Box<dyn Fn(&T) -> FilterValue>,
    operators: Option<Vec<FilterOperator>>,
  ) -> Result<(), FilterError> {
    self.ensure_token_free(token)?;
    self.insert_filter(
      token,
      FilterAccess::Callback {
        get: get_filter_data,
      },
      operators,
    );
    Ok(())
  }
}

/// Splits a query string on whitespace, keeping double-quoted spans together.
fn split_query(text: &str) -> Vec<String> {
  let mut tokens = Vec::new();
  let mut buf = String::new();
  let mut in_quotes = false;
  for c in text.chars() {
    match c {
      '"' => {
        in_quotes = !in_quotes;
        buf.push(c);
      }
      c if c.is_whitespace() && !in_quotes => {
        if !buf.is_empty() {
          tokens.push(std::mem::take(&mut buf));
        }
      }
      _ => buf.push(c),
    }
  }
  if !buf.is_empty() {
    tokens.push(buf);
  }
  tokens
}

fn unquote(text: &str) -> String {
  text.trim_matches('"').to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_on_whitespace_keeping_quoted_phrases() {
    assert_eq!(
      split_query("mesh id<10 name:\"two words\""),
      vec!["mesh", "id<10", "name:\"two words\""]
    );
  }

  #[test]
  fn empty_text_produces_no_tokens() {
    assert!(split_query("   ").is_empty());
  }
}
