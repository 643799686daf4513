//! Search data: the flat string projection of a record used for unstructured
//! substring search.

use crate::path::PropertyPath;
use crate::value;
use serde::Serialize;
use serde_json::Value;

type DataCallback<T> = Box<dyn Fn(&T) -> Vec<String>>;

/// The registered search-data providers for a record type.
///
/// Providers come in two forms: property paths resolved through the record's
/// serde projection, and arbitrary callbacks for values not reachable by
/// path. Both backends share this projection; a record with no providers
/// yields no strings, so non-empty plain-text queries match nothing.
pub struct SearchData<T> {
  properties: Vec<PropertyPath>,
  callbacks: Vec<DataCallback<T>>,
}

impl<T> SearchData<T> {
  /// Creates an empty provider set.
  pub fn new() -> Self {
    Self {
      properties: Vec::new(),
      callbacks: Vec::new(),
    }
  }

  /// Registers a property path whose value is projected to search strings.
  ///
  /// Collection-valued paths contribute one string per scalar element.
  pub fn add_property(&mut self, path: PropertyPath) {
    self.properties.push(path);
  }

  /// Registers a callback producing search strings for a record.
  pub fn add_callback(&mut self, get_search_data: impl Fn(&T) -> Vec<String> + 'static) {
    self.callbacks.push(Box::new(get_search_data));
  }

  /// Whether no providers are registered.
  pub fn is_empty(&self) -> bool {
    self.properties.is_empty() && self.callbacks.is_empty()
  }
}

impl<T: Serialize> SearchData<T> {
  /// Projects a record into its raw search strings, in registration order.
  pub fn strings_for(&self, record: &T) -> Vec<String> {
    let mut out = Vec::new();
    if !self.properties.is_empty() {
      if let Ok(json) = serde_json::to_value(record) {
        for path in &self.properties {
          if let Some(resolved) = value::extract(&json, path) {
            collect_strings(resolved, &mut out);
          }
        }
      }
    }
    for callback in &self.callbacks {
      out.extend(callback(record));
    }
    out
  }
}

impl<T> Default for SearchData<T> {
  fn default() -> Self {
    Self::new()
  }
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
  match value {
    Value::String(s) => out.push(s.clone()),
    Value::Number(n) => out.push(n.to_string()),
    Value::Bool(b) => out.push(b.to_string()),
    Value::Array(items) => {
      for item in items {
        collect_strings(item, out);
      }
    }
    // Nulls and nested objects are not searchable text.
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Serialize;

  #[derive(Serialize)]
  struct Record {
    name: String,
    tags: Vec<String>,
    id: u32,
  }

  #[test]
  fn projects_paths_and_callbacks_in_order() {
    let mut data = SearchData::new();
    data.add_property("name".into());
    data.add_property("tags".into());
    data.add_callback(|record: &Record| vec![format!("#{}", record.id)]);

    let record = Record {
      name: "Cube".into(),
      tags: vec!["mesh".into(), "static".into()],
      id: 7,
    };
    assert_eq!(data.strings_for(&record), vec!["Cube", "mesh", "static", "#7"]);
  }

  #[test]
  fn missing_paths_contribute_nothing() {
    let mut data = SearchData::new();
    data.add_property("nope".into());
    let record = Record {
      name: "Cube".into(),
      tags: Vec::new(),
      id: 0,
    };
    assert!(data.strings_for(&record).is_empty());
  }
}
