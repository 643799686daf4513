#![cfg(feature = "query-engine")]

use propsift::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
struct Child {
  label: String,
}

#[derive(Debug, Clone, Serialize)]
struct Container {
  id: u32,
  position: Position,
  tags: Vec<String>,
  children: Vec<Child>,
  payload: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
struct Position {
  x: f64,
  y: f64,
}

impl PropertyBag for Container {
  fn property_shape() -> Shape {
    Shape::object()
      .field("id", Shape::number())
      .field(
        "position",
        Shape::object()
          .field("x", Shape::number())
          .field("y", Shape::number())
          .build(),
      )
      .field("tags", Shape::array(Shape::string()))
      .field("children", Shape::array(Child::child_shape()))
      .field("payload", serde_json::Value::property_shape())
      .build()
  }
}

impl Child {
  fn child_shape() -> Shape {
    Shape::object().field("label", Shape::string()).build()
  }
}

fn engine() -> QueryEngine<Container> {
  QueryEngine::new()
}

#[test]
fn scalar_and_collection_paths_register() {
  let mut engine = engine();
  assert!(engine.add_filter_property("id", "id".into(), None).is_ok());
  assert!(engine.add_filter_property("x", "position.x".into(), None).is_ok());
  assert!(engine.add_filter_property("tag", "tags".into(), None).is_ok());
}

#[test]
fn unknown_root_segment_is_invalid_path() {
  let mut engine = engine();
  let err = engine
    .add_filter_property("bad", "some_unknown_path".into(), None)
    .unwrap_err();
  match err {
    FilterError::InvalidPath { token, segment, .. } => {
      assert_eq!(token, "bad");
      assert_eq!(segment, "some_unknown_path");
    }
    other => panic!("expected InvalidPath, got {other:?}"),
  }
}

#[test]
fn unknown_nested_segment_is_invalid_path() {
  let mut engine = engine();
  let err = engine
    .add_filter_property("z", "position.z".into(), None)
    .unwrap_err();
  match err {
    FilterError::InvalidPath { segment, path, .. } => {
      assert_eq!(segment, "z");
      assert_eq!(path, "position.z");
    }
    other => panic!("expected InvalidPath, got {other:?}"),
  }
}

#[test]
fn indexing_a_scalar_is_invalid_path() {
  let mut engine = engine();
  let err = engine
    .add_filter_property("bad", "id[0]".into(), None)
    .unwrap_err();
  assert!(matches!(err, FilterError::InvalidPath { .. }));
}

#[test]
fn polymorphic_terminal_is_invalid_binding() {
  let mut engine = engine();
  let err = engine
    .add_filter_property("payload", "payload".into(), None)
    .unwrap_err();
  assert!(matches!(err, FilterError::InvalidBinding { .. }));
}

#[test]
fn descending_into_polymorphic_field_is_invalid_binding() {
  let mut engine = engine();
  let err = engine
    .add_filter_property("inner", "payload.anything".into(), None)
    .unwrap_err();
  assert!(matches!(err, FilterError::InvalidBinding { .. }));
}

#[test]
fn structured_terminal_is_invalid_binding() {
  let mut engine = engine();
  let err = engine
    .add_filter_property("pos", "position".into(), None)
    .unwrap_err();
  assert!(matches!(err, FilterError::InvalidBinding { .. }));
}

#[test]
fn collection_of_structured_elements_is_invalid_binding() {
  let mut engine = engine();
  let err = engine
    .add_filter_property("child", "children".into(), None)
    .unwrap_err();
  assert!(matches!(err, FilterError::InvalidBinding { .. }));
}

#[test]
fn indexed_element_path_registers() {
  // Addressing through the collection down to a scalar is fine.
  let mut engine = engine();
  assert!(engine
    .add_filter_property("first", "children[0].label".into(), None)
    .is_ok());
}

#[test]
fn duplicate_token_is_rejected() {
  let mut engine = engine();
  engine.add_filter_property("id", "id".into(), None).unwrap();
  let err = engine
    .add_filter_property("id", "position.x".into(), None)
    .unwrap_err();
  match err {
    FilterError::DuplicateToken { token } => assert_eq!(token, "id"),
    other => panic!("expected DuplicateToken, got {other:?}"),
  }
}

#[test]
fn duplicate_callback_token_is_rejected() {
  let mut engine = engine();
  engine
    .add_filter_callback("len", |c: &Container| c.tags.len(), None)
    .unwrap();
  let err = engine
    .add_filter_callback("len", |c: &Container| c.children.len(), None)
    .unwrap_err();
  assert!(matches!(err, FilterError::DuplicateToken { .. }));
}

#[test]
fn shapeless_record_type_is_missing_property_bag() {
  // A type whose shape is opaque has no descriptors to resolve against.
  let mut engine: QueryEngine<serde_json::Value> = QueryEngine::new();
  let err = engine
    .add_filter_property("id", "id".into(), None)
    .unwrap_err();
  assert!(matches!(err, FilterError::MissingPropertyBag { .. }));
}

#[test]
fn errors_report_token_and_path() {
  let mut engine = engine();
  let err = engine
    .add_filter_property("bad", "position.z".into(), None)
    .unwrap_err();
  let message = err.to_string();
  assert!(message.contains("bad"));
  assert!(message.contains("position.z"));
}
