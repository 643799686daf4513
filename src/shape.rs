//! Shape descriptors: the property-bag abstraction records are resolved
//! against.
//!
//! A [`Shape`] describes the structure of a record type as a closed set of
//! descriptors, so property paths can be validated and typed once at filter
//! registration instead of per query. User record types expose their shape
//! through the [`PropertyBag`] trait, usually with the [`Shape::object`]
//! builder.

use crate::path::{PathPart, PropertyPath};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The scalar kinds a path terminal can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
  String,
  Number,
  Bool,
}

/// A structural descriptor for a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
  /// A scalar leaf value.
  Scalar(ScalarKind),
  /// A struct-like container with named fields.
  Object(Vec<(String, Shape)>),
  /// A sequence of uniformly shaped elements.
  Array(Box<Shape>),
  /// A string-keyed map of uniformly shaped elements.
  Map(Box<Shape>),
  /// A polymorphic value with no static descriptor. Paths cannot descend
  /// into or terminate at an opaque shape.
  Opaque,
}

impl Shape {
  /// A string scalar.
  pub fn string() -> Self {
    Shape::Scalar(ScalarKind::String)
  }

  /// A numeric scalar.
  pub fn number() -> Self {
    Shape::Scalar(ScalarKind::Number)
  }

  /// A boolean scalar.
  pub fn bool() -> Self {
    Shape::Scalar(ScalarKind::Bool)
  }

  /// A sequence of `element`-shaped values.
  pub fn array(element: Shape) -> Self {
    Shape::Array(Box::new(element))
  }

  /// A string-keyed map of `element`-shaped values.
  pub fn map(element: Shape) -> Self {
    Shape::Map(Box::new(element))
  }

  /// Starts building an object shape.
  ///
  /// # Examples
  ///
  /// ```rust
  /// use propsift::shape::Shape;
  ///
  /// let shape = Shape::object()
  ///     .field("id", Shape::number())
  ///     .field("name", Shape::string())
  ///     .build();
  /// assert!(shape.resolve(&"name".into()).is_ok());
  /// ```
  pub fn object() -> ObjectShapeBuilder {
    ObjectShapeBuilder { fields: Vec::new() }
  }

  /// The scalar kind of this shape, if it is a scalar.
  pub fn scalar_kind(&self) -> Option<ScalarKind> {
    match self {
      Shape::Scalar(kind) => Some(*kind),
      _ => None,
    }
  }

  /// Resolves a property path against this shape, one segment at a time.
  ///
  /// Returns the terminal shape the path addresses, or the structural
  /// failure encountered along the way. Resolution never inspects record
  /// instances; it is a static walk over the descriptors.
  pub fn resolve(&self, path: &PropertyPath) -> Result<&Shape, ResolveError> {
    let mut current = self;
    for part in path.parts() {
      if matches!(current, Shape::Opaque) {
        return Err(ResolveError::Polymorphic);
      }
      current = match (current, part) {
        (Shape::Object(fields), PathPart::Name(name))
        | (Shape::Object(fields), PathPart::Key(name)) => fields
          .iter()
          .find(|(field, _)| field == name)
          .map(|(_, shape)| shape)
          .ok_or_else(|| ResolveError::UnknownSegment { part: part.clone() })?,
        (Shape::Map(element), PathPart::Name(_))
        | (Shape::Map(element), PathPart::Key(_)) => element,
        (Shape::Array(element), PathPart::Index(_)) => element,
        _ => return Err(ResolveError::UnknownSegment { part: part.clone() }),
      };
    }
    Ok(current)
  }
}

/// Builder for [`Shape::Object`].
#[derive(Debug, Default)]
pub struct ObjectShapeBuilder {
  fields: Vec<(String, Shape)>,
}

impl ObjectShapeBuilder {
  /// Adds a named field.
  pub fn field(mut self, name: impl Into<String>, shape: Shape) -> Self {
    self.fields.push((name.into(), shape));
    self
  }

  /// Builds the object shape.
  pub fn build(self) -> Shape {
    Shape::Object(self.fields)
  }
}

/// Structural failures encountered while resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
  /// A segment did not resolve: unknown field name, index into a
  /// non-sequence, or key into a non-map.
  UnknownSegment { part: PathPart },
  /// The walk reached an opaque shape, which cannot be statically bound.
  Polymorphic,
}

/// Exposes the shape of a record type for path resolution.
///
/// Implemented for scalars, `Option`, sequences and string-keyed maps; user
/// record types implement it with the [`Shape::object`] builder, mirroring
/// their serde projection.
pub trait PropertyBag {
  fn property_shape() -> Shape;
}

impl PropertyBag for String {
  fn property_shape() -> Shape {
    Shape::string()
  }
}

impl PropertyBag for &str {
  fn property_shape() -> Shape {
    Shape::string()
  }
}

impl PropertyBag for bool {
  fn property_shape() -> Shape {
    Shape::bool()
  }
}

macro_rules! numeric_property_bag {
  ($($t:ty),* $(,)?) => {
    $(impl PropertyBag for $t {
      fn property_shape() -> Shape {
        Shape::number()
      }
    })*
  };
}

numeric_property_bag!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

// `Option` erases to the inner shape; absent values degrade to "no match" at
// query time rather than needing their own descriptor.
impl<T: PropertyBag> PropertyBag for Option<T> {
  fn property_shape() -> Shape {
    T::property_shape()
  }
}

impl<T: PropertyBag> PropertyBag for Vec<T> {
  fn property_shape() -> Shape {
    Shape::array(T::property_shape())
  }
}

impl<T: PropertyBag> PropertyBag for &[T] {
  fn property_shape() -> Shape {
    Shape::array(T::property_shape())
  }
}

impl<T: PropertyBag, const N: usize> PropertyBag for [T; N] {
  fn property_shape() -> Shape {
    Shape::array(T::property_shape())
  }
}

impl<T: PropertyBag, S> PropertyBag for HashMap<String, T, S> {
  fn property_shape() -> Shape {
    Shape::map(T::property_shape())
  }
}

impl<T: PropertyBag> PropertyBag for BTreeMap<String, T> {
  fn property_shape() -> Shape {
    Shape::map(T::property_shape())
  }
}

// Dynamic JSON payloads carry no static structure.
impl PropertyBag for serde_json::Value {
  fn property_shape() -> Shape {
    Shape::Opaque
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> Shape {
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
      .field("payload", Shape::Opaque)
      .build()
  }

  #[test]
  fn resolves_nested_names() {
    let shape = sample();
    let terminal = shape.resolve(&"position.x".into()).unwrap();
    assert_eq!(terminal.scalar_kind(), Some(ScalarKind::Number));
  }

  #[test]
  fn resolves_indexed_elements() {
    let shape = sample();
    let terminal = shape.resolve(&"tags[0]".into()).unwrap();
    assert_eq!(terminal.scalar_kind(), Some(ScalarKind::String));
  }

  #[test]
  fn unknown_name_is_reported_with_segment() {
    let shape = sample();
    let err = shape.resolve(&"position.z".into()).unwrap_err();
    assert_eq!(
      err,
      ResolveError::UnknownSegment {
        part: PathPart::Name("z".into())
      }
    );
  }

  #[test]
  fn index_into_scalar_fails() {
    let shape = sample();
    assert!(matches!(
      shape.resolve(&"id[0]".into()),
      Err(ResolveError::UnknownSegment { .. })
    ));
  }

  #[test]
  fn descending_into_opaque_is_polymorphic() {
    let shape = sample();
    assert_eq!(
      shape.resolve(&"payload.anything".into()),
      Err(ResolveError::Polymorphic)
    );
  }
}
