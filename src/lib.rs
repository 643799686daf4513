//! Propsift - a property-path search and filter engine for arbitrary records.
//!
//! Propsift lets UI layers and tools run free-form query strings against plain
//! Rust data. Callers register *search data* (string projections of a record)
//! and *filters* (user-typed tokens bound to property paths or callbacks) once;
//! every query string is then parsed into an immutable query object that can be
//! applied to record sequences, producing an order-preserving filtered
//! subsequence.
//!
//! Two backends implement the same [`backend::SearchBackend`] contract:
//!
//! - [`basic::SubstringBackend`]: case-insensitive whole-string substring
//!   search over the registered search data. Filter registrations are accepted
//!   but deliberately ignored.
//! - [`engine::QueryEngine`] (behind the `query-engine` feature, on by
//!   default): tokenized queries with per-token filter operators (`:`, `=`,
//!   `!=`, `<`, `<=`, `>`, `>=`) resolved against a shape descriptor of the
//!   record type at registration time.
//!
//! # Examples
//!
//! ```rust
//! use propsift::prelude::*;
//! use serde::Serialize;
//!
//! #[derive(Debug, Serialize)]
//! struct Asset {
//!     id: u32,
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! impl PropertyBag for Asset {
//!     fn property_shape() -> Shape {
//!         Shape::object()
//!             .field("id", Shape::number())
//!             .field("name", Shape::string())
//!             .field("tags", Shape::array(Shape::string()))
//!             .build()
//!     }
//! }
//!
//! let mut engine: QueryEngine<Asset> = QueryEngine::new();
//! engine.add_data_property("name".into());
//! engine.add_filter_property("id", "id".into(), None).unwrap();
//! engine.add_filter_property("tag", "tags".into(), None).unwrap();
//!
//! let assets = vec![
//!     Asset { id: 1, name: "Cube".into(), tags: vec!["mesh".into()] },
//!     Asset { id: 12, name: "Sphere".into(), tags: vec!["mesh".into(), "round".into()] },
//! ];
//!
//! // Structured filtering by registered token.
//! let query = engine.parse("id<10");
//! assert_eq!(query.apply(&assets).len(), 1);
//!
//! // Collection-typed terminals match if ANY element matches.
//! let query = engine.parse("tag:round");
//! assert_eq!(query.apply(&assets).len(), 1);
//!
//! // Plain words fall back to substring search over the search data.
//! let query = engine.parse("cube");
//! assert_eq!(query.apply(&assets).len(), 1);
//! ```

pub mod backend;
pub mod basic;
pub mod data;
#[cfg(feature = "query-engine")]
pub mod engine;
pub mod error;
pub mod path;
pub mod shape;
pub mod value;

pub mod prelude {
  //! Convenient re-exports for common types and traits.

  pub use crate::backend::*;
  pub use crate::basic::*;
  pub use crate::data::*;
  #[cfg(feature = "query-engine")]
  pub use crate::engine::*;
  pub use crate::error::*;
  pub use crate::path::*;
  pub use crate::shape::*;
  pub use crate::value::*;
}
