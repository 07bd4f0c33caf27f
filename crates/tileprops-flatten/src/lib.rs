//! tileprops Property Flattener
//!
//! Turns search hits into the flat, dotted-key property maps that vector
//! tile encoders attach to each feature.
//!
//! # Core Concepts
//!
//! - [`flatten`]: One document → [`FlatProperties`]
//! - [`GeometryField`]: The dotted path whose value is passed through unflattened
//! - [`PropertyFlattener`]: Reusable, thread-safe flattener with batch and feature support
//! - [`FlattenConfig`]: File-backed settings (TOML, YAML or JSON)
//!
//! # Flattening rules
//!
//! ```text
//! _source  {a: {b: 1, c: [1, 2]}, geom: {...}}   →  a.b, a.c, geom (untouched)
//! fields   {d: [x, y]}                           →  d = x
//! meta     _index, _id                           →  written last, never shadowed
//! ```
//!
//! # Example
//!
//! ```rust
//! use tileprops_document::SearchResponse;
//! use tileprops_flatten::PropertyFlattener;
//!
//! let response = SearchResponse::from_json(r#"{"hits": {"hits": [
//!     {"_index": "parks", "_id": "1", "_source": {"name": "A", "pin": [1.0, 2.0]}}
//! ]}}"#).unwrap();
//!
//! let flattener = PropertyFlattener::new("pin");
//! let features = flattener.to_feature_collection(response.documents());
//! assert_eq!(features.len(), 1);
//! assert_eq!(features.features[0].geometry, Some(&serde_json::json!([1.0, 2.0])));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod batch;
pub mod config;
mod feature;
mod flatten;
mod flattener;
mod properties;

pub use config::{ConfigError, FlattenConfig};
pub use feature::{Feature, FeatureCollection};
pub use flatten::{flatten, GeometryField, ID_PROPERTY, INDEX_PROPERTY};
pub use flattener::PropertyFlattener;
pub use properties::FlatProperties;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for flattening documents
    pub use crate::config::FlattenConfig;
    pub use crate::feature::{Feature, FeatureCollection};
    pub use crate::flatten::{flatten, GeometryField};
    pub use crate::flattener::PropertyFlattener;
    pub use crate::properties::FlatProperties;
    pub use tileprops_document::{DocumentRecord, SearchResponse};
}
