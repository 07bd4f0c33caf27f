//! tileprops Document Model
//!
//! Search hits as they arrive from a document store, before flattening.
//!
//! # Core Concepts
//!
//! - [`DocumentRecord`]: One hit: `_index`, `_id`, nested `_source`, computed `fields`
//! - [`SearchResponse`]: The `hits.hits` envelope around a batch of records
//! - [`FieldPath`]: Dotted addressing of values inside a source tree
//!
//! # Example
//!
//! ```rust
//! use tileprops_document::{DocumentRecord, FieldPath};
//!
//! let record = DocumentRecord::from_json(
//!     r#"{"_index": "parks", "_id": "7", "_source": {"geo": {"center": [1.5, 2.5]}}}"#,
//! ).unwrap();
//! assert_eq!(record.id.as_deref(), Some("7"));
//!
//! let path: FieldPath = "geo.center".parse().unwrap();
//! assert_eq!(path, FieldPath::root().child("geo").child("center"));
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod error;
mod path;
mod record;

pub use error::{DocumentError, DocumentResult};
pub use path::{FieldPath, PathError};
pub use record::{
    documents_from_json, documents_from_path, DocumentRecord, HitsEnvelope, SearchResponse,
    TotalHits, TotalRelation,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
