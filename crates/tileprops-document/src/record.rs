//! Document records as returned by a search engine
//!
//! A [`DocumentRecord`] is one search hit: a nested `_source` tree, an optional
//! table of computed `fields`, and the `_index`/`_id` metadata pair.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DocumentError, DocumentResult};

/// A single retrieved document
///
/// `source` and `fields` are kept as raw [`Value`]s so that structurally
/// unexpected hits still load; consumers decide how to treat odd shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Index (collection) the document was read from
    #[serde(rename = "_index", default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    /// Document identifier
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Nested source tree
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,

    /// Computed field values, each entry normally an array of values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,
}

impl DocumentRecord {
    /// Create an empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the index name
    #[must_use]
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Set the document id
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the source tree
    #[must_use]
    pub fn with_source(mut self, source: Value) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the computed fields table
    #[must_use]
    pub fn with_fields(mut self, fields: Value) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Parse a single hit from JSON
    ///
    /// # Errors
    /// Returns error if the input is not a JSON object of hit shape
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Source tree as an object, if it is one
    #[inline]
    #[must_use]
    pub fn source_object(&self) -> Option<&Map<String, Value>> {
        self.source.as_ref().and_then(Value::as_object)
    }

    /// Computed fields as a table, if present and object-shaped
    #[inline]
    #[must_use]
    pub fn fields_table(&self) -> Option<&Map<String, Value>> {
        self.fields.as_ref().and_then(Value::as_object)
    }

    /// True when the record carries nothing at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_none() && self.id.is_none() && self.source.is_none() && self.fields.is_none()
    }
}

/// Total hit count, in either of the forms search engines emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    /// Legacy numeric form
    Count(u64),
    /// `{ "value": n, "relation": "eq" | "gte" }`
    Tracked {
        /// Counted hits
        value: u64,
        /// Whether `value` is exact
        #[serde(default)]
        relation: TotalRelation,
    },
}

impl TotalHits {
    /// Hit count regardless of form
    #[inline]
    #[must_use]
    pub fn value(&self) -> u64 {
        match self {
            Self::Count(n) | Self::Tracked { value: n, .. } => *n,
        }
    }
}

/// Precision of a tracked total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalRelation {
    /// Exact count
    #[default]
    Eq,
    /// Lower bound
    Gte,
}

/// The `hits` object of a search response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitsEnvelope {
    /// Total matching documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<TotalHits>,

    /// Returned documents
    #[serde(default)]
    pub hits: Vec<DocumentRecord>,
}

/// A search response, reduced to what feature building needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Hits envelope
    #[serde(default)]
    pub hits: HitsEnvelope,
}

impl SearchResponse {
    /// Parse a full search response
    ///
    /// # Errors
    /// Returns error if the JSON is invalid or the envelope is malformed
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a full search response from a reader
    ///
    /// # Errors
    /// Returns error if reading fails or the JSON is invalid
    pub fn from_reader(reader: impl Read) -> DocumentResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Returned documents
    #[inline]
    #[must_use]
    pub fn documents(&self) -> &[DocumentRecord] {
        &self.hits.hits
    }

    /// Take ownership of the returned documents
    #[inline]
    #[must_use]
    pub fn into_documents(self) -> Vec<DocumentRecord> {
        self.hits.hits
    }
}

/// Read documents from JSON of any accepted shape
///
/// Accepts a full search response (`{"hits": {"hits": [...]}}`), a bare
/// array of hits, or a single hit object.
///
/// # Errors
/// Returns error if the JSON is invalid or matches none of the shapes
pub fn documents_from_json(json: &str) -> DocumentResult<Vec<DocumentRecord>> {
    let value: Value = serde_json::from_str(json)?;
    documents_from_value(value)
}

/// Read documents from a file, see [`documents_from_json`]
///
/// # Errors
/// Returns error if the file cannot be read or parsed
pub fn documents_from_path(path: impl AsRef<Path>) -> DocumentResult<Vec<DocumentRecord>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| DocumentError::io_error(path, e))?;
    documents_from_json(&json)
}

fn documents_from_value(value: Value) -> DocumentResult<Vec<DocumentRecord>> {
    if value.is_array() {
        return Ok(serde_json::from_value(value)?);
    }

    if value.get("hits").is_some_and(Value::is_object) {
        let response: SearchResponse = serde_json::from_value(value)?;
        return Ok(response.into_documents());
    }

    Ok(vec![serde_json::from_value(value)?])
}
