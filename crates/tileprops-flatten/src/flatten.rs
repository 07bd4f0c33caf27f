//! Document → property flattening
//!
//! Walks a hit's `_source` tree and emits one entry per leaf, keyed by its
//! dotted path. The geometry field is emitted as-is and never descended into.
//! Computed `fields` follow, collapsed to their first value, and the `_index`
//! and `_id` metadata are written last so nothing in the document can shadow
//! them.

use std::fmt::{self, Display, Formatter};

use serde_json::{Map, Value};
use tileprops_document::{DocumentRecord, FieldPath, PathError};
use tracing::{debug, trace};

use crate::properties::FlatProperties;

/// Property key carrying the document's index name
pub const INDEX_PROPERTY: &str = "_index";

/// Property key carrying the document id
pub const ID_PROPERTY: &str = "_id";

/// Dotted path of the field holding a document's geometry
///
/// An empty designator matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GeometryField(Option<String>);

impl GeometryField {
    /// Designate `path` as the geometry field
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        if path.is_empty() {
            Self(None)
        } else {
            Self(Some(path))
        }
    }

    /// Designator that treats no field specially
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self(None)
    }

    /// Parse a designator, rejecting paths with empty segments
    ///
    /// # Errors
    /// Returns [`PathError::EmptySegment`] for input such as `"a..b"`
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let parsed: FieldPath = path.parse()?;
        if parsed.is_empty() {
            return Ok(Self::none());
        }
        Ok(Self::new(parsed.to_string()))
    }

    /// Designated path, if any
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Exact full-path match; descendants of the designated path do not match
    #[inline]
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.0.as_deref() == Some(path)
    }
}

impl From<&str> for GeometryField {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for GeometryField {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl Display for GeometryField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_deref().unwrap_or(""))
    }
}

/// Flatten a document into tile feature properties
///
/// `geometry_field` names the dotted path whose value is passed through
/// untouched; an empty string disables that. A missing document yields an
/// empty map. Never fails: shapes that cannot be walked contribute nothing.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tileprops_document::DocumentRecord;
/// use tileprops_flatten::flatten;
///
/// let doc = DocumentRecord::new()
///     .with_index("logs-1")
///     .with_id("abc")
///     .with_source(json!({"a": {"b": 1}, "geom": {"type": "Point", "coordinates": [1, 2]}}));
///
/// let props = flatten("geom", Some(&doc));
/// assert_eq!(props.get("a.b"), Some(&json!(1)));
/// assert_eq!(props.get("geom"), Some(&json!({"type": "Point", "coordinates": [1, 2]})));
/// assert_eq!(props.get("_id"), Some(&json!("abc")));
/// ```
#[must_use]
pub fn flatten<'a>(geometry_field: &str, document: Option<&'a DocumentRecord>) -> FlatProperties<'a> {
    let geometry = GeometryField::new(geometry_field);
    match document {
        Some(document) => flatten_document(&geometry, document, true),
        None => FlatProperties::new(),
    }
}

/// Flatten with an explicit choice on whether computed fields are merged
pub(crate) fn flatten_document<'a>(
    geometry: &GeometryField,
    document: &'a DocumentRecord,
    include_fields: bool,
) -> FlatProperties<'a> {
    let mut flat = FlatProperties::new();

    if let Some(source) = &document.source {
        flatten_source(&mut flat, source, geometry);
    }

    if include_fields {
        if let Some(fields) = &document.fields {
            flatten_fields(&mut flat, fields);
        }
    }

    inject_metadata(&mut flat, document);
    flat
}

fn flatten_source<'a>(flat: &mut FlatProperties<'a>, source: &'a Value, geometry: &GeometryField) {
    match source {
        Value::Object(object) => flatten_object(flat, &FieldPath::root(), object, geometry),
        Value::Null => {}
        other => debug!(kind = value_kind(other), "source is not an object, skipping"),
    }
}

fn flatten_object<'a>(
    flat: &mut FlatProperties<'a>,
    prefix: &FieldPath,
    object: &'a Map<String, Value>,
    geometry: &GeometryField,
) {
    for (key, value) in object {
        let path = prefix.child(key.as_str());
        let name = path.to_string();

        if geometry.matches(&name) {
            trace!(field = %name, "passing geometry through");
            flat.insert_borrowed(name, value);
            continue;
        }

        match value {
            Value::Object(nested) => flatten_object(flat, &path, nested, geometry),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
                flat.insert_borrowed(name, value);
            }
        }
    }
}

fn flatten_fields<'a>(flat: &mut FlatProperties<'a>, fields: &'a Value) {
    let Some(table) = fields.as_object() else {
        debug!(kind = value_kind(fields), "fields is not an object, skipping");
        return;
    };

    for (key, value) in table {
        match value {
            Value::Array(values) => {
                if let Some(first) = values.first() {
                    flat.insert_borrowed(key.as_str(), first);
                }
            }
            other => flat.insert_borrowed(key.as_str(), other),
        }
    }
}

/// A missing identifier still owns its key: any same-named entry from the
/// source walk or computed fields is dropped.
fn inject_metadata(flat: &mut FlatProperties<'_>, document: &DocumentRecord) {
    for (key, value) in [(INDEX_PROPERTY, &document.index), (ID_PROPERTY, &document.id)] {
        match value {
            Some(value) => flat.insert_owned(key, Value::String(value.clone())),
            None => {
                flat.remove(key);
            }
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
