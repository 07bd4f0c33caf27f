//! GeoJSON feature assembly
//!
//! Pairs the geometry field of a document with the rest of its flattened
//! properties, ready for a tile encoder.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;
use tileprops_document::DocumentRecord;

use crate::flattener::PropertyFlattener;
use crate::properties::FlatProperties;

/// One map feature built from a document
///
/// The geometry is moved out of the properties, so it is not encoded twice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Feature<'a> {
    /// Document id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,

    /// Geometry value exactly as stored in the document
    pub geometry: Option<&'a Value>,

    /// Flattened properties without the geometry field
    pub properties: FlatProperties<'a>,
}

/// Features built from a batch of documents
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct FeatureCollection<'a> {
    /// Features in document order
    pub features: Vec<Feature<'a>>,
}

impl FeatureCollection<'_> {
    /// Number of features
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if collection is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl PropertyFlattener {
    /// Build a feature from one document
    ///
    /// Documents without a value at the geometry field yield a feature with a
    /// null geometry.
    #[must_use]
    pub fn to_feature<'a>(&self, document: &'a DocumentRecord) -> Feature<'a> {
        let properties = self.flatten(document);
        self.assemble(document, properties)
    }

    /// Build features for a batch of documents
    #[must_use]
    pub fn to_feature_collection<'a>(&self, documents: &'a [DocumentRecord]) -> FeatureCollection<'a> {
        let features = documents
            .iter()
            .zip(self.flatten_all(documents))
            .map(|(document, properties)| self.assemble(document, properties))
            .collect();
        FeatureCollection { features }
    }

    fn assemble<'a>(&self, document: &'a DocumentRecord, mut properties: FlatProperties<'a>) -> Feature<'a> {
        let geometry = self
            .geometry
            .as_str()
            .and_then(|field| take_geometry(&mut properties, field));

        Feature {
            id: document.id.as_deref(),
            geometry,
            properties,
        }
    }
}

fn take_geometry<'a>(properties: &mut FlatProperties<'a>, field: &str) -> Option<&'a Value> {
    match properties.remove(field)? {
        Cow::Borrowed(value) => Some(value),
        // Injected metadata, not geometry.
        Cow::Owned(value) => {
            properties.insert_owned(field, value);
            None
        }
    }
}
