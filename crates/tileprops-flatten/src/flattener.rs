//! Reusable flattener bound to one geometry field

use tileprops_document::DocumentRecord;

use crate::config::{FlattenConfig, DEFAULT_PARALLEL_THRESHOLD};
use crate::flatten::{flatten_document, GeometryField};
use crate::properties::FlatProperties;

/// Flattens documents that share a geometry field
///
/// Holds no per-document state, so one instance can be shared across
/// threads and reused for any number of documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFlattener {
    pub(crate) geometry: GeometryField,
    pub(crate) include_fields: bool,
    pub(crate) parallel_threshold: usize,
}

impl Default for PropertyFlattener {
    fn default() -> Self {
        Self::new(GeometryField::none())
    }
}

impl PropertyFlattener {
    /// Create flattener for a geometry field
    #[must_use]
    pub fn new(geometry: impl Into<GeometryField>) -> Self {
        Self {
            geometry: geometry.into(),
            include_fields: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Create flattener from loaded settings
    #[must_use]
    pub fn from_config(config: &FlattenConfig) -> Self {
        Self {
            geometry: config.geometry(),
            include_fields: config.include_fields,
            parallel_threshold: config.parallel_threshold,
        }
    }

    /// Skip or merge computed fields
    #[must_use]
    pub fn with_fields(mut self, include_fields: bool) -> Self {
        self.include_fields = include_fields;
        self
    }

    /// Batch length at which [`flatten_all`](Self::flatten_all) goes parallel
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Geometry designator in use
    #[inline]
    #[must_use]
    pub fn geometry(&self) -> &GeometryField {
        &self.geometry
    }

    /// Flatten one document
    #[must_use]
    pub fn flatten<'a>(&self, document: &'a DocumentRecord) -> FlatProperties<'a> {
        flatten_document(&self.geometry, document, self.include_fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_config_carries_settings() {
        let config = FlattenConfig {
            geometry_field: "pin".to_string(),
            parallel_threshold: 3,
            include_fields: false,
        };
        let flattener = PropertyFlattener::from_config(&config);

        assert_eq!(flattener.geometry(), &GeometryField::from("pin"));
        assert_eq!(
            flattener,
            PropertyFlattener::new("pin").with_fields(false).with_parallel_threshold(3)
        );
    }

    #[test]
    fn flatten_matches_free_function() {
        let doc = DocumentRecord::new()
            .with_id("1")
            .with_source(json!({"pin": {"lat": 1, "lon": 2}, "n": 3}))
            .with_fields(json!({"m": [4, 5]}));

        let flattener = PropertyFlattener::new("pin");
        assert_eq!(flattener.flatten(&doc), crate::flatten("pin", Some(&doc)));
    }

    #[test]
    fn flatten_without_fields() {
        let doc = DocumentRecord::new().with_fields(json!({"m": [4, 5]}));
        let props = PropertyFlattener::default().with_fields(false).flatten(&doc);
        assert!(props.is_empty());
    }
}
