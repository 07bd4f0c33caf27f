//! Flattener configuration
//!
//! Loaded from TOML, YAML or JSON. Every key is optional.
//!
//! ```toml
//! geometry_field = "location.shape"
//! parallel_threshold = 128
//! include_fields = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::flatten::GeometryField;

/// Default batch size at which flattening moves onto the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Flattener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlattenConfig {
    /// Dotted path of the geometry field; empty for none
    pub geometry_field: String,

    /// Batches at least this long are flattened in parallel
    pub parallel_threshold: usize,

    /// Merge computed `fields` into the properties
    pub include_fields: bool,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            geometry_field: String::new(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            include_fields: true,
        }
    }
}

impl FlattenConfig {
    /// Create config for a geometry field with default settings
    #[must_use]
    pub fn new(geometry_field: impl Into<String>) -> Self {
        Self {
            geometry_field: geometry_field.into(),
            ..Self::default()
        }
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// Returns error if the TOML is invalid or has unknown keys
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(toml)?.validated()
    }

    /// Parse from YAML
    ///
    /// # Errors
    /// Returns error if the YAML is invalid or has unknown keys
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str::<Self>(yaml)?.validated()
    }

    /// Parse from JSON
    ///
    /// # Errors
    /// Returns error if the JSON is invalid or has unknown keys
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(json)?.validated()
    }

    /// Load from a file, picking the format by extension
    ///
    /// # Errors
    /// Returns error if the file cannot be read, its extension is not
    /// `toml`, `yaml`, `yml` or `json`, or its content does not parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;

        match extension.as_str() {
            "toml" => Self::from_toml_str(&content),
            "yaml" | "yml" => Self::from_yaml_str(&content),
            "json" => Self::from_json_str(&content),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Geometry designator described by this config
    #[must_use]
    pub fn geometry(&self) -> GeometryField {
        GeometryField::new(self.geometry_field.as_str())
    }

    fn validated(self) -> Result<Self, ConfigError> {
        GeometryField::parse(&self.geometry_field)
            .map_err(|e| ConfigError::InvalidGeometryField(e.to_string()))?;
        Ok(self)
    }
}

/// Errors while loading a [`FlattenConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file being read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML
    #[error("invalid toml config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid YAML
    #[error("invalid yaml config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid JSON
    #[error("invalid json config: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown file extension
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Geometry field path is malformed
    #[error("invalid geometry field: {0}")]
    InvalidGeometryField(String),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
