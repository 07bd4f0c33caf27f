//! Error types for reading document records

use std::path::PathBuf;

/// Errors while reading search hits into [`DocumentRecord`](crate::DocumentRecord)s
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Input is not valid JSON or does not have the hit shape
    #[error("invalid document json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// IO error while reading input
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = DocumentError::io_error(
            "hits.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "io error reading hits.json: gone");
    }

    #[test]
    fn invalid_json_display() {
        let err: DocumentError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, DocumentError::InvalidJson(_)));
        assert!(err.to_string().starts_with("invalid document json: "));
    }
}
