use std::path::PathBuf;
use thiserror::Error;

/// Result type for catalog and inventory operations
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors raised while reading catalogs or resolving device records
#[derive(Error, Debug)]
pub enum MetadataError {
    /// A DER structure does not have the expected tag/length shape.
    /// Scoped to a single extension blob.
    #[error("malformed encoding at offset {offset}: {reason}")]
    MalformedEncoding { offset: usize, reason: &'static str },

    /// The file could not be opened as a certificate trust list
    #[error("{} is not a readable trust list", path.display())]
    TrustListUnavailable { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("driver inventory error: {0}")]
    Inventory(String),
}

impl MetadataError {
    pub(crate) fn malformed(offset: usize, reason: &'static str) -> Self {
        MetadataError::MalformedEncoding { offset, reason }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MetadataError::Io {
            path: path.into(),
            source,
        }
    }
}
