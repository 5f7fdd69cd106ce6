use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for gotext-translate.
#[derive(Debug, Error)]
pub enum GotextError {
    /// Missing or invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// No provider registered under the requested name.
    #[error("provider {0} not registered")]
    UnknownProvider(String),

    /// A provider with the same name is already registered.
    #[error("provider {0} already registered")]
    DuplicateProvider(String),

    /// Catalog bytes are not a valid gotext JSON document.
    #[error("failed to parse catalog {}: {source}", path.display())]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The same message id appears more than once in a source catalog.
    #[error("duplicate message id {id:?} in {}", path.display())]
    DuplicateMessageId { path: PathBuf, id: String },

    /// Error from a translation provider for a single request.
    #[error("provider error: {0}")]
    Provider(String),

    /// Read or write failure on a catalog path.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run was cancelled before this operation completed.
    #[error("cancelled")]
    Cancelled,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GotextError {
    /// Shorthand for wrapping an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error only concerns the file being processed.
    ///
    /// Batch runs skip the file on these and keep going; everything else
    /// aborts the run.
    pub fn is_file_local(&self) -> bool {
        matches!(
            self,
            Self::CatalogParse { .. }
                | Self::DuplicateMessageId { .. }
                | Self::Io { .. }
                | Self::Serialization(_)
        )
    }
}
