//! Crate-level error type

use thiserror::Error;

use crate::layout::LayoutError;
use crate::model::DataModelError;

/// Result type alias for operations that touch both layouts and data models
pub type Result<T> = std::result::Result<T, Error>;

/// Any error raised by this crate
#[derive(Error, Debug)]
pub enum Error {
    /// Key path resolution or data model operation failed
    #[error(transparent)]
    DataModel(#[from] DataModelError),

    /// Layout parsing or component lookup failed
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Reading a layout or configuration file failed
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// File that could not be read
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[source] serde_json::Error),
}

impl Error {
    /// Create an I/O error for a file
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when a data path did not resolve, as opposed to a hard failure
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Error::DataModel(err) if err.is_unresolved())
    }
}
