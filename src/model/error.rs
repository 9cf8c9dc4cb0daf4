//! Error types for data model access

use thiserror::Error;

/// Result type alias for data model operations
pub type Result<T> = std::result::Result<T, DataModelError>;

/// Errors raised while resolving or mutating a data model through a key path
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataModelError {
    /// The path text could not be parsed
    #[error("Invalid key path '{path}': {reason}")]
    InvalidPath {
        /// Path as given by the caller
        path: String,
        /// What is wrong with it
        reason: String,
    },

    /// A segment names a field that does not exist on the current node
    #[error("Unknown field '{field}' in '{path}'")]
    UnknownField {
        /// Full path being resolved
        path: String,
        /// Field that could not be found
        field: String,
    },

    /// A collection was reached without a literal index and the context was empty
    #[error("No index available for collection '{field}' in '{path}'")]
    MissingIndex {
        /// Full path being resolved
        path: String,
        /// Collection field that needed an index
        field: String,
    },

    /// Index points past the end of the collection
    #[error("Index {index} out of range for '{field}' (length {len}) in '{path}'")]
    IndexOutOfRange {
        /// Full path being resolved
        path: String,
        /// Collection field
        field: String,
        /// Requested index
        index: usize,
        /// Collection length
        len: usize,
    },

    /// A literal index was placed on a field that is not a collection
    #[error("Field '{field}' in '{path}' is not a collection and cannot be indexed")]
    NotACollection {
        /// Full path being resolved
        path: String,
        /// Field carrying the literal index
        field: String,
    },

    /// The accessor cannot perform the requested operation
    #[error("Unsupported operation: {message}")]
    Unsupported {
        /// Description of what was attempted
        message: String,
    },
}

impl DataModelError {
    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(path: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            path: path.into(),
            field: field.into(),
        }
    }

    /// Create a missing index error
    pub fn missing_index(path: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingIndex {
            path: path.into(),
            field: field.into(),
        }
    }

    /// Create an index out of range error
    pub fn index_out_of_range(
        path: impl Into<String>,
        field: impl Into<String>,
        index: usize,
        len: usize,
    ) -> Self {
        Self::IndexOutOfRange {
            path: path.into(),
            field: field.into(),
            index,
            len,
        }
    }

    /// Create a not-a-collection error
    pub fn not_a_collection(path: impl Into<String>, field: impl Into<String>) -> Self {
        Self::NotACollection {
            path: path.into(),
            field: field.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// True for the "data not there" family that lenient resolution swallows.
    ///
    /// Only missing fields and missing or out-of-range indices count.
    pub fn is_unresolved(&self) -> bool {
        matches!(
            self,
            Self::UnknownField { .. } | Self::MissingIndex { .. } | Self::IndexOutOfRange { .. }
        )
    }
}
