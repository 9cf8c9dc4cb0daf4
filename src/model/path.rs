//! Key path representation for data model bindings
//!
//! A key path addresses a position in a data model with dotted segments, each
//! optionally carrying a literal index: `"Bedrifter[1].Ansatte.Alder"`.
//! There is no escaping, so names can never contain `.`, `[` or `]`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use super::error::DataModelError;

/// A single segment of a key path: a field name and an optional literal index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    name: String,
    index: Option<usize>,
}

impl PathSegment {
    /// Create a segment without a literal index
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    /// Create a segment with a literal index (`name[index]`)
    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }

    /// Field name of the segment
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Literal index embedded in the segment, if any
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Same field name with the given literal index
    pub fn with_index(&self, index: usize) -> Self {
        Self::indexed(self.name.clone(), index)
    }

    fn parse(raw: &str, path: &str) -> Result<Self, DataModelError> {
        let Some(open) = raw.find('[') else {
            if raw.is_empty() {
                return Err(DataModelError::invalid_path(path, "empty segment"));
            }
            if raw.contains(']') {
                return Err(DataModelError::invalid_path(
                    path,
                    format!("unexpected ']' in segment '{raw}'"),
                ));
            }
            return Ok(Self::field(raw));
        };

        let name = &raw[..open];
        if name.is_empty() {
            return Err(DataModelError::invalid_path(
                path,
                format!("segment '{raw}' has an index but no name"),
            ));
        }

        let rest = &raw[open + 1..];
        let Some(digits) = rest.strip_suffix(']') else {
            return Err(DataModelError::invalid_path(
                path,
                format!("segment '{raw}' must end with ']'"),
            ));
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DataModelError::invalid_path(
                path,
                format!("invalid index '{digits}' in segment '{raw}'"),
            ));
        }

        let index = digits.parse::<usize>().map_err(|_| {
            DataModelError::invalid_path(path, format!("index '{digits}' is out of range"))
        })?;

        Ok(Self::indexed(name, index))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.name, index),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Parsed dotted key path. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: SmallVec<[PathSegment; 4]>,
}

impl KeyPath {
    /// Parse a path from its string representation.
    ///
    /// Examples: `"name.value"`, `"friends[0].name.value"`, `"a[1].b[2].c"`
    pub fn parse(path: &str) -> Result<Self, DataModelError> {
        if path.is_empty() {
            return Err(DataModelError::invalid_path(path, "path is empty"));
        }

        let segments = path
            .split('.')
            .map(|raw| PathSegment::parse(raw, path))
            .collect::<Result<SmallVec<_>, _>>()?;

        Ok(Self { segments })
    }

    /// Build a path directly from segments
    pub fn from_segments(segments: impl IntoIterator<Item = PathSegment>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// All segments, in order
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Only true for paths built from an empty segment list
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment of the path
    pub fn leaf(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Split into the containing path and the leaf segment
    pub fn split_leaf(&self) -> Option<(&[PathSegment], &PathSegment)> {
        self.segments
            .split_last()
            .map(|(leaf, parents)| (parents, leaf))
    }

    /// True if any segment carries a literal index
    pub fn has_literal_indices(&self) -> bool {
        self.segments.iter().any(|segment| segment.index.is_some())
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = DataModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for KeyPath {
    type Error = DataModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for KeyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for KeyPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
