//! The data model accessor contract

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{DataModelError, Result};
use super::indices::IndexContext;
use super::node::NodeRef;
use super::path::KeyPath;
use super::resolve::resolve;
use super::value::ModelValue;

/// How unresolved paths (unknown field, missing index, index out of range) are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Unresolved paths produce `Ok(None)`
    #[default]
    Lenient,
    /// Unresolved paths produce an error
    Strict,
}

impl ResolutionMode {
    /// True in strict mode
    pub fn is_strict(self) -> bool {
        matches!(self, ResolutionMode::Strict)
    }

    /// Turn unresolved errors into `None` unless strict
    pub(crate) fn settle<T>(self, path: &KeyPath, result: Result<Option<T>>) -> Result<Option<T>> {
        match result {
            Err(err) if err.is_unresolved() && !self.is_strict() => {
                log::trace!("'{path}' did not resolve: {err}");
                Ok(None)
            }
            other => other,
        }
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionMode::Lenient => write!(f, "lenient"),
            ResolutionMode::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for ResolutionMode {
    type Err = DataModelError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(ResolutionMode::Lenient),
            "strict" => Ok(ResolutionMode::Strict),
            _ => Err(DataModelError::unsupported(format!(
                "unknown resolution mode '{s}'"
            ))),
        }
    }
}

/// Access to one wrapped data instance through key paths.
///
/// Literal indices in a path override ambient indices, and once one is used
/// the remaining ambient indices are dropped: when both `Bedrifter` and
/// `Ansatte` are collections, `"Bedrifter[1].Ansatte.Alder"` with ambient
/// indices does not resolve.
pub trait DataModelAccessor: Send + Sync {
    /// Scalar at `path`. Structured nodes and collections give `None`.
    fn get_model_data(
        &self,
        path: &KeyPath,
        indices: &IndexContext,
        mode: ResolutionMode,
    ) -> Result<Option<ModelValue>>;

    /// Element count when `path` resolves to a collection, `None` otherwise
    fn get_model_data_count(
        &self,
        path: &KeyPath,
        indices: &IndexContext,
        mode: ResolutionMode,
    ) -> Result<Option<usize>>;

    /// Rewrite a binding declared against the model's shape into a path with
    /// literal indices for its collection segments.
    ///
    /// `"bedrift.ansatte.navn"` with indices `[1, 2]` gives
    /// `"bedrift[1].ansatte[2].navn"`.
    fn add_indices(&self, path: &KeyPath, indices: &IndexContext) -> Result<KeyPath>;

    /// Reset the field at `path` to its empty value
    fn remove_field(&mut self, path: &KeyPath, mode: ResolutionMode) -> Result<()>;

    /// Parse `path` and read it leniently
    fn value_at(&self, path: &str, indices: &[usize]) -> Result<Option<ModelValue>> {
        let path = KeyPath::parse(path)?;
        self.get_model_data(&path, &IndexContext::new(indices), ResolutionMode::Lenient)
    }

    /// Parse `path` and count it leniently
    fn count_at(&self, path: &str, indices: &[usize]) -> Result<Option<usize>> {
        let path = KeyPath::parse(path)?;
        self.get_model_data_count(&path, &IndexContext::new(indices), ResolutionMode::Lenient)
    }
}

/// Scalar read over any root node
pub(crate) fn read_value(
    root: NodeRef<'_>,
    path: &KeyPath,
    indices: &IndexContext,
    mode: ResolutionMode,
) -> Result<Option<ModelValue>> {
    let mut ambient = indices.clone();
    let resolved = resolve(root, path, path.segments(), &mut ambient).map(|node| match node {
        NodeRef::Scalar(scalar) => scalar.to_value(),
        NodeRef::Null | NodeRef::Object(_) | NodeRef::Collection(_) => None,
    });
    mode.settle(path, resolved)
}

/// Collection count over any root node
pub(crate) fn read_count(
    root: NodeRef<'_>,
    path: &KeyPath,
    indices: &IndexContext,
    mode: ResolutionMode,
) -> Result<Option<usize>> {
    let mut ambient = indices.clone();
    let resolved = resolve(root, path, path.segments(), &mut ambient).map(|node| match node {
        NodeRef::Collection(items) => Some(items.len()),
        NodeRef::Null | NodeRef::Scalar(_) | NodeRef::Object(_) => None,
    });
    mode.settle(path, resolved)
}
