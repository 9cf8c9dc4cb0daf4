//! Accessor over schema-free JSON data
//!
//! Shared test suites describe their data models as plain JSON, which has no
//! static shape. Reads follow the same resolution rules as typed models;
//! [`add_indices`](DataModelAccessor::add_indices) and
//! [`remove_field`](DataModelAccessor::remove_field) are unsupported.

use serde_json::Value as JsonValue;

use super::accessor::{DataModelAccessor, ResolutionMode, read_count, read_value};
use super::error::{DataModelError, Result};
use super::indices::IndexContext;
use super::node::NodeRef;
use super::path::KeyPath;
use super::value::ModelValue;

/// Wraps an optional JSON document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonDataModel {
    root: Option<JsonValue>,
}

impl JsonDataModel {
    /// Wrap a document, or nothing at all
    pub fn new(root: Option<JsonValue>) -> Self {
        Self { root }
    }

    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        Ok(Self::new(Some(serde_json::from_str(json)?)))
    }

    /// The wrapped document
    pub fn root(&self) -> Option<&JsonValue> {
        self.root.as_ref()
    }
}

impl From<JsonValue> for JsonDataModel {
    fn from(root: JsonValue) -> Self {
        Self::new(Some(root))
    }
}

impl DataModelAccessor for JsonDataModel {
    fn get_model_data(
        &self,
        path: &KeyPath,
        indices: &IndexContext,
        mode: ResolutionMode,
    ) -> Result<Option<ModelValue>> {
        match &self.root {
            Some(root) => read_value(NodeRef::from_json(root), path, indices, mode),
            None => Ok(None),
        }
    }

    fn get_model_data_count(
        &self,
        path: &KeyPath,
        indices: &IndexContext,
        mode: ResolutionMode,
    ) -> Result<Option<usize>> {
        match &self.root {
            Some(root) => read_count(NodeRef::from_json(root), path, indices, mode),
            None => Ok(None),
        }
    }

    fn add_indices(&self, _path: &KeyPath, _indices: &IndexContext) -> Result<KeyPath> {
        Err(DataModelError::unsupported(
            "a JSON data model has no schema to add indices from",
        ))
    }

    fn remove_field(&mut self, _path: &KeyPath, _mode: ResolutionMode) -> Result<()> {
        Err(DataModelError::unsupported(
            "fields cannot be removed from a JSON data model",
        ))
    }
}
