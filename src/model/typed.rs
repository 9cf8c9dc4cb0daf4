//! Accessor over statically typed model instances

use super::accessor::{DataModelAccessor, ResolutionMode, read_count, read_value};
use super::error::{DataModelError, Result};
use super::indices::IndexContext;
use super::node::{NodeMut, NodeRef};
use super::path::KeyPath;
use super::resolve::{add_indices, resolve_mut};
use super::shape::DataModel;
use super::value::ModelValue;

/// Wraps one typed model instance for the duration of an evaluation
#[derive(Debug, Clone, Default)]
pub struct TypedDataModel<T> {
    model: T,
}

impl<T: DataModel> TypedDataModel<T> {
    /// Wrap an instance
    pub fn new(model: T) -> Self {
        Self { model }
    }

    /// The wrapped instance
    pub fn model(&self) -> &T {
        &self.model
    }

    /// The wrapped instance, mutably
    pub fn model_mut(&mut self) -> &mut T {
        &mut self.model
    }

    /// Unwrap the instance
    pub fn into_inner(self) -> T {
        self.model
    }
}

impl<T: DataModel> DataModelAccessor for TypedDataModel<T> {
    fn get_model_data(
        &self,
        path: &KeyPath,
        indices: &IndexContext,
        mode: ResolutionMode,
    ) -> Result<Option<ModelValue>> {
        read_value(NodeRef::Object(&self.model), path, indices, mode)
    }

    fn get_model_data_count(
        &self,
        path: &KeyPath,
        indices: &IndexContext,
        mode: ResolutionMode,
    ) -> Result<Option<usize>> {
        read_count(NodeRef::Object(&self.model), path, indices, mode)
    }

    fn add_indices(&self, path: &KeyPath, indices: &IndexContext) -> Result<KeyPath> {
        add_indices(T::model_shape().type_shape(), path, indices)
    }

    fn remove_field(&mut self, path: &KeyPath, mode: ResolutionMode) -> Result<()> {
        let Some((parents, leaf)) = path.split_leaf() else {
            return Ok(());
        };

        if leaf.index().is_some() {
            return Err(DataModelError::unsupported(format!(
                "removing an element of a collection is not implemented ('{path}')"
            )));
        }

        let container = match resolve_mut(&mut self.model, path, parents) {
            Ok(container) => container,
            Err(err) if err.is_unresolved() && !mode.is_strict() => {
                log::trace!("container of '{path}' did not resolve: {err}");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        match container {
            // Already empty
            NodeMut::Null => Ok(()),
            NodeMut::Collection(_) => Err(DataModelError::unsupported(format!(
                "tried to remove field '{path}', which ended in a collection"
            ))),
            NodeMut::Scalar => unknown_leaf(path, leaf.name(), mode),
            NodeMut::Object(object) => {
                if object.clear_field(leaf.name()) {
                    log::debug!("cleared '{path}'");
                    Ok(())
                } else {
                    unknown_leaf(path, leaf.name(), mode)
                }
            }
        }
    }
}

fn unknown_leaf(path: &KeyPath, field: &str, mode: ResolutionMode) -> Result<()> {
    if mode.is_strict() {
        Err(DataModelError::unknown_field(path.to_string(), field))
    } else {
        Ok(())
    }
}

impl<T: DataModel> From<T> for TypedDataModel<T> {
    fn from(model: T) -> Self {
        Self::new(model)
    }
}
