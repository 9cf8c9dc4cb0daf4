//! Components placed in repeating-group rows
//!
//! Layout components are declared once, but a component inside a repeating
//! group is shown once per row of the group's collection. Expanding the tree
//! against a data instance gives every such occurrence its own context that
//! carries the row indices needed to read its bindings.

use std::sync::Arc;

use super::component::{Component, ComponentKind, GROUP_BINDING};
use super::tree::LayoutModel;
use crate::config::RuntimeConfig;
use crate::model::{
    DataModelAccessor, DataModelError, IndexContext, KeyPath, ModelValue, Result,
};

/// One occurrence of a component, with the rows it is placed in
#[derive(Debug, Clone)]
pub struct ComponentContext {
    component: Arc<Component>,
    row_indices: IndexContext,
    children: Vec<ComponentContext>,
}

impl ComponentContext {
    /// A context without children
    pub fn new(component: Arc<Component>, row_indices: IndexContext) -> Self {
        Self {
            component,
            row_indices,
            children: Vec::new(),
        }
    }

    /// The component
    pub fn component(&self) -> &Arc<Component> {
        &self.component
    }

    /// Row index of every enclosing repeating group, outermost first
    pub fn row_indices(&self) -> &IndexContext {
        &self.row_indices
    }

    /// Child contexts. For a repeating group these are its children once
    /// per row, row by row.
    pub fn children(&self) -> &[ComponentContext] {
        &self.children
    }

    /// This context and all below it, depth first
    pub fn descendants(&self) -> Vec<&ComponentContext> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }

    /// A binding of the component with this context's rows filled in.
    ///
    /// Accessors that cannot add indices give the declared path unchanged.
    pub fn binding(&self, role: &str, accessor: &dyn DataModelAccessor) -> Result<Option<KeyPath>> {
        let Some(path) = self.component.binding(role) else {
            return Ok(None);
        };
        match accessor.add_indices(path, &self.row_indices) {
            Ok(indexed) => Ok(Some(indexed)),
            Err(DataModelError::Unsupported { .. }) => Ok(Some(path.clone())),
            Err(err) => Err(err),
        }
    }

    /// Value of the component's `simpleBinding` in this context
    pub fn value(
        &self,
        accessor: &dyn DataModelAccessor,
        config: &RuntimeConfig,
    ) -> Result<Option<ModelValue>> {
        match self.component.simple_binding() {
            Some(path) => accessor.get_model_data(path, &self.row_indices, config.resolution_mode),
            None => Ok(None),
        }
    }
}

impl LayoutModel {
    /// Expand every page against a data instance, one context tree per page
    pub fn component_contexts(
        &self,
        accessor: &dyn DataModelAccessor,
        config: &RuntimeConfig,
    ) -> Result<Vec<ComponentContext>> {
        let contexts = self
            .pages()
            .map(|page| expand(page, accessor, &IndexContext::empty(), config))
            .collect::<Result<Vec<_>>>()?;
        log::debug!(
            "expanded {} pages into {} component contexts",
            contexts.len(),
            contexts.iter().map(|c| c.descendants().len()).sum::<usize>()
        );
        Ok(contexts)
    }
}

fn expand(
    component: &Arc<Component>,
    accessor: &dyn DataModelAccessor,
    indices: &IndexContext,
    config: &RuntimeConfig,
) -> Result<ComponentContext> {
    let mut children = Vec::new();

    match component.kind() {
        ComponentKind::RepeatingGroup { children: members, max_count } => {
            let rows = match component.binding(GROUP_BINDING) {
                Some(path) => accessor
                    .get_model_data_count(path, indices, config.resolution_mode)?
                    .unwrap_or(0),
                None => 0,
            };
            let rows = if config.clamp_to_max_count && rows > *max_count as usize {
                log::warn!(
                    "repeating group '{}' has {} rows but maxCount {}; extra rows ignored",
                    component.id(),
                    rows,
                    max_count
                );
                *max_count as usize
            } else {
                rows
            };

            for row in 0..rows {
                let row_indices = indices.with_row(row);
                for member in members {
                    children.push(expand(member, accessor, &row_indices, config)?);
                }
            }
        }
        ComponentKind::Group { children: members }
        | ComponentKind::Page {
            children: members, ..
        } => {
            for member in members {
                children.push(expand(member, accessor, indices, config)?);
            }
        }
        ComponentKind::Base | ComponentKind::Summary { .. } | ComponentKind::Options(_) => {}
    }

    Ok(ComponentContext {
        component: Arc::clone(component),
        row_indices: indices.clone(),
        children,
    })
}
