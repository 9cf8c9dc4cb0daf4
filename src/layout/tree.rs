//! The immutable component tree of one layout set

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use std::io::Read;
use std::slice;
use std::sync::Arc;

use super::builder::build_pages;
use super::component::Component;
use super::context::ComponentContext;
use super::error::{LayoutError, Result};
use crate::error::Error;
use crate::model::{DataModelAccessor, ModelValue, ResolutionMode};

/// All pages of a layout set, in document order.
///
/// Built once per load and never mutated afterwards, so one instance can be
/// shared between any number of concurrent evaluations.
#[derive(Debug, Clone, Default)]
pub struct LayoutModel {
    pages: IndexMap<String, Arc<Component>>,
}

impl LayoutModel {
    /// Build from a parsed layout document
    pub fn from_value(document: JsonValue) -> Result<Self> {
        Ok(Self {
            pages: build_pages(document)?,
        })
    }

    /// Parse and build a layout document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Read, parse and build a layout document
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    /// Page roots in document order
    pub fn pages(&self) -> impl Iterator<Item = &Arc<Component>> {
        self.pages.values()
    }

    /// Page names in document order
    pub fn page_names(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// Page root by name
    pub fn page(&self, name: &str) -> Result<&Arc<Component>> {
        self.pages.get(name).ok_or_else(|| LayoutError::UnknownPage {
            page: name.to_string(),
        })
    }

    /// Component by page name and id
    pub fn get_component(&self, page: &str, id: &str) -> Result<&Arc<Component>> {
        self.page(page)?
            .descendant(id)
            .ok_or_else(|| LayoutError::UnknownComponent {
                page: page.to_string(),
                component: id.to_string(),
            })
    }

    /// Every page and component, depth first.
    ///
    /// Pages come in document order, each followed by its components in
    /// pre-order; siblings keep their declaration order.
    pub fn components(&self) -> Components<'_> {
        Components {
            pages: self.pages.values(),
            stack: Vec::new(),
        }
    }

    /// Target of a summary component
    pub fn summary_target(&self, summary: &Component) -> Result<&Arc<Component>> {
        let (page, component) =
            summary
                .summary_refs()
                .ok_or_else(|| LayoutError::NotASummary {
                    component: summary.id().to_string(),
                })?;
        self.get_component(page, component)
    }

    /// Read the `simpleBinding` of a component on the same page as `context`,
    /// using the row indices of `context`.
    ///
    /// Lookups from a group context are rejected, since a group has no single
    /// row to read its siblings in.
    pub fn resolve_sibling_binding(
        &self,
        context: &ComponentContext,
        sibling_id: &str,
        accessor: &dyn DataModelAccessor,
        mode: ResolutionMode,
    ) -> std::result::Result<Option<ModelValue>, Error> {
        let component = context.component();
        if component.is_group() {
            return Err(LayoutError::GroupContextLookup {
                component: component.id().to_string(),
            }
            .into());
        }

        let page = component.page();
        let sibling = self.get_component(&page, sibling_id)?;
        let binding = sibling
            .simple_binding()
            .ok_or_else(|| LayoutError::MissingSimpleBinding {
                page: page.clone(),
                component: sibling_id.to_string(),
            })?;

        Ok(accessor.get_model_data(binding, context.row_indices(), mode)?)
    }
}

impl<'de> Deserialize<'de> for LayoutModel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let document = JsonValue::deserialize(deserializer)?;
        LayoutModel::from_value(document).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a LayoutModel {
    type Item = &'a Arc<Component>;
    type IntoIter = Components<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.components()
    }
}

/// Depth-first iterator over a [`LayoutModel`]
#[derive(Debug, Clone)]
pub struct Components<'a> {
    pages: indexmap::map::Values<'a, String, Arc<Component>>,
    stack: Vec<slice::Iter<'a, Arc<Component>>>,
}

impl<'a> Iterator for Components<'a> {
    type Item = &'a Arc<Component>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(siblings) = self.stack.last_mut() {
            match siblings.next() {
                Some(component) => {
                    self.stack.push(component.children().iter());
                    return Some(component);
                }
                None => {
                    self.stack.pop();
                }
            }
        }

        let page = self.pages.next()?;
        self.stack.push(page.children().iter());
        Some(page)
    }
}

impl std::iter::FusedIterator for Components<'_> {}
