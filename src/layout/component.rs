//! Component nodes of a parsed layout

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use crate::model::KeyPath;

/// Binding role read by sibling lookups and value reads
pub const SIMPLE_BINDING: &str = "simpleBinding";
/// Binding role of a repeating group's collection
pub const GROUP_BINDING: &str = "group";

/// An expression attached to a component (`hidden`, `required`).
///
/// Kept as the raw JSON it was declared with; evaluating it is up to the
/// expression layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutExpression(JsonValue);

impl LayoutExpression {
    /// Wrap a raw expression document
    pub fn new(raw: JsonValue) -> Self {
        Self(raw)
    }

    /// The raw expression document
    pub fn raw(&self) -> &JsonValue {
        &self.0
    }

    /// The constant boolean this expression is, if it is one
    pub fn as_constant(&self) -> Option<bool> {
        self.0.as_bool()
    }
}

/// One inline option of an options-bearing component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppOption {
    /// Stored value
    #[serde(deserialize_with = "option_value")]
    pub value: String,
    /// Display label, usually a text resource key
    #[serde(default)]
    pub label: String,
}

// Option values are strings on the wire, but numbers and booleans are common
// in hand-written layouts.
fn option_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "option value must be a string, number or boolean, found {other}"
        ))),
    }
}

/// Where an options-bearing component gets its options from
#[derive(Debug, Clone, PartialEq)]
pub enum OptionSource {
    /// Options resolved elsewhere by id
    Reference {
        /// Option list id
        option_id: String,
        /// Whether the list must be resolved with the instance's access rights
        secure: bool,
    },
    /// Options declared inline
    Literal(Vec<AppOption>),
}

/// Variant-specific parts of a component
#[derive(Debug)]
pub enum ComponentKind {
    /// Any component type without special structure
    Base,
    /// A non-repeating group
    Group {
        /// Owned children in declaration order
        children: Vec<Arc<Component>>,
    },
    /// A group rendered once per element of its `group` binding
    RepeatingGroup {
        /// Owned children in declaration order
        children: Vec<Arc<Component>>,
        /// Maximum number of rows, always greater than one
        max_count: u32,
    },
    /// Root of one page
    Page {
        /// Top-level components in declaration order
        children: Vec<Arc<Component>>,
        /// Every descendant by id
        lookup: HashMap<String, Arc<Component>>,
    },
    /// Summary of another component, referenced by id
    Summary {
        /// Id of the summarised component
        component_ref: String,
        /// Page of the summarised component
        page_ref: String,
    },
    /// Checkboxes, radio buttons or dropdown
    Options(OptionSource),
}

/// A node of the component tree.
///
/// Parents are linked once after the owning page is built and are never
/// owning references.
pub struct Component {
    pub(crate) id: String,
    pub(crate) component_type: String,
    pub(crate) parent: OnceLock<Weak<Component>>,
    pub(crate) data_model_bindings: IndexMap<String, KeyPath>,
    pub(crate) hidden: Option<LayoutExpression>,
    pub(crate) required: Option<LayoutExpression>,
    pub(crate) extra: IndexMap<String, JsonValue>,
    pub(crate) kind: ComponentKind,
}

impl Component {
    /// Component id, unique within its page
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Declared type tag, as written in the layout
    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    /// Variant-specific parts
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// The enclosing group or page; `None` for pages
    pub fn parent(&self) -> Option<Arc<Component>> {
        self.parent.get().and_then(Weak::upgrade)
    }

    /// Id of the page this component belongs to
    pub fn page(&self) -> String {
        let mut page = self.id.clone();
        let mut current = self.parent();
        while let Some(node) = current {
            page = node.id.clone();
            current = node.parent();
        }
        page
    }

    /// All bindings by role
    pub fn data_model_bindings(&self) -> &IndexMap<String, KeyPath> {
        &self.data_model_bindings
    }

    /// Binding of one role
    pub fn binding(&self, role: &str) -> Option<&KeyPath> {
        self.data_model_bindings.get(role)
    }

    /// The `simpleBinding` role
    pub fn simple_binding(&self) -> Option<&KeyPath> {
        self.binding(SIMPLE_BINDING)
    }

    /// `hidden` expression
    pub fn hidden(&self) -> Option<&LayoutExpression> {
        self.hidden.as_ref()
    }

    /// `required` expression
    pub fn required(&self) -> Option<&LayoutExpression> {
        self.required.as_ref()
    }

    /// Properties this core does not interpret, verbatim
    pub fn extra(&self) -> &IndexMap<String, JsonValue> {
        &self.extra
    }

    /// Owned children; empty for anything but groups and pages
    pub fn children(&self) -> &[Arc<Component>] {
        match &self.kind {
            ComponentKind::Group { children }
            | ComponentKind::RepeatingGroup { children, .. }
            | ComponentKind::Page { children, .. } => children,
            ComponentKind::Base | ComponentKind::Summary { .. } | ComponentKind::Options(_) => &[],
        }
    }

    /// True for groups, repeating groups and pages
    pub fn is_group(&self) -> bool {
        matches!(
            self.kind,
            ComponentKind::Group { .. }
                | ComponentKind::RepeatingGroup { .. }
                | ComponentKind::Page { .. }
        )
    }

    /// True for pages
    pub fn is_page(&self) -> bool {
        matches!(self.kind, ComponentKind::Page { .. })
    }

    /// Row limit of a repeating group
    pub fn max_count(&self) -> Option<u32> {
        match self.kind {
            ComponentKind::RepeatingGroup { max_count, .. } => Some(max_count),
            _ => None,
        }
    }

    /// Option source of an options-bearing component
    pub fn option_source(&self) -> Option<&OptionSource> {
        match &self.kind {
            ComponentKind::Options(source) => Some(source),
            _ => None,
        }
    }

    /// `(page_ref, component_ref)` of a summary
    pub fn summary_refs(&self) -> Option<(&str, &str)> {
        match &self.kind {
            ComponentKind::Summary {
                component_ref,
                page_ref,
            } => Some((page_ref, component_ref)),
            _ => None,
        }
    }

    /// Descendant of a page by id
    pub fn descendant(&self, id: &str) -> Option<&Arc<Component>> {
        match &self.kind {
            ComponentKind::Page { lookup, .. } => lookup.get(id),
            _ => None,
        }
    }

    /// Number of descendants indexed by a page
    pub fn descendant_count(&self) -> usize {
        match &self.kind {
            ComponentKind::Page { lookup, .. } => lookup.len(),
            _ => 0,
        }
    }

    pub(crate) fn link_parent(self: &Arc<Self>) {
        for child in self.children() {
            // Components are linked exactly once, right after their page is built
            let _ = child.parent.set(Arc::downgrade(self));
            child.link_parent();
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Component");
        debug
            .field("id", &self.id)
            .field("type", &self.component_type);
        if !self.data_model_bindings.is_empty() {
            debug.field("bindings", &self.data_model_bindings);
        }
        match &self.kind {
            ComponentKind::Base => {}
            ComponentKind::Group { children } | ComponentKind::Page { children, .. } => {
                debug.field("children", children);
            }
            ComponentKind::RepeatingGroup {
                children,
                max_count,
            } => {
                debug.field("max_count", max_count).field("children", children);
            }
            ComponentKind::Summary {
                component_ref,
                page_ref,
            } => {
                debug
                    .field("page_ref", page_ref)
                    .field("component_ref", component_ref);
            }
            ComponentKind::Options(source) => {
                debug.field("options", source);
            }
        }
        debug.finish_non_exhaustive()
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.component_type)
    }
}
