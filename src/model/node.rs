//! Traversal states and the capabilities a model exposes to the resolver
//!
//! Reading goes through [`ModelObject`] and [`ModelCollection`]. Clearing a
//! leaf needs the separate settable capability ([`SettableModelObject`],
//! [`SettableCollection`]), which schema-free models do not implement.

use serde_json::{Map, Value as JsonValue};

use super::shape::TypeShape;
use super::value::ModelValue;

/// Read-only view of one position in a data model
#[derive(Clone, Copy)]
pub enum NodeRef<'a> {
    /// Absent value (unset option, JSON null)
    Null,
    /// Scalar leaf; text is always a scalar even though it is iterable
    Scalar(ScalarRef<'a>),
    /// Named-field container
    Object(&'a dyn ModelObject),
    /// Ordered sequence of nodes
    Collection(&'a dyn ModelCollection),
}

/// Borrowed scalar, converted to a [`ModelValue`] only when returned
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    /// Text
    Str(&'a str),
    /// Integer
    Integer(i64),
    /// Decimal
    Decimal(rust_decimal::Decimal),
    /// Boolean
    Boolean(bool),
    /// JSON number or other JSON scalar
    Json(&'a JsonValue),
}

impl ScalarRef<'_> {
    /// Owned value for this scalar
    pub fn to_value(self) -> Option<ModelValue> {
        match self {
            ScalarRef::Str(s) => Some(ModelValue::String(s.to_string())),
            ScalarRef::Integer(i) => Some(ModelValue::Integer(i)),
            ScalarRef::Decimal(d) => Some(ModelValue::Decimal(d)),
            ScalarRef::Boolean(b) => Some(ModelValue::Boolean(b)),
            ScalarRef::Json(json) => ModelValue::from_json(json),
        }
    }
}

impl<'a> NodeRef<'a> {
    /// Classify a JSON value
    pub fn from_json(value: &'a JsonValue) -> Self {
        match value {
            JsonValue::Null => NodeRef::Null,
            JsonValue::Object(map) => NodeRef::Object(map),
            JsonValue::Array(items) => NodeRef::Collection(items),
            scalar => NodeRef::Scalar(ScalarRef::Json(scalar)),
        }
    }

    /// Short kind name, for logs and messages
    pub fn kind(&self) -> &'static str {
        match self {
            NodeRef::Null => "null",
            NodeRef::Scalar(_) => "scalar",
            NodeRef::Object(_) => "object",
            NodeRef::Collection(_) => "collection",
        }
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRef::Null => write!(f, "Null"),
            NodeRef::Scalar(scalar) => f.debug_tuple("Scalar").field(scalar).finish(),
            NodeRef::Object(object) => match object.type_shape() {
                Some(shape) => write!(f, "Object({})", shape.name()),
                None => write!(f, "Object"),
            },
            NodeRef::Collection(items) => write!(f, "Collection(len={})", items.len()),
        }
    }
}

/// Mutable view of one position in a settable data model
pub enum NodeMut<'a> {
    /// Absent value
    Null,
    /// Scalar leaf
    Scalar,
    /// Named-field container
    Object(&'a mut dyn SettableModelObject),
    /// Ordered sequence of nodes
    Collection(&'a mut dyn SettableCollection),
}

/// Read capability of a named-field container
pub trait ModelObject: Send + Sync {
    /// Static shape of the object, when the model has one
    fn type_shape(&self) -> Option<&'static TypeShape>;

    /// Child addressed by its wire name. `None` when no such field exists.
    fn field(&self, name: &str) -> Option<NodeRef<'_>>;
}

/// Read capability of an ordered collection
pub trait ModelCollection: Send + Sync {
    /// Number of elements
    fn len(&self) -> usize;

    /// Element at `index`
    fn element(&self, index: usize) -> Option<NodeRef<'_>>;

    /// True when there are no elements
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Settable-leaf capability of a named-field container
pub trait SettableModelObject: ModelObject {
    /// Mutable child addressed by its wire name
    fn field_mut(&mut self, name: &str) -> Option<NodeMut<'_>>;

    /// Reset the named field to its empty value. Returns false for unknown fields.
    fn clear_field(&mut self, name: &str) -> bool;
}

/// Settable capability of a collection
pub trait SettableCollection: ModelCollection {
    /// Mutable element at `index`
    fn element_mut(&mut self, index: usize) -> Option<NodeMut<'_>>;
}

impl ModelObject for Map<String, JsonValue> {
    fn type_shape(&self) -> Option<&'static TypeShape> {
        None
    }

    fn field(&self, name: &str) -> Option<NodeRef<'_>> {
        self.get(name).map(NodeRef::from_json)
    }
}

impl ModelCollection for Vec<JsonValue> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn element(&self, index: usize) -> Option<NodeRef<'_>> {
        self.get(index).map(NodeRef::from_json)
    }
}
