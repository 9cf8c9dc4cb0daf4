//! Field registry for statically typed data models
//!
//! Each model type declares its fields once through [`ModelShapeBuilder`]. The
//! result is cached in a `static` and maps wire names to typed accessors, so a
//! lookup is a hash probe plus a function call.
//!
//! Wire names follow a fixed priority: an explicit [`rename`], then a
//! [`legacy_rename`], then the raw field name. Matching is exact and case
//! sensitive.
//!
//! [`rename`]: ModelShapeBuilder::rename
//! [`legacy_rename`]: ModelShapeBuilder::legacy_rename
//!
//! [`Lazy`] is re-exported for declaring the cached registry.
//!
//! ```rust,ignore
//! impl DataModel for Name {
//!     fn model_shape() -> &'static ModelShape<Self> {
//!         static SHAPE: Lazy<ModelShape<Name>> = Lazy::new(|| {
//!             ModelShape::<Name>::builder("Name")
//!                 .scalar("Value", |n| &n.value, |n| &mut n.value)
//!                 .rename("value")
//!                 .build()
//!         });
//!         &SHAPE
//!     }
//! }
//! ```

pub use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;

use super::node::{
    ModelCollection, ModelObject, NodeMut, NodeRef, ScalarRef, SettableCollection,
    SettableModelObject,
};

/// A statically typed model with a cached field registry
pub trait DataModel: Send + Sync + Sized + 'static {
    /// Field registry for this type, built once
    fn model_shape() -> &'static ModelShape<Self>;
}

/// Shape of a field's value, used to walk a model without an instance
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Scalar leaf
    Scalar,
    /// Nested object of the given shape
    Object(fn() -> &'static TypeShape),
    /// Collection whose elements have the given shape
    Collection(fn() -> &'static TypeShape),
}

/// Declared field of a model type
#[derive(Debug, Clone)]
pub struct FieldShape {
    field: &'static str,
    rename: Option<&'static str>,
    legacy_rename: Option<&'static str>,
    kind: FieldKind,
}

impl FieldShape {
    /// Raw field name
    pub fn field_name(&self) -> &'static str {
        self.field
    }

    /// Name the field is addressed by in key paths
    pub fn wire_name(&self) -> &'static str {
        self.rename.or(self.legacy_rename).unwrap_or(self.field)
    }

    /// Value shape
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// True for collection fields
    pub fn is_collection(&self) -> bool {
        matches!(self.kind, FieldKind::Collection(_))
    }
}

/// Type-erased shape of a model type
pub struct TypeShape {
    name: &'static str,
    fields: Vec<FieldShape>,
    by_wire_name: HashMap<&'static str, usize>,
}

impl TypeShape {
    fn new(name: &'static str, fields: Vec<FieldShape>) -> Self {
        let mut by_wire_name = HashMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            // First declaration wins when two fields share a wire name
            by_wire_name.entry(field.wire_name()).or_insert(position);
        }
        Self {
            name,
            fields,
            by_wire_name,
        }
    }

    /// Type name, for messages
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }

    /// Field addressed by `wire_name`
    pub fn field(&self, wire_name: &str) -> Option<&FieldShape> {
        self.position(wire_name).map(|position| &self.fields[position])
    }

    fn position(&self, wire_name: &str) -> Option<usize> {
        self.by_wire_name.get(wire_name).copied()
    }
}

impl fmt::Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeShape")
            .field("name", &self.name)
            .field(
                "fields",
                &self.fields.iter().map(FieldShape::wire_name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Field registry of one model type: its shape plus typed accessors
pub struct ModelShape<T> {
    shape: TypeShape,
    accessors: Vec<Box<dyn FieldAccess<T>>>,
}

impl<T: 'static> ModelShape<T> {
    /// Start declaring the fields of `name`
    pub fn builder(name: &'static str) -> ModelShapeBuilder<T> {
        ModelShapeBuilder {
            name,
            fields: Vec::new(),
            accessors: Vec::new(),
        }
    }

    /// Type-erased shape
    pub fn type_shape(&self) -> &TypeShape {
        &self.shape
    }

    fn accessor(&self, wire_name: &str) -> Option<&dyn FieldAccess<T>> {
        self.shape
            .position(wire_name)
            .map(|position| self.accessors[position].as_ref())
    }
}

/// Declares the fields of a model type
pub struct ModelShapeBuilder<T> {
    name: &'static str,
    fields: Vec<FieldShape>,
    accessors: Vec<Box<dyn FieldAccess<T>>>,
}

impl<T: 'static> ModelShapeBuilder<T> {
    fn push(
        mut self,
        field: &'static str,
        kind: FieldKind,
        access: Box<dyn FieldAccess<T>>,
    ) -> Self {
        self.fields.push(FieldShape {
            field,
            rename: None,
            legacy_rename: None,
            kind,
        });
        self.accessors.push(access);
        self
    }

    /// Declare a scalar field (text, number, boolean, or an optional one)
    pub fn scalar<F: ScalarField>(
        self,
        field: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.push(field, FieldKind::Scalar, Box::new(ScalarAccess { get, get_mut }))
    }

    /// Declare an optional nested object
    pub fn object<C: DataModel>(
        self,
        field: &'static str,
        get: fn(&T) -> &Option<C>,
        get_mut: fn(&mut T) -> &mut Option<C>,
    ) -> Self {
        self.push(
            field,
            FieldKind::Object(shape_of::<C>),
            Box::new(ObjectAccess { get, get_mut }),
        )
    }

    /// Declare a collection of nested objects (`Vec<C>` or `Option<Vec<C>>`)
    pub fn collection<L: CollectionField>(
        self,
        field: &'static str,
        get: fn(&T) -> &L,
        get_mut: fn(&mut T) -> &mut L,
    ) -> Self {
        self.push(
            field,
            FieldKind::Collection(shape_of::<L::Element>),
            Box::new(CollectionAccess { get, get_mut }),
        )
    }

    /// Primary wire-name override for the field declared last
    pub fn rename(mut self, wire_name: &'static str) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.rename = Some(wire_name);
        }
        self
    }

    /// Secondary wire-name override for the field declared last.
    /// Ignored when [`rename`](Self::rename) is also set.
    pub fn legacy_rename(mut self, wire_name: &'static str) -> Self {
        if let Some(field) = self.fields.last_mut() {
            field.legacy_rename = Some(wire_name);
        }
        self
    }

    /// Finish the registry
    pub fn build(self) -> ModelShape<T> {
        ModelShape {
            shape: TypeShape::new(self.name, self.fields),
            accessors: self.accessors,
        }
    }
}

fn shape_of<C: DataModel>() -> &'static TypeShape {
    C::model_shape().type_shape()
}

/// Scalar field types a model can declare
pub trait ScalarField: Default + Send + Sync + 'static {
    /// Borrowed scalar, `None` when an optional scalar is unset
    fn scalar(&self) -> Option<ScalarRef<'_>>;
}

impl ScalarField for String {
    fn scalar(&self) -> Option<ScalarRef<'_>> {
        Some(ScalarRef::Str(self))
    }
}

impl ScalarField for Option<String> {
    fn scalar(&self) -> Option<ScalarRef<'_>> {
        self.as_deref().map(ScalarRef::Str)
    }
}

macro_rules! impl_scalar_field {
    ($($ty:ty => $variant:ident($conv:expr)),* $(,)?) => {
        $(
            impl ScalarField for $ty {
                fn scalar(&self) -> Option<ScalarRef<'_>> {
                    Some(ScalarRef::$variant($conv(*self)))
                }
            }

            impl ScalarField for Option<$ty> {
                fn scalar(&self) -> Option<ScalarRef<'_>> {
                    self.map(|value| ScalarRef::$variant($conv(value)))
                }
            }
        )*
    };
}

impl_scalar_field! {
    bool => Boolean(std::convert::identity),
    i32 => Integer(i64::from),
    i64 => Integer(std::convert::identity),
    u32 => Integer(i64::from),
    Decimal => Decimal(std::convert::identity),
}

/// Collection field types a model can declare
pub trait CollectionField: Default + Send + Sync + 'static {
    /// Element model type
    type Element: DataModel;

    /// Elements, `None` when an optional collection is unset
    fn items(&self) -> Option<&Vec<Self::Element>>;

    /// Mutable elements
    fn items_mut(&mut self) -> Option<&mut Vec<Self::Element>>;
}

impl<C: DataModel> CollectionField for Vec<C> {
    type Element = C;

    fn items(&self) -> Option<&Vec<C>> {
        Some(self)
    }

    fn items_mut(&mut self) -> Option<&mut Vec<C>> {
        Some(self)
    }
}

impl<C: DataModel> CollectionField for Option<Vec<C>> {
    type Element = C;

    fn items(&self) -> Option<&Vec<C>> {
        self.as_ref()
    }

    fn items_mut(&mut self) -> Option<&mut Vec<C>> {
        self.as_mut()
    }
}

trait FieldAccess<T>: Send + Sync {
    fn get<'a>(&self, model: &'a T) -> NodeRef<'a>;
    fn get_mut<'a>(&self, model: &'a mut T) -> NodeMut<'a>;
    fn clear(&self, model: &mut T);
}

struct ScalarAccess<T, F> {
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T: 'static, F: ScalarField> FieldAccess<T> for ScalarAccess<T, F> {
    fn get<'a>(&self, model: &'a T) -> NodeRef<'a> {
        match (self.get)(model).scalar() {
            Some(scalar) => NodeRef::Scalar(scalar),
            None => NodeRef::Null,
        }
    }

    fn get_mut<'a>(&self, model: &'a mut T) -> NodeMut<'a> {
        match (self.get_mut)(model).scalar() {
            Some(_) => NodeMut::Scalar,
            None => NodeMut::Null,
        }
    }

    fn clear(&self, model: &mut T) {
        *(self.get_mut)(model) = F::default();
    }
}

struct ObjectAccess<T, C> {
    get: fn(&T) -> &Option<C>,
    get_mut: fn(&mut T) -> &mut Option<C>,
}

impl<T: 'static, C: DataModel> FieldAccess<T> for ObjectAccess<T, C> {
    fn get<'a>(&self, model: &'a T) -> NodeRef<'a> {
        match (self.get)(model) {
            Some(child) => NodeRef::Object(child),
            None => NodeRef::Null,
        }
    }

    fn get_mut<'a>(&self, model: &'a mut T) -> NodeMut<'a> {
        match (self.get_mut)(model) {
            Some(child) => NodeMut::Object(child),
            None => NodeMut::Null,
        }
    }

    fn clear(&self, model: &mut T) {
        *(self.get_mut)(model) = None;
    }
}

struct CollectionAccess<T, L> {
    get: fn(&T) -> &L,
    get_mut: fn(&mut T) -> &mut L,
}

impl<T: 'static, L: CollectionField> FieldAccess<T> for CollectionAccess<T, L> {
    fn get<'a>(&self, model: &'a T) -> NodeRef<'a> {
        match (self.get)(model).items() {
            Some(items) => NodeRef::Collection(items),
            None => NodeRef::Null,
        }
    }

    fn get_mut<'a>(&self, model: &'a mut T) -> NodeMut<'a> {
        match (self.get_mut)(model).items_mut() {
            Some(items) => NodeMut::Collection(items),
            None => NodeMut::Null,
        }
    }

    fn clear(&self, model: &mut T) {
        *(self.get_mut)(model) = L::default();
    }
}

impl<T: DataModel> ModelObject for T {
    fn type_shape(&self) -> Option<&'static TypeShape> {
        Some(T::model_shape().type_shape())
    }

    fn field(&self, name: &str) -> Option<NodeRef<'_>> {
        T::model_shape()
            .accessor(name)
            .map(|access| access.get(self))
    }
}

impl<T: DataModel> SettableModelObject for T {
    fn field_mut(&mut self, name: &str) -> Option<NodeMut<'_>> {
        let access = T::model_shape().accessor(name)?;
        Some(access.get_mut(self))
    }

    fn clear_field(&mut self, name: &str) -> bool {
        match T::model_shape().accessor(name) {
            Some(access) => {
                access.clear(self);
                true
            }
            None => false,
        }
    }
}

impl<C: DataModel> ModelCollection for Vec<C> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn element(&self, index: usize) -> Option<NodeRef<'_>> {
        self.get(index).map(|item| NodeRef::Object(item))
    }
}

impl<C: DataModel> SettableCollection for Vec<C> {
    fn element_mut(&mut self, index: usize) -> Option<NodeMut<'_>> {
        self.get_mut(index).map(|item| NodeMut::Object(item))
    }
}
