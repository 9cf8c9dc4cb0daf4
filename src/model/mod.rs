//! Key path resolution over application data models
//!
//! This module provides the key path and ambient index types, the accessor
//! contract, and its two implementations: one over statically typed models
//! with a cached field registry, and one over schema-free JSON.

#![warn(missing_docs)]

pub mod accessor;
pub mod error;
pub mod indices;
pub mod json;
pub mod node;
pub mod path;
pub(crate) mod resolve;
pub mod shape;
pub mod typed;
pub mod value;

pub use accessor::{DataModelAccessor, ResolutionMode};
pub use error::{DataModelError, Result};
pub use indices::IndexContext;
pub use json::JsonDataModel;
pub use node::{
    ModelCollection, ModelObject, NodeMut, NodeRef, ScalarRef, SettableCollection,
    SettableModelObject,
};
pub use path::{KeyPath, PathSegment};
pub use shape::{
    CollectionField, DataModel, FieldKind, FieldShape, Lazy, ModelShape, ModelShapeBuilder,
    ScalarField, TypeShape,
};
pub use typed::TypedDataModel;
pub use value::ModelValue;
