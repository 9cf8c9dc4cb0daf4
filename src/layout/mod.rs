//! Component tree of a form layout
//!
//! A layout document maps page names to pages of components. It is parsed
//! once into an immutable tree of [`Component`]s, which can then be looked
//! up by page and id, traversed, and expanded into per-row
//! [`ComponentContext`]s against a data instance.

#![warn(missing_docs)]

pub mod builder;
pub mod component;
pub mod context;
pub mod error;
pub mod tree;

pub use component::{
    AppOption, Component, ComponentKind, GROUP_BINDING, LayoutExpression, OptionSource,
    SIMPLE_BINDING,
};
pub use context::ComponentContext;
pub use error::LayoutError;
pub use tree::{Components, LayoutModel};
