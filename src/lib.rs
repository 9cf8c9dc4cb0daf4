//! Forms runtime core
//!
//! Two building blocks shared by the layers that evaluate an application's
//! forms:
//!
//! - [`model`]: resolution of dotted, optionally indexed key paths against a
//!   data instance, either a typed model or plain JSON.
//! - [`layout`]: the immutable component tree parsed from a layout document,
//!   with lookups, traversal and expansion of repeating groups into rows.
//!
//! ```
//! use layout_runtime::{JsonDataModel, LayoutModel, RuntimeConfig};
//! use layout_runtime::model::DataModelAccessor;
//!
//! let layout = LayoutModel::from_json_str(r#"{
//!     "page1": { "data": { "layout": [
//!         { "id": "people", "type": "Group", "children": ["name"], "maxCount": 5,
//!           "dataModelBindings": { "group": "people" } },
//!         { "id": "name", "type": "Input",
//!           "dataModelBindings": { "simpleBinding": "people.name" } }
//!     ] } }
//! }"#)?;
//!
//! let data = JsonDataModel::from_json_str(r#"{"people": [{"name": "Ada"}, {"name": "Grace"}]}"#)?;
//! assert_eq!(data.value_at("people.name", &[1])?.unwrap().to_string(), "Grace");
//!
//! let contexts = layout.component_contexts(&data, &RuntimeConfig::default())?;
//! assert_eq!(contexts[0].children()[0].children().len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod model;

pub use config::RuntimeConfig;
pub use error::{Error, Result};
pub use layout::{Component, ComponentContext, ComponentKind, LayoutError, LayoutModel};
pub use model::{
    DataModel, DataModelAccessor, DataModelError, IndexContext, JsonDataModel, KeyPath,
    ModelValue, ResolutionMode, TypedDataModel,
};
