//! Layout document parser
//!
//! Pages are built in one forward pass over each page's `layout` array. A
//! group pulls its children out of the same stream of components, so nested
//! groups are parsed recursively and every structural check happens while the
//! tree is being built.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use super::component::{
    AppOption, Component, ComponentKind, GROUP_BINDING, LayoutExpression, OptionSource,
};
use super::error::{LayoutError, Result};
use crate::model::KeyPath;

/// Component properties interpreted by the builder, matched case-insensitively
const KNOWN_PROPERTIES: &[&str] = &[
    "id",
    "type",
    "dataModelBindings",
    "children",
    "maxCount",
    "hidden",
    "required",
    "componentRef",
    "pageRef",
    "optionId",
    "options",
    "secure",
];

/// Build every page of a layout document, in document order
pub fn build_pages(document: JsonValue) -> Result<IndexMap<String, Arc<Component>>> {
    let pages = match document {
        JsonValue::Object(pages) => pages,
        other => {
            return Err(LayoutError::unexpected(
                "layout document",
                "an object of pages",
                json_kind(&other),
            ));
        }
    };

    let mut built = IndexMap::with_capacity(pages.len());
    for (name, body) in pages {
        let page = read_page(&name, body)?;
        log::debug!(
            "parsed layout page '{}' with {} components",
            name,
            page.descendant_count()
        );
        built.insert(name, page);
    }
    Ok(built)
}

fn read_page(name: &str, body: JsonValue) -> Result<Arc<Component>> {
    let body = match body {
        JsonValue::Object(body) => body,
        other => {
            return Err(LayoutError::unexpected(
                format!("page \"{name}\""),
                "an object",
                json_kind(&other),
            ));
        }
    };

    let mut extra = IndexMap::new();
    let mut data = None;
    for (key, value) in body {
        if key.eq_ignore_ascii_case("data") {
            data = Some(value);
        } else {
            extra.insert(key, value);
        }
    }

    let data = match data {
        Some(JsonValue::Object(data)) => data,
        Some(other) => {
            return Err(LayoutError::unexpected(
                format!("\"data\" of page \"{name}\""),
                "an object",
                json_kind(&other),
            ));
        }
        None => {
            return Err(LayoutError::MissingPageData {
                page: name.to_string(),
            });
        }
    };

    let mut layout = None;
    let mut hidden = None;
    for (key, value) in data {
        if key.eq_ignore_ascii_case("layout") {
            layout = Some(value);
        } else if key.eq_ignore_ascii_case("hidden") {
            hidden = Some(LayoutExpression::new(value));
        } else {
            extra.insert(key, value);
        }
    }

    let items = match layout {
        Some(JsonValue::Array(items)) => items,
        Some(other) => {
            return Err(LayoutError::unexpected(
                format!("layout of page \"{name}\""),
                "an array of components",
                json_kind(&other),
            ));
        }
        None => return Err(LayoutError::missing_property(name, Some(name), "layout")),
    };

    let mut stream = items.into_iter();
    let mut children = Vec::new();
    let mut lookup = HashMap::new();
    while let Some(item) = stream.next() {
        let component = read_component(name, item, &mut stream)?;
        index_component(name, &component, &mut lookup)?;
        children.push(component);
    }

    let page = Arc::new(Component {
        id: name.to_string(),
        component_type: "page".to_string(),
        parent: OnceLock::new(),
        data_model_bindings: IndexMap::new(),
        hidden,
        required: None,
        extra,
        kind: ComponentKind::Page { children, lookup },
    });
    page.link_parent();
    Ok(page)
}

/// Add a component and all its descendants to the page lookup
fn index_component(
    page: &str,
    component: &Arc<Component>,
    lookup: &mut HashMap<String, Arc<Component>>,
) -> Result<()> {
    if lookup.contains_key(component.id()) {
        return Err(LayoutError::DuplicateComponent {
            page: page.to_string(),
            id: component.id().to_string(),
        });
    }
    lookup.insert(component.id().to_string(), Arc::clone(component));
    for child in component.children() {
        index_component(page, child, lookup)?;
    }
    Ok(())
}

fn read_component<I>(page: &str, value: JsonValue, stream: &mut I) -> Result<Arc<Component>>
where
    I: Iterator<Item = JsonValue>,
{
    let object = match value {
        JsonValue::Object(object) => object,
        other => {
            return Err(LayoutError::unexpected(
                format!("layout of page \"{page}\""),
                "a component object",
                json_kind(&other),
            ));
        }
    };

    let mut known = IndexMap::new();
    let mut extra = IndexMap::new();
    for (key, value) in object {
        match KNOWN_PROPERTIES
            .iter()
            .find(|name| name.eq_ignore_ascii_case(&key))
        {
            Some(name) => {
                if let Some((first, _)) = known.get(name) {
                    return Err(LayoutError::invalid_property(
                        page,
                        None,
                        *name,
                        format!("given twice, as \"{first}\" and \"{key}\""),
                    ));
                }
                known.insert(*name, (key, value));
            }
            None => {
                extra.insert(key, value);
            }
        }
    }

    let id = match known.shift_remove("id") {
        Some((_, JsonValue::String(id))) => id,
        Some((_, other)) => {
            return Err(LayoutError::invalid_property(
                page,
                None,
                "id",
                format!("expected a string, found {}", json_kind(&other)),
            ));
        }
        None => return Err(LayoutError::missing_property(page, None, "id")),
    };

    let mut raw = RawComponent {
        page,
        id,
        known,
        extra,
    };

    let component_type = raw.take_string("type")?.ok_or_else(|| raw.missing("type"))?;
    let tag = component_type.to_lowercase();
    let hidden = raw.take_expression("hidden");

    // Summaries carry no bindings; whatever they declare stays in `extra`
    let (data_model_bindings, required) = if tag == "summary" {
        (IndexMap::new(), None)
    } else {
        (raw.take_bindings()?, raw.take_expression("required"))
    };

    let kind = match tag.as_str() {
        "group" => raw.group_kind(&data_model_bindings, stream)?,
        "summary" => raw.summary_kind()?,
        "checkboxes" | "radiobuttons" | "dropdown" => raw.options_kind()?,
        _ => ComponentKind::Base,
    };

    let (id, extra) = raw.finish();
    Ok(Arc::new(Component {
        id,
        component_type,
        parent: OnceLock::new(),
        data_model_bindings,
        hidden,
        required,
        extra,
        kind,
    }))
}

fn read_children<I>(
    page: &str,
    group: &str,
    child_ids: &[String],
    stream: &mut I,
) -> Result<Vec<Arc<Component>>>
where
    I: Iterator<Item = JsonValue>,
{
    let mut children = Vec::with_capacity(child_ids.len());
    for expected in child_ids {
        let Some(next) = stream.next() else {
            return Err(LayoutError::MissingChildren {
                page: page.to_string(),
                group: group.to_string(),
                expected: expected.clone(),
            });
        };
        let child = read_component(page, next, stream)?;
        if child.id() != expected {
            return Err(LayoutError::ChildMismatch {
                page: page.to_string(),
                group: group.to_string(),
                expected: expected.clone(),
                found: child.id().to_string(),
            });
        }
        children.push(child);
    }
    Ok(children)
}

/// Properties of one component that are still to be interpreted
struct RawComponent<'p> {
    page: &'p str,
    id: String,
    known: IndexMap<&'static str, (String, JsonValue)>,
    extra: IndexMap<String, JsonValue>,
}

impl RawComponent<'_> {
    fn missing(&self, property: &'static str) -> LayoutError {
        LayoutError::missing_property(self.page, Some(&self.id), property)
    }

    fn invalid(&self, property: &'static str, reason: impl Into<String>) -> LayoutError {
        LayoutError::invalid_property(self.page, Some(&self.id), property, reason)
    }

    fn take(&mut self, property: &'static str) -> Option<JsonValue> {
        self.known.shift_remove(property).map(|(_, value)| value)
    }

    fn take_string(&mut self, property: &'static str) -> Result<Option<String>> {
        match self.take(property) {
            None => Ok(None),
            Some(JsonValue::String(value)) => Ok(Some(value)),
            Some(other) => Err(self.invalid(
                property,
                format!("expected a string, found {}", json_kind(&other)),
            )),
        }
    }

    fn take_expression(&mut self, property: &'static str) -> Option<LayoutExpression> {
        self.take(property).map(LayoutExpression::new)
    }

    fn take_bindings(&mut self) -> Result<IndexMap<String, KeyPath>> {
        let entries = match self.take("dataModelBindings") {
            None => return Ok(IndexMap::new()),
            Some(JsonValue::Object(entries)) => entries,
            Some(other) => {
                return Err(self.invalid(
                    "dataModelBindings",
                    format!("expected an object, found {}", json_kind(&other)),
                ));
            }
        };

        let mut bindings = IndexMap::with_capacity(entries.len());
        for (role, path) in entries {
            match path {
                JsonValue::String(path) if path.is_empty() => {
                    log::debug!("ignoring empty '{role}' binding on '{}'", self.id);
                }
                JsonValue::String(path) => {
                    let path = KeyPath::parse(&path)
                        .map_err(|err| self.invalid("dataModelBindings", err.to_string()))?;
                    bindings.insert(role, path);
                }
                other => {
                    return Err(self.invalid(
                        "dataModelBindings",
                        format!(
                            "binding \"{role}\" must be a string, found {}",
                            json_kind(&other)
                        ),
                    ));
                }
            }
        }
        Ok(bindings)
    }

    fn take_child_ids(&mut self) -> Result<Option<Vec<String>>> {
        let items = match self.take("children") {
            None => return Ok(None),
            Some(JsonValue::Array(items)) => items,
            Some(other) => {
                return Err(self.invalid(
                    "children",
                    format!("expected an array of ids, found {}", json_kind(&other)),
                ));
            }
        };

        items
            .into_iter()
            .map(|item| match item {
                JsonValue::String(id) => Ok(id),
                other => Err(self.invalid(
                    "children",
                    format!("child ids must be strings, found {}", json_kind(&other)),
                )),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    fn take_max_count(&mut self) -> Result<Option<u32>> {
        match self.take("maxCount") {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|count| u32::try_from(count).ok())
                .map(Some)
                .ok_or_else(|| {
                    self.invalid("maxCount", format!("expected a count, found {value}"))
                }),
        }
    }

    fn take_options(&mut self) -> Result<Option<Vec<AppOption>>> {
        match self.take("options") {
            None => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|err| self.invalid("options", err.to_string())),
        }
    }

    fn take_secure(&mut self) -> Result<bool> {
        match self.take("secure") {
            None => Ok(false),
            Some(JsonValue::Bool(secure)) => Ok(secure),
            Some(other) => Err(self.invalid(
                "secure",
                format!("expected a boolean, found {}", json_kind(&other)),
            )),
        }
    }

    fn group_kind<I>(
        &mut self,
        bindings: &IndexMap<String, KeyPath>,
        stream: &mut I,
    ) -> Result<ComponentKind>
    where
        I: Iterator<Item = JsonValue>,
    {
        let child_ids = self
            .take_child_ids()?
            .ok_or_else(|| self.missing("children"))?;
        let max_count = self.take_max_count()?;
        let children = read_children(self.page, &self.id, &child_ids, stream)?;

        match max_count {
            Some(max_count) if max_count > 1 => {
                if !bindings.contains_key(GROUP_BINDING) {
                    return Err(LayoutError::RepeatingGroupWithoutBinding {
                        page: self.page.to_string(),
                        group: self.id.clone(),
                        max_count,
                    });
                }
                Ok(ComponentKind::RepeatingGroup {
                    children,
                    max_count,
                })
            }
            _ => Ok(ComponentKind::Group { children }),
        }
    }

    fn summary_kind(&mut self) -> Result<ComponentKind> {
        let component_ref = self
            .take_string("componentRef")?
            .ok_or_else(|| self.missing("componentRef"))?;
        let page_ref = self
            .take_string("pageRef")?
            .ok_or_else(|| self.missing("pageRef"))?;
        Ok(ComponentKind::Summary {
            component_ref,
            page_ref,
        })
    }

    fn options_kind(&mut self) -> Result<ComponentKind> {
        let option_id = self.take_string("optionId")?;
        let options = self.take_options()?;
        let secure = self.take_secure()?;

        let source = match (option_id, options) {
            (Some(option_id), None) => OptionSource::Reference { option_id, secure },
            (None, Some(_)) if secure => {
                return Err(LayoutError::SecureLiteralOptions {
                    page: self.page.to_string(),
                    component: self.id.clone(),
                });
            }
            (None, Some(options)) => OptionSource::Literal(options),
            (Some(_), Some(_)) => {
                return Err(LayoutError::ConflictingOptions {
                    page: self.page.to_string(),
                    component: self.id.clone(),
                });
            }
            (None, None) => {
                return Err(LayoutError::MissingOptions {
                    page: self.page.to_string(),
                    component: self.id.clone(),
                });
            }
        };
        Ok(ComponentKind::Options(source))
    }

    /// Id, and extras including every known property the variant did not use
    fn finish(self) -> (String, IndexMap<String, JsonValue>) {
        let mut extra = self.extra;
        extra.extend(self.known.into_values());
        (self.id, extra)
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
