//! Error types for layout parsing and component lookup

use thiserror::Error;

/// Result type alias for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Structural and lookup errors of a layout document.
///
/// Structural errors abort construction of the whole layout; a partially
/// built tree is never returned.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The document is not valid JSON
    #[error("Invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value of the wrong JSON kind where the document structure requires another
    #[error("Expected {expected} in {location}, found {found}")]
    UnexpectedToken {
        /// Where in the document
        location: String,
        /// What the document structure requires
        expected: &'static str,
        /// JSON kind that was found
        found: &'static str,
    },

    /// A page body without `data`
    #[error("Missing property \"data\" on layout page \"{page}\"")]
    MissingPageData {
        /// Page name
        page: String,
    },

    /// A required property is absent
    #[error("Missing property \"{property}\" on {}", describe(page, component.as_deref()))]
    MissingProperty {
        /// Page name
        page: String,
        /// Component id, when already known
        component: Option<String>,
        /// Property name
        property: &'static str,
    },

    /// A property has a value of the wrong shape
    #[error("Invalid property \"{property}\" on {}: {reason}", describe(page, component.as_deref()))]
    InvalidProperty {
        /// Page name
        page: String,
        /// Component id, when already known
        component: Option<String>,
        /// Property name
        property: &'static str,
        /// What is wrong with the value
        reason: String,
    },

    /// Two components on one page share an id
    #[error("Duplicate component id \"{id}\" detected on page \"{page}\"")]
    DuplicateComponent {
        /// Page name
        page: String,
        /// Component id
        id: String,
    },

    /// A group's children do not match the components that follow it
    #[error("Invalid group component \"{group}\" on page \"{page}\": found \"{found}\" instead of \"{expected}\"")]
    ChildMismatch {
        /// Page name
        page: String,
        /// Group id
        group: String,
        /// Declared child id
        expected: String,
        /// Id of the component found in its place
        found: String,
    },

    /// The layout ended before all of a group's children were found
    #[error("Invalid group component \"{group}\" on page \"{page}\": no component found for child \"{expected}\"")]
    MissingChildren {
        /// Page name
        page: String,
        /// Group id
        group: String,
        /// Declared child id that has no component
        expected: String,
    },

    /// A group with `maxCount > 1` lacks its `group` binding
    #[error("A group id: \"{group}\" on page \"{page}\" with maxCount: {max_count} does not have a \"group\" dataModelBinding")]
    RepeatingGroupWithoutBinding {
        /// Page name
        page: String,
        /// Group id
        group: String,
        /// Declared maximum row count
        max_count: u32,
    },

    /// Options component with neither `optionId` nor `options`
    #[error("\"optionId\" or \"options\" is required on {}", describe(page, Some(component)))]
    MissingOptions {
        /// Page name
        page: String,
        /// Component id
        component: String,
    },

    /// Options component with both `optionId` and `options`
    #[error("\"optionId\" and \"options\" can't both be specified on {}", describe(page, Some(component)))]
    ConflictingOptions {
        /// Page name
        page: String,
        /// Component id
        component: String,
    },

    /// `secure: true` together with literal options
    #[error("\"secure\": true is invalid for components with literal \"options\" ({})", describe(page, Some(component)))]
    SecureLiteralOptions {
        /// Page name
        page: String,
        /// Component id
        component: String,
    },

    /// Lookup of a page that does not exist
    #[error("Unknown page name \"{page}\"")]
    UnknownPage {
        /// Page name
        page: String,
    },

    /// Lookup of a component that does not exist on the page
    #[error("Unknown component \"{component}\" on page \"{page}\"")]
    UnknownComponent {
        /// Page name
        page: String,
        /// Component id
        component: String,
    },

    /// Sibling lookup with a group as context
    #[error("Component lookup from inside group \"{component}\" is not supported")]
    GroupContextLookup {
        /// Group id
        component: String,
    },

    /// Sibling lookup of a component without `simpleBinding`
    #[error("Component \"{component}\" on page \"{page}\" has no \"simpleBinding\" to look up")]
    MissingSimpleBinding {
        /// Page name
        page: String,
        /// Component id
        component: String,
    },

    /// Summary resolution of a component that is not a summary
    #[error("Component \"{component}\" is not a summary")]
    NotASummary {
        /// Component id
        component: String,
    },
}

fn describe(page: &str, component: Option<&str>) -> String {
    match component {
        Some(id) => format!("component \"{id}\" on page \"{page}\""),
        None => format!("a component on page \"{page}\""),
    }
}

impl LayoutError {
    /// Create a missing property error
    pub fn missing_property(page: &str, component: Option<&str>, property: &'static str) -> Self {
        Self::MissingProperty {
            page: page.to_string(),
            component: component.map(str::to_string),
            property,
        }
    }

    /// Create an invalid property error
    pub fn invalid_property(
        page: &str,
        component: Option<&str>,
        property: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidProperty {
            page: page.to_string(),
            component: component.map(str::to_string),
            property,
            reason: reason.into(),
        }
    }

    /// Create an unexpected token error
    pub fn unexpected(
        location: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::UnexpectedToken {
            location: location.into(),
            expected,
            found,
        }
    }

    /// True for errors raised while building a layout, as opposed to lookups
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            Self::UnknownPage { .. }
                | Self::UnknownComponent { .. }
                | Self::GroupContextLookup { .. }
                | Self::MissingSimpleBinding { .. }
                | Self::NotASummary { .. }
        )
    }
}
