//! Locator abstraction for element lookup.
//!
//! A [`Locator`] is an opaque descriptor of how to find an element: a
//! strategy plus a value. Locators are immutable, compared by value, and
//! carry no reference to any live element — resolution is the binding
//! engine's job.

use serde::{Deserialize, Serialize};

/// How a locator value should be interpreted by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Element id attribute
    Id,
    /// CSS selector
    Css,
    /// XPath expression
    #[serde(rename = "xpath")]
    XPath,
    /// Exact anchor text
    LinkText,
    /// Substring of anchor text
    PartialLinkText,
    /// Element name attribute
    Name,
    /// Element tag name
    TagName,
    /// Element class name
    ClassName,
}

impl Strategy {
    /// Stable name used in error messages and serialized form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
            Self::Name => "name",
            Self::TagName => "tag name",
            Self::ClassName => "class name",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A strategy + value pair identifying DOM elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    /// Interpretation of `value`
    pub strategy: Strategy,
    /// The selector text
    pub value: String,
}

impl Locator {
    /// Create a locator with an explicit strategy.
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Locator by element id.
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::new(Strategy::Id, value)
    }

    /// Locator by CSS selector.
    #[must_use]
    pub fn css(value: impl Into<String>) -> Self {
        Self::new(Strategy::Css, value)
    }

    /// Locator by XPath expression.
    #[must_use]
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, value)
    }

    /// Locator by exact anchor text.
    #[must_use]
    pub fn link_text(value: impl Into<String>) -> Self {
        Self::new(Strategy::LinkText, value)
    }

    /// Locator by anchor-text substring.
    #[must_use]
    pub fn partial_link_text(value: impl Into<String>) -> Self {
        Self::new(Strategy::PartialLinkText, value)
    }

    /// Locator by name attribute.
    #[must_use]
    pub fn name(value: impl Into<String>) -> Self {
        Self::new(Strategy::Name, value)
    }

    /// Locator by tag name.
    #[must_use]
    pub fn tag_name(value: impl Into<String>) -> Self {
        Self::new(Strategy::TagName, value)
    }

    /// Locator by class name.
    #[must_use]
    pub fn class_name(value: impl Into<String>) -> Self {
        Self::new(Strategy::ClassName, value)
    }

    /// The locator matching the document body — the starting point for
    /// root-strategy views.
    #[must_use]
    pub fn document_body() -> Self {
        Self::xpath("//body")
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}: {:?}}}", self.strategy, self.value)
    }
}
