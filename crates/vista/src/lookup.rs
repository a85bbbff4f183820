//! Lookup strategies.
//!
//! A lookup strategy is a pure mapping from a view's lookup attributes to
//! the ordered locator sequence the binding engine walks to reach the
//! view's root element. Strategies are declared once on a
//! [`crate::view::ViewDescriptor`]; the sequence is re-evaluated on every
//! `load` because the DOM may have changed in between.

use crate::locator::Locator;
use crate::result::{VistaError, VistaResult};
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::rc::Rc;

/// Attribute key every locator-consuming strategy reads.
pub const ATTR_LOCATOR: &str = "locator";

/// Named locator consulted by the relative-to-title strategy.
pub const TITLE_LOCATOR: &str = "title";

/// A single lookup attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// A locator-valued attribute
    Locator(Locator),
    /// A text-valued attribute (an identifying string, a label, ...)
    Text(String),
}

/// Key-value data captured for a `load`: the descriptor's baked attributes
/// merged with anything supplied at the call site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupAttributes {
    entries: BTreeMap<String, AttrValue>,
}

impl LookupAttributes {
    /// Create an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a locator-valued attribute.
    #[must_use]
    pub fn with_locator(mut self, name: impl Into<String>, locator: Locator) -> Self {
        self.entries.insert(name.into(), AttrValue::Locator(locator));
        self
    }

    /// Add a text-valued attribute.
    #[must_use]
    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries
            .insert(name.into(), AttrValue::Text(text.into()));
        self
    }

    /// Raw access to an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries.get(name)
    }

    /// Whether no attributes are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The locator stored under `name`.
    ///
    /// A missing entry — or a text entry where a locator is required — is a
    /// programmer error surfaced as [`VistaError::MissingAttribute`].
    pub fn locator(&self, name: &str) -> VistaResult<&Locator> {
        match self.entries.get(name) {
            Some(AttrValue::Locator(locator)) => Ok(locator),
            _ => Err(VistaError::MissingAttribute {
                name: name.to_string(),
            }),
        }
    }

    /// The text stored under `name`.
    pub fn text(&self, name: &str) -> VistaResult<&str> {
        match self.entries.get(name) {
            Some(AttrValue::Text(text)) => Ok(text),
            _ => Err(VistaError::MissingAttribute {
                name: name.to_string(),
            }),
        }
    }

    /// This set overlaid with `overrides` (overrides win on key clashes).
    #[must_use]
    pub fn merged(&self, overrides: &Self) -> Self {
        let mut entries = self.entries.clone();
        for (key, value) in &overrides.entries {
            entries.insert(key.clone(), value.clone());
        }
        Self { entries }
    }
}

/// Pure function producing a locator from the lookup attributes.
pub type NamedLocatorFn = Rc<dyn Fn(&LookupAttributes) -> VistaResult<Locator>>;

/// Named locator table declared on a view descriptor.
///
/// This replaces reflective `<name>_locator` method dispatch with an
/// explicit, inspectable table: the relative-path strategy resolves its
/// first step here by name.
#[derive(Clone, Default)]
pub struct NamedLocators {
    entries: HashMap<String, NamedLocatorFn>,
}

impl NamedLocators {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or replace) the locator function for `name`.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&LookupAttributes) -> VistaResult<Locator> + 'static,
    ) {
        self.entries.insert(name.into(), Rc::new(f));
    }

    /// Whether a locator function is defined for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Evaluate the locator function registered under `name`.
    pub fn resolve(&self, name: &str, attrs: &LookupAttributes) -> VistaResult<Locator> {
        let f = self
            .entries
            .get(name)
            .ok_or_else(|| VistaError::MissingNamedLocator {
                name: name.to_string(),
            })?;
        f(attrs)
    }
}

impl std::fmt::Debug for NamedLocators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("NamedLocators")
            .field("names", &names)
            .finish_non_exhaustive()
    }
}

/// The rule producing the ordered locator sequence for a view type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupStrategy {
    /// Bind to the document body; the scope root is reset to the whole
    /// document even when a parent element is present.
    Root,
    /// Locate a title/header region first, then the target relative to it.
    RelativeToTitle,
    /// Descend through the named locator `to`, then apply the `locator`
    /// attribute as the final step.
    RelativePath {
        /// Name of the locator producing the intermediate step
        to: String,
    },
    /// A single direct lookup of the `locator` attribute.
    Matching,
}

impl LookupStrategy {
    /// Relative-path strategy through the named locator `to`.
    #[must_use]
    pub fn relative_path(to: impl Into<String>) -> Self {
        Self::RelativePath { to: to.into() }
    }

    /// Whether this strategy ignores any parent element and searches the
    /// whole document.
    #[must_use]
    pub const fn resets_scope(&self) -> bool {
        matches!(self, Self::Root)
    }

    /// Produce the lookup sequence for one `load`.
    pub fn sequence(
        &self,
        named: &NamedLocators,
        attrs: &LookupAttributes,
    ) -> VistaResult<Vec<Locator>> {
        match self {
            Self::Root => Ok(vec![Locator::document_body()]),
            Self::RelativeToTitle => Ok(vec![
                named.resolve(TITLE_LOCATOR, attrs)?,
                attrs.locator(ATTR_LOCATOR)?.clone(),
            ]),
            Self::RelativePath { to } => Ok(vec![
                named.resolve(to, attrs)?,
                attrs.locator(ATTR_LOCATOR)?.clone(),
            ]),
            Self::Matching => Ok(vec![attrs.locator(ATTR_LOCATOR)?.clone()]),
        }
    }
}
