//! Abstract browser-driver capability.
//!
//! The engine never talks to a browser directly: everything goes through
//! the [`DriverAdapter`] trait, so any automation backend (a WebDriver
//! client, a CDP client, or the in-memory [`crate::fake::FakePage`]) can
//! sit underneath a view tree. Implementations must report a stale element
//! reference distinctly from "not found" — the recovery protocol depends
//! on telling the two apart.

use crate::locator::Locator;
use crate::result::VistaResult;
use serde_json::Value;

/// Opaque reference to a resolved DOM element.
///
/// Handles are cheap to clone and compare by identity: two handles are the
/// same element exactly when their ids are equal. A handle can go stale at
/// any time after it is produced; the driver signals that on the next use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    /// Driver-assigned element identifier
    pub id: String,
}

impl ElementHandle {
    /// Create a handle from a driver-assigned id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "element#{}", self.id)
    }
}

/// The DOM region a lookup is performed under.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    /// The whole document
    Document,
    /// Descendants of a previously resolved element
    Element(&'a ElementHandle),
}

impl<'a> Scope<'a> {
    /// Scope under `element` when present, the document otherwise.
    #[must_use]
    pub fn from_root(element: Option<&'a ElementHandle>) -> Self {
        element.map_or(Self::Document, Self::Element)
    }
}

/// Browser automation capability consumed by the engine.
///
/// Error contract: `find_one` fails with [`crate::VistaError::NotFound`]
/// when nothing matches; any operation taking an [`ElementHandle`] fails
/// with [`crate::VistaError::StaleElement`] when the handle no longer
/// references a live node; other backend failures surface as
/// [`crate::VistaError::Driver`].
pub trait DriverAdapter {
    /// Find the first element matching `locator` under `scope`.
    fn find_one(&self, scope: Scope<'_>, locator: &Locator) -> VistaResult<ElementHandle>;

    /// Find all elements matching `locator` under `scope`.
    fn find_all(&self, scope: Scope<'_>, locator: &Locator) -> VistaResult<Vec<ElementHandle>>;

    /// Click an element.
    fn click(&self, element: &ElementHandle) -> VistaResult<()>;

    /// Type text into an element.
    fn send_keys(&self, element: &ElementHandle, text: &str) -> VistaResult<()>;

    /// Clear an editable element's value.
    fn clear(&self, element: &ElementHandle) -> VistaResult<()>;

    /// Read an element attribute.
    fn get_attribute(&self, element: &ElementHandle, name: &str) -> VistaResult<String>;

    /// Read a computed CSS property.
    fn css_value(&self, element: &ElementHandle, property: &str) -> VistaResult<String>;

    /// Move input focus to an element.
    fn focus(&self, element: &ElementHandle) -> VistaResult<()>;

    /// Whether the element is rendered visible.
    fn is_displayed(&self, element: &ElementHandle) -> VistaResult<bool>;

    /// Whether the element accepts interaction.
    fn is_enabled(&self, element: &ElementHandle) -> VistaResult<bool>;

    /// Evaluate a script in page context and return its value.
    fn execute_script(&self, code: &str) -> VistaResult<Value>;
}
