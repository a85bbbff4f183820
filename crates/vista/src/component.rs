//! Declarative component registration.
//!
//! A view declares the children it is composed of as `(kind, name)` pairs;
//! the registry maps those pairs to view descriptors, populated explicitly
//! at definition time. After a successful bind every declared component is
//! constructed relative to the parent's root, loaded, and cached in
//! declaration order — that order is also the method-proxy fallthrough
//! order.

use crate::result::{VistaError, VistaResult};
use crate::view::ViewDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;

/// The kind of a declared child component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// A generic sub-view
    View,
    /// A tab region
    Tab,
    /// A pill region
    Pill,
    /// A modal dialog
    Modal,
    /// A panel region
    Panel,
}

impl ComponentKind {
    /// Stable name used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Tab => "tab",
            Self::Pill => "pill",
            Self::Modal => "modal",
            Self::Panel => "panel",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A component declaration on a view descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentDecl {
    /// Component kind
    pub kind: ComponentKind,
    /// Logical name, unique within the declaring view
    pub name: String,
}

impl ComponentDecl {
    /// Declare a component of `kind` under `name`.
    #[must_use]
    pub fn new(kind: ComponentKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ComponentDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// Registry resolving `(kind, name)` declarations to view descriptors.
///
/// Registration happens once, at definition time; a declaration the
/// registry cannot resolve is a fatal configuration error, not a
/// recoverable one.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    entries: HashMap<(ComponentKind, String), Rc<ViewDescriptor>>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the descriptor for a `(kind, name)` pair, replacing any
    /// previous registration.
    pub fn register(
        &mut self,
        kind: ComponentKind,
        name: impl Into<String>,
        descriptor: Rc<ViewDescriptor>,
    ) {
        self.entries.insert((kind, name.into()), descriptor);
    }

    /// Whether a descriptor is registered for the pair.
    #[must_use]
    pub fn contains(&self, kind: ComponentKind, name: &str) -> bool {
        self.entries.contains_key(&(kind, name.to_string()))
    }

    /// Resolve a declaration to its registered descriptor.
    pub fn resolve(&self, decl: &ComponentDecl) -> VistaResult<Rc<ViewDescriptor>> {
        self.entries
            .get(&(decl.kind, decl.name.clone()))
            .cloned()
            .ok_or_else(|| VistaError::UnresolvedComponent {
                kind: decl.kind,
                name: decl.name.clone(),
            })
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupStrategy;

    fn descriptor(name: &str) -> Rc<ViewDescriptor> {
        ViewDescriptor::builder(name)
            .strategy(LookupStrategy::Root)
            .build()
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn test_register_and_resolve() {
            let mut registry = ComponentRegistry::new();
            registry.register(ComponentKind::Panel, "details", descriptor("details_panel"));

            let decl = ComponentDecl::new(ComponentKind::Panel, "details");
            let resolved = registry.resolve(&decl).unwrap();
            assert_eq!(resolved.name(), "details_panel");
            assert!(registry.contains(ComponentKind::Panel, "details"));
            assert_eq!(registry.len(), 1);
        }

        #[test]
        fn test_unresolved_component_is_fatal_configuration_error() {
            let registry = ComponentRegistry::new();
            let decl = ComponentDecl::new(ComponentKind::Modal, "confirm");
            let err = registry.resolve(&decl).unwrap_err();
            match err {
                VistaError::UnresolvedComponent { kind, name } => {
                    assert_eq!(kind, ComponentKind::Modal);
                    assert_eq!(name, "confirm");
                }
                other => panic!("expected UnresolvedComponent, got {other}"),
            }
        }

        #[test]
        fn test_same_name_different_kind_are_distinct() {
            let mut registry = ComponentRegistry::new();
            registry.register(ComponentKind::Tab, "settings", descriptor("settings_tab"));
            registry.register(ComponentKind::Pill, "settings", descriptor("settings_pill"));

            let tab = registry
                .resolve(&ComponentDecl::new(ComponentKind::Tab, "settings"))
                .unwrap();
            let pill = registry
                .resolve(&ComponentDecl::new(ComponentKind::Pill, "settings"))
                .unwrap();
            assert_eq!(tab.name(), "settings_tab");
            assert_eq!(pill.name(), "settings_pill");
        }

        #[test]
        fn test_re_registration_replaces() {
            let mut registry = ComponentRegistry::new();
            registry.register(ComponentKind::View, "summary", descriptor("old"));
            registry.register(ComponentKind::View, "summary", descriptor("new"));
            let resolved = registry
                .resolve(&ComponentDecl::new(ComponentKind::View, "summary"))
                .unwrap();
            assert_eq!(resolved.name(), "new");
        }
    }

    mod display_tests {
        use super::*;

        #[test]
        fn test_decl_display() {
            let decl = ComponentDecl::new(ComponentKind::Modal, "confirm");
            assert_eq!(decl.to_string(), "modal confirm");
        }
    }
}
