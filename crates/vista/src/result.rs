//! Result and error types for Vista.

use crate::component::ComponentKind;
use crate::locator::Locator;
use std::time::Duration;
use thiserror::Error;

/// Result type for Vista operations
pub type VistaResult<T> = Result<T, VistaError>;

/// Errors that can occur in Vista
#[derive(Debug, Error)]
pub enum VistaError {
    /// View declared no lookup strategy
    #[error("view `{view}` declares no lookup strategy")]
    LookupUndefinedSequence {
        /// Name of the misconfigured view
        view: String,
    },

    /// A lookup step matched no elements
    #[error("no element matched {locator} (lookup step {step})")]
    LookupUndefinedElement {
        /// The locator that matched nothing
        locator: Locator,
        /// Zero-based index of the failing step in the lookup sequence
        step: usize,
    },

    /// A lookup step matched more than one element
    #[error("{count} elements matched {locator} (lookup step {step}); narrow the locator")]
    LookupMultipleElements {
        /// The ambiguous locator
        locator: Locator,
        /// Zero-based index of the failing step in the lookup sequence
        step: usize,
        /// Number of elements that matched
        count: usize,
    },

    /// Element reference invalidated by DOM mutation
    #[error("stale element reference: {message}")]
    StaleElement {
        /// Driver-supplied detail
        message: String,
    },

    /// Single-element find matched nothing
    #[error("no element matched {locator}")]
    NotFound {
        /// The locator that matched nothing
        locator: Locator,
    },

    /// A wait predicate never became true in time
    #[error("timed out after {elapsed:?} waiting for {waiting_for}")]
    Timeout {
        /// Time spent polling before giving up
        elapsed: Duration,
        /// Description of the awaited condition
        waiting_for: String,
    },

    /// Operation requires a bound root element
    #[error("view is not bound to an element; call load first")]
    Unbound,

    /// Method proxying exhausted every child component
    #[error("no component of view `{view}` responds to `{method}`")]
    UnknownComponent {
        /// Name of the view whose children were searched
        view: String,
        /// The unrecognized method name
        method: String,
    },

    /// No descriptor registered for a declared component
    #[error("no {kind} component registered under name `{name}`")]
    UnresolvedComponent {
        /// Declared component kind
        kind: ComponentKind,
        /// Declared logical name
        name: String,
    },

    /// Lookup sequence referenced an attribute the caller never supplied
    #[error("lookup attribute `{name}` is not defined")]
    MissingAttribute {
        /// The missing attribute key
        name: String,
    },

    /// Lookup sequence referenced a named locator the descriptor never defined
    #[error("named locator `{name}` is not defined")]
    MissingNamedLocator {
        /// The missing locator name
        name: String,
    },

    /// Driver-specific failure
    #[error("driver error: {message}")]
    Driver {
        /// Driver-supplied detail
        message: String,
    },
}

impl VistaError {
    /// Create a stale-element error with the given detail.
    #[must_use]
    pub fn stale(message: impl Into<String>) -> Self {
        Self::StaleElement {
            message: message.into(),
        }
    }

    /// Create a driver error with the given detail.
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Whether this is the stale-element signal.
    ///
    /// Staleness is the only condition the engine recovers from
    /// transparently (one re-bind, one retry).
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleElement { .. })
    }

    /// Whether this is a binding failure (zero, multiple, or undeclared).
    #[must_use]
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::LookupUndefinedSequence { .. }
                | Self::LookupUndefinedElement { .. }
                | Self::LookupMultipleElements { .. }
        )
    }
}
