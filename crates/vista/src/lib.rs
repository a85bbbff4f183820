//! Vista: page-object binding and synchronization for browser-driven UI
//! tests.
//!
//! Vista lets test authors declare "views" — DOM regions — as objects with
//! declarative lookup rules, composable sub-components, action helpers and
//! explicit wait primitives, instead of scattering raw driver calls through
//! every test.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                      VISTA Architecture                        │
//! ├───────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌─────────────┐   ┌──────────────────────┐  │
//! │  │ Descriptor │──►│ View        │──►│ DriverAdapter        │  │
//! │  │ (lookup,   │   │ (bind, act, │   │ (WebDriver / CDP /   │  │
//! │  │ components)│   │ wait, proxy)│   │ in-memory FakePage)  │  │
//! │  └────────────┘   └─────────────┘   └──────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The protocol is lookup → bind → act → detect staleness → re-bind: a
//! view resolves its root element by walking a locator sequence with an
//! exactly-one-match rule per step, and every operation against the bound
//! root transparently re-binds and retries once when the driver reports a
//! stale element.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod actions;
mod axis;
mod binding;
mod component;
mod config;
mod driver;
mod locator;
mod lookup;
mod nav;
mod recorder;
mod result;
mod view;

/// Wait primitives and the poll-loop runner.
pub mod wait;

/// In-memory fake driver for testing page objects without a browser.
pub mod fake;

pub use binding::resolve;
pub use component::{ComponentDecl, ComponentKind, ComponentRegistry};
pub use config::{Config, JsLibrary, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_SECS};
pub use driver::{DriverAdapter, ElementHandle, Scope};
pub use locator::{Locator, Strategy};
pub use lookup::{
    AttrValue, LookupAttributes, LookupStrategy, NamedLocatorFn, NamedLocators, ATTR_LOCATOR,
    TITLE_LOCATOR,
};
pub use nav::NavigationView;
pub use recorder::{ActionRecorder, RecordedAction};
pub use result::{VistaError, VistaResult};
pub use view::{
    Component, HookFn, MethodFn, Scoped, View, ViewDescriptor, ViewDescriptorBuilder,
};
pub use wait::Waiter;
