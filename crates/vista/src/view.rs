//! The view core: the bindable unit and its definition-time descriptor.
//!
//! A [`ViewDescriptor`] is built once per view type and captures everything
//! the engine needs to bind instances of it: the lookup strategy, baked
//! lookup attributes, named locators, declared child components, named
//! methods, and the optional lifecycle hooks. A [`View`] is one instance of
//! that definition against a driver — unbound until [`View::load`]
//! succeeds, bound afterwards until the DOM invalidates it.
//!
//! ```
//! use vista::fake::FakePage;
//! use vista::{Locator, View, ViewDescriptor};
//!
//! let page = FakePage::new();
//! let body = page.insert(None, &[Locator::document_body()]);
//! page.insert(Some(body), &[Locator::css("#login")]);
//!
//! let login = ViewDescriptor::builder("login_form")
//!     .matching(Locator::css("#login"))
//!     .build();
//! let mut view = View::new(std::rc::Rc::new(page), login);
//! assert!(view.load().is_ok());
//! assert!(view.exists());
//! ```

use crate::binding;
use crate::component::{ComponentDecl, ComponentKind, ComponentRegistry};
use crate::config::Config;
use crate::driver::{DriverAdapter, ElementHandle, Scope};
use crate::locator::Locator;
use crate::lookup::{LookupAttributes, LookupStrategy, NamedLocators, ATTR_LOCATOR};
use crate::result::{VistaError, VistaResult};
use serde_json::Value;
use std::any::Any;
use std::rc::Rc;

/// A named method attached to a view definition.
pub type MethodFn = Rc<dyn Fn(&mut View, &[Value]) -> VistaResult<Value>>;

/// A lifecycle hook attached to a view definition.
pub type HookFn = Rc<dyn Fn(&mut View) -> VistaResult<()>>;

/// Definition-time descriptor of a view type.
pub struct ViewDescriptor {
    name: String,
    strategy: Option<LookupStrategy>,
    attributes: LookupAttributes,
    named_locators: NamedLocators,
    components: Vec<ComponentDecl>,
    methods: Vec<(String, MethodFn)>,
    before_load: Option<HookFn>,
    after_load: Option<HookFn>,
}

impl ViewDescriptor {
    /// Start building a descriptor for the view type `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ViewDescriptorBuilder {
        ViewDescriptorBuilder {
            descriptor: Self {
                name: name.into(),
                strategy: None,
                attributes: LookupAttributes::new(),
                named_locators: NamedLocators::new(),
                components: Vec::new(),
                methods: Vec::new(),
                before_load: None,
                after_load: None,
            },
        }
    }

    /// The view type name (used in error messages).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared lookup strategy, if any.
    #[must_use]
    pub fn strategy(&self) -> Option<&LookupStrategy> {
        self.strategy.as_ref()
    }

    /// The baked lookup attributes.
    #[must_use]
    pub fn attributes(&self) -> &LookupAttributes {
        &self.attributes
    }

    /// The named locator table.
    #[must_use]
    pub fn named_locators(&self) -> &NamedLocators {
        &self.named_locators
    }

    /// The declared components, in declaration order.
    #[must_use]
    pub fn components(&self) -> &[ComponentDecl] {
        &self.components
    }

    /// Whether the definition carries a method under `name`.
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|(method, _)| method == name)
    }

    pub(crate) fn method(&self, name: &str) -> Option<MethodFn> {
        self.methods
            .iter()
            .find(|(method, _)| method == name)
            .map(|(_, f)| Rc::clone(f))
    }

    pub(crate) fn before_load_hook(&self) -> Option<HookFn> {
        self.before_load.clone()
    }

    pub(crate) fn after_load_hook(&self) -> Option<HookFn> {
        self.after_load.clone()
    }
}

impl std::fmt::Debug for ViewDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let methods: Vec<&str> = self.methods.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("ViewDescriptor")
            .field("name", &self.name)
            .field("strategy", &self.strategy)
            .field("components", &self.components)
            .field("methods", &methods)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ViewDescriptor`].
#[derive(Debug)]
pub struct ViewDescriptorBuilder {
    descriptor: ViewDescriptor,
}

impl ViewDescriptorBuilder {
    /// Set the lookup strategy.
    #[must_use]
    pub fn strategy(mut self, strategy: LookupStrategy) -> Self {
        self.descriptor.strategy = Some(strategy);
        self
    }

    /// Root strategy: bind to the document body, ignoring any parent.
    #[must_use]
    pub fn root(self) -> Self {
        self.strategy(LookupStrategy::Root)
    }

    /// Matching strategy: a single direct lookup of `locator`.
    #[must_use]
    pub fn matching(mut self, locator: Locator) -> Self {
        self.descriptor.attributes = self
            .descriptor
            .attributes
            .with_locator(ATTR_LOCATOR, locator);
        self.strategy(LookupStrategy::Matching)
    }

    /// Relative-to-title strategy: descend through the `title` named
    /// locator, then apply `locator`.
    #[must_use]
    pub fn relative_to_title(mut self, locator: Locator) -> Self {
        self.descriptor.attributes = self
            .descriptor
            .attributes
            .with_locator(ATTR_LOCATOR, locator);
        self.strategy(LookupStrategy::RelativeToTitle)
    }

    /// Relative-path strategy: descend through the named locator `to`, then
    /// apply `locator`.
    #[must_use]
    pub fn relative_path(mut self, to: impl Into<String>, locator: Locator) -> Self {
        self.descriptor.attributes = self
            .descriptor
            .attributes
            .with_locator(ATTR_LOCATOR, locator);
        self.strategy(LookupStrategy::relative_path(to))
    }

    /// Bake a locator-valued lookup attribute into the definition.
    #[must_use]
    pub fn attribute_locator(mut self, name: impl Into<String>, locator: Locator) -> Self {
        self.descriptor.attributes = self.descriptor.attributes.with_locator(name, locator);
        self
    }

    /// Bake a text-valued lookup attribute into the definition.
    #[must_use]
    pub fn attribute_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.descriptor.attributes = self.descriptor.attributes.with_text(name, text);
        self
    }

    /// Define a named locator.
    #[must_use]
    pub fn named_locator(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&LookupAttributes) -> VistaResult<Locator> + 'static,
    ) -> Self {
        self.descriptor.named_locators.define(name, f);
        self
    }

    /// Declare a child component; children load in declaration order.
    #[must_use]
    pub fn component(mut self, kind: ComponentKind, name: impl Into<String>) -> Self {
        self.descriptor
            .components
            .push(ComponentDecl::new(kind, name));
        self
    }

    /// Attach a named method, callable through [`View::invoke`] and
    /// reachable from parent views via proxy fallthrough.
    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&mut View, &[Value]) -> VistaResult<Value> + 'static,
    ) -> Self {
        self.descriptor.methods.push((name.into(), Rc::new(f)));
        self
    }

    /// Attach the pre-binding hook.
    #[must_use]
    pub fn before_load(mut self, f: impl Fn(&mut View) -> VistaResult<()> + 'static) -> Self {
        self.descriptor.before_load = Some(Rc::new(f));
        self
    }

    /// Attach the post-binding hook (runs after components load).
    #[must_use]
    pub fn after_load(mut self, f: impl Fn(&mut View) -> VistaResult<()> + 'static) -> Self {
        self.descriptor.after_load = Some(Rc::new(f));
        self
    }

    /// Finish the definition.
    #[must_use]
    pub fn build(self) -> Rc<ViewDescriptor> {
        Rc::new(self.descriptor)
    }
}

/// An instantiated, loaded child component of a view.
#[derive(Debug)]
pub struct Component {
    decl: ComponentDecl,
    view: View,
}

impl Component {
    /// The declaration this child was created from.
    #[must_use]
    pub fn decl(&self) -> &ComponentDecl {
        &self.decl
    }

    /// The child view.
    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// The child view, mutably.
    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }
}

/// A bindable region of the page.
pub struct View {
    driver: Rc<dyn DriverAdapter>,
    config: Config,
    registry: Rc<ComponentRegistry>,
    descriptor: Rc<ViewDescriptor>,
    parent_el: Option<ElementHandle>,
    root_el: Option<ElementHandle>,
    object: Option<Rc<dyn Any>>,
    attributes: LookupAttributes,
    components: Vec<Component>,
    cached_tag_name: Option<String>,
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("descriptor", &self.descriptor.name())
            .field("root_el", &self.root_el)
            .field("components", &self.components.len())
            .finish_non_exhaustive()
    }
}

impl View {
    /// Create an unbound view of `descriptor` against `driver`.
    #[must_use]
    pub fn new(driver: Rc<dyn DriverAdapter>, descriptor: Rc<ViewDescriptor>) -> Self {
        Self {
            driver,
            config: Config::default(),
            registry: Rc::new(ComponentRegistry::new()),
            descriptor,
            parent_el: None,
            root_el: None,
            object: None,
            attributes: LookupAttributes::new(),
            components: Vec::new(),
            cached_tag_name: None,
        }
    }

    /// Set the configuration (inherited by children).
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the component registry (inherited by children).
    #[must_use]
    pub fn with_registry(mut self, registry: Rc<ComponentRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Scope lookups under another view's bound element.
    #[must_use]
    pub fn with_parent_element(mut self, element: ElementHandle) -> Self {
        self.parent_el = Some(element);
        self
    }

    /// Preset the bound root, for callers that already hold the element.
    #[must_use]
    pub fn with_root_element(mut self, element: ElementHandle) -> Self {
        self.root_el = Some(element);
        self
    }

    /// Associate an opaque backing object (shared with children).
    #[must_use]
    pub fn with_object(mut self, object: Rc<dyn Any>) -> Self {
        self.object = Some(object);
        self
    }

    /// The shared driver.
    #[must_use]
    pub fn driver(&self) -> &Rc<dyn DriverAdapter> {
        &self.driver
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The definition this view was instantiated from.
    #[must_use]
    pub fn descriptor(&self) -> &Rc<ViewDescriptor> {
        &self.descriptor
    }

    /// The parent scope element, if any.
    #[must_use]
    pub fn parent_element(&self) -> Option<&ElementHandle> {
        self.parent_el.as_ref()
    }

    /// The bound root element, if bound.
    #[must_use]
    pub fn root_element(&self) -> Option<&ElementHandle> {
        self.root_el.as_ref()
    }

    /// The backing object, if any.
    #[must_use]
    pub fn object(&self) -> Option<&Rc<dyn Any>> {
        self.object.as_ref()
    }

    /// The lookup attributes captured at the last `load`.
    #[must_use]
    pub fn attributes(&self) -> &LookupAttributes {
        &self.attributes
    }

    /// Loaded child components, in declaration order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// A loaded child component by logical name.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&View> {
        self.components
            .iter()
            .find(|component| component.decl.name == name)
            .map(Component::view)
    }

    /// A loaded child component by logical name, mutably.
    pub fn component_mut(&mut self, name: &str) -> Option<&mut View> {
        self.components
            .iter_mut()
            .find(|component| component.decl.name == name)
            .map(Component::view_mut)
    }

    /// Bind the view using the definition's baked attributes.
    ///
    /// On success the view is bound and every declared component is loaded;
    /// on failure the view is unbound with no partial component state, and
    /// the specific error propagates.
    pub fn load(&mut self) -> VistaResult<()> {
        self.load_with(LookupAttributes::new())
    }

    /// Bind the view with extra lookup attributes (they override baked ones
    /// on key clashes).
    pub fn load_with(&mut self, attrs: LookupAttributes) -> VistaResult<()> {
        self.attributes = self.descriptor.attributes().merged(&attrs);
        match self.try_load() {
            Ok(()) => Ok(()),
            Err(err) => {
                self.unload();
                Err(err)
            }
        }
    }

    /// `load`, with every failure swallowed into `false` — for call sites
    /// that treat "not present" as a normal outcome.
    pub fn load_or_false(&mut self) -> bool {
        self.load().is_ok()
    }

    /// Whether the view is attached to the DOM right now.
    ///
    /// Re-runs the lookup with the last captured attributes; never raises.
    pub fn exists(&mut self) -> bool {
        let attrs = self.attributes.clone();
        let _ = self.load_with(attrs);
        self.root_el.is_some()
    }

    fn try_load(&mut self) -> VistaResult<()> {
        self.unload();
        if let Some(strategy) = self.descriptor.strategy() {
            if strategy.resets_scope() {
                self.parent_el = None;
            }
        }
        if let Some(hook) = self.descriptor.before_load_hook() {
            hook(self)?;
        }
        self.bind()?;
        self.load_components()?;
        if let Some(hook) = self.descriptor.after_load_hook() {
            hook(self)?;
        }
        tracing::debug!(view = self.descriptor.name(), root = ?self.root_el, "view loaded");
        Ok(())
    }

    /// Resolve the root element only — no hooks, no components.
    pub(crate) fn bind(&mut self) -> VistaResult<()> {
        let strategy =
            self.descriptor
                .strategy()
                .ok_or_else(|| VistaError::LookupUndefinedSequence {
                    view: self.descriptor.name().to_string(),
                })?;
        let sequence = strategy.sequence(self.descriptor.named_locators(), &self.attributes)?;
        let scope_root = if strategy.resets_scope() {
            None
        } else {
            self.parent_el.as_ref()
        };
        match binding::resolve(&*self.driver, scope_root, &sequence) {
            Ok(element) => {
                self.root_el = Some(element);
                self.cached_tag_name = None;
                Ok(())
            }
            Err(err) => {
                self.root_el = None;
                Err(err)
            }
        }
    }

    fn load_components(&mut self) -> VistaResult<()> {
        let decls = self.descriptor.components().to_vec();
        for decl in decls {
            let descriptor = self.registry.resolve(&decl)?;
            let root = self.root_el.clone().ok_or(VistaError::Unbound)?;
            let mut child = View::new(Rc::clone(&self.driver), descriptor)
                .with_config(self.config.clone())
                .with_registry(Rc::clone(&self.registry))
                .with_parent_element(root);
            if let Some(object) = &self.object {
                child = child.with_object(Rc::clone(object));
            }
            child.load()?;
            self.components.push(Component { decl, view: child });
        }
        Ok(())
    }

    fn unload(&mut self) {
        self.root_el = None;
        self.components.clear();
        self.cached_tag_name = None;
    }

    /// Run `op`, transparently re-binding and retrying exactly once when it
    /// fails with the stale-element signal. A second stale signal — or any
    /// other error — propagates.
    pub(crate) fn recovering<T>(
        &mut self,
        mut op: impl FnMut(&mut Self) -> VistaResult<T>,
    ) -> VistaResult<T> {
        match op(self) {
            Err(err) if err.is_stale() => {
                tracing::debug!(
                    view = self.descriptor.name(),
                    error = %err,
                    "stale element; re-binding and retrying once"
                );
                let attrs = self.attributes.clone();
                self.load_with(attrs)?;
                op(self)
            }
            other => other,
        }
    }

    /// Find the single first element matching `locator` under the bound
    /// root. Fails with [`VistaError::Unbound`] on an unbound view.
    pub fn find(&mut self, locator: &Locator) -> VistaResult<ElementHandle> {
        let locator = locator.clone();
        self.recovering(move |view| {
            let root = view.root_el.as_ref().ok_or(VistaError::Unbound)?;
            view.driver.find_one(Scope::Element(root), &locator)
        })
    }

    /// Like [`View::find`], but falls back to the whole document when the
    /// view is unbound.
    pub fn find_global(&mut self, locator: &Locator) -> VistaResult<ElementHandle> {
        let locator = locator.clone();
        self.recovering(move |view| {
            let scope = Scope::from_root(view.root_el.as_ref());
            view.driver.find_one(scope, &locator)
        })
    }

    /// Find every element matching `locator` under the bound root.
    pub fn find_all(&mut self, locator: &Locator) -> VistaResult<Vec<ElementHandle>> {
        let locator = locator.clone();
        self.recovering(move |view| {
            let root = view.root_el.as_ref().ok_or(VistaError::Unbound)?;
            view.driver.find_all(Scope::Element(root), &locator)
        })
    }

    /// Invoke a named method: the view's own if defined, otherwise the
    /// first declared child that recognizes it, in declaration order.
    pub fn invoke(&mut self, method: &str, args: &[Value]) -> VistaResult<Value> {
        if let Some(f) = self.descriptor.method(method) {
            return f(self, args);
        }
        for index in 0..self.components.len() {
            if let Some(result) = self.components[index].view.try_invoke(method, args) {
                return result;
            }
        }
        Err(VistaError::UnknownComponent {
            view: self.descriptor.name().to_string(),
            method: method.to_string(),
        })
    }

    /// Offer a method call to this view: `Some(result)` when its own
    /// definition carries the method, `None` otherwise.
    pub fn try_invoke(&mut self, method: &str, args: &[Value]) -> Option<VistaResult<Value>> {
        let f = self.descriptor.method(method)?;
        Some(f(self, args))
    }

    /// Resolve the named locator `name` once, then run `f` against a finder
    /// scoped to that element.
    pub fn scoped<R>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Scoped) -> VistaResult<R>,
    ) -> VistaResult<R> {
        let locator = self
            .descriptor
            .named_locators()
            .resolve(name, &self.attributes)?;
        let element = self.find(&locator)?;
        let mut scoped = Scoped {
            driver: Rc::clone(&self.driver),
            root: element,
        };
        f(&mut scoped)
    }

    pub(crate) fn cached_tag_name(&self) -> Option<&str> {
        self.cached_tag_name.as_deref()
    }

    pub(crate) fn set_cached_tag_name(&mut self, tag_name: String) {
        self.cached_tag_name = Some(tag_name);
    }
}

/// Finder scoped to a single element narrower than a view's root.
pub struct Scoped {
    driver: Rc<dyn DriverAdapter>,
    root: ElementHandle,
}

impl Scoped {
    /// The element this scope is rooted at.
    #[must_use]
    pub fn root_element(&self) -> &ElementHandle {
        &self.root
    }

    /// Find the first element matching `locator` in this scope.
    pub fn find(&self, locator: &Locator) -> VistaResult<ElementHandle> {
        self.driver.find_one(Scope::Element(&self.root), locator)
    }

    /// Find every element matching `locator` in this scope.
    pub fn find_all(&self, locator: &Locator) -> VistaResult<Vec<ElementHandle>> {
        self.driver.find_all(Scope::Element(&self.root), locator)
    }

    /// Click the element matching `locator` in this scope.
    pub fn click(&self, locator: &Locator) -> VistaResult<()> {
        let element = self.find(locator)?;
        self.driver.click(&element)
    }

    /// Clear then type into the element matching `locator` in this scope.
    pub fn fill(&self, locator: &Locator, text: &str) -> VistaResult<()> {
        let element = self.find(locator)?;
        self.driver.clear(&element)?;
        self.driver.send_keys(&element, text)
    }
}

impl std::fmt::Debug for Scoped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scoped")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
