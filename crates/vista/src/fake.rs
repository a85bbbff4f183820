//! In-memory fake driver for testing page objects without a browser.
//!
//! [`FakePage`] implements [`DriverAdapter`] over an explicit node tree.
//! Tests drive the real engine against it: nodes are inserted with the set
//! of locators that select them, and the page can inject the failure modes
//! a live browser produces — stale references after DOM mutation, elements
//! that appear after a few polls, scripts that change their answer over
//! time. Everything is deterministic; no threads are involved.
//!
//! ```
//! use vista::fake::FakePage;
//! use vista::Locator;
//!
//! let page = FakePage::new();
//! let body = page.insert(None, &[Locator::document_body()]);
//! let login = page.insert(Some(body), &[Locator::css("#login")]);
//! page.set_attribute(login, "tagName", "FORM");
//! ```

use crate::driver::{DriverAdapter, ElementHandle, Scope};
use crate::locator::Locator;
use crate::result::{VistaError, VistaResult};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

/// Identifier of a node inside a [`FakePage`].
pub type NodeId = u64;

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    matches: Vec<Locator>,
    displayed: bool,
    enabled: bool,
    reveal_after: u32,
    poisoned_clicks: u32,
    reveal_on_click: Option<NodeId>,
    attributes: HashMap<String, String>,
    css: HashMap<String, String>,
    removed: bool,
}

impl Node {
    fn new(parent: Option<NodeId>, matches: &[Locator]) -> Self {
        Self {
            parent,
            matches: matches.to_vec(),
            displayed: true,
            enabled: true,
            reveal_after: 0,
            poisoned_clicks: 0,
            reveal_on_click: None,
            attributes: HashMap::new(),
            css: HashMap::new(),
            removed: false,
        }
    }
}

#[derive(Debug, Default)]
struct PageState {
    nodes: BTreeMap<NodeId, Node>,
    next_id: NodeId,
    epoch: u64,
    scripts: HashMap<String, VecDeque<Value>>,
    clicks: Vec<NodeId>,
    keys: Vec<(NodeId, String)>,
    cleared: Vec<NodeId>,
    focused: Vec<NodeId>,
}

impl PageState {
    /// Decode a handle and verify it still references a live node of the
    /// current epoch.
    fn deref(&self, handle: &ElementHandle) -> VistaResult<NodeId> {
        let (node, epoch) = handle
            .id
            .split_once(':')
            .and_then(|(n, e)| Some((n.parse::<NodeId>().ok()?, e.parse::<u64>().ok()?)))
            .ok_or_else(|| VistaError::driver(format!("malformed handle {}", handle)))?;
        if epoch != self.epoch {
            return Err(VistaError::stale(format!("{handle} predates a DOM mutation")));
        }
        match self.nodes.get(&node) {
            Some(n) if !n.removed => Ok(node),
            _ => Err(VistaError::stale(format!("{handle} was removed"))),
        }
    }

    fn handle(&self, node: NodeId) -> ElementHandle {
        ElementHandle::new(format!("{node}:{}", self.epoch))
    }

    fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.nodes.get(&node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    fn matching(&self, scope_node: Option<NodeId>, locator: &Locator) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(id, node)| {
                !node.removed
                    && node.matches.contains(locator)
                    && node
                        .reveal_on_click
                        .map_or(true, |trigger| self.clicks.contains(&trigger))
                    && scope_node.map_or(true, |root| self.is_descendant_of(**id, root))
            })
            .map(|(id, _)| *id)
            .collect()
    }
}

/// An in-memory page implementing [`DriverAdapter`].
///
/// Cloning shares the underlying page state, so tests keep a handle for
/// mutation while the engine owns its own copy as the driver.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    state: Rc<RefCell<PageState>>,
}

impl FakePage {
    /// Create an empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node matched by each locator in `matches`, under `parent`
    /// (`None` = top level). Returns the node id for later mutation.
    pub fn insert(&self, parent: Option<NodeId>, matches: &[Locator]) -> NodeId {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.nodes.insert(id, Node::new(parent, matches));
        id
    }

    /// Remove a node; outstanding handles to it go stale.
    pub fn remove(&self, node: NodeId) {
        if let Some(n) = self.state.borrow_mut().nodes.get_mut(&node) {
            n.removed = true;
        }
    }

    /// Invalidate every outstanding handle, as a DOM re-render would.
    /// The nodes themselves survive; re-lookup yields fresh handles.
    pub fn invalidate_all(&self) {
        self.state.borrow_mut().epoch += 1;
    }

    /// Set the displayed flag of a node.
    pub fn set_displayed(&self, node: NodeId, displayed: bool) {
        if let Some(n) = self.state.borrow_mut().nodes.get_mut(&node) {
            n.displayed = displayed;
        }
    }

    /// Set the enabled flag of a node.
    pub fn set_enabled(&self, node: NodeId, enabled: bool) {
        if let Some(n) = self.state.borrow_mut().nodes.get_mut(&node) {
            n.enabled = enabled;
        }
    }

    /// Report the node as not displayed for the next `polls` visibility
    /// probes, then fall back to its displayed flag.
    pub fn reveal_after(&self, node: NodeId, polls: u32) {
        if let Some(n) = self.state.borrow_mut().nodes.get_mut(&node) {
            n.reveal_after = polls;
        }
    }

    /// Keep the node out of every lookup until `trigger` has been clicked,
    /// as a navigation click revealing a new page region would.
    pub fn reveal_on_click(&self, node: NodeId, trigger: NodeId) {
        if let Some(n) = self.state.borrow_mut().nodes.get_mut(&node) {
            n.reveal_on_click = Some(trigger);
        }
    }

    /// Make the next `count` clicks on the node fail with a stale signal.
    pub fn poison_clicks(&self, node: NodeId, count: u32) {
        if let Some(n) = self.state.borrow_mut().nodes.get_mut(&node) {
            n.poisoned_clicks = count;
        }
    }

    /// Set an attribute value on a node.
    pub fn set_attribute(&self, node: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(n) = self.state.borrow_mut().nodes.get_mut(&node) {
            n.attributes.insert(name.into(), value.into());
        }
    }

    /// Set a computed CSS property on a node.
    pub fn set_css(&self, node: NodeId, property: impl Into<String>, value: impl Into<String>) {
        if let Some(n) = self.state.borrow_mut().nodes.get_mut(&node) {
            n.css.insert(property.into(), value.into());
        }
    }

    /// Queue a result for `execute_script(code)`. Queued values are
    /// consumed in order; the last one repeats forever.
    pub fn push_script_result(&self, code: impl Into<String>, value: Value) {
        self.state
            .borrow_mut()
            .scripts
            .entry(code.into())
            .or_default()
            .push_back(value);
    }

    /// A current-epoch handle to a node, for preset roots and assertions.
    #[must_use]
    pub fn handle(&self, node: NodeId) -> ElementHandle {
        self.state.borrow().handle(node)
    }

    /// Nodes clicked so far, in order.
    #[must_use]
    pub fn clicks(&self) -> Vec<NodeId> {
        self.state.borrow().clicks.clone()
    }

    /// Keystrokes sent so far, in order.
    #[must_use]
    pub fn keys(&self) -> Vec<(NodeId, String)> {
        self.state.borrow().keys.clone()
    }

    /// Nodes cleared so far, in order.
    #[must_use]
    pub fn cleared(&self) -> Vec<NodeId> {
        self.state.borrow().cleared.clone()
    }

    /// Nodes focused so far, in order.
    #[must_use]
    pub fn focused(&self) -> Vec<NodeId> {
        self.state.borrow().focused.clone()
    }

    fn scope_node(&self, scope: Scope<'_>) -> VistaResult<Option<NodeId>> {
        match scope {
            Scope::Document => Ok(None),
            Scope::Element(handle) => Ok(Some(self.state.borrow().deref(handle)?)),
        }
    }
}

impl DriverAdapter for FakePage {
    fn find_one(&self, scope: Scope<'_>, locator: &Locator) -> VistaResult<ElementHandle> {
        let scope_node = self.scope_node(scope)?;
        let state = self.state.borrow();
        state
            .matching(scope_node, locator)
            .first()
            .map(|id| state.handle(*id))
            .ok_or_else(|| VistaError::NotFound {
                locator: locator.clone(),
            })
    }

    fn find_all(&self, scope: Scope<'_>, locator: &Locator) -> VistaResult<Vec<ElementHandle>> {
        let scope_node = self.scope_node(scope)?;
        let state = self.state.borrow();
        Ok(state
            .matching(scope_node, locator)
            .into_iter()
            .map(|id| state.handle(id))
            .collect())
    }

    fn click(&self, element: &ElementHandle) -> VistaResult<()> {
        let mut state = self.state.borrow_mut();
        let node = state.deref(element)?;
        let poisoned = {
            let n = state.nodes.get_mut(&node).expect("deref checked presence");
            if n.poisoned_clicks > 0 {
                n.poisoned_clicks -= 1;
                true
            } else {
                false
            }
        };
        if poisoned {
            return Err(VistaError::stale(format!("{element} detached mid-click")));
        }
        state.clicks.push(node);
        Ok(())
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> VistaResult<()> {
        let mut state = self.state.borrow_mut();
        let node = state.deref(element)?;
        state.keys.push((node, text.to_string()));
        Ok(())
    }

    fn clear(&self, element: &ElementHandle) -> VistaResult<()> {
        let mut state = self.state.borrow_mut();
        let node = state.deref(element)?;
        state.cleared.push(node);
        Ok(())
    }

    fn get_attribute(&self, element: &ElementHandle, name: &str) -> VistaResult<String> {
        let state = self.state.borrow();
        let node = state.deref(element)?;
        Ok(state.nodes[&node]
            .attributes
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    fn css_value(&self, element: &ElementHandle, property: &str) -> VistaResult<String> {
        let state = self.state.borrow();
        let node = state.deref(element)?;
        Ok(state.nodes[&node]
            .css
            .get(property)
            .cloned()
            .unwrap_or_default())
    }

    fn focus(&self, element: &ElementHandle) -> VistaResult<()> {
        let mut state = self.state.borrow_mut();
        let node = state.deref(element)?;
        state.focused.push(node);
        Ok(())
    }

    fn is_displayed(&self, element: &ElementHandle) -> VistaResult<bool> {
        let mut state = self.state.borrow_mut();
        let node = state.deref(element)?;
        let n = state.nodes.get_mut(&node).expect("deref checked presence");
        if n.reveal_after > 0 {
            n.reveal_after -= 1;
            return Ok(false);
        }
        Ok(n.displayed)
    }

    fn is_enabled(&self, element: &ElementHandle) -> VistaResult<bool> {
        let state = self.state.borrow();
        let node = state.deref(element)?;
        Ok(state.nodes[&node].enabled)
    }

    fn execute_script(&self, code: &str) -> VistaResult<Value> {
        let mut state = self.state.borrow_mut();
        match state.scripts.get_mut(code) {
            Some(queue) if queue.len() > 1 => Ok(queue.pop_front().expect("len checked")),
            Some(queue) => Ok(queue.front().cloned().unwrap_or(Value::Null)),
            None => Ok(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page_with_body() -> (FakePage, NodeId) {
        let page = FakePage::new();
        let body = page.insert(None, &[Locator::document_body()]);
        (page, body)
    }

    mod lookup_tests {
        use super::*;

        #[test]
        fn test_find_all_scopes_to_descendants() {
            let (page, body) = page_with_body();
            let aside = page.insert(None, &[Locator::css("aside")]);
            let inside = page.insert(Some(body), &[Locator::css(".row")]);
            let _outside = page.insert(Some(aside), &[Locator::css(".row")]);

            let root = page.handle(body);
            let found = page
                .find_all(Scope::Element(&root), &Locator::css(".row"))
                .unwrap();
            assert_eq!(found, vec![page.handle(inside)]);
        }

        #[test]
        fn test_find_one_miss_is_not_found() {
            let (page, _body) = page_with_body();
            let err = page
                .find_one(Scope::Document, &Locator::css("#missing"))
                .unwrap_err();
            assert!(matches!(err, VistaError::NotFound { .. }));
        }

        #[test]
        fn test_nested_descendants_are_in_scope() {
            let (page, body) = page_with_body();
            let section = page.insert(Some(body), &[Locator::css("section")]);
            let deep = page.insert(Some(section), &[Locator::css("button")]);

            let root = page.handle(body);
            let found = page
                .find_one(Scope::Element(&root), &Locator::css("button"))
                .unwrap();
            assert_eq!(found, page.handle(deep));
        }
    }

    mod staleness_tests {
        use super::*;

        #[test]
        fn test_invalidate_all_makes_handles_stale() {
            let (page, body) = page_with_body();
            let handle = page.handle(body);
            page.invalidate_all();
            let err = page.click(&handle).unwrap_err();
            assert!(err.is_stale());
            // re-lookup yields a usable handle
            let fresh = page
                .find_one(Scope::Document, &Locator::document_body())
                .unwrap();
            assert!(page.click(&fresh).is_ok());
        }

        #[test]
        fn test_removed_node_handle_is_stale() {
            let (page, body) = page_with_body();
            let handle = page.handle(body);
            page.remove(body);
            assert!(page.is_displayed(&handle).unwrap_err().is_stale());
        }

        #[test]
        fn test_poisoned_clicks_go_stale_then_recover() {
            let (page, body) = page_with_body();
            let handle = page.handle(body);
            page.poison_clicks(body, 1);
            assert!(page.click(&handle).unwrap_err().is_stale());
            assert!(page.click(&handle).is_ok());
        }
    }

    mod visibility_tests {
        use super::*;

        #[test]
        fn test_reveal_after_counts_probes() {
            let (page, body) = page_with_body();
            let handle = page.handle(body);
            page.reveal_after(body, 2);
            assert!(!page.is_displayed(&handle).unwrap());
            assert!(!page.is_displayed(&handle).unwrap());
            assert!(page.is_displayed(&handle).unwrap());
        }
    }

    mod script_tests {
        use super::*;

        #[test]
        fn test_script_results_consume_in_order_then_stick() {
            let page = FakePage::new();
            page.push_script_result("return document.readyState;", json!("loading"));
            page.push_script_result("return document.readyState;", json!("complete"));
            assert_eq!(
                page.execute_script("return document.readyState;").unwrap(),
                json!("loading")
            );
            assert_eq!(
                page.execute_script("return document.readyState;").unwrap(),
                json!("complete")
            );
            assert_eq!(
                page.execute_script("return document.readyState;").unwrap(),
                json!("complete")
            );
        }

        #[test]
        fn test_unknown_script_is_null() {
            let page = FakePage::new();
            assert_eq!(page.execute_script("return 1;").unwrap(), Value::Null);
        }
    }

    mod interaction_log_tests {
        use super::*;

        #[test]
        fn test_interactions_are_logged_in_order() {
            let (page, body) = page_with_body();
            let input = page.insert(Some(body), &[Locator::css("input")]);
            let handle = page.handle(input);
            page.clear(&handle).unwrap();
            page.send_keys(&handle, "hola").unwrap();
            page.focus(&handle).unwrap();
            assert_eq!(page.cleared(), vec![input]);
            assert_eq!(page.keys(), vec![(input, "hola".to_string())]);
            assert_eq!(page.focused(), vec![input]);
        }

        #[test]
        fn test_attribute_and_css_defaults_are_empty() {
            let (page, body) = page_with_body();
            let handle = page.handle(body);
            assert_eq!(page.get_attribute(&handle, "tagName").unwrap(), "");
            page.set_attribute(body, "tagName", "BODY");
            page.set_css(body, "opacity", "1");
            assert_eq!(page.get_attribute(&handle, "tagName").unwrap(), "BODY");
            assert_eq!(page.css_value(&handle, "opacity").unwrap(), "1");
        }
    }
}
