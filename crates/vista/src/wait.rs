//! Wait primitives: block the calling flow until a predicate yields a
//! value or a timeout elapses.
//!
//! Everything here is synchronous and single-threaded: the poll loop sleeps
//! the calling thread between probes, and the only form of cancellation is
//! the timeout itself.

use crate::driver::{ElementHandle, Scope};
use crate::locator::Locator;
use crate::result::{VistaError, VistaResult};
use crate::view::View;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Script probing the document ready state.
pub const READY_STATE_SCRIPT: &str = "return document.readyState;";

/// Poll-loop runner with a timeout and an interval.
#[derive(Debug, Clone)]
pub struct Waiter {
    timeout: Duration,
    poll_interval: Duration,
}

impl Waiter {
    /// Create a waiter with an explicit timeout and poll interval.
    #[must_use]
    pub const fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Replace the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Poll `predicate` until it returns a value.
    ///
    /// The predicate is checked immediately, so an already-true condition
    /// costs no polling delay. On timeout the error carries the elapsed
    /// time and `description`.
    pub fn until<T>(
        &self,
        description: &str,
        mut predicate: impl FnMut() -> Option<T>,
    ) -> VistaResult<T> {
        let start = Instant::now();
        loop {
            if let Some(value) = predicate() {
                return Ok(value);
            }
            if start.elapsed() >= self.timeout {
                tracing::debug!(waiting_for = description, elapsed = ?start.elapsed(), "wait timed out");
                return Err(VistaError::Timeout {
                    elapsed: start.elapsed(),
                    waiting_for: description.to_string(),
                });
            }
            std::thread::sleep(self.poll_interval);
        }
    }
}

impl View {
    fn waiter(&self, timeout: Duration) -> Waiter {
        Waiter::new(timeout, self.config().poll_interval)
    }

    /// Wait until `locator` resolves to a displayed element, with the
    /// configured timeout.
    pub fn wait_displayed(&mut self, locator: &Locator) -> VistaResult<ElementHandle> {
        self.wait_displayed_for(locator, self.config().wait_timeout)
    }

    /// Wait until `locator` resolves to a displayed element.
    ///
    /// A stale signal during a probe re-binds the view (only when it has no
    /// parent-scoped element) and counts as "not yet" rather than failing
    /// the wait.
    pub fn wait_displayed_for(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> VistaResult<ElementHandle> {
        let waiter = self.waiter(timeout);
        waiter.until(&format!("{locator} to be displayed"), || {
            self.probe_interactable(locator, false)
        })
    }

    /// Wait until `locator` resolves to a displayed, enabled element, with
    /// the configured timeout.
    pub fn wait_clickable(&mut self, locator: &Locator) -> VistaResult<ElementHandle> {
        self.wait_clickable_for(locator, self.config().wait_timeout)
    }

    /// Wait until `locator` resolves to a displayed, enabled element.
    pub fn wait_clickable_for(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> VistaResult<ElementHandle> {
        let waiter = self.waiter(timeout);
        waiter.until(&format!("{locator} to be clickable"), || {
            self.probe_interactable(locator, true)
        })
    }

    /// Wait until `locator` matches nothing, a hidden element, or a stale
    /// one (the element is gone either way).
    pub fn wait_hidden(&mut self, locator: &Locator) -> VistaResult<()> {
        let waiter = self.waiter(self.config().wait_timeout);
        waiter.until(&format!("{locator} to be hidden"), || {
            let scope = Scope::from_root(self.root_element());
            let element = match self.driver().find_one(scope, locator) {
                Ok(element) => element,
                Err(_) => return Some(()),
            };
            match self.driver().is_displayed(&element) {
                Ok(false) => Some(()),
                Ok(true) => None,
                Err(err) if err.is_stale() => Some(()),
                Err(_) => None,
            }
        })
    }

    /// Wait until `document.readyState` is `complete`, then re-run `load`
    /// (the DOM has changed under the view).
    pub fn wait_page_loaded(&mut self) -> VistaResult<()> {
        let waiter = self.waiter(self.config().wait_timeout);
        waiter.until("page to finish loading", || {
            match self.driver().execute_script(READY_STATE_SCRIPT) {
                Ok(Value::String(state)) if state == "complete" => Some(()),
                _ => None,
            }
        })?;
        self.load()
    }

    /// Wait until the configured JS library reports zero outstanding async
    /// requests, with the configured timeout.
    pub fn wait_ajax_idle(&mut self) -> VistaResult<()> {
        self.wait_ajax_idle_for(self.config().wait_timeout)
    }

    /// Wait until the configured JS library reports zero outstanding async
    /// requests.
    pub fn wait_ajax_idle_for(&mut self, timeout: Duration) -> VistaResult<()> {
        let script = self.config().js_library.pending_requests_script();
        let waiter = self.waiter(timeout);
        waiter.until("pending async requests to drain", || {
            match self.driver().execute_script(script) {
                Ok(value) if value.as_u64() == Some(0) => Some(()),
                _ => None,
            }
        })
    }

    /// Wait until the view's own root is fully faded in (css `opacity` 1).
    pub fn wait_fade_in(&mut self) -> VistaResult<()> {
        let root = self.root_element().cloned().ok_or(VistaError::Unbound)?;
        let waiter = self.waiter(self.config().wait_timeout);
        waiter.until("root element to fade in", || {
            match self.driver().css_value(&root, "opacity") {
                Ok(opacity) => opacity
                    .parse::<f64>()
                    .map_or(false, |value| value >= 1.0)
                    .then_some(()),
                Err(_) => None,
            }
        })
    }

    /// One displayed/clickable probe; staleness re-binds parentless views.
    fn probe_interactable(
        &mut self,
        locator: &Locator,
        require_enabled: bool,
    ) -> Option<ElementHandle> {
        let scope = Scope::from_root(self.root_element());
        let attempt = self.driver().find_one(scope, locator).and_then(|element| {
            let displayed = self.driver().is_displayed(&element)?;
            let enabled = !require_enabled || self.driver().is_enabled(&element)?;
            Ok((displayed && enabled).then_some(element))
        });
        match attempt {
            Ok(found) => found,
            Err(err) if err.is_stale() => {
                if self.parent_element().is_none() {
                    if let Err(rebind) = self.bind() {
                        tracing::debug!(error = %rebind, "re-bind during wait probe failed");
                    }
                }
                None
            }
            Err(_) => None,
        }
    }
}
