//! Navigation views: pages reached through a navigation menu.
//!
//! A [`NavigationView`] pairs a root-strategy view with the locators of its
//! navigation link in both states. Opening the page is conditional: when
//! the active link is already present the browser is on the page and no
//! navigation happens; otherwise the inactive link is clicked and the view
//! waits for the active one before binding.

use crate::driver::Scope;
use crate::locator::Locator;
use crate::result::VistaResult;
use crate::view::View;

/// A view behind a navigation menu entry.
#[derive(Debug)]
pub struct NavigationView {
    view: View,
    link_inactive: Locator,
    link_active: Locator,
}

impl NavigationView {
    /// Wrap `view` (typically root-strategy) with its navigation link
    /// locators: `link_inactive` is clickable when the page is elsewhere,
    /// `link_active` is present once the page is current.
    #[must_use]
    pub fn new(view: View, link_inactive: Locator, link_active: Locator) -> Self {
        Self {
            view,
            link_inactive,
            link_active,
        }
    }

    /// Whether the browser is already on this page.
    #[must_use]
    pub fn current(&self) -> bool {
        self.view
            .driver()
            .find_one(Scope::Document, &self.link_active)
            .is_ok()
    }

    /// Navigate to the page if needed, then bind the view.
    pub fn open(&mut self) -> VistaResult<()> {
        if !self.current() {
            self.navigate()?;
        }
        self.view.load()
    }

    /// Re-enter the page through its active link and re-bind once the
    /// resulting page load settles. One stale retry, as everywhere.
    pub fn reload(&mut self) -> VistaResult<()> {
        match self.try_reload() {
            Err(err) if err.is_stale() => {
                tracing::debug!(error = %err, "stale navigation link; re-binding and retrying once");
                self.view.load()?;
                self.try_reload()
            }
            other => other,
        }
    }

    /// The wrapped view.
    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    /// The wrapped view, mutably.
    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// Unwrap into the inner view.
    #[must_use]
    pub fn into_view(self) -> View {
        self.view
    }

    fn navigate(&mut self) -> VistaResult<()> {
        let link = self.view.wait_displayed(&self.link_inactive)?;
        self.view.driver().click(&link)?;
        self.view.wait_displayed(&self.link_active)?;
        Ok(())
    }

    fn try_reload(&mut self) -> VistaResult<()> {
        let link = self.view.find_global(&self.link_active)?;
        self.view.driver().click(&link)?;
        self.view.wait_page_loaded()
    }
}

impl std::ops::Deref for NavigationView {
    type Target = View;

    fn deref(&self) -> &Self::Target {
        &self.view
    }
}

impl std::ops::DerefMut for NavigationView {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.view
    }
}
