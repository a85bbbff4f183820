//! Generic action helpers built atop `find` and the stale-recovery
//! wrapper.
//!
//! Every helper resolves its target under the view's bound root and runs
//! the driver operation inside the recovery wrapper, so a DOM re-render
//! between bind and action costs one transparent re-bind instead of a
//! failed test.

use crate::driver::Scope;
use crate::locator::Locator;
use crate::result::{VistaError, VistaResult};
use crate::view::View;

fn submit_button() -> Locator {
    Locator::xpath(".//button[@type='submit']")
}

impl View {
    /// Click the element matching `locator`.
    pub fn click(&mut self, locator: &Locator) -> VistaResult<()> {
        let locator = locator.clone();
        self.recovering(move |view| {
            let root = view.root_element().ok_or(VistaError::Unbound)?;
            let element = view.driver().find_one(Scope::Element(root), &locator)?;
            view.driver().click(&element)
        })
    }

    /// Wait for the element to be displayed, click it, then wait until all
    /// async requests triggered by the click have drained.
    pub fn click_wait(&mut self, locator: &Locator) -> VistaResult<()> {
        let element = self.wait_displayed(locator)?;
        self.driver().click(&element)?;
        self.wait_ajax_idle()
    }

    /// Clear the element matching `locator`, then type `text` into it.
    pub fn fill(&mut self, locator: &Locator, text: &str) -> VistaResult<()> {
        let locator = locator.clone();
        let text = text.to_string();
        self.recovering(move |view| {
            let root = view.root_element().ok_or(VistaError::Unbound)?;
            let element = view.driver().find_one(Scope::Element(root), &locator)?;
            view.driver().send_keys(&element, "")?;
            view.driver().clear(&element)?;
            view.driver().send_keys(&element, &text)
        })
    }

    /// Clear the value of the element matching `locator`.
    ///
    /// An empty keystroke is sent first to gain focus, then the value is
    /// cleared.
    pub fn clear(&mut self, locator: &Locator) -> VistaResult<()> {
        let locator = locator.clone();
        self.recovering(move |view| {
            let root = view.root_element().ok_or(VistaError::Unbound)?;
            let element = view.driver().find_one(Scope::Element(root), &locator)?;
            view.driver().send_keys(&element, "")?;
            view.driver().clear(&element)
        })
    }

    /// Replace a textarea's content.
    pub fn textarea_content(&mut self, locator: &Locator, content: &str) -> VistaResult<()> {
        let locator = locator.clone();
        let content = content.to_string();
        self.recovering(move |view| {
            let root = view.root_element().ok_or(VistaError::Unbound)?;
            let element = view.driver().find_one(Scope::Element(root), &locator)?;
            view.driver().clear(&element)?;
            view.driver().send_keys(&element, &content)
        })
    }

    /// Move input focus to the element matching `locator`.
    pub fn focus(&mut self, locator: &Locator) -> VistaResult<()> {
        let locator = locator.clone();
        self.recovering(move |view| {
            let root = view.root_element().ok_or(VistaError::Unbound)?;
            let element = view.driver().find_one(Scope::Element(root), &locator)?;
            view.driver().focus(&element)
        })
    }

    /// Click the submit button under the root, wait for the resulting page
    /// load, and re-bind.
    pub fn submit(&mut self) -> VistaResult<()> {
        self.click(&submit_button())?;
        self.wait_page_loaded()
    }

    /// Choose an option from a script-enhanced select: open it, then click
    /// the option, waiting out async activity after each step.
    pub fn select_option(&mut self, select: &Locator, option: &Locator) -> VistaResult<()> {
        self.click_wait(select)?;
        self.click_wait(option)
    }

    /// Click the link with the exact text `text`, searched under the root
    /// when bound, the whole document otherwise.
    pub fn click_link(&mut self, text: &str) -> VistaResult<()> {
        let locator = Locator::link_text(text);
        self.recovering(move |view| {
            let scope = Scope::from_root(view.root_element());
            let element = view.driver().find_one(scope, &locator)?;
            view.driver().click(&element)
        })
    }
}
