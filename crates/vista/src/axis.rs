//! Element info and DOM-order helpers.
//!
//! These compare the relative position of bound views through the sibling
//! xpath axes of the root's own tag, and expose the root's markup for
//! assertions.

use crate::driver::ElementHandle;
use crate::locator::Locator;
use crate::result::{VistaError, VistaResult};
use crate::view::View;

impl View {
    /// The tag name of the bound root element, cached until the next
    /// re-bind.
    pub fn tag_name(&mut self) -> VistaResult<String> {
        if let Some(tag) = self.cached_tag_name() {
            return Ok(tag.to_string());
        }
        let tag = self.recovering(|view| {
            let root = view.root_element().ok_or(VistaError::Unbound)?;
            view.driver().get_attribute(root, "tagName")
        })?;
        self.set_cached_tag_name(tag.clone());
        Ok(tag)
    }

    /// The inner HTML of the bound root, or `None` when unbound.
    pub fn to_html(&mut self) -> VistaResult<Option<String>> {
        if self.root_element().is_none() {
            return Ok(None);
        }
        self.recovering(|view| {
            let root = view.root_element().ok_or(VistaError::Unbound)?;
            view.driver().get_attribute(root, "innerHTML")
        })
        .map(Some)
    }

    /// Elements on the preceding-sibling axis of the root, same tag.
    pub fn preceding_sibling_elements(&mut self) -> VistaResult<Vec<ElementHandle>> {
        let tag = self.tag_name()?;
        self.find_all(&Locator::xpath(format!("./preceding-sibling::{tag}")))
    }

    /// Elements on the following-sibling axis of the root, same tag.
    pub fn following_sibling_elements(&mut self) -> VistaResult<Vec<ElementHandle>> {
        let tag = self.tag_name()?;
        self.find_all(&Locator::xpath(format!("./following-sibling::{tag}")))
    }

    /// Whether this view's root comes after `other`'s in DOM order.
    pub fn after(&mut self, other: &View) -> VistaResult<bool> {
        let other_root = other.root_element().cloned().ok_or(VistaError::Unbound)?;
        Ok(self.preceding_sibling_elements()?.contains(&other_root))
    }

    /// Whether this view's root comes before `other`'s in DOM order.
    pub fn before(&mut self, other: &View) -> VistaResult<bool> {
        let other_root = other.root_element().cloned().ok_or(VistaError::Unbound)?;
        Ok(self.following_sibling_elements()?.contains(&other_root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakePage;
    use crate::view::ViewDescriptor;
    use std::rc::Rc;

    fn loaded_view(page: &FakePage, locator: Locator) -> View {
        let descriptor = ViewDescriptor::builder("row").matching(locator).build();
        let mut view = View::new(Rc::new(page.clone()), descriptor);
        view.load().unwrap();
        view
    }

    mod info_tests {
        use super::*;

        #[test]
        fn test_tag_name_reads_and_caches() {
            let page = FakePage::new();
            let body = page.insert(None, &[Locator::document_body()]);
            let row = page.insert(Some(body), &[Locator::css(".row")]);
            page.set_attribute(row, "tagName", "TR");

            let mut view = loaded_view(&page, Locator::css(".row"));
            assert_eq!(view.tag_name().unwrap(), "TR");
            assert_eq!(view.tag_name().unwrap(), "TR");
        }

        #[test]
        fn test_tag_name_requires_binding() {
            let page = FakePage::new();
            let descriptor = ViewDescriptor::builder("row")
                .matching(Locator::css(".row"))
                .build();
            let mut view = View::new(Rc::new(page), descriptor);
            assert!(matches!(
                view.tag_name().unwrap_err(),
                VistaError::Unbound
            ));
        }

        #[test]
        fn test_to_html_returns_markup_when_bound() {
            let page = FakePage::new();
            let body = page.insert(None, &[Locator::document_body()]);
            let card = page.insert(Some(body), &[Locator::css(".card")]);
            page.set_attribute(card, "innerHTML", "<p>hola</p>");

            let mut view = loaded_view(&page, Locator::css(".card"));
            assert_eq!(view.to_html().unwrap(), Some("<p>hola</p>".to_string()));
        }

        #[test]
        fn test_to_html_is_none_when_unbound() {
            let page = FakePage::new();
            let descriptor = ViewDescriptor::builder("card")
                .matching(Locator::css(".card"))
                .build();
            let mut view = View::new(Rc::new(page), descriptor);
            assert_eq!(view.to_html().unwrap(), None);
        }
    }

    mod order_tests {
        use super::*;

        #[test]
        fn test_after_when_other_precedes() {
            let page = FakePage::new();
            let body = page.insert(None, &[Locator::document_body()]);
            let second = page.insert(Some(body), &[Locator::css(".second")]);
            page.set_attribute(second, "tagName", "TR");
            // the preceding row sits on `second`'s preceding-sibling axis
            let first = page.insert(
                Some(second),
                &[
                    Locator::css(".first"),
                    Locator::xpath("./preceding-sibling::TR"),
                ],
            );
            page.set_attribute(first, "tagName", "TR");

            let other = loaded_view(&page, Locator::css(".first"));
            let mut view = loaded_view(&page, Locator::css(".second"));
            assert!(view.after(&other).unwrap());
            assert!(!view.before(&other).unwrap());
        }

        #[test]
        fn test_after_is_false_without_preceding_siblings() {
            let page = FakePage::new();
            let body = page.insert(None, &[Locator::document_body()]);
            let first = page.insert(Some(body), &[Locator::css(".first")]);
            let second = page.insert(Some(body), &[Locator::css(".second")]);
            page.set_attribute(first, "tagName", "TR");
            page.set_attribute(second, "tagName", "TR");

            let other = loaded_view(&page, Locator::css(".second"));
            let mut view = loaded_view(&page, Locator::css(".first"));
            assert!(!view.after(&other).unwrap());
        }

        #[test]
        fn test_order_requires_both_views_bound() {
            let page = FakePage::new();
            let body = page.insert(None, &[Locator::document_body()]);
            let first = page.insert(Some(body), &[Locator::css(".first")]);
            page.set_attribute(first, "tagName", "TR");

            let unbound = View::new(
                Rc::new(page.clone()),
                ViewDescriptor::builder("ghost")
                    .matching(Locator::css(".ghost"))
                    .build(),
            );
            let mut view = loaded_view(&page, Locator::css(".first"));
            assert!(matches!(
                view.after(&unbound).unwrap_err(),
                VistaError::Unbound
            ));
        }
    }
}
