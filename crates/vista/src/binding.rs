//! The binding walk: lookup sequence in, single bound element out.
//!
//! Each step of the sequence must match exactly one element under the
//! current scope. Zero matches means the page does not contain the view;
//! more than one means the locator is ambiguous, and the engine refuses to
//! guess which match was intended — callers narrow the locator instead.

use crate::driver::{DriverAdapter, ElementHandle, Scope};
use crate::locator::Locator;
use crate::result::{VistaError, VistaResult};

/// Walk `sequence` from `scope_root` (the document when `None`), descending
/// through the single match of every step.
///
/// The returned element is the final step's match. Failures carry the
/// locator and index of the step that failed, so a two-step sequence whose
/// first step misses reports that first step, not the target.
pub fn resolve(
    driver: &dyn DriverAdapter,
    scope_root: Option<&ElementHandle>,
    sequence: &[Locator],
) -> VistaResult<ElementHandle> {
    let mut current: Option<ElementHandle> = None;
    for (step, locator) in sequence.iter().enumerate() {
        let scope = Scope::from_root(current.as_ref().or(scope_root));
        let mut matches = driver.find_all(scope, locator)?;
        match matches.len() {
            0 => {
                return Err(VistaError::LookupUndefinedElement {
                    locator: locator.clone(),
                    step,
                })
            }
            1 => current = matches.pop(),
            count => {
                return Err(VistaError::LookupMultipleElements {
                    locator: locator.clone(),
                    step,
                    count,
                })
            }
        }
        tracing::trace!(step, %locator, "lookup step resolved");
    }
    current.ok_or(VistaError::Unbound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakePage;

    mod resolve_tests {
        use super::*;

        #[test]
        fn test_single_match_chain_binds_to_final_step() {
            let page = FakePage::new();
            let body = page.insert(None, &[Locator::document_body()]);
            let header = page.insert(Some(body), &[Locator::css("header")]);
            let button = page.insert(Some(header), &[Locator::css("button")]);

            let bound = resolve(
                &page,
                None,
                &[
                    Locator::document_body(),
                    Locator::css("header"),
                    Locator::css("button"),
                ],
            )
            .unwrap();
            assert_eq!(bound, page.handle(button));
        }

        #[test]
        fn test_zero_matches_names_the_failing_step() {
            let page = FakePage::new();
            let _body = page.insert(None, &[Locator::document_body()]);

            let err = resolve(
                &page,
                None,
                &[Locator::document_body(), Locator::css("#missing")],
            )
            .unwrap_err();
            match err {
                VistaError::LookupUndefinedElement { locator, step } => {
                    assert_eq!(locator, Locator::css("#missing"));
                    assert_eq!(step, 1);
                }
                other => panic!("expected LookupUndefinedElement, got {other}"),
            }
        }

        #[test]
        fn test_multiple_matches_refuse_to_guess() {
            let page = FakePage::new();
            let body = page.insert(None, &[Locator::document_body()]);
            page.insert(Some(body), &[Locator::css(".row")]);
            page.insert(Some(body), &[Locator::css(".row")]);

            let err = resolve(
                &page,
                None,
                &[Locator::document_body(), Locator::css(".row")],
            )
            .unwrap_err();
            match err {
                VistaError::LookupMultipleElements { count, step, .. } => {
                    assert_eq!(count, 2);
                    assert_eq!(step, 1);
                }
                other => panic!("expected LookupMultipleElements, got {other}"),
            }
        }

        #[test]
        fn test_scope_root_narrows_the_first_step() {
            let page = FakePage::new();
            let left = page.insert(None, &[Locator::css("section")]);
            let right = page.insert(None, &[Locator::css("aside")]);
            let target = page.insert(Some(left), &[Locator::css("a")]);
            let _decoy = page.insert(Some(right), &[Locator::css("a")]);

            let root = page.handle(left);
            let bound = resolve(&page, Some(&root), &[Locator::css("a")]).unwrap();
            assert_eq!(bound, page.handle(target));
        }

        #[test]
        fn test_first_step_failure_not_attributed_to_target() {
            // relative-path shape: the intermediate (header) step misses
            let page = FakePage::new();
            let _body = page.insert(None, &[Locator::document_body()]);

            let err = resolve(
                &page,
                None,
                &[Locator::css("header"), Locator::xpath("./button")],
            )
            .unwrap_err();
            match err {
                VistaError::LookupUndefinedElement { locator, step } => {
                    assert_eq!(locator, Locator::css("header"));
                    assert_eq!(step, 0);
                }
                other => panic!("expected LookupUndefinedElement, got {other}"),
            }
        }

        #[test]
        fn test_empty_sequence_cannot_bind() {
            let page = FakePage::new();
            assert!(matches!(
                resolve(&page, None, &[]),
                Err(VistaError::Unbound)
            ));
        }
    }

    mod resolve_properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Any chain where every step matches exactly one descendant
            /// binds, and the bound element is the final step's match.
            #[test]
            fn prop_single_match_chains_always_bind(depth in 1usize..8) {
                let page = FakePage::new();
                let mut parent = None;
                let mut sequence = Vec::new();
                let mut last = 0;
                for level in 0..depth {
                    let locator = Locator::css(format!(".level-{level}"));
                    last = page.insert(parent, std::slice::from_ref(&locator));
                    sequence.push(locator);
                    parent = Some(last);
                }

                let bound = resolve(&page, None, &sequence).unwrap();
                prop_assert_eq!(bound, page.handle(last));
            }
        }
    }
}
