//! Element resolution across markup variants.
//!
//! Turns a [`Role`] into zero or one live element by walking the role's
//! candidate selectors in priority order:
//!
//! 1. the first candidate's first match that is present **and** visible wins;
//! 2. failing that across every candidate, the first candidate's first match
//!    that is merely present wins (elements still animating into view);
//! 3. otherwise the role is absent.
//!
//! Both passes are served from a single sweep over the candidates: the first
//! present match is remembered while looking for a visible one. Resolution is
//! read-only and never fails; query errors count as "no match".

use crate::driver::{DomElement, PageDriver};
use crate::locator::{LocatorCandidates, Role, RoleLocators};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How candidate matches are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvePolicy {
    /// Prefer a visible match; fall back to the first present match
    #[default]
    VisibleThenPresent,
    /// Take the first present match without checking visibility
    FirstPresent,
}

/// Resolves roles against the live page
pub struct ElementResolver<'a, D: PageDriver> {
    driver: &'a D,
    locators: &'a RoleLocators,
    policy: ResolvePolicy,
}

impl<D: PageDriver> std::fmt::Debug for ElementResolver<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementResolver")
            .field("locators", &self.locators)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<'a, D: PageDriver> ElementResolver<'a, D> {
    /// Create a resolver with the default two-pass policy
    #[must_use]
    pub const fn new(driver: &'a D, locators: &'a RoleLocators) -> Self {
        Self {
            driver,
            locators,
            policy: ResolvePolicy::VisibleThenPresent,
        }
    }

    /// Set the resolution policy
    #[must_use]
    pub const fn with_policy(mut self, policy: ResolvePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active policy
    #[must_use]
    pub const fn policy(&self) -> ResolvePolicy {
        self.policy
    }

    /// Resolve a role to its best live element, or `None`
    pub async fn resolve(&self, role: Role) -> Option<D::Element> {
        self.resolve_candidates(role, self.locators.for_role(role))
            .await
    }

    /// Whether the role currently resolves
    pub async fn is_present(&self, role: Role) -> bool {
        self.resolve(role).await.is_some()
    }

    /// Resolve an explicit candidate list on behalf of `role`
    pub async fn resolve_candidates(
        &self,
        role: Role,
        candidates: &LocatorCandidates,
    ) -> Option<D::Element> {
        let mut fallback: Option<D::Element> = None;

        for selector in candidates {
            let matches = match self.driver.find_all(selector).await {
                Ok(matches) => matches,
                Err(err) => {
                    debug!(%role, %selector, error = %err, "candidate query failed");
                    continue;
                }
            };

            if self.policy == ResolvePolicy::FirstPresent {
                if let Some(first) = matches.into_iter().next() {
                    debug!(%role, %selector, "resolved first present match");
                    return Some(first);
                }
                continue;
            }

            for element in matches {
                if element.is_visible().await.unwrap_or(false) {
                    debug!(%role, %selector, "resolved visible match");
                    return Some(element);
                }
                if fallback.is_none() {
                    debug!(%role, %selector, "remembering hidden match as fallback");
                    fallback = Some(element);
                }
            }
        }

        if fallback.is_none() {
            debug!(%role, candidates = candidates.len(), "role is absent");
        }
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_page::{FakeNode, FakePage};
    use crate::locator::Selector;
    use proptest::prelude::*;

    fn candidates() -> LocatorCandidates {
        LocatorCandidates::new([
            Selector::id("primary"),
            Selector::name("secondary"),
            Selector::css(".generic"),
        ])
    }

    fn locators() -> RoleLocators {
        RoleLocators::default().with_role(Role::EmailInput, candidates())
    }

    mod two_pass_tests {
        use super::*;

        #[tokio::test]
        async fn test_first_candidate_wins_when_visible() {
            let page = FakePage::new();
            let primary = page.add_node(FakeNode::new("p").matching(Selector::id("primary")));
            let _ = page.add_node(FakeNode::new("g").matching(Selector::css(".generic")));
            let locators = locators();
            let resolver = ElementResolver::new(&page, &locators);

            let el = resolver.resolve(Role::EmailInput).await.unwrap();
            assert_eq!(el.id(), primary);
        }

        #[tokio::test]
        async fn test_visible_later_candidate_beats_hidden_earlier_one() {
            let page = FakePage::new();
            let _ = page.add_node(FakeNode::new("p").matching(Selector::id("primary")).hidden());
            let generic = page.add_node(FakeNode::new("g").matching(Selector::css(".generic")));
            let locators = locators();
            let resolver = ElementResolver::new(&page, &locators);

            let el = resolver.resolve(Role::EmailInput).await.unwrap();
            assert_eq!(el.id(), generic);
        }

        #[tokio::test]
        async fn test_hidden_decorative_duplicate_is_skipped() {
            let page = FakePage::new();
            let sel = Selector::css(".generic");
            let _ = page.add_node(FakeNode::new("decoy").matching(sel.clone()).hidden());
            let real = page.add_node(FakeNode::new("real").matching(sel));
            let locators = locators();
            let resolver = ElementResolver::new(&page, &locators);

            assert_eq!(resolver.resolve(Role::EmailInput).await.unwrap().id(), real);
        }

        #[tokio::test]
        async fn test_falls_back_to_first_present_when_nothing_visible() {
            let page = FakePage::new();
            let secondary = page.add_node(
                FakeNode::new("s")
                    .matching(Selector::name("secondary"))
                    .hidden(),
            );
            let _ = page.add_node(FakeNode::new("g").matching(Selector::css(".generic")).hidden());
            let locators = locators();
            let resolver = ElementResolver::new(&page, &locators);

            let el = resolver.resolve(Role::EmailInput).await.unwrap();
            assert_eq!(el.id(), secondary);
        }

        #[tokio::test]
        async fn test_absent_when_nothing_matches() {
            let page = FakePage::new();
            let _ = page.add_node(FakeNode::new("unrelated").matching(Selector::css(".x")));
            let locators = locators();
            let resolver = ElementResolver::new(&page, &locators);

            assert!(resolver.resolve(Role::EmailInput).await.is_none());
            assert!(!resolver.is_present(Role::EmailInput).await);
        }

        #[tokio::test]
        async fn test_query_errors_count_as_no_match() {
            let page = FakePage::new();
            page.fail_queries(Selector::id("primary"));
            let generic = page.add_node(FakeNode::new("g").matching(Selector::css(".generic")));
            let locators = locators();
            let resolver = ElementResolver::new(&page, &locators);

            assert_eq!(resolver.resolve(Role::EmailInput).await.unwrap().id(), generic);
        }

        #[tokio::test]
        async fn test_resolution_never_mutates() {
            let page = FakePage::login_form();
            let locators = RoleLocators::default();
            let resolver = ElementResolver::new(&page, &locators);
            for role in Role::ALL {
                let _ = resolver.resolve(role).await;
            }
            assert!(page.calls().is_empty());
        }
    }

    mod policy_tests {
        use super::*;

        #[tokio::test]
        async fn test_first_present_ignores_visibility() {
            let page = FakePage::new();
            let primary = page.add_node(FakeNode::new("p").matching(Selector::id("primary")).hidden());
            let _ = page.add_node(FakeNode::new("g").matching(Selector::css(".generic")));
            let locators = locators();
            let resolver =
                ElementResolver::new(&page, &locators).with_policy(ResolvePolicy::FirstPresent);

            assert_eq!(resolver.policy(), ResolvePolicy::FirstPresent);
            assert_eq!(resolver.resolve(Role::EmailInput).await.unwrap().id(), primary);
        }

        #[test]
        fn test_default_policy_is_two_pass() {
            assert_eq!(ResolvePolicy::default(), ResolvePolicy::VisibleThenPresent);
        }
    }

    mod property_tests {
        use super::*;

        /// (candidate index, visible) for each node in document order
        fn layouts() -> impl Strategy<Value = Vec<(usize, bool)>> {
            prop::collection::vec((0usize..3, any::<bool>()), 0..8)
        }

        fn expected(layout: &[(usize, bool)]) -> Option<usize> {
            for candidate in 0..3 {
                if let Some(pos) = layout.iter().position(|&(c, v)| c == candidate && v) {
                    return Some(pos);
                }
            }
            for candidate in 0..3 {
                if let Some(pos) = layout.iter().position(|&(c, _)| c == candidate) {
                    return Some(pos);
                }
            }
            None
        }

        proptest! {
            #[test]
            fn prop_two_pass_resolution(layout in layouts()) {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                let selectors: Vec<Selector> = candidates().iter().cloned().collect();
                let page = FakePage::new();
                for (i, &(candidate, visible)) in layout.iter().enumerate() {
                    let mut node = FakeNode::new(format!("n{i}")).matching(selectors[candidate].clone());
                    if !visible {
                        node = node.hidden();
                    }
                    let _ = page.add_node(node);
                }
                let locators = locators();
                let resolver = ElementResolver::new(&page, &locators);

                let resolved = runtime.block_on(resolver.resolve(Role::EmailInput));
                prop_assert_eq!(resolved.as_ref().map(crate::fake_page::FakeElement::id), expected(&layout));

                if layout.iter().any(|&(_, v)| v) {
                    let el = resolved.unwrap();
                    prop_assert!(runtime.block_on(el.is_visible()).unwrap());
                }
            }
        }
    }
}
