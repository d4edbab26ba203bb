//! In-memory page for driving the resolver and page object without a browser.
//!
//! A [`FakePage`] holds a flat list of [`FakeNode`]s. Each node declares the
//! exact selectors it answers to, whether it is visible, enabled, attached,
//! and what text or value it carries. Clicks can trigger scripted reactions
//! that mutate the page, which is how re-renders such as an error banner
//! appearing after submit are simulated.
//!
//! Every mutating call is recorded in a call history, mirroring the way a
//! browser session would be observed from outside.

use crate::driver::{DomElement, PageDriver};
use crate::locator::Selector;
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Index of a node inside a [`FakePage`]
pub type NodeId = usize;

/// Reaction run after a node is clicked
pub type ClickReaction = Arc<dyn Fn(&mut FakeDom) + Send + Sync>;

/// A single element of the fake DOM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeNode {
    /// Key used in the call history (e.g. "email")
    pub key: String,
    /// Selectors this node matches
    pub selectors: Vec<Selector>,
    /// Rendered with a non-zero box
    pub visible: bool,
    /// Not disabled
    pub enabled: bool,
    /// Currently in the document
    pub attached: bool,
    /// Stays out of the document until this many queries have been issued
    pub appears_after_queries: u64,
    /// Stays disabled until this many queries have been issued
    pub enabled_after_queries: u64,
    /// Text content
    pub text: String,
    /// `value` property
    pub value: String,
    /// Attributes
    pub attributes: HashMap<String, String>,
}

impl FakeNode {
    /// Create a visible, enabled, attached node
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            selectors: Vec::new(),
            visible: true,
            enabled: true,
            attached: true,
            appears_after_queries: 0,
            enabled_after_queries: 0,
            text: String::new(),
            value: String::new(),
            attributes: HashMap::new(),
        }
    }

    /// Add a selector the node answers to
    #[must_use]
    pub fn matching(mut self, selector: Selector) -> Self {
        self.selectors.push(selector);
        self
    }

    /// Mark as hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Mark as disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Start outside the document
    #[must_use]
    pub const fn detached(mut self) -> Self {
        self.attached = false;
        self
    }

    /// Attach only once `queries` element queries have been issued
    #[must_use]
    pub const fn appearing_after(mut self, queries: u64) -> Self {
        self.appears_after_queries = queries;
        self
    }

    /// Become enabled only once `queries` element queries have been issued
    #[must_use]
    pub const fn enabled_after(mut self, queries: u64) -> Self {
        self.enabled_after_queries = queries;
        self
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the `value` property
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Mutable state behind a [`FakePage`]
#[derive(Default)]
pub struct FakeDom {
    url: Option<String>,
    nodes: Vec<FakeNode>,
    reactions: HashMap<NodeId, ClickReaction>,
    interaction_failures: HashMap<NodeId, u32>,
    scroll_failures: HashSet<NodeId>,
    failing_selectors: HashSet<Selector>,
    navigation_error: Option<String>,
    queries: u64,
    calls: Vec<String>,
    quit: bool,
}

impl std::fmt::Debug for FakeDom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeDom")
            .field("url", &self.url)
            .field("nodes", &self.nodes)
            .field("queries", &self.queries)
            .field("calls", &self.calls)
            .field("quit", &self.quit)
            .finish_non_exhaustive()
    }
}

impl FakeDom {
    /// Node by id
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&FakeNode> {
        self.nodes.get(id)
    }

    /// Mutable node by id
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut FakeNode> {
        self.nodes.get_mut(id)
    }

    /// Id of the first node with the given key
    #[must_use]
    pub fn find_key(&self, key: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.key == key)
    }

    /// Mutable node by key
    pub fn node_by_key_mut(&mut self, key: &str) -> Option<&mut FakeNode> {
        self.nodes.iter_mut().find(|n| n.key == key)
    }

    fn is_present(&self, id: NodeId) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|n| n.attached && self.queries >= n.appears_after_queries)
    }

    fn is_enabled(&self, node: &FakeNode) -> bool {
        node.enabled && self.queries >= node.enabled_after_queries
    }

    fn live_node(&self, id: NodeId) -> ProbeResult<&FakeNode> {
        match self.nodes.get(id) {
            Some(node) if self.is_present(id) => Ok(node),
            Some(node) => Err(ProbeError::driver(format!(
                "stale element reference: {}",
                node.key
            ))),
            None => Err(ProbeError::driver(format!("unknown node {id}"))),
        }
    }

    fn interactable_node(&mut self, id: NodeId, action: &str) -> ProbeResult<&mut FakeNode> {
        let key = self.live_node(id)?.key.clone();
        if let Some(remaining) = self.interaction_failures.get_mut(&id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ProbeError::driver(format!(
                    "{action} on {key}: element not interactable"
                )));
            }
        }
        let ready = {
            let node = &self.nodes[id];
            node.visible && self.is_enabled(node)
        };
        if !ready {
            return Err(ProbeError::driver(format!(
                "{action} on {key}: element not interactable"
            )));
        }
        Ok(&mut self.nodes[id])
    }
}

/// In-memory [`PageDriver`] with a scriptable DOM.
///
/// Clones share the same DOM.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    dom: Arc<Mutex<FakeDom>>,
}

impl FakePage {
    /// Create an empty page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A login form with email, password, submit, eye icon and an error
    /// banner that renders after submit.
    ///
    /// Submitting with both fields blank shows a "required" message; any
    /// other submission shows an invalid-credentials message. Clicking the
    /// eye icon flips the password input between `password` and `text`.
    #[must_use]
    pub fn login_form() -> Self {
        let page = Self::login_form_without_toggle();
        let eye = page.add_node(
            FakeNode::new("eye")
                .matching(Selector::css("img.password-visible[alt*='Password']"))
                .with_attribute("alt", "Show Password"),
        );
        page.on_click(eye, |dom| {
            if let Some(password) = dom.node_by_key_mut("password") {
                let masked = password.attributes.get("type").map(String::as_str) == Some("password");
                let next = if masked { "text" } else { "password" };
                let _ = password.attributes.insert("type".to_string(), next.to_string());
            }
        });
        page
    }

    /// Same as [`FakePage::login_form`] but without the eye icon
    #[must_use]
    pub fn login_form_without_toggle() -> Self {
        let page = Self::new();
        let _ = page.add_node(
            FakeNode::new("email")
                .matching(Selector::id("formEmail"))
                .matching(Selector::name("email"))
                .with_attribute("type", "text"),
        );
        let _ = page.add_node(
            FakeNode::new("password")
                .matching(Selector::id("formPassword"))
                .matching(Selector::name("password"))
                .with_attribute("type", "password"),
        );
        let submit = page.add_node(
            FakeNode::new("submit")
                .matching(Selector::css("button.login-button"))
                .with_text("Log In"),
        );
        let _ = page.add_node(
            FakeNode::new("error")
                .matching(Selector::css(".error-message"))
                .detached(),
        );
        page.on_click(submit, |dom| {
            let blank = |dom: &FakeDom, key: &str| {
                dom.find_key(key)
                    .and_then(|id| dom.node(id))
                    .map_or(true, |n| n.value.trim().is_empty())
            };
            let message = if blank(&*dom, "email") && blank(&*dom, "password") {
                "Email and password are required"
            } else {
                "  Invalid email or password  "
            };
            if let Some(banner) = dom.node_by_key_mut("error") {
                banner.attached = true;
                banner.visible = true;
                banner.text = message.to_string();
            }
        });
        page
    }

    fn lock(&self) -> MutexGuard<'_, FakeDom> {
        self.dom.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a node, returning its id
    pub fn add_node(&self, node: FakeNode) -> NodeId {
        let mut dom = self.lock();
        dom.nodes.push(node);
        dom.nodes.len() - 1
    }

    /// Run `reaction` after every successful click on `id`
    pub fn on_click(&self, id: NodeId, reaction: impl Fn(&mut FakeDom) + Send + Sync + 'static) {
        let _ = self.lock().reactions.insert(id, Arc::new(reaction));
    }

    /// Make the next `count` interactions with `id` fail as not interactable
    pub fn fail_interactions(&self, id: NodeId, count: u32) {
        let _ = self.lock().interaction_failures.insert(id, count);
    }

    /// Make scrolling `id` into view fail
    pub fn fail_scroll(&self, id: NodeId) {
        let _ = self.lock().scroll_failures.insert(id);
    }

    /// Make queries for `selector` return a driver error
    pub fn fail_queries(&self, selector: Selector) {
        let _ = self.lock().failing_selectors.insert(selector);
    }

    /// Make navigation fail with `message`
    pub fn fail_navigation(&self, message: impl Into<String>) {
        self.lock().navigation_error = Some(message.into());
    }

    /// Inspect or mutate the DOM directly
    pub fn with_dom<T>(&self, f: impl FnOnce(&mut FakeDom) -> T) -> T {
        f(&mut *self.lock())
    }

    /// Snapshot of a node by key
    #[must_use]
    pub fn node(&self, key: &str) -> Option<FakeNode> {
        let dom = self.lock();
        dom.find_key(key).and_then(|id| dom.node(id)).cloned()
    }

    /// Call history
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Check if a call starting with `prefix` was made
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.lock().calls.iter().any(|c| c.starts_with(prefix))
    }

    /// Number of element queries issued so far
    #[must_use]
    pub fn query_count(&self) -> u64 {
        self.lock().queries
    }

    /// Last navigated URL
    #[must_use]
    pub fn url(&self) -> Option<String> {
        self.lock().url.clone()
    }

    /// Whether the session was terminated
    #[must_use]
    pub fn is_quit(&self) -> bool {
        self.lock().quit
    }
}

/// Handle to a node of a [`FakePage`]
#[derive(Debug, Clone)]
pub struct FakeElement {
    dom: Arc<Mutex<FakeDom>>,
    id: NodeId,
}

impl FakeElement {
    /// Node id this handle points at
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    fn lock(&self) -> MutexGuard<'_, FakeDom> {
        self.dom.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DomElement for FakeElement {
    async fn is_visible(&self) -> ProbeResult<bool> {
        Ok(self.lock().live_node(self.id)?.visible)
    }

    async fn is_enabled(&self) -> ProbeResult<bool> {
        let dom = self.lock();
        let node = dom.live_node(self.id)?;
        Ok(dom.is_enabled(node))
    }

    async fn click(&self) -> ProbeResult<()> {
        let mut dom = self.lock();
        let key = dom.interactable_node(self.id, "click")?.key.clone();
        dom.calls.push(format!("click:{key}"));
        if let Some(reaction) = dom.reactions.get(&self.id).cloned() {
            reaction(&mut *dom);
        }
        Ok(())
    }

    async fn clear(&self) -> ProbeResult<()> {
        let mut dom = self.lock();
        let node = dom.interactable_node(self.id, "clear")?;
        node.value.clear();
        let key = node.key.clone();
        dom.calls.push(format!("clear:{key}"));
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> ProbeResult<()> {
        let mut dom = self.lock();
        let node = dom.interactable_node(self.id, "type")?;
        node.value.push_str(text);
        let key = node.key.clone();
        dom.calls.push(format!("type:{key}:{text}"));
        Ok(())
    }

    async fn text(&self) -> ProbeResult<String> {
        Ok(self.lock().live_node(self.id)?.text.clone())
    }

    async fn value(&self) -> ProbeResult<String> {
        Ok(self.lock().live_node(self.id)?.value.clone())
    }

    async fn attribute(&self, name: &str) -> ProbeResult<Option<String>> {
        Ok(self.lock().live_node(self.id)?.attributes.get(name).cloned())
    }

    async fn scroll_into_view(&self) -> ProbeResult<()> {
        let mut dom = self.lock();
        let key = dom.live_node(self.id)?.key.clone();
        if dom.scroll_failures.contains(&self.id) {
            return Err(ProbeError::driver(format!("scroll {key}: no layout box")));
        }
        dom.calls.push(format!("scroll:{key}"));
        Ok(())
    }
}

#[async_trait]
impl PageDriver for FakePage {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> ProbeResult<()> {
        let mut dom = self.lock();
        if let Some(message) = dom.navigation_error.clone() {
            return Err(ProbeError::Navigation {
                url: url.to_string(),
                message,
            });
        }
        dom.calls.push(format!("navigate:{url}"));
        dom.url = Some(url.to_string());
        Ok(())
    }

    async fn find_all(&self, selector: &Selector) -> ProbeResult<Vec<FakeElement>> {
        let mut dom = self.lock();
        dom.queries += 1;
        if dom.failing_selectors.contains(selector) {
            return Err(ProbeError::driver(format!("invalid selector {selector}")));
        }
        let matches = (0..dom.nodes.len())
            .filter(|&id| dom.is_present(id) && dom.nodes[id].selectors.contains(selector))
            .map(|id| FakeElement {
                dom: Arc::clone(&self.dom),
                id,
            })
            .collect();
        Ok(matches)
    }

    async fn quit(&self) -> ProbeResult<()> {
        let mut dom = self.lock();
        dom.calls.push("quit".to_string());
        dom.quit = true;
        Ok(())
    }
}
