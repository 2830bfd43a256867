//! In-memory DOM used by [`MockDriver`](super::MockDriver).
//!
//! Nodes carry a tag, attributes and own text. Visibility follows the rules
//! the sandbox CSS applies: `hidden` attribute, `ng-hide` class, inline
//! `display: none`, `input[type=hidden]` and bootstrap `.collapse` without
//! `.in` hide a node and its subtree.
//!
//! Behaviours are attached with delegated selectors (like jQuery `on`), so a
//! handler registered for `.select2-selection` fires for clicks on any
//! descendant of a matching node.

use super::css::CssSelector;
use crate::result::E2eResult;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Node identifier, unique for the lifetime of the process
pub type NodeId = u64;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

fn next_node_id() -> NodeId {
    NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Click/drop handler receiving the node that matched the delegated selector
pub type Handler = Arc<dyn Fn(&mut MockDom, NodeId) + Send + Sync>;
/// Key handler receiving the matched node and the key name (e.g. "Enter")
pub type KeyHandler = Arc<dyn Fn(&mut MockDom, NodeId, &str) + Send + Sync>;
/// Drop handler receiving the dragged node and the drop target
pub type DropHandler = Arc<dyn Fn(&mut MockDom, NodeId, NodeId) + Send + Sync>;
/// Page script hook receiving the JSON arguments
pub type ScriptHook =
    Arc<dyn Fn(&mut MockDom, &[serde_json::Value]) -> E2eResult<serde_json::Value> + Send + Sync>;

/// Builder for a DOM subtree
#[derive(Debug, Clone, Default)]
pub struct MockNode {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    children: Vec<MockNode>,
}

impl MockNode {
    /// Create a node with the given tag
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Set the `id` attribute
    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add CSS classes (space separated)
    #[must_use]
    pub fn class(mut self, classes: &str) -> Self {
        let merged = match self.attrs.get("class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {classes}"),
            _ => classes.to_string(),
        };
        let _ = self.attrs.insert("class".to_string(), merged);
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        let _ = self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    /// Set own text
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Append a child
    #[must_use]
    pub fn child(mut self, child: MockNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = MockNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Mark as hidden
    #[must_use]
    pub fn hidden(self) -> Self {
        self.attr("hidden", "")
    }

    /// Mark as checked
    #[must_use]
    pub fn checked(self) -> Self {
        self.attr("checked", "")
    }

    /// Mark as disabled
    #[must_use]
    pub fn disabled(self) -> Self {
        self.attr("disabled", "")
    }

    /// Set the `value` attribute
    #[must_use]
    pub fn value(self, value: &str) -> Self {
        self.attr("value", value)
    }

    /// Apply `f` when `condition` holds
    #[must_use]
    pub fn when(self, condition: bool, f: impl FnOnce(Self) -> Self) -> Self {
        if condition {
            f(self)
        } else {
            self
        }
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// In-memory document
pub struct MockDom {
    nodes: HashMap<NodeId, NodeData>,
    document: NodeId,
    body: NodeId,
    click_handlers: Vec<(CssSelector, Handler)>,
    key_handlers: Vec<(CssSelector, KeyHandler)>,
    input_handlers: Vec<(CssSelector, Handler)>,
    drop_handlers: Vec<(CssSelector, DropHandler)>,
    scripts: Vec<(String, ScriptHook)>,
    events: Vec<String>,
    propagation_stopped: bool,
}

impl fmt::Debug for MockDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDom")
            .field("nodes", &self.nodes.len())
            .field("click_handlers", &self.click_handlers.len())
            .field("scripts", &self.scripts.len())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDom {
    /// Create an empty document (`html > body`)
    #[must_use]
    pub fn new() -> Self {
        let document = next_node_id();
        let body = next_node_id();
        let mut nodes = HashMap::new();
        let _ = nodes.insert(
            document,
            NodeData {
                tag: "html".to_string(),
                attrs: BTreeMap::new(),
                text: String::new(),
                children: vec![body],
                parent: None,
            },
        );
        let _ = nodes.insert(
            body,
            NodeData {
                tag: "body".to_string(),
                attrs: BTreeMap::new(),
                text: String::new(),
                children: Vec::new(),
                parent: Some(document),
            },
        );
        Self {
            nodes,
            document,
            body,
            click_handlers: Vec::new(),
            key_handlers: Vec::new(),
            input_handlers: Vec::new(),
            drop_handlers: Vec::new(),
            scripts: Vec::new(),
            events: Vec::new(),
            propagation_stopped: false,
        }
    }

    /// The `body` node
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.body
    }

    /// The document element (`html`)
    #[must_use]
    pub const fn document(&self) -> NodeId {
        self.document
    }

    // -------------------------------------------------------------------------
    // Tree mutation
    // -------------------------------------------------------------------------

    /// Append a subtree under `parent`, returning the id of its root
    pub fn append(&mut self, parent: NodeId, node: MockNode) -> NodeId {
        let id = next_node_id();
        let MockNode {
            tag,
            attrs,
            text,
            children,
        } = node;
        let _ = self.nodes.insert(
            id,
            NodeData {
                tag,
                attrs,
                text,
                children: Vec::new(),
                parent: Some(parent),
            },
        );
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        for child in children {
            let _ = self.append(id, child);
        }
        id
    }

    /// Detach and drop a subtree; references to it become stale
    pub fn remove(&mut self, node: NodeId) {
        let parent = self.parent(node);
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|c| *c != node);
        }
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(data) = self.nodes.remove(&id) {
                stack.extend(data.children);
            }
        }
    }

    /// Remove every child of `node`
    pub fn clear_children(&mut self, node: NodeId) {
        for child in self.children(node) {
            self.remove(child);
        }
    }

    /// Set an attribute
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            let _ = data.attrs.insert(name.to_string(), value.to_string());
        }
    }

    /// Remove an attribute
    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            let _ = data.attrs.remove(name);
        }
    }

    /// Set or remove a boolean attribute
    pub fn set_flag(&mut self, node: NodeId, name: &str, on: bool) {
        if on {
            self.set_attr(node, name, "");
        } else {
            self.remove_attr(node, name);
        }
    }

    /// Replace own text
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.text = text.to_string();
        }
    }

    /// Add a CSS class
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        let merged = match self.attr(node, "class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr(node, "class", &merged);
    }

    /// Remove a CSS class
    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(existing) = self.attr(node, "class") {
            let kept = existing
                .split_whitespace()
                .filter(|c| *c != class)
                .collect::<Vec<_>>()
                .join(" ");
            self.set_attr(node, "class", &kept);
        }
    }

    /// Toggle a CSS class, returning whether it is now set
    pub fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }

    /// Show or hide a node through the `hidden` attribute
    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        self.set_flag(node, "hidden", hidden);
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Whether the node is attached
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Tag name
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|d| d.tag.as_str())
    }

    /// Attribute value
    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(&node)
            .and_then(|d| d.attrs.get(name))
            .map(String::as_str)
    }

    /// Own text (without descendants)
    #[must_use]
    pub fn own_text(&self, node: NodeId) -> &str {
        self.nodes.get(&node).map_or("", |d| d.text.as_str())
    }

    /// Parent node
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|d| d.parent)
    }

    /// Child nodes in order
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&node)
            .map(|d| d.children.clone())
            .unwrap_or_default()
    }

    /// 1-based position among siblings
    #[must_use]
    pub fn child_position(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.nodes
            .get(&parent)?
            .children
            .iter()
            .position(|c| *c == node)
            .map(|i| i + 1)
    }

    /// Whether the node carries the class
    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Descendants of `node` in document order
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }

    /// Ancestors of `node`, nearest first
    #[must_use]
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(node);
        while let Some(id) = current {
            out.push(id);
            current = self.parent(id);
        }
        out
    }

    /// Nodes below `scope` (or the document) matching `selector`
    #[must_use]
    pub fn query(&self, scope: Option<NodeId>, selector: &CssSelector) -> Vec<NodeId> {
        self.descendants(scope.unwrap_or(self.document))
            .into_iter()
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    /// Parse `css` and query the whole document
    pub fn select(&self, css: &str) -> E2eResult<Vec<NodeId>> {
        Ok(self.query(None, &CssSelector::parse(css)?))
    }

    /// First node matching `css`
    #[must_use]
    pub fn first(&self, css: &str) -> Option<NodeId> {
        self.select(css).ok().and_then(|ids| ids.into_iter().next())
    }

    /// First descendant of `scope` matching `css`
    #[must_use]
    pub fn first_in(&self, scope: NodeId, css: &str) -> Option<NodeId> {
        self.select_in(scope, css).into_iter().next()
    }

    /// Descendants of `scope` matching `css`; empty for invalid selectors
    #[must_use]
    pub fn select_in(&self, scope: NodeId, css: &str) -> Vec<NodeId> {
        CssSelector::parse(css)
            .map(|selector| self.query(Some(scope), &selector))
            .unwrap_or_default()
    }

    /// Nearest ancestor-or-self matching `css`
    #[must_use]
    pub fn closest(&self, node: NodeId, css: &str) -> Option<NodeId> {
        let selector = CssSelector::parse(css).ok()?;
        std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|id| selector.matches(self, *id))
    }

    /// Text content including hidden descendants (DOM `textContent`)
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        std::iter::once(node)
            .chain(self.descendants(node))
            .map(|id| self.own_text(id))
            .collect::<String>()
    }

    /// Rendered text: visible nodes only, one trimmed line per text node
    #[must_use]
    pub fn visible_text(&self, node: NodeId) -> String {
        if !self.is_displayed(node) {
            return String::new();
        }
        std::iter::once(node)
            .chain(self.descendants(node))
            .filter(|id| self.is_displayed(*id))
            .map(|id| self.own_text(id).trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serialized children
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = self.own_text(node).to_string();
        for child in self.children(node) {
            out.push_str(&self.outer_html(child));
        }
        out
    }

    fn outer_html(&self, node: NodeId) -> String {
        let Some(data) = self.nodes.get(&node) else {
            return String::new();
        };
        let attrs: String = data
            .attrs
            .iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    format!(" {k}")
                } else {
                    format!(" {k}=\"{v}\"")
                }
            })
            .collect();
        format!("<{0}{attrs}>{1}</{0}>", data.tag, self.inner_html(node))
    }

    fn hides_itself(&self, node: NodeId) -> bool {
        let Some(data) = self.nodes.get(&node) else {
            return true;
        };
        data.attrs.contains_key("hidden")
            || self.has_class(node, "hidden")
            || self.has_class(node, "ng-hide")
            || (self.has_class(node, "collapse") && !self.has_class(node, "in"))
            || (data.tag == "input" && data.attrs.get("type").is_some_and(|t| t == "hidden"))
            || data
                .attrs
                .get("style")
                .is_some_and(|s| s.replace(' ', "").contains("display:none"))
    }

    /// Whether the node and all its ancestors are rendered
    #[must_use]
    pub fn is_displayed(&self, node: NodeId) -> bool {
        self.contains(node)
            && !std::iter::once(node)
                .chain(self.ancestors(node))
                .any(|id| self.hides_itself(id))
    }

    /// Whether the node lacks a `disabled` attribute
    #[must_use]
    pub fn is_enabled(&self, node: NodeId) -> bool {
        self.attr(node, "disabled").is_none()
    }

    /// Whether the node is checked/selected
    #[must_use]
    pub fn is_selected(&self, node: NodeId) -> bool {
        self.attr(node, "checked").is_some() || self.attr(node, "selected").is_some()
    }

    // -------------------------------------------------------------------------
    // Behaviours
    // -------------------------------------------------------------------------

    /// Register a delegated click handler
    pub fn on_click(
        &mut self,
        css: &str,
        handler: impl Fn(&mut MockDom, NodeId) + Send + Sync + 'static,
    ) -> E2eResult<()> {
        self.click_handlers
            .push((CssSelector::parse(css)?, Arc::new(handler)));
        Ok(())
    }

    /// Register a delegated key handler
    pub fn on_key(
        &mut self,
        css: &str,
        handler: impl Fn(&mut MockDom, NodeId, &str) + Send + Sync + 'static,
    ) -> E2eResult<()> {
        self.key_handlers
            .push((CssSelector::parse(css)?, Arc::new(handler)));
        Ok(())
    }

    /// Register a delegated handler fired after a value change
    pub fn on_input(
        &mut self,
        css: &str,
        handler: impl Fn(&mut MockDom, NodeId) + Send + Sync + 'static,
    ) -> E2eResult<()> {
        self.input_handlers
            .push((CssSelector::parse(css)?, Arc::new(handler)));
        Ok(())
    }

    /// Register a drop handler for targets matching `css`
    pub fn on_drop(
        &mut self,
        css: &str,
        handler: impl Fn(&mut MockDom, NodeId, NodeId) + Send + Sync + 'static,
    ) -> E2eResult<()> {
        self.drop_handlers
            .push((CssSelector::parse(css)?, Arc::new(handler)));
        Ok(())
    }

    /// Expose a page-context function; scripts mentioning `name` call it
    pub fn on_script(
        &mut self,
        name: &str,
        hook: impl Fn(&mut MockDom, &[serde_json::Value]) -> E2eResult<serde_json::Value>
            + Send
            + Sync
            + 'static,
    ) {
        self.scripts.push((name.to_string(), Arc::new(hook)));
    }

    /// Record an application event (e.g. a mocked backend call)
    pub fn log_event(&mut self, event: impl Into<String>) {
        self.events.push(event.into());
    }

    /// Application events recorded so far
    #[must_use]
    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// Matched (handler, node) pairs along the bubbling path of `target`
    fn delegated<H: Clone>(&self, handlers: &[(CssSelector, H)], target: NodeId) -> Vec<(H, NodeId)> {
        let mut out = Vec::new();
        for node in std::iter::once(target).chain(self.ancestors(target)) {
            for (selector, handler) in handlers {
                if selector.matches(self, node) {
                    out.push((handler.clone(), node));
                }
            }
        }
        out
    }

    /// Stop the event being dispatched from reaching further ancestors
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Run the default action and bubble a click from `target`
    pub fn dispatch_click(&mut self, target: NodeId) {
        self.default_click_action(target);
        self.propagation_stopped = false;
        for (handler, node) in self.delegated(&self.click_handlers, target) {
            if self.propagation_stopped {
                break;
            }
            if self.contains(node) {
                handler(self, node);
            }
        }
        self.propagation_stopped = false;
    }

    fn default_click_action(&mut self, target: NodeId) {
        let input = if self.tag(target) == Some("input") {
            Some(target)
        } else {
            self.closest(target, "label")
                .and_then(|label| self.first_in(label, "input"))
        };
        let Some(input) = input else {
            return;
        };
        if self.tag(input) != Some("input") || !self.is_enabled(input) {
            return;
        }
        match self.attr(input, "type") {
            Some("checkbox") => {
                let checked = self.is_selected(input);
                self.set_flag(input, "checked", !checked);
                self.dispatch_input(input);
            }
            Some("radio") => {
                let name = self.attr(input, "name").map(str::to_string);
                if let Some(name) = name {
                    let group = self
                        .select(&format!("input[type=radio][name=\"{name}\"]"))
                        .unwrap_or_default();
                    for other in group {
                        self.remove_attr(other, "checked");
                    }
                }
                self.set_flag(input, "checked", true);
                self.dispatch_input(input);
            }
            _ => {}
        }
    }

    /// Bubble a key press from `target`
    pub fn dispatch_key(&mut self, target: NodeId, key: &str) {
        for (handler, node) in self.delegated(&self.key_handlers, target) {
            if self.contains(node) {
                handler(self, node, key);
            }
        }
    }

    /// Bubble a value change from `target`
    pub fn dispatch_input(&mut self, target: NodeId) {
        for (handler, node) in self.delegated(&self.input_handlers, target) {
            if self.contains(node) {
                handler(self, node);
            }
        }
    }

    /// Drop `source` onto `target`
    pub fn dispatch_drop(&mut self, source: NodeId, target: NodeId) {
        for (handler, node) in self.delegated(&self.drop_handlers, target) {
            if self.contains(node) && self.contains(source) {
                handler(self, source, node);
            }
        }
    }

    /// Run the first script hook mentioned in `script`
    pub fn run_script(
        &mut self,
        script: &str,
        args: &[serde_json::Value],
    ) -> Option<E2eResult<serde_json::Value>> {
        let hook = self
            .scripts
            .iter()
            .find(|(name, _)| script.contains(name.as_str()))
            .map(|(_, hook)| Arc::clone(hook))?;
        Some(hook(self, args))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    mod tree_tests {
        use super::*;

        #[test]
        fn test_append_and_remove() {
            let mut dom = MockDom::new();
            let root = dom.root();
            let list = dom.append(
                root,
                MockNode::new("ul").child(MockNode::new("li").text("a")),
            );
            let li = dom.children(list)[0];
            assert_eq!(dom.parent(li), Some(list));
            dom.remove(list);
            assert!(!dom.contains(list));
            assert!(!dom.contains(li));
            assert!(dom.children(root).is_empty());
        }

        #[test]
        fn test_class_helpers() {
            let mut dom = MockDom::new();
            let root = dom.root();
            let node = dom.append(root, MockNode::new("div").class("panel collapse"));
            assert!(dom.has_class(node, "collapse"));
            assert!(dom.toggle_class(node, "in"));
            assert!(dom.has_class(node, "in"));
            assert!(!dom.toggle_class(node, "in"));
            dom.remove_class(node, "panel");
            assert_eq!(dom.attr(node, "class"), Some("collapse"));
        }
    }

    mod visibility_tests {
        use super::*;

        #[test]
        fn test_hidden_rules() {
            let mut dom = MockDom::new();
            let root = dom.root();
            let collapsed = dom.append(
                root,
                MockNode::new("div")
                    .class("collapse")
                    .child(MockNode::new("span").text("inner")),
            );
            let inner = dom.children(collapsed)[0];
            assert!(!dom.is_displayed(collapsed));
            assert!(!dom.is_displayed(inner));
            dom.add_class(collapsed, "in");
            assert!(dom.is_displayed(inner));

            let styled = dom.append(root, MockNode::new("div").attr("style", "display: none"));
            assert!(!dom.is_displayed(styled));
            let ng = dom.append(root, MockNode::new("div").class("ng-hide"));
            assert!(!dom.is_displayed(ng));
        }

        #[test]
        fn test_visible_text_skips_hidden() {
            let mut dom = MockDom::new();
            let root = dom.root();
            let node = dom.append(
                root,
                MockNode::new("div")
                    .child(MockNode::new("span").text(" Shown "))
                    .child(MockNode::new("span").hidden().text("Hidden")),
            );
            assert_eq!(dom.visible_text(node), "Shown");
            assert_eq!(dom.text_content(node), " Shown Hidden");
        }
    }

    mod behaviour_tests {
        use super::*;

        #[test]
        fn test_click_bubbles_to_delegated_handler() {
            let mut dom = MockDom::new();
            let root = dom.root();
            let button = dom.append(
                root,
                MockNode::new("button")
                    .class("btn")
                    .child(MockNode::new("i").class("fa")),
            );
            let icon = dom.children(button)[0];
            let hits = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&hits);
            dom.on_click(".btn", move |_, node| {
                assert!(node > 0);
                let _ = counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
            dom.dispatch_click(icon);
            assert_eq!(hits.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn test_stop_propagation() {
            let mut dom = MockDom::new();
            let root = dom.root();
            let item = dom.append(
                root,
                MockNode::new("li")
                    .class("option")
                    .child(MockNode::new("i").class("toggle")),
            );
            let toggle = dom.children(item)[0];
            dom.on_click(".option", |dom, _| dom.log_event("select")).unwrap();
            dom.on_click(".toggle", |dom, _| {
                dom.log_event("expand");
                dom.stop_propagation();
            })
            .unwrap();
            dom.dispatch_click(toggle);
            dom.dispatch_click(item);
            assert_eq!(dom.events(), ["expand".to_string(), "select".to_string()]);
        }

        #[test]
        fn test_label_click_toggles_checkbox() {
            let mut dom = MockDom::new();
            let root = dom.root();
            let label = dom.append(
                root,
                MockNode::new("label")
                    .class("checkbox")
                    .child(MockNode::new("input").attr("type", "checkbox")),
            );
            let input = dom.children(label)[0];
            dom.dispatch_click(label);
            assert!(dom.is_selected(input));
            dom.dispatch_click(label);
            assert!(!dom.is_selected(input));
        }

        #[test]
        fn test_radio_group_is_exclusive() {
            let mut dom = MockDom::new();
            let root = dom.root();
            let a = dom.append(root, MockNode::new("input").attr("type", "radio").attr("name", "g").checked());
            let b = dom.append(root, MockNode::new("input").attr("type", "radio").attr("name", "g"));
            dom.dispatch_click(b);
            assert!(!dom.is_selected(a));
            assert!(dom.is_selected(b));
        }

        #[test]
        fn test_script_hooks() {
            let mut dom = MockDom::new();
            dom.on_script("getSelection", |_, args| Ok(serde_json::json!(args.len())));
            let result = dom.run_script("return getSelection()", &[serde_json::json!(1)]);
            assert_eq!(result.unwrap().unwrap(), serde_json::json!(1));
            assert!(dom.run_script("unknown()", &[]).is_none());
        }
    }
}
