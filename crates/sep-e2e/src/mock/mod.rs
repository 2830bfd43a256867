//! Mock driver: an in-memory browser serving sandbox applications.
//!
//! Routes are registered with a mount function that builds the DOM for a
//! [`SandboxLocation`] and attaches behaviours. Navigation always builds a
//! fresh document; `window.restartSandbox()` re-mounts the current route in
//! place without recording a navigation.

mod apps;
mod css;
mod dom;

pub use apps::register_sandbox_apps;
pub use css::CssSelector;
pub use dom::{MockDom, MockNode, NodeId};

use crate::driver::{ElementId, Keys, ScriptArg, WebDriver};
use crate::locator::Selector;
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Parsed sandbox address: route path plus the `#/` hash payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SandboxLocation {
    /// Route path, e.g. `/sandbox/components/collapsible`
    pub path: String,
    /// Raw hash payload without the `#/` prefix
    pub hash: String,
    /// Query-like parameters of the hash (`?k=v&k2=v2`)
    pub params: BTreeMap<String, String>,
}

impl SandboxLocation {
    /// Parse an absolute or origin-relative URL
    #[must_use]
    pub fn parse(url: &str) -> Self {
        let without_origin = url
            .split_once("://")
            .map_or(url, |(_, rest)| rest.find('/').map_or("", |i| &rest[i..]));
        let (path_part, hash_part) = without_origin
            .split_once('#')
            .unwrap_or((without_origin, ""));
        let path = path_part.split('?').next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/".to_string(),
            trimmed => trimmed.to_string(),
        };
        let mut location = Self {
            path,
            ..Self::default()
        };
        location.set_hash(hash_part);
        location
    }

    /// Replace the hash payload
    pub fn set_hash(&mut self, hash: &str) {
        let hash = hash.trim_start_matches('#').trim_start_matches('/');
        self.hash = hash.to_string();
        self.params = hash
            .split_once('?')
            .map(|(_, query)| {
                query
                    .split('&')
                    .filter(|pair| !pair.is_empty())
                    .map(|pair| {
                        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                        (k.to_string(), v.to_string())
                    })
                    .collect()
            })
            .unwrap_or_default();
    }

    /// Part of the hash before `?` (e.g. an instance id)
    #[must_use]
    pub fn hash_path(&self) -> &str {
        self.hash.split('?').next().unwrap_or_default()
    }

    /// Hash parameter value
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Whether the hash parameter equals `"true"`
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.param(name) == Some("true")
    }
}

/// Builds the document of a sandbox route
pub type MountFn = Arc<dyn Fn(&mut MockDom, &SandboxLocation) -> E2eResult<()> + Send + Sync>;

struct MockState {
    dom: MockDom,
    url: String,
    location: Option<SandboxLocation>,
    routes: Vec<(String, MountFn)>,
    call_history: Vec<String>,
}

impl MockState {
    fn mount_for(&self, path: &str) -> Option<MountFn> {
        self.routes
            .iter()
            .find(|(route, _)| route == path)
            .map(|(_, mount)| Arc::clone(mount))
    }

    fn node(&self, element: &ElementId) -> E2eResult<NodeId> {
        element
            .as_str()
            .strip_prefix("node-")
            .and_then(|raw| raw.parse().ok())
            .filter(|id| self.dom.contains(*id))
            .ok_or_else(|| E2eError::StaleElement {
                element: element.to_string(),
            })
    }

    fn interactable(&self, element: &ElementId) -> E2eResult<NodeId> {
        let node = self.node(element)?;
        if !self.dom.is_displayed(node) {
            return Err(E2eError::NotInteractable {
                element: element.to_string(),
                message: "element is not displayed".to_string(),
            });
        }
        Ok(node)
    }

    fn remount(&mut self) -> E2eResult<()> {
        let location = self
            .location
            .clone()
            .ok_or_else(|| E2eError::script("restartSandbox is not defined"))?;
        let mount = self
            .mount_for(&location.path)
            .ok_or_else(|| E2eError::script("restartSandbox is not defined"))?;
        self.dom = MockDom::new();
        mount(&mut self.dom, &location)
    }
}

fn element_id(node: NodeId) -> ElementId {
    ElementId::new(format!("node-{node}"))
}

/// In-memory [`WebDriver`] for unit tests and offline runs
#[derive(Clone)]
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl std::fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("MockDriver")
            .field("url", &state.url)
            .field("routes", &state.routes.len())
            .field("dom", &state.dom)
            .finish()
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// Create a driver with an empty document and no routes
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                dom: MockDom::new(),
                url: "about:blank".to_string(),
                location: None,
                routes: Vec::new(),
                call_history: Vec::new(),
            })),
        }
    }

    /// Create a driver serving every built-in sandbox application
    #[must_use]
    pub fn with_sandbox_apps() -> Self {
        let driver = Self::new();
        register_sandbox_apps(&driver);
        driver
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a route
    pub fn route(
        &self,
        path: &str,
        mount: impl Fn(&mut MockDom, &SandboxLocation) -> E2eResult<()> + Send + Sync + 'static,
    ) {
        self.state()
            .routes
            .push((path.trim_end_matches('/').to_string(), Arc::new(mount)));
    }

    /// Registered route paths
    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        self.state().routes.iter().map(|(p, _)| p.clone()).collect()
    }

    /// Inspect or modify the current document
    pub fn with_dom<R>(&self, f: impl FnOnce(&mut MockDom) -> R) -> R {
        f(&mut self.state().dom)
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().call_history.clone()
    }

    /// URLs of full page loads, in order
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.state()
            .call_history
            .iter()
            .filter_map(|entry| entry.strip_prefix("navigate:"))
            .map(str::to_string)
            .collect()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state()
            .call_history
            .iter()
            .any(|entry| entry.starts_with(method))
    }

    /// Events recorded by the mounted application
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.state().dom.events().to_vec()
    }

    /// Current sandbox location, if a route is mounted
    #[must_use]
    pub fn location(&self) -> Option<SandboxLocation> {
        self.state().location.clone()
    }

    fn record(&self, entry: String) {
        self.state().call_history.push(entry);
    }
}

fn text_matches(dom: &MockDom, scope: Option<NodeId>, text: &str) -> Vec<NodeId> {
    let candidates = scope.map_or_else(|| dom.descendants(dom.document()), |s| dom.descendants(s));
    candidates
        .into_iter()
        .filter(|id| dom.text_content(*id).contains(text))
        .filter(|id| {
            !dom.children(*id)
                .iter()
                .any(|c| dom.text_content(*c).contains(text))
        })
        .collect()
}

#[async_trait]
impl WebDriver for MockDriver {
    async fn navigate(&self, url: &str) -> E2eResult<()> {
        let location = SandboxLocation::parse(url);
        let mut state = self.state();
        state.call_history.push(format!("navigate:{url}"));
        state.url = url.to_string();
        state.dom = MockDom::new();
        let mount = state.mount_for(&location.path);
        state.location = mount.as_ref().map(|_| location.clone());
        if let Some(mount) = mount {
            mount(&mut state.dom, &location)?;
        }
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.state().url.clone())
    }

    async fn execute_script(
        &self,
        script: &str,
        args: &[ScriptArg],
    ) -> E2eResult<serde_json::Value> {
        let values: Vec<serde_json::Value> = args
            .iter()
            .map(|arg| match arg {
                ScriptArg::Value(v) => v.clone(),
                ScriptArg::Element(id) => serde_json::Value::String(id.to_string()),
            })
            .collect();
        let mut state = self.state();
        state.call_history.push(format!("execute_script:{script}"));

        let mut handled = false;
        if script.contains("location.hash") {
            let hash = values
                .first()
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| E2eError::script("location.hash requires a string argument"))?
                .to_string();
            if let Some(location) = state.location.as_mut() {
                location.set_hash(&hash);
            }
            let base = state.url.split('#').next().unwrap_or_default().to_string();
            state.url = match hash.trim_start_matches('#') {
                "" => base,
                fragment => format!("{base}#{fragment}"),
            };
            handled = true;
        }
        if script.contains("restartSandbox") {
            state.remount()?;
            handled = true;
        }
        if let Some(result) = state.dom.run_script(script, &values) {
            return result;
        }
        if handled {
            Ok(serde_json::Value::Null)
        } else {
            Err(E2eError::script(format!("mock cannot evaluate script: {script}")))
        }
    }

    async fn find_elements(
        &self,
        scope: Option<&ElementId>,
        selector: &Selector,
    ) -> E2eResult<Vec<ElementId>> {
        let state = self.state();
        let scope = scope.map(|id| state.node(id)).transpose()?;
        let dom = &state.dom;
        let nodes = match selector {
            Selector::Css(css) => dom.query(scope, &CssSelector::parse(css)?),
            Selector::XPath(expr) if expr == ".." => scope
                .and_then(|s| dom.parent(s))
                .into_iter()
                .collect(),
            Selector::XPath(expr) => {
                return Err(E2eError::UnsupportedSelector {
                    selector: format!("xpath={expr}"),
                })
            }
            Selector::Text(text) => text_matches(dom, scope, text),
            Selector::CssWithText { css, text } => dom
                .query(scope, &CssSelector::parse(css)?)
                .into_iter()
                .filter(|id| dom.text_content(*id).contains(text.as_str()))
                .collect(),
        };
        Ok(nodes.into_iter().map(element_id).collect())
    }

    async fn click(&self, element: &ElementId) -> E2eResult<()> {
        let mut state = self.state();
        let node = state.interactable(element)?;
        state.call_history.push(format!("click:{element}"));
        if state.dom.is_enabled(node) {
            state.dom.dispatch_click(node);
        }
        Ok(())
    }

    async fn send_keys(&self, element: &ElementId, text: &str) -> E2eResult<()> {
        let mut state = self.state();
        let node = state.interactable(element)?;
        state.call_history.push(format!("send_keys:{element}"));
        if !state.dom.is_enabled(node) {
            return Err(E2eError::NotInteractable {
                element: element.to_string(),
                message: "element is disabled".to_string(),
            });
        }
        let dom = &mut state.dom;
        let mut pending = String::new();
        for c in text.chars() {
            let Some(key) = Keys::name(c) else {
                pending.push(c);
                continue;
            };
            if !dom.contains(node) {
                break;
            }
            let mut value = dom.attr(node, "value").unwrap_or_default().to_string();
            value.push_str(&std::mem::take(&mut pending));
            if key == "Backspace" {
                let _ = value.pop();
            }
            dom.set_attr(node, "value", &value);
            dom.dispatch_input(node);
            dom.dispatch_key(node, key);
        }
        if !pending.is_empty() && dom.contains(node) {
            let value = format!("{}{pending}", dom.attr(node, "value").unwrap_or_default());
            dom.set_attr(node, "value", &value);
            dom.dispatch_input(node);
        }
        Ok(())
    }

    async fn clear(&self, element: &ElementId) -> E2eResult<()> {
        let mut state = self.state();
        let node = state.interactable(element)?;
        state.call_history.push(format!("clear:{element}"));
        state.dom.set_attr(node, "value", "");
        state.dom.dispatch_input(node);
        Ok(())
    }

    async fn text(&self, element: &ElementId) -> E2eResult<String> {
        let state = self.state();
        let node = state.node(element)?;
        Ok(state.dom.visible_text(node))
    }

    async fn inner_html(&self, element: &ElementId) -> E2eResult<String> {
        let state = self.state();
        let node = state.node(element)?;
        Ok(state.dom.inner_html(node))
    }

    async fn attribute(&self, element: &ElementId, name: &str) -> E2eResult<Option<String>> {
        let state = self.state();
        let node = state.node(element)?;
        let dom = &state.dom;
        Ok(match name {
            "checked" | "selected" => dom.is_selected(node).then(|| "true".to_string()),
            "textContent" => Some(dom.text_content(node)),
            "innerHTML" => Some(dom.inner_html(node)),
            _ => dom.attr(node, name).map(str::to_string),
        })
    }

    async fn is_displayed(&self, element: &ElementId) -> E2eResult<bool> {
        let state = self.state();
        let node = state.node(element)?;
        Ok(state.dom.is_displayed(node))
    }

    async fn is_enabled(&self, element: &ElementId) -> E2eResult<bool> {
        let state = self.state();
        let node = state.node(element)?;
        Ok(state.dom.is_enabled(node))
    }

    async fn is_selected(&self, element: &ElementId) -> E2eResult<bool> {
        let state = self.state();
        let node = state.node(element)?;
        Ok(state.dom.is_selected(node))
    }

    async fn is_stale(&self, element: &ElementId) -> E2eResult<bool> {
        Ok(self.state().node(element).is_err())
    }

    async fn hover(&self, element: &ElementId) -> E2eResult<()> {
        let mut state = self.state();
        let _ = state.interactable(element)?;
        state.call_history.push(format!("hover:{element}"));
        Ok(())
    }

    async fn drag_and_drop(&self, source: &ElementId, target: &ElementId) -> E2eResult<()> {
        let mut state = self.state();
        let from = state.interactable(source)?;
        let to = state.node(target)?;
        state
            .call_history
            .push(format!("drag_and_drop:{source}->{target}"));
        state.dom.dispatch_drop(from, to);
        Ok(())
    }

    async fn close(&self) -> E2eResult<()> {
        self.record("close".to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::Session;

    fn counter_app(driver: &MockDriver) {
        driver.route("/sandbox/counter", |dom, location| {
            let root = dom.root();
            let start = location.param("start").unwrap_or("0");
            let _ = dom.append(
                root,
                MockNode::new("div")
                    .class("counter")
                    .child(MockNode::new("span").class("count").text(start))
                    .child(MockNode::new("button").class("increment").text("+")),
            );
            dom.on_click(".increment", |dom, _| {
                if let Some(count) = dom.first(".count") {
                    let n: i64 = dom.own_text(count).parse().unwrap_or_default();
                    dom.set_text(count, &(n + 1).to_string());
                }
            })
        });
    }

    mod location_tests {
        use super::*;

        #[test]
        fn test_parse_with_origin_and_hash() {
            let loc = SandboxLocation::parse(
                "http://localhost:5000/sandbox/administration/model-import/#/?fail=true&hasErrors=false",
            );
            assert_eq!(loc.path, "/sandbox/administration/model-import");
            assert!(loc.flag("fail"));
            assert!(!loc.flag("hasErrors"));
            assert_eq!(loc.param("hasErrors"), Some("false"));
        }

        #[test]
        fn test_hash_path() {
            let loc = SandboxLocation::parse("/sandbox/idoc/idoc-page#/emf:123456?mode=edit");
            assert_eq!(loc.hash_path(), "emf:123456");
            assert_eq!(loc.param("mode"), Some("edit"));
        }

        #[test]
        fn test_parse_bare_origin() {
            assert_eq!(SandboxLocation::parse("http://localhost:5000").path, "/");
        }
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_navigate_mounts_route() {
            let driver = MockDriver::new();
            counter_app(&driver);
            let session = Session::new(driver.clone());
            session
                .navigate("http://localhost/sandbox/counter#/?start=4")
                .await
                .unwrap();
            let count = session.find(".count").await.unwrap();
            assert_eq!(count.text().await.unwrap(), "4");
            session.find(".increment").await.unwrap().click().await.unwrap();
            assert_eq!(count.text().await.unwrap(), "5");
            assert_eq!(driver.navigations().len(), 1);
        }

        #[tokio::test]
        async fn test_restart_remounts_without_navigation() {
            let driver = MockDriver::new();
            counter_app(&driver);
            let session = Session::new(driver.clone());
            session.navigate("http://localhost/sandbox/counter").await.unwrap();
            let old = session.find(".count").await.unwrap();
            session
                .execute_script(
                    "window.location.hash = arguments[0]; window.restartSandbox();",
                    &["/?start=9".into()],
                )
                .await
                .unwrap();
            assert!(!old.is_present().await.unwrap());
            let fresh = session.find(".count").await.unwrap();
            assert_eq!(fresh.text().await.unwrap(), "9");
            assert_eq!(driver.navigations().len(), 1);
            assert_eq!(
                session.current_url().await.unwrap(),
                "http://localhost/sandbox/counter#/?start=9"
            );
        }

        #[tokio::test]
        async fn test_hash_is_stored_as_given() {
            let driver = MockDriver::new();
            counter_app(&driver);
            let session = Session::new(driver.clone());
            session.navigate("http://localhost/sandbox/counter").await.unwrap();
            session
                .execute_script("window.location.hash = arguments[0];", &["?start=3".into()])
                .await
                .unwrap();
            assert_eq!(
                session.current_url().await.unwrap(),
                "http://localhost/sandbox/counter#?start=3"
            );
            assert_eq!(driver.location().unwrap().param("start"), Some("3"));
        }

        #[tokio::test]
        async fn test_restart_without_route_fails() {
            let driver = MockDriver::new();
            let err = driver
                .execute_script("window.restartSandbox()", &[])
                .await
                .unwrap_err();
            assert!(matches!(err, E2eError::Script { .. }));
        }
    }

    mod interaction_tests {
        use super::*;

        #[tokio::test]
        async fn test_stale_and_hidden_elements() {
            let driver = MockDriver::new();
            let hidden = driver.with_dom(|dom| {
                let root = dom.root();
                dom.append(root, MockNode::new("button").hidden())
            });
            let id = element_id(hidden);
            let err = driver.click(&id).await.unwrap_err();
            assert!(matches!(err, E2eError::NotInteractable { .. }));
            driver.with_dom(|dom| dom.remove(hidden));
            let err = driver.click(&id).await.unwrap_err();
            assert!(matches!(err, E2eError::StaleElement { .. }));
            assert!(driver.is_stale(&id).await.unwrap());
        }

        #[tokio::test]
        async fn test_send_keys_fires_enter_after_value() {
            let driver = MockDriver::new();
            let input = driver.with_dom(|dom| {
                let root = dom.root();
                let input = dom.append(root, MockNode::new("input"));
                dom.on_key("input", |dom, node, key| {
                    let value = dom.attr(node, "value").unwrap_or_default().to_string();
                    dom.log_event(format!("{key}:{value}"));
                })
                .unwrap();
                input
            });
            driver
                .send_keys(&element_id(input), &format!("abc{}", Keys::ENTER))
                .await
                .unwrap();
            assert_eq!(driver.events(), vec!["Enter:abc".to_string()]);
        }

        #[tokio::test]
        async fn test_text_and_xpath_selectors() {
            let driver = MockDriver::new();
            driver.with_dom(|dom| {
                let root = dom.root();
                let _ = dom.append(
                    root,
                    MockNode::new("div")
                        .class("outer")
                        .child(MockNode::new("span").text("Any Object")),
                );
            });
            let session = Session::new(driver);
            let span = session.find(Selector::text("Any Object")).await.unwrap();
            assert_eq!(span.text().await.unwrap(), "Any Object");
            let parent = span.find(Selector::parent()).await.unwrap();
            assert!(parent.has_class("outer").await.unwrap());
            let err = session
                .find(Selector::xpath("//div"))
                .await
                .unwrap_err();
            assert!(matches!(err, E2eError::UnsupportedSelector { .. }));
        }
    }
}
