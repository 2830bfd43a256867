//! WebDriver - Abstract Browser Automation Trait
//!
//! Page objects never talk to a browser directly. They hold an [`Element`]
//! (the wrapper handle) whose methods forward to the [`WebDriver`] behind a
//! shared [`Session`].
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌───────────────────────────────┐
//! │ Page object  │──►│ Element      │──►│ WebDriver (trait object)      │
//! │ (wrapper)    │   │ (id+session) │   │  ├─ ChromiumDriver (CDP)      │
//! └──────────────┘   └──────────────┘   │  └─ MockDriver (in-memory DOM)│
//!                                       └───────────────────────────────┘
//! ```
//!
//! Every call is awaited in program order; one session is shared by all page
//! objects of a run.

use crate::locator::Selector;
use crate::result::{E2eError, E2eResult};
use crate::wait::WaitOptions;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Opaque reference to a located DOM node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub String);

impl ElementId {
    /// Create a new element id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Raw id value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Argument passed to a page-context script
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptArg {
    /// Plain JSON value
    Value(serde_json::Value),
    /// Element reference, resolved to the DOM node in page context
    Element(ElementId),
}

impl From<&str> for ScriptArg {
    fn from(value: &str) -> Self {
        Self::Value(serde_json::Value::String(value.to_string()))
    }
}

impl From<serde_json::Value> for ScriptArg {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

impl From<&Element> for ScriptArg {
    fn from(element: &Element) -> Self {
        Self::Element(element.id().clone())
    }
}

/// WebDriver key codes usable inside `send_keys` text
#[derive(Debug, Clone, Copy)]
pub struct Keys;

impl Keys {
    /// Backspace key
    pub const BACKSPACE: &'static str = "\u{E003}";
    /// Tab key
    pub const TAB: &'static str = "\u{E004}";
    /// Enter key
    pub const ENTER: &'static str = "\u{E007}";
    /// Escape key
    pub const ESCAPE: &'static str = "\u{E00C}";

    /// Name of a key code, if `c` is one
    #[must_use]
    pub fn name(c: char) -> Option<&'static str> {
        match c {
            '\u{E003}' => Some("Backspace"),
            '\u{E004}' => Some("Tab"),
            '\u{E007}' => Some("Enter"),
            '\u{E00C}' => Some("Escape"),
            _ => None,
        }
    }
}

/// Abstract driver trait for browser automation
///
/// # Implementations
///
/// - `ChromiumDriver` - real browser over CDP (feature `browser`)
/// - `MockDriver` - in-memory DOM serving mock sandbox applications
#[async_trait]
pub trait WebDriver: Send + Sync + fmt::Debug {
    /// Navigate to URL (full page load)
    async fn navigate(&self, url: &str) -> E2eResult<()>;

    /// Get current URL
    async fn current_url(&self) -> E2eResult<String>;

    /// Execute JavaScript in page context
    async fn execute_script(&self, script: &str, args: &[ScriptArg])
        -> E2eResult<serde_json::Value>;

    /// Find all elements matching `selector` below `scope` (or the document)
    async fn find_elements(
        &self,
        scope: Option<&ElementId>,
        selector: &Selector,
    ) -> E2eResult<Vec<ElementId>>;

    /// Click element
    async fn click(&self, element: &ElementId) -> E2eResult<()>;

    /// Type text into element
    async fn send_keys(&self, element: &ElementId, text: &str) -> E2eResult<()>;

    /// Clear an input value
    async fn clear(&self, element: &ElementId) -> E2eResult<()>;

    /// Visible text of the element
    async fn text(&self, element: &ElementId) -> E2eResult<String>;

    /// Inner HTML of the element
    async fn inner_html(&self, element: &ElementId) -> E2eResult<String>;

    /// Attribute (or live property for `value`/`checked`) of the element
    async fn attribute(&self, element: &ElementId, name: &str) -> E2eResult<Option<String>>;

    /// Whether the element is rendered visibly
    async fn is_displayed(&self, element: &ElementId) -> E2eResult<bool>;

    /// Whether the element is enabled
    async fn is_enabled(&self, element: &ElementId) -> E2eResult<bool>;

    /// Whether a checkbox/radio/option is selected
    async fn is_selected(&self, element: &ElementId) -> E2eResult<bool>;

    /// Whether the reference no longer points at a live node
    async fn is_stale(&self, element: &ElementId) -> E2eResult<bool>;

    /// Move the mouse over the element
    async fn hover(&self, element: &ElementId) -> E2eResult<()>;

    /// Drag `source` and drop it onto `target`
    async fn drag_and_drop(&self, source: &ElementId, target: &ElementId) -> E2eResult<()>;

    /// Close the browser
    async fn close(&self) -> E2eResult<()>;
}

/// Shared handle to the driver used by every page object of a run
#[derive(Debug, Clone)]
pub struct Session {
    driver: Arc<dyn WebDriver>,
    wait_options: WaitOptions,
}

impl Session {
    /// Create session with default wait options
    pub fn new(driver: impl WebDriver + 'static) -> Self {
        Self::from_arc(Arc::new(driver))
    }

    /// Create session around an already shared driver
    #[must_use]
    pub fn from_arc(driver: Arc<dyn WebDriver>) -> Self {
        Self {
            driver,
            wait_options: WaitOptions::default(),
        }
    }

    /// Replace the default wait options
    #[must_use]
    pub fn with_wait_options(mut self, options: WaitOptions) -> Self {
        self.wait_options = options;
        self
    }

    /// Default wait options of this session
    #[must_use]
    pub const fn wait_options(&self) -> &WaitOptions {
        &self.wait_options
    }

    /// Underlying driver
    #[must_use]
    pub fn driver(&self) -> &dyn WebDriver {
        self.driver.as_ref()
    }

    /// Navigate to URL
    pub async fn navigate(&self, url: &str) -> E2eResult<()> {
        tracing::info!(url, "navigate");
        self.driver.navigate(url).await
    }

    /// Get current URL
    pub async fn current_url(&self) -> E2eResult<String> {
        self.driver.current_url().await
    }

    /// Execute JavaScript
    pub async fn execute_script(
        &self,
        script: &str,
        args: &[ScriptArg],
    ) -> E2eResult<serde_json::Value> {
        debug!(script, "execute_script");
        self.driver.execute_script(script, args).await
    }

    /// First element in the document matching `selector`
    pub async fn find(&self, selector: impl Into<Selector>) -> E2eResult<Element> {
        let selector = selector.into();
        let ids = self.driver.find_elements(None, &selector).await?;
        first_or_missing(self, ids, &selector)
    }

    /// First matching element, or `None`
    pub async fn find_optional(&self, selector: impl Into<Selector>) -> E2eResult<Option<Element>> {
        let selector = selector.into();
        let ids = self.driver.find_elements(None, &selector).await?;
        Ok(ids
            .into_iter()
            .next()
            .map(|id| Element::new(self.clone(), id, selector.to_string())))
    }

    /// All matching elements in document order
    pub async fn find_all(&self, selector: impl Into<Selector>) -> E2eResult<Vec<Element>> {
        let selector = selector.into();
        let ids = self.driver.find_elements(None, &selector).await?;
        Ok(wrap_all(self, ids, &selector))
    }

    /// Whether any element matches `selector`
    pub async fn is_present(&self, selector: impl Into<Selector>) -> E2eResult<bool> {
        let selector = selector.into();
        Ok(!self.driver.find_elements(None, &selector).await?.is_empty())
    }

    /// Close the browser
    pub async fn close(&self) -> E2eResult<()> {
        self.driver.close().await
    }
}

fn first_or_missing(session: &Session, ids: Vec<ElementId>, selector: &Selector) -> E2eResult<Element> {
    ids.into_iter()
        .next()
        .map(|id| Element::new(session.clone(), id, selector.to_string()))
        .ok_or_else(|| E2eError::NoSuchElement {
            selector: selector.to_string(),
        })
}

fn wrap_all(session: &Session, ids: Vec<ElementId>, selector: &Selector) -> Vec<Element> {
    ids.into_iter()
        .map(|id| Element::new(session.clone(), id, selector.to_string()))
        .collect()
}

/// Located DOM element bound to a session
#[derive(Debug, Clone)]
pub struct Element {
    session: Session,
    id: ElementId,
    description: String,
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Element {
    /// Create an element handle
    #[must_use]
    pub fn new(session: Session, id: ElementId, description: impl Into<String>) -> Self {
        Self {
            session,
            id,
            description: description.into(),
        }
    }

    /// Element id
    #[must_use]
    pub const fn id(&self) -> &ElementId {
        &self.id
    }

    /// Selector this element was located with
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Session the element belongs to
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// First descendant matching `selector`
    pub async fn find(&self, selector: impl Into<Selector>) -> E2eResult<Element> {
        let selector = selector.into();
        let ids = self
            .session
            .driver
            .find_elements(Some(&self.id), &selector)
            .await?;
        first_or_missing(&self.session, ids, &selector)
    }

    /// First matching descendant, or `None`
    pub async fn find_optional(&self, selector: impl Into<Selector>) -> E2eResult<Option<Element>> {
        let selector = selector.into();
        let ids = self
            .session
            .driver
            .find_elements(Some(&self.id), &selector)
            .await?;
        Ok(ids
            .into_iter()
            .next()
            .map(|id| Element::new(self.session.clone(), id, selector.to_string())))
    }

    /// All matching descendants in document order
    pub async fn find_all(&self, selector: impl Into<Selector>) -> E2eResult<Vec<Element>> {
        let selector = selector.into();
        let ids = self
            .session
            .driver
            .find_elements(Some(&self.id), &selector)
            .await?;
        Ok(wrap_all(&self.session, ids, &selector))
    }

    /// Whether any descendant matches `selector`
    pub async fn has(&self, selector: impl Into<Selector>) -> E2eResult<bool> {
        let selector = selector.into();
        Ok(!self
            .session
            .driver
            .find_elements(Some(&self.id), &selector)
            .await?
            .is_empty())
    }

    /// Click the element
    pub async fn click(&self) -> E2eResult<()> {
        debug!(element = %self.id, selector = %self.description, "click");
        self.session.driver.click(&self.id).await
    }

    /// Type text into the element
    pub async fn send_keys(&self, text: &str) -> E2eResult<()> {
        debug!(element = %self.id, "send_keys");
        self.session.driver.send_keys(&self.id, text).await
    }

    /// Clear the element value
    pub async fn clear(&self) -> E2eResult<()> {
        self.session.driver.clear(&self.id).await
    }

    /// Visible text
    pub async fn text(&self) -> E2eResult<String> {
        self.session.driver.text(&self.id).await
    }

    /// Inner HTML
    pub async fn inner_html(&self) -> E2eResult<String> {
        self.session.driver.inner_html(&self.id).await
    }

    /// Attribute value
    pub async fn attribute(&self, name: &str) -> E2eResult<Option<String>> {
        self.session.driver.attribute(&self.id, name).await
    }

    /// Current `value`, empty when unset
    pub async fn value(&self) -> E2eResult<String> {
        Ok(self.attribute("value").await?.unwrap_or_default())
    }

    /// CSS classes of the element
    pub async fn classes(&self) -> E2eResult<Vec<String>> {
        Ok(self
            .attribute("class")
            .await?
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect())
    }

    /// Whether the element carries the CSS class
    pub async fn has_class(&self, class: &str) -> E2eResult<bool> {
        Ok(self.classes().await?.iter().any(|c| c == class))
    }

    /// Whether the element is visible
    pub async fn is_displayed(&self) -> E2eResult<bool> {
        self.session.driver.is_displayed(&self.id).await
    }

    /// Whether the element is enabled
    pub async fn is_enabled(&self) -> E2eResult<bool> {
        self.session.driver.is_enabled(&self.id).await
    }

    /// Whether the element is selected/checked
    pub async fn is_selected(&self) -> E2eResult<bool> {
        self.session.driver.is_selected(&self.id).await
    }

    /// Whether the element is still attached to the document
    pub async fn is_present(&self) -> E2eResult<bool> {
        Ok(!self.session.driver.is_stale(&self.id).await?)
    }

    /// Hover the element
    pub async fn hover(&self) -> E2eResult<()> {
        self.session.driver.hover(&self.id).await
    }

    /// Drag this element onto `target`
    pub async fn drag_to(&self, target: &Element) -> E2eResult<()> {
        debug!(source = %self.id, target = %target.id, "drag_and_drop");
        self.session.driver.drag_and_drop(&self.id, &target.id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockNode};

    fn session_with_list() -> Session {
        let driver = MockDriver::new();
        driver.with_dom(|dom| {
            let root = dom.root();
            dom.append(
                root,
                MockNode::new("ul")
                    .id("items")
                    .child(MockNode::new("li").class("item active").text("One"))
                    .child(MockNode::new("li").class("item").text("Two"))
                    .child(MockNode::new("li").class("item").attr("disabled", "").text("Three")),
            );
        });
        Session::new(driver)
    }

    mod keys_tests {
        use super::*;

        #[test]
        fn test_key_names() {
            assert_eq!(Keys::name('\u{E007}'), Some("Enter"));
            assert_eq!(Keys::name('a'), None);
            assert!(Keys::ENTER.chars().all(|c| Keys::name(c).is_some()));
        }
    }

    mod element_tests {
        use super::*;

        #[tokio::test]
        async fn test_find_scoped_and_all() {
            let session = session_with_list();
            let list = session.find("#items").await.unwrap();
            let items = list.find_all("li.item").await.unwrap();
            assert_eq!(items.len(), 3);
            assert_eq!(items[1].text().await.unwrap(), "Two");
            assert!(list.has(".active").await.unwrap());
            assert!(!list.has(".missing").await.unwrap());
        }

        #[tokio::test]
        async fn test_missing_element_error() {
            let session = session_with_list();
            let err = session.find(".nothing").await.unwrap_err();
            assert!(matches!(err, E2eError::NoSuchElement { .. }));
            assert!(session.find_optional(".nothing").await.unwrap().is_none());
        }

        #[tokio::test]
        async fn test_classes_and_state() {
            let session = session_with_list();
            let items = session.find_all("li").await.unwrap();
            assert!(items[0].has_class("active").await.unwrap());
            assert!(!items[0].has_class("act").await.unwrap());
            assert!(items[0].is_enabled().await.unwrap());
            assert!(!items[2].is_enabled().await.unwrap());
            assert!(items[0].is_present().await.unwrap());
        }

        #[test]
        fn test_script_arg_conversions() {
            let arg: ScriptArg = "hash".into();
            assert_eq!(arg, ScriptArg::Value(serde_json::json!("hash")));
        }
    }
}
