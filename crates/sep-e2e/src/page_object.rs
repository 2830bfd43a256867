//! Page Object Model Support
//!
//! A page object wraps exactly one DOM sub-tree (its *wrapper*) and exposes
//! semantically named getters and actions that delegate to element
//! primitives. Two rules hold for every page object:
//!
//! - it cannot exist without a wrapper ([`E2eError::MissingWrapper`]);
//! - it cannot be used before its readiness check has resolved.
//!
//! For statically typed page objects the second rule is a compile-time
//! requirement: [`PageObject::wait_until_opened`] has no default body, and
//! the only constructor ([`PageObject::bind`]) awaits it. Page objects
//! assembled at runtime go through [`PageObjectBuilder`], which refuses to
//! build without a [`Readiness`] gate.

use crate::driver::{Element, Session};
use crate::locator::Selector;
use crate::result::{E2eError, E2eResult};
use crate::wait::{Condition, Target, WaitOptions, WaitResult, Waiter};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// The validated wrapper of a page object plus lookup helpers scoped to it.
///
/// Child elements are re-queried on every call; only the wrapper handle is
/// kept.
#[derive(Debug, Clone)]
pub struct PageRegion {
    element: Element,
}

impl PageRegion {
    /// Validate the wrapper handle
    ///
    /// # Errors
    ///
    /// [`E2eError::MissingWrapper`] when `wrapper` is `None`.
    pub fn new(wrapper: Option<Element>, page: &str) -> E2eResult<Self> {
        wrapper
            .map(|element| Self { element })
            .ok_or_else(|| E2eError::MissingWrapper {
                page: page.to_string(),
            })
    }

    /// Wrapper element
    #[must_use]
    pub const fn element(&self) -> &Element {
        &self.element
    }

    /// Session the wrapper belongs to
    #[must_use]
    pub const fn session(&self) -> &Session {
        self.element.session()
    }

    /// First descendant matching `selector`
    pub async fn find(&self, selector: impl Into<Selector>) -> E2eResult<Element> {
        self.element.find(selector).await
    }

    /// First matching descendant, or `None`
    pub async fn find_optional(&self, selector: impl Into<Selector>) -> E2eResult<Option<Element>> {
        self.element.find_optional(selector).await
    }

    /// All matching descendants
    pub async fn find_all(&self, selector: impl Into<Selector>) -> E2eResult<Vec<Element>> {
        self.element.find_all(selector).await
    }

    /// Whether any descendant matches
    pub async fn has(&self, selector: impl Into<Selector>) -> E2eResult<bool> {
        self.element.has(selector).await
    }

    /// Waiter using the session's default options
    #[must_use]
    pub fn waiter(&self) -> Waiter {
        Waiter::new(self.session())
    }

    /// Wait for an expected condition
    pub async fn wait_for(&self, condition: Condition) -> E2eResult<WaitResult> {
        self.waiter().until(condition).await
    }

    /// Wait until the wrapper itself is displayed
    pub async fn wait_until_visible(&self) -> E2eResult<()> {
        let _ = self.wait_for(Condition::visible(&self.element)).await?;
        Ok(())
    }

    /// Wait until the wrapper is attached to the document
    pub async fn wait_until_present(&self) -> E2eResult<()> {
        let _ = self.wait_for(Condition::present(&self.element)).await?;
        Ok(())
    }

    /// Wait for a visible descendant and return it
    pub async fn visible_child(&self, selector: impl Into<Selector>) -> E2eResult<Element> {
        let selector = selector.into();
        let _ = self
            .wait_for(Condition::visible(Target::within(&self.element, selector.clone())))
            .await?;
        self.element.find(selector).await
    }

    /// Wait for a present descendant and return it
    pub async fn present_child(&self, selector: impl Into<Selector>) -> E2eResult<Element> {
        let selector = selector.into();
        let _ = self
            .wait_for(Condition::present(Target::within(&self.element, selector.clone())))
            .await?;
        self.element.find(selector).await
    }

    /// Whether the wrapper carries the CSS class
    pub async fn has_class(&self, class: &str) -> E2eResult<bool> {
        self.element.has_class(class).await
    }
}

/// Trait for page objects representing a page or component in the UI.
///
/// # Example
///
/// ```ignore
/// struct Notification {
///     region: PageRegion,
/// }
///
/// #[async_trait]
/// impl PageObject for Notification {
///     const NAME: &'static str = "Notification";
///
///     fn from_region(region: PageRegion) -> Self {
///         Self { region }
///     }
///
///     fn region(&self) -> &PageRegion {
///         &self.region
///     }
///
///     async fn wait_until_opened(&self) -> E2eResult<()> {
///         self.region.wait_until_visible().await
///     }
/// }
/// ```
#[async_trait]
pub trait PageObject: Sized + Send + Sync {
    /// Page name for logging and errors
    const NAME: &'static str;

    /// Assemble the page object around a validated wrapper
    fn from_region(region: PageRegion) -> Self;

    /// The validated wrapper
    fn region(&self) -> &PageRegion;

    /// Readiness gate, awaited once during [`bind`](Self::bind)
    async fn wait_until_opened(&self) -> E2eResult<()>;

    /// Validate the wrapper, construct, and await readiness
    ///
    /// # Errors
    ///
    /// [`E2eError::MissingWrapper`] without a wrapper; [`E2eError::Timeout`]
    /// when the readiness check does not resolve in time.
    async fn bind(wrapper: Option<Element>) -> E2eResult<Self> {
        let region = PageRegion::new(wrapper, Self::NAME)?;
        let page = Self::from_region(region);
        page.wait_until_opened().await?;
        debug!(page = Self::NAME, "page object ready");
        Ok(page)
    }

    /// Wait for `selector` in the document and bind its first match
    async fn locate(session: &Session, selector: Selector) -> E2eResult<Self> {
        let _ = Waiter::new(session)
            .until(Condition::present(selector.clone()))
            .await?;
        Self::bind(session.find_optional(selector).await?).await
    }

    /// Wait for `selector` below `scope` and bind its first match
    async fn locate_within(scope: &Element, selector: Selector) -> E2eResult<Self> {
        let _ = Waiter::new(scope.session())
            .until(Condition::present(Target::within(scope, selector.clone())))
            .await?;
        Self::bind(scope.find_optional(selector).await?).await
    }

    /// Wrapper element
    fn element(&self) -> &Element {
        self.region().element()
    }
}

/// Implement [`PageObject`] for a struct whose only field is
/// `region: PageRegion`. The closure-like tail is the readiness gate.
macro_rules! impl_page_object {
    ($ty:ty, $name:literal, |$page:ident| $ready:expr) => {
        #[async_trait::async_trait]
        impl $crate::page_object::PageObject for $ty {
            const NAME: &'static str = $name;

            fn from_region(region: $crate::page_object::PageRegion) -> Self {
                Self { region }
            }

            fn region(&self) -> &$crate::page_object::PageRegion {
                &self.region
            }

            async fn wait_until_opened(&self) -> $crate::result::E2eResult<()> {
                let $page = self;
                $ready
            }
        }
    };
}
pub(crate) use impl_page_object;

/// Readiness gate of a runtime-assembled page object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// The wrapper is displayed
    WrapperVisible,
    /// The wrapper is attached
    WrapperPresent,
    /// A descendant is displayed
    ChildVisible(Selector),
    /// A descendant is attached
    ChildPresent(Selector),
}

impl Readiness {
    fn condition(&self, wrapper: &Element) -> Condition {
        match self {
            Self::WrapperVisible => Condition::visible(wrapper),
            Self::WrapperPresent => Condition::present(wrapper),
            Self::ChildVisible(selector) => {
                Condition::visible(Target::within(wrapper, selector.clone()))
            }
            Self::ChildPresent(selector) => {
                Condition::present(Target::within(wrapper, selector.clone()))
            }
        }
    }
}

/// Builder for page objects whose locators are only known at runtime
#[derive(Debug, Clone)]
pub struct PageObjectBuilder {
    name: String,
    locators: HashMap<String, Selector>,
    readiness: Option<Readiness>,
    wait_options: Option<WaitOptions>,
}

impl PageObjectBuilder {
    /// Create a new page object builder
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locators: HashMap::new(),
            readiness: None,
            wait_options: None,
        }
    }

    /// Add a locator with a name
    #[must_use]
    pub fn with_locator(mut self, name: impl Into<String>, selector: impl Into<Selector>) -> Self {
        let _ = self.locators.insert(name.into(), selector.into());
        self
    }

    /// Set the readiness gate
    #[must_use]
    pub fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = Some(readiness);
        self
    }

    /// Override the session's wait options for the readiness check
    #[must_use]
    pub const fn with_wait_options(mut self, options: WaitOptions) -> Self {
        self.wait_options = Some(options);
        self
    }

    /// Bind to a wrapper and await readiness
    ///
    /// # Errors
    ///
    /// [`E2eError::MissingReadiness`] when no gate was configured,
    /// [`E2eError::MissingWrapper`] without a wrapper, and
    /// [`E2eError::Timeout`] when the gate does not resolve.
    pub async fn build(self, wrapper: Option<Element>) -> E2eResult<DynamicPageObject> {
        let readiness = self.readiness.ok_or_else(|| E2eError::MissingReadiness {
            page: self.name.clone(),
        })?;
        let region = PageRegion::new(wrapper, &self.name)?;
        let waiter = match self.wait_options {
            Some(options) => region.waiter().with_options(options),
            None => region.waiter(),
        };
        let _ = waiter.until(readiness.condition(region.element())).await?;
        debug!(page = %self.name, "page object ready");
        Ok(DynamicPageObject {
            name: self.name,
            region,
            locators: self.locators,
        })
    }
}

/// Page object assembled by [`PageObjectBuilder`]
#[derive(Debug, Clone)]
pub struct DynamicPageObject {
    name: String,
    region: PageRegion,
    locators: HashMap<String, Selector>,
}

impl DynamicPageObject {
    /// Page name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The validated wrapper
    #[must_use]
    pub const fn region(&self) -> &PageRegion {
        &self.region
    }

    /// Get a locator by name
    #[must_use]
    pub fn locator(&self, name: &str) -> Option<&Selector> {
        self.locators.get(name)
    }

    /// Get all locator names, sorted
    #[must_use]
    pub fn locator_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.locators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a named locator below the wrapper
    pub async fn find(&self, name: &str) -> E2eResult<Element> {
        let selector = self
            .locator(name)
            .cloned()
            .ok_or_else(|| E2eError::NoSuchElement {
                selector: format!("{}::{name}", self.name),
            })?;
        self.region.find(selector).await
    }

    /// Click a named element
    pub async fn click(&self, name: &str) -> E2eResult<()> {
        self.find(name).await?.click().await
    }

    /// Visible text of a named element
    pub async fn text(&self, name: &str) -> E2eResult<String> {
        self.find(name).await?.text().await
    }
}
