//! Wait Mechanisms
//!
//! Expected-condition polling for synchronizing with the sandbox UI.
//! A wait checks its predicate, sleeps for the poll interval and tries
//! again until the predicate holds or the timeout expires. Expiry is a hard
//! failure ([`E2eError::Timeout`]); there is no retry beyond the polling.

use crate::driver::{Element, Session};
use crate::locator::Selector;
use crate::result::{E2eError, E2eResult};
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// TARGETS AND CONDITIONS
// =============================================================================

/// What a condition observes: a located element or a lazily resolved
/// selector (optionally scoped under an element).
#[derive(Debug, Clone)]
pub enum Target {
    /// Already located element
    Element(Element),
    /// Selector resolved on every poll
    Lazy {
        /// Search root; `None` means the whole document
        scope: Option<Element>,
        /// Selector to resolve
        selector: Selector,
    },
}

impl Target {
    /// Selector resolved below `scope` on every poll
    pub fn within(scope: &Element, selector: impl Into<Selector>) -> Self {
        Self::Lazy {
            scope: Some(scope.clone()),
            selector: selector.into(),
        }
    }

    /// Resolve to the first matching element, if any
    async fn resolve(&self, session: &Session) -> E2eResult<Option<Element>> {
        match self {
            Self::Element(element) => {
                if element.is_present().await? {
                    Ok(Some(element.clone()))
                } else {
                    Ok(None)
                }
            }
            Self::Lazy {
                scope: Some(scope),
                selector,
            } => scope.find_optional(selector.clone()).await,
            Self::Lazy {
                scope: None,
                selector,
            } => session.find_optional(selector.clone()).await,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(element) => write!(f, "{}", element.description()),
            Self::Lazy {
                scope: Some(scope),
                selector,
            } => write!(f, "{selector} within {}", scope.description()),
            Self::Lazy {
                scope: None,
                selector,
            } => write!(f, "{selector}"),
        }
    }
}

impl From<&Element> for Target {
    fn from(element: &Element) -> Self {
        Self::Element(element.clone())
    }
}

impl From<Selector> for Target {
    fn from(selector: Selector) -> Self {
        Self::Lazy {
            scope: None,
            selector,
        }
    }
}

impl From<&str> for Target {
    fn from(css: &str) -> Self {
        Self::from(Selector::css(css))
    }
}

impl From<String> for Target {
    fn from(css: String) -> Self {
        Self::from(Selector::css(css))
    }
}

/// Expected conditions (protractor `ExpectedConditions` parity)
#[derive(Debug, Clone)]
pub enum Condition {
    /// Target exists and is displayed
    Visible(Target),
    /// Target is absent or hidden
    Invisible(Target),
    /// Target exists in the DOM
    Present(Target),
    /// Target no longer exists in the DOM
    Stale(Target),
    /// Target is displayed and enabled
    Clickable(Target),
    /// Target's value contains the text
    TextInValue(Target, String),
    /// Target's visible text contains the text
    TextPresent(Target, String),
}

impl Condition {
    /// Visibility of a target
    pub fn visible(target: impl Into<Target>) -> Self {
        Self::Visible(target.into())
    }

    /// Invisibility of a target
    pub fn invisible(target: impl Into<Target>) -> Self {
        Self::Invisible(target.into())
    }

    /// Presence of a target
    pub fn present(target: impl Into<Target>) -> Self {
        Self::Present(target.into())
    }

    /// Staleness of a target
    pub fn stale(target: impl Into<Target>) -> Self {
        Self::Stale(target.into())
    }

    /// Clickability of a target
    pub fn clickable(target: impl Into<Target>) -> Self {
        Self::Clickable(target.into())
    }

    /// Text present in a target's value
    pub fn text_in_value(target: impl Into<Target>, text: impl Into<String>) -> Self {
        Self::TextInValue(target.into(), text.into())
    }

    /// Text present in a target's visible text
    pub fn text_present(target: impl Into<Target>, text: impl Into<String>) -> Self {
        Self::TextPresent(target.into(), text.into())
    }

    /// Evaluate the condition once
    ///
    /// Elements that vanish between lookup and query count as "not yet".
    pub async fn check(&self, session: &Session) -> E2eResult<bool> {
        let outcome = self.check_once(session).await;
        match outcome {
            Err(E2eError::StaleElement { .. } | E2eError::NoSuchElement { .. }) => {
                Ok(matches!(self, Self::Invisible(_) | Self::Stale(_)))
            }
            other => other,
        }
    }

    async fn check_once(&self, session: &Session) -> E2eResult<bool> {
        match self {
            Self::Visible(target) => match target.resolve(session).await? {
                Some(element) => element.is_displayed().await,
                None => Ok(false),
            },
            Self::Invisible(target) => match target.resolve(session).await? {
                Some(element) => Ok(!element.is_displayed().await?),
                None => Ok(true),
            },
            Self::Present(target) => Ok(target.resolve(session).await?.is_some()),
            Self::Stale(target) => Ok(target.resolve(session).await?.is_none()),
            Self::Clickable(target) => match target.resolve(session).await? {
                Some(element) => {
                    Ok(element.is_displayed().await? && element.is_enabled().await?)
                }
                None => Ok(false),
            },
            Self::TextInValue(target, text) => match target.resolve(session).await? {
                Some(element) => Ok(element.value().await?.contains(text.as_str())),
                None => Ok(false),
            },
            Self::TextPresent(target, text) => match target.resolve(session).await? {
                Some(element) => Ok(element.text().await?.contains(text.as_str())),
                None => Ok(false),
            },
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visible(t) => write!(f, "visibility of {t}"),
            Self::Invisible(t) => write!(f, "invisibility of {t}"),
            Self::Present(t) => write!(f, "presence of {t}"),
            Self::Stale(t) => write!(f, "staleness of {t}"),
            Self::Clickable(t) => write!(f, "{t} to be clickable"),
            Self::TextInValue(t, text) => write!(f, "value of {t} to contain {text:?}"),
            Self::TextPresent(t, text) => write!(f, "text of {t} to contain {text:?}"),
        }
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of predicate evaluations
    pub polls: u32,
    /// Description of what was waited for
    pub waited_for: String,
}

// =============================================================================
// WAITER IMPLEMENTATION
// =============================================================================

/// Poll an async predicate until it holds or `options.timeout_ms` elapses.
///
/// The predicate is evaluated at least once, even with a zero timeout.
pub async fn wait_until<F, Fut>(
    description: &str,
    options: &WaitOptions,
    mut predicate: F,
) -> E2eResult<WaitResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<bool>>,
{
    let start = Instant::now();
    let mut polls = 0_u32;

    loop {
        polls += 1;
        if predicate().await? {
            return Ok(WaitResult {
                elapsed: start.elapsed(),
                polls,
                waited_for: description.to_string(),
            });
        }
        if start.elapsed() >= options.timeout() {
            tracing::debug!(waited_for = description, polls, "wait timed out");
            return Err(E2eError::Timeout {
                ms: options.timeout_ms,
                waited_for: description.to_string(),
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}

/// Waiter bound to a session and its default options
#[derive(Debug, Clone)]
pub struct Waiter {
    session: Session,
    options: WaitOptions,
}

impl Waiter {
    /// Create a waiter with the session's default options
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
            options: *session.wait_options(),
        }
    }

    /// Override the options
    #[must_use]
    pub const fn with_options(mut self, options: WaitOptions) -> Self {
        self.options = options;
        self
    }

    /// Options in effect
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Wait for an expected condition
    pub async fn until(&self, condition: Condition) -> E2eResult<WaitResult> {
        let description = condition.to_string();
        let session = &self.session;
        let condition = &condition;
        wait_until(&description, &self.options, || async move {
            condition.check(session).await
        })
        .await
    }

    /// Wait for a custom predicate
    pub async fn until_fn<F, Fut>(&self, description: &str, predicate: F) -> E2eResult<WaitResult>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = E2eResult<bool>>,
    {
        wait_until(description, &self.options, predicate).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockNode};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> WaitOptions {
        WaitOptions::new().with_timeout(60).with_poll_interval(5)
    }

    fn session() -> Session {
        let driver = MockDriver::new();
        driver.with_dom(|dom| {
            let root = dom.root();
            dom.append(root, MockNode::new("div").class("shown").text("Visible"));
            dom.append(root, MockNode::new("div").class("hidden-one").hidden());
            dom.append(root, MockNode::new("input").class("field").attr("value", "abc"));
        });
        Session::new(driver).with_wait_options(fast())
    }

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_wait_options_default() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_wait_options_builders() {
            let opts = WaitOptions::new().with_timeout(5000).with_poll_interval(10);
            assert_eq!(opts.timeout(), Duration::from_millis(5000));
            assert_eq!(opts.poll_interval(), Duration::from_millis(10));
        }
    }

    mod wait_until_tests {
        use super::*;

        #[tokio::test]
        async fn test_immediate_success() {
            let result = wait_until("always", &fast(), || async { Ok(true) })
                .await
                .unwrap();
            assert_eq!(result.polls, 1);
            assert_eq!(result.waited_for, "always");
        }

        #[tokio::test]
        async fn test_eventual_success() {
            let counter = AtomicU32::new(0);
            let result = wait_until("third poll", &fast(), || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok(n >= 2) }
            })
            .await
            .unwrap();
            assert_eq!(result.polls, 3);
        }

        #[tokio::test]
        async fn test_timeout_is_hard_failure() {
            let err = wait_until("never", &fast(), || async { Ok(false) })
                .await
                .unwrap_err();
            match err {
                E2eError::Timeout { ms, waited_for } => {
                    assert_eq!(ms, 60);
                    assert_eq!(waited_for, "never");
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[tokio::test]
        async fn test_zero_timeout_still_polls_once() {
            let opts = WaitOptions::new().with_timeout(0);
            assert!(wait_until("once", &opts, || async { Ok(true) }).await.is_ok());
        }

        #[tokio::test]
        async fn test_predicate_error_propagates() {
            let err = wait_until("broken", &fast(), || async {
                Err::<bool, _>(E2eError::script("boom"))
            })
            .await
            .unwrap_err();
            assert!(matches!(err, E2eError::Script { .. }));
        }
    }

    mod condition_tests {
        use super::*;

        #[tokio::test]
        async fn test_visibility_conditions() {
            let session = session();
            assert!(Condition::visible(".shown").check(&session).await.unwrap());
            assert!(!Condition::visible(".hidden-one").check(&session).await.unwrap());
            assert!(Condition::invisible(".hidden-one").check(&session).await.unwrap());
            assert!(Condition::invisible(".absent").check(&session).await.unwrap());
        }

        #[tokio::test]
        async fn test_presence_and_staleness() {
            let session = session();
            assert!(Condition::present(".hidden-one").check(&session).await.unwrap());
            assert!(Condition::stale(".absent").check(&session).await.unwrap());
            assert!(!Condition::stale(".shown").check(&session).await.unwrap());
        }

        #[tokio::test]
        async fn test_text_conditions() {
            let session = session();
            assert!(Condition::text_in_value(".field", "ab")
                .check(&session)
                .await
                .unwrap());
            assert!(Condition::text_present(".shown", "Vis")
                .check(&session)
                .await
                .unwrap());
        }

        #[tokio::test]
        async fn test_waiter_times_out_on_hidden() {
            let session = session();
            let err = Waiter::new(&session)
                .until(Condition::visible(".hidden-one"))
                .await
                .unwrap_err();
            assert!(err.to_string().contains("visibility of css=.hidden-one"));
        }

        #[test]
        fn test_condition_display() {
            let cond = Condition::clickable(Selector::css("button"));
            assert_eq!(cond.to_string(), "css=button to be clickable");
        }
    }
}
