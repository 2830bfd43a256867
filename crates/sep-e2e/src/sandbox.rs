//! Sandbox page navigation helper.
//!
//! Sandboxes are standalone renderings of one UI feature served at
//! `/sandbox/<feature>/<variant>`, optionally parameterized by a `#/<hash>`
//! carrying query-like parameters. Re-opening the route that is already
//! loaded only updates the hash and calls the application's global
//! `restartSandbox()` hook, so the browser session survives.

use crate::driver::Session;
use crate::result::E2eResult;
use std::fmt;
use tracing::info;

/// Script run when re-opening the current route; the argument is the
/// fragment including its leading `/`, as in [`SandboxPage::url_for`]
pub const RESTART_SCRIPT: &str = "window.location.hash = arguments[0]; window.restartSandbox();";

/// How [`SandboxPage::open`] loaded the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Full browser navigation
    Navigated,
    /// Hash update plus in-page restart
    Restarted,
}

/// Navigation helper remembering the last opened route and hash
#[derive(Debug, Clone)]
pub struct SandboxPage {
    session: Session,
    base_url: String,
    last_route: Option<String>,
    last_hash: Option<String>,
}

impl SandboxPage {
    /// Create a helper for the sandbox server at `base_url`
    #[must_use]
    pub fn new(session: Session, base_url: impl Into<String>) -> Self {
        Self {
            session,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            last_route: None,
            last_hash: None,
        }
    }

    /// Session used for navigation
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Sandbox server origin
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Last opened route
    #[must_use]
    pub fn last_route(&self) -> Option<&str> {
        self.last_route.as_deref()
    }

    /// Hash of the last open
    #[must_use]
    pub fn last_hash(&self) -> Option<&str> {
        self.last_hash.as_deref()
    }

    /// Absolute URL of `route` with an optional hash
    #[must_use]
    pub fn url_for(&self, route: &str, hash: Option<&str>) -> String {
        let route = if route.starts_with('/') {
            route.to_string()
        } else {
            format!("/{route}")
        };
        match hash {
            Some(hash) => format!("{}{route}#/{hash}", self.base_url),
            None => format!("{}{route}", self.base_url),
        }
    }

    /// Load a sandbox view
    ///
    /// A route different from the last one (or the first call) navigates;
    /// the same route only sets the hash and restarts the application.
    ///
    /// # Errors
    ///
    /// Navigation and script errors propagate unchanged.
    pub async fn open(&mut self, route: &str, hash: Option<&str>) -> E2eResult<OpenMode> {
        let mode = if self.last_route.as_deref() == Some(route) {
            info!(route, hash = hash.unwrap_or_default(), "restart sandbox");
            let fragment = hash.map(|hash| format!("/{hash}")).unwrap_or_default();
            let _ = self
                .session
                .execute_script(RESTART_SCRIPT, &[fragment.as_str().into()])
                .await?;
            OpenMode::Restarted
        } else {
            self.session.navigate(&self.url_for(route, hash)).await?;
            OpenMode::Navigated
        };
        self.last_route = Some(route.to_string());
        self.last_hash = hash.map(str::to_string);
        Ok(mode)
    }
}

/// Builder for the `path?k=v&k2=v2` hash payload of a sandbox
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SandboxHash {
    path: String,
    params: Vec<(String, String)>,
}

impl SandboxHash {
    /// Empty hash
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash starting with a path segment (e.g. an instance id)
    #[must_use]
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }
}

impl fmt::Display for SandboxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockNode};

    fn driver() -> MockDriver {
        let driver = MockDriver::new();
        for route in ["/sandbox/a", "/sandbox/b"] {
            driver.route(route, |dom, location| {
                let root = dom.root();
                let _ = dom.append(root, MockNode::new("div").class("hash").text(&location.hash));
                Ok(())
            });
        }
        driver
    }

    mod hash_tests {
        use super::*;

        #[test]
        fn test_query_like_hash() {
            let hash = SandboxHash::new().param("fail", true).param("hasErrors", false);
            assert_eq!(hash.to_string(), "?fail=true&hasErrors=false");
        }

        #[test]
        fn test_hash_with_path() {
            let hash = SandboxHash::with_path("emf:123456").param("mode", "edit");
            assert_eq!(hash.to_string(), "emf:123456?mode=edit");
            assert_eq!(SandboxHash::with_path("emf:1").to_string(), "emf:1");
        }
    }

    mod open_tests {
        use super::*;

        #[test]
        fn test_url_for() {
            let page = SandboxPage::new(Session::new(MockDriver::new()), "http://localhost:5000/");
            assert_eq!(
                page.url_for("/sandbox/a", Some("?x=1")),
                "http://localhost:5000/sandbox/a#/?x=1"
            );
            assert_eq!(page.url_for("sandbox/a", None), "http://localhost:5000/sandbox/a");
        }

        #[tokio::test]
        async fn test_same_route_restarts_in_place() {
            let driver = driver();
            let mut page = SandboxPage::new(Session::new(driver.clone()), "http://localhost");
            assert_eq!(page.open("/sandbox/a", None).await.unwrap(), OpenMode::Navigated);
            assert_eq!(
                page.open("/sandbox/a", Some("?x=1")).await.unwrap(),
                OpenMode::Restarted
            );
            assert_eq!(driver.navigations().len(), 1);
            assert!(driver.was_called("execute_script"));
            let text = page.session().find(".hash").await.unwrap().text().await.unwrap();
            assert_eq!(text, "?x=1");
            assert_eq!(page.last_hash(), Some("?x=1"));
        }

        #[tokio::test]
        async fn test_restart_keeps_navigation_url_shape() {
            let driver = driver();
            let mut page = SandboxPage::new(Session::new(driver.clone()), "http://localhost");
            let _ = page.open("/sandbox/a", Some("?x=1")).await.unwrap();
            let navigated = page.session().current_url().await.unwrap();
            let _ = page.open("/sandbox/a", Some("?x=2")).await.unwrap();
            let _ = page.open("/sandbox/a", Some("?x=1")).await.unwrap();
            assert_eq!(page.session().current_url().await.unwrap(), navigated);
            assert_eq!(navigated, page.url_for("/sandbox/a", Some("?x=1")));
            assert_eq!(driver.navigations().len(), 1);
        }

        #[tokio::test]
        async fn test_different_route_navigates() {
            let driver = driver();
            let mut page = SandboxPage::new(Session::new(driver.clone()), "http://localhost");
            let _ = page.open("/sandbox/a", None).await.unwrap();
            assert_eq!(page.open("/sandbox/b", None).await.unwrap(), OpenMode::Navigated);
            assert_eq!(
                driver.navigations(),
                vec![
                    "http://localhost/sandbox/a".to_string(),
                    "http://localhost/sandbox/b".to_string()
                ]
            );
            assert_eq!(page.last_route(), Some("/sandbox/b"));
        }
    }
}
