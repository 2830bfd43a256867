//! Chromium control over the Chrome `DevTools` Protocol.
//!
//! [`BrowserConfig`] is always available so configuration can be loaded and
//! printed without a browser. [`ChromiumDriver`] needs the `browser` feature.
//!
//! Located nodes live in a page-side registry (`window.__sepE2e`). An
//! [`ElementId`](crate::driver::ElementId) is `<page token>:<index>`, so ids
//! from a previous document resolve as stale after a navigation.

use serde::{Deserialize, Serialize};

/// Browser launch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 1024,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// Registry bootstrap, evaluated at the start of every driver script
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
const REGISTRY: &str = r"(function () {
  if (!window.__sepE2e) {
    window.__sepE2e = {
      token: Math.random().toString(36).slice(2),
      nodes: [],
      put(node) {
        let i = this.nodes.indexOf(node);
        if (i < 0) { this.nodes.push(node); i = this.nodes.length - 1; }
        return this.token + ':' + i;
      },
      lookup(id) {
        const [token, index] = id.split(':');
        if (token !== this.token) { return null; }
        const node = this.nodes[Number(index)];
        return node && node.isConnected ? node : null;
      },
      get(id) {
        const node = this.lookup(id);
        if (!node) { throw new Error('stale element ' + id); }
        return node;
      },
    };
  }
  return window.__sepE2e;
})()";

/// Property-or-attribute read with WebDriver `getAttribute` semantics
#[cfg_attr(not(feature = "browser"), allow(dead_code))]
const READ_ATTRIBUTE: &str = r"
  const prop = el[name];
  if (typeof prop === 'boolean') { return prop ? 'true' : null; }
  if (typeof prop === 'string' || typeof prop === 'number') {
    if (name !== 'href' && name !== 'src') { return String(prop); }
  }
  return el.getAttribute(name);";

#[cfg(feature = "browser")]
mod chromium {
    use super::{BrowserConfig, READ_ATTRIBUTE, REGISTRY};
    use crate::driver::{ElementId, Keys, ScriptArg, WebDriver};
    use crate::locator::Selector;
    use crate::result::{E2eError, E2eResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
    use chromiumoxide::element::Element as CdpElement;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use tokio::sync::Mutex;
    use tokio::task::JoinHandle;
    use tracing::{debug, info};

    /// Real Chromium session implementing [`WebDriver`]
    #[derive(Debug)]
    pub struct ChromiumDriver {
        config: BrowserConfig,
        browser: Mutex<CdpBrowser>,
        page: CdpPage,
        handler: JoinHandle<()>,
    }

    fn launch_error(e: impl std::fmt::Display) -> E2eError {
        E2eError::BrowserLaunch {
            message: e.to_string(),
        }
    }

    fn element_error(element: &ElementId, message: String) -> E2eError {
        if message.contains("stale element") {
            E2eError::StaleElement {
                element: element.to_string(),
            }
        } else if message.contains("not interactable") {
            E2eError::NotInteractable {
                element: element.to_string(),
                message,
            }
        } else {
            E2eError::script(message)
        }
    }

    fn js_string(value: &str) -> String {
        serde_json::Value::String(value.to_string()).to_string()
    }

    impl ChromiumDriver {
        /// Launch Chromium and open a blank page
        pub async fn launch(config: BrowserConfig) -> E2eResult<Self> {
            let mut builder =
                CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);
            if !config.headless {
                builder = builder.with_head();
            }
            if !config.sandbox {
                builder = builder.no_sandbox();
            }
            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }
            let cdp_config = builder.build().map_err(launch_error)?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(launch_error)?;
            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });
            let page = browser.new_page("about:blank").await.map_err(launch_error)?;
            info!(headless = config.headless, "chromium launched");

            Ok(Self {
                config,
                browser: Mutex::new(browser),
                page,
                handler,
            })
        }

        /// Launch configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        async fn eval<T: DeserializeOwned>(&self, body: &str) -> E2eResult<T> {
            let expr = format!("(function () {{ const R = {REGISTRY}; {body} }})()");
            let result = self
                .page
                .evaluate(expr)
                .await
                .map_err(|e| E2eError::script(e.to_string()))?;
            result
                .into_value()
                .map_err(|e| E2eError::script(e.to_string()))
        }

        async fn eval_on<T: DeserializeOwned>(&self, element: &ElementId, body: &str) -> E2eResult<T> {
            let script = format!("const el = R.get({}); {body}", js_string(element.as_str()));
            self.eval(&script)
                .await
                .map_err(|e| match e {
                    E2eError::Script { message } => element_error(element, message),
                    other => other,
                })
        }

        /// Resolve a registry id to a CDP element by tagging the node briefly
        async fn handle(&self, element: &ElementId) -> E2eResult<CdpElement> {
            self.eval_on::<()>(
                element,
                "el.setAttribute('data-sep-e2e-handle', ''); return null;",
            )
            .await?;
            let found = self.page.find_element("[data-sep-e2e-handle]").await;
            self.eval_on::<()>(
                element,
                "el.removeAttribute('data-sep-e2e-handle'); return null;",
            )
            .await?;
            found.map_err(|e| element_error(element, e.to_string()))
        }

        async fn set_files(&self, element: &ElementId, text: &str) -> E2eResult<()> {
            let handle = self.handle(element).await?;
            let files: Vec<String> = text.lines().map(str::to_string).collect();
            let params = SetFileInputFilesParams::builder()
                .files(files)
                .backend_node_id(handle.backend_node_id)
                .build()
                .map_err(E2eError::script)?;
            self.page
                .execute(params)
                .await
                .map_err(|e| element_error(element, e.to_string()))?;
            self.eval_on::<()>(
                element,
                "el.dispatchEvent(new Event('change', { bubbles: true })); return null;",
            )
            .await
        }
    }

    #[async_trait]
    impl WebDriver for ChromiumDriver {
        async fn navigate(&self, url: &str) -> E2eResult<()> {
            self.page
                .goto(url)
                .await
                .map_err(|e| E2eError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn current_url(&self) -> E2eResult<String> {
            self.eval("return window.location.href;").await
        }

        async fn execute_script(
            &self,
            script: &str,
            args: &[ScriptArg],
        ) -> E2eResult<serde_json::Value> {
            let args: Vec<String> = args
                .iter()
                .map(|arg| match arg {
                    ScriptArg::Value(value) => value.to_string(),
                    ScriptArg::Element(id) => format!("R.get({})", js_string(id.as_str())),
                })
                .collect();
            let body = format!(
                "const result = (function () {{ {script} }}).apply(null, [{}]); \
                 return result === undefined ? null : JSON.parse(JSON.stringify(result));",
                args.join(", ")
            );
            self.eval(&body).await
        }

        async fn find_elements(
            &self,
            scope: Option<&ElementId>,
            selector: &Selector,
        ) -> E2eResult<Vec<ElementId>> {
            let root = match scope {
                Some(id) => format!("R.get({})", js_string(id.as_str())),
                None => "document".to_string(),
            };
            let body = format!(
                "const root = {root}; return {}.map(n => R.put(n));",
                selector.to_query("root")
            );
            let result: E2eResult<Vec<String>> = match scope {
                Some(id) => self.eval_on(id, &body).await,
                None => self.eval(&body).await,
            };
            let ids = result.map_err(|e| match e {
                E2eError::Script { message } if message.contains("SyntaxError") => {
                    E2eError::InvalidSelector {
                        selector: selector.to_string(),
                        message,
                    }
                }
                other => other,
            })?;
            debug!(selector = %selector, found = ids.len(), "find_elements");
            Ok(ids.into_iter().map(ElementId).collect())
        }

        async fn click(&self, element: &ElementId) -> E2eResult<()> {
            let displayed: bool = self.is_displayed(element).await?;
            if !displayed {
                return Err(E2eError::NotInteractable {
                    element: element.to_string(),
                    message: "element is not displayed".to_string(),
                });
            }
            let handle = self.handle(element).await?;
            handle
                .click()
                .await
                .map_err(|e| element_error(element, e.to_string()))?;
            Ok(())
        }

        async fn send_keys(&self, element: &ElementId, text: &str) -> E2eResult<()> {
            let is_file: bool = self
                .eval_on(element, "return el.tagName === 'INPUT' && el.type === 'file';")
                .await?;
            if is_file {
                return self.set_files(element, text).await;
            }

            let handle = self.handle(element).await?;
            handle
                .focus()
                .await
                .map_err(|e| element_error(element, e.to_string()))?;
            let mut run = String::new();
            for c in text.chars() {
                let Some(key) = Keys::name(c) else {
                    run.push(c);
                    continue;
                };
                if !run.is_empty() {
                    handle
                        .type_str(&run)
                        .await
                        .map_err(|e| element_error(element, e.to_string()))?;
                    run.clear();
                }
                handle
                    .press_key(key)
                    .await
                    .map_err(|e| element_error(element, e.to_string()))?;
            }
            if !run.is_empty() {
                handle
                    .type_str(&run)
                    .await
                    .map_err(|e| element_error(element, e.to_string()))?;
            }
            Ok(())
        }

        async fn clear(&self, element: &ElementId) -> E2eResult<()> {
            self.eval_on(
                element,
                "if (el.isContentEditable) { el.innerHTML = ''; } else { el.value = ''; } \
                 el.dispatchEvent(new Event('input', { bubbles: true })); \
                 el.dispatchEvent(new Event('change', { bubbles: true })); return null;",
            )
            .await
        }

        async fn text(&self, element: &ElementId) -> E2eResult<String> {
            self.eval_on(element, "return (el.innerText || '').trim();").await
        }

        async fn inner_html(&self, element: &ElementId) -> E2eResult<String> {
            self.eval_on(element, "return el.innerHTML;").await
        }

        async fn attribute(&self, element: &ElementId, name: &str) -> E2eResult<Option<String>> {
            let body = format!("const name = {}; {READ_ATTRIBUTE}", js_string(name));
            self.eval_on(element, &body).await
        }

        async fn is_displayed(&self, element: &ElementId) -> E2eResult<bool> {
            self.eval_on(
                element,
                "const style = window.getComputedStyle(el); \
                 return style.visibility !== 'hidden' && style.display !== 'none' \
                 && el.getClientRects().length > 0;",
            )
            .await
        }

        async fn is_enabled(&self, element: &ElementId) -> E2eResult<bool> {
            self.eval_on(element, "return !el.disabled;").await
        }

        async fn is_selected(&self, element: &ElementId) -> E2eResult<bool> {
            self.eval_on(element, "return !!(el.checked || el.selected);").await
        }

        async fn is_stale(&self, element: &ElementId) -> E2eResult<bool> {
            let body = format!("return R.lookup({}) === null;", js_string(element.as_str()));
            self.eval(&body).await
        }

        async fn hover(&self, element: &ElementId) -> E2eResult<()> {
            let handle = self.handle(element).await?;
            handle
                .hover()
                .await
                .map_err(|e| element_error(element, e.to_string()))?;
            Ok(())
        }

        async fn drag_and_drop(&self, source: &ElementId, target: &ElementId) -> E2eResult<()> {
            let body = format!(
                "const target = R.get({}); const data = new DataTransfer(); \
                 const fire = (node, type) => node.dispatchEvent(new DragEvent(type, \
                   {{ bubbles: true, cancelable: true, dataTransfer: data }})); \
                 fire(el, 'dragstart'); fire(target, 'dragenter'); fire(target, 'dragover'); \
                 fire(target, 'drop'); fire(el, 'dragend'); return null;",
                js_string(target.as_str())
            );
            self.eval_on(source, &body).await
        }

        async fn close(&self) -> E2eResult<()> {
            let mut browser = self.browser.lock().await;
            browser.close().await.map_err(launch_error)?;
            self.handler.abort();
            info!("chromium closed");
            Ok(())
        }
    }
}

#[cfg(feature = "browser")]
pub use chromium::ChromiumDriver;
