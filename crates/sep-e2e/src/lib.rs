//! sep-e2e: page objects and sandbox scenarios for the SEP web UI
//!
//! Page objects wrap one DOM element each and expose the component's
//! semantics (toggle, select, open, confirm) instead of raw selectors. Every
//! page object waits for its own readiness before it is handed out, so a
//! scenario reads as a sequence of user actions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   ┌────────────┐    ┌────────────┐    ┌────────────────────┐    │
//! │   │ Scenario   │    │ Page       │    │ WebDriver          │    │
//! │   │ (harness)  │───►│ objects    │───►│  ChromiumDriver    │    │
//! │   │            │    │ + waits    │    │  MockDriver        │    │
//! │   └────────────┘    └────────────┘    └────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sep_e2e::{Collapsible, MockDriver, PageObject, SandboxPage, Selector, Session};
//!
//! # async fn demo() -> sep_e2e::E2eResult<()> {
//! let session = Session::new(MockDriver::with_sandbox_apps());
//! let mut page = SandboxPage::new(session.clone(), "http://localhost:5000");
//! page.open("/sandbox/components/collapsible", None).await?;
//! let first = Collapsible::locate(&session, Selector::id("first-section-collapse")).await?;
//! first.toggle().await?;
//! assert!(first.is_expanded().await?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod assertion;
/// Chromium over CDP and browser launch settings
pub mod cdp;
/// Leaf page objects for SEP UI components
pub mod components;
/// Run configuration (YAML + environment)
pub mod config;
mod driver;
mod harness;
mod locator;
/// Tracing subscriber setup
pub mod logging;
/// In-memory driver serving mock sandbox applications
pub mod mock;
mod page_object;
mod result;
mod sandbox;
/// The sandbox scenario suite
pub mod scenarios;
mod wait;
/// Composite page objects (idoc, search, datatable, comments, ...)
pub mod widgets;

pub use assertion::Assertion;
pub use cdp::BrowserConfig;
#[cfg(feature = "browser")]
pub use cdp::ChromiumDriver;
pub use components::{
    Button, CheckboxField, CodelistList, Collapsible, ConfirmationPopup, DatetimeField, Dialog,
    DropdownMenu, FormControl, FormField, InputField, MultiSelectMenu, Notification, Pagination,
    RadioButtonGroup, Region, SingleSelectMenu, Tabs, TagSelectMenu, TreeSelectMenu,
};
pub use config::E2eConfig;
pub use driver::{Element, ElementId, Keys, ScriptArg, Session, WebDriver};
pub use harness::{
    Scenario, ScenarioOutcome, ScenarioRunner, ScenarioStatus, ScenarioSuite, SuiteReport,
};
pub use locator::Selector;
pub use logging::{init_tracing, LogFormat};
pub use mock::{MockDriver, SandboxLocation};
pub use page_object::{DynamicPageObject, PageObject, PageObjectBuilder, PageRegion, Readiness};
pub use result::{E2eError, E2eResult};
pub use sandbox::{OpenMode, SandboxHash, SandboxPage, RESTART_SCRIPT};
pub use scenarios::sandbox_suite;
pub use wait::{
    Condition, Target, WaitOptions, WaitResult, Waiter, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};
