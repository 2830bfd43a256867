//! Bootstrap collapsible panels.
//!
//! The wrapper is the collapsing element (`.collapse`); it is expanded while
//! it carries the `in` class. Its trigger lives elsewhere in the document and
//! points at it through `data-target="#<id>"`.

use crate::driver::Element;
use crate::locator::Selector;
use crate::page_object::{impl_page_object, PageObject, PageRegion};
use crate::result::{E2eError, E2eResult};

/// Collapsible section
#[derive(Debug, Clone)]
pub struct Collapsible {
    region: PageRegion,
}

impl_page_object!(Collapsible, "Collapsible", |page| page
    .region
    .wait_until_present()
    .await);

impl Collapsible {
    /// `id` of the collapsing element
    pub async fn id(&self) -> E2eResult<String> {
        self.element()
            .attribute("id")
            .await?
            .ok_or_else(|| E2eError::assertion("collapsible element has no id"))
    }

    /// The element toggling this section
    pub async fn trigger(&self) -> E2eResult<Element> {
        let id = self.id().await?;
        self.region
            .session()
            .find(Selector::css(format!(
                "[data-toggle=\"collapse\"][data-target=\"#{id}\"]"
            )))
            .await
    }

    /// Whether the section is collapsed
    pub async fn is_collapsed(&self) -> E2eResult<bool> {
        Ok(!self.region.has_class("in").await?)
    }

    /// Whether the section is expanded
    pub async fn is_expanded(&self) -> E2eResult<bool> {
        self.region.has_class("in").await
    }

    /// Click the trigger and wait until the state flips
    pub async fn toggle(&self) -> E2eResult<()> {
        let was_collapsed = self.is_collapsed().await?;
        self.trigger().await?.click().await?;
        let _ = self
            .region
            .waiter()
            .until_fn("collapsible state to flip", || async move {
                Ok(self.is_collapsed().await? != was_collapsed)
            })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::Session;
    use crate::mock::MockDriver;
    use crate::sandbox::SandboxPage;
    use crate::wait::WaitOptions;

    async fn open() -> Session {
        let session = Session::new(MockDriver::with_sandbox_apps())
            .with_wait_options(WaitOptions::new().with_timeout(200).with_poll_interval(5));
        let mut page = SandboxPage::new(session.clone(), "http://localhost:5000");
        let _ = page
            .open("/sandbox/components/collapsible", None)
            .await
            .unwrap();
        session
    }

    mod collapsible_tests {
        use super::*;

        #[tokio::test]
        async fn test_initial_state() {
            let session = open().await;
            let first = Collapsible::locate(&session, Selector::id("first-section-collapse"))
                .await
                .unwrap();
            assert!(first.is_collapsed().await.unwrap());
            assert_eq!(first.id().await.unwrap(), "first-section-collapse");
        }

        #[tokio::test]
        async fn test_toggle_flips_state() {
            let session = open().await;
            let second = Collapsible::locate(&session, Selector::id("second-section-collapse"))
                .await
                .unwrap();
            assert!(second.is_expanded().await.unwrap());
            second.toggle().await.unwrap();
            assert!(second.is_collapsed().await.unwrap());
        }
    }
}
