//! Toast notifications.

use crate::driver::Session;
use crate::locator::Selector;
use crate::page_object::{impl_page_object, PageObject, PageRegion};
use crate::result::E2eResult;
use crate::wait::Condition;

/// Toast notification (`.toast`)
#[derive(Debug, Clone)]
pub struct Notification {
    region: PageRegion,
}

impl_page_object!(Notification, "Notification", |page| page
    .region
    .wait_until_visible()
    .await);

impl Notification {
    /// Wait for the first toast in the document
    pub async fn wait_for(session: &Session) -> E2eResult<Self> {
        Self::locate(session, Selector::css(".toast")).await
    }

    /// Message text
    pub async fn message(&self) -> E2eResult<String> {
        self.region.find(".toast-message").await?.text().await
    }

    /// Whether it reports success
    pub async fn is_success(&self) -> E2eResult<bool> {
        self.region.has_class("toast-success").await
    }

    /// Whether it reports an error
    pub async fn is_error(&self) -> E2eResult<bool> {
        self.region.has_class("toast-error").await
    }

    /// Dismiss the toast
    pub async fn close(&self) -> E2eResult<()> {
        self.region.find(".toast-close-button").await?.click().await?;
        let _ = self.region.wait_for(Condition::stale(self.element())).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::MockDriver;
    use crate::sandbox::SandboxPage;
    use crate::wait::WaitOptions;

    mod notification_tests {
        use super::*;

        #[tokio::test]
        async fn test_success_toast() {
            let session = Session::new(MockDriver::with_sandbox_apps())
                .with_wait_options(WaitOptions::new().with_timeout(200).with_poll_interval(5));
            let mut page = SandboxPage::new(session.clone(), "http://localhost:5000");
            let _ = page.open("/sandbox/components/dialog", None).await.unwrap();
            session.find(".notify-success").await.unwrap().click().await.unwrap();

            let toast = Notification::wait_for(&session).await.unwrap();
            assert_eq!(toast.message().await.unwrap(), "Saved");
            assert!(toast.is_success().await.unwrap());
            assert!(!toast.is_error().await.unwrap());
            toast.close().await.unwrap();
            assert!(!session.is_present(".toast").await.unwrap());
        }
    }
}
