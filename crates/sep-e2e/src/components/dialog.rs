//! Bootstrap modal dialogs.

use crate::driver::{Element, Session};
use crate::locator::Selector;
use crate::page_object::{impl_page_object, PageObject, PageRegion};
use crate::result::E2eResult;
use crate::wait::{Condition, Waiter};

/// Selector of the modal wrapper
pub const DIALOG: &str = ".modal-dialog";

/// Modal dialog with header, body and footer buttons
#[derive(Debug, Clone)]
pub struct Dialog {
    region: PageRegion,
}

impl_page_object!(Dialog, "Dialog", |page| {
    let _ = page.region.visible_child(".modal-body").await?;
    Ok(())
});

impl Dialog {
    /// Wait for the first modal in the document
    pub async fn wait_for(session: &Session) -> E2eResult<Self> {
        Self::locate(session, Selector::css(DIALOG)).await
    }

    /// Header title
    pub async fn title(&self) -> E2eResult<String> {
        self.region.find(".modal-title").await?.text().await
    }

    /// Body text
    pub async fn body_text(&self) -> E2eResult<String> {
        self.region.find(".modal-body").await?.text().await
    }

    /// Footer button by its `seip-btn-<name>` class
    pub async fn button(&self, name: &str) -> E2eResult<Element> {
        self.region.find(format!(".seip-btn-{name}")).await
    }

    /// The OK button
    pub async fn ok_button(&self) -> E2eResult<Element> {
        self.button("ok").await
    }

    /// Press OK and wait for the dialog to close
    pub async fn ok(&self) -> E2eResult<()> {
        let button = self.ok_button().await?;
        let _ = self.region.wait_for(Condition::clickable(&button)).await?;
        button.click().await?;
        self.wait_until_closed().await
    }

    /// Press Cancel and wait for the dialog to close
    pub async fn cancel(&self) -> E2eResult<()> {
        self.button("cancel").await?.click().await?;
        self.wait_until_closed().await
    }

    /// Close through the header `×`
    pub async fn close(&self) -> E2eResult<()> {
        self.region.find(".close").await?.click().await?;
        self.wait_until_closed().await
    }

    /// Whether the dialog is still shown
    pub async fn is_open(&self) -> E2eResult<bool> {
        Ok(self.element().is_present().await? && self.element().is_displayed().await?)
    }

    /// Wait until the dialog is removed from the document
    pub async fn wait_until_closed(&self) -> E2eResult<()> {
        let _ = self.region.wait_for(Condition::stale(self.element())).await?;
        Ok(())
    }
}

/// Yes/No confirmation modal
#[derive(Debug, Clone)]
pub struct ConfirmationPopup {
    region: PageRegion,
}

impl_page_object!(ConfirmationPopup, "ConfirmationPopup", |page| {
    let _ = page.region.visible_child(".seip-btn-yes").await?;
    Ok(())
});

impl ConfirmationPopup {
    /// Wait for the confirmation modal
    pub async fn wait_for(session: &Session) -> E2eResult<Self> {
        Self::locate(session, Selector::css(".modal-dialog.confirmation")).await
    }

    /// Confirmation message
    pub async fn message(&self) -> E2eResult<String> {
        self.region.find(".modal-body").await?.text().await
    }

    /// Answer yes
    pub async fn confirm(&self) -> E2eResult<()> {
        self.region.find(".seip-btn-yes").await?.click().await?;
        self.wait_until_closed().await
    }

    /// Answer no
    pub async fn cancel(&self) -> E2eResult<()> {
        self.region.find(".seip-btn-no").await?.click().await?;
        self.wait_until_closed().await
    }

    async fn wait_until_closed(&self) -> E2eResult<()> {
        let _ = Waiter::new(self.region.session())
            .until(Condition::stale(self.element()))
            .await?;
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

    async fn open() -> (MockDriver, Session) {
        let driver = MockDriver::with_sandbox_apps();
        let session = Session::new(driver.clone())
            .with_wait_options(WaitOptions::new().with_timeout(200).with_poll_interval(5));
        let mut page = SandboxPage::new(session.clone(), "http://localhost:5000");
        let _ = page.open("/sandbox/components/dialog", None).await.unwrap();
        (driver, session)
    }

    mod dialog_tests {
        use super::*;

        #[tokio::test]
        async fn test_open_and_confirm() {
            let (driver, session) = open().await;
            session.find(".open-dialog").await.unwrap().click().await.unwrap();
            let dialog = Dialog::wait_for(&session).await.unwrap();
            assert_eq!(dialog.title().await.unwrap(), "Sandbox dialog");
            assert_eq!(dialog.body_text().await.unwrap(), "Dialog content");
            dialog.ok().await.unwrap();
            assert!(driver.events().contains(&"dialog:ok".to_string()));
            assert!(!session.is_present(DIALOG).await.unwrap());
        }

        #[tokio::test]
        async fn test_cancel_and_close() {
            let (driver, session) = open().await;
            session.find(".open-dialog").await.unwrap().click().await.unwrap();
            Dialog::wait_for(&session).await.unwrap().cancel().await.unwrap();
            session.find(".open-dialog").await.unwrap().click().await.unwrap();
            Dialog::wait_for(&session).await.unwrap().close().await.unwrap();
            assert_eq!(
                driver.events(),
                vec!["dialog:cancel".to_string(), "dialog:close".to_string()]
            );
        }
    }

    mod confirmation_tests {
        use super::*;

        #[tokio::test]
        async fn test_confirm_and_cancel() {
            let (driver, session) = open().await;
            session.find(".open-confirmation").await.unwrap().click().await.unwrap();
            let popup = ConfirmationPopup::wait_for(&session).await.unwrap();
            assert_eq!(popup.message().await.unwrap(), "Are you sure?");
            popup.cancel().await.unwrap();
            session.find(".open-confirmation").await.unwrap().click().await.unwrap();
            ConfirmationPopup::wait_for(&session)
                .await
                .unwrap()
                .confirm()
                .await
                .unwrap();
            assert_eq!(
                driver.events(),
                vec!["confirmation:no".to_string(), "confirmation:yes".to_string()]
            );
        }
    }
}
