//! Model import panel of the administration sandbox.

use crate::components::Dialog;
use crate::driver::Session;
use crate::locator::Selector;
use crate::page_object::{impl_page_object, PageObject, PageRegion};
use crate::result::E2eResult;
use crate::sandbox::{OpenMode, SandboxHash, SandboxPage};
use crate::wait::Condition;
use tracing::info;

/// Route of the model import sandbox
pub const MODEL_IMPORT_URL: &str = "/sandbox/administration/model-import";

/// Outcome the sandbox simulates for the next import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    /// The import request fails
    pub fail: bool,
    /// The failure response carries error messages
    pub has_errors: bool,
}

impl ImportOutcome {
    /// Successful import
    #[must_use]
    pub const fn success() -> Self {
        Self {
            fail: false,
            has_errors: false,
        }
    }

    /// Failed import, with or without error messages
    #[must_use]
    pub const fn failure(has_errors: bool) -> Self {
        Self {
            fail: true,
            has_errors,
        }
    }

    /// Sandbox hash encoding the outcome
    #[must_use]
    pub fn hash(self) -> SandboxHash {
        SandboxHash::new()
            .param("fail", self.fail)
            .param("hasErrors", self.has_errors)
    }
}

/// Sandbox wrapper of the model import page
///
/// Borrows the caller's [`SandboxPage`] so repeated opens with a new
/// outcome restart the loaded route instead of navigating again.
#[derive(Debug)]
pub struct ModelImportSandbox<'a> {
    sandbox: &'a mut SandboxPage,
}

impl<'a> ModelImportSandbox<'a> {
    /// Wrap a sandbox navigation helper
    #[must_use]
    pub fn new(sandbox: &'a mut SandboxPage) -> Self {
        Self { sandbox }
    }

    /// Open the sandbox simulating `outcome` and wait for the panel
    pub async fn open(&mut self, outcome: ImportOutcome) -> E2eResult<ModelImportPanel> {
        self.open_with_mode(outcome).await.map(|(panel, _)| panel)
    }

    /// Like [`open`](Self::open), also reporting how the route was loaded
    pub async fn open_with_mode(
        &mut self,
        outcome: ImportOutcome,
    ) -> E2eResult<(ModelImportPanel, OpenMode)> {
        info!(fail = outcome.fail, has_errors = outcome.has_errors, "open model import");
        let hash = outcome.hash().to_string();
        let mode = self.sandbox.open(MODEL_IMPORT_URL, Some(&hash)).await?;
        let panel =
            ModelImportPanel::locate(self.sandbox.session(), Selector::css(".model-import")).await?;
        Ok((panel, mode))
    }
}

/// File selection and import button
#[derive(Debug, Clone)]
pub struct ModelImportPanel {
    region: PageRegion,
}

impl_page_object!(ModelImportPanel, "ModelImportPanel", |page| {
    let _ = page.region.present_child(".file-input").await?;
    let _ = page.region.visible_child(".import-btn").await?;
    Ok(())
});

impl ModelImportPanel {
    /// Select files to import by path
    pub async fn select_files(&self, paths: &[&str]) -> E2eResult<()> {
        let input = self.region.find(".file-input").await?;
        input.send_keys(&paths.join("\n")).await?;
        let _ = self
            .region
            .wait_for(Condition::present(".selected-files .selected-file"))
            .await?;
        Ok(())
    }

    /// Names of the selected files
    pub async fn selected_files(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for file in self.region.find_all(".selected-file").await? {
            out.push(file.text().await?);
        }
        Ok(out)
    }

    /// Whether the import button can be pressed
    pub async fn is_import_enabled(&self) -> E2eResult<bool> {
        self.region.find(".import-btn").await?.is_enabled().await
    }

    /// Press the import button
    pub async fn import(&self) -> E2eResult<()> {
        let button = self.region.find(".import-btn").await?;
        let _ = self.region.wait_for(Condition::clickable(&button)).await?;
        button.click().await
    }

    /// Press the import button and wait for the result dialog
    pub async fn import_expecting_dialog(&self) -> E2eResult<Dialog> {
        self.import().await?;
        Dialog::locate(self.region.session(), Selector::css(".modal-dialog.import-result")).await
    }

    /// Session of the panel
    #[must_use]
    pub fn session(&self) -> &Session {
        self.region.session()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::components::Notification;
    use crate::mock::MockDriver;
    use crate::wait::WaitOptions;

    fn page() -> (MockDriver, SandboxPage) {
        let driver = MockDriver::with_sandbox_apps();
        let session = Session::new(driver.clone())
            .with_wait_options(WaitOptions::new().with_timeout(200).with_poll_interval(5));
        (driver, SandboxPage::new(session, "http://localhost:5000"))
    }

    mod outcome_tests {
        use super::*;

        #[test]
        fn test_hash() {
            assert_eq!(
                ImportOutcome::failure(true).hash().to_string(),
                "?fail=true&hasErrors=true"
            );
            assert_eq!(
                ImportOutcome::success().hash().to_string(),
                "?fail=false&hasErrors=false"
            );
        }
    }

    mod import_tests {
        use super::*;

        #[tokio::test]
        async fn test_file_selection_enables_import() {
            let (_, mut page) = page();
            let panel = ModelImportSandbox::new(&mut page)
                .open(ImportOutcome::success())
                .await
                .unwrap();
            assert!(!panel.is_import_enabled().await.unwrap());
            panel
                .select_files(&["/models/a.xml", "C:\\models\\b.bpmn"])
                .await
                .unwrap();
            assert_eq!(panel.selected_files().await.unwrap(), vec!["a.xml", "b.bpmn"]);
            assert!(panel.is_import_enabled().await.unwrap());
        }

        #[tokio::test]
        async fn test_successful_import_shows_toast() {
            let (driver, mut page) = page();
            let panel = ModelImportSandbox::new(&mut page)
                .open(ImportOutcome::success())
                .await
                .unwrap();
            panel.select_files(&["a.xml"]).await.unwrap();
            panel.import().await.unwrap();
            let toast = Notification::wait_for(panel.session()).await.unwrap();
            assert!(toast.is_success().await.unwrap());
            assert_eq!(toast.message().await.unwrap(), "Models imported successfully");
            assert_eq!(driver.events(), vec!["import:a.xml"]);
        }

        #[tokio::test]
        async fn test_failed_import_dialog_body() {
            let (driver, mut page) = page();
            let mut sandbox = ModelImportSandbox::new(&mut page);
            let (panel, mode) = sandbox.open_with_mode(ImportOutcome::failure(true)).await.unwrap();
            assert_eq!(mode, OpenMode::Navigated);
            panel.select_files(&["a.xml"]).await.unwrap();
            let dialog = panel.import_expecting_dialog().await.unwrap();
            assert!(dialog.body_text().await.unwrap().contains("Something went wrong"));
            dialog.ok().await.unwrap();

            let (panel, mode) = sandbox.open_with_mode(ImportOutcome::failure(false)).await.unwrap();
            assert_eq!(mode, OpenMode::Restarted);
            panel.select_files(&["a.xml"]).await.unwrap();
            let dialog = panel.import_expecting_dialog().await.unwrap();
            assert_eq!(dialog.body_text().await.unwrap(), "");
            assert_eq!(driver.navigations().len(), 1);
            assert_eq!(page.last_hash(), Some("?fail=true&hasErrors=false"));
        }
    }
}
