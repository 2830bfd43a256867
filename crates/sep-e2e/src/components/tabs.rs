//! Bootstrap tab strip (`ul.nav-tabs > li > a`).

use crate::page_object::{impl_page_object, PageRegion};
use crate::result::{E2eError, E2eResult};

/// Tab strip; indexes are 0-based
#[derive(Debug, Clone)]
pub struct Tabs {
    region: PageRegion,
}

impl_page_object!(Tabs, "Tabs", |page| {
    let _ = page.region.visible_child("li").await?;
    Ok(())
});

impl Tabs {
    /// Number of tabs
    pub async fn count(&self) -> E2eResult<usize> {
        Ok(self.region.find_all("li").await?.len())
    }

    /// Tab captions
    pub async fn titles(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for tab in self.region.find_all("li > a").await? {
            out.push(tab.text().await?);
        }
        Ok(out)
    }

    /// Index of the active tab
    pub async fn active_index(&self) -> E2eResult<Option<usize>> {
        for (index, tab) in self.region.find_all("li").await?.iter().enumerate() {
            if tab.has_class("active").await? {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Activate the tab at `index`
    pub async fn select(&self, index: usize) -> E2eResult<()> {
        let tabs = self.region.find_all("li").await?;
        let tab = tabs.get(index).ok_or_else(|| E2eError::NoSuchElement {
            selector: format!("tab #{index}"),
        })?;
        tab.find("a").await?.click().await?;
        let _ = self
            .region
            .waiter()
            .until_fn("tab to become active", || async move {
                Ok(self.active_index().await? == Some(index))
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
    use crate::locator::Selector;
    use crate::mock::MockDriver;
    use crate::page_object::PageObject;
    use crate::sandbox::SandboxPage;
    use crate::wait::WaitOptions;

    mod tabs_tests {
        use super::*;

        #[tokio::test]
        async fn test_select_tab() {
            let session = Session::new(MockDriver::with_sandbox_apps())
                .with_wait_options(WaitOptions::new().with_timeout(200).with_poll_interval(5));
            let mut page = SandboxPage::new(session.clone(), "http://localhost:5000");
            let _ = page.open("/sandbox/components/dialog", None).await.unwrap();
            let tabs = Tabs::locate(&session, Selector::css(".nav-tabs")).await.unwrap();
            assert_eq!(tabs.count().await.unwrap(), 3);
            assert_eq!(tabs.active_index().await.unwrap(), Some(0));
            tabs.select(2).await.unwrap();
            assert_eq!(tabs.active_index().await.unwrap(), Some(2));
            assert_eq!(tabs.titles().await.unwrap()[2], "History");
            assert!(tabs.select(7).await.is_err());
        }
    }
}
