//! Bootstrap dropdown menus (`.dropdown` with `.dropdown-toggle` and
//! `.dropdown-menu`). The wrapper carries `open` while the menu is shown.

use crate::locator::Selector;
use crate::page_object::{impl_page_object, PageRegion};
use crate::result::E2eResult;
use crate::wait::{Condition, Target};

/// Dropdown menu
#[derive(Debug, Clone)]
pub struct DropdownMenu {
    region: PageRegion,
}

impl_page_object!(DropdownMenu, "DropdownMenu", |page| {
    let _ = page.region.visible_child(".dropdown-toggle").await?;
    Ok(())
});

impl DropdownMenu {
    /// Whether the menu is shown
    pub async fn is_open(&self) -> E2eResult<bool> {
        self.region.has_class("open").await
    }

    /// Click the toggle and wait for the menu to follow
    pub async fn toggle(&self) -> E2eResult<()> {
        let was_open = self.is_open().await?;
        self.region.find(".dropdown-toggle").await?.click().await?;
        let menu = Target::within(self.region.element(), ".dropdown-menu");
        let condition = if was_open {
            Condition::invisible(menu)
        } else {
            Condition::visible(menu)
        };
        let _ = self.region.wait_for(condition).await?;
        Ok(())
    }

    /// Open the menu unless already open
    pub async fn open(&self) -> E2eResult<()> {
        if !self.is_open().await? {
            self.toggle().await?;
        }
        Ok(())
    }

    /// Close the menu if open
    pub async fn close(&self) -> E2eResult<()> {
        if self.is_open().await? {
            self.toggle().await?;
        }
        Ok(())
    }

    /// Labels of the menu items
    pub async fn items(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for item in self.region.find_all(".dropdown-menu li a").await? {
            out.push(item.attribute("textContent").await?.unwrap_or_default().trim().to_string());
        }
        Ok(out)
    }

    /// Open the menu and click the item labelled `name`
    pub async fn click_item(&self, name: &str) -> E2eResult<()> {
        self.open().await?;
        self.region
            .find(Selector::css_with_text(".dropdown-menu li a", name))
            .await?
            .click()
            .await
    }
}
