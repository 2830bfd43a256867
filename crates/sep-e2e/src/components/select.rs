//! select2-based menus.
//!
//! The native `<select class="seip-select">` keeps the model value while
//! select2 renders the visible selection. The dropdown with the options is
//! appended to the document body, so option lookups are document-wide.

use super::form_control::FormField;
use crate::driver::{Element, Keys};
use crate::locator::Selector;
use crate::page_object::{impl_page_object, PageObject, PageRegion};
use crate::result::E2eResult;
use crate::wait::Condition;

const RESULTS: &str = ".select2-results__options";
const LOADING: &str = ".select2-results__option.loading-results";

async fn wait_until_menu_opened(region: &PageRegion) -> E2eResult<()> {
    let _ = region.wait_for(Condition::visible(RESULTS)).await?;
    let _ = region.wait_for(Condition::stale(LOADING)).await?;
    Ok(())
}

async fn wait_until_menu_closed(region: &PageRegion) -> E2eResult<()> {
    let _ = region.wait_for(Condition::invisible(RESULTS)).await?;
    Ok(())
}

async fn option_by_name(region: &PageRegion, name: &str) -> E2eResult<Element> {
    region
        .session()
        .find(Selector::css_with_text(format!("{RESULTS} li"), name))
        .await
}

async fn texts(elements: Vec<Element>) -> E2eResult<Vec<String>> {
    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        out.push(element.text().await?);
    }
    Ok(out)
}

async fn values(elements: Vec<Element>) -> E2eResult<Vec<String>> {
    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        out.push(element.value().await?);
    }
    Ok(out)
}

async fn wait_for_rendered_selection(region: &PageRegion) -> E2eResult<()> {
    let _ = region.visible_child(".select2-selection__rendered").await?;
    Ok(())
}

// =============================================================================
// SINGLE SELECT
// =============================================================================

/// Single select menu
#[derive(Debug, Clone)]
pub struct SingleSelectMenu {
    region: PageRegion,
}

impl_page_object!(SingleSelectMenu, "SingleSelectMenu", |page| {
    wait_for_rendered_selection(&page.region).await
});

impl FormField for SingleSelectMenu {}

impl SingleSelectMenu {
    /// Open the dropdown through the arrow
    pub async fn open(&self) -> E2eResult<()> {
        self.region
            .present_child(".select2-selection__arrow")
            .await?
            .click()
            .await?;
        wait_until_menu_opened(&self.region).await
    }

    /// Select the option at a 1-based position
    pub async fn select_by_index(&self, index: usize) -> E2eResult<()> {
        self.open().await?;
        self.region
            .session()
            .find(format!("{RESULTS} li:nth-child({index})"))
            .await?
            .click()
            .await
    }

    /// Select the option with the given value
    pub async fn select_by_value(&self, value: &str) -> E2eResult<()> {
        self.open().await?;
        self.region
            .session()
            .find(format!("{RESULTS} li > span[data-value=\"{value}\"]"))
            .await?
            .click()
            .await
    }

    /// Select the option whose label contains `name`
    pub async fn select_option(&self, name: &str) -> E2eResult<()> {
        self.open().await?;
        let option = option_by_name(&self.region, name).await?;
        let _ = self.region.wait_for(Condition::clickable(&option)).await?;
        option.click().await
    }

    /// Value of the selected native option
    pub async fn selected_value(&self) -> E2eResult<Option<String>> {
        match self.region.find_optional(".seip-select option:checked").await? {
            Some(option) => option.attribute("value").await,
            None => Ok(None),
        }
    }

    /// Label of the selected native option
    pub async fn selected_label(&self) -> E2eResult<Option<String>> {
        match self.region.find_optional(".seip-select option:checked").await? {
            Some(option) => Ok(option
                .attribute("textContent")
                .await?
                .map(|label| label.trim().to_string())),
            None => Ok(None),
        }
    }

    /// Text rendered in the selection box
    pub async fn rendered_text(&self) -> E2eResult<String> {
        self.region
            .find(".select2-selection__rendered")
            .await?
            .text()
            .await
    }

    /// Clear the selection with the `×` button
    pub async fn clear(&self) -> E2eResult<()> {
        self.region
            .find(".select2-selection__clear")
            .await?
            .click()
            .await
    }

    /// Values of the native options
    pub async fn menu_values(&self) -> E2eResult<Vec<String>> {
        values(self.region.find_all(".seip-select option").await?).await
    }

    /// Labels of the options in the open dropdown
    pub async fn menu_elements(&self) -> E2eResult<Vec<String>> {
        texts(self.region.session().find_all(format!("{RESULTS} li")).await?).await
    }

    /// Placeholder text
    pub async fn placeholder(&self) -> E2eResult<String> {
        self.region
            .find(".select2-selection__placeholder")
            .await?
            .text()
            .await
    }

    /// Whether the native select is disabled
    pub async fn is_disabled(&self) -> E2eResult<bool> {
        Ok(self
            .region
            .find("select")
            .await?
            .attribute("disabled")
            .await?
            .is_some())
    }

    /// Whether the option labelled `name` in the open dropdown is disabled
    pub async fn is_option_disabled(&self, name: &str) -> E2eResult<bool> {
        Ok(option_by_name(&self.region, name)
            .await?
            .attribute("aria-disabled")
            .await?
            .is_some_and(|v| v == "true"))
    }

    /// Type into the dropdown search field
    pub async fn filter(&self, value: &str) -> E2eResult<()> {
        self.region
            .session()
            .find(".select2-search--dropdown .select2-search__field")
            .await?
            .send_keys(value)
            .await
    }

    /// Close the dropdown when it is open
    pub async fn close_menu(&self) -> E2eResult<()> {
        if self.region.session().is_present(".select2-results__option").await? {
            self.region.find(".select2-selection").await?.click().await?;
            wait_until_menu_closed(&self.region).await?;
        }
        Ok(())
    }
}

// =============================================================================
// MULTI SELECT
// =============================================================================

/// Multi select menu with removable choices
#[derive(Debug, Clone)]
pub struct MultiSelectMenu {
    region: PageRegion,
}

impl_page_object!(MultiSelectMenu, "MultiSelectMenu", |page| {
    wait_for_rendered_selection(&page.region).await
});

impl FormField for MultiSelectMenu {}

impl MultiSelectMenu {
    /// Open the dropdown through the inline search field or the selection
    pub async fn open(&self) -> E2eResult<()> {
        match self.region.find_optional(".select2-search__field").await? {
            Some(field) => field.click().await?,
            None => self.region.find(".select2-selection").await?.click().await?,
        }
        wait_until_menu_opened(&self.region).await
    }

    /// Select the option at a 1-based position
    pub async fn select_by_index(&self, index: usize) -> E2eResult<()> {
        self.open().await?;
        self.region
            .session()
            .find(format!("{RESULTS} li:nth-child({index})"))
            .await?
            .click()
            .await
    }

    /// Select the option with the given value
    pub async fn select_by_value(&self, value: &str) -> E2eResult<()> {
        self.open().await?;
        self.region
            .session()
            .find(format!(".select2-results__option span[data-value='{value}']"))
            .await?
            .click()
            .await
    }

    /// Remove the choice at a 1-based position
    pub async fn remove_by_index(&self, index: usize) -> E2eResult<()> {
        self.region
            .find(format!(
                ".select2-selection__choice:nth-child({index}) .select2-selection__choice__remove"
            ))
            .await?
            .click()
            .await
    }

    /// Remove the choice carrying the `title`
    pub async fn remove_by_title(&self, title: &str) -> E2eResult<()> {
        self.region
            .find(format!(
                ".select2-selection__choice[title=\"{title}\"] .select2-selection__choice__remove"
            ))
            .await?
            .click()
            .await
    }

    /// Values of the selected native options, in option order
    pub async fn selected_values(&self) -> E2eResult<Vec<String>> {
        values(self.region.find_all("select option:checked").await?).await
    }

    /// Titles of the rendered choices
    pub async fn selected_titles(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for choice in self.region.find_all(".select2-selection__choice").await? {
            out.push(choice.attribute("title").await?.unwrap_or_default());
        }
        Ok(out)
    }

    /// Values offered by the dropdown
    pub async fn available_choices(&self) -> E2eResult<Vec<String>> {
        self.open().await?;
        let mut out = Vec::new();
        for choice in self.region.session().find_all(".select2-results li > span").await? {
            out.push(choice.attribute("data-value").await?.unwrap_or_default());
        }
        Ok(out)
    }

    /// Close the dropdown when it is open
    pub async fn close_menu(&self) -> E2eResult<()> {
        if self.region.session().is_present(".select2-results__option").await? {
            self.region.find(".select2-selection").await?.click().await?;
            wait_until_menu_closed(&self.region).await?;
        }
        Ok(())
    }
}

// =============================================================================
// TAG AND TREE SELECT
// =============================================================================

/// Free-text tag input rendered by select2
#[derive(Debug, Clone)]
pub struct TagSelectMenu {
    region: PageRegion,
}

impl_page_object!(TagSelectMenu, "TagSelectMenu", |page| {
    wait_for_rendered_selection(&page.region).await
});

impl FormField for TagSelectMenu {}

impl TagSelectMenu {
    /// Type a tag and confirm it with Enter
    pub async fn enter_value(&self, value: &str) -> E2eResult<()> {
        self.region
            .find("input")
            .await?
            .send_keys(&format!("{value}{}", Keys::ENTER))
            .await
    }

    /// Titles of the entered tags
    pub async fn selected_titles(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for choice in self
            .region
            .find_all(".select2-selection .select2-selection__choice")
            .await?
        {
            out.push(choice.attribute("title").await?.unwrap_or_default());
        }
        Ok(out)
    }

    /// Whether the rendered selection is displayed
    pub async fn is_displayed(&self) -> E2eResult<bool> {
        self.region
            .find(".select2-selection__rendered")
            .await?
            .is_displayed()
            .await
    }
}

/// Hierarchical multi select
#[derive(Debug, Clone)]
pub struct TreeSelectMenu {
    region: PageRegion,
}

impl_page_object!(TreeSelectMenu, "TreeSelectMenu", |page| {
    wait_for_rendered_selection(&page.region).await
});

impl FormField for TreeSelectMenu {}

impl TreeSelectMenu {
    /// Open the dropdown
    pub async fn open(&self) -> E2eResult<()> {
        if !self.region.session().is_present(RESULTS).await? {
            self.region.find(".select2-selection").await?.click().await?;
        }
        wait_until_menu_opened(&self.region).await
    }

    /// Expand the node labelled `name`
    pub async fn expand_node(&self, name: &str) -> E2eResult<()> {
        let option = option_by_name(&self.region, name).await?;
        option.find(".tree-toggle").await?.click().await
    }

    /// Expand every ancestor on `path` and select its last label
    pub async fn select_path(&self, path: &[&str]) -> E2eResult<()> {
        let Some((leaf, parents)) = path.split_last() else {
            return Ok(());
        };
        self.open().await?;
        for parent in parents {
            self.expand_node(parent).await?;
        }
        let option = self
            .region
            .session()
            .find(Selector::css_with_text(format!("{RESULTS} li > span"), *leaf))
            .await?;
        let _ = self.region.wait_for(Condition::visible(&option)).await?;
        option.click().await
    }

    /// Labels of the visible options
    pub async fn visible_options(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for option in self
            .region
            .session()
            .find_all(format!("{RESULTS} li > span"))
            .await?
        {
            if option.is_displayed().await? {
                out.push(option.text().await?);
            }
        }
        Ok(out)
    }

    /// Values of the selected native options
    pub async fn selected_values(&self) -> E2eResult<Vec<String>> {
        values(self.region.find_all("select option:checked").await?).await
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
            .open("/sandbox/form-builder/all-controls", None)
            .await
            .unwrap();
        session
    }

    mod single_select_tests {
        use super::*;

        #[tokio::test]
        async fn test_select_by_index_and_value() {
            let session = open().await;
            let menu = SingleSelectMenu::locate(&session, Selector::css("#singleSelectEdit"))
                .await
                .unwrap();
            assert_eq!(menu.selected_value().await.unwrap(), None);
            menu.select_by_index(2).await.unwrap();
            assert_eq!(menu.selected_value().await.unwrap().as_deref(), Some("CH210001"));
            assert_eq!(menu.rendered_text().await.unwrap(), "Chapter");
            menu.select_by_value("OT210027").await.unwrap();
            assert_eq!(menu.selected_label().await.unwrap().as_deref(), Some("Other"));
            menu.clear().await.unwrap();
            assert_eq!(menu.selected_value().await.unwrap(), None);
        }

        #[tokio::test]
        async fn test_menu_contents() {
            let session = open().await;
            let menu = SingleSelectMenu::locate(&session, Selector::css("#singleSelectEdit"))
                .await
                .unwrap();
            assert_eq!(menu.menu_values().await.unwrap().len(), 4);
            assert_eq!(menu.placeholder().await.unwrap(), "Select value");
            menu.open().await.unwrap();
            assert_eq!(menu.menu_elements().await.unwrap()[1], "Chapter");
            assert!(menu.is_option_disabled("Archived").await.unwrap());
            menu.close_menu().await.unwrap();
            assert!(!session.is_present(RESULTS).await.unwrap());
        }
    }

    mod multi_select_tests {
        use super::*;

        #[tokio::test]
        async fn test_select_and_remove() {
            let session = open().await;
            let menu = MultiSelectMenu::locate(&session, Selector::css("#multiSelectEdit"))
                .await
                .unwrap();
            menu.select_by_value("CH210001").await.unwrap();
            menu.select_by_index(1).await.unwrap();
            assert_eq!(
                menu.selected_values().await.unwrap(),
                vec!["DT210099".to_string(), "CH210001".to_string()]
            );
            menu.remove_by_title("Chapter").await.unwrap();
            assert_eq!(menu.selected_values().await.unwrap(), vec!["DT210099".to_string()]);
            menu.remove_by_index(1).await.unwrap();
            assert!(menu.selected_values().await.unwrap().is_empty());
        }
    }

    mod tag_and_tree_tests {
        use super::*;

        #[tokio::test]
        async fn test_tag_enter_value() {
            let session = open().await;
            let tags = TagSelectMenu::locate(&session, Selector::css("#tagSelectEdit"))
                .await
                .unwrap();
            tags.enter_value("alpha").await.unwrap();
            tags.enter_value("beta").await.unwrap();
            assert_eq!(
                tags.selected_titles().await.unwrap(),
                vec!["alpha".to_string(), "beta".to_string()]
            );
            assert!(tags.is_displayed().await.unwrap());
        }

        #[tokio::test]
        async fn test_tree_select_path() {
            let session = open().await;
            let tree = TreeSelectMenu::locate(&session, Selector::css("#treeSelectEdit"))
                .await
                .unwrap();
            tree.open().await.unwrap();
            assert!(!tree.visible_options().await.unwrap().contains(&"Invoice".to_string()));
            tree.select_path(&["Documents", "Invoice"]).await.unwrap();
            assert_eq!(tree.selected_values().await.unwrap(), vec!["invoice".to_string()]);
        }
    }
}
