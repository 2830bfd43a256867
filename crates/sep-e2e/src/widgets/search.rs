//! Basic search: criteria, toolbar, results and pagination.

use crate::components::{press_enter, Pagination, SingleSelectMenu};
use crate::driver::Session;
use crate::locator::Selector;
use crate::page_object::{impl_page_object, PageObject, PageRegion};
use crate::result::E2eResult;
use crate::wait::Condition;
use tracing::info;

/// Route of the basic search sandbox
pub const BASIC_SEARCH_URL: &str = "/sandbox/search/basic-search";
/// Route of the standalone object type select sandbox
pub const OBJECT_TYPE_SELECT_URL: &str = "/sandbox/search/object-type-select";

/// Label of the catch-all object type
pub const ANY_OBJECT: &str = "Any Object";

/// Object type select (select2 with `#objectTypeSelect`)
#[derive(Debug, Clone)]
pub struct ObjectTypeSelect {
    menu: SingleSelectMenu,
}

impl ObjectTypeSelect {
    /// Wait for the object type select in the document
    pub async fn wait_for(session: &Session) -> E2eResult<Self> {
        let menu = SingleSelectMenu::locate(session, Selector::id("objectTypeSelect")).await?;
        Ok(Self { menu })
    }

    /// Underlying select menu
    #[must_use]
    pub const fn menu(&self) -> &SingleSelectMenu {
        &self.menu
    }

    /// Text rendered in the selection box
    pub async fn selected_type_text(&self) -> E2eResult<String> {
        self.menu.rendered_text().await
    }

    /// Option labels of the opened dropdown
    pub async fn type_options(&self) -> E2eResult<Vec<String>> {
        self.menu.open().await?;
        self.menu.menu_elements().await
    }

    /// Pick an object type by label
    pub async fn select_type(&self, label: &str) -> E2eResult<()> {
        self.menu.select_option(label).await
    }
}

/// Search form
#[derive(Debug, Clone)]
pub struct SearchForm {
    region: PageRegion,
}

impl_page_object!(SearchForm, "SearchForm", |page| {
    let _ = page.region.visible_child(".search-criteria").await?;
    let _ = page.region.visible_child(".search-results").await?;
    Ok(())
});

impl SearchForm {
    /// Wait for the first search form in the document
    pub async fn wait_for(session: &Session) -> E2eResult<Self> {
        Self::locate(session, Selector::css(".search")).await
    }

    /// Object type criteria
    pub async fn object_type(&self) -> E2eResult<ObjectTypeSelect> {
        ObjectTypeSelect::wait_for(self.region.session()).await
    }

    /// Type into the free text criteria, replacing its value
    pub async fn set_free_text(&self, text: &str) -> E2eResult<()> {
        let input = self.region.visible_child(".search-criteria .free-text").await?;
        input.clear().await?;
        input.send_keys(text).await?;
        let _ = self
            .region
            .wait_for(Condition::text_in_value(&input, text))
            .await?;
        Ok(())
    }

    /// Current free text criteria
    pub async fn free_text(&self) -> E2eResult<String> {
        self.region.find(".search-criteria .free-text").await?.value().await
    }

    /// Run the search through the toolbar button
    pub async fn search(&self) -> E2eResult<SearchResults> {
        info!("search");
        self.region
            .visible_child(".search-toolbar .seip-search")
            .await?
            .click()
            .await?;
        self.results().await
    }

    /// Run the search by pressing Enter in the free text field
    pub async fn search_by_enter(&self) -> E2eResult<SearchResults> {
        press_enter(&self.region.find(".search-criteria .free-text").await?).await?;
        self.results().await
    }

    /// Reset the criteria
    pub async fn clear(&self) -> E2eResult<()> {
        self.region
            .visible_child(".search-toolbar .seip-clear")
            .await?
            .click()
            .await
    }

    /// Results panel
    pub async fn results(&self) -> E2eResult<SearchResults> {
        SearchResults::locate_within(self.element(), Selector::css(".search-results")).await
    }
}

/// Search results panel
#[derive(Debug, Clone)]
pub struct SearchResults {
    region: PageRegion,
}

impl_page_object!(SearchResults, "SearchResults", |page| page
    .region
    .wait_until_visible()
    .await);

impl SearchResults {
    /// Total count text, e.g. `23 results`
    pub async fn count_text(&self) -> E2eResult<String> {
        self.region.find(".results-count").await?.text().await
    }

    /// Total number of results
    pub async fn total(&self) -> E2eResult<usize> {
        let text = self.count_text().await?;
        Ok(text
            .split_whitespace()
            .next()
            .and_then(|n| n.parse().ok())
            .unwrap_or_default())
    }

    /// Titles of the results on the current page
    pub async fn titles(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for link in self.region.find_all(".result-item .instance-link").await? {
            out.push(link.text().await?);
        }
        Ok(out)
    }

    /// Type labels of the results on the current page
    pub async fn types(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for label in self.region.find_all(".result-item .result-type").await? {
            out.push(label.text().await?);
        }
        Ok(out)
    }

    /// Pagination bar
    pub async fn pagination(&self) -> E2eResult<Pagination> {
        Pagination::locate_within(self.element(), Selector::css(".pagination")).await
    }
}
