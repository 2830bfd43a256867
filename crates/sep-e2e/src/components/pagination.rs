//! Pagination bar (`ul.pagination`).
//!
//! Page links are `li.page`; the navigation links carry `first`, `prev`,
//! `next` and `last`. The current page is `li.active`.

use crate::page_object::{impl_page_object, PageRegion};
use crate::result::{E2eError, E2eResult};

/// Pagination bar
#[derive(Debug, Clone)]
pub struct Pagination {
    region: PageRegion,
}

impl_page_object!(Pagination, "Pagination", |page| page
    .region
    .wait_until_visible()
    .await);

impl Pagination {
    /// Page numbers shown
    pub async fn pages(&self) -> E2eResult<Vec<usize>> {
        let mut out = Vec::new();
        for link in self.region.find_all("li.page a").await? {
            if let Ok(page) = link.text().await?.trim().parse() {
                out.push(page);
            }
        }
        Ok(out)
    }

    /// Current page number
    pub async fn active_page(&self) -> E2eResult<usize> {
        let text = self.region.find("li.active a").await?.text().await?;
        text.trim()
            .parse()
            .map_err(|_| E2eError::assertion(format!("active page is not a number: {text:?}")))
    }

    /// Jump to `page`
    pub async fn go_to_page(&self, page: usize) -> E2eResult<()> {
        for link in self.region.find_all("li.page a").await? {
            if link.text().await?.trim() == page.to_string() {
                link.click().await?;
                return self.wait_for_page(page).await;
            }
        }
        Err(E2eError::NoSuchElement {
            selector: format!("pagination page {page}"),
        })
    }

    /// Go to the next page
    pub async fn next(&self) -> E2eResult<()> {
        self.navigate("next", 1).await
    }

    /// Go to the previous page
    pub async fn previous(&self) -> E2eResult<()> {
        self.navigate("prev", -1).await
    }

    /// Go to the first page
    pub async fn first(&self) -> E2eResult<()> {
        self.region.find("li.first a").await?.click().await?;
        self.wait_for_page(1).await
    }

    /// Whether the navigation link (`first`, `prev`, `next`, `last`) is disabled
    pub async fn is_disabled(&self, link: &str) -> E2eResult<bool> {
        self.region
            .find(format!("li.{link}"))
            .await?
            .has_class("disabled")
            .await
    }

    async fn navigate(&self, link: &str, step: isize) -> E2eResult<()> {
        let current = self.active_page().await?;
        self.region.find(format!("li.{link} a")).await?.click().await?;
        self.wait_for_page(current.saturating_add_signed(step)).await
    }

    async fn wait_for_page(&self, page: usize) -> E2eResult<()> {
        let _ = self
            .region
            .waiter()
            .until_fn(&format!("page {page} to become active"), || async move {
                Ok(self.active_page().await? == page)
            })
            .await?;
        Ok(())
    }
}
