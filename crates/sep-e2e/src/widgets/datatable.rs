//! Datatable widget.
//!
//! Rows and cells are addressed by 1-based position, like the CSS
//! `nth-child` selectors they resolve to. The first cell of a row holds the
//! instance header; the others hold form controls.

use crate::components::{press_enter, InputField};
use crate::driver::{Element, Session};
use crate::locator::Selector;
use crate::page_object::{impl_page_object, PageObject, PageRegion};
use crate::result::E2eResult;
use crate::wait::Condition;

/// Route of the datatable filter sandbox
pub const DATATABLE_FILTER_URL: &str = "/sandbox/idoc/widget/datatable-filter";

/// Wrapper selector of the widget
pub const DATATABLE_WIDGET: &str = ".datatable-widget";

/// Datatable widget
#[derive(Debug, Clone)]
pub struct DatatableWidget {
    region: PageRegion,
}

impl_page_object!(DatatableWidget, "DatatableWidget", |page| {
    let _ = page.region.visible_child(".table-body").await?;
    Ok(())
});

impl DatatableWidget {
    /// Wait for the first datatable widget in the document
    pub async fn wait_for(session: &Session) -> E2eResult<Self> {
        Self::locate(session, Selector::css(DATATABLE_WIDGET)).await
    }

    /// Widget title
    pub async fn title(&self) -> E2eResult<String> {
        self.region.find(".widget-title").await?.text().await
    }

    /// Column headers
    pub async fn header(&self) -> E2eResult<DatatableHeader> {
        DatatableHeader::locate_within(self.element(), Selector::css(".table-header")).await
    }

    /// Filter row
    pub async fn filter(&self) -> E2eResult<DatatableFilter> {
        DatatableFilter::locate_within(self.element(), Selector::css(".table-filter")).await
    }

    /// Number of displayed rows
    pub async fn rows_count(&self) -> E2eResult<usize> {
        let mut count = 0;
        for row in self.region.find_all(".table-body .table-row").await? {
            if row.is_displayed().await? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Row at a 1-based position
    pub async fn row(&self, index: usize) -> E2eResult<DatatableRow> {
        DatatableRow::locate_within(
            self.element(),
            Selector::css(format!(".table-body .table-row:nth-child({index})")),
        )
        .await
    }

    /// Footer text with the number of results
    pub async fn total_results(&self) -> E2eResult<String> {
        self.region.find(".total-results").await?.text().await
    }
}

/// Header row
#[derive(Debug, Clone)]
pub struct DatatableHeader {
    region: PageRegion,
}

impl_page_object!(DatatableHeader, "DatatableHeader", |page| page
    .region
    .wait_until_visible()
    .await);

impl DatatableHeader {
    /// Number of columns
    pub async fn columns_count(&self) -> E2eResult<usize> {
        Ok(self.region.find_all(".header-cell").await?.len())
    }

    /// Column titles
    pub async fn titles(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for cell in self.region.find_all(".header-cell").await? {
            out.push(cell.text().await?);
        }
        Ok(out)
    }
}

/// Table row
#[derive(Debug, Clone)]
pub struct DatatableRow {
    region: PageRegion,
}

impl_page_object!(DatatableRow, "DatatableRow", |page| page
    .region
    .wait_until_present()
    .await);

impl DatatableRow {
    /// Cell at a 1-based position
    pub async fn cell(&self, index: usize) -> E2eResult<DatatableCell> {
        DatatableCell::locate_within(
            self.element(),
            Selector::css(format!(".table-cell:nth-child({index})")),
        )
        .await
    }

    /// Whether the row survived the current filter
    pub async fn is_displayed(&self) -> E2eResult<bool> {
        self.element().is_displayed().await
    }
}

/// Table cell
#[derive(Debug, Clone)]
pub struct DatatableCell {
    region: PageRegion,
}

impl_page_object!(DatatableCell, "DatatableCell", |page| page
    .region
    .wait_until_present()
    .await);

impl DatatableCell {
    /// Instance header rendered in the cell
    pub async fn instance_header(&self) -> E2eResult<InstanceHeader> {
        InstanceHeader::locate_within(self.element(), Selector::css(".instance-header")).await
    }

    /// Input field matched by `selector` inside the cell
    pub async fn input_field(&self, selector: &str) -> E2eResult<InputField> {
        InputField::locate_within(self.element(), Selector::css(selector)).await
    }

    /// Visible cell text
    pub async fn text(&self) -> E2eResult<String> {
        self.element().text().await
    }
}

/// Compact instance header (`.instance-header`)
#[derive(Debug, Clone)]
pub struct InstanceHeader {
    region: PageRegion,
}

impl_page_object!(InstanceHeader, "InstanceHeader", |page| page
    .region
    .wait_until_visible()
    .await);

impl InstanceHeader {
    /// Header as plain text
    pub async fn header_text(&self) -> E2eResult<String> {
        self.element().text().await
    }

    /// Link to the instance
    pub async fn link(&self) -> E2eResult<Element> {
        self.region.find(".instance-link").await
    }
}

/// Filter row with one text input per column
#[derive(Debug, Clone)]
pub struct DatatableFilter {
    region: PageRegion,
}

impl_page_object!(DatatableFilter, "DatatableFilter", |page| {
    let _ = page.region.visible_child(".filter-cell input").await?;
    Ok(())
});

impl DatatableFilter {
    async fn input(&self, column: usize) -> E2eResult<Element> {
        self.region
            .visible_child(format!(".filter-cell:nth-child({column}) input"))
            .await
    }

    /// Type a string filter into the 1-based `column`
    pub async fn set_string_field_value(&self, column: usize, value: &str) -> E2eResult<()> {
        let input = self.input(column).await?;
        input.clear().await?;
        input.send_keys(value).await?;
        let _ = self
            .region
            .wait_for(Condition::text_in_value(&input, value))
            .await?;
        Ok(())
    }

    /// Current filter value of the 1-based `column`
    pub async fn string_field_value(&self, column: usize) -> E2eResult<String> {
        self.input(column).await?.value().await
    }

    /// Apply the filters by pressing Enter in `column`
    pub async fn apply_filter(&self, column: usize) -> E2eResult<()> {
        press_enter(&self.input(column).await?).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::MockDriver;
    use crate::sandbox::SandboxPage;
    use crate::wait::WaitOptions;

    async fn open() -> (MockDriver, DatatableWidget) {
        let driver = MockDriver::with_sandbox_apps();
        let session = Session::new(driver.clone())
            .with_wait_options(WaitOptions::new().with_timeout(200).with_poll_interval(5));
        let mut page = SandboxPage::new(session.clone(), "http://localhost:5000");
        let _ = page
            .open(DATATABLE_FILTER_URL, None)
            .await
            .unwrap();
        (driver, DatatableWidget::wait_for(&session).await.unwrap())
    }

    mod table_tests {
        use super::*;

        #[tokio::test]
        async fn test_header_rows_and_cells() {
            let (_, widget) = open().await;
            assert_eq!(widget.title().await.unwrap(), "Documents");
            let header = widget.header().await.unwrap();
            assert_eq!(header.columns_count().await.unwrap(), 4);
            assert_eq!(header.titles().await.unwrap()[0], "Title");
            assert_eq!(widget.rows_count().await.unwrap(), 5);

            let row = widget.row(1).await.unwrap();
            let title = row.cell(1).await.unwrap().instance_header().await.unwrap();
            assert_eq!(title.header_text().await.unwrap(), "Header-1");
            let status = row.cell(2).await.unwrap().input_field("#status1").await.unwrap();
            assert_eq!(status.value().await.unwrap(), "Draft");
        }
    }

    mod filter_tests {
        use super::*;

        #[tokio::test]
        async fn test_string_filter_keeps_value_after_enter() {
            let (driver, widget) = open().await;
            let filter = widget.filter().await.unwrap();
            filter.set_string_field_value(3, "Jane").await.unwrap();
            filter.apply_filter(3).await.unwrap();
            assert_eq!(filter.string_field_value(3).await.unwrap(), "Jane");
            assert_eq!(widget.rows_count().await.unwrap(), 2);
            assert_eq!(widget.total_results().await.unwrap(), "2 results");
            assert!(!widget.row(1).await.unwrap().is_displayed().await.unwrap());
            assert_eq!(driver.events(), vec!["datatable:filter".to_string()]);
        }
    }
}
