//! Image widget: zoom, paging and reorderable thumbnails.

use crate::driver::{Element, Session};
use crate::locator::Selector;
use crate::page_object::{impl_page_object, PageObject, PageRegion};
use crate::result::{E2eError, E2eResult};
use crate::wait::Condition;
use tracing::debug;

/// Route of the image widget sandbox
pub const IMAGE_WIDGET_URL: &str = "/sandbox/idoc/widget/image-widget";

/// Wrapper selector of the widget
pub const IMAGE_WIDGET: &str = ".image-widget";

/// Image viewer widget
#[derive(Debug, Clone)]
pub struct ImageWidget {
    region: PageRegion,
}

impl_page_object!(ImageWidget, "ImageWidget", |page| {
    let _ = page.region.visible_child(".current-image").await?;
    Ok(())
});

impl ImageWidget {
    /// Wait for the first image widget in the document
    pub async fn wait_for(session: &Session) -> E2eResult<Self> {
        Self::locate(session, Selector::css(IMAGE_WIDGET)).await
    }

    async fn button(&self, class: &str) -> E2eResult<Element> {
        self.region.visible_child(format!(".image-toolbar {class}")).await
    }

    /// Source of the displayed image
    pub async fn current_image(&self) -> E2eResult<String> {
        Ok(self
            .region
            .find(".current-image")
            .await?
            .attribute("src")
            .await?
            .unwrap_or_default())
    }

    /// Counter text, e.g. `1 / 3`
    pub async fn counter(&self) -> E2eResult<String> {
        self.region.find(".image-counter").await?.text().await
    }

    /// Zoom level in percent
    pub async fn zoom_level(&self) -> E2eResult<u32> {
        let level = self.element().attribute("data-zoom").await?.unwrap_or_default();
        level
            .parse()
            .map_err(|_| E2eError::assertion(format!("invalid zoom level '{level}'")))
    }

    async fn zoom(&self, class: &str) -> E2eResult<u32> {
        let before = self.zoom_level().await?;
        self.button(class).await?.click().await?;
        let after = self.zoom_level().await?;
        debug!(before, after, "zoom");
        Ok(after)
    }

    /// Zoom in one step and return the new level
    pub async fn zoom_in(&self) -> E2eResult<u32> {
        self.zoom(".zoom-in").await
    }

    /// Zoom out one step and return the new level
    pub async fn zoom_out(&self) -> E2eResult<u32> {
        self.zoom(".zoom-out").await
    }

    async fn step(&self, class: &str) -> E2eResult<()> {
        let before = self.current_image().await?;
        self.button(class).await?.click().await?;
        if self.count().await? > 1 {
            let region = self.region.clone();
            let _ = self
                .region
                .waiter()
                .until_fn("image changed", move || {
                    let region = region.clone();
                    let before = before.clone();
                    async move {
                        let src = region.find(".current-image").await?.attribute("src").await?;
                        Ok(src.as_deref() != Some(before.as_str()))
                    }
                })
                .await?;
        }
        Ok(())
    }

    /// Show the next image, wrapping around
    pub async fn next(&self) -> E2eResult<()> {
        self.step(".next-image").await
    }

    /// Show the previous image, wrapping around
    pub async fn previous(&self) -> E2eResult<()> {
        self.step(".prev-image").await
    }

    /// Number of images
    pub async fn count(&self) -> E2eResult<usize> {
        Ok(self.region.find_all(".image-thumbnails .thumbnail").await?.len())
    }

    /// Thumbnail sources in display order
    pub async fn thumbnails(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for thumb in self.region.find_all(".image-thumbnails .thumbnail").await? {
            out.push(thumb.attribute("data-src").await?.unwrap_or_default());
        }
        Ok(out)
    }

    async fn thumbnail(&self, index: usize) -> E2eResult<Element> {
        self.region
            .visible_child(format!(".image-thumbnails .thumbnail:nth-child({})", index + 1))
            .await
    }

    /// Show the image of the thumbnail at a 0-based position
    pub async fn select_thumbnail(&self, index: usize) -> E2eResult<()> {
        let thumb = self.thumbnail(index).await?;
        thumb.click().await?;
        let _ = self
            .region
            .wait_for(Condition::present(Selector::css(format!(
                ".image-thumbnails .thumbnail.active:nth-child({})",
                index + 1
            ))))
            .await?;
        Ok(())
    }

    /// Drag the thumbnail at `from` onto the one at `to` (0-based); the
    /// dragged thumbnail ends up at position `to`
    pub async fn move_thumbnail(&self, from: usize, to: usize) -> E2eResult<()> {
        let source = self.thumbnail(from).await?;
        let target = self.thumbnail(to).await?;
        let moved = source.attribute("data-src").await?.unwrap_or_default();
        source.drag_to(&target).await?;
        let _ = self
            .region
            .wait_for(Condition::present(Selector::css(format!(
                ".image-thumbnails .thumbnail:nth-child({})[data-src=\"{moved}\"]",
                to + 1
            ))))
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

    async fn open() -> (MockDriver, ImageWidget) {
        let driver = MockDriver::with_sandbox_apps();
        let session = Session::new(driver.clone())
            .with_wait_options(WaitOptions::new().with_timeout(200).with_poll_interval(5));
        let mut page = SandboxPage::new(session.clone(), "http://localhost:5000");
        let _ = page.open(IMAGE_WIDGET_URL, None).await.unwrap();
        (driver, ImageWidget::wait_for(&session).await.unwrap())
    }

    mod viewer_tests {
        use super::*;

        #[tokio::test]
        async fn test_paging_wraps_around() {
            let (_, widget) = open().await;
            assert_eq!(widget.count().await.unwrap(), 3);
            assert_eq!(widget.counter().await.unwrap(), "1 / 3");
            widget.previous().await.unwrap();
            assert_eq!(widget.counter().await.unwrap(), "3 / 3");
            widget.next().await.unwrap();
            widget.next().await.unwrap();
            assert_eq!(widget.current_image().await.unwrap(), "image-2.png");
        }

        #[tokio::test]
        async fn test_zoom_is_bounded() {
            let (_, widget) = open().await;
            assert_eq!(widget.zoom_in().await.unwrap(), 125);
            for _ in 0..10 {
                let _ = widget.zoom_out().await.unwrap();
            }
            assert_eq!(widget.zoom_level().await.unwrap(), 25);
        }
    }

    mod thumbnail_tests {
        use super::*;

        #[tokio::test]
        async fn test_reorder_keeps_current_image() {
            let (driver, widget) = open().await;
            widget.select_thumbnail(1).await.unwrap();
            widget.move_thumbnail(2, 0).await.unwrap();
            assert_eq!(
                widget.thumbnails().await.unwrap(),
                vec!["image-3.png", "image-1.png", "image-2.png"]
            );
            assert_eq!(widget.current_image().await.unwrap(), "image-2.png");
            assert_eq!(widget.counter().await.unwrap(), "3 / 3");
            assert_eq!(driver.events(), vec!["image:move:image-3.png->image-1.png"]);
        }

        #[tokio::test]
        async fn test_forward_move_lands_on_target_position() {
            let (_, widget) = open().await;
            widget.move_thumbnail(0, 2).await.unwrap();
            assert_eq!(
                widget.thumbnails().await.unwrap(),
                vec!["image-2.png", "image-3.png", "image-1.png"]
            );
            assert_eq!(widget.current_image().await.unwrap(), "image-1.png");
            assert_eq!(widget.counter().await.unwrap(), "3 / 3");
        }
    }
}
