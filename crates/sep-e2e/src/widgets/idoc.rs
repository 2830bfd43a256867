//! Idoc page: context actions, tabs, per-tab editor, undo/redo and comments.
//!
//! The page is opened through [`IdocPage::open`], which loads
//! `/sandbox/idoc/idoc-page` with an `<id>?mode=edit|preview` hash.

use super::comments::Comments;
use crate::driver::Session;
use crate::locator::Selector;
use crate::page_object::{impl_page_object, PageObject, PageRegion};
use crate::result::{E2eError, E2eResult};
use crate::sandbox::{SandboxHash, SandboxPage};
use crate::wait::{Condition, Target, Waiter};
use tracing::info;

/// Route of the idoc sandbox
pub const IDOC_PAGE_URL: &str = "/sandbox/idoc/idoc-page";

/// Instance opened when no id is given
pub const DEFAULT_IDOC_ID: &str = "emf:123456";

/// Rendering mode of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdocMode {
    /// Editable content, save/cancel actions
    Edit,
    /// Read-only content, edit action
    Preview,
}

impl IdocMode {
    /// Hash parameter value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Preview => "preview",
        }
    }

    fn wrapper(self) -> &'static str {
        match self {
            Self::Edit => ".idoc-mode-edit",
            Self::Preview => ".idoc-mode-preview",
        }
    }
}

/// Sandbox wrapper of the idoc page, borrowing the caller's [`SandboxPage`]
#[derive(Debug)]
pub struct IdocPage<'a> {
    sandbox: &'a mut SandboxPage,
    mode: Option<IdocMode>,
}

impl<'a> IdocPage<'a> {
    /// Wrap a sandbox navigation helper
    #[must_use]
    pub fn new(sandbox: &'a mut SandboxPage) -> Self {
        Self {
            sandbox,
            mode: None,
        }
    }

    /// Session of the page
    #[must_use]
    pub fn session(&self) -> &Session {
        self.sandbox.session()
    }

    /// Mode requested by the last [`open`](Self::open)
    #[must_use]
    pub const fn requested_mode(&self) -> Option<IdocMode> {
        self.mode
    }

    /// Open the document `id` (default [`DEFAULT_IDOC_ID`]) in edit or
    /// preview mode. In edit mode the first tab's editor is awaited.
    pub async fn open(&mut self, edit: bool, id: Option<&str>) -> E2eResult<()> {
        let mode = if edit { IdocMode::Edit } else { IdocMode::Preview };
        let hash = SandboxHash::with_path(id.unwrap_or(DEFAULT_IDOC_ID)).param("mode", mode.as_str());
        info!(mode = mode.as_str(), "open idoc");
        let _ = self.sandbox.open(IDOC_PAGE_URL, Some(&hash.to_string())).await?;
        self.mode = Some(mode);
        self.wait_for_mode(mode).await?;
        if edit {
            let _ = self.tab_editor(0).await?;
        }
        Ok(())
    }

    /// Current rendering mode
    pub async fn mode(&self) -> E2eResult<IdocMode> {
        let session = self.session();
        if session.is_present(IdocMode::Edit.wrapper()).await? {
            Ok(IdocMode::Edit)
        } else if session.is_present(IdocMode::Preview.wrapper()).await? {
            Ok(IdocMode::Preview)
        } else {
            Err(E2eError::NoSuchElement {
                selector: ".idoc-wrapper".to_string(),
            })
        }
    }

    /// Whether the document is back in preview mode
    pub async fn is_saved(&self) -> E2eResult<bool> {
        self.session().is_present(IdocMode::Preview.wrapper()).await
    }

    /// Wait until the page renders in `mode`
    pub async fn wait_for_mode(&self, mode: IdocMode) -> E2eResult<()> {
        let _ = Waiter::new(self.session())
            .until(Condition::present(mode.wrapper()))
            .await?;
        Ok(())
    }

    /// Document title
    pub async fn title(&self) -> E2eResult<String> {
        self.session().find(".idoc-title").await?.text().await
    }

    /// Whether the editor toolbar is shown
    pub async fn is_editor_toolbar_displayed(&self) -> E2eResult<bool> {
        self.session()
            .find(Selector::id("idoc-editor-toolbar"))
            .await?
            .is_displayed()
            .await
    }

    /// Undo and redo buttons of the editor toolbar
    pub async fn undo_redo_toolbar(&self) -> E2eResult<UndoRedoToolbar> {
        UndoRedoToolbar::locate(self.session(), Selector::id("idoc-editor-toolbar")).await
    }

    /// Context actions (save, cancel, edit)
    pub async fn actions_toolbar(&self) -> E2eResult<ActionsToolbar> {
        ActionsToolbar::locate(self.session(), Selector::css(".idoc-context-actions-wrapper")).await
    }

    /// Tab strip
    pub async fn tabs(&self) -> E2eResult<IdocTabs> {
        IdocTabs::locate(self.session(), Selector::css(".idoc-tabs")).await
    }

    /// Editor of the tab at a 0-based position
    pub async fn tab_editor(&self, index: usize) -> E2eResult<IdocEditor> {
        IdocEditor::locate(
            self.session(),
            Selector::css(format!(
                ".tab-content > .tab-section:nth-child({}) .idoc-editor-area-wrapper",
                index + 1
            )),
        )
        .await
    }
}

/// Context actions of the document
#[derive(Debug, Clone)]
pub struct ActionsToolbar {
    region: PageRegion,
}

impl_page_object!(ActionsToolbar, "ActionsToolbar", |page| page
    .region
    .wait_until_present()
    .await);

impl ActionsToolbar {
    async fn press(&self, class: &str) -> E2eResult<()> {
        self.region.visible_child(class).await?.click().await
    }

    /// Switch to edit mode
    pub async fn edit(&self) -> E2eResult<()> {
        self.press(".seip-action-editDetails").await?;
        wait_for(self.region.session(), IdocMode::Edit).await
    }

    /// Save and return to preview mode
    pub async fn save(&self) -> E2eResult<()> {
        self.press(".seip-btn-save").await?;
        wait_for(self.region.session(), IdocMode::Preview).await
    }

    /// Discard the changes and return to preview mode
    pub async fn cancel(&self) -> E2eResult<()> {
        self.press(".seip-btn-cancel").await?;
        wait_for(self.region.session(), IdocMode::Preview).await
    }

    /// Labels of the shown actions
    pub async fn labels(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for button in self.region.find_all("button").await? {
            out.push(button.text().await?);
        }
        Ok(out)
    }
}

/// Undo and redo of the editor toolbar
///
/// A usable button carries `cke_button_off`, an exhausted one
/// `cke_button_disabled`. Both act on the editor of the shown tab.
#[derive(Debug, Clone)]
pub struct UndoRedoToolbar {
    region: PageRegion,
}

impl_page_object!(UndoRedoToolbar, "UndoRedoToolbar", |page| {
    let _ = page.region.visible_child(".cke_button__undo").await?;
    Ok(())
});

impl UndoRedoToolbar {
    async fn press(&self, name: &str) -> E2eResult<()> {
        let enabled = format!(".cke_button__{name}:not(.cke_button_disabled)");
        let _ = self
            .region
            .wait_for(Condition::present(Target::within(self.element(), enabled.as_str())))
            .await?;
        self.region.find(enabled).await?.click().await
    }

    async fn is_active(&self, name: &str) -> E2eResult<bool> {
        let button = self.region.find(format!(".cke_button__{name}")).await?;
        Ok(button.has_class("cke_button_off").await? && !button.has_class("cke_button_disabled").await?)
    }

    /// Restore the previous snapshot
    pub async fn undo(&self) -> E2eResult<()> {
        self.press("undo").await
    }

    /// Re-apply the next snapshot
    pub async fn redo(&self) -> E2eResult<()> {
        self.press("redo").await
    }

    /// Whether there is a snapshot to go back to
    pub async fn is_undo_active(&self) -> E2eResult<bool> {
        self.is_active("undo").await
    }

    /// Whether there is an undone snapshot to re-apply
    pub async fn is_redo_active(&self) -> E2eResult<bool> {
        self.is_active("redo").await
    }
}

async fn wait_for(session: &Session, mode: IdocMode) -> E2eResult<()> {
    let _ = Waiter::new(session)
        .until(Condition::present(mode.wrapper()))
        .await?;
    Ok(())
}

/// Tab strip (`ul.idoc-tabs`)
#[derive(Debug, Clone)]
pub struct IdocTabs {
    region: PageRegion,
}

impl_page_object!(IdocTabs, "IdocTabs", |page| {
    let _ = page.region.visible_child(".tab-item").await?;
    Ok(())
});

impl IdocTabs {
    /// Number of tabs
    pub async fn count(&self) -> E2eResult<usize> {
        Ok(self.region.find_all(".tab-item").await?.len())
    }

    /// Tab titles
    pub async fn titles(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for link in self.region.find_all(".tab-item > a").await? {
            out.push(link.text().await?);
        }
        Ok(out)
    }

    /// Tab at a 0-based position
    pub async fn tab_by_index(&self, index: usize) -> E2eResult<IdocTab> {
        IdocTab::locate_within(
            self.element(),
            Selector::css(format!(".tab-item:nth-child({})", index + 1)),
        )
        .await
    }

    /// 0-based position of the active tab
    pub async fn active_index(&self) -> E2eResult<Option<usize>> {
        for (i, tab) in self.region.find_all(".tab-item").await?.into_iter().enumerate() {
            if tab.has_class("active").await? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }
}

/// One tab of the strip
#[derive(Debug, Clone)]
pub struct IdocTab {
    region: PageRegion,
}

impl_page_object!(IdocTab, "IdocTab", |page| page
    .region
    .wait_until_visible()
    .await);

impl IdocTab {
    async fn index(&self) -> E2eResult<String> {
        self.element()
            .attribute("data-tab")
            .await?
            .ok_or_else(|| E2eError::assertion("tab has no data-tab attribute"))
    }

    /// Tab title
    pub async fn title(&self) -> E2eResult<String> {
        self.region.find("a").await?.text().await
    }

    /// Whether the tab is active
    pub async fn is_active(&self) -> E2eResult<bool> {
        self.region.has_class("active").await
    }

    /// Activate the tab and wait for its section
    pub async fn select(&self) -> E2eResult<()> {
        self.region.find("a").await?.click().await?;
        let index = self.index().await?;
        let _ = self
            .region
            .wait_for(Condition::visible(format!(
                ".tab-content > .tab-section[data-tab=\"{index}\"]"
            )))
            .await?;
        Ok(())
    }

    /// Editor of this tab
    pub async fn editor(&self) -> E2eResult<IdocEditor> {
        let index = self.index().await?;
        IdocEditor::locate(
            self.region.session(),
            Selector::css(format!(
                ".tab-section[data-tab=\"{index}\"] .idoc-editor-area-wrapper"
            )),
        )
        .await
    }

    /// Comments panel of this tab
    pub async fn comments(&self) -> E2eResult<Comments> {
        let index = self.index().await?;
        Comments::locate(
            self.region.session(),
            Selector::css(format!(
                ".tab-section[data-tab=\"{index}\"] .idoc-comments-wrapper"
            )),
        )
        .await
    }
}

/// Content editor of a tab (`.idoc-editor-area-wrapper`)
#[derive(Debug, Clone)]
pub struct IdocEditor {
    region: PageRegion,
}

impl_page_object!(IdocEditor, "IdocEditor", |page| {
    let _ = page.region.visible_child(".ck-editor").await?;
    Ok(())
});

impl IdocEditor {
    /// Whether the content can be edited
    pub async fn is_editable(&self) -> E2eResult<bool> {
        self.region.has_class("editable").await
    }

    /// Rendered content
    pub async fn content(&self) -> E2eResult<String> {
        self.region.find(".ck-editor").await?.text().await
    }

    /// Remove all content
    pub async fn clear(&self) -> E2eResult<()> {
        self.region.find(".ck-editor").await?.clear().await
    }

    /// Append text at the end of the content
    pub async fn type_text(&self, text: &str) -> E2eResult<()> {
        self.region.find(".ck-editor").await?.send_keys(text).await
    }

    /// Replace the content and wait until it renders
    pub async fn set_content(&self, text: &str) -> E2eResult<()> {
        let editor = self.region.find(".ck-editor").await?;
        editor.clear().await?;
        editor.send_keys(text).await?;
        let _ = self
            .region
            .wait_for(Condition::text_present(&editor, text))
            .await?;
        Ok(())
    }
}
