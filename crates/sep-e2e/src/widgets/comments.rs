//! Idoc comments.
//!
//! Every tab has its own comments panel. A comment carries an actions
//! dropdown (edit, reply, delete) and a collapsible thread of replies; only
//! one thread is expanded at a time. The comment dialog suggests mentions
//! after `@` and emoji after `:`.

use crate::components::{ConfirmationPopup, DropdownMenu};
use crate::driver::{Element, Session};
use crate::locator::Selector;
use crate::page_object::{impl_page_object, PageObject, PageRegion};
use crate::result::E2eResult;
use crate::wait::{Condition, Target};
use tracing::debug;

const SUGGESTIONS: &str = "#textcomplete-dropdown-1";

async fn texts(elements: Vec<Element>) -> E2eResult<Vec<String>> {
    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        out.push(element.text().await?);
    }
    Ok(out)
}

// =============================================================================
// PANEL
// =============================================================================

/// Comments panel of one tab (`.idoc-comments-wrapper`)
#[derive(Debug, Clone)]
pub struct Comments {
    region: PageRegion,
}

impl_page_object!(Comments, "Comments", |page| {
    let _ = page.region.present_child(".comments").await?;
    Ok(())
});

impl Comments {
    /// Open the dialog for a new comment
    pub async fn create_comment(&self) -> E2eResult<CommentDialog> {
        self.region.visible_child(".create-comment").await?.click().await?;
        CommentDialog::wait_for(self.region.session()).await
    }

    /// Create a comment with plain text
    pub async fn add_comment(&self, text: &str) -> E2eResult<()> {
        let expected = self.count().await? + 1;
        let dialog = self.create_comment().await?;
        dialog.type_text(text).await?;
        dialog.ok().await?;
        self.wait_for_count(expected).await
    }

    /// Top-level comments
    pub async fn comments(&self) -> E2eResult<Vec<Comment>> {
        let mut out = Vec::new();
        for element in self.region.find_all(".comments > .comment").await? {
            out.push(Comment::bind(Some(element)).await?);
        }
        Ok(out)
    }

    /// Top-level comment at a 0-based position
    pub async fn comment(&self, index: usize) -> E2eResult<Comment> {
        Comment::locate_within(
            self.element(),
            Selector::css(format!(".comments > .comment:nth-child({})", index + 1)),
        )
        .await
    }

    /// Number of top-level comments
    pub async fn count(&self) -> E2eResult<usize> {
        Ok(self.region.find_all(".comments > .comment").await?.len())
    }

    /// Wait until exactly `count` comments are shown
    pub async fn wait_for_count(&self, count: usize) -> E2eResult<()> {
        let _ = self
            .region
            .waiter()
            .until_fn(&format!("{count} comments"), || async move {
                Ok(self.count().await? == count)
            })
            .await?;
        Ok(())
    }
}

// =============================================================================
// COMMENT
// =============================================================================

/// Single top-level comment
#[derive(Debug, Clone)]
pub struct Comment {
    region: PageRegion,
}

impl_page_object!(Comment, "Comment", |page| {
    let _ = page.region.present_child(".comment-content").await?;
    Ok(())
});

impl Comment {
    async fn content(&self) -> E2eResult<Element> {
        self.region.find(".comment-content").await
    }

    /// Author name
    pub async fn author(&self) -> E2eResult<String> {
        self.region.find(".comment-author").await?.text().await
    }

    /// Comment text without mentions
    pub async fn text(&self) -> E2eResult<String> {
        self.content().await?.find(".comment-text").await?.text().await
    }

    /// `(instance id, label)` of each mention link
    pub async fn mentions(&self) -> E2eResult<Vec<(String, String)>> {
        let mut out = Vec::new();
        for link in self.content().await?.find_all(".instance-link").await? {
            let id = link.attribute("data-mention-id").await?.unwrap_or_default();
            out.push((id, link.text().await?));
        }
        Ok(out)
    }

    /// Target of the mention link labelled `name`
    pub async fn mention_href(&self, name: &str) -> E2eResult<Option<String>> {
        self.content()
            .await?
            .find(Selector::css_with_text(".instance-link", name))
            .await?
            .attribute("href")
            .await
    }

    /// Per-comment actions menu
    pub async fn actions(&self) -> E2eResult<CommentActions> {
        CommentActions::locate_within(self.element(), Selector::css(".comment-actions")).await
    }

    /// Whether the replies thread is expanded
    pub async fn is_expanded(&self) -> E2eResult<bool> {
        self.region.has_class("expanded").await
    }

    /// Expand the replies thread
    pub async fn expand(&self) -> E2eResult<()> {
        if !self.is_expanded().await? {
            self.region.find(".expand-comment").await?.click().await?;
        }
        let _ = self
            .region
            .wait_for(Condition::visible(Target::within(
                self.element(),
                ".comment-replies",
            )))
            .await?;
        Ok(())
    }

    /// Collapse the replies thread
    pub async fn collapse(&self) -> E2eResult<()> {
        if self.is_expanded().await? {
            self.region.find(".expand-comment").await?.click().await?;
        }
        let _ = self
            .region
            .wait_for(Condition::invisible(Target::within(
                self.element(),
                ".comment-replies",
            )))
            .await?;
        Ok(())
    }

    /// Label of the expand link, e.g. `Replies (1)`
    pub async fn replies_label(&self) -> E2eResult<String> {
        self.region.find(".expand-comment").await?.text().await
    }

    /// Texts of the replies, read even while collapsed
    pub async fn replies(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for reply in self.region.find_all(".comment-replies .reply .comment-text").await? {
            out.push(
                reply
                    .attribute("textContent")
                    .await?
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
            );
        }
        Ok(out)
    }

    /// Open the dialog editing this comment
    pub async fn edit(&self) -> E2eResult<CommentDialog> {
        self.actions().await?.click("Edit").await?;
        CommentDialog::wait_for(self.region.session()).await
    }

    /// Open the dialog replying to this comment
    pub async fn reply(&self) -> E2eResult<CommentDialog> {
        self.actions().await?.click("Reply").await?;
        CommentDialog::wait_for(self.region.session()).await
    }

    /// Delete the comment, confirming the prompt
    pub async fn delete(&self) -> E2eResult<()> {
        self.actions().await?.click("Delete").await?;
        ConfirmationPopup::wait_for(self.region.session())
            .await?
            .confirm()
            .await?;
        let _ = self.region.wait_for(Condition::stale(self.element())).await?;
        debug!("comment deleted");
        Ok(())
    }
}

/// Actions dropdown of a comment
#[derive(Debug, Clone)]
pub struct CommentActions {
    region: PageRegion,
}

impl_page_object!(CommentActions, "CommentActions", |page| page
    .region
    .wait_until_visible()
    .await);

impl CommentActions {
    async fn menu(&self) -> E2eResult<DropdownMenu> {
        DropdownMenu::bind(Some(self.element().clone())).await
    }

    /// Labels of the available actions
    pub async fn items(&self) -> E2eResult<Vec<String>> {
        self.menu().await?.items().await
    }

    /// Open the menu and pick the action labelled `name`
    pub async fn click(&self, name: &str) -> E2eResult<()> {
        self.menu().await?.click_item(name).await
    }
}

// =============================================================================
// DIALOG
// =============================================================================

/// Create/edit/reply dialog
#[derive(Debug, Clone)]
pub struct CommentDialog {
    region: PageRegion,
}

impl_page_object!(CommentDialog, "CommentDialog", |page| {
    let _ = page.region.visible_child(".comment-editor").await?;
    Ok(())
});

impl CommentDialog {
    /// Wait for the comment dialog
    pub async fn wait_for(session: &Session) -> E2eResult<Self> {
        Self::locate(session, Selector::css(".modal-dialog.comment-dialog")).await
    }

    async fn editor(&self) -> E2eResult<Element> {
        self.region.find(".comment-editor").await
    }

    /// Dialog title
    pub async fn title(&self) -> E2eResult<String> {
        self.region.find(".modal-title").await?.text().await
    }

    /// Append text to the editor
    pub async fn type_text(&self, text: &str) -> E2eResult<()> {
        self.editor().await?.send_keys(text).await
    }

    /// Empty the editor
    pub async fn clear(&self) -> E2eResult<()> {
        self.editor().await?.clear().await
    }

    /// Current editor content
    pub async fn text(&self) -> E2eResult<String> {
        self.editor().await?.value().await
    }

    /// Whether OK can be pressed
    pub async fn is_ok_enabled(&self) -> E2eResult<bool> {
        self.region.find(".seip-btn-ok").await?.is_enabled().await
    }

    /// Labels of the shown suggestions
    pub async fn suggestions(&self) -> E2eResult<Vec<String>> {
        let session = self.region.session();
        let _ = self
            .region
            .wait_for(Condition::visible(format!("{SUGGESTIONS} .textcomplete-item")))
            .await?;
        let mut out = Vec::new();
        for item in session
            .find_all(format!("{SUGGESTIONS} .textcomplete-item"))
            .await?
        {
            out.push(item.attribute("data-label").await?.unwrap_or_default());
        }
        Ok(out)
    }

    /// Texts of the shown suggestions, as rendered
    pub async fn suggestion_texts(&self) -> E2eResult<Vec<String>> {
        texts(
            self.region
                .session()
                .find_all(format!("{SUGGESTIONS} .textcomplete-item"))
                .await?,
        )
        .await
    }

    /// Pick the suggestion labelled `label`
    pub async fn select_suggestion(&self, label: &str) -> E2eResult<()> {
        let item = Selector::css(format!(
            "{SUGGESTIONS} .textcomplete-item[data-label=\"{label}\"]"
        ));
        let _ = self.region.wait_for(Condition::visible(item.clone())).await?;
        self.region.session().find(item).await?.click().await?;
        let _ = self.region.wait_for(Condition::stale(SUGGESTIONS)).await?;
        Ok(())
    }

    /// Type `@<query>` and pick the user labelled `name`
    pub async fn insert_mention(&self, query: &str, name: &str) -> E2eResult<()> {
        self.type_text(&format!("@{query}")).await?;
        self.select_suggestion(name).await
    }

    /// Type `:<query>` and pick the emoji named `name`
    pub async fn insert_emoji(&self, query: &str, name: &str) -> E2eResult<()> {
        self.type_text(&format!(":{query}")).await?;
        self.select_suggestion(name).await
    }

    /// Press OK and wait for the dialog to close
    pub async fn ok(&self) -> E2eResult<()> {
        let button = self.region.find(".seip-btn-ok").await?;
        let _ = self.region.wait_for(Condition::clickable(&button)).await?;
        button.click().await?;
        let _ = self.region.wait_for(Condition::stale(self.element())).await?;
        Ok(())
    }

    /// Press Cancel and wait for the dialog to close
    pub async fn cancel(&self) -> E2eResult<()> {
        self.region.find(".seip-btn-cancel").await?.click().await?;
        let _ = self.region.wait_for(Condition::stale(self.element())).await?;
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

    async fn open() -> (MockDriver, Comments) {
        let driver = MockDriver::with_sandbox_apps();
        let session = Session::new(driver.clone())
            .with_wait_options(WaitOptions::new().with_timeout(200).with_poll_interval(5));
        let mut page = SandboxPage::new(session.clone(), "http://localhost:5000");
        let _ = page
            .open("/sandbox/idoc/idoc-page", Some("emf:123456?mode=preview"))
            .await
            .unwrap();
        let comments = Comments::locate(&session, Selector::css(".idoc-comments-wrapper"))
            .await
            .unwrap();
        (driver, comments)
    }

    mod comment_tests {
        use super::*;

        #[tokio::test]
        async fn test_default_comment_and_reply() {
            let (_, comments) = open().await;
            assert_eq!(comments.count().await.unwrap(), 1);
            let comment = comments.comment(0).await.unwrap();
            assert_eq!(comment.text().await.unwrap(), "default comment");
            assert_eq!(comment.author().await.unwrap(), "admin");
            assert!(!comment.is_expanded().await.unwrap());
            assert_eq!(comment.replies().await.unwrap(), vec!["default reply".to_string()]);
            comment.expand().await.unwrap();
            assert!(comment.is_expanded().await.unwrap());
            assert_eq!(
                comment.actions().await.unwrap().items().await.unwrap(),
                vec!["Edit", "Reply", "Delete"]
            );
        }

        #[tokio::test]
        async fn test_create_edit_reply_delete() {
            let (driver, comments) = open().await;
            comments.add_comment("second").await.unwrap();
            let second = comments.comment(1).await.unwrap();
            assert_eq!(second.text().await.unwrap(), "second");

            let dialog = second.edit().await.unwrap();
            assert_eq!(dialog.text().await.unwrap(), "second");
            dialog.clear().await.unwrap();
            dialog.type_text("edited").await.unwrap();
            dialog.ok().await.unwrap();
            assert_eq!(second.text().await.unwrap(), "edited");

            let dialog = second.reply().await.unwrap();
            dialog.type_text("an answer").await.unwrap();
            dialog.ok().await.unwrap();
            assert!(second.is_expanded().await.unwrap());
            assert_eq!(second.replies_label().await.unwrap(), "Replies (1)");

            second.delete().await.unwrap();
            comments.wait_for_count(1).await.unwrap();
            assert_eq!(
                driver.events(),
                vec!["comment:create", "comment:edit", "comment:reply", "comment:delete"]
            );
        }

        #[tokio::test]
        async fn test_ok_disabled_while_empty() {
            let (_, comments) = open().await;
            let dialog = comments.create_comment().await.unwrap();
            assert!(!dialog.is_ok_enabled().await.unwrap());
            dialog.type_text("x").await.unwrap();
            assert!(dialog.is_ok_enabled().await.unwrap());
            dialog.cancel().await.unwrap();
            assert_eq!(comments.count().await.unwrap(), 1);
        }
    }

    mod suggestion_tests {
        use super::*;

        #[tokio::test]
        async fn test_mention_renders_link() {
            let (_, comments) = open().await;
            let dialog = comments.create_comment().await.unwrap();
            dialog.type_text("Hi ").await.unwrap();
            dialog.type_text("@").await.unwrap();
            assert_eq!(dialog.suggestions().await.unwrap(), vec!["John Doe", "Jane Doe"]);
            dialog.type_text("doeandco").await.unwrap();
            dialog.select_suggestion("Jane Doe").await.unwrap();
            dialog.ok().await.unwrap();
            let comment = comments.comment(1).await.unwrap();
            assert_eq!(comment.text().await.unwrap(), "Hi");
            assert_eq!(
                comment.mentions().await.unwrap(),
                vec![("emf:janedoe".to_string(), "Jane Doe".to_string())]
            );
            assert_eq!(
                comment.mention_href("Jane Doe").await.unwrap().as_deref(),
                Some("#/idoc/emf:janedoe")
            );
        }

        #[tokio::test]
        async fn test_emoji() {
            let (_, comments) = open().await;
            let dialog = comments.create_comment().await.unwrap();
            dialog.type_text(":smil").await.unwrap();
            assert_eq!(dialog.suggestions().await.unwrap()[0], "smile");
            dialog.select_suggestion("smile").await.unwrap();
            assert_eq!(dialog.text().await.unwrap(), "😄 ");
        }
    }
}
