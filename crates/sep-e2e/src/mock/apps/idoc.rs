//! Idoc sandboxes: the document page (tabs, editor, comments) and the
//! datatable and image widgets.

use super::{dropdown, dropdown_behaviour, modal, on_confirmation, show_confirmation};
use crate::mock::dom::{MockDom, MockNode, NodeId};
use crate::mock::SandboxLocation;
use crate::result::E2eResult;

pub(super) const IDOC_PAGE: &str = "/sandbox/idoc/idoc-page";
pub(super) const DATATABLE_FILTER: &str = "/sandbox/idoc/widget/datatable-filter";
pub(super) const IMAGE_WIDGET: &str = "/sandbox/idoc/widget/image-widget";

const DEFAULT_ID: &str = "emf:123456";
const TABS: [&str; 3] = ["General", "Details", "History"];

const USERS: [(&str, &str, &str); 2] = [
    ("emf:johndoe", "John Doe", "johndoe@doeandco.com"),
    ("emf:janedoe", "Jane Doe", "janedoe@doeandco.com"),
];

const EMOJIS: [(&str, &str); 5] = [
    ("smile", "😄"),
    ("smiley", "😃"),
    ("sweat_smile", "😅"),
    ("heart", "❤"),
    ("thumbsup", "👍"),
];

// =============================================================================
// IDOC PAGE
// =============================================================================

fn set_mode(dom: &mut MockDom, edit: bool) {
    let Some(page) = dom.first(".idoc-wrapper") else {
        return;
    };
    let (from, to) = if edit {
        ("idoc-mode-preview", "idoc-mode-edit")
    } else {
        ("idoc-mode-edit", "idoc-mode-preview")
    };
    dom.remove_class(page, from);
    dom.add_class(page, to);

    if let Some(actions) = dom.first(".idoc-context-actions-wrapper") {
        dom.clear_children(actions);
        let buttons: &[(&str, &str)] = if edit {
            &[
                ("btn btn-primary seip-btn-save", "Save"),
                ("btn btn-default seip-btn-cancel", "Cancel"),
            ]
        } else {
            &[("btn btn-default seip-action-editDetails", "Edit")]
        };
        for (class, label) in buttons {
            let _ = dom.append(actions, MockNode::new("button").class(class).text(label));
        }
    }
    if let Some(toolbar) = dom.first("#idoc-editor-toolbar") {
        dom.set_hidden(toolbar, !edit);
    }
    for wrapper in dom.select(".idoc-editor-area-wrapper").unwrap_or_default() {
        if edit {
            dom.add_class(wrapper, "editable");
        } else {
            dom.remove_class(wrapper, "editable");
        }
    }
    refresh_history_buttons(dom);
}

fn tab_section(index: usize, title: &str) -> MockNode {
    let content = format!("Content of {title}");
    MockNode::new("section")
        .class("tab-section")
        .attr("data-tab", &index.to_string())
        .when(index != 0, MockNode::hidden)
        .child(
            MockNode::new("div").class("tab-sections").child(
                MockNode::new("div").class("idoc-editor-area-wrapper").child(
                    MockNode::new("div")
                        .class("ck-editor")
                        .attr("contenteditable", "true")
                        .attr("data-saved", &content)
                        .value(&content)
                        .text(&content),
                ),
            ),
        )
        .child(comments_wrapper())
}

fn activate_tab(dom: &mut MockDom, index: &str) {
    for tab in dom.select(".idoc-tabs .tab-item").unwrap_or_default() {
        if dom.attr(tab, "data-tab") == Some(index) {
            dom.add_class(tab, "active");
        } else {
            dom.remove_class(tab, "active");
        }
    }
    for section in dom.select(".tab-content > .tab-section").unwrap_or_default() {
        let hidden = dom.attr(section, "data-tab") != Some(index);
        dom.set_hidden(section, hidden);
    }
    refresh_history_buttons(dom);
}

// =============================================================================
// UNDO AND REDO
// =============================================================================

/// Snapshot history of an editor and the position of the shown snapshot
fn history(dom: &MockDom, editor: NodeId) -> (Vec<String>, usize) {
    let snapshots: Vec<String> = dom
        .attr(editor, "data-snapshots")
        .and_then(|json| serde_json::from_str(json).ok())
        .unwrap_or_default();
    let index = dom
        .attr(editor, "data-snapshot")
        .and_then(|i| i.parse::<usize>().ok())
        .unwrap_or_default()
        .min(snapshots.len().saturating_sub(1));
    (snapshots, index)
}

fn store_history(dom: &mut MockDom, editor: NodeId, snapshots: &[String], index: usize) {
    let json = serde_json::to_string(snapshots).unwrap_or_default();
    dom.set_attr(editor, "data-snapshots", &json);
    dom.set_attr(editor, "data-snapshot", &index.to_string());
}

fn reset_history(dom: &mut MockDom, editor: NodeId) {
    let text = dom.own_text(editor).to_string();
    store_history(dom, editor, &[text], 0);
}

/// Push `text` after the shown snapshot, dropping the redo tail
fn record_snapshot(dom: &mut MockDom, editor: NodeId, text: &str) {
    let (mut snapshots, index) = history(dom, editor);
    if snapshots.get(index).is_some_and(|shown| shown == text) {
        return;
    }
    snapshots.truncate(index + 1);
    snapshots.push(text.to_string());
    let index = snapshots.len() - 1;
    store_history(dom, editor, &snapshots, index);
}

fn active_editor(dom: &MockDom) -> Option<NodeId> {
    dom.select(".tab-content > .tab-section .ck-editor")
        .unwrap_or_default()
        .into_iter()
        .find(|editor| dom.is_displayed(*editor))
}

fn refresh_history_buttons(dom: &mut MockDom) {
    let (can_undo, can_redo) = active_editor(dom)
        .map(|editor| {
            let (snapshots, index) = history(dom, editor);
            (index > 0, index + 1 < snapshots.len())
        })
        .unwrap_or_default();
    for (name, enabled) in [("undo", can_undo), ("redo", can_redo)] {
        let Some(button) = dom.first(&format!("#idoc-editor-toolbar .cke_button__{name}")) else {
            continue;
        };
        if enabled {
            dom.remove_class(button, "cke_button_disabled");
            dom.add_class(button, "cke_button_off");
        } else {
            dom.remove_class(button, "cke_button_off");
            dom.add_class(button, "cke_button_disabled");
        }
    }
}

fn step_history(dom: &mut MockDom, button: NodeId, back: bool) {
    if dom.has_class(button, "cke_button_disabled") {
        return;
    }
    let Some(editor) = active_editor(dom) else {
        return;
    };
    let (snapshots, index) = history(dom, editor);
    let target = if back {
        index.checked_sub(1)
    } else {
        Some(index + 1).filter(|next| *next < snapshots.len())
    };
    let Some((target, text)) = target.and_then(|t| snapshots.get(t).map(|text| (t, text.clone()))) else {
        return;
    };
    dom.set_text(editor, &text);
    dom.set_attr(editor, "value", &text);
    store_history(dom, editor, &snapshots, target);
    refresh_history_buttons(dom);
    dom.log_event(if back { "idoc:undo" } else { "idoc:redo" });
}

/// Document page; the hash is `<id>?mode=edit|preview`
pub(super) fn mount_idoc_page(dom: &mut MockDom, location: &SandboxLocation) -> E2eResult<()> {
    let id = match location.hash_path() {
        "" => DEFAULT_ID,
        id => id,
    };
    let edit = location.param("mode") == Some("edit");

    let tabs = TABS.iter().enumerate().fold(
        MockNode::new("ul").class("nav idoc-tabs"),
        |tabs, (i, title)| {
            tabs.child(
                MockNode::new("li")
                    .class("tab-item")
                    .attr("data-tab", &i.to_string())
                    .when(i == 0, |n| n.class("active"))
                    .child(MockNode::new("a").text(title)),
            )
        },
    );
    let sections = TABS.iter().enumerate().fold(
        MockNode::new("div").class("tab-content"),
        |content, (i, title)| content.child(tab_section(i, title)),
    );
    let root = dom.root();
    let _ = dom.append(
        root,
        MockNode::new("div")
            .class("idoc-wrapper")
            .attr("data-id", id)
            .child(
                MockNode::new("div")
                    .class("idoc-context-wrapper")
                    .child(MockNode::new("h2").class("idoc-title").text(&format!("Document {id}")))
                    .child(MockNode::new("div").class("idoc-context-actions-wrapper")),
            )
            .child(
                MockNode::new("div")
                    .id("idoc-editor-toolbar")
                    .class("idoc-editor-toolbar-container")
                    .child(
                        MockNode::new("a")
                            .class("cke_button cke_button__undo cke_button_disabled")
                            .attr("title", "Undo")
                            .text("↶"),
                    )
                    .child(
                        MockNode::new("a")
                            .class("cke_button cke_button__redo cke_button_disabled")
                            .attr("title", "Redo")
                            .text("↷"),
                    )
                    .child(MockNode::new("button").class("cke_button cke_button__bold").text("B")),
            )
            .child(MockNode::new("div").class("idoc-navigation-wrapper").child(tabs))
            .child(sections),
    );
    for editor in dom.select(".ck-editor").unwrap_or_default() {
        reset_history(dom, editor);
    }
    set_mode(dom, edit);

    dom.on_click(".seip-action-editDetails", |dom, _| {
        set_mode(dom, true);
        dom.log_event("idoc:edit");
    })?;
    dom.on_click(".idoc-context-actions-wrapper .seip-btn-save", |dom, _| {
        for editor in dom.select(".ck-editor").unwrap_or_default() {
            let text = dom.own_text(editor).to_string();
            dom.set_attr(editor, "data-saved", &text);
            reset_history(dom, editor);
        }
        set_mode(dom, false);
        dom.log_event("idoc:save");
    })?;
    dom.on_click(".idoc-context-actions-wrapper .seip-btn-cancel", |dom, _| {
        for editor in dom.select(".ck-editor").unwrap_or_default() {
            let saved = dom.attr(editor, "data-saved").unwrap_or_default().to_string();
            dom.set_text(editor, &saved);
            dom.set_attr(editor, "value", &saved);
            reset_history(dom, editor);
        }
        set_mode(dom, false);
        dom.log_event("idoc:cancel");
    })?;
    dom.on_click(".idoc-tabs .tab-item a", |dom, link| {
        if let Some(index) = dom
            .closest(link, ".tab-item")
            .and_then(|tab| dom.attr(tab, "data-tab"))
            .map(str::to_string)
        {
            activate_tab(dom, &index);
        }
    })?;
    dom.on_click("#idoc-editor-toolbar .cke_button__undo", |dom, button| {
        step_history(dom, button, true);
    })?;
    dom.on_click("#idoc-editor-toolbar .cke_button__redo", |dom, button| {
        step_history(dom, button, false);
    })?;
    dom.on_input(".ck-editor", |dom, editor| {
        let editable = dom
            .closest(editor, ".idoc-editor-area-wrapper")
            .is_some_and(|wrapper| dom.has_class(wrapper, "editable"));
        if editable {
            let value = dom.attr(editor, "value").unwrap_or_default().to_string();
            dom.set_text(editor, &value);
            record_snapshot(dom, editor, &value);
            refresh_history_buttons(dom);
        } else {
            let text = dom.own_text(editor).to_string();
            dom.set_attr(editor, "value", &text);
        }
    })?;
    comments_behaviour(dom)
}

// =============================================================================
// COMMENTS
// =============================================================================

type Mention = (String, String);

fn comment_content(text: &str, mentions: &[Mention]) -> MockNode {
    mentions.iter().fold(
        MockNode::new("div")
            .class("comment-content")
            .child(MockNode::new("span").class("comment-text").text(text)),
        |content, (id, name)| content.child(mention_link(id, name)),
    )
}

fn mention_link(id: &str, name: &str) -> MockNode {
    MockNode::new("a")
        .class("instance-link")
        .attr("data-mention-id", id)
        .attr("href", &format!("#/idoc/{id}"))
        .text(name)
}

fn comment_header() -> MockNode {
    MockNode::new("div")
        .class("comment-header")
        .child(MockNode::new("span").class("comment-author").text("admin"))
}

fn replies_label(count: usize) -> String {
    format!("Replies ({count})")
}

fn reply(text: &str, mentions: &[Mention]) -> MockNode {
    MockNode::new("div")
        .class("reply")
        .child(comment_header())
        .child(comment_content(text, mentions))
}

fn comment(text: &str, mentions: &[Mention], replies: &[&str]) -> MockNode {
    let thread = replies.iter().fold(
        MockNode::new("div").class("comment-replies").hidden(),
        |thread, text| thread.child(reply(text, &[])),
    );
    MockNode::new("div")
        .class("comment")
        .child(comment_header())
        .child(
            dropdown(
                "⋮",
                &[
                    ("edit-comment", "Edit"),
                    ("reply-comment", "Reply"),
                    ("delete-comment", "Delete"),
                ],
            )
            .class("comment-actions"),
        )
        .child(comment_content(text, mentions))
        .child(
            MockNode::new("a")
                .class("expand-comment")
                .text(&replies_label(replies.len())),
        )
        .child(thread)
}

fn comments_wrapper() -> MockNode {
    MockNode::new("div")
        .class("idoc-comments-wrapper")
        .child(
            MockNode::new("div").class("comments-toolbar").child(
                MockNode::new("button")
                    .class("btn btn-default create-comment")
                    .text("Comment"),
            ),
        )
        .child(
            MockNode::new("div")
                .class("comments")
                .child(comment("default comment", &[], &["default reply"])),
        )
}

fn open_comment_dialog(dom: &mut MockDom, mode: &str, target: NodeId, text: &str) {
    let title = match mode {
        "reply" => "Reply",
        "edit" => "Edit comment",
        _ => "Create comment",
    };
    let body = MockNode::new("div").child(
        MockNode::new("div")
            .class("comment-editor")
            .attr("contenteditable", "true")
            .value(text)
            .text(text),
    );
    let root = dom.root();
    let dialog = dom.append(
        root,
        modal("comment-dialog", title, body, &[("ok", "OK"), ("cancel", "Cancel")])
            .attr("data-mode", mode)
            .attr("data-target", &target.to_string()),
    );
    if text.trim().is_empty() {
        if let Some(ok) = dom.first_in(dialog, ".seip-btn-ok") {
            dom.set_flag(ok, "disabled", true);
        }
    }
}

fn suggestion(kind: &str, value: &str, label: &str, link: MockNode) -> MockNode {
    MockNode::new("li")
        .class("textcomplete-item")
        .attr("data-kind", kind)
        .attr("data-value", value)
        .attr("data-label", label)
        .child(link)
}

fn show_suggestions(dom: &mut MockDom, editor: NodeId) {
    if let Some(open) = dom.first("#textcomplete-dropdown-1") {
        dom.remove(open);
    }
    let value = dom.attr(editor, "value").unwrap_or_default().to_string();
    let token = value.rsplit(char::is_whitespace).next().unwrap_or_default();
    let items: Vec<MockNode> = if let Some(term) = token.strip_prefix('@') {
        let term = term.to_lowercase();
        USERS
            .iter()
            .filter(|(_, name, email)| name.to_lowercase().contains(&term) || email.contains(&term))
            .map(|(id, name, email)| {
                suggestion(
                    "mention",
                    id,
                    name,
                    MockNode::new("a")
                        .child(MockNode::new("span").class("mention-name").text(name))
                        .child(MockNode::new("span").class("mention-email").text(email)),
                )
            })
            .collect()
    } else if let Some(term) = token.strip_prefix(':').filter(|t| t.len() >= 2) {
        EMOJIS
            .iter()
            .filter(|(name, _)| name.starts_with(term))
            .map(|(name, emoji)| {
                suggestion(
                    "emoji",
                    emoji,
                    name,
                    MockNode::new("a").text(&format!("{emoji} :{name}:")),
                )
            })
            .collect()
    } else {
        Vec::new()
    };
    if items.is_empty() {
        return;
    }
    let root = dom.root();
    let _ = dom.append(
        root,
        MockNode::new("ul")
            .id("textcomplete-dropdown-1")
            .class("textcomplete-dropdown")
            .children(items),
    );
}

fn mentions_of(dom: &MockDom, editor: NodeId) -> Vec<Mention> {
    dom.attr(editor, "data-mentions")
        .unwrap_or_default()
        .split(';')
        .filter_map(|entry| entry.split_once('|'))
        .map(|(id, name)| (id.to_string(), name.to_string()))
        .collect()
}

fn submit_comment(dom: &mut MockDom, dialog: NodeId) {
    let Some(editor) = dom.first_in(dialog, ".comment-editor") else {
        return;
    };
    let mentions = mentions_of(dom, editor);
    let mut text = dom.attr(editor, "value").unwrap_or_default().to_string();
    for (_, name) in &mentions {
        text = text.replace(&format!("@{name}"), "");
    }
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mode = dom.attr(dialog, "data-mode").unwrap_or_default().to_string();
    let target: Option<NodeId> = dom.attr(dialog, "data-target").and_then(|t| t.parse().ok());
    dom.remove(dialog);
    let Some(target) = target.filter(|t| dom.contains(*t)) else {
        return;
    };

    match mode.as_str() {
        "edit" => {
            let Some(content) = dom.first_in(target, ".comment-content") else {
                return;
            };
            if let Some(span) = dom.first_in(content, ".comment-text") {
                dom.set_text(span, &text);
            }
            for link in dom.children(content) {
                if dom.has_class(link, "instance-link") {
                    dom.remove(link);
                }
            }
            for (id, name) in &mentions {
                let _ = dom.append(content, mention_link(id, name));
            }
        }
        "reply" => {
            let Some(thread) = dom.first_in(target, ".comment-replies") else {
                return;
            };
            let _ = dom.append(thread, reply(&text, &mentions));
            dom.add_class(target, "expanded");
            dom.set_hidden(thread, false);
            let count = dom.children(thread).len();
            if let Some(expand) = dom.first_in(target, ".expand-comment") {
                dom.set_text(expand, &replies_label(count));
            }
        }
        _ => {
            if let Some(list) = dom.first_in(target, ".comments") {
                let _ = dom.append(list, comment(&text, &mentions, &[]));
            }
        }
    }
    dom.log_event(format!("comment:{mode}"));
}

fn comments_behaviour(dom: &mut MockDom) -> E2eResult<()> {
    dropdown_behaviour(dom)?;

    dom.on_click(".create-comment", |dom, button| {
        if let Some(wrapper) = dom.closest(button, ".idoc-comments-wrapper") {
            open_comment_dialog(dom, "create", wrapper, "");
        }
    })?;
    dom.on_click(".comment-actions .edit-comment", |dom, item| {
        if let Some(comment) = dom.closest(item, ".comment") {
            let text = dom
                .first_in(comment, ".comment-text")
                .map(|span| dom.own_text(span).to_string())
                .unwrap_or_default();
            open_comment_dialog(dom, "edit", comment, &text);
        }
    })?;
    dom.on_click(".comment-actions .reply-comment", |dom, item| {
        if let Some(comment) = dom.closest(item, ".comment") {
            open_comment_dialog(dom, "reply", comment, "");
        }
    })?;
    dom.on_click(".comment-actions .delete-comment", |dom, item| {
        if let Some(comment) = dom.closest(item, ".comment") {
            show_confirmation(
                dom,
                "delete-comment",
                "Are you sure you want to delete this comment?",
                Some(comment),
            );
        }
    })?;
    on_confirmation(dom, "delete-comment", |dom, target| {
        if let Some(comment) = target {
            dom.remove(comment);
            dom.log_event("comment:delete");
        }
    })?;
    dom.on_click(".expand-comment", |dom, link| {
        let Some(comment) = dom.closest(link, ".comment") else {
            return;
        };
        let expanded = dom.toggle_class(comment, "expanded");
        for other in dom.select(".comment.expanded").unwrap_or_default() {
            if other != comment {
                dom.remove_class(other, "expanded");
                if let Some(thread) = dom.first_in(other, ".comment-replies") {
                    dom.set_hidden(thread, true);
                }
            }
        }
        if let Some(thread) = dom.first_in(comment, ".comment-replies") {
            dom.set_hidden(thread, !expanded);
        }
    })?;

    dom.on_input(".comment-dialog .comment-editor", |dom, editor| {
        let value = dom.attr(editor, "value").unwrap_or_default().to_string();
        dom.set_text(editor, &value);
        if let Some(ok) = dom
            .closest(editor, ".modal-dialog")
            .and_then(|dialog| dom.first_in(dialog, ".seip-btn-ok"))
        {
            dom.set_flag(ok, "disabled", value.trim().is_empty());
        }
        show_suggestions(dom, editor);
    })?;
    dom.on_click(".textcomplete-item", |dom, item| {
        let Some(editor) = dom.first(".comment-dialog .comment-editor") else {
            return;
        };
        let kind = dom.attr(item, "data-kind").unwrap_or_default().to_string();
        let value = dom.attr(item, "data-value").unwrap_or_default().to_string();
        let label = dom.attr(item, "data-label").unwrap_or_default().to_string();
        let current = dom.attr(editor, "value").unwrap_or_default().to_string();
        let mut text = current
            .trim_end_matches(|c: char| !c.is_whitespace())
            .to_string();
        if kind == "mention" {
            text.push_str(&format!("@{label} "));
            let mentions = match dom.attr(editor, "data-mentions") {
                Some(existing) if !existing.is_empty() => format!("{existing};{value}|{label}"),
                _ => format!("{value}|{label}"),
            };
            dom.set_attr(editor, "data-mentions", &mentions);
        } else {
            text.push_str(&value);
            text.push(' ');
        }
        dom.set_attr(editor, "value", &text);
        dom.dispatch_input(editor);
    })?;
    dom.on_click(".comment-dialog .seip-btn-ok", |dom, button| {
        if let Some(dialog) = dom.closest(button, ".modal-dialog") {
            submit_comment(dom, dialog);
        }
    })?;
    dom.on_click(".comment-dialog .seip-btn-cancel, .comment-dialog .close", |dom, button| {
        if let Some(dialog) = dom.closest(button, ".modal-dialog") {
            dom.remove(dialog);
        }
        if let Some(open) = dom.first("#textcomplete-dropdown-1") {
            dom.remove(open);
        }
    })
}

// =============================================================================
// DATATABLE WIDGET
// =============================================================================

const COLUMNS: [(&str, &str); 4] = [
    ("title", "Title"),
    ("status", "Status"),
    ("owner", "Owner"),
    ("type", "Type"),
];

const ROWS: [[&str; 4]; 5] = [
    ["Header-1", "Draft", "John Doe", "Document"],
    ["Header-2", "Approved", "Jane Doe", "Document"],
    ["Header-3", "Draft", "Jane Doe", "Project"],
    ["Header-4", "Rejected", "John Doe", "Case"],
    ["Header-5", "Approved", "John Doe", "Project"],
];

fn results_label(count: usize) -> String {
    format!("{count} results")
}

fn table_row(index: usize, row: &[&str; 4]) -> MockNode {
    row.iter().zip(COLUMNS).enumerate().fold(
        MockNode::new("div")
            .class("table-row")
            .attr("data-id", &format!("emf:row-{}", index + 1)),
        |tr, (column, (value, (property, _)))| {
            let cell = if column == 0 {
                MockNode::new("div").class("table-cell").child(
                    MockNode::new("span")
                        .class("instance-header")
                        .child(MockNode::new("a").class("instance-link").text(value)),
                )
            } else {
                MockNode::new("div").class("table-cell").child(
                    MockNode::new("div")
                        .class("form-group")
                        .id(&format!("{property}{}", index + 1))
                        .child(
                            MockNode::new("input")
                                .class("form-control")
                                .attr("type", "text")
                                .value(value),
                        ),
                )
            };
            tr.child(cell)
        },
    )
}

fn cell_value(dom: &MockDom, cell: NodeId) -> String {
    match dom.first_in(cell, "input") {
        Some(input) => dom.attr(input, "value").unwrap_or_default().to_string(),
        None => dom.text_content(cell).trim().to_string(),
    }
}

fn apply_table_filter(dom: &mut MockDom, widget: NodeId) {
    let filters: Vec<String> = dom
        .select_in(widget, ".table-filter .filter-cell input")
        .into_iter()
        .map(|input| dom.attr(input, "value").unwrap_or_default().trim().to_lowercase())
        .collect();
    let mut shown = 0;
    for row in dom.select_in(widget, ".table-body .table-row") {
        let cells = dom.children(row);
        let matches = filters.iter().enumerate().all(|(column, filter)| {
            filter.is_empty()
                || cells
                    .get(column)
                    .is_some_and(|cell| cell_value(dom, *cell).to_lowercase().contains(filter))
        });
        dom.set_hidden(row, !matches);
        if matches {
            shown += 1;
        }
    }
    if let Some(total) = dom.first_in(widget, ".total-results") {
        dom.set_text(total, &results_label(shown));
    }
}

/// Datatable widget with a filter row; Enter in a filter cell applies it
pub(super) fn mount_datatable_filter(dom: &mut MockDom, _location: &SandboxLocation) -> E2eResult<()> {
    let header = COLUMNS.iter().fold(
        MockNode::new("div").class("table-header"),
        |header, (_, label)| header.child(MockNode::new("div").class("header-cell").text(label)),
    );
    let filter = COLUMNS.iter().fold(
        MockNode::new("div").class("table-filter"),
        |filter, (property, label)| {
            filter.child(
                MockNode::new("div")
                    .class("filter-cell")
                    .attr("data-property", property)
                    .child(
                        MockNode::new("input")
                            .class("form-control")
                            .attr("type", "text")
                            .attr("placeholder", label),
                    ),
            )
        },
    );
    let body = ROWS.iter().enumerate().fold(
        MockNode::new("div").class("table-body"),
        |body, (i, row)| body.child(table_row(i, row)),
    );
    let root = dom.root();
    let _ = dom.append(
        root,
        MockNode::new("div")
            .class("datatable-widget")
            .child(
                MockNode::new("div")
                    .class("panel-heading")
                    .child(MockNode::new("span").class("widget-title").text("Documents")),
            )
            .child(header)
            .child(filter)
            .child(body)
            .child(
                MockNode::new("div")
                    .class("table-footer")
                    .child(MockNode::new("span").class("total-results").text(&results_label(ROWS.len()))),
            ),
    );
    dom.on_key(".datatable-widget .table-filter input", |dom, input, key| {
        if key != "Enter" {
            return;
        }
        if let Some(widget) = dom.closest(input, ".datatable-widget") {
            apply_table_filter(dom, widget);
            dom.log_event("datatable:filter");
        }
    })
}

// =============================================================================
// IMAGE WIDGET
// =============================================================================

const IMAGES: [&str; 3] = ["image-1.png", "image-2.png", "image-3.png"];
const ZOOM_STEP: i64 = 25;
const ZOOM_RANGE: (i64, i64) = (25, 200);

fn thumbnail_sources(dom: &MockDom, widget: NodeId) -> Vec<String> {
    dom.first_in(widget, ".image-thumbnails")
        .map(|list| {
            dom.children(list)
                .into_iter()
                .filter_map(|thumb| dom.attr(thumb, "data-src").map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn show_image(dom: &mut MockDom, widget: NodeId, index: usize) {
    let sources = thumbnail_sources(dom, widget);
    let Some(src) = sources.get(index).cloned() else {
        return;
    };
    dom.set_attr(widget, "data-index", &index.to_string());
    if let Some(image) = dom.first_in(widget, ".current-image") {
        dom.set_attr(image, "src", &src);
    }
    if let Some(counter) = dom.first_in(widget, ".image-counter") {
        dom.set_text(counter, &format!("{} / {}", index + 1, sources.len()));
    }
    if let Some(list) = dom.first_in(widget, ".image-thumbnails") {
        for thumb in dom.children(list) {
            if dom.attr(thumb, "data-src") == Some(src.as_str()) {
                dom.add_class(thumb, "active");
            } else {
                dom.remove_class(thumb, "active");
            }
        }
    }
}

fn current_index(dom: &MockDom, widget: NodeId) -> usize {
    dom.attr(widget, "data-index")
        .and_then(|i| i.parse().ok())
        .unwrap_or_default()
}

fn thumbnail(src: &str) -> MockNode {
    MockNode::new("li")
        .class("thumbnail")
        .attr("data-src", src)
        .child(MockNode::new("img").attr("src", src))
}

fn step_image(dom: &mut MockDom, button: NodeId, forward: bool) {
    let Some(widget) = dom.closest(button, ".image-widget") else {
        return;
    };
    let count = thumbnail_sources(dom, widget).len();
    if count == 0 {
        return;
    }
    let current = current_index(dom, widget);
    let next = if forward {
        (current + 1) % count
    } else {
        (current + count - 1) % count
    };
    show_image(dom, widget, next);
}

fn zoom(dom: &mut MockDom, button: NodeId, step: i64) {
    let Some(widget) = dom.closest(button, ".image-widget") else {
        return;
    };
    let level: i64 = dom
        .attr(widget, "data-zoom")
        .and_then(|z| z.parse().ok())
        .unwrap_or(100);
    let level = (level + step).clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
    dom.set_attr(widget, "data-zoom", &level.to_string());
    if let Some(image) = dom.first_in(widget, ".current-image") {
        dom.set_attr(image, "style", &format!("width: {level}%"));
    }
}

/// Image viewer with toolbar and reorderable thumbnails
pub(super) fn mount_image_widget(dom: &mut MockDom, _location: &SandboxLocation) -> E2eResult<()> {
    let toolbar = [
        ("zoom-in", "+"),
        ("zoom-out", "-"),
        ("prev-image", "‹"),
        ("next-image", "›"),
    ]
    .iter()
    .fold(MockNode::new("div").class("image-toolbar"), |toolbar, (class, label)| {
        toolbar.child(MockNode::new("button").class(&format!("btn {class}")).text(label))
    })
    .child(MockNode::new("span").class("image-counter"));
    let thumbnails = IMAGES.iter().fold(
        MockNode::new("ul").class("image-thumbnails"),
        |list, src| list.child(thumbnail(src)),
    );
    let root = dom.root();
    let widget = dom.append(
        root,
        MockNode::new("div")
            .class("image-widget")
            .attr("data-zoom", "100")
            .child(toolbar)
            .child(
                MockNode::new("div")
                    .class("image-viewer")
                    .child(MockNode::new("img").class("current-image")),
            )
            .child(thumbnails),
    );
    show_image(dom, widget, 0);

    dom.on_click(".image-widget .zoom-in", |dom, button| zoom(dom, button, ZOOM_STEP))?;
    dom.on_click(".image-widget .zoom-out", |dom, button| zoom(dom, button, -ZOOM_STEP))?;
    dom.on_click(".image-widget .next-image", |dom, button| step_image(dom, button, true))?;
    dom.on_click(".image-widget .prev-image", |dom, button| step_image(dom, button, false))?;
    dom.on_click(".image-thumbnails .thumbnail", |dom, thumb| {
        let Some(widget) = dom.closest(thumb, ".image-widget") else {
            return;
        };
        let src = dom.attr(thumb, "data-src").map(str::to_string);
        if let Some(index) = src.and_then(|src| {
            thumbnail_sources(dom, widget).iter().position(|s| *s == src)
        }) {
            show_image(dom, widget, index);
        }
    })?;
    dom.on_drop(".image-thumbnails .thumbnail", |dom, source, target| {
        let (Some(dragged), Some(widget), Some(list)) = (
            dom.closest(source, ".thumbnail"),
            dom.closest(target, ".image-widget"),
            dom.closest(target, ".image-thumbnails"),
        ) else {
            return;
        };
        let (Some(from), Some(to)) = (
            dom.attr(dragged, "data-src").map(str::to_string),
            dom.attr(target, "data-src").map(str::to_string),
        ) else {
            return;
        };
        if from == to {
            return;
        }
        let sources = thumbnail_sources(dom, widget);
        let current = sources.get(current_index(dom, widget)).cloned();
        // the dragged thumbnail takes the target's position
        let at = sources.iter().position(|s| *s == to).unwrap_or(sources.len());
        let mut order: Vec<String> = sources.into_iter().filter(|s| *s != from).collect();
        order.insert(at.min(order.len()), from.clone());
        dom.clear_children(list);
        for src in &order {
            let _ = dom.append(list, thumbnail(src));
        }
        let index = current
            .and_then(|current| order.iter().position(|s| *s == current))
            .unwrap_or_default();
        show_image(dom, widget, index);
        dom.log_event(format!("image:move:{from}->{to}"));
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn mounted(mount: fn(&mut MockDom, &SandboxLocation) -> E2eResult<()>, url: &str) -> MockDom {
        let mut dom = MockDom::new();
        mount(&mut dom, &SandboxLocation::parse(url)).unwrap();
        dom
    }

    mod idoc_page_tests {
        use super::*;

        #[test]
        fn test_mode_from_hash() {
            let dom = mounted(mount_idoc_page, "/sandbox/idoc/idoc-page#/emf:1?mode=edit");
            assert!(dom.first(".idoc-wrapper.idoc-mode-edit").is_some());
            assert!(dom.first(".seip-btn-save").is_some());
            let toolbar = dom.first("#idoc-editor-toolbar").unwrap();
            assert!(dom.is_displayed(toolbar));

            let dom = mounted(mount_idoc_page, "/sandbox/idoc/idoc-page#/emf:1?mode=preview");
            assert!(dom.first(".seip-action-editDetails").is_some());
            let toolbar = dom.first("#idoc-editor-toolbar").unwrap();
            assert!(!dom.is_displayed(toolbar));
        }

        #[test]
        fn test_cancel_restores_saved_content() {
            let mut dom = mounted(mount_idoc_page, "/sandbox/idoc/idoc-page#/emf:1?mode=edit");
            let editor = dom.first(".ck-editor").unwrap();
            dom.set_attr(editor, "value", "changed");
            dom.dispatch_input(editor);
            assert_eq!(dom.own_text(editor), "changed");
            let cancel = dom.first(".seip-btn-cancel").unwrap();
            dom.dispatch_click(cancel);
            assert_eq!(dom.own_text(editor), "Content of General");
            assert!(dom.first(".idoc-mode-preview").is_some());
        }

        #[test]
        fn test_undo_and_redo_walk_the_snapshots() {
            let mut dom = mounted(mount_idoc_page, "/sandbox/idoc/idoc-page#/emf:1?mode=edit");
            let editor = dom.first(".ck-editor").unwrap();
            let undo = dom.first(".cke_button__undo").unwrap();
            let redo = dom.first(".cke_button__redo").unwrap();
            assert!(dom.has_class(undo, "cke_button_disabled"));
            assert!(dom.has_class(redo, "cke_button_disabled"));

            for text in ["first", "second"] {
                dom.set_attr(editor, "value", text);
                dom.dispatch_input(editor);
            }
            assert!(dom.has_class(undo, "cke_button_off"));
            dom.dispatch_click(undo);
            assert_eq!(dom.own_text(editor), "first");
            assert!(dom.has_class(redo, "cke_button_off"));
            dom.dispatch_click(undo);
            assert_eq!(dom.own_text(editor), "Content of General");
            assert!(dom.has_class(undo, "cke_button_disabled"));
            dom.dispatch_click(undo);
            assert_eq!(dom.own_text(editor), "Content of General");

            dom.dispatch_click(redo);
            dom.set_attr(editor, "value", "branch");
            dom.dispatch_input(editor);
            assert!(dom.has_class(redo, "cke_button_disabled"));
            assert_eq!(dom.events().to_vec(), vec!["idoc:undo", "idoc:undo", "idoc:redo"]);
        }
    }

    mod comment_tests {
        use super::*;

        #[test]
        fn test_mention_suggestions_and_pick() {
            let mut dom = mounted(mount_idoc_page, "/sandbox/idoc/idoc-page#/emf:1?mode=preview");
            let create = dom.first(".create-comment").unwrap();
            dom.dispatch_click(create);
            let editor = dom.first(".comment-dialog .comment-editor").unwrap();
            dom.set_attr(editor, "value", "Hello @jane");
            dom.dispatch_input(editor);
            let items = dom.select("#textcomplete-dropdown-1 .textcomplete-item").unwrap();
            assert_eq!(items.len(), 1);
            dom.dispatch_click(items[0]);
            assert_eq!(dom.attr(editor, "value"), Some("Hello @Jane Doe "));
            let ok = dom.first(".comment-dialog .seip-btn-ok").unwrap();
            dom.dispatch_click(ok);
            let link = dom.select(".comments .instance-link").unwrap();
            assert_eq!(link.len(), 1);
            assert_eq!(dom.attr(link[0], "data-mention-id"), Some("emf:janedoe"));
            assert_eq!(dom.select(".comments > .comment").unwrap().len(), 2);
        }

        #[test]
        fn test_emoji_suggestion() {
            let mut dom = mounted(mount_idoc_page, "/sandbox/idoc/idoc-page#/emf:1?mode=preview");
            let create = dom.first(".create-comment").unwrap();
            dom.dispatch_click(create);
            let editor = dom.first(".comment-dialog .comment-editor").unwrap();
            dom.set_attr(editor, "value", ":smil");
            dom.dispatch_input(editor);
            let first = dom.first("#textcomplete-dropdown-1 .textcomplete-item").unwrap();
            assert_eq!(dom.attr(first, "data-value"), Some("😄"));
        }
    }

    mod widget_tests {
        use super::*;

        #[test]
        fn test_datatable_filter_hides_rows() {
            let mut dom = mounted(mount_datatable_filter, DATATABLE_FILTER);
            let input = dom.first(".filter-cell[data-property=status] input").unwrap();
            dom.set_attr(input, "value", "draft");
            dom.dispatch_key(input, "Enter");
            let visible = dom
                .select(".table-row")
                .unwrap()
                .into_iter()
                .filter(|row| dom.is_displayed(*row))
                .count();
            assert_eq!(visible, 2);
            let total = dom.first(".total-results").unwrap();
            assert_eq!(dom.own_text(total), "2 results");
        }

        #[test]
        fn test_image_drop_reorders() {
            let mut dom = mounted(mount_image_widget, IMAGE_WIDGET);
            let thumbs = dom.select(".thumbnail").unwrap();
            dom.dispatch_drop(thumbs[2], thumbs[0]);
            let widget = dom.first(".image-widget").unwrap();
            assert_eq!(
                thumbnail_sources(&dom, widget),
                vec!["image-3.png", "image-1.png", "image-2.png"]
            );
            let image = dom.first(".current-image").unwrap();
            assert_eq!(dom.attr(image, "src"), Some("image-1.png"));
        }

        #[test]
        fn test_forward_drop_takes_target_position() {
            let mut dom = mounted(mount_image_widget, IMAGE_WIDGET);
            let thumbs = dom.select(".thumbnail").unwrap();
            dom.dispatch_drop(thumbs[0], thumbs[2]);
            let widget = dom.first(".image-widget").unwrap();
            assert_eq!(
                thumbnail_sources(&dom, widget),
                vec!["image-2.png", "image-3.png", "image-1.png"]
            );
        }
    }
}
