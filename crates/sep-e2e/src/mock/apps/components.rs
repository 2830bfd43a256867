//! Sandboxes for the generic components.

use super::{
    dropdown, dropdown_behaviour, modal, on_confirmation, show_confirmation, show_toast,
    toast_behaviour,
};
use crate::mock::dom::{MockDom, MockNode};
use crate::mock::SandboxLocation;
use crate::result::E2eResult;

pub(super) const COLLAPSIBLE: &str = "/sandbox/components/collapsible";
pub(super) const DIALOG: &str = "/sandbox/components/dialog";
pub(super) const DROPDOWN_MENU: &str = "/sandbox/components/dropdown-menu";

fn section(id: &str, title: &str, expanded: bool) -> MockNode {
    MockNode::new("div")
        .class("panel panel-default")
        .child(
            MockNode::new("div").class("panel-heading").child(
                MockNode::new("a")
                    .attr("data-toggle", "collapse")
                    .attr("data-target", &format!("#{id}"))
                    .text(title),
            ),
        )
        .child(
            MockNode::new("div")
                .id(id)
                .class("panel-collapse collapse")
                .when(expanded, |n| n.class("in"))
                .child(MockNode::new("div").class("panel-body").text(&format!("{title} content"))),
        )
}

/// Two panels, the first collapsed and the second expanded
pub(super) fn mount_collapsible(dom: &mut MockDom, _location: &SandboxLocation) -> E2eResult<()> {
    let root = dom.root();
    let _ = dom.append(
        root,
        MockNode::new("div")
            .class("panel-group")
            .child(section("first-section-collapse", "First section", false))
            .child(section("second-section-collapse", "Second section", true)),
    );
    dom.on_click("[data-toggle=collapse]", |dom, trigger| {
        if let Some(panel) = dom
            .attr(trigger, "data-target")
            .map(str::to_string)
            .and_then(|target| dom.first(&target))
        {
            let _ = dom.toggle_class(panel, "in");
        }
    })
}

/// Buttons opening a dialog, a confirmation and a toast, plus a tab strip
pub(super) fn mount_dialog(dom: &mut MockDom, _location: &SandboxLocation) -> E2eResult<()> {
    let root = dom.root();
    let tabs = ["Details", "Relations", "History"].iter().enumerate().fold(
        MockNode::new("ul").class("nav nav-tabs"),
        |tabs, (i, title)| {
            tabs.child(
                MockNode::new("li")
                    .when(i == 0, |n| n.class("active"))
                    .child(MockNode::new("a").text(title)),
            )
        },
    );
    let _ = dom.append(
        root,
        MockNode::new("div")
            .class("dialog-sandbox")
            .child(MockNode::new("button").class("btn open-dialog").text("Open dialog"))
            .child(
                MockNode::new("button")
                    .class("btn open-confirmation")
                    .text("Open confirmation"),
            )
            .child(MockNode::new("button").class("btn notify-success").text("Notify"))
            .child(tabs),
    );

    dom.on_click(".open-dialog", |dom, _| {
        let root = dom.root();
        let _ = dom.append(
            root,
            modal(
                "sandbox-dialog",
                "Sandbox dialog",
                MockNode::new("div").text("Dialog content"),
                &[("ok", "OK"), ("cancel", "Cancel")],
            ),
        );
    })?;
    for (selector, event) in [
        (".sandbox-dialog .seip-btn-ok", "dialog:ok"),
        (".sandbox-dialog .seip-btn-cancel", "dialog:cancel"),
        (".sandbox-dialog .close", "dialog:close"),
    ] {
        dom.on_click(selector, move |dom, button| {
            dom.log_event(event);
            if let Some(dialog) = dom.closest(button, ".modal-dialog") {
                dom.remove(dialog);
            }
        })?;
    }

    dom.on_click(".open-confirmation", |dom, _| {
        show_confirmation(dom, "sandbox", "Are you sure?", None);
    })?;
    dom.on_click(".confirmation .seip-btn-no", |dom, _| {
        dom.log_event("confirmation:no");
    })?;
    on_confirmation(dom, "sandbox", |dom, _| dom.log_event("confirmation:yes"))?;

    dom.on_click(".notify-success", |dom, _| show_toast(dom, "success", "Saved"))?;
    toast_behaviour(dom)?;

    dom.on_click(".nav-tabs li a", |dom, link| {
        let Some(tab) = dom.parent(link) else {
            return;
        };
        if let Some(strip) = dom.parent(tab) {
            for sibling in dom.children(strip) {
                dom.remove_class(sibling, "active");
            }
        }
        dom.add_class(tab, "active");
    })
}

/// A single actions dropdown logging the picked item
pub(super) fn mount_dropdown_menu(dom: &mut MockDom, _location: &SandboxLocation) -> E2eResult<()> {
    let root = dom.root();
    let _ = dom.append(
        root,
        dropdown(
            "Actions",
            &[("action-edit", "Edit"), ("action-lock", "Lock"), ("action-delete", "Delete")],
        )
        .id("actions-menu"),
    );
    dropdown_behaviour(dom)?;
    dom.on_click("#actions-menu .dropdown-menu li a", |dom, item| {
        let label = dom.own_text(item).trim().to_string();
        dom.log_event(format!("action:{label}"));
    })
}
