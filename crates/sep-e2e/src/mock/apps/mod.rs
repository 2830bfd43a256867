//! Built-in sandbox applications served by [`MockDriver`].
//!
//! Each application mounts a static view plus the behaviours the page
//! objects rely on. Shared widgets (modals, toasts, bootstrap dropdowns and
//! select2 menus) are built by the helpers in this module.

mod administration;
mod components;
mod form_builder;
mod idoc;
mod model_management;
mod search;
mod select2;

use super::dom::{MockDom, MockNode, NodeId};
use super::MockDriver;
use crate::result::E2eResult;

/// Register every built-in sandbox route on `driver`
pub fn register_sandbox_apps(driver: &MockDriver) {
    driver.route(form_builder::ALL_CONTROLS, form_builder::mount_all_controls);
    driver.route(components::COLLAPSIBLE, components::mount_collapsible);
    driver.route(components::DIALOG, components::mount_dialog);
    driver.route(components::DROPDOWN_MENU, components::mount_dropdown_menu);
    driver.route(administration::MODEL_IMPORT, administration::mount_model_import);
    driver.route(
        model_management::MODEL_MANAGEMENT,
        model_management::mount_model_management,
    );
    driver.route(idoc::IDOC_PAGE, idoc::mount_idoc_page);
    driver.route(idoc::DATATABLE_FILTER, idoc::mount_datatable_filter);
    driver.route(idoc::IMAGE_WIDGET, idoc::mount_image_widget);
    driver.route(search::BASIC_SEARCH, search::mount_basic_search);
    driver.route(search::OBJECT_TYPE_SELECT, search::mount_object_type_select);
    driver.route(search::ADVANCED_SEARCH, search::mount_advanced_search);
}

// =============================================================================
// MODALS AND TOASTS
// =============================================================================

/// Bootstrap modal with a title, body and `seip-btn-<name>` footer buttons
pub(super) fn modal(class: &str, title: &str, body: MockNode, buttons: &[(&str, &str)]) -> MockNode {
    let footer = buttons.iter().fold(
        MockNode::new("div").class("modal-footer"),
        |footer, (name, label)| {
            footer.child(
                MockNode::new("button")
                    .class(&format!("btn seip-btn-{name}"))
                    .text(label),
            )
        },
    );
    MockNode::new("div")
        .class(&format!("modal-dialog {class}").trim().to_string())
        .child(
            MockNode::new("div")
                .class("modal-content")
                .child(
                    MockNode::new("div")
                        .class("modal-header")
                        .child(MockNode::new("button").class("close").text("×"))
                        .child(MockNode::new("h4").class("modal-title").text(title)),
                )
                .child(body.class("modal-body"))
                .child(footer),
        )
}

/// Show a yes/no confirmation for `action`, remembering `target`
pub(super) fn show_confirmation(dom: &mut MockDom, action: &str, message: &str, target: Option<NodeId>) {
    let root = dom.root();
    let popup = modal(
        "confirmation",
        "Confirm",
        MockNode::new("div").text(message),
        &[("yes", "Yes"), ("no", "No")],
    )
    .attr("data-action", action);
    let popup = match target {
        Some(target) => popup.attr("data-target", &target.to_string()),
        None => popup,
    };
    let _ = dom.append(root, popup);
}

/// Run `on_yes` with the remembered target when `action` is confirmed;
/// either answer closes the popup
pub(super) fn on_confirmation(
    dom: &mut MockDom,
    action: &str,
    on_yes: impl Fn(&mut MockDom, Option<NodeId>) + Send + Sync + 'static,
) -> E2eResult<()> {
    let scope = format!(".confirmation[data-action=\"{action}\"]");
    dom.on_click(&format!("{scope} .seip-btn-yes"), move |dom, button| {
        if let Some(popup) = dom.closest(button, ".modal-dialog") {
            let target = dom.attr(popup, "data-target").and_then(|t| t.parse().ok());
            dom.remove(popup);
            on_yes(dom, target);
        }
    })?;
    dom.on_click(&format!("{scope} .seip-btn-no, {scope} .close"), |dom, button| {
        if let Some(popup) = dom.closest(button, ".modal-dialog") {
            dom.remove(popup);
        }
    })
}

/// Append a toast notification
pub(super) fn show_toast(dom: &mut MockDom, kind: &str, message: &str) {
    let container = match dom.first("#toast-container") {
        Some(container) => container,
        None => {
            let root = dom.root();
            dom.append(root, MockNode::new("div").id("toast-container"))
        }
    };
    let _ = dom.append(
        container,
        MockNode::new("div")
            .class(&format!("toast toast-{kind}"))
            .child(MockNode::new("button").class("toast-close-button").text("×"))
            .child(MockNode::new("div").class("toast-message").text(message)),
    );
}

/// Close buttons on toasts
pub(super) fn toast_behaviour(dom: &mut MockDom) -> E2eResult<()> {
    dom.on_click(".toast-close-button", |dom, button| {
        if let Some(toast) = dom.closest(button, ".toast") {
            dom.remove(toast);
        }
    })
}

// =============================================================================
// BOOTSTRAP DROPDOWNS
// =============================================================================

/// Dropdown with a toggle and one menu item per `(class, label)`
pub(super) fn dropdown(toggle: &str, items: &[(&str, &str)]) -> MockNode {
    let menu = items.iter().fold(
        MockNode::new("ul").class("dropdown-menu").hidden(),
        |menu, (class, label)| {
            menu.child(MockNode::new("li").child(MockNode::new("a").class(class).text(label)))
        },
    );
    MockNode::new("div")
        .class("dropdown")
        .child(MockNode::new("a").class("dropdown-toggle").text(toggle))
        .child(menu)
}

fn set_dropdown_open(dom: &mut MockDom, dropdown: NodeId, open: bool) {
    if open {
        dom.add_class(dropdown, "open");
    } else {
        dom.remove_class(dropdown, "open");
    }
    if let Some(menu) = dom.first_in(dropdown, ".dropdown-menu") {
        dom.set_hidden(menu, !open);
    }
}

/// Toggle on `.dropdown-toggle`; picking an item closes the menu
pub(super) fn dropdown_behaviour(dom: &mut MockDom) -> E2eResult<()> {
    dom.on_click(".dropdown-toggle", |dom, toggle| {
        if let Some(dropdown) = dom.closest(toggle, ".dropdown") {
            let open = !dom.has_class(dropdown, "open");
            set_dropdown_open(dom, dropdown, open);
        }
    })?;
    dom.on_click(".dropdown-menu li a", |dom, item| {
        if let Some(dropdown) = dom.closest(item, ".dropdown") {
            set_dropdown_open(dom, dropdown, false);
        }
    })
}
