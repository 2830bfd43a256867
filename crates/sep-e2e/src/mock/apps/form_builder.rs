//! Form builder sandbox with one instance of every control kind.

use super::select2::{self, Select2};
use crate::mock::dom::{MockDom, MockNode, NodeId};
use crate::mock::SandboxLocation;
use crate::result::E2eResult;
use chrono::{Datelike, Local};

pub(super) const ALL_CONTROLS: &str = "/sandbox/form-builder/all-controls";

fn label(text: &str, mandatory: bool) -> MockNode {
    MockNode::new("label")
        .text(text)
        .when(mandatory, |n| n.child(MockNode::new("sup").text("*")))
}

fn text_field(id: &str, caption: &str, value: &str) -> MockNode {
    MockNode::new("div")
        .id(id)
        .class("form-group")
        .child(label(caption, false))
        .child(
            MockNode::new("input")
                .class("form-control")
                .attr("type", "text")
                .value(value),
        )
        .child(MockNode::new("div").class("preview-field hidden").text(value))
}

fn choice(kind: &str, name: &str, value: &str, caption: &str) -> MockNode {
    MockNode::new("label").class(kind).children([
        MockNode::new("input")
            .attr("type", kind)
            .attr("name", name)
            .value(value),
        MockNode::new("i"),
        MockNode::new("span").text(caption),
    ])
}

fn radio_group(id: &str, name: &str) -> MockNode {
    ["COL1", "COL2", "COL3"].iter().fold(
        MockNode::new("div")
            .id(id)
            .class("form-group radio-group")
            .child(label("Columns", false)),
        |group, value| group.child(choice("radio", name, value, &format!("Column {}", &value[3..]))),
    )
}

fn datetime_field(id: &str) -> MockNode {
    MockNode::new("div")
        .id(id)
        .class("form-group datetime-field")
        .child(label("Due date", false))
        .child(
            MockNode::new("div")
                .class("input-group")
                .child(
                    MockNode::new("input")
                        .class("form-control")
                        .attr("type", "text"),
                )
                .child(
                    MockNode::new("span")
                        .class("input-group-addon")
                        .child(MockNode::new("i").class("fa fa-calendar")),
                ),
        )
}

fn datetime_widget(owner: &str) -> MockNode {
    let today = Local::now().day().to_string();
    MockNode::new("div")
        .class("bootstrap-datetimepicker-widget")
        .attr("data-owner", owner)
        .child(
            MockNode::new("div").class("datepicker").child(
                MockNode::new("table").child(
                    MockNode::new("tr")
                        .child(MockNode::new("td").class("day").text("1"))
                        .child(MockNode::new("td").class("day today").text(&today)),
                ),
            ),
        )
        .child(MockNode::new("a").attr("data-action", "togglePicker").text("Time"))
        .child(MockNode::new("a").attr("data-action", "clear").text("Clear"))
        .child(MockNode::new("div").class("timepicker hidden"))
}

fn picker_input(dom: &MockDom, node: NodeId) -> Option<(NodeId, NodeId)> {
    let widget = dom.closest(node, ".bootstrap-datetimepicker-widget")?;
    let owner = dom.attr(widget, "data-owner")?;
    let input = dom.first(&format!("#{owner} input"))?;
    Some((widget, input))
}

fn datetime_behaviour(dom: &mut MockDom) -> E2eResult<()> {
    dom.on_click(".datetime-field .input-group-addon", |dom, addon| {
        let Some(field) = dom.closest(addon, ".datetime-field") else {
            return;
        };
        let Some(owner) = dom.attr(field, "id").map(str::to_string) else {
            return;
        };
        for open in dom.select(".bootstrap-datetimepicker-widget").unwrap_or_default() {
            dom.remove(open);
        }
        let root = dom.root();
        let _ = dom.append(root, datetime_widget(&owner));
    })?;
    dom.on_click(".bootstrap-datetimepicker-widget .day.today", |dom, day| {
        if let Some((widget, input)) = picker_input(dom, day) {
            dom.set_attr(input, "value", &Local::now().format("%B/%-d/%Y").to_string());
            dom.dispatch_input(input);
            dom.remove(widget);
        }
    })?;
    dom.on_click(".bootstrap-datetimepicker-widget [data-action=clear]", |dom, clear| {
        if let Some((widget, input)) = picker_input(dom, clear) {
            dom.set_attr(input, "value", "");
            dom.dispatch_input(input);
            dom.remove(widget);
        }
    })?;
    dom.on_click(
        ".bootstrap-datetimepicker-widget [data-action=togglePicker]",
        |dom, toggle| {
            if let Some(time) = dom
                .closest(toggle, ".bootstrap-datetimepicker-widget")
                .and_then(|widget| dom.first_in(widget, ".timepicker"))
            {
                dom.remove_class(time, "hidden");
            }
        },
    )
}

/// Mount the all-controls form
pub(super) fn mount_all_controls(dom: &mut MockDom, _location: &SandboxLocation) -> E2eResult<()> {
    let root = dom.root();
    let form = dom.append(root, MockNode::new("form").class("form-builder").id("formWrapper"));

    let _ = dom.append(
        form,
        MockNode::new("div")
            .id("inputTextEdit")
            .class("form-group")
            .child(label("Title", true))
            .child(
                MockNode::new("input")
                    .class("form-control")
                    .attr("type", "text")
                    .value("Default text"),
            )
            .child(MockNode::new("div").class("preview-field hidden").text("Default text"))
            .child(MockNode::new("i").class("fa fa-info")),
    );
    let _ = dom.append(
        form,
        MockNode::new("div")
            .id("textareaEdit")
            .class("form-group")
            .child(label("Description", false))
            .child(MockNode::new("textarea").class("form-control")),
    );
    let _ = dom.append(
        form,
        MockNode::new("div")
            .id("inputTextDisabled")
            .class("form-group")
            .child(label("Identifier", false))
            .child(
                MockNode::new("input")
                    .class("form-control")
                    .attr("type", "text")
                    .value("Locked")
                    .disabled(),
            ),
    );
    let _ = dom.append(
        form,
        MockNode::new("div")
            .id("inputTextPreview")
            .class("form-group")
            .child(label("Name", false))
            .child(
                MockNode::new("input")
                    .class("form-control hidden")
                    .attr("type", "text")
                    .value("Preview text"),
            )
            .child(MockNode::new("div").class("preview-field").text("Preview text"))
            .child(MockNode::new("div").class("print-field hidden").text("Preview text")),
    );
    let _ = dom.append(
        form,
        MockNode::new("div")
            .id("inputTextInvalid")
            .class("form-group has-error")
            .child(label("Code", true))
            .child(MockNode::new("input").class("form-control").attr("type", "text"))
            .child(
                MockNode::new("div")
                    .class("messages")
                    .child(MockNode::new("div").class("message").text("Invalid value")),
            ),
    );
    let _ = dom.append(form, datetime_field("datetimeEdit"));
    let _ = dom.append(
        form,
        MockNode::new("div")
            .id("checkboxEdit")
            .class("form-group")
            .child(label("Confidential", false))
            .child(choice("checkbox", "checkboxEdit", "true", "Confidential")),
    );

    let checked_group = dom.append(form, radio_group("radioButtonGroupEdit", "columns"));
    if let Some(first) = dom.first_in(checked_group, "input[value=COL1]") {
        dom.set_flag(first, "checked", true);
    }
    let disabled_group = dom.append(form, radio_group("radioButtonGroupDisabled", "locked"));
    for radio in dom.select("#radioButtonGroupDisabled input").unwrap_or_default() {
        dom.set_flag(radio, "disabled", true);
    }
    if let Some(first) = dom.first_in(disabled_group, "input") {
        dom.set_flag(first, "checked", true);
    }

    let codelist = ["CL1", "CL2", "CL3"].iter().enumerate().fold(
        MockNode::new("div").class("edit-field"),
        |edit, (i, value)| edit.child(choice("checkbox", "codelist", value, &format!("Codelist {}", i + 1))),
    );
    let _ = dom.append(
        form,
        MockNode::new("div")
            .id("codelistListEdit")
            .class("form-group")
            .child(label("Categories", false))
            .child(codelist)
            .child(
                MockNode::new("div").class("preview-field hidden").child(
                    MockNode::new("label").child(MockNode::new("span").text("Codelist 1")),
                ),
            ),
    );

    let _ = Select2::single("singleSelectEdit")
        .label("Type")
        .placeholder("Select value")
        .option("DT210099", "Document")
        .option("CH210001", "Chapter")
        .option("OT210027", "Other")
        .disabled_option("AR000001", "Archived")
        .mount(dom, form);
    let _ = Select2::multiple("multiSelectEdit")
        .label("Types")
        .option("DT210099", "Document")
        .option("CH210001", "Chapter")
        .option("OT210027", "Other")
        .mount(dom, form);
    let _ = Select2::tags("tagSelectEdit").label("Keywords").mount(dom, form);
    let _ = Select2::tree("treeSelectEdit")
        .label("Category")
        .option("documents", "Documents")
        .child_option("invoice", "Invoice", "documents")
        .child_option("contract", "Contract", "documents")
        .option("projects", "Projects")
        .mount(dom, form);

    let _ = dom.append(
        form,
        MockNode::new("div")
            .id("generalRegion")
            .class("panel region")
            .child(MockNode::new("div").class("panel-heading").text("General"))
            .child(
                MockNode::new("div")
                    .class("panel-body")
                    .child(text_field("regionTitle", "Title", "Region title"))
                    .child(text_field("regionOwner", "Owner", "John Doe")),
            ),
    );
    let _ = dom.append(
        form,
        MockNode::new("button")
            .class("btn btn-primary form-save-btn")
            .text("Save")
            .disabled(),
    );

    select2::behaviour(dom)?;
    datetime_behaviour(dom)
}
