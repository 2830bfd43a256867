//! Administration sandboxes.

use super::{modal, show_toast, toast_behaviour};
use crate::mock::dom::{MockDom, MockNode};
use crate::mock::SandboxLocation;
use crate::result::E2eResult;

pub(super) const MODEL_IMPORT: &str = "/sandbox/administration/model-import";

const IMPORT_ERROR: &str = "Something went wrong while importing models";

/// Model import panel; `fail` and `hasErrors` hash flags drive the outcome
pub(super) fn mount_model_import(dom: &mut MockDom, location: &SandboxLocation) -> E2eResult<()> {
    let fail = location.flag("fail");
    let has_errors = location.flag("hasErrors");

    let root = dom.root();
    let _ = dom.append(
        root,
        MockNode::new("div")
            .class("model-import")
            .child(MockNode::new("h3").text("Import models"))
            .child(
                MockNode::new("input")
                    .class("file-input")
                    .attr("type", "file")
                    .attr("multiple", "true"),
            )
            .child(MockNode::new("ul").class("selected-files"))
            .child(
                MockNode::new("button")
                    .class("btn btn-primary import-btn")
                    .text("Import")
                    .disabled(),
            ),
    );

    dom.on_input(".model-import .file-input", |dom, input| {
        let value = dom.attr(input, "value").unwrap_or_default().to_string();
        let Some(list) = dom.first(".selected-files") else {
            return;
        };
        dom.clear_children(list);
        let mut selected = 0;
        for path in value.lines().map(str::trim).filter(|p| !p.is_empty()) {
            let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
            let _ = dom.append(list, MockNode::new("li").class("selected-file").text(name));
            selected += 1;
        }
        if let Some(button) = dom.first(".import-btn") {
            dom.set_flag(button, "disabled", selected == 0);
        }
    })?;

    dom.on_click(".model-import .import-btn", move |dom, _| {
        let files: Vec<String> = dom
            .select(".selected-file")
            .unwrap_or_default()
            .into_iter()
            .map(|file| dom.own_text(file).to_string())
            .collect();
        dom.log_event(format!("import:{}", files.join(",")));
        if fail {
            let body = if has_errors {
                MockNode::new("div").text(IMPORT_ERROR)
            } else {
                MockNode::new("div")
            };
            let root = dom.root();
            let _ = dom.append(
                root,
                modal("import-result", "Import failed", body, &[("ok", "OK")]),
            );
        } else {
            show_toast(dom, "success", "Models imported successfully");
        }
    })?;
    dom.on_click(".import-result .seip-btn-ok, .import-result .close", |dom, button| {
        if let Some(dialog) = dom.closest(button, ".modal-dialog") {
            dom.remove(dialog);
        }
    })?;
    toast_behaviour(dom)
}
