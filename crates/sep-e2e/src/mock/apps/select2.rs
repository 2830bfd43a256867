//! select2 markup and behaviour.
//!
//! The native `<select>` holds the model; the rendered selection is rebuilt
//! from it after every change. The options dropdown is appended to the body
//! and points back at its field through `data-owner`.

use crate::mock::dom::{MockDom, MockNode, NodeId};
use crate::result::E2eResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Single,
    Multiple,
    Tags,
    Tree,
}

impl Mode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
            Self::Tags => "tags",
            Self::Tree => "tree",
        }
    }

    fn of(dom: &MockDom, wrapper: NodeId) -> Self {
        match dom.attr(wrapper, "data-select2") {
            Some("multiple") => Self::Multiple,
            Some("tags") => Self::Tags,
            Some("tree") => Self::Tree,
            _ => Self::Single,
        }
    }
}

#[derive(Debug, Clone)]
struct Choice {
    value: String,
    label: String,
    selected: bool,
    disabled: bool,
    parent: Option<String>,
}

/// select2 field builder
#[derive(Debug, Clone)]
pub(super) struct Select2 {
    id: String,
    mode: Mode,
    label: Option<String>,
    placeholder: Option<String>,
    disabled: bool,
    choices: Vec<Choice>,
}

impl Select2 {
    fn new(id: &str, mode: Mode) -> Self {
        Self {
            id: id.to_string(),
            mode,
            label: None,
            placeholder: None,
            disabled: false,
            choices: Vec::new(),
        }
    }

    pub(super) fn single(id: &str) -> Self {
        Self::new(id, Mode::Single)
    }

    pub(super) fn multiple(id: &str) -> Self {
        Self::new(id, Mode::Multiple)
    }

    pub(super) fn tags(id: &str) -> Self {
        Self::new(id, Mode::Tags)
    }

    pub(super) fn tree(id: &str) -> Self {
        Self::new(id, Mode::Tree)
    }

    pub(super) fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub(super) fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub(super) const fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    fn push(mut self, value: &str, label: &str, selected: bool, disabled: bool, parent: Option<&str>) -> Self {
        self.choices.push(Choice {
            value: value.to_string(),
            label: label.to_string(),
            selected,
            disabled,
            parent: parent.map(str::to_string),
        });
        self
    }

    pub(super) fn option(self, value: &str, label: &str) -> Self {
        self.push(value, label, false, false, None)
    }

    pub(super) fn selected_option(self, value: &str, label: &str) -> Self {
        self.push(value, label, true, false, None)
    }

    pub(super) fn disabled_option(self, value: &str, label: &str) -> Self {
        self.push(value, label, false, true, None)
    }

    pub(super) fn child_option(self, value: &str, label: &str, parent: &str) -> Self {
        self.push(value, label, false, false, Some(parent))
    }

    fn node(&self) -> MockNode {
        let select = self.choices.iter().fold(
            MockNode::new("select")
                .class("seip-select")
                .when(self.mode != Mode::Single, |n| n.attr("multiple", ""))
                .when(self.disabled, MockNode::disabled),
            |select, choice| {
                let option = MockNode::new("option")
                    .value(&choice.value)
                    .text(&choice.label)
                    .when(choice.selected, |n| n.attr("selected", ""))
                    .when(choice.disabled, MockNode::disabled);
                let option = match &choice.parent {
                    Some(parent) => option.attr("data-parent", parent),
                    None => option,
                };
                select.child(option)
            },
        );
        let rendered = if self.mode == Mode::Single {
            MockNode::new("span").class("select2-selection__rendered")
        } else {
            MockNode::new("ul").class("select2-selection__rendered")
        };
        let selection = MockNode::new("span")
            .class(&format!("select2-selection select2-selection--{}", if self.mode == Mode::Single { "single" } else { "multiple" }))
            .child(rendered)
            .when(self.mode == Mode::Single, |n| {
                n.child(MockNode::new("span").class("select2-selection__arrow"))
            });
        let wrapper = MockNode::new("div")
            .id(&self.id)
            .class("form-group select2-field")
            .attr("data-select2", self.mode.as_str());
        let wrapper = match &self.label {
            Some(label) => wrapper.child(MockNode::new("label").text(label)),
            None => wrapper,
        };
        let wrapper = match &self.placeholder {
            Some(placeholder) => wrapper.attr("data-placeholder", placeholder),
            None => wrapper,
        };
        wrapper.child(select).child(
            MockNode::new("span")
                .class("select2 select2-container")
                .when(self.disabled, |n| n.class("select2-container--disabled"))
                .child(selection),
        )
    }

    /// Append the field under `parent` and render its selection
    pub(super) fn mount(&self, dom: &mut MockDom, parent: NodeId) -> NodeId {
        let wrapper = dom.append(parent, self.node());
        render(dom, wrapper);
        wrapper
    }
}

fn options(dom: &MockDom, wrapper: NodeId) -> Vec<NodeId> {
    dom.select_in(wrapper, "select option")
}

fn label_of(dom: &MockDom, option: NodeId) -> String {
    dom.own_text(option).trim().to_string()
}

fn dropdown_of(dom: &MockDom, owner: &str) -> Option<NodeId> {
    dom.first(&format!(".select2-dropdown-wrapper[data-owner=\"{owner}\"]"))
}

/// Rebuild the rendered selection from the native options
fn render(dom: &mut MockDom, wrapper: NodeId) {
    let (Some(selection), Some(rendered)) = (
        dom.first_in(wrapper, ".select2-selection"),
        dom.first_in(wrapper, ".select2-selection__rendered"),
    ) else {
        return;
    };
    dom.clear_children(rendered);
    dom.set_text(rendered, "");
    if let Some(clear) = dom.first_in(selection, ".select2-selection__clear") {
        dom.remove(clear);
    }
    let selected: Vec<String> = options(dom, wrapper)
        .into_iter()
        .filter(|option| dom.is_selected(*option))
        .map(|option| label_of(dom, option))
        .collect();

    if Mode::of(dom, wrapper) == Mode::Single {
        match selected.first() {
            Some(label) => {
                dom.set_text(rendered, label);
                let _ = dom.append(
                    selection,
                    MockNode::new("span").class("select2-selection__clear").text("×"),
                );
            }
            None => {
                if let Some(placeholder) = dom.attr(wrapper, "data-placeholder").map(str::to_string) {
                    let _ = dom.append(
                        rendered,
                        MockNode::new("span")
                            .class("select2-selection__placeholder")
                            .text(&placeholder),
                    );
                }
            }
        }
        return;
    }

    for label in &selected {
        let _ = dom.append(
            rendered,
            MockNode::new("li")
                .class("select2-selection__choice")
                .attr("title", label)
                .child(
                    MockNode::new("span")
                        .class("select2-selection__choice__remove")
                        .text("×"),
                )
                .child(MockNode::new("span").text(label)),
        );
    }
    let _ = dom.append(
        rendered,
        MockNode::new("li")
            .class("select2-search select2-search--inline")
            .child(
                MockNode::new("input")
                    .class("select2-search__field")
                    .attr("type", "search"),
            ),
    );
}

/// Select only the option with `value` and re-render
pub(super) fn select_value(dom: &mut MockDom, wrapper: NodeId, value: &str) {
    select_values(dom, wrapper, &[value]);
}

/// Select exactly the options whose value is in `values` and re-render
pub(super) fn select_values(dom: &mut MockDom, wrapper: NodeId, values: &[&str]) {
    for option in options(dom, wrapper) {
        let on = dom.attr(option, "value").is_some_and(|v| values.contains(&v));
        dom.set_flag(option, "selected", on);
    }
    render(dom, wrapper);
}

/// Values of the selected options, in option order
pub(super) fn selected_values(dom: &MockDom, wrapper: NodeId) -> Vec<String> {
    options(dom, wrapper)
        .into_iter()
        .filter(|option| dom.is_selected(*option))
        .filter_map(|option| dom.attr(option, "value").map(str::to_string))
        .collect()
}

/// Re-render and let the app observe the change on the native select
fn changed(dom: &mut MockDom, wrapper: NodeId) {
    render(dom, wrapper);
    if let Some(select) = dom.first_in(wrapper, "select") {
        dom.dispatch_input(select);
    }
}

fn open_dropdown(dom: &mut MockDom, wrapper: NodeId) {
    let Some(owner) = dom.attr(wrapper, "id").map(str::to_string) else {
        return;
    };
    for other in dom.select(".select2-dropdown-wrapper").unwrap_or_default() {
        dom.remove(other);
    }
    let all = options(dom, wrapper);
    let parents: Vec<String> = all
        .iter()
        .filter_map(|option| dom.attr(*option, "data-parent").map(str::to_string))
        .collect();
    let mut results = MockNode::new("ul").class("select2-results__options");
    for option in all {
        let value = dom.attr(option, "value").unwrap_or_default().to_string();
        let mut item = MockNode::new("li")
            .class("select2-results__option")
            .attr("aria-selected", if dom.is_selected(option) { "true" } else { "false" })
            .when(!dom.is_enabled(option), |n| n.attr("aria-disabled", "true"));
        if let Some(parent) = dom.attr(option, "data-parent") {
            item = item.attr("data-parent", parent).hidden();
        }
        if parents.contains(&value) {
            item = item
                .class("tree-node")
                .child(MockNode::new("i").class("tree-toggle").text("+"));
        }
        results = results.child(item.child(
            MockNode::new("span")
                .attr("data-value", &value)
                .text(&label_of(dom, option)),
        ));
    }
    let single = Mode::of(dom, wrapper) == Mode::Single;
    let dropdown = MockNode::new("span")
        .class("select2-container select2-container--open select2-dropdown-wrapper")
        .attr("data-owner", &owner)
        .child(
            MockNode::new("span")
                .class("select2-dropdown")
                .when(single, |n| {
                    n.child(
                        MockNode::new("span")
                            .class("select2-search select2-search--dropdown")
                            .child(
                                MockNode::new("input")
                                    .class("select2-search__field")
                                    .attr("type", "search"),
                            ),
                    )
                })
                .child(MockNode::new("span").class("select2-results").child(results)),
        );
    let root = dom.root();
    let _ = dom.append(root, dropdown);
}

fn pick(dom: &mut MockDom, item: NodeId) {
    if dom.attr(item, "aria-disabled") == Some("true") {
        return;
    }
    let Some(container) = dom.closest(item, ".select2-dropdown-wrapper") else {
        return;
    };
    let Some(wrapper) = dom
        .attr(container, "data-owner")
        .map(|owner| format!("#{owner}"))
        .and_then(|css| dom.first(&css))
    else {
        return;
    };
    let Some(value) = dom
        .first_in(item, "span[data-value]")
        .and_then(|span| dom.attr(span, "data-value"))
        .map(str::to_string)
    else {
        return;
    };
    let single = Mode::of(dom, wrapper) == Mode::Single;
    for option in options(dom, wrapper) {
        if dom.attr(option, "value") == Some(value.as_str()) {
            let on = single || !dom.is_selected(option);
            dom.set_flag(option, "selected", on);
        } else if single {
            dom.set_flag(option, "selected", false);
        }
    }
    dom.remove(container);
    changed(dom, wrapper);
}

/// Register the select2 interactions
pub(super) fn behaviour(dom: &mut MockDom) -> E2eResult<()> {
    dom.on_click(".select2-selection__clear", |dom, clear| {
        dom.stop_propagation();
        if let Some(wrapper) = dom.closest(clear, ".select2-field") {
            for option in options(dom, wrapper) {
                dom.set_flag(option, "selected", false);
            }
            changed(dom, wrapper);
        }
    })?;
    dom.on_click(".select2-selection__choice__remove", |dom, remove| {
        dom.stop_propagation();
        let Some(choice) = dom.closest(remove, ".select2-selection__choice") else {
            return;
        };
        let title = dom.attr(choice, "title").unwrap_or_default().to_string();
        if let Some(wrapper) = dom.closest(choice, ".select2-field") {
            for option in options(dom, wrapper) {
                if label_of(dom, option) == title {
                    dom.set_flag(option, "selected", false);
                }
            }
            changed(dom, wrapper);
        }
    })?;
    dom.on_click(".select2-selection", |dom, selection| {
        let Some(wrapper) = dom.closest(selection, ".select2-field") else {
            return;
        };
        if dom.first_in(wrapper, "select[disabled]").is_some() {
            return;
        }
        let owner = dom.attr(wrapper, "id").unwrap_or_default().to_string();
        match dropdown_of(dom, &owner) {
            Some(open) => dom.remove(open),
            None => open_dropdown(dom, wrapper),
        }
    })?;
    dom.on_click(".tree-toggle", |dom, toggle| {
        dom.stop_propagation();
        let Some(item) = dom.closest(toggle, ".select2-results__option") else {
            return;
        };
        let Some(value) = dom
            .first_in(item, "span[data-value]")
            .and_then(|span| dom.attr(span, "data-value"))
            .map(str::to_string)
        else {
            return;
        };
        let expanded = dom.toggle_class(item, "expanded");
        let children = dom
            .select(&format!(".select2-results__option[data-parent=\"{value}\"]"))
            .unwrap_or_default();
        for child in children {
            dom.set_hidden(child, !expanded);
        }
    })?;
    dom.on_click(".select2-results__option", pick)?;
    dom.on_input(".select2-search--dropdown .select2-search__field", |dom, input| {
        let term = dom.attr(input, "value").unwrap_or_default().to_lowercase();
        let Some(container) = dom.closest(input, ".select2-dropdown-wrapper") else {
            return;
        };
        for item in dom.select_in(container, ".select2-results__option") {
            let matches = dom.text_content(item).to_lowercase().contains(&term);
            dom.set_hidden(item, !matches);
        }
    })?;
    dom.on_key(
        ".select2-field[data-select2=tags] .select2-search__field",
        |dom, input, key| {
            if key != "Enter" {
                return;
            }
            let value = dom.attr(input, "value").unwrap_or_default().trim().to_string();
            let Some(wrapper) = dom.closest(input, ".select2-field") else {
                return;
            };
            let Some(select) = dom.first_in(wrapper, "select") else {
                return;
            };
            if value.is_empty() {
                return;
            }
            let _ = dom.append(
                select,
                MockNode::new("option").value(&value).attr("selected", "").text(&value),
            );
            render(dom, wrapper);
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn mounted(field: &Select2) -> (MockDom, NodeId) {
        let mut dom = MockDom::new();
        behaviour(&mut dom).unwrap();
        let root = dom.root();
        let wrapper = field.mount(&mut dom, root);
        (dom, wrapper)
    }

    mod select2_tests {
        use super::*;

        #[test]
        fn test_single_render_and_pick() {
            let field = Select2::single("type")
                .placeholder("Select value")
                .option("a", "Alpha")
                .option("b", "Beta");
            let (mut dom, wrapper) = mounted(&field);
            assert_eq!(
                dom.visible_text(dom.first_in(wrapper, ".select2-selection__rendered").unwrap()),
                "Select value"
            );
            let arrow = dom.first(".select2-selection__arrow").unwrap();
            dom.dispatch_click(arrow);
            let beta = dom.first(".select2-results__option:nth-child(2)").unwrap();
            dom.dispatch_click(beta);
            assert!(dom.first(".select2-dropdown-wrapper").is_none());
            let rendered = dom.first_in(wrapper, ".select2-selection__rendered").unwrap();
            assert_eq!(dom.own_text(rendered), "Beta");
            let clear = dom.first(".select2-selection__clear").unwrap();
            dom.dispatch_click(clear);
            assert!(dom.first("option:checked").is_none());
            assert!(dom.first(".select2-dropdown-wrapper").is_none());
        }

        #[test]
        fn test_removing_a_choice_notifies_listeners() {
            let field = Select2::multiple("types")
                .selected_option("a", "Alpha")
                .selected_option("b", "Beta");
            let (mut dom, wrapper) = mounted(&field);
            dom.on_input("#types select", |dom, _| dom.log_event("changed")).unwrap();
            let remove = dom
                .first(".select2-selection__choice[title=Alpha] .select2-selection__choice__remove")
                .unwrap();
            dom.dispatch_click(remove);
            assert_eq!(selected_values(&dom, wrapper), vec!["b"]);
            assert_eq!(dom.events().to_vec(), vec!["changed"]);

            select_values(&mut dom, wrapper, &["a", "b"]);
            assert_eq!(selected_values(&dom, wrapper), vec!["a", "b"]);
            assert_eq!(dom.events().len(), 1);
        }

        #[test]
        fn test_tree_toggle_does_not_select() {
            let field = Select2::tree("tree")
                .option("docs", "Documents")
                .child_option("invoice", "Invoice", "docs");
            let (mut dom, _) = mounted(&field);
            let selection = dom.first(".select2-selection").unwrap();
            dom.dispatch_click(selection);
            let invoice = dom.first("[data-parent=docs]").unwrap();
            assert!(!dom.is_displayed(invoice));
            let toggle = dom.first(".tree-toggle").unwrap();
            dom.dispatch_click(toggle);
            assert!(dom.is_displayed(invoice));
            assert!(dom.first("option:checked").is_none());
        }
    }
}
