//! Search sandboxes.

use super::select2::{self, Select2};
use crate::mock::dom::{MockDom, MockNode, NodeId};
use crate::mock::SandboxLocation;
use crate::result::E2eResult;
use crate::widgets::{
    CriteriaGroup, CriteriaNode, CriteriaRule, Junction, SearchTree, MAX_CRITERIA_DEPTH,
};

pub(super) const BASIC_SEARCH: &str = "/sandbox/search/basic-search";
pub(super) const OBJECT_TYPE_SELECT: &str = "/sandbox/search/object-type-select";
pub(super) const ADVANCED_SEARCH: &str = "/sandbox/search/components/advanced";

const ANY_OBJECT: &str = "anyObject";
const TYPES: [(&str, &str); 3] = [
    ("emf:Document", "Document"),
    ("emf:Project", "Project"),
    ("emf:Case", "Case"),
];
const DATASET_SIZE: usize = 23;
const PAGE_SIZE: usize = 5;

struct Item {
    index: usize,
    id: String,
    kind: &'static str,
    label: &'static str,
    title: String,
}

impl Item {
    fn property(&self, field: &str) -> String {
        match field {
            "title" => self.title.clone(),
            "description" => format!("Description of {}", self.title),
            "createdBy" if self.index % 2 == 0 => "admin".to_string(),
            "createdBy" => "jdoe".to_string(),
            "test-property" => format!("test-{}", self.index),
            _ => String::new(),
        }
    }
}

fn dataset() -> Vec<Item> {
    (1..=DATASET_SIZE)
        .map(|i| {
            let (kind, label) = TYPES[(i - 1) % TYPES.len()];
            Item {
                index: i,
                id: format!("emf:{i}"),
                kind,
                label,
                title: format!("{label} {i}"),
            }
        })
        .collect()
}

fn object_type_select() -> Select2 {
    TYPES.iter().fold(
        Select2::single("objectTypeSelect")
            .label("Object type")
            .selected_option(ANY_OBJECT, "Any Object"),
        |select, (value, label)| select.option(value, label),
    )
}

fn selected_type(dom: &MockDom) -> String {
    dom.select("#objectTypeSelect select option")
        .unwrap_or_default()
        .into_iter()
        .find(|option| dom.is_selected(*option))
        .and_then(|option| dom.attr(option, "value"))
        .unwrap_or(ANY_OBJECT)
        .to_string()
}

fn page_link(class: &str, label: &str, disabled: bool, active: bool) -> MockNode {
    MockNode::new("li")
        .class(class)
        .when(disabled, |n| n.class("disabled"))
        .when(active, |n| n.class("active"))
        .child(MockNode::new("a").text(label))
}

fn render_results(dom: &mut MockDom, search: NodeId) {
    let kind = dom.attr(search, "data-type").unwrap_or(ANY_OBJECT).to_string();
    let text = dom.attr(search, "data-text").unwrap_or_default().to_lowercase();
    let matches: Vec<Item> = dataset()
        .into_iter()
        .filter(|item| kind == ANY_OBJECT || item.kind == kind)
        .filter(|item| item.title.to_lowercase().contains(&text))
        .collect();
    let pages = matches.len().div_ceil(PAGE_SIZE).max(1);
    let page = dom
        .attr(search, "data-page")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, pages);
    dom.set_attr(search, "data-page", &page.to_string());

    if let Some(count) = dom.first_in(search, ".results-count") {
        dom.set_text(count, &format!("{} results", matches.len()));
    }
    if let Some(list) = dom.first_in(search, ".results-list") {
        dom.clear_children(list);
        for item in matches.iter().skip((page - 1) * PAGE_SIZE).take(PAGE_SIZE) {
            let _ = dom.append(
                list,
                MockNode::new("li")
                    .class("result-item")
                    .attr("data-id", &item.id)
                    .child(
                        MockNode::new("span")
                            .class("instance-header")
                            .child(MockNode::new("a").class("instance-link").text(&item.title)),
                    )
                    .child(MockNode::new("span").class("result-type").text(item.label)),
            );
        }
    }
    if let Some(pagination) = dom.first_in(search, ".pagination") {
        dom.clear_children(pagination);
        let _ = dom.append(pagination, page_link("first", "«", page == 1, false));
        let _ = dom.append(pagination, page_link("prev", "‹", page == 1, false));
        for n in 1..=pages {
            let _ = dom.append(pagination, page_link("page", &n.to_string(), false, n == page));
        }
        let _ = dom.append(pagination, page_link("next", "›", page == pages, false));
        let _ = dom.append(pagination, page_link("last", "»", page == pages, false));
    }
}

fn run_search(dom: &mut MockDom) {
    let Some(search) = dom.first(".search") else {
        return;
    };
    let kind = selected_type(dom);
    let text = dom
        .first_in(search, ".free-text")
        .and_then(|input| dom.attr(input, "value"))
        .unwrap_or_default()
        .trim()
        .to_string();
    dom.set_attr(search, "data-type", &kind);
    dom.set_attr(search, "data-text", &text);
    dom.set_attr(search, "data-page", "1");
    render_results(dom, search);
    dom.log_event(format!("search:{kind}:{text}"));
}

/// Search form with criteria, toolbar, results and pagination
pub(super) fn mount_basic_search(dom: &mut MockDom, _location: &SandboxLocation) -> E2eResult<()> {
    let root = dom.root();
    let search = dom.append(
        root,
        MockNode::new("div")
            .class("search")
            .attr("data-type", ANY_OBJECT)
            .attr("data-page", "1"),
    );
    let criteria = dom.append(search, MockNode::new("form").class("search-criteria"));
    let _ = object_type_select().mount(dom, criteria);
    let _ = dom.append(
        criteria,
        MockNode::new("input")
            .class("form-control free-text")
            .attr("type", "text")
            .attr("placeholder", "Search..."),
    );
    let _ = dom.append(
        search,
        MockNode::new("div")
            .class("search-toolbar")
            .child(MockNode::new("button").class("btn btn-primary seip-search").text("Search"))
            .child(MockNode::new("button").class("btn btn-default seip-clear").text("Clear")),
    );
    let _ = dom.append(
        search,
        MockNode::new("div")
            .class("search-results")
            .child(MockNode::new("div").class("results-count"))
            .child(MockNode::new("ul").class("results-list"))
            .child(MockNode::new("ul").class("pagination")),
    );
    render_results(dom, search);

    select2::behaviour(dom)?;
    dom.on_click(".search-toolbar .seip-search", |dom, _| run_search(dom))?;
    dom.on_key(".search-criteria .free-text", |dom, _, key| {
        if key == "Enter" {
            run_search(dom);
        }
    })?;
    dom.on_click(".search-toolbar .seip-clear", |dom, _| {
        if let Some(field) = dom.first("#objectTypeSelect") {
            select2::select_value(dom, field, ANY_OBJECT);
        }
        if let Some(input) = dom.first(".search-criteria .free-text") {
            dom.set_attr(input, "value", "");
        }
        dom.log_event("search:clear");
    })?;
    dom.on_click(".pagination li a", |dom, link| {
        let (Some(item), Some(search)) = (dom.parent(link), dom.closest(link, ".search")) else {
            return;
        };
        if dom.has_class(item, "disabled") {
            return;
        }
        let current: usize = dom
            .attr(search, "data-page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(1);
        let page = if dom.has_class(item, "first") {
            1
        } else if dom.has_class(item, "prev") {
            current.saturating_sub(1)
        } else if dom.has_class(item, "next") {
            current + 1
        } else if dom.has_class(item, "last") {
            usize::MAX
        } else {
            dom.own_text(link).trim().parse().unwrap_or(current)
        };
        dom.set_attr(search, "data-page", &page.to_string());
        render_results(dom, search);
    })
}

/// Only the object type select, with "Any Object" selected
pub(super) fn mount_object_type_select(dom: &mut MockDom, _location: &SandboxLocation) -> E2eResult<()> {
    let root = dom.root();
    let sandbox = dom.append(root, MockNode::new("div").class("object-type-sandbox"));
    let _ = object_type_select().mount(dom, sandbox);
    select2::behaviour(dom)
}

// =============================================================================
// ADVANCED SEARCH
// =============================================================================

const COMMON_PROPERTIES: [(&str, &str); 3] = [
    ("title", "Title"),
    ("description", "Description"),
    ("createdBy", "Created by"),
];
const DOCUMENT_PROPERTIES: [(&str, &str); 1] = [("test-property", "Test property")];
const OPERATORS: [(&str, &str); 3] = [
    ("contains", "Contains"),
    ("equals", "Equals"),
    ("does_not_contain", "Does not contain"),
];

/// Properties offered for `types`; documents add their own
fn properties(types: &[String]) -> Vec<(&'static str, &'static str)> {
    let mut out = COMMON_PROPERTIES.to_vec();
    if matches!(types, [only] if only == "emf:Document") {
        out.extend(DOCUMENT_PROPERTIES);
    }
    out
}

fn fresh_id(dom: &mut MockDom, prefix: &str) -> String {
    let Some(stub) = dom.first(".advanced-search-stub") else {
        return format!("{prefix}-0");
    };
    let next: usize = dom
        .attr(stub, "data-next-id")
        .and_then(|n| n.parse().ok())
        .unwrap_or(1);
    dom.set_attr(stub, "data-next-id", &(next + 1).to_string());
    format!("{prefix}-{next}")
}

fn default_criteria(dom: &mut MockDom) -> CriteriaGroup {
    let id = fresh_id(dom, "group");
    let rule = CriteriaRule::default_rule(fresh_id(dom, "rule"));
    CriteriaGroup {
        id,
        condition: Junction::And,
        rules: vec![CriteriaNode::Rule(rule)],
    }
}

fn predefined_criteria(dom: &mut MockDom) -> CriteriaGroup {
    let rule = |dom: &mut MockDom, field: &str, operator: &str, value: &str| {
        CriteriaNode::Rule(CriteriaRule {
            id: fresh_id(dom, "rule"),
            field: field.to_string(),
            operator: operator.to_string(),
            value: value.to_string(),
        })
    };
    let title = rule(dom, "title", "contains", "Document");
    let description = rule(dom, "description", "contains", "1");
    let creator = rule(dom, "createdBy", "equals", "admin");
    let nested = CriteriaGroup {
        id: fresh_id(dom, "group"),
        condition: Junction::Or,
        rules: vec![description, creator],
    };
    CriteriaGroup {
        id: fresh_id(dom, "group"),
        condition: Junction::And,
        rules: vec![title, CriteriaNode::Group(nested)],
    }
}

fn choice_select(id: &str, choices: &[(&str, &str)], selected: &str) -> Select2 {
    choices.iter().fold(Select2::single(id), |select, (value, label)| {
        if *value == selected {
            select.selected_option(value, label)
        } else {
            select.option(value, label)
        }
    })
}

fn append_rule(dom: &mut MockDom, group: NodeId, rule: &CriteriaRule, types: &[String]) {
    let group_id = dom.attr(group, "data-id").unwrap_or_default().to_string();
    let row = dom.append(
        group,
        MockNode::new("div")
            .class("criteria-row")
            .attr("data-id", &rule.id)
            .attr("data-group", &group_id)
            .child(MockNode::new("div").class("criteria-property"))
            .child(MockNode::new("div").class("criteria-operator"))
            .child(
                MockNode::new("div").class("criteria-value").child(
                    MockNode::new("input")
                        .class("form-control")
                        .attr("type", "text")
                        .value(&rule.value),
                ),
            )
            .child(MockNode::new("button").class("btn btn-default remove-rule").text("×")),
    );
    if let Some(cell) = dom.first_in(row, ".criteria-property") {
        let _ = choice_select(&format!("{}-property", rule.id), &properties(types), &rule.field)
            .mount(dom, cell);
    }
    if let Some(cell) = dom.first_in(row, ".criteria-operator") {
        let _ = choice_select(&format!("{}-operator", rule.id), &OPERATORS, &rule.operator)
            .mount(dom, cell);
    }
}

fn group_controls(group_id: &str, level: usize, condition: Junction) -> MockNode {
    let junction = |class: &str, junction: Junction| {
        MockNode::new("button")
            .class(&format!("btn btn-default {class}"))
            .when(condition == junction, |n| n.class("active"))
            .text(junction.as_str())
    };
    MockNode::new("div")
        .class("criteria-controls")
        .attr("data-group", group_id)
        .child(junction("criteria-and", Junction::And))
        .child(junction("criteria-or", Junction::Or))
        .child(MockNode::new("button").class("btn btn-default add-rule").text("Add rule"))
        .when(level < MAX_CRITERIA_DEPTH, |n| {
            n.child(MockNode::new("button").class("btn btn-default add-rules").text("Add group"))
        })
        .when(level > 1, |n| {
            n.child(MockNode::new("button").class("btn btn-default remove-rules").text("Remove group"))
        })
}

/// Rebuild `node` as the group at `level`
fn fill_group(dom: &mut MockDom, node: NodeId, group: &CriteriaGroup, level: usize, types: &[String]) {
    dom.clear_children(node);
    dom.set_attr(node, "data-id", &group.id);
    dom.set_attr(node, "data-condition", group.condition.as_str());
    let _ = dom.append(node, group_controls(&group.id, level, group.condition));
    for member in &group.rules {
        match member {
            CriteriaNode::Rule(rule) => append_rule(dom, node, rule, types),
            CriteriaNode::Group(nested) => append_group(dom, node, nested, level + 1, types),
        }
    }
}

fn append_group(dom: &mut MockDom, parent: NodeId, group: &CriteriaGroup, level: usize, types: &[String]) {
    let parent_id = dom.attr(parent, "data-id").unwrap_or_default().to_string();
    let node = dom.append(
        parent,
        MockNode::new("div")
            .class(&format!("criteria-group criteria-level-{level}"))
            .attr("data-level", &level.to_string())
            .attr("data-parent", &parent_id),
    );
    fill_group(dom, node, group, level, types);
}

fn read_rule(dom: &MockDom, row: NodeId) -> CriteriaRule {
    let selected = |css: &str| {
        dom.first_in(row, css)
            .and_then(|field| select2::selected_values(dom, field).into_iter().next())
            .unwrap_or_default()
    };
    CriteriaRule {
        id: dom.attr(row, "data-id").unwrap_or_default().to_string(),
        field: selected(".criteria-property .select2-field"),
        operator: selected(".criteria-operator .select2-field"),
        value: dom
            .first_in(row, ".criteria-value input")
            .and_then(|input| dom.attr(input, "value"))
            .unwrap_or_default()
            .to_string(),
    }
}

fn read_group(dom: &MockDom, node: NodeId) -> CriteriaGroup {
    let rules = dom
        .children(node)
        .into_iter()
        .filter_map(|child| {
            if dom.has_class(child, "criteria-row") {
                Some(CriteriaNode::Rule(read_rule(dom, child)))
            } else if dom.has_class(child, "criteria-group") {
                Some(CriteriaNode::Group(read_group(dom, child)))
            } else {
                None
            }
        })
        .collect();
    CriteriaGroup {
        id: dom.attr(node, "data-id").unwrap_or_default().to_string(),
        condition: if dom.attr(node, "data-condition") == Some("OR") {
            Junction::Or
        } else {
            Junction::And
        },
        rules,
    }
}

fn selected_types(dom: &MockDom) -> Vec<String> {
    dom.first("#advanced-search-types")
        .map(|field| select2::selected_values(dom, field))
        .unwrap_or_default()
}

/// Tree model as last mirrored into `#tree-model`
fn mirrored_tree(dom: &MockDom) -> Option<SearchTree> {
    dom.first("#tree-model")
        .and_then(|model| dom.attr(model, "value"))
        .and_then(|json| serde_json::from_str(json).ok())
}

/// Mirror the rendered criteria into `#tree-model`
fn mirror_tree(dom: &mut MockDom) {
    let (Some(root), Some(model)) = (dom.first(".criteria-level-1"), dom.first("#tree-model")) else {
        return;
    };
    let tree = SearchTree {
        types: selected_types(dom),
        criteria: read_group(dom, root),
    };
    let json = serde_json::to_string(&tree).unwrap_or_default();
    dom.set_attr(model, "value", &json);
    dom.set_text(model, &json);
}

/// Apply the disabled and locked switches to every control
fn apply_switches(dom: &mut MockDom) {
    let Some(search) = dom.first(".seip-advanced-search") else {
        return;
    };
    let disabled = dom.has_class(search, "disabled");
    for control in dom.select_in(search, "button, input, select") {
        dom.set_flag(control, "disabled", disabled);
    }
    let locked = dom
        .first(".object-type-select")
        .is_some_and(|cell| dom.has_class(cell, "locked"));
    if let Some(select) = dom.first("#advanced-search-types select") {
        dom.set_flag(select, "disabled", disabled || locked);
    }
}

fn load_tree(dom: &mut MockDom, types: &[String], criteria: &CriteriaGroup) {
    if let Some(field) = dom.first("#advanced-search-types") {
        let values: Vec<&str> = types.iter().map(String::as_str).collect();
        select2::select_values(dom, field, &values);
    }
    if let Some(root) = dom.first(".criteria-level-1") {
        fill_group(dom, root, criteria, 1, types);
    }
    apply_switches(dom);
    mirror_tree(dom);
}

/// `anyObject` excludes every other type and is what an empty selection
/// falls back to; a new type set starts from the default criteria
fn change_types(dom: &mut MockDom) {
    let previous = mirrored_tree(dom).map(|tree| tree.types).unwrap_or_default();
    let any = ANY_OBJECT.to_string();
    let mut types = selected_types(dom);
    if types.is_empty() || (types.contains(&any) && !previous.contains(&any)) {
        types = vec![any];
    } else if types.len() > 1 {
        types.retain(|t| *t != any);
    }
    if types == previous {
        if let Some(field) = dom.first("#advanced-search-types") {
            let values: Vec<&str> = types.iter().map(String::as_str).collect();
            select2::select_values(dom, field, &values);
        }
        mirror_tree(dom);
        return;
    }
    let criteria = default_criteria(dom);
    load_tree(dom, &types, &criteria);
}

fn rule_matches(item: &Item, rule: &CriteriaRule) -> bool {
    if rule.value.is_empty() {
        return true;
    }
    let actual = item.property(&rule.field).to_lowercase();
    let expected = rule.value.to_lowercase();
    match rule.operator.as_str() {
        "equals" => actual == expected,
        "does_not_contain" => !actual.contains(&expected),
        _ => actual.contains(&expected),
    }
}

fn group_matches(item: &Item, group: &CriteriaGroup) -> bool {
    let mut members = group.rules.iter().map(|member| match member {
        CriteriaNode::Rule(rule) => rule_matches(item, rule),
        CriteriaNode::Group(nested) => group_matches(item, nested),
    });
    match group.condition {
        Junction::And => members.all(|matched| matched),
        Junction::Or => group.rules.is_empty() || members.any(|matched| matched),
    }
}

fn run_advanced_search(dom: &mut MockDom) {
    let Some(tree) = mirrored_tree(dom) else {
        return;
    };
    let any = tree.types.iter().any(|t| t == ANY_OBJECT);
    let count = dataset()
        .iter()
        .filter(|item| any || tree.types.iter().any(|t| t == item.kind))
        .filter(|item| group_matches(item, &tree.criteria))
        .count();
    if let Some(results) = dom.first(".advanced-search-results") {
        dom.set_hidden(results, false);
    }
    if let Some(label) = dom.first(".advanced-search-results .results-count") {
        dom.set_text(label, &format!("{count} results"));
    }
    dom.log_event(format!("advanced-search:{count}"));
}

fn stub_button(id: &str, label: &str) -> MockNode {
    MockNode::new("button").id(id).class("btn btn-default").text(label)
}

/// Advanced search with a stub mirroring the criteria tree as JSON
pub(super) fn mount_advanced_search(dom: &mut MockDom, _location: &SandboxLocation) -> E2eResult<()> {
    let root = dom.root();
    let stub = dom.append(
        root,
        MockNode::new("div")
            .class("advanced-search-stub")
            .attr("data-next-id", "1")
            .child(
                MockNode::new("div")
                    .class("stub-controls")
                    .child(stub_button("empty_criteria", "Empty criteria"))
                    .child(stub_button("predefined_criteria", "Predefined criteria"))
                    .child(stub_button("toggle_disabled", "Toggle disabled"))
                    .child(stub_button("toggle_lock", "Toggle lock")),
            )
            .child(MockNode::new("textarea").id("tree-model").class("form-control")),
    );
    let search = dom.append(
        stub,
        MockNode::new("div")
            .class("seip-advanced-search")
            .child(
                MockNode::new("div").class("advanced-search-sections").child(
                    MockNode::new("div")
                        .class("advanced-search-section")
                        .child(MockNode::new("div").class("object-type-select"))
                        .child(
                            MockNode::new("div")
                                .class("criteria-group criteria-level-1")
                                .attr("data-level", "1"),
                        ),
                ),
            )
            .child(
                MockNode::new("div")
                    .class("advanced-search-toolbar")
                    .child(MockNode::new("button").class("btn btn-primary seip-search").text("Search"))
                    .child(MockNode::new("button").class("btn btn-default clear-criteria").text("Clear")),
            )
            .child(
                MockNode::new("div")
                    .class("advanced-search-results")
                    .hidden()
                    .child(MockNode::new("div").class("results-count")),
            ),
    );
    if let Some(cell) = dom.first_in(search, ".object-type-select") {
        let types = TYPES.iter().fold(
            Select2::multiple("advanced-search-types").selected_option(ANY_OBJECT, "Any Object"),
            |select, (value, label)| select.option(value, label),
        );
        let _ = types.mount(dom, cell);
    }
    let criteria = default_criteria(dom);
    load_tree(dom, &[ANY_OBJECT.to_string()], &criteria);

    select2::behaviour(dom)?;
    dom.on_input("#advanced-search-types select", |dom, _| change_types(dom))?;
    dom.on_click(".criteria-controls .add-rule", |dom, button| {
        let Some(group) = dom.closest(button, ".criteria-group") else {
            return;
        };
        let rule = CriteriaRule::default_rule(fresh_id(dom, "rule"));
        let types = selected_types(dom);
        append_rule(dom, group, &rule, &types);
        mirror_tree(dom);
    })?;
    dom.on_click(".criteria-controls .add-rules", |dom, button| {
        let Some(group) = dom.closest(button, ".criteria-group") else {
            return;
        };
        let level = dom
            .attr(group, "data-level")
            .and_then(|level| level.parse::<usize>().ok())
            .unwrap_or(1)
            + 1;
        if level > MAX_CRITERIA_DEPTH {
            return;
        }
        let nested = default_criteria(dom);
        let types = selected_types(dom);
        append_group(dom, group, &nested, level, &types);
        mirror_tree(dom);
    })?;
    dom.on_click(".criteria-controls .remove-rules", |dom, button| {
        if let Some(group) = dom.closest(button, ".criteria-group") {
            dom.remove(group);
            mirror_tree(dom);
        }
    })?;
    dom.on_click(".criteria-controls .criteria-and, .criteria-controls .criteria-or", |dom, button| {
        let (Some(group), Some(controls)) =
            (dom.closest(button, ".criteria-group"), dom.parent(button))
        else {
            return;
        };
        let junction = if dom.has_class(button, "criteria-or") {
            Junction::Or
        } else {
            Junction::And
        };
        dom.set_attr(group, "data-condition", junction.as_str());
        for other in dom.select_in(controls, ".criteria-and, .criteria-or") {
            dom.remove_class(other, "active");
        }
        dom.add_class(button, "active");
        mirror_tree(dom);
    })?;
    dom.on_click(".criteria-row .remove-rule", |dom, button| {
        if let Some(row) = dom.closest(button, ".criteria-row") {
            dom.remove(row);
            mirror_tree(dom);
        }
    })?;
    dom.on_input(".criteria-property select", |dom, select| {
        if let Some(input) = dom
            .closest(select, ".criteria-row")
            .and_then(|row| dom.first_in(row, ".criteria-value input"))
        {
            dom.set_attr(input, "value", "");
        }
        mirror_tree(dom);
    })?;
    dom.on_input(".criteria-operator select, .criteria-value input", |dom, _| mirror_tree(dom))?;
    dom.on_click(".advanced-search-toolbar .seip-search", |dom, _| run_advanced_search(dom))?;
    dom.on_click(".advanced-search-toolbar .clear-criteria", |dom, _| {
        let criteria = default_criteria(dom);
        load_tree(dom, &[ANY_OBJECT.to_string()], &criteria);
    })?;
    dom.on_click("#empty_criteria", |dom, _| {
        let criteria = CriteriaGroup {
            id: fresh_id(dom, "group"),
            condition: Junction::And,
            rules: Vec::new(),
        };
        load_tree(dom, &[ANY_OBJECT.to_string()], &criteria);
    })?;
    dom.on_click("#predefined_criteria", |dom, _| {
        let criteria = predefined_criteria(dom);
        load_tree(dom, &["emf:Document".to_string()], &criteria);
    })?;
    dom.on_click("#toggle_disabled", |dom, _| {
        if let Some(search) = dom.first(".seip-advanced-search") {
            let _ = dom.toggle_class(search, "disabled");
            apply_switches(dom);
        }
    })?;
    dom.on_click("#toggle_lock", |dom, _| {
        if let Some(cell) = dom.first(".object-type-select") {
            let _ = dom.toggle_class(cell, "locked");
            apply_switches(dom);
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn mounted() -> MockDom {
        let mut dom = MockDom::new();
        mount_basic_search(&mut dom, &SandboxLocation::parse(BASIC_SEARCH)).unwrap();
        dom
    }

    mod search_tests {
        use super::*;

        #[test]
        fn test_initial_page() {
            let dom = mounted();
            assert_eq!(dom.select(".result-item").unwrap().len(), PAGE_SIZE);
            assert_eq!(dom.select(".pagination li.page").unwrap().len(), 5);
            let count = dom.first(".results-count").unwrap();
            assert_eq!(dom.own_text(count), "23 results");
            assert!(dom.first(".pagination li.prev.disabled").is_some());
        }

        #[test]
        fn test_free_text_narrows_results() {
            let mut dom = mounted();
            let input = dom.first(".free-text").unwrap();
            dom.set_attr(input, "value", "case");
            dom.dispatch_key(input, "Enter");
            let count = dom.first(".results-count").unwrap();
            assert_eq!(dom.own_text(count), "7 results");
            assert_eq!(dom.select(".pagination li.page").unwrap().len(), 2);
        }

        #[test]
        fn test_last_page_link() {
            let mut dom = mounted();
            let last = dom.first(".pagination li.last a").unwrap();
            dom.dispatch_click(last);
            let active = dom.first(".pagination li.active a").unwrap();
            assert_eq!(dom.own_text(active), "5");
            assert_eq!(dom.select(".result-item").unwrap().len(), 3);
        }
    }

    mod advanced_search_tests {
        use super::*;

        fn mounted_advanced() -> MockDom {
            let mut dom = MockDom::new();
            mount_advanced_search(&mut dom, &SandboxLocation::parse(ADVANCED_SEARCH)).unwrap();
            dom
        }

        #[test]
        fn test_tree_model_mirrors_the_form() {
            let mut dom = mounted_advanced();
            let tree = mirrored_tree(&dom).unwrap();
            assert_eq!(tree.types, vec![ANY_OBJECT]);
            assert_eq!(tree.criteria.rule_count(), 1);

            let or = dom.first(".criteria-level-1 .criteria-or").unwrap();
            dom.dispatch_click(or);
            let input = dom.first(".criteria-value input").unwrap();
            dom.set_attr(input, "value", "Project");
            dom.dispatch_input(input);
            let tree = mirrored_tree(&dom).unwrap();
            assert_eq!(tree.criteria.condition, Junction::Or);
            assert_eq!(tree.criteria.own_rules().next().unwrap().value, "Project");
        }

        #[test]
        fn test_nested_or_group_search() {
            let mut dom = mounted_advanced();
            let predefined = dom.first("#predefined_criteria").unwrap();
            dom.dispatch_click(predefined);
            let search = dom.first(".seip-search").unwrap();
            dom.dispatch_click(search);
            // documents are 1, 4, 7, ..., 22; "1" in the description or an even index
            let count = dom.first(".advanced-search-results .results-count").unwrap();
            assert_eq!(dom.own_text(count), "7 results");
        }

        #[test]
        fn test_disabled_form_ignores_type_clicks() {
            let mut dom = mounted_advanced();
            let toggle = dom.first("#toggle_disabled").unwrap();
            dom.dispatch_click(toggle);
            assert!(dom.first("#advanced-search-types select[disabled]").is_some());
            assert!(dom.first(".seip-search[disabled]").is_some());
            let selection = dom.first("#advanced-search-types .select2-selection").unwrap();
            dom.dispatch_click(selection);
            assert!(dom.first(".select2-dropdown-wrapper").is_none());
        }
    }
}
