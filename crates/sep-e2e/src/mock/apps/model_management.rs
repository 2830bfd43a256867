//! Model management sandbox: a model tree plus the general, fields and
//! headers sections of the selected model.
//!
//! Field and header values live on their nodes as `data-<key>` (current)
//! and `data-saved-<key>` (last saved) pairs; dirty state is derived from
//! the difference.

use super::select2::{self, Select2};
use super::{modal, show_toast, toast_behaviour};
use crate::mock::dom::{MockDom, MockNode, NodeId};
use crate::mock::SandboxLocation;
use crate::result::E2eResult;
use base64::Engine;

pub(super) const MODEL_MANAGEMENT: &str = "/sandbox/administration/model-management";

const FAIL_SAVE: &str = "FAIL_SAVE";
const LANGUAGES: [(&str, &str); 2] = [("en", "English"), ("de", "German")];
const SECTIONS: [(&str, &str); 3] = [("general", "General"), ("fields", "Fields"), ("headers", "Headers")];
const FIELD_KEYS: [&str; 3] = ["label", "mandatory", "type"];
const TYPE_OPTIONS: [&str; 8] = [
    "ALPHA_NUMERIC_TYPE",
    "NUMERIC_TYPE",
    "NUMERIC_FIXED_TYPE",
    "DATE_TYPE",
    "DATETIME_TYPE",
    "BOOLEAN",
    "CODELIST",
    "OBJECT_TYPE",
];

struct Model {
    id: &'static str,
    label: &'static str,
    parent: Option<&'static str>,
}

static MODELS: [Model; 2] = [
    Model {
        id: "EO1001",
        label: "Entity",
        parent: None,
    },
    Model {
        id: "MX1001",
        label: "Media",
        parent: Some("EO1001"),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Display {
    Editable,
    Hidden,
    System,
}

impl Display {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Editable => "EDITABLE",
            Self::Hidden => "HIDDEN",
            Self::System => "SYSTEM",
        }
    }
}

struct Field<'a> {
    id: &'a str,
    label: &'a str,
    owner: &'a str,
    region: Option<&'a str>,
    display: Display,
    mandatory: bool,
    kind: &'a str,
}

const fn field(
    id: &'static str,
    label: &'static str,
    owner: &'static str,
    region: Option<&'static str>,
    display: Display,
    mandatory: bool,
    kind: &'static str,
) -> Field<'static> {
    Field {
        id,
        label,
        owner,
        region,
        display,
        mandatory,
        kind,
    }
}

const GENERAL: Option<&str> = Some("generalDetails");
const SPECIFIC: Option<&str> = Some("specificDetails");

static FIELDS: [Field<'static>; 10] = [
    field("description", "Description", "EO1001", None, Display::Editable, false, "ALPHA_NUMERIC_TYPE"),
    field("title", "Title", "EO1001", GENERAL, Display::Editable, true, "ALPHA_NUMERIC_TYPE"),
    field("type", "Type", "EO1001", GENERAL, Display::Editable, false, "CODELIST"),
    field("status", "State", "EO1001", GENERAL, Display::Editable, false, "CODELIST"),
    field("createdBy", "Created by", "EO1001", GENERAL, Display::Editable, false, "OBJECT_TYPE"),
    field("createdOn", "Created on", "EO1001", GENERAL, Display::Editable, false, "DATETIME_TYPE"),
    field("system", "System", "EO1001", GENERAL, Display::System, false, "ALPHA_NUMERIC_TYPE"),
    field("hidden", "Hidden", "MX1001", SPECIFIC, Display::Hidden, false, "ALPHA_NUMERIC_TYPE"),
    field("email", "E-mail address", "MX1001", SPECIFIC, Display::Editable, false, "ALPHA_NUMERIC_TYPE"),
    field("notes", "Notes", "MX1001", SPECIFIC, Display::Editable, false, "ALPHA_NUMERIC_TYPE"),
];

/// `(id, label, owner)`
static REGIONS: [(&str, &str, &str); 2] = [
    ("generalDetails", "Base details", "EO1001"),
    ("specificDetails", "Specific details", "MX1001"),
];

/// Semantic properties offered when creating a field; `range` narrows the types
struct CreatableProperty {
    uri: &'static str,
    label: &'static str,
    range: Option<&'static str>,
}

static CREATABLE: [CreatableProperty; 4] = [
    CreatableProperty {
        uri: "http://purl.org/dc/terms/checkboxForCreate",
        label: "Checkbox",
        range: Some("boolean"),
    },
    CreatableProperty {
        uri: "http://www.w3.org/2008/05/skos#datetimeForCreate",
        label: "Date time",
        range: Some("dateTime"),
    },
    CreatableProperty {
        uri: "http://www.w3.org/ns/oa#numericForCreate",
        label: "Numeric",
        range: Some("int"),
    },
    CreatableProperty {
        uri: "http://purl.org/dc/terms/noTypePropertyForCreate",
        label: "No type",
        range: None,
    },
];

struct Header {
    kind: &'static str,
    owner: &'static str,
    en: &'static str,
    de: &'static str,
}

const HEADER_TYPES: [(&str, &str); 3] = [
    ("default_header", "Default header"),
    ("compact_header", "Compact header"),
    ("breadcrumb_header", "Breadcrumb header"),
];

static HEADERS: [Header; 4] = [
    Header {
        kind: "default_header",
        owner: "EO1001",
        en: "${eval(<span>(EO1001) Default Header</span>)}",
        de: "${eval(<span>(EO1001) Standard Kopfzeile</span>)}",
    },
    Header {
        kind: "default_header",
        owner: "MX1001",
        en: "${eval(<span>(MX1001) Default Header</span>)}",
        de: "${eval(<span>(MX1001) Standard Kopfzeile</span>)}",
    },
    Header {
        kind: "compact_header",
        owner: "EO1001",
        en: "${eval(<span>(EO1001) Compact Header</span>)}",
        de: "",
    },
    Header {
        kind: "breadcrumb_header",
        owner: "EO1001",
        en: "${eval(<span>(EO1001) Breadcrumb Header</span>)}",
        de: "",
    },
];

fn find_model(id: &str) -> Option<&'static Model> {
    MODELS.iter().find(|model| model.id == id)
}

/// `id` followed by its ancestors
fn lineage(id: &str) -> Vec<&'static str> {
    let mut out = Vec::new();
    let mut current = find_model(id);
    while let Some(model) = current {
        out.push(model.id);
        current = model.parent.and_then(find_model);
    }
    out
}

fn inherits(id: &str, owner: &str) -> bool {
    lineage(id).contains(&owner)
}

/// Header of `kind` closest to `id` in its lineage
fn header_for(id: &str, kind: &str) -> Option<&'static Header> {
    lineage(id).into_iter().find_map(|owner| {
        HEADERS
            .iter()
            .find(|header| header.kind == kind && header.owner == owner)
    })
}

fn types_for(range: Option<&str>) -> Vec<&'static str> {
    match range {
        Some("boolean") => vec!["BOOLEAN"],
        Some("dateTime") => vec!["DATE_TYPE", "DATETIME_TYPE"],
        Some("int") => vec!["NUMERIC_TYPE", "NUMERIC_FIXED_TYPE"],
        _ => TYPE_OPTIONS.to_vec(),
    }
}

fn local_name(uri: &str) -> &str {
    uri.rsplit(|c| c == '#' || c == '/').next().unwrap_or(uri)
}

fn slug(title: &str) -> String {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn decode_model(encoded: &str) -> Option<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    String::from_utf8(bytes).ok()
}

fn set_class(dom: &mut MockDom, node: NodeId, class: &str, on: bool) {
    if on {
        dom.add_class(node, class);
    } else {
        dom.remove_class(node, class);
    }
}

fn attr_of(dom: &MockDom, node: NodeId, name: &str) -> String {
    dom.attr(node, name).unwrap_or_default().to_string()
}

fn current_model(dom: &MockDom) -> String {
    dom.first(".model-data")
        .map(|data| attr_of(dom, data, "data-model"))
        .unwrap_or_default()
}

fn setting(dom: &MockDom, name: &str) -> String {
    dom.first(".model-management")
        .map(|root| attr_of(dom, root, name))
        .unwrap_or_default()
}

fn input_value(dom: &MockDom, scope: NodeId, css: &str) -> String {
    dom.first_in(scope, css)
        .map(|input| attr_of(dom, input, "value"))
        .unwrap_or_default()
}

fn selected(dom: &MockDom, scope: NodeId, css: &str) -> Option<String> {
    dom.first_in(scope, css)
        .and_then(|field| select2::selected_values(dom, field).into_iter().next())
}

// =============================================================================
// MARKUP
// =============================================================================

fn model_controls() -> MockNode {
    MockNode::new("div").class("model-controls").child(
        MockNode::new("div").class("model-actions").child(
            MockNode::new("div")
                .class("controls")
                .child(
                    MockNode::new("button")
                        .class("btn btn-primary model-save")
                        .text("Save")
                        .disabled(),
                )
                .child(
                    MockNode::new("button")
                        .class("btn btn-default model-cancel")
                        .text("Cancel")
                        .disabled(),
                ),
        ),
    )
}

fn attribute_node(id: &str, label: &str, control: MockNode) -> MockNode {
    MockNode::new("div")
        .class("model-attribute")
        .attr("data-id", id)
        .child(MockNode::new("div").class("control-label").text(label))
        .child(MockNode::new("div").class("attribute-control").child(control))
        .child(MockNode::new("div").class("messages"))
}

fn checkbox(class: &str, label: &str, checked: bool, disabled: bool) -> MockNode {
    MockNode::new("div").class(&format!("form-group {class}")).child(
        MockNode::new("label")
            .class("checkbox")
            .child(
                MockNode::new("input")
                    .attr("type", "checkbox")
                    .when(checked, MockNode::checked)
                    .when(disabled, MockNode::disabled),
            )
            .child(MockNode::new("i"))
            .text(label),
    )
}

fn label_parts(label: &str, mandatory: bool, parent: Option<&str>) -> Vec<MockNode> {
    let mut parts = vec![MockNode::new("span").class("field-label").text(label)];
    if mandatory {
        parts.push(MockNode::new("span").class("mandatory-mark").text("*"));
    }
    if let Some(parent) = parent {
        parts.push(MockNode::new("span").class("field-parent").text(parent));
    }
    parts
}

fn field_node(field: &Field<'_>, model: &str) -> MockNode {
    let inherited = field.owner != model;
    let parent = find_model(field.owner).map(|owner| owner.label).filter(|_| inherited);
    let mandatory = if field.mandatory { "true" } else { "false" };
    MockNode::new("div")
        .class("model-field")
        .attr("data-id", field.id)
        .attr("data-owner", field.owner)
        .attr("data-display", field.display.as_str())
        .attr("data-inherited", if inherited { "true" } else { "false" })
        .attr("data-label", field.label)
        .attr("data-saved-label", field.label)
        .attr("data-mandatory", mandatory)
        .attr("data-saved-mandatory", mandatory)
        .attr("data-type", field.kind)
        .attr("data-saved-type", field.kind)
        .child(
            MockNode::new("div")
                .class("control-label")
                .children(label_parts(field.label, field.mandatory, parent)),
        )
        .child(
            MockNode::new("div")
                .class("control-buttons")
                .child(MockNode::new("button").class("btn btn-xs attributes").text("Attributes")),
        )
}

fn tree_node(model: &Model) -> MockNode {
    let children = MODELS
        .iter()
        .filter(|child| child.parent == Some(model.id))
        .map(tree_node);
    MockNode::new("li")
        .class("model-tree-node")
        .attr("data-id", model.id)
        .child(MockNode::new("a").class("node-anchor").text(model.label))
        .child(MockNode::new("ul").children(children))
}

fn general_section(model: &Model) -> MockNode {
    let parent = model.parent.and_then(find_model).map_or("", |parent| parent.label);
    MockNode::new("div")
        .class("section model-general")
        .attr("data-section", "general")
        .child(
            MockNode::new("div")
                .class("model-definition-attributes")
                .child(
                    MockNode::new("div")
                        .class("model-header")
                        .child(MockNode::new("span").class("model-header-name").text(model.label))
                        .child(MockNode::new("span").class("model-header-id").text(model.id)),
                )
                .child(MockNode::new("div").class("model-parent").text(parent)),
        )
}

fn mount_fields_section(dom: &mut MockDom, content: NodeId, model: &Model) {
    let section = dom.append(
        content,
        MockNode::new("div")
            .class("section model-fields")
            .attr("data-section", "fields")
            .hidden()
            .child(
                MockNode::new("div")
                    .class("control-section")
                    .child(MockNode::new("button").class("btn btn-default create-field").text("Create field"))
                    .child(
                        MockNode::new("button")
                            .class("btn btn-default create-property")
                            .text("Create property"),
                    ),
            )
            .child(
                MockNode::new("div").class("filter-section").child(
                    MockNode::new("input")
                        .class("form-control filter-field")
                        .attr("type", "text")
                        .attr("placeholder", "Filter fields")
                        .value(""),
                ),
            )
            .child(
                MockNode::new("div")
                    .class("display-section")
                    .child(checkbox("filter-hidden", "Show hidden", false, false))
                    .child(checkbox("filter-system", "Show system", false, false))
                    .child(checkbox("filter-inherited", "Show inherited", true, false)),
            )
            .child(
                MockNode::new("div")
                    .class("filter-message")
                    .hidden()
                    .text("No fields match the filter"),
            )
            .child(MockNode::new("div").class("model-fields-list"))
            .child(MockNode::new("div").class("model-details").hidden())
            .child(model_controls()),
    );
    let Some(list) = dom.first_in(section, ".model-fields-list") else {
        return;
    };
    for field in FIELDS
        .iter()
        .filter(|field| field.region.is_none() && inherits(model.id, field.owner))
    {
        let _ = dom.append(list, field_node(field, model.id));
    }
    for (region_id, label, owner) in REGIONS.iter().filter(|region| inherits(model.id, region.2)) {
        let inherited = *owner != model.id;
        let region = dom.append(
            list,
            MockNode::new("div")
                .class("model-container")
                .attr("data-id", region_id)
                .attr("data-inherited", if inherited { "true" } else { "false" })
                .child(
                    MockNode::new("div")
                        .class("container-header")
                        .child(MockNode::new("span").class("container-name").text(label)),
                )
                .child(MockNode::new("div").class("container-body")),
        );
        let Some(body) = dom.first_in(region, ".container-body") else {
            continue;
        };
        for field in FIELDS
            .iter()
            .filter(|field| field.region == Some(*region_id) && inherits(model.id, field.owner))
        {
            let _ = dom.append(body, field_node(field, model.id));
        }
    }
}

fn mount_headers_section(dom: &mut MockDom, content: NodeId, model: &Model) {
    let user_lang = setting(dom, "data-user-lang");
    let lang = if LANGUAGES.iter().any(|(code, _)| *code == user_lang) {
        user_lang
    } else {
        "en".to_string()
    };
    let section = dom.append(
        content,
        MockNode::new("div")
            .class("section model-headers")
            .attr("data-section", "headers")
            .attr("data-lang", &lang)
            .hidden()
            .child(MockNode::new("div").class("header-language"))
            .child(MockNode::new("div").class("model-headers-list"))
            .child(model_controls()),
    );
    if let Some(cell) = dom.first_in(section, ".header-language") {
        let languages = LANGUAGES.iter().fold(
            Select2::single("headerLanguage").label("Language"),
            |select, (code, label)| {
                if *code == lang {
                    select.selected_option(code, label)
                } else {
                    select.option(code, label)
                }
            },
        );
        let _ = languages.mount(dom, cell);
    }
    let Some(list) = dom.first_in(section, ".model-headers-list") else {
        return;
    };
    for (kind, label) in HEADER_TYPES {
        let header = header_for(model.id, kind);
        let mut node = MockNode::new("div")
            .class("model-header")
            .attr("data-type", kind)
            .attr("data-owner", header.map_or(model.id, |header| header.owner))
            .child(MockNode::new("div").class("header-label").text(label))
            .child(MockNode::new("textarea").class("form-control header-value"));
        for (code, _) in LANGUAGES {
            let value = header.map_or("", |header| if code == "de" { header.de } else { header.en });
            node = node
                .attr(&format!("data-value-{code}"), value)
                .attr(&format!("data-saved-{code}"), value);
        }
        let _ = dom.append(list, node);
    }
    show_header_values(dom);
}

/// Replace `.model-data` with the sections of model `id`
fn load_model(dom: &mut MockDom, id: &str) {
    let Some(data) = dom.first(".model-data") else {
        return;
    };
    dom.clear_children(data);
    dom.set_attr(data, "data-model", id);
    for anchor in dom.select(".model-tree .node-anchor").unwrap_or_default() {
        dom.remove_class(anchor, "selected");
        dom.remove_class(anchor, "modified-node");
    }
    if let Some(anchor) = dom.first(&format!(".model-tree-node[data-id=\"{id}\"] > .node-anchor")) {
        dom.add_class(anchor, "selected");
    }
    let Some(model) = find_model(id) else {
        let _ = dom.append(
            data,
            MockNode::new("div")
                .class("select-message")
                .text("Select a model from the tree"),
        );
        return;
    };

    let tabs = SECTIONS.iter().enumerate().fold(
        MockNode::new("ul").class("nav nav-tabs model-sections"),
        |tabs, (i, (key, title))| {
            tabs.child(
                MockNode::new("li")
                    .class("model-section-tab")
                    .attr("data-section", key)
                    .when(i == 0, |n| n.class("active"))
                    .child(MockNode::new("a").text(title)),
            )
        },
    );
    let _ = dom.append(data, tabs);
    let content = dom.append(data, MockNode::new("div").class("tab-content"));
    let _ = dom.append(content, general_section(model));
    mount_fields_section(dom, content, model);
    mount_headers_section(dom, content, model);
    apply_filters(dom);
    dom.log_event(format!("model-load:{id}"));
}

fn activate_section(dom: &mut MockDom, key: &str) {
    for tab in dom.select(".model-section-tab").unwrap_or_default() {
        let active = dom.attr(tab, "data-section") == Some(key);
        set_class(dom, tab, "active", active);
    }
    for section in dom.select(".model-data .section").unwrap_or_default() {
        let shown = dom.attr(section, "data-section") == Some(key);
        dom.set_hidden(section, !shown);
    }
}

// =============================================================================
// FIELDS
// =============================================================================

fn is_checked(dom: &MockDom, css: &str) -> bool {
    dom.first(css).is_some_and(|input| dom.is_selected(input))
}

/// Show the fields passing the keyword and display filters; regions
/// without a shown field are hidden
fn apply_filters(dom: &mut MockDom) {
    let Some(section) = dom.first(".section.model-fields") else {
        return;
    };
    let keyword = input_value(dom, section, ".filter-field").trim().to_lowercase();
    let show_hidden = is_checked(dom, ".filter-hidden input");
    let show_system = is_checked(dom, ".filter-system input");
    let show_inherited = is_checked(dom, ".filter-inherited input");

    let mut shown = Vec::new();
    for field in dom.select_in(section, ".model-fields-list .model-field") {
        let display = attr_of(dom, field, "data-display");
        let inherited = dom.attr(field, "data-inherited") == Some("true");
        let label = attr_of(dom, field, "data-label").to_lowercase();
        let visible = (display != Display::Hidden.as_str() || show_hidden)
            && (display != Display::System.as_str() || show_system)
            && (!inherited || show_inherited)
            && (keyword.is_empty() || label.contains(&keyword));
        dom.set_hidden(field, !visible);
        if visible {
            shown.push(field);
        }
    }
    for region in dom.select_in(section, ".model-container") {
        let has_fields = dom
            .select_in(region, ".model-field")
            .iter()
            .any(|field| shown.contains(field));
        dom.set_hidden(region, !has_fields);
    }
    if let Some(message) = dom.first_in(section, ".filter-message") {
        dom.set_hidden(message, !shown.is_empty());
    }
}

fn field_dirty(dom: &MockDom, field: NodeId) -> bool {
    dom.attr(field, "data-created") == Some("true")
        || FIELD_KEYS.iter().any(|key| {
            dom.attr(field, &format!("data-{key}")) != dom.attr(field, &format!("data-saved-{key}"))
        })
}

/// Label shown for a field; an emptied label falls back to the saved one
fn shown_label(dom: &MockDom, field: NodeId) -> String {
    let label = attr_of(dom, field, "data-label");
    if label.trim().is_empty() {
        attr_of(dom, field, "data-saved-label")
    } else {
        label
    }
}

fn render_field_label(dom: &mut MockDom, field: NodeId) {
    let Some(control) = dom.first_in(field, ".control-label") else {
        return;
    };
    let label = shown_label(dom, field);
    let mandatory = dom.attr(field, "data-mandatory") == Some("true");
    let parent = (dom.attr(field, "data-inherited") == Some("true"))
        .then(|| dom.attr(field, "data-owner").and_then(find_model))
        .flatten()
        .map(|owner| owner.label);
    dom.clear_children(control);
    for part in label_parts(&label, mandatory, parent) {
        let _ = dom.append(control, part);
    }
}

fn details_field(dom: &MockDom) -> Option<NodeId> {
    let details = dom.first(".model-details")?;
    let id = dom.attr(details, "data-field")?;
    dom.first(&format!(".model-fields-list .model-field[data-id=\"{id}\"]"))
}

fn hide_details(dom: &mut MockDom) {
    if let Some(details) = dom.first(".model-details") {
        dom.clear_children(details);
        dom.remove_attr(details, "data-field");
        dom.set_hidden(details, true);
    }
}

/// Open the attribute panel of `field`
fn show_details(dom: &mut MockDom, field: NodeId) {
    let Some(details) = dom.first(".model-details") else {
        return;
    };
    for other in dom.select(".model-field.highlighted-model").unwrap_or_default() {
        dom.remove_class(other, "highlighted-model");
    }
    dom.add_class(field, "highlighted-model");
    dom.clear_children(details);
    dom.set_hidden(details, false);

    let id = attr_of(dom, field, "data-id");
    let label = attr_of(dom, field, "data-label");
    let kind = attr_of(dom, field, "data-type");
    let mandatory = dom.attr(field, "data-mandatory") == Some("true");
    let inherited = dom.attr(field, "data-inherited") == Some("true");
    let title = shown_label(dom, field);
    dom.set_attr(details, "data-field", &id);

    let panel = dom.append(
        details,
        MockNode::new("div")
            .class("model-attributes panel")
            .child(
                MockNode::new("div")
                    .class("panel-heading")
                    .child(MockNode::new("span").class("model-title").text(&title))
                    .when(inherited, |n| {
                        n.child(MockNode::new("button").class("btn btn-xs parent-field").text("Go to parent"))
                    }),
            )
            .child(
                MockNode::new("div")
                    .class("panel-body")
                    .child(attribute_node(
                        "label",
                        "Label",
                        MockNode::new("input")
                            .class("form-control")
                            .attr("type", "text")
                            .value(&label)
                            .when(inherited, |n| n.attr("readonly", "")),
                    ))
                    .child(attribute_node(
                        "mandatory",
                        "Mandatory",
                        checkbox("attribute-mandatory", "", mandatory, inherited),
                    ))
                    .child(attribute_node(
                        "typeOption",
                        "Type",
                        MockNode::new("div").class("attribute-select"),
                    )),
            ),
    );
    if let Some(cell) = dom.first_in(panel, ".attribute-select") {
        let select = TYPE_OPTIONS.iter().fold(Select2::single("attribute-typeOption"), |select, option| {
            if *option == kind {
                select.selected_option(option, option)
            } else {
                select.option(option, option)
            }
        });
        let select = if inherited { select.disabled() } else { select };
        let _ = select.mount(dom, cell);
    }
    render_details_state(dom);
}

fn mark_invalid(dom: &mut MockDom, attribute: NodeId, message: Option<&str>) {
    set_class(dom, attribute, "has-error", message.is_some());
    if let Some(messages) = dom.first_in(attribute, ".messages") {
        dom.clear_children(messages);
        if let Some(message) = message {
            let _ = dom.append(messages, MockNode::new("div").class("message").text(message));
        }
    }
}

fn render_details_state(dom: &mut MockDom) {
    let (Some(details), Some(field)) = (dom.first(".model-details"), details_field(dom)) else {
        return;
    };
    for (attribute_id, key) in [("label", "label"), ("mandatory", "mandatory"), ("typeOption", "type")] {
        let Some(attribute) = dom.first_in(details, &format!(".model-attribute[data-id=\"{attribute_id}\"]")) else {
            continue;
        };
        let dirty = dom.attr(field, &format!("data-{key}")) != dom.attr(field, &format!("data-saved-{key}"));
        set_class(dom, attribute, "dirty-model", dirty);
    }
    if let Some(attribute) = dom.first_in(details, ".model-attribute[data-id=\"label\"]") {
        let empty = attr_of(dom, field, "data-label").trim().is_empty();
        mark_invalid(dom, attribute, empty.then_some("Label is mandatory"));
    }
    if let Some(title) = dom.first_in(details, ".model-title") {
        let label = shown_label(dom, field);
        dom.set_text(title, &label);
    }
}

fn set_section_state(dom: &mut MockDom, key: &str, dirty: bool, invalid: bool) {
    if let Some(tab) = dom.first(&format!(".model-section-tab[data-section=\"{key}\"]")) {
        set_class(dom, tab, "modified-section", dirty);
    }
    if let Some(save) = dom.first(&format!(".section.model-{key} > .model-controls .model-save")) {
        dom.set_flag(save, "disabled", !dirty || invalid);
    }
    if let Some(cancel) = dom.first(&format!(".section.model-{key} > .model-controls .model-cancel")) {
        dom.set_flag(cancel, "disabled", !dirty);
    }
}

fn header_dirty(dom: &MockDom, header: NodeId) -> bool {
    LANGUAGES.iter().any(|(code, _)| {
        dom.attr(header, &format!("data-value-{code}")) != dom.attr(header, &format!("data-saved-{code}"))
    })
}

/// Recompute dirty marks, section markers and save/cancel availability
fn refresh_state(dom: &mut MockDom) {
    let mut fields_dirty = false;
    let mut invalid = false;
    for field in dom.select(".model-fields-list .model-field").unwrap_or_default() {
        let dirty = field_dirty(dom, field);
        set_class(dom, field, "dirty-model", dirty);
        fields_dirty |= dirty;
        invalid |= attr_of(dom, field, "data-label").trim().is_empty();
    }
    set_section_state(dom, "fields", fields_dirty, invalid);

    let mut headers_dirty = false;
    for header in dom.select(".model-headers-list .model-header").unwrap_or_default() {
        let dirty = header_dirty(dom, header);
        set_class(dom, header, "dirty-model", dirty);
        headers_dirty |= dirty;
    }
    set_section_state(dom, "headers", headers_dirty, false);

    let model = current_model(dom);
    if let Some(anchor) = dom.first(&format!(".model-tree-node[data-id=\"{model}\"] > .node-anchor")) {
        set_class(dom, anchor, "modified-node", fields_dirty || headers_dirty);
    }
}

fn edit_field(dom: &mut MockDom, key: &str, value: &str) {
    let Some(field) = details_field(dom) else {
        return;
    };
    dom.set_attr(field, &format!("data-{key}"), value);
    render_field_label(dom, field);
    render_details_state(dom);
    refresh_state(dom);
}

/// Whether the sandbox lets the save through; a failing one shows an error
fn save_allowed(dom: &mut MockDom) -> bool {
    if setting(dom, "data-save-status") == FAIL_SAVE {
        let model = current_model(dom);
        dom.log_event(format!("model-save-failed:{model}"));
        show_toast(dom, "error", "Saving the model failed");
        return false;
    }
    true
}

fn save_fields(dom: &mut MockDom) {
    if !save_allowed(dom) {
        return;
    }
    let mut saved = Vec::new();
    for field in dom.select(".model-fields-list .model-field").unwrap_or_default() {
        if !field_dirty(dom, field) {
            continue;
        }
        for key in FIELD_KEYS {
            let value = attr_of(dom, field, &format!("data-{key}"));
            dom.set_attr(field, &format!("data-saved-{key}"), &value);
        }
        dom.remove_attr(field, "data-created");
        saved.push(attr_of(dom, field, "data-id"));
    }
    let model = current_model(dom);
    dom.log_event(format!("model-save:{model}:{}", saved.join(",")));
    render_details_state(dom);
    refresh_state(dom);
    show_toast(dom, "success", "Model saved successfully");
}

fn cancel_fields(dom: &mut MockDom) {
    for field in dom.select(".model-fields-list .model-field").unwrap_or_default() {
        if dom.attr(field, "data-created") == Some("true") {
            dom.remove(field);
            continue;
        }
        for key in FIELD_KEYS {
            let saved = attr_of(dom, field, &format!("data-saved-{key}"));
            dom.set_attr(field, &format!("data-{key}"), &saved);
        }
        render_field_label(dom, field);
    }
    match details_field(dom) {
        Some(field) => show_details(dom, field),
        None => hide_details(dom),
    }
    apply_filters(dom);
    refresh_state(dom);
}

// =============================================================================
// CREATE DIALOGS
// =============================================================================

fn existing_field_ids(dom: &MockDom) -> Vec<String> {
    dom.select(".model-fields-list .model-field")
        .unwrap_or_default()
        .into_iter()
        .map(|field| attr_of(dom, field, "data-id"))
        .collect()
}

fn add_created_field(dom: &mut MockDom, field: &Field<'_>) {
    let model = current_model(dom);
    let Some(list) = dom.first(".model-fields-list") else {
        return;
    };
    let node = dom.append(list, field_node(field, &model).attr("data-created", "true"));
    dom.log_event(format!("model-create:{}", field.id));
    apply_filters(dom);
    show_details(dom, node);
    refresh_state(dom);
}

fn mount_type_select(dom: &mut MockDom, dialog: NodeId, options: &[&str]) {
    let Some(cell) = dom.first_in(dialog, ".model-attribute[data-id=\"typeOption\"] .attribute-select") else {
        return;
    };
    dom.clear_children(cell);
    let only = options.len() == 1;
    let select = options.iter().fold(
        Select2::single("createFieldType").placeholder("Select type"),
        |select, option| {
            if only {
                select.selected_option(option, option)
            } else {
                select.option(option, option)
            }
        },
    );
    let _ = select.mount(dom, cell);
}

fn open_create_field(dom: &mut MockDom) {
    let existing = existing_field_ids(dom);
    let properties = CREATABLE.iter().fold(
        Select2::single("createFieldProperty").placeholder("Select property"),
        |select, property| {
            if existing.iter().any(|id| id == local_name(property.uri)) {
                select.disabled_option(property.uri, property.label)
            } else {
                select.option(property.uri, property.label)
            }
        },
    );
    let body = MockNode::new("div")
        .child(
            MockNode::new("div")
                .class("model-form")
                .child(MockNode::new("div").class("select-property"))
                .child(
                    MockNode::new("div")
                        .class("missing-type")
                        .hidden()
                        .text("The selected property has no semantic type"),
                )
                .child(attribute_node(
                    "label",
                    "Label",
                    MockNode::new("input").class("form-control").attr("type", "text").value(""),
                ))
                .child(attribute_node(
                    "typeOption",
                    "Type",
                    MockNode::new("div").class("attribute-select"),
                )),
        )
        .child(model_controls());
    let root = dom.root();
    let dialog = dom.append(root, modal("model-create-field", "Create field", body, &[]));
    if let Some(cell) = dom.first_in(dialog, ".select-property") {
        let _ = properties.mount(dom, cell);
    }
    mount_type_select(dom, dialog, &[]);
    refresh_create_field(dom, dialog);
}

fn chosen_property(dom: &MockDom, dialog: NodeId) -> Option<&'static CreatableProperty> {
    let uri = selected(dom, dialog, "#createFieldProperty")?;
    CREATABLE.iter().find(|property| property.uri == uri)
}

fn refresh_create_field(dom: &mut MockDom, dialog: NodeId) {
    let property = chosen_property(dom, dialog);
    let kind = selected(dom, dialog, "#createFieldType");
    let label = input_value(dom, dialog, ".model-attribute[data-id=\"label\"] input");
    if let Some(message) = dom.first_in(dialog, ".missing-type") {
        let missing = property.is_some_and(|property| property.range.is_none()) && kind.is_none();
        dom.set_hidden(message, !missing);
    }
    if let Some(attribute) = dom.first_in(dialog, ".model-attribute[data-id=\"label\"]") {
        let invalid = property.is_some() && label.trim().is_empty();
        mark_invalid(dom, attribute, invalid.then_some("Label is mandatory"));
    }
    let ready = property.is_some() && kind.is_some() && !label.trim().is_empty();
    if let Some(save) = dom.first_in(dialog, ".model-save") {
        dom.set_flag(save, "disabled", !ready);
    }
    if let Some(cancel) = dom.first_in(dialog, ".model-cancel") {
        dom.set_flag(cancel, "disabled", false);
    }
}

fn create_field(dom: &mut MockDom, dialog: NodeId) {
    let (Some(property), Some(kind)) = (
        chosen_property(dom, dialog),
        selected(dom, dialog, "#createFieldType"),
    ) else {
        return;
    };
    let label = input_value(dom, dialog, ".model-attribute[data-id=\"label\"] input");
    let model = current_model(dom);
    dom.remove(dialog);
    add_created_field(
        dom,
        &Field {
            id: local_name(property.uri),
            label: &label,
            owner: &model,
            region: None,
            display: Display::Editable,
            mandatory: false,
            kind: &kind,
        },
    );
}

fn open_create_property(dom: &mut MockDom) {
    let destination = find_model(&current_model(dom)).map_or("", |model| model.label);
    let body = MockNode::new("div")
        .child(
            MockNode::new("div")
                .class("property-section")
                .child(MockNode::new("span").class("model-title").text("Property"))
                .child(attribute_node(
                    "title",
                    "Title",
                    MockNode::new("input").class("form-control").attr("type", "text").value(""),
                ))
                .child(attribute_node(
                    "creator",
                    "Creator",
                    MockNode::new("input")
                        .class("form-control")
                        .attr("type", "text")
                        .value("John Doe"),
                )),
        )
        .child(
            MockNode::new("div")
                .class("duplicate-property-message")
                .hidden()
                .text("A property with this title already exists"),
        )
        .child(
            MockNode::new("div")
                .class("destination-models-message")
                .child(MockNode::new("span").text("The field is added to"))
                .child(MockNode::new("span").class("models").text(destination)),
        )
        .child(model_controls());
    let root = dom.root();
    let dialog = dom.append(root, modal("model-create-property", "Create property", body, &[]));
    refresh_create_property(dom, dialog);
}

fn is_duplicate(dom: &MockDom, title: &str) -> bool {
    let id = slug(title);
    dom.select(".model-fields-list .model-field")
        .unwrap_or_default()
        .into_iter()
        .any(|field| {
            dom.attr(field, "data-id") == Some(id.as_str())
                || attr_of(dom, field, "data-saved-label").eq_ignore_ascii_case(title.trim())
        })
}

fn refresh_create_property(dom: &mut MockDom, dialog: NodeId) {
    let title = input_value(dom, dialog, ".model-attribute[data-id=\"title\"] input");
    let creator = input_value(dom, dialog, ".model-attribute[data-id=\"creator\"] input");
    for (id, value) in [("title", &title), ("creator", &creator)] {
        if let Some(attribute) = dom.first_in(dialog, &format!(".model-attribute[data-id=\"{id}\"]")) {
            mark_invalid(dom, attribute, value.trim().is_empty().then_some("The value is mandatory"));
        }
    }
    let duplicate = !title.trim().is_empty() && is_duplicate(dom, &title);
    if let Some(message) = dom.first_in(dialog, ".duplicate-property-message") {
        dom.set_hidden(message, !duplicate);
    }
    let ready = !title.trim().is_empty() && !creator.trim().is_empty() && !duplicate;
    if let Some(save) = dom.first_in(dialog, ".model-save") {
        dom.set_flag(save, "disabled", !ready);
    }
    if let Some(cancel) = dom.first_in(dialog, ".model-cancel") {
        dom.set_flag(cancel, "disabled", false);
    }
}

fn create_property(dom: &mut MockDom, dialog: NodeId) {
    let title = input_value(dom, dialog, ".model-attribute[data-id=\"title\"] input");
    let creator = input_value(dom, dialog, ".model-attribute[data-id=\"creator\"] input");
    if title.trim().is_empty() || creator.trim().is_empty() || is_duplicate(dom, &title) {
        return;
    }
    let id = slug(&title);
    let model = current_model(dom);
    dom.remove(dialog);
    dom.log_event(format!("model-property:{id}:{}", creator.trim()));
    add_created_field(
        dom,
        &Field {
            id: &id,
            label: title.trim(),
            owner: &model,
            region: None,
            display: Display::Editable,
            mandatory: false,
            kind: "ALPHA_NUMERIC_TYPE",
        },
    );
}

// =============================================================================
// HEADERS
// =============================================================================

/// Show every header in the selected language; an empty value shows the
/// system language value as placeholder
fn show_header_values(dom: &mut MockDom) {
    let Some(section) = dom.first(".section.model-headers") else {
        return;
    };
    let lang = attr_of(dom, section, "data-lang");
    let system_lang = setting(dom, "data-system-lang");
    for header in dom.select_in(section, ".model-header") {
        let value = attr_of(dom, header, &format!("data-value-{lang}"));
        let fallback = attr_of(dom, header, &format!("data-value-{system_lang}"));
        let Some(textarea) = dom.first_in(header, "textarea") else {
            continue;
        };
        dom.set_attr(textarea, "value", &value);
        dom.set_text(textarea, &value);
        if value.is_empty() && !fallback.is_empty() {
            dom.set_attr(textarea, "placeholder", &fallback);
        } else {
            dom.remove_attr(textarea, "placeholder");
        }
    }
}

fn save_headers(dom: &mut MockDom) {
    if !save_allowed(dom) {
        return;
    }
    let mut saved = Vec::new();
    for header in dom.select(".model-headers-list .model-header").unwrap_or_default() {
        if !header_dirty(dom, header) {
            continue;
        }
        for (code, _) in LANGUAGES {
            let value = attr_of(dom, header, &format!("data-value-{code}"));
            dom.set_attr(header, &format!("data-saved-{code}"), &value);
        }
        saved.push(attr_of(dom, header, "data-type"));
    }
    let model = current_model(dom);
    dom.log_event(format!("model-save:{model}:{}", saved.join(",")));
    refresh_state(dom);
    show_toast(dom, "success", "Model saved successfully");
}

fn cancel_headers(dom: &mut MockDom) {
    for header in dom.select(".model-headers-list .model-header").unwrap_or_default() {
        for (code, _) in LANGUAGES {
            let saved = attr_of(dom, header, &format!("data-saved-{code}"));
            dom.set_attr(header, &format!("data-value-{code}"), &saved);
        }
    }
    show_header_values(dom);
    refresh_state(dom);
}

// =============================================================================
// MOUNT
// =============================================================================

/// Model tree plus sections; hash parameters `userLang`, `systemLang`,
/// `saveStatus` and the base64 encoded `model` select the starting state
pub(super) fn mount_model_management(dom: &mut MockDom, location: &SandboxLocation) -> E2eResult<()> {
    let root = dom.root();
    let tree_roots = MODELS
        .iter()
        .filter(|model| model.parent.is_none())
        .map(tree_node);
    let _ = dom.append(
        root,
        MockNode::new("div")
            .class("model-management")
            .attr("data-user-lang", location.param("userLang").unwrap_or("en"))
            .attr("data-system-lang", location.param("systemLang").unwrap_or("en"))
            .attr("data-save-status", location.param("saveStatus").unwrap_or_default())
            .child(
                MockNode::new("div")
                    .class("model-tree")
                    .child(MockNode::new("ul").children(tree_roots)),
            )
            .child(MockNode::new("div").class("model-data")),
    );
    let model = location.param("model").and_then(decode_model).unwrap_or_default();
    load_model(dom, &model);

    select2::behaviour(dom)?;
    toast_behaviour(dom)?;
    dom.on_click(".model-tree .node-anchor", |dom, anchor| {
        let id = dom
            .closest(anchor, ".model-tree-node")
            .map(|node| attr_of(dom, node, "data-id"))
            .unwrap_or_default();
        load_model(dom, &id);
    })?;
    dom.on_click(".model-sections li a", |dom, link| {
        let key = dom
            .closest(link, ".model-section-tab")
            .map(|tab| attr_of(dom, tab, "data-section"))
            .unwrap_or_default();
        activate_section(dom, &key);
    })?;

    dom.on_input(".model-fields .filter-field", |dom, _| apply_filters(dom))?;
    dom.on_input(".model-fields .display-section input", |dom, _| apply_filters(dom))?;
    dom.on_click(".model-field .attributes", |dom, button| {
        if let Some(field) = dom.closest(button, ".model-field") {
            show_details(dom, field);
        }
    })?;
    dom.on_click(".model-details .parent-field", |dom, _| {
        let Some(field) = details_field(dom) else {
            return;
        };
        let id = attr_of(dom, field, "data-id");
        let owner = attr_of(dom, field, "data-owner");
        load_model(dom, &owner);
        activate_section(dom, "fields");
        if let Some(field) = dom.first(&format!(".model-fields-list .model-field[data-id=\"{id}\"]")) {
            show_details(dom, field);
        }
    })?;
    dom.on_input(".model-details .model-attribute[data-id=\"label\"] input", |dom, input| {
        let value = attr_of(dom, input, "value");
        edit_field(dom, "label", &value);
    })?;
    dom.on_input(".model-details .model-attribute[data-id=\"mandatory\"] input", |dom, input| {
        let value = if dom.is_selected(input) { "true" } else { "false" };
        edit_field(dom, "mandatory", value);
    })?;
    dom.on_input("#attribute-typeOption select", |dom, _| {
        let Some(details) = dom.first(".model-details") else {
            return;
        };
        let value = selected(dom, details, "#attribute-typeOption").unwrap_or_default();
        edit_field(dom, "type", &value);
    })?;
    dom.on_click(".model-fields > .model-controls .model-save", |dom, _| save_fields(dom))?;
    dom.on_click(".model-fields > .model-controls .model-cancel", |dom, _| cancel_fields(dom))?;

    dom.on_click(".model-fields .create-field", |dom, _| open_create_field(dom))?;
    dom.on_input("#createFieldProperty select", |dom, select| {
        let Some(dialog) = dom.closest(select, ".modal-dialog") else {
            return;
        };
        if let Some(property) = chosen_property(dom, dialog) {
            if let Some(input) = dom.first_in(dialog, ".model-attribute[data-id=\"label\"] input") {
                dom.set_attr(input, "value", property.label);
            }
            mount_type_select(dom, dialog, &types_for(property.range));
        }
        refresh_create_field(dom, dialog);
    })?;
    dom.on_input(
        "#createFieldType select, .model-create-field .model-attribute[data-id=\"label\"] input",
        |dom, control| {
            if let Some(dialog) = dom.closest(control, ".modal-dialog") {
                refresh_create_field(dom, dialog);
            }
        },
    )?;
    dom.on_click(".model-create-field .model-save", |dom, button| {
        if let Some(dialog) = dom.closest(button, ".modal-dialog") {
            create_field(dom, dialog);
        }
    })?;

    dom.on_click(".model-fields .create-property", |dom, _| open_create_property(dom))?;
    dom.on_input(".model-create-property .model-attribute input", |dom, input| {
        if let Some(dialog) = dom.closest(input, ".modal-dialog") {
            refresh_create_property(dom, dialog);
        }
    })?;
    dom.on_click(".model-create-property .model-save", |dom, button| {
        if let Some(dialog) = dom.closest(button, ".modal-dialog") {
            create_property(dom, dialog);
        }
    })?;
    dom.on_click(
        ".model-create-field .model-cancel, .model-create-field .close, \
         .model-create-property .model-cancel, .model-create-property .close",
        |dom, button| {
            if let Some(dialog) = dom.closest(button, ".modal-dialog") {
                dom.remove(dialog);
            }
        },
    )?;

    dom.on_input("#headerLanguage select", |dom, _| {
        let Some(section) = dom.first(".section.model-headers") else {
            return;
        };
        let lang = selected(dom, section, "#headerLanguage").unwrap_or_else(|| "en".to_string());
        dom.set_attr(section, "data-lang", &lang);
        show_header_values(dom);
    })?;
    dom.on_input(".model-header textarea", |dom, textarea| {
        let (Some(header), Some(section)) = (
            dom.closest(textarea, ".model-header"),
            dom.first(".section.model-headers"),
        ) else {
            return;
        };
        let lang = attr_of(dom, section, "data-lang");
        let value = attr_of(dom, textarea, "value");
        dom.set_attr(header, &format!("data-value-{lang}"), &value);
        refresh_state(dom);
    })?;
    dom.on_click(".model-headers > .model-controls .model-save", |dom, _| save_headers(dom))?;
    dom.on_click(".model-headers > .model-controls .model-cancel", |dom, _| cancel_headers(dom))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn mounted(hash: &str) -> MockDom {
        let mut dom = MockDom::new();
        let url = format!("{MODEL_MANAGEMENT}#/{hash}");
        mount_model_management(&mut dom, &SandboxLocation::parse(&url)).unwrap();
        dom
    }

    fn media() -> MockDom {
        mounted("?userLang=en&systemLang=en&model=TVgxMDAx")
    }

    fn shown(dom: &MockDom, css: &str) -> Vec<String> {
        dom.select(css)
            .unwrap()
            .into_iter()
            .filter(|node| dom.is_displayed(*node))
            .map(|node| attr_of(dom, node, "data-id"))
            .collect()
    }

    mod model_tests {
        use super::*;

        #[test]
        fn test_lineage_and_headers() {
            assert_eq!(lineage("MX1001"), vec!["MX1001", "EO1001"]);
            assert!(lineage("nope").is_empty());
            assert_eq!(header_for("MX1001", "default_header").unwrap().owner, "MX1001");
            assert_eq!(header_for("MX1001", "compact_header").unwrap().owner, "EO1001");
            assert_eq!(slug("Weight  Limit!"), "weight-limit");
            assert_eq!(local_name("http://www.w3.org/ns/oa#numericForCreate"), "numericForCreate");
        }

        #[test]
        fn test_model_param_selects_the_model() {
            let dom = media();
            assert_eq!(current_model(&dom), "MX1001");
            let anchor = dom.first(".model-tree-node[data-id=\"MX1001\"] > .node-anchor").unwrap();
            assert!(dom.has_class(anchor, "selected"));
            assert_eq!(dom.events(), ["model-load:MX1001"]);

            let empty = mounted("?userLang=en");
            assert!(empty.first(".select-message").is_some());
        }
    }

    mod fields_tests {
        use super::*;

        #[test]
        fn test_display_filters() {
            let mut dom = media();
            let visible = |dom: &MockDom| shown(dom, ".model-data .model-field");
            let general = ".model-container[data-id=\"generalDetails\"] .model-field";
            assert!(visible(&dom).is_empty());

            let fields_tab = dom.first(".model-section-tab[data-section=\"fields\"] a").unwrap();
            dom.dispatch_click(fields_tab);
            assert_eq!(visible(&dom).len(), 8);
            assert_eq!(shown(&dom, general).len(), 5);

            let system = dom.first(".filter-system i").unwrap();
            dom.dispatch_click(system);
            assert_eq!(shown(&dom, general).len(), 6);

            let inherited = dom.first(".filter-inherited i").unwrap();
            dom.dispatch_click(inherited);
            let region = dom.first(".model-container[data-id=\"generalDetails\"]").unwrap();
            assert!(!dom.is_displayed(region));
            assert_eq!(visible(&dom), vec!["email", "notes"]);
        }

        #[test]
        fn test_label_edit_dirty_and_cancel() {
            let mut dom = media();
            let button = dom.first(".model-field[data-id=\"email\"] .attributes").unwrap();
            dom.dispatch_click(button);
            let input = dom.first(".model-details .model-attribute[data-id=\"label\"] input").unwrap();
            dom.set_attr(input, "value", "");
            dom.dispatch_input(input);
            let save = dom.first(".model-fields > .model-controls .model-save").unwrap();
            let attribute = dom.first(".model-details .model-attribute[data-id=\"label\"]").unwrap();
            assert!(dom.has_class(attribute, "has-error"));
            assert!(dom.attr(save, "disabled").is_some());

            dom.set_attr(input, "value", "Mail");
            dom.dispatch_input(input);
            assert!(dom.attr(save, "disabled").is_none());
            let label = dom.first(".model-field[data-id=\"email\"] .field-label").unwrap();
            assert_eq!(dom.own_text(label), "Mail");
            let anchor = dom.first(".model-tree-node[data-id=\"MX1001\"] > .node-anchor").unwrap();
            assert!(dom.has_class(anchor, "modified-node"));

            let cancel = dom.first(".model-fields > .model-controls .model-cancel").unwrap();
            dom.dispatch_click(cancel);
            let label = dom.first(".model-field[data-id=\"email\"] .field-label").unwrap();
            assert_eq!(dom.own_text(label), "E-mail address");
            assert!(!dom.has_class(anchor, "modified-node"));
        }

        #[test]
        fn test_failing_save_keeps_changes() {
            let mut dom = mounted("?model=TVgxMDAx&saveStatus=FAIL_SAVE");
            let button = dom.first(".model-field[data-id=\"notes\"] .attributes").unwrap();
            dom.dispatch_click(button);
            let mandatory = dom.first(".model-details .model-attribute[data-id=\"mandatory\"] i").unwrap();
            dom.dispatch_click(mandatory);
            let save = dom.first(".model-fields > .model-controls .model-save").unwrap();
            dom.dispatch_click(save);
            assert!(dom.first(".toast-error").is_some());
            let field = dom.first(".model-field[data-id=\"notes\"]").unwrap();
            assert!(dom.has_class(field, "dirty-model"));
            assert!(dom.first(".model-field[data-id=\"notes\"] .mandatory-mark").is_some());
        }

        #[test]
        fn test_create_property_rejects_duplicates() {
            let mut dom = media();
            let open = dom.first(".create-property").unwrap();
            dom.dispatch_click(open);
            let title = dom.first(".model-create-property .model-attribute[data-id=\"title\"] input").unwrap();
            dom.set_attr(title, "value", "notes");
            dom.dispatch_input(title);
            let message = dom.first(".duplicate-property-message").unwrap();
            assert!(dom.is_displayed(message));

            dom.set_attr(title, "value", "Weight");
            dom.dispatch_input(title);
            let save = dom.first(".model-create-property .model-save").unwrap();
            dom.dispatch_click(save);
            assert!(dom.first(".model-create-property").is_none());
            let created = dom.first(".model-field[data-id=\"weight\"]").unwrap();
            assert!(dom.has_class(created, "dirty-model"));
            assert!(dom.has_class(created, "highlighted-model"));
        }
    }

    mod headers_tests {
        use super::*;

        #[test]
        fn test_language_switch_and_fallback() {
            let mut dom = mounted("?userLang=de&systemLang=en&model=TVgxMDAx");
            let compact = dom.first(".model-header[data-type=\"compact_header\"] textarea").unwrap();
            assert_eq!(dom.attr(compact, "value"), Some(""));
            assert_eq!(
                dom.attr(compact, "placeholder"),
                Some("${eval(<span>(EO1001) Compact Header</span>)}")
            );
            let default = dom.first(".model-header[data-type=\"default_header\"] textarea").unwrap();
            assert_eq!(
                dom.attr(default, "value"),
                Some("${eval(<span>(MX1001) Standard Kopfzeile</span>)}")
            );

            dom.set_attr(compact, "value", "kompakt");
            dom.dispatch_input(compact);
            let tab = dom.first(".model-section-tab[data-section=\"headers\"]").unwrap();
            assert!(dom.has_class(tab, "modified-section"));
            let cancel = dom.first(".model-headers > .model-controls .model-cancel").unwrap();
            dom.dispatch_click(cancel);
            assert!(!dom.has_class(tab, "modified-section"));
            assert_eq!(dom.attr(compact, "value"), Some(""));
        }
    }
}
