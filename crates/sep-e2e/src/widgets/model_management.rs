//! Model management: the model tree plus the general, fields and headers
//! sections of the selected model.
//!
//! Edits are tracked per section. A changed field, header or attribute
//! carries `dirty-model`, its section tab carries `modified-section` and
//! the tree node of the model carries `modified-node` until the section is
//! saved or cancelled.

use crate::components::{CheckboxField, Notification, SingleSelectMenu};
use crate::driver::{Element, Session};
use crate::locator::Selector;
use crate::page_object::{impl_page_object, PageObject, PageRegion};
use crate::result::E2eResult;
use crate::sandbox::{SandboxHash, SandboxPage};
use crate::wait::Condition;
use base64::Engine;
use tracing::info;

/// Route of the model management sandbox
pub const MODEL_MANAGEMENT_URL: &str = "/sandbox/administration/model-management";

const SAVE_SUCCEEDS: &str = "SUCCESS_SAVE";
const SAVE_FAILS: &str = "FAIL_SAVE";

/// Languages and save outcome the sandbox starts with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOptions {
    /// Language the headers are shown in
    pub user_lang: String,
    /// Language whose values fill empty headers as placeholders
    pub system_lang: String,
    /// Model selected on load
    pub model: Option<String>,
    /// Saving any section fails
    pub save_fails: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelOptions {
    /// English, nothing selected, saves succeed
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_lang: "en".to_string(),
            system_lang: "en".to_string(),
            model: None,
            save_fails: false,
        }
    }

    /// Select `id` on load
    #[must_use]
    pub fn with_model(mut self, id: impl Into<String>) -> Self {
        self.model = Some(id.into());
        self
    }

    /// User and system language
    #[must_use]
    pub fn with_languages(mut self, user: impl Into<String>, system: impl Into<String>) -> Self {
        self.user_lang = user.into();
        self.system_lang = system.into();
        self
    }

    /// Make every save fail
    #[must_use]
    pub const fn failing_save(mut self) -> Self {
        self.save_fails = true;
        self
    }

    /// Sandbox hash; the model id travels base64 encoded
    #[must_use]
    pub fn hash(&self) -> SandboxHash {
        let hash = SandboxHash::new()
            .param("userLang", &self.user_lang)
            .param("systemLang", &self.system_lang)
            .param("saveStatus", if self.save_fails { SAVE_FAILS } else { SAVE_SUCCEEDS });
        match self.model {
            Some(ref id) => hash.param("model", base64::engine::general_purpose::STANDARD.encode(id)),
            None => hash,
        }
    }
}

/// Sandbox wrapper of the model management page
#[derive(Debug)]
pub struct ModelManagementSandbox<'a> {
    sandbox: &'a mut SandboxPage,
}

impl<'a> ModelManagementSandbox<'a> {
    /// Wrap a sandbox navigation helper
    #[must_use]
    pub fn new(sandbox: &'a mut SandboxPage) -> Self {
        Self { sandbox }
    }

    /// Open the sandbox with `options` and wait for the tree
    pub async fn open(&mut self, options: &ModelOptions) -> E2eResult<ModelManagement> {
        info!(model = ?options.model, lang = %options.user_lang, "open model management");
        let hash = options.hash().to_string();
        let _ = self.sandbox.open(MODEL_MANAGEMENT_URL, Some(&hash)).await?;
        ModelManagement::locate(self.sandbox.session(), Selector::css(".model-management")).await
    }
}

/// Whole page: tree on one side, sections of the selected model on the other
#[derive(Debug, Clone)]
pub struct ModelManagement {
    region: PageRegion,
}

impl_page_object!(ModelManagement, "ModelManagement", |page| {
    let _ = page.region.visible_child(".model-tree").await?;
    let _ = page.region.present_child(".model-data").await?;
    Ok(())
});

impl ModelManagement {
    /// Model tree
    pub async fn tree(&self) -> E2eResult<ModelTree> {
        ModelTree::locate_within(self.region.element(), Selector::css(".model-tree")).await
    }

    /// Sections of the selected model
    pub async fn data(&self) -> E2eResult<ModelData> {
        ModelData::locate_within(self.region.element(), Selector::css(".model-data")).await
    }

    /// Session of the page
    #[must_use]
    pub fn session(&self) -> &Session {
        self.region.session()
    }
}

fn node_anchor(id: &str) -> String {
    format!(".model-tree-node[data-id=\"{id}\"] > .node-anchor")
}

/// Tree of models, one node per model nested under its parent
#[derive(Debug, Clone)]
pub struct ModelTree {
    region: PageRegion,
}

impl_page_object!(ModelTree, "ModelTree", |page| page.region.wait_until_visible().await);

impl ModelTree {
    /// Click the node of model `id` and wait for its sections
    pub async fn select_node(&self, id: &str) -> E2eResult<()> {
        self.region.find(node_anchor(id)).await?.click().await?;
        let loaded = format!(".model-data[data-model=\"{id}\"] .model-sections");
        let _ = self.region.wait_for(Condition::present(loaded.as_str())).await?;
        Ok(())
    }

    /// Whether the node of model `id` is the selected one
    pub async fn is_node_selected(&self, id: &str) -> E2eResult<bool> {
        self.region.find(node_anchor(id)).await?.has_class("selected").await
    }

    /// Whether model `id` has unsaved changes
    pub async fn is_node_modified(&self, id: &str) -> E2eResult<bool> {
        self.region.find(node_anchor(id)).await?.has_class("modified-node").await
    }

    /// Ids of all models in tree order
    pub async fn model_ids(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for node in self.region.find_all(".model-tree-node").await? {
            out.push(node.attribute("data-id").await?.unwrap_or_default());
        }
        Ok(out)
    }
}

/// Section tabs of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSection {
    /// Name, id and parent
    General,
    /// Fields and regions
    Fields,
    /// Header templates
    Headers,
}

impl ModelSection {
    /// Key of the section in the markup
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Fields => "fields",
            Self::Headers => "headers",
        }
    }
}

/// Sections of the selected model
#[derive(Debug, Clone)]
pub struct ModelData {
    region: PageRegion,
}

impl_page_object!(ModelData, "ModelData", |page| page.region.wait_until_present().await);

impl ModelData {
    /// Id of the loaded model, `None` before one is selected
    pub async fn selected_model(&self) -> E2eResult<Option<String>> {
        Ok(self
            .region
            .element()
            .attribute("data-model")
            .await?
            .filter(|id| !id.is_empty()))
    }

    /// Whether the page asks to pick a model
    pub async fn is_select_message_displayed(&self) -> E2eResult<bool> {
        match self.region.find_optional(".select-message").await? {
            Some(message) => message.is_displayed().await,
            None => Ok(false),
        }
    }

    async fn tab(&self, section: ModelSection) -> E2eResult<Element> {
        self.region
            .find(format!(".model-section-tab[data-section=\"{}\"]", section.key()))
            .await
    }

    /// Whether `section` has unsaved changes
    pub async fn is_section_modified(&self, section: ModelSection) -> E2eResult<bool> {
        self.tab(section).await?.has_class("modified-section").await
    }

    async fn activate(&self, section: ModelSection) -> E2eResult<Element> {
        let tab = self.tab(section).await?;
        if !tab.has_class("active").await? {
            tab.find("a").await?.click().await?;
            let tab = &tab;
            let _ = self
                .region
                .waiter()
                .until_fn("section tab active", || async move { tab.has_class("active").await })
                .await?;
        }
        self.region
            .visible_child(format!(".section[data-section=\"{}\"]", section.key()))
            .await
    }

    /// Activate and return the general section
    pub async fn general(&self) -> E2eResult<ModelGeneralSection> {
        ModelGeneralSection::bind(Some(self.activate(ModelSection::General).await?)).await
    }

    /// Activate and return the fields section
    pub async fn fields(&self) -> E2eResult<ModelFieldsSection> {
        ModelFieldsSection::bind(Some(self.activate(ModelSection::Fields).await?)).await
    }

    /// Activate and return the headers section
    pub async fn headers(&self) -> E2eResult<ModelHeadersSection> {
        ModelHeadersSection::bind(Some(self.activate(ModelSection::Headers).await?)).await
    }
}

/// Name, id and parent of the model
#[derive(Debug, Clone)]
pub struct ModelGeneralSection {
    region: PageRegion,
}

impl_page_object!(ModelGeneralSection, "ModelGeneralSection", |page| {
    let _ = page.region.visible_child(".model-header-name").await?;
    Ok(())
});

impl ModelGeneralSection {
    /// Display name
    pub async fn name(&self) -> E2eResult<String> {
        self.region.find(".model-header-name").await?.text().await
    }

    /// Model id
    pub async fn id(&self) -> E2eResult<String> {
        self.region.find(".model-header-id").await?.text().await
    }

    /// Name of the parent model, empty for a root model
    pub async fn parent(&self) -> E2eResult<String> {
        self.region.find(".model-parent").await?.text().await
    }
}

// =============================================================================
// FIELDS
// =============================================================================

/// Display filters of the fields section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayFilter {
    /// Fields with `HIDDEN` display
    Hidden,
    /// Fields with `SYSTEM` display
    System,
    /// Fields defined by an ancestor model
    Inherited,
}

impl DisplayFilter {
    const fn class(self) -> &'static str {
        match self {
            Self::Hidden => ".filter-hidden",
            Self::System => ".filter-system",
            Self::Inherited => ".filter-inherited",
        }
    }
}

async fn displayed(elements: Vec<Element>) -> E2eResult<Vec<Element>> {
    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        if element.is_displayed().await? {
            out.push(element);
        }
    }
    Ok(out)
}

async fn ids(elements: Vec<Element>) -> E2eResult<Vec<String>> {
    let mut out = Vec::with_capacity(elements.len());
    for element in displayed(elements).await? {
        out.push(element.attribute("data-id").await?.unwrap_or_default());
    }
    Ok(out)
}

/// Field list with its filters, attribute panel and save controls
#[derive(Debug, Clone)]
pub struct ModelFieldsSection {
    region: PageRegion,
}

impl_page_object!(ModelFieldsSection, "ModelFieldsSection", |page| {
    let _ = page.region.visible_child(".filter-section .filter-field").await?;
    let _ = page.region.present_child(".model-fields-list").await?;
    Ok(())
});

impl ModelFieldsSection {
    /// Show only fields whose label contains `keyword`
    pub async fn filter_by_keyword(&self, keyword: &str) -> E2eResult<()> {
        let input = self.region.find(".filter-field").await?;
        input.clear().await?;
        if !keyword.is_empty() {
            input.send_keys(keyword).await?;
        }
        Ok(())
    }

    /// Checkbox of a display filter
    pub async fn display_filter(&self, filter: DisplayFilter) -> E2eResult<CheckboxField> {
        CheckboxField::locate_within(
            self.region.element(),
            Selector::css(format!(".display-section {}", filter.class())),
        )
        .await
    }

    /// Flip a display filter
    pub async fn toggle(&self, filter: DisplayFilter) -> E2eResult<()> {
        self.display_filter(filter).await?.toggle().await
    }

    /// Ids of the displayed fields in list order
    pub async fn field_ids(&self) -> E2eResult<Vec<String>> {
        ids(self.region.find_all(".model-fields-list .model-field").await?).await
    }

    /// Displayed fields in list order
    pub async fn fields(&self) -> E2eResult<Vec<ModelField>> {
        let mut out = Vec::new();
        for element in displayed(self.region.find_all(".model-fields-list .model-field").await?).await? {
            out.push(ModelField::bind(Some(element)).await?);
        }
        Ok(out)
    }

    /// Field `id`, displayed or not
    pub async fn field(&self, id: &str) -> E2eResult<ModelField> {
        ModelField::locate_within(
            self.region.element(),
            Selector::css(format!(".model-fields-list .model-field[data-id=\"{id}\"]")),
        )
        .await
    }

    /// Ids of the displayed regions
    pub async fn region_ids(&self) -> E2eResult<Vec<String>> {
        ids(self.region.find_all(".model-container").await?).await
    }

    /// Region `id`
    pub async fn region(&self, id: &str) -> E2eResult<ModelRegion> {
        ModelRegion::locate_within(
            self.region.element(),
            Selector::css(format!(".model-container[data-id=\"{id}\"]")),
        )
        .await
    }

    /// Whether the filters hide every field
    pub async fn is_no_results_message_displayed(&self) -> E2eResult<bool> {
        self.region.find(".filter-message").await?.is_displayed().await
    }

    /// Attribute panel of the highlighted field
    pub async fn details(&self) -> E2eResult<ModelDetails> {
        ModelDetails::locate_within(
            self.region.element(),
            Selector::css(".model-details .model-attributes"),
        )
        .await
    }

    /// Save and cancel buttons
    pub async fn controls(&self) -> E2eResult<ModelControls> {
        ModelControls::locate_within(self.region.element(), Selector::css(".model-controls")).await
    }

    /// Open the dialog adding a field for an existing property
    pub async fn create_field(&self) -> E2eResult<ModelCreateFieldDialog> {
        self.region.find(".control-section .create-field").await?.click().await?;
        ModelCreateFieldDialog::locate(
            self.region.session(),
            Selector::css(".modal-dialog.model-create-field"),
        )
        .await
    }

    /// Open the dialog adding a field for a new property
    pub async fn create_property(&self) -> E2eResult<ModelCreatePropertyDialog> {
        self.region.find(".control-section .create-property").await?.click().await?;
        ModelCreatePropertyDialog::locate(
            self.region.session(),
            Selector::css(".modal-dialog.model-create-property"),
        )
        .await
    }
}

/// Titled group of fields
#[derive(Debug, Clone)]
pub struct ModelRegion {
    region: PageRegion,
}

impl_page_object!(ModelRegion, "ModelRegion", |page| {
    let _ = page.region.present_child(".container-header .container-name").await?;
    Ok(())
});

impl ModelRegion {
    /// Region title
    pub async fn name(&self) -> E2eResult<String> {
        self.region.find(".container-name").await?.text().await
    }

    /// Ids of the displayed fields of the region
    pub async fn field_ids(&self) -> E2eResult<Vec<String>> {
        ids(self.region.find_all(".container-body .model-field").await?).await
    }

    /// Whether any field of the region passes the filters
    pub async fn is_displayed(&self) -> E2eResult<bool> {
        self.region.element().is_displayed().await
    }
}

/// One row of the field list
#[derive(Debug, Clone)]
pub struct ModelField {
    region: PageRegion,
}

impl_page_object!(ModelField, "ModelField", |page| {
    let _ = page.region.present_child(".control-label .field-label").await?;
    Ok(())
});

impl ModelField {
    /// Field id
    pub async fn id(&self) -> E2eResult<String> {
        Ok(self.region.element().attribute("data-id").await?.unwrap_or_default())
    }

    /// Shown label
    pub async fn label(&self) -> E2eResult<String> {
        self.region.find(".field-label").await?.text().await
    }

    /// Whether the mandatory mark is rendered
    pub async fn is_mandatory(&self) -> E2eResult<bool> {
        self.region.has(".mandatory-mark").await
    }

    /// Whether an ancestor model defines the field
    pub async fn is_inherited(&self) -> E2eResult<bool> {
        Ok(self.region.element().attribute("data-inherited").await?.as_deref() == Some("true"))
    }

    /// Name of the defining model of an inherited field
    pub async fn parent(&self) -> E2eResult<Option<String>> {
        match self.region.find_optional(".field-parent").await? {
            Some(parent) => Ok(Some(parent.text().await?)),
            None => Ok(None),
        }
    }

    /// Whether the field has unsaved changes
    pub async fn is_dirty(&self) -> E2eResult<bool> {
        self.region.has_class("dirty-model").await
    }

    /// Whether the attribute panel shows this field
    pub async fn is_highlighted(&self) -> E2eResult<bool> {
        self.region.has_class("highlighted-model").await
    }

    /// Open the attribute panel of this field
    pub async fn show_attributes(&self) -> E2eResult<ModelDetails> {
        let id = self.id().await?;
        self.region.find(".attributes").await?.click().await?;
        let panel = format!(".model-details[data-field=\"{id}\"] .model-attributes");
        ModelDetails::locate(self.region.session(), Selector::css(panel)).await
    }
}

/// Attribute panel of one field
#[derive(Debug, Clone)]
pub struct ModelDetails {
    region: PageRegion,
}

impl_page_object!(ModelDetails, "ModelDetails", |page| {
    let _ = page.region.visible_child(".panel-heading .model-title").await?;
    Ok(())
});

impl ModelDetails {
    /// Label of the field in the heading
    pub async fn title(&self) -> E2eResult<String> {
        self.region.find(".model-title").await?.text().await
    }

    /// Attribute `id` (`label`, `mandatory` or `typeOption`)
    pub async fn attribute(&self, id: &str) -> E2eResult<ModelAttribute> {
        ModelAttribute::locate_within(
            self.region.element(),
            Selector::css(format!(".model-attribute[data-id=\"{id}\"]")),
        )
        .await
    }

    /// Whether the field is inherited and can be opened in its model
    pub async fn can_navigate_to_parent(&self) -> E2eResult<bool> {
        self.region.has(".parent-field").await
    }

    /// Load the defining model with this field highlighted
    pub async fn navigate_to_parent(&self) -> E2eResult<ModelFieldsSection> {
        self.region.find(".parent-field").await?.click().await?;
        let _ = self.region.wait_for(Condition::stale(self.region.element())).await?;
        ModelFieldsSection::locate(self.region.session(), Selector::css(".section.model-fields"))
            .await
    }
}

/// Labelled attribute control with validation messages
#[derive(Debug, Clone)]
pub struct ModelAttribute {
    region: PageRegion,
}

impl_page_object!(ModelAttribute, "ModelAttribute", |page| {
    let _ = page.region.present_child(".attribute-control").await?;
    Ok(())
});

impl ModelAttribute {
    /// Whether the value differs from the saved one
    pub async fn is_dirty(&self) -> E2eResult<bool> {
        self.region.has_class("dirty-model").await
    }

    /// Whether the value fails validation
    pub async fn is_invalid(&self) -> E2eResult<bool> {
        self.region.has_class("has-error").await
    }

    /// Validation messages
    pub async fn messages(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for message in self.region.find_all(".messages .message").await? {
            out.push(message.text().await?);
        }
        Ok(out)
    }

    /// Value of a text attribute
    pub async fn value(&self) -> E2eResult<String> {
        self.region.find(".attribute-control input").await?.value().await
    }

    /// Replace the value of a text attribute
    pub async fn set_value(&self, value: &str) -> E2eResult<()> {
        let input = self.region.find(".attribute-control input").await?;
        input.clear().await?;
        if !value.is_empty() {
            input.send_keys(value).await?;
        }
        Ok(())
    }

    /// Whether a text attribute is read-only
    pub async fn is_read_only(&self) -> E2eResult<bool> {
        Ok(self
            .region
            .find(".attribute-control input")
            .await?
            .attribute("readonly")
            .await?
            .is_some())
    }

    /// Checkbox of a boolean attribute
    pub async fn checkbox(&self) -> E2eResult<CheckboxField> {
        CheckboxField::locate_within(self.region.element(), Selector::css(".attribute-control")).await
    }

    /// Menu of a choice attribute
    pub async fn menu(&self) -> E2eResult<SingleSelectMenu> {
        SingleSelectMenu::locate_within(self.region.element(), Selector::css(".select2-field")).await
    }
}

/// Save and cancel buttons of a section or dialog
#[derive(Debug, Clone)]
pub struct ModelControls {
    region: PageRegion,
}

impl_page_object!(ModelControls, "ModelControls", |page| {
    let _ = page.region.present_child(".model-actions .model-save").await?;
    Ok(())
});

impl ModelControls {
    /// Whether the save button is enabled
    pub async fn is_save_enabled(&self) -> E2eResult<bool> {
        self.region.find(".model-save").await?.is_enabled().await
    }

    /// Whether the cancel button is enabled
    pub async fn is_cancel_enabled(&self) -> E2eResult<bool> {
        self.region.find(".model-cancel").await?.is_enabled().await
    }

    /// Press save once it is enabled
    pub async fn save(&self) -> E2eResult<()> {
        let button = self.region.find(".model-save").await?;
        let _ = self.region.wait_for(Condition::clickable(&button)).await?;
        button.click().await
    }

    /// Press save and wait for the outcome toast
    pub async fn save_with_notification(&self) -> E2eResult<Notification> {
        self.save().await?;
        Notification::wait_for(self.region.session()).await
    }

    /// Press cancel
    pub async fn cancel(&self) -> E2eResult<()> {
        self.region.find(".model-cancel").await?.click().await
    }
}

// =============================================================================
// CREATE DIALOGS
// =============================================================================

async fn close_dialog(region: &PageRegion) -> E2eResult<()> {
    let controls =
        ModelControls::locate_within(region.element(), Selector::css(".model-controls")).await?;
    controls.save().await?;
    let _ = region.wait_for(Condition::stale(region.element())).await?;
    Ok(())
}

/// Dialog adding a field for an existing semantic property
#[derive(Debug, Clone)]
pub struct ModelCreateFieldDialog {
    region: PageRegion,
}

impl_page_object!(ModelCreateFieldDialog, "ModelCreateFieldDialog", |page| {
    let _ = page.region.visible_child(".model-form .select-property").await?;
    Ok(())
});

impl ModelCreateFieldDialog {
    /// Property menu
    pub async fn property_menu(&self) -> E2eResult<SingleSelectMenu> {
        SingleSelectMenu::locate_within(
            self.region.element(),
            Selector::css(".select-property .select2-field"),
        )
        .await
    }

    /// Pick the property labelled `label`
    pub async fn select_property(&self, label: &str) -> E2eResult<()> {
        self.property_menu().await?.select_option(label).await
    }

    /// Type menu, rebuilt for the range of the picked property
    pub async fn type_menu(&self) -> E2eResult<SingleSelectMenu> {
        self.attribute("typeOption").await?.menu().await
    }

    /// Attribute of the new field (`label` or `typeOption`)
    pub async fn attribute(&self, id: &str) -> E2eResult<ModelAttribute> {
        ModelAttribute::locate_within(
            self.region.element(),
            Selector::css(format!(".model-attribute[data-id=\"{id}\"]")),
        )
        .await
    }

    /// Whether the picked property lacks a type
    pub async fn is_missing_type_displayed(&self) -> E2eResult<bool> {
        self.region.find(".missing-type").await?.is_displayed().await
    }

    /// Save and cancel buttons
    pub async fn controls(&self) -> E2eResult<ModelControls> {
        ModelControls::locate_within(self.region.element(), Selector::css(".model-controls")).await
    }

    /// Save and wait until the dialog closes
    pub async fn create(&self) -> E2eResult<()> {
        close_dialog(&self.region).await
    }
}

/// Dialog adding a new property and a field for it
#[derive(Debug, Clone)]
pub struct ModelCreatePropertyDialog {
    region: PageRegion,
}

impl_page_object!(ModelCreatePropertyDialog, "ModelCreatePropertyDialog", |page| {
    let _ = page.region.visible_child(".property-section").await?;
    Ok(())
});

impl ModelCreatePropertyDialog {
    /// Attribute of the new property (`title` or `creator`)
    pub async fn attribute(&self, id: &str) -> E2eResult<ModelAttribute> {
        ModelAttribute::locate_within(
            self.region.element(),
            Selector::css(format!(".property-section .model-attribute[data-id=\"{id}\"]")),
        )
        .await
    }

    /// Whether the title clashes with an existing field
    pub async fn is_duplicate_message_displayed(&self) -> E2eResult<bool> {
        self.region
            .find(".duplicate-property-message")
            .await?
            .is_displayed()
            .await
    }

    /// Models the new field is added to
    pub async fn destination_models(&self) -> E2eResult<String> {
        self.region
            .find(".destination-models-message .models")
            .await?
            .text()
            .await
    }

    /// Save and cancel buttons
    pub async fn controls(&self) -> E2eResult<ModelControls> {
        ModelControls::locate_within(self.region.element(), Selector::css(".model-controls")).await
    }

    /// Save and wait until the dialog closes
    pub async fn create(&self) -> E2eResult<()> {
        close_dialog(&self.region).await
    }
}

// =============================================================================
// HEADERS
// =============================================================================

/// Header templates of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderType {
    /// Full header
    Default,
    /// Header in lists
    Compact,
    /// Header in the breadcrumb
    Breadcrumb,
}

impl HeaderType {
    /// Type key in the markup
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default_header",
            Self::Compact => "compact_header",
            Self::Breadcrumb => "breadcrumb_header",
        }
    }
}

/// Header templates with a language switch
#[derive(Debug, Clone)]
pub struct ModelHeadersSection {
    region: PageRegion,
}

impl_page_object!(ModelHeadersSection, "ModelHeadersSection", |page| {
    let _ = page.region.visible_child(".model-headers-list").await?;
    Ok(())
});

impl ModelHeadersSection {
    /// Language menu
    pub async fn language_menu(&self) -> E2eResult<SingleSelectMenu> {
        SingleSelectMenu::locate_within(self.region.element(), Selector::css("#headerLanguage")).await
    }

    /// Show the headers in language `code`
    pub async fn select_language(&self, code: &str) -> E2eResult<()> {
        self.language_menu().await?.select_by_value(code).await?;
        let element = self.region.element();
        let _ = self
            .region
            .waiter()
            .until_fn("header language switched", || async move {
                Ok(element.attribute("data-lang").await?.as_deref() == Some(code))
            })
            .await?;
        Ok(())
    }

    /// Header of `kind`
    pub async fn header(&self, kind: HeaderType) -> E2eResult<ModelHeader> {
        ModelHeader::locate_within(
            self.region.element(),
            Selector::css(format!(".model-header[data-type=\"{}\"]", kind.as_str())),
        )
        .await
    }

    /// Save and cancel buttons
    pub async fn controls(&self) -> E2eResult<ModelControls> {
        ModelControls::locate_within(self.region.element(), Selector::css(".model-controls")).await
    }
}

/// One header template
#[derive(Debug, Clone)]
pub struct ModelHeader {
    region: PageRegion,
}

impl_page_object!(ModelHeader, "ModelHeader", |page| {
    let _ = page.region.present_child("textarea.header-value").await?;
    Ok(())
});

impl ModelHeader {
    /// Value in the shown language
    pub async fn value(&self) -> E2eResult<String> {
        self.region.find(".header-value").await?.value().await
    }

    /// Replace the value in the shown language
    pub async fn set_value(&self, value: &str) -> E2eResult<()> {
        let textarea = self.region.find(".header-value").await?;
        textarea.clear().await?;
        if !value.is_empty() {
            textarea.send_keys(value).await?;
        }
        Ok(())
    }

    /// System language value shown while the value is empty
    pub async fn placeholder(&self) -> E2eResult<Option<String>> {
        self.region.find(".header-value").await?.attribute("placeholder").await
    }

    /// Whether any language differs from the saved value
    pub async fn is_dirty(&self) -> E2eResult<bool> {
        self.region.has_class("dirty-model").await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::MockDriver;
    use crate::wait::WaitOptions;

    fn page() -> (MockDriver, SandboxPage) {
        let driver = MockDriver::with_sandbox_apps();
        let session = Session::new(driver.clone())
            .with_wait_options(WaitOptions::new().with_timeout(200).with_poll_interval(5));
        (driver, SandboxPage::new(session, "http://localhost:5000"))
    }

    async fn media(page: &mut SandboxPage, options: ModelOptions) -> ModelManagement {
        ModelManagementSandbox::new(page)
            .open(&options.with_model("MX1001"))
            .await
            .unwrap()
    }

    mod options_tests {
        use super::*;

        #[test]
        fn test_hash_encodes_model() {
            assert_eq!(
                ModelOptions::new().with_model("MX1001").hash().to_string(),
                "?userLang=en&systemLang=en&saveStatus=SUCCESS_SAVE&model=TVgxMDAx"
            );
            assert_eq!(
                ModelOptions::new()
                    .with_languages("de", "en")
                    .failing_save()
                    .hash()
                    .to_string(),
                "?userLang=de&systemLang=en&saveStatus=FAIL_SAVE"
            );
        }
    }

    mod tree_tests {
        use super::*;

        #[tokio::test]
        async fn test_select_node_loads_general_section() {
            let (_, mut page) = page();
            let management = ModelManagementSandbox::new(&mut page)
                .open(&ModelOptions::new())
                .await
                .unwrap();
            let data = management.data().await.unwrap();
            assert_eq!(data.selected_model().await.unwrap(), None);
            assert!(data.is_select_message_displayed().await.unwrap());

            let tree = management.tree().await.unwrap();
            assert_eq!(tree.model_ids().await.unwrap(), vec!["EO1001", "MX1001"]);
            tree.select_node("MX1001").await.unwrap();
            assert!(tree.is_node_selected("MX1001").await.unwrap());
            assert!(!tree.is_node_selected("EO1001").await.unwrap());

            let general = management.data().await.unwrap().general().await.unwrap();
            assert_eq!(general.name().await.unwrap(), "Media");
            assert_eq!(general.id().await.unwrap(), "MX1001");
            assert_eq!(general.parent().await.unwrap(), "Entity");
        }
    }

    mod fields_tests {
        use super::*;

        #[tokio::test]
        async fn test_keyword_and_display_filters() {
            let (_, mut page) = page();
            let management = media(&mut page, ModelOptions::new()).await;
            let fields = management.data().await.unwrap().fields().await.unwrap();
            assert_eq!(fields.field_ids().await.unwrap().len(), 8);
            assert_eq!(
                fields.region_ids().await.unwrap(),
                vec!["generalDetails", "specificDetails"]
            );

            fields.filter_by_keyword("created").await.unwrap();
            assert_eq!(fields.field_ids().await.unwrap(), vec!["createdBy", "createdOn"]);
            fields.filter_by_keyword("nothing like it").await.unwrap();
            assert!(fields.is_no_results_message_displayed().await.unwrap());
            fields.filter_by_keyword("").await.unwrap();

            fields.toggle(DisplayFilter::Inherited).await.unwrap();
            assert_eq!(fields.field_ids().await.unwrap(), vec!["email", "notes"]);
            assert_eq!(fields.region_ids().await.unwrap(), vec!["specificDetails"]);
            fields.toggle(DisplayFilter::Hidden).await.unwrap();
            let region = fields.region("specificDetails").await.unwrap();
            assert_eq!(region.name().await.unwrap(), "Specific details");
            assert_eq!(region.field_ids().await.unwrap(), vec!["hidden", "email", "notes"]);
            assert!(fields
                .display_filter(DisplayFilter::Hidden)
                .await
                .unwrap()
                .is_checked()
                .await
                .unwrap());
        }

        #[tokio::test]
        async fn test_label_edit_marks_dirty_and_saves() {
            let (driver, mut page) = page();
            let management = media(&mut page, ModelOptions::new()).await;
            let data = management.data().await.unwrap();
            let fields = data.fields().await.unwrap();
            let field = fields.field("email").await.unwrap();
            let details = field.show_attributes().await.unwrap();
            assert!(field.is_highlighted().await.unwrap());
            assert_eq!(details.title().await.unwrap(), "E-mail address");

            let label = details.attribute("label").await.unwrap();
            label.set_value("").await.unwrap();
            assert!(label.is_invalid().await.unwrap());
            assert_eq!(label.messages().await.unwrap(), vec!["Label is mandatory"]);
            let controls = fields.controls().await.unwrap();
            assert!(!controls.is_save_enabled().await.unwrap());

            label.set_value("Mail").await.unwrap();
            assert!(label.is_dirty().await.unwrap());
            assert!(field.is_dirty().await.unwrap());
            assert_eq!(field.label().await.unwrap(), "Mail");
            assert!(data.is_section_modified(ModelSection::Fields).await.unwrap());
            let tree = management.tree().await.unwrap();
            assert!(tree.is_node_modified("MX1001").await.unwrap());

            let toast = controls.save_with_notification().await.unwrap();
            assert!(toast.is_success().await.unwrap());
            assert!(!field.is_dirty().await.unwrap());
            assert!(!tree.is_node_modified("MX1001").await.unwrap());
            assert!(driver.events().contains(&"model-save:MX1001:email".to_string()));
        }

        #[tokio::test]
        async fn test_failed_save_keeps_changes() {
            let (_, mut page) = page();
            let management = media(&mut page, ModelOptions::new().failing_save()).await;
            let fields = management.data().await.unwrap().fields().await.unwrap();
            let field = fields.field("notes").await.unwrap();
            let details = field.show_attributes().await.unwrap();
            let mandatory = details.attribute("mandatory").await.unwrap();
            mandatory.checkbox().await.unwrap().toggle().await.unwrap();
            assert!(field.is_mandatory().await.unwrap());

            let controls = fields.controls().await.unwrap();
            let toast = controls.save_with_notification().await.unwrap();
            assert!(toast.is_error().await.unwrap());
            assert!(field.is_dirty().await.unwrap());

            controls.cancel().await.unwrap();
            assert!(!field.is_mandatory().await.unwrap());
            assert!(!controls.is_cancel_enabled().await.unwrap());
        }

        #[tokio::test]
        async fn test_inherited_field_opens_parent_model() {
            let (_, mut page) = page();
            let management = media(&mut page, ModelOptions::new()).await;
            let fields = management.data().await.unwrap().fields().await.unwrap();
            let field = fields.field("title").await.unwrap();
            assert!(field.is_inherited().await.unwrap());
            assert!(field.is_mandatory().await.unwrap());
            assert_eq!(field.parent().await.unwrap().as_deref(), Some("Entity"));

            let details = field.show_attributes().await.unwrap();
            assert!(details.attribute("label").await.unwrap().is_read_only().await.unwrap());
            assert!(details.can_navigate_to_parent().await.unwrap());
            let parent = details.navigate_to_parent().await.unwrap();
            let field = parent.field("title").await.unwrap();
            assert!(!field.is_inherited().await.unwrap());
            assert!(field.is_highlighted().await.unwrap());
            assert!(!parent.details().await.unwrap().can_navigate_to_parent().await.unwrap());
            assert_eq!(
                management.data().await.unwrap().selected_model().await.unwrap().as_deref(),
                Some("EO1001")
            );
        }
    }

    mod create_tests {
        use super::*;

        #[tokio::test]
        async fn test_create_field_for_existing_property() {
            let (driver, mut page) = page();
            let management = media(&mut page, ModelOptions::new()).await;
            let fields = management.data().await.unwrap().fields().await.unwrap();
            let dialog = fields.create_field().await.unwrap();
            assert!(!dialog.controls().await.unwrap().is_save_enabled().await.unwrap());

            dialog.select_property("Numeric").await.unwrap();
            assert_eq!(dialog.attribute("label").await.unwrap().value().await.unwrap(), "Numeric");
            let types = dialog.type_menu().await.unwrap();
            assert_eq!(
                types.menu_values().await.unwrap(),
                vec!["NUMERIC_TYPE", "NUMERIC_FIXED_TYPE"]
            );
            types.select_by_value("NUMERIC_FIXED_TYPE").await.unwrap();
            dialog.create().await.unwrap();

            let created = fields.field("numericForCreate").await.unwrap();
            assert!(created.is_dirty().await.unwrap());
            assert!(created.is_highlighted().await.unwrap());
            assert!(driver.events().contains(&"model-create:numericForCreate".to_string()));

            fields.controls().await.unwrap().cancel().await.unwrap();
            assert!(!fields.field_ids().await.unwrap().contains(&"numericForCreate".to_string()));
        }

        #[tokio::test]
        async fn test_create_property_rejects_duplicates() {
            let (_, mut page) = page();
            let management = media(&mut page, ModelOptions::new()).await;
            let fields = management.data().await.unwrap().fields().await.unwrap();
            let dialog = fields.create_property().await.unwrap();
            assert_eq!(dialog.destination_models().await.unwrap(), "Media");
            let creator = dialog.attribute("creator").await.unwrap();
            assert_eq!(creator.value().await.unwrap(), "John Doe");

            let title = dialog.attribute("title").await.unwrap();
            assert!(title.is_invalid().await.unwrap());
            title.set_value("Notes").await.unwrap();
            assert!(dialog.is_duplicate_message_displayed().await.unwrap());
            assert!(!dialog.controls().await.unwrap().is_save_enabled().await.unwrap());

            title.set_value("Weight").await.unwrap();
            assert!(!dialog.is_duplicate_message_displayed().await.unwrap());
            dialog.create().await.unwrap();
            let created = fields.field("weight").await.unwrap();
            assert_eq!(created.label().await.unwrap(), "Weight");
        }
    }

    mod headers_tests {
        use super::*;

        #[tokio::test]
        async fn test_headers_per_language() {
            let (_, mut page) = page();
            let management = media(&mut page, ModelOptions::new().with_languages("de", "en")).await;
            let data = management.data().await.unwrap();
            let headers = data.headers().await.unwrap();
            let compact = headers.header(HeaderType::Compact).await.unwrap();
            assert_eq!(compact.value().await.unwrap(), "");
            assert_eq!(
                compact.placeholder().await.unwrap().as_deref(),
                Some("${eval(<span>(EO1001) Compact Header</span>)}")
            );

            let default = headers.header(HeaderType::Default).await.unwrap();
            assert_eq!(
                default.value().await.unwrap(),
                "${eval(<span>(MX1001) Standard Kopfzeile</span>)}"
            );
            default.set_value("Kopf").await.unwrap();
            assert!(default.is_dirty().await.unwrap());
            assert!(data.is_section_modified(ModelSection::Headers).await.unwrap());

            headers.select_language("en").await.unwrap();
            assert_eq!(
                default.value().await.unwrap(),
                "${eval(<span>(MX1001) Default Header</span>)}"
            );
            assert!(default.is_dirty().await.unwrap());

            headers.controls().await.unwrap().cancel().await.unwrap();
            assert!(!default.is_dirty().await.unwrap());
            assert!(!data.is_section_modified(ModelSection::Headers).await.unwrap());
        }
    }
}
