//! Form builder controls.
//!
//! Every control shares the [`FormField`] queries (preview/edit mode,
//! mandatory mark, validation messages). Checkbox and radio inputs are
//! hidden behind a styled `<i>`, so they are toggled through their wrapping
//! `<label>`.

use crate::driver::{Element, Keys};
use crate::locator::Selector;
use crate::page_object::{impl_page_object, PageObject, PageRegion};
use crate::result::E2eResult;
use crate::wait::{Condition, Target};
use async_trait::async_trait;
use chrono::{DateTime, Local};

/// Queries shared by every form control
#[async_trait]
pub trait FormField: PageObject {
    /// Visible text of the whole control
    async fn text(&self) -> E2eResult<String> {
        self.element().text().await
    }

    /// Text of the `.preview-field`
    async fn preview_value(&self) -> E2eResult<String> {
        self.region().find(".preview-field").await?.text().await
    }

    /// Text of the `.print-field`
    async fn print_value(&self) -> E2eResult<String> {
        self.region().find(".print-field").await?.text().await
    }

    /// Inner HTML of the `.preview-field`, readable while it is hidden
    async fn hidden_preview_value(&self) -> E2eResult<String> {
        self.region().find(".preview-field").await?.inner_html().await
    }

    /// Inner HTML of the control
    async fn html(&self) -> E2eResult<String> {
        self.element().inner_html().await
    }

    /// Whether the control is displayed
    async fn is_visible(&self) -> E2eResult<bool> {
        self.element().is_displayed().await
    }

    /// Whether the control is still attached
    async fn is_present(&self) -> E2eResult<bool> {
        self.element().is_present().await
    }

    /// Whether the label carries the `*` mandatory mark
    async fn is_mandatory(&self) -> E2eResult<bool> {
        match self.region().find_optional("sup").await? {
            Some(mark) => Ok(mark.text().await?.trim() == "*"),
            None => Ok(false),
        }
    }

    /// Whether the control is in error state
    async fn has_error(&self) -> E2eResult<bool> {
        self.region().has_class("has-error").await
    }

    /// Whether the control renders in preview mode
    async fn is_preview(&self) -> E2eResult<bool> {
        self.region().has(".preview-field:not(.hidden)").await
    }

    /// Whether the control renders a print field
    async fn is_print_field(&self) -> E2eResult<bool> {
        self.region().has(".print-field").await
    }

    /// Whether the control renders in edit mode
    async fn is_editable(&self) -> E2eResult<bool> {
        self.region().has(".form-control:not(.hidden)").await
    }

    /// Validation messages under the control
    async fn messages(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for message in self.region().find_all(".messages .message").await? {
            out.push(message.text().await?);
        }
        Ok(out)
    }

    /// Attribute of the control wrapper
    async fn attribute(&self, name: &str) -> E2eResult<Option<String>> {
        self.element().attribute(name).await
    }

    /// Wait until the tooltip icon is visible
    async fn wait_for_tooltip_icon(&self) -> E2eResult<()> {
        let _ = self
            .region()
            .wait_for(Condition::visible(Target::within(self.element(), ".fa-info")))
            .await?;
        Ok(())
    }
}

async fn has_attribute(element: &Element, name: &str) -> E2eResult<bool> {
    Ok(element.attribute(name).await?.is_some())
}

async fn all_disabled(inputs: &[Element]) -> E2eResult<bool> {
    for input in inputs {
        if input.is_enabled().await? {
            return Ok(false);
        }
    }
    Ok(!inputs.is_empty())
}

/// Generic form control without type-specific behaviour
#[derive(Debug, Clone)]
pub struct FormControl {
    region: PageRegion,
}

impl_page_object!(FormControl, "FormControl", |page| page
    .region
    .wait_until_present()
    .await);

impl FormField for FormControl {}

// =============================================================================
// TEXT INPUTS
// =============================================================================

/// Text input or textarea (`.form-control` inside the wrapper)
#[derive(Debug, Clone)]
pub struct InputField {
    region: PageRegion,
}

impl_page_object!(InputField, "InputField", |page| page
    .region
    .wait_until_visible()
    .await);

impl FormField for InputField {}

impl InputField {
    /// The `.form-control` element, once visible
    pub async fn input_element(&self) -> E2eResult<Element> {
        self.region.visible_child(".form-control").await
    }

    /// Current value
    pub async fn value(&self) -> E2eResult<String> {
        self.input_element().await?.value().await
    }

    /// Replace the value and wait until the field reflects it
    pub async fn set_value(&self, text: &str) -> E2eResult<()> {
        let input = self.input_element().await?;
        input.clear().await?;
        input.send_keys(text).await?;
        let _ = self
            .region
            .wait_for(Condition::text_in_value(&input, text))
            .await?;
        Ok(())
    }

    /// Clear the value
    pub async fn clear_value(&self) -> E2eResult<()> {
        self.input_element().await?.clear().await
    }

    /// Whether the input has a `disabled` attribute
    pub async fn is_disabled(&self) -> E2eResult<bool> {
        has_attribute(&self.input_element().await?, "disabled").await
    }

    /// Whether the input has a `readonly` attribute
    pub async fn is_read_only(&self) -> E2eResult<bool> {
        has_attribute(&self.input_element().await?, "readonly").await
    }
}

// =============================================================================
// DATETIME
// =============================================================================

const DATETIME_WIDGET: &str = ".bootstrap-datetimepicker-widget";

/// Date/datetime picker field
///
/// Values can be typed as text; the picker rejects input that does not
/// satisfy the configured format.
#[derive(Debug, Clone)]
pub struct DatetimeField {
    region: PageRegion,
}

impl_page_object!(DatetimeField, "DatetimeField", |page| page
    .region
    .wait_until_visible()
    .await);

impl FormField for DatetimeField {}

impl DatetimeField {
    /// Format a moment the way the picker expects typed input,
    /// e.g. `July/10/2017` or `July/10/2017 9:26`
    #[must_use]
    pub fn format_date(moment: &DateTime<Local>, with_time: bool) -> String {
        if with_time {
            moment.format("%B/%-d/%Y %-H:%-M").to_string()
        } else {
            moment.format("%B/%-d/%Y").to_string()
        }
    }

    /// The underlying input
    pub async fn date_field(&self) -> E2eResult<Element> {
        self.region.find("input").await
    }

    /// Current value of the underlying input
    pub async fn date(&self) -> E2eResult<String> {
        self.region.wait_until_visible().await?;
        self.date_field().await?.value().await
    }

    /// Type a datetime string into the field
    pub async fn set_datetime(&self, datetime: &str) -> E2eResult<()> {
        let input = self.date_field().await?;
        input.clear().await?;
        input.send_keys(datetime).await
    }

    /// Type today's date (optionally with time) into the field
    pub async fn set_today(&self, with_time: bool) -> E2eResult<()> {
        self.set_datetime(&Self::format_date(&Local::now(), with_time))
            .await
    }

    /// Clear the underlying input
    pub async fn clear_date(&self) -> E2eResult<()> {
        self.region.wait_until_visible().await?;
        self.date_field().await?.clear().await
    }

    /// Open the calendar through the trigger button
    pub async fn open_calendar(&self) -> E2eResult<()> {
        self.region.find("span").await?.click().await?;
        let _ = self.region.wait_for(Condition::visible(DATETIME_WIDGET)).await?;
        Ok(())
    }

    /// Pick today in the open calendar
    pub async fn select_today(&self) -> E2eResult<()> {
        self.region
            .session()
            .find(format!("{DATETIME_WIDGET} .day.today"))
            .await?
            .click()
            .await
    }

    /// Clear the value with the picker's clear action
    pub async fn clear_by_picker(&self) -> E2eResult<()> {
        self.region
            .session()
            .find(format!("{DATETIME_WIDGET} [data-action=clear]"))
            .await?
            .click()
            .await
    }

    /// Whether the open picker offers a time part
    pub async fn has_time_picker(&self) -> E2eResult<bool> {
        self.region
            .session()
            .is_present(format!("{DATETIME_WIDGET} [data-action=togglePicker]"))
            .await
    }

    /// Switch the open picker to the time view
    pub async fn open_time_picker(&self) -> E2eResult<()> {
        self.region
            .session()
            .find(format!("{DATETIME_WIDGET} [data-action=togglePicker]"))
            .await?
            .click()
            .await?;
        let _ = self
            .region
            .wait_for(Condition::visible(format!("{DATETIME_WIDGET} .timepicker").as_str()))
            .await?;
        Ok(())
    }

    /// Whether the underlying input is disabled
    pub async fn is_disabled(&self) -> E2eResult<bool> {
        has_attribute(&self.date_field().await?, "disabled").await
    }
}

// =============================================================================
// CHECKBOX AND RADIO
// =============================================================================

/// Checkbox rendered as `<label class="checkbox"><input><i></i></label>`
#[derive(Debug, Clone)]
pub struct CheckboxField {
    region: PageRegion,
}

impl_page_object!(CheckboxField, "CheckboxField", |page| page
    .region
    .wait_until_present()
    .await);

impl FormField for CheckboxField {}

impl CheckboxField {
    /// Click the styled box to toggle the state
    pub async fn toggle(&self) -> E2eResult<()> {
        self.region.find("label.checkbox i").await?.click().await
    }

    /// Whether the input is checked
    pub async fn is_checked(&self) -> E2eResult<bool> {
        self.region.find("input").await?.is_selected().await
    }

    /// Whether the checkbox renders in preview state
    pub async fn is_preview(&self) -> E2eResult<bool> {
        self.region.has(".state-disabled").await
    }

    /// Whether the input is disabled
    pub async fn is_disabled(&self) -> E2eResult<bool> {
        has_attribute(&self.region.find("input").await?, "disabled").await
    }

    /// Whether the input is read-only
    pub async fn is_read_only(&self) -> E2eResult<bool> {
        has_attribute(&self.region.find("input").await?, "readonly").await
    }
}

/// Group of radio buttons sharing one wrapper
#[derive(Debug, Clone)]
pub struct RadioButtonGroup {
    region: PageRegion,
}

impl_page_object!(RadioButtonGroup, "RadioButtonGroup", |page| page
    .region
    .wait_until_present()
    .await);

impl FormField for RadioButtonGroup {}

impl RadioButtonGroup {
    /// Value of the checked radio, if any
    pub async fn selected_value(&self) -> E2eResult<Option<String>> {
        match self.region.find_optional("[type=radio]:checked").await? {
            Some(radio) => radio.attribute("value").await,
            None => Ok(None),
        }
    }

    /// Select the radio with `value` by clicking its parent label
    pub async fn select_value(&self, value: &str) -> E2eResult<()> {
        let radio = self.region.find(Selector::attr("value", value)).await?;
        radio.find(Selector::parent()).await?.click().await
    }

    /// Values of every radio in the group
    pub async fn values(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for radio in self.region.find_all("[type=radio]").await? {
            out.push(radio.value().await?);
        }
        Ok(out)
    }

    /// Whether every radio in the group is disabled
    pub async fn is_disabled(&self) -> E2eResult<bool> {
        all_disabled(&self.region.find_all("input").await?).await
    }
}

// =============================================================================
// CODELIST LIST, BUTTON, REGION
// =============================================================================

/// Codelist rendered as a list of checkboxes
#[derive(Debug, Clone)]
pub struct CodelistList {
    region: PageRegion,
}

impl_page_object!(CodelistList, "CodelistList", |page| page
    .region
    .wait_until_present()
    .await);

impl FormField for CodelistList {}

impl CodelistList {
    /// Values of every option
    pub async fn available_options(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for input in self.region.find_all("input").await? {
            out.push(input.value().await?);
        }
        Ok(out)
    }

    /// Labels shown in preview mode
    pub async fn preview_fields(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for label in self.region.find_all(".preview-field label span").await? {
            out.push(label.text().await?);
        }
        Ok(out)
    }

    /// Values of the checked options
    pub async fn selected_values(&self) -> E2eResult<Vec<String>> {
        let mut out = Vec::new();
        for input in self.region.find_all("div.edit-field input:checked").await? {
            out.push(input.value().await?);
        }
        Ok(out)
    }

    /// Toggle the option with `value`
    pub async fn select_value(&self, value: &str) -> E2eResult<()> {
        let edit = self.region.find("div.edit-field").await?;
        let input = edit.find(Selector::attr("value", value)).await?;
        input.find(Selector::parent()).await?.click().await
    }

    /// Whether every option is disabled
    pub async fn is_disabled(&self) -> E2eResult<bool> {
        all_disabled(&self.region.find_all("input").await?).await
    }
}

/// Plain button
#[derive(Debug, Clone)]
pub struct Button {
    region: PageRegion,
}

impl_page_object!(Button, "Button", |page| page.region.wait_until_present().await);

impl Button {
    /// Click the button
    pub async fn click(&self) -> E2eResult<()> {
        self.region.element().click().await
    }

    /// Whether the button is enabled
    pub async fn is_enabled(&self) -> E2eResult<bool> {
        self.region.element().is_enabled().await
    }

    /// Whether the button is disabled
    pub async fn is_disabled(&self) -> E2eResult<bool> {
        Ok(!self.is_enabled().await?)
    }

    /// Whether the button is still attached
    pub async fn is_present(&self) -> E2eResult<bool> {
        self.region.element().is_present().await
    }

    /// Button caption
    pub async fn text(&self) -> E2eResult<String> {
        self.region.element().text().await
    }
}

/// Region panel grouping generated form fields
#[derive(Debug, Clone)]
pub struct Region {
    region: PageRegion,
}

impl_page_object!(Region, "Region", |page| page.region.wait_until_visible().await);

impl Region {
    /// Panel heading text
    pub async fn title(&self) -> E2eResult<String> {
        self.region.find(".panel-heading").await?.text().await
    }

    /// Fields inside the panel
    pub async fn fields(&self) -> E2eResult<Vec<FormControl>> {
        let mut out = Vec::new();
        for group in self.region.find_all(".form-group").await? {
            out.push(FormControl::bind(Some(group)).await?);
        }
        Ok(out)
    }

    /// Whether the panel body is collapsed
    pub async fn is_collapsed(&self) -> E2eResult<bool> {
        Ok(!self.region.find(".panel-body").await?.is_displayed().await?)
    }
}

/// Press Enter in an input
pub(crate) async fn press_enter(input: &Element) -> E2eResult<()> {
    input.send_keys(Keys::ENTER).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::Session;
    use crate::mock::MockDriver;
    use crate::sandbox::SandboxPage;
    use crate::wait::WaitOptions;
    use chrono::TimeZone;

    const ALL_CONTROLS: &str = "/sandbox/form-builder/all-controls";

    async fn open() -> Session {
        let session = Session::new(MockDriver::with_sandbox_apps())
            .with_wait_options(WaitOptions::new().with_timeout(200).with_poll_interval(5));
        let mut page = SandboxPage::new(session.clone(), "http://localhost:5000");
        let _ = page.open(ALL_CONTROLS, None).await.unwrap();
        session
    }

    async fn bind<P: PageObject>(session: &Session, css: &str) -> P {
        P::locate(session, Selector::css(css)).await.unwrap()
    }

    mod input_tests {
        use super::*;

        #[tokio::test]
        async fn test_input_value_round_trip() {
            let session = open().await;
            let field: InputField = bind(&session, "#inputTextEdit").await;
            assert_eq!(field.value().await.unwrap(), "Default text");
            field.set_value("Changed").await.unwrap();
            assert_eq!(field.value().await.unwrap(), "Changed");
            field.clear_value().await.unwrap();
            assert_eq!(field.value().await.unwrap(), "");
            assert!(field.is_mandatory().await.unwrap());
            assert!(field.is_editable().await.unwrap());
        }

        #[tokio::test]
        async fn test_textarea_and_disabled() {
            let session = open().await;
            let area: InputField = bind(&session, "#textareaEdit").await;
            area.set_value("line").await.unwrap();
            assert_eq!(area.value().await.unwrap(), "line");
            let disabled: InputField = bind(&session, "#inputTextDisabled").await;
            assert!(disabled.is_disabled().await.unwrap());
            assert!(!area.is_disabled().await.unwrap());
        }

        #[tokio::test]
        async fn test_preview_and_messages() {
            let session = open().await;
            let preview: FormControl = bind(&session, "#inputTextPreview").await;
            assert!(preview.is_preview().await.unwrap());
            assert_eq!(preview.preview_value().await.unwrap(), "Preview text");
            let invalid: FormControl = bind(&session, "#inputTextInvalid").await;
            assert!(invalid.has_error().await.unwrap());
            assert_eq!(invalid.messages().await.unwrap(), vec!["Invalid value".to_string()]);
        }
    }

    mod datetime_tests {
        use super::*;

        #[test]
        fn test_format_date() {
            let moment = Local.with_ymd_and_hms(2017, 7, 10, 9, 26, 0).unwrap();
            assert_eq!(DatetimeField::format_date(&moment, false), "July/10/2017");
            assert_eq!(DatetimeField::format_date(&moment, true), "July/10/2017 9:26");
        }

        #[tokio::test]
        async fn test_datetime_picker() {
            let session = open().await;
            let field: DatetimeField = bind(&session, "#datetimeEdit").await;
            field.set_datetime("July/10/2017").await.unwrap();
            assert_eq!(field.date().await.unwrap(), "July/10/2017");
            field.open_calendar().await.unwrap();
            assert!(field.has_time_picker().await.unwrap());
            field.clear_by_picker().await.unwrap();
            assert_eq!(field.date().await.unwrap(), "");
            field.open_calendar().await.unwrap();
            field.select_today().await.unwrap();
            assert!(!field.date().await.unwrap().is_empty());
        }
    }

    mod choice_tests {
        use super::*;

        #[tokio::test]
        async fn test_checkbox_toggle() {
            let session = open().await;
            let checkbox: CheckboxField = bind(&session, "#checkboxEdit").await;
            assert!(!checkbox.is_checked().await.unwrap());
            checkbox.toggle().await.unwrap();
            assert!(checkbox.is_checked().await.unwrap());
            checkbox.toggle().await.unwrap();
            assert!(!checkbox.is_checked().await.unwrap());
        }

        #[tokio::test]
        async fn test_radio_group() {
            let session = open().await;
            let group: RadioButtonGroup = bind(&session, "#radioButtonGroupEdit").await;
            assert_eq!(group.selected_value().await.unwrap().as_deref(), Some("COL1"));
            group.select_value("COL2").await.unwrap();
            assert_eq!(group.selected_value().await.unwrap().as_deref(), Some("COL2"));
            assert!(!group.is_disabled().await.unwrap());
            let disabled: RadioButtonGroup = bind(&session, "#radioButtonGroupDisabled").await;
            assert!(disabled.is_disabled().await.unwrap());
        }

        #[tokio::test]
        async fn test_codelist_list() {
            let session = open().await;
            let list: CodelistList = bind(&session, "#codelistListEdit").await;
            assert_eq!(list.available_options().await.unwrap().len(), 3);
            list.select_value("CL2").await.unwrap();
            assert_eq!(list.selected_values().await.unwrap(), vec!["CL2".to_string()]);
        }

        #[tokio::test]
        async fn test_button_and_region() {
            let session = open().await;
            let button: Button = bind(&session, ".form-save-btn").await;
            assert!(button.is_disabled().await.unwrap());
            let region: Region = bind(&session, "#generalRegion").await;
            assert_eq!(region.title().await.unwrap(), "General");
            assert!(!region.fields().await.unwrap().is_empty());
        }
    }
}
