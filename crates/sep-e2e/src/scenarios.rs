//! Sandbox scenarios.
//!
//! Each scenario opens one sandbox route, drives it through page objects and
//! checks the outcome with [`Assertion`]. They only talk to the driver
//! contract, so the same suite runs on the mock sandbox and on Chromium.

use crate::assertion::Assertion;
use crate::components::{
    Collapsible, ConfirmationPopup, Dialog, DropdownMenu, MultiSelectMenu,
};
use crate::harness::{Scenario, ScenarioSuite};
use crate::locator::Selector;
use crate::page_object::PageObject;
use crate::result::E2eResult;
use crate::sandbox::SandboxPage;
use crate::widgets::{
    AdvancedSearchStub, DatatableWidget, DisplayFilter, HeaderType, IdocMode, IdocPage,
    ImportOutcome, ModelImportSandbox, ModelManagementSandbox, ModelOptions, ModelSection,
    ObjectTypeSelect, SearchForm, ADVANCED_SEARCH_URL, ANY_OBJECT, BASIC_SEARCH_URL,
    DATATABLE_FILTER_URL, OBJECT_TYPE_SELECT_URL,
};
use tracing::debug;

/// Collapsible panels sandbox
pub const COLLAPSIBLE_URL: &str = "/sandbox/components/collapsible";
/// Dialog, confirmation, toast and tabs sandbox
pub const DIALOG_URL: &str = "/sandbox/components/dialog";
/// Dropdown menu sandbox
pub const DROPDOWN_MENU_URL: &str = "/sandbox/components/dropdown-menu";
/// Form builder sandbox with every control kind
pub const ALL_CONTROLS_URL: &str = "/sandbox/form-builder/all-controls";

/// Every scenario, in run order
#[must_use]
pub fn sandbox_suite() -> ScenarioSuite {
    ScenarioSuite::new("sandbox")
        .with_scenario(Scenario::new(
            "collapsible-toggle",
            "first section starts collapsed, second expanded; toggling swaps and restores",
            |mut page| async move { collapsible_toggle(&mut page).await },
        ))
        .with_scenario(Scenario::new(
            "model-import-errors",
            "failed import with errors shows the error text in the dialog body",
            |mut page| async move { model_import_error_dialog(&mut page, true).await },
        ))
        .with_scenario(Scenario::new(
            "model-import-no-errors",
            "failed import without errors shows an empty dialog body",
            |mut page| async move { model_import_error_dialog(&mut page, false).await },
        ))
        .with_scenario(Scenario::new(
            "datatable-filter",
            "a string filter keeps its value after Enter",
            |mut page| async move { datatable_filter_round_trip(&mut page).await },
        ))
        .with_scenario(Scenario::new(
            "object-type-select",
            "object type select defaults to Any Object, which is also the first option",
            |mut page| async move { object_type_select_default(&mut page).await },
        ))
        .with_scenario(Scenario::new(
            "dialog-lifecycle",
            "dialogs and confirmations open and close through their buttons",
            |mut page| async move { dialog_lifecycle(&mut page).await },
        ))
        .with_scenario(Scenario::new(
            "dropdown-menu",
            "the actions menu toggles open and closes after picking an item",
            |mut page| async move { dropdown_menu_actions(&mut page).await },
        ))
        .with_scenario(Scenario::new(
            "multi-select",
            "selected values follow select and remove operations",
            |mut page| async move { multi_select_bookkeeping(&mut page).await },
        ))
        .with_scenario(Scenario::new(
            "search-pagination",
            "result pages are reachable through page, next and first links",
            |mut page| async move { search_pagination(&mut page).await },
        ))
        .with_scenario(Scenario::new(
            "comment-crud",
            "comments can be created, edited, replied to and deleted",
            |mut page| async move { comment_crud(&mut page).await },
        ))
        .with_scenario(Scenario::new(
            "idoc-tabs",
            "switching idoc tabs shows the editor of the selected tab",
            |mut page| async move { idoc_tab_switching(&mut page).await },
        ))
        .with_scenario(Scenario::new(
            "idoc-undo-redo",
            "undo walks back through editor snapshots and redo replays them",
            |mut page| async move { idoc_undo_redo(&mut page).await },
        ))
        .with_scenario(Scenario::new(
            "advanced-search-criteria",
            "the predefined nested criteria narrow the results and mirror into the tree model",
            |mut page| async move { advanced_search_criteria(&mut page).await },
        ))
        .with_scenario(Scenario::new(
            "model-fields-edit",
            "an edited field label marks the model modified until it is saved",
            |mut page| async move { model_fields_edit(&mut page).await },
        ))
        .with_scenario(Scenario::new(
            "model-headers-language",
            "empty headers show the system language value until the language is switched",
            |mut page| async move { model_headers_language(&mut page).await },
        ))
}

/// `#first-section-collapse` starts collapsed and `#second-section-collapse`
/// expanded; one toggle swaps them, a second restores them.
pub async fn collapsible_toggle(page: &mut SandboxPage) -> E2eResult<()> {
    let _ = page.open(COLLAPSIBLE_URL, None).await?;
    let session = page.session();
    let first = Collapsible::locate(session, Selector::id("first-section-collapse")).await?;
    let second = Collapsible::locate(session, Selector::id("second-section-collapse")).await?;

    let expect = |first_collapsed: bool| {
        let (first, second) = (&first, &second);
        async move {
            Assertion::equals("first collapsed", &first_collapsed, &first.is_collapsed().await?)?;
            Assertion::equals("second expanded", &first_collapsed, &second.is_expanded().await?)
        }
    };

    expect(true).await?;
    first.toggle().await?;
    second.toggle().await?;
    expect(false).await?;
    first.toggle().await?;
    second.toggle().await?;
    expect(true).await
}

/// A failed import shows the error text only when the response has errors.
pub async fn model_import_error_dialog(page: &mut SandboxPage, has_errors: bool) -> E2eResult<()> {
    let mut sandbox = ModelImportSandbox::new(page);
    let panel = sandbox.open(ImportOutcome::failure(has_errors)).await?;
    panel.select_files(&["definitions.xml"]).await?;
    let dialog = panel.import_expecting_dialog().await?;
    let body = dialog.body_text().await?;
    debug!(has_errors, body = %body, "import result");
    if has_errors {
        Assertion::contains("dialog body", &body, "Something went wrong")?;
    } else {
        Assertion::equals("dialog body", "", body.as_str())?;
    }
    dialog.ok().await
}

/// A string filter survives pressing Enter and narrows the rows.
pub async fn datatable_filter_round_trip(page: &mut SandboxPage) -> E2eResult<()> {
    const FILTER: &str = "Header-2";

    let _ = page.open(DATATABLE_FILTER_URL, None).await?;
    let widget = DatatableWidget::wait_for(page.session()).await?;
    let filter = widget.filter().await?;
    filter.set_string_field_value(1, FILTER).await?;
    filter.apply_filter(1).await?;
    Assertion::equals("filter value", FILTER, filter.string_field_value(1).await?.as_str())?;
    Assertion::equals("rows", &1_usize, &widget.rows_count().await?)
}

/// The object type select renders "Any Object" and lists it first.
pub async fn object_type_select_default(page: &mut SandboxPage) -> E2eResult<()> {
    let _ = page.open(OBJECT_TYPE_SELECT_URL, None).await?;
    let select = ObjectTypeSelect::wait_for(page.session()).await?;
    Assertion::equals("rendered type", ANY_OBJECT, select.selected_type_text().await?.as_str())?;
    let options = select.type_options().await?;
    Assertion::equals("first option", &Some(ANY_OBJECT), &options.first().map(String::as_str))
}

/// Dialogs and confirmations close through their footer buttons.
pub async fn dialog_lifecycle(page: &mut SandboxPage) -> E2eResult<()> {
    let _ = page.open(DIALOG_URL, None).await?;
    let session = page.session().clone();

    session.find(".open-dialog").await?.click().await?;
    let dialog = Dialog::wait_for(&session).await?;
    Assertion::equals("title", "Sandbox dialog", dialog.title().await?.as_str())?;
    dialog.cancel().await?;
    Assertion::is_false(session.is_present(".sandbox-dialog").await?, "dialog still open after cancel")?;

    session.find(".open-dialog").await?.click().await?;
    Dialog::wait_for(&session).await?.ok().await?;

    session.find(".open-confirmation").await?.click().await?;
    let confirmation = ConfirmationPopup::wait_for(&session).await?;
    Assertion::equals("message", "Are you sure?", confirmation.message().await?.as_str())?;
    confirmation.confirm().await?;
    Assertion::is_false(session.is_present(".confirmation").await?, "confirmation still open")
}

/// The actions menu toggles and closes after an item is picked.
pub async fn dropdown_menu_actions(page: &mut SandboxPage) -> E2eResult<()> {
    let _ = page.open(DROPDOWN_MENU_URL, None).await?;
    let menu = DropdownMenu::locate(page.session(), Selector::id("actions-menu")).await?;
    Assertion::is_false(menu.is_open().await?, "menu open before toggling")?;
    menu.toggle().await?;
    menu.toggle().await?;
    Assertion::is_false(menu.is_open().await?, "menu open after a double toggle")?;
    Assertion::equals("items", &["Edit", "Lock", "Delete"][..], &menu.items().await?[..])?;
    menu.click_item("Lock").await?;
    Assertion::is_false(menu.is_open().await?, "menu open after picking an item")
}

/// Selected values track select and remove operations.
pub async fn multi_select_bookkeeping(page: &mut SandboxPage) -> E2eResult<()> {
    let _ = page.open(ALL_CONTROLS_URL, None).await?;
    let select = MultiSelectMenu::locate(page.session(), Selector::id("multiSelectEdit")).await?;
    select.select_by_value("OT210027").await?;
    select.select_by_value("DT210099").await?;
    select.select_by_value("CH210001").await?;
    select.remove_by_title("Chapter").await?;
    select.close_menu().await?;
    Assertion::equals(
        "selected values",
        &["DT210099", "OT210027"][..],
        &select.selected_values().await?[..],
    )
}

/// Search result pages are reachable through the pagination links.
pub async fn search_pagination(page: &mut SandboxPage) -> E2eResult<()> {
    let _ = page.open(BASIC_SEARCH_URL, None).await?;
    let form = SearchForm::wait_for(page.session()).await?;
    let results = form.search().await?;
    Assertion::equals("total", &23_usize, &results.total().await?)?;
    let pagination = results.pagination().await?;
    Assertion::equals("pages", &[1_usize, 2, 3, 4, 5][..], &pagination.pages().await?[..])?;

    pagination.go_to_page(3).await?;
    pagination.next().await?;
    Assertion::equals("active page", &4_usize, &pagination.active_page().await?)?;
    pagination.first().await?;
    Assertion::is_true(pagination.is_disabled("prev").await?, "prev enabled on the first page")
}

/// A comment goes through create, edit, reply and delete.
pub async fn comment_crud(page: &mut SandboxPage) -> E2eResult<()> {
    let mut idoc = IdocPage::new(page);
    idoc.open(true, None).await?;
    let comments = idoc.tabs().await?.tab_by_index(0).await?.comments().await?;
    let before = comments.count().await?;

    comments.add_comment("release checklist").await?;
    comments.wait_for_count(before + 1).await?;
    let added = comments.comment(before).await?;
    Assertion::equals("text", "release checklist", added.text().await?.as_str())?;

    let dialog = added.edit().await?;
    dialog.clear().await?;
    dialog.type_text("release checklist v2").await?;
    dialog.ok().await?;
    Assertion::equals("edited text", "release checklist v2", added.text().await?.as_str())?;

    let reply = added.reply().await?;
    reply.type_text("done").await?;
    reply.ok().await?;
    Assertion::equals("replies", &["done"][..], &added.replies().await?[..])?;

    added.delete().await?;
    comments.wait_for_count(before).await
}

/// Each tab shows its own editor content once selected.
pub async fn idoc_tab_switching(page: &mut SandboxPage) -> E2eResult<()> {
    let mut idoc = IdocPage::new(page);
    idoc.open(false, None).await?;
    Assertion::equals("mode", &IdocMode::Preview, &idoc.mode().await?)?;
    let tabs = idoc.tabs().await?;
    let titles = tabs.titles().await?;
    for (index, title) in titles.iter().enumerate().rev() {
        let tab = tabs.tab_by_index(index).await?;
        tab.select().await?;
        Assertion::equals("active tab", &Some(index), &tabs.active_index().await?)?;
        let content = tab.editor().await?.content().await?;
        Assertion::equals("content", format!("Content of {title}").as_str(), content.as_str())?;
    }
    Ok(())
}

/// Two undos restore the opening content and two redos the edited one.
pub async fn idoc_undo_redo(page: &mut SandboxPage) -> E2eResult<()> {
    let mut idoc = IdocPage::new(page);
    idoc.open(true, None).await?;
    let toolbar = idoc.undo_redo_toolbar().await?;
    let editor = idoc.tab_editor(0).await?;
    let original = editor.content().await?;
    editor.set_content("rewritten").await?;

    toolbar.undo().await?;
    toolbar.undo().await?;
    Assertion::equals("content after undo", original.as_str(), editor.content().await?.as_str())?;
    Assertion::is_false(toolbar.is_undo_active().await?, "undo active at the first snapshot")?;
    toolbar.redo().await?;
    toolbar.redo().await?;
    Assertion::equals("content after redo", "rewritten", editor.content().await?.as_str())?;
    Assertion::is_false(toolbar.is_redo_active().await?, "redo active at the last snapshot")
}

/// The predefined criteria hold an OR group below the root and find 7 of
/// the 23 objects.
pub async fn advanced_search_criteria(page: &mut SandboxPage) -> E2eResult<()> {
    let _ = page.open(ADVANCED_SEARCH_URL, None).await?;
    let stub = AdvancedSearchStub::wait_for(page.session()).await?;
    let search = stub.advanced_search().await?;
    Assertion::equals("unfiltered results", &23_usize, &search.search().await?)?;

    stub.load_predefined_criteria().await?;
    let tree = stub.tree_model().await?;
    debug!(rules = tree.criteria.rule_count(), "predefined criteria");
    Assertion::equals("depth", &2_usize, &tree.criteria.depth())?;
    Assertion::equals("rules", &3_usize, &tree.criteria.rule_count())?;
    Assertion::equals("filtered results", &7_usize, &search.search().await?)
}

/// Renaming an own field of the Media model flags field, tab and tree
/// node until the fields section is saved.
pub async fn model_fields_edit(page: &mut SandboxPage) -> E2eResult<()> {
    let management = ModelManagementSandbox::new(page)
        .open(&ModelOptions::new().with_model("MX1001"))
        .await?;
    let data = management.data().await?;
    let fields = data.fields().await?;
    fields.toggle(DisplayFilter::Inherited).await?;
    Assertion::equals("own fields", &["email", "notes"][..], &fields.field_ids().await?[..])?;

    let field = fields.field("email").await?;
    field.show_attributes().await?.attribute("label").await?.set_value("Mail").await?;
    let tree = management.tree().await?;
    Assertion::is_true(field.is_dirty().await?, "edited field not dirty")?;
    Assertion::is_true(data.is_section_modified(ModelSection::Fields).await?, "fields tab not modified")?;
    Assertion::is_true(tree.is_node_modified("MX1001").await?, "tree node not modified")?;

    let toast = fields.controls().await?.save_with_notification().await?;
    Assertion::is_true(toast.is_success().await?, "save failed")?;
    Assertion::equals("label", "Mail", field.label().await?.as_str())?;
    Assertion::is_false(tree.is_node_modified("MX1001").await?, "tree node modified after save")
}

/// With German as user language the untranslated compact header shows the
/// English value as placeholder; switching to English shows it as value.
pub async fn model_headers_language(page: &mut SandboxPage) -> E2eResult<()> {
    const COMPACT: &str = "${eval(<span>(EO1001) Compact Header</span>)}";

    let management = ModelManagementSandbox::new(page)
        .open(&ModelOptions::new().with_languages("de", "en").with_model("MX1001"))
        .await?;
    let headers = management.data().await?.headers().await?;
    let compact = headers.header(HeaderType::Compact).await?;
    Assertion::equals("german value", "", compact.value().await?.as_str())?;
    Assertion::equals("placeholder", &Some(COMPACT), &compact.placeholder().await?.as_deref())?;

    headers.select_language("en").await?;
    Assertion::equals("english value", COMPACT, compact.value().await?.as_str())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod suite_tests {
        use super::*;

        #[test]
        fn test_names_are_unique() {
            let suite = sandbox_suite();
            let mut names: Vec<&str> = suite.scenarios().iter().map(Scenario::name).collect();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), total);
            assert_eq!(suite.clone().filter("model-import").len(), 2);
            assert_eq!(suite.filter("model-").len(), 4);
        }
    }
}
