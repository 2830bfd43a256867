//! The full scenario suite against the mock sandbox.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use sep_e2e::scenarios::{
    advanced_search_criteria, collapsible_toggle, datatable_filter_round_trip, idoc_undo_redo,
    model_fields_edit, model_headers_language, model_import_error_dialog,
    object_type_select_default, COLLAPSIBLE_URL,
};
use sep_e2e::{
    sandbox_suite, Collapsible, MockDriver, OpenMode, PageObject, SandboxPage, ScenarioRunner,
    ScenarioStatus, Selector, Session, WaitOptions, RESTART_SCRIPT,
};
use sep_e2e::widgets::{MODEL_IMPORT_URL, MODEL_MANAGEMENT_URL};

fn session(driver: &MockDriver) -> Session {
    Session::new(driver.clone())
        .with_wait_options(WaitOptions::new().with_timeout(500).with_poll_interval(5))
}

fn page(driver: &MockDriver) -> SandboxPage {
    SandboxPage::new(session(driver), "http://localhost:5000")
}

#[tokio::test]
async fn test_whole_suite_passes() {
    let driver = MockDriver::with_sandbox_apps();
    let runner = ScenarioRunner::new(session(&driver), "http://localhost:5000");
    let report = runner.run(&sandbox_suite()).await;
    let failures: Vec<_> = report
        .failures()
        .iter()
        .map(|o| format!("{}: {}", o.name, o.error.clone().unwrap_or_default()))
        .collect();
    assert!(failures.is_empty(), "{failures:#?}");
    assert_eq!(report.passed_count(), sandbox_suite().len());
}

#[tokio::test]
async fn test_filtered_suite_reports_only_matches() {
    let driver = MockDriver::with_sandbox_apps();
    let runner = ScenarioRunner::new(session(&driver), "http://localhost:5000");
    let report = runner.run(&sandbox_suite().filter("model-import")).await;
    assert_eq!(report.outcomes.len(), 2);
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.status == ScenarioStatus::Passed));
}

#[tokio::test]
async fn test_collapsible_initial_state_and_toggle() {
    let driver = MockDriver::with_sandbox_apps();
    collapsible_toggle(&mut page(&driver)).await.unwrap();
}

#[tokio::test]
async fn test_model_import_dialog_body() {
    let driver = MockDriver::with_sandbox_apps();
    let mut page = page(&driver);
    model_import_error_dialog(&mut page, true).await.unwrap();
    model_import_error_dialog(&mut page, false).await.unwrap();
}

#[tokio::test]
async fn test_second_model_import_restarts_in_place() {
    let driver = MockDriver::with_sandbox_apps();
    let mut page = page(&driver);
    model_import_error_dialog(&mut page, true).await.unwrap();
    model_import_error_dialog(&mut page, false).await.unwrap();
    assert_eq!(
        driver.navigations(),
        vec!["http://localhost:5000/sandbox/administration/model-import#/?fail=true&hasErrors=true"]
    );
    assert_eq!(page.last_route(), Some(MODEL_IMPORT_URL));
    assert_eq!(page.last_hash(), Some("?fail=true&hasErrors=false"));
    assert!(driver
        .history()
        .iter()
        .any(|call| call == &format!("execute_script:{RESTART_SCRIPT}")));
    assert_eq!(
        page.open(MODEL_IMPORT_URL, Some("?fail=false&hasErrors=false"))
            .await
            .unwrap(),
        OpenMode::Restarted
    );
}

#[tokio::test]
async fn test_datatable_filter_survives_enter() {
    let driver = MockDriver::with_sandbox_apps();
    datatable_filter_round_trip(&mut page(&driver)).await.unwrap();
}

#[tokio::test]
async fn test_object_type_select_defaults_to_any_object() {
    let driver = MockDriver::with_sandbox_apps();
    object_type_select_default(&mut page(&driver)).await.unwrap();
}

#[tokio::test]
async fn test_reopening_same_route_restarts_in_place() {
    let driver = MockDriver::with_sandbox_apps();
    let mut page = page(&driver);
    assert_eq!(page.open(COLLAPSIBLE_URL, None).await.unwrap(), OpenMode::Navigated);
    let first = Collapsible::locate(page.session(), Selector::id("first-section-collapse"))
        .await
        .unwrap();
    first.toggle().await.unwrap();
    assert!(first.is_expanded().await.unwrap());

    assert_eq!(
        page.open(COLLAPSIBLE_URL, Some("?fresh=1")).await.unwrap(),
        OpenMode::Restarted
    );
    assert_eq!(driver.navigations().len(), 1);
    let first = Collapsible::locate(page.session(), Selector::id("first-section-collapse"))
        .await
        .unwrap();
    assert!(first.is_collapsed().await.unwrap());
}

#[tokio::test]
async fn test_idoc_undo_redo_round_trip() {
    let driver = MockDriver::with_sandbox_apps();
    idoc_undo_redo(&mut page(&driver)).await.unwrap();
}

#[tokio::test]
async fn test_advanced_search_predefined_criteria() {
    let driver = MockDriver::with_sandbox_apps();
    advanced_search_criteria(&mut page(&driver)).await.unwrap();
    let searches: Vec<_> = driver
        .events()
        .into_iter()
        .filter(|event| event.starts_with("advanced-search:"))
        .collect();
    assert_eq!(searches.first().map(String::as_str), Some("advanced-search:23"));
    assert_eq!(searches.last().map(String::as_str), Some("advanced-search:7"));
}

#[tokio::test]
async fn test_model_scenarios_share_one_navigation() {
    let driver = MockDriver::with_sandbox_apps();
    let mut page = page(&driver);
    model_fields_edit(&mut page).await.unwrap();
    model_headers_language(&mut page).await.unwrap();
    assert_eq!(driver.navigations().len(), 1);
    assert_eq!(page.last_route(), Some(MODEL_MANAGEMENT_URL));
    assert_eq!(
        page.last_hash(),
        Some("?userLang=de&systemLang=en&saveStatus=SUCCESS_SAVE&model=TVgxMDAx")
    );
}
