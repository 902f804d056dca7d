use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use super::*;
use crate::auth::AuthenticationManager;
use crate::catalog::{FileRef, Project};
use crate::config::RunConfig;
use crate::error::BackupError;
use crate::session::Credentials;
use crate::testkit::{FakeBrowser, FakeCatalog, FakePageConfig, LoginScript, MemStore, cookie};

fn config(root: &std::path::Path, project_ids: &[&str]) -> RunConfig {
    let mut config = RunConfig::new(
        Credentials {
            email: "user@example.com".to_string(),
            password: "hunter2".to_string(),
        },
        "token",
        project_ids.iter().map(|s| s.to_string()).collect(),
    );
    config.interaction_delay = Duration::from_millis(1);
    config.typing_delay = Duration::from_millis(1);
    config.download_timeout = Duration::from_millis(50);
    config.root_dir = root.to_path_buf();
    config
}

fn file(id: &str, name: &str) -> FileRef {
    FileRef {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn project(id: &str, name: &str, files: Vec<FileRef>) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        files,
    }
}

fn orchestrator(
    config: RunConfig,
    browser: FakeBrowser,
    catalog: FakeCatalog,
    store: Arc<MemStore>,
) -> BackupOrchestrator<FakeBrowser, FakeCatalog, Arc<MemStore>> {
    let auth = AuthenticationManager::new(
        config.credentials.clone(),
        store,
        config.interaction_delay,
        config.typing_delay,
    );
    BackupOrchestrator::new(config, browser, catalog, auth)
}

#[tokio::test]
async fn cached_cookies_run_exports_without_any_submission() {
    let tmp = tempfile::tempdir().unwrap();
    let valid = vec![cookie("session", "cached")];

    let browser = FakeBrowser::new(
        FakePageConfig {
            valid_cookies: Some(valid.clone()),
            login: LoginScript::RejectPassword,
            ..FakePageConfig::default()
        },
        FakePageConfig::default(),
    );
    let catalog = FakeCatalog::new(vec![project(
        "A",
        "Design System",
        vec![file("f1", "Landing"), file("f2", "Checkout")],
    )]);
    let store = Arc::new(MemStore::with(valid));

    let mut orch = orchestrator(config(tmp.path(), &["A"]), browser.clone(), catalog, store);
    let report = orch.run().await.unwrap();

    assert_eq!(orch.state(), RunState::Completed);
    assert_eq!(report.completed(), 2);
    assert_eq!(report.timed_out(), 0);
    assert_eq!(browser.initial().submissions.load(Ordering::SeqCst), 0);
    assert_eq!(browser.closed(), 1);
    for page in browser.opened() {
        assert_eq!(page.closed.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn fresh_login_run_persists_cookies_and_completes() {
    let tmp = tempfile::tempdir().unwrap();

    let browser = FakeBrowser::new(FakePageConfig::default(), FakePageConfig::default());
    let catalog = FakeCatalog::new(vec![project("A", "Design System", vec![file("f1", "Landing")])]);
    let store = Arc::new(MemStore::empty());

    let mut orch = orchestrator(
        config(tmp.path(), &["A"]),
        browser.clone(),
        catalog,
        store.clone(),
    );
    let report = orch.run().await.unwrap();

    assert_eq!(orch.state(), RunState::Completed);
    assert_eq!(report.completed(), 1);
    assert_eq!(browser.initial().submissions.load(Ordering::SeqCst), 1);
    assert_eq!(store.saves().len(), 1);
}

#[tokio::test]
async fn wrong_password_aborts_before_any_file() {
    let tmp = tempfile::tempdir().unwrap();

    let browser = FakeBrowser::new(
        FakePageConfig {
            login: LoginScript::RejectPassword,
            ..FakePageConfig::default()
        },
        FakePageConfig::default(),
    );
    let catalog = FakeCatalog::new(vec![project("A", "Design System", vec![file("f1", "Landing")])]);
    let store = Arc::new(MemStore::empty());

    let mut orch = orchestrator(config(tmp.path(), &["A"]), browser.clone(), catalog, store);
    let err = orch.run().await.unwrap_err();

    match err {
        BackupError::Authorization(auth) => assert_eq!(auth.reason, "Invalid password"),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(orch.state(), RunState::Aborted);
    assert!(browser.opened().is_empty());
    assert_eq!(browser.closed(), 1);
}

#[tokio::test]
async fn file_timeout_is_not_fatal() {
    let tmp = tempfile::tempdir().unwrap();

    let browser = FakeBrowser::new(FakePageConfig::default(), FakePageConfig::default());
    browser.push_page_script(FakePageConfig::default());
    browser.push_page_script(FakePageConfig {
        download_completes: false,
        ..FakePageConfig::default()
    });
    let catalog = FakeCatalog::new(vec![project(
        "A",
        "Design System",
        vec![file("f1", "Landing"), file("f2", "Checkout")],
    )]);
    let store = Arc::new(MemStore::empty());

    let mut orch = orchestrator(config(tmp.path(), &["A"]), browser.clone(), catalog, store);
    let report = orch.run().await.unwrap();

    assert_eq!(orch.state(), RunState::Completed);
    assert_eq!(report.completed(), 1);
    assert_eq!(report.timed_out(), 1);
    assert_eq!(report.outcomes[1].0.id, "f2");
    assert_eq!(report.outcomes[1].1, ExportOutcome::TimedOut);
}

#[tokio::test]
async fn projects_and_files_export_strictly_in_order() {
    let tmp = tempfile::tempdir().unwrap();

    let browser = FakeBrowser::new(FakePageConfig::default(), FakePageConfig::default());
    let catalog = FakeCatalog::new(vec![
        project(
            "A",
            "Design System",
            vec![file("f1", "Landing"), file("f2", "Checkout")],
        ),
        project("B", "Marketing", vec![file("f3", "Brand")]),
    ]);
    let store = Arc::new(MemStore::empty());

    let mut orch = orchestrator(config(tmp.path(), &["A", "B"]), browser.clone(), catalog, store);
    let report = orch.run().await.unwrap();

    let ids: Vec<&str> = report.outcomes.iter().map(|(f, _)| f.id.as_str()).collect();
    assert_eq!(ids, vec!["f1", "f2", "f3"]);

    // Each export ran on its own page, opened in the same order.
    let urls: Vec<String> = browser.opened().iter().map(|p| p.url()).collect();
    assert_eq!(urls.len(), 3);
    assert!(urls[0].contains("/file/f1"));
    assert!(urls[1].contains("/file/f2"));
    assert!(urls[2].contains("/file/f3"));
}

#[tokio::test]
async fn catalog_error_aborts_after_teardown() {
    let tmp = tempfile::tempdir().unwrap();

    let browser = FakeBrowser::new(FakePageConfig::default(), FakePageConfig::default());
    let catalog = FakeCatalog::new(vec![]).failing_for("A");
    let store = Arc::new(MemStore::empty());

    let mut orch = orchestrator(config(tmp.path(), &["A"]), browser.clone(), catalog, store);
    let err = orch.run().await.unwrap_err();

    assert!(matches!(err, BackupError::Catalog(_)));
    assert_eq!(orch.state(), RunState::Aborted);
    assert_eq!(browser.closed(), 1);
    assert!(browser.opened().is_empty());
}

#[tokio::test]
async fn run_start_drops_the_previous_cookie_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config(tmp.path(), &[]);

    std::fs::create_dir_all(&config.root_dir).unwrap();
    std::fs::write(config.cookies_path(), "[]").unwrap();

    let browser = FakeBrowser::new(FakePageConfig::default(), FakePageConfig::default());
    let store = Arc::new(MemStore::empty());
    let mut orch = orchestrator(config.clone(), browser, FakeCatalog::new(vec![]), store);
    orch.run().await.unwrap();

    assert!(!config.cookies_path().exists());
    assert!(config.backups_dir().is_dir());
}
