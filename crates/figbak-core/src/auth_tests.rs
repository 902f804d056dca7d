use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use super::*;
use crate::constants::RECENT_FILES_URL;
use crate::testkit::{FakePage, FakePageConfig, LoginScript, MemStore, cookie};

fn manager(store: Arc<MemStore>) -> AuthenticationManager<Arc<MemStore>> {
    AuthenticationManager::new(
        Credentials {
            email: "user@example.com".to_string(),
            password: "hunter2".to_string(),
        },
        store,
        Duration::from_millis(1),
        Duration::from_millis(1),
    )
}

#[tokio::test]
async fn already_authenticated_page_is_a_no_op() {
    let store = Arc::new(MemStore::empty());
    let mut auth = manager(store.clone());

    let page = FakePage::new(FakePageConfig::default());
    page.set_url(&format!("{}?fuid=1", RECENT_FILES_URL));

    auth.authenticate(&page).await.unwrap();

    assert_eq!(page.submissions.load(Ordering::SeqCst), 0);
    assert!(page.clicked().is_empty());
    assert!(store.saves().is_empty());
}

#[tokio::test]
async fn cached_cookies_skip_credential_submission() {
    let valid = vec![cookie("session", "cached")];
    let store = Arc::new(MemStore::with(valid.clone()));
    let mut auth = manager(store.clone());

    // Submitting the form would fail; only the cookie path can succeed.
    let page = FakePage::new(FakePageConfig {
        valid_cookies: Some(valid),
        login: LoginScript::RejectPassword,
        ..FakePageConfig::default()
    });

    auth.authenticate(&page).await.unwrap();

    assert_eq!(page.submissions.load(Ordering::SeqCst), 0);
    assert!(page.typed().is_empty());
}

#[tokio::test]
async fn restore_miss_falls_back_to_exactly_one_submission() {
    let store = Arc::new(MemStore::empty());
    let mut auth = manager(store.clone());

    let page = FakePage::new(FakePageConfig::default());
    auth.authenticate(&page).await.unwrap();

    assert_eq!(page.submissions.load(Ordering::SeqCst), 1);
    let typed = page.typed();
    assert!(typed.contains(&"user@example.com".to_string()));
    assert!(typed.contains(&"hunter2".to_string()));
}

#[tokio::test]
async fn successful_login_writes_the_whole_set_through() {
    let store = Arc::new(MemStore::empty());
    let mut auth = manager(store.clone());

    let granted = vec![cookie("session", "fresh")];
    let page = FakePage::new(FakePageConfig {
        granted_cookies: granted.clone(),
        ..FakePageConfig::default()
    });

    auth.authenticate(&page).await.unwrap();

    assert_eq!(store.saves(), vec![granted.clone()]);
    let memo = auth.captured_session().expect("session memo");
    assert_eq!(memo.cookies, granted);
}

#[tokio::test]
async fn in_run_memo_survives_an_amnesiac_store() {
    let store = Arc::new(MemStore::amnesiac());
    let mut auth = manager(store.clone());

    // First page: fresh login populates the memo.
    let first = FakePage::new(FakePageConfig::default());
    auth.authenticate(&first).await.unwrap();
    assert_eq!(first.submissions.load(Ordering::SeqCst), 1);

    // Second page: the store remembers nothing, the memo restores the
    // session without another submission.
    let second = FakePage::new(FakePageConfig {
        valid_cookies: Some(vec![cookie("session", "fresh")]),
        login: LoginScript::RejectPassword,
        ..FakePageConfig::default()
    });
    auth.authenticate(&second).await.unwrap();

    assert_eq!(second.submissions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wrong_password_fails_with_the_scraped_message() {
    let store = Arc::new(MemStore::empty());
    let mut auth = manager(store.clone());

    let page = FakePage::new(FakePageConfig {
        login: LoginScript::RejectPassword,
        ..FakePageConfig::default()
    });

    let err = auth.authenticate(&page).await.unwrap_err();
    assert_eq!(err.reason, "Invalid password");
    assert_eq!(err.to_string(), "Authorization failed | Invalid password");
    assert!(store.saves().is_empty());
}

#[tokio::test]
async fn wrong_email_fails_with_the_scraped_message() {
    let store = Arc::new(MemStore::empty());
    let mut auth = manager(store);

    let page = FakePage::new(FakePageConfig {
        login: LoginScript::RejectEmail,
        ..FakePageConfig::default()
    });

    let err = auth.authenticate(&page).await.unwrap_err();
    assert_eq!(err.reason, "Invalid email");
}

#[tokio::test]
async fn unexpected_redirect_reports_the_url_verbatim() {
    let store = Arc::new(MemStore::empty());
    let mut auth = manager(store);

    let page = FakePage::new(FakePageConfig {
        login: LoginScript::RedirectTo("https://www.figma.com/maintenance".to_string()),
        ..FakePageConfig::default()
    });

    let err = auth.authenticate(&page).await.unwrap_err();
    assert!(
        err.reason
            .contains("Unexpectedly redirected to \"https://www.figma.com/maintenance\"")
    );
}
