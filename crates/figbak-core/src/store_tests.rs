use super::*;
use crate::testkit::cookie;

#[tokio::test]
async fn load_returns_none_when_file_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsCookieStore::new(dir.path().join("cookies.json"));
    assert!(store.load().await.is_none());
}

#[tokio::test]
async fn load_returns_none_when_file_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cookies.json");
    std::fs::write(&path, "not json at all").unwrap();

    let store = FsCookieStore::new(path);
    assert!(store.load().await.is_none());
}

#[tokio::test]
async fn save_then_load_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsCookieStore::new(dir.path().join("cookies.json"));

    let cookies = vec![cookie("session", "abc"), cookie("csrf", "def")];
    store.save(&cookies).await.unwrap();

    assert_eq!(store.load().await, Some(cookies));
}

#[tokio::test]
async fn save_overwrites_the_previous_set() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsCookieStore::new(dir.path().join("cookies.json"));

    store.save(&vec![cookie("session", "old")]).await.unwrap();
    let fresh = vec![cookie("session", "new")];
    store.save(&fresh).await.unwrap();

    assert_eq!(store.load().await, Some(fresh));
}
