use chrono::Utc;

use super::*;

#[test]
fn cookie_serializes_in_wire_format() {
    let cookie = SessionCookie {
        name: "session".to_string(),
        value: "abc".to_string(),
        domain: Some(".figma.com".to_string()),
        path: Some("/".to_string()),
        expires: Some(1_900_000_000.0),
        http_only: Some(true),
        secure: Some(true),
        same_site: Some("Lax".to_string()),
    };
    let json = serde_json::to_string(&cookie).unwrap();
    assert!(json.contains("\"httpOnly\":true"));
    assert!(json.contains("\"sameSite\":\"Lax\""));
    assert!(!json.contains("http_only"));
}

#[test]
fn cookie_roundtrips() {
    let cookie = SessionCookie {
        name: "session".to_string(),
        value: "abc".to_string(),
        domain: None,
        path: None,
        expires: None,
        http_only: None,
        secure: None,
        same_site: None,
    };
    let json = serde_json::to_string(&cookie).unwrap();
    let back: SessionCookie = serde_json::from_str(&json).unwrap();
    assert_eq!(cookie, back);
}

#[test]
fn cookie_tolerates_extra_wire_fields() {
    // The browser reports fields we do not model; they must not break the
    // capture path.
    let json = r#"{
        "name": "session",
        "value": "abc",
        "domain": ".figma.com",
        "path": "/",
        "expires": -1,
        "size": 10,
        "httpOnly": true,
        "secure": true,
        "session": true,
        "priority": "Medium"
    }"#;
    let cookie: SessionCookie = serde_json::from_str(json).unwrap();
    assert_eq!(cookie.name, "session");
    assert_eq!(cookie.expires, Some(-1.0));
}

#[test]
fn captured_session_keeps_whole_set() {
    let session = CapturedSession::now(vec![SessionCookie {
        name: "a".to_string(),
        value: "1".to_string(),
        domain: None,
        path: None,
        expires: None,
        http_only: None,
        secure: None,
        same_site: None,
    }]);
    assert_eq!(session.cookies.len(), 1);
    assert!(session.captured_at <= Utc::now());
}
