use super::*;

#[test]
fn cdp_request_serializes() {
    let req = CdpRequest {
        id: 1,
        method: "Page.navigate".to_string(),
        params: Some(serde_json::json!({"url": "https://www.figma.com/login"})),
        session_id: None,
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(json.contains("Page.navigate"));
    assert!(json.contains("figma.com"));
    assert!(!json.contains("sessionId"));
}

#[test]
fn cdp_request_carries_session_id() {
    let req = CdpRequest {
        id: 7,
        method: "Network.getCookies".to_string(),
        params: None,
        session_id: Some("sess-1".to_string()),
    };
    let json = serde_json::to_string(&req).unwrap();
    assert!(json.contains("\"sessionId\":\"sess-1\""));
    assert!(!json.contains("params"));
}

#[test]
fn cdp_response_deserializes() {
    let json = r#"{"id": 1, "result": {"frameId": "abc"}}"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.id, Some(1));
    assert!(resp.result.is_some());
    assert!(resp.error.is_none());
}

#[test]
fn cdp_event_deserializes() {
    let json = r#"{
        "method": "Network.requestWillBeSent",
        "params": {"requestId": "1"},
        "sessionId": "sess-1"
    }"#;
    let resp: CdpResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.id, None);
    assert_eq!(resp.method.as_deref(), Some("Network.requestWillBeSent"));
    assert_eq!(resp.session_id.as_deref(), Some("sess-1"));
}

#[test]
fn page_info_deserializes() {
    let json = r#"{
        "id": "page123",
        "type": "page",
        "title": "Figma",
        "url": "https://www.figma.com/files/recent",
        "webSocketDebuggerUrl": "ws://localhost:9222/devtools/page/page123"
    }"#;
    let info: PageInfo = serde_json::from_str(json).unwrap();
    assert_eq!(info.id, "page123");
    assert_eq!(info.page_type, "page");
}

#[test]
fn box_model_deserializes() {
    let json = r#"{
        "content": [0.0, 0.0, 100.0, 0.0, 100.0, 40.0, 0.0, 40.0],
        "padding": [0.0, 0.0, 100.0, 0.0, 100.0, 40.0, 0.0, 40.0],
        "width": 100,
        "height": 40
    }"#;
    let model: BoxModel = serde_json::from_str(json).unwrap();
    assert_eq!(model.content.len(), 8);
    assert_eq!(model.width, 100);
}

#[test]
fn mouse_button_serializes() {
    assert_eq!(serde_json::to_string(&MouseButton::Left).unwrap(), "\"left\"");
}

#[test]
fn key_event_type_serializes() {
    assert_eq!(
        serde_json::to_string(&KeyEventType::RawKeyDown).unwrap(),
        "\"rawKeyDown\""
    );
}
