use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

#[tokio::test]
async fn fetches_project_files_in_vendor_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/123/files"))
        .and(header("X-Figma-Token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Design System",
            "files": [
                {
                    "key": "abc",
                    "name": "Landing",
                    "thumbnail_url": "https://example.com/t.png",
                    "last_modified": "2024-01-01T00:00:00Z"
                },
                {"key": "def", "name": "Checkout"}
            ]
        })))
        .mount(&server)
        .await;

    let catalog = FigmaCatalog::with_base_url(server.uri(), "secret");
    let project = catalog.project_files("123").await.unwrap();

    assert_eq!(project.id, "123");
    assert_eq!(project.name, "Design System");
    assert_eq!(project.files.len(), 2);
    assert_eq!(project.files[0].id, "abc");
    assert_eq!(project.files[0].name, "Landing");
    assert_eq!(project.files[1].id, "def");
}

#[tokio::test]
async fn surfaces_vendor_error_with_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/999/files"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": true,
            "status": 403,
            "message": "Invalid token"
        })))
        .mount(&server)
        .await;

    let catalog = FigmaCatalog::with_base_url(server.uri(), "bad");
    let err = catalog.project_files("999").await.unwrap_err();

    match err {
        CatalogError::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "Invalid token");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn expands_team_into_projects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/teams/42/projects"))
        .and(header("X-Figma-Token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Acme",
            "projects": [
                {"id": "1", "name": "Alpha"},
                {"id": "2", "name": "Beta"}
            ]
        })))
        .mount(&server)
        .await;

    let catalog = FigmaCatalog::with_base_url(server.uri(), "secret");
    let projects = catalog.team_projects("42").await.unwrap();

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].id, "1");
    assert_eq!(projects[1].name, "Beta");
}
