//! Read-only REST catalog of projects and files.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::constants::API_BASE_URL;
use crate::error::CatalogError;

/// Minimal identity needed to navigate to and name a document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileRef {
    #[serde(rename = "key")]
    pub id: String,
    pub name: String,
}

/// A project and the files it contains, in vendor order.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub files: Vec<FileRef>,
}

/// A project as listed under a team.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
}

#[async_trait]
pub trait ProjectCatalog: Send + Sync {
    /// Project metadata and files for `project_id`, in vendor order.
    async fn project_files(&self, project_id: &str) -> Result<Project, CatalogError>;
}

/// HTTP client for the vendor REST API.
pub struct FigmaCatalog {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ProjectFilesResponse {
    name: String,
    files: Vec<FileRef>,
}

#[derive(Debug, Deserialize)]
struct TeamProjectsResponse {
    projects: Vec<ProjectRef>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

impl FigmaCatalog {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(API_BASE_URL, access_token)
    }

    /// Point the catalog at a different API host (used by tests).
    pub fn with_base_url(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    /// Projects under a team; expands a team id into project ids.
    pub async fn team_projects(&self, team_id: &str) -> Result<Vec<ProjectRef>, CatalogError> {
        let url = format!("{}/v1/teams/{}/projects", self.base_url, team_id);
        let body: TeamProjectsResponse = self.get_json(&url).await?;
        Ok(body.projects)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header("X-Figma-Token", &self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: ApiErrorBody = response.json().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ProjectCatalog for FigmaCatalog {
    async fn project_files(&self, project_id: &str) -> Result<Project, CatalogError> {
        let url = format!("{}/v1/projects/{}/files", self.base_url, project_id);
        let body: ProjectFilesResponse = self.get_json(&url).await?;
        Ok(Project {
            id: project_id.to_string(),
            name: body.name,
            files: body.files,
        })
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
