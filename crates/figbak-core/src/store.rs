//! Cookie persistence.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::session::CookieSet;

/// Persistence for the captured session cookies.
#[async_trait]
pub trait CookieStore: Send + Sync {
    /// Previously saved cookies, or `None` when the backing store is absent
    /// or unreadable. Never errors.
    async fn load(&self) -> Option<CookieSet>;

    async fn save(&self, cookies: &CookieSet) -> std::io::Result<()>;
}

#[async_trait]
impl<S: CookieStore + ?Sized> CookieStore for std::sync::Arc<S> {
    async fn load(&self) -> Option<CookieSet> {
        (**self).load().await
    }

    async fn save(&self, cookies: &CookieSet) -> std::io::Result<()> {
        (**self).save(cookies).await
    }
}

/// Stores the whole cookie set as a single JSON file.
pub struct FsCookieStore {
    path: PathBuf,
}

impl FsCookieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CookieStore for FsCookieStore {
    async fn load(&self) -> Option<CookieSet> {
        let raw = tokio::fs::read(&self.path).await.ok()?;
        match serde_json::from_slice(&raw) {
            Ok(cookies) => Some(cookies),
            Err(e) => {
                warn!("Ignoring unreadable cookie file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    async fn save(&self, cookies: &CookieSet) -> std::io::Result<()> {
        let raw = serde_json::to_vec(cookies)?;
        tokio::fs::write(&self.path, raw).await?;
        debug!("Saved {} cookies to {}", cookies.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
