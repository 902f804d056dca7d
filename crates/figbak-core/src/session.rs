//! Session artifacts captured from the browser.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One browser cookie proving an already-authenticated session.
///
/// Field names serialize in the browser wire format, so the same record
/// round-trips through `cookies.json` and the driver's cookie jar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

pub type CookieSet = Vec<SessionCookie>;

/// A cookie set captured from a live login, with its capture time.
///
/// Held whole or not at all; a partial set is never kept or persisted.
#[derive(Debug, Clone)]
pub struct CapturedSession {
    pub cookies: CookieSet,
    pub captured_at: DateTime<Utc>,
}

impl CapturedSession {
    pub fn now(cookies: CookieSet) -> Self {
        Self {
            cookies,
            captured_at: Utc::now(),
        }
    }
}

/// Login credentials. Supplied once at construction, never persisted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
