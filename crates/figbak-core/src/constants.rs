//! Target-site URLs, DOM selectors, and filesystem layout.

/// Default root directory for all bot state and downloaded files.
pub const ROOT_DIR: &str = "figma-backup-root";
/// Subdirectory of the root holding one directory per run.
pub const BACKUPS_DIR: &str = "backups";
/// Persisted cookie file, relative to the root.
pub const COOKIES_FILE: &str = "cookies.json";

pub const LOGIN_URL: &str = "https://www.figma.com/login";
pub const RECENT_FILES_URL: &str = "https://www.figma.com/files/recent";
pub const FILE_URL_BASE: &str = "https://www.figma.com/file";
pub const API_BASE_URL: &str = "https://api.figma.com";

// Login form.
pub const EMAIL_INPUT: &str = r#"form#auth-view-page > input[name="email"]"#;
pub const PASSWORD_INPUT: &str = r#"form#auth-view-page > input[name="password"]"#;
pub const SUBMIT_BUTTON: &str = r#"form#auth-view-page > button[type="submit"]"#;
/// Class fragment the login form adds to an input that failed validation.
pub const INVALID_INPUT_CLASS: &str = "invalidInput";

// Editor page.
pub const PROGRESS_BAR: &str = r#"[class*="progress_bar--outer"]"#;
pub const PALETTE_SEARCH: &str = r#"[class*="quick_actions--search"]"#;
pub const PALETTE_RESULT: &str = r#"[class*="quick_actions--result"]"#;
/// Transient notification the editor shows while it is busy.
pub const VISUAL_BELL: &str = r#"[class*="visual_bell--shown"]"#;

/// Command palette entry that triggers the export.
pub const EXPORT_COMMAND: &str = "save local copy";

/// Canonical URL of a document's editor page.
pub fn file_url(file_id: &str) -> String {
    format!("{}/{}", FILE_URL_BASE, file_id)
}
