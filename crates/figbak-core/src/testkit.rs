//! Scripted in-memory driver, store, and catalog for state-machine tests.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::catalog::{Project, ProjectCatalog};
use crate::constants::{
    EMAIL_INPUT, FILE_URL_BASE, LOGIN_URL, PALETTE_RESULT, PALETTE_SEARCH, PASSWORD_INPUT,
    RECENT_FILES_URL, SUBMIT_BUTTON,
};
use crate::driver::{BrowserDriver, PageDriver};
use crate::error::{CatalogError, DriverError};
use crate::session::{CookieSet, SessionCookie};
use crate::store::CookieStore;

pub fn cookie(name: &str, value: &str) -> SessionCookie {
    SessionCookie {
        name: name.to_string(),
        value: value.to_string(),
        domain: Some(".figma.com".to_string()),
        path: Some("/".to_string()),
        expires: None,
        http_only: Some(true),
        secure: Some(true),
        same_site: None,
    }
}

/// What the fake login form does when submitted.
#[derive(Debug, Clone)]
pub enum LoginScript {
    Accept,
    RejectEmail,
    RejectPassword,
    RedirectTo(String),
}

/// Behavior of one fake page.
#[derive(Clone)]
pub struct FakePageConfig {
    /// Cookies the fake site accepts as a valid session.
    pub valid_cookies: Option<CookieSet>,
    pub login: LoginScript,
    /// Cookies the fake site grants after an accepted login.
    pub granted_cookies: CookieSet,
    /// Navigations `wait_for_navigation` reports before settling.
    pub pending_navigations: usize,
    pub palette_opens: bool,
    pub command_found: bool,
    pub download_completes: bool,
    pub file_page_redirects_elsewhere: bool,
}

impl Default for FakePageConfig {
    fn default() -> Self {
        Self {
            valid_cookies: None,
            login: LoginScript::Accept,
            granted_cookies: vec![cookie("session", "fresh")],
            pending_navigations: 0,
            palette_opens: true,
            command_found: true,
            download_completes: true,
            file_page_redirects_elsewhere: false,
        }
    }
}

#[derive(Default)]
struct FakePageState {
    url: String,
    authenticated: bool,
    cookies: CookieSet,
    email_invalid: bool,
    password_invalid: bool,
    palette_search_visible: bool,
    palette_result_visible: bool,
    pending_navigations: usize,
    typed: Vec<String>,
    clicked: Vec<String>,
    chords: Vec<(String, String)>,
    download_dir: Option<PathBuf>,
}

/// A scripted page. Clones share state, so a test can keep a handle while
/// the component under test owns another.
#[derive(Clone)]
pub struct FakePage {
    config: FakePageConfig,
    state: Arc<Mutex<FakePageState>>,
    pub closed: Arc<AtomicUsize>,
    /// Login form submissions (submit-button clicks).
    pub submissions: Arc<AtomicUsize>,
    pub nav_waits: Arc<AtomicUsize>,
}

impl FakePage {
    pub fn new(config: FakePageConfig) -> Self {
        let state = FakePageState {
            url: "about:blank".to_string(),
            pending_navigations: config.pending_navigations,
            ..FakePageState::default()
        };
        Self {
            config,
            state: Arc::new(Mutex::new(state)),
            closed: Arc::new(AtomicUsize::new(0)),
            submissions: Arc::new(AtomicUsize::new(0)),
            nav_waits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn typed(&self) -> Vec<String> {
        self.state.lock().unwrap().typed.clone()
    }

    pub fn clicked(&self) -> Vec<String> {
        self.state.lock().unwrap().clicked.clone()
    }

    pub fn chords(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().chords.clone()
    }

    pub fn download_dir(&self) -> Option<PathBuf> {
        self.state.lock().unwrap().download_dir.clone()
    }

    pub fn url(&self) -> String {
        self.state.lock().unwrap().url.clone()
    }

    pub fn set_url(&self, url: &str) {
        self.state.lock().unwrap().url = url.to_string();
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        let mut s = self.state.lock().unwrap();
        if url.starts_with(FILE_URL_BASE) {
            s.url = if self.config.file_page_redirects_elsewhere {
                "https://www.figma.com/maintenance".to_string()
            } else {
                // The editor canonicalizes the URL with a title slug.
                format!("{}/slug", url)
            };
        } else if url.contains(RECENT_FILES_URL) && !s.authenticated {
            // Anonymous visitors bounce to the login form.
            s.url = LOGIN_URL.to_string();
        } else {
            s.url = url.to_string();
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn wait_for_navigation(&self, _timeout: Duration) -> Result<(), DriverError> {
        self.nav_waits.fetch_add(1, Ordering::SeqCst);
        let mut s = self.state.lock().unwrap();
        if s.pending_navigations > 0 {
            s.pending_navigations -= 1;
            Ok(())
        } else {
            Err(DriverError::Timeout("no pending navigation".to_string()))
        }
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        if self.selector_present(selector).await? {
            Ok(())
        } else {
            Err(DriverError::Timeout(format!(
                "Waiting for selector {} timed out ({:?})",
                selector, timeout
            )))
        }
    }

    async fn selector_present(&self, selector: &str) -> Result<bool, DriverError> {
        let s = self.state.lock().unwrap();
        Ok(match selector {
            _ if selector == PALETTE_SEARCH => s.palette_search_visible,
            _ if selector == PALETTE_RESULT => s.palette_result_visible,
            _ => false,
        })
    }

    async fn element_class(&self, selector: &str) -> Result<Option<String>, DriverError> {
        let s = self.state.lock().unwrap();
        let class_of = |invalid: bool| {
            Some(if invalid {
                "auth-input invalidInput".to_string()
            } else {
                "auth-input".to_string()
            })
        };
        if selector == EMAIL_INPUT {
            Ok(class_of(s.email_invalid))
        } else if selector == PASSWORD_INPUT {
            Ok(class_of(s.password_invalid))
        } else {
            Ok(None)
        }
    }

    async fn click(&self, selector: &str) -> Result<(), DriverError> {
        let mut s = self.state.lock().unwrap();
        s.clicked.push(selector.to_string());
        if selector == SUBMIT_BUTTON {
            self.submissions.fetch_add(1, Ordering::SeqCst);
            match &self.config.login {
                LoginScript::Accept => {
                    s.authenticated = true;
                    s.cookies = self.config.granted_cookies.clone();
                    s.url = format!("{}?fuid=1", RECENT_FILES_URL);
                }
                LoginScript::RejectEmail => {
                    s.email_invalid = true;
                    s.url = LOGIN_URL.to_string();
                }
                LoginScript::RejectPassword => {
                    s.password_invalid = true;
                    s.url = LOGIN_URL.to_string();
                }
                LoginScript::RedirectTo(url) => s.url = url.clone(),
            }
        }
        Ok(())
    }

    async fn type_text(&self, text: &str, _delay: Duration) -> Result<(), DriverError> {
        let mut s = self.state.lock().unwrap();
        s.typed.push(text.to_string());
        if s.palette_search_visible && self.config.command_found {
            s.palette_result_visible = true;
        }
        Ok(())
    }

    async fn press_key(&self, _key: &str) -> Result<(), DriverError> {
        Ok(())
    }

    async fn key_chord(&self, modifier: &str, key: &str) -> Result<(), DriverError> {
        let mut s = self.state.lock().unwrap();
        s.chords.push((modifier.to_string(), key.to_string()));
        if self.config.palette_opens {
            s.palette_search_visible = true;
        }
        Ok(())
    }

    async fn install_cookies(&self, cookies: &CookieSet) -> Result<(), DriverError> {
        let mut s = self.state.lock().unwrap();
        s.cookies = cookies.clone();
        if self.config.valid_cookies.as_ref() == Some(cookies) {
            s.authenticated = true;
        }
        Ok(())
    }

    async fn capture_cookies(&self) -> Result<CookieSet, DriverError> {
        Ok(self.state.lock().unwrap().cookies.clone())
    }

    async fn set_download_dir(&self, dir: &Path) -> Result<(), DriverError> {
        self.state.lock().unwrap().download_dir = Some(dir.to_path_buf());
        Ok(())
    }

    async fn wait_for_network_idle(
        &self,
        _quiet: Duration,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        if self.config.download_completes {
            Ok(())
        } else {
            Err(DriverError::Timeout(format!(
                "Network idle not reached within {:?}",
                timeout
            )))
        }
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FakeBrowserInner {
    initial: FakePage,
    /// Per-open-page scripts, consumed in order; the default config is used
    /// once the queue runs dry.
    page_scripts: Mutex<VecDeque<FakePageConfig>>,
    default_page: FakePageConfig,
    opened: Mutex<Vec<FakePage>>,
    launched: AtomicUsize,
    closed: AtomicUsize,
}

/// A scripted browser. Clones share state.
#[derive(Clone)]
pub struct FakeBrowser {
    inner: Arc<FakeBrowserInner>,
}

impl FakeBrowser {
    pub fn new(initial: FakePageConfig, default_page: FakePageConfig) -> Self {
        Self {
            inner: Arc::new(FakeBrowserInner {
                initial: FakePage::new(initial),
                page_scripts: Mutex::new(VecDeque::new()),
                default_page,
                opened: Mutex::new(Vec::new()),
                launched: AtomicUsize::new(0),
                closed: AtomicUsize::new(0),
            }),
        }
    }

    pub fn push_page_script(&self, config: FakePageConfig) {
        self.inner.page_scripts.lock().unwrap().push_back(config);
    }

    pub fn initial(&self) -> FakePage {
        self.inner.initial.clone()
    }

    pub fn opened(&self) -> Vec<FakePage> {
        self.inner.opened.lock().unwrap().clone()
    }

    pub fn launched(&self) -> usize {
        self.inner.launched.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserDriver for FakeBrowser {
    type Page = FakePage;

    async fn launch(&self) -> Result<(), DriverError> {
        self.inner.launched.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn initial_page(&self) -> Result<FakePage, DriverError> {
        Ok(self.inner.initial.clone())
    }

    async fn open_page(&self) -> Result<FakePage, DriverError> {
        let config = self
            .inner
            .page_scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.inner.default_page.clone());
        let page = FakePage::new(config);
        self.inner.opened.lock().unwrap().push(page.clone());
        Ok(page)
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.inner.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory cookie store recording every save.
#[derive(Default)]
pub struct MemStore {
    cookies: Mutex<Option<CookieSet>>,
    /// When set, `load` always misses; saves are still recorded.
    amnesiac: bool,
    pub saved: Mutex<Vec<CookieSet>>,
}

impl MemStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(cookies: CookieSet) -> Self {
        Self {
            cookies: Mutex::new(Some(cookies)),
            ..Self::default()
        }
    }

    pub fn amnesiac() -> Self {
        Self {
            amnesiac: true,
            ..Self::default()
        }
    }

    pub fn saves(&self) -> Vec<CookieSet> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl CookieStore for MemStore {
    async fn load(&self) -> Option<CookieSet> {
        if self.amnesiac {
            return None;
        }
        self.cookies.lock().unwrap().clone()
    }

    async fn save(&self, cookies: &CookieSet) -> std::io::Result<()> {
        *self.cookies.lock().unwrap() = Some(cookies.clone());
        self.saved.lock().unwrap().push(cookies.clone());
        Ok(())
    }
}

/// In-memory catalog.
#[derive(Default)]
pub struct FakeCatalog {
    projects: HashMap<String, Project>,
    fail_for: Option<String>,
}

impl FakeCatalog {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects: projects.into_iter().map(|p| (p.id.clone(), p)).collect(),
            fail_for: None,
        }
    }

    pub fn failing_for(mut self, project_id: &str) -> Self {
        self.fail_for = Some(project_id.to_string());
        self
    }
}

#[async_trait]
impl ProjectCatalog for FakeCatalog {
    async fn project_files(&self, project_id: &str) -> Result<Project, CatalogError> {
        if self.fail_for.as_deref() == Some(project_id) {
            return Err(CatalogError::Api {
                status: 403,
                message: "Invalid token".to_string(),
            });
        }
        self.projects
            .get(project_id)
            .cloned()
            .ok_or(CatalogError::Api {
                status: 404,
                message: "Not found".to_string(),
            })
    }
}
