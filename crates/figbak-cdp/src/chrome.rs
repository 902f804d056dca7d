//! Chrome/Chromium process discovery and launching.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::driver::BrowserConfig;
use crate::error::CdpError;

/// Find a Chrome-family executable on this machine.
pub fn find_chrome() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        let paths = [
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ];
        for path in &paths {
            let p = PathBuf::from(path);
            if p.exists() {
                return Some(p);
            }
        }
    }

    #[cfg(target_os = "linux")]
    {
        let paths = [
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];
        for path in &paths {
            let p = PathBuf::from(path);
            if p.exists() {
                return Some(p);
            }
        }
    }

    #[cfg(target_os = "windows")]
    {
        let paths = [
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];
        for path in &paths {
            let p = PathBuf::from(path);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Whether a debuggable browser already answers on the endpoint.
pub async fn is_running(endpoint: &str) -> bool {
    reqwest::get(format!("{}/json/version", endpoint)).await.is_ok()
}

/// Launch Chrome with remote debugging enabled.
pub async fn launch(config: &BrowserConfig) -> Result<Child, CdpError> {
    let chrome_path = find_chrome().ok_or(CdpError::ChromeNotFound)?;

    std::fs::create_dir_all(&config.profile_dir)
        .map_err(|e| CdpError::LaunchFailed(e.to_string()))?;

    info!("Launching Chrome with profile at {}", config.profile_dir.display());

    let mut cmd = Command::new(&chrome_path);
    cmd.arg(format!("--remote-debugging-port={}", config.debug_port))
        .arg(format!("--user-data-dir={}", config.profile_dir.display()))
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--disable-background-networking")
        .arg("--disable-sync")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    if config.headless {
        cmd.arg("--headless=new");
    }

    let child = cmd
        .spawn()
        .map_err(|e| CdpError::LaunchFailed(e.to_string()))?;

    debug!("Chrome launched with PID {:?}", child.id());
    Ok(child)
}

/// Poll the endpoint until the freshly launched browser answers.
pub async fn wait_until_up(endpoint: &str) -> Result<(), CdpError> {
    for _ in 0..30 {
        tokio::time::sleep(Duration::from_millis(200)).await;
        if is_running(endpoint).await {
            return Ok(());
        }
    }
    Err(CdpError::LaunchFailed(
        "Chrome did not come up within timeout".to_string(),
    ))
}
