//! Browser automation driver for figbak via the Chrome DevTools Protocol.
//!
//! Pure Rust CDP client: connects to Chrome/Chromium over WebSocket and
//! speaks the CDP JSON-RPC protocol directly. The [`CdpBrowser`] and
//! [`CdpPage`] adapters implement the capability traits from
//! `figbak-core`, so the backup pipeline never sees CDP types.
//!
//! The browser is launched with a dedicated profile directory and
//! `--remote-debugging-port`; an already-running debuggable browser on the
//! configured port is reused instead.

mod chrome;
mod client;
mod driver;
mod error;
mod protocol;
mod session;

pub use chrome::find_chrome;
pub use client::CdpClient;
pub use driver::{BrowserConfig, CdpBrowser, CdpPage};
pub use error::CdpError;
pub use protocol::{
    BoxModel, BrowserVersion, CdpErrorResponse, CdpRequest, CdpResponse, KeyEventType, MouseButton,
    MouseEventType, PageInfo,
};
pub use session::PageSession;
