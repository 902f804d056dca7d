//! Bounded settling of server-side redirect chains.

use std::time::Duration;

use tracing::trace;

use crate::driver::PageDriver;

/// Wraps a page-load action with a bounded wait for in-flight redirects to
/// settle before the caller inspects the resulting URL.
#[derive(Debug, Clone, Copy)]
pub struct NavigationGate {
    pub redirect_limit: usize,
    pub per_hop_timeout: Duration,
}

impl Default for NavigationGate {
    fn default() -> Self {
        Self {
            redirect_limit: 10,
            per_hop_timeout: Duration::from_secs(7),
        }
    }
}

impl NavigationGate {
    pub fn new(redirect_limit: usize, per_hop_timeout: Duration) -> Self {
        Self {
            redirect_limit,
            per_hop_timeout,
        }
    }

    /// Wait until no further navigation occurs within the per-hop timeout,
    /// or until the hop limit is reached. Never errors.
    pub async fn settle<P: PageDriver + ?Sized>(&self, page: &P) {
        for hop in 0..self.redirect_limit {
            if page.wait_for_navigation(self.per_hop_timeout).await.is_err() {
                trace!("Redirects settled after {} hop(s)", hop);
                return;
            }
        }
        trace!("Redirect hop limit reached");
    }
}

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod tests;
