//! Network-idle detection for the CDP page session.

use std::time::{Duration, Instant};

use crate::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Resolve once no request has been in flight for `quiet`, or fail once
    /// `timeout` expires. The event pump keeps the in-flight gauge current.
    pub async fn wait_for_network_idle(
        &self,
        quiet: Duration,
        timeout: Duration,
    ) -> Result<(), CdpError> {
        let start = Instant::now();

        loop {
            if self.events.is_quiet_for(quiet) {
                return Ok(());
            }

            if start.elapsed() >= timeout {
                return Err(CdpError::Timeout(format!(
                    "Network still active after {:?}",
                    timeout
                )));
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}
