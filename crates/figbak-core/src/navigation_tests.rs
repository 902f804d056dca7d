use std::time::Duration;

use super::*;
use crate::testkit::{FakePage, FakePageConfig};

fn page_with_pending(pending: usize) -> FakePage {
    FakePage::new(FakePageConfig {
        pending_navigations: pending,
        ..FakePageConfig::default()
    })
}

#[tokio::test]
async fn settles_immediately_when_nothing_navigates() {
    let page = page_with_pending(0);
    let gate = NavigationGate::new(10, Duration::from_millis(1));

    gate.settle(&page).await;

    assert_eq!(page.nav_waits.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn waits_out_a_redirect_chain() {
    let page = page_with_pending(3);
    let gate = NavigationGate::new(10, Duration::from_millis(1));

    gate.settle(&page).await;

    // Three hops observed, then one timed-out wait ends the chain.
    assert_eq!(page.nav_waits.load(std::sync::atomic::Ordering::SeqCst), 4);
}

#[tokio::test]
async fn stops_at_the_hop_limit() {
    let page = page_with_pending(5);
    let gate = NavigationGate::new(2, Duration::from_millis(1));

    gate.settle(&page).await;

    assert_eq!(page.nav_waits.load(std::sync::atomic::Ordering::SeqCst), 2);
}
