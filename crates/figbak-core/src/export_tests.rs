use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;

use super::*;
use crate::catalog::FileRef;
use crate::config::RunConfig;
use crate::session::Credentials;
use crate::testkit::{FakePage, FakePageConfig};

fn config(signal: CompletionSignal) -> RunConfig {
    let mut config = RunConfig::new(
        Credentials {
            email: "user@example.com".to_string(),
            password: "hunter2".to_string(),
        },
        "token",
        vec![],
    );
    config.interaction_delay = Duration::from_millis(1);
    config.typing_delay = Duration::from_millis(1);
    config.download_timeout = Duration::from_millis(50);
    config.completion_signal = signal;
    config
}

fn file() -> FileRef {
    FileRef {
        id: "abc".to_string(),
        name: "Landing".to_string(),
    }
}

#[tokio::test]
async fn exports_a_document_end_to_end() {
    let exporter: DocumentExporter<FakePage> =
        DocumentExporter::from_config(&config(CompletionSignal::NetworkIdle));
    let page = FakePage::new(FakePageConfig::default());
    let handle = page.clone();

    let outcome = exporter.export(page, &file(), Path::new("/tmp/backups/p")).await;

    assert_eq!(outcome, ExportOutcome::Completed);
    assert_eq!(handle.closed.load(Ordering::SeqCst), 1);
    assert_eq!(
        handle.chords(),
        vec![(palette_chord_modifier().to_string(), "p".to_string())]
    );
    assert!(handle.typed().contains(&"save local copy".to_string()));
    assert_eq!(
        handle.download_dir().as_deref(),
        Some(Path::new("/tmp/backups/p"))
    );
    assert!(handle.url().contains("https://www.figma.com/file/abc"));
}

#[tokio::test]
async fn navigation_failure_is_contained_and_closes_the_page() {
    let exporter: DocumentExporter<FakePage> =
        DocumentExporter::from_config(&config(CompletionSignal::NetworkIdle));
    let page = FakePage::new(FakePageConfig {
        file_page_redirects_elsewhere: true,
        ..FakePageConfig::default()
    });
    let handle = page.clone();

    let outcome = exporter.export(page, &file(), Path::new("/tmp/backups/p")).await;

    assert_eq!(outcome, ExportOutcome::TimedOut);
    assert_eq!(handle.closed.load(Ordering::SeqCst), 1);
    // The pipeline never reached the command palette.
    assert!(handle.chords().is_empty());
}

#[tokio::test]
async fn unopenable_palette_is_contained_and_closes_the_page() {
    let exporter: DocumentExporter<FakePage> =
        DocumentExporter::from_config(&config(CompletionSignal::NetworkIdle));
    let page = FakePage::new(FakePageConfig {
        palette_opens: false,
        ..FakePageConfig::default()
    });
    let handle = page.clone();

    let outcome = exporter.export(page, &file(), Path::new("/tmp/backups/p")).await;

    assert_eq!(outcome, ExportOutcome::TimedOut);
    assert_eq!(handle.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_command_is_contained_and_closes_the_page() {
    let exporter: DocumentExporter<FakePage> =
        DocumentExporter::from_config(&config(CompletionSignal::NetworkIdle));
    let page = FakePage::new(FakePageConfig {
        command_found: false,
        ..FakePageConfig::default()
    });
    let handle = page.clone();

    let outcome = exporter.export(page, &file(), Path::new("/tmp/backups/p")).await;

    assert_eq!(outcome, ExportOutcome::TimedOut);
    assert_eq!(handle.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn download_timeout_is_contained_and_closes_the_page() {
    let exporter: DocumentExporter<FakePage> =
        DocumentExporter::from_config(&config(CompletionSignal::NetworkIdle));
    let page = FakePage::new(FakePageConfig {
        download_completes: false,
        ..FakePageConfig::default()
    });
    let handle = page.clone();

    let outcome = exporter.export(page, &file(), Path::new("/tmp/backups/p")).await;

    assert_eq!(outcome, ExportOutcome::TimedOut);
    assert_eq!(handle.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn toast_probe_accepts_a_quiet_page() {
    let exporter: DocumentExporter<FakePage> =
        DocumentExporter::from_config(&config(CompletionSignal::ToastCleared));
    let page = FakePage::new(FakePageConfig {
        // The network never goes idle; only the DOM signal can succeed.
        download_completes: false,
        ..FakePageConfig::default()
    });
    let handle = page.clone();

    let outcome = exporter.export(page, &file(), Path::new("/tmp/backups/p")).await;

    assert_eq!(outcome, ExportOutcome::Completed);
    assert_eq!(handle.closed.load(Ordering::SeqCst), 1);
}
