use super::*;

#[test]
fn default_config_targets_the_standard_debug_port() {
    let config = BrowserConfig::default();
    assert_eq!(config.debug_port, 9222);
    assert!(config.headless);
    assert_eq!(config.endpoint(), "http://localhost:9222");
}

#[test]
fn profile_dir_lives_under_the_bot_root() {
    let config = BrowserConfig::default();
    assert!(config.profile_dir.ends_with("figma-backup-root/browser-profile"));
}

#[test]
fn endpoint_tracks_the_configured_port() {
    let config = BrowserConfig {
        debug_port: 9333,
        ..BrowserConfig::default()
    };
    assert_eq!(config.endpoint(), "http://localhost:9333");
}
