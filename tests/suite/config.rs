//! Configuration integration tests

use std::time::Duration;

use triage_engine::{
    ConfigError, NormalizeContext, SignsConfig, Tree, TriageConfig, config_path, expand_env_vars,
    normalize, project_leaf,
};
use triage_types::RawDiagnostic;

#[test]
fn sign_overrides_flow_into_presentation() {
    let signs = SignsConfig {
        error: Some("✖".to_string()),
        ..SignsConfig::default()
    };
    let ctx = NormalizeContext::new("/w", signs.sign_table());

    let raw = vec![RawDiagnostic::new("/w/a.rs", 12, 4, 1, "unused", "lint")];
    let tree = Tree::build(normalize(&raw, &ctx).into_parts().0);

    let line = project_leaf(&tree.groups()[0].children()[0]);
    assert_eq!(line.text(), "✖ unused [12, 4]");
}

#[test]
fn env_vars_expand_for_feed_commands() {
    unsafe { std::env::set_var("TRIAGE_SUITE_BIN", "/opt/lints") };
    assert_eq!(
        expand_env_vars("${TRIAGE_SUITE_BIN}/luacheck"),
        "/opt/lints/luacheck"
    );
}

/// Single test that owns the `HOME` override; splitting it would let the
/// parallel test runner race on the variable.
#[test]
#[cfg(unix)]
fn load_round_trips_through_the_home_config() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join(".triage");
    std::fs::create_dir_all(&config_dir).unwrap();
    let config_file = config_dir.join("config.toml");

    let original_home = std::env::var_os("HOME");
    unsafe { std::env::set_var("HOME", home.path()) };

    // Valid file loads with every section intact.
    std::fs::write(
        &config_file,
        "[app]\nascii_only = true\n\n[feed]\ncommand = \"luacheck\"\npoll_interval_ms = 750\n",
    )
    .unwrap();
    let loaded = TriageConfig::load().unwrap().expect("config should load");
    assert!(loaded.app.as_ref().unwrap().ascii_only);
    let feed = loaded.feed.as_ref().unwrap();
    assert_eq!(feed.command.as_deref(), Some("luacheck"));
    assert_eq!(feed.poll_interval(), Duration::from_millis(750));
    assert_eq!(config_path().unwrap(), config_file);

    // Malformed TOML reports a parse error naming the file.
    std::fs::write(&config_file, "[app\nascii_only = ???\n").unwrap();
    match TriageConfig::load() {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path, config_file),
        other => panic!("expected parse error, got {other:?}"),
    }

    // A missing file is not an error.
    std::fs::remove_file(&config_file).unwrap();
    let absent = TriageConfig::load().unwrap();
    assert!(absent.is_none());

    match original_home {
        Some(value) => unsafe { std::env::set_var("HOME", value) },
        None => unsafe { std::env::remove_var("HOME") },
    }
}
