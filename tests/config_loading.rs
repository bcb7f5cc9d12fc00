// tests/config_loading.rs

use std::io::Write;
use std::time::Duration;

use tempfile::{Builder, NamedTempFile};
use procmgr::config::{DEFAULT_GRACE_PERIOD, load_and_validate};
use procmgr::errors::{ConfigError, SupervisorError};
use procmgr::tree::build_tree;

fn config_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn loads_toml_config() {
    let file = config_file(
        ".toml",
        r#"
[supervisor]
grace_period = "3s"
restart_delay = "250ms"

[[process]]
name = "db"
command = "postgres -D ./data"

[[process]]
name = "api"
command = "./api --port 8080"
after = "db"
work_dir = "./api"
auto_restart = false
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.settings().grace_period, Duration::from_secs(3));
    assert_eq!(cfg.settings().restart_delay, Duration::from_millis(250));

    let tree = build_tree(cfg.processes()).unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.roots(), &[0]);
    assert_eq!(tree.node(1).args, vec!["--port", "8080"]);
}

#[test]
fn loads_json_process_list() {
    let file = config_file(
        ".json",
        r#"[
  {"name": "watcher", "command": "gfs --serve", "autoRestart": true},
  {"name": "build", "command": "make", "after": "", "workDir": "/src"},
  {"name": "deploy", "command": "make deploy", "after": "build"}
]"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.settings().grace_period, DEFAULT_GRACE_PERIOD);

    let tree = build_tree(cfg.processes()).unwrap();
    let roots: Vec<&str> = tree
        .roots()
        .iter()
        .map(|&id| tree.node(id).name.as_str())
        .collect();
    assert_eq!(roots, vec!["watcher", "build"]);
    assert!(tree.node(0).auto_restart);
}

#[test]
fn loads_json_object_with_settings() {
    let file = config_file(
        ".json",
        r#"{
  "supervisor": {"grace_period": "1s"},
  "process": [{"name": "a", "command": "true"}]
}"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.settings().grace_period, Duration::from_secs(1));
}

#[test]
fn invalid_toml_returns_toml_error() {
    let file = config_file(".toml", "[[process]\nname = ");

    let result = load_and_validate(file.path());
    match result {
        Err(e @ SupervisorError::Toml(_)) => assert!(e.is_config_error()),
        Err(e) => panic!("Expected Toml error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn missing_file_error_names_the_path() {
    let missing = "/definitely/not/here/procmgr.toml";

    match load_and_validate(missing) {
        Err(e @ SupervisorError::ReadConfig { .. }) => {
            assert!(e.is_config_error());
            assert!(e.to_string().contains(missing), "path missing from: {e}");
            if let SupervisorError::ReadConfig { path, source } = e {
                assert_eq!(path, std::path::PathBuf::from(missing));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
        }
        Err(e) => panic!("Expected ReadConfig error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn empty_config_is_rejected() {
    let file = config_file(".toml", "[supervisor]\ngrace_period = \"2s\"\n");

    let result = load_and_validate(file.path());
    assert!(matches!(
        result,
        Err(SupervisorError::Config(ConfigError::NoProcesses))
    ));
}

#[test]
fn bad_duration_is_rejected() {
    let file = config_file(
        ".toml",
        r#"
[supervisor]
grace_period = "soon"

[[process]]
name = "a"
command = "true"
"#,
    );

    match load_and_validate(file.path()) {
        Err(SupervisorError::Config(ConfigError::InvalidDuration { value, .. })) => {
            assert_eq!(value, "soon");
        }
        Err(e) => panic!("Expected InvalidDuration, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn graph_errors_surface_from_tree_building() {
    let file = config_file(
        ".toml",
        r#"
[[process]]
name = "svc"
command = "svc"
auto_restart = true

[[process]]
name = "client"
command = "client"
after = "svc"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    let err = build_tree(cfg.processes()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidAutoRestart(_)));
}
