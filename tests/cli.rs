//! End-to-end tests for the mule-preview-extractor binary.

#![allow(deprecated)] // cargo_bin is deprecated but works fine for standard builds

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HTTP_EDITOR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<namespace prefix="http" url="http://www.mulesoft.org/schema/mule/http">
  <global-element localId="listener-config" image="icons/large/config.png"/>
  <endpoint localId="listener" image="icons/large/listener.png" description="HTTP Listener"/>
</namespace>
"#;

fn command(working_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mule-preview-extractor").unwrap();
    cmd.current_dir(working_dir)
        .env_remove("MULE_PREVIEW_EXTRACTOR_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// An unpacked Studio installation with an HTTP plugin, a light theme plugin
/// and one packed bundle.
fn create_workspace() -> TempDir {
    let workspace = TempDir::new().unwrap();
    let plugins = workspace.path().join("plugins");

    let http = plugins.join("org.mule.tooling.http_7.3.0");
    write(&http.join("plugin.xml"), "<plugin/>");
    write(&http.join("editors/http.xml"), HTTP_EDITOR);
    write(&http.join("icons/large/listener.png"), "listener");
    write(&http.join("icons/large/config.png"), "config");

    let theme = plugins.join("org.mule.tooling.ui.theme.light_7.3.0");
    write(&theme.join("META-INF/MANIFEST.MF"), "Bundle-SymbolicName: theme");
    write(&theme.join("icons/large/listener.png"), "light-listener");

    write(&plugins.join("org.mule.tooling.core_7.3.0.jar"), "jar");

    workspace
}

#[test]
fn test_help_short_flag() {
    let cwd = TempDir::new().unwrap();
    command(cwd.path())
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: mule-preview-extractor [options] action"))
        .stdout(predicate::str::contains("extract-widget-types"));
}

#[test]
fn test_help_wins_over_other_arguments() {
    let cwd = TempDir::new().unwrap();
    command(cwd.path())
        .args(["--unknown", "bogus-action", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Actions:"));
}

#[test]
fn test_missing_output_fails_with_usage() {
    let cwd = TempDir::new().unwrap();
    command(cwd.path())
        .args(["-d", "/ws", "extract-images"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage: mule-preview-extractor"));
}

#[test]
fn test_unknown_action_fails_with_usage() {
    let cwd = TempDir::new().unwrap();
    command(cwd.path())
        .args(["-d", "/ws", "-o", "/out", "bogus-action"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage: mule-preview-extractor"));
}

#[test]
fn test_rejected_arguments_leave_no_output_behind() {
    let cwd = TempDir::new().unwrap();
    let output = cwd.path().join("never-created");
    let out = output.to_str().unwrap();

    let rejected: [&[&str]; 4] = [
        &["-d", "/ws", "-o", out, "bogus-action"],
        &["-o", out, "extract-images"],
        &["--frobnicate", "-d", "/ws", "-o", out, "extract-images"],
        &["-d", "/ws", "-o", out, "extract-images", "generate-mappings"],
    ];

    for args in rejected {
        command(cwd.path()).args(args).assert().code(1);
        assert!(!output.exists(), "{:?} created the output directory", args);
    }
}

#[test]
fn test_no_arguments_fail() {
    let cwd = TempDir::new().unwrap();
    command(cwd.path()).assert().code(1);
}

#[test]
fn test_grammar_errors_are_reported() {
    let cwd = TempDir::new().unwrap();
    command(cwd.path())
        .args(["--frobnicate", "-d", "/ws", "-o", "/out", "extract-images"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "The following errors occurred while parsing your command:",
        ))
        .stderr(predicate::str::contains("--frobnicate"));

    command(cwd.path())
        .args(["extract-images", "-d"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("The following errors occurred"));
}

#[test]
fn test_extract_images() {
    let workspace = create_workspace();
    let output = TempDir::new().unwrap();

    command(workspace.path())
        .arg("-d")
        .arg(workspace.path())
        .arg("-o")
        .arg(output.path())
        .arg("extract-images")
        .assert()
        .success();

    let http = output.path().join("org.mule.tooling.http/icons/large");
    assert_eq!(fs::read_to_string(http.join("listener.png")).unwrap(), "listener");
    assert!(http.join("config.png").exists());
    assert!(output
        .path()
        .join("org.mule.tooling.ui.theme.light/icons/large/listener.png")
        .exists());
}

#[test]
fn test_extract_widget_types() {
    let workspace = create_workspace();
    let output = TempDir::new().unwrap();

    command(workspace.path())
        .arg("--anypoint-dir")
        .arg(workspace.path())
        .arg("--output")
        .arg(output.path())
        .arg("extract-widget-types")
        .assert()
        .success();

    let content = fs::read_to_string(output.path().join("widget-types.json")).unwrap();
    let types: Vec<String> = serde_json::from_str(&content).unwrap();
    assert_eq!(types, vec!["endpoint", "global-element"]);
}

#[test]
fn test_generate_mappings() {
    let workspace = create_workspace();
    let output = TempDir::new().unwrap();

    command(workspace.path())
        .arg("-d")
        .arg(workspace.path())
        .arg("-o")
        .arg(output.path())
        .arg("generate-mappings")
        .assert()
        .success();

    let content = fs::read_to_string(output.path().join("mappings.json")).unwrap();
    let mappings: serde_json::Value = serde_json::from_str(&content).unwrap();

    let listener = &mappings["http:listener"];
    assert_eq!(listener["widget_type"], "endpoint");
    assert_eq!(listener["plugin"], "org.mule.tooling.http");
    assert_eq!(listener["image"], "org.mule.tooling.http/icons/large/listener.png");
    assert_eq!(listener["description"], "HTTP Listener");
    assert!(mappings.get("http:listener-config").is_some());
}

#[test]
fn test_apply_light_theme_replaces_images() {
    let workspace = create_workspace();
    let output = TempDir::new().unwrap();
    write(&output.path().join("icons/large/listener.png"), "dark-listener");

    command(workspace.path())
        .arg("-d")
        .arg(workspace.path())
        .arg("-o")
        .arg(output.path())
        .arg("apply-light-theme")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(output.path().join("icons/large/listener.png")).unwrap(),
        "light-listener"
    );
}

#[test]
fn test_output_directory_is_created() {
    let workspace = create_workspace();
    let output = TempDir::new().unwrap();
    let nested = output.path().join("a/b/c");

    command(workspace.path())
        .arg("-d")
        .arg(workspace.path())
        .arg("-o")
        .arg(&nested)
        .arg("extract-widget-types")
        .assert()
        .success();

    assert!(nested.join("widget-types.json").exists());
}

#[test]
fn test_collaborator_failure_still_exits_zero() {
    let cwd = TempDir::new().unwrap();
    let output = cwd.path().join("out");

    command(cwd.path())
        .arg("-d")
        .arg(cwd.path().join("missing-studio"))
        .arg("-o")
        .arg(&output)
        .arg("extract-images")
        .assert()
        .success()
        .stderr(predicate::str::contains("missing-studio"));

    assert!(output.is_dir());
}

#[test]
fn test_unusable_output_directory_fails() {
    let workspace = create_workspace();
    let blocker = workspace.path().join("blocker");
    fs::write(&blocker, "file").unwrap();

    command(workspace.path())
        .arg("-d")
        .arg(workspace.path())
        .arg("-o")
        .arg(blocker.join("out"))
        .arg("extract-images")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("output directory"));
}

#[test]
fn test_invalid_config_fails_before_output_is_created() {
    let workspace = create_workspace();
    let config = workspace.path().join("broken.toml");
    fs::write(&config, "[scan\nmax_depth = ").unwrap();
    let output = workspace.path().join("never-created");

    command(workspace.path())
        .env("MULE_PREVIEW_EXTRACTOR_CONFIG", &config)
        .arg("-d")
        .arg(workspace.path())
        .arg("-o")
        .arg(&output)
        .arg("extract-images")
        .assert()
        .code(1);

    assert!(!output.exists());
}

#[test]
fn test_config_file_in_working_directory_is_used() {
    let workspace = create_workspace();
    let output = TempDir::new().unwrap();
    fs::write(
        workspace.path().join("mule-preview-extractor.toml"),
        "[output]\nwidget_types_file = \"types.json\"\n",
    )
    .unwrap();

    command(workspace.path())
        .arg("-d")
        .arg(workspace.path())
        .arg("-o")
        .arg(output.path())
        .arg("extract-widget-types")
        .assert()
        .success();

    assert!(output.path().join("types.json").exists());
}

#[test]
fn test_workspace_without_plugins_writes_empty_outputs() {
    let workspace = TempDir::new().unwrap();
    fs::create_dir_all(workspace.path().join("configuration")).unwrap();
    let output = TempDir::new().unwrap();

    for action in ["extract-widget-types", "generate-mappings"] {
        command(workspace.path())
            .arg("-d")
            .arg(workspace.path())
            .arg("-o")
            .arg(output.path())
            .arg(action)
            .assert()
            .success();
    }

    assert_eq!(
        fs::read_to_string(output.path().join("widget-types.json")).unwrap(),
        "[]"
    );
    assert_eq!(fs::read_to_string(output.path().join("mappings.json")).unwrap(), "{}");
}
