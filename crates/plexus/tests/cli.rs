use assert_cmd::Command;
use predicates::prelude::*;

fn add_plugin(root: &std::path::Path, name: &str, manifest: &str) {
    let dir = root.join(name);
    std::fs::create_dir(&dir).unwrap();
    std::fs::write(dir.join("manifest.json"), manifest).unwrap();
}

#[test]
fn test_ping_command() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("plexus")?;
    cmd.arg("--ping");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pong"));
    Ok(())
}

#[test]
fn test_no_args_runs_normally() -> Result<(), Box<dyn std::error::Error>> {
    // An empty plugin directory is a valid (if quiet) run.
    let root = tempfile::tempdir()?;
    let mut cmd = Command::cargo_bin("plexus")?;
    cmd.arg("--plugin-dir").arg(root.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Initializing application..."))
        .stdout(predicate::str::contains("Shutting down application..."))
        .stdout(predicate::str::contains("pong").not());
    Ok(())
}

#[test]
fn test_list_shows_discovered_plugins() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;
    add_plugin(
        root.path(),
        "diagnostics",
        r#"{"id": "diagnostics", "version": "1.0.0"}"#,
    );

    let mut cmd = Command::cargo_bin("plexus")?;
    cmd.arg("--plugin-dir").arg(root.path()).arg("list");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Id: diagnostics"))
        .stdout(predicate::str::contains("Version: 1.0.0"));
    Ok(())
}

#[test]
fn test_list_marks_disabled_plugins() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;
    add_plugin(
        root.path(),
        "diagnostics",
        r#"{"id": "diagnostics", "version": "1.0.0"}"#,
    );

    let mut cmd = Command::cargo_bin("plexus")?;
    cmd.arg("--plugin-dir")
        .arg(root.path())
        .arg("--disable")
        .arg("diagnostics")
        .arg("list");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Status: Disabled"));
    Ok(())
}

#[test]
fn test_broken_manifest_fails_the_run() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;
    let dir = root.path().join("broken");
    std::fs::create_dir(&dir)?;
    std::fs::write(dir.join("manifest.json"), "{ nope")?;

    let mut cmd = Command::cargo_bin("plexus")?;
    cmd.arg("--plugin-dir").arg(root.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to initialize plugins:"));
    Ok(())
}
