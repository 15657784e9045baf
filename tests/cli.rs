use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn restorepoint(project: &Path) -> Command {
    let mut cmd = Command::cargo_bin("restorepoint").expect("bin");
    cmd.env_remove("RESTOREPOINT_DIR")
        .env_remove("RUST_LOG")
        .env("RESTOREPOINT_PROJECT_ROOT", project);
    cmd
}

fn project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::create_dir_all(dir.path().join("app")).expect("app dir");
    fs::write(dir.path().join("app/page.tsx"), "export default function Page() {}").expect("page");
    fs::write(dir.path().join("package.json"), r#"{"name":"site"}"#).expect("manifest");
    dir
}

fn created_id(stdout: &[u8], prefix: &str) -> String {
    let text = String::from_utf8(stdout.to_vec()).expect("utf8");
    text.lines()
        .find_map(|line| line.strip_prefix(prefix))
        .map(|id| id.trim().to_string())
        .expect("id in output")
}

#[test]
fn init_writes_settings() {
    let dir = project();

    restorepoint(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(dir.path().join(".restorepoint/config.json").exists());
    assert!(dir.path().join(".restorepoint/backups").is_dir());
}

#[test]
fn config_shows_paths() {
    let dir = project();

    restorepoint(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("State directory:"))
        .stdout(predicate::str::contains("**/node_modules/**"));
}

#[test]
fn full_backup_then_validate() {
    let dir = project();

    let output = restorepoint(dir.path())
        .args(["backup", "full"])
        .output()
        .expect("backup");
    assert!(output.status.success());
    let id = created_id(&output.stdout, "Backup created:");
    assert!(id.starts_with("full-"));

    restorepoint(dir.path())
        .args(["validate", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));

    restorepoint(dir.path())
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(id.as_str()))
        .stdout(predicate::str::contains("Total: 1 backup(s)"));
}

#[test]
fn validate_unknown_backup_fails() {
    let dir = project();

    restorepoint(dir.path())
        .args(["validate", "full-404"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Backup full-404 not found"));
}

#[test]
fn restore_requires_force() {
    let dir = project();

    let output = restorepoint(dir.path())
        .args(["backup", "full"])
        .output()
        .expect("backup");
    let id = created_id(&output.stdout, "Backup created:");

    fs::write(dir.path().join("package.json"), "broken").expect("overwrite");

    restorepoint(dir.path())
        .args(["restore", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
    assert_eq!(fs::read_to_string(dir.path().join("package.json")).unwrap(), "broken");

    restorepoint(dir.path())
        .args(["restore", &id, "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored 2 file(s)"));
    assert_eq!(
        fs::read_to_string(dir.path().join("package.json")).unwrap(),
        r#"{"name":"site"}"#
    );
}

#[test]
fn restore_unknown_backup_fails() {
    let dir = project();

    restorepoint(dir.path())
        .args(["restore", "full-404", "--force"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Backup full-404 not found"));
}

#[test]
fn snapshot_create_list_and_restore() {
    let dir = project();

    let output = restorepoint(dir.path())
        .args(["snapshot", "create", "before upgrade"])
        .output()
        .expect("snapshot");
    assert!(output.status.success());
    let id = created_id(&output.stdout, "Snapshot:");

    restorepoint(dir.path())
        .args(["snapshot", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("before upgrade"));

    fs::remove_file(dir.path().join("app/page.tsx")).expect("remove");

    restorepoint(dir.path())
        .args(["restore-snapshot", &id, "--force"])
        .assert()
        .success();
    assert!(dir.path().join("app/page.tsx").exists());
}
