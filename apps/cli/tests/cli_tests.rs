//! strider-cli 端到端测试

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const TREE: &str = r#"
[[resource_tree]]
resource = "body"

[[resource_tree.sub_resources]]
resource = "mobility"

[[resource_tree.sub_resources]]
resource = "full-arm"

[[resource_tree.sub_resources.sub_resources]]
resource = "arm"

[[resource_tree.sub_resources.sub_resources]]
resource = "gripper"
"#;

const LEASES: &str = r#"[
  {"resource":"mobility","epoch":"E","sequence":[1]},
  {"resource":"arm","epoch":"E","sequence":[4]},
  {"resource":"gripper","epoch":"E","sequence":[2]}
]"#;

fn cli() -> Command {
    Command::cargo_bin("strider-cli").unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn config_with_tree(dir: &Path) -> std::path::PathBuf {
    let content = format!("owner_identity = \"tablet\"\nresources = [\"arm\"]\n{}", TREE);
    write(dir, "lease.toml", &content)
}

#[test]
fn test_tree_check_ok() {
    let dir = tempfile::tempdir().unwrap();
    let tree = write(dir.path(), "robot.toml", TREE);

    cli()
        .args(["tree", "check"])
        .arg(&tree)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: 1 root(s), 5 resource(s)"));
}

#[test]
fn test_tree_check_rejects_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let tree = write(
        dir.path(),
        "robot.json",
        r#"{"resource":"body","sub_resources":[{"resource":"arm"},{"resource":"arm"}]}"#,
    );

    cli()
        .args(["tree", "check"])
        .arg(&tree)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate resource name: arm"));
}

#[test]
fn test_tree_leaves_of_subtree() {
    let dir = tempfile::tempdir().unwrap();
    let tree = write(dir.path(), "robot.toml", TREE);

    cli()
        .args(["tree", "leaves"])
        .arg(&tree)
        .args(["--root", "full-arm"])
        .assert()
        .success()
        .stdout("arm\ngripper\n");
}

#[test]
fn test_tree_show_indents_children() {
    let dir = tempfile::tempdir().unwrap();
    let tree = write(dir.path(), "robot.toml", TREE);

    cli()
        .args(["tree", "show"])
        .arg(&tree)
        .assert()
        .success()
        .stdout("body\n  mobility\n  full-arm\n    arm\n    gripper\n");
}

#[test]
fn test_tree_show_unknown_resource() {
    let dir = tempfile::tempdir().unwrap();
    let tree = write(dir.path(), "robot.toml", TREE);

    cli()
        .args(["tree", "show"])
        .arg(&tree)
        .arg("tail")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown resource: tail"));
}

#[test]
fn test_stamp_subtree() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_tree(dir.path());
    let leases = write(dir.path(), "leases.json", LEASES);

    let output = cli()
        .arg("stamp")
        .arg("--leases")
        .arg(&leases)
        .arg("--config")
        .arg(&config)
        .args(["--subtree", "full-arm"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let request: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let leases = request["leases"].as_array().unwrap();
    assert_eq!(leases.len(), 2);
    assert_eq!(leases[0]["resource"], "arm");
    assert_eq!(leases[0]["sequence"], serde_json::json!([4, 1]));
    assert_eq!(leases[0]["client_names"], serde_json::json!(["tablet"]));
    assert_eq!(leases[1]["resource"], "gripper");
    assert_eq!(request["header"]["client_name"], "tablet");
}

#[test]
fn test_stamp_single_uses_config_resources() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_tree(dir.path());
    let leases = write(dir.path(), "leases.json", LEASES);

    let output = cli()
        .arg("stamp")
        .arg("--leases")
        .arg(&leases)
        .arg("--config")
        .arg(&config)
        .arg("--single")
        .output()
        .unwrap();
    assert!(output.status.success());

    let request: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(request["lease"]["resource"], "arm");
    assert_eq!(request["lease"]["sequence"], serde_json::json!([4, 1]));
}

#[test]
fn test_stamp_single_with_many_resources_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_tree(dir.path());
    let leases = write(dir.path(), "leases.json", LEASES);

    cli()
        .arg("stamp")
        .arg("--leases")
        .arg(&leases)
        .arg("--config")
        .arg(&config)
        .args(["--single", "-r", "arm", "-r", "gripper"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Single-lease request cannot carry 2 leases"));
}

#[test]
fn test_stamp_missing_lease() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_tree(dir.path());
    let leases = write(
        dir.path(),
        "lease.json",
        r#"{"resource":"arm","epoch":"E","sequence":[1]}"#,
    );

    cli()
        .arg("stamp")
        .arg("--leases")
        .arg(&leases)
        .arg("--config")
        .arg(&config)
        .args(["-r", "mobility"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No lease for resource: mobility"));
}

#[test]
fn test_compare() {
    cli()
        .args([
            "compare",
            r#"{"resource":"body","epoch":"E","sequence":[1,3]}"#,
            r#"{"resource":"body","epoch":"E","sequence":[1,2,9]}"#,
        ])
        .assert()
        .success()
        .stdout("Newer\n");

    cli()
        .args([
            "compare",
            r#"{"resource":"body","epoch":"E","sequence":[1]}"#,
            r#"{"resource":"body","epoch":"F","sequence":[1]}"#,
        ])
        .assert()
        .success()
        .stdout("DifferentEpochs\n");
}

#[test]
fn test_config_init_and_check() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("lease.toml");

    cli()
        .args(["config", "init", "--path"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    // 已存在时拒绝覆盖
    cli()
        .args(["config", "init", "--path"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cli()
        .args(["config", "check", "--path"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Owner identity: strider-client"))
        .stdout(predicate::str::contains("Resource tree: (not configured)"));
}

#[test]
fn test_config_check_unknown_default_resource() {
    let dir = tempfile::tempdir().unwrap();
    let content = format!("resources = [\"tail\"]\n{}", TREE);
    let path = write(dir.path(), "lease.toml", &content);

    cli()
        .args(["config", "check", "--path"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("tail"));
}
