//! Integration tests for `modship bundles` and `modship module` output.

use std::process::Command;
use tempfile::tempdir;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "modship-cli", "--bin", "modship", "--"]);
    cmd
}

#[test]
fn test_module_output_is_wrapped() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("greet.js"), "exports.hi = 1;").unwrap();

    let output = cargo_bin()
        .args(["--root"])
        .arg(dir.path())
        .args(["module", "greet"])
        .output()
        .expect("Failed to run module command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("define(\"greet\",function(require,exports,module){"));
    assert!(stdout.ends_with("});\n"));
}

#[test]
fn test_bundles_payload_and_json() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("x.js"), "exports.x = 1;").unwrap();
    std::fs::write(dir.path().join("y.js"), "require('./x');").unwrap();
    std::fs::write(dir.path().join("z.js"), "exports.z = 1;").unwrap();
    let decl = dir.path().join("bundles.json");
    std::fs::write(
        &decl,
        r#"{"home": {"modules": ["x", "y"]}, "shop": {"modules": ["y", "z"], "dependencies": ["x"]}}"#,
    )
    .unwrap();

    let output = cargo_bin()
        .args(["--root"])
        .arg(dir.path())
        .arg("bundles")
        .arg(&decl)
        .output()
        .expect("Failed to run bundles command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("define.bundle.map({"));

    let output = cargo_bin()
        .args(["--json", "--root"])
        .arg(dir.path())
        .arg("bundles")
        .arg(&decl)
        .output()
        .expect("Failed to run bundles command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output should be valid JSON");

    assert_eq!(json["ok"], true);
    // shop requires x but home (processed later) owns it
    assert_eq!(
        json["bundles"]["shop"]["dependencies"],
        serde_json::json!(["home"])
    );
    assert_eq!(json["bundles"]["home"]["dependencies"], serde_json::json!([]));
}

#[test]
fn test_forbidden_module_fails() {
    let dir = tempdir().unwrap();
    let private = dir.path().join("private");
    std::fs::create_dir_all(&private).unwrap();
    std::fs::write(private.join("key.js"), "exports.k = 1;").unwrap();

    let output = cargo_bin()
        .args(["--root"])
        .arg(dir.path())
        .args(["--forbid", "private", "module", "private/key"])
        .output()
        .expect("Failed to run module command");

    assert!(!output.status.success());
}
