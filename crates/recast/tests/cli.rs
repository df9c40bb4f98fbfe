//! CLI round trips over real files.

use assert_cmd::Command;

fn recast() -> Command {
    Command::cargo_bin("recast").unwrap()
}

const SAMPLE: &str = "namespace Output;\n\npublic class Sample\n{\n    public int Number = 0;\n}\n";

#[test]
fn test_convert_writes_sibling_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Sample.cs");
    std::fs::write(&input, SAMPLE).unwrap();

    recast()
        .args(["convert", input.to_str().unwrap(), "--target", "java"])
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("Sample.java")).unwrap();
    assert!(output.contains("public class Sample"));
    assert!(output.contains("    public int Number = 0;"));
    assert!(output.ends_with('\n'));
}

#[test]
fn test_convert_honors_out_dir() {
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = dir.path().join("Sample.cs");
    std::fs::write(&input, SAMPLE).unwrap();

    recast()
        .args([
            "convert",
            input.to_str().unwrap(),
            "--target",
            "cpp",
            "--out-dir",
            out.path().to_str().unwrap(),
        ])
        .assert()
        .success();

    let output = std::fs::read_to_string(out.path().join("Sample.hpp")).unwrap();
    assert!(output.starts_with("#pragma once"));
    assert!(output.contains("int32_t Number = 0;"));
}

#[test]
fn test_dump_ir_prints_store() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Sample.cs");
    std::fs::write(&input, SAMPLE).unwrap();

    let output = recast()
        .args([
            "convert",
            input.to_str().unwrap(),
            "--target",
            "python",
            "--dump-ir",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"name\": \"Sample\""));
    assert!(stdout.contains("\"file_scoped\": true"));
}

#[test]
fn test_unknown_extension_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Sample.txt");
    std::fs::write(&input, SAMPLE).unwrap();

    let output = recast()
        .args(["convert", input.to_str().unwrap(), "--target", "java"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No reader available for extension: .txt"));
}

#[test]
fn test_parse_fault_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Broken.cs");
    std::fs::write(&input, "}\n").unwrap();

    let output = recast()
        .args(["convert", input.to_str().unwrap(), "--target", "java"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse"));
}

#[test]
fn test_languages_lists_backends() {
    let output = recast().arg("languages").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("csharp (cs)"));
    assert!(stdout.contains("cpp (.hpp)"));
    assert!(stdout.contains("java (.java)"));
    assert!(stdout.contains("python (.py)"));
}
