use std::process::Command;
use std::{env, fs, path::PathBuf};

use tempfile::tempdir;

fn cli_bin_path() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_quallaa-cli") {
        return PathBuf::from(path);
    }
    if let Ok(path) = env::var("CARGO_BIN_EXE_quallaa_cli") {
        return PathBuf::from(path);
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .map(PathBuf::from)
        .expect("workspace root");
    let bin_name = if cfg!(windows) {
        "quallaa-cli.exe"
    } else {
        "quallaa-cli"
    };
    let fallback = workspace_root.join("target").join("debug").join(bin_name);
    assert!(
        fallback.exists(),
        "quallaa-cli binary not found at {}",
        fallback.display()
    );
    fallback
}

#[test]
fn scan_process_contract_emits_report_json() {
    // Pseudocode:
    // Given a root with two linked notes
    // When running `quallaa-cli scan`
    // Then the process exits with success and prints the scan report.
    let root = tempdir().expect("tempdir");
    fs::write(root.path().join("Index.md"), "see [[Wiki Links]]").expect("write note");
    fs::write(root.path().join("Wiki Links.md"), "linking notes").expect("write note");

    let output = Command::new(cli_bin_path())
        .args(["--root", root.path().to_str().expect("root path"), "scan"])
        .output()
        .expect("run scan");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"indexed\": 2"));
    assert!(stdout.contains("\"resolved_links\": 1"));
}

#[test]
fn backlinks_process_contract_resolves_titles() {
    // Pseudocode:
    // Given a root where Index.md links to Wiki Links.md
    // When running `quallaa-cli backlinks "Wiki Links"`
    // Then the payload names Index.md as the linking source.
    let root = tempdir().expect("tempdir");
    fs::write(root.path().join("Index.md"), "see [[Wiki Links]]").expect("write note");
    fs::write(root.path().join("Wiki Links.md"), "linking notes").expect("write note");

    let output = Command::new(cli_bin_path())
        .args([
            "--root",
            root.path().to_str().expect("root path"),
            "backlinks",
            "Wiki Links",
        ])
        .output()
        .expect("run backlinks");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"source\": \"Index.md\""));
    assert!(stdout.contains("[[Wiki Links]]"));
}

#[test]
fn broken_process_contract_lists_unresolved_targets() {
    let root = tempdir().expect("tempdir");
    fs::write(root.path().join("Index.md"), "see [[Nowhere]]").expect("write note");

    let output = Command::new(cli_bin_path())
        .args(["--root", root.path().to_str().expect("root path"), "broken"])
        .output()
        .expect("run broken");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"raw_target\": \"Nowhere\""));
}
