// SPDX-License-Identifier: Apache-2.0

use assert_cmd::Command;
use serde_json::Value;

fn sooru() -> Command {
    Command::cargo_bin("sooru").expect("sooru binary")
}

fn parse_commands_from_help(text: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut in_commands = false;
    for line in text.lines() {
        let trimmed = line.trim_end();
        if trimmed == "Commands:" {
            in_commands = true;
            continue;
        }
        if in_commands {
            if trimmed.is_empty() || !line.starts_with(' ') {
                break;
            }
            let entry = trimmed.trim_start();
            let name = entry.split_whitespace().next().unwrap_or("");
            if !name.is_empty() && name != "help" {
                commands.push(name.to_string());
            }
        }
    }
    commands.sort();
    commands
}

#[test]
fn help_command_surface_is_stable() {
    let output = sooru().arg("--help").output().expect("run help");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8 help");
    let observed = parse_commands_from_help(&text);
    let expected = include_str!("snapshots/help.commands.txt")
        .lines()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    assert_eq!(observed, expected);
}

#[test]
fn version_output_contains_crate_version() {
    let output = sooru()
        .args(["--json", "version"])
        .output()
        .expect("run version");
    assert!(output.status.success());
    let payload: Value = serde_json::from_slice(&output.stdout).expect("json version");
    assert_eq!(payload["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn unknown_flag_returns_usage_exit_code_with_machine_error() {
    let output = sooru()
        .args(["--json", "--unknown-flag"])
        .output()
        .expect("run unknown flag");
    assert_eq!(output.status.code(), Some(2));
    let err: Value = serde_json::from_slice(&output.stderr).expect("machine error json");
    assert_eq!(err["code"], "UsageError");
    assert!(err["details"]["error"]
        .as_str()
        .expect("clap error detail")
        .contains("--unknown-flag"));
}

#[test]
fn missing_command_is_a_usage_error() {
    let output = sooru().output().expect("run without command");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("missing command"));
}

#[test]
fn completion_script_names_the_binary() {
    let output = sooru()
        .args(["completion", "bash"])
        .output()
        .expect("run completion");
    assert!(output.status.success());
    let script = String::from_utf8(output.stdout).expect("utf8 completion");
    assert!(script.contains("sooru"));
}

#[test]
fn openapi_document_lists_room_routes() {
    let output = sooru()
        .args(["--json", "openapi"])
        .output()
        .expect("run openapi");
    assert!(output.status.success());
    let doc: Value = serde_json::from_slice(&output.stdout).expect("openapi json");
    assert_eq!(doc["openapi"], "3.0.3");
    assert!(doc["paths"]
        .as_object()
        .expect("paths")
        .keys()
        .any(|p| p.ends_with("/rooms/measurements")));
}

#[test]
fn serve_rejects_an_unknown_store_before_binding() {
    let output = sooru()
        .args(["--json", "serve", "--store", "redis://nowhere"])
        .output()
        .expect("run serve");
    assert_eq!(output.status.code(), Some(2));
    let err: Value = serde_json::from_slice(&output.stderr).expect("machine error json");
    assert_eq!(err["code"], "UsageError");
}
