//! CLI integration tests for the abacus binary.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get the abacus command from cargo, with gateway credentials stripped
/// so no test ever reaches the network.
fn abacus_cmd() -> Command {
    let mut cmd = Command::cargo_bin("abacus").unwrap();
    cmd.env_remove("OPENAI_API_KEY");
    cmd
}

#[test]
fn test_help_output() {
    abacus_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("planner"));
}

#[test]
fn test_version_output() {
    abacus_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_demo_list() {
    abacus_cmd()
        .args(["demo", "--list", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("capability"))
        .stdout(predicate::str::contains("data"))
        .stdout(predicate::str::contains("prompt"))
        .stdout(predicate::str::contains("autonomous"));
}

#[test]
fn test_demo_data_scenario() {
    abacus_cmd()
        .args(["demo", "data", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("math-data-provider"))
        .stdout(predicate::str::contains("math_add"))
        .stdout(predicate::str::contains("Sample response"))
        .stdout(predicate::str::contains("21"));
}

#[test]
fn test_demo_autonomous_scenario_uses_fallback() {
    abacus_cmd()
        .args(["demo", "autonomous", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("solve_math_problem"))
        .stdout(predicate::str::contains("fallback"));
}

#[test]
fn test_demo_unknown_scenario_fails() {
    abacus_cmd()
        .args(["demo", "mystery", "--no-color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown scenario"));
}

#[test]
fn test_chat_manual_data_commands() {
    abacus_cmd()
        .args(["chat", "--server", "data", "--no-planner", "--no-color"])
        .write_stdin("add 2 3\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Planner disabled"))
        .stdout(predicate::str::contains("Add result: 5.0"))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn test_chat_manual_prompt_commands() {
    abacus_cmd()
        .args(["chat", "--server", "prompt", "--no-planner", "--no-color"])
        .write_stdin("divide 12 3\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Divide result: 4.0"))
        .stdout(predicate::str::contains("Suggested prompt:"));
}

#[test]
fn test_chat_capability_is_read_only() {
    abacus_cmd()
        .args(["chat", "--server", "capability", "--no-planner", "--no-color"])
        .write_stdin("add 1 2\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("read-only"));
}

#[test]
fn test_chat_reserved_commands() {
    abacus_cmd()
        .args(["chat", "--server", "data", "--no-planner", "--no-color"])
        .write_stdin("help\ntools\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Format: <operation> <number> <number>"))
        .stdout(predicate::str::contains("math_divide"));
}

#[test]
fn test_chat_planner_unavailable_falls_back() {
    // Default for the data server is planner-on; with no credential the
    // session must degrade to manual mode instead of crashing.
    abacus_cmd()
        .args(["chat", "--server", "data", "--no-color"])
        .write_stdin("exit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("falling back to manual mode"));
}

#[test]
fn test_chat_unknown_server_fails() {
    abacus_cmd()
        .args(["chat", "--server", "nonsense", "--no-color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown server"));
}
