//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use expect_test::Expect;

/// Create a new command for the dystruct binary, with logging silenced.
pub fn dystruct() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dystruct"));
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Run a command and check that stdout matches the expected output.
pub fn check_stdout(args: &[&str], expected: Expect) {
    let output = dystruct()
        .args(args)
        .output()
        .expect("failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    expected.assert_eq(&stdout);
}
