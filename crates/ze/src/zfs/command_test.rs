// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

use rstest::rstest;
use serial_test::serial;

use super::*;

#[rstest]
#[serial(process)]
fn test_run_captures_stdout() {
    let output = run("sh", &["-c", "printf 'zroot/ROOT/default\\n'"]).unwrap();
    assert_eq!(output, "zroot/ROOT/default\n");
}

#[rstest]
#[serial(process)]
fn test_run_failure_carries_stderr() {
    let err = run("sh", &["-c", "echo 'dataset does not exist' >&2; exit 1"])
        .expect_err("non-zero exit");
    let Error::Backend(message) = err else {
        panic!("expected a backend error");
    };
    assert!(message.contains("dataset does not exist"), "{message}");
}

#[rstest]
#[serial(process)]
fn test_run_missing_program() {
    let err = run("/nonexistent/zfs", &["list"]).expect_err("no such program");
    assert!(matches!(err, Error::Backend(_)));
}
