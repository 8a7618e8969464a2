// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

use std::path::Path;
use std::process::Command;

use tracing::trace;

use crate::{Error, Result};

#[cfg(test)]
#[path = "./command_test.rs"]
mod command_test;

/// Run `program` with `args` and return its standard output.
///
/// A non-zero exit status is a backend error carrying the program's
/// standard error.
pub fn run<P: AsRef<Path>>(program: P, args: &[&str]) -> Result<String> {
    let program = program.as_ref();
    trace!(program = %program.display(), ?args, "running backend command");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| Error::Backend(format!("failed to run {}: {e}", program.display())))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Backend(format!(
            "'{} {}' failed ({}): {}",
            program.display(),
            args.join(" "),
            output.status,
            stderr.trim()
        )));
    }

    String::from_utf8(output.stdout).map_err(|e| {
        Error::Backend(format!(
            "{} produced output that is not UTF-8: {e}",
            program.display()
        ))
    })
}
