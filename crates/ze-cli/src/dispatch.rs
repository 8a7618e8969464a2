// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

//! Command name to handler dispatch.

use std::io::Write;

use indexmap::IndexMap;
use miette::{Diagnostic, Result};
use thiserror::Error;

use crate::cmd_list::ListHandler;

#[cfg(test)]
#[path = "./dispatch_test.rs"]
mod dispatch_test;

/// Exit status of a failed invocation.
pub const EXIT_FAILURE: i32 = 1;

/// Every command shown in the usage text, wired or not.
pub const DECLARED_COMMANDS: [&str; 10] = [
    "activate", "create", "destroy", "get", "list", "mount", "rename", "set", "snapshot",
    "unmount",
];

const USAGE: &str = "\
ZE: Boot Environment Manager for ZFS

Usage:
zectl activate <boot environment>
zectl create <boot environment>
zectl destroy <boot environment>
zectl get <property>
zectl list
zectl mount <boot environment>
zectl rename <boot environment> <boot environment>
zectl set <property=value> <boot environment>
zectl snapshot <boot environment>@<snap>
zectl unmount <boot environment>
";

/// Errors building the command table.
#[derive(Error, Diagnostic, Debug)]
pub enum DispatchError {
    #[error("Command '{0}' is registered more than once")]
    #[diagnostic(code(zectl::duplicate_command))]
    DuplicateCommand(String),
}

/// State shared by every command of one invocation.
pub struct Context {
    pub config: ze::Config,
    pub backend: Box<dyn ze::Backend>,
}

impl Context {
    pub fn new<B: ze::Backend + 'static>(config: ze::Config, backend: B) -> Self {
        Self {
            config,
            backend: Box::new(backend),
        }
    }
}

/// A runnable `zectl` command.
pub trait Handler {
    /// Run with the arguments that followed the command name.
    ///
    /// Returns the process exit code.
    fn run(
        &self,
        ctx: &Context,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<i32>;
}

/// Commands by name.
pub struct CommandTable {
    handlers: IndexMap<&'static str, Box<dyn Handler>>,
}

impl CommandTable {
    /// Build a table, rejecting names that appear more than once.
    pub fn new<I>(entries: I) -> std::result::Result<Self, DispatchError>
    where
        I: IntoIterator<Item = (&'static str, Box<dyn Handler>)>,
    {
        let mut handlers = IndexMap::new();
        for (name, handler) in entries {
            if handlers.insert(name, handler).is_some() {
                return Err(DispatchError::DuplicateCommand(name.to_string()));
            }
        }
        Ok(Self { handlers })
    }

    /// The commands `zectl` ships with.
    pub fn standard() -> std::result::Result<Self, DispatchError> {
        Self::new([("list", Box::new(ListHandler) as Box<dyn Handler>)])
    }

    pub fn resolve(&self, name: &str) -> Option<&dyn Handler> {
        self.handlers.get(name).map(|handler| handler.as_ref())
    }
}

/// Run the command named by the first of `argv` with the rest as arguments.
pub fn dispatch(
    table: &CommandTable,
    ctx: &Context,
    argv: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32 {
    let Some((name, args)) = argv.split_first() else {
        let _ = writeln!(err, "\nzectl: Invalid input, please enter a command.");
        print_usage(err);
        return EXIT_FAILURE;
    };

    let Some(handler) = table.resolve(name) else {
        if DECLARED_COMMANDS.contains(&name.as_str()) {
            tracing::debug!(command = %name, "command is declared but has no handler");
        } else {
            tracing::debug!(command = %name, "unknown command");
        }
        let _ = writeln!(err, "\nzectl: Invalid input, no match found.");
        print_usage(err);
        return EXIT_FAILURE;
    };

    match handler.run(ctx, args, out, err) {
        Ok(code) => code,
        Err(report) => {
            let _ = writeln!(err, "zectl: Failed to run 'zectl {name}'.");
            let _ = writeln!(err, "{report:?}");
            EXIT_FAILURE
        }
    }
}

/// Print the usage text.
pub fn print_usage(err: &mut dyn Write) {
    let _ = write!(err, "\n{USAGE}");
}
