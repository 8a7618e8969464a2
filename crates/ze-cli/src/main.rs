// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

//! zectl - Boot Environment Manager for ZFS

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, Result};

mod cmd_list;
mod dispatch;

use dispatch::{CommandTable, Context};


#[derive(Parser)]
#[clap(
    name = "zectl",
    about = "Boot Environment Manager for ZFS",
    version,
    long_about = "Manage ZFS boot environments: bootable clones of the root filesystem"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    /// Config file to use instead of the user or system config
    #[clap(long, env = "ZECTL_CONFIG")]
    config: Option<PathBuf>,

    /// Command to run, followed by its arguments
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    argv: Vec<String>,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long)]
    quiet: bool,
}

impl Opt {
    fn run(self) -> Result<i32> {
        // Setup logging
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        let config = ze::Config::discover(self.config.as_deref())?;
        let backend = ze::ZfsCommandBackend::from_config(&config);
        let ctx = Context::new(config, backend);
        let table = CommandTable::standard()?;

        let mut out = std::io::stdout().lock();
        let mut err = std::io::stderr().lock();
        let code = dispatch::dispatch(&table, &ctx, &self.argv, &mut out, &mut err);
        out.flush().into_diagnostic()?;
        Ok(code)
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run()?;
    std::process::exit(code);
}
