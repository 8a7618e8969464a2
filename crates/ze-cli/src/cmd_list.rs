// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

//! Implementation of the `zectl list` command.

use std::io::Write;

use clap::Parser;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use crate::dispatch::{Context, Handler};

/// Format of creation times in listings.
const CREATION_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Output format of `zectl list`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Table,
    Yaml,
}

/// List boot environments
#[derive(Debug, Parser)]
#[clap(name = "zectl list")]
pub struct CmdList {
    /// Scripted mode: no header, fields separated by tabs
    #[clap(short = 'H', long)]
    scripted: bool,

    /// Output format
    #[clap(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Show the resolved pool, boot environment root and datasets first
    #[clap(long)]
    handle: bool,

    /// Only show this boot environment
    be: Option<String>,
}

/// Parses `zectl list` arguments and runs [`CmdList`].
pub struct ListHandler;

impl Handler for ListHandler {
    fn run(
        &self,
        ctx: &Context,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<i32> {
        let argv = std::iter::once("zectl list").chain(args.iter().map(String::as_str));
        match CmdList::try_parse_from(argv) {
            Ok(cmd) => cmd.run(ctx, out, err),
            Err(e) => {
                let target: &mut dyn Write = if e.use_stderr() { err } else { out };
                write!(target, "{}", e.render()).into_diagnostic()?;
                Ok(e.exit_code())
            }
        }
    }
}

impl CmdList {
    pub fn run(&self, ctx: &Context, out: &mut dyn Write, err: &mut dyn Write) -> Result<i32> {
        let handle = match ze::Handle::init(ctx.backend.as_ref(), &ctx.config) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::debug!(error = %e, "could not resolve boot environment handle");
                writeln!(err, "zectl: {e}").into_diagnostic()?;
                writeln!(err, "zectl: no boot environments to list").into_diagnostic()?;
                return Ok(0);
            }
        };

        if self.handle {
            self.show_handle(&handle, out)?;
        }

        let envs = ze::list(
            ctx.backend.as_ref(),
            &handle,
            &ctx.config.properties,
            self.be.as_deref(),
        )?;

        if self.format == Format::Yaml {
            let yaml = serde_yaml::to_string(&envs)
                .map_err(|e| miette::miette!("Failed to render boot environments: {e}"))?;
            write!(out, "{yaml}").into_diagnostic()?;
        } else if self.scripted {
            self.show_scripted(&envs, out)?;
        } else {
            self.show_table(&envs, out)?;
        }

        Ok(0)
    }

    fn show_handle(&self, handle: &ze::Handle, out: &mut dyn Write) -> Result<()> {
        let rows = [
            ("ZPOOL", handle.zpool()),
            ("BE ROOT", handle.be_root()),
            ("BOOTFS", handle.active_dataset()),
            ("ROOT", handle.root_dataset()),
        ];
        for (label, value) in rows {
            if self.scripted {
                writeln!(out, "{label}\t{value}").into_diagnostic()?;
            } else {
                writeln!(out, "{:<8} {}", format!("{label}:").bold(), value.cyan())
                    .into_diagnostic()?;
            }
        }
        writeln!(out).into_diagnostic()?;
        Ok(())
    }

    fn show_scripted(&self, envs: &[ze::BootEnvironment], out: &mut dyn Write) -> Result<()> {
        for be in envs {
            let [name, flags, mountpoint, creation] = columns(be);
            writeln!(out, "{name}\t{flags}\t{mountpoint}\t{creation}").into_diagnostic()?;
        }
        Ok(())
    }

    fn show_table(&self, envs: &[ze::BootEnvironment], out: &mut dyn Write) -> Result<()> {
        let header = ["Name", "Active", "Mountpoint", "Creation"];
        let rows: Vec<[String; 4]> = envs.iter().map(columns).collect();

        let mut widths = header.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        writeln!(
            out,
            "{}  {}  {}  {}",
            format!("{:<w$}", header[0], w = widths[0]).bold(),
            format!("{:<w$}", header[1], w = widths[1]).bold(),
            format!("{:<w$}", header[2], w = widths[2]).bold(),
            header[3].bold(),
        )
        .into_diagnostic()?;

        for [name, flags, mountpoint, creation] in &rows {
            writeln!(
                out,
                "{:<nw$}  {}  {:<mw$}  {}",
                name,
                format!("{:<w$}", flags, w = widths[1]).green(),
                mountpoint,
                creation.dimmed(),
                nw = widths[0],
                mw = widths[2],
            )
            .into_diagnostic()?;
        }

        Ok(())
    }
}

fn columns(be: &ze::BootEnvironment) -> [String; 4] {
    [
        be.name.clone(),
        be.flags().to_string(),
        be.mountpoint.clone().unwrap_or_else(|| "-".to_string()),
        be.creation
            .map(|c| c.format(CREATION_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string()),
    ]
}
