// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

//! ZFS backend integration.
//!
//! [`ZfsCommandBackend`] implements [`Backend`] using the host `zfs` and
//! `zpool` CLIs and the kernel mount table. `command` and `parse` isolate
//! process execution and output parsing so the backend stays testable.

mod command;
mod parse;

use std::path::PathBuf;

use crate::backend::{Backend, DatasetHandle};
use crate::property::PropertyMap;
use crate::{system, Config, Result};

pub use command::run;
pub use parse::{parse_bootfs, parse_properties};


/// Asks for every property when no explicit list is given.
const ALL_PROPERTIES: &str = "all";

/// Backend that shells out to `zfs` and `zpool`.
#[derive(Debug, Clone)]
pub struct ZfsCommandBackend {
    zfs: PathBuf,
    zpool: PathBuf,
    mount_table: PathBuf,
}

impl ZfsCommandBackend {
    pub fn new<Z: Into<PathBuf>, P: Into<PathBuf>, M: Into<PathBuf>>(
        zfs: Z,
        zpool: P,
        mount_table: M,
    ) -> Self {
        Self {
            zfs: zfs.into(),
            zpool: zpool.into(),
            mount_table: mount_table.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.zfs, &config.zpool, &config.mount_table)
    }
}

impl Backend for ZfsCommandBackend {
    fn dataset_from_mountpoint(&self, mountpoint: &str) -> Result<DatasetHandle> {
        let entries = system::read_mount_table(&self.mount_table)?;
        system::dataset_from_mountpoint(&entries, mountpoint)
    }

    fn pool_bootfs(&self, pool: &str) -> Result<String> {
        let output = run(&self.zpool, &["get", "-H", "-o", "value", "bootfs", pool])?;
        parse_bootfs(&output, pool)
    }

    fn list_properties(
        &self,
        dataset: &str,
        properties: &[String],
    ) -> Result<Vec<(String, PropertyMap)>> {
        let properties = if properties.is_empty() {
            ALL_PROPERTIES.to_string()
        } else {
            properties.join(",")
        };
        let output = run(
            &self.zfs,
            &[
                "get",
                "-H",
                "-p",
                "-d",
                "1",
                "-t",
                "filesystem",
                "-o",
                "name,property,value,source",
                properties.as_str(),
                dataset,
            ],
        )?;
        parse_properties(&output)
    }
}
