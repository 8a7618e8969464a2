// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

//! The per-invocation boot environment handle.

use serde::Serialize;
use tracing::debug;

use crate::backend::{Backend, DatasetType};
use crate::path::{be_dataset, parent_dataset, pool_name, suffix_after_root};
use crate::util::copy;
use crate::{Config, Error, Result, MAXPATHLEN};

#[cfg(test)]
#[path = "./handle_test.rs"]
mod handle_test;

/// Mountpoint of the running system's root filesystem.
pub const ROOT_MOUNTPOINT: &str = "/";

/// Pool, boot environment root, active and running datasets of a system.
///
/// Resolved once through a [`Backend`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handle {
    zpool: String,
    be_root: String,
    bootfs: String,
    rootfs: String,
}

impl Handle {
    /// Resolve the handle of the running system.
    ///
    /// The root dataset is whatever is mounted at `/`, the boot environment
    /// root is its parent unless the config overrides it, and the active
    /// boot environment is the `bootfs` of the root dataset's pool.
    pub fn init<B: Backend + ?Sized>(backend: &B, config: &Config) -> Result<Self> {
        let root = backend.dataset_from_mountpoint(ROOT_MOUNTPOINT)?;
        if root.kind() != DatasetType::Filesystem {
            return Err(Error::UnexpectedDatasetType {
                mountpoint: ROOT_MOUNTPOINT.to_owned(),
                expected: "filesystem",
                found: root.kind().to_string(),
            });
        }
        let rootfs = root.name(MAXPATHLEN)?;

        let be_root = match &config.be_root {
            Some(be_root) => copy(be_root, MAXPATHLEN)?,
            None => parent_dataset(&rootfs, MAXPATHLEN)?,
        };
        let zpool = pool_name(&rootfs)?.to_owned();
        let bootfs = copy(&backend.pool_bootfs(&zpool)?, MAXPATHLEN)?;

        let handle = Self {
            zpool,
            be_root,
            bootfs,
            rootfs,
        };
        debug!(
            zpool = %handle.zpool,
            be_root = %handle.be_root,
            bootfs = %handle.bootfs,
            rootfs = %handle.rootfs,
            "resolved boot environment handle"
        );
        Ok(handle)
    }

    /// Assemble a handle from already resolved parts.
    pub fn from_parts<P, R, B, F>(zpool: P, be_root: R, bootfs: B, rootfs: F) -> Self
    where
        P: Into<String>,
        R: Into<String>,
        B: Into<String>,
        F: Into<String>,
    {
        Self {
            zpool: zpool.into(),
            be_root: be_root.into(),
            bootfs: bootfs.into(),
            rootfs: rootfs.into(),
        }
    }

    pub fn zpool(&self) -> &str {
        &self.zpool
    }

    pub fn be_root(&self) -> &str {
        &self.be_root
    }

    /// Dataset of the boot environment the system boots next.
    pub fn active_dataset(&self) -> &str {
        &self.bootfs
    }

    /// Dataset currently mounted at `/`.
    pub fn root_dataset(&self) -> &str {
        &self.rootfs
    }

    /// Whether `dataset` is the boot environment the system boots next.
    pub fn is_active(&self, dataset: &str) -> bool {
        self.bootfs == dataset
    }

    /// Whether `dataset` is the boot environment mounted at `/`.
    pub fn is_root(&self, dataset: &str) -> bool {
        self.rootfs == dataset
    }

    /// Dataset path of boot environment `name` under this handle's root.
    pub fn be_dataset(&self, name: &str) -> Result<String> {
        be_dataset(&self.be_root, name, MAXPATHLEN)
    }

    /// Name of the boot environment backed by `dataset`.
    pub fn be_name(&self, dataset: &str) -> Result<String> {
        suffix_after_root(&self.be_root, dataset, MAXPATHLEN)
    }
}
