// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

//! The narrow interface to the storage backend.
//!
//! Boot environment resolution only needs three answers from the backend:
//! which dataset is mounted somewhere, which dataset a pool boots from, and
//! the properties of a dataset and its children. [`crate::zfs`] answers them
//! from the system, [`MemoryBackend`] from memory.

use std::collections::BTreeMap;
use std::fmt;

use crate::path::{parent_dataset, pool_name};
use crate::property::PropertyMap;
use crate::util::copy;
use crate::{Error, Result, MAXPATHLEN};

#[cfg(test)]
#[path = "./backend_test.rs"]
mod backend_test;

/// Kinds of dataset a backend can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetType {
    Filesystem,
    Volume,
    Snapshot,
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Filesystem => "filesystem",
            Self::Volume => "volume",
            Self::Snapshot => "snapshot",
        };
        f.write_str(name)
    }
}

/// A dataset as returned by a backend lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetHandle {
    name: String,
    kind: DatasetType,
}

impl DatasetHandle {
    pub fn new<S: Into<String>>(name: S, kind: DatasetType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// The canonical dataset path, which must fit in `capacity`.
    pub fn name(&self, capacity: usize) -> Result<String> {
        copy(&self.name, capacity)
    }

    pub fn kind(&self) -> DatasetType {
        self.kind
    }
}

/// Queries boot environment resolution makes against the storage backend.
pub trait Backend {
    /// The dataset mounted at `mountpoint`.
    fn dataset_from_mountpoint(&self, mountpoint: &str) -> Result<DatasetHandle>;

    /// The dataset `pool` boots from, its `bootfs` property.
    fn pool_bootfs(&self, pool: &str) -> Result<String>;

    /// `dataset` and its children one level down, each with the requested
    /// properties. An empty `properties` asks for all of them.
    fn list_properties(
        &self,
        dataset: &str,
        properties: &[String],
    ) -> Result<Vec<(String, PropertyMap)>>;
}

/// A backend held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    mounts: BTreeMap<String, DatasetHandle>,
    bootfs: BTreeMap<String, String>,
    datasets: BTreeMap<String, PropertyMap>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount filesystem `dataset` at `mountpoint`.
    pub fn with_mount<M: Into<String>, D: Into<String>>(self, mountpoint: M, dataset: D) -> Self {
        self.with_mount_handle(mountpoint, DatasetHandle::new(dataset, DatasetType::Filesystem))
    }

    pub fn with_mount_handle<M: Into<String>>(mut self, mountpoint: M, handle: DatasetHandle) -> Self {
        self.mounts.insert(mountpoint.into(), handle);
        self
    }

    /// Set the `bootfs` property of the pool `dataset` lives in.
    pub fn with_bootfs<D: Into<String>>(mut self, dataset: D) -> Self {
        let dataset = dataset.into();
        let pool = pool_name(&dataset).unwrap_or_default().to_owned();
        self.bootfs.insert(pool, dataset);
        self
    }

    pub fn with_dataset<D: Into<String>>(mut self, dataset: D, props: PropertyMap) -> Self {
        self.datasets.insert(dataset.into(), props);
        self
    }
}

impl Backend for MemoryBackend {
    fn dataset_from_mountpoint(&self, mountpoint: &str) -> Result<DatasetHandle> {
        self.mounts
            .get(mountpoint)
            .cloned()
            .ok_or_else(|| Error::Backend(format!("no dataset is mounted at '{mountpoint}'")))
    }

    fn pool_bootfs(&self, pool: &str) -> Result<String> {
        self.bootfs
            .get(pool)
            .cloned()
            .ok_or_else(|| Error::Backend(format!("bootfs property is not set on pool '{pool}'")))
    }

    fn list_properties(
        &self,
        dataset: &str,
        properties: &[String],
    ) -> Result<Vec<(String, PropertyMap)>> {
        if !self.datasets.contains_key(dataset) {
            return Err(Error::Backend(format!("dataset does not exist: '{dataset}'")));
        }

        let mut pairs = Vec::new();
        for (name, props) in &self.datasets {
            let is_child = parent_dataset(name, MAXPATHLEN).is_ok_and(|parent| parent == dataset);
            if name != dataset && !is_child {
                continue;
            }

            let mut props = props.clone();
            if !properties.is_empty() {
                props.retain_names(properties);
            }
            pairs.push((name.clone(), props));
        }
        Ok(pairs)
    }
}
