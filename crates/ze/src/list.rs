// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

//! Enumerating the boot environments of a system.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::backend::Backend;
use crate::property::{collect, release, PropertyTree};
use crate::{Error, Handle, Result};

#[cfg(test)]
#[path = "./list_test.rs"]
mod list_test;

/// Properties every listing needs, collected in addition to configured ones.
pub const LIST_PROPERTIES: [&str; 2] = ["mountpoint", "creation"];

/// A boot environment as shown by `zectl list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootEnvironment {
    pub name: String,
    pub dataset: String,
    /// Booted next.
    pub active: bool,
    /// Mounted at `/` right now.
    pub mounted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mountpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation: Option<DateTime<Utc>>,
}

impl BootEnvironment {
    /// `N` if running now, `R` if active on reboot.
    pub fn flags(&self) -> &'static str {
        match (self.mounted, self.active) {
            (true, true) => "NR",
            (true, false) => "N",
            (false, true) => "R",
            (false, false) => "-",
        }
    }
}

/// Turn a property tree of the boot environment root into boot environments.
///
/// The root itself is part of the tree and is skipped. Results are sorted
/// by name.
pub fn boot_environments(handle: &Handle, tree: &PropertyTree) -> Result<Vec<BootEnvironment>> {
    let mut envs = Vec::with_capacity(tree.len());

    for (dataset, props) in tree.iter() {
        let name = match handle.be_name(dataset) {
            Ok(name) => name,
            Err(Error::NoParent { .. }) => continue,
            Err(err) => return Err(err),
        };

        envs.push(BootEnvironment {
            name,
            dataset: dataset.to_owned(),
            active: handle.is_active(dataset),
            mounted: handle.is_root(dataset),
            mountpoint: props.value("mountpoint").map(str::to_owned),
            creation: props.value("creation").and_then(parse_creation),
        });
    }

    envs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(envs)
}

/// List the boot environments below the handle's root.
///
/// `properties` are collected on top of [`LIST_PROPERTIES`]. With a
/// `filter`, only the boot environment of that name is returned and it is
/// an error for it not to exist.
pub fn list<B: Backend + ?Sized>(
    backend: &B,
    handle: &Handle,
    properties: &[String],
    filter: Option<&str>,
) -> Result<Vec<BootEnvironment>> {
    let wanted = match filter {
        Some(name) => Some(handle.be_dataset(name)?),
        None => None,
    };

    let mut props: Vec<String> = LIST_PROPERTIES.iter().map(|p| p.to_string()).collect();
    for prop in properties {
        if !props.contains(prop) {
            props.push(prop.clone());
        }
    }

    let tree = collect(backend, handle.be_root(), &props)?;
    let envs = boot_environments(handle, &tree);
    release(Some(tree));
    let mut envs = envs?;

    if let Some(dataset) = wanted {
        envs.retain(|be| be.dataset == dataset);
        if envs.is_empty() {
            return Err(Error::not_found("boot environment", dataset));
        }
    }

    debug!(count = envs.len(), "listed boot environments");
    Ok(envs)
}

/// ZFS reports creation times as seconds since the epoch when parsable.
fn parse_creation(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
