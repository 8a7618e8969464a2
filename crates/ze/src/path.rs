// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

//! Conversions between dataset paths, boot environment root suffixes and
//! boot environment names.
//!
//! A boot environment lives at `<root>/<name>`, for example
//! `zroot/ROOT/default` has root `zroot/ROOT` and name `default`. All
//! functions here are built on the bounded operations in [`crate::util`] and
//! take the capacity the result must fit in, usually [`crate::MAXPATHLEN`].

use crate::util::{concat, copy, cut};
use crate::{Error, Result};

#[cfg(test)]
#[path = "./path_test.rs"]
mod path_test;

/// Separator between dataset path segments.
pub const DATASET_DELIMITER: char = '/';

/// Characters ZFS reserves for snapshot and bookmark names.
const RESERVED_NAME_CHARS: [char; 3] = [DATASET_DELIMITER, '@', '#'];

/// Return the portion of `dataset` after `root` and its separating `/`.
///
/// Fails with [`Error::NoParent`] when `dataset` has no segment beyond
/// `root`, which means the path names the root itself rather than a boot
/// environment, and with [`Error::NotFound`] when `dataset` does not live
/// under `root` at all.
pub fn suffix_after_root(root: &str, dataset: &str, capacity: usize) -> Result<String> {
    let buf = copy(dataset, capacity)?;

    let loc = root.len() + 1;
    if loc >= capacity {
        return Err(Error::overflow(capacity, loc + 1));
    }

    if loc >= buf.len() {
        return Err(Error::NoParent {
            root: root.to_owned(),
            dataset: dataset.to_owned(),
        });
    }

    let under_root = buf.starts_with(root)
        && buf[root.len()..].starts_with(DATASET_DELIMITER);
    if !under_root {
        return Err(Error::not_found("boot environment root", dataset));
    }

    Ok(buf[loc..].to_owned())
}

/// Return the name of the boot environment `dataset` points at.
///
/// This is the final segment of the path. A bare pool name has no `/` and
/// so is not a boot environment dataset.
pub fn be_name(dataset: &str, capacity: usize) -> Result<String> {
    let buf = copy(dataset, capacity)?;

    let slash = buf
        .rfind(DATASET_DELIMITER)
        .ok_or_else(|| Error::not_found("'/' delimiter", dataset))?;

    let name = &buf[slash + 1..];
    if name.is_empty() {
        return Err(Error::not_found("boot environment name", dataset));
    }
    Ok(name.to_owned())
}

/// Return `path` with its last `delimiter` terminated segment removed.
pub fn parent(path: &str, capacity: usize, delimiter: char) -> Result<String> {
    cut(path, capacity, delimiter)
}

/// [`parent`] for `/` delimited dataset paths.
pub fn parent_dataset(dataset: &str, capacity: usize) -> Result<String> {
    parent(dataset, capacity, DATASET_DELIMITER)
}

/// Compose the dataset path of boot environment `name` under `root`.
pub fn be_dataset(root: &str, name: &str, capacity: usize) -> Result<String> {
    validate_be_name(name)?;
    let mut buf = String::new();
    concat(&mut buf, root, "/", name, capacity)?;
    Ok(buf)
}

/// Check that `name` can be used as a single dataset path segment.
pub fn validate_be_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(RESERVED_NAME_CHARS) {
        return Err(Error::InvalidBeName(name.to_owned()));
    }
    Ok(())
}

/// Return the pool a dataset belongs to, its first segment.
pub fn pool_name(dataset: &str) -> Result<&str> {
    dataset
        .split(DATASET_DELIMITER)
        .next()
        .filter(|pool| !pool.is_empty())
        .ok_or_else(|| Error::not_found("pool name", dataset))
}
