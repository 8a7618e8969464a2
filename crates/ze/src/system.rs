// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

//! Mount table lookups.

use std::path::Path;

use tracing::trace;

use crate::backend::{DatasetHandle, DatasetType};
use crate::{Error, Result};

#[cfg(test)]
#[path = "./system_test.rs"]
mod system_test;

/// Filesystem type the kernel reports for ZFS datasets.
pub const ZFS_FSTYPE: &str = "zfs";

/// One line of the mount table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub source: String,
    pub mountpoint: String,
    pub fstype: String,
    pub options: String,
}

/// Parse a mount table in `/proc/self/mounts` format.
///
/// Lines with fewer than four fields are skipped.
pub fn parse_mount_table(content: &str) -> Vec<MountEntry> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            Some(MountEntry {
                source: unescape(fields.next()?),
                mountpoint: unescape(fields.next()?),
                fstype: unescape(fields.next()?),
                options: unescape(fields.next()?),
            })
        })
        .collect()
}

/// Read and parse the mount table at `path`.
pub fn read_mount_table<P: AsRef<Path>>(path: P) -> Result<Vec<MountEntry>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::ReadFailed {
        path: path.to_path_buf(),
        error: e,
    })?;
    Ok(parse_mount_table(&content))
}

/// The ZFS dataset mounted at `mountpoint`.
///
/// Later mounts shadow earlier ones, so the last matching entry wins.
pub fn dataset_from_mountpoint(entries: &[MountEntry], mountpoint: &str) -> Result<DatasetHandle> {
    let entry = entries
        .iter()
        .rev()
        .find(|entry| entry.mountpoint == mountpoint)
        .ok_or_else(|| Error::Backend(format!("nothing is mounted at '{mountpoint}'")))?;

    if entry.fstype != ZFS_FSTYPE {
        return Err(Error::UnexpectedDatasetType {
            mountpoint: mountpoint.to_owned(),
            expected: "zfs filesystem",
            found: entry.fstype.clone(),
        });
    }

    trace!(mountpoint, dataset = %entry.source, "found dataset in mount table");
    Ok(DatasetHandle::new(entry.source.clone(), DatasetType::Filesystem))
}

/// Decode the `\ooo` octal escapes the kernel uses for whitespace.
fn unescape(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escape = bytes.get(i + 1..i + 4).filter(|digits| is_octal_escape(digits));
        if let (b'\\', Some(digits)) = (bytes[i], escape) {
            out.push((digits[0] - b'0') * 64 + (digits[1] - b'0') * 8 + (digits[2] - b'0'));
            i += 4;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn is_octal_escape(digits: &[u8]) -> bool {
    digits.len() == 3 && digits[0] <= b'3' && digits.iter().all(|d| (b'0'..=b'7').contains(d))
}
