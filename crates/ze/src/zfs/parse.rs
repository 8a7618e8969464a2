// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

use indexmap::IndexMap;

use crate::property::{PropertyMap, PropertyValue};
use crate::{Error, Result};

#[cfg(test)]
#[path = "./parse_test.rs"]
mod parse_test;

/// Value ZFS prints for an unset property.
const UNSET: &str = "-";

/// Parse `zpool get -H -o value bootfs <pool>` output.
pub fn parse_bootfs(output: &str, pool: &str) -> Result<String> {
    let value = output.trim();
    if value.is_empty() || value == UNSET {
        return Err(Error::Backend(format!(
            "bootfs property is not set on pool '{pool}'"
        )));
    }
    Ok(value.to_owned())
}

/// Parse `zfs get -H -o name,property,value,source` output.
///
/// Rows are grouped per dataset in the order datasets first appear. Each
/// property is stored with its source.
pub fn parse_properties(output: &str) -> Result<Vec<(String, PropertyMap)>> {
    let mut datasets: IndexMap<String, PropertyMap> = IndexMap::new();

    for line in output.lines().filter(|line| !line.trim().is_empty()) {
        let fields: Vec<&str> = line.split('\t').collect();
        let [name, property, value, source] = fields[..] else {
            return Err(Error::Backend(format!(
                "unexpected zfs output, expected 4 tab separated fields: '{line}'"
            )));
        };

        datasets
            .entry(name.to_owned())
            .or_default()
            .insert(property, PropertyValue::sourced(value, source));
    }

    Ok(datasets.into_iter().collect())
}
