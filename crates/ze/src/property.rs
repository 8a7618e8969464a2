// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

//! Property trees: datasets mapped to the properties the backend reported
//! for them.
//!
//! A [`PropertyTree`] is only handed out once every entry has been
//! aggregated, and [`release`] tears it down inner maps first.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::backend::Backend;
use crate::{Error, Result};

#[cfg(test)]
#[path = "./property_test.rs"]
mod property_test;

/// Key under which a sourced property stores its value.
pub const VALUE_KEY: &str = "value";

/// Key under which a sourced property stores where the value came from.
pub const SOURCE_KEY: &str = "source";

/// A single property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Nested(PropertyMap),
}

impl PropertyValue {
    /// A value together with its source, the shape ZFS reports properties in.
    pub fn sourced<V: Into<String>, S: Into<String>>(value: V, source: S) -> Self {
        let mut map = PropertyMap::new();
        map.insert(VALUE_KEY, PropertyValue::String(value.into()));
        map.insert(SOURCE_KEY, PropertyValue::String(source.into()));
        Self::Nested(map)
    }

    /// The plain string of this value, looking through a sourced value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Nested(map) => map.get(VALUE_KEY).and_then(PropertyValue::as_str),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Property name to value mapping for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyMap(BTreeMap<String, PropertyValue>);

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<PropertyValue>>(
        &mut self,
        name: K,
        value: V,
    ) -> Option<PropertyValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    /// The string value of property `name`, if present.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keep only the properties named in `names`.
    pub fn retain_names(&mut self, names: &[String]) {
        self.0.retain(|name, _| names.iter().any(|n| n == name));
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Datasets and their property maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyTree {
    entries: BTreeMap<String, PropertyMap>,
}

impl PropertyTree {
    /// Aggregate `(dataset, properties)` pairs into a tree.
    ///
    /// Every pair is staged before the tree is returned. A dataset that
    /// appears twice fails the whole aggregation and nothing is exposed.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, PropertyMap)>,
    {
        let mut staged = BTreeMap::new();
        for (dataset, props) in entries {
            if staged.contains_key(&dataset) {
                return Err(Error::DuplicateDataset(dataset));
            }
            staged.insert(dataset, props);
        }
        Ok(Self { entries: staged })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, dataset: &str) -> Option<&PropertyMap> {
        self.entries.get(dataset)
    }

    pub fn datasets(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyMap)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Collect `dataset` and its children one level down from the backend.
pub fn collect<B: Backend + ?Sized>(
    backend: &B,
    dataset: &str,
    properties: &[String],
) -> Result<PropertyTree> {
    let pairs = backend.list_properties(dataset, properties)?;
    let tree = PropertyTree::from_entries(pairs)?;
    debug!(dataset, datasets = tree.len(), "collected property tree");
    Ok(tree)
}

/// One step of tearing down a [`PropertyTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseEvent<'a> {
    /// The property map of this dataset was dropped.
    Inner(&'a str),
    /// The tree itself was dropped, after all of its inner maps.
    Outer,
}

/// Counts of what a release dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReleaseStats {
    pub inner: usize,
    pub outer: usize,
}

/// Release a property tree, every inner property map before the tree.
///
/// `None` is accepted and releases nothing.
pub fn release(tree: Option<PropertyTree>) -> ReleaseStats {
    release_with(tree, |_| {})
}

/// [`release`], reporting each step to `observer` as it happens.
pub fn release_with<F>(tree: Option<PropertyTree>, mut observer: F) -> ReleaseStats
where
    F: FnMut(ReleaseEvent<'_>),
{
    let mut stats = ReleaseStats::default();
    let Some(tree) = tree else {
        return stats;
    };

    let mut outer = tree.entries;
    while let Some((dataset, props)) = outer.pop_first() {
        drop(props);
        trace!(%dataset, "released dataset properties");
        observer(ReleaseEvent::Inner(&dataset));
        stats.inner += 1;
    }

    drop(outer);
    observer(ReleaseEvent::Outer);
    stats.outer += 1;
    stats
}
