// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

//! Configuration file parsing and discovery.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ZECTL_CONFIG";

/// Filename of the config inside a config directory.
pub const CONFIG_FILENAME: &str = "config.yaml";

/// System wide config location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/zectl/config.yaml";

/// API version for config files.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ApiVersion {
    #[default]
    #[serde(rename = "zectl/v0")]
    V0,
}

/// Helper for two-stage deserialization to determine API version first.
#[derive(Deserialize)]
struct ApiVersionMapping {
    #[serde(default)]
    api: ApiVersion,
}

/// Settings for locating and querying boot environments.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// API version identifier.
    #[serde(default)]
    pub api: ApiVersion,

    /// `zfs` binary, looked up in `PATH` unless absolute.
    #[serde(default = "default_zfs")]
    pub zfs: PathBuf,

    /// `zpool` binary, looked up in `PATH` unless absolute.
    #[serde(default = "default_zpool")]
    pub zpool: PathBuf,

    /// Mount table in `/proc/self/mounts` format.
    #[serde(default = "default_mount_table")]
    pub mount_table: PathBuf,

    /// Boot environment root. Derived from the root dataset when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub be_root: Option<String>,

    /// Extra properties to collect for each boot environment.
    #[serde(default = "default_properties")]
    pub properties: Vec<String>,

    /// Path to the file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

fn default_zfs() -> PathBuf {
    PathBuf::from("zfs")
}

fn default_zpool() -> PathBuf {
    PathBuf::from("zpool")
}

fn default_mount_table() -> PathBuf {
    PathBuf::from("/proc/self/mounts")
}

fn default_properties() -> Vec<String> {
    vec!["used".to_string(), "canmount".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiVersion::default(),
            zfs: default_zfs(),
            zpool: default_zpool(),
            mount_table: default_mount_table(),
            be_root: None,
            properties: default_properties(),
            source_path: None,
        }
    }
}

impl Config {
    /// Parse config from YAML string.
    pub fn from_yaml<S: Into<String>>(yaml: S) -> crate::Result<Self> {
        let yaml = yaml.into();

        // Stage 1: Parse to get API version
        let value: serde_yaml::Value =
            serde_yaml::from_str(&yaml).map_err(|e| crate::Error::InvalidYaml {
                error: e,
                yaml_content: yaml.clone(),
            })?;

        let with_version: ApiVersionMapping =
            serde_yaml::from_value(value.clone()).map_err(|e| crate::Error::InvalidYaml {
                error: e,
                yaml_content: yaml.clone(),
            })?;

        // Stage 2: Deserialize based on version
        match with_version.api {
            ApiVersion::V0 => {
                serde_yaml::from_value(value).map_err(|e| crate::Error::InvalidYaml {
                    error: e,
                    yaml_content: yaml,
                })
            }
        }
    }

    /// Load config from file path.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| crate::Error::ReadFailed {
            path: path.to_path_buf(),
            error: e,
        })?;

        let mut config = Self::from_yaml(yaml)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Find and load the config for this invocation.
    ///
    /// An explicit path must exist. Otherwise the user and system locations
    /// are tried in order and the defaults are used if neither exists.
    pub fn discover(explicit: Option<&Path>) -> crate::Result<Self> {
        Self::discover_in(explicit, &default_search_paths())
    }

    fn discover_in(explicit: Option<&Path>, search: &[PathBuf]) -> crate::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        for path in search {
            if path.is_file() {
                debug!(path = %path.display(), "loading config");
                return Self::load(path);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }
}

/// Implicit config locations, most specific first.
pub fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("zectl").join(CONFIG_FILENAME));
    }
    paths.push(PathBuf::from(SYSTEM_CONFIG_PATH));
    paths
}
