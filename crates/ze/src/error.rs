// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

//! Error types for boot environment operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with ze Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or inspecting boot environments.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Result would not fit in the destination capacity
    #[error("Result of {needed} bytes does not fit in a buffer of {capacity} bytes")]
    #[diagnostic(
        code(ze::overflow),
        help("Dataset paths must be shorter than MAXPATHLEN (4096 bytes)")
    )]
    Overflow { capacity: usize, needed: usize },

    /// An expected delimiter or segment is absent
    #[error("No {what} found in '{input}'")]
    #[diagnostic(code(ze::not_found))]
    NotFound { what: &'static str, input: String },

    /// Dataset has no segment beyond the boot environment root
    #[error("Dataset '{dataset}' has no boot environment below '{root}'")]
    #[diagnostic(
        code(ze::no_parent),
        help("A boot environment dataset looks like <root>/<name>")
    )]
    NoParent { root: String, dataset: String },

    /// Boot environment name is empty or contains a delimiter
    #[error("Invalid boot environment name: '{0}'")]
    #[diagnostic(
        code(ze::invalid_be_name),
        help("Boot environment names are non-empty and may not contain '/'")
    )]
    InvalidBeName(String),

    /// The backend reported the same dataset twice
    #[error("Dataset '{0}' reported more than once")]
    #[diagnostic(code(ze::duplicate_dataset))]
    DuplicateDataset(String),

    /// Mountpoint is backed by something other than the expected dataset type
    #[error("'{mountpoint}' is backed by {found}, expected a {expected} dataset")]
    #[diagnostic(
        code(ze::unexpected_dataset_type),
        help("The system may not be configured correctly for boot environments")
    )]
    UnexpectedDatasetType {
        mountpoint: String,
        expected: &'static str,
        found: String,
    },

    /// Opaque failure surfaced by a backend collaborator
    #[error("Backend error: {0}")]
    #[diagnostic(code(ze::backend))]
    Backend(String),

    /// Invalid YAML in config file
    #[error("Invalid config file: {error}")]
    #[diagnostic(
        code(ze::invalid_yaml),
        help("Check YAML syntax and ensure 'api: zectl/v0' is present")
    )]
    InvalidYaml {
        #[source]
        error: serde_yaml::Error,
        yaml_content: String,
    },

    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(ze::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

impl Error {
    pub(crate) fn overflow(capacity: usize, needed: usize) -> Self {
        Self::Overflow { capacity, needed }
    }

    pub(crate) fn not_found<S: Into<String>>(what: &'static str, input: S) -> Self {
        Self::NotFound {
            what,
            input: input.into(),
        }
    }
}
