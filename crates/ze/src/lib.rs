// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

//! ze - Boot Environment Manager for ZFS
//!
//! This crate provides the core library behind `zectl`: identifying boot
//! environments from dataset paths and classifying them against the running
//! system.
//!
//! # Overview
//!
//! A boot environment is a bootable clone of a root filesystem living under
//! a boot environment root, for example `zroot/ROOT/default` under
//! `zroot/ROOT`. A [`Handle`] records the pool, the boot environment root,
//! the dataset the pool boots next (`bootfs`) and the dataset mounted at `/`.
//! It is resolved once through a [`Backend`] and only read afterwards.
//!
//! # Example
//!
//! ```
//! use ze::{Config, Handle, MemoryBackend};
//!
//! let backend = MemoryBackend::new()
//!     .with_mount("/", "zroot/ROOT/default")
//!     .with_bootfs("zroot/ROOT/default");
//!
//! let handle = Handle::init(&backend, &Config::default()).unwrap();
//! assert_eq!(handle.be_root(), "zroot/ROOT");
//! assert_eq!(handle.be_name("zroot/ROOT/default").unwrap(), "default");
//! assert!(handle.is_active("zroot/ROOT/default"));
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod handle;
pub mod list;
pub mod path;
pub mod property;
pub mod system;
pub mod util;
pub mod zfs;

pub use backend::{Backend, DatasetHandle, DatasetType, MemoryBackend};
pub use config::Config;
pub use error::{Error, Result};
pub use handle::{Handle, ROOT_MOUNTPOINT};
pub use list::{boot_environments, list, BootEnvironment};
pub use path::{be_dataset, be_name, parent, parent_dataset, suffix_after_root};
pub use property::{
    collect, release, release_with, PropertyMap, PropertyTree, PropertyValue, ReleaseEvent,
    ReleaseStats,
};
pub use zfs::ZfsCommandBackend;

/// Capacity of every dataset path buffer, the Linux `PATH_MAX`.
pub const MAXPATHLEN: usize = 4096;
