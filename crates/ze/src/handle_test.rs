// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

use rstest::{fixture, rstest};

use super::*;
use crate::backend::{DatasetHandle, MemoryBackend};

#[fixture]
fn handle() -> Handle {
    Handle::from_parts("zroot", "zroot/ROOT", "zroot/ROOT/next", "zroot/ROOT/default")
}

#[rstest]
fn test_init_from_backend() {
    let backend = MemoryBackend::new()
        .with_mount("/", "zroot/ROOT/default")
        .with_bootfs("zroot/ROOT/next");

    let handle = Handle::init(&backend, &Config::default()).expect("should resolve");
    assert_eq!(handle.zpool(), "zroot");
    assert_eq!(handle.be_root(), "zroot/ROOT");
    assert_eq!(handle.active_dataset(), "zroot/ROOT/next");
    assert_eq!(handle.root_dataset(), "zroot/ROOT/default");
}

#[rstest]
fn test_init_with_be_root_override() {
    let backend = MemoryBackend::new()
        .with_mount("/", "tank/sys/ROOT/default")
        .with_bootfs("tank/sys/ROOT/default");
    let config = Config {
        be_root: Some("tank/sys/ROOT".to_string()),
        ..Config::default()
    };

    let handle = Handle::init(&backend, &config).unwrap();
    assert_eq!(handle.zpool(), "tank");
    assert_eq!(handle.be_root(), "tank/sys/ROOT");
}

#[rstest]
fn test_init_without_root_mount() {
    let backend = MemoryBackend::new().with_bootfs("zroot/ROOT/default");
    let err = Handle::init(&backend, &Config::default()).expect_err("nothing at /");
    assert!(matches!(err, Error::Backend(_)));
}

#[rstest]
fn test_init_rejects_non_filesystem_root() {
    let backend = MemoryBackend::new()
        .with_mount_handle("/", DatasetHandle::new("zroot/vol", DatasetType::Volume))
        .with_bootfs("zroot/ROOT/default");
    let err = Handle::init(&backend, &Config::default()).expect_err("volume at /");
    assert!(matches!(err, Error::UnexpectedDatasetType { .. }));
}

#[rstest]
fn test_init_root_is_bare_pool() {
    let backend = MemoryBackend::new()
        .with_mount("/", "zroot")
        .with_bootfs("zroot");
    let err = Handle::init(&backend, &Config::default()).expect_err("no boot environment root");
    assert!(matches!(err, Error::NotFound { .. }));
}

#[rstest]
fn test_init_without_bootfs() {
    let backend = MemoryBackend::new().with_mount("/", "zroot/ROOT/default");
    let err = Handle::init(&backend, &Config::default()).expect_err("no bootfs");
    assert!(matches!(err, Error::Backend(_)));
}

#[rstest]
fn test_is_active(handle: Handle) {
    assert!(handle.is_active(handle.active_dataset()));
    assert!(!handle.is_active("unrelated/path"));
    assert!(!handle.is_active("zroot/ROOT/default"));
    assert!(!handle.is_active("ZROOT/ROOT/NEXT"));
}

#[rstest]
fn test_is_root(handle: Handle) {
    assert!(handle.is_root(handle.root_dataset()));
    assert!(!handle.is_root("zroot/ROOT/next"));
    assert!(!handle.is_root("zroot/ROOT/default/"));
}

#[rstest]
fn test_be_name_and_dataset(handle: Handle) {
    assert_eq!(handle.be_name("zroot/ROOT/default").unwrap(), "default");
    assert_eq!(handle.be_dataset("default").unwrap(), "zroot/ROOT/default");
    assert!(matches!(
        handle.be_name("zroot/ROOT"),
        Err(Error::NoParent { .. })
    ));
}
