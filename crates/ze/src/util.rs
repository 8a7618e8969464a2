// Copyright (c) Contributors to the zectl project.
// SPDX-License-Identifier: MIT

//! Bounded string operations.
//!
//! Capacities are counted the way the backend counts its C string buffers:
//! a result is only valid when its length is strictly below the capacity,
//! leaving room for the terminator. Nothing here ever hands back a string
//! that violates that bound; an oversized result is reported as
//! [`Error::Overflow`] instead.

use crate::{Error, Result};

#[cfg(test)]
#[path = "./util_test.rs"]
mod util_test;

/// Copy `src` into a new buffer of `capacity` bytes.
pub fn copy(src: &str, capacity: usize) -> Result<String> {
    if src.len() >= capacity {
        return Err(Error::overflow(capacity, src.len() + 1));
    }
    Ok(src.to_owned())
}

/// Append `prefix`, `separator` and `suffix` onto the current contents of `buf`.
///
/// Stops at the first part that would reach `capacity`. That part is not
/// appended, so on failure `buf` still holds a valid (possibly partial)
/// result shorter than `capacity`.
pub fn concat(
    buf: &mut String,
    prefix: &str,
    separator: &str,
    suffix: &str,
    capacity: usize,
) -> Result<()> {
    for part in [prefix, separator, suffix] {
        let needed = buf.len() + part.len();
        if needed >= capacity {
            return Err(Error::overflow(capacity, needed + 1));
        }
        buf.push_str(part);
    }
    Ok(())
}

/// Copy `path` and cut it immediately before the last `delimiter`.
pub fn cut(path: &str, capacity: usize, delimiter: char) -> Result<String> {
    let mut buf = copy(path, capacity)?;
    let at = buf
        .rfind(delimiter)
        .ok_or_else(|| Error::not_found("delimiter", path))?;
    buf.truncate(at);
    Ok(buf)
}
