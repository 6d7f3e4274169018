// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// A handle to a launch, as returned by a client's start-launch call.
///
/// The handle is handed out as soon as the call is issued. It becomes valid on
/// the service side once the call completes, but may be passed to dependent
/// calls before that: clients sequence later calls on it.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchHandle(SmolStr);

impl LaunchHandle {
    /// Creates a new launch handle.
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    /// Returns the handle as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LaunchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A handle to a report item (a suite, step or hook), as returned by a
/// client's start-item call.
///
/// Like [`LaunchHandle`], this is usable immediately: a handle whose start call
/// has not completed yet is *pending*, and may already be used as the parent of
/// other items or as the target of finish and log calls.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemHandle(SmolStr);

impl ItemHandle {
    /// Creates a new item handle.
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    /// Returns the handle as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
