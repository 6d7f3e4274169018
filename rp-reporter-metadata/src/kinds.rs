// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// The type of a report item.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum ItemType {
    /// A suite: a container for steps, hooks and other suites.
    #[serde(rename = "suite")]
    Suite,

    /// A single test.
    #[serde(rename = "step")]
    Step,

    /// A hook run before each test in a suite.
    #[serde(rename = "BEFORE_METHOD")]
    BeforeMethod,

    /// A hook run once before all tests in a suite.
    #[serde(rename = "BEFORE_SUITE")]
    BeforeSuite,

    /// A hook run after each test in a suite.
    #[serde(rename = "AFTER_METHOD")]
    AfterMethod,

    /// A hook run once after all tests in a suite.
    #[serde(rename = "AFTER_SUITE")]
    AfterSuite,
}

impl ItemType {
    /// Returns the wire representation of this item type.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Suite => "suite",
            ItemType::Step => "step",
            ItemType::BeforeMethod => "BEFORE_METHOD",
            ItemType::BeforeSuite => "BEFORE_SUITE",
            ItemType::AfterMethod => "AFTER_METHOD",
            ItemType::AfterSuite => "AFTER_SUITE",
        }
    }

    /// Returns true if this item type represents a hook.
    pub fn is_hook(self) -> bool {
        match self {
            ItemType::BeforeMethod
            | ItemType::BeforeSuite
            | ItemType::AfterMethod
            | ItemType::AfterSuite => true,
            ItemType::Suite | ItemType::Step => false,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The final status of a report item.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum ItemStatus {
    /// The item passed.
    Passed,

    /// The item failed.
    Failed,

    /// The item was not run.
    Skipped,
}

impl ItemStatus {
    /// Returns the wire representation of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Passed => "passed",
            ItemStatus::Failed => "failed",
            ItemStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The level of a log entry attached to a report item.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// An error, typically a test failure.
    Error,

    /// A warning.
    Warn,

    /// Informational output.
    Info,

    /// Debug output.
    Debug,

    /// Trace output.
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(s)
    }
}
