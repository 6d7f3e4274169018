// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lifecycle bridge.
//!
//! A [`ReportBridge`] consumes [`RunEvent`](crate::events::RunEvent)s and
//! mirrors them onto the reporting service: one launch per run, with a tree of
//! report items for suites, tests and (optionally) hooks underneath it.

mod imp;

pub use imp::*;

use crate::{
    config::ReporterConfig,
    events::{HookKind, NodeId},
};
use chrono::{DateTime, Utc};
use rp_reporter_metadata::{Attribute, StartLaunch};

/// The settings used to start a launch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LaunchSettings {
    /// The launch name.
    pub name: String,

    /// The launch description.
    pub description: Option<String>,

    /// Attributes attached to the launch.
    pub attributes: Vec<Attribute>,
}

impl LaunchSettings {
    /// Creates launch settings with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            attributes: Vec::new(),
        }
    }

    /// Builds the payload for starting a launch at `start_time`.
    pub fn payload(&self, start_time: DateTime<Utc>) -> StartLaunch {
        StartLaunch {
            name: self.name.clone(),
            description: self.description.clone(),
            attributes: self.attributes.clone(),
            start_time,
        }
    }
}

impl From<&ReporterConfig> for LaunchSettings {
    fn from(config: &ReporterConfig) -> Self {
        Self {
            name: config.launch_name().to_owned(),
            description: config.description().map(str::to_owned),
            attributes: config.attributes().to_vec(),
        }
    }
}

/// The key under which a hook's report item is registered.
///
/// The same hook runs once per test for `before each` and `after each` hooks,
/// so the key is only unique among hooks that are running at the same time.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct HookKey {
    /// The suite the hook belongs to.
    pub parent: Option<NodeId>,

    /// The hook's identity.
    pub hook: NodeId,

    /// The kind of hook.
    pub kind: HookKind,
}

/// Statistics about the calls issued by a [`ReportBridge`] for a run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ReportStats {
    /// The number of launches started.
    pub launches: usize,

    /// The number of start-item calls issued.
    pub items_started: usize,

    /// The number of finish-item calls issued.
    pub items_finished: usize,

    /// The number of send-log calls issued.
    pub logs_sent: usize,

    /// The number of reporting errors. Each error was logged.
    pub errors: usize,
}

impl ReportStats {
    /// Returns true if no reporting errors occurred.
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }
}
