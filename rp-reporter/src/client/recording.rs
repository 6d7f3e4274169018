// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! An in-memory client that records every call made to it.
//!
//! Useful for tests and for dry runs. Failures can be injected per operation
//! and per item name; failed calls are still recorded, and fail through their
//! completion just like a real service would.

use super::{Completion, ReportClient, Started};
use crate::errors::ClientError;
use futures::FutureExt;
use rp_reporter_metadata::{
    Attachment, FinishItem, FinishLaunch, ItemHandle, LaunchHandle, LogEntry, StartItem,
    StartLaunch,
};
use smol_str::SmolStr;
use std::{
    collections::HashMap,
    fmt::Write as _,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// A call recorded by a [`RecordingClient`].
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedCall {
    /// A start-launch call.
    StartLaunch {
        /// The handle minted for the launch.
        handle: LaunchHandle,
        /// The payload.
        payload: StartLaunch,
    },

    /// A finish-launch call.
    FinishLaunch {
        /// The launch being finished.
        launch: LaunchHandle,
        /// The payload.
        payload: FinishLaunch,
    },

    /// A start-item call.
    StartItem {
        /// The handle minted for the item.
        handle: ItemHandle,
        /// The payload.
        payload: StartItem,
        /// The launch the item belongs to.
        launch: LaunchHandle,
        /// The parent item, or `None` if the item is top-level.
        parent: Option<ItemHandle>,
    },

    /// A finish-item call.
    FinishItem {
        /// The item being finished.
        item: ItemHandle,
        /// The payload.
        payload: FinishItem,
    },

    /// A send-log call.
    SendLog {
        /// The item the log is attached to.
        item: ItemHandle,
        /// The log entry.
        entry: LogEntry,
        /// The attachment, if any.
        attachment: Option<Attachment>,
    },
}

impl RecordedCall {
    /// Returns a compact, human-readable description of this call.
    ///
    /// Timestamps are omitted so that descriptions are stable across runs.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        match self {
            RecordedCall::StartLaunch { handle, payload } => {
                _ = write!(out, "start launch `{}` as {handle}", payload.name);
            }
            RecordedCall::FinishLaunch { launch, .. } => {
                _ = write!(out, "finish launch {launch}");
            }
            RecordedCall::StartItem {
                handle,
                payload,
                launch,
                parent,
            } => {
                _ = write!(
                    out,
                    "start {} `{}` as {handle} under ",
                    payload.item_type, payload.name
                );
                match parent {
                    Some(parent) => _ = write!(out, "{parent}"),
                    None => _ = write!(out, "{launch}"),
                }
            }
            RecordedCall::FinishItem { item, payload } => {
                _ = write!(out, "finish {item}");
                if let Some(status) = payload.status {
                    _ = write!(out, " ({status})");
                }
            }
            RecordedCall::SendLog {
                item,
                entry,
                attachment,
            } => {
                _ = write!(out, "log {} to {item}", entry.level);
                if let Some(attachment) = attachment {
                    _ = write!(out, " with `{}`", attachment.name);
                }
            }
        }
        out
    }
}

/// A call that a [`RecordingClient`] should fail.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FailOn {
    /// Fail the start-launch call.
    StartLaunch,

    /// Fail the finish-launch call.
    FinishLaunch,

    /// Fail start-item calls for items with this name.
    StartItem(SmolStr),

    /// Fail finish-item calls for items with this name.
    FinishItem(SmolStr),

    /// Fail every send-log call.
    SendLog,
}

/// An in-memory [`ReportClient`] that records calls.
///
/// Clones share the same recording.
#[derive(Clone, Debug, Default)]
pub struct RecordingClient {
    inner: Arc<Mutex<RecordingInner>>,
}

#[derive(Debug, Default)]
struct RecordingInner {
    calls: Vec<RecordedCall>,
    failures: Vec<FailOn>,
    item_names: HashMap<ItemHandle, SmolStr>,
    launch_count: usize,
    item_count: usize,
}

impl RecordingClient {
    /// Creates a new recording client that accepts every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes calls matching `fail_on` fail, and returns `self`.
    pub fn failing(self, fail_on: FailOn) -> Self {
        self.lock().failures.push(fail_on);
        self
    }

    /// Returns a copy of the calls recorded so far, in the order they were
    /// issued.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Returns [`RecordedCall::describe`] for each recorded call.
    pub fn describe_calls(&self) -> Vec<String> {
        self.lock().calls.iter().map(RecordedCall::describe).collect()
    }

    fn lock(&self) -> MutexGuard<'_, RecordingInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordingInner {
    fn completion(&self, fail_on: &FailOn, what: &str) -> Completion {
        let result = if self.failures.contains(fail_on) {
            Err(ClientError::new(format!("injected failure: {what}")))
        } else {
            Ok(())
        };
        futures::future::ready(result).boxed()
    }
}

impl ReportClient for RecordingClient {
    fn start_launch(&self, payload: StartLaunch) -> Started<LaunchHandle> {
        let mut inner = self.lock();
        inner.launch_count += 1;
        let handle = LaunchHandle::new(format!("launch-{}", inner.launch_count));
        inner.calls.push(RecordedCall::StartLaunch {
            handle: handle.clone(),
            payload,
        });
        let completion = inner.completion(&FailOn::StartLaunch, "start launch");
        Started { handle, completion }
    }

    fn finish_launch(&self, launch: &LaunchHandle, payload: FinishLaunch) -> Completion {
        let mut inner = self.lock();
        inner.calls.push(RecordedCall::FinishLaunch {
            launch: launch.clone(),
            payload,
        });
        inner.completion(&FailOn::FinishLaunch, "finish launch")
    }

    fn start_item(
        &self,
        payload: StartItem,
        launch: &LaunchHandle,
        parent: Option<&ItemHandle>,
    ) -> Started<ItemHandle> {
        let mut inner = self.lock();
        inner.item_count += 1;
        let handle = ItemHandle::new(format!("item-{}", inner.item_count));
        let name = payload.name.clone();
        inner.item_names.insert(handle.clone(), name.clone());
        inner.calls.push(RecordedCall::StartItem {
            handle: handle.clone(),
            payload,
            launch: launch.clone(),
            parent: parent.cloned(),
        });
        let completion = inner.completion(&FailOn::StartItem(name), "start item");
        Started { handle, completion }
    }

    fn finish_item(&self, item: &ItemHandle, payload: FinishItem) -> Completion {
        let mut inner = self.lock();
        inner.calls.push(RecordedCall::FinishItem {
            item: item.clone(),
            payload,
        });
        let name = inner.item_names.get(item).cloned().unwrap_or_default();
        inner.completion(&FailOn::FinishItem(name), "finish item")
    }

    fn send_log(
        &self,
        item: &ItemHandle,
        entry: LogEntry,
        attachment: Option<Attachment>,
    ) -> Completion {
        let mut inner = self.lock();
        inner.calls.push(RecordedCall::SendLog {
            item: item.clone(),
            entry,
            attachment,
        });
        inner.completion(&FailOn::SendLog, "send log")
    }
}
