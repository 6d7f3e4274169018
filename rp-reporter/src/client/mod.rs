// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The interface to the reporting service.
//!
//! Every call returns immediately. Start calls hand back a handle that can be
//! used right away, along with a [`Completion`] that resolves once the service
//! has processed the call. Clients are expected to sequence calls that depend
//! on a pending handle after the call that created it.

pub mod recording;

use crate::errors::ClientError;
use futures::future::BoxFuture;
use rp_reporter_metadata::{
    Attachment, FinishItem, FinishLaunch, ItemHandle, LaunchHandle, LogEntry, StartItem,
    StartLaunch,
};

/// Resolves once the service has processed a call.
pub type Completion = BoxFuture<'static, Result<(), ClientError>>;

/// The result of issuing a start call.
pub struct Started<H> {
    /// The handle for the new entity. Usable immediately.
    pub handle: H,

    /// Resolves once the entity has been created.
    pub completion: Completion,
}

impl<H: std::fmt::Debug> std::fmt::Debug for Started<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Started")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

/// A client for a ReportPortal-style reporting service.
pub trait ReportClient: Send + Sync {
    /// Starts a launch.
    fn start_launch(&self, payload: StartLaunch) -> Started<LaunchHandle>;

    /// Finishes a launch.
    fn finish_launch(&self, launch: &LaunchHandle, payload: FinishLaunch) -> Completion;

    /// Starts a report item under `parent`, or directly under the launch if
    /// `parent` is `None`.
    fn start_item(
        &self,
        payload: StartItem,
        launch: &LaunchHandle,
        parent: Option<&ItemHandle>,
    ) -> Started<ItemHandle>;

    /// Finishes a report item.
    fn finish_item(&self, item: &ItemHandle, payload: FinishItem) -> Completion;

    /// Attaches a log entry, and optionally a file, to a report item.
    fn send_log(
        &self,
        item: &ItemHandle,
        entry: LogEntry,
        attachment: Option<Attachment>,
    ) -> Completion;
}
