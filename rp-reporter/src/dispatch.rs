// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivering run events from a test engine to a [`ReportBridge`].
//!
//! The engine holds an [`EventSender`], which never blocks: events are queued
//! and reported in order by [`ReportBridge::drive`], typically running as a
//! separate task.

use crate::{
    artifacts::ArtifactCapture,
    bridge::{ReportBridge, ReportStats},
    client::ReportClient,
    events::{RunEvent, RunEventKind},
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

/// Creates a new channel for run events.
pub fn event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = unbounded_channel();
    (EventSender { tx }, EventReceiver { rx })
}

/// The sending half of an event channel, held by the test engine.
///
/// Clones send to the same channel. The channel closes once every sender has
/// been dropped.
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: UnboundedSender<RunEvent>,
}

impl EventSender {
    /// Sends an event of the given kind, stamped with the current time.
    pub fn send(&self, kind: RunEventKind) {
        self.send_event(RunEvent::now(kind));
    }

    /// Sends an event.
    ///
    /// If the receiving side has gone away, the event is dropped.
    pub fn send_event(&self, event: RunEvent) {
        if let Err(error) = self.tx.send(event) {
            debug!(
                kind = ?error.0.kind,
                "event receiver was dropped, not reporting event"
            );
        }
    }
}

/// The receiving half of an event channel.
#[derive(Debug)]
pub struct EventReceiver {
    rx: UnboundedReceiver<RunEvent>,
}

impl EventReceiver {
    /// Receives the next event, or `None` once every sender has been dropped
    /// and all queued events have been received.
    pub async fn recv(&mut self) -> Option<RunEvent> {
        self.rx.recv().await
    }
}

impl<C: ReportClient, A: ArtifactCapture> ReportBridge<C, A> {
    /// Reports events from `receiver` in order until the channel closes, then
    /// returns the statistics for the last run.
    pub async fn drive(mut self, mut receiver: EventReceiver) -> ReportStats {
        while let Some(event) = receiver.recv().await {
            self.report_event(event).await;
        }
        debug!("event channel closed");
        self.into_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        artifacts::NoArtifacts,
        bridge::LaunchSettings,
        client::recording::RecordingClient,
        config::HookReporting,
        events::{NodeId, Suite},
    };
    use pretty_assertions::assert_eq;

    fn suite(title: &str) -> Suite {
        Suite {
            id: NodeId::new("r1"),
            title: title.into(),
            parent: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn drive_reports_in_order() {
        let client = RecordingClient::new();
        let bridge = ReportBridge::new(
            client.clone(),
            NoArtifacts,
            LaunchSettings::new("nightly"),
            HookReporting::Local,
        );
        let (sender, receiver) = event_channel();
        let task = tokio::spawn(bridge.drive(receiver));

        sender.send(RunEventKind::RunStarted);
        sender.send(RunEventKind::SuiteStarted(suite("A")));
        sender.send(RunEventKind::SuiteFinished(suite("A")));
        sender.send(RunEventKind::RunFinished);
        drop(sender);

        let stats = task.await.expect("drive task completed");
        assert_eq!(
            client.describe_calls(),
            vec![
                "start launch `nightly` as launch-1",
                "start suite `A` as item-1 under launch-1",
                "finish item-1",
                "finish launch launch-1",
            ]
        );
        assert_eq!(
            stats,
            ReportStats {
                launches: 1,
                items_started: 1,
                items_finished: 1,
                logs_sent: 0,
                errors: 0,
            }
        );
    }

    #[tokio::test]
    async fn send_after_receiver_dropped() {
        let (sender, receiver) = event_channel();
        drop(receiver);

        // Doesn't panic or block.
        sender.send(RunEventKind::RunStarted);
    }

    #[tokio::test]
    async fn closed_channel_without_events() {
        let client = RecordingClient::new();
        let bridge = ReportBridge::new(
            client.clone(),
            NoArtifacts,
            LaunchSettings::new("nightly"),
            HookReporting::Local,
        );
        let (sender, receiver) = event_channel();
        drop(sender);

        let stats = bridge.drive(receiver).await;
        assert_eq!(stats, ReportStats::default());
        assert!(client.calls().is_empty());
    }
}
