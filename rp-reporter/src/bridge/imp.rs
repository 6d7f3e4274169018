// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{HookKey, LaunchSettings, ReportStats};
use crate::{
    artifacts::ArtifactCapture,
    client::{ReportClient, Started},
    config::{HookReporting, ReporterConfig},
    errors::{DisplayErrorChain, Operation, ReportEventError},
    events::{Hook, NodeId, RunEvent, RunEventKind, Suite, Test},
    identity_map::IdentityMap,
};
use chrono::{DateTime, Utc};
use debug_ignore::DebugIgnore;
use rp_reporter_metadata::{
    FinishItem, FinishLaunch, ItemHandle, ItemStatus, ItemType, LaunchHandle, LogEntry, LogLevel,
    StartItem,
};
use std::hash::Hash;
use tracing::{debug, error, info, warn};

/// Mirrors run lifecycle events onto a reporting service.
///
/// Events are handled one at a time, and each handler waits for the calls it
/// issues to complete before returning. Reporting errors are logged and never
/// returned to the caller: a failure to report a node only affects that node
/// and the nodes nested under it.
#[derive(Debug)]
pub struct ReportBridge<C, A> {
    client: DebugIgnore<C>,
    artifacts: DebugIgnore<A>,
    launch_settings: LaunchSettings,
    hooks: HookReporting,
    phase: RunPhase,
    run: RunState,
    stats: ReportStats,
}

impl<C: ReportClient, A: ArtifactCapture> ReportBridge<C, A> {
    /// Creates a new bridge.
    pub fn new(
        client: C,
        artifacts: A,
        launch_settings: LaunchSettings,
        hooks: HookReporting,
    ) -> Self {
        Self {
            client: DebugIgnore(client),
            artifacts: DebugIgnore(artifacts),
            launch_settings,
            hooks,
            phase: RunPhase::NotStarted,
            run: RunState::default(),
            stats: ReportStats::default(),
        }
    }

    /// Creates a new bridge with the launch settings and hook policy from
    /// `config`.
    pub fn from_config(client: C, artifacts: A, config: &ReporterConfig) -> Self {
        Self::new(client, artifacts, config.launch_settings(), config.hooks())
    }

    /// Returns the client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns statistics for the current run.
    pub fn stats(&self) -> ReportStats {
        self.stats
    }

    /// Returns the handle of the running launch, if any.
    pub fn launch_handle(&self) -> Option<&LaunchHandle> {
        self.run.launch.as_ref()
    }

    /// Returns the report items started for suites and tests that haven't
    /// been finished yet.
    pub fn items(&self) -> &IdentityMap<NodeId> {
        &self.run.items
    }

    /// Returns the report items started for hooks that haven't been finished
    /// yet.
    pub fn hook_items(&self) -> &IdentityMap<HookKey> {
        &self.run.hooks
    }

    /// Reports a single event.
    ///
    /// Errors are logged and counted in [`ReportStats::errors`].
    pub async fn report_event(&mut self, event: RunEvent) {
        if let Err(error) = self.try_report_event(event).await {
            self.record_error(error);
        }
    }

    /// Reports a single event, returning the error for the event if any.
    ///
    /// Unlike [`Self::report_event`], a returned error is not logged or
    /// counted. Failures to send the log for a failed test are still logged,
    /// since they don't prevent the test from being finished.
    pub async fn try_report_event(&mut self, event: RunEvent) -> Result<(), ReportEventError> {
        let RunEvent { timestamp, kind } = event;
        match kind {
            RunEventKind::RunStarted => self.run_started(timestamp).await,
            RunEventKind::SuiteStarted(suite) => self.suite_started(timestamp, &suite).await,
            RunEventKind::SuiteFinished(suite) => self.suite_finished(timestamp, &suite).await,
            RunEventKind::HookStarted(hook) => self.hook_started(timestamp, &hook).await,
            RunEventKind::HookFinished(hook) => self.hook_finished(timestamp, &hook).await,
            RunEventKind::TestStarted(test) => self.test_started(timestamp, &test).await,
            RunEventKind::TestFinished(test) => self.test_finished(timestamp, &test).await,
            RunEventKind::TestPassed(test) => {
                info!(test = %test.title, "test passed");
                Ok(())
            }
            RunEventKind::TestFailed(test) => {
                info!(test = %test.title, "test failed");
                Ok(())
            }
            RunEventKind::TestPending(test) => {
                info!(test = %test.title, "test pending");
                Ok(())
            }
            RunEventKind::RunFinished => self.run_finished(timestamp).await,
        }
    }

    // ---
    // Event handlers
    // ---

    async fn run_started(&mut self, timestamp: DateTime<Utc>) -> Result<(), ReportEventError> {
        match self.phase {
            RunPhase::Running => {
                warn!("run started while another run is in progress, ignoring");
                return Ok(());
            }
            RunPhase::Finished => {
                debug!("new run started, resetting report state");
                self.stats = ReportStats::default();
            }
            RunPhase::NotStarted => {}
        }
        self.phase = RunPhase::Running;
        self.run = RunState::default();

        let Started { handle, completion } = self
            .client
            .start_launch(self.launch_settings.payload(timestamp));
        self.stats.launches += 1;
        self.run.launch = Some(handle.clone());

        match completion.await {
            Ok(()) => {
                info!(launch = %handle, name = %self.launch_settings.name, "launch started");
                Ok(())
            }
            Err(error) => {
                self.run.launch = None;
                Err(ReportEventError::Client {
                    operation: Operation::StartLaunch,
                    title: self.launch_settings.name.as_str().into(),
                    error,
                })
            }
        }
    }

    async fn suite_started(
        &mut self,
        timestamp: DateTime<Utc>,
        suite: &Suite,
    ) -> Result<(), ReportEventError> {
        let Some(title) = suite.reportable_title() else {
            debug!(id = %suite.id, "skipping untitled suite");
            return Ok(());
        };
        info!(suite = title, "suite started");

        let parent = self.parent_handle(suite.parent.as_ref());
        let payload = StartItem::new(ItemType::Suite, title, timestamp)
            .with_description(suite.description.clone());
        self.start_item(
            RunState::items_mut,
            Operation::StartSuite,
            suite.id.clone(),
            payload,
            parent,
        )
        .await
    }

    async fn suite_finished(
        &mut self,
        timestamp: DateTime<Utc>,
        suite: &Suite,
    ) -> Result<(), ReportEventError> {
        let Some(title) = suite.reportable_title() else {
            return Ok(());
        };
        info!(suite = title, "suite finished");

        let payload = FinishItem {
            end_time: timestamp,
            status: None,
        };
        self.finish_item(
            RunState::items_mut,
            Operation::FinishSuite,
            &suite.id,
            title,
            payload,
        )
        .await
    }

    async fn test_started(
        &mut self,
        timestamp: DateTime<Utc>,
        test: &Test,
    ) -> Result<(), ReportEventError> {
        let Some(title) = test.reportable_title() else {
            debug!(id = %test.id, "skipping untitled test");
            return Ok(());
        };
        info!(test = title, "test started");

        let parent = self.parent_handle(test.parent.as_ref());
        let payload = StartItem::new(ItemType::Step, title, timestamp);
        self.start_item(
            RunState::items_mut,
            Operation::StartTest,
            test.id.clone(),
            payload,
            parent,
        )
        .await
    }

    async fn test_finished(
        &mut self,
        timestamp: DateTime<Utc>,
        test: &Test,
    ) -> Result<(), ReportEventError> {
        let Some(title) = test.reportable_title() else {
            return Ok(());
        };
        let status = test.report_status();
        info!(test = title, status = ?status, "test finished");

        let Some(item) = self.run.items.handle(&test.id).cloned() else {
            return Err(ReportEventError::MissingHandle {
                operation: Operation::FinishTest,
                title: title.into(),
            });
        };

        if status == Some(ItemStatus::Failed)
            && let Err(error) = self.send_failure_log(timestamp, test, title, &item).await
        {
            self.record_error(error);
        }

        let payload = FinishItem {
            end_time: timestamp,
            status,
        };
        self.finish_item(
            RunState::items_mut,
            Operation::FinishTest,
            &test.id,
            title,
            payload,
        )
        .await
    }

    async fn hook_started(
        &mut self,
        timestamp: DateTime<Utc>,
        hook: &Hook,
    ) -> Result<(), ReportEventError> {
        let Some(key) = self.hook_key(hook) else {
            return Ok(());
        };

        match self.hooks {
            HookReporting::Ignore => Ok(()),
            HookReporting::Local => {
                info!(hook = %hook.title, kind = key.kind.hook_name(), "hook started");
                Ok(())
            }
            HookReporting::Remote => {
                let parent = self.parent_handle(hook.parent.as_ref());
                let payload =
                    StartItem::new(key.kind.item_type(), key.kind.hook_name(), timestamp)
                        .with_description(Some(hook.title.to_string()));
                self.start_item(
                    RunState::hooks_mut,
                    Operation::StartHook,
                    key,
                    payload,
                    parent,
                )
                .await
            }
        }
    }

    async fn hook_finished(
        &mut self,
        timestamp: DateTime<Utc>,
        hook: &Hook,
    ) -> Result<(), ReportEventError> {
        let Some(key) = self.hook_key(hook) else {
            return Ok(());
        };

        match self.hooks {
            HookReporting::Ignore => Ok(()),
            HookReporting::Local => {
                info!(hook = %hook.title, kind = key.kind.hook_name(), "hook finished");
                Ok(())
            }
            HookReporting::Remote => {
                let payload = FinishItem {
                    end_time: timestamp,
                    status: None,
                };
                self.finish_item(
                    RunState::hooks_mut,
                    Operation::FinishHook,
                    &key,
                    &hook.title,
                    payload,
                )
                .await
            }
        }
    }

    async fn run_finished(&mut self, timestamp: DateTime<Utc>) -> Result<(), ReportEventError> {
        if self.phase == RunPhase::Running {
            self.phase = RunPhase::Finished;
        }

        let run = std::mem::take(&mut self.run);
        for record in run.items.iter() {
            warn!(
                id = %record.key,
                handle = %record.handle,
                item_type = %record.item_type,
                "report item was never finished",
            );
        }
        for record in run.hooks.iter() {
            warn!(
                id = %record.key.hook,
                handle = %record.handle,
                item_type = %record.item_type,
                "report item was never finished",
            );
        }

        let Some(launch) = run.launch else {
            return Err(ReportEventError::MissingLaunch {
                operation: Operation::FinishLaunch,
                title: self.launch_settings.name.as_str().into(),
            });
        };

        let completion = self.client.finish_launch(
            &launch,
            FinishLaunch {
                end_time: timestamp,
            },
        );
        completion.await.map_err(|error| ReportEventError::Client {
            operation: Operation::FinishLaunch,
            title: self.launch_settings.name.as_str().into(),
            error,
        })?;

        info!(launch = %launch, "launch finished");
        Ok(())
    }

    // ---
    // Helper methods
    // ---

    async fn send_failure_log(
        &mut self,
        timestamp: DateTime<Utc>,
        test: &Test,
        title: &str,
        item: &ItemHandle,
    ) -> Result<(), ReportEventError> {
        let entry = LogEntry {
            message: test.failure_message(),
            level: LogLevel::Error,
            time: timestamp,
        };
        let attachment = self.artifacts.capture(title);
        let completion = self.client.send_log(item, entry, attachment);
        self.stats.logs_sent += 1;

        completion.await.map_err(|error| ReportEventError::Client {
            operation: Operation::SendLog,
            title: title.into(),
            error,
        })
    }

    async fn start_item<K: Clone + Eq + Hash>(
        &mut self,
        select: fn(&mut RunState) -> &mut IdentityMap<K>,
        operation: Operation,
        key: K,
        payload: StartItem,
        parent: Option<ItemHandle>,
    ) -> Result<(), ReportEventError> {
        let title = payload.name.clone();
        let Some(launch) = self.run.launch.clone() else {
            return Err(ReportEventError::MissingLaunch { operation, title });
        };

        let (item_type, started_at) = (payload.item_type, payload.start_time);
        let Started { handle, completion } =
            self.client.start_item(payload, &launch, parent.as_ref());
        self.stats.items_started += 1;

        // Register before waiting, so the handle is available to anything
        // that depends on it.
        let replaced = select(&mut self.run).register(key.clone(), handle, item_type, started_at);
        for record in replaced {
            warn!(
                handle = %record.handle,
                "`{title}` was started again before it finished, replacing its report item",
            );
        }

        match completion.await {
            Ok(()) => {
                select(&mut self.run).mark_resolved(&key);
                Ok(())
            }
            Err(error) => {
                select(&mut self.run).remove(&key);
                Err(ReportEventError::Client {
                    operation,
                    title,
                    error,
                })
            }
        }
    }

    async fn finish_item<K: Eq + Hash>(
        &mut self,
        select: fn(&mut RunState) -> &mut IdentityMap<K>,
        operation: Operation,
        key: &K,
        title: &str,
        payload: FinishItem,
    ) -> Result<(), ReportEventError> {
        let Some(record) = select(&mut self.run).remove(key) else {
            return Err(ReportEventError::MissingHandle {
                operation,
                title: title.into(),
            });
        };

        let completion = self.client.finish_item(&record.handle, payload);
        self.stats.items_finished += 1;

        completion.await.map_err(|error| ReportEventError::Client {
            operation,
            title: title.into(),
            error,
        })
    }

    /// Returns the handle of `parent`, or `None` if the node should be
    /// reported directly under the launch.
    fn parent_handle(&self, parent: Option<&NodeId>) -> Option<ItemHandle> {
        let parent = parent?;
        let handle = self.run.items.handle(parent).cloned();
        if handle.is_none() {
            debug!(%parent, "parent has no report item, reporting under the launch");
        }
        handle
    }

    fn hook_key(&self, hook: &Hook) -> Option<HookKey> {
        if self.hooks == HookReporting::Ignore {
            return None;
        }
        let Some(kind) = hook.kind() else {
            debug!(
                hook = %hook.title,
                hook_name = ?hook.hook_name,
                "ignoring hook with unrecognized name",
            );
            return None;
        };
        Some(HookKey {
            parent: hook.parent.clone(),
            hook: hook.id.clone(),
            kind,
        })
    }

    fn record_error(&mut self, error: ReportEventError) {
        self.stats.errors += 1;
        error!(
            operation = %error.operation(),
            title = error.title(),
            "{}",
            DisplayErrorChain::new(&error),
        );
    }

    pub(crate) fn into_stats(self) -> ReportStats {
        self.stats
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum RunPhase {
    NotStarted,
    Running,
    Finished,
}

/// State scoped to a single run.
#[derive(Debug, Default)]
struct RunState {
    launch: Option<LaunchHandle>,
    items: IdentityMap<NodeId>,
    hooks: IdentityMap<HookKey>,
}

impl RunState {
    fn items_mut(&mut self) -> &mut IdentityMap<NodeId> {
        &mut self.items
    }

    fn hooks_mut(&mut self) -> &mut IdentityMap<HookKey> {
        &mut self.hooks
    }
}
