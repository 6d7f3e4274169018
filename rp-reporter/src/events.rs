// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run lifecycle events, as produced by a test engine.
//!
//! Nodes are owned snapshots of the engine's suite, test and hook objects, so
//! that events can be sent across a channel and handled after the engine has
//! moved on.

use chrono::{DateTime, Utc};
use rp_reporter_metadata::{ItemStatus, ItemType};
use smol_str::SmolStr;
use std::fmt;

/// The identity of a suite, test or hook within one run.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct NodeId(SmolStr);

impl NodeId {
    /// Creates a new node ID.
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A suite.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Suite {
    /// The suite's identity.
    pub id: NodeId,

    /// The suite's title. The engine's root suite has an empty title.
    pub title: SmolStr,

    /// The enclosing suite, or `None` for the root suite.
    pub parent: Option<NodeId>,

    /// An optional description.
    pub description: Option<String>,
}

impl Suite {
    /// Returns the title if the suite should be reported, or `None` for
    /// untitled (synthetic root) suites.
    pub fn reportable_title(&self) -> Option<&str> {
        non_empty(&self.title)
    }
}

/// A test.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Test {
    /// The test's identity.
    pub id: NodeId,

    /// The test's title.
    pub title: SmolStr,

    /// The enclosing suite.
    pub parent: Option<NodeId>,

    /// The outcome of the test. Set by the engine once the test has ended.
    pub state: Option<TestState>,

    /// Details about the failure. Present if `state` is
    /// [`TestState::Failed`].
    pub failure: Option<TestFailure>,
}

impl Test {
    /// Returns the title if the test should be reported.
    pub fn reportable_title(&self) -> Option<&str> {
        non_empty(&self.title)
    }

    /// Returns the status to report for this test.
    pub fn report_status(&self) -> Option<ItemStatus> {
        self.state.map(TestState::to_item_status)
    }

    /// Returns the message to log for a failed test.
    ///
    /// This is the failure stack if there is one, otherwise the failure
    /// message. It is never empty.
    pub fn failure_message(&self) -> String {
        self.failure
            .as_ref()
            .and_then(|failure| {
                failure
                    .stack
                    .as_deref()
                    .and_then(non_empty)
                    .or_else(|| non_empty(&failure.message))
            })
            .map_or_else(|| format!("test failed: {}", self.title), str::to_owned)
    }
}

/// The outcome of a test, as determined by the engine.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum TestState {
    /// The test passed.
    Passed,

    /// The test failed.
    Failed,

    /// The test was not run.
    Pending,
}

impl TestState {
    /// Maps this outcome to the status reported for the test item.
    pub fn to_item_status(self) -> ItemStatus {
        match self {
            TestState::Passed => ItemStatus::Passed,
            TestState::Failed => ItemStatus::Failed,
            TestState::Pending => ItemStatus::Skipped,
        }
    }
}

/// Details about a test failure.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestFailure {
    /// The failure message.
    pub message: String,

    /// The stack trace, which usually includes the message.
    pub stack: Option<String>,
}

/// A hook.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Hook {
    /// The hook's identity.
    pub id: NodeId,

    /// The hook's title, for example `"before each" hook: visit page`.
    pub title: SmolStr,

    /// The suite the hook belongs to.
    pub parent: Option<NodeId>,

    /// The engine's name for the kind of hook, for example `before each`.
    pub hook_name: Option<SmolStr>,
}

impl Hook {
    /// Returns the kind of this hook, or `None` if the hook name is absent or
    /// unknown.
    pub fn kind(&self) -> Option<HookKind> {
        self.hook_name.as_deref().and_then(HookKind::from_hook_name)
    }
}

/// The kind of a hook.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum HookKind {
    /// Runs before each test in its suite.
    BeforeEach,

    /// Runs once before all tests in its suite.
    BeforeAll,

    /// Runs after each test in its suite.
    AfterEach,

    /// Runs once after all tests in its suite.
    AfterAll,
}

impl HookKind {
    /// Parses an engine hook name. Returns `None` for unknown names.
    pub fn from_hook_name(name: &str) -> Option<Self> {
        match name {
            "before each" => Some(HookKind::BeforeEach),
            "before all" => Some(HookKind::BeforeAll),
            "after each" => Some(HookKind::AfterEach),
            "after all" => Some(HookKind::AfterAll),
            _ => None,
        }
    }

    /// Returns the engine hook name for this kind.
    pub fn hook_name(self) -> &'static str {
        match self {
            HookKind::BeforeEach => "before each",
            HookKind::BeforeAll => "before all",
            HookKind::AfterEach => "after each",
            HookKind::AfterAll => "after all",
        }
    }

    /// Returns the report item type for this kind of hook.
    pub fn item_type(self) -> ItemType {
        match self {
            HookKind::BeforeEach => ItemType::BeforeMethod,
            HookKind::BeforeAll => ItemType::BeforeSuite,
            HookKind::AfterEach => ItemType::AfterMethod,
            HookKind::AfterAll => ItemType::AfterSuite,
        }
    }
}

/// A run lifecycle event.
///
/// Events are produced by the test engine and consumed by a
/// [`ReportBridge`](crate::bridge::ReportBridge).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunEvent {
    /// The time at which the event occurred. Used as the start, end or log time
    /// of the remote calls derived from the event.
    pub timestamp: DateTime<Utc>,

    /// The kind of event this is.
    pub kind: RunEventKind,
}

impl RunEvent {
    /// Creates a new event stamped with the current time.
    pub fn now(kind: RunEventKind) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
        }
    }
}

/// The kind of run event.
///
/// Forms part of [`RunEvent`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RunEventKind {
    /// The run started. Occurs once per run, before any other event.
    RunStarted,

    /// A suite started.
    SuiteStarted(Suite),

    /// A suite finished.
    SuiteFinished(Suite),

    /// A hook started.
    HookStarted(Hook),

    /// A hook finished.
    HookFinished(Hook),

    /// A test started.
    TestStarted(Test),

    /// A test finished, with its outcome set.
    TestFinished(Test),

    /// A test passed. Informational; followed by [`TestFinished`](Self::TestFinished).
    TestPassed(Test),

    /// A test failed. Informational.
    TestFailed(Test),

    /// A test was skipped. Informational.
    TestPending(Test),

    /// The run finished. Occurs once per run, after every other event.
    RunFinished,
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}
