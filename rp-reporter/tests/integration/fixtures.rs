// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use color_eyre::eyre::Result;
use fixture_data::{
    example_spec::EXAMPLE_SPEC,
    models::{FixtureStatus, HookFixture, SuiteFixture, TestFixture},
};
use rp_reporter::{
    artifacts::ArtifactCapture,
    bridge::{ReportBridge, ReportStats},
    client::ReportClient,
    dispatch::{EventSender, event_channel},
    events::{Hook, NodeId, RunEventKind, Suite, Test, TestFailure, TestState},
};
use std::sync::Once;

pub(crate) fn test_init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        _ = color_eyre::install();
        _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Emits events for a fixture tree in the order a mocha-style engine does:
/// each suite's tests (with their `before each` hooks) run before its nested
/// suites.
pub(crate) struct MockEngine<'a> {
    sender: &'a EventSender,
}

impl<'a> MockEngine<'a> {
    pub(crate) fn new(sender: &'a EventSender) -> Self {
        Self { sender }
    }

    pub(crate) fn run(&self, spec: &SuiteFixture) {
        self.sender.send(RunEventKind::RunStarted);
        self.run_suite(spec, None);
        self.sender.send(RunEventKind::RunFinished);
    }

    fn run_suite(&self, fixture: &SuiteFixture, parent: Option<&str>) {
        let suite = Suite {
            id: NodeId::new(fixture.id),
            title: fixture.title.into(),
            parent: parent.map(NodeId::new),
            description: None,
        };
        self.sender.send(RunEventKind::SuiteStarted(suite.clone()));

        for test in fixture.tests.iter() {
            for hook in fixture.hooks.iter() {
                self.run_hook(hook, fixture.id);
            }
            self.run_test(test, fixture.id);
        }
        for child in fixture.suites.iter() {
            self.run_suite(child, Some(fixture.id));
        }

        self.sender.send(RunEventKind::SuiteFinished(suite));
    }

    fn run_hook(&self, fixture: &HookFixture, parent: &str) {
        let hook = Hook {
            id: NodeId::new(fixture.id),
            title: fixture.title.into(),
            parent: Some(NodeId::new(parent)),
            hook_name: Some(fixture.hook_name.into()),
        };
        self.sender.send(RunEventKind::HookStarted(hook.clone()));
        self.sender.send(RunEventKind::HookFinished(hook));
    }

    fn run_test(&self, fixture: &TestFixture, parent: &str) {
        let mut test = Test {
            id: NodeId::new(fixture.id),
            title: fixture.title.into(),
            parent: Some(NodeId::new(parent)),
            state: None,
            failure: None,
        };
        self.sender.send(RunEventKind::TestStarted(test.clone()));

        match fixture.status {
            FixtureStatus::Pass => {
                test.state = Some(TestState::Passed);
                self.sender.send(RunEventKind::TestPassed(test.clone()));
            }
            FixtureStatus::Fail => {
                test.state = Some(TestState::Failed);
                test.failure = Some(failure_for(fixture.title));
                self.sender.send(RunEventKind::TestFailed(test.clone()));
            }
            FixtureStatus::Pending => {
                test.state = Some(TestState::Pending);
                self.sender.send(RunEventKind::TestPending(test.clone()));
            }
        }

        self.sender.send(RunEventKind::TestFinished(test));
    }
}

pub(crate) fn failure_for(title: &str) -> TestFailure {
    let message = format!("AssertionError: Timed out retrying: `{title}` did not hold");
    TestFailure {
        stack: Some(format!("{message}\n    at Context.eval (example.spec.js:17:8)")),
        message,
    }
}

/// Runs the example spec `runs` times through `bridge`, and returns the stats
/// for the last run.
pub(crate) async fn report_example_spec<C, A>(
    bridge: ReportBridge<C, A>,
    runs: usize,
) -> Result<ReportStats>
where
    C: ReportClient + 'static,
    A: ArtifactCapture + 'static,
{
    let (sender, receiver) = event_channel();
    let task = tokio::spawn(bridge.drive(receiver));

    let engine = MockEngine::new(&sender);
    for _ in 0..runs {
        engine.run(&EXAMPLE_SPEC);
    }
    drop(sender);

    Ok(task.await?)
}
