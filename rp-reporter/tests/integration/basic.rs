// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use color_eyre::eyre::{Result, ensure};
use fixture_data::{example_spec::EXAMPLE_SPEC, models::FixtureStatus};
use indoc::indoc;
use pretty_assertions::assert_eq;
use rp_reporter::{
    artifacts::{NoArtifacts, ScreenshotDir},
    bridge::{LaunchSettings, ReportBridge, ReportStats},
    client::recording::{FailOn, RecordedCall, RecordingClient},
    config::{HookReporting, ReporterConfig},
};
use rp_reporter_metadata::{ItemType, LogLevel};
use test_case::test_case;

fn local_bridge(client: &RecordingClient) -> ReportBridge<RecordingClient, NoArtifacts> {
    ReportBridge::new(
        client.clone(),
        NoArtifacts,
        LaunchSettings::new("Cypress example"),
        HookReporting::Local,
    )
}

const EXAMPLE_SPEC_CALLS: &[&str] = &[
    "start launch `Cypress example` as launch-1",
    "start suite `Example Cypress Test` as item-1 under launch-1",
    "start suite `Check Cypress page` as item-2 under item-1",
    "start suite `Check content Cypress example page` as item-3 under item-2",
    "start step `should contain Cypress` as item-4 under item-3",
    "finish item-4 (passed)",
    "start step `should contain Commands` as item-5 under item-3",
    "finish item-5 (passed)",
    "start step `should contain gfkjdgkjdfgl (failed)` as item-6 under item-3",
    "log error to item-6",
    "finish item-6 (failed)",
    "finish item-3",
    "start suite `Check url Cypress example page` as item-7 under item-2",
    "start step `should contain cypress` as item-8 under item-7",
    "finish item-8 (passed)",
    "start step `should contain example` as item-9 under item-7",
    "finish item-9 (passed)",
    "start step `skipped test` as item-10 under item-7",
    "finish item-10 (skipped)",
    "finish item-7",
    "finish item-2",
    "start suite `Check content of Google` as item-11 under item-1",
    "start step `url should contain google` as item-12 under item-11",
    "finish item-12 (passed)",
    "start step `check contain of google page (failed)` as item-13 under item-11",
    "log error to item-13",
    "finish item-13 (failed)",
    "finish item-11",
    "finish item-1",
    "finish launch launch-1",
];

#[tokio::test]
async fn test_example_spec() -> Result<()> {
    test_init();

    let client = RecordingClient::new();
    let stats = report_example_spec(local_bridge(&client), 1).await?;

    assert_eq!(client.describe_calls(), EXAMPLE_SPEC_CALLS);

    let test_count = EXAMPLE_SPEC.all_tests().len();
    let failed_count = EXAMPLE_SPEC
        .all_tests()
        .iter()
        .filter(|test| test.status.is_failure())
        .count();
    let item_count = EXAMPLE_SPEC.titled_suite_count() + test_count;
    assert_eq!(
        stats,
        ReportStats {
            launches: 1,
            items_started: item_count,
            items_finished: item_count,
            logs_sent: failed_count,
            errors: 0,
        }
    );

    // Every failure log is an error with the failure's stack trace.
    for call in client.calls() {
        if let RecordedCall::SendLog { entry, .. } = call {
            ensure!(entry.level == LogLevel::Error, "unexpected level: {entry:?}");
            ensure!(
                entry.message.contains("\n    at Context.eval"),
                "message should be the stack trace: {}",
                entry.message
            );
        }
    }

    Ok(())
}

#[tokio::test]
async fn test_remote_hooks() -> Result<()> {
    test_init();

    let client = RecordingClient::new();
    let bridge = ReportBridge::new(
        client.clone(),
        NoArtifacts,
        LaunchSettings::new("Cypress example"),
        HookReporting::Remote,
    );
    let stats = report_example_spec(bridge, 1).await?;
    ensure!(stats.is_success(), "no reporting errors: {stats:?}");

    let calls = client.calls();
    let hook_starts: Vec<_> = calls
        .iter()
        .filter_map(|call| match call {
            RecordedCall::StartItem {
                payload, parent, ..
            } if payload.item_type.is_hook() => Some((payload, parent)),
            _ => None,
        })
        .collect();

    // One hook run per test.
    assert_eq!(hook_starts.len(), EXAMPLE_SPEC.all_tests().len());
    for (payload, parent) in &hook_starts {
        assert_eq!(payload.item_type, ItemType::BeforeMethod);
        assert_eq!(payload.name.as_str(), "before each");
        ensure!(parent.is_some(), "hooks are nested under their suite");
    }
    assert_eq!(stats.items_started, stats.items_finished);

    // The first hook runs before the first test, under its suite.
    let described = client.describe_calls();
    assert_eq!(
        described[4..7].to_vec(),
        vec![
            "start BEFORE_METHOD `before each` as item-4 under item-3",
            "finish item-4",
            "start step `should contain Cypress` as item-5 under item-3",
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_screenshots_attached() -> Result<()> {
    test_init();

    let dir = camino_tempfile::tempdir()?;
    let screenshot = dir
        .path()
        .join("example.spec.js/should contain gfkjdgkjdfgl (failed) (failed).png");
    fs_err::create_dir_all(dir.path().join("example.spec.js"))?;
    fs_err::write(&screenshot, b"\x89PNG")?;

    let client = RecordingClient::new();
    let bridge = ReportBridge::new(
        client.clone(),
        ScreenshotDir::new(dir.path()),
        LaunchSettings::new("Cypress example"),
        HookReporting::Local,
    );
    report_example_spec(bridge, 1).await?;

    let logs: Vec<_> = client
        .describe_calls()
        .into_iter()
        .filter(|call| call.starts_with("log "))
        .collect();
    assert_eq!(
        logs,
        vec![
            "log error to item-6 with `should contain gfkjdgkjdfgl (failed) (failed).png`",
            "log error to item-13",
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_bridge_from_config() -> Result<()> {
    test_init();

    let dir = camino_tempfile::tempdir()?;
    let config_file = dir.path().join("rp-reporter.toml");
    fs_err::write(
        &config_file,
        indoc! {r#"
            launch = "Cypress nightly"
            description = "example spec"
            hooks = "ignore"
            screenshots-dir = "screenshots"

            [[attributes]]
            key = "browser"
            value = "electron"
        "#},
    )?;

    let config = ReporterConfig::from_sources(dir.path(), Some(config_file.as_path()))?;
    let client = RecordingClient::new();
    let bridge = ReportBridge::from_config(client.clone(), config.screenshots_dir(), &config);
    let stats = report_example_spec(bridge, 1).await?;
    ensure!(stats.is_success(), "no reporting errors: {stats:?}");

    let calls = client.calls();
    let Some(RecordedCall::StartLaunch { payload, .. }) = calls.first() else {
        panic!("expected start launch first, found {:?}", calls.first());
    };
    assert_eq!(payload.name, "Cypress nightly");
    assert_eq!(payload.description.as_deref(), Some("example spec"));
    assert_eq!(payload.attributes.len(), 1);

    // The screenshot directory doesn't exist, so nothing is attached.
    ensure!(
        calls.iter().all(|call| !matches!(
            call,
            RecordedCall::SendLog {
                attachment: Some(_),
                ..
            }
        )),
        "no attachments expected"
    );

    Ok(())
}

#[test_case(FailOn::StartItem("Check Cypress page".into()), 2 ; "suite start")]
#[test_case(FailOn::FinishItem("should contain Commands".into()), 1 ; "test finish")]
#[test_case(FailOn::SendLog, 2 ; "send log")]
#[test_case(FailOn::FinishLaunch, 1 ; "launch finish")]
#[tokio::test]
async fn test_failures_are_contained(fail_on: FailOn, expected_errors: usize) -> Result<()> {
    test_init();

    let client = RecordingClient::new().failing(fail_on);
    let stats = report_example_spec(local_bridge(&client), 1).await?;

    assert_eq!(stats.errors, expected_errors);
    // Every test is still reported.
    let test_starts = client
        .calls()
        .iter()
        .filter(|call| {
            matches!(
                call,
                RecordedCall::StartItem { payload, .. } if payload.item_type == ItemType::Step
            )
        })
        .count();
    assert_eq!(test_starts, EXAMPLE_SPEC.all_tests().len());
    assert_eq!(
        client.describe_calls().last().map(String::as_str),
        Some("finish launch launch-1")
    );

    Ok(())
}

#[tokio::test]
async fn test_failed_suite_start_reparents_children() -> Result<()> {
    test_init();

    let client = RecordingClient::new().failing(FailOn::StartItem("Check Cypress page".into()));
    report_example_spec(local_bridge(&client), 1).await?;

    let described = client.describe_calls();
    assert_eq!(
        described[2..4].to_vec(),
        vec![
            "start suite `Check Cypress page` as item-2 under item-1",
            "start suite `Check content Cypress example page` as item-3 under launch-1",
        ]
    );
    ensure!(
        !described.contains(&"finish item-2".to_owned()),
        "the failed suite is never finished"
    );

    Ok(())
}

#[tokio::test]
async fn test_repeated_runs() -> Result<()> {
    test_init();

    let client = RecordingClient::new();
    let stats = report_example_spec(local_bridge(&client), 2).await?;

    let described = client.describe_calls();
    assert_eq!(described.len(), EXAMPLE_SPEC_CALLS.len() * 2);
    assert_eq!(
        described[EXAMPLE_SPEC_CALLS.len()],
        "start launch `Cypress example` as launch-2"
    );
    assert_eq!(described.last().map(String::as_str), Some("finish launch launch-2"));

    // Stats are for the last run only.
    assert_eq!(stats.launches, 1);
    assert_eq!(
        stats.logs_sent,
        EXAMPLE_SPEC
            .all_tests()
            .iter()
            .filter(|test| test.status == FixtureStatus::Fail)
            .count()
    );

    Ok(())
}
