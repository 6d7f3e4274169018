// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The suite tree of the example browser spec: one top-level suite with two
//! nested groups, `before each` hooks, a skipped test and two failures.

use crate::models::{FixtureStatus, HookFixture, SuiteFixture, TestFixture};
use iddqd::id_ord_map;
use std::sync::LazyLock;

pub static EXAMPLE_SPEC: LazyLock<SuiteFixture> = LazyLock::new(|| {
    // The engine's root suite is untitled.
    SuiteFixture::new("r01", "").with_suites(id_ord_map! {
        SuiteFixture::new("r02", "Example Cypress Test").with_suites(id_ord_map! {
            SuiteFixture::new("r03", "Check Cypress page").with_suites(id_ord_map! {
                SuiteFixture::new("r04", "Check content Cypress example page")
                    .with_hooks(id_ord_map! {
                        HookFixture::new(
                            "h1",
                            "\"before each\" hook: Visit Cypress page 1",
                            "before each",
                        ),
                    })
                    .with_tests(id_ord_map! {
                        TestFixture::new("r05", "should contain Cypress", FixtureStatus::Pass),
                        TestFixture::new("r06", "should contain Commands", FixtureStatus::Pass),
                        TestFixture::new(
                            "r07",
                            "should contain gfkjdgkjdfgl (failed)",
                            FixtureStatus::Fail,
                        ),
                    }),
                SuiteFixture::new("r08", "Check url Cypress example page")
                    .with_hooks(id_ord_map! {
                        HookFixture::new(
                            "h2",
                            "\"before each\" hook: Visit Cypress page 2",
                            "before each",
                        ),
                    })
                    .with_tests(id_ord_map! {
                        TestFixture::new("r09", "should contain cypress", FixtureStatus::Pass),
                        TestFixture::new("r10", "should contain example", FixtureStatus::Pass),
                        TestFixture::new("r11", "skipped test", FixtureStatus::Pending),
                    }),
            }),
            SuiteFixture::new("r12", "Check content of Google")
                .with_hooks(id_ord_map! {
                    HookFixture::new(
                        "h3",
                        "\"before each\" hook: Visit Google page",
                        "before each",
                    ),
                })
                .with_tests(id_ord_map! {
                    TestFixture::new("r13", "url should contain google", FixtureStatus::Pass),
                    TestFixture::new(
                        "r14",
                        "check contain of google page (failed)",
                        FixtureStatus::Fail,
                    ),
                }),
        }),
    })
});
