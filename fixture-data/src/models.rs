// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data models for fixture information.
//!
//! Fixture IDs are zero-padded so that ordered maps iterate in declaration
//! order.

use iddqd::{IdOrdItem, IdOrdMap, id_upcast};

#[derive(Debug)]
pub struct SuiteFixture {
    pub id: &'static str,
    pub title: &'static str,
    pub hooks: IdOrdMap<HookFixture>,
    pub tests: IdOrdMap<TestFixture>,
    pub suites: IdOrdMap<SuiteFixture>,
}

impl SuiteFixture {
    pub fn new(id: &'static str, title: &'static str) -> Self {
        Self {
            id,
            title,
            hooks: IdOrdMap::new(),
            tests: IdOrdMap::new(),
            suites: IdOrdMap::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: IdOrdMap<HookFixture>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_tests(mut self, tests: IdOrdMap<TestFixture>) -> Self {
        self.tests = tests;
        self
    }

    pub fn with_suites(mut self, suites: IdOrdMap<SuiteFixture>) -> Self {
        self.suites = suites;
        self
    }

    /// Returns all tests in this suite and its descendants, depth-first.
    pub fn all_tests(&self) -> Vec<&TestFixture> {
        let mut tests: Vec<_> = self.tests.iter().collect();
        for suite in self.suites.iter() {
            tests.extend(suite.all_tests());
        }
        tests
    }

    /// Returns the number of titled suites, including this one.
    pub fn titled_suite_count(&self) -> usize {
        let own = usize::from(!self.title.is_empty());
        own + self
            .suites
            .iter()
            .map(SuiteFixture::titled_suite_count)
            .sum::<usize>()
    }
}

impl IdOrdItem for SuiteFixture {
    type Key<'a> = &'static str;
    fn key(&self) -> Self::Key<'_> {
        self.id
    }
    id_upcast!();
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TestFixture {
    pub id: &'static str,
    pub title: &'static str,
    pub status: FixtureStatus,
}

impl TestFixture {
    pub fn new(id: &'static str, title: &'static str, status: FixtureStatus) -> Self {
        Self { id, title, status }
    }
}

impl IdOrdItem for TestFixture {
    type Key<'a> = &'static str;
    fn key(&self) -> Self::Key<'_> {
        self.id
    }
    id_upcast!();
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FixtureStatus {
    Pass,
    Fail,
    Pending,
}

impl FixtureStatus {
    pub fn is_failure(self) -> bool {
        matches!(self, FixtureStatus::Fail)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HookFixture {
    pub id: &'static str,
    pub title: &'static str,
    pub hook_name: &'static str,
}

impl HookFixture {
    pub fn new(id: &'static str, title: &'static str, hook_name: &'static str) -> Self {
        Self {
            id,
            title,
            hook_name,
        }
    }
}

impl IdOrdItem for HookFixture {
    type Key<'a> = &'static str;
    fn key(&self) -> Self::Key<'_> {
        self.id
    }
    id_upcast!();
}
