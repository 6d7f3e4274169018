// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod example_spec;
pub mod models;
