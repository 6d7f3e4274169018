// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for [rp-reporter](https://github.com/rp-reporter/rp-reporter).
//!
//! rp-reporter mirrors the lifecycle of a running test suite onto a
//! ReportPortal-style reporting service. A test engine sends
//! [`RunEvent`](events::RunEvent)s through an
//! [`event_channel`](dispatch::event_channel), and a
//! [`ReportBridge`](bridge::ReportBridge) turns them into launch, item and log
//! calls on a [`ReportClient`](client::ReportClient).
//!
//! For the wire types shared with the reporting service, see
//! [`rp_reporter_metadata`].

pub mod artifacts;
pub mod bridge;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod events;
pub mod identity_map;
