// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Data exchanged between [rp-reporter](https://docs.rs/rp-reporter) and a
//! ReportPortal-style reporting service.
//!
//! This crate has no opinions about transport: it only describes the handles
//! a client hands out, the closed enumerations the service understands and
//! the JSON payloads of each call. Timestamps are serialized as milliseconds
//! since the Unix epoch.

mod attributes;
mod errors;
mod handles;
mod kinds;
mod payloads;

pub use attributes::*;
pub use errors::*;
pub use handles::*;
pub use kinds::*;
pub use payloads::*;
