// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{Attribute, ItemStatus, ItemType, LogLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// The maximum length of an item name, in characters.
///
/// Longer names are cut down to this length by [`truncate_name`].
pub const MAX_NAME_LEN: usize = 255;

/// Truncates `name` to at most [`MAX_NAME_LEN`] characters.
///
/// Truncation happens on character boundaries. Names that already fit are
/// returned unchanged, so truncating twice is the same as truncating once.
pub fn truncate_name(name: &str) -> SmolStr {
    match name.char_indices().nth(MAX_NAME_LEN) {
        Some((end, _)) => SmolStr::new(&name[..end]),
        None => SmolStr::new(name),
    }
}

/// The payload for starting a launch.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartLaunch {
    /// The launch name.
    pub name: String,

    /// A free-form description of the launch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Attributes attached to the launch.
    #[serde(default)]
    pub attributes: Vec<Attribute>,

    /// The time at which the run started.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
}

/// The payload for finishing a launch.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishLaunch {
    /// The time at which the run ended.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end_time: DateTime<Utc>,
}

/// The payload for starting a report item.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartItem {
    /// The type of item.
    #[serde(rename = "type")]
    pub item_type: ItemType,

    /// The item name, at most [`MAX_NAME_LEN`] characters long.
    pub name: SmolStr,

    /// A free-form description of the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Attributes attached to the item.
    #[serde(default)]
    pub attributes: Vec<Attribute>,

    /// The time at which the item started.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
}

impl StartItem {
    /// Creates a new start-item payload with no description or attributes.
    ///
    /// `name` is truncated to [`MAX_NAME_LEN`] characters.
    pub fn new(item_type: ItemType, name: &str, start_time: DateTime<Utc>) -> Self {
        Self {
            item_type,
            name: truncate_name(name),
            description: None,
            attributes: Vec::new(),
            start_time,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// The payload for finishing a report item.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishItem {
    /// The time at which the item ended.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end_time: DateTime<Utc>,

    /// The final status. If absent, the service derives it from the item's
    /// children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

/// A log entry attached to a report item.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// The log message.
    pub message: String,

    /// The log level.
    pub level: LogLevel,

    /// The time of the log entry.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
}

/// A binary attachment sent along with a [`LogEntry`], typically a screenshot.
#[derive(Clone, Eq, PartialEq)]
pub struct Attachment {
    /// The file name shown by the service.
    pub name: String,

    /// The MIME type of `content`.
    pub mime_type: String,

    /// The raw attachment bytes.
    pub content: Vec<u8>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("content", &format_args!("<{} bytes>", self.content.len()))
            .finish()
    }
}
