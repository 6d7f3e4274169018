// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{error, fmt};

/// An error that occurs while parsing an [`Attribute`](crate::Attribute) from a string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttributeParseError {
    input: String,
}

impl AttributeParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the input that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for AttributeParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "invalid attribute `{}`: expected `value` or `key:value` with a non-empty value",
            self.input
        )
    }
}

impl error::Error for AttributeParseError {}
