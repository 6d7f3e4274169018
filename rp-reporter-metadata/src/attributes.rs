// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::AttributeParseError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A key-value attribute (or a bare tag, if `key` is `None`) attached to a
/// launch or report item.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    /// The attribute key. Attributes without a key are displayed as tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// The attribute value.
    pub value: String,

    /// System attributes are hidden from the service's UI.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub system: bool,
}

impl Attribute {
    /// Creates a new key-value attribute.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: value.into(),
            system: false,
        }
    }

    /// Creates a new attribute without a key.
    pub fn tag(value: impl Into<String>) -> Self {
        Self {
            key: None,
            value: value.into(),
            system: false,
        }
    }
}

impl FromStr for Attribute {
    type Err = AttributeParseError;

    /// Parses `value` or `key:value`. Only the first `:` separates the key.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (key, value) = match input.split_once(':') {
            Some((key, value)) => (Some(key.trim()), value.trim()),
            None => (None, input.trim()),
        };
        if value.is_empty() {
            return Err(AttributeParseError::new(input));
        }

        Ok(Self {
            key: key.filter(|key| !key.is_empty()).map(str::to_owned),
            value: value.to_owned(),
            system: false,
        })
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{key}:{}", self.value),
            None => f.write_str(&self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("smoke", None, "smoke" ; "tag")]
    #[test_case("env:ci", Some("env"), "ci" ; "key value")]
    #[test_case("url:http://x", Some("url"), "http://x" ; "value with colon")]
    #[test_case(":orphan", None, "orphan" ; "empty key")]
    fn parse_valid(input: &str, key: Option<&str>, value: &str) {
        let attribute: Attribute = input.parse().expect("valid attribute");
        assert_eq!(attribute.key.as_deref(), key);
        assert_eq!(attribute.value, value);
        assert!(!attribute.system);
    }

    #[test_case("" ; "empty")]
    #[test_case("env:" ; "empty value")]
    #[test_case("  " ; "whitespace")]
    fn parse_invalid(input: &str) {
        let error = input.parse::<Attribute>().unwrap_err();
        assert_eq!(error.input(), input);
    }

    #[test]
    fn serialize_omits_defaults() {
        let json = serde_json::to_string(&Attribute::tag("smoke")).unwrap();
        assert_eq!(json, r#"{"value":"smoke"}"#);

        let mut attribute = Attribute::new("agent", "rp-reporter");
        attribute.system = true;
        let json = serde_json::to_string(&attribute).unwrap();
        assert_eq!(json, r#"{"key":"agent","value":"rp-reporter","system":true}"#);
    }
}
