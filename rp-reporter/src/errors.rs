// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by rp-reporter.

use crate::config::HookReporting;
use camino::{Utf8Path, Utf8PathBuf};
use config::ConfigError;
use smol_str::SmolStr;
use std::{error, fmt};
use thiserror::Error;

/// An error that occurred while parsing the reporter config.
#[derive(Debug, Error)]
#[error("failed to parse rp-reporter config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file that failed to parse.
    pub fn config_file(&self) -> &Utf8Path {
        &self.config_file
    }

    /// Returns the kind of error that occurred.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a config.
///
/// Returned by [`ConfigParseError::kind`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),
}

/// Error returned while parsing a [`HookReporting`] value from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized value for hooks: {input}\n(known values: {})",
    HookReporting::variants().join(", "),
)]
pub struct HookReportingParseError {
    input: String,
}

impl HookReportingParseError {
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

/// An error returned by a [`ReportClient`](crate::client::ReportClient) call.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ClientError {
    message: String,
    #[source]
    source: Option<Box<dyn error::Error + Send + Sync>>,
}

impl ClientError {
    /// Creates a new client error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new client error caused by `source`.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the message for this error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A reporting operation, used to attribute errors and diagnostics.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    /// Starting the launch.
    StartLaunch,
    /// Finishing the launch.
    FinishLaunch,
    /// Starting a suite item.
    StartSuite,
    /// Finishing a suite item.
    FinishSuite,
    /// Starting a test item.
    StartTest,
    /// Finishing a test item.
    FinishTest,
    /// Starting a hook item.
    StartHook,
    /// Finishing a hook item.
    FinishHook,
    /// Sending the failure log of a test.
    SendLog,
}

impl Operation {
    /// Returns a short description of this operation.
    pub fn to_static_str(self) -> &'static str {
        match self {
            Operation::StartLaunch => "start launch",
            Operation::FinishLaunch => "finish launch",
            Operation::StartSuite => "start suite",
            Operation::FinishSuite => "finish suite",
            Operation::StartTest => "start test",
            Operation::FinishTest => "finish test",
            Operation::StartHook => "start hook",
            Operation::FinishHook => "finish hook",
            Operation::SendLog => "send log",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_static_str())
    }
}

/// An error that occurred while reporting a single run event.
///
/// These errors never reach the test engine: the
/// [`ReportBridge`](crate::bridge::ReportBridge) logs them and moves on to
/// the next event.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportEventError {
    /// The reporting service rejected a call, or the call failed to complete.
    #[error("failed to {operation} `{title}`")]
    Client {
        /// The operation that failed.
        operation: Operation,
        /// The title of the node being reported.
        title: SmolStr,
        /// The underlying error.
        #[source]
        error: ClientError,
    },

    /// No report item is registered for the node, typically because its start
    /// was skipped or failed.
    #[error("cannot {operation} `{title}`: no report item is registered for it")]
    MissingHandle {
        /// The operation that was skipped.
        operation: Operation,
        /// The title of the node being reported.
        title: SmolStr,
    },

    /// The launch was never started, or failed to start.
    #[error("cannot {operation} `{title}`: the launch is not running")]
    MissingLaunch {
        /// The operation that was skipped.
        operation: Operation,
        /// The title of the node being reported.
        title: SmolStr,
    },
}

impl ReportEventError {
    /// Returns the operation this error is attributed to.
    pub fn operation(&self) -> Operation {
        match self {
            ReportEventError::Client { operation, .. }
            | ReportEventError::MissingHandle { operation, .. }
            | ReportEventError::MissingLaunch { operation, .. } => *operation,
        }
    }

    /// Returns the title of the node this error is attributed to.
    pub fn title(&self) -> &str {
        match self {
            ReportEventError::Client { title, .. }
            | ReportEventError::MissingHandle { title, .. }
            | ReportEventError::MissingLaunch { title, .. } => title,
        }
    }
}

/// Displays an error along with its chain of sources on a single line.
pub struct DisplayErrorChain<E>(E);

impl<E: error::Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self(error)
    }
}

impl<E: error::Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(error) = source {
            write!(f, ": {error}")?;
            source = error.source();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_error_chain() {
        let io_error = std::io::Error::other("connection reset");
        let error = ReportEventError::Client {
            operation: Operation::StartSuite,
            title: "Check Cypress page".into(),
            error: ClientError::with_source("POST /item failed", io_error),
        };
        assert_eq!(
            DisplayErrorChain::new(&error).to_string(),
            "failed to start suite `Check Cypress page`: POST /item failed: connection reset"
        );
        assert_eq!(error.operation(), Operation::StartSuite);
        assert_eq!(error.title(), "Check Cypress page");
    }

    #[test]
    fn missing_handle_message() {
        let error = ReportEventError::MissingHandle {
            operation: Operation::FinishTest,
            title: "t1".into(),
        };
        assert_eq!(
            DisplayErrorChain::new(&error).to_string(),
            "cannot finish test `t1`: no report item is registered for it"
        );
    }
}
