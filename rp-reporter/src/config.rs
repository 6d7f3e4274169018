// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration support for rp-reporter.

use crate::{
    artifacts::ScreenshotDir,
    bridge::LaunchSettings,
    errors::{ConfigParseError, ConfigParseErrorKind, HookReportingParseError},
};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, builder::DefaultState};
use rp_reporter_metadata::{Attribute, StartLaunch};
use serde::Deserialize;
use std::{collections::BTreeSet, fmt, str::FromStr};
use tracing::warn;

/// Overall configuration for rp-reporter.
#[derive(Clone, Debug)]
pub struct ReporterConfig {
    workspace_root: Utf8PathBuf,
    inner: ReporterConfigDeserialize,
}

impl ReporterConfig {
    /// The default location of the config within the workspace root.
    pub const CONFIG_PATH: &'static str = ".config/rp-reporter.toml";

    /// Contains the default config as a TOML file.
    ///
    /// Workspace-specific configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Environment configuration uses this prefix, plus a _.
    pub const ENVIRONMENT_PREFIX: &'static str = "RP_REPORTER";

    /// Reads the config from the given file, or if not specified from
    /// `.config/rp-reporter.toml` in the workspace root, with environment
    /// variables layered on top.
    ///
    /// If no config file is specified and the workspace root doesn't have
    /// `.config/rp-reporter.toml`, uses the default config options.
    pub fn from_sources(
        workspace_root: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        Self::from_sources_with_env(
            workspace_root,
            config_file,
            Environment::with_prefix(Self::ENVIRONMENT_PREFIX),
        )
    }

    /// Returns the default config.
    pub fn default_config(workspace_root: impl Into<Utf8PathBuf>) -> Self {
        let config = Self::make_default_config()
            .build()
            .expect("default config is always valid");

        let mut unknown = BTreeSet::new();
        let inner: ReporterConfigDeserialize =
            serde_ignored::deserialize(config, |path: serde_ignored::Path| {
                unknown.insert(path.to_string());
            })
            .expect("default config is always valid");

        // The default config is shipped with the library, so it must not have
        // unknown keys.
        assert!(
            unknown.is_empty(),
            "found unknown keys in default config: {unknown:?}"
        );

        Self {
            workspace_root: workspace_root.into(),
            inner,
        }
    }

    /// Returns the workspace root that relative paths are resolved against.
    pub fn workspace_root(&self) -> &Utf8Path {
        &self.workspace_root
    }

    /// Returns the base URL of the reporting service API.
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Returns the project launches are created in.
    pub fn project(&self) -> &str {
        &self.inner.project
    }

    /// Returns the API token, if one was configured.
    pub fn token(&self) -> Option<&Token> {
        self.inner.token.as_ref()
    }

    /// Returns the launch name.
    pub fn launch_name(&self) -> &str {
        &self.inner.launch
    }

    /// Returns the launch description.
    pub fn description(&self) -> Option<&str> {
        self.inner
            .description
            .as_deref()
            .filter(|description| !description.is_empty())
    }

    /// Returns the launch attributes.
    pub fn attributes(&self) -> &[Attribute] {
        &self.inner.attributes
    }

    /// Returns what to do with hooks.
    pub fn hooks(&self) -> HookReporting {
        self.inner.hooks
    }

    /// Returns the screenshot directory, resolved against the workspace root.
    pub fn screenshots_dir(&self) -> Option<ScreenshotDir> {
        self.inner
            .screenshots_dir
            .as_ref()
            .map(|dir| ScreenshotDir::new(self.workspace_root.join(dir)))
    }

    /// Builds the payload for starting a launch at `start_time`.
    pub fn launch_payload(&self, start_time: DateTime<Utc>) -> StartLaunch {
        self.launch_settings().payload(start_time)
    }

    /// Returns the settings used to start a launch.
    pub fn launch_settings(&self) -> LaunchSettings {
        LaunchSettings::from(self)
    }

    // ---
    // Helper methods
    // ---

    fn from_sources_with_env(
        workspace_root: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
        env: Environment,
    ) -> Result<Self, ConfigParseError> {
        let workspace_root = workspace_root.into();

        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = workspace_root.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        let builder = Self::make_default_config().add_source(source).add_source(env);
        let (inner, unknown) = Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(&config_file, kind))?;

        if !unknown.is_empty() {
            let unknown = unknown.into_iter().collect::<Vec<_>>().join(", ");
            warn!("ignoring unknown configuration keys in `{config_file}`: {unknown}");
        }

        Ok(Self {
            workspace_root,
            inner,
        })
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<(ReporterConfigDeserialize, BTreeSet<String>), ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        let mut ignored = BTreeSet::new();
        let mut cb = |path: serde_ignored::Path| {
            ignored.insert(path.to_string());
        };
        let ignored_de = serde_ignored::Deserializer::new(config, &mut cb);
        let config: ReporterConfigDeserialize = serde_path_to_error::deserialize(ignored_de)
            .map_err(|error| {
                // serde_path_to_error already reports the key, so drop it from
                // the config error.
                let path = error.path().clone();
                let error = match error.into_inner() {
                    ConfigError::At { error, .. } => *error,
                    other => other,
                };
                ConfigParseErrorKind::DeserializeError(Box::new(serde_path_to_error::Error::new(
                    path, error,
                )))
            })?;

        Ok((config, ignored))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReporterConfigDeserialize {
    endpoint: String,
    project: String,
    #[serde(default)]
    token: Option<Token>,
    launch: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    attributes: Vec<Attribute>,
    hooks: HookReporting,
    #[serde(default)]
    screenshots_dir: Option<Utf8PathBuf>,
}

/// An API token. Never printed in debug output.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Returns the token as a string.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// What to do with hook events.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum HookReporting {
    /// Drop hook events.
    Ignore,

    /// Log hook events locally, without reporting them.
    #[default]
    Local,

    /// Report hooks as items of their own, under their suite.
    Remote,
}

impl HookReporting {
    /// String representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["ignore", "local", "remote"]
    }
}

impl FromStr for HookReporting {
    type Err = HookReportingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let val = match s {
            "ignore" => HookReporting::Ignore,
            "local" => HookReporting::Local,
            "remote" => HookReporting::Remote,
            other => return Err(HookReportingParseError::new(other)),
        };
        Ok(val)
    }
}

impl fmt::Display for HookReporting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookReporting::Ignore => write!(f, "ignore"),
            HookReporting::Local => write!(f, "local"),
            HookReporting::Remote => write!(f, "remote"),
        }
    }
}
