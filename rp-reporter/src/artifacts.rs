// Copyright (c) The rp-reporter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capturing artifacts, such as screenshots, for failed tests.

use camino::{Utf8Path, Utf8PathBuf};
use rp_reporter_metadata::Attachment;
use std::time::SystemTime;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Produces an attachment for a failed test.
///
/// `capture` is called synchronously from the bridge's async handlers, so it
/// blocks the task driving the bridge until it returns. Implementations that
/// scan large directories should keep that in mind.
pub trait ArtifactCapture: Send + Sync {
    /// Returns the artifact for the test named `name`, if there is one.
    fn capture(&self, name: &str) -> Option<Attachment>;
}

/// Never produces an artifact.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoArtifacts;

impl ArtifactCapture for NoArtifacts {
    fn capture(&self, _name: &str) -> Option<Attachment> {
        None
    }
}

impl<A: ArtifactCapture> ArtifactCapture for Option<A> {
    fn capture(&self, name: &str) -> Option<Attachment> {
        self.as_ref().and_then(|capture| capture.capture(name))
    }
}

/// Looks up screenshots written by the test engine to a directory.
///
/// Browser test runners write screenshots for failing tests as
/// `<title> (failed).png`, in a subdirectory per spec file. An image belongs to
/// a test if its file stem is the test title, optionally followed by
/// parenthesized suffixes such as `(failed)` or `(attempt 2)`. The most
/// recently modified such image is used.
#[derive(Clone, Debug)]
pub struct ScreenshotDir {
    root: Utf8PathBuf,
}

impl ScreenshotDir {
    const EXTENSIONS: &'static [(&'static str, &'static str)] = &[
        ("png", "image/png"),
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
    ];

    /// Creates a new `ScreenshotDir` rooted at `root`.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn find(&self, name: &str) -> Option<(Utf8PathBuf, &'static str)> {
        let prefix = sanitize_file_name(name);
        let mut best: Option<(SystemTime, Utf8PathBuf, &'static str)> = None;

        for entry in WalkDir::new(&self.root).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(path) = Utf8Path::from_path(entry.path()) else {
                continue;
            };
            let (Some(stem), Some(extension)) = (path.file_stem(), path.extension()) else {
                continue;
            };
            let Some(mime_type) = Self::EXTENSIONS
                .iter()
                .find(|(ext, _)| extension.eq_ignore_ascii_case(ext))
                .map(|(_, mime_type)| *mime_type)
            else {
                continue;
            };
            if !is_screenshot_of(stem, &prefix) {
                continue;
            }

            let modified = entry
                .metadata()
                .ok()
                .and_then(|metadata| metadata.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            if best
                .as_ref()
                .is_none_or(|(best_modified, _, _)| modified > *best_modified)
            {
                best = Some((modified, path.to_owned(), mime_type));
            }
        }

        best.map(|(_, path, mime_type)| (path, mime_type))
    }
}

impl ArtifactCapture for ScreenshotDir {
    fn capture(&self, name: &str) -> Option<Attachment> {
        let Some((path, mime_type)) = self.find(name) else {
            debug!(root = %self.root, name, "no screenshot found");
            return None;
        };

        match fs_err::read(&path) {
            Ok(content) => Some(Attachment {
                name: path.file_name().unwrap_or(name).to_owned(),
                mime_type: mime_type.to_owned(),
                content,
            }),
            Err(error) => {
                warn!("failed to read screenshot: {error}");
                None
            }
        }
    }
}

fn is_screenshot_of(stem: &str, title: &str) -> bool {
    match stem.strip_prefix(title) {
        Some(rest) => rest.is_empty() || rest.starts_with(" ("),
        None => false,
    }
}

/// Replaces characters that can't appear in file names, the way screenshot
/// writers do.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
