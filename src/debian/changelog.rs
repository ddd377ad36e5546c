//! Changelog parsing
//!
//! Only the header of the topmost entry matters for a build:
//!
//! ```text
//! foo (1.0-1) bullseye; urgency=medium
//! ```
//!
//! gives the source name, the version and the target distribution. The
//! upstream tarball is located next to the source tree by naming convention.

use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Location of the changelog relative to the source directory
pub const CHANGELOG_PATH: &str = "debian/changelog";

#[derive(Debug, Error)]
pub enum ChangelogError {
    #[error("Changelog not found: {0}")]
    NotFound(PathBuf),

    #[error("Malformed changelog header '{line}': {reason}")]
    Malformed { line: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Package identity, read once per invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub source_name: String,
    pub package_version: String,
    pub target_distribution: String,
    /// Empty when the package has no separate upstream tarball
    pub tarball_file_name: String,
}

impl PackageMetadata {
    pub fn new(
        source_name: impl Into<String>,
        package_version: impl Into<String>,
        target_distribution: impl Into<String>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            package_version: package_version.into(),
            target_distribution: target_distribution.into(),
            tarball_file_name: String::new(),
        }
    }

    pub fn with_tarball(mut self, tarball_file_name: impl Into<String>) -> Self {
        self.tarball_file_name = tarball_file_name.into();
        self
    }

    /// Reads `debian/changelog` under `source_dir` and looks for the upstream
    /// tarball in its parent directory.
    pub fn from_source_dir(source_dir: &Path) -> Result<Self, ChangelogError> {
        let path = source_dir.join(CHANGELOG_PATH);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ChangelogError::NotFound(path.clone()),
            _ => ChangelogError::Io {
                path: path.clone(),
                source: e,
            },
        })?;

        let metadata = Self::parse(&content)?;
        let tarball = match source_dir.parent() {
            Some(parent) => metadata.find_tarball(parent),
            None => None,
        };

        Ok(match tarball {
            Some(name) => metadata.with_tarball(name),
            None => metadata,
        })
    }

    /// Parses the header of the first changelog entry.
    pub fn parse(content: &str) -> Result<Self, ChangelogError> {
        let line = content
            .lines()
            .map(str::trim_end)
            .find(|l| !l.trim().is_empty())
            .ok_or_else(|| ChangelogError::Malformed {
                line: String::new(),
                reason: "changelog is empty".to_string(),
            })?;

        let header_re =
            Regex::new(r"^([a-z0-9][a-z0-9+.\-]+) \(([^()\s]+)\) ([^;]+);").expect("valid regex");

        let caps = header_re
            .captures(line)
            .ok_or_else(|| ChangelogError::Malformed {
                line: line.to_string(),
                reason: "expected '<source> (<version>) <distribution>; ...'".to_string(),
            })?;

        let target = caps[3]
            .split_whitespace()
            .next()
            .ok_or_else(|| ChangelogError::Malformed {
                line: line.to_string(),
                reason: "no target distribution".to_string(),
            })?;

        Ok(Self::new(&caps[1], &caps[2], target))
    }

    /// Upstream part of the version: no epoch, no Debian revision.
    ///
    /// Returns `None` for native packages, which have no `.orig` tarball.
    pub fn upstream_version(&self) -> Option<&str> {
        let (upstream, _revision) = self.package_version.rsplit_once('-')?;
        Some(match upstream.split_once(':') {
            Some((_epoch, rest)) => rest,
            None => upstream,
        })
    }

    fn find_tarball(&self, dir: &Path) -> Option<String> {
        let upstream = self.upstream_version()?;
        let prefix = format!("{}_{}.orig.tar.", self.source_name, upstream);

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "Cannot list source parent directory");
                return None;
            }
        };

        let mut candidates: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(&prefix) && !name.ends_with(".asc"))
            .collect();
        candidates.sort();

        let found = candidates.into_iter().next();
        debug!(tarball = ?found, "Upstream tarball lookup");
        found
    }
}
