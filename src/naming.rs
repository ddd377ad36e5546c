//! Deterministic resource naming
//!
//! Every identifier the pipeline touches (image, container, host directories) is
//! derived from the package's changelog entry. Re-running the tool on the same
//! package therefore addresses exactly the same container, image and paths,
//! which is what lets each step decide whether its work is already done.

use std::path::{Path, PathBuf};

/// Command context embedded in every generated identifier
pub const PROGRAM: &str = "deber";

/// Concrete identifiers for one package build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    /// Build image, shared by every package targeting the same distribution
    pub image: String,

    /// Container dedicated to this package version
    pub container: String,

    /// Package source tree (contains `debian/`)
    pub source_dir: PathBuf,

    /// Directory holding the upstream tarball before the `tarball` step
    pub source_parent_dir: PathBuf,

    /// Host directory mounted as the container's build root
    pub build_dir: PathBuf,

    /// Local apt repository for the target distribution
    pub archive_dir: PathBuf,

    /// Final resting place of a finished build
    pub archive_package_dir: PathBuf,
}

impl ResourceNames {
    /// Computes the names for a package.
    ///
    /// `home` is the root of the build and archive trees. Both live under it so
    /// the archive step can move a build with a single rename.
    pub fn new(
        program: &str,
        dist: &str,
        source: &str,
        version: &str,
        source_dir: &Path,
        home: &Path,
    ) -> Self {
        let dist = escape_component(dist);
        let source = escape_component(source);
        let version = escape_component(version);

        let container = format!("{}_{}_{}_{}", program, dist, source, version);
        let image = format!("{}:{}", program, dist);

        let source_parent_dir = source_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| source_dir.to_path_buf());

        let build_dir = home.join("build").join(&container);
        let archive_dir = home.join("archive").join(&dist);
        let archive_package_dir = archive_dir.join(&source).join(&version);

        Self {
            image,
            container,
            source_dir: source_dir.to_path_buf(),
            source_parent_dir,
            build_dir,
            archive_dir,
            archive_package_dir,
        }
    }
}

/// Rewrites one name component into the characters Docker accepts in
/// container names and image tags (`[A-Za-z0-9_.-]`).
///
/// The mapping is injective, so `2.0+dfsg-1` and `2.0-dfsg-1` never share a
/// container. An `_` in the output is always either a component separator or
/// the start of a `_-` escape:
///
/// | input | output |
/// |---|---|
/// | `:` (epoch) | `_-e` |
/// | `~` | `_-t` |
/// | `+` | `_-p` |
/// | `_` | `_-u` |
/// | leading `.` / `-` | `_-d` / `_-h` |
/// | anything else | `_-x<hex>x` |
pub fn escape_component(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            c if c.is_ascii_alphanumeric() => escaped.push(c),
            '.' | '-' if i > 0 => escaped.push(c),
            '.' => escaped.push_str("_-d"),
            '-' => escaped.push_str("_-h"),
            ':' => escaped.push_str("_-e"),
            '~' => escaped.push_str("_-t"),
            '+' => escaped.push_str("_-p"),
            '_' => escaped.push_str("_-u"),
            other => escaped.push_str(&format!("_-x{:x}x", other as u32)),
        }
    }
    escaped
}
