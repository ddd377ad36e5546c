//! Debian source package metadata

pub mod changelog;

pub use changelog::{ChangelogError, PackageMetadata};
