//! Debian source package laid out in a temporary directory

use deber::naming::{ResourceNames, PROGRAM};
use deber::{DeberConfig, PackageMetadata};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct PackageFixture {
    _temp: TempDir,
    pub home: PathBuf,
    pub source_dir: PathBuf,
    pub metadata: PackageMetadata,
    pub names: ResourceNames,
    pub config: DeberConfig,
}

pub struct PackageBuilder {
    source: String,
    version: String,
    distribution: String,
    with_tarball: bool,
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self {
            source: "hello".to_string(),
            version: "1.0-1".to_string(),
            distribution: "bullseye".to_string(),
            with_tarball: true,
        }
    }

    pub fn source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn distribution(mut self, distribution: &str) -> Self {
        self.distribution = distribution.to_string();
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn native(mut self) -> Self {
        self.with_tarball = false;
        self
    }

    pub fn build(self) -> PackageFixture {
        let temp = TempDir::new().expect("temp dir");
        let home = temp.path().join("home");
        let packages = temp.path().join("packages");
        let source_dir = packages.join(format!("{}-src", self.source));
        fs::create_dir_all(source_dir.join("debian")).expect("source dir");

        let changelog = format!(
            "{} ({}) {}; urgency=medium\n\n  * Initial release.\n\n -- Jane Doe <jane@example.org>  Mon, 01 Jan 2024 00:00:00 +0000\n",
            self.source, self.version, self.distribution
        );
        fs::write(source_dir.join("debian/changelog"), changelog).expect("changelog");

        if self.with_tarball {
            let upstream = self.version.rsplit_once('-').map_or(self.version.as_str(), |(u, _)| u);
            let upstream = upstream.split_once(':').map_or(upstream, |(_, u)| u);
            fs::write(
                packages.join(format!("{}_{}.orig.tar.gz", self.source, upstream)),
                b"tarball",
            )
            .expect("tarball");
        }

        let metadata = PackageMetadata::from_source_dir(&source_dir).expect("metadata");
        let names = ResourceNames::new(
            PROGRAM,
            &metadata.target_distribution,
            &metadata.source_name,
            &metadata.package_version,
            &source_dir,
            &home,
        );
        let config = DeberConfig::new()
            .with_home(&home)
            .with_dpkg_buildpackage_flags("-tc")
            .with_lintian_flags("-i");

        PackageFixture {
            _temp: temp,
            home,
            source_dir,
            metadata,
            names,
            config,
        }
    }
}

impl PackageFixture {
    pub fn tarball_in_build_dir(&self) -> PathBuf {
        self.names.build_dir.join(&self.metadata.tarball_file_name)
    }

    pub fn tarball_in_parent_dir(&self) -> PathBuf {
        self.names
            .source_parent_dir
            .join(&self.metadata.tarball_file_name)
    }
}
