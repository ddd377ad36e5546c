// Build steps, one file per step, numbered in canonical order.
//
// Later steps rely on what earlier ones leave behind (`package` needs the
// container from `create` and `start`), so the catalogue order is fixed.

#[path = "01_check.rs"]
pub mod check;
#[path = "02_build.rs"]
pub mod build;
#[path = "03_create.rs"]
pub mod create;
#[path = "04_start.rs"]
pub mod start;
#[path = "05_tarball.rs"]
pub mod tarball;
#[path = "06_scan.rs"]
pub mod scan;
#[path = "07_update.rs"]
pub mod update;
#[path = "08_deps.rs"]
pub mod deps;
#[path = "09_package.rs"]
pub mod package;
#[path = "10_test.rs"]
pub mod test;
#[path = "11_stop.rs"]
pub mod stop;
#[path = "12_remove.rs"]
pub mod remove;
#[path = "13_archive.rs"]
pub mod archive;

use super::step::BuildStep;

/// Step names in canonical order
pub const STEP_NAMES: [&str; 13] = [
    "check", "build", "create", "start", "tarball", "scan", "update", "deps", "package", "test",
    "stop", "remove", "archive",
];

/// Every step, in the order they must run
pub fn catalogue() -> Vec<Box<dyn BuildStep>> {
    vec![
        Box::new(check::CheckStep),
        Box::new(build::BuildImageStep),
        Box::new(create::CreateStep),
        Box::new(start::StartStep),
        Box::new(tarball::TarballStep),
        Box::new(scan::ScanStep),
        Box::new(update::UpdateStep),
        Box::new(deps::DepsStep),
        Box::new(package::PackageStep),
        Box::new(test::TestStep),
        Box::new(stop::StopStep),
        Box::new(remove::RemoveStep),
        Box::new(archive::ArchiveStep),
    ]
}
