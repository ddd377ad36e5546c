use crate::pipeline::{PipelineError, StepSelection};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Debian packaging in disposable Docker containers
#[derive(Parser, Debug)]
#[command(
    name = "deber",
    about = "Debian packaging in disposable Docker containers",
    version,
    long_about = "deber builds the Debian source package in the current directory inside a \
                  Docker container made for the distribution named in debian/changelog. \
                  Every step checks what is already done first, so re-running after a \
                  failure picks up where the previous run stopped.\n\n\
                  Examples:\n  \
                  deber\n  \
                  deber --exclude test\n  \
                  deber --include build,create,start\n  \
                  deber package\n  \
                  deber steps"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(
        long,
        global = true,
        value_delimiter = ',',
        value_name = "STEPS",
        help = "Run only steps whose name contains one of these"
    )]
    pub include: Vec<String>,

    #[arg(
        long,
        global = true,
        value_delimiter = ',',
        value_name = "STEPS",
        help = "Skip steps whose name contains one of these"
    )]
    pub exclude: Vec<String>,

    #[arg(
        short = 'C',
        long,
        global = true,
        value_name = "DIR",
        help = "Package source directory (defaults to current directory)"
    )]
    pub source_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Run every selected step (the default)")]
    Run,

    #[command(about = "Check if the package is already archived")]
    Check,

    #[command(about = "Build the image for the target distribution")]
    Build,

    #[command(about = "Create the build container")]
    Create,

    #[command(about = "Start the build container")]
    Start,

    #[command(about = "Move the upstream tarball into the build directory")]
    Tarball,

    #[command(about = "Index the local package archive")]
    Scan,

    #[command(about = "Update the package lists in the container")]
    Update,

    #[command(about = "Install build dependencies")]
    Deps,

    #[command(about = "Build the package")]
    Package,

    #[command(about = "Install and lint the built package")]
    Test,

    #[command(about = "Stop the build container")]
    Stop,

    #[command(about = "Remove the build container")]
    Remove,

    #[command(about = "Move the build output into the archive")]
    Archive,

    #[command(about = "List the steps in the order they run")]
    Steps,
}

impl Commands {
    /// Name of the step a per-step subcommand runs
    pub fn step_name(&self) -> Option<&'static str> {
        match self {
            Commands::Run | Commands::Steps => None,
            Commands::Check => Some("check"),
            Commands::Build => Some("build"),
            Commands::Create => Some("create"),
            Commands::Start => Some("start"),
            Commands::Tarball => Some("tarball"),
            Commands::Scan => Some("scan"),
            Commands::Update => Some("update"),
            Commands::Deps => Some("deps"),
            Commands::Package => Some("package"),
            Commands::Test => Some("test"),
            Commands::Stop => Some("stop"),
            Commands::Remove => Some("remove"),
            Commands::Archive => Some("archive"),
        }
    }
}

impl CliArgs {
    /// Steps to run for this invocation.
    ///
    /// The include/exclude conflict is reported even for per-step
    /// subcommands, before any other work. A per-step subcommand takes no
    /// filters at all.
    pub fn selection(&self) -> Result<StepSelection, PipelineError> {
        let filtered = StepSelection::from_filters(&self.include, &self.exclude)?;
        match self.command.as_ref().and_then(Commands::step_name) {
            Some(step) if !self.include.is_empty() || !self.exclude.is_empty() => {
                Err(PipelineError::FilterWithStepCommand(step.to_string()))
            }
            Some(step) => Ok(StepSelection::only(step)),
            None => Ok(filtered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::STEP_NAMES;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_runs_everything() {
        let args = CliArgs::parse_from(["deber"]);
        assert!(args.command.is_none());
        assert_eq!(args.selection().unwrap(), StepSelection::All);
    }

    #[test]
    fn test_include_is_comma_separated() {
        let args = CliArgs::parse_from(["deber", "--include", "build,create", "--include", "start"]);
        assert_eq!(args.include, vec!["build", "create", "start"]);
        assert_eq!(
            args.selection().unwrap(),
            StepSelection::Include(vec![
                "build".to_string(),
                "create".to_string(),
                "start".to_string()
            ])
        );
    }

    #[test]
    fn test_include_and_exclude_conflict() {
        let args = CliArgs::parse_from(["deber", "--include", "build", "--exclude", "test"]);
        assert!(matches!(
            args.selection(),
            Err(PipelineError::ConflictingSelection)
        ));
    }

    #[test]
    fn test_step_subcommand_selects_one_step() {
        let args = CliArgs::parse_from(["deber", "package"]);
        assert_eq!(args.command, Some(Commands::Package));
        assert_eq!(args.selection().unwrap(), StepSelection::only("package"));
    }

    #[test]
    fn test_step_subcommand_rejects_filters() {
        let args = CliArgs::parse_from(["deber", "deps", "--exclude", "deps"]);
        assert!(matches!(
            args.selection(),
            Err(PipelineError::FilterWithStepCommand(ref step)) if step == "deps"
        ));

        let args = CliArgs::parse_from(["deber", "--include", "build", "package"]);
        assert!(matches!(
            args.selection(),
            Err(PipelineError::FilterWithStepCommand(ref step)) if step == "package"
        ));
    }

    #[test]
    fn test_run_subcommand_accepts_filters() {
        let args = CliArgs::parse_from(["deber", "run", "--exclude", "test"]);
        assert_eq!(
            args.selection().unwrap(),
            StepSelection::Exclude(vec!["test".to_string()])
        );
    }

    #[test]
    fn test_every_step_has_a_subcommand() {
        for name in STEP_NAMES {
            let args = CliArgs::parse_from(["deber", name]);
            let command = args.command.expect("subcommand");
            assert_eq!(command.step_name(), Some(name));
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from(["deber", "run", "-C", "/tmp/pkg", "--no-color", "-v"]);
        assert_eq!(args.command, Some(Commands::Run));
        assert_eq!(args.source_dir, Some(PathBuf::from("/tmp/pkg")));
        assert!(args.no_color);
        assert!(args.verbose);
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let result = CliArgs::try_parse_from(["deber", "-v", "-q"]);
        assert!(result.is_err());
    }
}
