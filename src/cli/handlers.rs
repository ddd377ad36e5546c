use super::commands::CliArgs;
use crate::config::DeberConfig;
use crate::debian::PackageMetadata;
use crate::environment::DockerEnvironment;
use crate::naming::{ResourceNames, PROGRAM};
use crate::pipeline::{catalogue, StepContext, StepPipeline, StepSelection};
use crate::progress::{ConsoleHandler, LoggingHandler, ProgressHandler};
use anyhow::{Context, Result};
use console::style;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Everything resolved before the first step runs
struct Invocation {
    selection: StepSelection,
    config: DeberConfig,
    metadata: PackageMetadata,
    names: ResourceNames,
}

/// Runs the pipeline and returns the process exit code
pub async fn handle_run(args: &CliArgs) -> i32 {
    let invocation = match prepare(args) {
        Ok(invocation) => invocation,
        Err(e) => {
            report_error(args, &e);
            return 1;
        }
    };

    let env = match DockerEnvironment::connect(
        invocation.config.image_max_age_days,
        invocation.config.stop_timeout(),
    )
    .await
    .context("Failed to connect to Docker")
    {
        Ok(env) => env,
        Err(e) => {
            report_error(args, &e);
            return 1;
        }
    };

    let ctx = StepContext::new(
        &env,
        &invocation.metadata,
        &invocation.names,
        &invocation.config,
    );
    let pipeline = StepPipeline::new(progress_handler(args));

    match pipeline.run(&invocation.selection, &ctx).await {
        Ok(report) => {
            if let Some(step) = report.halted_by {
                info!(step, "Run ended early, package already archived");
            }
            0
        }
        Err(e) => {
            // The progress handler has already shown the failing step
            error!(error = %e, "Pipeline failed");
            1
        }
    }
}

/// Prints the catalogue with descriptions
pub fn handle_steps(args: &CliArgs) -> i32 {
    let color = !args.no_color;
    for (index, step) in catalogue().iter().enumerate() {
        let name = if color {
            style(step.name()).bold().to_string()
        } else {
            step.name().to_string()
        };
        println!("{:>2}. {} - {}", index + 1, name, step.title());
        for line in step.description() {
            println!("      {}", line);
        }
    }
    0
}

fn prepare(args: &CliArgs) -> Result<Invocation> {
    let selection = args.selection()?;

    let config = DeberConfig::default();
    config.validate().context("Invalid configuration")?;
    let home = config.home_dir()?.clone();
    debug!("{}", config);

    let source_dir = resolve_source_dir(args)?;
    let metadata = PackageMetadata::from_source_dir(&source_dir)
        .context("Failed to read package metadata")?;
    debug!(
        source = %metadata.source_name,
        version = %metadata.package_version,
        distribution = %metadata.target_distribution,
        tarball = %metadata.tarball_file_name,
        "Package metadata"
    );

    let names = ResourceNames::new(
        PROGRAM,
        &metadata.target_distribution,
        &metadata.source_name,
        &metadata.package_version,
        &source_dir,
        &home,
    );
    debug!(container = %names.container, image = %names.image, "Resource names");

    Ok(Invocation {
        selection,
        config,
        metadata,
        names,
    })
}

fn resolve_source_dir(args: &CliArgs) -> Result<PathBuf> {
    let dir = match &args.source_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    dir.canonicalize()
        .with_context(|| format!("Source directory {} is not accessible", dir.display()))
}

fn progress_handler(args: &CliArgs) -> Box<dyn ProgressHandler> {
    if args.quiet {
        Box::new(LoggingHandler)
    } else {
        Box::new(ConsoleHandler::new(!args.no_color))
    }
}

fn report_error(args: &CliArgs, e: &anyhow::Error) {
    let prefix = format!("{}:error:", PROGRAM);
    if args.no_color {
        eprintln!("{} {:#}", prefix, e);
    } else {
        eprintln!("{} {:#}", style(prefix).red(), e);
    }
}
