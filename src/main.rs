use deber::cli::commands::{CliArgs, Commands};
use deber::cli::handlers::{handle_run, handle_steps};
use deber::util::{init_logging, LoggingConfig};
use deber::VERSION;

use clap::Parser;
use tracing::debug;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging(LoggingConfig::from_flags(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
    ));

    debug!("deber v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Some(Commands::Steps) => handle_steps(&args),
        _ => handle_run(&args).await,
    };

    std::process::exit(exit_code);
}
