//! Registrar CLI - choose the container registry used by the API operator

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit_codes;

use commands::change::ChangeArgs;

#[derive(Parser)]
#[command(name = "registrar")]
#[command(version)]
#[command(about = "Configure the container registry used by the API operator", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Change the registry the operator pushes images to
    ///
    /// Without any registry flag the registry type and its inputs are asked
    /// for interactively. Passing any registry flag switches to batch mode,
    /// where --registry-type is required.
    Change(ChangeArgs),

    /// List the supported registry types and their flags
    List,
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match cli.command {
        Commands::Change(args) => commands::change::run(args).await,
        Commands::List => commands::list::run(),
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
