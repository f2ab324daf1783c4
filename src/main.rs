mod cli;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cli::convert::{cmd_convert, cmd_examine, ConvertArgs, ExamineArgs};
use cli::lookup::{cmd_lookup, LookupArgs};

#[derive(Parser)]
#[command(
    name = "hipify",
    version,
    about = "Translate CUDA sources to HIP"
)]
struct Cli {
    /// Log engine decisions (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert CUDA files to HIP
    Convert(ConvertArgs),
    /// Report what would be converted, without writing anything
    Examine(ExamineArgs),
    /// Show what a CUDA name or header maps to
    Lookup(LookupArgs),
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Convert(args) => cmd_convert(args),
        Command::Examine(args) => cmd_examine(args),
        Command::Lookup(args) => cmd_lookup(args),
    }
}
