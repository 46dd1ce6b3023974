use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod data_dir;
mod output;
mod script;

#[derive(Parser)]
#[command(
    name = "clinote",
    version,
    about = "Turn clinical observation notes into narrative reports"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: output::OutputFormat,

    /// Directory holding config, history and exports
    #[arg(long, global = true, env = "CLINOTE_HOME", default_value = ".clinote")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: commands::Commands,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let dir = data_dir::DataDir::new(cli.data_dir);
    match &cli.command {
        commands::Commands::Init(args) => commands::init::run(args, &dir),
        commands::Commands::Run(args) => commands::run::run(args, &dir, cli.format),
        commands::Commands::Prompt(args) => commands::prompt::run(args, &dir, cli.format),
        commands::Commands::Tags => commands::tags::run(cli.format),
        commands::Commands::Theories(args) => commands::theories::run(args, &dir, cli.format),
        commands::Commands::History(args) => commands::history::run(args, &dir, cli.format),
        commands::Commands::Version => commands::version::run(),
    }
}
