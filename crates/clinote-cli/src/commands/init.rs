use anyhow::{Context, Result};
use clap::Args;
use clinote_core::config::ClinoteConfig;

use crate::data_dir::DataDir;

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config with defaults
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, dir: &DataDir) -> Result<()> {
    if dir.config_path().exists() && !args.force {
        println!("clinote is already initialized in {}.", dir.root().display());
        println!("Use --force to reset the config.");
        return Ok(());
    }

    std::fs::create_dir_all(dir.root())
        .with_context(|| format!("Failed to create {}", dir.root().display()))?;
    dir.save_config(&ClinoteConfig::default())?;

    println!("clinote initialized in {}.", dir.root().display());
    println!();
    println!("Next steps:");
    println!("  export GEMINI_API_KEY=...          Enable report generation");
    println!("  clinote run session.jsonl          Replay an observation script");
    println!("  clinote history list               List saved sessions");
    Ok(())
}
