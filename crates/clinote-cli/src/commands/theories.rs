use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::data_dir::DataDir;
use crate::output::format::format_theories;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct TheoriesArgs {
    #[command(subcommand)]
    pub action: TheoriesAction,
}

#[derive(Subcommand)]
pub enum TheoriesAction {
    /// List the configured theory labels
    List,
    /// Add a theory label
    Add { label: String },
    /// Remove a theory label
    Remove { label: String },
}

pub fn run(args: &TheoriesArgs, dir: &DataDir, format: OutputFormat) -> Result<()> {
    let mut config = dir.load_config()?;

    match &args.action {
        TheoriesAction::List => {}
        TheoriesAction::Add { label } => {
            config
                .theories
                .add(label)
                .with_context(|| format!("Cannot add theory '{label}'"))?;
            dir.save_config(&config)?;
        }
        TheoriesAction::Remove { label } => {
            if !config.theories.remove(label) {
                anyhow::bail!("Theory not found: {label}");
            }
            dir.save_config(&config)?;
        }
    }

    print!("{}", format_theories(&config.theories, format));
    Ok(())
}
