use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use clinote_flow::{App, MemoryClipboard};
use clinote_report::{GeminiClient, ReportError, ReportGenerator, UnconfiguredGenerator};

use crate::data_dir::DataDir;
use crate::output::format::format_outcome;
use crate::output::OutputFormat;
use crate::script;

#[derive(Args)]
pub struct RunArgs {
    /// JSON-lines command script
    pub script: PathBuf,

    /// Never call the generation service; reports fall back to the
    /// configured message
    #[arg(long)]
    pub offline: bool,
}

pub fn run(args: &RunArgs, dir: &DataDir, format: OutputFormat) -> Result<()> {
    let mut config = dir.load_config()?;
    let commands = script::load(&args.script)?;

    let generator: Box<dyn ReportGenerator> = if args.offline {
        Box::new(UnconfiguredGenerator)
    } else {
        match GeminiClient::from_config(&config) {
            Ok(client) => Box::new(client),
            Err(ReportError::NotConfigured) => {
                tracing::warn!("no API key configured, reports will use the fallback message");
                Box::new(UnconfiguredGenerator)
            }
            Err(e) => return Err(e).context("Failed to create report client"),
        }
    };

    let mut app = App::new(
        &config,
        Box::new(dir.group_history()),
        Box::new(dir.assessment_history()),
    );
    let mut clipboard = MemoryClipboard::new();

    let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    rt.block_on(async {
        for (line, command) in commands {
            let outcome = app
                .apply(command, generator.as_ref(), &mut clipboard)
                .await
                .with_context(|| format!("{}:{line}", args.script.display()))?;
            println!("{}", format_outcome(line, &outcome, format));
        }
        Ok::<_, anyhow::Error>(())
    })?;

    if app.theories() != &config.theories {
        config.theories = app.theories().clone();
        dir.save_config(&config)?;
    }
    tracing::info!("script finished on {}", app.screen());
    Ok(())
}
