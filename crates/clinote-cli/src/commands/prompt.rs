use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use clinote_flow::{App, MemoryClipboard, SessionKind};
use clinote_report::UnconfiguredGenerator;

use super::KindArg;
use crate::data_dir::DataDir;
use crate::output::format::format_request;
use crate::output::OutputFormat;
use crate::script;

#[derive(Args)]
pub struct PromptArgs {
    /// JSON-lines command script
    pub script: PathBuf,

    /// Session kind to build for (default: the kind of the final screen)
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,
}

/// Replay without persisting anything or calling the service.
pub fn run(args: &PromptArgs, dir: &DataDir, format: OutputFormat) -> Result<()> {
    let config = dir.load_config()?;
    let commands = script::load(&args.script)?;

    let mut app = App::in_memory(&config);
    let mut clipboard = MemoryClipboard::new();

    let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    rt.block_on(async {
        for (line, command) in commands {
            app.apply(command, &UnconfiguredGenerator, &mut clipboard)
                .await
                .with_context(|| format!("{}:{line}", args.script.display()))?;
        }
        Ok::<_, anyhow::Error>(())
    })?;

    let kind: SessionKind = match args.kind {
        Some(kind) => kind.into(),
        None => app.screen().session_kind().with_context(|| {
            format!(
                "Script ended on {}; pass --kind to choose a session",
                app.screen()
            )
        })?,
    };
    print!("{}", format_request(&app.request_for(kind), format));
    Ok(())
}
