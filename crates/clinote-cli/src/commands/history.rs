use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use clinote_core::model::SessionId;
use clinote_core::storage::HistoryStore;
use clinote_core::CoreError;
use clinote_report::{export_session, DirExporter};

use super::KindArg;
use crate::data_dir::DataDir;
use crate::output::format::{format_assessment_records, format_group_records};
use crate::output::OutputFormat;

#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub action: HistoryAction,
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List saved sessions, most recently saved first
    List {
        /// Only list one session kind
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Export a saved session's report as a text file
    Export {
        /// Session ID
        id: String,

        /// Output directory (default: <data-dir>/exports)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub fn run(args: &HistoryArgs, dir: &DataDir, format: OutputFormat) -> Result<()> {
    match &args.action {
        HistoryAction::List { kind } => list(dir, *kind, format),
        HistoryAction::Export { id, out } => export(dir, id, out.clone()),
    }
}

fn list(dir: &DataDir, kind: Option<KindArg>, format: OutputFormat) -> Result<()> {
    if kind.is_none() && matches!(format, OutputFormat::Json) {
        let both = serde_json::json!({
            "group": dir.group_history().list().context("Failed to read group history")?,
            "assessment": dir
                .assessment_history()
                .list()
                .context("Failed to read assessment history")?,
        });
        println!("{}", serde_json::to_string_pretty(&both)?);
        return Ok(());
    }
    if kind != Some(KindArg::Assessment) {
        let records = dir
            .group_history()
            .list()
            .context("Failed to read group history")?;
        print!("{}", format_group_records(&records, format));
    }
    if kind != Some(KindArg::Group) {
        let records = dir
            .assessment_history()
            .list()
            .context("Failed to read assessment history")?;
        print!("{}", format_assessment_records(&records, format));
    }
    Ok(())
}

fn export(dir: &DataDir, id: &str, out: Option<PathBuf>) -> Result<()> {
    let id = SessionId::parse(id).context("Invalid session ID")?;
    let exporter = DirExporter::new(out.unwrap_or_else(|| dir.exports_dir()));

    let path = if let Some(session) = dir.group_history().get(&id)? {
        export_session(&exporter, &session)?
    } else if let Some(session) = dir.assessment_history().get(&id)? {
        export_session(&exporter, &session)?
    } else {
        return Err(CoreError::NotFound { id: id.to_string() }.into());
    };

    println!("Exported to {}", path.display());
    Ok(())
}
