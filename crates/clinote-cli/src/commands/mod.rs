pub mod history;
pub mod init;
pub mod prompt;
pub mod run;
pub mod tags;
pub mod theories;
pub mod version;

use clap::{Subcommand, ValueEnum};
use clinote_flow::SessionKind;

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory with a default config
    Init(init::InitArgs),
    /// Replay a JSON-lines command script and persist saved sessions
    Run(run::RunArgs),
    /// Replay a script and print the report request it would send
    Prompt(prompt::PromptArgs),
    /// List behavior tags, phase markers and assessment categories
    Tags,
    /// Manage the theory vocabulary
    Theories(theories::TheoriesArgs),
    /// List or export saved sessions
    History(history::HistoryArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Group,
    Assessment,
}

impl From<KindArg> for SessionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Group => SessionKind::Group,
            KindArg::Assessment => SessionKind::Assessment,
        }
    }
}
