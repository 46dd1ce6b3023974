pub mod file;
pub mod history;

pub use file::JsonFileHistory;
pub use history::{ArchivedSession, HistoryRecord, HistoryStore, MemoryHistory, SaveOutcome};
