use std::fs::{self, File};
use std::io::Write as _;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::error::CoreError;

use super::history::{most_recent_first, upsert, ArchivedSession, HistoryRecord, HistoryStore};
use super::SaveOutcome;

/// History persisted as a JSON array in a single file.
///
/// Readers and writers coordinate through a sibling `.lock` file; writes go to
/// a hidden temp file that is renamed over the data file while the exclusive
/// lock is held, so a crash mid-write leaves the previous history intact.
#[derive(Debug, Clone)]
pub struct JsonFileHistory<S> {
    path: PathBuf,
    _session: PhantomData<fn() -> S>,
}

impl<S: ArchivedSession> JsonFileHistory<S> {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _session: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "history".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    fn open_lock(&self) -> Result<File, CoreError> {
        Ok(fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())?)
    }

    fn read_records(&self) -> Result<Vec<HistoryRecord<S>>, CoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&data).map_err(|e| {
            tracing::warn!("history file {} is unreadable: {e}", self.path.display());
            CoreError::Json(e)
        })
    }

    fn write_records(&self, records: &[HistoryRecord<S>]) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(records)?;
        let tmp_path = self.temp_path();
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(json.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl<S: ArchivedSession> HistoryStore<S> for JsonFileHistory<S> {
    fn save(&mut self, session: S) -> Result<SaveOutcome, CoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let lock = self.open_lock()?;
        fs2::FileExt::lock_exclusive(&lock).map_err(CoreError::Io)?;

        // Re-read under lock to get latest state
        let result = self.read_records().and_then(|mut records| {
            let id = session.session_id().clone();
            let outcome = upsert(&mut records, session);
            self.write_records(&records)?;
            tracing::debug!("history save {id} to {}: {outcome:?}", self.path.display());
            Ok(outcome)
        });
        fs2::FileExt::unlock(&lock).map_err(CoreError::Io)?;
        result
    }

    fn list(&self) -> Result<Vec<HistoryRecord<S>>, CoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let lock = self.open_lock()?;
        fs2::FileExt::lock_shared(&lock).map_err(CoreError::Io)?;
        let records = self.read_records();
        fs2::FileExt::unlock(&lock).map_err(CoreError::Io)?;
        Ok(most_recent_first(&records?))
    }
}
