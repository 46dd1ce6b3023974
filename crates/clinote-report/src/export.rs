use std::path::{Path, PathBuf};

use clinote_core::storage::ArchivedSession;

use crate::error::ReportError;

/// Platform file-save capability.
pub trait FileExporter {
    fn write_file(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, ReportError>;
}

/// Writes exports into a fixed directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirExporter {
    dir: PathBuf,
}

impl DirExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileExporter for DirExporter {
    fn write_file(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)?;
        tracing::info!("exported {}", path.display());
        Ok(path)
    }
}

/// `{name}_{date}.txt`, with path separators in either part replaced by `_`.
pub fn export_filename(name: &str, date: &str) -> String {
    let clean = |s: &str| s.trim().replace(['/', '\\'], "_");
    format!("{}_{}.txt", clean(name), clean(date))
}

/// Export a saved session's report as a plain-text file.
///
/// Sessions without a display name are named after their session id.
pub fn export_session<S: ArchivedSession>(
    exporter: &dyn FileExporter,
    session: &S,
) -> Result<PathBuf, ReportError> {
    let content = session
        .generated_content()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ReportError::NothingToExport {
            id: session.session_id().to_string(),
        })?;
    let name = match session.display_name() {
        n if n.trim().is_empty() => session.session_id().as_str(),
        n => n,
    };
    let filename = export_filename(name, session.date());
    exporter.write_file(&filename, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinote_core::model::{
        AssessmentSession, AssessmentSessionPatch, GroupSession, TheoryVocabulary,
    };

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("王小明", "2024-05-01"), "王小明_2024-05-01.txt");
        assert_eq!(export_filename("A/B\\C", "2024/05/01"), "A_B_C_2024_05_01.txt");
    }

    #[test]
    fn test_export_session_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = DirExporter::new(dir.path().join("exports"));
        let mut session = AssessmentSession::new();
        session.apply(AssessmentSessionPatch {
            case_name: Some("王小明".into()),
            date: Some("2024-05-01".into()),
            ..Default::default()
        });
        session.generated_content = Some("評估報告".into());

        let path = export_session(&exporter, &session).unwrap();
        assert_eq!(path.file_name().unwrap(), "王小明_2024-05-01.txt");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "評估報告");
    }

    #[test]
    fn test_export_unnamed_session_uses_id() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = DirExporter::new(dir.path());
        let mut session = GroupSession::new(&TheoryVocabulary::default());
        session.group_name = "  ".into();
        session.date = "2024-05-01".into();
        session.generated_content = Some("團體紀錄".into());

        let path = export_session(&exporter, &session).unwrap();
        let expected = format!("{}_2024-05-01.txt", session.id);
        assert_eq!(path.file_name().unwrap().to_string_lossy(), expected);
    }

    #[test]
    fn test_export_without_report_fails() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = DirExporter::new(dir.path());
        let session = AssessmentSession::new();
        assert!(matches!(
            export_session(&exporter, &session),
            Err(ReportError::NothingToExport { .. })
        ));
    }
}
