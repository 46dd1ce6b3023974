use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Generation service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Generation service returned no text")]
    EmptyResponse,

    #[error("No API key configured for report generation")]
    NotConfigured,

    #[error("Session {id} has no generated report to export")]
    NothingToExport { id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
