//! Turning a captured session into a narrative report.
//!
//! [`RequestBuilder`] deterministically serializes a session into a
//! [`ReportRequest`]; it never calls the generation service itself. A
//! [`ReportGenerator`] performs the call, and [`resolve_outcome`] maps any
//! failure or empty reply to a displayable fallback string.

pub mod builder;
pub mod error;
pub mod export;
pub mod gemini;
pub mod generator;
pub mod request;

pub use builder::RequestBuilder;
pub use error::ReportError;
pub use export::{export_filename, export_session, DirExporter, FileExporter};
pub use gemini::GeminiClient;
pub use generator::{resolve_outcome, ReportGenerator, UnconfiguredGenerator};
pub use request::{InlineImage, ReportRequest};
