//! Export module - PDF files, the print view and the (simulated) cloud upload.
//!
//! - `engine` - Typst CLI wrapper producing PDF bytes
//! - `storage` - upload targets for finished reports
//! - `adapter` - the export operations with their in-flight flags

pub mod adapter;
pub mod engine;
pub mod storage;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub use adapter::{ExportAdapter, InFlightFlag, InFlightGuard};
pub use engine::TypstRenderEngine;
pub use storage::{ObjectStorage, SimulatedDriveStorage};

/// The user-triggered export operations.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ExportOperation {
    Pdf,
    CloudUpload,
}

impl ExportOperation {
    /// Notification shown when the operation fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Pdf => "Gagal menjana PDF.",
            Self::CloudUpload => "Gagal memuat naik ke Google Drive.",
        }
    }

    pub fn busy_message(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF sedang dijana. Sila tunggu.",
            Self::CloudUpload => "Laporan sedang dimuat naik. Sila tunggu.",
        }
    }
}

/// Errors that can occur while exporting a report.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("another {0:?} export is already in progress")]
    Busy(ExportOperation),
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {0}")]
    TypstExit(i32),
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
    #[error("PDF compilation task failed: {0}")]
    Task(String),
    #[error("failed to save {path}: {source}")]
    Save {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("upload failed: {0}")]
    Upload(String),
}

/// Result of a successful PDF export.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
}

/// Outcome of a cloud upload.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct UploadReceipt {
    pub filename: String,
    pub location: String,
    pub simulated: bool,
    pub message: String,
}

/// Compiles Typst source to PDF bytes.
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render_pdf(&self, source: String) -> Result<Vec<u8>, ExportError>;
}
