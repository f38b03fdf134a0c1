//! The export operations offered on the preview screen.
//!
//! PDF generation and the cloud upload each hold an in-flight flag for their
//! whole duration. Flags are taken through [`InFlightGuard`], which clears them
//! on every exit path: success, error, early return or a dropped request.

use log::{error, info};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::storage::ObjectStorage;
use super::{ExportError, ExportOperation, GeneratedDocument, PdfRenderer, UploadReceipt};
use crate::document::common::{cloud_filename, report_filename};
use crate::document::html::to_print_html;
use crate::document::render;
use crate::document::typst::{to_typst, PageSetup};
use crate::report::ReportRecord;

pub const DEFAULT_UPLOAD_DELAY: Duration = Duration::from_millis(2500);

pub const UPLOAD_SUCCESS_MESSAGE: &str = "Berjaya! Laporan telah dihantar ke Google Drive Sekolah.";
pub const SIMULATED_UPLOAD_NOTE: &str = "(Simulasi: Fail dijana dan dimuat turun)";

/// A boolean "in progress" flag.
#[derive(Debug, Default)]
pub struct InFlightFlag(AtomicBool);

impl InFlightFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag; `None` when it is already set.
    pub fn try_acquire(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { flag: &self.0 })
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Clears its flag when dropped.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct ExportAdapter {
    renderer: Arc<dyn PdfRenderer>,
    storage: Arc<dyn ObjectStorage>,
    output_dir: PathBuf,
    page: PageSetup,
    upload_delay: Duration,
    generating: InFlightFlag,
    uploading: InFlightFlag,
}

impl ExportAdapter {
    pub fn new(
        renderer: Arc<dyn PdfRenderer>,
        storage: Arc<dyn ObjectStorage>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            renderer,
            storage,
            output_dir: output_dir.into(),
            page: PageSetup::default(),
            upload_delay: DEFAULT_UPLOAD_DELAY,
            generating: InFlightFlag::new(),
            uploading: InFlightFlag::new(),
        }
    }

    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = delay;
        self
    }

    pub fn with_page_setup(mut self, page: PageSetup) -> Self {
        self.page = page;
        self
    }

    pub fn is_generating(&self) -> bool {
        self.generating.is_set()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.is_set()
    }

    /// Print-ready HTML; the browser opens its print dialog on load.
    pub fn print_view(&self, record: &ReportRecord) -> String {
        to_print_html(&render(record))
    }

    /// Render the report to PDF bytes held in memory.
    pub async fn render_pdf(&self, record: &ReportRecord) -> Result<GeneratedDocument, ExportError> {
        let _generating = self
            .generating
            .try_acquire()
            .ok_or(ExportError::Busy(ExportOperation::Pdf))?;

        let source = to_typst(&render(record), &self.page);
        let pdf = self.renderer.render_pdf(source).await?;

        Ok(GeneratedDocument {
            filename: report_filename(record.date, &record.teacher_name),
            pdf,
        })
    }

    /// Render the report to PDF and save a copy under the output directory.
    pub async fn export_pdf(&self, record: &ReportRecord) -> Result<GeneratedDocument, ExportError> {
        let document = self.render_pdf(record).await?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| ExportError::Save {
                path: self.output_dir.display().to_string(),
                source,
            })?;
        let path = self.output_dir.join(&document.filename);
        tokio::fs::write(&path, &document.pdf)
            .await
            .map_err(|source| ExportError::Save {
                path: path.display().to_string(),
                source,
            })?;

        info!("Saved PDF report to {}", path.display());
        Ok(document)
    }

    /// Render the report and hand it to the upload target.
    pub async fn upload_to_cloud(&self, record: &ReportRecord) -> Result<UploadReceipt, ExportError> {
        if self.generating.is_set() {
            return Err(ExportError::Busy(ExportOperation::Pdf));
        }
        let _uploading = self
            .uploading
            .try_acquire()
            .ok_or(ExportError::Busy(ExportOperation::CloudUpload))?;

        let document = self.render_pdf(record).await?;

        // Stands in for the transfer latency of a real drive upload.
        tokio::time::sleep(self.upload_delay).await;

        let filename = cloud_filename(record.date);
        let location = self
            .storage
            .upload_file(&filename, &document.pdf)
            .await
            .map_err(|e| {
                error!("Upload of {} failed: {}", filename, e);
                ExportError::Upload(e)
            })?;

        let simulated = self.storage.is_simulated();
        let message = if simulated {
            format!("{} {}", UPLOAD_SUCCESS_MESSAGE, SIMULATED_UPLOAD_NOTE)
        } else {
            UPLOAD_SUCCESS_MESSAGE.to_string()
        };

        Ok(UploadReceipt {
            filename,
            location,
            simulated,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_guard_clears_on_drop() {
        let flag = InFlightFlag::new();
        {
            let _guard = flag.try_acquire().unwrap();
            assert!(flag.is_set());
            assert!(flag.try_acquire().is_none());
        }
        assert!(!flag.is_set());
        assert!(flag.try_acquire().is_some());
    }
}
