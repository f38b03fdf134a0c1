#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use laporan_harian_server::export::{ExportAdapter, ExportError, ObjectStorage, PdfRenderer};
use laporan_harian_server::refine::{GenerationRequest, RefineError, Refiner, TextGenerator};
use laporan_harian_server::report::ReportRecord;
use laporan_harian_server::AppState;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const FAKE_PDF: &[u8] = b"%PDF-1.7 fake";

pub fn sample_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 6).unwrap()
}

pub fn blank_record() -> ReportRecord {
    ReportRecord::for_date(sample_date())
}

/// Generator that answers every prompt with a fixed reply.
pub struct FixedGenerator {
    pub reply: String,
    pub delay: Duration,
}

impl FixedGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, RefineError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.reply.clone())
    }
}

/// Generator that always fails.
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, RefineError> {
        Err(RefineError::Status {
            status: 429,
            body: "quota exceeded".to_string(),
        })
    }
}

/// Renderer that returns fixed bytes, or fails when `fail` is set.
pub struct MockRenderer {
    pub fail: bool,
    pub sources: parking_lot::Mutex<Vec<String>>,
}

impl MockRenderer {
    pub fn ok() -> Self {
        Self {
            fail: false,
            sources: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            sources: parking_lot::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PdfRenderer for MockRenderer {
    async fn render_pdf(&self, source: String) -> Result<Vec<u8>, ExportError> {
        self.sources.lock().push(source);
        if self.fail {
            Err(ExportError::TypstExit(1))
        } else {
            Ok(FAKE_PDF.to_vec())
        }
    }
}

/// In-memory upload target.
pub struct MockObjectStorage {
    files: tokio::sync::Mutex<HashMap<String, Vec<u8>>>,
}

impl MockObjectStorage {
    pub fn new() -> Self {
        Self {
            files: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    pub async fn filenames(&self) -> Vec<String> {
        let files = self.files.lock().await;
        let mut names: Vec<String> = files.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn get(&self, filename: &str) -> Option<Vec<u8>> {
        self.files.lock().await.get(filename).cloned()
    }
}

#[async_trait]
impl ObjectStorage for MockObjectStorage {
    async fn upload_file(&self, filename: &str, file_data: &[u8]) -> Result<String, String> {
        let mut files = self.files.lock().await;
        files.insert(filename.to_string(), file_data.to_vec());
        Ok(format!("memory://{}", filename))
    }
}

pub fn exporter(
    renderer: Arc<dyn PdfRenderer>,
    storage: Arc<dyn ObjectStorage>,
    output_dir: &Path,
) -> ExportAdapter {
    ExportAdapter::new(renderer, storage, output_dir).with_upload_delay(Duration::ZERO)
}

pub fn test_state(generator: Arc<dyn TextGenerator>, output_dir: &Path) -> AppState {
    let refiner = Refiner::new(generator, "test-model", 0.7);
    let exporter = exporter(
        Arc::new(MockRenderer::ok()),
        Arc::new(MockObjectStorage::new()),
        output_dir,
    );
    AppState::new(refiner, exporter, "http://localhost:8080")
}
