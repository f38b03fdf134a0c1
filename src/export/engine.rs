//! Typst rendering engine.
//!
//! Handles the low-level details of writing Typst source to a temporary
//! directory, invoking the compiler, and reading back the output PDF.

use async_trait::async_trait;
use log::{debug, error};
use std::fs;
use std::process::Command;
use tempfile::{tempdir, TempDir};

use super::{ExportError, PdfRenderer};
use crate::document::typst::TEMPLATE_FILE;

const OUTPUT_FILE: &str = "laporan.pdf";

/// Renders Typst source to PDF through the `typst` CLI.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    typst_bin: String,
}

impl TypstRenderEngine {
    pub fn new(typst_bin: impl Into<String>) -> Self {
        Self {
            typst_bin: typst_bin.into(),
        }
    }

    /// Compile `typst_source` to PDF bytes. Blocking.
    pub fn compile(&self, typst_source: &str) -> Result<Vec<u8>, ExportError> {
        let temp_dir = tempdir().map_err(ExportError::TempDir)?;
        let typ_path = temp_dir.path().join(TEMPLATE_FILE);

        fs::write(&typ_path, typst_source).map_err(ExportError::WriteTypst)?;

        compile_typst_to_pdf(&self.typst_bin, &temp_dir)
    }
}

impl Default for TypstRenderEngine {
    fn default() -> Self {
        Self::new("typst")
    }
}

#[async_trait]
impl PdfRenderer for TypstRenderEngine {
    async fn render_pdf(&self, source: String) -> Result<Vec<u8>, ExportError> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.compile(&source))
            .await
            .map_err(|e| ExportError::Task(e.to_string()))?
    }
}

fn compile_typst_to_pdf(typst_bin: &str, temp_dir: &TempDir) -> Result<Vec<u8>, ExportError> {
    let typ_path = temp_dir.path().join(TEMPLATE_FILE);
    let output_path = temp_dir.path().join(OUTPUT_FILE);

    debug!("Compiling {} with {}", typ_path.display(), typst_bin);

    let status = Command::new(typst_bin)
        .arg("compile")
        .arg(&typ_path)
        .arg(&output_path)
        .current_dir(temp_dir.path())
        .status()
        .map_err(ExportError::TypstIo)?;

    if !status.success() {
        let code = status.code().unwrap_or(-1);
        error!("Typst exited with status {}", code);
        return Err(ExportError::TypstExit(code));
    }

    fs::read(&output_path).map_err(ExportError::ReadPdf)
}
