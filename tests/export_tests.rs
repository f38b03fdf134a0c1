mod common;

use common::{blank_record, exporter, MockObjectStorage, MockRenderer, FAKE_PDF};
use laporan_harian_server::export::{ExportError, ExportOperation, SimulatedDriveStorage};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_pdf_export_saves_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = Arc::new(MockRenderer::ok());
    let adapter = exporter(renderer.clone(), Arc::new(MockObjectStorage::new()), dir.path());

    let mut record = blank_record();
    record.teacher_name = "Cikgu Siti Aminah".to_string();

    let document = adapter.export_pdf(&record).await.unwrap();
    assert_eq!(document.filename, "Laporan_Guru_2025-10-06_Cikgu_Siti_Aminah.pdf");
    assert_eq!(document.pdf, FAKE_PDF);
    assert!(dir.path().join(&document.filename).exists());
    assert!(!adapter.is_generating());

    let sources = renderer.sources.lock();
    assert_eq!(sources.len(), 1);
    assert!(sources[0].contains("Cikgu Siti Aminah"));
}

#[tokio::test]
async fn test_failed_pdf_clears_flag() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = exporter(
        Arc::new(MockRenderer::failing()),
        Arc::new(MockObjectStorage::new()),
        dir.path(),
    );

    let result = adapter.export_pdf(&blank_record()).await;
    assert!(matches!(result, Err(ExportError::TypstExit(1))));
    assert!(!adapter.is_generating());

    let result = adapter.upload_to_cloud(&blank_record()).await;
    assert!(matches!(result, Err(ExportError::TypstExit(1))));
    assert!(!adapter.is_uploading());
    assert!(!adapter.is_generating());
}

#[tokio::test]
async fn test_upload_stores_one_object() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(MockObjectStorage::new());
    let adapter = exporter(Arc::new(MockRenderer::ok()), storage.clone(), dir.path());

    let receipt = adapter.upload_to_cloud(&blank_record()).await.unwrap();

    assert_eq!(receipt.filename, "SJKTLT_DRIVE_UPLOAD_2025-10-06.pdf");
    assert_eq!(receipt.location, "memory://SJKTLT_DRIVE_UPLOAD_2025-10-06.pdf");
    assert!(!receipt.simulated);
    assert_eq!(storage.filenames().await, vec![receipt.filename.clone()]);
    assert_eq!(storage.get(&receipt.filename).await.unwrap(), FAKE_PDF);
    assert!(!adapter.is_uploading());
}

#[tokio::test]
async fn test_second_upload_while_running_is_busy() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = Arc::new(
        exporter(
            Arc::new(MockRenderer::ok()),
            Arc::new(MockObjectStorage::new()),
            dir.path(),
        )
        .with_upload_delay(Duration::from_millis(200)),
    );

    let running = {
        let adapter = adapter.clone();
        tokio::spawn(async move { adapter.upload_to_cloud(&blank_record()).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(adapter.is_uploading());
    let second = adapter.upload_to_cloud(&blank_record()).await;
    assert!(matches!(
        second,
        Err(ExportError::Busy(ExportOperation::CloudUpload))
    ));

    assert!(running.await.unwrap().is_ok());
    assert!(!adapter.is_uploading());
}

#[tokio::test]
async fn test_simulated_drive_receipt() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = exporter(
        Arc::new(MockRenderer::ok()),
        Arc::new(SimulatedDriveStorage::new(dir.path().join("drive"))),
        dir.path(),
    );

    let receipt = adapter.upload_to_cloud(&blank_record()).await.unwrap();
    assert!(receipt.simulated);
    assert!(receipt.message.starts_with("Berjaya!"));
    assert!(dir
        .path()
        .join("drive")
        .join("SJKTLT_DRIVE_UPLOAD_2025-10-06.pdf")
        .exists());
}

#[test]
fn test_print_view_opens_dialog() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = exporter(
        Arc::new(MockRenderer::ok()),
        Arc::new(MockObjectStorage::new()),
        dir.path(),
    );
    let html = adapter.print_view(&blank_record());
    assert!(html.contains("window.print()"));
}
