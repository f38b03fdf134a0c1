//! Upload targets for finished reports.

use async_trait::async_trait;
use log::info;
use std::path::PathBuf;

/// Somewhere a finished report can be uploaded to.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `file_data` under `filename`; returns where it ended up.
    async fn upload_file(&self, filename: &str, file_data: &[u8]) -> Result<String, String>;

    /// Whether this target only pretends to reach the school drive.
    fn is_simulated(&self) -> bool {
        false
    }
}

/// Stand-in for the school's Google Drive: the file is written to a local
/// outbox directory instead of being transferred.
#[derive(Debug, Clone)]
pub struct SimulatedDriveStorage {
    outbox_dir: PathBuf,
}

impl SimulatedDriveStorage {
    pub fn new(outbox_dir: impl Into<PathBuf>) -> Self {
        Self {
            outbox_dir: outbox_dir.into(),
        }
    }
}

#[async_trait]
impl ObjectStorage for SimulatedDriveStorage {
    async fn upload_file(&self, filename: &str, file_data: &[u8]) -> Result<String, String> {
        tokio::fs::create_dir_all(&self.outbox_dir)
            .await
            .map_err(|e| format!("cannot create {}: {}", self.outbox_dir.display(), e))?;

        let path = self.outbox_dir.join(filename);
        tokio::fs::write(&path, file_data)
            .await
            .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;

        info!("Simulated drive upload saved to {}", path.display());
        Ok(path.display().to_string())
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
