use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::export::{ExportAdapter, SimulatedDriveStorage, TypstRenderEngine};
use crate::refine::{GeminiClient, RefineError, Refiner, RefinementTracker};
use crate::report::ReportRecord;
use crate::session::Session;

/// Everything the handlers share. The session lock is never held across an
/// `.await`.
pub struct AppState {
    pub session: RwLock<Session>,
    pub refiner: Refiner,
    pub refinements: Arc<RefinementTracker>,
    pub exporter: ExportAdapter,
    pub public_url: String,
}

impl AppState {
    pub fn new(refiner: Refiner, exporter: ExportAdapter, public_url: impl Into<String>) -> Self {
        Self {
            session: RwLock::new(Session::new(ReportRecord::today())),
            refiner,
            refinements: Arc::new(RefinementTracker::new()),
            exporter,
            public_url: public_url.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, RefineError> {
        let gemini = GeminiClient::with_defaults(
            config.gemini_api_key.clone(),
            config.gemini_base_url.clone(),
        )?;
        let refiner = Refiner::new(
            Arc::new(gemini),
            config.gemini_model.clone(),
            config.refine_temperature,
        );

        let exporter = ExportAdapter::new(
            Arc::new(TypstRenderEngine::new(config.typst_bin.clone())),
            Arc::new(SimulatedDriveStorage::new(config.drive_outbox_dir())),
            config.output_dir.clone(),
        )
        .with_upload_delay(config.upload_delay);

        Ok(Self::new(refiner, exporter, config.public_url.clone()))
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> ReportRecord {
        self.session.read().record().clone()
    }
}
