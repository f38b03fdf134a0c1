//! AI-assisted rephrasing of free-text report fields.
//!
//! Each refinable field has a fixed instruction in Bahasa Melayu. The teacher's
//! raw note and that instruction are composed into one prompt and sent to a
//! text-generation service. Refinement never destroys input: any failure or
//! empty answer hands back the note exactly as it was.

pub mod gemini;
pub mod tracker;

use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use thiserror::Error;

use crate::report::TextField;

pub use gemini::GeminiClient;
pub use tracker::{RefinementGuard, RefinementTracker};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Notes shorter than this (after trimming) are returned untouched.
pub const MIN_NOTE_CHARS: usize = 2;

#[derive(Debug, Error)]
pub enum RefineError {
    #[error("text generation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("text generation service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("text generation is not configured: {0}")]
    NotConfigured(&'static str),
}

/// One prompt for the text-generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
}

/// A text-generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the generated text, possibly empty.
    async fn generate(&self, request: GenerationRequest) -> Result<String, RefineError>;
}

/// Fixed context instruction for each refinable field.
pub fn instruction(field: TextField) -> &'static str {
    match field {
        TextField::AssemblySpeechPrincipal => {
            "Huraikan ucapan atau amanat yang disampaikan oleh Guru Besar semasa perhimpunan dengan nada formal dan profesional."
        }
        TextField::AssemblySpeechDutyTeacher => {
            "Huraikan ucapan atau laporan yang disampaikan oleh guru bertugas semasa perhimpunan."
        }
        TextField::AssemblyPrefects => {
            "Formatkan senarai nama pengawas yang bertugas semasa perhimpunan dengan kemas."
        }
        TextField::AbsentStudentNames => {
            "Tuliskan senarai nama murid yang tidak hadir dalam format senarai yang kemas."
        }
        TextField::CanteenReport => {
            "Tuliskan laporan ringkas tentang penyediaan makanan RMT dan kebersihan kantin secara formal."
        }
        TextField::ToiletReport => "Huraikan keadaan kebersihan tandas murid secara formal.",
        TextField::MealMenu => {
            "Tuliskan menu makanan RMT dengan cara yang menyelerakan dan formal (contoh: Nasi Lemak, Telur Rebus, Timun, Air Milo)."
        }
        TextField::DisciplineDetail => {
            "Huraikan isu disiplin yang berlaku dengan teliti dan profesional dalam Bahasa Melayu."
        }
        TextField::VisitorNote => {
            "Formatkan nama pelawat dan tujuan lawatan mereka secara profesional."
        }
        TextField::OtherMatters => {
            "Tuliskan laporan tentang pengumuman atau pelawat secara formal."
        }
    }
}

/// Compose the prompt sent for `field` with the teacher's raw `note`.
pub fn compose_prompt(field: TextField, note: &str) -> String {
    format!(
        "Tukarkan nota ringkas berikut menjadi ayat laporan sekolah yang formal dalam Bahasa Melayu.\n\
         Konteks: {}\n\
         Nota: {}\n\
         Berikan teks laporan sahaja.",
        instruction(field),
        note
    )
}

/// Whether `note` is long enough to be worth a generation call.
pub fn is_refinable(note: &str) -> bool {
    note.trim().chars().count() >= MIN_NOTE_CHARS
}

/// Best-effort refinement front-end over a [`TextGenerator`].
#[derive(Clone)]
pub struct Refiner {
    generator: Arc<dyn TextGenerator>,
    model: String,
    temperature: f32,
}

impl Refiner {
    pub fn new(generator: Arc<dyn TextGenerator>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            generator,
            model: model.into(),
            temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Refine `note` for `field`; returns `note` unchanged on any failure.
    pub async fn refine(&self, field: TextField, note: &str) -> String {
        if !is_refinable(note) {
            return note.to_string();
        }

        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: compose_prompt(field, note),
            temperature: self.temperature,
        };

        match self.generator.generate(request).await {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    debug!("Empty refinement for {}, keeping original note", field.key());
                    note.to_string()
                } else {
                    trimmed.to_string()
                }
            }
            Err(e) => {
                warn!("Refinement of {} failed: {}", field.key(), e);
                note.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Echo {
        seen: Mutex<Vec<GenerationRequest>>,
        reply: String,
    }

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, request: GenerationRequest) -> Result<String, RefineError> {
            self.seen.lock().push(request);
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn test_every_field_has_instruction() {
        for field in TextField::ALL {
            assert!(!instruction(field).is_empty());
        }
        assert!(instruction(TextField::MealMenu).contains("RMT"));
    }

    #[test]
    fn test_compose_prompt_layout() {
        let prompt = compose_prompt(TextField::ToiletReport, "tandas bersih");
        let lines: Vec<&str> = prompt.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Tukarkan nota ringkas"));
        assert_eq!(lines[1], format!("Konteks: {}", instruction(TextField::ToiletReport)));
        assert_eq!(lines[2], "Nota: tandas bersih");
        assert_eq!(lines[3], "Berikan teks laporan sahaja.");
    }

    #[test]
    fn test_is_refinable() {
        assert!(!is_refinable(""));
        assert!(!is_refinable("  a  "));
        assert!(is_refinable("ok"));
        assert!(is_refinable("பள்ளி"));
    }

    #[tokio::test]
    async fn test_request_carries_model_and_temperature() {
        let echo = Arc::new(Echo {
            seen: Mutex::new(Vec::new()),
            reply: "  Teks formal.  ".to_string(),
        });
        let refiner = Refiner::new(echo.clone(), "test-model", DEFAULT_TEMPERATURE);

        let refined = refiner.refine(TextField::OtherMatters, "mesyuarat PIBG").await;
        assert_eq!(refined, "Teks formal.");

        let seen = echo.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "test-model");
        assert_eq!(seen[0].temperature, 0.7);
        assert!(seen[0].prompt.contains("Nota: mesyuarat PIBG"));
    }

    #[tokio::test]
    async fn test_short_note_skips_service() {
        let echo = Arc::new(Echo {
            seen: Mutex::new(Vec::new()),
            reply: "tidak digunakan".to_string(),
        });
        let refiner = Refiner::new(echo.clone(), "test-model", DEFAULT_TEMPERATURE);

        assert_eq!(refiner.refine(TextField::MealMenu, " x ").await, " x ");
        assert!(echo.seen.lock().is_empty());
    }
}
