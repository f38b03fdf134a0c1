//! Range checks for updates coming from the editor.
//!
//! The derivation itself accepts any headcount; these checks hold the editor's
//! input ranges (0..=33 pupils, a 1..=5 cleanliness scale) at the HTTP boundary
//! and explain the problem to the teacher in Bahasa Melayu.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::derive::ReportUpdate;
use super::model::TOTAL_STUDENTS;

/// Checks an editor payload before it reaches the session.
pub trait Validator {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ValidationError {
    /// JSON key of the offending field.
    pub field: String,
    pub message: String,
    /// What the teacher should enter instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn out_of_range(field: &str, label: &str, min: i64, max: i64) -> Self {
        Self::new(field, format!("{} mesti di antara {} dan {}", label, min, max))
            .with_suggestion(format!("Masukkan nilai {} hingga {}", min, max))
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} tidak boleh kosong", label))
            .with_suggestion(format!("Sila isi {} terlebih dahulu", label.to_lowercase()))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Default, Clone)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Numbered summary for error responses.
    pub fn summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Pengesahan gagal: {} kesilapan ditemui",
            self.errors.len()
        )];
        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }
        parts.join("\n")
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Validate that an integer lies within `min..=max`.
pub fn validate_range(
    value: i64,
    min: i64,
    max: i64,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) {
    if value < min || value > max {
        errors.add(ValidationError::out_of_range(field, label, min, max));
    }
}

/// Validate that a string is not empty after trimming.
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

impl Validator for ReportUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(present) = self.present_count {
            validate_range(
                i64::from(present),
                0,
                i64::from(TOTAL_STUDENTS),
                "presentCount",
                "Bilangan murid hadir",
                &mut errors,
            );
        }
        if let Some(score) = self.cleanliness_score {
            validate_range(
                i64::from(score),
                1,
                5,
                "cleanlinessScore",
                "Skala kebersihan",
                &mut errors,
            );
        }
        if let Some(ref weekday) = self.weekday {
            validate_required(weekday, "weekday", "Hari", &mut errors);
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_is_valid() {
        assert!(ReportUpdate::default().validate().is_ok());
    }

    #[test]
    fn test_headcount_bounds() {
        assert!(ReportUpdate::present_count(0).validate().is_ok());
        assert!(ReportUpdate::present_count(33).validate().is_ok());

        let errors = ReportUpdate::present_count(34).validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].field, "presentCount");
        assert!(errors.errors()[0].message.contains("0 dan 33"));
    }

    #[test]
    fn test_collects_every_error() {
        let update = ReportUpdate {
            present_count: Some(-1),
            cleanliness_score: Some(0),
            weekday: Some("  ".to_string()),
            ..ReportUpdate::default()
        };
        let errors = update.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.summary().starts_with("Pengesahan gagal: 3 kesilapan ditemui"));
        assert!(errors.summary().contains("2. [cleanlinessScore]"));
    }
}
