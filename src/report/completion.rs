//! The "Status Laporan" checklist shown beside the editor.

use serde::Serialize;
use utoipa::ToSchema;

use super::model::{DisciplineStatus, ReportRecord};

#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CompletionItem {
    #[schema(value_type = String)]
    pub label: &'static str,
    pub completed: bool,
}

pub fn completion_status(record: &ReportRecord) -> Vec<CompletionItem> {
    let filled = |value: &str| !value.trim().is_empty();

    vec![
        CompletionItem {
            label: "Butiran Am",
            completed: filled(&record.teacher_name),
        },
        CompletionItem {
            label: "Perhimpunan",
            completed: filled(&record.assembly_speech_principal)
                || filled(&record.assembly_speech_duty_teacher),
        },
        CompletionItem {
            label: "RMT & Menu",
            completed: filled(&record.meal_menu),
        },
        // A day without a case needs no write-up.
        CompletionItem {
            label: "Disiplin",
            completed: record.discipline_status == DisciplineStatus::NoCase
                || filled(&record.discipline_detail),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_fresh_record_only_discipline_complete() {
        let record = ReportRecord::for_date(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        let status: Vec<bool> = completion_status(&record).iter().map(|i| i.completed).collect();
        assert_eq!(status, vec![false, false, false, true]);
    }

    #[test]
    fn test_open_case_needs_detail() {
        let mut record = ReportRecord::for_date(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        record.discipline_status = DisciplineStatus::HasCase;
        assert!(!completion_status(&record)[3].completed);

        record.discipline_detail = "Pergaduhan kecil di kantin".to_string();
        record.assembly_speech_duty_teacher = "Peringatan kebersihan".to_string();
        let status = completion_status(&record);
        assert!(status[1].completed);
        assert!(status[3].completed);
    }
}
