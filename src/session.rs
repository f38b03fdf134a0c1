//! The editing session: the single report record and the editor/preview switch.
//!
//! All writes replace the record wholesale through [`apply_update`]. Every
//! free-text field carries a revision that moves on each edit, which lets a
//! refinement that started before an edit notice it is stale.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::report::{apply_update, ReportRecord, ReportUpdate, TextField};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    #[default]
    Editing,
    Previewing,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Editing => Self::Previewing,
            Self::Previewing => Self::Editing,
        }
    }
}

/// What the user can do from the current view.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ViewAction {
    UpdateField,
    RefineField,
    Review,
    BackToEdit,
    SaveToDrive,
    SavePdf,
    Print,
}

impl ViewAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::UpdateField => "Kemas Kini",
            Self::RefineField => "Bantu Tulis",
            Self::Review => "Semak Laporan",
            Self::BackToEdit => "Kembali Edit",
            Self::SaveToDrive => "Simpan ke Google Drive",
            Self::SavePdf => "Simpan PDF",
            Self::Print => "Cetak Salinan",
        }
    }
}

pub fn available_actions(mode: ViewMode) -> Vec<ViewAction> {
    match mode {
        ViewMode::Editing => vec![
            ViewAction::UpdateField,
            ViewAction::RefineField,
            ViewAction::Review,
        ],
        ViewMode::Previewing => vec![
            ViewAction::BackToEdit,
            ViewAction::SaveToDrive,
            ViewAction::SavePdf,
            ViewAction::Print,
        ],
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    record: ReportRecord,
    view: ViewMode,
    revisions: HashMap<TextField, u64>,
}

impl Session {
    pub fn new(record: ReportRecord) -> Self {
        Self {
            record,
            view: ViewMode::Editing,
            revisions: HashMap::new(),
        }
    }

    pub fn record(&self) -> &ReportRecord {
        &self.record
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    pub fn toggle_view(&mut self) -> ViewMode {
        self.view = self.view.toggled();
        self.view
    }

    pub fn revision(&self, field: TextField) -> u64 {
        self.revisions.get(&field).copied().unwrap_or(0)
    }

    fn bump(&mut self, field: TextField) {
        *self.revisions.entry(field).or_insert(0) += 1;
    }

    /// Apply an editor update and return the new record.
    pub fn update(&mut self, update: ReportUpdate) -> &ReportRecord {
        for field in update.touched_text_fields() {
            self.bump(field);
        }
        self.record = apply_update(&self.record, update);
        &self.record
    }

    /// Replace the whole record (shared link, reset). Every text field counts
    /// as edited.
    pub fn replace(&mut self, record: ReportRecord) {
        for field in TextField::ALL {
            self.bump(field);
        }
        self.record = record;
    }

    /// Write a refinement result back if `field` has not been edited since
    /// `revision` was read. Returns whether the text was applied.
    pub fn apply_refinement(&mut self, field: TextField, revision: u64, text: String) -> bool {
        if self.revision(field) != revision {
            return false;
        }
        self.update(ReportUpdate::text(field, text));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn session() -> Session {
        Session::new(ReportRecord::for_date(NaiveDate::from_ymd_opt(2025, 10, 6).unwrap()))
    }

    #[test]
    fn test_view_toggles() {
        let mut session = session();
        assert_eq!(session.view(), ViewMode::Editing);
        assert_eq!(session.toggle_view(), ViewMode::Previewing);
        assert_eq!(session.toggle_view(), ViewMode::Editing);
        session.set_view(ViewMode::Previewing);
        assert_eq!(session.view(), ViewMode::Previewing);
    }

    #[test]
    fn test_actions_per_view() {
        assert!(available_actions(ViewMode::Editing).contains(&ViewAction::RefineField));
        assert!(!available_actions(ViewMode::Editing).contains(&ViewAction::SavePdf));
        assert_eq!(
            available_actions(ViewMode::Previewing),
            vec![
                ViewAction::BackToEdit,
                ViewAction::SaveToDrive,
                ViewAction::SavePdf,
                ViewAction::Print
            ]
        );
    }

    #[test]
    fn test_update_bumps_only_touched_fields() {
        let mut session = session();
        session.update(ReportUpdate::text(TextField::MealMenu, "Bihun sup"));
        assert_eq!(session.revision(TextField::MealMenu), 1);
        assert_eq!(session.revision(TextField::OtherMatters), 0);

        session.update(ReportUpdate::present_count(31));
        assert_eq!(session.revision(TextField::MealMenu), 1);
        assert_eq!(session.record().attendance_percent, "93.9");
    }

    #[test]
    fn test_stale_refinement_is_discarded() {
        let mut session = session();
        session.update(ReportUpdate::text(TextField::CanteenReport, "kantin ok"));
        let started_at = session.revision(TextField::CanteenReport);

        session.update(ReportUpdate::text(TextField::CanteenReport, "kantin bersih, lantai basah"));
        let applied =
            session.apply_refinement(TextField::CanteenReport, started_at, "Kantin bersih.".to_string());

        assert!(!applied);
        assert_eq!(session.record().canteen_report, "kantin bersih, lantai basah");
    }

    #[test]
    fn test_current_refinement_is_applied() {
        let mut session = session();
        session.update(ReportUpdate::text(TextField::ToiletReport, "tandas ok"));
        let started_at = session.revision(TextField::ToiletReport);

        assert!(session.apply_refinement(
            TextField::ToiletReport,
            started_at,
            "Tandas murid berada dalam keadaan bersih.".to_string()
        ));
        assert_eq!(
            session.record().toilet_report,
            "Tandas murid berada dalam keadaan bersih."
        );
        assert_eq!(session.revision(TextField::ToiletReport), started_at + 1);
    }

    #[test]
    fn test_replace_invalidates_pending_refinements() {
        let mut session = session();
        let started_at = session.revision(TextField::VisitorNote);
        session.replace(ReportRecord::for_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
        assert!(!session.apply_refinement(TextField::VisitorNote, started_at, "x".to_string()));
    }
}
