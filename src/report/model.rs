//! The daily duty report record.

use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::derive::attendance_percent;

/// Number of pupils enrolled; the attendance percentage is computed against it.
pub const TOTAL_STUDENTS: i32 = 33;

/// Status of the school compound after the cleanliness round.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub enum AreaStatus {
    #[serde(rename = "Bersih")]
    Clean,
    #[serde(rename = "Memuaskan")]
    Satisfactory,
    #[serde(rename = "Perlu Tindakan")]
    NeedsAction,
}

impl AreaStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clean => "Bersih",
            Self::Satisfactory => "Memuaskan",
            Self::NeedsAction => "Perlu Tindakan",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub enum DisciplineStatus {
    #[serde(rename = "Tiada Kes")]
    NoCase,
    #[serde(rename = "Ada Kes")]
    HasCase,
}

impl DisciplineStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoCase => "Tiada Kes",
            Self::HasCase => "Ada Kes",
        }
    }
}

/// Yes/no answer used by the co-curricular and visitor sections.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub enum Presence {
    #[serde(rename = "Ada")]
    Yes,
    #[serde(rename = "Tiada")]
    No,
}

impl Presence {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Yes => "Ada",
            Self::No => "Tiada",
        }
    }
}

/// One day's report, exactly as the editor holds it.
///
/// Gated fields (`discipline_detail`, `visitor_note`) are always present and keep
/// their text while the gating status is switched off.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub weekday: String,
    pub teacher_name: String,
    pub assembly_speech_principal: String,
    pub assembly_speech_duty_teacher: String,
    pub assembly_prefects: String,
    pub present_count: i32,
    /// Derived from `present_count`, one decimal place.
    pub attendance_percent: String,
    pub absent_student_names: String,
    pub cleanliness_score: u8,
    pub cleanliness_area_status: AreaStatus,
    pub canteen_report: String,
    pub toilet_report: String,
    pub meal_menu: String,
    pub discipline_status: DisciplineStatus,
    pub discipline_detail: String,
    pub cocurricular_status: Presence,
    pub visitor_status: Presence,
    pub visitor_note: String,
    pub other_matters: String,
}

impl ReportRecord {
    /// Fresh record for the given day with full attendance.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            weekday: malay_weekday(date.weekday()).to_string(),
            teacher_name: String::new(),
            assembly_speech_principal: String::new(),
            assembly_speech_duty_teacher: String::new(),
            assembly_prefects: String::new(),
            present_count: TOTAL_STUDENTS,
            attendance_percent: attendance_percent(TOTAL_STUDENTS),
            absent_student_names: String::new(),
            cleanliness_score: 4,
            cleanliness_area_status: AreaStatus::Satisfactory,
            canteen_report: String::new(),
            toilet_report: String::new(),
            meal_menu: String::new(),
            discipline_status: DisciplineStatus::NoCase,
            discipline_detail: String::new(),
            cocurricular_status: Presence::No,
            visitor_status: Presence::No,
            visitor_note: String::new(),
            other_matters: String::new(),
        }
    }

    /// Fresh record dated today (local time).
    pub fn today() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::AssemblySpeechPrincipal => &self.assembly_speech_principal,
            TextField::AssemblySpeechDutyTeacher => &self.assembly_speech_duty_teacher,
            TextField::AssemblyPrefects => &self.assembly_prefects,
            TextField::AbsentStudentNames => &self.absent_student_names,
            TextField::CanteenReport => &self.canteen_report,
            TextField::ToiletReport => &self.toilet_report,
            TextField::MealMenu => &self.meal_menu,
            TextField::DisciplineDetail => &self.discipline_detail,
            TextField::VisitorNote => &self.visitor_note,
            TextField::OtherMatters => &self.other_matters,
        }
    }

    pub fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::AssemblySpeechPrincipal => &mut self.assembly_speech_principal,
            TextField::AssemblySpeechDutyTeacher => &mut self.assembly_speech_duty_teacher,
            TextField::AssemblyPrefects => &mut self.assembly_prefects,
            TextField::AbsentStudentNames => &mut self.absent_student_names,
            TextField::CanteenReport => &mut self.canteen_report,
            TextField::ToiletReport => &mut self.toilet_report,
            TextField::MealMenu => &mut self.meal_menu,
            TextField::DisciplineDetail => &mut self.discipline_detail,
            TextField::VisitorNote => &mut self.visitor_note,
            TextField::OtherMatters => &mut self.other_matters,
        }
    }
}

impl Default for ReportRecord {
    fn default() -> Self {
        Self::today()
    }
}

/// The free-text fields that can be refined by the language model.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum TextField {
    AssemblySpeechPrincipal,
    AssemblySpeechDutyTeacher,
    AssemblyPrefects,
    AbsentStudentNames,
    CanteenReport,
    ToiletReport,
    MealMenu,
    DisciplineDetail,
    VisitorNote,
    OtherMatters,
}

impl TextField {
    pub const ALL: [TextField; 10] = [
        Self::AssemblySpeechPrincipal,
        Self::AssemblySpeechDutyTeacher,
        Self::AssemblyPrefects,
        Self::AbsentStudentNames,
        Self::CanteenReport,
        Self::ToiletReport,
        Self::MealMenu,
        Self::DisciplineDetail,
        Self::VisitorNote,
        Self::OtherMatters,
    ];

    /// The record's JSON key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::AssemblySpeechPrincipal => "assemblySpeechPrincipal",
            Self::AssemblySpeechDutyTeacher => "assemblySpeechDutyTeacher",
            Self::AssemblyPrefects => "assemblyPrefects",
            Self::AbsentStudentNames => "absentStudentNames",
            Self::CanteenReport => "canteenReport",
            Self::ToiletReport => "toiletReport",
            Self::MealMenu => "mealMenu",
            Self::DisciplineDetail => "disciplineDetail",
            Self::VisitorNote => "visitorNote",
            Self::OtherMatters => "otherMatters",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// Weekday name in Bahasa Melayu.
pub fn malay_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Isnin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Khamis",
        Weekday::Fri => "Jumaat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Ahad",
    }
}
