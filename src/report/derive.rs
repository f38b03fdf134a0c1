//! Partial updates and derived fields.
//!
//! The editor sends only the fields it touched. `apply_update` merges them into a
//! copy of the current record and recomputes `attendance_percent` whenever the
//! headcount is part of the change set.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::model::{AreaStatus, DisciplineStatus, Presence, ReportRecord, TextField, TOTAL_STUDENTS};

/// A partial set of field assignments from the editor.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportUpdate {
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    pub weekday: Option<String>,
    pub teacher_name: Option<String>,
    pub assembly_speech_principal: Option<String>,
    pub assembly_speech_duty_teacher: Option<String>,
    pub assembly_prefects: Option<String>,
    /// Accepts a number or the raw text of the headcount input.
    #[serde(deserialize_with = "lenient_headcount")]
    #[schema(value_type = Option<i32>)]
    pub present_count: Option<i32>,
    /// Ignored: the percentage is always derived from `presentCount`.
    pub attendance_percent: Option<String>,
    pub absent_student_names: Option<String>,
    pub cleanliness_score: Option<u8>,
    pub cleanliness_area_status: Option<AreaStatus>,
    pub canteen_report: Option<String>,
    pub toilet_report: Option<String>,
    pub meal_menu: Option<String>,
    pub discipline_status: Option<DisciplineStatus>,
    pub discipline_detail: Option<String>,
    pub cocurricular_status: Option<Presence>,
    pub visitor_status: Option<Presence>,
    pub visitor_note: Option<String>,
    pub other_matters: Option<String>,
}

impl ReportUpdate {
    /// Update that only sets one free-text field.
    pub fn text(field: TextField, value: impl Into<String>) -> Self {
        let mut update = Self::default();
        let value = Some(value.into());
        match field {
            TextField::AssemblySpeechPrincipal => update.assembly_speech_principal = value,
            TextField::AssemblySpeechDutyTeacher => update.assembly_speech_duty_teacher = value,
            TextField::AssemblyPrefects => update.assembly_prefects = value,
            TextField::AbsentStudentNames => update.absent_student_names = value,
            TextField::CanteenReport => update.canteen_report = value,
            TextField::ToiletReport => update.toilet_report = value,
            TextField::MealMenu => update.meal_menu = value,
            TextField::DisciplineDetail => update.discipline_detail = value,
            TextField::VisitorNote => update.visitor_note = value,
            TextField::OtherMatters => update.other_matters = value,
        }
        update
    }

    pub fn present_count(count: i32) -> Self {
        Self {
            present_count: Some(count),
            ..Self::default()
        }
    }

    /// Free-text fields assigned by this update.
    pub fn touched_text_fields(&self) -> Vec<TextField> {
        let slots = [
            (TextField::AssemblySpeechPrincipal, &self.assembly_speech_principal),
            (TextField::AssemblySpeechDutyTeacher, &self.assembly_speech_duty_teacher),
            (TextField::AssemblyPrefects, &self.assembly_prefects),
            (TextField::AbsentStudentNames, &self.absent_student_names),
            (TextField::CanteenReport, &self.canteen_report),
            (TextField::ToiletReport, &self.toilet_report),
            (TextField::MealMenu, &self.meal_menu),
            (TextField::DisciplineDetail, &self.discipline_detail),
            (TextField::VisitorNote, &self.visitor_note),
            (TextField::OtherMatters, &self.other_matters),
        ];
        slots
            .into_iter()
            .filter(|(_, value)| value.is_some())
            .map(|(field, _)| field)
            .collect()
    }
}

/// Merge `update` into a copy of `record`, last write wins per field.
pub fn apply_update(record: &ReportRecord, update: ReportUpdate) -> ReportRecord {
    let mut next = record.clone();

    macro_rules! merge {
        ($($field:ident),* $(,)?) => {
            $(
                if let Some(value) = update.$field {
                    next.$field = value;
                }
            )*
        };
    }

    merge!(
        date,
        weekday,
        teacher_name,
        assembly_speech_principal,
        assembly_speech_duty_teacher,
        assembly_prefects,
        absent_student_names,
        cleanliness_score,
        cleanliness_area_status,
        canteen_report,
        toilet_report,
        meal_menu,
        discipline_status,
        discipline_detail,
        cocurricular_status,
        visitor_status,
        visitor_note,
        other_matters,
    );

    if let Some(present) = update.present_count {
        next.present_count = present;
        next.attendance_percent = attendance_percent(present);
    }

    next
}

/// `present / TOTAL_STUDENTS * 100` with one decimal place.
///
/// Out-of-range headcounts produce percentages outside 0..=100.
pub fn attendance_percent(present: i32) -> String {
    let percent = f64::from(present) / f64::from(TOTAL_STUDENTS) * 100.0;
    format!("{percent:.1}")
}

/// Parse a headcount the way an integer form field does: leading digits win,
/// anything unparseable becomes 0.
pub fn parse_headcount(raw: &str) -> i32 {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let prefix: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    prefix
        .parse::<i32>()
        .map(|value| sign * value)
        .unwrap_or(0)
}

fn lenient_headcount<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f.trunc() as i64))
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(0),
        Value::String(text) => parse_headcount(&text),
        _ => 0,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReportRecord {
        ReportRecord::for_date(NaiveDate::from_ymd_opt(2025, 5, 20).unwrap())
    }

    #[test]
    fn test_percent_examples() {
        assert_eq!(attendance_percent(33), "100.0");
        assert_eq!(attendance_percent(30), "90.9");
        assert_eq!(attendance_percent(0), "0.0");
        assert_eq!(attendance_percent(1), "3.0");
    }

    #[test]
    fn test_percent_out_of_range_does_not_fail() {
        assert_eq!(attendance_percent(66), "200.0");
        assert_eq!(attendance_percent(-33), "-100.0");
    }

    #[test]
    fn test_headcount_recomputes_percent() {
        let next = apply_update(&sample(), ReportUpdate::present_count(30));
        assert_eq!(next.present_count, 30);
        assert_eq!(next.attendance_percent, "90.9");
    }

    #[test]
    fn test_supplied_percent_is_overwritten() {
        let update = ReportUpdate {
            present_count: Some(11),
            attendance_percent: Some("99.9".to_string()),
            ..ReportUpdate::default()
        };
        let next = apply_update(&sample(), update);
        assert_eq!(next.attendance_percent, "33.3");
    }

    #[test]
    fn test_unrelated_update_keeps_percent() {
        let record = apply_update(&sample(), ReportUpdate::present_count(20));
        let update = ReportUpdate {
            teacher_name: Some("Pn. Kavitha".to_string()),
            attendance_percent: Some("12.0".to_string()),
            ..ReportUpdate::default()
        };
        let next = apply_update(&record, update);
        assert_eq!(next.teacher_name, "Pn. Kavitha");
        assert_eq!(next.attendance_percent, record.attendance_percent);
    }

    #[test]
    fn test_parse_headcount() {
        assert_eq!(parse_headcount("31"), 31);
        assert_eq!(parse_headcount(" 12 orang"), 12);
        assert_eq!(parse_headcount("abc"), 0);
        assert_eq!(parse_headcount(""), 0);
        assert_eq!(parse_headcount("-4"), -4);
    }

    #[test]
    fn test_update_deserializes_text_headcount() {
        let update: ReportUpdate = serde_json::from_str(r#"{"presentCount": "abc"}"#).unwrap();
        assert_eq!(update.present_count, Some(0));

        let update: ReportUpdate = serde_json::from_str(r#"{"presentCount": 28}"#).unwrap();
        assert_eq!(update.present_count, Some(28));

        let update: ReportUpdate = serde_json::from_str(r#"{"presentCount": null}"#).unwrap();
        assert_eq!(update.present_count, None);

        let update: ReportUpdate = serde_json::from_str(r#"{"mealMenu": "Nasi lemak"}"#).unwrap();
        assert_eq!(update.present_count, None);
    }

    #[test]
    fn test_touched_text_fields() {
        let update = ReportUpdate {
            meal_menu: Some("Mee goreng".to_string()),
            visitor_note: Some(String::new()),
            teacher_name: Some("En. Ravi".to_string()),
            ..ReportUpdate::default()
        };
        assert_eq!(
            update.touched_text_fields(),
            vec![TextField::MealMenu, TextField::VisitorNote]
        );
    }
}
