//! Shared helpers for document output: school identity, date formatting,
//! escaping and export file names.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

pub const SCHOOL_NAME: &str = "SJK (TAMIL) LADANG TEBONG";
pub const SCHOOL_NATIVE_NAME: &str = "தோட்டத் தமிழ்ப்பள்ளி, மேலக்கா";
pub const SCHOOL_ADDRESS: &str = "76460 TEBONG, MELAKA";
pub const SCHOOL_CODE: &str = "MBD0070";
pub const SCHOOL_PHONE: &str = "05-4914191";
pub const SCHOOL_SHORT_NAME: &str = "SJKTLT";
pub const SCHOOL_DISPLAY_NAME: &str = "SJKT Ladang Tebong";
pub const SCHOOL_CREST_URL: &str = "https://api.dicebear.com/7.x/initials/svg?seed=SJKTLT";
pub const REPORT_TITLE: &str = "LAPORAN HARIAN GURU BERTUGAS";

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("static regex");
}

/// Format a date as `dd/mm/yyyy`.
pub fn format_malay_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\r', "")
        .replace('\n', r"\n")
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Make a name safe for a file name: whitespace runs become `_`, characters
/// that filesystems reject are dropped.
pub fn filename_component(name: &str) -> String {
    let underscored = WHITESPACE.replace_all(name.trim(), "_");
    sanitize_filename::sanitize(underscored.as_ref())
}

/// `Laporan_Guru_{date}_{teacher}.pdf`
pub fn report_filename(date: NaiveDate, teacher_name: &str) -> String {
    format!(
        "Laporan_Guru_{}_{}.pdf",
        date.format("%Y-%m-%d"),
        filename_component(teacher_name)
    )
}

/// `{SCHOOL}_DRIVE_UPLOAD_{date}.pdf`
pub fn cloud_filename(date: NaiveDate) -> String {
    format!(
        "{}_DRIVE_UPLOAD_{}.pdf",
        SCHOOL_SHORT_NAME,
        date.format("%Y-%m-%d")
    )
}
