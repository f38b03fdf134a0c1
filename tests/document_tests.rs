mod common;

use common::blank_record;
use laporan_harian_server::document::html::{to_html, to_print_html, ToolbarAction};
use laporan_harian_server::document::render::{
    NO_ASSEMBLY_REPORT, NO_DISCIPLINE_ISSUES, NO_MEAL_MENU, NO_OTHER_MATTERS, NO_VISITOR_NOTE,
};
use laporan_harian_server::document::typst::{to_typst, PageSetup};
use laporan_harian_server::document::{render, Block, ReportDocument};
use laporan_harian_server::report::{DisciplineStatus, Presence};

fn placeholder_texts(doc: &ReportDocument) -> Vec<String> {
    doc.sections
        .iter()
        .flat_map(|section| section.blocks.iter())
        .filter_map(|block| match block {
            Block::Placeholder { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn notes(doc: &ReportDocument, section: u8) -> Vec<String> {
    doc.section(section)
        .map(|s| {
            s.blocks
                .iter()
                .filter_map(|block| match block {
                    Block::Note { text, .. } | Block::Remark { text } => Some(text.clone()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_render_is_deterministic() {
    let mut record = blank_record();
    record.teacher_name = "Puan Lakshmi".to_string();
    record.canteen_report = "Kantin bersih".to_string();

    assert_eq!(render(&record), render(&record));
    assert_eq!(
        to_html(&render(&record), &[]),
        to_html(&render(&record), &[])
    );
    assert_eq!(
        to_typst(&render(&record), &PageSetup::default()),
        to_typst(&render(&record), &PageSetup::default())
    );
}

#[test]
fn test_blank_record_uses_placeholders() {
    let doc = render(&blank_record());
    let placeholders = placeholder_texts(&doc);

    assert!(placeholders.contains(&NO_ASSEMBLY_REPORT.to_string()));
    assert!(placeholders.contains(&NO_MEAL_MENU.to_string()));
    assert!(placeholders.contains(&NO_OTHER_MATTERS.to_string()));
    assert_eq!(notes(&doc, 4), vec![NO_DISCIPLINE_ISSUES.to_string()]);

    let html = to_html(&doc, &[]);
    assert!(html.contains(NO_ASSEMBLY_REPORT));
    assert!(html.contains(NO_OTHER_MATTERS));
}

#[test]
fn test_one_speech_replaces_assembly_placeholder() {
    let mut record = blank_record();
    record.assembly_speech_duty_teacher = "Menepati masa ke sekolah.".to_string();

    let doc = render(&record);
    assert!(!placeholder_texts(&doc).contains(&NO_ASSEMBLY_REPORT.to_string()));
}

#[test]
fn test_gated_sections_follow_status() {
    let mut record = blank_record();
    record.discipline_detail = "Murid ponteng kelas.".to_string();
    record.visitor_note = "Pegawai PPD melawat pukul 10 pagi.".to_string();

    let hidden = render(&record);
    assert!(!notes(&hidden, 4).contains(&record.discipline_detail));
    assert!(notes(&hidden, 6).is_empty());

    record.discipline_status = DisciplineStatus::HasCase;
    record.visitor_status = Presence::Yes;
    let shown = render(&record);
    assert_eq!(notes(&shown, 4), vec![record.discipline_detail.clone()]);
    assert_eq!(notes(&shown, 6), vec![record.visitor_note.clone()]);

    record.visitor_note.clear();
    let empty_note = render(&record);
    assert!(placeholder_texts(&empty_note).contains(&NO_VISITOR_NOTE.to_string()));
}

#[test]
fn test_attendance_line_and_scale_caption() {
    let mut record = blank_record();
    record.present_count = 30;
    record.attendance_percent = "90.9".to_string();
    record.cleanliness_score = 5;

    let html = to_html(&render(&record), &[]);
    assert!(html.contains("30 / 33 Murid (90.9%)"));
    assert!(html.contains("Sangat Cemerlang"));
}

#[test]
fn test_toolbar_only_in_preview_page() {
    let doc = render(&blank_record());
    let toolbar = vec![ToolbarAction {
        label: "Simpan PDF".to_string(),
        method: "post",
        href: "/api/report/pdf".to_string(),
    }];

    let preview = to_html(&doc, &toolbar);
    assert!(preview.contains("Simpan PDF"));
    assert!(preview.contains("no-print"));

    let print = to_print_html(&doc);
    assert!(!print.contains("Simpan PDF"));
    assert!(print.contains("window.print()"));
}

#[test]
fn test_typst_source_escapes_user_text() {
    let mut record = blank_record();
    record.other_matters = "Sumbangan \"derma\" #1".to_string();

    let source = to_typst(&render(&record), &PageSetup::default());
    assert!(source.contains("paper: \"a4\""));
    assert!(source.contains("Sumbangan \\\"derma\\\" #1"));
}
