//! `ReportRecord` to `ReportDocument`.
//!
//! Rendering is pure: the same record always gives the same document. The only
//! dated content comes from the record itself, including the footer year.

use chrono::Datelike;

use super::common::{
    format_malay_date, REPORT_TITLE, SCHOOL_ADDRESS, SCHOOL_CODE, SCHOOL_CREST_URL,
    SCHOOL_DISPLAY_NAME, SCHOOL_NAME, SCHOOL_NATIVE_NAME, SCHOOL_PHONE, SCHOOL_SHORT_NAME,
};
use super::{Block, InfoCell, Letterhead, ReportDocument, Section, Signature, Tone};
use crate::report::{DisciplineStatus, Presence, ReportRecord, TOTAL_STUDENTS};

/// Labels for cleanliness scores 1..=5.
pub const CLEANLINESS_LABELS: [&str; 5] = [
    "Sangat Lemah",
    "Lemah",
    "Memuaskan",
    "Baik",
    "Sangat Cemerlang",
];

pub const NO_ASSEMBLY_REPORT: &str = "Tiada laporan perhimpunan direkodkan.";
pub const NO_MEAL_MENU: &str = "Tiada menu direkodkan.";
pub const NO_DISCIPLINE_DETAIL: &str = "Tiada perihal kes direkodkan.";
pub const NO_DISCIPLINE_ISSUES: &str =
    "Semua dalam keadaan terkawal dan tiada sebarang isu disiplin dilaporkan.";
pub const NO_VISITOR_NOTE: &str = "Tiada catatan pelawat direkodkan.";
pub const NO_OTHER_MATTERS: &str = "Tiada hal lain dilaporkan.";

pub fn cleanliness_label(score: u8) -> Option<&'static str> {
    (1..=5)
        .contains(&score)
        .then(|| CLEANLINESS_LABELS[usize::from(score) - 1])
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn or_dash(value: &str) -> String {
    if is_blank(value) {
        "-".to_string()
    } else {
        value.to_string()
    }
}

pub fn render(record: &ReportRecord) -> ReportDocument {
    ReportDocument {
        letterhead: Letterhead {
            school_name: SCHOOL_NAME.to_string(),
            native_name: SCHOOL_NATIVE_NAME.to_string(),
            address: SCHOOL_ADDRESS.to_string(),
            contact: format!("KOD SEKOLAH: {} | NO. TEL: {}", SCHOOL_CODE, SCHOOL_PHONE),
            title: REPORT_TITLE.to_string(),
            crest_url: SCHOOL_CREST_URL.to_string(),
        },
        info: vec![
            InfoCell {
                label: "Tarikh".to_string(),
                value: format_malay_date(record.date),
            },
            InfoCell {
                label: "Hari".to_string(),
                value: or_dash(&record.weekday),
            },
            InfoCell {
                label: "Guru Bertugas".to_string(),
                value: or_dash(&record.teacher_name),
            },
        ],
        sections: vec![
            assembly_section(record),
            attendance_section(record),
            cleanliness_section(record),
            discipline_section(record),
            cocurricular_section(record),
            visitor_section(record),
            other_matters_section(record),
        ],
        signatures: vec![
            Signature {
                heading: "Disediakan oleh:".to_string(),
                name: if is_blank(&record.teacher_name) {
                    ".........................".to_string()
                } else {
                    record.teacher_name.clone()
                },
                role: "Guru Bertugas Mingguan".to_string(),
            },
            Signature {
                heading: "Disahkan oleh:".to_string(),
                name: "GURU BESAR / GPK".to_string(),
                role: SCHOOL_DISPLAY_NAME.to_string(),
            },
        ],
        footer: format!(
            "DIJANA MELALUI SISTEM E-LAPORAN GURU BERTUGAS {} | {}",
            SCHOOL_SHORT_NAME,
            record.date.year()
        ),
    }
}

fn assembly_section(record: &ReportRecord) -> Section {
    let speeches = [
        ("Ucapan Guru Besar:", &record.assembly_speech_principal),
        ("Ucapan Guru Bertugas:", &record.assembly_speech_duty_teacher),
        ("Nama Pengawas Bertugas:", &record.assembly_prefects),
    ];

    let mut blocks: Vec<Block> = speeches
        .into_iter()
        .filter(|(_, text)| !is_blank(text))
        .map(|(label, text)| Block::Entry {
            label: label.to_string(),
            text: text.clone(),
        })
        .collect();

    if blocks.is_empty() {
        blocks.push(Block::Placeholder {
            label: None,
            text: NO_ASSEMBLY_REPORT.to_string(),
        });
    }

    Section {
        number: 1,
        title: "PENGURUSAN PERHIMPUNAN".to_string(),
        half_width: false,
        blocks,
    }
}

fn attendance_section(record: &ReportRecord) -> Section {
    let mut blocks = vec![Block::Field {
        label: "Status Kehadiran:".to_string(),
        value: format!(
            "{} / {} Murid ({}%)",
            record.present_count, TOTAL_STUDENTS, record.attendance_percent
        ),
        tone: Tone::Neutral,
    }];

    if !is_blank(&record.absent_student_names) {
        blocks.push(Block::Entry {
            label: "Senarai Murid Tidak Hadir:".to_string(),
            text: record.absent_student_names.clone(),
        });
    }

    Section {
        number: 2,
        title: "KEHADIRAN MURID".to_string(),
        half_width: false,
        blocks,
    }
}

fn cleanliness_section(record: &ReportRecord) -> Section {
    let menu = if is_blank(&record.meal_menu) {
        Block::Placeholder {
            label: Some("Menu RMT Harian:".to_string()),
            text: NO_MEAL_MENU.to_string(),
        }
    } else {
        Block::Entry {
            label: "Menu RMT Harian:".to_string(),
            text: record.meal_menu.clone(),
        }
    };

    let blocks = vec![
        Block::Scale {
            label: "Skala Kebersihan:".to_string(),
            score: record.cleanliness_score,
            max: 5,
            caption: cleanliness_label(record.cleanliness_score)
                .unwrap_or("-")
                .to_string(),
        },
        menu,
        Block::Field {
            label: "Status Kawasan:".to_string(),
            value: record.cleanliness_area_status.label().to_string(),
            tone: Tone::Neutral,
        },
        Block::Field {
            label: "Laporan Kantin:".to_string(),
            value: or_dash(&record.canteen_report),
            tone: Tone::Neutral,
        },
        Block::Field {
            label: "Laporan Tandas:".to_string(),
            value: or_dash(&record.toilet_report),
            tone: Tone::Neutral,
        },
    ];

    Section {
        number: 3,
        title: "KEBERSIHAN, KECERIAAN & RMT".to_string(),
        half_width: false,
        blocks,
    }
}

fn discipline_section(record: &ReportRecord) -> Section {
    let status = record.discipline_status;
    let tone = match status {
        DisciplineStatus::HasCase => Tone::Caution,
        DisciplineStatus::NoCase => Tone::Positive,
    };

    let mut blocks = vec![Block::Field {
        label: "Status Disiplin:".to_string(),
        value: status.label().to_string(),
        tone,
    }];

    match status {
        DisciplineStatus::HasCase if is_blank(&record.discipline_detail) => {
            blocks.push(Block::Placeholder {
                label: None,
                text: NO_DISCIPLINE_DETAIL.to_string(),
            });
        }
        DisciplineStatus::HasCase => blocks.push(Block::Note {
            text: record.discipline_detail.clone(),
            tone: Tone::Caution,
        }),
        DisciplineStatus::NoCase => blocks.push(Block::Remark {
            text: NO_DISCIPLINE_ISSUES.to_string(),
        }),
    }

    Section {
        number: 4,
        title: "DISIPLIN & KESELAMATAN".to_string(),
        half_width: false,
        blocks,
    }
}

fn cocurricular_section(record: &ReportRecord) -> Section {
    Section {
        number: 5,
        title: "KOKURIKULUM".to_string(),
        half_width: true,
        blocks: vec![Block::Field {
            label: "Pelaksanaan:".to_string(),
            value: record.cocurricular_status.label().to_string(),
            tone: Tone::Neutral,
        }],
    }
}

fn visitor_section(record: &ReportRecord) -> Section {
    let mut blocks = vec![Block::Field {
        label: "Status:".to_string(),
        value: record.visitor_status.label().to_string(),
        tone: Tone::Neutral,
    }];

    if record.visitor_status == Presence::Yes {
        if is_blank(&record.visitor_note) {
            blocks.push(Block::Placeholder {
                label: None,
                text: NO_VISITOR_NOTE.to_string(),
            });
        } else {
            blocks.push(Block::Note {
                text: record.visitor_note.clone(),
                tone: Tone::Neutral,
            });
        }
    }

    Section {
        number: 6,
        title: "PELAWAT / PEGAWAI".to_string(),
        half_width: true,
        blocks,
    }
}

fn other_matters_section(record: &ReportRecord) -> Section {
    let block = if is_blank(&record.other_matters) {
        Block::Placeholder {
            label: None,
            text: NO_OTHER_MATTERS.to_string(),
        }
    } else {
        Block::Note {
            text: record.other_matters.clone(),
            tone: Tone::Neutral,
        }
    };

    Section {
        number: 7,
        title: "HAL-HAL LAIN / PENGUMUMAN".to_string(),
        half_width: false,
        blocks: vec![block],
    }
}
