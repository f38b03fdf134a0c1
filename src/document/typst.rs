//! Typst source for the PDF export.
//!
//! The layout helpers live in `static/laporan_harian.typ`; this module sets the
//! page and emits one helper call per document element. Every user string goes
//! through `escape_typst_string` and is passed as a Typst string literal, so
//! report text is never interpreted as markup.

use std::fmt::Write;

use super::common::escape_typst_string;
use super::{Block, ReportDocument, Section};

pub const TEMPLATE_FILE: &str = "laporan_harian.typ";

const PREAMBLE: &str = include_str!("../../static/laporan_harian.typ");

/// Page configuration for the exported PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSetup {
    /// Typst paper name.
    pub paper: String,
    pub landscape: bool,
    pub margin_mm: u32,
}

impl Default for PageSetup {
    /// A4 portrait with 10 mm margins.
    fn default() -> Self {
        Self {
            paper: "a4".to_string(),
            landscape: false,
            margin_mm: 10,
        }
    }
}

fn lit(value: &str) -> String {
    format!("\"{}\"", escape_typst_string(value))
}

pub fn to_typst(doc: &ReportDocument, page: &PageSetup) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#set page(paper: {}, flipped: {}, margin: {}mm)",
        lit(&page.paper),
        page.landscape,
        page.margin_mm
    );
    out.push_str(PREAMBLE);
    out.push('\n');

    let head = &doc.letterhead;
    let _ = writeln!(
        out,
        "#letterhead({}, {}, {}, {}, {})",
        lit(&head.school_name),
        lit(&head.native_name),
        lit(&head.address),
        lit(&head.contact),
        lit(&head.title)
    );

    let cells: Vec<String> = doc
        .info
        .iter()
        .map(|cell| format!("({}, {})", lit(&cell.label), lit(&cell.value)))
        .collect();
    let _ = writeln!(out, "#info-row({})", cells.join(", "));

    let mut sections = doc.sections.iter().peekable();
    while let Some(section) = sections.next() {
        if section.half_width {
            if let Some(next) = sections.next_if(|next| next.half_width) {
                out.push_str("#grid(columns: (1fr, 1fr), column-gutter: 16pt,\n[\n");
                write_section(&mut out, section);
                out.push_str("],\n[\n");
                write_section(&mut out, next);
                out.push_str("])\n");
                continue;
            }
        }
        write_section(&mut out, section);
    }

    out.push_str("#v(40pt)\n#grid(columns: (1fr, 1fr),\n");
    for signature in &doc.signatures {
        let _ = writeln!(
            out,
            "  signature({}, {}, {}),",
            lit(&signature.heading),
            lit(&signature.name),
            lit(&signature.role)
        );
    }
    out.push_str(")\n#v(24pt)\n");
    let _ = writeln!(out, "#footer-caption({})", lit(&doc.footer));
    out
}

fn write_section(out: &mut String, section: &Section) {
    let _ = writeln!(
        out,
        "#section-heading({}, {})",
        lit(&section.number.to_string()),
        lit(&section.title)
    );
    for block in &section.blocks {
        write_block(out, block);
    }
}

fn write_block(out: &mut String, block: &Block) {
    let _ = match block {
        Block::Entry { label, text } => writeln!(out, "#entry({}, {})", lit(label), lit(text)),
        Block::Field { label, value, tone } => writeln!(
            out,
            "#field({}, {}, tone: {})",
            lit(label),
            lit(value),
            lit(tone.as_str())
        ),
        Block::Scale {
            label,
            score,
            max,
            caption,
        } => writeln!(
            out,
            "#score-scale({}, {}, {}, {})",
            lit(label),
            score,
            max,
            lit(caption)
        ),
        Block::Note { text, tone } => {
            writeln!(out, "#note({}, tone: {})", lit(text), lit(tone.as_str()))
        }
        Block::Placeholder {
            label: Some(label),
            text,
        } => writeln!(out, "#placeholder({}, label: {})", lit(text), lit(label)),
        Block::Placeholder { label: None, text } => {
            writeln!(out, "#placeholder({})", lit(text))
        }
        Block::Remark { text } => writeln!(out, "#remark({})", lit(text)),
    };
}
