//! HTML output for the preview and print views.
//!
//! Interactive chrome (the action toolbar and the branding footer) is wrapped in
//! `no-print` elements, which the page's print stylesheet hides.

use std::fmt::Write;

use super::common::escape_html;
use super::{Block, ReportDocument, Section, Tone};

const STYLE: &str = r#"
body { font-family: Arial, Helvetica, sans-serif; background: #f1f5f9; margin: 0; color: #000; }
.toolbar { display: flex; gap: 8px; justify-content: center; padding: 12px; background: #fff; border-bottom: 1px solid #e2e8f0; }
.toolbar form { margin: 0; }
.notice { max-width: 190mm; margin: 16px auto 0; padding: 10px 16px; border-radius: 8px; background: #ecfdf5; border: 1px solid #a7f3d0; color: #065f46; font-weight: 600; text-align: center; }
.toolbar button { padding: 8px 20px; border-radius: 12px; border: 1px solid #cbd5e1; background: #fff; font-weight: 600; cursor: pointer; }
.report-card { background: #fff; max-width: 190mm; margin: 24px auto; padding: 12mm; font-size: 13px; line-height: 1.5; }
.letterhead { display: flex; align-items: center; gap: 24px; border-bottom: 4px double #000; padding-bottom: 20px; margin-bottom: 20px; }
.letterhead img { width: 96px; height: 96px; }
.letterhead .school { flex: 1; text-align: center; }
.letterhead h1 { font-size: 22px; margin: 0 0 4px; text-transform: uppercase; }
.letterhead p { margin: 2px 0; font-size: 10px; font-weight: 600; }
.letterhead .title { display: inline-block; margin-top: 12px; padding: 4px 28px; border: 2px solid #000; font-weight: 700; font-size: 16px; letter-spacing: 2px; background: #f8fafc; }
.info { display: grid; grid-template-columns: repeat(3, 1fr); border: 1px solid #000; background: #f8fafc; margin-bottom: 20px; }
.info div { padding: 6px; border-right: 1px solid #000; }
.info div:last-child { border-right: none; }
.info span { display: block; font-size: 9px; font-weight: 700; text-transform: uppercase; color: #64748b; }
.info strong { font-size: 13px; }
section { margin-bottom: 18px; }
section h3 { font-size: 13px; text-transform: uppercase; border-bottom: 1px solid #000; margin: 0 0 8px; }
section h3 .num { display: inline-block; background: #000; color: #fff; width: 18px; text-align: center; border-radius: 3px; margin-right: 6px; font-size: 10px; }
.blocks { padding-left: 26px; }
.label { display: block; font-size: 10px; font-weight: 700; text-transform: uppercase; color: #64748b; text-decoration: underline; }
.note { padding: 8px; border: 1px solid #e2e8f0; border-radius: 4px; background: #f8fafc; font-style: italic; }
.note.caution { border-color: #fecaca; background: #fef2f2; color: #7f1d1d; }
.placeholder, .remark { font-style: italic; color: #94a3b8; }
.remark { color: #64748b; }
.tone-caution { color: #dc2626; font-weight: 700; }
.tone-positive { color: #16a34a; font-weight: 700; }
.scale span.box { display: inline-block; width: 20px; height: 20px; line-height: 20px; text-align: center; border: 1px solid #e2e8f0; border-radius: 3px; margin-right: 2px; font-size: 10px; font-weight: 700; color: #cbd5e1; }
.scale span.box.on { background: #000; color: #fff; border-color: #000; }
.pair { display: grid; grid-template-columns: 1fr 1fr; gap: 32px; }
.signatures { display: flex; justify-content: space-between; padding: 0 40px; margin-top: 80px; }
.signatures div { width: 220px; text-align: center; }
.signatures .heading { font-weight: 700; text-decoration: underline; margin-bottom: 64px; }
.signatures .line { border-bottom: 1px solid #000; margin-bottom: 4px; }
.signatures .name { font-weight: 700; text-transform: uppercase; font-size: 11px; margin: 0; }
.signatures .role { font-size: 10px; margin: 0; }
footer { margin-top: 40px; padding-top: 12px; border-top: 1px solid #f1f5f9; font-size: 8px; color: #cbd5e1; text-align: center; letter-spacing: 2px; }
@page { size: A4 portrait; margin: 10mm; }
@media print {
  body { background: #fff; }
  .no-print { display: none !important; }
  .report-card { margin: 0; padding: 0; max-width: none; }
}
"#;

/// A toolbar action rendered as a button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarAction {
    pub label: String,
    pub method: &'static str,
    pub href: String,
}

/// Preview page with an action toolbar.
pub fn to_html(doc: &ReportDocument, toolbar: &[ToolbarAction]) -> String {
    page(doc, toolbar, None, false)
}

/// Preview page with a one-line notice above the report, e.g. the outcome of
/// an upload submitted from the toolbar.
pub fn to_html_with_notice(doc: &ReportDocument, toolbar: &[ToolbarAction], notice: &str) -> String {
    page(doc, toolbar, Some(notice), false)
}

/// Print page: same document, and the browser's print dialog opens on load.
pub fn to_print_html(doc: &ReportDocument) -> String {
    page(doc, &[], None, true)
}

fn page(
    doc: &ReportDocument,
    toolbar: &[ToolbarAction],
    notice: Option<&str>,
    auto_print: bool,
) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"ms\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_html(&doc.letterhead.title));
    let _ = writeln!(out, "<style>{}</style>", STYLE);
    out.push_str("</head>\n<body>\n");

    if !toolbar.is_empty() {
        out.push_str("<nav class=\"toolbar no-print\">\n");
        for action in toolbar {
            let method = if action.method.eq_ignore_ascii_case("get") {
                "get"
            } else {
                "post"
            };
            let _ = writeln!(
                out,
                "<form method=\"{}\" action=\"{}\"><button type=\"submit\">{}</button></form>",
                method,
                escape_html(&action.href),
                escape_html(&action.label)
            );
        }
        out.push_str("</nav>\n");
    }

    if let Some(notice) = notice {
        let _ = writeln!(out, "<p class=\"notice no-print\">{}</p>", escape_html(notice));
    }

    out.push_str("<main class=\"report-card\">\n");
    write_letterhead(&mut out, doc);
    write_info(&mut out, doc);

    let mut sections = doc.sections.iter().peekable();
    while let Some(section) = sections.next() {
        if section.half_width {
            if let Some(next) = sections.next_if(|next| next.half_width) {
                out.push_str("<div class=\"pair\">\n");
                write_section(&mut out, section);
                write_section(&mut out, next);
                out.push_str("</div>\n");
                continue;
            }
        }
        write_section(&mut out, section);
    }

    out.push_str("<div class=\"signatures\">\n");
    for signature in &doc.signatures {
        let _ = writeln!(
            out,
            "<div><p class=\"heading\">{}</p><div class=\"line\"></div><p class=\"name\">{}</p><p class=\"role\">{}</p></div>",
            escape_html(&signature.heading),
            escape_html(&signature.name),
            escape_html(&signature.role)
        );
    }
    out.push_str("</div>\n");

    let _ = writeln!(out, "<footer class=\"no-print\">{}</footer>", escape_html(&doc.footer));
    out.push_str("</main>\n");

    if auto_print {
        out.push_str("<script>window.addEventListener('load', function () { window.print(); });</script>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn write_letterhead(out: &mut String, doc: &ReportDocument) {
    let head = &doc.letterhead;
    let _ = writeln!(
        out,
        "<header class=\"letterhead\"><img src=\"{}\" alt=\"Logo\"><div class=\"school\"><h1>{}</h1><p>{}</p><p>{}</p><p>{}</p><div class=\"title\">{}</div></div></header>",
        escape_html(&head.crest_url),
        escape_html(&head.school_name),
        escape_html(&head.native_name),
        escape_html(&head.address),
        escape_html(&head.contact),
        escape_html(&head.title)
    );
}

fn write_info(out: &mut String, doc: &ReportDocument) {
    out.push_str("<div class=\"info\">");
    for cell in &doc.info {
        let _ = write!(
            out,
            "<div><span>{}</span><strong>{}</strong></div>",
            escape_html(&cell.label),
            escape_html(&cell.value)
        );
    }
    out.push_str("</div>\n");
}

fn write_section(out: &mut String, section: &Section) {
    let _ = writeln!(
        out,
        "<section><h3><span class=\"num\">{}</span>{}</h3><div class=\"blocks\">",
        section.number,
        escape_html(&section.title)
    );
    for block in &section.blocks {
        write_block(out, block);
    }
    out.push_str("</div></section>\n");
}

fn tone_class(tone: Tone) -> &'static str {
    match tone {
        Tone::Neutral => "",
        Tone::Positive => " class=\"tone-positive\"",
        Tone::Caution => " class=\"tone-caution\"",
    }
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Entry { label, text } => {
            let _ = writeln!(
                out,
                "<div><span class=\"label\">{}</span><p>{}</p></div>",
                escape_html(label),
                escape_html(text)
            );
        }
        Block::Field { label, value, tone } => {
            let _ = writeln!(
                out,
                "<p><strong>{}</strong> <span{}>{}</span></p>",
                escape_html(label),
                tone_class(*tone),
                escape_html(value)
            );
        }
        Block::Scale {
            label,
            score,
            max,
            caption,
        } => {
            let _ = write!(out, "<p class=\"scale\"><strong>{}</strong> ", escape_html(label));
            for i in 1..=*max {
                let on = if i <= *score { " on" } else { "" };
                let _ = write!(out, "<span class=\"box{}\">{}</span>", on, i);
            }
            let _ = writeln!(out, " <em>({})</em></p>", escape_html(caption));
        }
        Block::Note { text, tone } => {
            let class = match tone {
                Tone::Caution => "note caution",
                _ => "note",
            };
            let _ = writeln!(out, "<div class=\"{}\">{}</div>", class, escape_html(text));
        }
        Block::Placeholder { label, text } => {
            out.push_str("<div>");
            if let Some(label) = label {
                let _ = write!(out, "<span class=\"label\">{}</span>", escape_html(label));
            }
            let _ = writeln!(out, "<p class=\"placeholder\"><em>{}</em></p></div>", escape_html(text));
        }
        Block::Remark { text } => {
            let _ = writeln!(out, "<p class=\"remark\"><em>{}</em></p>", escape_html(text));
        }
    }
}
