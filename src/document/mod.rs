//! Document module - the laid-out daily report.
//!
//! `render` turns a `ReportRecord` into a `ReportDocument`: a letterhead, an
//! info row, seven numbered sections and the signature block. The document is
//! then written out as an HTML page (`html`) or as Typst source for PDF
//! compilation (`typst`).

pub mod common;
pub mod html;
pub mod render;
pub mod typst;

use serde::Serialize;
use utoipa::ToSchema;

pub use render::{cleanliness_label, render, CLEANLINESS_LABELS};

/// Emphasis cue for a value or note.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Tone {
    Neutral,
    Positive,
    Caution,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Positive => "positive",
            Self::Caution => "caution",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Letterhead {
    pub school_name: String,
    pub native_name: String,
    pub address: String,
    pub contact: String,
    pub title: String,
    pub crest_url: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct InfoCell {
    pub label: String,
    pub value: String,
}

/// One piece of section content.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Block {
    /// A labelled paragraph, e.g. a speech summary.
    Entry { label: String, text: String },
    /// An inline `label value` line.
    Field {
        label: String,
        value: String,
        tone: Tone,
    },
    /// The 1..=max cleanliness scale.
    Scale {
        label: String,
        score: u8,
        max: u8,
        caption: String,
    },
    /// Boxed free text shown under a status line.
    Note { text: String, tone: Tone },
    /// Fixed italic sentence standing in for content that was not recorded.
    Placeholder { label: Option<String>, text: String },
    /// Fixed italic sentence that is itself the content.
    Remark { text: String },
}

impl Block {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub number: u8,
    pub title: String,
    /// Sections 5 and 6 share a row.
    pub half_width: bool,
    pub blocks: Vec<Block>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Signature {
    pub heading: String,
    pub name: String,
    pub role: String,
}

/// The fully laid-out report.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub letterhead: Letterhead,
    pub info: Vec<InfoCell>,
    pub sections: Vec<Section>,
    pub signatures: Vec<Signature>,
    /// Branding caption, left out of printed copies.
    pub footer: String,
}

impl ReportDocument {
    pub fn section(&self, number: u8) -> Option<&Section> {
        self.sections.iter().find(|section| section.number == number)
    }
}
