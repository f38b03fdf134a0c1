//! Report module - the daily duty report record and everything derived from it.
//!
//! - `model` - the flat `ReportRecord` and its enumerated fields
//! - `derive` - partial updates and the attendance percentage derivation
//! - `share` - base64/JSON share fragment codec
//! - `validation` - range checks for updates coming from the editor
//! - `completion` - the editor's "status laporan" checklist

pub mod completion;
pub mod derive;
pub mod model;
pub mod share;
pub mod validation;

pub use completion::{completion_status, CompletionItem};
pub use derive::{apply_update, attendance_percent, parse_headcount, ReportUpdate};
pub use model::{
    AreaStatus, DisciplineStatus, Presence, ReportRecord, TextField, TOTAL_STUDENTS,
};
pub use share::{decode_fragment, decode_or_default, encode_fragment, share_link, ShareError};
pub use validation::{ValidationError, ValidationErrors, Validator};
