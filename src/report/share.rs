//! Share fragment codec.
//!
//! A report is shared by putting `base64(json(record))` in the URL fragment.
//! Opening a link decodes the fragment; a fragment that does not decode leaves
//! the session on a fresh record.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::warn;
use thiserror::Error;

use super::model::ReportRecord;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share fragment is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("share fragment is not a valid report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("share fragment is empty")]
    Empty,
}

pub fn encode_fragment(record: &ReportRecord) -> Result<String, ShareError> {
    let json = serde_json::to_vec(record)?;
    Ok(STANDARD.encode(json))
}

/// Decode a fragment, tolerating a leading `#` and surrounding whitespace.
pub fn decode_fragment(fragment: &str) -> Result<ReportRecord, ShareError> {
    let trimmed = fragment.trim();
    let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(ShareError::Empty);
    }

    let bytes = STANDARD.decode(trimmed)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Decode a fragment or fall back to `fallback()` after logging the failure.
pub fn decode_or_default<F>(fragment: &str, fallback: F) -> ReportRecord
where
    F: FnOnce() -> ReportRecord,
{
    match decode_fragment(fragment) {
        Ok(record) => record,
        Err(e) => {
            warn!("Failed to parse shared report data: {}", e);
            fallback()
        }
    }
}

/// Shareable link for `record` rooted at `public_url`.
pub fn share_link(public_url: &str, fragment: &str) -> String {
    format!("{}/#{}", public_url.trim_end_matches('/'), fragment)
}
