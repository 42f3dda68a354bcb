//! Inline image payloads carried as data URLs.

use serde::{Deserialize, Serialize};

/// MIME type used when a data URL does not carry a readable one.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// A base64 image split out of a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64 payload, not decoded.
    pub data: String,
}

/// Split `data:<mime>;base64,<payload>` into its parts.
///
/// Never fails. Input without a comma is treated as a bare payload, and a
/// header without a `type/subtype` falls back to [`DEFAULT_MIME_TYPE`].
pub fn parse_data_url(input: &str) -> InlineImage {
    let input = input.trim();
    let (header, data) = match input.split_once(',') {
        Some((header, data)) => (header, data),
        None => ("", input),
    };

    let mime_type = header
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .map(str::trim)
        .filter(|mime| is_mime_type(mime))
        .unwrap_or(DEFAULT_MIME_TYPE);

    InlineImage {
        mime_type: mime_type.to_string(),
        data: data.trim().to_string(),
    }
}

fn is_mime_type(candidate: &str) -> bool {
    match candidate.split_once('/') {
        Some((kind, sub)) => !kind.is_empty() && !sub.is_empty() && !sub.contains('/'),
        None => false,
    }
}
