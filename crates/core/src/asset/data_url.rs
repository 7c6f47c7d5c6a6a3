//! `data:` URL codec for cached site assets.
//!
//! Entries in the site asset cache are stored as
//! `data:<mediaType>;base64,<payload>`.

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use regex::Regex;

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^data:([^;,]+);base64").unwrap());

/// Errors from decoding a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataUrlError {
    #[error("missing ',' between header and payload")]
    MissingComma,

    #[error("header is not of the form data:<media-type>;base64")]
    MissingMarker,

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),

    #[error("empty payload")]
    Empty,
}

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAsset {
    pub media_type: String,
    pub bytes: Bytes,
}

/// Decode a `data:` URL into its media type and raw bytes.
///
/// The string is split on the first comma. An empty payload is an error so
/// callers never mistake it for an image.
pub fn decode(encoded: &str) -> Result<DecodedAsset, DataUrlError> {
    let (header, payload) = encoded.split_once(',').ok_or(DataUrlError::MissingComma)?;

    let media_type = MARKER_RE
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(DataUrlError::MissingMarker)?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| DataUrlError::InvalidBase64(e.to_string()))?;

    if bytes.is_empty() {
        return Err(DataUrlError::Empty);
    }

    Ok(DecodedAsset { media_type, bytes: Bytes::from(bytes) })
}

/// Encode raw bytes as a base64 `data:` URL.
pub fn encode(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
}
