//! `data:` URL decoding.

use crate::error::{Error, Result};
use base64::Engine as _;

/// Decode the payload of a base64 `data:` URL.
///
/// Only `image/*` media types are accepted. Whitespace inside the payload
/// (line-wrapped base64) is ignored.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidDataUrl("missing 'data:' prefix".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidDataUrl("missing ',' separator".to_string()))?;

    let mut params = header.split(';');
    let media_type = params.next().unwrap_or_default();
    if !media_type.starts_with("image/") {
        return Err(Error::InvalidDataUrl(format!(
            "expected an image media type, got '{}'",
            media_type
        )));
    }
    if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(Error::InvalidDataUrl("only base64 payloads are supported".to_string()));
    }

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| Error::InvalidDataUrl(format!("bad base64 payload: {}", e)))
}
