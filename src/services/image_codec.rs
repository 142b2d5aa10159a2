use base64::Engine;

const BASE64: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Missing image data")]
    Empty,

    #[error("Invalid base64 image data")]
    Base64(#[from] base64::DecodeError),
}

/// Decode the inbound image field, which may be a bare base64 string or a
/// full data URI (`data:image/png;base64,...`).
pub fn decode_image_field(value: &str) -> Result<Vec<u8>, CodecError> {
    let encoded = match value.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => value,
    };

    if encoded.is_empty() {
        return Err(CodecError::Empty);
    }

    Ok(BASE64.decode(encoded)?)
}

/// Wrap artifact bytes in a data URI, sniffing the mime type from the bytes
/// themselves. Providers return PNG unless asked otherwise, so that is the
/// fallback for unrecognizable content.
pub fn to_data_uri(bytes: &[u8]) -> String {
    let mime = image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("image/png");

    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}
