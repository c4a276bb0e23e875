use crate::error::IdentifyError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;

/// Re-encode any supported image as JPEG at `quality` (1-100).
///
/// The image is not resized; large photos produce large payloads.
pub fn encode_jpeg(bytes: &[u8], quality: u8) -> Result<Vec<u8>, IdentifyError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| IdentifyError::InvalidImage(e.to_string()))?;
    let rgb = decoded.to_rgb8();

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode_image(&rgb)
        .map_err(|e| IdentifyError::InvalidImage(e.to_string()))?;
    Ok(out)
}

pub fn jpeg_data_uri(bytes: &[u8], quality: u8) -> Result<String, IdentifyError> {
    let jpeg = encode_jpeg(bytes, quality)?;
    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg)))
}
