use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use docscan_core::error::{DocScanError, Result};

/// Decode uploaded bytes into a pixel buffer. The format is sniffed from the
/// content, not from the file name.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(DocScanError::Recognition("image is empty".into()));
    }
    image::load_from_memory(bytes)
        .map_err(|e| DocScanError::Recognition(format!("image could not be decoded: {e}")))
}

/// Re-encode a decoded image as grayscale PNG for the recognizer.
pub fn encode_for_recognition(image: &DynamicImage) -> Result<Vec<u8>> {
    let gray = DynamicImage::ImageLuma8(image.to_luma8());
    let mut out = Cursor::new(Vec::new());
    gray.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| DocScanError::Recognition(format!("image could not be re-encoded: {e}")))?;
    Ok(out.into_inner())
}
