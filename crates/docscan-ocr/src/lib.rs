//! Local text recognition used as the last-resort fallback.
//!
//! Images are decoded with the `image` crate, normalised to an 8-bit
//! grayscale PNG and piped through the Tesseract command-line engine.
//! Tesseract must be installed with the language data for the configured
//! language (`por` by default).

mod decode;
mod tesseract;

pub use decode::{decode_image, encode_for_recognition};
pub use tesseract::TesseractRecognizer;
