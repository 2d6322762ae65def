use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use docscan_core::config::AppConfig;
use docscan_core::error::{DocScanError, Result};
use docscan_core::extraction::TextRecognizer;

use crate::decode::{decode_image, encode_for_recognition};

/// Runs `tesseract stdin stdout -l <language>` over the decoded image.
pub struct TesseractRecognizer {
    binary: String,
    language: String,
    timeout: Duration,
}

impl TesseractRecognizer {
    pub fn new(binary: impl Into<String>, language: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.tesseract_bin.clone(),
            config.ocr_language.clone(),
            Duration::from_secs(config.ocr_timeout_secs),
        )
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn args(&self) -> [&str; 4] {
        ["stdin", "stdout", "-l", self.language.as_str()]
    }

    async fn run(&self, png: Vec<u8>) -> Result<String> {
        let mut child = Command::new(&self.binary)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DocScanError::Recognition(format!("failed to start '{}': {e}", self.binary))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| DocScanError::Internal("recognizer stdin not captured".into()))?;

        // Feed stdin while draining stdout/stderr so neither side blocks on a full pipe.
        let send = async move {
            let written = stdin.write_all(&png).await;
            drop(stdin);
            written
        };
        let exchange = async { tokio::join!(send, child.wait_with_output()) };
        let (written, output) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| {
                DocScanError::Recognition(format!(
                    "recognizer timed out after {}s",
                    self.timeout.as_secs_f32()
                ))
            })?;
        let output =
            output.map_err(|e| DocScanError::Recognition(format!("recognizer failed: {e}")))?;

        // A recognizer that exits early closes stdin; its stderr says why.
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DocScanError::Recognition(format!(
                "recognizer exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        written.map_err(|e| DocScanError::Recognition(format!("failed to send image: {e}")))?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image_bytes: &[u8]) -> Result<String> {
        let bytes = image_bytes.to_vec();
        let png = tokio::task::spawn_blocking(move || {
            let image = decode_image(&bytes)?;
            encode_for_recognition(&image)
        })
        .await
        .map_err(|e| DocScanError::Internal(format!("decode task failed: {e}")))??;

        tracing::debug!(
            binary = %self.binary,
            language = %self.language,
            png_bytes = png.len(),
            "Running local text recognition"
        );

        self.run(png).await
    }
}
