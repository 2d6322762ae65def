use std::sync::Arc;

use docscan_core::{
    BatchReport, ImageOutcome, InputImage, SessionContext, TextRecognizer, VisionClient,
};

use crate::resolver::{Resolution, ResultResolver};

/// Per-image extraction: vision call, reply resolution, optional fallback.
pub struct ExtractionPipeline {
    vision: Arc<dyn VisionClient>,
    resolver: ResultResolver,
}

impl ExtractionPipeline {
    pub fn new(vision: Arc<dyn VisionClient>, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self {
            vision,
            resolver: ResultResolver::new(recognizer),
        }
    }

    pub async fn process_image(&self, session: &SessionContext, image: &InputImage) -> Resolution {
        let reply = self.vision.extract(image, session).await;
        self.resolver.resolve(reply, image).await
    }

    /// Process images one at a time, in order. Each image is fully resolved,
    /// fallback included, before the next request is sent.
    pub async fn process_batch(
        &self,
        session: &SessionContext,
        images: &[InputImage],
    ) -> BatchReport {
        tracing::info!(count = images.len(), "Starting batch extraction");

        let mut outcomes = Vec::with_capacity(images.len());
        for (index, image) in images.iter().enumerate() {
            tracing::info!(
                index,
                total = images.len(),
                image = %image.name,
                "Extracting document"
            );
            let resolution = self.process_image(session, image).await;
            outcomes.push(ImageOutcome {
                index,
                name: image.name.clone(),
                result: resolution.result,
                recognition_error: resolution.recognition_error,
            });
        }

        let report = BatchReport::from_outcomes(outcomes);
        if report.degraded_count > 0 {
            tracing::warn!(
                batch_id = %report.batch_id,
                structured = report.structured_count,
                degraded = report.degraded_count,
                "Batch extraction completed with degraded results"
            );
        } else {
            tracing::info!(
                batch_id = %report.batch_id,
                count = report.len(),
                "Batch extraction completed successfully"
            );
        }
        report
    }
}
