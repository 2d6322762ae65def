use async_trait::async_trait;

use crate::document::InputImage;
use crate::error::Result;
use crate::session::SessionContext;

/// Remote multimodal model that turns an image into a raw text reply.
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Issue the extraction request and return the model's reply text,
    /// unparsed. Any error is a transport failure from the caller's view.
    async fn extract(&self, image: &InputImage, session: &SessionContext) -> Result<String>;
}

/// Local text recognizer used when the structured path fails.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    fn name(&self) -> &str;
    async fn recognize(&self, image_bytes: &[u8]) -> Result<String>;
}
