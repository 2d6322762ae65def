pub mod pipeline;
pub mod prompt;
pub mod reply;
pub mod resolver;
pub mod vision;

pub use pipeline::ExtractionPipeline;
pub use reply::{parse_reply, ReplyError};
pub use resolver::{Resolution, ResultResolver};
pub use vision::OpenAiVisionClient;
