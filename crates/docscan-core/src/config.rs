use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DocScanError, Result};
use crate::session::RequestPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default, skip_serializing)]
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub vision_model: String,
    pub vision_max_tokens: u32,
    pub vision_timeout_secs: u64,
    pub vision_max_attempts: u32,
    pub tesseract_bin: String,
    pub ocr_language: String,
    pub ocr_timeout_secs: u64,
    pub server_host: String,
    pub server_port: u16,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_base_url: DEFAULT_BASE_URL.into(),
            vision_model: DEFAULT_MODEL.into(),
            vision_max_tokens: 1000,
            vision_timeout_secs: 30,
            vision_max_attempts: 1,
            tesseract_bin: "tesseract".into(),
            ocr_language: "por".into(),
            ocr_timeout_secs: 60,
            server_host: "0.0.0.0".into(),
            server_port: 8080,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or(defaults.openai_base_url),
            vision_model: std::env::var("VISION_MODEL").unwrap_or(defaults.vision_model),
            vision_max_tokens: env_or("VISION_MAX_TOKENS", defaults.vision_max_tokens),
            vision_timeout_secs: env_or("VISION_TIMEOUT_SECS", defaults.vision_timeout_secs),
            vision_max_attempts: env_or("VISION_MAX_ATTEMPTS", defaults.vision_max_attempts),
            tesseract_bin: std::env::var("TESSERACT_BIN").unwrap_or(defaults.tesseract_bin),
            ocr_language: std::env::var("OCR_LANGUAGE").unwrap_or(defaults.ocr_language),
            ocr_timeout_secs: env_or("OCR_TIMEOUT_SECS", defaults.ocr_timeout_secs),
            server_host: std::env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        }
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.openai_base_url).map_err(|e| {
            DocScanError::Config(format!(
                "OPENAI_BASE_URL '{}' is not a valid URL: {e}",
                self.openai_base_url
            ))
        })?;
        if self.vision_timeout_secs == 0 {
            return Err(DocScanError::Config(
                "VISION_TIMEOUT_SECS must be greater than zero".into(),
            ));
        }
        if self.vision_max_attempts == 0 {
            return Err(DocScanError::Config(
                "VISION_MAX_ATTEMPTS must be at least 1".into(),
            ));
        }
        if self.ocr_timeout_secs == 0 {
            return Err(DocScanError::Config(
                "OCR_TIMEOUT_SECS must be greater than zero".into(),
            ));
        }
        if self.vision_model.trim().is_empty() {
            return Err(DocScanError::Config("VISION_MODEL must not be empty".into()));
        }
        Ok(())
    }

    pub fn request_policy(&self) -> RequestPolicy {
        RequestPolicy {
            timeout: Duration::from_secs(self.vision_timeout_secs),
            max_attempts: self.vision_max_attempts,
        }
    }

    pub fn has_credential(&self) -> bool {
        !self.openai_api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.vision_model, "gpt-4o");
        assert_eq!(config.ocr_language, "por");
        assert!(!config.has_credential());
    }

    #[test]
    fn default_policy_is_single_attempt_thirty_seconds() {
        let policy = AppConfig::default().request_policy();
        assert_eq!(policy.timeout, Duration::from_secs(30));
        assert_eq!(policy.max_attempts, 1);
    }

    #[test]
    fn rejects_bad_base_url() {
        let config = AppConfig {
            openai_base_url: "not a url".into(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(DocScanError::Config(_))));
    }

    #[test]
    fn rejects_zero_timeout_and_attempts() {
        let config = AppConfig {
            vision_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            vision_max_attempts: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn api_key_is_not_serialized() {
        let config = AppConfig {
            openai_api_key: "sk-secret".into(),
            ..AppConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }
}
