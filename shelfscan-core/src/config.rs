//! Runtime configuration for the remote services and local data directory

use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_VISION_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4.5-preview";
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_LOOKUP_URL: &str = "https://openlibrary.org";
pub const DEFAULT_DATA_DIR: &str = "./shelfscan_data";

/// Which request/response contract the vision service speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisionApi {
    /// `POST /chat/completions`, text at `choices[0].message.content`
    #[default]
    ChatCompletions,

    /// `POST /responses`, text at `output_text`
    Responses,
}

impl FromStr for VisionApi {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chat" | "chat-completions" | "chat_completions" => Ok(VisionApi::ChatCompletions),
            "responses" | "input" => Ok(VisionApi::Responses),
            other => Err(ConfigError::UnknownVisionApi(other.to_string())),
        }
    }
}

/// Settings for one pipeline instance
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Base URL of the vision service (without the endpoint path)
    pub vision_url: String,

    pub vision_model: String,

    pub vision_api: VisionApi,

    /// Bearer token for the vision service
    pub api_key: Option<String>,

    pub max_tokens: u32,

    /// Base URL of the bibliographic lookup service
    pub lookup_url: String,

    /// Root directory for persisted book lists
    pub data_dir: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            vision_url: DEFAULT_VISION_URL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            vision_api: VisionApi::default(),
            api_key: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            lookup_url: DEFAULT_LOOKUP_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl ScanConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = get("SHELFSCAN_VISION_URL") {
            config.vision_url = url;
        }
        if let Some(model) = get("SHELFSCAN_VISION_MODEL") {
            config.vision_model = model;
        }
        if let Some(api) = get("SHELFSCAN_VISION_API") {
            config.vision_api = api.parse()?;
        }
        config.api_key = get("OPEN_AI_KEY").filter(|k| !k.trim().is_empty());
        if let Some(url) = get("SHELFSCAN_LOOKUP_URL") {
            config.lookup_url = url;
        }
        if let Some(dir) = get("SHELFSCAN_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// The API key, required only once the vision client is built
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }
}
