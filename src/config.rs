use serde::Deserialize;

const DEFAULT_READ_RETRY_HINT: &str = "Error reading tag. Keep the tag close.";
const DEFAULT_TEXT_LANGUAGE: &str = "en";
const DEFAULT_SCAN_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid session config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for a [`crate::session::TagSession`], every field has a default
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Message passed along with a recoverable read error
    pub read_retry_hint: String,

    /// Language code used for text records serialized to NDEF bytes
    pub text_language: String,

    /// How many decoded scan events can queue up before the reader waits for the listener
    pub scan_channel_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            read_retry_hint: DEFAULT_READ_RETRY_HINT.to_string(),
            text_language: DEFAULT_TEXT_LANGUAGE.to_string(),
            scan_channel_capacity: DEFAULT_SCAN_CHANNEL_CAPACITY,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
