use crate::core::constants::{
    DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_CONTEXT_MESSAGES, DEFAULT_MODEL,
    DEFAULT_SYSTEM_PROMPT,
};
use crate::highlight::RuleCategory;
use crate::utils::color::Rgba;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// API root, e.g. "https://openrouter.ai/api/v1"
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    /// Number of recent history messages sent with each request
    pub context_messages: Option<usize>,
    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Sent as `HTTP-Referer`; OpenRouter uses it for attribution
    pub referer: Option<String>,
    /// Enable syntax highlighting for fenced code blocks
    pub syntax: Option<bool>,
    /// Colour overrides per rule category, e.g. `keyword = "#dc78dc"`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub highlight: BTreeMap<RuleCategory, Rgba>,
}

impl Config {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    pub fn context_messages(&self) -> usize {
        self.context_messages.unwrap_or(DEFAULT_CONTEXT_MESSAGES)
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    pub fn syntax_enabled(&self) -> bool {
        self.syntax.unwrap_or(true)
    }

    /// Read the API key from the configured environment variable; blank counts as unset.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(self.api_key_env())
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
