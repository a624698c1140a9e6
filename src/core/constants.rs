//! Shared constants used across the application

/// OpenAI-compatible endpoint root; `chat/completions` is appended.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct:free";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Environment variable consulted for the API key unless the config names another.
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// How many of the most recent history messages accompany each request.
pub const DEFAULT_CONTEXT_MESSAGES: usize = 4;

/// Indent applied to message bodies under their role header.
pub const BODY_INDENT: usize = 2;
