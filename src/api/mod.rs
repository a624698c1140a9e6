//! Payloads for the OpenAI-compatible `chat/completions` endpoint.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;

use crate::core::message::Message;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self::new(message.role.as_str(), message.content.clone())
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

#[derive(Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionMessage,
}

#[derive(Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<ChatCompletionChoice>,
}

/// Why a response body could not be turned into reply text.
#[derive(Debug)]
pub enum ReplyError {
    /// The body was not a completion object at all.
    Malformed(serde_json::Error),
    /// The completion carried no `choices[0].message.content`.
    MissingContent,
}

impl fmt::Display for ReplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyError::Malformed(source) => write!(f, "Error parsing JSON response: {source}"),
            ReplyError::MissingContent => {
                f.write_str("Error parsing JSON response: no reply content")
            }
        }
    }
}

impl StdError for ReplyError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ReplyError::Malformed(source) => Some(source),
            ReplyError::MissingContent => None,
        }
    }
}

/// Pull the first choice's message text out of a completion body.
pub fn parse_reply(body: &str) -> Result<String, ReplyError> {
    let completion: ChatCompletion = serde_json::from_str(body).map_err(ReplyError::Malformed)?;
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(ReplyError::MissingContent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_like_the_api_expects() {
        let request = ChatRequest {
            model: "m".into(),
            messages: vec![
                ChatMessage::new("system", "be brief"),
                ChatMessage::from(&Message::user("hi")),
            ],
            stream: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "model": "m",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"}
                ],
                "stream": false
            })
        );
    }

    #[test]
    fn parse_reply_reads_first_choice() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Hello!"}},{"message":{"content":"ignored"}}]}"#;
        assert_eq!(parse_reply(body).unwrap(), "Hello!");
    }

    #[test]
    fn parse_reply_distinguishes_failures() {
        assert!(matches!(parse_reply("not json"), Err(ReplyError::Malformed(_))));
        assert!(matches!(
            parse_reply(r#"{"choices":[]}"#),
            Err(ReplyError::MissingContent)
        ));
        assert!(matches!(
            parse_reply(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(ReplyError::MissingContent)
        ));
        assert!(parse_reply("{}")
            .unwrap_err()
            .to_string()
            .starts_with("Error parsing JSON response"));
    }
}
