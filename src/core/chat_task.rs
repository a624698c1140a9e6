use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{parse_reply, ChatMessage, ChatRequest};
use crate::utils::url::construct_api_url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskMessage {
    Reply(String),
    /// Human-readable failure description; may contain a fenced JSON body.
    Failed(String),
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
}

/// Describe a non-success response: status line, summary if any, body fenced for display.
fn format_api_error(status: &str, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("API Error ({status})");
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Ok(pretty_json) = serde_json::to_string_pretty(&json_value) {
            return match extract_error_summary(&json_value) {
                Some(summary) => {
                    format!("API Error ({status}): {summary}\n```json\n{pretty_json}\n```")
                }
                None => format!("API Error ({status}):\n```json\n{pretty_json}\n```"),
            };
        }
    }

    format!("API Error ({status}):\n```\n{trimmed}\n```")
}

pub struct RequestParams {
    pub client: reqwest::Client,
    pub base_url: String,
    pub api_key: String,
    pub referer: Option<String>,
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub cancel_token: CancellationToken,
    pub request_id: u64,
}

async fn complete(params: RequestParams) -> TaskMessage {
    let RequestParams {
        client,
        base_url,
        api_key,
        referer,
        model,
        messages,
        request_id,
        ..
    } = params;

    let request = ChatRequest {
        model,
        messages,
        stream: false,
    };
    let url = construct_api_url(&base_url, "chat/completions");
    debug!(request_id, %url, "sending completion request");

    let mut http_request = client
        .post(url)
        .header("Content-Type", "application/json")
        .bearer_auth(&api_key);
    if let Some(referer) = referer.as_deref() {
        http_request = http_request.header("HTTP-Referer", referer);
    }

    let response = match http_request.json(&request).send().await {
        Ok(response) => response,
        Err(err) => {
            warn!(request_id, error = %err, "completion request failed");
            return TaskMessage::Failed(err.to_string());
        }
    };

    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => return TaskMessage::Failed(err.to_string()),
    };

    if !status.is_success() {
        warn!(request_id, %status, "completion request rejected");
        return TaskMessage::Failed(format_api_error(&status.to_string(), &body));
    }

    match parse_reply(&body) {
        Ok(reply) => TaskMessage::Reply(reply),
        Err(err) => TaskMessage::Failed(err.to_string()),
    }
}

/// Runs completion requests off the caller's task and reports back over a channel.
#[derive(Clone)]
pub struct ChatTaskService {
    tx: mpsc::UnboundedSender<(TaskMessage, u64)>,
}

impl ChatTaskService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(TaskMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Spawn one request. A cancelled request delivers nothing.
    pub fn spawn_request(&self, params: RequestParams) {
        let tx = self.tx.clone();
        let cancel_token = params.cancel_token.clone();
        let request_id = params.request_id;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    debug!(request_id, "completion request cancelled");
                }
                outcome = complete(params) => {
                    let _ = tx.send((outcome, request_id));
                }
            }
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: TaskMessage, request_id: u64) {
        let _ = self.tx.send((message, request_id));
    }
}
