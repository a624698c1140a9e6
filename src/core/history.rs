use crate::api::ChatMessage;
use crate::core::message::{Message, Role};

/// The chat transcript. Owned by one task; callers append explicitly.
#[derive(Debug, Default, Clone)]
pub struct ChatHistory {
    messages: Vec<Message>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The `window` most recent messages, oldest first.
    pub fn recent(&self, window: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(window);
        &self.messages[start..]
    }

    /// System prompt followed by the recent window, ready for a completion request.
    pub fn request_messages(&self, system_prompt: &str, window: usize) -> Vec<ChatMessage> {
        std::iter::once(ChatMessage::new(Role::System.as_str(), system_prompt))
            .chain(self.recent(window).iter().map(ChatMessage::from))
            .collect()
    }
}
