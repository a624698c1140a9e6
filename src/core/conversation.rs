use crate::api::ChatMessage;
use crate::core::chat_task::TaskMessage;
use crate::core::config::Config;
use crate::core::history::ChatHistory;
use crate::core::message::Message;

/// What the caller should do after handing user input to [`Conversation::submit`].
#[derive(Debug, PartialEq, Eq)]
pub enum Submission {
    /// Blank input; nothing recorded.
    Ignored,
    /// A request is already in flight.
    Busy,
    /// No API key; a system notice was appended instead of sending.
    MissingKey,
    /// The user turn was recorded; send these messages under `request_id`.
    Send {
        request_id: u64,
        messages: Vec<ChatMessage>,
    },
}

/// History plus the bookkeeping for the single in-flight request.
#[derive(Debug, Default)]
pub struct Conversation {
    history: ChatHistory,
    pending: Option<u64>,
    next_request_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn submit(&mut self, input: &str, has_api_key: bool, config: &Config) -> Submission {
        if input.trim().is_empty() {
            return Submission::Ignored;
        }
        if self.pending.is_some() {
            return Submission::Busy;
        }
        if !has_api_key {
            self.history.append(Message::system(format!(
                "Please set {} to your API key first.",
                config.api_key_env()
            )));
            return Submission::MissingKey;
        }

        self.history.append(Message::user(input));
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.pending = Some(request_id);

        Submission::Send {
            request_id,
            messages: self
                .history
                .request_messages(config.system_prompt(), config.context_messages()),
        }
    }

    /// Record a task result. Results for anything but the pending request are dropped.
    pub fn receive(&mut self, message: TaskMessage, request_id: u64) -> Option<&Message> {
        if self.pending != Some(request_id) {
            return None;
        }
        self.pending = None;

        let message = match message {
            TaskMessage::Reply(reply) => Message::assistant(reply),
            TaskMessage::Failed(description) => Message::system(format!("Error: {description}")),
        };
        self.history.append(message);
        self.history.last()
    }

    /// Forget the pending request, if any.
    pub fn cancel(&mut self) -> Option<u64> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Role;

    fn sent(submission: Submission) -> (u64, Vec<ChatMessage>) {
        match submission {
            Submission::Send {
                request_id,
                messages,
            } => (request_id, messages),
            other => panic!("expected a send, got {other:?}"),
        }
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut conversation = Conversation::new();
        assert_eq!(
            conversation.submit("   \n", true, &Config::default()),
            Submission::Ignored
        );
        assert!(conversation.history().is_empty());
    }

    #[test]
    fn missing_key_adds_a_system_notice() {
        let mut conversation = Conversation::new();
        let outcome = conversation.submit("hello", false, &Config::default());
        assert_eq!(outcome, Submission::MissingKey);
        let last = conversation.history().last().unwrap();
        assert_eq!(last.role, Role::System);
        assert!(last.content.contains("OPENROUTER_API_KEY"));
        assert!(!conversation.is_waiting());
    }

    #[test]
    fn send_then_reply_round_trip() {
        let mut conversation = Conversation::new();
        let config = Config::default();
        let (id, messages) = sent(conversation.submit("hello", true, &config));
        assert!(conversation.is_waiting());
        assert_eq!(messages.first().map(|m| m.role.as_str()), Some("system"));
        assert_eq!(messages.last(), Some(&ChatMessage::new("user", "hello")));

        assert_eq!(
            conversation.submit("again", true, &config),
            Submission::Busy
        );

        let reply = conversation
            .receive(TaskMessage::Reply("hi!".into()), id)
            .cloned();
        assert_eq!(reply, Some(Message::assistant("hi!")));
        assert!(!conversation.is_waiting());
        assert_eq!(conversation.history().len(), 2);
    }

    #[test]
    fn failures_become_system_errors() {
        let mut conversation = Conversation::new();
        let (id, _) = sent(conversation.submit("hello", true, &Config::default()));
        let message = conversation
            .receive(TaskMessage::Failed("connection refused".into()), id)
            .cloned()
            .unwrap();
        assert_eq!(message, Message::system("Error: connection refused"));
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut conversation = Conversation::new();
        let (first, _) = sent(conversation.submit("one", true, &Config::default()));
        assert_eq!(conversation.cancel(), Some(first));

        let (second, _) = sent(conversation.submit("two", true, &Config::default()));
        assert_ne!(first, second);
        assert!(conversation
            .receive(TaskMessage::Reply("late".into()), first)
            .is_none());
        assert!(conversation.is_waiting());
        assert!(conversation
            .receive(TaskMessage::Reply("fresh".into()), second)
            .is_some());
    }

    #[test]
    fn request_context_is_windowed() {
        let config = Config {
            context_messages: Some(2),
            system_prompt: Some("sys".into()),
            ..Default::default()
        };
        let mut conversation = Conversation::new();
        for turn in 0..3 {
            let (id, _) = sent(conversation.submit(&format!("q{turn}"), true, &config));
            conversation.receive(TaskMessage::Reply(format!("a{turn}")), id);
        }
        let (_, messages) = sent(conversation.submit("q3", true, &config));
        assert_eq!(
            messages,
            vec![
                ChatMessage::new("system", "sys"),
                ChatMessage::new("assistant", "a2"),
                ChatMessage::new("user", "q3"),
            ]
        );
    }
}
