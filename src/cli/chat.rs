//! Line-oriented chat session over stdin

use std::error::Error;
use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::{output_theme, request_params, terminal_width};
use crate::core::chat_task::ChatTaskService;
use crate::core::config::Config;
use crate::core::conversation::{Conversation, Submission};
use crate::core::message::Message;
use crate::ui::ansi::write_lines;
use crate::ui::render::render_message;
use crate::ui::theme::Theme;

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Cancel,
    Prompt(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    match line.trim() {
        "/quit" | "/exit" => Input::Quit,
        "/cancel" => Input::Cancel,
        _ => Input::Prompt(line),
    }
}

fn show(message: &Message, theme: &Theme) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write_lines(&mut stdout, &render_message(message, theme, terminal_width()))?;
    writeln!(stdout)?;
    stdout.flush()
}

pub async fn run_chat(config: Config) -> Result<(), Box<dyn Error>> {
    let theme = output_theme(&config);
    let client = reqwest::Client::new();
    let (service, mut rx) = ChatTaskService::new();
    let mut conversation = Conversation::new();
    let mut in_flight: Option<CancellationToken> = None;
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("schoolbot: chatting with {} (/quit to leave)", config.model());
    info!(model = config.model(), base_url = config.base_url(), "chat session started");

    loop {
        tokio::select! {
            line = stdin.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match classify(&line) {
                    Input::Quit => break,
                    Input::Cancel => {
                        let pending = (conversation.cancel(), in_flight.take());
                        if let (Some(request_id), Some(token)) = pending {
                            token.cancel();
                            debug!(request_id, "pending reply cancelled");
                            eprintln!("(cancelled)");
                        }
                    }
                    Input::Prompt(text) => {
                        let api_key = config.api_key();
                        match conversation.submit(text, api_key.is_some(), &config) {
                            Submission::Ignored => {}
                            Submission::Busy => {
                                eprintln!("(still waiting for the last reply; /cancel to drop it)")
                            }
                            Submission::MissingKey => {
                                if let Some(notice) = conversation.history().last() {
                                    show(notice, &theme)?;
                                }
                            }
                            Submission::Send { request_id, messages } => {
                                if let Some(sent) = conversation.history().last() {
                                    show(sent, &theme)?;
                                }
                                let token = CancellationToken::new();
                                service.spawn_request(request_params(
                                    &config,
                                    &client,
                                    api_key.unwrap_or_default(),
                                    messages,
                                    request_id,
                                    token.clone(),
                                ));
                                in_flight = Some(token);
                            }
                        }
                    }
                }
            }
            Some((outcome, request_id)) = rx.recv() => {
                if let Some(message) = conversation.receive(outcome, request_id) {
                    in_flight = None;
                    show(message, &theme)?;
                } else {
                    debug!(request_id, "dropping stale reply");
                }
            }
        }
    }

    if let Some(token) = in_flight {
        token.cancel();
    }
    info!(messages = conversation.history().len(), "chat session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_commands_are_recognised() {
        assert_eq!(classify("/quit"), Input::Quit);
        assert_eq!(classify("  /exit "), Input::Quit);
        assert_eq!(classify("/cancel"), Input::Cancel);
        assert_eq!(classify("/cancelled"), Input::Prompt("/cancelled"));
        assert_eq!(classify("hello"), Input::Prompt("hello"));
    }
}
