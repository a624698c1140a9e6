//! One-shot "say" command

use std::error::Error;
use std::io;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::{output_theme, request_params, terminal_width};
use crate::core::chat_task::ChatTaskService;
use crate::core::config::Config;
use crate::core::conversation::{Conversation, Submission};
use crate::core::message::Role;
use crate::ui::ansi::write_lines;
use crate::ui::render::render_message;

pub async fn run_say(prompt: Vec<String>, config: Config) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    let api_key = config.api_key();
    let theme = output_theme(&config);
    let mut conversation = Conversation::new();

    let (request_id, messages) = match conversation.submit(&prompt, api_key.is_some(), &config) {
        Submission::Send {
            request_id,
            messages,
        } => (request_id, messages),
        Submission::MissingKey => {
            if let Some(notice) = conversation.history().last() {
                write_lines(&mut io::stderr().lock(), &render_message(notice, &theme, None))?;
            }
            std::process::exit(1);
        }
        Submission::Ignored | Submission::Busy => {
            eprintln!("Usage: schoolbot say <prompt>");
            std::process::exit(1);
        }
    };

    info!(model = config.model(), "sending one-shot prompt");
    let client = reqwest::Client::new();
    let (service, mut rx) = ChatTaskService::new();
    service.spawn_request(request_params(
        &config,
        &client,
        api_key.unwrap_or_default(),
        messages,
        request_id,
        CancellationToken::new(),
    ));

    let Some((outcome, id)) = rx.recv().await else {
        return Err("completion task ended without a result".into());
    };
    let Some(reply) = conversation.receive(outcome, id) else {
        return Err("completion task answered a different request".into());
    };

    let failed = reply.role == Role::System;
    let lines = render_message(reply, &theme, terminal_width());
    if failed {
        write_lines(&mut io::stderr().lock(), &lines)?;
        std::process::exit(1);
    }
    write_lines(&mut io::stdout().lock(), &lines)?;
    Ok(())
}
